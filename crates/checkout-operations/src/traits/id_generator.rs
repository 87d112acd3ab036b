/// Source of order, coupon and credit-card identifiers for new orders.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> u32;
}
