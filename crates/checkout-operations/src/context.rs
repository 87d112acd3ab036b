use std::sync::Arc;

use crate::config::CheckoutConfig;
use crate::steps::CheckoutStep;
use crate::traits::{IdGenerator, OutcomeSource};
use crate::types::CheckoutOperation;

/// Shared dependencies for building checkout steps.
pub struct CheckoutContext<O, I> {
    config: Arc<CheckoutConfig>,
    outcomes: Arc<O>,
    ids: Arc<I>,
}

impl<O, I> Clone for CheckoutContext<O, I> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            outcomes: Arc::clone(&self.outcomes),
            ids: Arc::clone(&self.ids),
        }
    }
}

impl<O, I> CheckoutContext<O, I>
where
    O: OutcomeSource,
    I: IdGenerator,
{
    pub fn new(config: CheckoutConfig, outcomes: Arc<O>, ids: Arc<I>) -> Self {
        Self {
            config: Arc::new(config),
            outcomes,
            ids,
        }
    }

    #[must_use]
    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    #[must_use]
    pub fn outcomes(&self) -> &O {
        &self.outcomes
    }

    #[must_use]
    pub fn ids(&self) -> &I {
        &self.ids
    }

    /// Draw a fresh identifier.
    #[must_use]
    pub fn next_id(&self) -> u32 {
        self.ids.next_id()
    }

    #[must_use]
    pub fn calculate_total(&self, order_id: u32) -> CheckoutStep<O> {
        self.step(CheckoutOperation::CalculateTotal { order_id })
    }

    #[must_use]
    pub fn update_coupon(&self, coupon_number: u32) -> CheckoutStep<O> {
        self.step(CheckoutOperation::UpdateCoupon { coupon_number })
    }

    #[must_use]
    pub fn charge_vendor_fee(&self) -> CheckoutStep<O> {
        self.step(CheckoutOperation::ChargeVendorFee)
    }

    #[must_use]
    pub fn charge_credit_card(&self, cc_number: u32) -> CheckoutStep<O> {
        self.step(CheckoutOperation::ChargeCreditCard { cc_number })
    }

    #[must_use]
    pub fn save_order(&self, order_id: u32) -> CheckoutStep<O> {
        self.step(CheckoutOperation::SaveOrder { order_id })
    }

    fn step(&self, operation: CheckoutOperation) -> CheckoutStep<O> {
        let policy = self.config.retry_policy(operation.kind());
        CheckoutStep::new(operation, policy, Arc::clone(&self.outcomes))
    }
}
