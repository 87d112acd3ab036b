use std::iter::FusedIterator;

use tracing::debug;

use crate::context::CheckoutContext;
use crate::steps::CheckoutStep;
use crate::traits::{IdGenerator, OutcomeSource};

#[derive(Debug, Clone, Copy)]
enum Stage {
    Start,
    UpdateCoupon { order_id: u32 },
    ChargeVendorFee { order_id: u32 },
    ChargeCreditCard { order_id: u32 },
    SaveOrder { order_id: u32 },
    Done,
}

impl Stage {
    const fn remaining(self) -> usize {
        match self {
            Self::Start => 5,
            Self::UpdateCoupon { .. } => 4,
            Self::ChargeVendorFee { .. } => 3,
            Self::ChargeCreditCard { .. } => 2,
            Self::SaveOrder { .. } => 1,
            Self::Done => 0,
        }
    }
}

/// The steps of one order checkout, produced on demand.
///
/// Identifiers are drawn from the context only when the step that needs them
/// is pulled, so an aborted checkout never allocates ids for steps it did not
/// reach.
pub struct PlaceOrderPlan<O, I> {
    ctx: CheckoutContext<O, I>,
    stage: Stage,
}

impl<O, I> Iterator for PlaceOrderPlan<O, I>
where
    O: OutcomeSource,
    I: IdGenerator,
{
    type Item = CheckoutStep<O>;

    fn next(&mut self) -> Option<Self::Item> {
        let (step, next) = match self.stage {
            Stage::Start => {
                let order_id = self.ctx.next_id();
                debug!(order_id, "planning checkout");
                (
                    self.ctx.calculate_total(order_id),
                    Stage::UpdateCoupon { order_id },
                )
            }
            Stage::UpdateCoupon { order_id } => {
                let coupon_number = self.ctx.next_id();
                (
                    self.ctx.update_coupon(coupon_number),
                    Stage::ChargeVendorFee { order_id },
                )
            }
            Stage::ChargeVendorFee { order_id } => (
                self.ctx.charge_vendor_fee(),
                Stage::ChargeCreditCard { order_id },
            ),
            Stage::ChargeCreditCard { order_id } => {
                let cc_number = self.ctx.next_id();
                (
                    self.ctx.charge_credit_card(cc_number),
                    Stage::SaveOrder { order_id },
                )
            }
            Stage::SaveOrder { order_id } => (self.ctx.save_order(order_id), Stage::Done),
            Stage::Done => return None,
        };

        self.stage = next;
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.stage.remaining();
        (remaining, Some(remaining))
    }
}

impl<O, I> ExactSizeIterator for PlaceOrderPlan<O, I>
where
    O: OutcomeSource,
    I: IdGenerator,
{
}

impl<O, I> FusedIterator for PlaceOrderPlan<O, I>
where
    O: OutcomeSource,
    I: IdGenerator,
{
}

/// Plan a checkout: total, coupon, vendor fee, credit card, then the order
/// itself.
#[must_use]
pub fn place_order<O, I>(ctx: &CheckoutContext<O, I>) -> PlaceOrderPlan<O, I>
where
    O: OutcomeSource,
    I: IdGenerator,
{
    PlaceOrderPlan {
        ctx: ctx.clone(),
        stage: Stage::Start,
    }
}
