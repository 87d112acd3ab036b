use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::Duration;

use checkout_saga::RetryPolicy;

use crate::error::ConfigError;

/// The business operations that make up an order checkout, in commit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    CalculateTotal,
    UpdateCoupon,
    ChargeVendorFee,
    ChargeCreditCard,
    SaveOrder,
}

impl OperationKind {
    pub const ALL: [Self; 5] = [
        Self::CalculateTotal,
        Self::UpdateCoupon,
        Self::ChargeVendorFee,
        Self::ChargeCreditCard,
        Self::SaveOrder,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CalculateTotal => "calculate-total",
            Self::UpdateCoupon => "update-coupon",
            Self::ChargeVendorFee => "charge-vendor-fee",
            Self::ChargeCreditCard => "charge-credit-card",
            Self::SaveOrder => "save-order",
        }
    }

    /// First try plus two retries; totals wait a second between attempts,
    /// everything else half a second.
    #[must_use]
    pub fn default_retry_policy(self) -> RetryPolicy {
        const ATTEMPTS: NonZeroU32 = NonZeroU32::new(3).expect("three is non-zero");

        let delay = match self {
            Self::CalculateTotal => Duration::from_millis(1_000),
            _ => Duration::from_millis(500),
        };
        RetryPolicy::new(ATTEMPTS, delay)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownOperation {
                name: s.to_string(),
            })
    }
}

/// A single checkout operation together with the values it was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOperation {
    CalculateTotal { order_id: u32 },
    UpdateCoupon { coupon_number: u32 },
    ChargeVendorFee,
    ChargeCreditCard { cc_number: u32 },
    SaveOrder { order_id: u32 },
}

impl CheckoutOperation {
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::CalculateTotal { .. } => OperationKind::CalculateTotal,
            Self::UpdateCoupon { .. } => OperationKind::UpdateCoupon,
            Self::ChargeVendorFee => OperationKind::ChargeVendorFee,
            Self::ChargeCreditCard { .. } => OperationKind::ChargeCreditCard,
            Self::SaveOrder { .. } => OperationKind::SaveOrder,
        }
    }

    /// What undoing this operation means to a human.
    #[must_use]
    pub fn rollback_message(&self) -> String {
        match self {
            Self::CalculateTotal { order_id } => {
                format!("Rolled back order {order_id} total calculation.")
            }
            Self::UpdateCoupon { coupon_number } => {
                format!("Rolled back coupon {coupon_number} update.")
            }
            Self::ChargeVendorFee => "Rolled back vendor charge.".to_string(),
            Self::ChargeCreditCard { cc_number } => {
                format!("Rolled back credit card charge for {cc_number}.")
            }
            Self::SaveOrder { order_id } => format!("Removing order {order_id}."),
        }
    }
}

impl fmt::Display for CheckoutOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CalculateTotal { order_id } => {
                write!(f, "calculate total for order {order_id}")
            }
            Self::UpdateCoupon { coupon_number } => write!(f, "update coupon {coupon_number}"),
            Self::ChargeVendorFee => f.write_str("charge vendor fee"),
            Self::ChargeCreditCard { cc_number } => {
                write!(f, "charge credit card {cc_number}")
            }
            Self::SaveOrder { order_id } => write!(f, "save order {order_id}"),
        }
    }
}

/// Probability that a simulated operation attempt succeeds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuccessRate(f64);

impl SuccessRate {
    pub const HALF: Self = Self(0.5);

    /// # Errors
    ///
    /// Returns `ConfigError::SuccessRate` unless `rate` is within `0.0..=1.0`.
    pub fn new(rate: f64) -> Result<Self, ConfigError> {
        if (0.0..=1.0).contains(&rate) {
            Ok(Self(rate))
        } else {
            Err(ConfigError::SuccessRate { rate })
        }
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Default for SuccessRate {
    fn default() -> Self {
        Self::HALF
    }
}
