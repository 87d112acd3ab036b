mod config;
mod context;
mod error;
mod plan;
pub mod providers;
mod steps;
pub mod traits;
mod types;

pub use config::CheckoutConfig;
pub use context::CheckoutContext;
pub use error::{ConfigError, OperationError};
pub use plan::{PlaceOrderPlan, place_order};
pub use steps::CheckoutStep;
pub use types::{CheckoutOperation, OperationKind, SuccessRate};
