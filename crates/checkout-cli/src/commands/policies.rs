use checkout_operations::CheckoutConfig;

use crate::output::{OutputFormatter, PlainTextFormatter};

pub(super) fn run(config: &CheckoutConfig) {
    print!("{}", PlainTextFormatter.format_policies(config));
}
