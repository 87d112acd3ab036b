use std::sync::Arc;

use checkout_operations::providers::{RandomIds, RandomOutcomeSource, ScriptedOutcomeSource};
use checkout_operations::traits::OutcomeSource;
use checkout_operations::{CheckoutConfig, CheckoutContext, SuccessRate, place_order};
use checkout_saga::{CompensationPolicy, SagaExecutor};
use clap::Args;
use tracing::info;

use crate::error::{CliError, Result};
use crate::output::{OutputFormatter, PlainTextFormatter};

#[derive(Args)]
pub(crate) struct RunArgs {
    /// Probability that each attempt succeeds, between 0.0 and 1.0
    #[arg(long)]
    success_rate: Option<f64>,

    /// Seed for simulated outcomes and generated ids
    #[arg(long)]
    seed: Option<u64>,

    /// Comma-separated verdicts replayed one per attempt: pass, fail or fail-to-end
    #[arg(long, conflicts_with = "success_rate")]
    script: Option<String>,

    /// Stop compensating at the first compensation that fails
    #[arg(long)]
    halt_on_compensation_failure: bool,
}

impl RunArgs {
    fn compensation_policy(&self) -> CompensationPolicy {
        if self.halt_on_compensation_failure {
            CompensationPolicy::Halt
        } else {
            CompensationPolicy::BestEffort
        }
    }

    fn ids(&self) -> RandomIds {
        match self.seed {
            Some(seed) => RandomIds::seeded(seed),
            None => RandomIds::new(),
        }
    }
}

pub(super) fn run(args: RunArgs, mut config: CheckoutConfig) -> Result<bool> {
    if let Some(rate) = args.success_rate {
        config = config.with_success_rate(SuccessRate::new(rate)?);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .build()
        .map_err(CliError::Runtime)?;

    let ids = Arc::new(args.ids());
    let policy = args.compensation_policy();

    let succeeded = match args.script.as_deref() {
        Some(script) => {
            let outcomes = Arc::new(ScriptedOutcomeSource::parse(script)?);
            let ctx = CheckoutContext::new(config, outcomes, ids);
            runtime.block_on(checkout(&ctx, policy))
        }
        None => {
            let success_rate = config.success_rate();
            let outcomes = Arc::new(match args.seed {
                Some(seed) => RandomOutcomeSource::seeded(success_rate, seed),
                None => RandomOutcomeSource::new(success_rate),
            });
            let ctx = CheckoutContext::new(config, outcomes, ids);
            runtime.block_on(checkout(&ctx, policy))
        }
    };

    Ok(succeeded)
}

async fn checkout<O>(ctx: &CheckoutContext<O, RandomIds>, policy: CompensationPolicy) -> bool
where
    O: OutcomeSource + 'static,
{
    info!(?policy, "starting checkout");

    let (outcome, audit_log) = SagaExecutor::new()
        .with_compensation_policy(policy)
        .execute_with_audit(place_order(ctx))
        .await;

    print!("{}", PlainTextFormatter.format_outcome(&outcome, &audit_log));
    outcome.is_ok()
}
