//! End-to-end checkout runs against scripted outcomes.

use std::sync::Arc;

use checkout_operations::providers::{
    RandomOutcomeSource, ScriptedOutcomeSource, SequentialIds, Verdict,
};
use checkout_operations::{
    CheckoutConfig, CheckoutContext, CheckoutOperation, OperationKind, SuccessRate, place_order,
};
use checkout_saga::{SagaAuditLog, SagaError, SagaExecutor, StepStatus};

use Verdict::{Fail, FailToEnd, Pass};

type ScriptedContext = CheckoutContext<ScriptedOutcomeSource, SequentialIds>;

fn context(script: &[Verdict]) -> ScriptedContext {
    CheckoutContext::new(
        CheckoutConfig::default(),
        Arc::new(ScriptedOutcomeSource::new(script.iter().copied())),
        Arc::new(SequentialIds::starting_at(1)),
    )
}

fn statuses(log: &SagaAuditLog) -> Vec<(String, StepStatus)> {
    log.records()
        .iter()
        .map(|record| (record.name.clone(), record.status))
        .collect()
}

/// Every operation before `failing` passes once, then `failing` never passes.
async fn assert_rolls_back_before(failing: usize) {
    let mut script = vec![Pass; failing];
    script.push(FailToEnd);
    let ctx = context(&script);

    let (outcome, log) = SagaExecutor::new()
        .execute_with_audit(place_order(&ctx))
        .await;

    let err = outcome.expect_err("checkout aborts");
    let failed = OperationKind::ALL[failing];
    assert!(matches!(err, SagaError::StepExhausted { attempts: 3, .. }));
    assert_eq!(err.failed_step(), failed.as_str());
    assert_eq!(ctx.outcomes().call_count(), failing + 3);

    let mut expected: Vec<(String, StepStatus)> = OperationKind::ALL[..failing]
        .iter()
        .map(|kind| (kind.as_str().to_string(), StepStatus::Compensated))
        .collect();
    expected.push((failed.as_str().to_string(), StepStatus::Failed));
    assert_eq!(statuses(&log), expected);
}

#[tokio::test(start_paused = true)]
async fn calculate_total_fails_and_nothing_is_rolled_back() {
    assert_rolls_back_before(0).await;
}

#[tokio::test(start_paused = true)]
async fn update_coupon_fails_and_total_is_rolled_back() {
    assert_rolls_back_before(1).await;
}

#[tokio::test(start_paused = true)]
async fn vendor_fee_fails_and_coupon_and_total_are_rolled_back() {
    assert_rolls_back_before(2).await;
}

#[tokio::test(start_paused = true)]
async fn credit_card_fails_and_three_operations_are_rolled_back() {
    assert_rolls_back_before(3).await;
}

#[tokio::test(start_paused = true)]
async fn save_order_fails_and_four_operations_are_rolled_back() {
    assert_rolls_back_before(4).await;
}

/// The operation at `retried` fails twice and then passes; the next one never
/// passes.
async fn assert_retries_twice(retried: usize, expected_calls: usize) {
    let mut script = vec![Pass; retried];
    script.extend([Fail, Fail, Pass, FailToEnd]);
    let ctx = context(&script);

    let (outcome, log) = SagaExecutor::new()
        .execute_with_audit(place_order(&ctx))
        .await;

    let err = outcome.expect_err("checkout aborts");
    assert_eq!(err.failed_step(), OperationKind::ALL[retried + 1].as_str());
    assert_eq!(ctx.outcomes().call_count(), expected_calls);
    assert_eq!(log.records()[retried].attempts, 3);
    assert_eq!(log.records()[retried].status, StepStatus::Compensated);
}

#[tokio::test(start_paused = true)]
async fn calculate_total_retries_twice() {
    assert_retries_twice(0, 6).await;
}

#[tokio::test(start_paused = true)]
async fn update_coupon_retries_twice() {
    assert_retries_twice(1, 7).await;
}

#[tokio::test(start_paused = true)]
async fn vendor_fee_retries_twice() {
    assert_retries_twice(2, 8).await;
}

#[tokio::test(start_paused = true)]
async fn credit_card_retries_twice() {
    assert_retries_twice(3, 9).await;
}

#[tokio::test(start_paused = true)]
async fn save_order_retries_twice_and_checkout_commits() -> anyhow::Result<()> {
    let ctx = context(&[Pass, Pass, Pass, Pass, Fail, Fail, Pass, FailToEnd]);

    let results = SagaExecutor::new().execute(place_order(&ctx)).await?;

    let attempts: Vec<u32> = results.iter().map(|r| r.attempts_used).collect();
    assert_eq!(attempts, vec![1, 1, 1, 1, 3]);
    assert_eq!(ctx.outcomes().call_count(), 7);
    assert_eq!(
        results.last().map(|r| r.output),
        Some(CheckoutOperation::SaveOrder { order_id: 1 })
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn outputs_follow_commit_order() -> anyhow::Result<()> {
    let ctx = context(&[Pass; 5]);

    let results = SagaExecutor::new().execute(place_order(&ctx)).await?;

    let steps: Vec<&str> = results.iter().map(|r| r.step).collect();
    let expected: Vec<&str> = OperationKind::ALL.iter().map(|k| k.as_str()).collect();
    assert_eq!(steps, expected);
    assert_eq!(ctx.outcomes().calls(), OperationKind::ALL.to_vec());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn aborted_checkout_draws_no_ids_for_unreached_steps() {
    let ctx = context(&[FailToEnd]);

    let result = SagaExecutor::new().execute(place_order(&ctx)).await;

    assert!(result.is_err());
    assert_eq!(ctx.ids().issued(), 1);
}

#[tokio::test(start_paused = true)]
async fn certain_success_always_commits() {
    let ctx = CheckoutContext::new(
        CheckoutConfig::default(),
        Arc::new(RandomOutcomeSource::seeded(
            SuccessRate::new(1.0).expect("valid rate"),
            7,
        )),
        Arc::new(SequentialIds::starting_at(1)),
    );

    let results = SagaExecutor::new()
        .execute(place_order(&ctx))
        .await
        .expect("checkout commits");

    assert_eq!(results.len(), 5);
    assert!(results.iter().all(|r| r.attempts_used == 1));
}

#[tokio::test(start_paused = true)]
async fn certain_failure_aborts_at_the_first_operation() {
    let ctx = CheckoutContext::new(
        CheckoutConfig::default(),
        Arc::new(RandomOutcomeSource::seeded(
            SuccessRate::new(0.0).expect("valid rate"),
            7,
        )),
        Arc::new(SequentialIds::starting_at(1)),
    );

    let err = SagaExecutor::new()
        .execute(place_order(&ctx))
        .await
        .expect_err("checkout aborts");

    assert_eq!(err.failed_step(), "calculate-total");
    assert_eq!(err.attempts(), 3);
}
