//! End-to-end request pipeline against in-process test doubles.

use std::sync::Arc;

use finguard_core::api::{
    keys, AdvisorPipeline, AuthorizationGate, CannedGenerator, ClearanceLevel, ComplianceGate,
    DecisionBackend, FixedDecider, Identity, KeywordClassifier, PipelineError, PipelineOutcome,
    Query, Tier, DISCLAIMER,
};
use pretty_assertions::assert_eq;

const QUESTION: &str = "Can you suggest some basic investment strategies for beginners?";
const ANSWER: &str = "Start with an emergency fund, then consider diversifying across index funds.";

fn build(decider: Arc<FixedDecider>, generator: Arc<CannedGenerator>) -> AdvisorPipeline {
    let backend = DecisionBackend::live(decider);
    AdvisorPipeline::new(
        Arc::new(AuthorizationGate::new(
            backend.clone(),
            Arc::new(KeywordClassifier::query_default()),
            true,
        )),
        Arc::new(ComplianceGate::new(
            backend,
            Arc::new(KeywordClassifier::response_default()),
            true,
        )),
        generator,
    )
}

#[tokio::test]
async fn opted_in_caller_gets_disclaimed_advice() {
    let decider = Arc::new(FixedDecider::allow());
    let generator = Arc::new(CannedGenerator::new(ANSWER));
    let who = Identity::new("alice@example.com", Tier::PremiumUser)
        .with_clearance(ClearanceLevel::High)
        .opted_in(true);

    let outcome = build(decider.clone(), generator.clone())
        .ask(Query::new(QUESTION, who))
        .await
        .unwrap();

    let PipelineOutcome::Answered { response } = outcome else {
        panic!("expected an answer, got {outcome:?}");
    };
    assert!(response.answer.starts_with(ANSWER));
    assert!(response.answer.ends_with(DISCLAIMER));
    assert!(response.includes_advice);
    assert!(response.disclaimer_added);
    assert_eq!(generator.call_count(), 1);

    let actions: Vec<String> = decider.calls().into_iter().map(|c| c.action).collect();
    assert_eq!(actions, vec![keys::RECEIVE, keys::REQUIRES_DISCLAIMER]);
}

#[tokio::test]
async fn caller_not_opted_in_is_denied_before_generation() {
    let decider = Arc::new(FixedDecider::deny());
    let generator = Arc::new(CannedGenerator::new(ANSWER));
    let who = Identity::new("bob@example.com", Tier::RestrictedUser).opted_in(false);

    let outcome = build(decider.clone(), generator.clone())
        .ask(Query::new(QUESTION, who))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        PipelineOutcome::Denied {
            reason: "User has not opted in to receive AI-generated financial advice".into()
        }
    );
    assert_eq!(generator.call_count(), 0);
    assert_eq!(decider.call_count(), 1);
}

#[tokio::test]
async fn authorization_failure_is_a_security_error_not_a_denial() {
    let decider = Arc::new(FixedDecider::unavailable());
    let generator = Arc::new(CannedGenerator::new(ANSWER));

    let err = build(decider, generator.clone())
        .ask(Query::new(QUESTION, Identity::example_premium()))
        .await
        .unwrap_err();

    let PipelineError::Security(check) = err else {
        panic!("expected a security error");
    };
    assert_eq!(check.subject, "user@example.com");
    assert_eq!(check.action, keys::RECEIVE);
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn compliance_failure_discards_the_answer() {
    let decider =
        Arc::new(FixedDecider::allow().failing_action(keys::REQUIRES_DISCLAIMER));
    let generator = Arc::new(CannedGenerator::new(ANSWER));

    let err = build(decider, generator.clone())
        .ask(Query::new(QUESTION, Identity::example_premium()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Security(ref c) if c.action == keys::REQUIRES_DISCLAIMER
    ));
    assert_eq!(generator.call_count(), 1);
}

#[tokio::test]
async fn concurrent_requests_are_independent() {
    let decider = Arc::new(FixedDecider::allow());
    let generator = Arc::new(CannedGenerator::new(ANSWER));
    let pipeline = build(decider.clone(), generator.clone());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let p = pipeline.clone();
            tokio::spawn(async move {
                let who = Identity::new(format!("user{i}@example.com"), Tier::PremiumUser)
                    .opted_in(true);
                p.ask(Query::new(QUESTION, who)).await
            })
        })
        .collect();

    for h in handles {
        let outcome = h.await.unwrap().unwrap();
        let response = outcome.response().unwrap();
        assert_eq!(response.answer.matches("IMPORTANT DISCLAIMER").count(), 1);
    }
    assert_eq!(generator.call_count(), 8);
    assert_eq!(decider.call_count(), 16);
}
