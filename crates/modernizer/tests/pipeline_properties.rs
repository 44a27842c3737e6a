//! Property tests for the repair loop bounds.

mod common;

use common::{plan_json, ScriptedOracle, ScriptedValidator, TestHarness};
use modernizer::pipeline::{next_after_validation, RunStatus, Stage};
use modernizer::sandbox::ExecutionOutcome;
use proptest::prelude::*;

fn outcome_strategy() -> impl Strategy<Value = ExecutionOutcome> {
    prop_oneof![
        3 => "[a-zA-Z: ]{1,24}".prop_map(ExecutionOutcome::failure),
        1 => Just(ExecutionOutcome::success()),
        1 => Just(ExecutionOutcome::timed_out()),
        1 => Just(ExecutionOutcome::no_code()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_run_is_bounded(
        max_retries in 0u32..5,
        outcomes in prop::collection::vec(outcome_strategy(), 0..8),
    ) {
        let harness = TestHarness::new();
        let oracle = ScriptedOracle::texts(&[plan_json("python").as_str(), "candidate()"]);
        let validator = ScriptedValidator::new(outcomes.clone());
        let pipeline = harness.pipeline(max_retries, oracle, validator);

        let (report, state) = harness.run(&pipeline, "f.py", "legacy");

        prop_assert!(report.retry_count <= max_retries);
        prop_assert!(report.validations <= max_retries + 1);
        prop_assert_eq!(report.retry_count, state.retry_count());
        prop_assert_eq!(report.validations, report.retry_count + 1);

        // the run ends on the first accepted outcome, if any falls within budget
        let budget = (max_retries + 1) as usize;
        let first_accepted = outcomes.iter().take(budget).position(|o| o.is_accepted());
        match first_accepted {
            Some(i) => {
                prop_assert_eq!(report.status, RunStatus::Succeeded);
                prop_assert_eq!(report.retry_count as usize, i);
            }
            None => {
                prop_assert_eq!(report.status, RunStatus::Failed);
                prop_assert_eq!(report.retry_count, max_retries);
            }
        }
    }

    #[test]
    fn prop_routing_never_exceeds_budget(retry_count in 0u32..10, max_retries in 0u32..10) {
        let next = next_after_validation(&ExecutionOutcome::failure("x"), retry_count, max_retries);
        if retry_count < max_retries {
            prop_assert_eq!(next, Stage::Repair);
        } else {
            prop_assert_eq!(next, Stage::Failed);
        }
    }
}
