//! Request/response contract for the external advisory service.
//!
//! The advisory collaborator consumes a finished pass and the scenario that
//! produced it and returns a narrative evaluation. The engine never calls
//! it and never waits on it; a failing or absent implementation leaves the
//! pass result fully usable.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::scenario::Scenario;
use crate::world::PassResult;

#[derive(Debug, Clone, Serialize)]
pub struct AdvisoryRequest<'a> {
    pub scenario_name: &'a str,
    pub civilization: crate::tables::Civilization,
    pub strategy: crate::tables::Strategy,
    pub score: f64,
    pub age_reached: Option<&'a str>,
    pub idle_secs: f64,
    pub counter_hint: &'a str,
}

impl<'a> AdvisoryRequest<'a> {
    pub fn from_pass(scenario: &'a Scenario, result: &'a PassResult) -> Self {
        Self {
            scenario_name: &result.scenario,
            civilization: scenario.civilization,
            strategy: scenario.strategy,
            score: result.score,
            age_reached: result.milestones.age_reached.as_deref(),
            idle_secs: result.stats.idle_secs,
            counter_hint: &result.counter_hint,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryResponse {
    pub verdict: String,
    pub notes: Vec<String>,
}

/// Implemented by whatever produces the narrative evaluation.
pub trait AdvisoryService {
    fn evaluate(&self, request: &AdvisoryRequest<'_>) -> Result<AdvisoryResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::run_pass;
    use crate::variants::HeuristicProfile;
    use anyhow::bail;

    struct Unavailable;

    impl AdvisoryService for Unavailable {
        fn evaluate(&self, _request: &AdvisoryRequest<'_>) -> Result<AdvisoryResponse> {
            bail!("advisory endpoint unreachable")
        }
    }

    #[test]
    fn a_failing_advisor_leaves_the_result_intact() {
        let scenario = Scenario::example();
        let result = run_pass(&scenario, &HeuristicProfile::default());
        let request = AdvisoryRequest::from_pass(&scenario, &result);
        assert!(Unavailable.evaluate(&request).is_err());
        // The pass result stands on its own.
        assert!(!result.log.is_empty());
        assert!(result.score >= 0.0);
    }
}
