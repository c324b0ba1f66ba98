pub mod compose;
pub mod confidence;
pub mod config;
pub mod counterfactual;
pub mod diagnostics;
pub mod engine;
pub mod explain;
pub mod registry;
pub mod selection;
pub mod validation;
pub mod weights;

pub use compose::{compose, BreakdownEntry, Composition};
pub use confidence::confidence;
pub use config::ScoringConfig;
pub use counterfactual::{
    simulate, CounterfactualScenario, CounterfactualSummary, ScenarioDirection, DEFAULT_DELTA,
};
pub use diagnostics::{report as report_diagnostics, Diagnostic};
pub use engine::{rank_locations, score_batch, score_location, CompositeResult, ScoreOptions};
pub use explain::{explain, Contributor, Explanation, NarrativeRule, NARRATIVE_RULES};
pub use registry::{Direction, IndicatorDefinition, IndicatorId, Registry};
pub use selection::ActiveSelection;
pub use validation::validate_scoring;
pub use weights::{normalize, EffectiveWeights};
