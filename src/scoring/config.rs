use serde::{Deserialize, Serialize};

use super::counterfactual::DEFAULT_DELTA;
use super::engine::ScoreOptions;
use super::explain::DEFAULT_TOP_CONTRIBUTORS;
use super::registry::{IndicatorId, Registry};
use super::selection::ActiveSelection;

/// Scoring section of the config file.
///
/// Every field is optional; unset fields fall back to the built-in defaults.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   active: [poverty_index, education_access, water_access]
///   counterfactual_delta: 10
///   top_contributors: 5
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Indicators scored when the command line does not say otherwise.
    /// An empty list scores the registry default indicator.
    #[serde(default)]
    pub active: Option<Vec<IndicatorId>>,

    /// Raw points each indicator is moved by in counterfactual scenarios.
    #[serde(default)]
    pub counterfactual_delta: Option<f64>,

    /// Maximum number of contributors listed in an explanation.
    #[serde(default)]
    pub top_contributors: Option<usize>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            active: Some(
                Registry::standard()
                    .definitions()
                    .iter()
                    .map(|d| d.id)
                    .collect(),
            ),
            counterfactual_delta: Some(DEFAULT_DELTA),
            top_contributors: Some(DEFAULT_TOP_CONTRIBUTORS),
        }
    }
}

impl ScoringConfig {
    /// Configured selection, or every registry indicator when unset.
    pub fn active_selection(&self, registry: &Registry) -> ActiveSelection {
        match &self.active {
            Some(ids) => ActiveSelection::new(ids.iter().copied()),
            None => ActiveSelection::all(registry),
        }
    }

    pub fn score_options(&self, include_explainability: bool) -> ScoreOptions {
        ScoreOptions {
            include_explainability,
            counterfactual_delta: self.counterfactual_delta.unwrap_or(DEFAULT_DELTA),
            top_contributors: self.top_contributors.unwrap_or(DEFAULT_TOP_CONTRIBUTORS),
        }
    }
}
