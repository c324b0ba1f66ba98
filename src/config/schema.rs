use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;
use crate::scoring::ScoringConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
    #[serde(default)]
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Scoring section with built-in defaults filled in for anything unset.
    pub fn effective_scoring(&self) -> ScoringConfig {
        let defaults = ScoringConfig::default();
        match &self.scoring {
            Some(s) => ScoringConfig {
                active: s.active.clone().or(defaults.active),
                counterfactual_delta: s.counterfactual_delta.or(defaults.counterfactual_delta),
                top_contributors: s.top_contributors.or(defaults.top_contributors),
            },
            None => defaults,
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output
            .as_ref()
            .and_then(|o| o.format)
            .unwrap_or_default()
    }
}
