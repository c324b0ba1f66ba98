use serde::Serialize;
use std::fmt;

use super::registry::IndicatorId;

/// Non-fatal condition noticed while scoring. The caller decides whether to
/// surface it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// An active indicator had no value and was left out of the weighted sum.
    MissingValue {
        indicator: IndicatorId,
        location: String,
    },
    /// The selection was empty and the registry default was scored instead.
    EmptySelection { substituted: IndicatorId },
    /// Active base weights summed to zero; every active indicator got `1 / n`.
    EqualWeightFallback { active_count: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingValue {
                indicator,
                location,
            } => write!(
                f,
                "{}: no value for active indicator {}, excluded from score",
                location, indicator
            ),
            Diagnostic::EmptySelection { substituted } => write!(
                f,
                "no active indicators selected, scoring {} only",
                substituted
            ),
            Diagnostic::EqualWeightFallback { active_count } => write!(
                f,
                "active base weights sum to zero, using equal weights across {} indicators",
                active_count
            ),
        }
    }
}

/// Emit each diagnostic as a `warn!` event; returns how many were reported.
pub fn report<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) -> usize {
    let mut count = 0;
    for diagnostic in diagnostics {
        tracing::warn!("{}", diagnostic);
        count += 1;
    }
    count
}
