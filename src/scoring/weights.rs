use serde::Serialize;
use std::collections::BTreeMap;

use super::registry::{IndicatorId, Registry};
use super::selection::ActiveSelection;

/// Base weights rescaled over the active selection.
///
/// Indicators outside the selection are absent and read back as 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectiveWeights {
    weights: BTreeMap<IndicatorId, f64>,
    #[serde(skip)]
    equal_weight_fallback: bool,
}

impl EffectiveWeights {
    pub fn get(&self, id: IndicatorId) -> f64 {
        self.weights.get(&id).copied().unwrap_or(0.0)
    }

    pub fn sum(&self) -> f64 {
        self.weights.values().sum()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (IndicatorId, f64)> + '_ {
        self.weights.iter().map(|(id, w)| (*id, *w))
    }

    /// True when the active base weights summed to zero and every active
    /// indicator received `1 / n` instead.
    pub fn used_equal_weight_fallback(&self) -> bool {
        self.equal_weight_fallback
    }
}

/// Rescale base weights so the active indicators sum to 1.0.
///
/// Ids the registry does not know are ignored. A zero total (misconfigured
/// registry) falls back to equal weights rather than dividing by zero.
pub fn normalize(registry: &Registry, active: &ActiveSelection) -> EffectiveWeights {
    let included: Vec<_> = registry
        .definitions()
        .iter()
        .filter(|d| active.contains(d.id))
        .collect();

    let total: f64 = included.iter().map(|d| d.base_weight).sum();

    if total > 0.0 {
        EffectiveWeights {
            weights: included
                .iter()
                .map(|d| (d.id, d.base_weight / total))
                .collect(),
            equal_weight_fallback: false,
        }
    } else {
        let equal = if included.is_empty() {
            0.0
        } else {
            1.0 / included.len() as f64
        };
        EffectiveWeights {
            weights: included.iter().map(|d| (d.id, equal)).collect(),
            equal_weight_fallback: !included.is_empty(),
        }
    }
}
