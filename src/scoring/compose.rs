use serde::Serialize;

use super::diagnostics::Diagnostic;
use super::registry::{IndicatorId, Registry};
use super::selection::ActiveSelection;
use super::weights::EffectiveWeights;
use crate::location::LocationRecord;

/// Per-indicator line of a score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    pub indicator: IndicatorId,
    /// Raw reading, `None` when the location has no value.
    pub value: Option<f64>,
    /// Poverty-oriented value (higher = worse).
    pub adjusted_value: Option<f64>,
    pub weight: f64,
    pub contribution: f64,
    pub active: bool,
}

impl BreakdownEntry {
    /// Active and backed by data, i.e. counted in the weighted sum.
    pub fn is_scored(&self) -> bool {
        self.active && self.adjusted_value.is_some()
    }
}

/// Score plus breakdown before confidence and explanation are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub score: u8,
    pub breakdown: Vec<BreakdownEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Direction-aware weighted average over the active indicators that have data.
///
/// Every registry indicator with a value gets a breakdown line (weight 0 when
/// inactive). Active indicators without a value get a line with no adjusted
/// value and are left out of both numerator and denominator.
pub fn compose(
    registry: &Registry,
    location: &LocationRecord,
    active: &ActiveSelection,
    weights: &EffectiveWeights,
) -> Composition {
    let mut breakdown = Vec::with_capacity(registry.len());
    let mut diagnostics = Vec::new();
    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;

    for def in registry.definitions() {
        let is_active = active.contains(def.id);
        let weight = if is_active { weights.get(def.id) } else { 0.0 };

        match location.value(def.id) {
            Some(value) => {
                let adjusted = def.direction.adjust(value);
                let contribution = weight * adjusted;
                if is_active {
                    weighted_sum += contribution;
                    weight_sum += weight;
                }
                breakdown.push(BreakdownEntry {
                    indicator: def.id,
                    value: Some(value),
                    adjusted_value: Some(adjusted),
                    weight,
                    contribution,
                    active: is_active,
                });
            }
            None if is_active => {
                diagnostics.push(Diagnostic::MissingValue {
                    indicator: def.id,
                    location: location.name.clone(),
                });
                breakdown.push(BreakdownEntry {
                    indicator: def.id,
                    value: None,
                    adjusted_value: None,
                    weight,
                    contribution: 0.0,
                    active: true,
                });
            }
            None => {}
        }
    }

    let score = if weight_sum > 0.0 {
        let raw = weighted_sum / weight_sum;
        debug_assert!(
            (-1e-9..=100.0 + 1e-9).contains(&raw),
            "composite {} escaped [0,100]",
            raw
        );
        raw.round().clamp(0.0, 100.0) as u8
    } else {
        0
    };

    Composition {
        score,
        breakdown,
        diagnostics,
    }
}
