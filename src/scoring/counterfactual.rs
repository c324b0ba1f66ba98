use serde::Serialize;

use super::compose::compose;
use super::registry::{IndicatorId, Registry};
use super::selection::ActiveSelection;
use super::weights::normalize;
use crate::location::LocationRecord;

/// Nominal perturbation applied to each indicator, in raw points.
pub const DEFAULT_DELTA: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScenarioDirection {
    /// Moves the poverty-oriented value down.
    Improve,
    /// Moves the poverty-oriented value up.
    Degrade,
}

/// One "what if this indicator moved" recomputation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterfactualScenario {
    pub indicator: IndicatorId,
    pub direction: ScenarioDirection,
    /// `target_value - baseline_value`; shorter than nominal near the bounds.
    pub delta: f64,
    pub baseline_value: f64,
    pub target_value: f64,
    pub resulting_score: u8,
}

impl CounterfactualScenario {
    /// Points of score moved in the scenario's intended direction.
    /// Positive means improvement lowered the score / degradation raised it.
    pub fn impact(&self, base_score: u8) -> i32 {
        match self.direction {
            ScenarioDirection::Improve => base_score as i32 - self.resulting_score as i32,
            ScenarioDirection::Degrade => self.resulting_score as i32 - base_score as i32,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CounterfactualSummary {
    /// Improvement with the largest score reduction.
    pub priority_action: Option<CounterfactualScenario>,
    /// Degradation with the largest score increase.
    pub risk_alert: Option<CounterfactualScenario>,
    /// Every evaluated scenario, registry order, improve before degrade.
    pub scenarios: Vec<CounterfactualScenario>,
}

/// Perturb each active indicator by `delta` both ways and rescore a copy.
///
/// Each scenario changes exactly one indicator on a fresh clone of the
/// location and recomputes the full score.
pub fn simulate(
    registry: &Registry,
    location: &LocationRecord,
    active: &ActiveSelection,
    base_score: u8,
    delta: f64,
) -> CounterfactualSummary {
    let mut scenarios = Vec::with_capacity(active.len() * 2);

    for def in registry.definitions() {
        if !active.contains(def.id) {
            continue;
        }
        let Some(baseline) = location.value(def.id) else {
            continue;
        };

        let improving = def.direction.improving_sign() * delta;
        for (direction, signed) in [
            (ScenarioDirection::Improve, improving),
            (ScenarioDirection::Degrade, -improving),
        ] {
            let target = (baseline + signed).clamp(0.0, 100.0);
            let mut perturbed = location.clone();
            perturbed.set_value(def.id, target);

            let weights = normalize(registry, active);
            let resulting_score = compose(registry, &perturbed, active, &weights).score;

            scenarios.push(CounterfactualScenario {
                indicator: def.id,
                direction,
                delta: target - baseline,
                baseline_value: baseline,
                target_value: target,
                resulting_score,
            });
        }
    }

    let priority_action = strongest(&scenarios, ScenarioDirection::Improve, base_score);
    let risk_alert = strongest(&scenarios, ScenarioDirection::Degrade, base_score);

    CounterfactualSummary {
        priority_action,
        risk_alert,
        scenarios,
    }
}

/// Highest positive impact in one direction; earliest wins on ties.
fn strongest(
    scenarios: &[CounterfactualScenario],
    direction: ScenarioDirection,
    base_score: u8,
) -> Option<CounterfactualScenario> {
    let mut best: Option<&CounterfactualScenario> = None;
    for scenario in scenarios.iter().filter(|s| s.direction == direction) {
        let impact = scenario.impact(base_score);
        if impact <= 0 {
            continue;
        }
        match best {
            Some(current) if current.impact(base_score) >= impact => {}
            _ => best = Some(scenario),
        }
    }
    best.cloned()
}
