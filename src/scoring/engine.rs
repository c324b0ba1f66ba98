use serde::Serialize;

use super::compose::{compose, BreakdownEntry};
use super::confidence::confidence;
use super::counterfactual::DEFAULT_DELTA;
use super::diagnostics::Diagnostic;
use super::explain::{explain, Explanation, DEFAULT_TOP_CONTRIBUTORS};
use super::registry::{IndicatorId, Registry};
use super::selection::ActiveSelection;
use super::weights::normalize;
use crate::location::LocationRecord;

/// Per-call knobs for `score_location`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOptions {
    pub include_explainability: bool,
    pub counterfactual_delta: f64,
    pub top_contributors: usize,
}

impl Default for ScoreOptions {
    fn default() -> Self {
        Self {
            include_explainability: true,
            counterfactual_delta: DEFAULT_DELTA,
            top_contributors: DEFAULT_TOP_CONTRIBUTORS,
        }
    }
}

impl ScoreOptions {
    /// Options for bulk scoring: no contributors, narratives or simulation.
    pub fn batch() -> Self {
        Self {
            include_explainability: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeResult {
    pub location: String,
    pub score: u8,
    /// Share of the registry selected, 0-100.
    pub confidence: f64,
    /// Share of active indicators that had a value, 0-100.
    pub data_completeness: f64,
    pub active_indicators: Vec<IndicatorId>,
    pub breakdown: Vec<BreakdownEntry>,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Explanation>,
}

impl CompositeResult {
    /// Some active indicator had no value.
    pub fn incomplete(&self) -> bool {
        self.data_completeness < 100.0
    }

    /// Score is 0 only because no active indicator had data.
    pub fn no_data(&self) -> bool {
        self.data_completeness == 0.0
    }
}

/// Score one location under one active selection.
pub fn score_location(
    registry: &Registry,
    location: &LocationRecord,
    active: &ActiveSelection,
    options: &ScoreOptions,
) -> CompositeResult {
    let mut diagnostics = Vec::new();

    let (active, substituted) = active.resolve(registry);
    if substituted {
        tracing::debug!(
            location = %location.name,
            default = %registry.default_indicator(),
            "empty selection, substituting default indicator"
        );
        diagnostics.push(Diagnostic::EmptySelection {
            substituted: registry.default_indicator(),
        });
    }

    let weights = normalize(registry, &active);
    if weights.used_equal_weight_fallback() {
        tracing::debug!(active = weights.len(), "zero base weight total, using equal weights");
        diagnostics.push(Diagnostic::EqualWeightFallback {
            active_count: weights.len(),
        });
    }

    let composition = compose(registry, location, &active, &weights);
    for diagnostic in &composition.diagnostics {
        tracing::debug!(location = %location.name, "{}", diagnostic);
    }
    diagnostics.extend(composition.diagnostics);

    let scored = composition.breakdown.iter().filter(|e| e.is_scored()).count();
    let data_completeness = if weights.is_empty() {
        0.0
    } else {
        scored as f64 / weights.len() as f64 * 100.0
    };

    let explanation = options.include_explainability.then(|| {
        explain(
            registry,
            location,
            &composition.breakdown,
            &active,
            composition.score,
            options.counterfactual_delta,
            options.top_contributors,
        )
    });

    CompositeResult {
        location: location.name.clone(),
        score: composition.score,
        confidence: confidence(active.len(), registry.len()),
        data_completeness,
        active_indicators: active.iter().collect(),
        breakdown: composition.breakdown,
        diagnostics,
        explanation,
    }
}

/// Score many locations with the same selection, order preserved, no explanation.
pub fn score_batch(
    registry: &Registry,
    locations: &[LocationRecord],
    active: &ActiveSelection,
) -> Vec<CompositeResult> {
    let options = ScoreOptions::batch();
    locations
        .iter()
        .map(|location| score_location(registry, location, active, &options))
        .collect()
}

/// Batch-score and order worst first; equal scores fall back to name order.
pub fn rank_locations(
    registry: &Registry,
    locations: &[LocationRecord],
    active: &ActiveSelection,
) -> Vec<CompositeResult> {
    let mut results = score_batch(registry, locations, active);
    results.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.location.cmp(&b.location))
    });
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{Direction, IndicatorDefinition};

    fn registry() -> &'static Registry {
        Registry::standard()
    }

    fn full_location(values: [f64; 5]) -> LocationRecord {
        LocationRecord::new("Grid")
            .with_value(IndicatorId::PovertyIndex, values[0])
            .with_value(IndicatorId::EducationAccess, values[1])
            .with_value(IndicatorId::HealthVulnerability, values[2])
            .with_value(IndicatorId::WaterAccess, values[3])
            .with_value(IndicatorId::EmploymentRate, values[4])
    }

    fn all_subsets() -> Vec<ActiveSelection> {
        let ids: Vec<IndicatorId> = registry().definitions().iter().map(|d| d.id).collect();
        (1u32..(1 << ids.len()))
            .map(|mask| {
                ids.iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, id)| *id)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_two_indicator_example() {
        let location = LocationRecord::new("Example")
            .with_value(IndicatorId::EducationAccess, 90.0)
            .with_value(IndicatorId::PovertyIndex, 10.0);
        let active =
            ActiveSelection::new([IndicatorId::EducationAccess, IndicatorId::PovertyIndex]);
        let result = score_location(registry(), &location, &active, &ScoreOptions::default());
        assert_eq!(result.score, 10);
        assert_eq!(result.confidence, 40.0);
        assert_eq!(result.data_completeness, 100.0);
    }

    #[test]
    fn test_single_active_example() {
        let location = LocationRecord::new("Example")
            .with_value(IndicatorId::EducationAccess, 90.0)
            .with_value(IndicatorId::PovertyIndex, 10.0);
        let active = ActiveSelection::new([IndicatorId::EducationAccess]);
        let result = score_location(registry(), &location, &active, &ScoreOptions::default());
        assert_eq!(result.score, 10);
    }

    #[test]
    fn test_health_only_example() {
        let location =
            LocationRecord::new("Example").with_value(IndicatorId::HealthVulnerability, 85.0);
        let active = ActiveSelection::new([IndicatorId::HealthVulnerability]);
        let result = score_location(registry(), &location, &active, &ScoreOptions::default());
        assert_eq!(result.score, 85);
        assert_eq!(result.confidence, 20.0);
    }

    #[test]
    fn test_empty_selection_uses_default() {
        let location = LocationRecord::new("Fallback")
            .with_value(IndicatorId::PovertyIndex, 42.0)
            .with_value(IndicatorId::WaterAccess, 10.0);
        let result = score_location(
            registry(),
            &location,
            &ActiveSelection::default(),
            &ScoreOptions::batch(),
        );
        assert_eq!(result.score, 42);
        assert_eq!(result.active_indicators, vec![IndicatorId::PovertyIndex]);
        assert_eq!(result.confidence, 20.0);
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::EmptySelection {
                substituted: IndicatorId::PovertyIndex
            }]
        );
    }

    #[test]
    fn test_all_missing_reports_no_data() {
        let location = LocationRecord::new("Void").with_value(IndicatorId::PovertyIndex, 42.0);
        let active = ActiveSelection::new([IndicatorId::WaterAccess, IndicatorId::EmploymentRate]);
        let result = score_location(registry(), &location, &active, &ScoreOptions::default());

        assert_eq!(result.score, 0);
        assert_eq!(result.confidence, 40.0);
        assert!(result.no_data());
        assert!(result.incomplete());
        assert_eq!(result.diagnostics.len(), 2);
        let explanation = result.explanation.unwrap();
        assert!(explanation.contributors.is_empty());
        assert!(explanation.narratives.is_empty());
    }

    #[test]
    fn test_partial_data_completeness() {
        let location = LocationRecord::new("Half")
            .with_value(IndicatorId::PovertyIndex, 50.0)
            .with_value(IndicatorId::EducationAccess, 50.0);
        let active = ActiveSelection::new([
            IndicatorId::PovertyIndex,
            IndicatorId::EducationAccess,
            IndicatorId::WaterAccess,
            IndicatorId::EmploymentRate,
        ]);
        let result = score_location(registry(), &location, &active, &ScoreOptions::batch());
        assert_eq!(result.data_completeness, 50.0);
        assert!(result.incomplete());
        assert!(!result.no_data());
    }

    #[test]
    fn test_batch_options_skip_explanation() {
        let location = full_location([50.0; 5]);
        let active = ActiveSelection::all(registry());
        let result = score_location(registry(), &location, &active, &ScoreOptions::batch());
        assert!(result.explanation.is_none());
    }

    #[test]
    fn test_score_bounds_over_grid() {
        let grid = [0.0, 13.7, 50.0, 86.2, 100.0];
        for active in all_subsets() {
            for &a in &grid {
                for &b in &grid {
                    let location = full_location([a, b, 100.0 - a, b, a]);
                    let result =
                        score_location(registry(), &location, &active, &ScoreOptions::batch());
                    assert!(result.score <= 100);
                }
            }
        }
    }

    #[test]
    fn test_single_indicator_correctness() {
        let values = [0.0, 0.4, 12.5, 33.3, 49.5, 50.5, 77.7, 99.9, 100.0];
        for def in registry().definitions() {
            let active = ActiveSelection::new([def.id]);
            for &v in &values {
                let location = LocationRecord::new("Single").with_value(def.id, v);
                let result =
                    score_location(registry(), &location, &active, &ScoreOptions::batch());
                assert_eq!(
                    result.score,
                    def.direction.adjust(v).round() as u8,
                    "{} = {}",
                    def.id,
                    v
                );
            }
        }
    }

    #[test]
    fn test_directionality() {
        let base = [40.0, 40.0, 40.0, 40.0, 40.0];
        for active in all_subsets() {
            for (i, def) in registry().definitions().iter().enumerate() {
                let mut raised = base;
                raised[i] += 25.0;
                let before =
                    score_location(registry(), &full_location(base), &active, &ScoreOptions::batch())
                        .score;
                let after = score_location(
                    registry(),
                    &full_location(raised),
                    &active,
                    &ScoreOptions::batch(),
                )
                .score;
                match def.direction {
                    crate::scoring::Direction::Direct => assert!(after >= before),
                    crate::scoring::Direction::Inverted => assert!(after <= before),
                }
            }
        }
    }

    #[test]
    fn test_confidence_monotonic_across_subsets() {
        let location = full_location([30.0; 5]);
        let mut last = 0.0;
        let ids: Vec<IndicatorId> = registry().definitions().iter().map(|d| d.id).collect();
        for n in 1..=ids.len() {
            let active = ActiveSelection::new(ids[..n].iter().copied());
            let result = score_location(registry(), &location, &active, &ScoreOptions::batch());
            assert!(result.confidence >= last);
            last = result.confidence;
        }
        assert_eq!(last, 100.0);
    }

    #[test]
    fn test_idempotent_output() {
        let location = full_location([63.0, 27.5, 48.0, 71.0, 39.0]);
        let active = ActiveSelection::new([
            IndicatorId::PovertyIndex,
            IndicatorId::EducationAccess,
            IndicatorId::WaterAccess,
        ]);
        let first = score_location(registry(), &location, &active, &ScoreOptions::default());
        let second = score_location(registry(), &location, &active, &ScoreOptions::default());
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_counterfactual_consistency_over_subsets() {
        let location = full_location([63.0, 27.5, 48.0, 96.0, 4.0]);
        for active in all_subsets() {
            let result = score_location(registry(), &location, &active, &ScoreOptions::default());
            let summary = result.explanation.unwrap().counterfactuals;
            if let Some(action) = summary.priority_action {
                assert!(action.resulting_score <= result.score);
            }
            if let Some(risk) = summary.risk_alert {
                assert!(risk.resulting_score >= result.score);
            }
        }
    }

    #[test]
    fn test_batch_preserves_order_and_selection() {
        let locations = vec![
            LocationRecord::new("First").with_value(IndicatorId::PovertyIndex, 80.0),
            LocationRecord::new("Second").with_value(IndicatorId::PovertyIndex, 20.0),
            LocationRecord::new("Third").with_value(IndicatorId::WaterAccess, 60.0),
        ];
        let active = ActiveSelection::new([IndicatorId::PovertyIndex]);
        let results = score_batch(registry(), &locations, &active);

        let names: Vec<_> = results.iter().map(|r| r.location.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
        assert_eq!(results[0].score, 80);
        assert_eq!(results[1].score, 20);
        assert_eq!(results[2].score, 0);
        assert!(results.iter().all(|r| r.explanation.is_none()));
        assert!(results
            .iter()
            .all(|r| r.active_indicators == vec![IndicatorId::PovertyIndex]));
    }

    #[test]
    fn test_rank_worst_first_then_name() {
        let locations = vec![
            LocationRecord::new("Mombasa").with_value(IndicatorId::PovertyIndex, 52.0),
            LocationRecord::new("Kisumu").with_value(IndicatorId::PovertyIndex, 68.0),
            LocationRecord::new("Embu").with_value(IndicatorId::PovertyIndex, 52.0),
        ];
        let active = ActiveSelection::new([IndicatorId::PovertyIndex]);
        let ranked = rank_locations(registry(), &locations, &active);
        let names: Vec<_> = ranked.iter().map(|r| r.location.as_str()).collect();
        assert_eq!(names, vec!["Kisumu", "Embu", "Mombasa"]);
    }

    static ZERO_WEIGHTS: [IndicatorDefinition; 3] = [
        IndicatorDefinition {
            id: IndicatorId::PovertyIndex,
            label: "Poverty Index",
            base_weight: 0.0,
            direction: Direction::Direct,
        },
        IndicatorDefinition {
            id: IndicatorId::EducationAccess,
            label: "Education Access",
            base_weight: 0.0,
            direction: Direction::Inverted,
        },
        IndicatorDefinition {
            id: IndicatorId::WaterAccess,
            label: "Water Access",
            base_weight: 0.0,
            direction: Direction::Inverted,
        },
    ];

    #[test]
    fn test_zero_weight_registry_scores_plain_mean() {
        let registry = Registry::new(&ZERO_WEIGHTS, IndicatorId::PovertyIndex);
        let location = LocationRecord::new("Flat")
            .with_value(IndicatorId::PovertyIndex, 60.0)
            .with_value(IndicatorId::EducationAccess, 30.0)
            .with_value(IndicatorId::WaterAccess, 80.0);
        let active = ActiveSelection::all(&registry);
        let result = score_location(&registry, &location, &active, &ScoreOptions::default());

        // Adjusted values 60, 70, 20 -> mean 50
        assert_eq!(result.score, 50);
        assert!(result
            .diagnostics
            .contains(&Diagnostic::EqualWeightFallback { active_count: 3 }));
        assert_eq!(result.confidence, 100.0);
        for entry in &result.breakdown {
            assert!((entry.weight - 1.0 / 3.0).abs() < 1e-12);
        }
    }
}
