use serde::Serialize;

use super::compose::BreakdownEntry;
use super::counterfactual::{simulate, CounterfactualSummary};
use super::registry::{IndicatorId, Registry};
use super::selection::ActiveSelection;
use crate::location::LocationRecord;

/// Default cap on the contributor list.
pub const DEFAULT_TOP_CONTRIBUTORS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contributor {
    pub indicator: IndicatorId,
    /// Fraction (0-1) of the total weighted contribution.
    pub share: f64,
    pub contribution: f64,
    pub adjusted_value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Explanation {
    pub contributors: Vec<Contributor>,
    pub narratives: Vec<String>,
    pub counterfactuals: CounterfactualSummary,
}

/// Sentence templates, evaluated in declaration order. A rule whose
/// condition does not hold contributes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrativeRule {
    TopContributor,
    InactiveIndicators,
    PriorityAction,
    RiskAlert,
}

pub const NARRATIVE_RULES: [NarrativeRule; 4] = [
    NarrativeRule::TopContributor,
    NarrativeRule::InactiveIndicators,
    NarrativeRule::PriorityAction,
    NarrativeRule::RiskAlert,
];

/// Everything the narrative rules read from.
pub struct NarrativeContext<'a> {
    pub registry: &'a Registry,
    pub active: &'a ActiveSelection,
    pub contributors: &'a [Contributor],
    pub counterfactuals: &'a CounterfactualSummary,
    pub base_score: u8,
}

impl NarrativeRule {
    pub fn render(&self, ctx: &NarrativeContext<'_>) -> Option<String> {
        match self {
            NarrativeRule::TopContributor => {
                let top = ctx.contributors.first()?;
                Some(format!(
                    "{} is the largest driver of this score, accounting for {:.1}% of the weighted total.",
                    ctx.registry.label(top.indicator),
                    top.share * 100.0
                ))
            }
            NarrativeRule::InactiveIndicators => {
                let inactive: Vec<&str> = ctx
                    .registry
                    .definitions()
                    .iter()
                    .filter(|d| !ctx.active.contains(d.id))
                    .map(|d| d.label)
                    .collect();
                if inactive.is_empty() {
                    return None;
                }
                Some(format!(
                    "Not included in this score: {}.",
                    inactive.join(", ")
                ))
            }
            NarrativeRule::PriorityAction => {
                let action = ctx.counterfactuals.priority_action.as_ref()?;
                let impact = action.impact(ctx.base_score);
                if impact <= 0 {
                    return None;
                }
                Some(format!(
                    "Priority action: improving {} by {} points would lower the score from {} to {} (-{}).",
                    ctx.registry.label(action.indicator),
                    format_points(action.delta),
                    ctx.base_score,
                    action.resulting_score,
                    impact
                ))
            }
            NarrativeRule::RiskAlert => {
                let risk = ctx.counterfactuals.risk_alert.as_ref()?;
                let impact = risk.impact(ctx.base_score);
                if impact <= 0 {
                    return None;
                }
                Some(format!(
                    "Risk alert: a {}-point decline in {} would raise the score from {} to {} (+{}).",
                    format_points(risk.delta),
                    ctx.registry.label(risk.indicator),
                    ctx.base_score,
                    risk.resulting_score,
                    impact
                ))
            }
        }
    }
}

/// Absolute point change, without a trailing ".0".
fn format_points(delta: f64) -> String {
    let magnitude = delta.abs();
    if magnitude.fract() == 0.0 {
        format!("{:.0}", magnitude)
    } else {
        format!("{:.1}", magnitude)
    }
}

/// Rank active scored indicators by contribution, narrate, and simulate.
///
/// With nothing active and scored there is nothing to explain: the result is
/// empty and both counterfactual slots are `None`.
pub fn explain(
    registry: &Registry,
    location: &LocationRecord,
    breakdown: &[BreakdownEntry],
    active: &ActiveSelection,
    base_score: u8,
    delta: f64,
    top_n: usize,
) -> Explanation {
    let mut scored: Vec<&BreakdownEntry> = breakdown.iter().filter(|e| e.is_scored()).collect();
    if scored.is_empty() {
        return Explanation::default();
    }

    let total: f64 = scored.iter().map(|e| e.contribution).sum();

    // Stable sort keeps registry order among equal contributions
    scored.sort_by(|a, b| {
        b.contribution
            .partial_cmp(&a.contribution)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let contributors: Vec<Contributor> = scored
        .iter()
        .take(top_n)
        .map(|e| Contributor {
            indicator: e.indicator,
            share: if total > 0.0 { e.contribution / total } else { 0.0 },
            contribution: e.contribution,
            adjusted_value: e.adjusted_value.unwrap_or_default(),
        })
        .collect();

    let counterfactuals = simulate(registry, location, active, base_score, delta);

    let ctx = NarrativeContext {
        registry,
        active,
        contributors: &contributors,
        counterfactuals: &counterfactuals,
        base_score,
    };
    let narratives = NARRATIVE_RULES
        .iter()
        .filter_map(|rule| rule.render(&ctx))
        .collect();

    Explanation {
        contributors,
        narratives,
        counterfactuals,
    }
}
