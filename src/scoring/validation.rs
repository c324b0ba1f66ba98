use std::collections::BTreeSet;

use super::config::ScoringConfig;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    // Duplicate ids would silently collapse in the selection set
    if let Some(ref active) = config.active {
        let mut seen = BTreeSet::new();
        for (i, id) in active.iter().enumerate() {
            if !seen.insert(*id) {
                errors.push(format!("scoring.active[{}]: '{}' listed more than once", i, id));
            }
        }
    }

    if let Some(delta) = config.counterfactual_delta {
        if !delta.is_finite() || delta <= 0.0 || delta > 100.0 {
            errors.push(format!(
                "scoring.counterfactual_delta: must be in (0, 100], got {}",
                delta
            ));
        }
    }

    if let Some(top) = config.top_contributors {
        if top == 0 {
            errors.push("scoring.top_contributors: must be at least 1".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
