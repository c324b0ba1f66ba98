use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of socioeconomic indicators. Variant order is registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorId {
    PovertyIndex,
    EducationAccess,
    HealthVulnerability,
    WaterAccess,
    EmploymentRate,
}

impl IndicatorId {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorId::PovertyIndex => "poverty_index",
            IndicatorId::EducationAccess => "education_access",
            IndicatorId::HealthVulnerability => "health_vulnerability",
            IndicatorId::WaterAccess => "water_access",
            IndicatorId::EmploymentRate => "employment_rate",
        }
    }
}

impl fmt::Display for IndicatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndicatorId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "poverty_index" => Ok(IndicatorId::PovertyIndex),
            "education_access" => Ok(IndicatorId::EducationAccess),
            "health_vulnerability" => Ok(IndicatorId::HealthVulnerability),
            "water_access" => Ok(IndicatorId::WaterAccess),
            "employment_rate" => Ok(IndicatorId::EmploymentRate),
            other => bail!("Unknown indicator: {}", other),
        }
    }
}

/// Whether a raw value already measures poverty (`Direct`) or measures
/// access/quality and must be flipped onto the poverty scale (`Inverted`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Direct,
    Inverted,
}

impl Direction {
    /// Map a raw value in [0,100] to the poverty-oriented scale (higher = worse).
    pub fn adjust(&self, raw: f64) -> f64 {
        match self {
            Direction::Direct => raw,
            Direction::Inverted => 100.0 - raw,
        }
    }

    /// Sign of a raw-value change that lowers the adjusted value.
    pub fn improving_sign(&self) -> f64 {
        match self {
            Direction::Direct => -1.0,
            Direction::Inverted => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorDefinition {
    pub id: IndicatorId,
    pub label: &'static str,
    pub base_weight: f64,
    pub direction: Direction,
}

static STANDARD_DEFINITIONS: [IndicatorDefinition; 5] = [
    IndicatorDefinition {
        id: IndicatorId::PovertyIndex,
        label: "Poverty Index",
        base_weight: 0.25,
        direction: Direction::Direct,
    },
    IndicatorDefinition {
        id: IndicatorId::EducationAccess,
        label: "Education Access",
        base_weight: 0.25,
        direction: Direction::Inverted,
    },
    IndicatorDefinition {
        id: IndicatorId::HealthVulnerability,
        label: "Health Vulnerability",
        base_weight: 0.20,
        direction: Direction::Direct,
    },
    IndicatorDefinition {
        id: IndicatorId::WaterAccess,
        label: "Water Access",
        base_weight: 0.15,
        direction: Direction::Inverted,
    },
    IndicatorDefinition {
        id: IndicatorId::EmploymentRate,
        label: "Employment Rate",
        base_weight: 0.15,
        direction: Direction::Inverted,
    },
];

static STANDARD: Registry = Registry::new(&STANDARD_DEFINITIONS, IndicatorId::PovertyIndex);

/// Read-only indicator table. Never mutated after construction.
#[derive(Debug, Clone, Copy)]
pub struct Registry {
    definitions: &'static [IndicatorDefinition],
    default_indicator: IndicatorId,
}

impl Registry {
    pub const fn new(
        definitions: &'static [IndicatorDefinition],
        default_indicator: IndicatorId,
    ) -> Self {
        Self {
            definitions,
            default_indicator,
        }
    }

    /// The process-wide standard registry.
    pub fn standard() -> &'static Registry {
        &STANDARD
    }

    /// Definitions in registry order.
    pub fn definitions(&self) -> &'static [IndicatorDefinition] {
        self.definitions
    }

    pub fn get(&self, id: IndicatorId) -> Option<&'static IndicatorDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    pub fn contains(&self, id: IndicatorId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Indicator substituted when a caller passes an empty selection.
    pub fn default_indicator(&self) -> IndicatorId {
        self.default_indicator
    }

    /// Human label for an indicator, falling back to its id.
    pub fn label(&self, id: IndicatorId) -> &'static str {
        self.get(id).map(|d| d.label).unwrap_or_else(|| id.as_str())
    }

    /// Position in registry order, used for tie-breaking.
    pub fn position(&self, id: IndicatorId) -> usize {
        self.definitions
            .iter()
            .position(|d| d.id == id)
            .unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_has_five_indicators() {
        let registry = Registry::standard();
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.default_indicator(), IndicatorId::PovertyIndex);
    }

    #[test]
    fn test_standard_weights_positive() {
        for def in Registry::standard().definitions() {
            assert!(def.base_weight > 0.0, "{} has non-positive weight", def.id);
        }
    }

    #[test]
    fn test_registry_order_matches_enum_order() {
        let ids: Vec<IndicatorId> = Registry::standard()
            .definitions()
            .iter()
            .map(|d| d.id)
            .collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_direction_adjust() {
        assert_eq!(Direction::Direct.adjust(85.0), 85.0);
        assert_eq!(Direction::Inverted.adjust(90.0), 10.0);
    }

    #[test]
    fn test_parse_indicator_id() {
        assert_eq!(
            "education_access".parse::<IndicatorId>().unwrap(),
            IndicatorId::EducationAccess
        );
        assert_eq!(
            " Water_Access ".parse::<IndicatorId>().unwrap(),
            IndicatorId::WaterAccess
        );
        assert!("literacy".parse::<IndicatorId>().is_err());
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for def in Registry::standard().definitions() {
            assert_eq!(def.id.to_string().parse::<IndicatorId>().unwrap(), def.id);
        }
    }

    #[test]
    fn test_position_and_label() {
        let registry = Registry::standard();
        assert_eq!(registry.position(IndicatorId::PovertyIndex), 0);
        assert_eq!(registry.position(IndicatorId::EmploymentRate), 4);
        assert_eq!(registry.label(IndicatorId::WaterAccess), "Water Access");
    }

    #[test]
    fn test_serde_uses_snake_case_ids() {
        let json = serde_json::to_string(&IndicatorId::HealthVulnerability).unwrap();
        assert_eq!(json, "\"health_vulnerability\"");
    }
}
