use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::scoring::IndicatorId;

/// One geographic unit with its indicator readings.
///
/// An indicator missing from `indicators` is "cannot be scored", never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ward: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,
    #[serde(default)]
    pub indicators: BTreeMap<IndicatorId, f64>,
}

impl LocationRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            county: None,
            ward: None,
            latitude: None,
            longitude: None,
            population: None,
            indicators: BTreeMap::new(),
        }
    }

    /// Builder-style setter used by tests and demos
    pub fn with_value(mut self, id: IndicatorId, value: f64) -> Self {
        self.indicators.insert(id, value);
        self
    }

    pub fn value(&self, id: IndicatorId) -> Option<f64> {
        self.indicators.get(&id).copied()
    }

    pub fn set_value(&mut self, id: IndicatorId, value: f64) {
        self.indicators.insert(id, value);
    }
}
