use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::registry::{IndicatorId, Registry};

/// The indicators a caller wants scored for one request.
///
/// Passed by reference into every scoring call and never cached, so a change
/// of selection between calls can't leave stale state behind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveSelection {
    ids: BTreeSet<IndicatorId>,
}

impl ActiveSelection {
    pub fn new<I: IntoIterator<Item = IndicatorId>>(ids: I) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Every indicator in the registry.
    pub fn all(registry: &Registry) -> Self {
        Self::new(registry.definitions().iter().map(|d| d.id))
    }

    /// Parse a comma-separated list such as `"poverty_index,water_access"`.
    /// Repeated ids are rejected so typos in configs surface early.
    pub fn parse_list(s: &str) -> Result<Self> {
        let mut ids = BTreeSet::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let id: IndicatorId = part.parse()?;
            if !ids.insert(id) {
                bail!("Indicator listed twice: {}", id);
            }
        }
        Ok(Self { ids })
    }

    pub fn contains(&self, id: IndicatorId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in registry order.
    pub fn iter(&self) -> impl Iterator<Item = IndicatorId> + '_ {
        self.ids.iter().copied()
    }

    /// Apply the empty-selection fallback: an empty selection becomes the
    /// registry's default indicator. The flag reports whether that happened.
    pub fn resolve(&self, registry: &Registry) -> (ActiveSelection, bool) {
        if self.ids.is_empty() {
            (Self::new([registry.default_indicator()]), true)
        } else {
            (self.clone(), false)
        }
    }
}

impl FromIterator<IndicatorId> for ActiveSelection {
    fn from_iter<T: IntoIterator<Item = IndicatorId>>(iter: T) -> Self {
        Self::new(iter)
    }
}
