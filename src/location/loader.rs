use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::types::LocationRecord;

/// Check every indicator value is finite and within [0,100].
pub fn validate_location(location: &LocationRecord) -> Result<()> {
    for (id, value) in &location.indicators {
        if !value.is_finite() || !(0.0..=100.0).contains(value) {
            bail!(
                "Location '{}': {} = {} is outside [0, 100]",
                location.name,
                id,
                value
            );
        }
    }
    Ok(())
}

/// Load and range-check all location records in a JSON file.
pub fn load_locations(path: &Path) -> Result<Vec<LocationRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open location file at {}", path.display()))?;

    let raw: serde_json::Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse location file {}", path.display()))?;

    // A file holds either one record or an array of them
    let locations = if raw.is_array() {
        serde_json::from_value::<Vec<LocationRecord>>(raw)
    } else {
        serde_json::from_value::<LocationRecord>(raw).map(|loc| vec![loc])
    }
    .with_context(|| format!("Invalid location record in {}", path.display()))?;

    for location in &locations {
        validate_location(location).with_context(|| format!("Invalid data in {}", path.display()))?;
    }

    tracing::debug!(path = %path.display(), count = locations.len(), "loaded locations");
    Ok(locations)
}

/// Expand plain paths and glob patterns, preserving argument order.
/// Matches within one pattern are sorted; a pattern that matches nothing is an error.
pub fn expand_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.contains(['*', '?', '[']) {
            let mut matched: Vec<PathBuf> = glob::glob(input)
                .with_context(|| format!("Invalid glob pattern '{}'", input))?
                .collect::<std::result::Result<_, _>>()
                .with_context(|| format!("Failed to read matches for '{}'", input))?;
            if matched.is_empty() {
                bail!("No files match '{}'", input);
            }
            matched.sort();
            paths.extend(matched);
        } else {
            paths.push(PathBuf::from(input));
        }
    }
    Ok(paths)
}

/// Load every record from every input, in order.
pub fn load_many(inputs: &[String]) -> Result<Vec<LocationRecord>> {
    let mut all = Vec::new();
    for path in expand_inputs(inputs)? {
        all.extend(load_locations(&path)?);
    }
    Ok(all)
}
