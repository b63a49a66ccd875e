use std::path::Path;

use serde_json::Value as JsonValue;

use super::model::Region;
use crate::error::{DataError, Result};

// ---------------------------------------------------------------------------
// CountyMap – state → counties reference data
// ---------------------------------------------------------------------------

/// Ordered `state → [county]` mapping that populates the selectors.
///
/// Key order follows the source JSON object (serde_json is built with
/// `preserve_order`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountyMap {
    states: Vec<(String, Vec<String>)>,
}

impl CountyMap {
    /// Load the mapping from a JSON file:
    ///
    /// ```json
    /// { "Alabama": ["Autauga", "Baldwin", ...], "Alaska": [...], ... }
    /// ```
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
        Self::from_json(&text)
    }

    /// Parse the mapping from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let root: JsonValue = serde_json::from_str(text)?;
        let obj = root
            .as_object()
            .ok_or_else(|| DataError::BadReference("top level is not an object".into()))?;

        let mut states = Vec::with_capacity(obj.len());
        for (state, counties) in obj {
            let arr = counties.as_array().ok_or_else(|| {
                DataError::BadReference(format!("value for '{state}' is not an array"))
            })?;
            let counties = arr
                .iter()
                .map(|c| {
                    c.as_str().map(str::to_string).ok_or_else(|| {
                        DataError::BadReference(format!("county under '{state}' is not a string"))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            states.push((state.clone(), counties));
        }

        Ok(CountyMap { states })
    }

    /// State names in file order.
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(|(s, _)| s.as_str())
    }

    /// Counties of `state` in file order; empty for an unknown state.
    pub fn counties(&self, state: &str) -> &[String] {
        self.states
            .iter()
            .find(|(s, _)| s == state)
            .map(|(_, c)| c.as_slice())
            .unwrap_or(&[])
    }

    /// Position of `state` in file order.
    pub fn state_index(&self, state: &str) -> Option<usize> {
        self.states.iter().position(|(s, _)| s == state)
    }

    /// Whether `region` is a known (state, county) pair.
    pub fn contains(&self, region: &Region) -> bool {
        self.counties(&region.state).contains(&region.county)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
