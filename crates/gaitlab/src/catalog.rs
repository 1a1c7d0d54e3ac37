//! Named leg architectures and optimized overrides.

use std::collections::BTreeMap;

use gaitlab_leg::{LegGeometry, LegOverride, LegParams, Topology};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AnalysisError, Result};

/// Catalog key of a topology's built-in preset.
pub fn preset_name(topology: Topology) -> &'static str {
    match topology {
        Topology::Serial => "serial",
        Topology::Pantograph => "pantograph",
        Topology::FiveBarFront => "five_bar_front",
        Topology::FiveBarRear => "five_bar_rear",
    }
}

/// Overrides keyed by architecture name, as an optimizer writes them.
pub type Overrides = BTreeMap<String, LegOverride>;

/// Mapping from architecture name to its parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegCatalog {
    legs: BTreeMap<String, LegParams>,
}

impl LegCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The four built-in architectures.
    pub fn presets() -> Self {
        let legs = Topology::ALL
            .into_iter()
            .map(|t| (preset_name(t).to_string(), LegParams::preset(t)))
            .collect();
        Self { legs }
    }

    /// Parse a catalog from JSON (an object keyed by architecture name).
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse an override document.
    pub fn overrides_from_json(json: &str) -> Result<Overrides> {
        Ok(serde_json::from_str(json)?)
    }

    /// Architecture names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.legs.keys().map(String::as_str)
    }

    /// Number of architectures.
    pub fn len(&self) -> usize {
        self.legs.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Parameters of one architecture.
    pub fn get(&self, name: &str) -> Option<&LegParams> {
        self.legs.get(name)
    }

    /// Add or replace an architecture.
    pub fn insert(&mut self, name: impl Into<String>, params: LegParams) {
        self.legs.insert(name.into(), params);
    }

    /// Merge an override document into the catalog.
    ///
    /// Entries for unknown architectures are skipped with a warning.
    /// Returns how many entries were applied. Merged parameters are not
    /// validated here; [`LegCatalog::geometry`] does that.
    pub fn apply_overrides(&mut self, overrides: &Overrides) -> usize {
        let mut applied = 0;
        for (name, over) in overrides {
            match self.legs.get_mut(name) {
                Some(params) => {
                    *params = params.with_override(over);
                    applied += 1;
                }
                None => warn!(name = %name, "Override for unknown architecture ignored"),
            }
        }
        info!(applied, total = overrides.len(), "Applied leg overrides");
        applied
    }

    /// Validated geometry of one architecture.
    pub fn geometry(&self, name: &str) -> Result<LegGeometry> {
        let params = self
            .get(name)
            .ok_or_else(|| AnalysisError::UnknownArchitecture(name.to_string()))?;
        Ok(LegGeometry::from_params(params)?)
    }
}
