//! Input manifest handed over by source discovery

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use strata_core::SourceUnit;

/// Every discovered source unit plus the optional analyzed subset.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Paths whose edges count; every unit is analyzed when absent.
    #[serde(default)]
    pub analyzed_file_paths: Option<BTreeSet<String>>,
    pub units: Vec<SourceUnit>,
}

impl Manifest {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        let manifest: Manifest = serde_json::from_str(&contents)
            .with_context(|| format!("invalid manifest {}", path.display()))?;
        tracing::info!("Loaded {} source units from {}", manifest.units.len(), path.display());
        Ok(manifest)
    }
}
