//! CLI command implementations

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use strata_core::{analyze_with_layout, build_visualization};
use strata_resolver::{Resolver, StrataConfig};

use crate::manifest::Manifest;

/// A project root together with its loaded configuration.
///
/// Manifest and output paths come from the user and stay relative to the
/// working directory; only configuration is looked up under the root.
pub struct Project {
    root: PathBuf,
    config: StrataConfig,
}

impl Project {
    /// Load `config`, or `strata.toml` from `root` when none is given.
    pub fn open(root: &Path, config: Option<&Path>) -> anyhow::Result<Self> {
        let config = match config {
            Some(path) => StrataConfig::load(path),
            None => StrataConfig::discover(root),
        }
        .context("failed to load configuration")?;

        let root = root.join(&config.project.root);
        tracing::debug!("Project root: {}", root.display());
        Ok(Project { root, config })
    }

    /// Resolve the manifest's units into input records.
    fn records(&self, manifest: &Manifest) -> anyhow::Result<Vec<strata_core::FileRecord>> {
        let resolver = Resolver::new(&self.config.resolver_config())?;
        Ok(resolver.resolve_units(&manifest.units))
    }
}

pub fn analyze(
    project: &Project,
    input: &Path,
    output: Option<&Path>,
    upward_issues: bool,
) -> anyhow::Result<()> {
    let manifest = Manifest::load(input)?;
    let records = project.records(&manifest)?;
    let analyzed = manifest.analyzed_file_paths.as_ref();

    let report = if upward_issues || project.config.layout.upward_issues {
        analyze_with_layout(&records, analyzed)?
    } else {
        strata_core::analyze(&records, analyzed)
    };

    tracing::info!(
        "Analyzed {} files in {}: {} edges, {} layers, {} issues",
        report.dependency_graph.len(),
        project.root.display(),
        report.edge_count,
        report.layer_count,
        report.issues.len()
    );

    write_json(&report, output)
}

pub fn layout(project: &Project, input: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let manifest = Manifest::load(input)?;
    let records = project.records(&manifest)?;
    let visualization = build_visualization(&records, manifest.analyzed_file_paths.as_ref())?;

    tracing::info!(
        "Laid out {} folders: {} folder edges, {} file edges",
        visualization.folders.len(),
        visualization.folder_edges.len(),
        visualization.file_edges.len()
    );

    write_json(&visualization, output)
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json + "\n")
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
