//! Resolves raw dependency declarations to project-internal source paths

use std::collections::BTreeSet;

use globset::{Glob, GlobSet, GlobSetBuilder};
use rayon::prelude::*;
use strata_core::folders::parent_dir;
use strata_core::{DependencyReference, FileRecord, SourceUnit};

use crate::config::{ConfigError, ResolverConfig};

const PACKAGE_SCHEME: &str = "package";

/// Maps declarations onto candidate source paths for one project.
///
/// Resolution never fails: anything external, escaping the project root or
/// not a source file simply yields nothing.
#[derive(Debug, Clone)]
pub struct Resolver {
    project_name: String,
    source_root: String,
    stdlib_schemes: BTreeSet<String>,
    sources: GlobSet,
}

impl Resolver {
    pub fn new(config: &ResolverConfig) -> Result<Self, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for glob in &config.source_globs {
            let compiled = Glob::new(glob).map_err(|source| ConfigError::InvalidGlob {
                glob: glob.clone(),
                source,
            })?;
            builder.add(compiled);
        }
        let sources = builder.build().map_err(|source| ConfigError::InvalidGlob {
            glob: config.source_globs.join(", "),
            source,
        })?;

        Ok(Resolver {
            project_name: config.project_name.clone(),
            source_root: config.source_root.trim_matches('/').to_string(),
            stdlib_schemes: config.stdlib_schemes.iter().cloned().collect(),
            sources,
        })
    }

    /// Every resolvable target of `reference`, primary first, without
    /// duplicates.
    pub fn resolve(&self, reference: &DependencyReference, current_file: &str) -> Vec<String> {
        let mut resolved: Vec<String> = Vec::new();
        for uri in reference.targets() {
            if let Some(path) = self.resolve_uri(uri, current_file) {
                if !resolved.contains(&path) {
                    resolved.push(path);
                }
            }
        }
        resolved
    }

    /// Resolve a single URI as written in `current_file`.
    pub fn resolve_uri(&self, uri: &str, current_file: &str) -> Option<String> {
        let candidate = match split_scheme(uri) {
            Some((scheme, _)) if self.stdlib_schemes.contains(scheme) => {
                tracing::trace!("Dropping standard library reference {}", uri);
                return None;
            }
            Some((PACKAGE_SCHEME, rest)) => {
                let (package, path) = rest.split_once('/')?;
                if self.project_name.is_empty() || package != self.project_name {
                    tracing::trace!("Dropping third-party reference {}", uri);
                    return None;
                }
                normalize(&self.source_root, path)
            }
            Some(_) => {
                tracing::trace!("Dropping external reference {}", uri);
                return None;
            }
            None if uri.starts_with('/') => {
                tracing::trace!("Dropping absolute reference {} in {}", uri, current_file);
                return None;
            }
            None => normalize(parent_dir(current_file), uri),
        };

        let Some(candidate) = candidate else {
            tracing::trace!("Dropping {} in {}: escapes the project root", uri, current_file);
            return None;
        };

        if !self.sources.is_match(&candidate) {
            tracing::trace!("Dropping {} in {}: not a source file", candidate, current_file);
            return None;
        }
        Some(candidate)
    }

    /// Resolve every declaration of `unit` into its input record.
    pub fn resolve_unit(&self, unit: &SourceUnit) -> FileRecord {
        let mut seen = BTreeSet::new();
        let dependency_targets = unit
            .declarations
            .iter()
            .flat_map(|reference| self.resolve(reference, &unit.path))
            .filter(|target| seen.insert(target.clone()))
            .collect();

        FileRecord {
            file_path: unit.path.clone(),
            dependency_targets,
            is_entry_point: unit.is_entry_point,
        }
    }

    /// Resolve all units in parallel, keeping input order.
    pub fn resolve_units(&self, units: &[SourceUnit]) -> Vec<FileRecord> {
        let records: Vec<FileRecord> = units.par_iter().map(|unit| self.resolve_unit(unit)).collect();
        tracing::debug!(
            "Resolved {} units into {} candidate edges",
            records.len(),
            records.iter().map(|r| r.dependency_targets.len()).sum::<usize>()
        );
        records
    }
}

/// `scheme:rest` when `uri` starts with a URI scheme.
fn split_scheme(uri: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = uri.split_once(':')?;
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some((scheme, rest))
}

/// Join `path` onto `base` and fold `.` and `..` segments.
///
/// `None` when a `..` climbs above the project root.
fn normalize(base: &str, path: &str) -> Option<String> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in base.split('/').chain(path.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            segment => segments.push(segment),
        }
    }
    Some(segments.join("/"))
}
