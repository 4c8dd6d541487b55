//! Vault walking: discovers documents and builds the weighted link graph

use std::fs;
use std::path::{Component, Path};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use reftable_core::{natural_cmp, LinkGraph, NodeKey};
use tracing::{debug, info, warn};

use crate::config::VaultConfig;
use crate::extractor::get_extractor;
use crate::resolve::Resolver;

/// Scan every document under `root` and count resolved links between them.
///
/// Hidden entries are skipped, `.gitignore` is honored even outside a git
/// checkout, and `config.exclude` globs match vault-relative paths. Files
/// that cannot be read or parsed are logged and contribute no links.
pub fn scan_vault(root: &Path, config: &VaultConfig) -> Result<LinkGraph> {
    let exclude = build_globset(&config.exclude)?;
    let keys = discover_documents(root, config, &exclude)?;
    info!("Found {} documents in {}", keys.len(), root.display());

    let mut graph = LinkGraph::new();
    for key in &keys {
        graph.add_document(key.clone());
    }

    let resolver = Resolver::new(&keys);
    let mut unresolved = 0usize;

    for key in &keys {
        let path = root.join(key.as_str());
        let Some(extractor) = get_extractor(&path) else {
            continue;
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Cannot read {}: {}", path.display(), e);
                continue;
            }
        };

        let targets = match extractor.extract(&path, &content) {
            Ok(targets) => targets,
            Err(e) => {
                warn!("{:#}", e);
                continue;
            }
        };

        for target in targets {
            match resolver.resolve(key, &target) {
                Some(resolved) => {
                    graph.add_reference(key, &resolved);
                }
                None => {
                    debug!("Unresolved link {:?} in {}", target, key);
                    unresolved += 1;
                }
            }
        }
    }

    info!(
        "Indexed {} documents, {} links ({} references, {} unresolved)",
        graph.document_count(),
        graph.link_count(),
        graph.reference_count(),
        unresolved
    );

    Ok(graph)
}

/// Vault-relative keys of every document with an accepted extension,
/// naturally sorted.
fn discover_documents(root: &Path, config: &VaultConfig, exclude: &GlobSet) -> Result<Vec<NodeKey>> {
    if !root.is_dir() {
        anyhow::bail!("Vault root {} is not a directory", root.display());
    }

    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .require_git(false)
        .build();

    let mut keys = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cannot read entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let path = entry.path();
        if !has_extension(path, &config.extensions) {
            continue;
        }

        let relative = path
            .strip_prefix(root)
            .with_context(|| format!("{} is outside the vault", path.display()))?;
        let Some(key) = vault_key(relative) else {
            warn!("Skipping non UTF-8 path {}", path.display());
            continue;
        };
        if exclude.is_match(&key) {
            debug!("Excluded {}", key);
            continue;
        }
        keys.push(NodeKey::new(key));
    }

    keys.sort_by(|a, b| natural_cmp(a.as_str(), b.as_str()));
    Ok(keys)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).with_context(|| format!("Invalid exclude pattern {:?}", pattern))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
}

/// `/`-joined relative path, independent of the platform separator.
fn vault_key(relative: &Path) -> Option<String> {
    let parts = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_str()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}
