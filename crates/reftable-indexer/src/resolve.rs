//! Resolution of raw link targets to vault documents

use std::collections::HashMap;

use reftable_core::{natural_cmp, normalize_path, NodeKey};

const DEFAULT_EXTENSION: &str = ".md";

/// Resolves link text to document keys. Matching is case-insensitive.
pub struct Resolver {
    /// Lowercased path → key.
    by_path: HashMap<String, NodeKey>,
    /// Lowercased file name → keys, naturally ordered.
    by_name: HashMap<String, Vec<NodeKey>>,
}

impl Resolver {
    pub fn new<'a>(keys: impl IntoIterator<Item = &'a NodeKey>) -> Self {
        let mut by_path = HashMap::new();
        let mut by_name: HashMap<String, Vec<NodeKey>> = HashMap::new();

        for key in keys {
            let lower = normalize_path(key.as_str()).to_lowercase();
            let name = lower.rsplit('/').next().unwrap_or(&lower).to_string();
            by_path.entry(lower).or_insert_with(|| key.clone());
            by_name.entry(name).or_default().push(key.clone());
        }
        for candidates in by_name.values_mut() {
            candidates.sort_by(|a, b| natural_cmp(a.as_str(), b.as_str()));
        }

        Resolver { by_path, by_name }
    }

    /// Resolve `target` as written in `source`.
    ///
    /// Explicitly relative targets (`./`, `../`) resolve against the source's
    /// folder only. Anything else tries the vault path, then the source's
    /// folder, then a file-name match; the naturally-first document wins
    /// when the name is ambiguous.
    pub fn resolve(&self, source: &NodeKey, target: &str) -> Option<NodeKey> {
        let target = target.trim();
        if target.is_empty() {
            return None;
        }

        let folder = source
            .as_str()
            .rsplit_once('/')
            .map_or("", |(folder, _)| folder);
        let relative = normalize_path(&format!("{folder}/{target}"));

        if target.starts_with("./") || target.starts_with("../") {
            return self.lookup_path(&relative);
        }

        self.lookup_path(&normalize_path(target))
            .or_else(|| self.lookup_path(&relative))
            .or_else(|| self.lookup_name(target))
    }

    fn lookup_path(&self, path: &str) -> Option<NodeKey> {
        if path.is_empty() {
            return None;
        }
        let lower = path.to_lowercase();
        self.by_path
            .get(&lower)
            .or_else(|| self.by_path.get(&format!("{lower}{DEFAULT_EXTENSION}")))
            .cloned()
    }

    /// `Note` or `Folder/Note` matched against whole trailing segments of
    /// document paths.
    fn lookup_name(&self, target: &str) -> Option<NodeKey> {
        let suffix = normalize_path(target).to_lowercase();
        let name = suffix.rsplit('/').next().unwrap_or(&suffix);
        let with_extension = format!("{suffix}{DEFAULT_EXTENSION}");

        [name.to_string(), format!("{name}{DEFAULT_EXTENSION}")]
            .iter()
            .filter_map(|name| self.by_name.get(name))
            .flatten()
            .find(|key| {
                let lower = normalize_path(key.as_str()).to_lowercase();
                ends_with_segments(&lower, &suffix) || ends_with_segments(&lower, &with_extension)
            })
            .cloned()
    }
}

/// `path` ends with `suffix` and the match starts at a segment boundary.
fn ends_with_segments(path: &str, suffix: &str) -> bool {
    match path.strip_suffix(suffix) {
        Some(head) => head.is_empty() || head.ends_with('/'),
        None => false,
    }
}
