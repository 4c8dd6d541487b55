//! Test utilities for reftable-indexer

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write `files` (vault-relative path, content) into `root`.
pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let path = root.join(path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}

/// Create a temporary vault with journal entries, people and a template.
pub fn create_test_vault() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    write_files(
        temp_dir.path(),
        &[
            ("Journal/2024-01-1.md", "Met [[Ada]] twice: [[Ada]].\n"),
            ("Journal/2024-01-2.md", "---\nattendees:\n  - \"[[Grace]]\"\n---\nNothing else.\n"),
            ("Journal/2024-01-10.md", "Call with [Ada](../People/Ada.md#notes) about [[Compiler]].\n"),
            ("People/Ada.md", "Works on [[Projects/Compiler|the compiler]].\n"),
            ("People/Grace.md", "See [[2024-01-10]] and [[2024-01-10#Evening]] and [[Nobody]].\n"),
            ("Projects/Compiler.md", "Started on [[Journal/2024-01-1]].\n```\n[[Ada]]\n```\n"),
            ("Templates/Daily.md", "[[Ada]] [[Grace]]\n"),
            (".obsidian/workspace.md", "[[Ada]]\n"),
            ("Attachments/diagram.png", "not a document"),
        ],
    );
    temp_dir
}
