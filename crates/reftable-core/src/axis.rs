//! Axis selection: prefix filtering and natural ordering of document keys

use crate::model::NodeKey;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use unicode_normalization::UnicodeNormalization;

/// Normalize a vault path: `\` becomes `/`, repeated separators collapse,
/// `.` segments drop, `..` pops a segment, and leading/trailing separators
/// are stripped. Non-breaking spaces become plain spaces and the result is
/// in Unicode NFC, so decomposed names from macOS match typed prefixes.
pub fn normalize_path(path: &str) -> String {
    let cleaned: String = path
        .replace('\\', "/")
        .replace('\u{00A0}', " ")
        .nfc()
        .collect();
    let mut segments: Vec<&str> = Vec::new();
    for segment in cleaned.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// Select the keys whose normalized path starts with the normalized prefix,
/// ordered naturally. The prefix test is on raw strings, so `Notes` also
/// matches `NotesOnTea`. An empty prefix selects everything.
pub fn select_axis<'a, I>(keys: I, prefix: &str) -> Vec<NodeKey>
where
    I: IntoIterator<Item = &'a NodeKey>,
{
    let prefix = normalize_path(prefix);
    let selected: BTreeSet<&NodeKey> = keys
        .into_iter()
        .filter(|key| normalize_path(key.as_str()).starts_with(&prefix))
        .collect();

    let mut axis: Vec<NodeKey> = selected.into_iter().cloned().collect();
    axis.sort_by(|a, b| natural_cmp(a.as_str(), b.as_str()));
    axis
}

/// Case-insensitive comparison treating digit runs as numbers,
/// so `file2` sorts before `file10`. Digit runs are compared by value only
/// when both sides are at a digit; otherwise single characters decide, so
/// `file.md` sorts before `file1.md`. Ties fall back to byte order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut left, mut right) = (a, b);

    loop {
        let (Some(x), Some(y)) = (left.chars().next(), right.chars().next()) else {
            break;
        };

        let ord = if x.is_ascii_digit() && y.is_ascii_digit() {
            let (x_digits, x_rest) = split_digits(left);
            let (y_digits, y_rest) = split_digits(right);
            left = x_rest;
            right = y_rest;
            cmp_digits(x_digits, y_digits)
        } else {
            left = &left[x.len_utf8()..];
            right = &right[y.len_utf8()..];
            x.to_lowercase().cmp(y.to_lowercase())
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    left.len()
        .cmp(&right.len())
        .then_with(|| a.cmp(b))
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

fn cmp_digits(x: &str, y: &str) -> Ordering {
    let x_value = x.trim_start_matches('0');
    let y_value = y.trim_start_matches('0');
    x_value
        .len()
        .cmp(&y_value.len())
        .then_with(|| x_value.cmp(y_value))
        .then_with(|| x.len().cmp(&y.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::keys;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("Logs//2024/"), "Logs/2024");
        assert_eq!(normalize_path("/Logs/./a/../b"), "Logs/b");
        assert_eq!(normalize_path("Logs\\2024"), "Logs/2024");
        assert_eq!(normalize_path("../.."), "");
        assert_eq!(normalize_path(""), "");
        assert_eq!(normalize_path("My\u{00A0}Notes"), "My Notes");
        assert_eq!(normalize_path("Cafe\u{0301}/Menu"), "Caf\u{00E9}/Menu");
    }

    #[test]
    fn test_prefix_matches_across_unicode_forms() {
        let all = keys(&["Cafe\u{0301}/Menu.md", "Other.md"]);
        assert_eq!(select_axis(&all, "Caf\u{00E9}"), keys(&["Cafe\u{0301}/Menu.md"]));
    }

    #[test]
    fn test_natural_order() {
        let all = keys(&["a2", "a10", "a1"]);
        assert_eq!(select_axis(&all, ""), keys(&["a1", "a2", "a10"]));
    }

    #[test]
    fn test_text_prefix_sorts_before_digits() {
        let all = keys(&["Log/file.md", "Log/file1.md", "Log/file10.md", "Log/file2.md"]);
        assert_eq!(
            select_axis(&all, "Log"),
            keys(&["Log/file.md", "Log/file1.md", "Log/file2.md", "Log/file10.md"])
        );
        assert_eq!(natural_cmp("file.md", "file1.md"), Ordering::Less);
        assert_eq!(natural_cmp("Meeting.md", "meeting2.md"), Ordering::Less);
        assert_eq!(natural_cmp("file", "file1"), Ordering::Less);
        assert_eq!(natural_cmp("a10b", "a10"), Ordering::Greater);
    }

    #[test]
    fn test_natural_cmp_case_insensitive() {
        assert_eq!(natural_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(natural_cmp("Day 9", "day 10"), Ordering::Less);
        // Equal ignoring case, so byte order decides and the order stays total.
        assert_eq!(natural_cmp("Note", "note"), Ordering::Less);
        assert_eq!(natural_cmp("note", "note"), Ordering::Equal);
    }

    #[test]
    fn test_natural_cmp_leading_zeros() {
        assert_eq!(natural_cmp("file007", "file8"), Ordering::Less);
        assert_eq!(natural_cmp("file07", "file7"), Ordering::Greater);
        assert_eq!(natural_cmp("2024-01-09", "2024-01-10"), Ordering::Less);
    }

    #[test]
    fn test_prefix_is_raw_string_match() {
        let all = keys(&["Notes/a.md", "NotesOnTea.md", "Other/Notes.md"]);
        assert_eq!(
            select_axis(&all, "Notes"),
            keys(&["Notes/a.md", "NotesOnTea.md"])
        );
    }

    #[test]
    fn test_prefix_is_normalized() {
        let all = keys(&["Logs/1.md", "Logs/2.md", "Other/1.md"]);
        assert_eq!(select_axis(&all, "/Logs//"), keys(&["Logs/1.md", "Logs/2.md"]));
        assert_eq!(select_axis(&all, "Other/../Logs"), keys(&["Logs/1.md", "Logs/2.md"]));
    }

    #[test]
    fn test_empty_prefix_and_no_match() {
        let all = keys(&["b.md", "a.md"]);
        assert_eq!(select_axis(&all, ""), keys(&["a.md", "b.md"]));
        assert!(select_axis(&all, "Missing").is_empty());
    }

    #[test]
    fn test_duplicates_removed() {
        let all = keys(&["a.md", "a.md", "b.md"]);
        assert_eq!(select_axis(&all, ""), keys(&["a.md", "b.md"]));
    }

    #[test]
    fn test_selection_matches_filter() {
        let all = keys(&[
            "Journal/2024-01-02.md",
            "Journal/2023-12-31.md",
            "journal.md",
            "People/Ada.md",
            "Journal2/x.md",
        ]);
        for prefix in ["", "Journal", "Journal/", "People", "j", "Nothing"] {
            let selected = select_axis(&all, prefix);
            let normalized = normalize_path(prefix);
            let expected: BTreeSet<&NodeKey> = all
                .iter()
                .filter(|k| normalize_path(k.as_str()).starts_with(&normalized))
                .collect();
            let got: BTreeSet<&NodeKey> = selected.iter().collect();
            assert_eq!(got, expected, "prefix {prefix:?}");
        }
    }
}
