//! Markdown link extraction: wikilinks, embeds, markdown links and frontmatter

use std::path::Path;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use serde_yaml::Value;
use tracing::debug;

use crate::extractor::LinkExtractor;

/// Wikilinks/embeds and inline markdown links, matched in one pass so the
/// results keep document order.
static LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"!?\[\[(?P<wiki>[^\[\]|\n]+?)(?:\|[^\[\]\n]*)?\]\]|!?\[[^\[\]\n]*\]\(\s*(?P<md><[^>\n]+>|[^)\s]+)(?:\s+"[^"\n]*")?\s*\)"#,
    )
    .unwrap()
});

/// Fenced code blocks (``` or ~~~) and inline code spans.
static CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^[ \t]*```.*?^[ \t]*```[^\n]*$|^[ \t]*~~~.*?^[ \t]*~~~[^\n]*$|`[^`\n]+`").unwrap()
});

/// URL schemes such as `https:` or `obsidian:`.
static SCHEME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*:").unwrap());

pub struct MarkdownExtractor;

impl LinkExtractor for MarkdownExtractor {
    fn extract(&self, path: &Path, content: &str) -> Result<Vec<String>> {
        let (frontmatter, body) = split_frontmatter(content);

        let mut links = Vec::new();
        if let Some(yaml) = frontmatter {
            match serde_yaml::from_str::<Value>(yaml) {
                Ok(value) => collect_yaml_links(&value, &mut links),
                Err(e) => debug!("Skipping frontmatter of {}: {}", path.display(), e),
            }
        }
        links.extend(extract_body_links(body));
        Ok(links)
    }
}

/// Link targets in a markdown body, ignoring code.
pub fn extract_body_links(text: &str) -> Vec<String> {
    let text = CODE_REGEX.replace_all(text, "");
    LINK_REGEX
        .captures_iter(&text)
        .filter_map(|caps| {
            if let Some(wiki) = caps.name("wiki") {
                clean_target(wiki.as_str())
            } else {
                caps.name("md").and_then(|md| markdown_target(md.as_str()))
            }
        })
        .collect()
}

/// Split a leading `---` YAML block from the body.
fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return (None, content);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }
    (None, content)
}

fn collect_yaml_links(value: &Value, links: &mut Vec<String>) {
    match value {
        Value::String(s) => links.extend(
            LINK_REGEX
                .captures_iter(s)
                .filter_map(|caps| caps.name("wiki"))
                .filter_map(|wiki| clean_target(wiki.as_str())),
        ),
        Value::Sequence(items) => {
            for item in items {
                collect_yaml_links(item, links);
            }
        }
        Value::Mapping(map) => {
            for item in map.values() {
                collect_yaml_links(item, links);
            }
        }
        Value::Tagged(tagged) => collect_yaml_links(&tagged.value, links),
        _ => {}
    }
}

fn markdown_target(raw: &str) -> Option<String> {
    let raw = raw
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(raw);
    if SCHEME_REGEX.is_match(raw) {
        return None;
    }
    clean_target(&percent_decode(raw))
}

/// Drop `#heading` / `#^block` suffixes. Links to a heading of the same
/// document have no target.
fn clean_target(raw: &str) -> Option<String> {
    let target = raw.split('#').next().unwrap_or_default().trim();
    (!target.is_empty()).then(|| target.to_string())
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}
