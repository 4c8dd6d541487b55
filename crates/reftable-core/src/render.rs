//! Table rendering: markdown, display model and HTML

use crate::graph::DocumentRepository;
use crate::model::{NodeKey, TableGenData, TableGenSettings};
use serde::{Deserialize, Serialize};

/// Resolves a document key to its display label.
pub trait LabelResolver {
    fn label(&self, key: &NodeKey) -> Option<String>;

    /// Label with a fallback to the raw key.
    fn label_or_key(&self, key: &NodeKey) -> String {
        self.label(key).unwrap_or_else(|| key.to_string())
    }
}

impl<R: DocumentRepository + ?Sized> LabelResolver for R {
    fn label(&self, key: &NodeKey) -> Option<String> {
        self.display_label(key)
    }
}

/// Which aggregate columns to show; taken from the generation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SeenColumns {
    pub first: bool,
    pub last: bool,
}

impl From<&TableGenSettings> for SeenColumns {
    fn from(settings: &TableGenSettings) -> Self {
        SeenColumns {
            first: settings.include_first,
            last: settings.include_last,
        }
    }
}

/// A single table cell for widget-based renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Cell {
    Text { text: String },
    Link { label: String, href: String },
    Count { count: u32 },
    Empty,
}

impl Cell {
    fn link(key: &NodeKey, labels: &(impl LabelResolver + ?Sized)) -> Self {
        Cell::Link {
            label: labels.label_or_key(key),
            href: key.to_string(),
        }
    }

    fn text(text: &str) -> Self {
        Cell::Text {
            text: text.to_string(),
        }
    }
}

/// Structured table: header cells and body rows, same width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TableView {
    pub header: Vec<Cell>,
    pub rows: Vec<Vec<Cell>>,
}

const INQUIRY_HEADER: &str = "Inquiry File";

/// Render the table as a markdown pipe table.
pub fn to_markdown(data: &TableGenData, labels: &(impl LabelResolver + ?Sized)) -> String {
    let mut out = String::new();

    let mut header = vec![INQUIRY_HEADER.to_string()];
    header.extend(data.time_nodes.iter().map(|key| escape_markdown(&labels.label_or_key(key))));
    push_markdown_row(&mut out, &header);

    let alignment = vec!["---".to_string(); data.time_nodes.len() + 1];
    push_markdown_row(&mut out, &alignment);

    for row in &data.rows {
        let mut cells = vec![escape_markdown(&labels.label_or_key(&row.inquiry))];
        cells.extend(
            data.time_nodes
                .iter()
                .map(|time| row.count(time).map(|c| c.to_string()).unwrap_or_default()),
        );
        push_markdown_row(&mut out, &cells);
    }

    out
}

fn push_markdown_row(out: &mut String, cells: &[String]) {
    out.push_str("| ");
    out.push_str(&cells.join(" | "));
    out.push_str(" |\n");
}

fn escape_markdown(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Build the structured table. First/last columns appear only when enabled
/// in `columns`; a row without links leaves those cells empty.
pub fn to_display_model(
    data: &TableGenData,
    columns: SeenColumns,
    labels: &(impl LabelResolver + ?Sized),
) -> TableView {
    let mut header = vec![Cell::text(INQUIRY_HEADER)];
    if columns.first {
        header.push(Cell::text("First seen"));
    }
    if columns.last {
        header.push(Cell::text("Last seen"));
    }
    header.extend(data.time_nodes.iter().map(|key| Cell::link(key, labels)));

    let rows = data
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![Cell::link(&row.inquiry, labels)];
            let optional_link = |key: &Option<NodeKey>| match key {
                Some(key) => Cell::link(key, labels),
                None => Cell::Empty,
            };
            if columns.first {
                cells.push(optional_link(&row.first_seen));
            }
            if columns.last {
                cells.push(optional_link(&row.last_seen));
            }
            cells.extend(data.time_nodes.iter().map(|time| match row.count(time) {
                Some(count) => Cell::Count { count },
                None => Cell::Empty,
            }));
            cells
        })
        .collect();

    TableView { header, rows }
}

/// Render a display model as an HTML table with internal links. The first
/// cell of every body row is a row header.
pub fn to_html(view: &TableView) -> String {
    let mut out = String::from("<div class=\"table-parent\"><table>\n<thead>\n<tr>");
    for cell in &view.header {
        push_html_cell(&mut out, "th", cell);
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in &view.rows {
        out.push_str("<tr>");
        for (i, cell) in row.iter().enumerate() {
            let tag = if i == 0 { "th" } else { "td" };
            push_html_cell(&mut out, tag, cell);
        }
        out.push_str("</tr>\n");
    }

    out.push_str("</tbody>\n</table></div>\n");
    out
}

fn push_html_cell(out: &mut String, tag: &str, cell: &Cell) {
    let inner = match cell {
        Cell::Text { text } => escape_html(text),
        Cell::Link { label, href } => format!(
            "<a class=\"internal-link\" href=\"{}\">{}</a>",
            escape_html(href),
            escape_html(label)
        ),
        Cell::Count { count } => count.to_string(),
        Cell::Empty => String::new(),
    };
    out.push_str(&format!("<{tag}>{inner}</{tag}>"));
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
