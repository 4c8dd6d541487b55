//! REST API handlers for the reftable server

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json},
};
use reftable_core::{
    generate, select_axis, to_display_model, to_html, to_markdown, Cell, CountMap,
    DocumentRepository, LinkDirection, NodeKey, SeenColumns, TableGenData, TableGenSettings,
    TableView,
};
use serde::{Deserialize, Serialize};

use crate::ServerState;

/// Per-request overrides of the server's default settings.
#[derive(Debug, Default, Deserialize)]
pub struct TableQuery {
    pub time_axis_path: Option<String>,
    pub inquire_axis_path: Option<String>,
    pub collect_links: Option<LinkDirection>,
    pub include_first: Option<bool>,
    pub include_last: Option<bool>,
}

impl TableQuery {
    pub fn apply(self, defaults: &TableGenSettings) -> TableGenSettings {
        TableGenSettings {
            time_axis_path: self.time_axis_path.unwrap_or_else(|| defaults.time_axis_path.clone()),
            inquire_axis_path: self
                .inquire_axis_path
                .unwrap_or_else(|| defaults.inquire_axis_path.clone()),
            collect_links: self.collect_links.unwrap_or(defaults.collect_links),
            include_first: self.include_first.unwrap_or(defaults.include_first),
            include_last: self.include_last.unwrap_or(defaults.include_last),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NodesQuery {
    pub prefix: Option<String>,
}

/// Response structure for the table API
#[derive(Debug, Serialize)]
pub struct TableResponse {
    pub settings: TableGenSettings,
    pub data: TableGenData,
    pub view: TableView,
}

/// One document with its outgoing and incoming reference counts
#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub key: NodeKey,
    pub label: String,
    pub outgoing: CountMap,
    pub incoming: CountMap,
}

/// Prefix of the document endpoint; the page's links point here.
pub const DOCUMENTS_PATH: &str = "/api/documents/";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub documents: usize,
}

fn build_table(state: &ServerState, query: TableQuery) -> (TableGenSettings, TableGenData) {
    let settings = query.apply(&state.defaults);
    let data = generate(state.graph.as_ref(), &settings);
    (settings, data)
}

/// Get the table data and its display model as JSON
pub async fn get_table(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<TableQuery>,
) -> Json<TableResponse> {
    let (settings, data) = build_table(&state, query);
    let view = to_display_model(&data, SeenColumns::from(&settings), state.graph.as_ref());
    Json(TableResponse { settings, data, view })
}

/// Get the table as markdown
pub async fn get_markdown(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<TableQuery>,
) -> impl IntoResponse {
    let (_, data) = build_table(&state, query);
    (
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        to_markdown(&data, state.graph.as_ref()),
    )
}

/// Sorted document keys under an optional prefix
pub async fn get_nodes(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<NodesQuery>,
) -> Json<Vec<NodeKey>> {
    let keys = state.graph.node_keys();
    Json(select_axis(&keys, query.prefix.as_deref().unwrap_or_default()))
}

/// Look up one document by its vault path
pub async fn get_document(
    State(state): State<Arc<ServerState>>,
    Path(key): Path<String>,
) -> Result<Json<DocumentResponse>, StatusCode> {
    let key = NodeKey::new(key);
    let document = state.graph.document(&key).map_err(|e| {
        tracing::debug!("{}", e);
        StatusCode::NOT_FOUND
    })?;

    let outgoing: CountMap = state
        .graph
        .links_from(&key)
        .map(|(target, weight)| (target.clone(), weight))
        .collect();
    let incoming: CountMap = state
        .graph
        .links_to(&key)
        .map(|(source, weight)| (source.clone(), weight))
        .collect();
    Ok(Json(DocumentResponse {
        label: document.label.clone(),
        key,
        outgoing,
        incoming,
    }))
}

/// Point document links at the document endpoint instead of vault paths.
fn link_to_documents(mut view: TableView) -> TableView {
    for cell in view.header.iter_mut().chain(view.rows.iter_mut().flatten()) {
        if let Cell::Link { href, .. } = cell {
            href.insert_str(0, DOCUMENTS_PATH);
        }
    }
    view
}

/// Render the table as a standalone page
pub async fn index_page(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<TableQuery>,
) -> Html<String> {
    let (settings, data) = build_table(&state, query);
    let view = link_to_documents(to_display_model(
        &data,
        SeenColumns::from(&settings),
        state.graph.as_ref(),
    ));
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>reftable</title>\n\
         <style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        PAGE_STYLE,
        to_html(&view)
    ))
}

const PAGE_STYLE: &str = "body{font-family:sans-serif;margin:2em}\
table{border-collapse:collapse}\
th,td{border:1px solid #ccc;padding:4px 8px;text-align:center}\
tbody th{text-align:left}";

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        documents: state.graph.document_count(),
    })
}
