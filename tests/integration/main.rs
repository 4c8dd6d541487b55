//! Integration tests for reftable
//!
//! These tests scan a real vault on disk and drive the CLI and the server.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;

use reftable_core::{generate, to_markdown, LinkDirection, NodeKey, TableGenSettings};
use reftable_indexer::{load_config, scan_vault, CONFIG_FILE};
use reftable_server::{router::create_router, ServerState};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn create_vault() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let files = [
        ("Log/T1.md", "Talked to [[I1]] and [[I1|again]].\n"),
        ("Log/T2.md", "Quiet day.\n"),
        ("Log/T10.md", "Nothing.\n"),
        ("Q/I1.md", "Answered in [T2](../Log/T2.md).\n"),
        ("Q/I2.md", "No links here.\n"),
        ("Templates/Day.md", "[[I1]] [[I2]]\n"),
        (
            CONFIG_FILE,
            "[table]\ntime_axis_path = \"Log\"\ninquire_axis_path = \"Q\"\n\n[vault]\nexclude = [\"Templates/**\"]\n",
        ),
    ];
    for (path, content) in files {
        let path = temp_dir.path().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    temp_dir
}

fn reftable(root: &Path, args: &[&str]) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_reftable"));
    command.arg("--root").arg(root).args(args);
    command
}

fn run(root: &Path, args: &[&str]) -> String {
    let output = reftable(root, args).output().expect("Failed to execute reftable");
    assert!(
        output.status.success(),
        "reftable {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn test_cli_invocation() {
    let output = Command::new(env!("CARGO_BIN_EXE_reftable"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Cross-reference tables for markdown vaults"));
    assert!(stdout.contains("table"));
    assert!(stdout.contains("serve"));
}

/// The vault's own config picks the axes; excluded templates add nothing.
#[test]
fn test_scan_and_generate() {
    let vault = create_vault();
    let config = load_config(vault.path(), None).unwrap();
    let graph = scan_vault(vault.path(), &config.vault).unwrap();
    assert_eq!(graph.document_count(), 5);

    let both = TableGenSettings {
        collect_links: LinkDirection::Both,
        ..config.table.clone()
    };
    let data = generate(&graph, &both);
    let i1 = &data.rows[0];
    assert_eq!(i1.inquiry, NodeKey::from("Q/I1.md"));
    assert_eq!(i1.count(&NodeKey::from("Log/T1.md")), Some(2));
    assert_eq!(i1.count(&NodeKey::from("Log/T2.md")), Some(1));
    assert_eq!(i1.first_seen, Some(NodeKey::from("Log/T1.md")));
    assert_eq!(i1.last_seen, Some(NodeKey::from("Log/T2.md")));

    let front = generate(&graph, &config.table);
    insta::assert_snapshot!(to_markdown(&front, &graph), @r"
    | Inquiry File | T1 | T2 | T10 |
    | --- | --- | --- | --- |
    | I1 | 2 |  |  |
    | I2 |  |  |  |
    ");
}

#[test]
fn test_cli_table() {
    let vault = create_vault();
    let stdout = run(vault.path(), &["table", "--links", "back"]);
    insta::assert_snapshot!(stdout, @r"
    | Inquiry File | T1 | T2 | T10 |
    | --- | --- | --- | --- |
    | I1 |  | 1 |  |
    | I2 |  |  |  |
    ");
}

#[test]
fn test_cli_table_json_to_file() {
    let vault = create_vault();
    let output = vault.path().join("table.json");
    run(
        vault.path(),
        &["table", "--format", "json", "--no-first", "--output", output.to_str().unwrap()],
    );

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["settings"]["include_first"], false);
    assert_eq!(json["data"]["time_nodes"][2], "Log/T10.md");
    assert_eq!(json["data"]["rows"][0]["last_seen"], "Log/T1.md");
    assert!(json["data"]["rows"][0].get("first_seen").is_none());
    // Inquiry, last seen and three time columns.
    assert_eq!(json["view"]["header"].as_array().unwrap().len(), 5);
}

#[test]
fn test_cli_block_from_stdin() {
    let vault = create_vault();
    let mut child = reftable(vault.path(), &["block", "-", "--format", "markdown"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"inquire_axis_path: Log\ntime_axis_path: Q\ncollect_links: front\nbadkey: x\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    insta::assert_snapshot!(stdout, @r"
    | Inquiry File | I1 | I2 |
    | --- | --- | --- |
    | T1 |  |  |
    | T2 | 1 |  |
    | T10 |  |  |
    ");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unable to parse gen setting key badkey"));
}

#[test]
fn test_cli_nodes() {
    let vault = create_vault();
    assert_eq!(run(vault.path(), &["nodes", "--prefix", "Log"]), "Log/T1.md\nLog/T2.md\nLog/T10.md\n");
}

#[test]
fn test_cli_missing_config_file() {
    let vault = create_vault();
    let output = reftable(vault.path(), &["--config", "missing.toml", "table"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

async fn http_get(addr: std::net::SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n", path);
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn test_server_endpoints() {
    let vault = create_vault();
    let config = load_config(vault.path(), None).unwrap();
    let graph = scan_vault(vault.path(), &config.vault).unwrap();
    let state = Arc::new(ServerState::new(graph, config.table));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });

    let health = http_get(addr, "/api/health").await;
    assert!(health.starts_with("HTTP/1.1 200"));
    assert!(health.contains("\"documents\":5"));

    let markdown = http_get(addr, "/api/table/markdown?collect_links=both").await;
    assert!(markdown.contains("text/markdown"));
    assert!(markdown.contains("| I1 | 2 | 1 |  |"));

    let nodes = http_get(addr, "/api/nodes?prefix=Q").await;
    assert!(nodes.contains(r#"["Q/I1.md","Q/I2.md"]"#));

    let bad = http_get(addr, "/api/table?collect_links=sideways").await;
    assert!(bad.starts_with("HTTP/1.1 400"));

    let page = http_get(addr, "/").await;
    assert!(page.contains("<div class=\"table-parent\">"));
    assert!(page.contains("href=\"/api/documents/Q/I1.md\""));

    let document = http_get(addr, "/api/documents/Q/I1.md").await;
    assert!(document.starts_with("HTTP/1.1 200"));
    assert!(document.contains("\"label\":\"I1\""));

    let missing = http_get(addr, "/api/documents/Q/Missing.md").await;
    assert!(missing.starts_with("HTTP/1.1 404"));
}
