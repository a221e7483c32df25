//! Integration tests for the stdio MCP server lifecycle of `tea serve`.
//! Verifies the handshake, a tool call, and clean exit on stdin EOF.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn tea_binary() -> std::path::PathBuf {
    assert_cmd::cargo::cargo_bin!("tea").into()
}

fn spawn_serve(data_dir: &TempDir) -> Child {
    Command::new(tea_binary())
        .arg("serve")
        .env("TEA_DATA_DIR", data_dir.path())
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn tea serve")
}

/// Send a JSON-RPC message as newline-delimited JSON (rmcp 0.15 stdio format).
fn send_jsonrpc(stdin: &mut impl Write, msg: &serde_json::Value) {
    let line = serde_json::to_string(msg).unwrap();
    writeln!(stdin, "{line}").unwrap();
    stdin.flush().unwrap();
}

/// Read responses until one carries `id`.
fn read_response(reader: &mut BufReader<ChildStdout>, id: u64) -> serde_json::Value {
    let mut line = String::new();
    loop {
        line.clear();
        let n = reader.read_line(&mut line).expect("read stdout");
        assert!(n > 0, "server closed stdout before answering request {id}");
        let Ok(msg) = serde_json::from_str::<serde_json::Value>(&line) else {
            continue;
        };
        if msg["id"] == id {
            return msg;
        }
    }
}

/// Initialize handshake; returns once the server has answered.
fn mcp_handshake(child: &mut Child, reader: &mut BufReader<ChildStdout>) {
    let stdin = child.stdin.as_mut().expect("stdin pipe");
    let init_req = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": { "name": "test", "version": "0.1.0" }
        }
    });
    send_jsonrpc(stdin, &init_req);
    let response = read_response(reader, 1);
    assert!(response["result"]["capabilities"]["tools"].is_object());

    let initialized = serde_json::json!({
        "jsonrpc": "2.0",
        "method": "notifications/initialized"
    });
    send_jsonrpc(stdin, &initialized);
}

fn wait_for_exit(mut child: Child) -> (std::process::ExitStatus, Duration) {
    drop(child.stdin.take());
    let start = Instant::now();
    let status = child.wait().expect("wait");
    (status, start.elapsed())
}

/// Closing stdin before MCP init should still exit cleanly.
#[test]
fn serve_exits_on_early_stdin_eof() {
    let dir = TempDir::new().unwrap();
    let child = spawn_serve(&dir);
    std::thread::sleep(Duration::from_millis(200));

    let (status, elapsed) = wait_for_exit(child);
    assert!(status.success(), "early stdin EOF should exit 0, got {status}");
    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
}

/// After a full handshake, closing stdin should trigger clean shutdown.
#[test]
fn serve_exits_on_stdin_eof() {
    let dir = TempDir::new().unwrap();
    let mut child = spawn_serve(&dir);
    let mut reader = BufReader::new(child.stdout.take().expect("stdout pipe"));
    mcp_handshake(&mut child, &mut reader);

    let (status, elapsed) = wait_for_exit(child);
    assert!(status.success(), "tea serve should exit 0 on stdin EOF, got {status}");
    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
}

/// A saved tea survives the server process.
#[test]
fn tool_call_persists_across_restart() {
    let dir = TempDir::new().unwrap();
    let mut child = spawn_serve(&dir);
    let mut reader = BufReader::new(child.stdout.take().expect("stdout pipe"));
    mcp_handshake(&mut child, &mut reader);

    let save_req = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "tools/call",
        "params": {
            "name": "tea_save",
            "arguments": {
                "record": {
                    "name": "Tieguanyin",
                    "flavorProfile": ["floral", "creamy"],
                    "processingMethods": ["rolled", "roasted"]
                }
            }
        }
    });
    send_jsonrpc(child.stdin.as_mut().expect("stdin pipe"), &save_req);
    let response = read_response(&mut reader, 2);
    assert!(response["result"]["isError"] != true, "tea_save failed: {response}");

    let (status, _) = wait_for_exit(child);
    assert!(status.success());

    let mut child = spawn_serve(&dir);
    let mut reader = BufReader::new(child.stdout.take().expect("stdout pipe"));
    mcp_handshake(&mut child, &mut reader);
    let list_req = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 3,
        "method": "tools/call",
        "params": { "name": "tea_list", "arguments": {} }
    });
    send_jsonrpc(child.stdin.as_mut().expect("stdin pipe"), &list_req);
    let response = read_response(&mut reader, 3);
    let text = response["result"]["content"][0]["text"]
        .as_str()
        .expect("text content");
    assert!(text.contains("Tieguanyin"));

    let (status, _) = wait_for_exit(child);
    assert!(status.success());
}
