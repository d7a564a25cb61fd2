//! JSON-RPC session tests: newline-delimited requests in, responses out.

mod common;

use common::{stub_client, StubTransport};
use hcdp_mcp::protocol::TOOLS;
use hcdp_mcp::McpServer;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::Cursor;
use tokio::io::{AsyncReadExt, BufReader};

/// Feed `lines` to a server and collect every response line.
async fn session(stub: std::sync::Arc<StubTransport>, lines: &[Value]) -> Vec<Value> {
    let input: String = lines.iter().map(|l| format!("{}\n", l)).collect();
    session_raw(stub, input).await
}

async fn session_raw(stub: std::sync::Arc<StubTransport>, input: String) -> Vec<Value> {
    let server = McpServer::new(stub_client(stub));
    let (mut host_end, server_end) = tokio::io::duplex(1 << 16);
    let reader = BufReader::new(Cursor::new(input.into_bytes()));

    let mut output = String::new();
    let (served, read) = tokio::join!(server.serve(reader, server_end), host_end.read_to_string(&mut output));
    served.unwrap();
    read.unwrap();

    output
        .lines()
        .map(|line| serde_json::from_str(line).expect("each output line is one JSON message"))
        .collect()
}

fn by_id(responses: Vec<Value>) -> HashMap<String, Value> {
    responses.into_iter().map(|r| (r["id"].to_string(), r)).collect()
}

#[tokio::test]
async fn test_initialize_and_list_tools() {
    let responses = session(
        StubTransport::new(),
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize",
                   "params": {"protocolVersion": "2024-11-05", "capabilities": {},
                              "clientInfo": {"name": "test-host", "version": "0.0.1"}}}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        ],
    )
    .await;

    assert_eq!(responses.len(), 2);
    let init = &responses[0];
    assert_eq!(init["id"], 1);
    assert_eq!(init["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(init["result"]["serverInfo"]["name"], "hcdp-mcp");
    assert!(init["result"]["capabilities"]["tools"].is_object());

    let tools = responses[1]["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), TOOLS.len());
    let raster = tools.iter().find(|t| t["name"] == "get_climate_raster").unwrap();
    assert_eq!(raster["inputSchema"]["type"], "object");
    assert!(raster["inputSchema"]["required"]
        .as_array()
        .unwrap()
        .contains(&json!("date")));
}

#[tokio::test]
async fn test_tools_call_success_and_validation_failure() {
    let stub = StubTransport::new();
    stub.json("/mesonet/db/variables", json!([{"var_id": "Tair_1_Avg"}]));

    let responses = by_id(
        session(
            stub.clone(),
            &[
                json!({"jsonrpc": "2.0", "id": "a", "method": "tools/call",
                       "params": {"name": "get_mesonet_variables", "arguments": {}}}),
                json!({"jsonrpc": "2.0", "id": "b", "method": "tools/call",
                       "params": {"name": "get_climate_raster", "arguments": {"datatype": "rainfall"}}}),
            ],
        )
        .await,
    );

    let ok = &responses["\"a\""]["result"];
    assert_eq!(ok["isError"], false);
    assert_eq!(ok["content"][0]["type"], "text");
    assert!(ok["content"][0]["text"].as_str().unwrap().contains("Tair_1_Avg"));

    let failed = &responses["\"b\""]["result"];
    assert_eq!(failed["isError"], true);
    let err: Value = serde_json::from_str(failed["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(err["error"], "ValidationError");
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn test_protocol_errors() {
    let input = [
        "{not json".to_string(),
        json!({"jsonrpc": "2.0", "id": 7, "method": "resources/list"}).to_string(),
        json!({"jsonrpc": "2.0", "id": 8, "method": "tools/call"}).to_string(),
        json!({"jsonrpc": "2.0", "id": 9, "params": {}}).to_string(),
        json!({"jsonrpc": "2.0", "id": 10, "method": "ping"}).to_string(),
    ]
    .join("\n");

    let responses = session_raw(StubTransport::new(), input).await;
    assert_eq!(responses.len(), 5);
    assert_eq!(responses[0]["id"], Value::Null);
    assert_eq!(responses[0]["error"]["code"], -32700);
    assert_eq!(responses[1]["error"]["code"], -32601);
    assert_eq!(responses[2]["error"]["code"], -32602);
    assert_eq!(responses[3]["id"], 9);
    assert_eq!(responses[3]["error"]["code"], -32600);
    assert_eq!(responses[4]["result"], json!({}));
}

#[tokio::test]
async fn test_notifications_and_blank_lines_get_no_reply() {
    let input = format!(
        "\n{}\n   \n{}\n",
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        json!({"jsonrpc": "2.0", "method": "notifications/cancelled", "params": {"requestId": 3}}),
    );
    let responses = session_raw(StubTransport::new(), input).await;
    assert!(responses.is_empty());
}

#[tokio::test]
async fn test_pending_calls_finish_after_eof() {
    let stub = StubTransport::new();
    stub.json("/mesonet/db/stationMonitor", json!({"0115": {"status": "ok"}}));
    let calls: Vec<Value> = (0..5)
        .map(|i| {
            json!({"jsonrpc": "2.0", "id": i, "method": "tools/call",
                   "params": {"name": "get_mesonet_station_monitor", "arguments": {"location": "hawaii"}}})
        })
        .collect();

    let responses = by_id(session(stub.clone(), &calls).await);
    assert_eq!(responses.len(), 5);
    for i in 0..5 {
        assert_eq!(responses[&i.to_string()]["result"]["isError"], false);
    }
    assert_eq!(stub.calls(), 5);
}
