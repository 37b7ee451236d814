/// Drive the MCP server one JSON-RPC line at a time
use chrono::NaiveDate;
use habit_stats_mcp::mcp::McpServer;
use habit_stats_mcp::*;
use serde_json::{json, Value};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn server() -> McpServer {
    let storage = SqliteStorage::open_in_memory().expect("Failed to open storage");
    McpServer::new(HabitStatsServer::with_storage(storage)).with_today(day(2025, 8, 13))
}

async fn call(server: &mut McpServer, id: u64, tool: &str, arguments: Value) -> Value {
    let line = json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": tool, "arguments": arguments}
    })
    .to_string();

    let response = server.process_line(&line).await.expect("Expected a response");
    serde_json::to_value(response).unwrap()
}

fn text(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}

fn created_id(response: &Value) -> String {
    text(response)
        .rsplit("Habit ID: ")
        .next()
        .unwrap()
        .trim()
        .to_string()
}

#[cfg(test)]
mod mcp_session_tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize_handshake() {
        let mut server = server();

        let response = server
            .process_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
            .await
            .unwrap();
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["result"]["protocolVersion"], json!("2024-11-05"));
        assert_eq!(value["result"]["capabilities"]["tools"]["listChanged"], json!(false));

        let notification = server
            .process_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(notification.is_none());
        assert!(server.is_initialized());
    }

    #[tokio::test]
    async fn test_tools_list() {
        let mut server = server();
        let response = server
            .process_line(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
            .await
            .unwrap();
        let value = serde_json::to_value(response).unwrap();

        let names: Vec<&str> = value["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert!(names.contains(&"habit_create"));
        assert!(names.contains(&"habit_stats"));
        assert!(names.contains(&"habit_toggle"));
        assert_eq!(names.len(), 9);
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let mut server = server();

        let garbage = serde_json::to_value(server.process_line("{not json").await.unwrap()).unwrap();
        assert_eq!(garbage["error"]["code"], json!(-32700));

        let unknown = serde_json::to_value(
            server
                .process_line(r#"{"jsonrpc":"2.0","id":3,"method":"resources/list"}"#)
                .await
                .unwrap(),
        )
        .unwrap();
        assert_eq!(unknown["error"]["code"], json!(-32601));
        assert_eq!(unknown["id"], json!(3));

        let missing_args = call(&mut server, 4, "habit_log", json!({})).await;
        assert_eq!(missing_args["error"]["code"], json!(-32602));

        assert!(server.process_line("   ").await.is_none());
    }

    #[tokio::test]
    async fn test_log_and_stats_session() {
        let mut server = server();

        let created = call(
            &mut server,
            1,
            "habit_create",
            json!({"name": "Running", "cadence": "weekly", "target_per_period": 3}),
        )
        .await;
        assert_eq!(created["result"]["isError"], json!(false));
        let habit_id = created_id(&created);

        for date in [
            "2025-08-11", "2025-08-12", "2025-08-13",
            "2025-08-04", "2025-08-05", "2025-08-06",
            "2025-07-31",
        ] {
            let logged = call(&mut server, 2, "habit_log", json!({"habit_id": habit_id, "date": date})).await;
            assert_eq!(logged["result"]["isError"], json!(false), "{}", text(&logged));
        }

        let stats = call(&mut server, 3, "habit_stats", json!({"habit_id": habit_id})).await;
        let body = text(&stats);
        assert!(body.contains("Stats as of 2025-08-13"));
        assert!(body.contains("Current: 2 week(s)"));
        assert!(body.contains("30 days: 0.4 (40.0%)"));
    }

    #[tokio::test]
    async fn test_tool_failures_are_error_results() {
        let mut server = server();

        let created = call(&mut server, 1, "habit_create", json!({"name": "Reading"})).await;
        let habit_id = created_id(&created);

        let first = call(&mut server, 2, "habit_log", json!({"habit_id": habit_id})).await;
        assert_eq!(first["result"]["isError"], json!(false));

        let duplicate = call(&mut server, 3, "habit_log", json!({"habit_id": habit_id})).await;
        assert_eq!(duplicate["result"]["isError"], json!(true));
        assert!(text(&duplicate).contains("already logged"));
        assert_eq!(duplicate["result"]["_meta"]["errorCode"], json!(-32002));

        let future = call(&mut server, 4, "habit_log", json!({"habit_id": habit_id, "date": "2025-08-14"})).await;
        assert_eq!(future["result"]["isError"], json!(true));
        assert_eq!(future["result"]["_meta"]["errorCode"], json!(-32003));

        let unknown = call(&mut server, 5, "habit_fly", json!({})).await;
        assert_eq!(unknown["result"]["isError"], json!(true));
    }

    #[test]
    fn test_toggle_via_block_on() {
        let mut server = server();

        tokio_test::block_on(async {
            let created = call(&mut server, 1, "habit_create", json!({"name": "Stretch"})).await;
            let habit_id = created_id(&created);

            let on = call(&mut server, 2, "habit_toggle", json!({"habit_id": habit_id})).await;
            assert!(text(&on).contains("Marked"));

            let off = call(&mut server, 3, "habit_toggle", json!({"habit_id": habit_id})).await;
            assert!(text(&off).contains("Unmarked"));
        });
    }
}
