//! Stdio Transport - JSON Lines over stdin/stdout
//!
//! One request per line in, one response per line out. Stdout belongs
//! exclusively to the protocol; all logging goes to stderr. A malformed
//! line gets an error response and the loop keeps going - the process
//! only exits on EOF or shutdown signal.

use serde::Deserialize;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tracing::{debug, info, warn};

use super::ToolRouter;
use crate::ports::{MarketData, OrderExecution};

/// One inbound request line.
#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Value,
    method: String,
    #[serde(default)]
    params: Value,
}

/// Serve the tool protocol until stdin closes.
pub async fn serve<M, X>(router: &ToolRouter<M, X>) -> std::io::Result<()>
where
    M: MarketData,
    X: OrderExecution,
{
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut lines = stdin.lines();

    info!("Serving tools on stdio");

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => handle(router, request).await,
            Err(e) => {
                warn!(error = %e, "Unparsable request line");
                json!({"id": null, "error": format!("invalid request: {e}")})
            }
        };

        write_line(&mut stdout, &response).await?;
    }

    info!("Stdin closed, shutting down");
    Ok(())
}

async fn handle<M, X>(router: &ToolRouter<M, X>, request: Request) -> Value
where
    M: MarketData,
    X: OrderExecution,
{
    debug!(method = %request.method, "Handling request");

    match request.method.as_str() {
        "tools/list" => json!({
            "id": request.id,
            "result": {"tools": super::tool_catalog()},
        }),
        "tools/call" => {
            let name = request
                .params
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if name.is_empty() {
                return json!({"id": request.id, "error": "missing tool name"});
            }

            let default_args = json!({});
            let args = request.params.get("arguments").unwrap_or(&default_args);
            let result = router.dispatch(name, args).await;
            json!({"id": request.id, "result": result})
        }
        other => json!({
            "id": request.id,
            "error": format!("unknown method: {other}"),
        }),
    }
}

async fn write_line(stdout: &mut Stdout, value: &Value) -> std::io::Result<()> {
    let mut payload = serde_json::to_vec(value).unwrap_or_else(|_| b"{}".to_vec());
    payload.push(b'\n');
    stdout.write_all(&payload).await?;
    stdout.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_line_parsing() {
        let raw = r#"{"id": 7, "method": "tools/call", "params": {"name": "get_mid_price", "arguments": {"symbol": "BTC"}}}"#;
        let request: Request = serde_json::from_str(raw).unwrap();

        assert_eq!(request.id, json!(7));
        assert_eq!(request.method, "tools/call");
        assert_eq!(request.params["name"], "get_mid_price");
    }

    #[test]
    fn test_request_defaults_for_absent_fields() {
        let request: Request = serde_json::from_str(r#"{"method": "tools/list"}"#).unwrap();
        assert_eq!(request.id, Value::Null);
        assert_eq!(request.params, Value::Null);
    }
}
