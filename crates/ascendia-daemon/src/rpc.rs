//! JSON-RPC server over Unix socket.
//!
//! Listens on a Unix domain socket, accepts connections, and dispatches
//! newline-delimited JSON-RPC 2.0 calls to the command handlers.

use std::path::PathBuf;
use std::sync::Arc;

use ascendia_engine::EngineError;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;
use tracing::{debug, error, info, warn};

use crate::commands;
use crate::DaemonState;

/// JSON-RPC request.
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    /// JSON-RPC version (must be "2.0").
    pub jsonrpc: String,
    pub id: serde_json::Value,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// JSON-RPC response carrying either a result or an error.
#[derive(Debug, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

/// JSON-RPC error object.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RpcError {
    pub code: i32,
    /// Error name.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcResponse {
    pub fn success(id: serde_json::Value, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: serde_json::Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

impl RpcError {
    // Standard JSON-RPC errors

    /// Parse error (-32700).
    pub fn parse_error() -> Self {
        Self {
            code: -32700,
            message: "PARSE_ERROR".to_string(),
            data: None,
        }
    }

    /// Invalid request (-32600).
    pub fn invalid_request() -> Self {
        Self {
            code: -32600,
            message: "INVALID_REQUEST".to_string(),
            data: None,
        }
    }

    /// Method not found (-32601).
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "METHOD_NOT_FOUND".to_string(),
            data: Some(serde_json::json!({"method": method})),
        }
    }

    /// Invalid params (-32602).
    pub fn invalid_params(detail: &str) -> Self {
        Self {
            code: -32602,
            message: "INVALID_PARAMS".to_string(),
            data: Some(serde_json::json!({"detail": detail})),
        }
    }

    /// Internal error (-32603).
    pub fn internal_error(detail: &str) -> Self {
        Self {
            code: -32603,
            message: "INTERNAL_ERROR".to_string(),
            data: Some(serde_json::json!({"detail": detail})),
        }
    }

    // Application errors

    /// Mission or profile not found (-32004).
    pub fn not_found(detail: &str) -> Self {
        Self {
            code: -32004,
            message: "NOT_FOUND".to_string(),
            data: Some(serde_json::json!({"detail": detail})),
        }
    }

    /// Storage schema missing (-32050).
    pub fn schema_unavailable(detail: &str) -> Self {
        Self {
            code: -32050,
            message: "SCHEMA_UNAVAILABLE".to_string(),
            data: Some(serde_json::json!({
                "detail": detail,
                "hint": "database schema is not initialized; run migrations",
            })),
        }
    }
}

impl From<EngineError> for RpcError {
    fn from(err: EngineError) -> Self {
        match &err {
            EngineError::NotFound(what) => RpcError::not_found(what),
            EngineError::Validation(why) => RpcError::invalid_params(why),
            EngineError::SchemaUnavailable(what) => RpcError::schema_unavailable(what),
            EngineError::Storage(_) => RpcError::internal_error(&err.to_string()),
        }
    }
}

/// The RPC server.
pub struct RpcServer {
    state: Arc<DaemonState>,
    socket_path: PathBuf,
}

impl RpcServer {
    pub fn new(state: Arc<DaemonState>, socket_path: PathBuf) -> Self {
        Self { state, socket_path }
    }

    /// Run the server, accepting connections.
    pub async fn run(&self) -> anyhow::Result<()> {
        // Remove stale socket file
        let _ = std::fs::remove_file(&self.socket_path);

        let listener = UnixListener::bind(&self.socket_path)?;
        info!("IPC server listening on {:?}", self.socket_path);

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let state = self.state.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(state, stream).await {
                            warn!("Connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    error!("Accept error: {}", e);
                }
            }
        }
    }
}

/// Handle a single client connection.
async fn handle_connection(
    state: Arc<DaemonState>,
    stream: tokio::net::UnixStream,
) -> anyhow::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            break; // EOF
        }
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<RpcRequest>(&line) {
            Ok(request) => dispatch_request(state.clone(), request).await,
            Err(_) => RpcResponse::error(serde_json::Value::Null, RpcError::parse_error()),
        };

        let mut response_json = serde_json::to_string(&response)?;
        response_json.push('\n');
        writer.write_all(response_json.as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}

/// Dispatch a JSON-RPC request to the appropriate command handler.
pub async fn dispatch_request(state: Arc<DaemonState>, request: RpcRequest) -> RpcResponse {
    let id = request.id.clone();
    let method = request.method.as_str();

    if request.jsonrpc != "2.0" {
        return RpcResponse::error(id, RpcError::invalid_request());
    }

    debug!("Dispatching RPC method: {}", method);

    let params = &request.params;
    let result = match method {
        "health" => commands::health(&state).await,

        // Profile
        "get_me" => commands::profile::get_me(&state, params).await,
        "update_me" => commands::profile::update_me(&state, params).await,
        "delete_me" => commands::profile::delete_me(&state, params).await,
        "list_archetypes" => commands::profile::list_archetypes(&state).await,

        // Missions
        "get_today_missions" => commands::missions::get_today_missions(&state, params).await,
        "complete_mission" => commands::missions::complete_mission(&state, params).await,

        // Progress
        "get_progress_last7" => commands::progress::get_progress_last7(&state, params).await,

        // Admin
        "admin_reconcile_user" => {
            commands::admin::admin_reconcile_user(&state, method, params).await
        }
        "admin_reconcile_all" => commands::admin::admin_reconcile_all(&state, method, params).await,

        _ => Err(RpcError::method_not_found(method)),
    };

    match result {
        Ok(value) => RpcResponse::success(id, value),
        Err(err) => RpcResponse::error(id, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DaemonConfig;
    use serde_json::json;

    fn test_state(config: DaemonConfig) -> Arc<DaemonState> {
        let conn = ascendia_db::open_memory().expect("open");
        Arc::new(DaemonState::new(conn, config).expect("state"))
    }

    fn request(method: &str, params: serde_json::Value) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0".into(),
            id: json!(1),
            method: method.into(),
            params,
        }
    }

    #[test]
    fn test_rpc_error_codes() {
        assert_eq!(RpcError::method_not_found("unknown").code, -32601);
        assert_eq!(RpcError::not_found("x").code, -32004);
        assert_eq!(RpcError::schema_unavailable("x").code, -32050);
    }

    #[test]
    fn test_engine_errors_map_to_codes() {
        let cases = [
            (EngineError::NotFound("m".into()), -32004),
            (EngineError::Validation("Unknown archetypeId".into()), -32602),
            (EngineError::SchemaUnavailable("missions".into()), -32050),
            (EngineError::Storage("disk".into()), -32603),
        ];
        for (err, code) in cases {
            assert_eq!(RpcError::from(err).code, code);
        }
    }

    #[test]
    fn test_rpc_response_shapes() {
        let ok = RpcResponse::success(json!(1), json!({"ok": true}));
        assert!(ok.result.is_some() && ok.error.is_none());

        let err = RpcResponse::error(json!(1), RpcError::internal_error("test"));
        assert!(err.result.is_none() && err.error.is_some());
    }

    #[tokio::test]
    async fn test_dispatch_unknown_method_and_bad_version() {
        let state = test_state(DaemonConfig::default());
        let resp = dispatch_request(state.clone(), request("nope", json!({}))).await;
        assert_eq!(resp.error.expect("error").code, -32601);

        let mut bad = request("health", json!({}));
        bad.jsonrpc = "1.0".into();
        let resp = dispatch_request(state, bad).await;
        assert_eq!(resp.error.expect("error").code, -32600);
    }

    #[tokio::test]
    async fn test_dispatch_today_then_complete() {
        let state = test_state(DaemonConfig::default());
        let today = dispatch_request(
            state.clone(),
            request("get_today_missions", json!({"user_id": "u1"})),
        )
        .await
        .result
        .expect("today");
        let missions = today["missions"].as_array().expect("missions");
        assert_eq!(missions.len(), 4);

        let id = missions[0]["id"].as_str().expect("id");
        let done = dispatch_request(
            state.clone(),
            request("complete_mission", json!({"user_id": "u1", "mission_id": id})),
        )
        .await
        .result
        .expect("complete");
        assert_eq!(done["profile"]["total_missions_completed"], 1);

        let missing = dispatch_request(
            state,
            request("complete_mission", json!({"user_id": "u1", "mission_id": "nope"})),
        )
        .await;
        assert_eq!(missing.error.expect("error").code, -32004);
    }

    #[tokio::test]
    async fn test_admin_methods_hidden_without_secret() {
        let state = test_state(DaemonConfig::default());
        let resp = dispatch_request(state, request("admin_reconcile_all", json!({}))).await;
        assert_eq!(resp.error.expect("error").code, -32601);

        let mut config = DaemonConfig::default();
        config.sweep.admin_secret = Some("s3cret".into());
        let state = test_state(config);

        let wrong = dispatch_request(
            state.clone(),
            request("admin_reconcile_all", json!({"admin_secret": "guess"})),
        )
        .await;
        assert_eq!(wrong.error.expect("error").code, -32601);

        let report = dispatch_request(
            state,
            request("admin_reconcile_all", json!({"admin_secret": "s3cret"})),
        )
        .await
        .result
        .expect("report");
        assert_eq!(report["ok"], true);
        assert_eq!(report["processed"], 0);
    }
}
