//! IPC command handlers.
//!
//! Each submodule implements the commands for one IPC category. Handlers
//! lock the shared connection, run one synchronous engine call and release.

pub mod admin;
pub mod missions;
pub mod profile;
pub mod progress;

use std::sync::Arc;

use ascendia_engine::store::{SqliteArchetypes, SqliteStore};
use ascendia_types::UserIdentity;
use serde::Serialize;
use serde_json::Value;

use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Liveness probe.
pub async fn health(_state: &Arc<DaemonState>) -> Result {
    Ok(serde_json::json!({
        "ok": true,
        "name": "ascendia-daemon",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Caller identity from `user_id` and optional `email` params.
pub(crate) fn identity(params: &Value) -> std::result::Result<UserIdentity, RpcError> {
    let user_id = params
        .get("user_id")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| RpcError::invalid_params("user_id required"))?;
    let email = params
        .get("email")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    Ok(UserIdentity {
        user_id: user_id.to_string(),
        email,
    })
}

pub(crate) fn str_param<'a>(
    params: &'a Value,
    name: &str,
) -> std::result::Result<&'a str, RpcError> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params(&format!("{name} required")))
}

pub(crate) fn to_value<T: Serialize>(value: &T) -> Result {
    serde_json::to_value(value)
        .map_err(|e| RpcError::internal_error(&format!("serialization failed: {e}")))
}

/// Run `f` against the store with the connection locked.
pub(crate) async fn with_engine<T>(
    state: &Arc<DaemonState>,
    f: impl FnOnce(&SqliteStore<'_>, &SqliteArchetypes<'_>) -> ascendia_engine::Result<T>,
) -> std::result::Result<T, RpcError> {
    let db = state.db.lock().await;
    let store = SqliteStore::with_caps(&db, state.caps);
    let archetypes = SqliteArchetypes::new(&db);
    Ok(f(&store, &archetypes)?)
}
