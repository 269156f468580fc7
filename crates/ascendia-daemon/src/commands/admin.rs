//! Administrative command handlers.
//!
//! Both methods require `admin_secret` to match the configured secret.
//! Without a configured secret, or with a wrong one, they answer as if the
//! method did not exist.

use std::sync::Arc;

use ascendia_engine::{daily, sweep};
use chrono::Utc;
use serde_json::Value;
use tracing::info;

use super::{str_param, to_value, with_engine};
use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

fn authorize(state: &DaemonState, method: &str, params: &Value) -> std::result::Result<(), RpcError> {
    let provided = params.get("admin_secret").and_then(|v| v.as_str());
    match (state.config.sweep.admin_secret.as_deref(), provided) {
        (Some(expected), Some(given)) if expected == given => Ok(()),
        _ => Err(RpcError::method_not_found(method)),
    }
}

/// Reconcile one user by id.
pub async fn admin_reconcile_user(state: &Arc<DaemonState>, method: &str, params: &Value) -> Result {
    authorize(state, method, params)?;
    let user_id = str_param(params, "user_id")?;
    let engine = state.engine;
    let profile = with_engine(state, |store, archetypes| {
        daily::reconcile_user(store, archetypes, &engine, user_id, Utc::now())
    })
    .await?;
    Ok(serde_json::json!({ "profile": to_value(&profile)? }))
}

/// Reconcile every user.
pub async fn admin_reconcile_all(state: &Arc<DaemonState>, method: &str, params: &Value) -> Result {
    authorize(state, method, params)?;
    info!("Admin sweep requested");
    let engine = state.engine;
    let report = with_engine(state, |store, archetypes| {
        sweep::sweep(store, archetypes, &engine, Utc::now())
    })
    .await?;
    to_value(&report)
}
