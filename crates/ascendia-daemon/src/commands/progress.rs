//! Progress command handlers.

use std::sync::Arc;

use ascendia_engine::daily;
use chrono::Utc;
use serde_json::Value;

use super::{identity, to_value, with_engine};
use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Seven-day rollup, newest day first.
pub async fn get_progress_last7(state: &Arc<DaemonState>, params: &Value) -> Result {
    let me = identity(params)?;
    let engine = state.engine;
    let rollup = with_engine(state, |store, archetypes| {
        daily::last7(store, archetypes, &engine, &me, Utc::now())
    })
    .await?;
    to_value(&rollup)
}
