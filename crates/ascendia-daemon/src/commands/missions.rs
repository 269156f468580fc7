//! Mission command handlers.

use std::sync::Arc;

use ascendia_engine::{completion, daily};
use chrono::Utc;
use serde_json::Value;

use super::{identity, str_param, to_value, with_engine};
use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Today's missions for the caller, reconciling past days first.
pub async fn get_today_missions(state: &Arc<DaemonState>, params: &Value) -> Result {
    let me = identity(params)?;
    let engine = state.engine;
    let today = with_engine(state, |store, archetypes| {
        daily::today_missions(store, archetypes, &engine, &me, Utc::now())
    })
    .await?;
    to_value(&today)
}

/// Mark one of the caller's missions complete.
pub async fn complete_mission(state: &Arc<DaemonState>, params: &Value) -> Result {
    let me = identity(params)?;
    let mission_id = str_param(params, "mission_id")?;
    let engine = state.engine;
    let outcome = with_engine(state, |store, archetypes| {
        completion::complete_mission(store, archetypes, &engine, &me, mission_id, Utc::now())
    })
    .await?;
    to_value(&outcome)
}
