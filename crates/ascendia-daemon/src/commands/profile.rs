//! Profile command handlers.

use std::sync::Arc;

use ascendia_engine::daily;
use ascendia_types::ProfileUpdate;
use serde_json::Value;
use tracing::info;

use super::{identity, to_value, with_engine};
use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Get-or-create the caller's profile.
pub async fn get_me(state: &Arc<DaemonState>, params: &Value) -> Result {
    let me = identity(params)?;
    let profile = with_engine(state, |store, _| daily::get_me(store, &me)).await?;
    Ok(serde_json::json!({
        "user": to_value(&me)?,
        "profile": to_value(&profile)?,
    }))
}

/// Update timezone and/or archetype.
pub async fn update_me(state: &Arc<DaemonState>, params: &Value) -> Result {
    let me = identity(params)?;
    let update: ProfileUpdate = serde_json::from_value(params.clone())
        .map_err(|e| RpcError::invalid_params(&e.to_string()))?;

    let profile = with_engine(state, |store, archetypes| {
        daily::update_profile(store, archetypes, &me, &update)
    })
    .await?;
    Ok(serde_json::json!({ "profile": to_value(&profile)? }))
}

/// Delete the caller's account and everything it owns.
pub async fn delete_me(state: &Arc<DaemonState>, params: &Value) -> Result {
    let me = identity(params)?;
    with_engine(state, |store, _| daily::delete_account(store, &me)).await?;
    info!(user_id = %me.user_id, "account deleted");
    Ok(serde_json::json!({ "ok": true }))
}

pub async fn list_archetypes(state: &Arc<DaemonState>) -> Result {
    let archetypes = with_engine(state, |_, archetypes| daily::list_archetypes(archetypes)).await?;
    Ok(serde_json::json!({ "archetypes": to_value(&archetypes)? }))
}
