//! Operator workflows: load a view's data, submit forms, assign roles.
//!
//! Each workflow talks to the upstream first and touches the store only on
//! success, so a failed submission leaves the store as it was. Nothing is
//! retried and multi-step work is not rolled back.

pub mod assign;
pub mod submit;

use std::future::Future;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::api_client::ApiError;
use crate::errors::AppError;
use crate::forms::Draft;
use crate::navigation::{Level, Scope};
use crate::sessions::SessionKey;
use crate::state::AppState;
use crate::store::Action;

pub use assign::{assign_roles, AssignmentStatus, FailedRole, RoleAssignmentOutcome};

/// Applies one fetched collection. Only an auth failure escapes; anything
/// else is logged and the cached collection stays in place.
async fn load<T, F>(
    state: &AppState,
    what: &str,
    call: F,
    action: impl FnOnce(Vec<T>) -> Action,
) -> Result<(), AppError>
where
    F: Future<Output = Result<Vec<T>, ApiError>>,
{
    match call.await {
        Ok(list) => {
            debug!("loaded {} {what}", list.len());
            state.store.write().await.apply(action(list));
            Ok(())
        }
        Err(ApiError::Unauthorized) => Err(AppError::Unauthorized),
        Err(e) => {
            warn!("failed to load {what}: {e}");
            Ok(())
        }
    }
}

async fn load_level(state: &AppState, level: Level, scope: &Scope) -> Result<(), AppError> {
    let api = &state.api;
    match level {
        Level::Clients => {
            load(state, "clients", api.clients().list(), Action::SetClients).await?;
        }
        Level::Vendors => {
            load(state, "vendors", api.vendors().list(), Action::SetVendors).await?;
        }
        Level::Jobs => {
            load(state, "clients", api.clients().list(), Action::SetClients).await?;
            load(state, "roles", api.roles().list(), Action::SetRoles).await?;
            load(state, "jobs", api.jobs().list(), Action::SetJobs).await?;
        }
        Level::Resources => {
            load(state, "jobs", api.jobs().list(), Action::SetJobs).await?;
            load(state, "vendors", api.vendors().list(), Action::SetVendors).await?;
            load(state, "resources", api.resources().list(), Action::SetResources).await?;
        }
        Level::ResourceDetail => {
            load(state, "resources", api.resources().list(), Action::SetResources).await?;
            if let Some(resource_id) = &scope.resource_id {
                let owner = resource_id.clone();
                load(state, "rounds", api.rounds().list_for(resource_id), move |rounds| {
                    Action::SetRounds {
                        resource_id: owner,
                        rounds,
                    }
                })
                .await?;
            }
        }
        Level::Roles => {
            load(state, "roles", api.roles().list(), Action::SetRoles).await?;
        }
        Level::Users => {
            load(state, "users", api.users().list(), Action::SetUsers).await?;
        }
    }
    Ok(())
}

/// Fetches what a view shows, raising the session's loading flag meanwhile.
pub async fn refresh(
    state: &AppState,
    key: &SessionKey,
    level: Level,
    scope: &Scope,
) -> Result<(), AppError> {
    state.sessions.with(key, |s| s.ui.global_loading = true).await;
    let result = load_level(state, level, scope).await;
    state.sessions.with(key, |s| s.ui.global_loading = false).await;
    result
}

/// Builds the stored entity after a create: local defaults, overlaid by
/// what was sent, overlaid by whatever the upstream answered. The upstream
/// does not always return an id, so one is generated when missing.
pub fn merge_created<T: DeserializeOwned>(
    defaults: Map<String, Value>,
    payload: &Draft,
    response: Value,
) -> Result<T, AppError> {
    let mut merged = defaults;
    merged.extend(payload.clone());
    if let Value::Object(answer) = response {
        merged.extend(answer);
    }
    let has_id = match merged.get("id") {
        Some(Value::String(id)) => !id.is_empty(),
        Some(Value::Number(_)) => true,
        _ => false,
    };
    if !has_id {
        let id = Uuid::new_v4().to_string();
        warn!("upstream returned no id, using generated {id}");
        merged.insert("id".into(), Value::String(id));
    }
    if let Some(Value::Number(n)) = merged.get("id") {
        let id = n.to_string();
        merged.insert("id".into(), Value::String(id));
    }
    serde_json::from_value(Value::Object(merged))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("cannot build entity from response: {e}")))
}

/// The current entity with the submitted form applied on top, then the
/// upstream answer.
pub fn merge_updated<T: DeserializeOwned>(
    current: Value,
    patch: &Draft,
    response: Value,
) -> Result<T, AppError> {
    let mut merged = match current {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    merged.extend(patch.clone());
    if let Value::Object(answer) = response {
        merged.extend(answer);
    }
    serde_json::from_value(Value::Object(merged))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("cannot apply update: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::into_draft;
    use crate::models::{Job, JobStatus};
    use serde_json::json;

    #[test]
    fn test_merge_created_prefers_response_over_payload() {
        let defaults = into_draft(json!({ "resourcesCount": 0, "createdAt": "2024-01-01" }));
        let payload = into_draft(json!({
            "title": "QA Engineer", "clientId": "1", "roleId": "1",
            "description": "desc", "status": "Open"
        }));
        let job: Job = merge_created(defaults, &payload, json!({ "id": "55", "status": "Open" })).unwrap();
        assert_eq!(job.id, "55");
        assert_eq!(job.title, "QA Engineer");
        assert_eq!(job.status, JobStatus::Open);
        assert_eq!(job.created_at, "2024-01-01");
    }

    #[test]
    fn test_merge_created_generates_missing_id() {
        let payload = into_draft(json!({ "title": "T", "clientId": "1" }));
        let job: Job = merge_created(Map::new(), &payload, Value::Null).unwrap();
        assert!(Uuid::parse_str(&job.id).is_ok());

        let job: Job = merge_created(Map::new(), &payload, json!({ "id": 12 })).unwrap();
        assert_eq!(job.id, "12");
    }
}
