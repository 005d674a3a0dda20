//! Create and update workflows for every entity form.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use super::{merge_created, merge_updated};
use crate::api_client::EntityApi;
use crate::errors::AppError;
use crate::forms::{
    into_draft, ClientForm, Draft, JobEditForm, JobForm, ResourceEditForm, ResourceForm,
    RoleForm, RoundForm, VendorForm,
};
use crate::models::{
    today, Client, Entity, EntityKind, InterviewRound, Job, Resource, Role, Vendor,
};
use crate::state::AppState;
use crate::store::{Action, Store};

type Lookup<T> = fn(&Store, &str) -> Option<T>;

fn defaults(fields: Value) -> Map<String, Value> {
    let mut map = into_draft(fields);
    map.insert("createdAt".into(), json!(today()));
    map
}

fn not_found(kind: EntityKind, id: &str) -> AppError {
    AppError::NotFound(format!("{} {id} not found", kind.label()))
}

fn to_json<T: Serialize>(entity: &T) -> Result<Value, AppError> {
    serde_json::to_value(entity).map_err(|e| AppError::Internal(e.into()))
}

async fn create_with<T>(
    state: &AppState,
    api: EntityApi<T>,
    defaults: Map<String, Value>,
    payload: Draft,
    add: fn(T) -> Action,
    lookup: Lookup<T>,
) -> Result<T, AppError>
where
    T: Entity + DeserializeOwned,
{
    let response = api.create(&payload).await?;
    let entity: T = merge_created(defaults, &payload, response)?;
    let id = entity.id().to_string();
    let mut store = state.store.write().await;
    store.apply(add(entity.clone()));
    Ok(lookup(&store, &id).unwrap_or(entity))
}

/// Sends the whole form, whatever the cached entity holds, so the last
/// submission wins upstream.
async fn update_with<T>(
    state: &AppState,
    kind: EntityKind,
    api: EntityApi<T>,
    id: &str,
    payload: Draft,
    update: fn(T) -> Action,
    lookup: Lookup<T>,
) -> Result<T, AppError>
where
    T: Entity + Serialize + DeserializeOwned,
{
    let current = lookup(&*state.store.read().await, id).ok_or_else(|| not_found(kind, id))?;
    let current_json = to_json(&current)?;
    debug!("updating {} {id} with {} field(s)", kind.label(), payload.len());
    let response = api.update(id, &payload).await?;
    let entity: T = merge_updated(current_json, &payload, response)?;
    let mut store = state.store.write().await;
    store.apply(update(entity.clone()));
    Ok(lookup(&store, id).unwrap_or(entity))
}

// ────────────────────────────────────────────────────────────────────────────
// Clients and vendors
// ────────────────────────────────────────────────────────────────────────────

pub async fn create_client(state: &AppState, form: &ClientForm) -> Result<Client, AppError> {
    let client = create_with(
        state,
        state.api.clients(),
        defaults(json!({ "jobsCount": 0, "resourcesCount": 0 })),
        form.payload(),
        Action::AddClient,
        |s, id| s.clients().get(id).cloned(),
    )
    .await?;
    info!("created client {} ({})", client.id, client.display_name());
    Ok(client)
}

pub async fn update_client(
    state: &AppState,
    id: &str,
    form: &ClientForm,
) -> Result<Client, AppError> {
    update_with(
        state,
        EntityKind::Client,
        state.api.clients(),
        id,
        form.payload(),
        Action::UpdateClient,
        |s, id| s.clients().get(id).cloned(),
    )
    .await
}

pub async fn create_vendor(state: &AppState, form: &VendorForm) -> Result<Vendor, AppError> {
    let vendor = create_with(
        state,
        state.api.vendors(),
        defaults(json!({ "resourcesCount": 0 })),
        form.payload(),
        Action::AddVendor,
        |s, id| s.vendors().get(id).cloned(),
    )
    .await?;
    info!("created vendor {} ({})", vendor.id, vendor.display_name());
    Ok(vendor)
}

pub async fn update_vendor(
    state: &AppState,
    id: &str,
    form: &VendorForm,
) -> Result<Vendor, AppError> {
    update_with(
        state,
        EntityKind::Vendor,
        state.api.vendors(),
        id,
        form.payload(),
        Action::UpdateVendor,
        |s, id| s.vendors().get(id).cloned(),
    )
    .await
}

// ────────────────────────────────────────────────────────────────────────────
// Jobs, resources and roles
// ────────────────────────────────────────────────────────────────────────────

pub async fn create_job(state: &AppState, form: &JobForm) -> Result<Job, AppError> {
    let job = create_with(
        state,
        state.api.jobs(),
        defaults(json!({ "resourcesCount": 0 })),
        form.payload(),
        Action::AddJob,
        |s, id| s.jobs().get(id).cloned(),
    )
    .await?;
    info!("created job {} ({}) for client {}", job.id, job.title, job.client_id);
    Ok(job)
}

pub async fn update_job(state: &AppState, id: &str, form: &JobEditForm) -> Result<Job, AppError> {
    update_with(
        state,
        EntityKind::Job,
        state.api.jobs(),
        id,
        form.payload(),
        Action::UpdateJob,
        |s, id| s.jobs().get(id).cloned(),
    )
    .await
}

pub async fn create_resource(state: &AppState, form: &ResourceForm) -> Result<Resource, AppError> {
    let resource = create_with(
        state,
        state.api.resources(),
        defaults(json!({ "roundsCount": 0 })),
        form.payload(),
        Action::AddResource,
        |s, id| s.resources().get(id).cloned(),
    )
    .await?;
    info!("created resource {} ({}) on job {}", resource.id, resource.name, resource.job_id);
    Ok(resource)
}

pub async fn update_resource(
    state: &AppState,
    id: &str,
    form: &ResourceEditForm,
) -> Result<Resource, AppError> {
    let mut resource = update_with(
        state,
        EntityKind::Resource,
        state.api.resources(),
        id,
        form.payload(),
        Action::UpdateResource,
        |s, id| s.resources().get(id).cloned(),
    )
    .await?;
    if resource.vendor_id.is_none() && resource.vendor_name.is_some() {
        resource.vendor_name = None;
        state
            .store
            .write()
            .await
            .apply(Action::UpdateResource(resource.clone()));
    }
    Ok(resource)
}

pub async fn create_role(state: &AppState, form: &RoleForm) -> Result<Role, AppError> {
    let role = create_with(
        state,
        state.api.roles(),
        defaults(json!({})),
        form.payload(),
        Action::AddRole,
        |s, id| s.roles().get(id).cloned(),
    )
    .await?;
    info!("created role {} ({})", role.id, role.name);
    Ok(role)
}

// ────────────────────────────────────────────────────────────────────────────
// Interview rounds
// ────────────────────────────────────────────────────────────────────────────

/// Schedules the next round of a resource. The round number continues the
/// resource's sequence; the store bumps `roundsCount` and `currentRound` in
/// the same action that adds the round.
pub async fn create_round(state: &AppState, form: &RoundForm) -> Result<InterviewRound, AppError> {
    let number = state
        .store
        .read()
        .await
        .next_round_number(&form.resource_id);
    let payload = form.payload(number);
    let response = state.api.rounds().create(&payload).await?;
    let round: InterviewRound = merge_created(defaults(json!({})), &payload, response)?;
    info!(
        "scheduled round {} ({}) for resource {}",
        round.round_number, round.round_type, round.resource_id
    );
    state
        .store
        .write()
        .await
        .apply(Action::AddRound(round.clone()));
    Ok(round)
}

pub async fn update_round(
    state: &AppState,
    id: &str,
    form: &RoundForm,
) -> Result<InterviewRound, AppError> {
    let current = state
        .store
        .read()
        .await
        .rounds()
        .get(id)
        .cloned()
        .ok_or_else(|| not_found(EntityKind::Round, id))?;
    let current_json = to_json(&current)?;
    let payload = form.payload(current.round_number);
    let response = state.api.rounds().update(id, &payload).await?;
    let round: InterviewRound = merge_updated(current_json, &payload, response)?;
    state
        .store
        .write()
        .await
        .apply(Action::UpdateRound(round.clone()));
    Ok(round)
}

pub async fn delete_round(state: &AppState, id: &str) -> Result<(), AppError> {
    if !state.store.read().await.rounds().contains(id) {
        return Err(not_found(EntityKind::Round, id));
    }
    state.api.rounds().remove(id).await?;
    state
        .store
        .write()
        .await
        .apply(Action::DeleteRound(id.to_string()));
    info!("removed round {id}");
    Ok(())
}
