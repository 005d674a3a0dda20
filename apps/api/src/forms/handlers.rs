use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::{parse, validate_draft, Draft, EntityForm, FieldErrors, FormKind};
use crate::desk::{self, AssignmentStatus, RoleAssignmentOutcome};
use crate::drawer::{DrawerError, DrawerHandle, ReturnSlot};
use crate::errors::AppError;
use crate::models::{Client, Entity, Envelope, InterviewRound, Job, Resource, Role, Vendor};
use crate::sessions::SessionKey;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DrawerQuery {
    /// Drawer the form was submitted from; closed on success.
    pub drawer: Option<DrawerHandle>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submitted<T> {
    pub entity: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed: Option<DrawerHandle>,
    /// Parent drawer field that received the new id (inline creation).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_to: Option<ReturnSlot>,
}

#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: FieldErrors,
}

/// The body's draft, or the submitting drawer's draft when the body is `{}`.
async fn load_draft(
    state: &AppState,
    key: &SessionKey,
    query: &DrawerQuery,
    draft: Draft,
) -> Result<Draft, AppError> {
    match query.drawer {
        Some(handle) if draft.is_empty() => Ok(state
            .sessions
            .with(key, |s| s.drawers.get(handle).map(|c| c.draft.clone()))
            .await?),
        _ => Ok(draft),
    }
}

async fn parse_form<F: EntityForm>(state: &AppState, draft: &Draft) -> Result<F, AppError> {
    let store = state.store.read().await;
    parse::<F>(draft, &store).map_err(AppError::Validation)
}

/// Closes the submitting drawer and hands the new id to its parent drawer
/// when it was opened for inline creation.
async fn finish<T: Entity>(
    state: &AppState,
    key: &SessionKey,
    query: &DrawerQuery,
    entity: T,
) -> Result<Submitted<T>, AppError> {
    let Some(handle) = query.drawer else {
        return Ok(Submitted {
            entity,
            closed: None,
            delivered_to: None,
        });
    };
    let id = entity.id().to_string();
    let (closed, delivered_to) = state
        .sessions
        .with(key, |s| match s.drawers.close(handle) {
            Ok(content) => {
                let delivered = content
                    .return_to
                    .filter(|slot| s.drawers.deliver(slot, &id));
                Ok((Some(handle), delivered))
            }
            // closed by the user while the request was in flight
            Err(DrawerError::NotOpen(_)) => Ok((None, None)),
            Err(e) => Err(e),
        })
        .await?;
    if let Some(slot) = &delivered_to {
        info!("delivered {id} to drawer {} field {}", slot.drawer, slot.field);
    }
    Ok(Submitted {
        entity,
        closed,
        delivered_to,
    })
}

type Created<T> = (StatusCode, Json<Envelope<Submitted<T>>>);
type Updated<T> = Json<Envelope<Submitted<T>>>;

/// POST /api/v1/validate/:form
pub async fn handle_validate(
    State(state): State<AppState>,
    Path(form): Path<String>,
    Json(draft): Json<Draft>,
) -> Result<Json<Envelope<ValidationReport>>, AppError> {
    let kind = FormKind::from_slug(&form)
        .ok_or_else(|| AppError::NotFound(format!("No form named '{form}'")))?;
    let errors = validate_draft(kind, &draft, &*state.store.read().await);
    Ok(Json(Envelope::ok(ValidationReport {
        valid: errors.is_empty(),
        errors,
    })))
}

/// POST /api/v1/forms/clients
pub async fn handle_create_client(
    State(state): State<AppState>,
    key: SessionKey,
    Query(query): Query<DrawerQuery>,
    Json(draft): Json<Draft>,
) -> Result<Created<Client>, AppError> {
    let draft = load_draft(&state, &key, &query, draft).await?;
    let form = parse_form(&state, &draft).await?;
    let client = desk::submit::create_client(&state, &form).await?;
    let done = finish(&state, &key, &query, client).await?;
    Ok((StatusCode::CREATED, Json(Envelope::ok(done))))
}

/// PATCH /api/v1/forms/clients/:id
pub async fn handle_update_client(
    State(state): State<AppState>,
    key: SessionKey,
    Path(id): Path<String>,
    Query(query): Query<DrawerQuery>,
    Json(draft): Json<Draft>,
) -> Result<Updated<Client>, AppError> {
    let draft = load_draft(&state, &key, &query, draft).await?;
    let form = parse_form(&state, &draft).await?;
    let client = desk::submit::update_client(&state, &id, &form).await?;
    Ok(Json(Envelope::ok(finish(&state, &key, &query, client).await?)))
}

/// POST /api/v1/forms/vendors
pub async fn handle_create_vendor(
    State(state): State<AppState>,
    key: SessionKey,
    Query(query): Query<DrawerQuery>,
    Json(draft): Json<Draft>,
) -> Result<Created<Vendor>, AppError> {
    let draft = load_draft(&state, &key, &query, draft).await?;
    let form = parse_form(&state, &draft).await?;
    let vendor = desk::submit::create_vendor(&state, &form).await?;
    let done = finish(&state, &key, &query, vendor).await?;
    Ok((StatusCode::CREATED, Json(Envelope::ok(done))))
}

/// PATCH /api/v1/forms/vendors/:id
pub async fn handle_update_vendor(
    State(state): State<AppState>,
    key: SessionKey,
    Path(id): Path<String>,
    Query(query): Query<DrawerQuery>,
    Json(draft): Json<Draft>,
) -> Result<Updated<Vendor>, AppError> {
    let draft = load_draft(&state, &key, &query, draft).await?;
    let form = parse_form(&state, &draft).await?;
    let vendor = desk::submit::update_vendor(&state, &id, &form).await?;
    Ok(Json(Envelope::ok(finish(&state, &key, &query, vendor).await?)))
}

/// POST /api/v1/forms/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    key: SessionKey,
    Query(query): Query<DrawerQuery>,
    Json(draft): Json<Draft>,
) -> Result<Created<Job>, AppError> {
    let draft = load_draft(&state, &key, &query, draft).await?;
    let form = parse_form(&state, &draft).await?;
    let job = desk::submit::create_job(&state, &form).await?;
    let done = finish(&state, &key, &query, job).await?;
    Ok((StatusCode::CREATED, Json(Envelope::ok(done))))
}

/// PATCH /api/v1/forms/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    key: SessionKey,
    Path(id): Path<String>,
    Query(query): Query<DrawerQuery>,
    Json(draft): Json<Draft>,
) -> Result<Updated<Job>, AppError> {
    let draft = load_draft(&state, &key, &query, draft).await?;
    let form = parse_form(&state, &draft).await?;
    let job = desk::submit::update_job(&state, &id, &form).await?;
    Ok(Json(Envelope::ok(finish(&state, &key, &query, job).await?)))
}

/// POST /api/v1/forms/resources
pub async fn handle_create_resource(
    State(state): State<AppState>,
    key: SessionKey,
    Query(query): Query<DrawerQuery>,
    Json(draft): Json<Draft>,
) -> Result<Created<Resource>, AppError> {
    let draft = load_draft(&state, &key, &query, draft).await?;
    let form = parse_form(&state, &draft).await?;
    let resource = desk::submit::create_resource(&state, &form).await?;
    let done = finish(&state, &key, &query, resource).await?;
    Ok((StatusCode::CREATED, Json(Envelope::ok(done))))
}

/// PATCH /api/v1/forms/resources/:id
pub async fn handle_update_resource(
    State(state): State<AppState>,
    key: SessionKey,
    Path(id): Path<String>,
    Query(query): Query<DrawerQuery>,
    Json(draft): Json<Draft>,
) -> Result<Updated<Resource>, AppError> {
    let draft = load_draft(&state, &key, &query, draft).await?;
    let form = parse_form(&state, &draft).await?;
    let resource = desk::submit::update_resource(&state, &id, &form).await?;
    Ok(Json(Envelope::ok(finish(&state, &key, &query, resource).await?)))
}

/// POST /api/v1/forms/roles
pub async fn handle_create_role(
    State(state): State<AppState>,
    key: SessionKey,
    Query(query): Query<DrawerQuery>,
    Json(draft): Json<Draft>,
) -> Result<Created<Role>, AppError> {
    let draft = load_draft(&state, &key, &query, draft).await?;
    let form = parse_form(&state, &draft).await?;
    let role = desk::submit::create_role(&state, &form).await?;
    let done = finish(&state, &key, &query, role).await?;
    Ok((StatusCode::CREATED, Json(Envelope::ok(done))))
}

/// POST /api/v1/forms/rounds
pub async fn handle_create_round(
    State(state): State<AppState>,
    key: SessionKey,
    Query(query): Query<DrawerQuery>,
    Json(draft): Json<Draft>,
) -> Result<Created<InterviewRound>, AppError> {
    let draft = load_draft(&state, &key, &query, draft).await?;
    let form = parse_form(&state, &draft).await?;
    let round = desk::submit::create_round(&state, &form).await?;
    let done = finish(&state, &key, &query, round).await?;
    Ok((StatusCode::CREATED, Json(Envelope::ok(done))))
}

/// PATCH /api/v1/forms/rounds/:id
pub async fn handle_update_round(
    State(state): State<AppState>,
    key: SessionKey,
    Path(id): Path<String>,
    Query(query): Query<DrawerQuery>,
    Json(draft): Json<Draft>,
) -> Result<Updated<InterviewRound>, AppError> {
    let draft = load_draft(&state, &key, &query, draft).await?;
    let form = parse_form(&state, &draft).await?;
    let round = desk::submit::update_round(&state, &id, &form).await?;
    Ok(Json(Envelope::ok(finish(&state, &key, &query, round).await?)))
}

/// DELETE /api/v1/forms/rounds/:id
pub async fn handle_delete_round(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<serde_json::Value>>, AppError> {
    desk::submit::delete_round(&state, &id).await?;
    Ok(Json(Envelope::ok_with_message(json!({ "id": id }), "Round deleted")))
}

/// POST /api/v1/forms/users/:id/roles
///
/// Always answers 200 with the outcome; `success` is false unless every
/// selected role was granted.
pub async fn handle_assign_roles(
    State(state): State<AppState>,
    key: SessionKey,
    Path(user_id): Path<String>,
    Query(query): Query<DrawerQuery>,
    Json(draft): Json<Draft>,
) -> Result<Json<Envelope<RoleAssignmentOutcome>>, AppError> {
    let mut draft = load_draft(&state, &key, &query, draft).await?;
    draft.insert("userId".into(), json!(user_id));
    let form: super::RoleAssignmentForm = parse_form(&state, &draft).await?;
    let outcome = desk::assign_roles(&state, &user_id, &form.access_roles()).await?;

    let complete = outcome.status == AssignmentStatus::Complete;
    if complete {
        if let Some(handle) = query.drawer {
            match state.sessions.with(&key, |s| s.drawers.close(handle)).await {
                Ok(_) | Err(DrawerError::NotOpen(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(Json(Envelope {
        message: Some(outcome.summary()),
        data: Some(outcome),
        success: complete,
    }))
}
