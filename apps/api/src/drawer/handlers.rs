use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use super::{DrawerContent, DrawerHandle, DrawerView, ReturnSlot};
use crate::errors::AppError;
use crate::forms::{Draft, FormKind};
use crate::models::{Attachment, Envelope};
use crate::sessions::SessionKey;
use crate::state::AppState;

const DEFAULT_FILE_FIELD: &str = "attachments";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenDrawer {
    pub title: Option<String>,
    pub form: FormKind,
    pub target: Option<String>,
    #[serde(default)]
    pub draft: Draft,
    pub return_to: Option<ReturnSlot>,
}

/// GET /api/v1/drawers
pub async fn handle_list_drawers(
    State(state): State<AppState>,
    key: SessionKey,
) -> Json<Envelope<Vec<DrawerView>>> {
    let views = state.sessions.with(&key, |s| s.drawers.views()).await;
    Json(Envelope::ok(views))
}

/// POST /api/v1/drawers
pub async fn handle_open_drawer(
    State(state): State<AppState>,
    key: SessionKey,
    Json(req): Json<OpenDrawer>,
) -> Result<Json<Envelope<DrawerView>>, AppError> {
    let view = state
        .sessions
        .with(&key, |s| {
            if let Some(slot) = &req.return_to {
                s.drawers.get(slot.drawer)?;
            }
            let title = req.title.unwrap_or_else(|| req.form.title().to_string());
            let handle = s.drawers.open(
                title,
                DrawerContent {
                    form: req.form,
                    target: req.target,
                    draft: req.draft,
                    return_to: req.return_to,
                },
            );
            s.drawers.view(handle)
        })
        .await?;
    info!("opened drawer {} ({})", view.handle, view.content.form.slug());
    Ok(Json(Envelope::ok(view)))
}

/// DELETE /api/v1/drawers
pub async fn handle_close_all_drawers(
    State(state): State<AppState>,
    key: SessionKey,
) -> Json<Envelope<Vec<DrawerView>>> {
    state.sessions.with(&key, |s| s.drawers.close_all()).await;
    Json(Envelope::ok(Vec::new()))
}

/// DELETE /api/v1/drawers/:handle
pub async fn handle_close_drawer(
    State(state): State<AppState>,
    key: SessionKey,
    Path(handle): Path<DrawerHandle>,
) -> Result<Json<Envelope<Vec<DrawerView>>>, AppError> {
    let views = state
        .sessions
        .with(&key, |s| {
            s.drawers.close(handle)?;
            Ok::<_, AppError>(s.drawers.views())
        })
        .await?;
    Ok(Json(Envelope::ok(views)))
}

/// PATCH /api/v1/drawers/:handle/draft
pub async fn handle_update_draft(
    State(state): State<AppState>,
    key: SessionKey,
    Path(handle): Path<DrawerHandle>,
    Json(fields): Json<Draft>,
) -> Result<Json<Envelope<DrawerView>>, AppError> {
    let view = state
        .sessions
        .with(&key, |s| {
            s.drawers.merge_draft(handle, fields)?;
            s.drawers.view(handle)
        })
        .await?;
    Ok(Json(Envelope::ok(view)))
}

/// POST /api/v1/drawers/:handle/attachments
///
/// Multipart body: a `file` part plus an optional `field` text part naming
/// the draft field (`attachments` when absent).
pub async fn handle_upload_attachment(
    State(state): State<AppState>,
    key: SessionKey,
    Path(handle): Path<DrawerHandle>,
    mut multipart: Multipart,
) -> Result<Json<Envelope<DrawerView>>, AppError> {
    let mut field_name = DEFAULT_FILE_FIELD.to_string();
    let mut file = None;

    while let Some(part) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        match part.name() {
            Some("field") => {
                field_name = part
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
            }
            Some("file") => {
                let filename = part.file_name().unwrap_or("upload").to_string();
                let filetype = part
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = part
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some(Attachment::encode(filename, filetype, &bytes));
            }
            _ => {}
        }
    }

    let attachment =
        file.ok_or_else(|| AppError::BadRequest("Missing 'file' part".to_string()))?;
    let filename = attachment.filename.clone();
    let view = state
        .sessions
        .with(&key, |s| {
            s.drawers.push_attachment(handle, &field_name, attachment)?;
            s.drawers.view(handle)
        })
        .await?;
    info!("attached {filename} to drawer {handle} ({field_name})");
    Ok(Json(Envelope::ok(view)))
}

#[derive(Debug, Deserialize)]
pub struct FileFieldQuery {
    pub field: Option<String>,
}

/// DELETE /api/v1/drawers/:handle/attachments/:index
pub async fn handle_remove_attachment(
    State(state): State<AppState>,
    key: SessionKey,
    Path((handle, index)): Path<(DrawerHandle, usize)>,
    Query(query): Query<FileFieldQuery>,
) -> Result<Json<Envelope<DrawerView>>, AppError> {
    let field = query
        .field
        .unwrap_or_else(|| DEFAULT_FILE_FIELD.to_string());
    let view = state
        .sessions
        .with(&key, |s| {
            s.drawers.remove_attachment(handle, &field, index)?;
            s.drawers.view(handle)
        })
        .await?;
    Ok(Json(Envelope::ok(view)))
}
