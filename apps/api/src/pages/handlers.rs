use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::debug;

use super::{render, resolve_crumb, PageView};
use crate::desk;
use crate::errors::AppError;
use crate::models::Envelope;
use crate::navigation::{NavCommand, Page};
use crate::sessions::SessionKey;
use crate::state::AppState;

fn parse_page(slug: &str) -> Result<Page, AppError> {
    Page::from_slug(slug).ok_or_else(|| AppError::NotFound(format!("No page named '{slug}'")))
}

async fn current_view(state: &AppState, key: &SessionKey, page: Page) -> PageView {
    let (page_state, ui) = state
        .sessions
        .with(key, |s| (s.page(page).clone(), s.ui))
        .await;
    let store = state.store.read().await;
    render(&store, &page_state, ui)
}

async fn refreshed_view(
    state: &AppState,
    key: &SessionKey,
    page: Page,
) -> Result<PageView, AppError> {
    let nav = state.sessions.with(key, |s| s.page(page).nav.clone()).await;
    desk::refresh(state, key, nav.level(), &nav.scope()).await?;
    Ok(current_view(state, key, page).await)
}

/// GET /api/v1/pages/:page
pub async fn handle_get_page(
    State(state): State<AppState>,
    key: SessionKey,
    Path(page): Path<String>,
) -> Result<Json<Envelope<PageView>>, AppError> {
    let page = parse_page(&page)?;
    Ok(Json(Envelope::ok(refreshed_view(&state, &key, page).await?)))
}

/// POST /api/v1/pages/:page/navigate
pub async fn handle_navigate(
    State(state): State<AppState>,
    key: SessionKey,
    Path(page): Path<String>,
    Json(command): Json<NavCommand>,
) -> Result<Json<Envelope<PageView>>, AppError> {
    let page = parse_page(&page)?;
    debug!(?command, "navigate {}", page.slug());

    match command {
        NavCommand::Open { into, id } => {
            let nav = state.sessions.with(&key, |s| s.page(page).nav.clone()).await;
            let crumb = resolve_crumb(&*state.store.read().await, &nav, &id)?;
            state
                .sessions
                .with(&key, |s| {
                    let page_state = s.page(page);
                    page_state.nav.open(into, crumb)?;
                    page_state.reset_filters();
                    Ok::<_, AppError>(())
                })
                .await?;
        }
        NavCommand::Crumb { depth } => {
            state
                .sessions
                .with(&key, |s| {
                    let page_state = s.page(page);
                    page_state.nav.back_to(depth)?;
                    page_state.reset_filters();
                    Ok::<_, AppError>(())
                })
                .await?;
        }
        NavCommand::Home => {
            state
                .sessions
                .with(&key, |s| {
                    let page_state = s.page(page);
                    page_state.nav.home();
                    page_state.reset_filters();
                })
                .await;
        }
    }

    Ok(Json(Envelope::ok(refreshed_view(&state, &key, page).await?)))
}

#[derive(Debug, Deserialize)]
pub struct SetFilter {
    pub column: String,
    pub value: String,
}

/// PUT /api/v1/pages/:page/filters
pub async fn handle_set_filter(
    State(state): State<AppState>,
    key: SessionKey,
    Path(page): Path<String>,
    Json(req): Json<SetFilter>,
) -> Result<Json<Envelope<PageView>>, AppError> {
    let page = parse_page(&page)?;
    state
        .sessions
        .with(&key, |s| s.page(page).table.set_filter(req.column, req.value))
        .await;
    Ok(Json(Envelope::ok(current_view(&state, &key, page).await)))
}

/// DELETE /api/v1/pages/:page/filters/:column
pub async fn handle_clear_filter(
    State(state): State<AppState>,
    key: SessionKey,
    Path((page, column)): Path<(String, String)>,
) -> Result<Json<Envelope<PageView>>, AppError> {
    let page = parse_page(&page)?;
    state
        .sessions
        .with(&key, |s| s.page(page).table.clear_filter(&column))
        .await;
    Ok(Json(Envelope::ok(current_view(&state, &key, page).await)))
}

/// POST /api/v1/pages/:page/filters/:column/toggle
pub async fn handle_toggle_filter(
    State(state): State<AppState>,
    key: SessionKey,
    Path((page, column)): Path<(String, String)>,
) -> Result<Json<Envelope<PageView>>, AppError> {
    let page = parse_page(&page)?;
    state
        .sessions
        .with(&key, |s| s.page(page).table.toggle_popover(&column))
        .await;
    Ok(Json(Envelope::ok(current_view(&state, &key, page).await)))
}
