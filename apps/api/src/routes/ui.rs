use axum::{extract::State, Json};
use serde::Deserialize;

use crate::models::Envelope;
use crate::sessions::{SessionKey, UiFlags};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiPatch {
    pub global_loading: Option<bool>,
    pub sidebar_collapsed: Option<bool>,
}

/// GET /api/v1/ui
pub async fn handle_get_ui(
    State(state): State<AppState>,
    key: SessionKey,
) -> Json<Envelope<UiFlags>> {
    Json(Envelope::ok(state.sessions.with(&key, |s| s.ui).await))
}

/// PUT /api/v1/ui
/// Fields left out of the body keep their current value.
pub async fn handle_set_ui(
    State(state): State<AppState>,
    key: SessionKey,
    Json(patch): Json<UiPatch>,
) -> Json<Envelope<UiFlags>> {
    let flags = state
        .sessions
        .with(&key, |s| {
            if let Some(on) = patch.sidebar_collapsed {
                s.ui.sidebar_collapsed = on;
            }
            if let Some(on) = patch.global_loading {
                s.ui.global_loading = on;
            }
            s.ui
        })
        .await;
    Json(Envelope::ok(flags))
}

/// POST /api/v1/ui/sidebar/toggle
pub async fn handle_toggle_sidebar(
    State(state): State<AppState>,
    key: SessionKey,
) -> Json<Envelope<UiFlags>> {
    let flags = state
        .sessions
        .with(&key, |s| {
            s.ui.sidebar_collapsed = !s.ui.sidebar_collapsed;
            s.ui
        })
        .await;
    Json(Envelope::ok(flags))
}
