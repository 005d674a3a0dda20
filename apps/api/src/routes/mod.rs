pub mod health;
pub mod ui;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::drawer::handlers as drawers;
use crate::forms::handlers as forms;
use crate::pages::handlers as pages;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Pages
        .route("/api/v1/pages/:page", get(pages::handle_get_page))
        .route("/api/v1/pages/:page/navigate", post(pages::handle_navigate))
        .route("/api/v1/pages/:page/filters", put(pages::handle_set_filter))
        .route(
            "/api/v1/pages/:page/filters/:column",
            delete(pages::handle_clear_filter),
        )
        .route(
            "/api/v1/pages/:page/filters/:column/toggle",
            post(pages::handle_toggle_filter),
        )
        // Drawers
        .route(
            "/api/v1/drawers",
            get(drawers::handle_list_drawers)
                .post(drawers::handle_open_drawer)
                .delete(drawers::handle_close_all_drawers),
        )
        .route("/api/v1/drawers/:handle", delete(drawers::handle_close_drawer))
        .route(
            "/api/v1/drawers/:handle/draft",
            patch(drawers::handle_update_draft),
        )
        .route(
            "/api/v1/drawers/:handle/attachments",
            post(drawers::handle_upload_attachment),
        )
        .route(
            "/api/v1/drawers/:handle/attachments/:index",
            delete(drawers::handle_remove_attachment),
        )
        // Forms
        .route("/api/v1/validate/:form", post(forms::handle_validate))
        .route("/api/v1/forms/clients", post(forms::handle_create_client))
        .route("/api/v1/forms/clients/:id", patch(forms::handle_update_client))
        .route("/api/v1/forms/vendors", post(forms::handle_create_vendor))
        .route("/api/v1/forms/vendors/:id", patch(forms::handle_update_vendor))
        .route("/api/v1/forms/jobs", post(forms::handle_create_job))
        .route("/api/v1/forms/jobs/:id", patch(forms::handle_update_job))
        .route("/api/v1/forms/resources", post(forms::handle_create_resource))
        .route(
            "/api/v1/forms/resources/:id",
            patch(forms::handle_update_resource),
        )
        .route("/api/v1/forms/roles", post(forms::handle_create_role))
        .route("/api/v1/forms/rounds", post(forms::handle_create_round))
        .route(
            "/api/v1/forms/rounds/:id",
            patch(forms::handle_update_round).delete(forms::handle_delete_round),
        )
        .route(
            "/api/v1/forms/users/:id/roles",
            post(forms::handle_assign_roles),
        )
        // UI flags
        .route(
            "/api/v1/ui",
            get(ui::handle_get_ui).put(ui::handle_set_ui),
        )
        .route("/api/v1/ui/sidebar/toggle", post(ui::handle_toggle_sidebar))
        // Attachments travel inline; size is the upstream's call.
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}
