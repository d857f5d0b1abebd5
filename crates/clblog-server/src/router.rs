use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all clblog endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handler::home))
        .route("/login", post(handler::login))
        .route("/logout", get(handler::logout))
        .route("/blogs", get(handler::list_posts))
        .route("/blog", post(handler::create_post))
        .route(
            "/blog/:slug",
            get(handler::get_post)
                .put(handler::edit_post)
                .delete(handler::delete_post),
        )
        .route(
            "/blog/:slug/comments",
            get(handler::list_top_comments).post(handler::create_top_comment),
        )
        .route(
            "/blog/:slug/comments/:parent",
            get(handler::list_replies).post(handler::create_reply),
        )
        .route("/comment/:slug", delete(handler::delete_comment))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
