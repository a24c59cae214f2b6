//! Application router configuration with the token-guarded page and API routes.

use axum::{
    Router, middleware,
    routing::{get, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    account::get_index_page,
    auth::{token_guard, token_guard_hx},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    transaction::{
        delete_transaction_endpoint, get_delete_transaction_page, get_edit_transaction_page,
        get_statement_page, get_transaction_attachment, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new().route(
        endpoints::INTERNAL_ERROR_VIEW,
        get(get_internal_server_error_page),
    );

    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::STATEMENT_VIEW, get(get_statement_page))
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(
            endpoints::DELETE_TRANSACTION_VIEW,
            get(get_delete_transaction_page),
        )
        .route(
            endpoints::TRANSACTION_ATTACHMENT,
            get(get_transaction_attachment),
        )
        .layer(middleware::from_fn(token_guard));

    // These routes are called by HTMX, so a missing token is reported as an alert.
    let api_routes = Router::new()
        .route(
            endpoints::TRANSACTION_API,
            put(update_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .layer(middleware::from_fn(token_guard_hx));

    page_routes
        .merge(api_routes)
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}
