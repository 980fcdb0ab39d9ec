mod tracking;

use std::sync::Arc;

use axum::Router;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::main_lib::AppState;

pub use tracking::parse_tracking_query;

pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(tracking::router())
        .with_state(state)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
}
