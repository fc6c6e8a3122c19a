use crate::{
    routes::{
        index::get_index_route,
        students::{delete_student, get_student, get_students, post_student, put_student},
    },
    state::RollcallState,
};
use axum::{Router, routing::get};
use tower_http::{
    compression::CompressionLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
};

pub mod index;
pub mod students;

const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn router(state: RollcallState) -> Router {
    Router::new()
        .route("/", get(get_index_route))
        .route("/students", get(get_students).post(post_student))
        .route(
            "/students/{id}",
            get(get_student).put(put_student).delete(delete_student),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
