use crate::{
    data::{
        pagination::PageRequest,
        student::{NewStudent, Student, StudentUpdate},
    },
    error::{JsonBody, RollcallError, RollcallResult},
    state::RollcallState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::collections::HashMap;

pub async fn get_students(
    State(state): State<RollcallState>,
    Query(params): Query<HashMap<String, String>>,
) -> RollcallResult<Json<Vec<Student>>> {
    let request = PageRequest::from_raw(
        params.get("page").map(String::as_str),
        params.get("search").map(String::as_str),
    );
    debug!(page = request.page(), search = ?request.search(), "Fetching page of students");

    let students = state.store().get_page(&request).await?;
    Ok(Json(students))
}

pub async fn get_student(
    State(state): State<RollcallState>,
    Path(id): Path<String>,
) -> RollcallResult<Json<Student>> {
    let Some(student) = state.store().get_by_id(&id).await? else {
        return Err(RollcallError::MissingStudent { id });
    };

    Ok(Json(student))
}

pub async fn post_student(
    State(state): State<RollcallState>,
    JsonBody(new_student): JsonBody<NewStudent>,
) -> RollcallResult<StatusCode> {
    let id = state.store().insert(new_student).await?;
    info!(?id, "Created student");

    Ok(StatusCode::CREATED)
}

/// Succeeds whether or not a student had that id.
pub async fn put_student(
    State(state): State<RollcallState>,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<StudentUpdate>,
) -> RollcallResult<StatusCode> {
    let affected = state.store().update(&id, update).await?;
    debug!(?id, affected, "Updated student");

    Ok(StatusCode::NO_CONTENT)
}

/// Succeeds whether or not a student had that id.
pub async fn delete_student(
    State(state): State<RollcallState>,
    Path(id): Path<String>,
) -> RollcallResult<StatusCode> {
    let affected = state.store().remove(&id).await?;
    debug!(?id, affected, "Deleted student");

    Ok(StatusCode::NO_CONTENT)
}
