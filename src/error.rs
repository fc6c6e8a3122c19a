use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use snafu::Snafu;
use std::num::ParseIntError;

pub type RollcallResult<T> = Result<T, RollcallError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RollcallError {
    #[snafu(display("Error opening database"))]
    OpenDatabase { source: sqlx::Error },
    #[snafu(display("Error getting db connection"))]
    GetDatabaseConnection { source: sqlx::Error },
    #[snafu(display("Error making SQL query"))]
    MakeQuery { source: sqlx::Error },
    #[snafu(display("Error migrating DB schema"))]
    Migrate { source: sqlx::migrate::MigrateError },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse {}", name))]
    ParseNumber {
        source: ParseIntError,
        name: &'static str,
    },
    #[snafu(display("ROLLCALL_MAX_CONNECTIONS must be at least 1"))]
    NoConnectionsAllowed,
    #[snafu(display("Unable to read JSON request body"))]
    BadJsonBody { source: JsonRejection },
    #[snafu(display("Unable to find student with ID: {:?}", id))]
    MissingStudent { id: String },
}

impl From<JsonRejection> for RollcallError {
    fn from(source: JsonRejection) -> Self {
        Self::BadJsonBody { source }
    }
}

/// `axum::Json`, but rejections come back as [`RollcallError`]s.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(RollcallError))]
pub struct JsonBody<T>(pub T);

impl IntoResponse for RollcallError {
    fn into_response(self) -> Response {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found

        let (status_code, message) = match &self {
            Self::MissingStudent { .. } => (NF, "student not found"),
            Self::BadJsonBody { source } => (source.status(), "something went wrong"),
            Self::OpenDatabase { .. }
            | Self::GetDatabaseConnection { .. }
            | Self::MakeQuery { .. }
            | Self::Migrate { .. }
            | Self::BadEnvVar { .. }
            | Self::ParseNumber { .. }
            | Self::NoConnectionsAllowed => (ISE, "something went wrong"),
        };

        if status_code == NF {
            debug!(?self, "Not found");
        } else {
            error!(?self, "Error!");
        }

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}
