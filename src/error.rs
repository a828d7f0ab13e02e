use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use snafu::Snafu;
use uuid::Uuid;

pub type RosterResult<T> = Result<T, RosterError>;

/// The four ways a request can fail, as seen by a caller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Transient,
}

impl ErrorKind {
    pub const fn status_code(self) -> StatusCode {
        match self {
            Self::Validation | Self::Conflict => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Transient => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn from_status_code(status: StatusCode) -> Self {
        match status {
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::CONFLICT => Self::Conflict,
            s if s.is_client_error() => Self::Validation,
            _ => Self::Transient,
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RosterError {
    #[snafu(display("Error opening database"))]
    OpenDatabase { source: sqlx::Error },
    #[snafu(display("Error making SQL query"))]
    MakeQuery { source: sqlx::Error },
    #[snafu(display("Error migrating DB schema"))]
    MigrateError { source: sqlx::migrate::MigrateError },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("{} is required", field))]
    MissingField { field: &'static str },
    #[snafu(display("Contact number must be exactly 10 digits, got {:?}", original))]
    InvalidContactNumber { original: String },
    #[snafu(display("Invalid email address {:?}", original))]
    InvalidEmail {
        source: email_address::Error,
        original: String,
    },
    #[snafu(display("Unknown gender {:?}", original))]
    InvalidGender { original: String },
    #[snafu(display("Unknown department {:?}", original))]
    InvalidDepartment { original: String },
    #[snafu(context(false), display("Malformed request body"))]
    MalformedPayload { source: JsonRejection },
    #[snafu(display("Email ID {} already exists", email))]
    DuplicateEmail { email: String },
    #[snafu(display("Unable to find student with ID: {}", id))]
    MissingStudent { id: Uuid },
    #[snafu(display("Unable to find student with ID: {}", original))]
    UnknownId {
        source: uuid::Error,
        original: String,
    },
    #[snafu(display("Error talking to the student API"))]
    Request { source: reqwest::Error },
    #[snafu(display("{}", message))]
    Api {
        status: u16,
        kind: ErrorKind,
        message: String,
    },
}

impl RosterError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingField { .. }
            | Self::InvalidContactNumber { .. }
            | Self::InvalidEmail { .. }
            | Self::InvalidGender { .. }
            | Self::InvalidDepartment { .. }
            | Self::MalformedPayload { .. } => ErrorKind::Validation,
            Self::DuplicateEmail { .. } => ErrorKind::Conflict,
            Self::MissingStudent { .. } | Self::UnknownId { .. } => ErrorKind::NotFound,
            Self::Api { kind, .. } => *kind,
            Self::OpenDatabase { .. }
            | Self::MakeQuery { .. }
            | Self::MigrateError { .. }
            | Self::BadEnvVar { .. }
            | Self::Request { .. } => ErrorKind::Transient,
        }
    }

    /// What a user gets to see. Store and network details stay in the logs.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Transient if !matches!(self, Self::Api { .. }) => {
                "Something went wrong! Try again later".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Wire shape of every error the REST layer returns.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub kind: ErrorKind,
}

impl IntoResponse for RosterError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        error!(?self, ?kind, "Error!");

        let body = ErrorBody {
            message: self.public_message(),
            kind,
        };
        (kind.status_code(), Json(body)).into_response()
    }
}
