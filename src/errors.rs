use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Application error vocabulary. Every variant that belongs to the public
/// taxonomy carries a stable string code exposed on the wire as `#<code>`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("from must be between 1 and 4")]
    FromOutOfRange,

    #[error("to must be at least from and at most 4")]
    ToOutOfRange,

    #[error("payment amount must be positive")]
    MinAmount,

    #[error("field has the wrong type: {0}")]
    InvalidField(String),

    #[error("personal info must be a JSON object")]
    InvalidPersonalInfo,

    #[error("encrypted personal info is not a valid encoded payload")]
    InvalidEncryptedPersonalInfo,

    #[error("eth price must be a positive number")]
    InvalidEthPrice,

    #[error("a booking with this hash already exists")]
    DuplicateBooking,

    #[error("booking not found")]
    NotFound,

    #[error("price oracle error: {0}")]
    Oracle(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable code for taxonomy errors; infrastructure failures (oracle,
    /// database) have none and are reported with their message only.
    pub fn code(&self) -> Option<String> {
        match self {
            AppError::MissingField(field) => Some(format!("no{}", capitalize(field))),
            AppError::FromOutOfRange => Some("fromOutOfRange".to_string()),
            AppError::ToOutOfRange => Some("toOutOfRange".to_string()),
            AppError::MinAmount => Some("minAmount".to_string()),
            AppError::InvalidField(field) => Some(format!("invalid{}", capitalize(field))),
            AppError::InvalidPersonalInfo => Some("invalidPersonalInfo".to_string()),
            AppError::InvalidEncryptedPersonalInfo => {
                Some("invalidEncryptedPersonalInfo".to_string())
            }
            AppError::InvalidEthPrice => Some("invalidEthPrice".to_string()),
            AppError::DuplicateBooking => Some("duplicateBooking".to_string()),
            AppError::NotFound => Some("notFound".to_string()),
            AppError::Oracle(_) | AppError::Database(_) | AppError::Internal(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MissingField(_)
            | AppError::FromOutOfRange
            | AppError::ToOutOfRange
            | AppError::MinAmount
            | AppError::InvalidField(_)
            | AppError::InvalidPersonalInfo
            | AppError::InvalidEncryptedPersonalInfo
            | AppError::InvalidEthPrice => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::DuplicateBooking => StatusCode::CONFLICT,
            AppError::Oracle(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match self.code() {
            Some(code) => {
                serde_json::json!({ "code": format!("#{code}"), "error": self.to_string() })
            }
            None => serde_json::json!({ "error": self.to_string() }),
        };
        (status, axum::Json(body)).into_response()
    }
}

/// Maps persistence-layer failures into the application vocabulary. The
/// storage layer enforces uniqueness of `bookingHash`; a constraint violation
/// there means a duplicate booking. Failures carrying no field information
/// pass through unchanged.
pub fn normalize_db_error(err: rusqlite::Error) -> AppError {
    match err {
        // Only the uniqueness violation is a duplicate; other constraint
        // failures fall through to the passthrough arm.
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            AppError::DuplicateBooking
        }
        rusqlite::Error::QueryReturnedNoRows => AppError::NotFound,
        rusqlite::Error::InvalidColumnType(_, name, _) => {
            AppError::InvalidField(field_name_for_column(&name))
        }
        other => AppError::Database(other),
    }
}

/// Column names are snake_case in sqlite but the error codes use the wire
/// field names.
fn field_name_for_column(column: &str) -> String {
    match column {
        "from_night" => "from".to_string(),
        "to_night" => "to".to_string(),
        _ => to_camel(column),
    }
}

fn to_camel(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut upper_next = false;
    for c in s.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
