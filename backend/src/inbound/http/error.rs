//! Domain errors as HTTP responses.
//!
//! Every failure leaves the API as the same JSON shape with a status derived
//! from its [`ErrorCode`]. Redemption failures keep their `details.code`
//! reason so scanners can show why a token was refused. Server-side failures
//! lose their message and details before leaving the process.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const INTERNAL_MESSAGE: &str = "Internal server error";
const UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable";

const fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict | ErrorCode::InventoryExhausted => StatusCode::CONFLICT,
        ErrorCode::RestrictionViolation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Payload sent to the client. Adapter messages on 5xx responses can
/// contain connection strings or SQL, so they are replaced.
fn client_payload(error: &Error) -> Error {
    let public_message = match error.code() {
        ErrorCode::InternalError => INTERNAL_MESSAGE,
        ErrorCode::ServiceUnavailable => UNAVAILABLE_MESSAGE,
        _ => return error.clone(),
    };
    let payload = Error::new(error.code(), public_message);
    match error.trace_id() {
        Some(id) => payload.with_trace_id(id.to_owned()),
        None => payload,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(
                code = self.code().as_str(),
                trace_id = ?self.trace_id(),
                message = %self,
                "request failed"
            );
        }

        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(client_payload(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        warn!(error = %err, "framework error surfaced from a handler");
        Error::internal(INTERNAL_MESSAGE)
    }
}
