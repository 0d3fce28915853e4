//! Common helper functions for the Lambda handlers.
//!
//! Responses follow the API Gateway proxy shape: a status code and a body
//! holding a JSON string.

use lambda_runtime::Error;
use serde_json::{Value, json};
use tracing::error;

use crate::errors::HookError;

// ============================================================================
// Response Builders
// ============================================================================

/// Returns a 200 OK response wrapping the destination's response.
#[must_use]
pub fn ok_response(response: &Value) -> Value {
    json!({
        "statusCode": 200,
        "body": json!({ "result": "success", "response": response }).to_string()
    })
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json!({
        "statusCode": status_code,
        "body": json!({ "result": "error", "message": message }).to_string()
    })
}

/// Turn the outcome of an invocation into the Lambda result.
///
/// A payload that is not a usable webhook is answered with `400`; every
/// other error fails the invocation.
///
/// # Errors
///
/// Returns the [`HookError`] as a Lambda error unless it is a client error.
pub fn respond(outcome: Result<Value, HookError>) -> Result<Value, Error> {
    match outcome {
        Ok(response) => Ok(ok_response(&response)),
        Err(e) if e.is_client_error() => {
            error!("{}", e);
            Ok(err_response(400, &e.to_string()))
        }
        Err(e) => {
            error!("Invocation failed: {}", e);
            Err(Error::from(e))
        }
    }
}
