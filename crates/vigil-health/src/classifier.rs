//! Mapping raw probe outcomes to health verdicts
//!
//! Components report health in different ways: a JSON body with a `status`
//! field, a plain-text body, or nothing but the status code. The decision rule
//! accepts all of them:
//!
//! 1. Transport failure: `unreachable`, the error text doubles as `http_result`.
//! 2. A body that parses as `{"status": "ok"}`: `ok`, whatever the status code.
//! 3. HTTP 200: `ok`, whatever the body.
//! 4. Anything else: `invalid_response`, with the body parse outcome as error.

use crate::checker::ProbeOutcome;
use http::StatusCode;
use serde::Deserialize;
use vigil_core::{ComponentStatus, EndpointStatus};

/// Classifier output for one probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Overall verdict
    pub status: ComponentStatus,
    /// Binary endpoint view
    pub endpoint_status: EndpointStatus,
    /// Status line or transport error text
    pub http_result: String,
    /// Classification or transport error
    pub error: Option<String>,
}

impl Verdict {
    fn ok(http_result: String) -> Self {
        Self {
            status: ComponentStatus::Ok,
            endpoint_status: EndpointStatus::Ok,
            http_result,
            error: None,
        }
    }
}

#[derive(Deserialize)]
struct BodyStatus {
    status: String,
}

/// Classify a probe outcome
///
/// Pure and total: malformed bodies are ordinary input, never a panic.
pub fn classify(outcome: &ProbeOutcome) -> Verdict {
    let (status, body) = match outcome {
        ProbeOutcome::Transport(message) => {
            return Verdict {
                status: ComponentStatus::Unreachable,
                endpoint_status: EndpointStatus::NotOk,
                http_result: message.clone(),
                error: Some(message.clone()),
            };
        }
        ProbeOutcome::Response { status, body } => (*status, body),
    };

    let http_result = status_line(status);

    let body_error = match serde_json::from_slice::<BodyStatus>(body) {
        Ok(parsed) if parsed.status == "ok" => return Verdict::ok(http_result),
        Ok(parsed) => format!("unexpected status value {:?}, expected \"ok\"", parsed.status),
        Err(e) => e.to_string(),
    };

    // Any 200 is healthy, including plain-text "ok" and empty bodies.
    if status == StatusCode::OK {
        return Verdict::ok(http_result);
    }

    Verdict {
        status: ComponentStatus::InvalidResponse,
        endpoint_status: EndpointStatus::NotOk,
        http_result,
        error: Some(body_error),
    }
}

/// Render a status code as an HTTP status line, e.g. `"503 Service Unavailable"`
pub fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}
