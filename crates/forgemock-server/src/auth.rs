//! Coarse authentication gate.
//!
//! The mock checks for the presence of a basic-scheme credential, nothing
//! more. Discovery enumeration, OPTIONS preflight, and the health probe
//! stay open so clients can resolve areas before they have credentials.

use axum::http::Method;
use forgemock_core::error::MockError;

use crate::context::RequestContext;

/// Whether this request must carry a credential.
#[must_use]
pub fn requires_auth(ctx: &RequestContext) -> bool {
    if ctx.method == Method::OPTIONS {
        return false;
    }
    if !ctx.is_api_path() {
        return false;
    }
    // Discovery enumeration stays open.
    !ctx.path.to_ascii_lowercase().starts_with("/_apis/resourceareas")
}

/// Enforce the credential-presence check.
pub fn authorize(ctx: &RequestContext) -> Result<(), MockError> {
    if !requires_auth(ctx) {
        return Ok(());
    }
    match ctx.authorization.as_deref() {
        Some(header) if is_basic_scheme(header) => Ok(()),
        Some(_) => Err(MockError::auth("unsupported authorization scheme")),
        None => Err(MockError::auth("missing Authorization header")),
    }
}

fn is_basic_scheme(header: &str) -> bool {
    header
        .split_whitespace()
        .next()
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("basic"))
}
