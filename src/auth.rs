use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Shared-secret header check for the status route.
#[derive(Debug, Clone)]
pub struct AccessCredential {
    header: HeaderName,
    secret: Vec<u8>,
}

impl AccessCredential {
    pub fn new(header: &str, secret: &str) -> Result<Self> {
        let header = HeaderName::from_bytes(header.trim().as_bytes())
            .with_context(|| format!("server.headerSecrete: invalid header name: {header:?}"))?;
        Ok(Self {
            header,
            secret: secret.as_bytes().to_vec(),
        })
    }

    pub fn header(&self) -> &HeaderName {
        &self.header
    }

    /// True when the configured header is present and equals the secret byte for byte.
    pub fn authorize(&self, headers: &HeaderMap) -> bool {
        match headers.get(&self.header) {
            Some(value) => constant_time_eq(value.as_bytes(), &self.secret),
            None => false,
        }
    }
}

/// Compares two byte strings without short-circuiting on the first difference.
/// Only the length is allowed to leak.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Middleware rejecting requests without the configured secret header.
pub async fn require_secret(
    State(cred): State<Arc<AccessCredential>>,
    req: Request,
    next: Next,
) -> Response {
    if !cred.authorize(req.headers()) {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }
    next.run(req).await
}
