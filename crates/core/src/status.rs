//! Request/response types of the thin REST backend mounted under `/api`.

use serde::{Deserialize, Serialize};

/// Body the backend root (`GET /api/`) answers with.
pub const ROOT_GREETING: &str = "Hello World";

/// `POST /api/status` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCheckCreate {
    pub client_name: String,
}

/// A persisted status check.
///
/// `timestamp` is kept as the raw string the backend produced; it is not
/// guaranteed to carry a timezone offset. A missing `id` or `timestamp`
/// decodes as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCheck {
    #[serde(default)]
    pub id: String,
    pub client_name: String,
    #[serde(default)]
    pub timestamp: String,
}

impl StatusCheck {
    pub fn echoes(&self, request: &StatusCheckCreate) -> bool {
        self.client_name == request.client_name
    }
}
