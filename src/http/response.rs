//! Response rendering.
//!
//! Backend headers are not relayed: the caller gets the status and the JSON
//! body, or no body at all when the backend sent none.

use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::proxy::OutboundResponse;

impl IntoResponse for OutboundResponse {
    fn into_response(self) -> Response {
        match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        }
    }
}
