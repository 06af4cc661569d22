//! Request and response envelopes exchanged with every handler.
//!
//! A request carries an optional JSON body, path parameters, and query-string
//! parameters. A response carries a status code and a JSON-encoded body string.

use std::collections::HashMap;

use axum::http::{header::CONTENT_TYPE, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::ApiError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub path_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
}

impl ApiRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_path_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_parameters
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_query_parameter(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.query_string_parameters
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_query_parameters(mut self, parameters: HashMap<String, String>) -> Self {
        self.query_string_parameters = Some(parameters);
        self
    }

    pub fn path_parameter(&self, key: &str) -> Option<&str> {
        self.path_parameters
            .as_ref()
            .and_then(|parameters| parameters.get(key))
            .map(String::as_str)
    }

    pub fn query_parameter(&self, key: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|parameters| parameters.get(key))
            .map(String::as_str)
    }

    /// Decode the JSON body. A missing or blank body decodes as `T::default()`.
    pub fn json_body<T>(&self) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Default,
    {
        match self.body.as_deref().map(str::trim) {
            None | Some("") => Ok(T::default()),
            Some(raw) => serde_json::from_str(raw).map_err(|error| {
                debug!(%error, "rejected request body");
                ApiError::bad_request("Invalid request body")
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn ok<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self {
                status_code: StatusCode::OK.as_u16(),
                body,
            },
            Err(error) => {
                error!(%error, "failed to serialize response body");
                ApiError::internal_server_error("Could not serialize response").into()
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.body)
    }
}

impl From<ApiError> for ApiResponse {
    fn from(error: ApiError) -> Self {
        let body = serde_json::json!({ "error": error.message }).to_string();
        Self {
            status_code: error.status.as_u16(),
            body,
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, self.body).into_response();
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}
