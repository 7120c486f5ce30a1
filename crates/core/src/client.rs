//! DBFS REST client (API 2.0)

use crate::api::{DbfsApi, Handle};
use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::path::DbfsPath;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// DBFS client for a Databricks workspace
pub struct DbfsClient {
    credentials: Credentials,
    http_client: Client,
    base_url: String,
}

impl DbfsClient {
    /// Create a new DBFS client. No request is made here.
    pub fn new(credentials: Credentials) -> Self {
        Self::with_http_client(credentials, Client::new())
    }

    /// Create a DBFS client on top of a preconfigured reqwest client
    pub fn with_http_client(credentials: Credentials, http_client: Client) -> Self {
        let base_url = format!("{}/api/2.0/dbfs", credentials.host().trim_end_matches('/'));

        Self {
            credentials,
            http_client,
            base_url,
        }
    }

    /// Base URL of the DBFS endpoints
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::trace!(%url, "POST");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.credentials.token())
            .json(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(classify_error(status.as_u16(), &body))
        }
    }
}

#[async_trait]
impl DbfsApi for DbfsClient {
    async fn create(&self, path: &DbfsPath, overwrite: bool) -> Result<Handle> {
        let request = CreateRequest {
            path: path.absolute_path(),
            overwrite,
        };
        let response: CreateResponse = self.post("create", &request).await?;
        Ok(Handle(response.handle))
    }

    async fn add_block(&self, handle: Handle, data: &[u8]) -> Result<()> {
        let request = AddBlockRequest {
            handle: handle.0,
            data: BASE64.encode(data),
        };
        let _: EmptyResponse = self.post("add-block", &request).await?;
        Ok(())
    }

    async fn close(&self, handle: Handle) -> Result<()> {
        let request = CloseRequest { handle: handle.0 };
        let _: EmptyResponse = self.post("close", &request).await?;
        Ok(())
    }
}

/// Map a non-2xx response to an error
pub fn classify_error(status: u16, body: &str) -> Error {
    match status {
        401 => return Error::Authentication("Invalid or expired access token".to_string()),
        403 => return Error::PermissionDenied(extract_message(body)),
        _ => {}
    }

    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(err) => match err.error_code.as_str() {
            "RESOURCE_ALREADY_EXISTS" => Error::AlreadyExists(err.message),
            "RESOURCE_DOES_NOT_EXIST" => Error::NotFound(err.message),
            "INVALID_PARAMETER_VALUE" => Error::InvalidPath(err.message),
            _ => Error::Api {
                status,
                code: err.error_code,
                message: err.message,
            },
        },
        Err(_) => Error::Api {
            status,
            code: String::new(),
            message: body.trim().to_string(),
        },
    }
}

fn extract_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// DBFS error body
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error_code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Serialize)]
struct CreateRequest<'a> {
    path: &'a str,
    overwrite: bool,
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    handle: i64,
}

#[derive(Debug, Serialize)]
struct AddBlockRequest {
    handle: i64,
    data: String,
}

#[derive(Debug, Serialize)]
struct CloseRequest {
    handle: i64,
}

#[derive(Debug, Deserialize)]
struct EmptyResponse {}
