//! Client for the optional remote backend.
//!
//! `POST /auth/login` and `GET /fichaje/token`, both answering
//! `{"data": ...}`. Failures come back as [`AppError::Remote`].

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::{error::AppError, model::user::Session};

#[async_trait]
pub trait RemoteBackend: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<Session, AppError>;
    async fn qr_token(&self, bearer: Option<&str>) -> Result<String, AppError>;
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct TokenData {
    token: String,
}

pub struct RemoteApi {
    client: Client,
    base_url: String,
}

impl RemoteApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        bearer: Option<&str>,
    ) -> Result<T, AppError> {
        let req = match bearer {
            Some(token) => req.bearer_auth(token),
            None => req,
        };

        let resp = req.send().await.map_err(|e| {
            error!(error = %e, "Remote backend unreachable");
            AppError::remote(None, 500, json!([]))
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body: Value = resp.json().await.unwrap_or(Value::Null);
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string);
            let details = body
                .get("data")
                .filter(|d| !d.is_null())
                .cloned()
                .unwrap_or_else(|| json!([]));

            error!(status = status.as_u16(), ?message, "Remote backend rejected request");
            return Err(AppError::remote(message, status.as_u16(), details));
        }

        let envelope: Envelope<T> = resp.json().await.map_err(|e| {
            error!(error = %e, "Remote backend sent a malformed body");
            AppError::remote(None, 502, json!([]))
        })?;

        Ok(envelope.data)
    }
}

#[async_trait]
impl RemoteBackend for RemoteApi {
    async fn login(&self, username: &str, password: &str) -> Result<Session, AppError> {
        debug!(username, "Forwarding login to remote backend");
        let req = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "username": username, "password": password }));
        self.send(req, None).await
    }

    async fn qr_token(&self, bearer: Option<&str>) -> Result<String, AppError> {
        let req = self.client.get(self.url("/fichaje/token"));
        let data: TokenData = self.send(req, bearer).await?;
        Ok(data.token)
    }
}
