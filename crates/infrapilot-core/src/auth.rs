//! Identity resolution for backend calls.

use std::fmt;

use reqwest::{RequestBuilder, Url};
use serde::Deserialize;

use crate::error::ExecutionError;

/// Token and/or user id presented to the backend.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct StreamAuth {
    pub token: Option<String>,
    pub user_id: Option<String>,
}

impl fmt::Debug for StreamAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamAuth")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user_id", &self.user_id)
            .finish()
    }
}

impl StreamAuth {
    /// Whether neither a token nor a user id is available.
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.user_id.is_none()
    }

    /// Returns `base` with the `token` and `user_id` query parameters set.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError::Auth` when no identity is available.
    pub fn stream_url(&self, base: &Url) -> Result<Url, ExecutionError> {
        if self.is_empty() {
            return Err(ExecutionError::Auth(
                "No token or user_id available for the execution stream".to_string(),
            ));
        }

        let mut url = base.clone();
        {
            let mut query = url.query_pairs_mut();
            if let Some(token) = &self.token {
                query.append_pair("token", token);
            }
            if let Some(user_id) = &self.user_id {
                query.append_pair("user_id", user_id);
            }
        }
        Ok(url)
    }

    /// Attaches `Authorization` and `X-User-Id` headers when available.
    pub(crate) fn apply_headers(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(user_id) = &self.user_id {
            request = request.header("X-User-Id", user_id);
        }
        request
    }
}

/// Where the stream identity comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSource {
    /// A token and/or user id known up front
    Static(StreamAuth),
    /// An endpoint answering `GET` with `{token?, userId?}`
    Endpoint(Url),
}

impl Default for AuthSource {
    fn default() -> Self {
        AuthSource::Static(StreamAuth::default())
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default, rename = "userId")]
    user_id_camel: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
}

impl AuthSource {
    /// The identity usable without a network call, if any.
    pub fn known(&self) -> Option<&StreamAuth> {
        match self {
            AuthSource::Static(auth) => Some(auth),
            AuthSource::Endpoint(_) => None,
        }
    }

    /// Resolves the identity, calling the token endpoint if configured.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError::Auth` if the endpoint fails or no identity
    /// is available.
    pub async fn resolve(&self, http: &reqwest::Client) -> Result<StreamAuth, ExecutionError> {
        let auth = match self {
            AuthSource::Static(auth) => auth.clone(),
            AuthSource::Endpoint(url) => fetch_token(http, url).await?,
        };

        if auth.is_empty() {
            return Err(ExecutionError::Auth(
                "No token or user_id available for the execution stream".to_string(),
            ));
        }
        Ok(auth)
    }
}

async fn fetch_token(http: &reqwest::Client, url: &Url) -> Result<StreamAuth, ExecutionError> {
    log::debug!("Requesting stream token from {url}");
    let response = http
        .get(url.clone())
        .send()
        .await
        .map_err(|e| ExecutionError::Auth(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ExecutionError::Auth(format!(
            "token endpoint returned {}",
            response.status()
        )));
    }

    let body: TokenResponse = response
        .json()
        .await
        .map_err(|e| ExecutionError::Auth(e.to_string()))?;

    Ok(StreamAuth {
        token: body.token.filter(|t| !t.is_empty()),
        user_id: body.user_id_camel.or(body.user_id).filter(|u| !u.is_empty()),
    })
}
