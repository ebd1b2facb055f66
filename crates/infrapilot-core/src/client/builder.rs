//! Builder for creating and configuring PilotClient instances.

use super::PilotClient;
use crate::{
    auth::AuthSource,
    config::PilotConfig,
    error::{PilotError, Result},
    tools::ToolCatalog,
};

/// Builder for creating and configuring PilotClient instances.
#[derive(Debug, Clone, Default)]
pub struct PilotClientBuilder {
    config: PilotConfig,
    tools: Option<ToolCatalog>,
    auth: Option<AuthSource>,
}

impl PilotClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the given configuration instead of the defaults.
    pub fn with_config(mut self, config: PilotConfig) -> Self {
        self.config = config;
        self
    }

    /// Overrides the backend base URL.
    pub fn with_backend_url<S: Into<String>>(mut self, url: Option<S>) -> Self {
        if let Some(url) = url {
            self.config.backend_url = url.into();
        }
        self
    }

    /// Replaces the tool catalog taken from the configuration.
    pub fn with_tool_catalog(mut self, tools: ToolCatalog) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Replaces the auth source taken from the configuration.
    pub fn with_auth_source(mut self, auth: AuthSource) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Builds the configured client.
    ///
    /// # Errors
    ///
    /// Returns `PilotError::Configuration` if an endpoint URL is invalid
    /// Returns `PilotError::Http` if the HTTP client cannot be created
    pub fn build(self) -> Result<PilotClient> {
        let config = self.config;
        let plan_url = config.plan_url()?;
        let stream_url = config.stream_endpoint()?;
        if !matches!(stream_url.scheme(), "ws" | "wss") {
            return Err(PilotError::configuration(format!(
                "execution stream URL must use ws or wss, got '{stream_url}'"
            )));
        }

        let auth = match self.auth {
            Some(auth) => auth,
            None => config.auth_source()?,
        };

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;

        log::debug!("Plan endpoint {plan_url}, execution stream {stream_url}");

        let tools = self.tools.unwrap_or_else(|| config.tool_catalog());
        let connect_timeout = config.connect_timeout();

        Ok(PilotClient {
            http,
            plan_url,
            stream_url,
            auth,
            tools,
            success_sentinel: config.success_sentinel,
            connect_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StreamAuth;

    #[test]
    fn test_default_build() {
        let client = PilotClientBuilder::new().build().unwrap();
        assert_eq!(client.plan_url().as_str(), "http://localhost:8000/api/v1/agent/process");
        assert_eq!(client.stream_url().as_str(), "ws://localhost:8000/ws/v1/agent/execute");
        assert_eq!(client.tool_catalog(), &ToolCatalog::aws_defaults());
    }

    #[test]
    fn test_overrides() {
        let client = PilotClientBuilder::new()
            .with_backend_url(Some("http://127.0.0.1:9999"))
            .with_tool_catalog(ToolCatalog::new().with_tool("Create S3 bucket", "create-s3-bucket"))
            .with_auth_source(AuthSource::Static(StreamAuth {
                token: None,
                user_id: Some("u-1".to_string()),
            }))
            .build()
            .unwrap();

        assert_eq!(client.plan_url().as_str(), "http://127.0.0.1:9999/api/v1/agent/process");
        assert_eq!(client.tool_catalog().len(), 1);
        assert!(client.auth.known().is_some());
    }

    #[test]
    fn test_rejects_http_stream_url() {
        let config = PilotConfig {
            stream_url: Some("http://localhost:8000/ws".to_string()),
            ..PilotConfig::default()
        };
        let err = PilotClientBuilder::new().with_config(config).build().unwrap_err();
        assert!(matches!(err, PilotError::Configuration { .. }));
    }
}
