//! Client configuration.
//!
//! Configuration is read from a TOML file: either an explicit path, or
//! `$XDG_CONFIG_HOME/infrapilot/config.toml` when that file exists. Every key
//! is optional and falls back to the defaults below.
//!
//! ```toml
//! backend_url = "https://agent.example.com"
//! request_timeout_secs = 60
//!
//! [auth]
//! token_endpoint = "https://app.example.com/api/agent/token"
//!
//! [tools]
//! "Create EC2 Key Pair" = "create-key-pair"
//! ```

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    time::Duration,
};

use reqwest::Url;
use serde::Deserialize;

use crate::{
    auth::{AuthSource, StreamAuth},
    error::{PilotError, Result},
    tools::ToolCatalog,
};

/// Message the backend logs when every step ran, used as the
/// soft-completion hint.
pub const DEFAULT_SUCCESS_SENTINEL: &str = "All plan steps executed successfully.";

const CONFIG_FILE: &str = "config.toml";

/// Settings for reaching the backend agent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PilotConfig {
    /// Base HTTP URL of the backend agent
    pub backend_url: String,
    /// Full execution stream URL; derived from `backend_url` when absent
    pub stream_url: Option<String>,
    /// Path of the plan-generation endpoint
    pub plan_path: String,
    /// Path of the execution stream endpoint
    pub stream_path: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Message treated as the soft-completion hint
    pub success_sentinel: String,
    pub auth: AuthConfig,
    /// Step name to tool id mappings
    pub tools: BTreeMap<String, String>,
}

/// Identity used for backend requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub token: Option<String>,
    pub user_id: Option<String>,
    /// Endpoint returning `{token, userId}`; takes precedence over the
    /// static values
    pub token_endpoint: Option<String>,
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".to_string(),
            stream_url: None,
            plan_path: "/api/v1/agent/process".to_string(),
            stream_path: "/ws/v1/agent/execute".to_string(),
            request_timeout_secs: 120,
            connect_timeout_secs: 10,
            success_sentinel: DEFAULT_SUCCESS_SENTINEL.to_string(),
            auth: AuthConfig::default(),
            tools: ToolCatalog::aws_defaults()
                .iter()
                .map(|(name, tool)| (name.to_string(), tool.to_string()))
                .collect(),
        }
    }
}

impl PilotConfig {
    /// Loads configuration from `path`, or from the XDG config file if one
    /// exists, or returns the defaults.
    ///
    /// # Errors
    ///
    /// Returns `PilotError::FileSystem` if an explicit path cannot be read
    /// Returns `PilotError::ConfigParse` if the file is not valid TOML
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_config_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        let contents = std::fs::read_to_string(&path).map_err(|e| PilotError::FileSystem {
            path: path.clone(),
            source: e,
        })?;
        log::debug!("Loading configuration from {}", path.display());
        Self::from_toml_str(&contents, &path)
    }

    /// Parses configuration from TOML text; `origin` is used in errors.
    pub fn from_toml_str(contents: &str, origin: &Path) -> Result<Self> {
        toml::from_str(contents).map_err(|e| PilotError::ConfigParse {
            path: origin.to_path_buf(),
            source: e,
        })
    }

    /// Returns the XDG config file path if the file exists.
    fn default_config_path() -> Option<PathBuf> {
        xdg::BaseDirectories::with_prefix("infrapilot").find_config_file(CONFIG_FILE)
    }

    /// URL of the plan-generation endpoint.
    pub fn plan_url(&self) -> Result<Url> {
        parse_url(&join(&self.backend_url, &self.plan_path), "backend_url")
    }

    /// URL of the execution stream endpoint.
    pub fn stream_endpoint(&self) -> Result<Url> {
        match &self.stream_url {
            Some(url) => parse_url(url, "stream_url"),
            None => {
                let ws_base = self
                    .backend_url
                    .replacen("https://", "wss://", 1)
                    .replacen("http://", "ws://", 1);
                parse_url(&join(&ws_base, &self.stream_path), "backend_url")
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn tool_catalog(&self) -> ToolCatalog {
        ToolCatalog::from(self.tools.clone())
    }

    /// How the client obtains its stream identity.
    pub fn auth_source(&self) -> Result<AuthSource> {
        match &self.auth.token_endpoint {
            Some(endpoint) => Ok(AuthSource::Endpoint(parse_url(endpoint, "auth.token_endpoint")?)),
            None => Ok(AuthSource::Static(StreamAuth {
                token: self.auth.token.clone(),
                user_id: self.auth.user_id.clone(),
            })),
        }
    }
}

fn join(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn parse_url(raw: &str, field: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| PilotError::configuration(format!("invalid {field} '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = PilotConfig::default();
        assert_eq!(
            config.plan_url().unwrap().as_str(),
            "http://localhost:8000/api/v1/agent/process"
        );
        assert_eq!(
            config.stream_endpoint().unwrap().as_str(),
            "ws://localhost:8000/ws/v1/agent/execute"
        );
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
        assert_eq!(config.tool_catalog(), ToolCatalog::aws_defaults());
        assert_eq!(config.success_sentinel, DEFAULT_SUCCESS_SENTINEL);
    }

    #[test]
    fn test_https_backend_derives_wss_stream() {
        let config = PilotConfig {
            backend_url: "https://agent.example.com/".to_string(),
            ..PilotConfig::default()
        };
        assert_eq!(
            config.stream_endpoint().unwrap().as_str(),
            "wss://agent.example.com/ws/v1/agent/execute"
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
backend_url = "http://10.0.0.5:8080"
stream_url = "ws://10.0.0.6:9000/exec"
request_timeout_secs = 30

[auth]
token = "t0k"

[tools]
"Create S3 bucket" = "create-s3-bucket"
"#
        )
        .unwrap();

        let config = PilotConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.backend_url, "http://10.0.0.5:8080");
        assert_eq!(config.stream_endpoint().unwrap().as_str(), "ws://10.0.0.6:9000/exec");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.tool_catalog().lookup("Create S3 bucket"), Some("create-s3-bucket"));
        assert_eq!(config.tool_catalog().len(), 1);
        assert_eq!(
            config.auth_source().unwrap(),
            AuthSource::Static(StreamAuth {
                token: Some("t0k".to_string()),
                user_id: None,
            })
        );
    }

    #[test]
    fn test_token_endpoint_takes_precedence() {
        let config = PilotConfig::from_toml_str(
            "[auth]\ntoken = \"ignored\"\n\
             token_endpoint = \"http://localhost:3000/api/agent/token\"\n",
            Path::new("inline"),
        )
        .unwrap();
        assert!(matches!(config.auth_source().unwrap(), AuthSource::Endpoint(_)));
    }

    #[test]
    fn test_invalid_toml() {
        let err =
            PilotConfig::from_toml_str("backend_url = ", Path::new("broken.toml")).unwrap_err();
        assert!(matches!(err, PilotError::ConfigParse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = PilotConfig::load(Some(Path::new("/nonexistent/infrapilot.toml"))).unwrap_err();
        assert!(matches!(err, PilotError::FileSystem { .. }));
    }

    #[test]
    fn test_invalid_backend_url() {
        let config = PilotConfig {
            backend_url: "not a url".to_string(),
            ..PilotConfig::default()
        };
        assert!(matches!(config.plan_url(), Err(PilotError::Configuration { .. })));
    }
}
