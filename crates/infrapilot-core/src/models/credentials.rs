//! Caller-owned secrets forwarded to the execution backend.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque bag of secrets passed through to the execution stream.
///
/// The client never inspects these values. `Debug` only reports which
/// fields are set.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub aws_access_key: Option<String>,
    pub aws_secret_key: Option<String>,
    pub google_api_key: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(value: &Option<String>) -> &'static str {
            if value.is_some() {
                "<redacted>"
            } else {
                "<unset>"
            }
        }

        f.debug_struct("Credentials")
            .field("aws_access_key", &redact(&self.aws_access_key))
            .field("aws_secret_key", &redact(&self.aws_secret_key))
            .field("google_api_key", &redact(&self.google_api_key))
            .finish()
    }
}
