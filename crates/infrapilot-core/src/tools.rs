//! Step-name to backend-tool resolution.

use std::collections::BTreeMap;

/// Tool id used when a step names no tool and the catalog has no mapping.
pub const UNKNOWN_TOOL: &str = "unknown-tool";

/// Mapping from step names to backend tool ids.
///
/// Consulted only for steps whose plan entry carries no explicit tool.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolCatalog {
    entries: BTreeMap<String, String>,
}

impl ToolCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The mappings for the EC2 bootstrap flow the agent plans by default.
    pub fn aws_defaults() -> Self {
        [
            ("Get latest Ubuntu AMI", "get-latest-ubuntu-ami"),
            ("Discover subnets in default VPC", "list-subnets"),
            ("Create EC2 Key Pair", "create-key-pair"),
            ("Create new EC2 instance", "create-ec2-instance"),
        ]
        .into_iter()
        .collect()
    }

    /// Adds or replaces a mapping.
    pub fn with_tool(mut self, step_name: impl Into<String>, tool_id: impl Into<String>) -> Self {
        self.entries.insert(step_name.into(), tool_id.into());
        self
    }

    /// Looks up the tool for a step name.
    pub fn lookup(&self, step_name: &str) -> Option<&str> {
        self.entries.get(step_name).map(String::as_str)
    }

    /// Resolves the tool for a step: explicit tool, else catalog lookup,
    /// else [`UNKNOWN_TOOL`].
    pub fn resolve(&self, explicit: Option<&str>, step_name: &str) -> String {
        explicit
            .filter(|tool| !tool.is_empty())
            .or_else(|| self.lookup(step_name))
            .unwrap_or(UNKNOWN_TOOL)
            .to_string()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ToolCatalog
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<BTreeMap<String, String>> for ToolCatalog {
    fn from(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }
}
