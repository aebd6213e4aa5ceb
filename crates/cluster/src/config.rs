use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClusterError;

pub const DEFAULT_ID_COLUMN: &str = "user_id";

// ---------------------------------------------------------------------------
// Match mode
// ---------------------------------------------------------------------------

/// Which classified fields feed the clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    Email,
    Phone,
    EmailOrPhone,
}

impl MatchMode {
    pub const ALL: [MatchMode; 3] = [Self::Email, Self::Phone, Self::EmailOrPhone];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::EmailOrPhone => "email_or_phone",
        }
    }
}

impl FromStr for MatchMode {
    type Err = ClusterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "email_or_phone" => Ok(Self::EmailOrPhone),
            other => Err(ClusterError::UnsupportedMatchMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// A validated run description, either parsed from TOML or built from CLI
/// arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub mode: MatchMode,
    /// Input CSV, relative to the config file when loaded from TOML.
    pub input: String,
    /// Output CSV; `None` derives `<input>_with_user_ids.csv`.
    pub output: Option<String>,
    pub id_column: String,
    pub columns: ColumnOverrides,
}

/// Explicit column classification. An empty list keeps the name heuristic
/// for that kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnOverrides {
    #[serde(default)]
    pub email: Vec<String>,
    #[serde(default)]
    pub phone: Vec<String>,
}

impl ColumnOverrides {
    pub fn is_empty(&self) -> bool {
        self.email.is_empty() && self.phone.is_empty()
    }
}

/// On-disk shape. `mode` stays a string so an unknown mode surfaces as
/// `UnsupportedMatchMode` rather than a generic parse error.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRunConfig {
    mode: String,
    input: String,
    #[serde(default)]
    output: Option<String>,
    #[serde(default = "default_id_column")]
    id_column: String,
    #[serde(default)]
    columns: ColumnOverrides,
}

fn default_id_column() -> String {
    DEFAULT_ID_COLUMN.to_string()
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl RunConfig {
    pub fn new(mode: MatchMode, input: impl Into<String>) -> Self {
        Self {
            mode,
            input: input.into(),
            output: None,
            id_column: default_id_column(),
            columns: ColumnOverrides::default(),
        }
    }

    pub fn from_toml(input: &str) -> Result<Self, ClusterError> {
        let raw: RawRunConfig =
            toml::from_str(input).map_err(|e| ClusterError::ConfigParse(e.to_string()))?;

        let config = RunConfig {
            mode: raw.mode.parse()?,
            input: raw.input,
            output: raw.output,
            id_column: raw.id_column,
            columns: raw.columns,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ClusterError> {
        if self.input.trim().is_empty() {
            return Err(ClusterError::ConfigValidation("input must not be empty".into()));
        }

        if self.id_column.trim().is_empty() {
            return Err(ClusterError::ConfigValidation(
                "id_column must not be empty".into(),
            ));
        }

        if let Some(ref output) = self.output {
            if output.trim().is_empty() {
                return Err(ClusterError::ConfigValidation(
                    "output must not be empty when given".into(),
                ));
            }
            if output == &self.input {
                return Err(ClusterError::ConfigValidation(format!(
                    "output '{output}' would overwrite the input"
                )));
            }
        }

        for name in self.columns.email.iter().chain(&self.columns.phone) {
            if name.trim().is_empty() {
                return Err(ClusterError::ConfigValidation(
                    "column overrides must not contain empty names".into(),
                ));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
