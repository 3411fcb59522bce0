use serde::{Deserialize, Serialize};

/// A `config_variable` block of an API test.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigVariableConfig {
    pub example: String,
    pub name: String,
    pub pattern: String,
    #[serde(rename = "type")]
    pub variable_type: String,
    /// Global variable id, for `global` variables.
    pub id: String,
    pub secure: bool,
}

/// A `browser_variable` block of a browser test.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserVariableConfig {
    pub example: String,
    pub id: String,
    pub name: String,
    pub pattern: String,
    #[serde(rename = "type")]
    pub variable_type: String,
    pub secure: bool,
}
