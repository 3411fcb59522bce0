use serde::{Deserialize, Serialize};

use super::single_block;

/// One `assertion` block.
///
/// Which of `target`, `targetjsonschema`, `targetjsonpath` and `targetxpath`
/// is meaningful depends on `type` and `operator`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssertionConfig {
    #[serde(rename = "type")]
    pub assertion_type: String,
    pub operator: String,
    pub property: String,
    pub target: String,
    pub code: String,
    #[serde(with = "single_block")]
    pub targetjsonschema: Option<JsonSchemaTargetConfig>,
    #[serde(with = "single_block")]
    pub targetjsonpath: Option<JsonPathTargetConfig>,
    #[serde(with = "single_block")]
    pub targetxpath: Option<XPathTargetConfig>,
    pub timings_scope: String,
}

/// The `targetjsonschema` block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonSchemaTargetConfig {
    pub jsonschema: String,
    pub metaschema: String,
}

/// The `targetjsonpath` block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonPathTargetConfig {
    pub jsonpath: String,
    pub operator: String,
    pub targetvalue: String,
    pub elementsoperator: String,
}

/// The `targetxpath` block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct XPathTargetConfig {
    pub xpath: String,
    pub operator: String,
    pub targetvalue: String,
}
