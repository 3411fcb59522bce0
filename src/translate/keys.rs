//! Browser step parameter keys.

/// Parameter keys whose model spelling differs from the attribute name.
const KEY_MAP: &[(&str, &str)] = &[
    ("click_type", "clickType"),
    ("playing_tab_id", "playingTabId"),
    ("subtest_public_id", "subtestPublicId"),
    ("with_click", "withClick"),
];

/// Step type to the parameter keys it accepts, in attribute spelling.
pub const STEP_PARAMS: &[(&str, &[&str])] = &[
    ("assertCurrentUrl", &["check", "value"]),
    ("assertElementAttribute", &["attribute", "check", "element", "value"]),
    ("assertElementContent", &["check", "element", "value"]),
    ("assertElementPresent", &["element"]),
    ("assertEmail", &["email"]),
    ("assertFileDownload", &["file"]),
    ("assertFromJavascript", &["code", "element"]),
    ("assertPageContains", &["value"]),
    ("assertPageLacks", &["value"]),
    ("click", &["click_type", "element"]),
    ("extractFromJavascript", &["code", "element", "variable"]),
    ("extractVariable", &["element", "variable"]),
    ("goToEmailLink", &["value"]),
    ("goToUrl", &["value"]),
    ("hover", &["element"]),
    ("playSubTest", &["playing_tab_id", "subtest_public_id"]),
    ("pressKey", &["modifiers", "value"]),
    ("refresh", &[]),
    ("runApiTest", &["request"]),
    ("scroll", &["element", "x", "y"]),
    ("selectOption", &["element", "value"]),
    ("typeText", &["delay", "element", "value"]),
    ("uploadFiles", &["element", "files", "with_click"]),
    ("wait", &["value"]),
];

/// The model spelling of an attribute key.
pub fn to_model_key(key: &str) -> &str {
    KEY_MAP
        .iter()
        .find(|(attribute, _)| *attribute == key)
        .map_or(key, |(_, model)| model)
}

/// The attribute spelling of a model key.
pub fn to_config_key(key: &str) -> &str {
    KEY_MAP
        .iter()
        .find(|(_, model)| *model == key)
        .map_or(key, |(attribute, _)| attribute)
}

/// The parameter keys of `step_type`, or `None` for an unknown type.
pub fn step_params(step_type: &str) -> Option<&'static [&'static str]> {
    STEP_PARAMS
        .iter()
        .find(|(name, _)| *name == step_type)
        .map(|(_, keys)| *keys)
}
