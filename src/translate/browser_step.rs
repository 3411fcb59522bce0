//! `browser_step` blocks and their type-dependent parameters.

use serde_json::{json, Map, Value};

use super::keys::{step_params, to_model_key};
use super::prior;
use super::value::{convert_to_string, parse_int};
use super::warning;
use crate::model::BrowserStep;
use crate::schema::Diagnostic;
use crate::state::{
    BrowserStepConfig, LocatorValueConfig, StepParamsConfig, StepVariableConfig, UserLocatorConfig,
};
use crate::variant::{Rule, RuleTable};

/// Parameters carried as JSON text in configuration.
const JSON_PARAMS: &[&str] = &["element", "email", "file", "files", "request"];

const USER_LOCATOR_KEY: &str = "userLocator";

/// How a user locator value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorKind {
    /// A CSS selector.
    Css,
    /// An XPath expression.
    XPath,
}

/// User locator variant, keyed by the locator `type`.
pub static LOCATOR_RULES: RuleTable<str, LocatorKind> = RuleTable::new(
    "element locator",
    &[
        Rule {
            name: "css",
            matches: |t| t == "css",
            kind: LocatorKind::Css,
        },
        Rule {
            name: "xpath",
            matches: |t| t == "xpath",
            kind: LocatorKind::XPath,
        },
    ],
);

pub(crate) fn build_browser_steps(
    steps: &[BrowserStepConfig],
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<BrowserStep> {
    steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let attribute = format!("browser_step.{}", index);
            let params = step.params.clone().unwrap_or_default();
            BrowserStep {
                allow_failure: Some(step.allow_failure),
                is_critical: Some(step.is_critical),
                name: step.name.clone(),
                no_screenshot: Some(step.no_screenshot),
                params: build_params(&step.step_type, &params, &attribute, diagnostics),
                timeout: Some(step.timeout),
                step_type: step.step_type.clone(),
            }
        })
        .collect()
}

/// Only the keys the step type accepts are sent, under their model names.
fn build_params(
    step_type: &str,
    params: &StepParamsConfig,
    attribute: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Map<String, Value> {
    let mut built = Map::new();
    let Some(keys) = step_params(step_type) else {
        unknown_step_type(step_type, attribute, diagnostics);
        return built;
    };
    let params_attribute = format!("{}.params.0", attribute);

    for &key in keys {
        let key_attribute = format!("{}.{}", params_attribute, key);
        let value = match key {
            "attribute" => text(&params.attribute),
            "check" => text(&params.check),
            "click_type" => text(&params.click_type),
            "code" => text(&params.code),
            "subtest_public_id" => text(&params.subtest_public_id),
            "value" if step_type == "wait" => {
                parse_int(&params.value, &key_attribute).map(Value::from)
            }
            "value" => text(&params.value),
            "playing_tab_id" if params.playing_tab_id.is_empty() => None,
            "playing_tab_id" => parse_int(&params.playing_tab_id, &key_attribute).map(Value::from),
            "delay" => Some(Value::from(params.delay)),
            "x" => Some(Value::from(params.x)),
            "y" => Some(Value::from(params.y)),
            "with_click" => Some(Value::from(params.with_click)),
            "modifiers" => Some(Value::from(params.modifiers.clone())),
            "variable" => params.variable.as_ref().map(|variable| {
                json!({"name": variable.name, "example": variable.example})
            }),
            "element" => build_element(params, &params_attribute, diagnostics),
            "email" => parse_json(&params.email, &key_attribute, diagnostics),
            "file" => parse_json(&params.file, &key_attribute, diagnostics),
            "files" => parse_json(&params.files, &key_attribute, diagnostics),
            "request" => parse_json(&params.request, &key_attribute, diagnostics),
            _ => None,
        };
        if let Some(value) = value {
            built.insert(to_model_key(key).to_string(), value);
        }
    }
    built
}

fn text(value: &str) -> Option<Value> {
    (!value.is_empty()).then(|| Value::from(value))
}

/// Empty text is unset; malformed JSON is dropped with a warning.
fn parse_json(raw: &str, attribute: &str, diagnostics: &mut Vec<Diagnostic>) -> Option<Value> {
    if raw.is_empty() {
        return None;
    }
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warning(
                diagnostics,
                attribute,
                "Invalid JSON parameter",
                format!("the value is not valid JSON and is not sent: {}", err),
            );
            None
        }
    }
}

/// The element JSON with the user locator merged in as `userLocator`.
fn build_element(
    params: &StepParamsConfig,
    attribute: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Value> {
    let element_attribute = format!("{}.element", attribute);
    let element = parse_json(&params.element, &element_attribute, diagnostics);

    let locator_attribute = format!("{}.element_user_locator.0", attribute);
    let locator = params.element_user_locator.as_ref().and_then(|locator| {
        let value = locator.value.clone().unwrap_or_default();
        LOCATOR_RULES.resolve(
            value.locator_type.as_str(),
            &value.locator_type,
            &locator_attribute,
            diagnostics,
        )?;
        Some(json!({
            "failTestOnCannotLocate": locator.fail_test_on_cannot_locate,
            "values": [{"type": value.locator_type, "value": value.value}],
        }))
    });
    let Some(locator) = locator else {
        return element;
    };

    match element {
        None => {
            let mut object = Map::new();
            object.insert(USER_LOCATOR_KEY.to_string(), locator);
            Some(Value::Object(object))
        }
        Some(Value::Object(mut object)) => {
            object.insert(USER_LOCATOR_KEY.to_string(), locator);
            Some(Value::Object(object))
        }
        Some(other) => {
            warning(
                diagnostics,
                &locator_attribute,
                "Ignored element locator",
                "the element is not a JSON object, so the locator cannot be attached",
            );
            Some(other)
        }
    }
}

fn unknown_step_type(step_type: &str, attribute: &str, diagnostics: &mut Vec<Diagnostic>) {
    warning(
        diagnostics,
        attribute,
        "Unrecognized browser step type",
        format!("\"{}\" has no known parameters; none are sent", step_type),
    );
}

pub(crate) fn flatten_browser_steps(
    steps: &[BrowserStep],
    prior: &[BrowserStepConfig],
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<BrowserStepConfig> {
    steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let attribute = format!("browser_step.{}", index);
            let old = prior::find(prior, index, &step.name);
            let old_params = old.and_then(|o| o.params.as_ref());
            let force_element_update = old.is_some_and(|o| o.force_element_update);
            BrowserStepConfig {
                name: step.name.clone(),
                step_type: step.step_type.clone(),
                allow_failure: step.allow_failure.unwrap_or_default(),
                is_critical: step.is_critical.unwrap_or_default(),
                timeout: step.timeout.unwrap_or_default(),
                force_element_update,
                no_screenshot: step.no_screenshot.unwrap_or_default(),
                params: Some(flatten_params(
                    step,
                    old_params,
                    force_element_update,
                    &attribute,
                    diagnostics,
                )),
            }
        })
        .collect()
}

/// The server rewrites elements, so a non-empty prior element is kept unless
/// `force_element_update` asks for the server's element to be read back.
fn flatten_params(
    step: &BrowserStep,
    prior: Option<&StepParamsConfig>,
    force_element_update: bool,
    attribute: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> StepParamsConfig {
    let mut params = StepParamsConfig::default();
    let Some(keys) = step_params(&step.step_type) else {
        unknown_step_type(&step.step_type, attribute, diagnostics);
        return params;
    };
    let prior = prior.cloned().unwrap_or_default();

    for &key in keys {
        let Some(value) = step.params.get(to_model_key(key)) else {
            continue;
        };
        match key {
            "attribute" => params.attribute = convert_to_string(value),
            "check" => params.check = convert_to_string(value),
            "click_type" => params.click_type = convert_to_string(value),
            "code" => params.code = convert_to_string(value),
            "subtest_public_id" => params.subtest_public_id = convert_to_string(value),
            "value" => params.value = convert_to_string(value),
            "playing_tab_id" => params.playing_tab_id = convert_to_string(value),
            "delay" => params.delay = value.as_i64().unwrap_or_default(),
            "x" => params.x = value.as_i64().unwrap_or_default(),
            "y" => params.y = value.as_i64().unwrap_or_default(),
            "with_click" => params.with_click = value.as_bool().unwrap_or_default(),
            "modifiers" => {
                params.modifiers = value
                    .as_array()
                    .into_iter()
                    .flatten()
                    .map(convert_to_string)
                    .collect()
            }
            "variable" => {
                params.variable = Some(StepVariableConfig {
                    name: value.get("name").map(convert_to_string).unwrap_or_default(),
                    example: value.get("example").map(convert_to_string).unwrap_or_default(),
                })
            }
            "element" => {
                let (element, locator) = split_element(value);
                params.element = if prior.element.is_empty() || force_element_update {
                    element
                } else {
                    prior.element.clone()
                };
                params.element_user_locator = locator;
            }
            "email" => params.email = json_text(value, &prior.email),
            "file" => params.file = json_text(value, &prior.file),
            "files" => params.files = json_text(value, &prior.files),
            "request" => params.request = json_text(value, &prior.request),
            _ => {}
        }
    }
    params
}

/// The element text without its user locator, and the locator block.
fn split_element(value: &Value) -> (String, Option<UserLocatorConfig>) {
    let mut element = value.clone();
    let locator = element
        .as_object_mut()
        .and_then(|object| object.remove(USER_LOCATOR_KEY))
        .map(|locator| UserLocatorConfig {
            fail_test_on_cannot_locate: locator
                .get("failTestOnCannotLocate")
                .and_then(Value::as_bool)
                .unwrap_or_default(),
            value: locator
                .get("values")
                .and_then(|values| values.get(0))
                .map(|first| LocatorValueConfig {
                    locator_type: first.get("type").map(convert_to_string).unwrap_or_default(),
                    value: first.get("value").map(convert_to_string).unwrap_or_default(),
                }),
        });

    let text = match &element {
        Value::Object(object) if object.is_empty() => String::new(),
        other => other.to_string(),
    };
    (text, locator)
}

/// Server JSON as text, keeping the prior spelling when it is the same value.
fn json_text(value: &Value, prior: &str) -> String {
    let unchanged = !prior.is_empty()
        && serde_json::from_str::<Value>(prior).is_ok_and(|parsed| &parsed == value);
    if unchanged {
        prior.to_string()
    } else {
        value.to_string()
    }
}
