//! Config variables, browser variables and extracted values.

use super::prior;
use super::value::non_empty;
use crate::model::{BrowserVariable, ConfigVariable, ParsingOptions, VariableParser};
use crate::state::{BrowserVariableConfig, ConfigVariableConfig, ExtractedValueConfig, ParserConfig};

/// Global variables are referenced by id; the rest carry their own values.
pub(crate) fn build_config_variables(configs: &[ConfigVariableConfig]) -> Option<Vec<ConfigVariable>> {
    if configs.is_empty() {
        return None;
    }
    let variables = configs
        .iter()
        .map(|config| {
            let mut variable = ConfigVariable {
                name: config.name.clone(),
                variable_type: config.variable_type.clone(),
                id: non_empty(&config.id),
                ..Default::default()
            };
            if config.variable_type != "global" {
                variable.pattern = Some(config.pattern.clone());
                variable.example = Some(config.example.clone());
                variable.secure = Some(config.secure);
            }
            variable
        })
        .collect();
    Some(variables)
}

/// Secure variables come back without their example and pattern; those are
/// read from the prior entry with the same name.
pub(crate) fn flatten_config_variables(
    variables: &[ConfigVariable],
    prior: &[ConfigVariableConfig],
) -> Vec<ConfigVariableConfig> {
    variables
        .iter()
        .enumerate()
        .map(|(index, variable)| {
            let secure = variable.secure.unwrap_or_default();
            let old = prior::find(prior, index, &variable.name);
            let (example, pattern) = hidden_values(
                secure,
                variable.example.as_deref(),
                variable.pattern.as_deref(),
                old.map(|o| (o.example.as_str(), o.pattern.as_str())),
            );
            ConfigVariableConfig {
                example,
                name: variable.name.clone(),
                pattern,
                variable_type: variable.variable_type.clone(),
                id: variable.id.clone().unwrap_or_default(),
                secure,
            }
        })
        .collect()
}

pub(crate) fn build_browser_variables(configs: &[BrowserVariableConfig]) -> Option<Vec<BrowserVariable>> {
    if configs.is_empty() {
        return None;
    }
    let variables = configs
        .iter()
        .map(|config| BrowserVariable {
            example: Some(config.example.clone()),
            id: non_empty(&config.id),
            name: config.name.clone(),
            pattern: Some(config.pattern.clone()),
            // Only text variables can be secure.
            secure: (config.variable_type == "text").then_some(config.secure),
            variable_type: config.variable_type.clone(),
        })
        .collect();
    Some(variables)
}

pub(crate) fn flatten_browser_variables(
    variables: &[BrowserVariable],
    prior: &[BrowserVariableConfig],
) -> Vec<BrowserVariableConfig> {
    variables
        .iter()
        .enumerate()
        .map(|(index, variable)| {
            let secure = variable.secure.unwrap_or_default();
            let old = prior::find(prior, index, &variable.name);
            let (example, pattern) = hidden_values(
                secure,
                variable.example.as_deref(),
                variable.pattern.as_deref(),
                old.map(|o| (o.example.as_str(), o.pattern.as_str())),
            );
            BrowserVariableConfig {
                example,
                id: variable.id.clone().unwrap_or_default(),
                name: variable.name.clone(),
                pattern,
                variable_type: variable.variable_type.clone(),
                secure,
            }
        })
        .collect()
}

/// Example and pattern, falling back to the prior entry for secure variables
/// whose values the vendor withheld.
fn hidden_values(
    secure: bool,
    example: Option<&str>,
    pattern: Option<&str>,
    prior: Option<(&str, &str)>,
) -> (String, String) {
    let (prior_example, prior_pattern) = prior.unwrap_or_default();
    let pick = |returned: Option<&str>, prior: &str| match returned {
        Some(value) if !value.is_empty() => value.to_string(),
        _ if secure => prior.to_string(),
        _ => String::new(),
    };
    (pick(example, prior_example), pick(pattern, prior_pattern))
}

pub(crate) fn build_extracted_values(configs: &[ExtractedValueConfig]) -> Option<Vec<ParsingOptions>> {
    if configs.is_empty() {
        return None;
    }
    let values = configs
        .iter()
        .map(|config| ParsingOptions {
            field: non_empty(&config.field),
            name: Some(config.name.clone()),
            parser: config.parser.as_ref().map(|parser| VariableParser {
                parser_type: parser.parser_type.clone(),
                value: non_empty(&parser.value),
            }),
            secure: Some(config.secure),
            parsing_type: Some(config.value_type.clone()),
        })
        .collect();
    Some(values)
}

pub(crate) fn flatten_extracted_values(values: &[ParsingOptions]) -> Vec<ExtractedValueConfig> {
    values
        .iter()
        .map(|value| ExtractedValueConfig {
            name: value.name.clone().unwrap_or_default(),
            value_type: value.parsing_type.clone().unwrap_or_default(),
            field: value.field.clone().unwrap_or_default(),
            parser: value.parser.as_ref().map(|parser| ParserConfig {
                parser_type: parser.parser_type.clone(),
                value: parser.value.clone().unwrap_or_default(),
            }),
            secure: value.secure.unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_variable(name: &str, variable_type: &str, secure: bool) -> ConfigVariableConfig {
        ConfigVariableConfig {
            name: name.to_string(),
            variable_type: variable_type.to_string(),
            example: "123".to_string(),
            pattern: "{{ numeric(3) }}".to_string(),
            secure,
            ..Default::default()
        }
    }

    #[test]
    fn test_global_variable_sends_only_reference() {
        let mut global = config_variable("GLOBAL", "global", false);
        global.id = "76636cd1-82e2-4aeb-9cfe-51366a8198a2".to_string();

        let built = build_config_variables(&[global]).unwrap();

        assert_eq!(built[0].id.as_deref(), Some("76636cd1-82e2-4aeb-9cfe-51366a8198a2"));
        assert_eq!(built[0].example, None);
        assert_eq!(built[0].pattern, None);
        assert_eq!(built[0].secure, None);
    }

    #[test]
    fn test_secure_variable_reads_prior_values() {
        let prior = vec![
            config_variable("OTHER", "text", false),
            config_variable("SECRET", "text", true),
        ];
        let returned = vec![ConfigVariable {
            name: "SECRET".to_string(),
            variable_type: "text".to_string(),
            secure: Some(true),
            ..Default::default()
        }];

        let flattened = flatten_config_variables(&returned, &prior);

        assert_eq!(flattened[0], prior[1]);
    }

    #[test]
    fn test_config_variables_round_trip() {
        let configs = vec![config_variable("CODE", "text", false)];

        let built = build_config_variables(&configs).unwrap();

        assert_eq!(flatten_config_variables(&built, &[]), configs);
        assert_eq!(build_config_variables(&[]), None);
    }

    #[test]
    fn test_browser_variable_secure_only_for_text() {
        let configs = vec![
            BrowserVariableConfig {
                name: "EMAIL".to_string(),
                variable_type: "email".to_string(),
                secure: true,
                ..Default::default()
            },
            BrowserVariableConfig {
                name: "TOKEN".to_string(),
                variable_type: "text".to_string(),
                secure: true,
                example: "abc".to_string(),
                ..Default::default()
            },
        ];

        let built = build_browser_variables(&configs).unwrap();

        assert_eq!(built[0].secure, None);
        assert_eq!(built[0].example.as_deref(), Some(""));
        assert_eq!(built[1].secure, Some(true));
    }

    #[test]
    fn test_secure_browser_variable_keeps_prior_example() {
        let prior = vec![BrowserVariableConfig {
            name: "TOKEN".to_string(),
            variable_type: "text".to_string(),
            secure: true,
            example: "abc".to_string(),
            ..Default::default()
        }];
        let returned = vec![BrowserVariable {
            name: "TOKEN".to_string(),
            variable_type: "text".to_string(),
            secure: Some(true),
            ..Default::default()
        }];

        assert_eq!(flatten_browser_variables(&returned, &prior), prior);
    }

    #[test]
    fn test_extracted_values_round_trip() {
        let configs = vec![ExtractedValueConfig {
            name: "TOKEN".to_string(),
            value_type: "http_body".to_string(),
            field: String::new(),
            parser: Some(ParserConfig {
                parser_type: "json_path".to_string(),
                value: "$.token".to_string(),
            }),
            secure: true,
        }];

        let built = build_extracted_values(&configs).unwrap();
        assert_eq!(built[0].field, None);
        assert_eq!(built[0].parser.as_ref().unwrap().value.as_deref(), Some("$.token"));

        assert_eq!(flatten_extracted_values(&built), configs);
    }
}
