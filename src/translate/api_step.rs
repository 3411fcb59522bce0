//! `api_step` blocks of multistep API tests.

use super::assertion::{build_assertions, flatten_assertions};
use super::options::{build_retry, flatten_retry};
use super::prior;
use super::request::{
    build_api_request, build_files, complete_request, flatten_request_blocks,
    flatten_request_definition, RequestBlocks,
};
use super::value::non_empty;
use super::variable::{build_extracted_values, flatten_extracted_values};
use crate::error::CodecError;
use crate::model::{ApiStep, ApiStepKind, ApiTestStep, ApiWaitStep, API_STEP_RULES};
use crate::schema::Diagnostic;
use crate::state::ApiStepConfig;

pub(crate) fn build_api_steps(
    steps: &[ApiStepConfig],
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<ApiStep>, CodecError> {
    let mut built = Vec::with_capacity(steps.len());
    for (index, step) in steps.iter().enumerate() {
        let prefix = format!("api_step.{}", index);
        let kind = API_STEP_RULES.resolve(step.subtype.as_str(), &step.subtype, &prefix, diagnostics);
        match kind {
            Some(ApiStepKind::Request) => {
                built.push(ApiStep::Request(build_request_step(step, &prefix, diagnostics)?));
            }
            Some(ApiStepKind::Wait) => built.push(ApiStep::Wait(ApiWaitStep {
                name: step.name.clone(),
                subtype: step.subtype.clone(),
                value: step.value,
            })),
            None => {}
        }
    }
    Ok(built)
}

fn build_request_step(
    step: &ApiStepConfig,
    prefix: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<ApiTestStep, CodecError> {
    let definition = step.request_definition.clone().unwrap_or_default();
    let mut request = build_api_request(
        &definition,
        &step.subtype,
        &definition.http_version,
        &format!("{}.request_definition.0", prefix),
        diagnostics,
    )?;

    request.allow_insecure = Some(definition.allow_insecure);
    request.follow_redirects = Some(definition.follow_redirects);
    request.http_version = non_empty(&definition.http_version);
    if matches!(step.subtype.as_str(), "" | "http") {
        request.persist_cookies = Some(definition.persist_cookies);
        request.no_saving_response_body = Some(definition.no_saving_response_body);
        request.files = build_files(&step.request_file);
    }
    complete_request(
        &mut request,
        RequestBlocks::from(step),
        &format!("{}.", prefix),
        diagnostics,
    );

    Ok(ApiTestStep {
        allow_failure: Some(step.allow_failure),
        assertions: build_assertions(&step.assertion, &format!("{}.assertion", prefix), diagnostics),
        extracted_values: build_extracted_values(&step.extracted_value),
        is_critical: Some(step.is_critical),
        name: step.name.clone(),
        request,
        retry: step.retry.as_ref().map(build_retry),
        subtype: step.subtype.clone(),
    })
}

/// Steps the vendor reports with an unrecognized subtype are skipped with a
/// warning.
pub(crate) fn flatten_api_steps(
    steps: &[ApiStep],
    prior: &[ApiStepConfig],
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<ApiStepConfig>, CodecError> {
    let mut flattened = Vec::with_capacity(steps.len());
    for (index, step) in steps.iter().enumerate() {
        let prefix = format!("api_step.{}", index);
        match step {
            ApiStep::Request(step) => {
                let old = prior::find(prior, index, &step.name);
                flattened.push(flatten_request_step(step, old, &prefix, diagnostics)?);
            }
            ApiStep::Wait(step) => flattened.push(ApiStepConfig {
                name: step.name.clone(),
                subtype: step.subtype.clone(),
                value: step.value,
                ..Default::default()
            }),
            ApiStep::Unknown(raw) => {
                let subtype = raw.get("subtype").and_then(|s| s.as_str()).unwrap_or_default();
                API_STEP_RULES.resolve(subtype, subtype, &prefix, diagnostics);
            }
        }
    }
    Ok(flattened)
}

fn flatten_request_step(
    step: &ApiTestStep,
    prior: Option<&ApiStepConfig>,
    prefix: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<ApiStepConfig, CodecError> {
    let request = &step.request;
    let mut definition = flatten_request_definition(request)?;
    definition.allow_insecure = request.allow_insecure.unwrap_or_default();
    definition.follow_redirects = request.follow_redirects.unwrap_or_default();
    if step.subtype == "grpc" && definition.http_version.is_empty() {
        definition.http_version = "any".to_string();
    }

    let mut config = ApiStepConfig {
        name: step.name.clone(),
        subtype: step.subtype.clone(),
        extracted_value: flatten_extracted_values(step.extracted_values.as_deref().unwrap_or_default()),
        request_definition: Some(definition),
        assertion: flatten_assertions(&step.assertions, &format!("{}.assertion", prefix), diagnostics),
        allow_failure: step.allow_failure.unwrap_or_default(),
        is_critical: step.is_critical.unwrap_or_default(),
        retry: step.retry.as_ref().map(flatten_retry),
        ..Default::default()
    };
    flatten_request_blocks(
        request,
        prior.map(RequestBlocks::from),
        &format!("{}.", prefix),
        diagnostics,
    )
    .apply_to_step(&mut config);
    Ok(config)
}
