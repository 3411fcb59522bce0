//! Schema of the `synthetics_test` resource.
//!
//! Validation and default filling run against this schema before a
//! configuration is deserialized into a [`TestConfig`](crate::state::TestConfig).

use serde_json::{json, Value};

use crate::schema::{Attribute, AttributeFlags, AttributeType, Block, NestedBlock, Schema};
use crate::translate::STEP_PARAMS;

/// Resource type name.
pub const SYNTHETICS_TEST: &str = "synthetics_test";

/// Variable names: uppercase letters, digits and underscores.
pub const VARIABLE_NAME_PATTERN: &str = "^[A-Z][A-Z0-9_]+[A-Z0-9]$";

const TEST_TYPES: &[&str] = &["api", "browser"];
const TEST_SUBTYPES: &[&str] = &["http", "ssl", "tcp", "dns", "multi", "icmp", "udp", "websocket", "grpc"];
const TEST_STATUSES: &[&str] = &["live", "paused"];
const HTTP_VERSIONS: &[&str] = &["http1", "http2", "any"];
const BASIC_AUTH_TYPES: &[&str] = &["web", "sigv4", "ntlm", "oauth-client", "oauth-rop", "digest"];
const TOKEN_API_AUTHENTICATIONS: &[&str] = &["header", "body"];
const CALL_TYPES: &[&str] = &["healthcheck", "unary"];
const API_STEP_SUBTYPES: &[&str] = &["http", "grpc", "ssl", "dns", "tcp", "udp", "icmp", "websocket", "wait"];
const EXTRACTED_VALUE_TYPES: &[&str] = &["grpc_message", "grpc_metadata", "http_body", "http_header", "http_status_code"];
const PARSER_TYPES: &[&str] = &["raw", "json_path", "regex", "x_path"];
const TIMINGS_SCOPES: &[&str] = &["all", "withoutDNS"];
const CLICK_TYPES: &[&str] = &["contextual", "double", "primary"];
const MODIFIERS: &[&str] = &["Alt", "Control", "meta", "Shift"];
const LOCATOR_TYPES: &[&str] = &["css", "xpath"];
const BROWSER_VARIABLE_TYPES: &[&str] = &["element", "email", "global", "javascript", "text"];
const CONFIG_VARIABLE_TYPES: &[&str] = &["global", "text"];
const EXECUTION_RULES: &[&str] = &["blocking", "non_blocking", "skipped"];

/// The full resource schema.
pub fn synthetics_test_schema() -> Schema {
    Schema::v0()
        .with_attribute(
            "id",
            Attribute::computed_string().with_description("Public id of the test."),
        )
        .with_attribute(
            "type",
            Attribute::required_string()
                .with_description("Synthetics test type.")
                .with_allowed_values(TEST_TYPES),
        )
        .with_attribute(
            "subtype",
            Attribute::optional_string()
                .with_description("Subtype of an API test. The vendor uses `http` when unset.")
                .with_allowed_values(TEST_SUBTYPES),
        )
        .with_attribute("name", Attribute::required_string().with_description("Name of the test."))
        .with_attribute(
            "message",
            Attribute::optional_string()
                .with_description("Notification message.")
                .with_default(json!("")),
        )
        .with_attribute(
            "status",
            Attribute::required_string().with_allowed_values(TEST_STATUSES),
        )
        .with_attribute(
            "locations",
            Attribute::new(AttributeType::set(AttributeType::String), AttributeFlags::required())
                .with_description("Locations the test runs from."),
        )
        .with_attribute("tags", Attribute::optional_string_list())
        .with_attribute(
            "monitor_id",
            Attribute::computed_int64().with_description("Monitor associated with the test."),
        )
        .with_attribute(
            "device_ids",
            Attribute::optional_string_list().with_description("Devices a browser test runs on."),
        )
        .with_attribute("variables_from_script", Attribute::optional_string())
        .with_attribute("set_cookie", Attribute::optional_string())
        .with_attribute(
            "force_delete_dependencies",
            Attribute::optional_bool()
                .with_description("Delete the test even if other resources reference it.")
                .with_default(json!(false)),
        )
        .with_block("request_definition", NestedBlock::single(request_definition(false)))
        .with_attribute("request_headers", Attribute::optional_string_map())
        .with_attribute("request_query", Attribute::optional_string_map())
        .with_attribute("request_metadata", Attribute::optional_string_map())
        .with_block("request_basicauth", NestedBlock::single(basic_auth()))
        .with_block("request_client_certificate", NestedBlock::single(client_certificate()))
        .with_block("request_proxy", NestedBlock::single(proxy()))
        .with_block("request_file", NestedBlock::list(request_file()))
        .with_block("assertion", NestedBlock::list(assertion()))
        .with_block("config_variable", NestedBlock::list(config_variable()))
        .with_block("browser_variable", NestedBlock::list(browser_variable()))
        .with_block("options_list", NestedBlock::single(options()))
        .with_block("api_step", NestedBlock::list(api_step()))
        .with_block("browser_step", NestedBlock::list(browser_step()))
}

fn string_with_default(default: &str) -> Attribute {
    Attribute::optional_string().with_default(Value::from(default))
}

/// `for_step` adds the attributes only API steps read from this block.
fn request_definition(for_step: bool) -> Block {
    let block = Block::new()
        .with_attribute("method", Attribute::optional_string())
        .with_attribute("url", Attribute::optional_string())
        .with_attribute("body", Attribute::optional_string())
        .with_attribute("body_type", Attribute::optional_string())
        .with_attribute("timeout", Attribute::optional_int64().with_int_range(0, 60))
        .with_attribute("host", Attribute::optional_string())
        .with_attribute("port", Attribute::optional_string())
        .with_attribute("dns_server", Attribute::optional_string())
        .with_attribute("dns_server_port", Attribute::optional_string())
        .with_attribute("no_saving_response_body", Attribute::optional_bool())
        .with_attribute(
            "number_of_packets",
            Attribute::optional_int64().with_int_range(0, 10),
        )
        .with_attribute("should_track_hops", Attribute::optional_bool())
        .with_attribute("servername", Attribute::optional_string())
        .with_attribute("message", Attribute::optional_string())
        .with_attribute(
            "call_type",
            Attribute::optional_string().with_allowed_values(CALL_TYPES),
        )
        .with_attribute("service", Attribute::optional_string())
        .with_attribute("certificate_domains", Attribute::optional_string_list())
        .with_attribute("persist_cookies", Attribute::optional_bool())
        .with_attribute(
            "proto_json_descriptor",
            Attribute::optional_string().with_description("gRPC JSON descriptor, sent compressed."),
        )
        .with_attribute(
            "plain_proto_file",
            Attribute::optional_string().with_description("gRPC proto file, sent compressed."),
        );

    if !for_step {
        return block;
    }
    block
        .with_attribute(
            "http_version",
            string_with_default("any").with_allowed_values(HTTP_VERSIONS),
        )
        .with_attribute("allow_insecure", Attribute::optional_bool())
        .with_attribute("follow_redirects", Attribute::optional_bool())
}

fn basic_auth() -> Block {
    Block::new()
        .with_attribute(
            "type",
            string_with_default("web").with_allowed_values(BASIC_AUTH_TYPES),
        )
        .with_attribute("username", Attribute::optional_string())
        .with_attribute("password", Attribute::optional_string().sensitive())
        .with_attribute("access_key", Attribute::optional_string().sensitive())
        .with_attribute("secret_key", Attribute::optional_string().sensitive())
        .with_attribute("session_token", Attribute::optional_string().sensitive())
        .with_attribute("region", Attribute::optional_string())
        .with_attribute("service_name", Attribute::optional_string())
        .with_attribute("domain", Attribute::optional_string())
        .with_attribute("workstation", Attribute::optional_string())
        .with_attribute("access_token_url", Attribute::optional_string())
        .with_attribute("audience", string_with_default(""))
        .with_attribute("resource", string_with_default(""))
        .with_attribute("scope", string_with_default(""))
        .with_attribute(
            "token_api_authentication",
            Attribute::optional_string().with_allowed_values(TOKEN_API_AUTHENTICATIONS),
        )
        .with_attribute("client_id", Attribute::optional_string())
        .with_attribute("client_secret", Attribute::optional_string().sensitive())
}

fn client_certificate() -> Block {
    let file = || {
        Block::new()
            .with_attribute(
                "content",
                Attribute::required_string()
                    .sensitive()
                    .with_description("Plaintext content. State keeps its SHA-256 digest."),
            )
            .with_attribute("filename", string_with_default("Provided in Terraform config"))
    };
    Block::new()
        .with_block("cert", NestedBlock::single(file()).with_min_items(1))
        .with_block("key", NestedBlock::single(file()).with_min_items(1))
}

fn proxy() -> Block {
    Block::new()
        .with_attribute("url", Attribute::required_string())
        .with_attribute("headers", Attribute::optional_string_map())
}

fn request_file() -> Block {
    Block::new()
        .with_attribute("content", Attribute::optional_string())
        .with_attribute(
            "bucket_key",
            Attribute::computed_string().with_description("Storage key of the uploaded content."),
        )
        .with_attribute("name", Attribute::required_string())
        .with_attribute("original_file_name", Attribute::optional_string())
        .with_attribute("size", Attribute::required_int64().with_int_range(1, 3_145_728))
        .with_attribute("type", Attribute::required_string())
}

fn assertion() -> Block {
    Block::new()
        .with_attribute("type", Attribute::required_string())
        .with_attribute("operator", Attribute::optional_string())
        .with_attribute("property", Attribute::optional_string())
        .with_attribute("target", Attribute::optional_string())
        .with_attribute("code", Attribute::optional_string())
        .with_attribute(
            "timings_scope",
            Attribute::optional_string().with_allowed_values(TIMINGS_SCOPES),
        )
        .with_block(
            "targetjsonschema",
            NestedBlock::single(
                Block::new()
                    .with_attribute("jsonschema", Attribute::required_string())
                    .with_attribute("metaschema", string_with_default("draft-07")),
            ),
        )
        .with_block(
            "targetjsonpath",
            NestedBlock::single(
                Block::new()
                    .with_attribute("jsonpath", Attribute::required_string())
                    .with_attribute("operator", Attribute::required_string())
                    .with_attribute("targetvalue", Attribute::optional_string())
                    .with_attribute("elementsoperator", string_with_default("firstElementMatches")),
            ),
        )
        .with_block(
            "targetxpath",
            NestedBlock::single(
                Block::new()
                    .with_attribute("xpath", Attribute::required_string())
                    .with_attribute("operator", Attribute::required_string())
                    .with_attribute("targetvalue", Attribute::optional_string()),
            ),
        )
}

fn retry() -> Block {
    Block::new()
        .with_attribute("count", Attribute::optional_int64().with_default(json!(0)))
        .with_attribute(
            "interval",
            Attribute::optional_int64()
                .with_description("Milliseconds between retries.")
                .with_default(json!(300)),
        )
}

fn options() -> Block {
    let timeframe = Block::new()
        .with_attribute("day", Attribute::required_int64().with_int_range(1, 7))
        .with_attribute("from", Attribute::required_string())
        .with_attribute("to", Attribute::required_string());

    Block::new()
        .with_attribute(
            "tick_every",
            Attribute::required_int64()
                .with_description("Seconds between runs.")
                .with_int_range(30, 604_800),
        )
        .with_attribute(
            "http_version",
            string_with_default("any").with_allowed_values(HTTP_VERSIONS),
        )
        .with_attribute("accept_self_signed", Attribute::optional_bool())
        .with_attribute("check_certificate_revocation", Attribute::optional_bool())
        .with_attribute(
            "min_location_failed",
            Attribute::optional_int64().with_default(json!(1)),
        )
        .with_attribute("min_failure_duration", Attribute::optional_int64())
        .with_attribute("follow_redirects", Attribute::optional_bool())
        .with_attribute("allow_insecure", Attribute::optional_bool())
        .with_block(
            "scheduling",
            NestedBlock::single(
                Block::new()
                    .with_block("timeframes", NestedBlock::set(timeframe).with_min_items(1))
                    .with_attribute("timezone", Attribute::required_string()),
            ),
        )
        .with_block("retry", NestedBlock::single(retry()))
        .with_block(
            "monitor_options",
            NestedBlock::single(
                Block::new().with_attribute(
                    "renotify_interval",
                    Attribute::optional_int64().with_default(json!(0)),
                ),
            ),
        )
        .with_attribute("monitor_name", Attribute::optional_string())
        .with_attribute(
            "monitor_priority",
            Attribute::optional_int64().with_int_range(1, 5),
        )
        .with_attribute(
            "restricted_roles",
            Attribute::new(AttributeType::set(AttributeType::String), AttributeFlags::optional()),
        )
        .with_block(
            "ci",
            NestedBlock::single(Block::new().with_attribute(
                "execution_rule",
                Attribute::optional_string().with_allowed_values(EXECUTION_RULES),
            )),
        )
        .with_attribute("ignore_server_certificate_error", Attribute::optional_bool())
        .with_attribute("no_screenshot", Attribute::optional_bool())
        .with_block(
            "rum_settings",
            NestedBlock::single(
                Block::new()
                    .with_attribute("is_enabled", Attribute::required_bool())
                    .with_attribute("application_id", Attribute::optional_string())
                    .with_attribute("client_token_id", Attribute::optional_int64().sensitive()),
            ),
        )
        .with_attribute("disable_csp", Attribute::optional_bool())
        .with_attribute("disable_cors", Attribute::optional_bool())
        .with_attribute("initial_navigation_timeout", Attribute::optional_int64())
}

fn api_step() -> Block {
    let extracted_value = Block::new()
        .with_attribute("name", Attribute::required_string())
        .with_attribute(
            "type",
            Attribute::required_string().with_allowed_values(EXTRACTED_VALUE_TYPES),
        )
        .with_attribute("field", Attribute::optional_string())
        .with_block(
            "parser",
            NestedBlock::single(
                Block::new()
                    .with_attribute(
                        "type",
                        Attribute::required_string().with_allowed_values(PARSER_TYPES),
                    )
                    .with_attribute("value", Attribute::optional_string()),
            )
            .with_min_items(1),
        )
        .with_attribute("secure", Attribute::optional_bool());

    Block::new()
        .with_attribute("name", Attribute::required_string())
        .with_attribute(
            "subtype",
            string_with_default("http").with_allowed_values(API_STEP_SUBTYPES),
        )
        .with_block("extracted_value", NestedBlock::list(extracted_value))
        .with_block("request_definition", NestedBlock::single(request_definition(true)))
        .with_attribute("request_headers", Attribute::optional_string_map())
        .with_attribute("request_query", Attribute::optional_string_map())
        .with_attribute("request_metadata", Attribute::optional_string_map())
        .with_block("request_basicauth", NestedBlock::single(basic_auth()))
        .with_block("request_client_certificate", NestedBlock::single(client_certificate()))
        .with_block("request_proxy", NestedBlock::single(proxy()))
        .with_block("request_file", NestedBlock::list(request_file()))
        .with_block("assertion", NestedBlock::list(assertion()))
        .with_attribute("allow_failure", Attribute::optional_bool())
        .with_attribute("is_critical", Attribute::optional_bool())
        .with_block("retry", NestedBlock::single(retry()))
        .with_attribute(
            "value",
            Attribute::optional_int64()
                .with_description("Seconds to wait, for `wait` steps.")
                .with_int_range(0, 180),
        )
}

fn browser_step() -> Block {
    let step_types: Vec<&str> = STEP_PARAMS.iter().map(|(name, _)| *name).collect();
    let user_locator = Block::new()
        .with_attribute(
            "fail_test_on_cannot_locate",
            Attribute::optional_bool().with_default(json!(false)),
        )
        .with_block(
            "value",
            NestedBlock::single(
                Block::new()
                    .with_attribute(
                        "type",
                        string_with_default("css").with_allowed_values(LOCATOR_TYPES),
                    )
                    .with_attribute("value", Attribute::required_string()),
            )
            .with_min_items(1),
        );
    let params = Block::new()
        .with_attribute("attribute", Attribute::optional_string())
        .with_attribute("check", Attribute::optional_string())
        .with_attribute(
            "click_type",
            Attribute::optional_string().with_allowed_values(CLICK_TYPES),
        )
        .with_attribute("code", Attribute::optional_string())
        .with_attribute("delay", Attribute::optional_int64())
        .with_attribute("element", Attribute::optional_string().with_description("Element JSON."))
        .with_block("element_user_locator", NestedBlock::single(user_locator))
        .with_attribute("email", Attribute::optional_string())
        .with_attribute("file", Attribute::optional_string())
        .with_attribute("files", Attribute::optional_string())
        .with_attribute(
            "modifiers",
            Attribute::optional_string_list().with_allowed_values(MODIFIERS),
        )
        .with_attribute("playing_tab_id", Attribute::optional_string())
        .with_attribute("request", Attribute::optional_string())
        .with_attribute("subtest_public_id", Attribute::optional_string())
        .with_attribute("value", Attribute::optional_string())
        .with_block(
            "variable",
            NestedBlock::single(
                Block::new()
                    .with_attribute("name", Attribute::optional_string())
                    .with_attribute("example", Attribute::optional_string()),
            ),
        )
        .with_attribute("with_click", Attribute::optional_bool())
        .with_attribute("x", Attribute::optional_int64())
        .with_attribute("y", Attribute::optional_int64());

    Block::new()
        .with_attribute("name", Attribute::required_string())
        .with_attribute(
            "type",
            Attribute::required_string().with_allowed_values(&step_types),
        )
        .with_attribute("allow_failure", Attribute::optional_bool())
        .with_attribute("is_critical", Attribute::optional_bool())
        .with_attribute("timeout", Attribute::optional_int64())
        .with_attribute("force_element_update", Attribute::optional_bool())
        .with_attribute("no_screenshot", Attribute::optional_bool())
        .with_block("params", NestedBlock::single(params).with_min_items(1))
}

fn config_variable() -> Block {
    Block::new()
        .with_attribute(
            "name",
            Attribute::required_string().with_pattern(VARIABLE_NAME_PATTERN),
        )
        .with_attribute(
            "type",
            Attribute::required_string().with_allowed_values(CONFIG_VARIABLE_TYPES),
        )
        .with_attribute("example", Attribute::optional_string())
        .with_attribute("pattern", Attribute::optional_string())
        .with_attribute("id", Attribute::optional_string())
        .with_attribute("secure", Attribute::optional_bool().with_default(json!(false)))
}

fn browser_variable() -> Block {
    Block::new()
        .with_attribute(
            "name",
            Attribute::required_string().with_pattern(VARIABLE_NAME_PATTERN),
        )
        .with_attribute(
            "type",
            Attribute::required_string().with_allowed_values(BROWSER_VARIABLE_TYPES),
        )
        .with_attribute("example", string_with_default(""))
        .with_attribute("pattern", Attribute::optional_string())
        .with_attribute("id", Attribute::optional_string())
        .with_attribute("secure", Attribute::optional_bool())
}
