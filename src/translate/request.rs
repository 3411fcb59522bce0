//! Request blocks shared by tests and API steps.

use serde_json::Value;

use super::auth::{build_basic_auth, flatten_basic_auth};
use super::prior;
use super::value::{convert_to_string, if_true, non_empty, non_zero};
use super::warning;
use crate::codec::{compress_and_encode, decode_and_decompress};
use crate::error::CodecError;
use crate::model::{BodyFile, CertificateItem, RequestCertificate, RequestPort, RequestProxy, TestRequest};
use crate::schema::Diagnostic;
use crate::secret;
use crate::state::{
    ApiStepConfig, BasicAuthConfig, CertificateFileConfig, ClientCertificateConfig, ProxyConfig,
    RequestConfig, RequestFileConfig, StringMap, TestConfig,
};

/// Methods that carry no body unless HTTP/1 is forced.
const BODYLESS_METHODS: &[&str] = &["GET", "HEAD", "DELETE"];

/// Borrowed view of the `request_*` blocks of a test or an API step.
#[derive(Clone, Copy)]
pub(crate) struct RequestBlocks<'a> {
    pub headers: &'a StringMap,
    pub query: &'a StringMap,
    pub metadata: &'a StringMap,
    pub basicauth: Option<&'a BasicAuthConfig>,
    pub certificate: Option<&'a ClientCertificateConfig>,
    pub proxy: Option<&'a ProxyConfig>,
    pub files: &'a [RequestFileConfig],
}

impl<'a> From<&'a TestConfig> for RequestBlocks<'a> {
    fn from(config: &'a TestConfig) -> Self {
        Self {
            headers: &config.request_headers,
            query: &config.request_query,
            metadata: &config.request_metadata,
            basicauth: config.request_basicauth.as_ref(),
            certificate: config.request_client_certificate.as_ref(),
            proxy: config.request_proxy.as_ref(),
            files: &config.request_file,
        }
    }
}

impl<'a> From<&'a ApiStepConfig> for RequestBlocks<'a> {
    fn from(step: &'a ApiStepConfig) -> Self {
        Self {
            headers: &step.request_headers,
            query: &step.request_query,
            metadata: &step.request_metadata,
            basicauth: step.request_basicauth.as_ref(),
            certificate: step.request_client_certificate.as_ref(),
            proxy: step.request_proxy.as_ref(),
            files: &step.request_file,
        }
    }
}

/// Owned `request_*` blocks read back from a request.
#[derive(Debug, Default)]
pub(crate) struct FlattenedBlocks {
    pub headers: StringMap,
    pub query: StringMap,
    pub metadata: StringMap,
    pub basicauth: Option<BasicAuthConfig>,
    pub certificate: Option<ClientCertificateConfig>,
    pub proxy: Option<ProxyConfig>,
    pub files: Vec<RequestFileConfig>,
}

impl FlattenedBlocks {
    pub fn apply_to_test(self, config: &mut TestConfig) {
        config.request_headers = self.headers;
        config.request_query = self.query;
        config.request_metadata = self.metadata;
        config.request_basicauth = self.basicauth;
        config.request_client_certificate = self.certificate;
        config.request_proxy = self.proxy;
        config.request_file = self.files;
    }

    pub fn apply_to_step(self, step: &mut ApiStepConfig) {
        step.request_headers = self.headers;
        step.request_query = self.query;
        step.request_metadata = self.metadata;
        step.request_basicauth = self.basicauth;
        step.request_client_certificate = self.certificate;
        step.request_proxy = self.proxy;
        step.request_file = self.files;
    }
}

/// Attach headers, query, metadata, credentials, certificate and proxy.
///
/// `prefix` is the attribute path of the owning block, e.g. `api_step.0.`.
pub(crate) fn complete_request(
    request: &mut TestRequest,
    blocks: RequestBlocks<'_>,
    prefix: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if !blocks.headers.is_empty() {
        request.headers = Some(blocks.headers.clone());
    }
    if !blocks.query.is_empty() {
        request.query = Some(string_values(blocks.query));
    }
    if let Some(auth) = blocks.basicauth {
        let attribute = format!("{}request_basicauth.0", prefix);
        request.basic_auth = build_basic_auth(auth, &attribute, diagnostics);
    }
    if let Some(certificate) = blocks.certificate {
        request.certificate = Some(build_certificate(certificate));
    }
    if let Some(proxy) = blocks.proxy {
        request.proxy = Some(build_proxy(proxy));
    }
    if !blocks.metadata.is_empty() {
        request.metadata = Some(blocks.metadata.clone());
    }
}

/// Read back the `request_*` blocks, carrying secrets from `prior`.
pub(crate) fn flatten_request_blocks(
    request: &TestRequest,
    prior: Option<RequestBlocks<'_>>,
    prefix: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> FlattenedBlocks {
    let basicauth = request.basic_auth.as_ref().and_then(|auth| {
        let attribute = format!("{}request_basicauth.0", prefix);
        flatten_basic_auth(auth, prior.and_then(|p| p.basicauth), &attribute, diagnostics)
    });

    FlattenedBlocks {
        headers: request.headers.clone().unwrap_or_default(),
        query: request
            .query
            .iter()
            .flatten()
            .map(|(key, value)| (key.clone(), convert_to_string(value)))
            .collect(),
        metadata: request.metadata.clone().unwrap_or_default(),
        basicauth,
        certificate: request
            .certificate
            .as_ref()
            .map(|certificate| flatten_certificate(certificate, prior.and_then(|p| p.certificate))),
        proxy: request.proxy.as_ref().map(flatten_proxy),
        files: request
            .files
            .as_deref()
            .map(|files| flatten_files(files, prior.map_or(&[][..], |p| p.files)))
            .unwrap_or_default(),
    }
}

fn string_values(map: &StringMap) -> std::collections::BTreeMap<String, Value> {
    map.iter()
        .map(|(key, value)| (key.clone(), Value::from(value.as_str())))
        .collect()
}

/// The body to send, if `method` and `http_version` allow one.
pub(crate) fn request_body(
    body: &str,
    method: &str,
    http_version: &str,
    attribute: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    if BODYLESS_METHODS.contains(&method) && http_version != "http1" {
        warning(
            diagnostics,
            attribute,
            "Request body ignored",
            format!("a body is not valid for {} requests unless http_version is http1", method),
        );
        return None;
    }
    Some(body.to_string())
}

/// Compress non-empty text for the wire.
fn encode_payload(text: &str) -> Result<Option<String>, CodecError> {
    if text.is_empty() {
        return Ok(None);
    }
    compress_and_encode(text).map(Some)
}

/// A port is always sent in its variable (string) form.
fn variable_port(port: &str) -> Option<RequestPort> {
    non_empty(port).map(RequestPort::Variable)
}

/// The request of an API test or API step from its `request_definition`.
///
/// `http_version` selects whether a body is allowed on bodyless methods.
pub(crate) fn build_api_request(
    definition: &RequestConfig,
    subtype: &str,
    http_version: &str,
    attribute: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<TestRequest, CodecError> {
    let body_attribute = format!("{}.body", attribute);
    Ok(TestRequest {
        method: non_empty(&definition.method),
        url: non_empty(&definition.url),
        body: request_body(
            &definition.body,
            &definition.method,
            http_version,
            &body_attribute,
            diagnostics,
        ),
        body_type: non_empty(&definition.body_type),
        timeout: non_zero(definition.timeout).map(|timeout| timeout as f64),
        host: non_empty(&definition.host),
        port: variable_port(&definition.port),
        dns_server: non_empty(&definition.dns_server),
        dns_server_port: non_empty(&definition.dns_server_port),
        no_saving_response_body: if_true(definition.no_saving_response_body),
        number_of_packets: non_zero(definition.number_of_packets),
        should_track_hops: if_true(definition.should_track_hops),
        servername: non_empty(&definition.servername),
        message: non_empty(&definition.message),
        call_type: non_empty(&definition.call_type),
        // gRPC health checks need the field even when it is empty.
        service: if subtype == "grpc" {
            Some(definition.service.clone())
        } else {
            non_empty(&definition.service)
        },
        persist_cookies: if_true(definition.persist_cookies),
        compressed_json_descriptor: encode_payload(&definition.proto_json_descriptor)?,
        compressed_proto_file: encode_payload(&definition.plain_proto_file)?,
        ..Default::default()
    })
}

/// The `request_definition` fields a request carries.
///
/// `allow_insecure` and `follow_redirects` are left to the API step caller.
pub(crate) fn flatten_request_definition(request: &TestRequest) -> Result<RequestConfig, CodecError> {
    let decode = |payload: &Option<String>| -> Result<String, CodecError> {
        payload.as_deref().map(decode_and_decompress).transpose().map(Option::unwrap_or_default)
    };

    Ok(RequestConfig {
        method: request.method.clone().unwrap_or_default(),
        url: request.url.clone().unwrap_or_default(),
        body: request.body.clone().unwrap_or_default(),
        body_type: request.body_type.clone().unwrap_or_default(),
        timeout: request.timeout.map(|timeout| timeout as i64).unwrap_or_default(),
        host: request.host.clone().unwrap_or_default(),
        port: request.port.as_ref().map(RequestPort::to_config_string).unwrap_or_default(),
        dns_server: request.dns_server.clone().unwrap_or_default(),
        dns_server_port: request.dns_server_port.clone().unwrap_or_default(),
        no_saving_response_body: request.no_saving_response_body.unwrap_or_default(),
        number_of_packets: request.number_of_packets.unwrap_or_default(),
        should_track_hops: request.should_track_hops.unwrap_or_default(),
        servername: request.servername.clone().unwrap_or_default(),
        message: request.message.clone().unwrap_or_default(),
        call_type: request.call_type.clone().unwrap_or_default(),
        service: request.service.clone().unwrap_or_default(),
        certificate_domains: request.certificate_domains.clone().unwrap_or_default(),
        persist_cookies: request.persist_cookies.unwrap_or_default(),
        proto_json_descriptor: decode(&request.compressed_json_descriptor)?,
        plain_proto_file: decode(&request.compressed_proto_file)?,
        http_version: request.http_version.clone().unwrap_or_default(),
        allow_insecure: false,
        follow_redirects: false,
    })
}

pub(crate) fn build_certificate(config: &ClientCertificateConfig) -> RequestCertificate {
    let item = |file: Option<&CertificateFileConfig>| {
        let file = file.cloned().unwrap_or_default();
        CertificateItem {
            content: secret::submitted_content(&file.content),
            filename: non_empty(&file.filename),
            updated_at: None,
        }
    };

    RequestCertificate {
        cert: Some(item(config.cert.as_ref())),
        key: Some(item(config.key.as_ref())),
    }
}

/// Content is never returned; state keeps the digest of the prior content.
pub(crate) fn flatten_certificate(
    certificate: &RequestCertificate,
    prior: Option<&ClientCertificateConfig>,
) -> ClientCertificateConfig {
    let item = |returned: Option<&CertificateItem>, prior: Option<&CertificateFileConfig>| {
        let content = prior
            .map(|file| file.content.as_str())
            .filter(|content| !content.is_empty())
            .map(secret::state_value)
            .unwrap_or_default();
        CertificateFileConfig {
            content,
            filename: returned.and_then(|item| item.filename.clone()).unwrap_or_default(),
        }
    };

    ClientCertificateConfig {
        cert: Some(item(
            certificate.cert.as_ref(),
            prior.and_then(|p| p.cert.as_ref()),
        )),
        key: Some(item(
            certificate.key.as_ref(),
            prior.and_then(|p| p.key.as_ref()),
        )),
    }
}

pub(crate) fn build_proxy(config: &ProxyConfig) -> RequestProxy {
    RequestProxy {
        headers: Some(config.headers.clone()),
        url: config.url.clone(),
    }
}

pub(crate) fn flatten_proxy(proxy: &RequestProxy) -> ProxyConfig {
    ProxyConfig {
        url: proxy.url.clone(),
        headers: proxy.headers.clone().unwrap_or_default(),
    }
}

/// Body files. The bucket key is never sent, so content is uploaded on
/// every change.
pub(crate) fn build_files(files: &[RequestFileConfig]) -> Option<Vec<BodyFile>> {
    if files.is_empty() {
        return None;
    }
    let files = files
        .iter()
        .map(|file| BodyFile {
            bucket_key: None,
            content: non_empty(&file.content),
            name: Some(file.name.clone()),
            original_file_name: Some(file.original_file_name.clone()),
            size: Some(file.size),
            file_type: Some(file.file_type.clone()),
        })
        .collect();
    Some(files)
}

/// Content comes from the prior entry with the same name; the vendor only
/// returns a bucket key.
pub(crate) fn flatten_files(files: &[BodyFile], prior: &[RequestFileConfig]) -> Vec<RequestFileConfig> {
    files
        .iter()
        .enumerate()
        .map(|(index, file)| {
            let name = file.name.clone().unwrap_or_default();
            let content = prior::find(prior, index, &name)
                .map(|old| old.content.clone())
                .unwrap_or_default();
            RequestFileConfig {
                content,
                bucket_key: file.bucket_key.clone().unwrap_or_default(),
                original_file_name: file.original_file_name.clone().unwrap_or_default(),
                size: file.size.unwrap_or_default(),
                file_type: file.file_type.clone().unwrap_or_default(),
                name,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn certificate(content: &str) -> ClientCertificateConfig {
        ClientCertificateConfig {
            cert: Some(CertificateFileConfig {
                content: content.to_string(),
                filename: "cert.pem".to_string(),
            }),
            key: Some(CertificateFileConfig {
                content: content.to_string(),
                filename: "key.pem".to_string(),
            }),
        }
    }

    #[test]
    fn test_body_is_dropped_for_get() {
        let mut diagnostics = Vec::new();

        let body = request_body("{}", "GET", "any", "request_definition.0.body", &mut diagnostics);

        assert_eq!(body, None);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_body_is_kept_for_http1_or_post() {
        let mut diagnostics = Vec::new();

        assert_eq!(request_body("{}", "GET", "http1", "b", &mut diagnostics).as_deref(), Some("{}"));
        assert_eq!(request_body("{}", "POST", "any", "b", &mut diagnostics).as_deref(), Some("{}"));
        assert_eq!(request_body("", "GET", "any", "b", &mut diagnostics), None);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_certificate_plaintext_is_submitted_once() {
        let built = build_certificate(&certificate("-----BEGIN CERTIFICATE-----"));
        assert_eq!(
            built.cert.unwrap().content.as_deref(),
            Some("-----BEGIN CERTIFICATE-----")
        );

        let stored = secret::digest("-----BEGIN CERTIFICATE-----");
        let built = build_certificate(&certificate(&stored));
        assert_eq!(built.cert.unwrap().content, None);
    }

    #[test]
    fn test_certificate_state_is_a_stable_digest() {
        let returned = RequestCertificate {
            cert: Some(CertificateItem {
                filename: Some("cert.pem".to_string()),
                ..Default::default()
            }),
            key: None,
        };
        let prior = certificate("plaintext");

        let first = flatten_certificate(&returned, Some(&prior));
        let second = flatten_certificate(&returned, Some(&first));

        let cert = first.cert.clone().unwrap();
        assert_eq!(cert.content, secret::digest("plaintext"));
        assert_eq!(cert.filename, "cert.pem");
        assert_eq!(first, second);
        assert_ne!(cert.content, "plaintext");
    }

    #[test]
    fn test_files_keep_prior_content_by_name() {
        let prior = vec![
            RequestFileConfig {
                name: "b".to_string(),
                content: "content b".to_string(),
                ..Default::default()
            },
            RequestFileConfig {
                name: "a".to_string(),
                content: "content a".to_string(),
                ..Default::default()
            },
        ];
        let returned = vec![BodyFile {
            name: Some("a".to_string()),
            bucket_key: Some("api-upload-file/a".to_string()),
            size: Some(9),
            ..Default::default()
        }];

        let flattened = flatten_files(&returned, &prior);

        assert_eq!(flattened[0].content, "content a");
        assert_eq!(flattened[0].bucket_key, "api-upload-file/a");
        assert_eq!(flattened[0].size, 9);
    }

    #[test]
    fn test_built_files_omit_bucket_key() {
        let files = vec![RequestFileConfig {
            name: "a".to_string(),
            bucket_key: "api-upload-file/a".to_string(),
            size: 9,
            ..Default::default()
        }];

        let built = build_files(&files).unwrap();

        assert_eq!(built[0].bucket_key, None);
        assert_eq!(built[0].content, None);
        assert_eq!(build_files(&[]), None);
    }

    #[test]
    fn test_flatten_request_definition_decodes_payloads() {
        let request = TestRequest {
            host: Some("grpc.example.org".to_string()),
            port: Some(RequestPort::Numerical(50051)),
            compressed_proto_file: encode_payload("syntax = \"proto3\";").unwrap(),
            timeout: Some(30.0),
            ..Default::default()
        };

        let flattened = flatten_request_definition(&request).unwrap();

        assert_eq!(flattened.port, "50051");
        assert_eq!(flattened.plain_proto_file, "syntax = \"proto3\";");
        assert_eq!(flattened.timeout, 30);
        assert_eq!(flattened.proto_json_descriptor, "");
    }

    #[test]
    fn test_grpc_request_always_sends_service() {
        let definition = RequestConfig {
            host: "grpc.example.org".to_string(),
            port: "50051".to_string(),
            ..Default::default()
        };
        let mut diagnostics = Vec::new();

        let request =
            build_api_request(&definition, "grpc", "any", "request_definition.0", &mut diagnostics)
                .unwrap();

        assert_eq!(request.service.as_deref(), Some(""));
        assert_eq!(request.port, Some(RequestPort::Variable("50051".to_string())));
        assert_eq!(request.method, None);

        let request =
            build_api_request(&definition, "tcp", "any", "request_definition.0", &mut diagnostics)
                .unwrap();
        assert_eq!(request.service, None);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_api_request_round_trips_definition() {
        let definition = RequestConfig {
            method: "POST".to_string(),
            url: "https://example.org/login".to_string(),
            body: "{\"user\":\"jane\"}".to_string(),
            body_type: "application/json".to_string(),
            timeout: 60,
            persist_cookies: true,
            ..Default::default()
        };
        let mut diagnostics = Vec::new();

        let request =
            build_api_request(&definition, "http", "any", "request_definition.0", &mut diagnostics)
                .unwrap();

        assert_eq!(flatten_request_definition(&request).unwrap(), definition);
    }

    #[test]
    fn test_dropped_body_warning_names_the_attribute() {
        let definition = RequestConfig {
            method: "DELETE".to_string(),
            body: "x".to_string(),
            ..Default::default()
        };
        let mut diagnostics = Vec::new();

        let request =
            build_api_request(&definition, "http", "http2", "request_definition.0", &mut diagnostics)
                .unwrap();

        assert_eq!(request.body, None);
        assert_eq!(
            diagnostics[0].attribute.as_deref(),
            Some("request_definition.0.body")
        );
    }

    #[test]
    fn test_corrupt_payload_is_fatal() {
        let request = TestRequest {
            compressed_json_descriptor: Some("not base64!".to_string()),
            ..Default::default()
        };

        assert!(flatten_request_definition(&request).is_err());
    }
}
