use serde::{Deserialize, Serialize};

use super::{single_block, StringMap};

/// The `request_definition` block.
///
/// `allow_insecure`, `follow_redirects` and `http_version` are only read for
/// API steps; single-request tests take them from `options_list`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    pub method: String,
    pub url: String,
    pub body: String,
    pub body_type: String,
    pub timeout: i64,
    pub host: String,
    pub port: String,
    pub dns_server: String,
    pub dns_server_port: String,
    pub no_saving_response_body: bool,
    pub number_of_packets: i64,
    pub should_track_hops: bool,
    pub servername: String,
    pub message: String,
    pub call_type: String,
    pub service: String,
    pub certificate_domains: Vec<String>,
    pub persist_cookies: bool,
    pub proto_json_descriptor: String,
    pub plain_proto_file: String,
    pub http_version: String,
    pub allow_insecure: bool,
    pub follow_redirects: bool,
}

/// The `request_basicauth` block: a `type` discriminator plus the union of
/// every scheme's attributes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicAuthConfig {
    #[serde(rename = "type")]
    pub auth_type: String,
    pub username: String,
    pub password: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub service_name: String,
    pub session_token: String,
    pub domain: String,
    pub workstation: String,
    pub access_token_url: String,
    pub audience: String,
    pub resource: String,
    pub scope: String,
    pub token_api_authentication: String,
    pub client_id: String,
    pub client_secret: String,
}

/// The `request_proxy` block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub url: String,
    pub headers: StringMap,
}

/// The `request_client_certificate` block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientCertificateConfig {
    #[serde(with = "single_block")]
    pub cert: Option<CertificateFileConfig>,
    #[serde(with = "single_block")]
    pub key: Option<CertificateFileConfig>,
}

/// One certificate or key. `content` holds plaintext or its SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateFileConfig {
    pub content: String,
    pub filename: String,
}

/// A file attached to the request body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestFileConfig {
    pub content: String,
    /// Storage key assigned by the vendor once the content is uploaded.
    pub bucket_key: String,
    pub name: String,
    pub original_file_name: String,
    pub size: i64,
    #[serde(rename = "type")]
    pub file_type: String,
}
