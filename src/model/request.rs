use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::BasicAuth;

/// The request a test (or API step) performs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestRequest {
    #[serde(rename = "allow_insecure", skip_serializing_if = "Option::is_none")]
    pub allow_insecure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_auth: Option<BasicAuth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<RequestCertificate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_domains: Option<Vec<String>>,
    /// zlib + base64 protobuf JSON descriptor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressed_json_descriptor: Option<String>,
    /// zlib + base64 `.proto` file body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressed_proto_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_server_port: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<BodyFile>>,
    #[serde(rename = "follow_redirects", skip_serializing_if = "Option::is_none")]
    pub follow_redirects: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_saving_response_body: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_packets: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist_cookies: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<RequestPort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<RequestProxy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<BTreeMap<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servername: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_track_hops: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A port given either as a number or as a `{{ VARIABLE }}` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestPort {
    Numerical(i64),
    Variable(String),
}

impl RequestPort {
    /// The port as configuration text.
    pub fn to_config_string(&self) -> String {
        match self {
            Self::Numerical(port) => port.to_string(),
            Self::Variable(port) => port.clone(),
        }
    }
}

/// Client certificate and key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestCertificate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert: Option<CertificateItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<CertificateItem>,
}

/// A certificate or private key. The vendor never returns `content`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CertificateItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Proxy the request goes through.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestProxy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    pub url: String,
}

/// A body file. Once uploaded, the vendor returns a `bucketKey` in place of
/// the content.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BodyFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_field_names() {
        let request = TestRequest {
            allow_insecure: Some(true),
            follow_redirects: Some(false),
            no_saving_response_body: Some(true),
            compressed_proto_file: Some("eJw=".to_string()),
            ..Default::default()
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "allow_insecure": true,
                "follow_redirects": false,
                "noSavingResponseBody": true,
                "compressedProtoFile": "eJw=",
            })
        );
    }

    #[test]
    fn test_port_is_numerical_or_variable() {
        let request: TestRequest = serde_json::from_value(json!({"port": 443})).unwrap();
        assert_eq!(request.port, Some(RequestPort::Numerical(443)));
        assert_eq!(request.port.unwrap().to_config_string(), "443");

        let request: TestRequest = serde_json::from_value(json!({"port": "{{ PORT }}"})).unwrap();
        assert_eq!(
            request.port,
            Some(RequestPort::Variable("{{ PORT }}".to_string()))
        );
    }

    #[test]
    fn test_body_file_field_names() {
        let file: BodyFile = serde_json::from_value(json!({
            "bucketKey": "api-upload-file/abc/file.txt",
            "name": "file",
            "originalFileName": "file.txt",
            "size": 12,
            "type": "text/plain",
        }))
        .unwrap();

        assert_eq!(file.bucket_key.as_deref(), Some("api-upload-file/abc/file.txt"));
        assert_eq!(file.original_file_name.as_deref(), Some("file.txt"));
        assert_eq!(file.file_type.as_deref(), Some("text/plain"));
        assert_eq!(file.content, None);
    }
}
