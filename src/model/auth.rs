//! Request credentials, keyed by `type`.

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Credentials attached to a request.
///
/// A payload without `type` is a `web` credential. A `type` this crate does
/// not know is kept verbatim in [`BasicAuth::Unknown`].
#[derive(Debug, Clone, PartialEq)]
pub enum BasicAuth {
    Web(WebAuth),
    Sigv4(Sigv4Auth),
    Ntlm(NtlmAuth),
    OauthClient(OauthClientAuth),
    OauthRop(OauthRopAuth),
    Digest(DigestAuth),
    Unknown(Value),
}

impl BasicAuth {
    /// The `type` discriminator as written on the wire.
    pub fn auth_type(&self) -> &str {
        match self {
            Self::Web(_) => "web",
            Self::Sigv4(_) => "sigv4",
            Self::Ntlm(_) => "ntlm",
            Self::OauthClient(_) => "oauth-client",
            Self::OauthRop(_) => "oauth-rop",
            Self::Digest(_) => "digest",
            Self::Unknown(raw) => raw.get("type").and_then(Value::as_str).unwrap_or_default(),
        }
    }
}

impl Serialize for BasicAuth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let fields = match self {
            Self::Web(auth) => serde_json::to_value(auth),
            Self::Sigv4(auth) => serde_json::to_value(auth),
            Self::Ntlm(auth) => serde_json::to_value(auth),
            Self::OauthClient(auth) => serde_json::to_value(auth),
            Self::OauthRop(auth) => serde_json::to_value(auth),
            Self::Digest(auth) => serde_json::to_value(auth),
            Self::Unknown(raw) => return raw.serialize(serializer),
        };

        let mut fields = fields.map_err(S::Error::custom)?;
        if let Value::Object(map) = &mut fields {
            map.insert("type".to_string(), Value::from(self.auth_type()));
        }
        fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BasicAuth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let auth_type = raw.get("type").and_then(Value::as_str).unwrap_or("web");

        let parsed = match auth_type {
            "web" => serde_json::from_value(raw.clone()).map(Self::Web),
            "sigv4" => serde_json::from_value(raw.clone()).map(Self::Sigv4),
            "ntlm" => serde_json::from_value(raw.clone()).map(Self::Ntlm),
            "oauth-client" => serde_json::from_value(raw.clone()).map(Self::OauthClient),
            "oauth-rop" => serde_json::from_value(raw.clone()).map(Self::OauthRop),
            "digest" => serde_json::from_value(raw.clone()).map(Self::Digest),
            _ => return Ok(Self::Unknown(raw)),
        };
        parsed.map_err(D::Error::custom)
    }
}

/// Username and password.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebAuth {
    pub username: String,
    pub password: String,
}

/// AWS Signature Version 4.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Sigv4Auth {
    pub access_key: String,
    pub secret_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

/// NTLM credentials.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NtlmAuth {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workstation: Option<String>,
}

/// OAuth client-credentials grant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OauthClientAuth {
    pub access_token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub token_api_authentication: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// OAuth resource-owner-password grant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OauthRopAuth {
    pub access_token_url: String,
    pub username: String,
    pub password: String,
    pub token_api_authentication: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

/// HTTP digest credentials.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestAuth {
    pub username: String,
    pub password: String,
}
