//! `request_basicauth` to and from [`BasicAuth`].

use super::value::non_empty;
use super::warning;
use crate::model::{
    BasicAuth, DigestAuth, NtlmAuth, OauthClientAuth, OauthRopAuth, Sigv4Auth, WebAuth,
};
use crate::schema::Diagnostic;
use crate::secret::carry_forward;
use crate::state::BasicAuthConfig;
use crate::variant::{Rule, RuleTable};

/// Credential scheme of a `request_basicauth` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthKind {
    /// Username and password.
    Web,
    /// AWS Signature Version 4.
    Sigv4,
    /// NTLM, optionally with domain and workstation.
    Ntlm,
    /// OAuth client credentials grant.
    OauthClient,
    /// OAuth resource owner password grant.
    OauthRop,
    /// HTTP digest.
    Digest,
}

/// Credential scheme selection. `web` and `sigv4` also need their
/// identifying attributes.
pub static BASIC_AUTH_RULES: RuleTable<BasicAuthConfig, AuthKind> = RuleTable::new(
    "basic auth",
    &[
        Rule {
            name: "web",
            matches: |c| c.auth_type == "web" && !c.username.is_empty(),
            kind: AuthKind::Web,
        },
        Rule {
            name: "sigv4",
            matches: |c| {
                c.auth_type == "sigv4" && !c.access_key.is_empty() && !c.secret_key.is_empty()
            },
            kind: AuthKind::Sigv4,
        },
        Rule {
            name: "ntlm",
            matches: |c| c.auth_type == "ntlm",
            kind: AuthKind::Ntlm,
        },
        Rule {
            name: "oauth-client",
            matches: |c| c.auth_type == "oauth-client",
            kind: AuthKind::OauthClient,
        },
        Rule {
            name: "oauth-rop",
            matches: |c| c.auth_type == "oauth-rop",
            kind: AuthKind::OauthRop,
        },
        Rule {
            name: "digest",
            matches: |c| c.auth_type == "digest",
            kind: AuthKind::Digest,
        },
    ],
);

pub(crate) fn build_basic_auth(
    config: &BasicAuthConfig,
    attribute: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<BasicAuth> {
    if let Some(missing) = missing_credentials(config) {
        warning(
            diagnostics,
            attribute,
            "Incomplete basic auth credentials",
            format!("\"{}\" credentials need {}; they are not sent", config.auth_type, missing),
        );
        return None;
    }
    let kind = BASIC_AUTH_RULES.resolve(config, &config.auth_type, attribute, diagnostics)?;

    let auth = match kind {
        AuthKind::Web => BasicAuth::Web(WebAuth {
            username: config.username.clone(),
            password: config.password.clone(),
        }),
        AuthKind::Sigv4 => BasicAuth::Sigv4(Sigv4Auth {
            access_key: config.access_key.clone(),
            secret_key: config.secret_key.clone(),
            region: Some(config.region.clone()),
            service_name: Some(config.service_name.clone()),
            session_token: Some(config.session_token.clone()),
        }),
        AuthKind::Ntlm => BasicAuth::Ntlm(NtlmAuth {
            username: Some(config.username.clone()),
            password: Some(config.password.clone()),
            domain: Some(config.domain.clone()),
            workstation: Some(config.workstation.clone()),
        }),
        // optional OAuth attributes must be absent, not empty
        AuthKind::OauthClient => BasicAuth::OauthClient(OauthClientAuth {
            access_token_url: config.access_token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token_api_authentication: config.token_api_authentication.clone(),
            audience: non_empty(&config.audience),
            resource: non_empty(&config.resource),
            scope: non_empty(&config.scope),
        }),
        AuthKind::OauthRop => BasicAuth::OauthRop(OauthRopAuth {
            access_token_url: config.access_token_url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            token_api_authentication: config.token_api_authentication.clone(),
            audience: non_empty(&config.audience),
            resource: non_empty(&config.resource),
            scope: non_empty(&config.scope),
            client_id: Some(config.client_id.clone()),
            client_secret: Some(config.client_secret.clone()),
        }),
        AuthKind::Digest => BasicAuth::Digest(DigestAuth {
            username: config.username.clone(),
            password: config.password.clone(),
        }),
    };
    Some(auth)
}

/// The attributes a known scheme still lacks, if any.
fn missing_credentials(config: &BasicAuthConfig) -> Option<&'static str> {
    match config.auth_type.as_str() {
        "web" if config.username.is_empty() => Some("a username"),
        "sigv4" if config.access_key.is_empty() || config.secret_key.is_empty() => {
            Some("both access_key and secret_key")
        }
        _ => None,
    }
}

/// Browser tests only accept `web` credentials, and only complete ones.
/// Anything else is dropped with a warning.
pub(crate) fn build_browser_basic_auth(
    config: &BasicAuthConfig,
    attribute: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<BasicAuth> {
    if config.auth_type != "web" {
        warning(
            diagnostics,
            attribute,
            "Unsupported basic auth for browser tests",
            format!("browser tests only accept \"web\" credentials, got \"{}\"", config.auth_type),
        );
        return None;
    }
    if config.username.is_empty() || config.password.is_empty() {
        warning(
            diagnostics,
            attribute,
            "Incomplete basic auth credentials",
            "\"web\" credentials need both username and password; they are not sent",
        );
        return None;
    }
    Some(BasicAuth::Web(WebAuth {
        username: config.username.clone(),
        password: config.password.clone(),
    }))
}

/// Flatten credentials. Secrets prefer the prior configuration's value.
pub(crate) fn flatten_basic_auth(
    auth: &BasicAuth,
    prior: Option<&BasicAuthConfig>,
    attribute: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<BasicAuthConfig> {
    let secret = |field: fn(&BasicAuthConfig) -> &str, returned: Option<&str>| {
        carry_forward(prior.map(field), returned)
    };

    let config = match auth {
        BasicAuth::Web(web) => BasicAuthConfig {
            auth_type: "web".to_string(),
            username: web.username.clone(),
            password: secret(|c| &c.password, Some(web.password.as_str())),
            ..Default::default()
        },
        BasicAuth::Sigv4(sigv4) => BasicAuthConfig {
            auth_type: "sigv4".to_string(),
            access_key: secret(|c| &c.access_key, Some(sigv4.access_key.as_str())),
            secret_key: secret(|c| &c.secret_key, Some(sigv4.secret_key.as_str())),
            region: sigv4.region.clone().unwrap_or_default(),
            service_name: sigv4.service_name.clone().unwrap_or_default(),
            session_token: secret(|c| &c.session_token, sigv4.session_token.as_deref()),
            ..Default::default()
        },
        BasicAuth::Ntlm(ntlm) => BasicAuthConfig {
            auth_type: "ntlm".to_string(),
            username: ntlm.username.clone().unwrap_or_default(),
            password: secret(|c| &c.password, ntlm.password.as_deref()),
            domain: ntlm.domain.clone().unwrap_or_default(),
            workstation: ntlm.workstation.clone().unwrap_or_default(),
            ..Default::default()
        },
        BasicAuth::OauthClient(oauth) => BasicAuthConfig {
            auth_type: "oauth-client".to_string(),
            access_token_url: oauth.access_token_url.clone(),
            client_id: oauth.client_id.clone(),
            client_secret: secret(|c| &c.client_secret, Some(oauth.client_secret.as_str())),
            token_api_authentication: oauth.token_api_authentication.clone(),
            audience: oauth.audience.clone().unwrap_or_default(),
            resource: oauth.resource.clone().unwrap_or_default(),
            scope: oauth.scope.clone().unwrap_or_default(),
            ..Default::default()
        },
        BasicAuth::OauthRop(oauth) => BasicAuthConfig {
            auth_type: "oauth-rop".to_string(),
            access_token_url: oauth.access_token_url.clone(),
            username: oauth.username.clone(),
            password: secret(|c| &c.password, Some(oauth.password.as_str())),
            token_api_authentication: oauth.token_api_authentication.clone(),
            audience: oauth.audience.clone().unwrap_or_default(),
            resource: oauth.resource.clone().unwrap_or_default(),
            scope: oauth.scope.clone().unwrap_or_default(),
            client_id: oauth.client_id.clone().unwrap_or_default(),
            client_secret: secret(|c| &c.client_secret, oauth.client_secret.as_deref()),
            ..Default::default()
        },
        BasicAuth::Digest(digest) => BasicAuthConfig {
            auth_type: "digest".to_string(),
            username: digest.username.clone(),
            password: secret(|c| &c.password, Some(digest.password.as_str())),
            ..Default::default()
        },
        BasicAuth::Unknown(_) => {
            warning(
                diagnostics,
                attribute,
                "Unrecognized basic auth variant",
                format!("\"{}\" is not supported; the credentials are not kept", auth.auth_type()),
            );
            return None;
        }
    };
    Some(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(auth_type: &str) -> BasicAuthConfig {
        BasicAuthConfig {
            auth_type: auth_type.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_rule_requirements() {
        assert_eq!(BASIC_AUTH_RULES.classify(&config("web")), None);
        let web = BasicAuthConfig {
            username: "admin".to_string(),
            ..config("web")
        };
        assert_eq!(BASIC_AUTH_RULES.classify(&web), Some(AuthKind::Web));

        let half_sigv4 = BasicAuthConfig {
            access_key: "AKIA".to_string(),
            ..config("sigv4")
        };
        assert_eq!(BASIC_AUTH_RULES.classify(&half_sigv4), None);

        assert_eq!(BASIC_AUTH_RULES.classify(&config("ntlm")), Some(AuthKind::Ntlm));
        assert_eq!(BASIC_AUTH_RULES.classify(&config("digest")), Some(AuthKind::Digest));
    }

    #[test]
    fn test_oauth_client_omits_empty_optionals() {
        let oauth = BasicAuthConfig {
            access_token_url: "https://auth.example.org/token".to_string(),
            client_id: "client".to_string(),
            client_secret: "s3cret".to_string(),
            token_api_authentication: "body".to_string(),
            scope: "read".to_string(),
            ..config("oauth-client")
        };
        let mut diagnostics = Vec::new();

        let auth = build_basic_auth(&oauth, "request_basicauth.0", &mut diagnostics).unwrap();

        assert_eq!(
            serde_json::to_value(&auth).unwrap(),
            json!({
                "type": "oauth-client",
                "accessTokenUrl": "https://auth.example.org/token",
                "clientId": "client",
                "clientSecret": "s3cret",
                "tokenApiAuthentication": "body",
                "scope": "read",
            })
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_build_only_active_variant_fields() {
        let digest = BasicAuthConfig {
            username: "admin".to_string(),
            password: "pw".to_string(),
            access_key: "stray".to_string(),
            domain: "stray".to_string(),
            ..config("digest")
        };

        let auth = build_basic_auth(&digest, "a", &mut Vec::new()).unwrap();

        assert_eq!(
            serde_json::to_value(&auth).unwrap(),
            json!({"type": "digest", "username": "admin", "password": "pw"})
        );
    }

    #[test]
    fn test_unsupported_scheme_warns_once() {
        let mut diagnostics = Vec::new();

        let auth = build_basic_auth(&config("kerberos"), "request_basicauth.0", &mut diagnostics);

        assert!(auth.is_none());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("request_basicauth.0"));
    }

    #[test]
    fn test_browser_auth_needs_both_fields() {
        let mut diagnostics = Vec::new();
        let mut web = BasicAuthConfig {
            username: "admin".to_string(),
            ..config("web")
        };
        assert!(build_browser_basic_auth(&web, "a", &mut diagnostics).is_none());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].summary, "Incomplete basic auth credentials");

        web.password = "pw".to_string();
        let mut diagnostics = Vec::new();
        assert!(matches!(
            build_browser_basic_auth(&web, "a", &mut diagnostics),
            Some(BasicAuth::Web(_))
        ));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_browser_auth_rejects_other_schemes_with_a_warning() {
        let digest = BasicAuthConfig {
            username: "u".to_string(),
            password: "p".to_string(),
            ..config("digest")
        };
        let mut diagnostics = Vec::new();

        assert!(build_browser_basic_auth(&digest, "request_basicauth.0", &mut diagnostics).is_none());
        assert_eq!(diagnostics.len(), 1);
        assert!(!diagnostics[0].is_error());
        assert!(diagnostics[0].detail.as_deref().unwrap().contains("\"digest\""));
    }

    #[test]
    fn test_incomplete_known_scheme_is_not_called_unrecognized() {
        for incomplete in [
            config("web"),
            BasicAuthConfig {
                access_key: "AKIA".to_string(),
                ..config("sigv4")
            },
        ] {
            let mut diagnostics = Vec::new();

            assert!(build_basic_auth(&incomplete, "request_basicauth.0", &mut diagnostics).is_none());
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].summary, "Incomplete basic auth credentials");
        }
    }

    #[test]
    fn test_flatten_carries_prior_secrets() {
        let prior = BasicAuthConfig {
            access_key: "AKIA".to_string(),
            secret_key: "prior-secret".to_string(),
            region: "eu-west-1".to_string(),
            ..config("sigv4")
        };
        let returned = BasicAuth::Sigv4(Sigv4Auth {
            access_key: "AKIA".to_string(),
            secret_key: String::new(),
            region: Some("eu-west-1".to_string()),
            ..Default::default()
        });

        let flattened = flatten_basic_auth(&returned, Some(&prior), "a", &mut Vec::new()).unwrap();

        assert_eq!(flattened.secret_key, "prior-secret");
        assert_eq!(flattened.region, "eu-west-1");
        assert_eq!(flattened.session_token, "");
    }

    #[test]
    fn test_flatten_without_prior_uses_returned_values() {
        let returned = BasicAuth::Web(WebAuth {
            username: "admin".to_string(),
            password: "returned".to_string(),
        });

        let flattened = flatten_basic_auth(&returned, None, "a", &mut Vec::new()).unwrap();

        assert_eq!(flattened.auth_type, "web");
        assert_eq!(flattened.password, "returned");
    }

    #[test]
    fn test_flatten_unknown_scheme() {
        let mut diagnostics = Vec::new();
        let returned = BasicAuth::Unknown(json!({"type": "kerberos"}));

        assert!(flatten_basic_auth(&returned, None, "a", &mut diagnostics).is_none());
        assert_eq!(diagnostics.len(), 1);
    }
}
