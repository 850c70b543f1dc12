// src/services/github.rs
//! GitHub OAuth2 client (authorization-code flow, no PKCE)

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::ProviderError;
use crate::common::OAuthCredentials;

const AUTHORIZE_ENDPOINT: &str = "https://github.com/login/oauth/authorize";
const TOKEN_ENDPOINT: &str = "https://github.com/login/oauth/access_token";
const USER_ENDPOINT: &str = "https://api.github.com/user";
const EMAILS_ENDPOINT: &str = "https://api.github.com/user/emails";

// GitHub's API rejects requests without a User-Agent
const USER_AGENT: &str = "shortlink-api";

/// GitHub user profile from `/user`
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubProfile {
    pub id: i64,
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

/// One entry from `/user/emails`
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubEmail {
    pub email: String,
    pub primary: bool,
    pub verified: bool,
}

#[derive(Debug, Deserialize)]
struct GitHubTokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
    redirect_uri: &'a str,
}

#[derive(Debug, Clone)]
pub struct GitHubOAuth {
    creds: OAuthCredentials,
    client: Client,
}

impl GitHubOAuth {
    pub fn new(creds: OAuthCredentials, client: Client) -> Self {
        Self { creds, client }
    }

    /// Builds the authorization URL with the `user:email` scope
    pub fn authorization_url(&self, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&scope={}&state={}",
            AUTHORIZE_ENDPOINT,
            urlencoding::encode(&self.creds.client_id),
            urlencoding::encode(&self.creds.redirect_uri),
            urlencoding::encode("user:email"),
            urlencoding::encode(state),
        )
    }

    /// Exchanges an authorization code for a GitHub access token
    pub async fn exchange_code(&self, code: &str) -> Result<String, ProviderError> {
        debug!("Exchanging GitHub authorization code for access token");

        let response = self
            .client
            .post(TOKEN_ENDPOINT)
            .header("Accept", "application/json")
            .json(&TokenRequest {
                client_id: &self.creds.client_id,
                client_secret: &self.creds.client_secret,
                code,
                redirect_uri: &self.creds.redirect_uri,
            })
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        // GitHub answers 200 even for protocol errors; the body carries
        // the error code
        let body = response
            .json::<GitHubTokenResponse>()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        if let Some(code) = body.error {
            error!(
                code = %code,
                description = body.error_description.as_deref().unwrap_or(""),
                "GitHub token exchange rejected"
            );
            return Err(ProviderError::Protocol(code));
        }

        body.access_token
            .ok_or_else(|| ProviderError::Malformed("token response missing access_token".into()))
    }

    /// Fetches the user profile and email list concurrently
    pub async fn fetch_identity(
        &self,
        access_token: &str,
    ) -> Result<(GitHubProfile, Vec<GitHubEmail>), ProviderError> {
        let profile_req = self
            .client
            .get(USER_ENDPOINT)
            .bearer_auth(access_token)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json")
            .send();
        let emails_req = self
            .client
            .get(EMAILS_ENDPOINT)
            .bearer_auth(access_token)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json")
            .send();

        // No data dependency between the two fetches
        let (profile_resp, emails_resp) = tokio::join!(profile_req, emails_req);

        let profile_resp = profile_resp.map_err(|e| ProviderError::Transport(e.to_string()))?;
        let emails_resp = emails_resp.map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !profile_resp.status().is_success() {
            return Err(ProviderError::Protocol(format!(
                "user_fetch_http_{}",
                profile_resp.status().as_u16()
            )));
        }
        if !emails_resp.status().is_success() {
            return Err(ProviderError::Protocol(format!(
                "emails_fetch_http_{}",
                emails_resp.status().as_u16()
            )));
        }

        let profile = profile_resp
            .json::<GitHubProfile>()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        let emails = emails_resp
            .json::<Vec<GitHubEmail>>()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        Ok((profile, emails))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> OAuthCredentials {
        OAuthCredentials {
            client_id: "gh-client".to_string(),
            client_secret: "gh-secret".to_string(),
            redirect_uri: "https://api.example.com/auth/github/callback".to_string(),
        }
    }

    #[test]
    fn test_authorization_url_contents() {
        let github = GitHubOAuth::new(creds(), Client::new());
        let url = github.authorization_url("state-abc");

        assert!(url.starts_with("https://github.com/login/oauth/authorize?"));
        assert!(url.contains("client_id=gh-client"));
        assert!(url.contains("scope=user%3Aemail"));
        assert!(url.contains("state=state-abc"));
        assert!(!url.contains("code_challenge"));
    }

    #[test]
    fn test_token_response_error_envelope() {
        let json = r#"{"error":"bad_verification_code","error_description":"The code is wrong"}"#;
        let body: GitHubTokenResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(body.error.as_deref(), Some("bad_verification_code"));
        assert!(body.access_token.is_none());
    }

    #[test]
    fn test_token_response_success_envelope() {
        let json = r#"{"access_token":"gho_abc","token_type":"bearer","scope":"user:email"}"#;
        let body: GitHubTokenResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(body.access_token.as_deref(), Some("gho_abc"));
        assert!(body.error.is_none());
    }

    #[test]
    fn test_profile_deserialization_with_null_fields() {
        let json = r#"{"id":12345,"login":"octo","name":null,"avatar_url":null}"#;
        let profile: GitHubProfile = serde_json::from_str(json).expect("deserialize");
        assert_eq!(profile.id, 12345);
        assert_eq!(profile.login, "octo");
        assert!(profile.name.is_none());
    }

    #[test]
    fn test_email_list_deserialization() {
        let json = r#"[
            {"email":"a@x.com","primary":false,"verified":true,"visibility":null},
            {"email":"b@x.com","primary":true,"verified":false,"visibility":"public"}
        ]"#;
        let emails: Vec<GitHubEmail> = serde_json::from_str(json).expect("deserialize");
        assert_eq!(emails.len(), 2);
        assert!(emails[0].verified);
        assert!(emails[1].primary);
    }
}
