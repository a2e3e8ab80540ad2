//! OIDC client for the family identity provider, built on the openidconnect crate.
//!
//! Provider metadata is discovered once at startup. Login uses the
//! authorization-code flow with PKCE and a nonce; the verified `sub` claim
//! becomes the session's principal.

use openidconnect::core::{CoreAuthenticationFlow, CoreClient, CoreProviderMetadata};
use openidconnect::{
    AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointMaybeSet, EndpointNotSet,
    EndpointSet, IssuerUrl, Nonce, OAuth2TokenResponse, PkceCodeChallenge, PkceCodeVerifier,
    RedirectUrl, Scope, TokenResponse,
};
use reunion_platform_access::{OidcClaims, OidcConfig};
use std::fmt;

/// Client typestate after discovery: auth URL known, token and userinfo
/// endpoints only if the provider advertised them.
type DiscoveredClient = CoreClient<
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointMaybeSet,
    EndpointMaybeSet,
>;

pub struct OidcClient {
    client: DiscoveredClient,
    http: reqwest::Client,
    config: OidcConfig,
}

/// Per-login secrets carried from `/auth/login` to `/auth/callback`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuthState {
    pub csrf_token: String,
    pub pkce_verifier: String,
    pub nonce: String,
}

/// Result of a successful token exchange.
pub struct TokenResult {
    pub claims: OidcClaims,
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl OidcClient {
    /// Discovers the provider metadata from the issuer URL.
    pub async fn discover(config: OidcConfig) -> Result<Self, OidcError> {
        let issuer_url = IssuerUrl::new(config.issuer_url().to_string()).map_err(|e| {
            OidcError::Configuration {
                reason: format!("invalid issuer URL: {e}"),
            }
        })?;
        let redirect_url = RedirectUrl::new(config.redirect_uri().to_string()).map_err(|e| {
            OidcError::Configuration {
                reason: format!("invalid redirect URI: {e}"),
            }
        })?;

        // Provider endpoints must not redirect.
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| OidcError::Configuration {
                reason: format!("failed to create HTTP client: {e}"),
            })?;

        let metadata = CoreProviderMetadata::discover_async(issuer_url, &http)
            .await
            .map_err(|e| OidcError::Discovery {
                reason: e.to_string(),
            })?;

        let client = CoreClient::from_provider_metadata(
            metadata,
            ClientId::new(config.client_id().to_string()),
            Some(ClientSecret::new(config.client_secret().to_string())),
        )
        .set_redirect_uri(redirect_url);

        tracing::info!(issuer = %config.issuer_url(), "Discovered OIDC provider");

        Ok(Self {
            client,
            http,
            config,
        })
    }

    /// Builds the provider redirect URL and the secrets needed to finish login.
    pub fn authorization_url(&self) -> (String, AuthState) {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let request = self
            .config
            .scopes()
            .into_iter()
            .fold(
                self.client
                    .authorize_url(
                        CoreAuthenticationFlow::AuthorizationCode,
                        CsrfToken::new_random,
                        Nonce::new_random,
                    )
                    .set_pkce_challenge(pkce_challenge),
                |request, scope| request.add_scope(Scope::new(scope.to_string())),
            );

        let (auth_url, csrf_token, nonce) = request.url();

        let state = AuthState {
            csrf_token: csrf_token.secret().clone(),
            pkce_verifier: pkce_verifier.secret().clone(),
            nonce: nonce.secret().clone(),
        };

        (auth_url.to_string(), state)
    }

    /// Exchanges the authorization code and verifies the returned ID token.
    pub async fn exchange_code(
        &self,
        code: &str,
        state: &AuthState,
    ) -> Result<TokenResult, OidcError> {
        let token_response = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .map_err(|e| OidcError::TokenExchange {
                reason: format!("token endpoint unavailable: {e}"),
            })?
            .set_pkce_verifier(PkceCodeVerifier::new(state.pkce_verifier.clone()))
            .request_async(&self.http)
            .await
            .map_err(|e| OidcError::TokenExchange {
                reason: e.to_string(),
            })?;

        let id_token = token_response
            .id_token()
            .ok_or_else(|| OidcError::TokenValidation {
                reason: "no ID token in response".to_string(),
            })?;

        let nonce = Nonce::new(state.nonce.clone());
        let claims = id_token
            .claims(&self.client.id_token_verifier(), &nonce)
            .map_err(|e| OidcError::TokenValidation {
                reason: e.to_string(),
            })?;

        let display_name = claims
            .name()
            .and_then(|n| n.get(None))
            .map(|n| n.as_str().to_string())
            .or_else(|| claims.preferred_username().map(|u| u.as_str().to_string()));

        let oidc_claims = OidcClaims::new(claims.subject().to_string(), claims.issuer().to_string())
            .with_email(claims.email().map(|e| e.as_str().to_string()))
            .with_display_name(display_name);

        Ok(TokenResult {
            claims: oidc_claims,
            access_token: token_response.access_token().secret().clone(),
            refresh_token: token_response.refresh_token().map(|t| t.secret().clone()),
        })
    }

    pub fn config(&self) -> &OidcConfig {
        &self.config
    }
}

/// OIDC-related errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OidcError {
    Configuration { reason: String },
    Discovery { reason: String },
    TokenExchange { reason: String },
    TokenValidation { reason: String },
}

impl fmt::Display for OidcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { reason } => write!(f, "OIDC configuration error: {reason}"),
            Self::Discovery { reason } => write!(f, "OIDC discovery failed: {reason}"),
            Self::TokenExchange { reason } => write!(f, "OIDC token exchange failed: {reason}"),
            Self::TokenValidation { reason } => {
                write!(f, "OIDC ID token rejected: {reason}")
            }
        }
    }
}

impl std::error::Error for OidcError {}
