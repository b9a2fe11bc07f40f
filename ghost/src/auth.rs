//! Authentication for the Content and Admin surfaces.
//!
//! Content requests carry the Content API key as a `key` query parameter.
//! Admin requests carry `Authorization: Ghost <token>`, where the token is an
//! HS256 JWT minted from the `id:secret` Admin API key. Tokens expire five
//! minutes after issue and are minted per request.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::error::{Error, Result};

/// Lifetime of a minted admin token, in seconds.
pub const TOKEN_TTL_SECS: u64 = 300;

/// Audience claim expected by the Admin API.
pub const ADMIN_AUDIENCE: &str = "/admin/";

/// Scheme used in the `Authorization` header for admin tokens.
pub const AUTH_SCHEME: &str = "Ghost";

/// API surface a request path targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Public, read-only Content API.
    Content,
    /// Read/write Admin API.
    Admin,
}

const SURFACE_PREFIXES: [(&str, Surface); 2] = [
    ("content/", Surface::Content),
    ("admin/", Surface::Admin),
];

impl Surface {
    /// Resolves the surface from a request path such as `admin/posts/`.
    pub fn from_path(path: &str) -> Result<Self> {
        SURFACE_PREFIXES
            .iter()
            .find(|(prefix, _)| path.starts_with(prefix))
            .map(|(_, surface)| *surface)
            .ok_or_else(|| Error::InvalidPath(path.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Content => "content",
            Surface::Admin => "admin",
        }
    }
}

/// Credential attached to a single outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Credential {
    /// Appended to the query string as `key=...`.
    ContentKey(String),
    /// Sent as `Authorization: Ghost <token>`.
    AdminToken(String),
}

/// Admin API key split into its id and decoded secret.
#[derive(Clone)]
pub struct AdminKey {
    id: String,
    secret: Vec<u8>,
}

impl AdminKey {
    /// Parses an `id:secret` Admin API key. The secret is hex encoded.
    pub fn parse(key: &str) -> Result<Self> {
        let (id, secret) = key.split_once(':').ok_or_else(|| {
            Error::Config("admin API key must be in id:secret form".to_string())
        })?;
        if id.is_empty() || secret.is_empty() {
            return Err(Error::Config(
                "admin API key must be in id:secret form".to_string(),
            ));
        }
        let secret = hex::decode(secret)
            .map_err(|e| Error::Config(format!("admin API key secret is not hex: {}", e)))?;

        Ok(Self {
            id: id.to_string(),
            secret,
        })
    }

    /// Returns the key id placed in the token's `kid` header.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Mints a token issued at `issued_at` (unix seconds). Deterministic.
    pub fn token_at(&self, issued_at: u64) -> Result<String> {
        sign_claims(&self.id, &self.secret, &Claims::new(issued_at))
    }

    /// Mints a fresh token for one request.
    ///
    /// A random `jti` keeps two tokens minted within the same second distinct.
    pub fn fresh_token(&self) -> Result<String> {
        let claims = Claims::new(unix_now()).with_id(uuid::Uuid::new_v4().simple().to_string());
        sign_claims(&self.id, &self.secret, &claims)
    }
}

impl fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminKey")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Claims carried by an admin token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iat: u64,
    pub exp: u64,
    pub aud: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    /// Claims issued at `issued_at`, expiring [`TOKEN_TTL_SECS`] later.
    pub fn new(issued_at: u64) -> Self {
        Self {
            iat: issued_at,
            exp: issued_at.saturating_add(TOKEN_TTL_SECS),
            aud: ADMIN_AUDIENCE.to_string(),
            jti: None,
        }
    }

    pub fn with_id(mut self, jti: impl Into<String>) -> Self {
        self.jti = Some(jti.into());
        self
    }
}

/// Mints an admin token from a key id, hex secret and issue time.
///
/// Pure: no clock, no I/O.
pub fn mint_token(key_id: &str, secret_hex: &str, issued_at: u64) -> Result<String> {
    let secret = hex::decode(secret_hex)
        .map_err(|e| Error::Config(format!("admin API key secret is not hex: {}", e)))?;
    sign_claims(key_id, &secret, &Claims::new(issued_at))
}

/// Signs `claims` as an HS256 JWT with `kid` set to the key id.
pub fn sign_claims(key_id: &str, secret: &[u8], claims: &Claims) -> Result<String> {
    let header = Header {
        alg: Algorithm::HS256,
        kid: Some(key_id.to_string()),
        typ: Some("JWT".to_string()),
        ..Default::default()
    };
    Ok(encode(&header, claims, &EncodingKey::from_secret(secret))?)
}

/// Decodes the claims of a token without verifying the signature or expiry.
///
/// For inspecting tokens only; Ghost does the verification.
pub fn decode_claims(token: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
