//! RS256 App JWT used to authenticate as the GitHub App itself.

// crates.io
use jsonwebtoken::{Algorithm, EncodingKey, Header};
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	identity::{AppId, PrivateKey},
	token::TokenSecret,
};

/// Backdates `iat` so runners with a fast clock are not rejected.
const CLOCK_DRIFT: Duration = Duration::seconds(30);
/// GitHub caps App JWTs at ten minutes.
const LIFETIME: Duration = Duration::minutes(10);

/// Registered claims GitHub reads from an App JWT.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppClaims {
	/// Issued-at, seconds since the Unix epoch.
	pub iat: i64,
	/// Expiry, seconds since the Unix epoch.
	pub exp: i64,
	/// Issuer, the App identifier.
	pub iss: String,
}
impl AppClaims {
	/// Computes the claims for a JWT issued at `now`.
	pub fn issued_at(app_id: &AppId, now: OffsetDateTime) -> Self {
		let iat = now - CLOCK_DRIFT;

		Self {
			iat: iat.unix_timestamp(),
			exp: (iat + LIFETIME).unix_timestamp(),
			iss: app_id.to_string(),
		}
	}
}

/// Signed App JWT plus the claims it carries.
#[derive(Clone, Debug)]
pub struct AppJwt {
	/// Compact JWS, sent as a bearer credential.
	pub token: TokenSecret,
	/// Claims embedded in the token.
	pub claims: AppClaims,
}
impl AppJwt {
	/// Signs a fresh App JWT with the App's RSA private key.
	pub fn sign(app_id: &AppId, private_key: &PrivateKey, now: OffsetDateTime) -> Result<Self> {
		let key = EncodingKey::from_rsa_pem(private_key.expose().as_bytes())
			.map_err(|source| ConfigError::InvalidPrivateKey { source })?;
		let claims = AppClaims::issued_at(app_id, now);
		let token = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
			.map_err(|source| ConfigError::JwtSigning { source })?;

		Ok(Self { token: TokenSecret::new(token), claims })
	}
}
