//! Token based authentication.
//!
//! Signing up or logging in yields a JWT, which clients send back in an
//! `Authorization: Bearer` header. The token carries the user's ID and an
//! expiration date; see [`JwtState`].

use {
	crate::{config::AuthConfig, users::UserId},
	derive_more::{Display, Error, From},
	serde::{Deserialize, Serialize},
	std::{fmt, time::Duration},
};

/// Keys and settings for encoding and decoding JWTs.
pub struct JwtState
{
	header: jwt::Header,
	encoding_key: jwt::EncodingKey,
	decoding_key: jwt::DecodingKey,
	validation: jwt::Validation,
	token_lifetime: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims
{
	sub: UserId,
	exp: u64,
}

#[derive(Debug, Display, Error, From)]
pub enum JwtSetupError
{
	#[from(ignore)]
	#[display("no JWT secret configured (set `auth.jwt-secret` or `JWT_SECRET`)")]
	MissingSecret,

	#[display("JWT secret is not valid base64: {_0}")]
	InvalidSecret(jwt::errors::Error),
}

#[derive(Debug, Display, Error, From)]
#[display("failed to encode JWT: {_0}")]
pub struct EncodeJwtError(jwt::errors::Error);

#[derive(Debug, Display, Error, From)]
#[display("invalid token: {_0}")]
pub struct InvalidToken(jwt::errors::Error);

impl JwtState
{
	pub fn new(config: &AuthConfig) -> Result<Self, JwtSetupError>
	{
		if config.jwt_secret.is_empty() {
			return Err(JwtSetupError::MissingSecret);
		}

		let encoding_key = jwt::EncodingKey::from_base64_secret(&config.jwt_secret)?;
		let decoding_key = jwt::DecodingKey::from_base64_secret(&config.jwt_secret)?;

		Ok(Self::from_keys(encoding_key, decoding_key, config.token_lifetime))
	}

	/// Creates a [`JwtState`] from raw secret bytes.
	pub fn from_secret(secret: &[u8], token_lifetime: Duration) -> Self
	{
		Self::from_keys(
			jwt::EncodingKey::from_secret(secret),
			jwt::DecodingKey::from_secret(secret),
			token_lifetime,
		)
	}

	fn from_keys(
		encoding_key: jwt::EncodingKey,
		decoding_key: jwt::DecodingKey,
		token_lifetime: Duration,
	) -> Self
	{
		Self {
			header: jwt::Header::default(),
			encoding_key,
			decoding_key,
			validation: jwt::Validation::default(),
			token_lifetime,
		}
	}

	/// Issues a token for `user_id`.
	#[tracing::instrument(level = "debug", skip(self), err)]
	pub fn encode(&self, user_id: UserId) -> Result<String, EncodeJwtError>
	{
		let claims = Claims {
			sub: user_id,
			exp: jwt::get_current_timestamp().saturating_add(self.token_lifetime.as_secs()),
		};

		Ok(jwt::encode(&self.header, &claims, &self.encoding_key)?)
	}

	/// Verifies `token` and returns the ID of the user it was issued to.
	#[tracing::instrument(level = "debug", skip_all, ret(level = "debug"), err(level = "debug"))]
	pub fn decode(&self, token: &str) -> Result<UserId, InvalidToken>
	{
		let claims = jwt::decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;

		Ok(claims.sub)
	}
}

impl fmt::Debug for JwtState
{
	fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		fmt.debug_struct("JwtState")
			.field("header", &self.header)
			.field("token_lifetime", &self.token_lifetime)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn tokens_round_trip_to_the_same_user() -> color_eyre::Result<()>
	{
		let state = JwtState::from_secret(b"secret", Duration::from_secs(60));
		let token = state.encode(UserId::new(7))?;

		assert_eq!(state.decode(&token)?, UserId::new(7));

		Ok(())
	}

	#[test]
	fn tokens_from_other_keys_are_rejected() -> color_eyre::Result<()>
	{
		let ours = JwtState::from_secret(b"secret", Duration::from_secs(60));
		let theirs = JwtState::from_secret(b"other secret", Duration::from_secs(60));
		let token = theirs.encode(UserId::new(7))?;

		assert!(ours.decode(&token).is_err());
		assert!(ours.decode("not a token").is_err());

		Ok(())
	}

	#[test]
	fn missing_secret_is_a_setup_error()
	{
		let config = AuthConfig::default();

		assert!(matches!(JwtState::new(&config), Err(JwtSetupError::MissingSecret)));
	}
}
