use {
	super::deserialize_duration,
	serde::Deserialize,
	std::{fmt, time::Duration},
};

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct AuthConfig
{
	/// Base64-encoded secret used to sign JWTs.
	///
	/// Overridden by the `JWT_SECRET` environment variable.
	pub jwt_secret: String,

	/// How long an issued token stays valid.
	#[serde(default = "default_token_lifetime", deserialize_with = "deserialize_duration")]
	pub token_lifetime: Duration,

	/// bcrypt cost factor for password hashes.
	#[serde(default = "default_password_cost")]
	pub password_cost: u32,
}

impl fmt::Debug for AuthConfig
{
	fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		fmt.debug_struct("AuthConfig")
			.field("jwt_secret", &"*****")
			.field("token_lifetime", &self.token_lifetime)
			.field("password_cost", &self.password_cost)
			.finish()
	}
}

impl Default for AuthConfig
{
	fn default() -> Self
	{
		Self {
			jwt_secret: String::new(),
			token_lifetime: default_token_lifetime(),
			password_cost: default_password_cost(),
		}
	}
}

fn default_token_lifetime() -> Duration
{
	Duration::from_secs(60 * 60 * 24 * 7)
}

fn default_password_cost() -> u32
{
	bcrypt::DEFAULT_COST
}
