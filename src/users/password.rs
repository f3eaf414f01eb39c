use {
	derive_more::{Display, Error, From},
	serde::{Deserialize, Deserializer, de},
	std::{fmt, str::FromStr},
	tokio::task,
};

/// A plain-text password as submitted by a user.
#[derive(Clone)]
pub struct Password(String);

/// A bcrypt hash of a [`Password`].
#[derive(Clone, sqlx::Type)]
#[sqlx(transparent)]
pub struct PasswordHash(String);

#[non_exhaustive]
#[derive(Debug, Display, Error)]
#[display("invalid password: {_variant}")]
pub enum InvalidPassword
{
	#[display("may not be empty")]
	Empty,

	#[display("may not be longer than {} bytes", Password::MAX_LEN)]
	TooLong,
}

#[derive(Debug, Display, Error, From)]
pub enum PasswordError
{
	#[display("failed to hash password: {_0}")]
	Bcrypt(bcrypt::BcryptError),

	#[display("password hashing task failed: {_0}")]
	Join(task::JoinError),
}

impl Password
{
	/// bcrypt ignores everything past this many bytes.
	pub const MAX_LEN: usize = 72;

	/// Hashes the password on the blocking thread pool.
	#[tracing::instrument(level = "debug", skip(self), err)]
	pub async fn hash(self, cost: u32) -> Result<PasswordHash, PasswordError>
	{
		let hash = task::spawn_blocking(move || bcrypt::hash(self.0, cost)).await??;

		Ok(PasswordHash(hash))
	}

	/// Checks the password against `hash` on the blocking thread pool.
	#[tracing::instrument(level = "debug", skip_all, ret(level = "debug"), err)]
	pub async fn verify(self, hash: PasswordHash) -> Result<bool, PasswordError>
	{
		Ok(task::spawn_blocking(move || bcrypt::verify(self.0, &hash.0)).await??)
	}
}

impl fmt::Debug for Password
{
	fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		fmt.write_str("Password(*****)")
	}
}

impl fmt::Debug for PasswordHash
{
	fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		fmt.write_str("PasswordHash(*****)")
	}
}

impl FromStr for Password
{
	type Err = InvalidPassword;

	fn from_str(value: &str) -> Result<Self, Self::Err>
	{
		if value.is_empty() {
			return Err(InvalidPassword::Empty);
		}

		if value.len() > Self::MAX_LEN {
			return Err(InvalidPassword::TooLong);
		}

		Ok(Self(value.to_owned()))
	}
}

impl<'de> Deserialize<'de> for Password
{
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		String::deserialize(deserializer)?.parse().map_err(de::Error::custom)
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[tokio::test]
	async fn verifies_only_the_right_password() -> color_eyre::Result<()>
	{
		let hash = "hunter2".parse::<Password>()?.hash(4).await?;

		assert!("hunter2".parse::<Password>()?.verify(hash.clone()).await?);
		assert!(!"hunter3".parse::<Password>()?.verify(hash).await?);

		Ok(())
	}

	#[test]
	fn debug_is_redacted() -> color_eyre::Result<()>
	{
		let password = "hunter2".parse::<Password>()?;
		assert!(!format!("{password:?}").contains("hunter2"));

		Ok(())
	}
}
