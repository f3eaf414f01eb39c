use {
	derive_more::{Display, Error},
	serde::{Deserialize, Serialize},
	std::str::FromStr,
};

/// An email address, used as the login name.
///
/// Only checked for an `@` with something on both sides; addresses are never
/// mailed to.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(try_from = "String")]
#[sqlx(transparent)]
pub struct EmailAddress(String);

#[derive(Debug, Display, Error)]
#[display("invalid email address")]
pub struct InvalidEmailAddress;

impl EmailAddress
{
	pub fn as_str(&self) -> &str
	{
		&self.0
	}
}

impl FromStr for EmailAddress
{
	type Err = InvalidEmailAddress;

	fn from_str(value: &str) -> Result<Self, Self::Err>
	{
		let value = value.trim();

		match value.split_once('@') {
			Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
				Ok(Self(value.to_owned()))
			},
			_ => Err(InvalidEmailAddress),
		}
	}
}

impl TryFrom<String> for EmailAddress
{
	type Error = InvalidEmailAddress;

	fn try_from(value: String) -> Result<Self, Self::Error>
	{
		value.parse()
	}
}
