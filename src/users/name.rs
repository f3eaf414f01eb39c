use {
	derive_more::{Display, Error},
	serde::{Deserialize, Deserializer, Serialize, de},
	std::{error::Error, str::FromStr, sync::Arc},
};

/// A user's display name.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Username(Arc<str>);

#[non_exhaustive]
#[derive(Debug, Display, Error)]
#[display("invalid username: {_variant}")]
pub enum InvalidUsername
{
	#[display("may not be empty")]
	Empty,

	#[display("may not be longer than {} characters", Username::MAX_LEN)]
	TooLong,
}

impl Username
{
	pub const MAX_LEN: usize = 64;

	pub fn as_str(&self) -> &str
	{
		&self.0
	}
}

impl FromStr for Username
{
	type Err = InvalidUsername;

	fn from_str(value: &str) -> Result<Self, Self::Err>
	{
		let value = value.trim();

		if value.is_empty() {
			return Err(InvalidUsername::Empty);
		}

		if value.chars().count() > Self::MAX_LEN {
			return Err(InvalidUsername::TooLong);
		}

		Ok(Self(value.into()))
	}
}

impl<'de> Deserialize<'de> for Username
{
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		String::deserialize(deserializer)?.parse().map_err(de::Error::custom)
	}
}

impl<DB> sqlx::Type<DB> for Username
where
	DB: sqlx::Database,
	str: sqlx::Type<DB>,
{
	fn type_info() -> <DB as sqlx::Database>::TypeInfo
	{
		str::type_info()
	}

	fn compatible(ty: &<DB as sqlx::Database>::TypeInfo) -> bool
	{
		str::compatible(ty)
	}
}

impl<'q, DB> sqlx::Encode<'q, DB> for Username
where
	DB: sqlx::Database,
	String: sqlx::Encode<'q, DB>,
{
	fn encode_by_ref(
		&self,
		buf: &mut <DB as sqlx::Database>::ArgumentBuffer<'q>,
	) -> Result<sqlx::encode::IsNull, Box<dyn Error + Send + Sync>>
	{
		self.as_str().to_owned().encode_by_ref(buf)
	}
}

impl<'r, DB> sqlx::Decode<'r, DB> for Username
where
	DB: sqlx::Database,
	&'r str: sqlx::Decode<'r, DB>,
{
	fn decode(
		value: <DB as sqlx::Database>::ValueRef<'r>,
	) -> Result<Self, Box<dyn Error + Send + Sync>>
	{
		Ok(<&str>::decode(value)?.parse()?)
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn rejects_blank_names()
	{
		assert!(matches!("".parse::<Username>(), Err(InvalidUsername::Empty)));
		assert!(matches!("   ".parse::<Username>(), Err(InvalidUsername::Empty)));
	}

	#[test]
	fn trims_whitespace() -> color_eyre::Result<()>
	{
		let name = " alice ".parse::<Username>()?;
		assert_eq!(name.as_str(), "alice");

		Ok(())
	}

	#[test]
	fn rejects_long_names()
	{
		let name = "a".repeat(Username::MAX_LEN + 1);
		assert!(matches!(name.parse::<Username>(), Err(InvalidUsername::TooLong)));
	}

	#[tokio::test]
	async fn binds_and_decodes_as_text() -> color_eyre::Result<()>
	{
		let pool = crate::database::in_memory().await?;
		let name = "alice".parse::<Username>()?;
		let decoded = sqlx::query_scalar::<_, Username>("SELECT ?")
			.bind(&name)
			.fetch_one(&pool)
			.await?;

		assert_eq!(decoded, name);

		Ok(())
	}
}
