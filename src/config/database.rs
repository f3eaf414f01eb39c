use {
	serde::{Deserialize, Deserializer},
	std::num::NonZero,
};

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct DatabaseConfig
{
	/// Connection URL, e.g. `sqlite://hackernews.db`.
	///
	/// Overridden by the `DATABASE_URL` environment variable.
	pub url: String,

	#[serde(deserialize_with = "deserialize_option_u32")]
	pub min_connections: Option<NonZero<u32>>,

	#[serde(deserialize_with = "deserialize_option_u32")]
	pub max_connections: Option<NonZero<u32>>,

	/// Insert a sample user and some links into an empty database.
	pub seed: bool,
}

impl Default for DatabaseConfig
{
	fn default() -> Self
	{
		Self {
			url: default_url(),
			min_connections: None,
			max_connections: None,
			seed: false,
		}
	}
}

fn default_url() -> String
{
	String::from("sqlite://hackernews.db")
}

fn deserialize_option_u32<'de, D>(deserializer: D) -> Result<Option<NonZero<u32>>, D::Error>
where
	D: Deserializer<'de>,
{
	<Option<u32> as Deserialize<'de>>::deserialize(deserializer)
		.map(|maybe_num| maybe_num.and_then(NonZero::new))
}
