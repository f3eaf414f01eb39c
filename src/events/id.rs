use {
	rand::{Rng, distr::Alphanumeric},
	serde::{Deserialize, Serialize},
	std::{convert::Infallible, fmt, str::FromStr, sync::Arc},
};

/// Length of generated identifiers.
pub(super) const ID_LEN: usize = 16;

/// Generates a random alphanumeric string of [`ID_LEN`] characters.
pub(crate) fn random_id() -> Arc<str>
{
	rand::rng()
		.sample_iter(Alphanumeric)
		.take(ID_LEN)
		.map(char::from)
		.collect::<String>()
		.into()
}

macro_rules! make_str_id {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Arc<str>);

		impl $name
		{
			/// Generates a new random identifier.
			pub fn random() -> Self
			{
				Self(random_id())
			}

			pub fn as_str(&self) -> &str
			{
				&self.0
			}
		}

		impl fmt::Display for $name
		{
			fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result
			{
				fmt.write_str(&self.0)
			}
		}

		impl From<&str> for $name
		{
			fn from(value: &str) -> Self
			{
				Self(value.into())
			}
		}

		impl FromStr for $name
		{
			type Err = Infallible;

			fn from_str(value: &str) -> Result<Self, Self::Err>
			{
				Ok(Self::from(value))
			}
		}
	};
}

make_str_id! {
	/// Opaque identifier of a published event.
	EventId
}

make_str_id! {
	/// Opaque identifier of a registered subscriber.
	///
	/// Assigned by the broadcaster, never by the caller.
	SubscriberId
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn random_ids_are_alphanumeric()
	{
		let id = SubscriberId::random();

		assert_eq!(id.as_str().len(), ID_LEN);
		assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
		assert_ne!(id, SubscriberId::random());
	}
}
