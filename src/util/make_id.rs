//! Helper macro for creating "ID" types.

/// Creates a new "ID" type backed by an `i64` row id.
///
/// The generated type is transparent for serde and sqlx, so it can be used
/// directly in request/response bodies and query results.
macro_rules! make_id {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[repr(transparent)]
		#[derive(
			Debug,
			Clone,
			Copy,
			PartialEq,
			Eq,
			PartialOrd,
			Ord,
			Hash,
			serde::Serialize,
			serde::Deserialize,
			sqlx::Type,
		)]
		#[serde(transparent)]
		#[sqlx(transparent)]
		pub struct $name(i64);

		impl $name
		{
			pub const fn new(value: i64) -> Self
			{
				Self(value)
			}

			pub const fn get(self) -> i64
			{
				self.0
			}
		}

		impl std::fmt::Display for $name
		{
			fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
			{
				std::fmt::Display::fmt(&self.0, fmt)
			}
		}

		impl From<$name> for i64
		{
			fn from(value: $name) -> Self
			{
				value.0
			}
		}

		impl std::str::FromStr for $name
		{
			type Err = std::num::ParseIntError;

			fn from_str(value: &str) -> std::result::Result<Self, Self::Err>
			{
				value.parse::<i64>().map(Self)
			}
		}
	};
}

pub(crate) use make_id;
