use {
	derive_more::{Display, Error, From},
	std::num::TryFromIntError,
};

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// An error returned by the database
#[derive(Debug, Display, Error, From)]
#[display("database error: {_0}")]
pub struct DatabaseError(sqlx::Error);

impl DatabaseError
{
	/// Helper function to construct a [`DatabaseError`] from a failed attempt to
	/// convert the result of a `SELECT COUNT(*) ...` query.
	pub(crate) fn convert_count(error: TryFromIntError) -> Self
	{
		Self(sqlx::Error::ColumnDecode { index: String::from("count"), source: error.into() })
	}

	/// Returns whether this error is a unique key violation of the given `key`.
	///
	/// SQLite reports these as `UNIQUE constraint failed: <table>.<column>`.
	pub fn is_unique_violation(&self, key: &str) -> bool
	{
		self.0
			.as_database_error()
			.is_some_and(|error| error.is_unique_violation() && error.message().contains(key))
	}

	/// Returns whether this error is a foreign key violation.
	pub fn is_foreign_key_violation(&self) -> bool
	{
		self.0
			.as_database_error()
			.is_some_and(|error| error.is_foreign_key_violation())
	}
}
