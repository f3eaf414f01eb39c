use {
	super::{ConnectionPool, DatabaseError},
	crate::{
		links::{self, InvalidLink, NewLink},
		users::{self, CreateUserError, EmailAddress, Password, PasswordError, Username},
		votes::{self, CreateVoteError},
	},
	derive_more::{Display, Error, From},
};

#[derive(Debug, Display, Error, From)]
pub enum SeedError
{
	#[display("{_0}")]
	Database(DatabaseError),

	#[display("{_0}")]
	Password(PasswordError),

	#[display("{_0}")]
	CreateUser(CreateUserError),

	#[display("{_0}")]
	CreateVote(CreateVoteError),

	#[display("{_0}")]
	InvalidLink(InvalidLink),

	#[from(ignore)]
	#[display("invalid sample data")]
	InvalidSampleData,
}

const USERS: &[(&str, &str, &str)] = &[
	("Alice", "alice@example.org", "alice-password"),
	("Bob", "bob@example.org", "bob-password"),
];

const LINKS: &[(&str, &str)] = &[
	("The Rust Programming Language", "https://doc.rust-lang.org/book"),
	("Asynchronous Programming in Rust", "https://rust-lang.github.io/async-book"),
	("Tokio tutorial", "https://tokio.rs/tokio/tutorial"),
	("SQLite documentation", "https://sqlite.org/docs.html"),
];

/// Inserts sample users, links and votes if the database has no users yet.
///
/// Every sample user posts every other link, and votes on the links posted by
/// the others.
#[tracing::instrument(skip(pool), err)]
pub async fn seed(pool: &ConnectionPool, password_cost: u32) -> Result<(), SeedError>
{
	let user_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
		.fetch_one(pool)
		.await
		.map_err(DatabaseError::from)?;

	if user_count > 0 {
		debug!(user_count, "database is not empty; skipping seed");
		return Ok(());
	}

	let mut user_ids = Vec::with_capacity(USERS.len());

	for &(name, email, password) in USERS {
		let name = name.parse::<Username>().map_err(|_| SeedError::InvalidSampleData)?;
		let email = email.parse::<EmailAddress>().map_err(|_| SeedError::InvalidSampleData)?;
		let password_hash = password
			.parse::<Password>()
			.map_err(|_| SeedError::InvalidSampleData)?
			.hash(password_cost)
			.await?;

		user_ids.push(users::create(pool, &name, &email, &password_hash).await?.id);
	}

	for (idx, &(description, url)) in LINKS.iter().enumerate() {
		let poster = user_ids[idx % user_ids.len()];
		let link = links::create(pool, &NewLink::new(description, url)?, poster).await?;

		for &voter in user_ids.iter().filter(|&&user_id| user_id != poster) {
			votes::create(pool, link.id, voter).await?;
		}
	}

	info!(users = USERS.len(), links = LINKS.len(), "seeded database");

	Ok(())
}

#[cfg(test)]
mod tests
{
	use {super::*, crate::database};

	#[tokio::test]
	async fn seeding_twice_is_a_noop() -> color_eyre::Result<()>
	{
		let pool = database::in_memory().await?;

		seed(&pool, 4).await?;
		seed(&pool, 4).await?;

		assert_eq!(links::count(&pool).await?, u64::try_from(LINKS.len())?);

		Ok(())
	}
}
