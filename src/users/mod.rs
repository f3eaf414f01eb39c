//! Registered users.

pub use self::{
	email::{EmailAddress, InvalidEmailAddress},
	name::{InvalidUsername, Username},
	password::{InvalidPassword, Password, PasswordError, PasswordHash},
};
use {
	crate::{
		database::{ConnectionPool, DatabaseError, DatabaseResult},
		links::LinkId,
		votes::VoteId,
	},
	derive_more::{Display, Error},
	serde::Serialize,
	time::OffsetDateTime,
};

mod email;
mod name;
mod password;

crate::util::make_id! {
	/// Unique identifier of a [`User`].
	UserId
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User
{
	pub id: UserId,
	pub name: Username,

	#[serde(skip)]
	pub email: EmailAddress,

	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}

/// A [`User`] together with the things they posted and voted on.
#[derive(Debug, Serialize)]
pub struct UserProfile
{
	#[serde(flatten)]
	pub user: User,
	pub links: Vec<LinkId>,
	pub votes: Vec<VoteId>,
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialsRow
{
	#[sqlx(flatten)]
	user: User,
	password_hash: PasswordHash,
}

#[derive(Debug, Display, Error)]
pub enum CreateUserError
{
	#[display("email address is already taken")]
	EmailTaken,

	#[display("{_0}")]
	Database(DatabaseError),
}

#[tracing::instrument(skip(pool, password_hash), ret(level = "debug"), err(level = "debug"))]
pub async fn create(
	pool: &ConnectionPool,
	name: &Username,
	email: &EmailAddress,
	password_hash: &PasswordHash,
) -> Result<User, CreateUserError>
{
	sqlx::query_as::<_, User>(
		"INSERT INTO users (name, email, password_hash, created_at)
		 VALUES (?, ?, ?, ?)
		 RETURNING id, name, email, created_at",
	)
	.bind(name)
	.bind(email)
	.bind(password_hash)
	.bind(OffsetDateTime::now_utc())
	.fetch_one(pool)
	.await
	.map_err(DatabaseError::from)
	.map_err(|err| {
		if err.is_unique_violation("users.email") {
			CreateUserError::EmailTaken
		} else {
			CreateUserError::Database(err)
		}
	})
}

#[tracing::instrument(skip(pool), err)]
pub async fn get_by_id(pool: &ConnectionPool, user_id: UserId) -> DatabaseResult<Option<User>>
{
	let user = sqlx::query_as::<_, User>(
		"SELECT id, name, email, created_at
		 FROM users
		 WHERE id = ?",
	)
	.bind(user_id)
	.fetch_optional(pool)
	.await?;

	Ok(user)
}

/// Fetches a user along with their password hash for logging in.
#[tracing::instrument(skip(pool), err)]
pub async fn get_credentials(
	pool: &ConnectionPool,
	email: &EmailAddress,
) -> DatabaseResult<Option<(User, PasswordHash)>>
{
	let row = sqlx::query_as::<_, CredentialsRow>(
		"SELECT id, name, email, created_at, password_hash
		 FROM users
		 WHERE email = ?",
	)
	.bind(email)
	.fetch_optional(pool)
	.await?;

	Ok(row.map(|row| (row.user, row.password_hash)))
}

#[tracing::instrument(skip(pool), err)]
pub async fn get_profile(pool: &ConnectionPool, user_id: UserId)
-> DatabaseResult<Option<UserProfile>>
{
	let Some(user) = get_by_id(pool, user_id).await? else {
		return Ok(None);
	};

	let links = sqlx::query_scalar::<_, LinkId>(
		"SELECT id FROM links WHERE posted_by = ? ORDER BY id",
	)
	.bind(user_id)
	.fetch_all(pool)
	.await?;

	let votes = sqlx::query_scalar::<_, VoteId>(
		"SELECT id FROM votes WHERE user_id = ? ORDER BY id",
	)
	.bind(user_id)
	.fetch_all(pool)
	.await?;

	Ok(Some(UserProfile { user, links, votes }))
}

#[cfg(test)]
mod tests
{
	use {super::*, crate::database};

	async fn hash(password: &str) -> color_eyre::Result<PasswordHash>
	{
		Ok(password.parse::<Password>()?.hash(4).await?)
	}

	#[tokio::test]
	async fn emails_are_unique() -> color_eyre::Result<()>
	{
		let pool = database::in_memory().await?;
		let email = "alice@example.org".parse::<EmailAddress>()?;
		let password_hash = hash("hunter2").await?;

		let alice = create(&pool, &"alice".parse()?, &email, &password_hash).await?;
		let duplicate = create(&pool, &"alice2".parse()?, &email, &password_hash).await;

		assert!(matches!(duplicate, Err(CreateUserError::EmailTaken)));
		assert_eq!(get_by_id(&pool, alice.id).await?.map(|user| user.id), Some(alice.id));

		Ok(())
	}

	#[tokio::test]
	async fn credentials_carry_the_stored_hash() -> color_eyre::Result<()>
	{
		let pool = database::in_memory().await?;
		let email = "bob@example.org".parse::<EmailAddress>()?;
		let bob = create(&pool, &"bob".parse()?, &email, &hash("correct horse").await?).await?;

		let Some((user, password_hash)) = get_credentials(&pool, &email).await? else {
			panic!("bob should exist");
		};

		assert_eq!(user.id, bob.id);
		assert!("correct horse".parse::<Password>()?.verify(password_hash).await?);
		assert!(get_credentials(&pool, &"eve@example.org".parse()?).await?.is_none());

		Ok(())
	}

	#[tokio::test]
	async fn missing_users_have_no_profile() -> color_eyre::Result<()>
	{
		let pool = database::in_memory().await?;

		assert!(get_profile(&pool, UserId::new(42)).await?.is_none());

		Ok(())
	}
}
