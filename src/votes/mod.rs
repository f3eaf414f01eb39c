//! Votes cast on links.
//!
//! A user can vote on each link at most once.

use {
	crate::{
		database::{ConnectionPool, DatabaseError, DatabaseResult},
		links::LinkId,
		users::UserId,
	},
	derive_more::{Display, Error},
	serde::Serialize,
	time::OffsetDateTime,
};

crate::util::make_id! {
	/// Unique identifier of a [`Vote`].
	VoteId
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Vote
{
	pub id: VoteId,
	pub link_id: LinkId,
	pub user_id: UserId,

	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Display, Error)]
pub enum CreateVoteError
{
	#[display("link does not exist")]
	LinkNotFound,

	#[display("user has already voted on this link")]
	AlreadyVoted,

	#[display("{_0}")]
	Database(DatabaseError),
}

impl From<DatabaseError> for CreateVoteError
{
	fn from(error: DatabaseError) -> Self
	{
		if error.is_unique_violation("votes.link_id") {
			Self::AlreadyVoted
		} else if error.is_foreign_key_violation() {
			Self::LinkNotFound
		} else {
			Self::Database(error)
		}
	}
}

impl From<sqlx::Error> for CreateVoteError
{
	fn from(error: sqlx::Error) -> Self
	{
		DatabaseError::from(error).into()
	}
}

#[tracing::instrument(skip(pool), ret(level = "debug"), err(level = "debug"))]
pub async fn create(
	pool: &ConnectionPool,
	link_id: LinkId,
	user_id: UserId,
) -> Result<Vote, CreateVoteError>
{
	let mut txn = pool.begin().await?;

	let link_exists =
		sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM links WHERE id = ?)")
			.bind(link_id)
			.fetch_one(&mut *txn)
			.await?;

	if !link_exists {
		return Err(CreateVoteError::LinkNotFound);
	}

	let vote = sqlx::query_as::<_, Vote>(
		"INSERT INTO votes (link_id, user_id, created_at)
		 VALUES (?, ?, ?)
		 RETURNING id, link_id, user_id, created_at",
	)
	.bind(link_id)
	.bind(user_id)
	.bind(OffsetDateTime::now_utc())
	.fetch_one(&mut *txn)
	.await?;

	txn.commit().await?;

	Ok(vote)
}

#[tracing::instrument(skip(pool), err)]
pub async fn get_by_link(pool: &ConnectionPool, link_id: LinkId) -> DatabaseResult<Vec<Vote>>
{
	let votes = sqlx::query_as::<_, Vote>(
		"SELECT id, link_id, user_id, created_at
		 FROM votes
		 WHERE link_id = ?
		 ORDER BY id",
	)
	.bind(link_id)
	.fetch_all(pool)
	.await?;

	Ok(votes)
}

#[cfg(test)]
mod tests
{
	use {
		super::*,
		crate::{
			database,
			links::{self, NewLink},
			users::{self, Password},
		},
	};

	#[tokio::test]
	async fn one_vote_per_user_and_link() -> color_eyre::Result<()>
	{
		let pool = database::in_memory().await?;
		let password_hash = "hunter2".parse::<Password>()?.hash(4).await?;
		let alice =
			users::create(&pool, &"alice".parse()?, &"alice@example.org".parse()?, &password_hash)
				.await?;
		let bob = users::create(&pool, &"bob".parse()?, &"bob@example.org".parse()?, &password_hash)
			.await?;
		let link = links::create(
			&pool,
			&NewLink::new("example", "https://example.org")?,
			alice.id,
		)
		.await?;

		let vote = create(&pool, link.id, bob.id).await?;
		assert_eq!((vote.link_id, vote.user_id), (link.id, bob.id));

		assert!(matches!(create(&pool, link.id, bob.id).await, Err(CreateVoteError::AlreadyVoted)));
		create(&pool, link.id, alice.id).await?;

		assert!(matches!(
			create(&pool, LinkId::new(404), bob.id).await,
			Err(CreateVoteError::LinkNotFound),
		));

		let votes = get_by_link(&pool, link.id).await?;
		assert_eq!(votes.len(), 2);
		assert_eq!(votes[0], vote);

		Ok(())
	}
}
