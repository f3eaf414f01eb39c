//! Posted links and searching through them.

pub use self::filter::{LinkFilter, LinkOrder};
use {
	crate::{
		database::{ConnectionPool, DatabaseError, DatabaseResult},
		users::{self, User, UserId},
		votes::{self, Vote},
	},
	derive_more::{Display, Error},
	serde::Serialize,
	time::OffsetDateTime,
};

mod filter;

crate::util::make_id! {
	/// Unique identifier of a [`Link`].
	LinkId
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Link
{
	pub id: LinkId,
	pub description: String,
	pub url: String,
	pub posted_by: UserId,

	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}

/// A [`Link`] together with who posted it and its votes.
#[derive(Debug, Serialize)]
pub struct LinkDetails
{
	#[serde(flatten)]
	pub link: Link,
	pub poster: Option<User>,
	pub votes: Vec<Vote>,
}

/// A validated link submission.
#[derive(Debug, Clone)]
pub struct NewLink
{
	description: String,
	url: String,
}

#[non_exhaustive]
#[derive(Debug, Display, Error)]
pub enum InvalidLink
{
	#[display("description may not be empty")]
	EmptyDescription,

	#[display("url must start with `http://` or `https://`")]
	InvalidUrl,
}

impl NewLink
{
	pub fn new(description: &str, url: &str) -> Result<Self, InvalidLink>
	{
		let description = description.trim();
		let url = url.trim();

		if description.is_empty() {
			return Err(InvalidLink::EmptyDescription);
		}

		let host = url
			.strip_prefix("https://")
			.or_else(|| url.strip_prefix("http://"))
			.ok_or(InvalidLink::InvalidUrl)?;

		if host.is_empty() || host.contains(char::is_whitespace) {
			return Err(InvalidLink::InvalidUrl);
		}

		Ok(Self { description: description.to_owned(), url: url.to_owned() })
	}
}

#[tracing::instrument(skip(pool), ret(level = "debug"), err)]
pub async fn create(
	pool: &ConnectionPool,
	new_link: &NewLink,
	posted_by: UserId,
) -> DatabaseResult<Link>
{
	let link = sqlx::query_as::<_, Link>(
		"INSERT INTO links (description, url, posted_by, created_at)
		 VALUES (?, ?, ?, ?)
		 RETURNING id, description, url, posted_by, created_at",
	)
	.bind(&new_link.description)
	.bind(&new_link.url)
	.bind(posted_by)
	.bind(OffsetDateTime::now_utc())
	.fetch_one(pool)
	.await?;

	Ok(link)
}

#[tracing::instrument(skip(pool), err)]
pub async fn get_by_id(pool: &ConnectionPool, link_id: LinkId) -> DatabaseResult<Option<Link>>
{
	let link = sqlx::query_as::<_, Link>(
		"SELECT id, description, url, posted_by, created_at
		 FROM links
		 WHERE id = ?",
	)
	.bind(link_id)
	.fetch_optional(pool)
	.await?;

	Ok(link)
}

#[tracing::instrument(skip(pool), err)]
pub async fn get_details(
	pool: &ConnectionPool,
	link_id: LinkId,
) -> DatabaseResult<Option<LinkDetails>>
{
	let Some(link) = get_by_id(pool, link_id).await? else {
		return Ok(None);
	};

	let poster = users::get_by_id(pool, link.posted_by).await?;
	let votes = votes::get_by_link(pool, link_id).await?;

	Ok(Some(LinkDetails { link, poster, votes }))
}

/// Returns the links matching `filter`.
#[tracing::instrument(skip(pool), err)]
pub async fn get(pool: &ConnectionPool, filter: &LinkFilter) -> DatabaseResult<Vec<Link>>
{
	let links = filter
		.to_query()
		.build_query_as::<Link>()
		.fetch_all(pool)
		.await?;

	debug!(count = links.len(), "fetched links");

	Ok(links)
}

/// Returns the total number of links.
#[tracing::instrument(skip(pool), ret(level = "debug"), err)]
pub async fn count(pool: &ConnectionPool) -> DatabaseResult<u64>
{
	let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM links")
		.fetch_one(pool)
		.await?;

	count.try_into().map_err(DatabaseError::convert_count)
}

#[cfg(test)]
mod tests;
