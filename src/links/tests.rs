use {
	super::*,
	crate::{
		database,
		users::{EmailAddress, Password},
	},
};

async fn setup() -> color_eyre::Result<(ConnectionPool, UserId)>
{
	let pool = database::in_memory().await?;
	let password_hash = "hunter2".parse::<Password>()?.hash(4).await?;
	let user = users::create(
		&pool,
		&"alice".parse()?,
		&"alice@example.org".parse::<EmailAddress>()?,
		&password_hash,
	)
	.await?;

	for (description, url) in [
		("The Rust Programming Language", "https://doc.rust-lang.org/book"),
		("Tokio tutorial", "https://tokio.rs/tokio/tutorial"),
		("SQLite docs", "https://sqlite.org/docs.html"),
		("Rust async book", "https://rust-lang.github.io/async-book"),
	] {
		create(&pool, &NewLink::new(description, url)?, user.id).await?;
	}

	Ok((pool, user.id))
}

fn descriptions(links: &[Link]) -> Vec<&str>
{
	links.iter().map(|link| link.description.as_str()).collect()
}

#[tokio::test]
async fn no_filter_returns_insertion_order() -> color_eyre::Result<()>
{
	let (pool, _) = setup().await?;
	let links = get(&pool, &LinkFilter::default()).await?;

	assert_eq!(descriptions(&links), [
		"The Rust Programming Language",
		"Tokio tutorial",
		"SQLite docs",
		"Rust async book",
	]);

	Ok(())
}

#[tokio::test]
async fn all_terms_must_match() -> color_eyre::Result<()>
{
	let (pool, _) = setup().await?;
	let filter = LinkFilter::builder()
		.all_terms(vec![String::from("Rust"), String::from("async")])
		.build();

	assert_eq!(descriptions(&get(&pool, &filter).await?), ["Rust async book"]);

	Ok(())
}

#[tokio::test]
async fn any_term_may_match_description_or_url() -> color_eyre::Result<()>
{
	let (pool, _) = setup().await?;
	let filter = LinkFilter::builder()
		.any_terms(vec![String::from("tokio.rs"), String::from("SQLite")])
		.build();

	assert_eq!(descriptions(&get(&pool, &filter).await?), ["Tokio tutorial", "SQLite docs"]);

	Ok(())
}

#[tokio::test]
async fn all_terms_take_precedence() -> color_eyre::Result<()>
{
	let (pool, _) = setup().await?;
	let filter = LinkFilter::builder()
		.all_terms(vec![String::from("SQLite")])
		.any_terms(vec![String::from("Tokio")])
		.build();

	assert_eq!(descriptions(&get(&pool, &filter).await?), ["SQLite docs"]);

	Ok(())
}

#[tokio::test]
async fn matching_is_case_sensitive() -> color_eyre::Result<()>
{
	let (pool, _) = setup().await?;
	let filter = LinkFilter::builder().all_terms(vec![String::from("rust programming")]).build();

	assert!(get(&pool, &filter).await?.is_empty());

	Ok(())
}

#[tokio::test]
async fn skip_and_first_paginate() -> color_eyre::Result<()>
{
	let (pool, _) = setup().await?;
	let filter = LinkFilter::builder().skip(1).first(2).build();

	assert_eq!(descriptions(&get(&pool, &filter).await?), ["Tokio tutorial", "SQLite docs"]);

	let filter = LinkFilter::builder().skip(3).build();
	assert_eq!(descriptions(&get(&pool, &filter).await?), ["Rust async book"]);

	Ok(())
}

#[tokio::test]
async fn descending_order_reverses() -> color_eyre::Result<()>
{
	let (pool, _) = setup().await?;
	let filter = LinkFilter::builder().order(LinkOrder::CreatedAtDesc).first(1).build();

	assert_eq!(descriptions(&get(&pool, &filter).await?), ["Rust async book"]);

	Ok(())
}

#[tokio::test]
async fn count_and_details() -> color_eyre::Result<()>
{
	let (pool, user_id) = setup().await?;

	assert_eq!(count(&pool).await?, 4);

	let Some(details) = get_details(&pool, LinkId::new(1)).await? else {
		panic!("first link should exist");
	};

	assert_eq!(details.link.posted_by, user_id);
	assert_eq!(details.poster.map(|user| user.id), Some(user_id));
	assert!(details.votes.is_empty());
	assert!(get_details(&pool, LinkId::new(999)).await?.is_none());

	Ok(())
}

#[test]
fn rejects_invalid_submissions()
{
	assert!(matches!(NewLink::new("  ", "https://example.org"), Err(InvalidLink::EmptyDescription)));
	assert!(matches!(NewLink::new("example", "example.org"), Err(InvalidLink::InvalidUrl)));
	assert!(matches!(NewLink::new("example", "https://"), Err(InvalidLink::InvalidUrl)));
	assert!(NewLink::new("example", "http://example.org").is_ok());
}
