use {
	serde::Deserialize,
	sqlx::{QueryBuilder, Sqlite},
};

/// Search parameters for [`get()`](super::get).
///
/// If both `all_terms` and `any_terms` are given, `any_terms` is ignored.
/// Terms are matched case-sensitively against the description and the url.
#[derive(Debug, Default, Clone, bon::Builder)]
pub struct LinkFilter
{
	/// Every term must occur in the description or the url.
	#[builder(default)]
	pub all_terms: Vec<String>,

	/// At least one term must occur in the description or the url.
	#[builder(default)]
	pub any_terms: Vec<String>,

	#[builder(default)]
	pub skip: u64,

	pub first: Option<u64>,
	pub order: Option<LinkOrder>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkOrder
{
	CreatedAtAsc,
	CreatedAtDesc,
}

impl LinkFilter
{
	pub(super) fn to_query(&self) -> QueryBuilder<'_, Sqlite>
	{
		let mut query = QueryBuilder::new(
			"SELECT id, description, url, posted_by, created_at
			 FROM links",
		);

		let (terms, joiner) = if !self.all_terms.is_empty() {
			(&self.all_terms, " AND ")
		} else {
			(&self.any_terms, " OR ")
		};

		for (idx, term) in terms.iter().enumerate() {
			query.push(if idx == 0 { " WHERE " } else { joiner });
			query
				.push("(instr(description, ")
				.push_bind(term.as_str())
				.push(") > 0 OR instr(url, ")
				.push_bind(term.as_str())
				.push(") > 0)");
		}

		query.push(match self.order {
			None => " ORDER BY id ASC",
			Some(LinkOrder::CreatedAtAsc) => " ORDER BY created_at ASC, id ASC",
			Some(LinkOrder::CreatedAtDesc) => " ORDER BY created_at DESC, id DESC",
		});

		// SQLite treats a negative limit as "no limit"
		let limit = self.first.map_or(-1, |first| i64::try_from(first).unwrap_or(i64::MAX));
		let offset = i64::try_from(self.skip).unwrap_or(i64::MAX);

		query.push(" LIMIT ").push_bind(limit).push(" OFFSET ").push_bind(offset);
		query
	}
}
