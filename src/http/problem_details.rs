//! [RFC 9457] problem details.
//!
//! Every error response is an `application/problem+json` body.
//!
//! [RFC 9457]: https://www.rfc-editor.org/rfc/rfc9457.html

use {
	axum::response::{IntoResponse, Response},
	headers::{ContentType, HeaderMapExt},
	serde::ser::{Serialize, SerializeMap, Serializer},
	std::borrow::Cow,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProblemType
{
	InvalidPathParameters,
	InvalidQueryParameters,
	DeserializeRequestBody,
	InvalidRequestBody,
	Unauthorized,
	InvalidCredentials,
	NotFound,
	EmailAlreadyTaken,
	AlreadyVoted,
	SubscriptionUnavailable,
	Internal,
}

#[derive(Debug, Clone)]
pub(crate) struct ProblemDetails
{
	problem_type: ProblemType,
	detail: Option<Cow<'static, str>>,
}

impl ProblemType
{
	pub(crate) fn slug(self) -> &'static str
	{
		match self {
			Self::InvalidPathParameters => "invalid-path-parameters",
			Self::InvalidQueryParameters => "invalid-query-parameters",
			Self::DeserializeRequestBody => "deserialize-request-body",
			Self::InvalidRequestBody => "invalid-request-body",
			Self::Unauthorized => "unauthorized",
			Self::InvalidCredentials => "invalid-credentials",
			Self::NotFound => "not-found",
			Self::EmailAlreadyTaken => "email-already-taken",
			Self::AlreadyVoted => "already-voted",
			Self::SubscriptionUnavailable => "subscription-unavailable",
			Self::Internal => "internal",
		}
	}

	pub(crate) fn status(self) -> http::StatusCode
	{
		match self {
			Self::InvalidPathParameters | Self::InvalidQueryParameters => {
				http::StatusCode::BAD_REQUEST
			},
			Self::DeserializeRequestBody | Self::InvalidRequestBody => {
				http::StatusCode::UNPROCESSABLE_ENTITY
			},
			Self::Unauthorized | Self::InvalidCredentials => http::StatusCode::UNAUTHORIZED,
			Self::NotFound => http::StatusCode::NOT_FOUND,
			Self::EmailAlreadyTaken | Self::AlreadyVoted => http::StatusCode::CONFLICT,
			Self::SubscriptionUnavailable => http::StatusCode::SERVICE_UNAVAILABLE,
			Self::Internal => http::StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn title(self) -> &'static str
	{
		match self {
			Self::InvalidPathParameters => "invalid path parameters",
			Self::InvalidQueryParameters => "invalid query parameters",
			Self::DeserializeRequestBody => "failed to deserialize request body",
			Self::InvalidRequestBody => "invalid request body",
			Self::Unauthorized => "missing or invalid authentication token",
			Self::InvalidCredentials => "wrong email address or password",
			Self::NotFound => "resource not found",
			Self::EmailAlreadyTaken => "email address is already taken",
			Self::AlreadyVoted => "you already voted on this link",
			Self::SubscriptionUnavailable => "live updates are currently unavailable",
			Self::Internal => "something went wrong",
		}
	}
}

impl ProblemDetails
{
	pub(crate) fn new(problem_type: ProblemType) -> Self
	{
		Self { problem_type, detail: None }
	}

	pub(crate) fn set_detail(&mut self, detail: impl Into<Cow<'static, str>>)
	{
		self.detail = Some(detail.into());
	}

	pub(crate) fn with_detail(mut self, detail: impl Into<Cow<'static, str>>) -> Self
	{
		self.set_detail(detail);
		self
	}
}

impl Serialize for ProblemDetails
{
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let field_count = 3 + usize::from(self.detail.is_some());
		let mut serializer = serializer.serialize_map(Some(field_count))?;

		serializer.serialize_entry(
			"type",
			&format_args!("/problems/{}", self.problem_type.slug()),
		)?;
		serializer.serialize_entry("title", self.problem_type.title())?;
		serializer.serialize_entry("status", &self.problem_type.status().as_u16())?;

		if let Some(ref detail) = self.detail {
			serializer.serialize_entry("detail", detail)?;
		}

		serializer.end()
	}
}

impl IntoResponse for ProblemDetails
{
	fn into_response(self) -> Response
	{
		let body = match serde_json::to_vec(&self) {
			Ok(body) => body,
			Err(err) => {
				error!(error = &err as &dyn std::error::Error, "failed to serialize problem details");
				return http::StatusCode::INTERNAL_SERVER_ERROR.into_response();
			},
		};

		let mut response = (self.problem_type.status(), body).into_response();
		let content_type = "application/problem+json"
			.parse::<mime::Mime>()
			.map(ContentType::from)
			.unwrap_or_else(|_| ContentType::json());

		response.headers_mut().typed_insert(content_type);
		response
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn serializes_rfc_9457_members() -> color_eyre::Result<()>
	{
		let problem = ProblemDetails::new(ProblemType::AlreadyVoted).with_detail("link #1");
		let json = serde_json::to_value(&problem)?;

		assert_eq!(json["type"], "/problems/already-voted");
		assert_eq!(json["status"], 409);
		assert_eq!(json["detail"], "link #1");
		assert!(json["title"].is_string());

		Ok(())
	}
}
