//! Request extractors.
//!
//! These wrap axum's extractors so rejections are rendered as problem details.

use {
	crate::{
		http::{
			AppState,
			error::HandlerError,
			problem_details::{ProblemDetails, ProblemType},
		},
		users::{self, User},
	},
	axum::{
		extract::{FromRequest, FromRequestParts},
		http::request,
		response::{IntoResponse, Response},
	},
	headers::{Authorization, HeaderMapExt, authorization::Bearer},
	serde::{Deserialize, Serialize},
	std::fmt,
};

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(HandlerError))]
pub(crate) struct Json<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(HandlerError))]
pub(crate) struct Path<T>(pub T);

/// Query string extractor.
///
/// Unlike axum's, this one supports repeated keys (`?and=a&and=b`).
#[derive(Debug)]
pub(crate) struct Query<T>(pub T);

/// The user making the request, authenticated by a bearer token.
#[derive(Debug)]
pub(crate) struct CurrentUser(pub User);

impl<T> IntoResponse for Json<T>
where
	T: Serialize,
{
	fn into_response(self) -> Response
	{
		axum::Json(self.0).into_response()
	}
}

impl<T, S> FromRequestParts<S> for Query<T>
where
	T: for<'de> Deserialize<'de> + fmt::Debug + Send + 'static,
	S: Send + Sync,
{
	type Rejection = HandlerError;

	#[tracing::instrument(level = "debug", skip_all, ret(level = "debug"), err(Debug, level = "debug"))]
	async fn from_request_parts(
		parts: &mut request::Parts,
		_state: &S,
	) -> Result<Self, Self::Rejection>
	{
		let query = parts.uri.query().unwrap_or_default();

		serde_html_form::from_str(query).map(Self).map_err(|err| {
			ProblemDetails::new(ProblemType::InvalidQueryParameters)
				.with_detail(err.to_string())
				.into()
		})
	}
}

impl FromRequestParts<AppState> for CurrentUser
{
	type Rejection = HandlerError;

	#[tracing::instrument(level = "debug", skip_all, err(Debug, level = "debug"))]
	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &AppState,
	) -> Result<Self, Self::Rejection>
	{
		let Some(Authorization(bearer)) = parts.headers.typed_get::<Authorization<Bearer>>()
		else {
			return Err(HandlerError::Unauthorized);
		};

		let user_id = state.jwt.decode(bearer.token()).map_err(|err| {
			debug!(error = &err as &dyn std::error::Error, "rejecting token");
			HandlerError::Unauthorized
		})?;

		// the token may outlive the account
		let user = users::get_by_id(&state.database, user_id)
			.await?
			.ok_or(HandlerError::Unauthorized)?;

		Ok(Self(user))
	}
}
