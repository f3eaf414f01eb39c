use {
	crate::{
		database::DatabaseError,
		events::SubscriptionUnavailable,
		http::problem_details::{ProblemDetails, ProblemType},
		links::InvalidLink,
		users::{CreateUserError, PasswordError},
		votes::CreateVoteError,
	},
	axum::{
		extract::rejection::{JsonRejection, PathRejection},
		response::{IntoResponse, Response},
	},
	std::{error::Error, panic::Location},
};

pub(crate) type HandlerResult<T> = Result<T, HandlerError>;

/// Errors returned by request handlers.
///
/// Every variant is rendered as problem details.
#[derive(Debug)]
pub(crate) enum HandlerError
{
	Unauthorized,
	NotFound,
	Internal,
	Problem(ProblemDetails),
}

impl IntoResponse for HandlerError
{
	fn into_response(self) -> Response
	{
		match self {
			Self::Unauthorized => ProblemDetails::new(ProblemType::Unauthorized).into_response(),
			Self::NotFound => ProblemDetails::new(ProblemType::NotFound).into_response(),
			Self::Internal => ProblemDetails::new(ProblemType::Internal).into_response(),
			Self::Problem(problem_details) => problem_details.into_response(),
		}
	}
}

impl From<ProblemDetails> for HandlerError
{
	fn from(problem_details: ProblemDetails) -> Self
	{
		Self::Problem(problem_details)
	}
}

impl From<ProblemType> for HandlerError
{
	fn from(problem_type: ProblemType) -> Self
	{
		Self::Problem(ProblemDetails::new(problem_type))
	}
}

impl From<DatabaseError> for HandlerError
{
	#[track_caller]
	fn from(error: DatabaseError) -> Self
	{
		error!(loc = %Location::caller(), error = &error as &dyn Error, "database error");
		Self::Internal
	}
}

impl From<PasswordError> for HandlerError
{
	#[track_caller]
	fn from(error: PasswordError) -> Self
	{
		error!(loc = %Location::caller(), error = &error as &dyn Error, "password hashing failed");
		Self::Internal
	}
}

impl From<CreateUserError> for HandlerError
{
	fn from(error: CreateUserError) -> Self
	{
		match error {
			CreateUserError::EmailTaken => ProblemType::EmailAlreadyTaken.into(),
			CreateUserError::Database(database_error) => database_error.into(),
		}
	}
}

impl From<CreateVoteError> for HandlerError
{
	fn from(error: CreateVoteError) -> Self
	{
		match error {
			CreateVoteError::LinkNotFound => Self::NotFound,
			CreateVoteError::AlreadyVoted => ProblemType::AlreadyVoted.into(),
			CreateVoteError::Database(database_error) => database_error.into(),
		}
	}
}

impl From<InvalidLink> for HandlerError
{
	fn from(error: InvalidLink) -> Self
	{
		ProblemDetails::new(ProblemType::InvalidRequestBody)
			.with_detail(error.to_string())
			.into()
	}
}

impl From<SubscriptionUnavailable> for HandlerError
{
	fn from(_: SubscriptionUnavailable) -> Self
	{
		ProblemType::SubscriptionUnavailable.into()
	}
}

impl From<JsonRejection> for HandlerError
{
	fn from(rejection: JsonRejection) -> Self
	{
		let problem_type = match rejection {
			JsonRejection::JsonDataError(_) => ProblemType::InvalidRequestBody,
			_ => ProblemType::DeserializeRequestBody,
		};

		ProblemDetails::new(problem_type).with_detail(rejection.body_text()).into()
	}
}

impl From<PathRejection> for HandlerError
{
	fn from(rejection: PathRejection) -> Self
	{
		ProblemDetails::new(ProblemType::InvalidPathParameters)
			.with_detail(rejection.body_text())
			.into()
	}
}
