use {
	crate::http::problem_details::{ProblemDetails, ProblemType},
	axum::response::{IntoResponse, Response},
	std::any::Any,
};

/// Turns a panicking handler into a 500 response.
pub(crate) fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response
{
	let message = payload
		.downcast_ref::<&str>()
		.copied()
		.or_else(|| payload.downcast_ref::<String>().map(String::as_str))
		.unwrap_or("<unknown>");

	error!(target: "hackernews_api::panics", panic_message = message, "handler panicked");

	ProblemDetails::new(ProblemType::Internal).into_response()
}

#[cfg(test)]
mod tests
{
	use {super::*, http::StatusCode};

	#[test]
	fn panics_become_internal_errors()
	{
		let response = handle_panic(Box::new("boom"));

		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(
			response.headers().get(http::header::CONTENT_TYPE).map(|value| value.as_bytes()),
			Some(&b"application/problem+json"[..]),
		);
	}

	#[test]
	fn formatted_panic_messages_are_accepted()
	{
		let response = handle_panic(Box::new(format!("boom #{}", 2)));

		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	}
}
