use {
	http::{Request, Response},
	std::time::Duration,
	tower_http::classify::ServerErrorsFailureClass,
};

pub(crate) fn make_span<B>(req: &Request<B>) -> tracing::Span
{
	tracing::info_span!(
		target: "hackernews_api::http",
		"request",
		req.method = %req.method(),
		req.uri = %req.uri(),
		req.version = ?req.version(),
		res.status = tracing::field::Empty,
	)
}

pub(crate) fn on_request<B>(_req: &Request<B>, _span: &tracing::Span)
{
	debug!(target: "hackernews_api::http", "starting to process request");
}

pub(crate) fn on_response<B>(res: &Response<B>, latency: Duration, span: &tracing::Span)
{
	span.record("res.status", res.status().as_u16());
	info!(target: "hackernews_api::http", ?latency, "finished processing request");
}

pub(crate) fn on_failure(
	failure_class: ServerErrorsFailureClass,
	latency: Duration,
	_span: &tracing::Span,
)
{
	match failure_class {
		ServerErrorsFailureClass::StatusCode(status) => {
			error!(
				target: "hackernews_api::http",
				status = status.as_u16(),
				?latency,
				"failed to handle request",
			);
		},
		ServerErrorsFailureClass::Error(error) => {
			error!(target: "hackernews_api::http", error, ?latency, "failed to handle request");
		},
	}
}
