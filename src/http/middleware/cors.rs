use {
	http::{HeaderValue, Method, header},
	tower_http::cors::{AllowOrigin, CorsLayer},
};

pub(crate) fn layer(allowed_origins: impl IntoIterator<Item = HeaderValue>) -> CorsLayer
{
	CorsLayer::new()
		.allow_origin(AllowOrigin::list(allowed_origins))
		.allow_methods([Method::GET, Method::POST])
		.allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
