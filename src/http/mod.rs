//! The HTTP API.
//!
//! | Method | Path | |
//! |---|---|---|
//! | `POST` | `/signup` | create an account |
//! | `POST` | `/login` | exchange credentials for a token |
//! | `GET` | `/links` | search links |
//! | `GET` | `/links/meta` | count links |
//! | `GET` | `/links/{id}` | a link with its votes |
//! | `POST` | `/links` | post a link (authenticated) |
//! | `POST` | `/links/{id}/votes` | vote on a link (authenticated) |
//! | `GET` | `/users/{id}` | a user with their links and votes |
//! | `GET` | `/subscriptions/links` | SSE stream of new links |
//! | `GET` | `/subscriptions/votes` | SSE stream of new votes |

use {
	crate::{auth::JwtState, config::HttpConfig, database::ConnectionPool, events::EventHub},
	axum::{
		Router,
		routing::{get, post},
	},
	std::{sync::Arc, time::Duration},
	tokio_util::sync::CancellationToken,
	tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer},
};

mod error;
mod extract;
mod handlers;
mod middleware;
mod problem_details;


/// State shared by all request handlers.
#[derive(Debug, Clone)]
pub(crate) struct AppState
{
	pub(crate) database: ConnectionPool,
	pub(crate) jwt: Arc<JwtState>,
	pub(crate) events: EventHub,
	pub(crate) password_cost: u32,
	pub(crate) keep_alive_interval: Duration,

	/// Cancelled when the server starts shutting down, which ends all live
	/// subscriptions.
	pub(crate) shutdown_token: CancellationToken,
}

pub(crate) fn router(state: AppState, config: &HttpConfig) -> Router
{
	Router::new()
		.route("/signup", post(handlers::signup))
		.route("/login", post(handlers::login))
		.route("/links", get(handlers::get_links).post(handlers::post_link))
		.route("/links/meta", get(handlers::get_links_meta))
		.route("/links/{id}", get(handlers::get_link))
		.route("/links/{id}/votes", post(handlers::upvote))
		.route("/users/{id}", get(handlers::get_user))
		.route("/subscriptions/links", get(handlers::subscribe_links))
		.route("/subscriptions/votes", get(handlers::subscribe_votes))
		.layer(CatchPanicLayer::custom(middleware::panic::handle_panic))
		.layer(
			TraceLayer::new_for_http()
				.make_span_with(middleware::trace::make_span)
				.on_request(middleware::trace::on_request)
				.on_response(middleware::trace::on_response)
				.on_failure(middleware::trace::on_failure),
		)
		.layer(middleware::cors::layer(config.cors.allowed_origins()))
		.with_state(state)
}
