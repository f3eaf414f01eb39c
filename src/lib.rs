//! A link aggregator backend.
//!
//! Users sign up, post links and vote on them. Clients that want to know
//! about new links and votes as they happen can open a live subscription; see
//! the [`events`] module for how those are fanned out.

/*
 * hackernews-api - a link aggregator backend
 * Copyright (C) 2024  hackernews-api contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see https://www.gnu.org/licenses.
 */

use {
	derive_more::{Display, Error, From},
	std::{io, sync::Arc},
	tokio::net::TcpListener,
	tokio_util::sync::CancellationToken,
};

#[macro_use]
extern crate tracing;

mod util;

pub mod auth;
pub mod config;
pub mod database;
pub mod events;
pub mod links;
pub mod logging;
pub mod runtime;
pub mod users;
pub mod votes;

mod http;
mod signal;
mod task_manager;

pub use self::{config::Config, task_manager::TaskManager};

#[derive(Debug, Display, Error, From)]
pub enum RunError
{
	#[display("failed to connect to the database: {_0}")]
	Database(database::DatabaseError),

	#[display("failed to run database migrations: {_0}")]
	Migrate(sqlx::migrate::MigrateError),

	#[display("invalid authentication setup: {_0}")]
	Auth(auth::JwtSetupError),

	#[display("failed to seed the database: {_0}")]
	Seed(database::SeedError),

	#[display("i/o error: {_0}")]
	Io(io::Error),
}

/// Runs the HTTP server until the process receives a shutdown signal.
#[tracing::instrument(skip(config), err)]
pub async fn run(config: Config) -> Result<(), RunError>
{
	let task_manager = TaskManager::default();
	let shutdown_token = CancellationToken::new();

	let database = database::connect(&config.database).await?;
	database::migrate(&database).await?;

	if config.database.seed {
		database::seed(&database, config.auth.password_cost).await?;
	}

	let jwt = auth::JwtState::new(&config.auth)?;
	let events = events::EventHub::spawn(&config.events, &task_manager)?;
	let state = http::AppState {
		database,
		jwt: Arc::new(jwt),
		events,
		password_cost: config.auth.password_cost,
		keep_alive_interval: config.http.keep_alive_interval,
		shutdown_token: shutdown_token.clone(),
	};

	let listener = TcpListener::bind(config.http.socket_addr()).await?;
	info!(addr = %listener.local_addr()?, "listening for requests");

	axum::serve(listener, http::router(state, &config.http))
		.with_graceful_shutdown(async move {
			signal::shutdown().await;
			info!("shutting down");

			// live subscriptions would otherwise keep their connections open forever
			shutdown_token.cancel();
		})
		.await?;

	match tokio::time::timeout(config.http.shutdown_timeout, task_manager.shutdown()).await {
		Ok(()) => info!("all background tasks have exited"),
		Err(_) => {
			warn!(timeout = ?config.http.shutdown_timeout, "background tasks did not exit in time");
		},
	}

	Ok(())
}
