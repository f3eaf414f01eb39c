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
	color_eyre::{
		Section,
		eyre::{self, WrapErr},
	},
	hackernews_api::{Config, logging, runtime},
	tracing::Instrument,
};

mod cli;

fn main() -> eyre::Result<()>
{
	color_eyre::install()?;

	let args = cli::args();

	match args.env_file.as_deref() {
		Some(path) => {
			dotenvy::from_path(path)
				.wrap_err_with(|| format!("failed to load {path:?}"))
				.suggestion("check that the file exists and is valid `.env` syntax")?;
		},
		None => match dotenvy::dotenv() {
			Ok(_) => {},
			Err(err) if err.not_found() => {},
			Err(err) => return Err(err).wrap_err("failed to load `.env` file"),
		},
	}

	let mut config = Config::load_from_file(&args.config_path)?;
	config.apply_env_overrides();

	if let Some(ip_addr) = args.ip_addr {
		config.http.ip_addr = ip_addr;
	}

	if let Some(port) = args.port {
		config.http.port = port;
	}

	let _guard = logging::init(&config.tracing).wrap_err("failed to initialize tracing")?;
	runtime::panic_hook::install();

	tracing::debug!(?config, "loaded configuration");

	runtime::build(&config.runtime)
		.wrap_err("failed to build tokio runtime")?
		.block_on(hackernews_api::run(config).instrument(tracing::info_span!("runtime")))
		.wrap_err("failed to run server")
		.suggestion("set `JWT_SECRET` to a base64-encoded secret if none is configured")
}
