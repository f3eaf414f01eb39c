//! Runtime configuration.
//!
//! The configuration is read from a TOML file. Every field has a default, so
//! an empty file (or no file at all) yields a working development setup.

mod auth;
mod database;
mod http;
mod runtime;
mod tracing;

use {
	crate::events,
	color_eyre::{
		Section,
		eyre::{self, WrapErr},
	},
	serde::{Deserialize, Deserializer},
	std::{env, fs, io, path::Path, time::Duration},
};

pub use self::{
	auth::AuthConfig,
	database::DatabaseConfig,
	http::{CorsConfig, HttpConfig},
	runtime::RuntimeConfig,
	tracing::{FilesConfig, StderrConfig, TracingConfig},
};

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config
{
	pub runtime: RuntimeConfig,
	pub tracing: TracingConfig,
	pub database: DatabaseConfig,
	pub http: HttpConfig,
	pub auth: AuthConfig,
	pub events: events::Config,
}

impl Config
{
	/// Reads and parses the configuration file at `path`.
	///
	/// A missing file is not an error; the defaults are used instead.
	pub fn load_from_file(path: impl AsRef<Path>) -> eyre::Result<Self>
	{
		let file = match fs::read_to_string(path.as_ref()) {
			Ok(file) => file,
			Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
			Err(err) => {
				return Err(err)
					.wrap_err_with(|| {
						format!("failed to read configuration file at {:?}", path.as_ref())
					})
					.suggestion("check the file's permissions or run with `--config`");
			},
		};

		Self::parse(&file)
	}

	/// Parses a configuration from TOML.
	pub fn parse(toml: &str) -> eyre::Result<Self>
	{
		toml::from_str(toml).wrap_err("failed to parse configuration file")
	}

	/// Applies `DATABASE_URL` and `JWT_SECRET` from the environment.
	pub fn apply_env_overrides(&mut self)
	{
		if let Ok(url) = env::var("DATABASE_URL") {
			self.database.url = url;
		}

		if let Ok(secret) = env::var("JWT_SECRET") {
			self.auth.jwt_secret = secret;
		}
	}
}

/// Deserializes a [`Duration`] given in (fractional) seconds.
pub(crate) fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
	D: Deserializer<'de>,
{
	f64::deserialize(deserializer).map(Duration::from_secs_f64)
}
