use {
	serde::Deserialize,
	std::path::{Path, PathBuf},
	tracing_subscriber::EnvFilter,
};

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct TracingConfig
{
	pub enable: bool,

	/// Default filter directives, used when `RUST_LOG` is not set.
	#[serde(default = "default_filter")]
	pub filter: String,

	pub stderr: StderrConfig,
	pub files: FilesConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct StderrConfig
{
	pub enable: bool,
	pub ansi: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct FilesConfig
{
	pub enable: bool,

	#[serde(default = "default_files_directory")]
	pub directory: Box<Path>,
}

impl TracingConfig
{
	pub fn env_filter(&self) -> EnvFilter
	{
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.filter))
	}
}

impl Default for TracingConfig
{
	fn default() -> Self
	{
		Self {
			enable: true,
			filter: default_filter(),
			stderr: StderrConfig::default(),
			files: FilesConfig::default(),
		}
	}
}

impl Default for StderrConfig
{
	fn default() -> Self
	{
		Self { enable: true, ansi: true }
	}
}

impl Default for FilesConfig
{
	fn default() -> Self
	{
		Self { enable: false, directory: default_files_directory() }
	}
}

fn default_filter() -> String
{
	String::from("hackernews_api=debug,tower_http=debug,sqlx=warn,warn")
}

fn default_files_directory() -> Box<Path>
{
	PathBuf::from("logs").into_boxed_path()
}
