//! Tracing setup.
//!
//! Logs go to stderr and, optionally, to daily-rotated files. Both outputs
//! share the filter from [`TracingConfig::env_filter()`].

use {
	crate::config::{FilesConfig, StderrConfig, TracingConfig},
	std::{fs, io},
	tracing_appender::{non_blocking::WorkerGuard, rolling::Rotation},
	tracing_subscriber::{
		Layer,
		fmt::format::FmtSpan,
		layer::SubscriberExt,
		registry::LookupSpan,
		util::SubscriberInitExt,
	},
};

/// Installs the global subscriber.
///
/// The returned guard must be kept alive for as long as file logging should
/// keep working.
pub fn init(config: &TracingConfig) -> io::Result<Option<WorkerGuard>>
{
	if !config.enable {
		return Ok(None);
	}

	let (layer, guard) = layer(config)?;

	tracing_subscriber::registry()
		.with(layer)
		.try_init()
		.map_err(io::Error::other)?;

	info!("initialized tracing");

	Ok(guard)
}

/// Builds the stderr and file layers behind the configured filter.
fn layer<S>(config: &TracingConfig) -> io::Result<(impl Layer<S>, Option<WorkerGuard>)>
where
	S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
	let stderr = stderr_layer(&config.stderr);
	let (files, guard) = files_layer(&config.files)?.unzip();
	let layer = Layer::and_then(stderr, files).with_filter(config.env_filter());

	Ok((layer, guard))
}

fn stderr_layer<S>(config: &StderrConfig) -> Option<impl Layer<S>>
where
	S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
	if !config.enable {
		return None;
	}

	let layer = tracing_subscriber::fmt::layer()
		.pretty()
		.with_ansi(config.ansi)
		.with_file(true)
		.with_level(true)
		.with_line_number(true)
		.with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
		.with_target(true)
		.with_thread_names(true)
		.with_writer(io::stderr);

	Some(layer)
}

fn files_layer<S>(config: &FilesConfig) -> io::Result<Option<(impl Layer<S>, WorkerGuard)>>
where
	S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
	if !config.enable {
		return Ok(None);
	}

	if !config.directory.exists() {
		fs::create_dir_all(&config.directory)?;
	}

	let log_dir = config.directory.canonicalize()?;
	let (writer, guard) = tracing_appender::rolling::Builder::new()
		.rotation(Rotation::DAILY)
		.filename_prefix("hackernews-api")
		.filename_suffix("log")
		.build(&log_dir)
		.map(tracing_appender::non_blocking)
		.map_err(io::Error::other)?;

	let layer = tracing_subscriber::fmt::layer()
		.with_ansi(false)
		.with_file(true)
		.with_level(true)
		.with_line_number(true)
		.with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
		.with_target(true)
		.with_thread_names(true)
		.with_writer(writer);

	Ok(Some((layer, guard)))
}

#[cfg(test)]
mod tests
{
	use {super::*, std::env};

	#[test]
	fn layers_compose_with_files_enabled() -> color_eyre::Result<()>
	{
		let directory = env::temp_dir().join(format!("hackernews-api-logs-{}", std::process::id()));
		let config = TracingConfig {
			stderr: StderrConfig { enable: true, ansi: false },
			files: FilesConfig { enable: true, directory: directory.clone().into_boxed_path() },
			..TracingConfig::default()
		};

		let (layer, guard) = layer(&config)?;
		let subscriber = tracing_subscriber::registry().with(layer);

		tracing::subscriber::with_default(subscriber, || info!("hello from a test"));

		assert!(guard.is_some());
		drop(guard);
		assert!(fs::read_dir(&directory)?.next().is_some());
		fs::remove_dir_all(&directory)?;

		Ok(())
	}

	#[test]
	fn stderr_only() -> color_eyre::Result<()>
	{
		let (layer, guard) = layer(&TracingConfig::default())?;
		let subscriber = tracing_subscriber::registry().with(layer);

		tracing::subscriber::with_default(subscriber, || info!("hello from a test"));
		assert!(guard.is_none());

		Ok(())
	}
}
