use std::{net::IpAddr, path::Path};

pub(crate) fn args() -> Args
{
	<Args as clap::Parser>::parse()
}

/// A link aggregator backend.
#[derive(Debug, clap::Parser)]
#[command(version)]
pub(crate) struct Args
{
	/// Path to the configuration file
	#[arg(long = "config", env = "HACKERNEWS_API_CONFIG", default_value = "hackernews-api.toml")]
	pub config_path: Box<Path>,

	/// Path to a `.env` file to load before reading the configuration
	#[arg(long)]
	pub env_file: Option<Box<Path>>,

	/// The IP address the server should listen on
	#[arg(long = "ip")]
	pub ip_addr: Option<IpAddr>,

	/// The port the server should listen on
	#[arg(long)]
	pub port: Option<u16>,
}
