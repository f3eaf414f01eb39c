use {
	super::deserialize_duration,
	serde::{Deserialize, Deserializer, de},
	std::{
		fmt,
		net::{IpAddr, Ipv4Addr, SocketAddr},
		time::Duration,
	},
};

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct HttpConfig
{
	#[serde(default = "default_ip_addr")]
	pub ip_addr: IpAddr,

	#[serde(default = "default_port")]
	pub port: u16,

	/// How long to wait for background tasks after the server stopped
	/// accepting connections.
	#[serde(default = "default_shutdown_timeout", deserialize_with = "deserialize_duration")]
	pub shutdown_timeout: Duration,

	/// Interval between SSE keep-alive comments on live subscriptions.
	#[serde(default = "default_keep_alive_interval", deserialize_with = "deserialize_duration")]
	pub keep_alive_interval: Duration,

	pub cors: CorsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct CorsConfig
{
	#[serde(default = "default_allowed_origins", deserialize_with = "deserialize_allowed_origins")]
	pub allowed_origins: Box<[http::HeaderValue]>,
}

impl HttpConfig
{
	pub fn socket_addr(&self) -> SocketAddr
	{
		SocketAddr::new(self.ip_addr, self.port)
	}
}

impl Default for HttpConfig
{
	fn default() -> Self
	{
		Self {
			ip_addr: default_ip_addr(),
			port: default_port(),
			shutdown_timeout: default_shutdown_timeout(),
			keep_alive_interval: default_keep_alive_interval(),
			cors: CorsConfig::default(),
		}
	}
}

impl CorsConfig
{
	pub fn allowed_origins(&self) -> impl Iterator<Item = http::HeaderValue>
	{
		self.allowed_origins.iter().cloned()
	}
}

impl Default for CorsConfig
{
	fn default() -> Self
	{
		Self { allowed_origins: default_allowed_origins() }
	}
}

fn default_ip_addr() -> IpAddr
{
	IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16
{
	8081
}

fn default_shutdown_timeout() -> Duration
{
	Duration::from_secs(10)
}

fn default_keep_alive_interval() -> Duration
{
	Duration::from_secs(15)
}

fn default_allowed_origins() -> Box<[http::HeaderValue]>
{
	Box::from([http::HeaderValue::from_static("http://localhost:3000")])
}

fn deserialize_allowed_origins<'de, D>(
	deserializer: D,
) -> Result<Box<[http::HeaderValue]>, D::Error>
where
	D: Deserializer<'de>,
{
	struct HeaderListVisitor;

	impl<'de> de::Visitor<'de> for HeaderListVisitor
	{
		type Value = Box<[http::HeaderValue]>;

		fn expecting(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result
		{
			fmt.write_str("a list of CORS origins")
		}

		fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
		where
			A: de::SeqAccess<'de>,
		{
			let size_hint = seq.size_hint().unwrap_or_default();
			let mut header_values = Vec::with_capacity(size_hint);

			while let Some(origin) = seq.next_element::<String>()? {
				match http::HeaderValue::from_str(origin.trim_end_matches('/')) {
					Ok(header_value) => header_values.push(header_value),
					Err(err) => {
						return Err(de::Error::custom(format_args!("invalid CORS origin: {err}")));
					},
				}
			}

			Ok(header_values.into_boxed_slice())
		}
	}

	deserializer.deserialize_seq(HeaderListVisitor)
}
