use {
	serde::{Deserialize, Deserializer},
	std::{num::NonZero, time::Duration},
};

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config
{
	/// How long a single delivery may take before it is dropped.
	#[serde(default = "default_timeout", deserialize_with = "deserialize_duration")]
	pub delivery_timeout: Duration,

	/// How long [`subscribe()`] waits for the broadcaster to acknowledge a
	/// registration.
	///
	/// [`subscribe()`]: super::EventHub::subscribe
	#[serde(default = "default_timeout", deserialize_with = "deserialize_duration")]
	pub register_timeout: Duration,

	/// Capacity of each broadcaster's inbox.
	#[serde(default = "default_queue_size")]
	pub queue_size: NonZero<usize>,

	/// Capacity of each subscriber's delivery sink.
	#[serde(default = "default_subscriber_buffer_size")]
	pub subscriber_buffer_size: NonZero<usize>,
}

impl Default for Config
{
	fn default() -> Self
	{
		Self {
			delivery_timeout: default_timeout(),
			register_timeout: default_timeout(),
			queue_size: default_queue_size(),
			subscriber_buffer_size: default_subscriber_buffer_size(),
		}
	}
}

fn default_timeout() -> Duration
{
	Duration::from_secs(1)
}

fn default_queue_size() -> NonZero<usize>
{
	const { NonZero::new(64).unwrap() }
}

fn default_subscriber_buffer_size() -> NonZero<usize>
{
	NonZero::<usize>::MIN
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
	D: Deserializer<'de>,
{
	f64::deserialize(deserializer).map(Duration::from_secs_f64)
}
