//! Live updates for new links and votes.
//!
//! Every [`EventCategory`] is served by its own broadcaster task, which is the
//! only place its subscriber registry is ever touched. Request handlers talk to
//! the broadcasters through an [`EventHub`]:
//!
//! - mutations call [`EventHub::publish()`] after they committed, which never
//!   waits; if the broadcaster is busy the event is simply dropped
//! - subscription endpoints call [`EventHub::subscribe()`] with a cancellation
//!   token tied to the client's connection and read from the returned
//!   [`Subscription`] until it ends
//!
//! Delivery is best-effort. Each event is handed to every subscriber
//! concurrently, and a subscriber that does not accept it within
//! [`Config::delivery_timeout`] misses it but stays registered. Subscribers are
//! unregistered as soon as their token is cancelled or they are dropped.

pub use self::{
	config::Config,
	id::{EventId, SubscriberId},
	subscriber::Subscription,
};
use {
	self::broadcaster::{Broadcaster, BroadcasterHandle},
	crate::{TaskManager, links::Link, votes::Vote},
	derive_more::{Display, Error},
	serde::Serialize,
	std::{fmt, io, sync::Arc},
	tokio_util::sync::CancellationToken,
};

mod broadcaster;
mod config;
mod id;
mod subscriber;

#[cfg(test)]
mod tests;

/// The independent notification streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory
{
	LinkCreated,
	VoteCast,
}

/// Something that happened, as seen by subscribers.
#[derive(Debug, Clone, Serialize)]
pub struct Event
{
	id: EventId,

	#[serde(flatten)]
	payload: EventPayload,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EventPayload
{
	LinkCreated
	{
		link: Arc<Link>
	},

	VoteCast
	{
		vote: Arc<Vote>
	},
}

/// Returned by [`EventHub::subscribe()`] if the broadcaster did not accept the
/// registration in time.
#[derive(Debug, Display, Error)]
#[display("subscription unavailable")]
pub struct SubscriptionUnavailable;

/// Entry point to the broadcasters.
#[derive(Debug, Clone)]
pub struct EventHub
{
	links: BroadcasterHandle,
	votes: BroadcasterHandle,
}

impl EventCategory
{
	pub const fn as_str(self) -> &'static str
	{
		match self {
			Self::LinkCreated => "link-created",
			Self::VoteCast => "vote-cast",
		}
	}
}

impl fmt::Display for EventCategory
{
	fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		fmt.write_str(self.as_str())
	}
}

impl Event
{
	/// Creates an event with a random ID.
	pub fn new(payload: EventPayload) -> Self
	{
		Self::with_id(EventId::random(), payload)
	}

	pub fn with_id(id: EventId, payload: EventPayload) -> Self
	{
		Self { id, payload }
	}

	pub fn link_created(link: impl Into<Arc<Link>>) -> Self
	{
		Self::new(EventPayload::LinkCreated { link: link.into() })
	}

	pub fn vote_cast(vote: impl Into<Arc<Vote>>) -> Self
	{
		Self::new(EventPayload::VoteCast { vote: vote.into() })
	}

	pub fn id(&self) -> &EventId
	{
		&self.id
	}

	pub fn payload(&self) -> &EventPayload
	{
		&self.payload
	}

	pub fn category(&self) -> EventCategory
	{
		match self.payload {
			EventPayload::LinkCreated { .. } => EventCategory::LinkCreated,
			EventPayload::VoteCast { .. } => EventCategory::VoteCast,
		}
	}
}

impl EventHub
{
	/// Spawns one broadcaster per [`EventCategory`] on `task_manager`.
	///
	/// The broadcasters exit when the task manager shuts down.
	pub fn spawn(config: &Config, task_manager: &TaskManager) -> io::Result<Self>
	{
		let links = Broadcaster::new(EventCategory::LinkCreated, *config);
		let votes = Broadcaster::new(EventCategory::VoteCast, *config);
		let hub = Self { links: links.handle(), votes: votes.handle() };

		for broadcaster in [links, votes] {
			let span = info_span!("broadcaster", category = %broadcaster.category());
			task_manager.spawn(span, |cancellation_token| broadcaster.run(cancellation_token))?;
		}

		Ok(hub)
	}

	fn broadcaster(&self, category: EventCategory) -> &BroadcasterHandle
	{
		match category {
			EventCategory::LinkCreated => &self.links,
			EventCategory::VoteCast => &self.votes,
		}
	}

	/// Hands `event` to its category's broadcaster without waiting.
	///
	/// Returns whether the event was accepted. Callers should not treat a
	/// rejected event as a failure.
	pub fn publish(&self, event: Event) -> bool
	{
		let category = event.category();
		let event = Arc::new(event);
		let accepted = self.broadcaster(category).publish(Arc::clone(&event));

		if accepted {
			debug!(%category, event.id = %event.id(), "published event");
		} else {
			warn!(%category, event.id = %event.id(), "broadcaster is busy; dropping event");
		}

		accepted
	}

	/// Registers a new subscriber for `category`.
	///
	/// The subscription ends once `cancellation_token` is cancelled.
	pub async fn subscribe(
		&self,
		category: EventCategory,
		cancellation_token: CancellationToken,
	) -> Result<Subscription, SubscriptionUnavailable>
	{
		self.broadcaster(category).register(cancellation_token).await
	}

	/// The number of currently registered subscribers for `category`.
	///
	/// Returns `None` if the broadcaster has shut down.
	pub async fn subscriber_count(&self, category: EventCategory) -> Option<usize>
	{
		self.broadcaster(category).subscriber_count().await
	}
}
