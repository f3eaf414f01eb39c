use {
	super::{Event, EventCategory, SubscriberId},
	futures_util::{Stream, stream},
	std::{num::NonZero, sync::Arc, time::Duration},
	tokio::sync::mpsc,
	tokio_util::sync::CancellationToken,
};

/// The broadcaster's end of a subscription.
#[derive(Debug, Clone)]
pub(super) struct Subscriber
{
	tx: mpsc::Sender<Arc<Event>>,
	cancellation_token: CancellationToken,
}

/// Outcome of a single delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Delivery
{
	Delivered,
	Cancelled,
	TimedOut,
}

/// A live subscription to one [`EventCategory`].
///
/// Yields events until the cancellation token passed to
/// [`EventHub::subscribe()`] fires. Dropping the subscription unregisters it.
///
/// [`EventHub::subscribe()`]: super::EventHub::subscribe
#[derive(Debug)]
pub struct Subscription
{
	id: SubscriberId,
	category: EventCategory,
	rx: mpsc::Receiver<Arc<Event>>,
	cancellation_token: CancellationToken,
}

impl Subscriber
{
	pub(super) fn new(
		buffer_size: NonZero<usize>,
		cancellation_token: CancellationToken,
	) -> (Self, mpsc::Receiver<Arc<Event>>)
	{
		let (tx, rx) = mpsc::channel(buffer_size.get());

		(Self { tx, cancellation_token }, rx)
	}

	/// Whether the subscriber was cancelled or dropped its receiving end.
	pub(super) fn is_gone(&self) -> bool
	{
		self.cancellation_token.is_cancelled() || self.tx.is_closed()
	}

	/// Resolves once [`is_gone()`](Self::is_gone) would return `true`.
	pub(super) async fn gone(&self)
	{
		tokio::select! {
			() = self.cancellation_token.cancelled() => {},
			() = self.tx.closed() => {},
		}
	}

	/// Attempts to hand `event` to the subscriber, giving up after `timeout`.
	pub(super) async fn deliver(&self, event: Arc<Event>, timeout: Duration) -> Delivery
	{
		if self.is_gone() {
			return Delivery::Cancelled;
		}

		tokio::select! {
			biased;

			() = self.cancellation_token.cancelled() => Delivery::Cancelled,

			send_result = self.tx.send(event) => match send_result {
				Ok(()) => Delivery::Delivered,
				Err(_) => Delivery::Cancelled,
			},

			() = tokio::time::sleep(timeout) => Delivery::TimedOut,
		}
	}
}

impl Subscription
{
	pub(super) fn new(
		id: SubscriberId,
		category: EventCategory,
		rx: mpsc::Receiver<Arc<Event>>,
		cancellation_token: CancellationToken,
	) -> Self
	{
		Self { id, category, rx, cancellation_token }
	}

	pub fn id(&self) -> &SubscriberId
	{
		&self.id
	}

	pub fn category(&self) -> EventCategory
	{
		self.category
	}

	/// Waits for the next event.
	///
	/// Returns `None` once the subscription has been cancelled or the
	/// broadcaster has shut down. Events still buffered at the time of
	/// cancellation are discarded.
	pub async fn recv(&mut self) -> Option<Arc<Event>>
	{
		tokio::select! {
			biased;

			() = self.cancellation_token.cancelled() => None,
			event = self.rx.recv() => event,
		}
	}

	pub fn into_stream(self) -> impl Stream<Item = Arc<Event>> + Send + 'static
	{
		stream::unfold(self, |mut subscription| async move {
			let event = subscription.recv().await?;
			Some((event, subscription))
		})
	}
}
