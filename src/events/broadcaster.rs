use {
	super::{
		Config,
		Event,
		EventCategory,
		SubscriberId,
		Subscription,
		SubscriptionUnavailable,
		subscriber::{Delivery, Subscriber},
	},
	std::{
		collections::hash_map::{self, HashMap},
		error::Error,
		fmt,
		sync::Arc,
		time::Duration,
	},
	tokio::{
		sync::{mpsc, oneshot},
		task::{JoinError, JoinSet},
	},
	tokio_util::sync::CancellationToken,
};

/// Owns the subscriber registry of a single [`EventCategory`].
///
/// All registry mutations happen inside [`Broadcaster::run()`], one message at
/// a time. Everybody else talks to it through a [`BroadcasterHandle`].
pub(super) struct Broadcaster
{
	category: EventCategory,
	config: Config,
	subscribers: HashMap<SubscriberId, Subscriber>,

	/// Delivery and watcher tasks.
	tasks: JoinSet<()>,

	messages_tx: mpsc::Sender<Message>,
	messages_rx: mpsc::Receiver<Message>,
}

#[derive(Debug, Clone)]
pub(super) struct BroadcasterHandle
{
	category: EventCategory,
	config: Config,
	messages_tx: mpsc::WeakSender<Message>,
}

#[derive(Debug)]
enum Message
{
	Register
	{
		subscriber: Subscriber,

		/// The ID assigned to the subscriber
		response_tx: oneshot::Sender<SubscriberId>,
	},

	Unregister
	{
		id: SubscriberId
	},

	Publish
	{
		event: Arc<Event>
	},

	CountSubscribers
	{
		response_tx: oneshot::Sender<usize>
	},
}

impl Broadcaster
{
	pub(super) fn new(category: EventCategory, config: Config) -> Self
	{
		let (messages_tx, messages_rx) = mpsc::channel(config.queue_size.get());

		Self {
			category,
			config,
			subscribers: HashMap::default(),
			tasks: JoinSet::default(),
			messages_tx,
			messages_rx,
		}
	}

	pub(super) fn category(&self) -> EventCategory
	{
		self.category
	}

	pub(super) fn handle(&self) -> BroadcasterHandle
	{
		BroadcasterHandle {
			category: self.category,
			config: self.config,
			messages_tx: self.messages_tx.downgrade(),
		}
	}

	pub(super) async fn run(mut self, cancellation_token: CancellationToken)
	{
		debug!("broadcaster started");

		loop {
			tokio::select! {
				() = cancellation_token.cancelled() => {
					info!(subscribers = self.subscribers.len(), "broadcaster shutting down");
					break;
				},

				Some(join_result) = self.tasks.join_next() => {
					self.on_task_complete(join_result);
				},

				Some(message) = self.messages_rx.recv() => {
					self.on_message(message);
				},
			};
		}
	}

	fn on_task_complete(&mut self, join_result: Result<(), JoinError>)
	{
		if let Err(err) = join_result {
			error!(error = &err as &dyn Error, "broadcaster task failed");
		}
	}

	fn on_message(&mut self, message: Message)
	{
		match message {
			Message::Register { subscriber, response_tx } => {
				let _ = response_tx.send(self.register(subscriber));
			},
			Message::Unregister { id } => {
				self.unregister(&id);
			},
			Message::Publish { event } => {
				self.publish(event);
			},
			Message::CountSubscribers { response_tx } => {
				let _ = response_tx.send(self.subscribers.len());
			},
		}
	}

	#[tracing::instrument(level = "debug", skip_all, ret(level = "debug"))]
	fn register(&mut self, subscriber: Subscriber) -> SubscriberId
	{
		if subscriber.is_gone() {
			debug!("subscriber is already gone; not registering");
			return SubscriberId::random();
		}

		let id = loop {
			match self.subscribers.entry(SubscriberId::random()) {
				hash_map::Entry::Occupied(entry) => {
					warn!(id = %entry.key(), "generated duplicate subscriber id");
				},
				hash_map::Entry::Vacant(entry) => {
					let id = entry.key().clone();
					entry.insert(subscriber.clone());
					break id;
				},
			}
		};

		let messages_tx = self.messages_tx.clone();
		let watched_id = id.clone();

		self.tasks.spawn(async move {
			subscriber.gone().await;
			let _ = messages_tx.send(Message::Unregister { id: watched_id }).await;
		});

		id
	}

	#[tracing::instrument(level = "debug", skip(self))]
	fn unregister(&mut self, id: &SubscriberId)
	{
		if self.subscribers.remove(id).is_some() {
			debug!(remaining = self.subscribers.len(), "unregistered subscriber");
		}
	}

	#[tracing::instrument(level = "debug", skip_all, fields(event.id = %event.id()))]
	fn publish(&mut self, event: Arc<Event>)
	{
		let timeout = self.config.delivery_timeout;

		for (id, subscriber) in &self.subscribers {
			let id = id.clone();
			let subscriber = subscriber.clone();
			let event = Arc::clone(&event);
			let messages_tx = self.messages_tx.clone();

			self.tasks.spawn(deliver(id, subscriber, event, timeout, messages_tx));
		}

		trace!(subscribers = self.subscribers.len(), "fanned out event");
	}
}

async fn deliver(
	id: SubscriberId,
	subscriber: Subscriber,
	event: Arc<Event>,
	timeout: Duration,
	messages_tx: mpsc::Sender<Message>,
)
{
	match subscriber.deliver(event, timeout).await {
		Delivery::Delivered => {},
		Delivery::Cancelled => {
			let _ = messages_tx.send(Message::Unregister { id }).await;
		},
		Delivery::TimedOut => {
			debug!(subscriber.id = %id, ?timeout, "dropped event for slow subscriber");
		},
	}
}

#[expect(clippy::missing_fields_in_debug)]
impl fmt::Debug for Broadcaster
{
	fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		fmt.debug_struct("Broadcaster")
			.field("category", &self.category)
			.field("config", &self.config)
			.field("subscribers", &self.subscribers.len())
			.field("tasks", &self.tasks.len())
			.field("handles", &self.messages_tx.weak_count())
			.finish()
	}
}

impl BroadcasterHandle
{
	/// Offers `event` to the broadcaster without waiting.
	///
	/// Returns whether the broadcaster accepted it.
	pub(super) fn publish(&self, event: Arc<Event>) -> bool
	{
		self.messages_tx
			.upgrade()
			.is_some_and(|tx| tx.try_send(Message::Publish { event }).is_ok())
	}

	#[tracing::instrument(level = "debug", skip_all, fields(category = %self.category), err(level = "debug"))]
	pub(super) async fn register(
		&self,
		cancellation_token: CancellationToken,
	) -> Result<Subscription, SubscriptionUnavailable>
	{
		let tx = self.messages_tx.upgrade().ok_or(SubscriptionUnavailable)?;
		let (subscriber, rx) =
			Subscriber::new(self.config.subscriber_buffer_size, cancellation_token.clone());
		let (response_tx, response_rx) = oneshot::channel();

		let registration = async move {
			tx.send(Message::Register { subscriber, response_tx }).await.ok()?;
			response_rx.await.ok()
		};

		let id = tokio::time::timeout(self.config.register_timeout, registration)
			.await
			.ok()
			.flatten()
			.ok_or(SubscriptionUnavailable)?;

		Ok(Subscription::new(id, self.category, rx, cancellation_token))
	}

	pub(super) async fn subscriber_count(&self) -> Option<usize>
	{
		let tx = self.messages_tx.upgrade()?;
		let (response_tx, response_rx) = oneshot::channel();

		tx.send(Message::CountSubscribers { response_tx }).await.ok()?;
		response_rx.await.ok()
	}
}
