use {
	super::*,
	crate::{links::LinkId, users::UserId},
	color_eyre::eyre::eyre,
	std::{collections::HashSet, num::NonZero, time::Duration},
	time::OffsetDateTime,
	tokio::{task::JoinSet, time::Instant},
};

fn link(id: i64) -> Link
{
	Link {
		id: LinkId::new(id),
		description: format!("link #{id}"),
		url: format!("https://example.org/{id}"),
		posted_by: UserId::new(1),
		created_at: OffsetDateTime::UNIX_EPOCH,
	}
}

fn link_event(id: &str, link_id: i64) -> Event
{
	Event::with_id(EventId::from(id), EventPayload::LinkCreated { link: Arc::new(link(link_id)) })
}

fn link_id(event: &Event) -> Option<LinkId>
{
	match event.payload() {
		EventPayload::LinkCreated { link } => Some(link.id),
		EventPayload::VoteCast { .. } => None,
	}
}

async fn recv(subscription: &mut Subscription) -> color_eyre::Result<Arc<Event>>
{
	tokio::time::timeout(Duration::from_secs(1), subscription.recv())
		.await
		.map_err(|_| eyre!("no event within 1s"))?
		.ok_or_else(|| eyre!("subscription ended"))
}

async fn wait_for_subscribers(
	hub: &EventHub,
	category: EventCategory,
	expected: usize,
) -> color_eyre::Result<()>
{
	tokio::time::timeout(Duration::from_secs(5), async {
		while hub.subscriber_count(category).await != Some(expected) {
			tokio::time::sleep(Duration::from_millis(10)).await;
		}
	})
	.await
	.map_err(|_| eyre!("expected {expected} subscribers"))
}

#[tokio::test]
async fn publishing_without_subscribers_does_not_block() -> color_eyre::Result<()>
{
	let task_manager = TaskManager::default();
	let hub = EventHub::spawn(&Config::default(), &task_manager)?;
	let start = Instant::now();

	for n in 0..10 {
		hub.publish(link_event(&format!("e{n}"), n));
	}

	assert!(start.elapsed() < Duration::from_millis(100));
	assert_eq!(hub.subscriber_count(EventCategory::LinkCreated).await, Some(0));

	task_manager.shutdown().await;

	Ok(())
}

#[tokio::test]
async fn every_subscriber_receives_the_same_event() -> color_eyre::Result<()>
{
	let task_manager = TaskManager::default();
	let hub = EventHub::spawn(&Config::default(), &task_manager)?;
	let mut subscriptions = Vec::new();

	for _ in 0..5 {
		subscriptions.push(
			hub.subscribe(EventCategory::LinkCreated, CancellationToken::new())
				.await?,
		);
	}

	assert!(hub.publish(link_event("e1", 1)));

	let mut received = Vec::new();

	for subscription in &mut subscriptions {
		received.push(recv(subscription).await?);
	}

	assert_eq!(received.len(), 5);
	assert!(received.iter().all(|event| Arc::ptr_eq(event, &received[0])));
	assert_eq!(received[0].id().as_str(), "e1");

	task_manager.shutdown().await;

	Ok(())
}

#[tokio::test]
async fn categories_are_independent() -> color_eyre::Result<()>
{
	let task_manager = TaskManager::default();
	let hub = EventHub::spawn(&Config::default(), &task_manager)?;
	let mut votes = hub.subscribe(EventCategory::VoteCast, CancellationToken::new()).await?;

	hub.publish(link_event("e1", 1));

	let next = tokio::time::timeout(Duration::from_millis(200), votes.recv()).await;
	assert!(next.is_err(), "vote subscriber received a link event");

	task_manager.shutdown().await;

	Ok(())
}

#[tokio::test]
async fn concurrent_registrations_keep_only_live_subscribers() -> color_eyre::Result<()>
{
	let task_manager = TaskManager::default();
	let hub = EventHub::spawn(&Config::default(), &task_manager)?;
	let mut tasks = JoinSet::new();

	for n in 0..48_usize {
		let hub = hub.clone();

		tasks.spawn(async move {
			let token = CancellationToken::new();

			if n % 3 == 0 {
				token.cancel();
			}

			let subscription = hub.subscribe(EventCategory::LinkCreated, token.clone()).await;

			if n % 3 == 1 {
				token.cancel();
			}

			(n, subscription)
		});
	}

	let mut live = Vec::new();

	while let Some(join_result) = tasks.join_next().await {
		let (n, subscription) = join_result?;
		let subscription = subscription?;

		if n % 3 == 2 {
			live.push(subscription);
		}
	}

	wait_for_subscribers(&hub, EventCategory::LinkCreated, 16).await?;

	let ids = live.iter().map(|subscription| subscription.id()).collect::<HashSet<_>>();
	assert_eq!(ids.len(), live.len());

	task_manager.shutdown().await;

	Ok(())
}

#[tokio::test]
async fn cancelled_subscribers_receive_nothing_and_are_removed() -> color_eyre::Result<()>
{
	let task_manager = TaskManager::default();
	let hub = EventHub::spawn(&Config::default(), &task_manager)?;
	let token = CancellationToken::new();
	let mut subscription = hub.subscribe(EventCategory::LinkCreated, token.clone()).await?;

	wait_for_subscribers(&hub, EventCategory::LinkCreated, 1).await?;

	token.cancel();
	hub.publish(link_event("e1", 1));

	assert!(subscription.recv().await.is_none());
	wait_for_subscribers(&hub, EventCategory::LinkCreated, 0).await?;

	task_manager.shutdown().await;

	Ok(())
}

#[tokio::test]
async fn dropped_subscriptions_are_removed() -> color_eyre::Result<()>
{
	let task_manager = TaskManager::default();
	let hub = EventHub::spawn(&Config::default(), &task_manager)?;
	let subscription = hub.subscribe(EventCategory::VoteCast, CancellationToken::new()).await?;

	wait_for_subscribers(&hub, EventCategory::VoteCast, 1).await?;
	drop(subscription);
	wait_for_subscribers(&hub, EventCategory::VoteCast, 0).await?;

	task_manager.shutdown().await;

	Ok(())
}

#[tokio::test]
async fn stalled_subscribers_do_not_hold_up_others() -> color_eyre::Result<()>
{
	let config = Config {
		delivery_timeout: Duration::from_secs(2),
		subscriber_buffer_size: NonZero::<usize>::MIN,
		..Config::default()
	};
	let task_manager = TaskManager::default();
	let hub = EventHub::spawn(&config, &task_manager)?;
	let mut stalled = hub.subscribe(EventCategory::LinkCreated, CancellationToken::new()).await?;
	let mut active = hub.subscribe(EventCategory::LinkCreated, CancellationToken::new()).await?;

	// fills the stalled subscriber's buffer
	hub.publish(link_event("e1", 1));
	assert_eq!(recv(&mut active).await?.id().as_str(), "e1");

	let start = Instant::now();
	assert!(hub.publish(link_event("e2", 2)));
	assert!(start.elapsed() < Duration::from_millis(100), "publishing blocked");

	assert_eq!(recv(&mut active).await?.id().as_str(), "e2");
	assert!(start.elapsed() < config.delivery_timeout, "delivery was serialized");

	tokio::time::sleep(config.delivery_timeout + Duration::from_millis(500)).await;
	assert_eq!(hub.subscriber_count(EventCategory::LinkCreated).await, Some(2));

	// `e2` was given up on, so draining the buffer yields only `e1`
	assert_eq!(recv(&mut stalled).await?.id().as_str(), "e1");

	let next = tokio::time::timeout(Duration::from_millis(300), stalled.recv()).await;
	assert!(next.is_err(), "stalled subscriber received an event after its delivery timed out");

	// later events reach it again
	hub.publish(link_event("e3", 3));
	assert_eq!(recv(&mut stalled).await?.id().as_str(), "e3");

	task_manager.shutdown().await;

	Ok(())
}

#[tokio::test]
async fn cancelling_during_a_blocked_delivery_unregisters() -> color_eyre::Result<()>
{
	let config = Config {
		delivery_timeout: Duration::from_secs(30),
		subscriber_buffer_size: NonZero::<usize>::MIN,
		..Config::default()
	};
	let task_manager = TaskManager::default();
	let hub = EventHub::spawn(&config, &task_manager)?;
	let token = CancellationToken::new();
	let mut subscription = hub.subscribe(EventCategory::LinkCreated, token.clone()).await?;

	hub.publish(link_event("e1", 1));
	hub.publish(link_event("e2", 2));

	// give the second delivery time to block on the full buffer
	tokio::time::sleep(Duration::from_millis(100)).await;
	assert_eq!(hub.subscriber_count(EventCategory::LinkCreated).await, Some(1));

	let start = Instant::now();
	token.cancel();

	wait_for_subscribers(&hub, EventCategory::LinkCreated, 0).await?;
	assert!(start.elapsed() < Duration::from_secs(5));
	assert!(subscription.recv().await.is_none());

	// the registry keeps working afterwards
	let mut next = hub.subscribe(EventCategory::LinkCreated, CancellationToken::new()).await?;
	hub.publish(link_event("e3", 3));
	assert_eq!(recv(&mut next).await?.id().as_str(), "e3");

	task_manager.shutdown().await;

	Ok(())
}

#[test]
fn category_names()
{
	assert_eq!(EventCategory::LinkCreated.to_string(), "link-created");
	assert_eq!(EventCategory::VoteCast.to_string(), EventCategory::VoteCast.as_str());
	assert_eq!(Event::link_created(link(1)).category(), EventCategory::LinkCreated);
}

#[tokio::test]
async fn link_feed_end_to_end() -> color_eyre::Result<()>
{
	let task_manager = TaskManager::default();
	let hub = EventHub::spawn(&Config::default(), &task_manager)?;
	let token_a = CancellationToken::new();
	let mut a = hub.subscribe(EventCategory::LinkCreated, token_a.clone()).await?;
	let mut b = hub.subscribe(EventCategory::LinkCreated, CancellationToken::new()).await?;

	hub.publish(link_event("e1", 7));

	for subscription in [&mut a, &mut b] {
		let event = recv(subscription).await?;
		assert_eq!(event.id().as_str(), "e1");
		assert_eq!(link_id(&event), Some(LinkId::new(7)));
	}

	token_a.cancel();
	hub.publish(link_event("e2", 8));

	let event = recv(&mut b).await?;
	assert_eq!(event.id().as_str(), "e2");
	assert_eq!(link_id(&event), Some(LinkId::new(8)));
	assert!(a.recv().await.is_none());

	task_manager.shutdown().await;

	Ok(())
}

#[tokio::test]
async fn subscribing_after_shutdown_fails() -> color_eyre::Result<()>
{
	let task_manager = TaskManager::default();
	let hub = EventHub::spawn(&Config::default(), &task_manager)?;
	let mut subscription = hub.subscribe(EventCategory::LinkCreated, CancellationToken::new()).await?;

	task_manager.shutdown().await;

	assert!(subscription.recv().await.is_none());
	assert!(
		hub.subscribe(EventCategory::LinkCreated, CancellationToken::new())
			.await
			.is_err()
	);
	assert!(!hub.publish(link_event("e1", 1)));
	assert_eq!(hub.subscriber_count(EventCategory::LinkCreated).await, None);

	Ok(())
}

#[test]
fn events_serialize_with_their_payload() -> color_eyre::Result<()>
{
	let json = serde_json::to_value(link_event("e1", 7))?;

	assert_eq!(json["id"], "e1");
	assert_eq!(json["link"]["id"], 7);
	assert_eq!(json["link"]["url"], "https://example.org/7");

	Ok(())
}
