use {
	std::io,
	tokio::task,
	tokio_util::{sync::CancellationToken, task::TaskTracker},
	tracing::Instrument,
};

/// Owns the long-running background tasks of the process.
///
/// Every task spawned through the manager receives a child of the manager's
/// [`CancellationToken`], which is cancelled by [`TaskManager::shutdown()`].
#[derive(Debug, Default, Clone)]
pub struct TaskManager
{
	tasks: TaskTracker,
	cancellation_token: CancellationToken,
}

impl TaskManager
{
	/// Returns a token that is cancelled once the manager shuts down.
	pub fn cancellation_token(&self) -> CancellationToken
	{
		self.cancellation_token.child_token()
	}

	/// Spawns a task built by `make_task` inside the given `span`.
	///
	/// Fails if the manager is already shutting down.
	pub fn spawn<F>(
		&self,
		span: tracing::Span,
		make_task: impl FnOnce(CancellationToken) -> F,
	) -> io::Result<task::JoinHandle<F::Output>>
	where
		F: IntoFuture,
		F::Output: Send + 'static,
		F::IntoFuture: Send + 'static,
	{
		if self.tasks.is_closed() {
			return Err(io::Error::other("task tracker has been closed"));
		}

		let current_span = tracing::Span::current();

		if !current_span.is_disabled() {
			span.follows_from(current_span);
		}

		let task = make_task(self.cancellation_token.child_token())
			.into_future()
			.instrument(span);

		Ok(self.tasks.spawn(task))
	}

	/// Cancels all tasks and waits for them to exit.
	#[tracing::instrument(level = "debug")]
	pub async fn shutdown(self)
	{
		self.tasks.close();
		trace!("closed task tracker");

		self.cancellation_token.cancel();
		trace!("cancelled tasks");

		self.tasks.wait().await;
		trace!("all tasks have exited");
	}
}
