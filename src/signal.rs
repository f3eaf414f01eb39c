use {std::error::Error, tokio::signal::ctrl_c};

/// Resolves once the OS asks the process to shut down.
pub(crate) async fn shutdown()
{
	tokio::select! {
		ctrl_c_result = ctrl_c() => match ctrl_c_result {
			Ok(()) => debug!("received SIGINT"),
			Err(err) => {
				error!(error = &err as &dyn Error, "failed listening for SIGINT");
			},
		},

		() = terminate() => {},
	}
}

#[cfg(unix)]
async fn terminate()
{
	use tokio::signal::unix::{SignalKind, signal};

	match signal(SignalKind::terminate()) {
		Ok(mut signal) => match signal.recv().await {
			Some(()) => debug!("received SIGTERM"),
			None => {
				warn!("cannot receive more SIGTERM signals");
				std::future::pending().await
			},
		},
		Err(err) => {
			error!(error = &err as &dyn Error, "failed listening for SIGTERM");
			std::future::pending().await
		},
	}
}

#[cfg(not(unix))]
async fn terminate()
{
	std::future::pending().await
}
