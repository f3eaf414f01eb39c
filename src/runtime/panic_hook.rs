//! Global panic hook that logs panics.
//!
//! See [`std::panic::set_hook()`] for more details.

use std::{
	backtrace::{Backtrace, BacktraceStatus},
	panic,
};

/// Installs the custom global panic hook.
///
/// The previous hook is invoked after this one is done.
pub fn install()
{
	let old_hook = panic::take_hook();

	panic::set_hook(Box::new(move |info| {
		let location = info.location();
		let payload = info.payload_as_str();
		let backtrace = Backtrace::capture();

		error_span!(target: "hackernews_api::runtime", "panic_hook").in_scope(|| {
			if backtrace.status() == BacktraceStatus::Captured {
				error!(
					target: "hackernews_api::panics",
					?location,
					?payload,
					%backtrace,
					"thread panicked",
				);
			} else {
				error!(target: "hackernews_api::panics", ?location, ?payload, "thread panicked");
			}
		});

		old_hook(info)
	}));
}
