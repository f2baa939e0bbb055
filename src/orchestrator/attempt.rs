//! Per-call bookkeeping that guarantees a single settlement.

// crates.io
use tokio::sync::oneshot;
// self
use crate::{_prelude::*, auth::Authenticated, obs};

pub(crate) type Settlement = oneshot::Receiver<Result<Authenticated>>;

/// Shared state of one `authenticate` call.
///
/// Every check-and-set on `settled` happens under one lock, so concurrent completions can
/// never both commit an outcome.
#[derive(Debug)]
pub(crate) struct AuthAttempt {
	total: usize,
	state: Mutex<AttemptState>,
}
impl AuthAttempt {
	pub(crate) fn new(total: usize) -> (Arc<Self>, Settlement) {
		let (sender, receiver) = oneshot::channel();
		let attempt = Self {
			total,
			state: Mutex::new(AttemptState { failed: 0, settled: false, sender: Some(sender) }),
		};

		(Arc::new(attempt), receiver)
	}

	pub(crate) fn is_settled(&self) -> bool {
		self.state.lock().settled
	}

	/// Counts one provider or verification failure; the last one settles with
	/// [`Error::AllFailed`].
	pub(crate) fn fail(&self) {
		let mut state = self.state.lock();

		state.failed += 1;

		if state.failed == self.total && state.settle(Err(Error::AllFailed { providers: self.total }))
		{
			obs::attempt_exhausted(self.total);
		}
	}

	/// Offers a verified outcome; returns `false` when another outcome already won.
	pub(crate) fn succeed(&self, authenticated: Authenticated) -> bool {
		self.settle(Ok(authenticated))
	}

	pub(crate) fn settle(&self, outcome: Result<Authenticated>) -> bool {
		self.state.lock().settle(outcome)
	}

	#[cfg(test)]
	fn failed(&self) -> usize {
		self.state.lock().failed
	}
}

#[derive(Debug)]
struct AttemptState {
	failed: usize,
	settled: bool,
	sender: Option<oneshot::Sender<Result<Authenticated>>>,
}
impl AttemptState {
	fn settle(&mut self, outcome: Result<Authenticated>) -> bool {
		if self.settled {
			return false;
		}

		self.settled = true;

		// The caller may have stopped waiting; the attempt still counts as settled.
		if let Some(sender) = self.sender.take() {
			let _ = sender.send(outcome);
		}

		true
	}
}
