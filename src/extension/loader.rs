//! Lazily-installed, shared SDK loader with a FIFO wait queue.
//!
//! [`ExtensionLoader::ready`] requests the SDK from the environment at most once per loader
//! and resolves with the readiness payload for every caller, whether it asked before or
//! after installation completed. The environment reports completion through the
//! [`ReadySignal`] handed to [`ExtensionInstaller::install`]; waiters are drained in
//! registration order and the queue stays empty afterwards.
//!
//! Create one loader per application context and share it by cloning; clones observe the
//! same state.

// std
use std::sync::Weak;
// crates.io
use tokio::sync::oneshot;
// self
use crate::{
	_prelude::*,
	error::ExtensionError,
	obs::{self, Outcome, Stage},
};

/// Observable lifecycle of an [`ExtensionLoader`]. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExtensionLoadState {
	/// Nobody asked for the SDK yet.
	NotRequested,
	/// The install side effect fired and the loader waits for the environment's signal.
	Installing,
	/// The payload is cached; new callers resolve without queueing.
	Ready,
}
impl ExtensionLoadState {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ExtensionLoadState::NotRequested => "not_requested",
			ExtensionLoadState::Installing => "installing",
			ExtensionLoadState::Ready => "ready",
		}
	}
}
impl Display for ExtensionLoadState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Side effect that asks the environment to load the SDK.
///
/// Implementations must be idempotent: the loader fires the side effect once, but the
/// environment may already be loading the same SDK on its own behalf. Call
/// [`ReadySignal::ready`] (now or later, from any thread) once the SDK is usable.
pub trait ExtensionInstaller<P>
where
	Self: Send + Sync,
{
	/// Starts installing the SDK.
	fn install(&self, signal: ReadySignal<P>);
}
impl<P, F> ExtensionInstaller<P> for F
where
	F: Fn(ReadySignal<P>) + Send + Sync,
{
	fn install(&self, signal: ReadySignal<P>) {
		self(signal)
	}
}

/// Completion handle for an in-flight installation.
pub struct ReadySignal<P> {
	shared: Weak<Shared<P>>,
}
impl<P> ReadySignal<P>
where
	P: Clone,
{
	/// Marks the SDK as ready and drains the wait queue in registration order.
	///
	/// Returns the number of waiters that were notified. Signals after the first one, or
	/// after every loader clone was dropped, are no-ops and return `0`.
	pub fn ready(&self, payload: P) -> usize {
		match self.shared.upgrade() {
			Some(shared) => shared.complete(payload),
			None => 0,
		}
	}
}
impl<P> Clone for ReadySignal<P> {
	fn clone(&self) -> Self {
		Self { shared: self.shared.clone() }
	}
}
impl<P> Debug for ReadySignal<P> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ReadySignal(..)")
	}
}

/// Shared SDK bootstrap; see the [module docs](self).
pub struct ExtensionLoader<P> {
	shared: Arc<Shared<P>>,
	ready_timeout: Option<std::time::Duration>,
}
impl<P> ExtensionLoader<P>
where
	P: 'static + Clone + Send + Sync,
{
	/// Creates a loader that fires `installer` on the first [`ready`](Self::ready) call.
	pub fn new(installer: impl 'static + ExtensionInstaller<P>) -> Self {
		Self::with_phase(Phase::NotRequested, Some(Arc::new(installer)))
	}

	/// Creates a loader for an SDK that is already present in the environment.
	///
	/// The loader starts in [`ExtensionLoadState::Ready`] and never installs anything.
	pub fn preloaded(payload: P) -> Self {
		Self::with_phase(Phase::Ready(payload), None)
	}

	fn with_phase(phase: Phase<P>, installer: Option<Arc<dyn ExtensionInstaller<P>>>) -> Self {
		Self {
			shared: Arc::new(Shared {
				inner: Mutex::new(Inner { phase, waiters: VecDeque::new() }),
				installer,
			}),
			ready_timeout: None,
		}
	}

	/// Bounds how long each [`ready`](Self::ready) call waits for the SDK.
	///
	/// A timed-out caller receives [`ExtensionError::TimedOut`]; the loader itself keeps
	/// waiting and later callers are unaffected. Its queue entry is pruned when the next
	/// caller registers. Without a bound a caller waits until the
	/// environment signals readiness, however long that takes.
	pub fn with_ready_timeout(mut self, after: std::time::Duration) -> Self {
		self.ready_timeout = Some(after);

		self
	}

	/// Current lifecycle state.
	pub fn state(&self) -> ExtensionLoadState {
		self.shared.inner.lock().phase.state()
	}

	/// Number of callers currently queued for readiness.
	///
	/// May include callers that gave up since the last registration.
	pub fn pending(&self) -> usize {
		self.shared.inner.lock().waiters.len()
	}

	/// Returns a completion handle without triggering installation.
	///
	/// Useful when the environment announces readiness through a channel other than the
	/// installer, e.g. a global init hook that may fire before anyone asked.
	pub fn signal(&self) -> ReadySignal<P> {
		ReadySignal { shared: Arc::downgrade(&self.shared) }
	}

	/// Resolves with the readiness payload, installing the SDK on first use.
	///
	/// The future never completes on its first poll, even when the payload is already cached.
	/// The caller joins the queue on the second poll and resumes in queue order.
	pub async fn ready(&self) -> Result<P, ExtensionError> {
		// Queued callers must all be parked on their receivers when the signal drains the
		// queue, otherwise a caller still in its first yield resumes ahead of earlier ones.
		tokio::task::yield_now().await;

		let receiver = match self.register() {
			Registration::Cached(payload) => return Ok(payload),
			Registration::Queued(receiver) => receiver,
		};
		let received = match self.ready_timeout {
			Some(after) => match tokio::time::timeout(after, receiver).await {
				Ok(received) => received,
				Err(_) => {
					obs::record_outcome(Stage::ExtensionReady, Outcome::Failure);

					return Err(ExtensionError::TimedOut { after });
				},
			},
			None => receiver.await,
		};

		received.map_err(|_| ExtensionError::Abandoned)
	}

	fn register(&self) -> Registration<P> {
		let (sender, receiver) = oneshot::channel();
		let first_request = {
			let mut inner = self.shared.inner.lock();

			if let Phase::Ready(payload) = &inner.phase {
				return Registration::Cached(payload.clone());
			}

			// Drop entries whose callers gave up (timeout, dropped future).
			inner.waiters.retain(|waiter| !waiter.is_closed());
			inner.waiters.push_back(sender);

			if matches!(inner.phase, Phase::NotRequested) {
				inner.phase = Phase::Installing;

				true
			} else {
				false
			}
		};

		if first_request {
			obs::extension_installing();

			if let Some(installer) = &self.shared.installer {
				installer.install(self.signal());
			}
		}

		Registration::Queued(receiver)
	}
}
impl<P> Clone for ExtensionLoader<P> {
	fn clone(&self) -> Self {
		Self { shared: self.shared.clone(), ready_timeout: self.ready_timeout }
	}
}
impl<P> Debug for ExtensionLoader<P> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let inner = self.shared.inner.lock();

		f.debug_struct("ExtensionLoader")
			.field("state", &inner.phase.state())
			.field("pending", &inner.waiters.len())
			.field("ready_timeout", &self.ready_timeout)
			.finish()
	}
}

struct Shared<P> {
	inner: Mutex<Inner<P>>,
	installer: Option<Arc<dyn ExtensionInstaller<P>>>,
}
impl<P> Shared<P>
where
	P: Clone,
{
	fn complete(&self, payload: P) -> usize {
		let waiters = {
			let mut inner = self.inner.lock();

			if matches!(inner.phase, Phase::Ready(_)) {
				return 0;
			}

			inner.phase = Phase::Ready(payload.clone());

			std::mem::take(&mut inner.waiters)
		};
		let notified = waiters.len();

		// A waiter whose caller gave up (timeout, dropped future) still counts as drained.
		for waiter in waiters {
			let _ = waiter.send(payload.clone());
		}

		obs::extension_ready(notified);
		obs::record_waiters_released(notified);
		obs::record_outcome(Stage::ExtensionReady, Outcome::Success);

		notified
	}
}

struct Inner<P> {
	phase: Phase<P>,
	waiters: VecDeque<oneshot::Sender<P>>,
}

enum Phase<P> {
	NotRequested,
	Installing,
	Ready(P),
}
impl<P> Phase<P> {
	fn state(&self) -> ExtensionLoadState {
		match self {
			Phase::NotRequested => ExtensionLoadState::NotRequested,
			Phase::Installing => ExtensionLoadState::Installing,
			Phase::Ready(_) => ExtensionLoadState::Ready,
		}
	}
}

enum Registration<P> {
	Cached(P),
	Queued(oneshot::Receiver<P>),
}
