//! Test-only `tracing` subscriber that counts events per level.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Metadata, Subscriber};

#[derive(Clone, Default)]
pub(crate) struct EventCounter {
    warn: Arc<AtomicUsize>,
    debug: Arc<AtomicUsize>,
}

impl EventCounter {
    pub(crate) fn warnings(&self) -> usize {
        self.warn.load(Ordering::SeqCst)
    }

    pub(crate) fn debugs(&self) -> usize {
        self.debug.load(Ordering::SeqCst)
    }

    /// Run `f` with this counter as the thread's default subscriber.
    pub(crate) fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::subscriber::with_default(self.clone(), f)
    }
}

impl Subscriber for EventCounter {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _: &Id, _: &Record<'_>) {}

    fn record_follows_from(&self, _: &Id, _: &Id) {}

    fn event(&self, event: &Event<'_>) {
        match *event.metadata().level() {
            Level::WARN => self.warn.fetch_add(1, Ordering::SeqCst),
            Level::DEBUG => self.debug.fetch_add(1, Ordering::SeqCst),
            _ => 0,
        };
    }

    fn enter(&self, _: &Id) {}

    fn exit(&self, _: &Id) {}
}
