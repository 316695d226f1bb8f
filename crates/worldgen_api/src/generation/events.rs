//! Event types and sinks for observing chunk population.
//!
//! This module defines [`PopulateEvent`] and a set of sinks to emit, collect,
//! or forward events while a [`crate::generation::runner::GenerationPlan`] runs via
//! [`crate::generation::runner::PopulationRunner`] or
//! [`crate::generation::runner::populate_chunk`].
use crate::generation::runner::ChunkReport;
use crate::generation::{ChunkPos, Decoration, PopulatorType};

/// Describes events emitted while populating a chunk.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum PopulateEvent {
    /// Emitted before the first populator runs.
    ChunkStarted {
        chunk: ChunkPos,
        /// Number of populators in the plan.
        populator_count: usize,
    },

    /// Emitted when a populator is about to run.
    PopulatorStarted {
        /// Index of the populator in the plan.
        index: usize,
        populator_type: PopulatorType,
    },

    /// Emitted for every decoration a populator hands to the volume.
    DecorationPlaced {
        /// Index of the populator that produced it.
        index: usize,
        decoration: Decoration,
    },

    /// Emitted after a populator returned successfully.
    PopulatorFinished {
        index: usize,
        populator_type: PopulatorType,
        /// Decorations placed by this populator.
        decorations: usize,
    },

    /// Emitted after every populator ran.
    ChunkFinished { report: ChunkReport },

    /// Non-fatal warning, such as a populator returning an error.
    Warning {
        /// Context string (e.g. chunk and populator index).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Coarse event categories used to skip building events nobody listens to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PopulateEventKind {
    ChunkStarted,
    PopulatorStarted,
    DecorationPlaced,
    PopulatorFinished,
    ChunkFinished,
    Warning,
}

impl PopulateEvent {
    pub fn kind(&self) -> PopulateEventKind {
        match self {
            PopulateEvent::ChunkStarted { .. } => PopulateEventKind::ChunkStarted,
            PopulateEvent::PopulatorStarted { .. } => PopulateEventKind::PopulatorStarted,
            PopulateEvent::DecorationPlaced { .. } => PopulateEventKind::DecorationPlaced,
            PopulateEvent::PopulatorFinished { .. } => PopulateEventKind::PopulatorFinished,
            PopulateEvent::ChunkFinished { .. } => PopulateEventKind::ChunkFinished,
            PopulateEvent::Warning { .. } => PopulateEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`PopulateEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: PopulateEvent);

    /// Returns `false` to have emitters skip events of this kind entirely.
    fn wants(&self, _kind: PopulateEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = PopulateEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: PopulateEvent) {}

    #[inline]
    fn wants(&self, _kind: PopulateEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(PopulateEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(PopulateEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(PopulateEvent),
{
    #[inline]
    fn send(&mut self, event: PopulateEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<PopulateEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
        }
    }

    pub fn into_inner(self) -> Vec<PopulateEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[PopulateEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: PopulateEvent) {
        self.events.push(event);
    }
}

/// Sink that only forwards the listed event kinds to an inner sink.
pub struct FilterSink<S: EventSink> {
    inner: S,
    kinds: Vec<PopulateEventKind>,
}

impl<S: EventSink> FilterSink<S> {
    pub fn new(inner: S, kinds: impl IntoIterator<Item = PopulateEventKind>) -> Self {
        Self {
            inner,
            kinds: kinds.into_iter().collect(),
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: EventSink> EventSink for FilterSink<S> {
    fn send(&mut self, event: PopulateEvent) {
        if self.kinds.contains(&event.kind()) {
            self.inner.send(event);
        }
    }

    fn wants(&self, kind: PopulateEventKind) -> bool {
        self.kinds.contains(&kind) && self.inner.wants(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(context: &str) -> PopulateEvent {
        PopulateEvent::Warning {
            context: context.into(),
            message: "msg".into(),
        }
    }

    #[test]
    fn vec_sink_collects_events() {
        let mut sink = VecSink::with_capacity(2);
        assert!(sink.is_empty());
        sink.send(warning("a"));
        sink.send(warning("b"));
        assert_eq!(sink.len(), 2);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn unit_sink_wants_nothing() {
        assert!(!().wants(PopulateEventKind::Warning));
        assert!(VecSink::new().wants(PopulateEventKind::Warning));
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send_many(vec![warning("a"), warning("b")]);
        drop(sink);
        assert_eq!(count, 2);
    }

    #[test]
    fn filter_sink_drops_unlisted_kinds() {
        let mut sink = FilterSink::new(VecSink::new(), [PopulateEventKind::ChunkStarted]);
        assert!(!sink.wants(PopulateEventKind::Warning));
        sink.send(warning("dropped"));
        sink.send(PopulateEvent::ChunkStarted {
            chunk: ChunkPos(1, 1),
            populator_count: 0,
        });

        let events = sink.into_inner().into_inner();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), PopulateEventKind::ChunkStarted);
    }
}
