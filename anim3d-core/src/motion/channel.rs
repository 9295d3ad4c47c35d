//! A single interpolated transform channel.
//!
//! Each channel owns a FIFO of pending motions and at most one active
//! [`Segment`]. A motion becomes a segment the first time the channel is
//! advanced while idle; its start time, end time and initial value are fixed
//! at that moment, so queued motions never expire while they wait.

use std::collections::VecDeque;

/// One kind of interpolated motion.
///
/// Implementors describe how a channel value moves from the initial value
/// captured when the segment starts towards the motion's target.
pub trait Motion {
    type Value: Clone + std::fmt::Debug;

    /// Value a new segment starts from, given the channel's resting value.
    fn initial(&self, resting: &Self::Value) -> Self::Value {
        resting.clone()
    }

    /// Value part-way through the segment, with `progress` in `[0, 1)`.
    fn sample(&self, initial: &Self::Value, progress: f32) -> Self::Value;

    /// Value once the segment is complete.
    fn settle(&self, initial: &Self::Value) -> Self::Value;
}

/// A motion that has been given its time window.
#[derive(Debug, Clone)]
pub struct Segment<M: Motion> {
    pub motion: M,
    pub initial: M::Value,
    pub start: f32,
    pub end: f32,
}

impl<M: Motion> Segment<M> {
    /// Start `motion` at `now`, capturing the initial value from `resting`.
    pub fn begin(motion: M, duration: f32, now: f32, resting: &M::Value) -> Self {
        let initial = motion.initial(resting);
        Self {
            motion,
            initial,
            start: now,
            end: now + duration,
        }
    }

    /// Normalized elapsed time of this segment at `now`.
    pub fn progress(&self, now: f32) -> f32 {
        progress(self.start, self.end, now)
    }
}

/// Normalized elapsed time in `[start, end]`.
///
/// An empty, inverted or NaN window counts as already complete, and a time
/// before `start` counts as not yet started.
#[allow(clippy::neg_cmp_op_on_partial_ord)]
pub fn progress(start: f32, end: f32, now: f32) -> f32 {
    if !(end > start) {
        return 1.0;
    }
    ((now - start) / (end - start)).max(0.0)
}

/// Whether a channel is interpolating.
#[derive(Debug, Clone)]
pub enum ChannelState<M: Motion> {
    Idle,
    Active(Segment<M>),
}

impl<M: Motion> Default for ChannelState<M> {
    fn default() -> Self {
        ChannelState::Idle
    }
}

/// Resolve a channel state at `now`.
///
/// Returns the channel value and the state for the next evaluation. A segment
/// whose progress reached 1 resolves to its settled value and the channel
/// goes idle, so the next queued motion starts on the following call.
pub fn advance<M: Motion>(
    state: ChannelState<M>,
    resting: &M::Value,
    now: f32,
) -> (M::Value, ChannelState<M>) {
    match state {
        ChannelState::Idle => (resting.clone(), ChannelState::Idle),
        ChannelState::Active(segment) => {
            let t = segment.progress(now);
            if t >= 1.0 {
                (segment.motion.settle(&segment.initial), ChannelState::Idle)
            } else {
                let value = segment.motion.sample(&segment.initial, t);
                (value, ChannelState::Active(segment))
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Pending<M> {
    motion: M,
    duration: f32,
}

/// FIFO of motions plus the state of the one being played.
#[derive(Debug, Clone)]
pub struct Channel<M: Motion> {
    name: &'static str,
    pending: VecDeque<Pending<M>>,
    state: ChannelState<M>,
    resting: M::Value,
}

impl<M: Motion> Channel<M> {
    /// Create an idle channel resting at `value`. `name` labels its log lines.
    pub fn new(name: &'static str, value: M::Value) -> Self {
        Self {
            name,
            pending: VecDeque::new(),
            state: ChannelState::Idle,
            resting: value,
        }
    }

    /// Queue a motion behind everything already pending.
    pub fn push(&mut self, motion: M, duration: f32) {
        self.pending.push_back(Pending { motion, duration });
    }

    /// Advance to `now` and return the channel value.
    pub fn advance(&mut self, now: f32) -> M::Value {
        match self.advance_active(now) {
            Some(value) => value,
            None => self.resting.clone(),
        }
    }

    /// Advance to `now`, returning a value only if a segment was being
    /// played during this call.
    ///
    /// The call that completes a segment still returns its settled value.
    pub fn advance_active(&mut self, now: f32) -> Option<M::Value> {
        if let ChannelState::Idle = self.state {
            let next = self.pending.pop_front()?;
            log::debug!(
                "{} segment started at {now}s for {}s",
                self.name,
                next.duration
            );
            self.state = ChannelState::Active(Segment::begin(
                next.motion,
                next.duration,
                now,
                &self.resting,
            ));
        }

        let state = std::mem::take(&mut self.state);
        let (value, state) = advance(state, &self.resting, now);
        if let ChannelState::Idle = state {
            log::debug!("{} segment completed at {now}s", self.name);
        }
        self.state = state;
        self.resting = value.clone();
        Some(value)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Overwrite the resting value.
    ///
    /// An active segment keeps its captured initial value and is unaffected.
    pub fn rest_at(&mut self, value: M::Value) {
        self.resting = value;
    }

    /// The most recently resolved value.
    pub fn value(&self) -> &M::Value {
        &self.resting
    }

    /// The segment currently being played, if any.
    pub fn active(&self) -> Option<&Segment<M>> {
        match &self.state {
            ChannelState::Active(segment) => Some(segment),
            ChannelState::Idle => None,
        }
    }

    /// True when nothing is playing and nothing is queued.
    pub fn is_idle(&self) -> bool {
        matches!(self.state, ChannelState::Idle) && self.pending.is_empty()
    }

    /// Number of motions waiting behind the active one.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
