//! Poll state tracking
//!
//! `pollOpenClose` shares one shape for both transitions: an unknown poll id
//! opens, a known id closes. Tally updates are versioned by a monotonic tick
//! and applied only when strictly newer than the stored tick, so out-of-order
//! delivery never regresses the tally.

use std::collections::HashMap;

use crate::events::{Poll, Tally, TallyUpdate};

/// Tracked state for one poll
#[derive(Debug, Clone, PartialEq)]
pub struct PollState {
    pub poll: Poll,
    pub tally: Tally,
    pub closed: bool,
}

impl PollState {
    fn open(poll: Poll) -> Self {
        let tally = poll.running_tally.clone().unwrap_or(Tally {
            // Tick -1 so a genuine tick-0 update still applies
            tick: -1,
            counts: vec![0; poll.options.len()],
        });
        Self {
            poll,
            tally,
            closed: false,
        }
    }
}

/// Result of a `pollOpenClose` event against the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollTransition {
    Opened,
    Closed,
    /// Close of an already-finalized poll, dropped
    AlreadyClosed,
}

/// Result of a tally update against the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TallyOutcome {
    Applied,
    /// Tick not strictly greater than the stored one, dropped
    Stale,
    /// Update for a poll the store never opened, dropped
    UnknownPoll,
    /// Update for a finalized poll, dropped
    Finalized,
}

/// All polls observed on the current connection
#[derive(Debug, Default)]
pub struct PollStore {
    polls: HashMap<String, PollState>,
}

impl PollStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a `pollOpenClose` event
    pub fn open_or_close(&mut self, poll: Poll) -> PollTransition {
        match self.polls.get_mut(&poll.id) {
            None => {
                self.polls.insert(poll.id.clone(), PollState::open(poll));
                PollTransition::Opened
            }
            Some(state) if state.closed => PollTransition::AlreadyClosed,
            Some(state) => {
                // Close events carry the final poll document; keep it, and
                // fold in a final tally when one is attached.
                if let Some(tally) = &poll.running_tally {
                    if tally.tick > state.tally.tick {
                        state.tally = tally.clone();
                    }
                }
                state.poll = poll;
                state.closed = true;
                PollTransition::Closed
            }
        }
    }

    /// Apply a tally update, gated on strict tick growth
    pub fn apply_tally(&mut self, update: &TallyUpdate) -> TallyOutcome {
        match self.polls.get_mut(&update.poll_id) {
            None => TallyOutcome::UnknownPoll,
            Some(state) if state.closed => TallyOutcome::Finalized,
            Some(state) => {
                if update.tick <= state.tally.tick {
                    return TallyOutcome::Stale;
                }
                state.tally = update.tally();
                TallyOutcome::Applied
            }
        }
    }

    pub fn get(&self, poll_id: &str) -> Option<&PollState> {
        self.polls.get(poll_id)
    }

    /// Polls currently tracked, open and closed
    pub fn len(&self) -> usize {
        self.polls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polls.is_empty()
    }
}
