//! Cyclic rendezvous for the generation protocol.
//!
//! Behaves like `std::sync::Barrier` but can be broken: when a participant
//! dies, every current and future waiter returns [`BrokenBarrier`] instead of
//! blocking forever on a rendezvous that can no longer complete.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("generation barrier is broken")]
pub struct BrokenBarrier;

/// Returned by a successful [`GenerationBarrier::wait`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarrierWaitResult {
    leader: bool,
}

impl BarrierWaitResult {
    /// True for exactly one participant per rendezvous: the last to arrive.
    pub fn is_leader(&self) -> bool {
        self.leader
    }
}

#[derive(Debug)]
struct BarrierState {
    arrived: usize,
    epoch: u64,
    broken: bool,
}

#[derive(Debug)]
pub struct GenerationBarrier {
    parties: usize,
    state: Mutex<BarrierState>,
    cvar: Condvar,
}

impl GenerationBarrier {
    /// A barrier for `parties` participants. Zero is treated as one.
    pub fn new(parties: usize) -> Self {
        Self {
            parties: parties.max(1),
            state: Mutex::new(BarrierState {
                arrived: 0,
                epoch: 0,
                broken: false,
            }),
            cvar: Condvar::new(),
        }
    }

    /// Block until all parties have arrived, then reset for the next round.
    pub fn wait(&self) -> Result<BarrierWaitResult, BrokenBarrier> {
        let mut state = self.state.lock().map_err(|_| BrokenBarrier)?;
        if state.broken {
            return Err(BrokenBarrier);
        }

        let epoch = state.epoch;
        state.arrived += 1;
        if state.arrived == self.parties {
            state.arrived = 0;
            state.epoch = state.epoch.wrapping_add(1);
            self.cvar.notify_all();
            return Ok(BarrierWaitResult { leader: true });
        }

        while state.epoch == epoch && !state.broken {
            state = self.cvar.wait(state).map_err(|_| BrokenBarrier)?;
        }
        if state.epoch == epoch {
            return Err(BrokenBarrier);
        }
        Ok(BarrierWaitResult { leader: false })
    }

    /// Wake every waiter with an error and fail all later waits.
    pub fn break_barrier(&self) {
        let mut state = self.lock_ignoring_poison();
        state.broken = true;
        self.cvar.notify_all();
    }

    pub fn is_broken(&self) -> bool {
        self.lock_ignoring_poison().broken
    }

    fn lock_ignoring_poison(&self) -> MutexGuard<'_, BarrierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
