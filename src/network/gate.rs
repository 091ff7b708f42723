//! Mutual-exclusion gate
//!
//! A counting semaphore that admits callers strictly in arrival order.
//!
//! ## Ticket Model
//! Every `acquire` draws the next ticket. Ticket `t` may proceed once
//! `t < capacity + released`, so each release admits exactly the oldest
//! waiter, or adds free capacity when nobody is waiting.

use parking_lot::{Condvar, Mutex};

/// FIFO counting gate
pub struct Gate {
    capacity: u64,
    state: Mutex<GateState>,
    admitted: Condvar,
}

struct GateState {
    /// Next ticket handed to an arriving caller
    next_ticket: u64,

    /// Total releases so far
    released: u64,
}

impl GateState {
    fn admitted_below(&self, capacity: u64) -> u64 {
        capacity + self.released
    }
}

/// Proof of admission; releases the gate when dropped
#[must_use = "the gate is released as soon as the permit is dropped"]
pub struct GatePermit<'a> {
    gate: &'a Gate,
}

impl Gate {
    /// Create a gate admitting `capacity` concurrent holders (at least 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1) as u64,
            state: Mutex::new(GateState {
                next_ticket: 0,
                released: 0,
            }),
            admitted: Condvar::new(),
        }
    }

    /// Block until admitted
    ///
    /// Not reentrant: acquiring twice on one thread without dropping the
    /// first permit deadlocks when capacity is 1.
    pub fn acquire(&self) -> GatePermit<'_> {
        let mut state = self.state.lock();
        let ticket = state.next_ticket;
        state.next_ticket += 1;

        while ticket >= state.admitted_below(self.capacity) {
            self.admitted.wait(&mut state);
        }

        GatePermit { gate: self }
    }

    /// Admit without blocking, if capacity is free and nobody is queued
    pub fn try_acquire(&self) -> Option<GatePermit<'_>> {
        let mut state = self.state.lock();
        if state.next_ticket < state.admitted_below(self.capacity) {
            state.next_ticket += 1;
            Some(GatePermit { gate: self })
        } else {
            None
        }
    }

    /// Free capacity right now
    pub fn available(&self) -> usize {
        let state = self.state.lock();
        state
            .admitted_below(self.capacity)
            .saturating_sub(state.next_ticket) as usize
    }

    /// Callers currently blocked in `acquire`
    pub fn waiting(&self) -> usize {
        let state = self.state.lock();
        state
            .next_ticket
            .saturating_sub(state.admitted_below(self.capacity)) as usize
    }

    fn release(&self) {
        let mut state = self.state.lock();
        state.released += 1;
        drop(state);
        // Waiters re-check their own ticket; only the oldest gets through
        self.admitted.notify_all();
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Drop for GatePermit<'_> {
    fn drop(&mut self) {
        self.gate.release();
    }
}
