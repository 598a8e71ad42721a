//! # Task Management
//!
//! Cooperative scheduling primitives for work that runs on the caller's frame loop.
//!
//! The voxel core is single-threaded: all of its state sits behind `StResource`
//! and its long-running work is written as futures the embedding engine drives. Two
//! pieces make that workable:
//!
//! - `yield_now`: gives control back to the executor once, so a long drain is spread
//!   across polls instead of blocking one
//! - `SingleFlight`: allows at most one pass of a piece of work at a time, and lets
//!   latecomers wait for the running pass instead of starting their own
//!
//! ## Pass Lifecycle
//! 1. A caller asks `SingleFlight::try_begin()` for a `FlightGuard`
//! 2. If it gets one, it runs the pass, yielding between work items
//! 3. Dropping the guard ends the pass and wakes every waiter
//! 4. A caller that got `None` awaits `wait_idle()` and returns once that pass ends
//!
//! Never hold a `Ref`/`RefMut` from an `StResource` across an `.await`: other callers
//! run while the future is suspended and will need the borrow.

use std::task::{Poll, Waker};

use futures::future::poll_fn;

use crate::core::StResource;

/// Yields to the executor exactly once.
///
/// The first poll schedules a wake-up and returns `Pending`; the second completes.
pub async fn yield_now() {
    let mut yielded = false;
    poll_fn(|cx| {
        if yielded {
            Poll::Ready(())
        } else {
            yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    })
    .await
}

#[derive(Debug, Default)]
struct FlightState {
    in_flight: bool,
    /// Number of passes that have finished
    completed_passes: u64,
    waiters: Vec<Waker>,
}

/// At-most-one-pass gate for a cooperative background job.
#[derive(Clone, Debug, Default)]
pub struct SingleFlight {
    state: StResource<FlightState>,
}

/// Proof that the holder is running the current pass. Dropping it ends the pass.
#[derive(Debug)]
pub struct FlightGuard {
    state: StResource<FlightState>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a pass unless one is already in flight.
    pub fn try_begin(&self) -> Option<FlightGuard> {
        let mut state = self.state.get_mut();
        if state.in_flight {
            return None;
        }
        state.in_flight = true;
        Some(FlightGuard {
            state: self.state.clone(),
        })
    }

    pub fn is_in_flight(&self) -> bool {
        self.state.get().in_flight
    }

    /// Number of passes that have finished since creation.
    pub fn completed_passes(&self) -> u64 {
        self.state.get().completed_passes
    }

    /// Resolves once the pass in flight at call time has finished.
    ///
    /// Resolves immediately if nothing is in flight. Does not wait for passes started
    /// after the current one.
    pub async fn wait_idle(&self) {
        let target = {
            let state = self.state.get();
            if !state.in_flight {
                return;
            }
            state.completed_passes
        };

        poll_fn(|cx| {
            let mut state = self.state.get_mut();
            if state.completed_passes > target {
                Poll::Ready(())
            } else {
                state.waiters.push(cx.waker().clone());
                Poll::Pending
            }
        })
        .await
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        let waiters = {
            let mut state = self.state.get_mut();
            state.in_flight = false;
            state.completed_passes += 1;
            std::mem::take(&mut state.waiters)
        };

        for waiter in waiters {
            waiter.wake();
        }
    }
}
