//! Request coalescing for chatty interactions.
//!
//! Slider drags and camera moves can fire far faster than the service
//! round-trips. At most one request per action is in flight; repeats while
//! one is outstanding collapse into a single follow-up carrying the latest
//! arguments, so the service always converges on the newest state without
//! a backlog.

use tracing::warn;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
enum State {
    #[default]
    Idle,
    InFlight,
    /// In flight, with one follow-up owed when the reply lands.
    InFlightWithPending,
}

#[derive(Debug, Default)]
pub struct RequestCoalescer {
    state: State,
}

impl RequestCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> bool {
        self.state != State::Idle
    }

    /// Registers a trigger. Returns whether the caller should issue the
    /// request now; `false` means it was folded into the pending follow-up.
    pub fn trigger(&mut self) -> bool {
        match self.state {
            State::Idle => {
                self.state = State::InFlight;
                true
            }
            State::InFlight | State::InFlightWithPending => {
                self.state = State::InFlightWithPending;
                false
            }
        }
    }

    /// Registers a reply. Returns whether a follow-up is owed; when it is,
    /// the coalescer is already accounting for that follow-up as in flight.
    pub fn complete(&mut self) -> bool {
        match self.state {
            State::Idle => {
                warn!("coalescer completed while idle");
                false
            }
            State::InFlight => {
                self.state = State::Idle;
                false
            }
            State::InFlightWithPending => {
                self.state = State::InFlight;
                true
            }
        }
    }

    /// Registers a failed request. A pending follow-up is dropped and
    /// logged; the next trigger starts fresh rather than replaying a stale
    /// retry. Returns whether a follow-up was dropped.
    pub fn fail(&mut self) -> bool {
        let dropped = self.state == State::InFlightWithPending;
        if dropped {
            warn!("request failed with a follow-up pending; dropping it");
        }
        self.state = State::Idle;
        dropped
    }
}

/// A coalesced action whose requests carry arguments. The follow-up always
/// uses the arguments of the latest trigger; intermediate ones are dropped.
#[derive(Debug, Default)]
pub struct CoalescedAction<A> {
    coalescer: RequestCoalescer,
    latest: Option<A>,
}

impl<A: Clone> CoalescedAction<A> {
    pub fn new() -> Self {
        CoalescedAction {
            coalescer: RequestCoalescer::new(),
            latest: None,
        }
    }

    pub fn in_flight(&self) -> bool {
        self.coalescer.in_flight()
    }

    /// Registers a trigger with arguments. `Some(args)` means issue the
    /// request now; `None` means the arguments were stashed for the
    /// follow-up.
    pub fn trigger(&mut self, args: A) -> Option<A> {
        if self.coalescer.trigger() {
            Some(args)
        } else {
            self.latest = Some(args);
            None
        }
    }

    /// Registers a reply. Returns the arguments for the owed follow-up, if
    /// any.
    pub fn complete(&mut self) -> Option<A> {
        if self.coalescer.complete() {
            self.latest.take()
        } else {
            None
        }
    }

    pub fn fail(&mut self) -> bool {
        let dropped = self.coalescer.fail();
        self.latest = None;
        dropped
    }
}
