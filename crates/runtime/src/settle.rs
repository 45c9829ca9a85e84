use foundation::time::Millis;

/// Which side of the race settled a [`SettleGate`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SettleVia {
    /// The animation reported completion.
    Signal,
    /// The fallback deadline passed first.
    Timeout,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Completed {
    pub via: SettleVia,
    pub at: Millis,
    /// Time from arming to settling.
    pub elapsed_ms: u64,
}

/// One-shot race between a completion signal and a bounded fallback timeout.
///
/// Whichever of [`SettleGate::signal`] or [`SettleGate::poll_timeout`] lands
/// first resolves the gate; every later call returns `None`, so the work
/// attached to completion runs at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettleGate {
    armed_at: Millis,
    deadline: Millis,
    outcome: Option<Completed>,
}

impl SettleGate {
    pub fn arm(now: Millis, timeout_ms: u64) -> Self {
        Self {
            armed_at: now,
            deadline: now.after(timeout_ms),
            outcome: None,
        }
    }

    pub fn deadline(&self) -> Millis {
        self.deadline
    }

    pub fn is_settled(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<Completed> {
        self.outcome
    }

    /// Completion signal. Returns the outcome only if this call settled the gate.
    pub fn signal(&mut self, now: Millis) -> Option<Completed> {
        self.settle(SettleVia::Signal, now)
    }

    /// Fallback check. Settles the gate once `now` reaches the deadline.
    pub fn poll_timeout(&mut self, now: Millis) -> Option<Completed> {
        if now < self.deadline {
            return None;
        }
        self.settle(SettleVia::Timeout, now)
    }

    fn settle(&mut self, via: SettleVia, now: Millis) -> Option<Completed> {
        if self.outcome.is_some() {
            return None;
        }
        let done = Completed {
            via,
            at: now,
            elapsed_ms: now.since(self.armed_at),
        };
        self.outcome = Some(done);
        Some(done)
    }
}
