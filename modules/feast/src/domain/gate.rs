//! Password prompt in front of the admin dashboard.
//!
//! This is a convenience for the person at the keyboard, not access control: the
//! backend decides what an admin call may do (see `backend.api_token`).

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::error::DomainError;
use crate::domain::ports::SessionStore;

/// Session key holding the unlocked flag.
pub const SESSION_KEY: &str = "admin_authenticated";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Locked { attempts: u32 },
    Unlocked,
    /// Too many failures; the form stays disabled for the rest of the session.
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Unlocked,
    Rejected { remaining: u32 },
    Blocked,
    /// Nothing was typed. Not counted as an attempt.
    EmptyInput,
}

pub struct AdminGate {
    secret: String,
    max_attempts: u32,
    state: GateState,
    session: Arc<dyn SessionStore>,
}

impl AdminGate {
    /// A gate starts unlocked when the session already carries the flag.
    pub fn new(secret: impl Into<String>, max_attempts: u32, session: Arc<dyn SessionStore>) -> Self {
        let state = if session.get(SESSION_KEY).as_deref() == Some("true") {
            GateState::Unlocked
        } else {
            GateState::Locked { attempts: 0 }
        };
        Self {
            secret: secret.into(),
            max_attempts: max_attempts.max(1),
            state,
            session,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == GateState::Unlocked
    }

    pub fn remaining_attempts(&self) -> u32 {
        match self.state {
            GateState::Locked { attempts } => self.max_attempts.saturating_sub(attempts),
            GateState::Unlocked => self.max_attempts,
            GateState::Blocked => 0,
        }
    }

    pub fn submit(&mut self, input: &str) -> GateOutcome {
        let attempts = match self.state {
            GateState::Unlocked => return GateOutcome::Unlocked,
            GateState::Blocked => return GateOutcome::Blocked,
            GateState::Locked { attempts } => attempts,
        };
        if input.trim().is_empty() {
            return GateOutcome::EmptyInput;
        }

        if input == self.secret {
            self.session.set(SESSION_KEY, "true");
            self.state = GateState::Unlocked;
            info!("admin dashboard unlocked");
            return GateOutcome::Unlocked;
        }

        let attempts = attempts + 1;
        if attempts >= self.max_attempts {
            warn!(attempts, "admin gate blocked");
            self.state = GateState::Blocked;
            GateOutcome::Blocked
        } else {
            warn!(attempts, "wrong admin password");
            self.state = GateState::Locked { attempts };
            GateOutcome::Rejected {
                remaining: self.max_attempts - attempts,
            }
        }
    }

    pub fn require_unlocked(&self) -> Result<(), DomainError> {
        match self.state {
            GateState::Unlocked => Ok(()),
            GateState::Locked { .. } => Err(DomainError::AdminLocked),
            GateState::Blocked => Err(DomainError::AdminBlocked {
                attempts: self.max_attempts,
            }),
        }
    }

    /// Drop the session flag and lock again with a fresh attempt count.
    pub fn logout(&mut self) {
        self.session.remove(SESSION_KEY);
        if self.state == GateState::Unlocked {
            self.state = GateState::Locked { attempts: 0 };
            info!("admin dashboard locked");
        }
    }
}
