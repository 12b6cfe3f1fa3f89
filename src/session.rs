//! The single dashboard session and its idle countdown.
//!
//! The countdown is a chain of one-tick timers. Only the handle stored in
//! [`SessionManager`] is live: restarting the countdown cancels it first, and a tick whose
//! handle no longer matches is discarded, so two countdowns can never run side by side.

use crate::account::AccountStore;
use crate::account::Pin;
use crate::account::SharedAccount;
use crate::account::Username;
use crate::scheduler::EventLoop;
use crate::scheduler::TimerId;

#[cfg(test)]
#[path = "session/tests/session_tests.rs"]
mod session_tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq, parse_display::Display)]
pub enum SessionState {
    LoggedOut,
    LoggedIn,
}

/// Event-loop payload for one step of the idle countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleTick;

/// What a fired [`IdleTick`] did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleTickOutcome {
    /// The tick belonged to a cancelled countdown.
    Stale,
    Counting { remaining_secs: u32 },
    Expired,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid credentials for username={username}")]
    InvalidCredentials { username: Username },
}

#[derive(Debug)]
pub struct SessionManager {
    idle_timeout_secs: u32,
    active: Option<SharedAccount>,
    idle_timer: Option<TimerId>,
    remaining_secs: u32,
    sorted: bool,
}

impl SessionManager {
    pub const fn new(idle_timeout_secs: u32) -> Self {
        Self {
            idle_timeout_secs,
            active: None,
            idle_timer: None,
            remaining_secs: 0,
            sorted: false,
        }
    }

    pub const fn state(&self) -> SessionState {
        if self.active.is_some() {
            SessionState::LoggedIn
        } else {
            SessionState::LoggedOut
        }
    }

    pub const fn active(&self) -> Option<&SharedAccount> {
        self.active.as_ref()
    }

    pub const fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub const fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Flips the movements ordering toggle and returns the new value.
    pub const fn toggle_sort(&mut self) -> bool {
        self.sorted = !self.sorted;
        self.sorted
    }

    /// Opens a session on the account matching `username` and `pin`, restarting the idle
    /// countdown.
    ///
    /// A `None` pin stands for PIN text that did not convert to a number.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidCredentials`] if no account matches `username` or the
    /// PIN differs. The current session is left untouched.
    pub fn login<T: From<IdleTick>>(
        &mut self,
        store: &AccountStore,
        username: &Username,
        pin: Option<Pin>,
        events: &mut EventLoop<T>,
    ) -> Result<SharedAccount, SessionError> {
        let account = store
            .find_by_username(username)
            .filter(|account| Some(account.borrow().pin()) == pin)
            .ok_or_else(|| {
                tracing::warn!(%username, "login rejected");
                SessionError::InvalidCredentials {
                    username: username.clone(),
                }
            })?;

        tracing::info!(%username, "login accepted");
        self.active = Some(account.clone());
        self.sorted = false;
        self.reset_idle_timer(events);
        Ok(account)
    }

    /// Ends the session and stops the countdown. Returns `false` if nobody was logged in.
    pub fn logout<T>(&mut self, events: &mut EventLoop<T>) -> bool {
        self.cancel_idle_timer(events);
        let was_logged_in = self.active.take().is_some();
        if was_logged_in {
            tracing::info!("session ended");
        }
        was_logged_in
    }

    /// Starts the countdown from the full idle timeout, replacing any running one.
    pub fn start_idle_timer<T: From<IdleTick>>(&mut self, events: &mut EventLoop<T>) {
        self.cancel_idle_timer(events);
        self.remaining_secs = self.idle_timeout_secs;
        self.idle_timer = Some(events.schedule(1, T::from(IdleTick)));
    }

    /// Cancels the outstanding countdown handle and starts a fresh one.
    pub fn reset_idle_timer<T: From<IdleTick>>(&mut self, events: &mut EventLoop<T>) {
        self.start_idle_timer(events);
    }

    /// Applies a fired idle tick identified by `timer`.
    pub fn on_idle_tick<T: From<IdleTick>>(&mut self, timer: TimerId, events: &mut EventLoop<T>) -> IdleTickOutcome {
        if self.idle_timer != Some(timer) {
            return IdleTickOutcome::Stale;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.idle_timer = None;
            if let Some(account) = self.active.take() {
                tracing::info!(username = %account.borrow().username(), "session expired");
            }
            return IdleTickOutcome::Expired;
        }

        self.idle_timer = Some(events.schedule(1, T::from(IdleTick)));
        IdleTickOutcome::Counting {
            remaining_secs: self.remaining_secs,
        }
    }

    fn cancel_idle_timer<T>(&mut self, events: &mut EventLoop<T>) {
        if let Some(timer) = self.idle_timer.take() {
            events.cancel(timer);
        }
    }
}
