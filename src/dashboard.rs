//! Maps user [`Intent`]s onto the session and transaction services and drives the
//! [`RenderSink`] with the outcome.
//!
//! [`Dashboard`] owns every piece of state: the [`AccountStore`], the [`SessionManager`] and
//! the [`EventLoop`] carrying idle ticks and pending settlements. Time only moves through
//! [`Dashboard::advance`].

use crate::account::AccountStore;
use crate::account::SharedAccount;
use crate::account::Username;
use crate::clock::Clock;
use crate::command::Intent;
use crate::command::parse_amount;
use crate::command::parse_pin;
use crate::config::EngineConfig;
use crate::engine::Settlement;
use crate::engine::TransactionError;
use crate::engine::TransactionService;
use crate::ledger::balance_of;
use crate::ledger::order_for_display;
use crate::ledger::summary_of;
use crate::render::RenderSink;
use crate::scheduler::EventLoop;
use crate::scheduler::Tick;
use crate::session::IdleTick;
use crate::session::IdleTickOutcome;
use crate::session::SessionError;
use crate::session::SessionManager;

#[cfg(test)]
#[path = "dashboard/tests/dashboard_tests.rs"]
mod dashboard_tests;

pub const LOGGED_OUT_WELCOME: &str = "Log in to get started";

/// Payload of the dashboard event loop.
#[derive(Debug, Clone)]
pub enum Task {
    Idle(IdleTick),
    Settle(Settlement),
}

impl From<IdleTick> for Task {
    fn from(tick: IdleTick) -> Self {
        Self::Idle(tick)
    }
}

impl From<Settlement> for Task {
    fn from(settlement: Settlement) -> Self {
        Self::Settle(settlement)
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DashboardError {
    #[error("no active session, cannot handle intent={intent}")]
    NoActiveSession { intent: &'static str },
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

pub struct Dashboard<S, C> {
    store: AccountStore,
    session: SessionManager,
    service: TransactionService,
    events: EventLoop<Task>,
    sink: S,
    clock: C,
}

impl<S: RenderSink, C: Clock> Dashboard<S, C> {
    /// Builds the dashboard and renders the logged out screen.
    pub fn new(config: EngineConfig, store: AccountStore, sink: S, clock: C) -> Self {
        let mut dashboard = Self {
            store,
            session: SessionManager::new(config.idle_timeout_secs),
            service: TransactionService::new(config.settlement_delay_secs),
            events: EventLoop::new(),
            sink,
            clock,
        };
        dashboard.render_logged_out();
        dashboard
    }

    pub const fn store(&self) -> &AccountStore {
        &self.store
    }

    pub const fn session(&self) -> &SessionManager {
        &self.session
    }

    pub const fn sink(&self) -> &S {
        &self.sink
    }

    pub const fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Current tick of the dashboard timeline.
    pub const fn now(&self) -> Tick {
        self.events.now()
    }

    /// Handles one user intent.
    ///
    /// Transfer and loan attempts restart the idle countdown whether or not they are accepted.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`DashboardError::Session`] if login or close credentials do not match.
    /// - [`DashboardError::Transaction`] if a transfer or loan is rejected.
    /// - [`DashboardError::NoActiveSession`] if an intent needing a session arrives logged out.
    ///
    /// No state is changed when an error is returned, apart from the countdown restart.
    pub fn dispatch(&mut self, intent: Intent) -> Result<(), DashboardError> {
        tracing::debug!(intent = intent.name(), tick = self.now(), "dispatching intent");
        match intent {
            Intent::Login { username, pin } => self.login(&Username(username), &pin),
            Intent::Logout => {
                if self.session.logout(&mut self.events) {
                    self.render_logged_out();
                }
                Ok(())
            }
            Intent::Transfer { to, amount } => {
                let active = self.require_session("transfer")?;
                let res = self.service.transfer(
                    &self.store,
                    &active,
                    &Username(to),
                    parse_amount(&amount),
                    &mut self.events,
                );
                self.refresh(&active);
                self.restart_countdown();
                res.map(drop).map_err(DashboardError::from)
            }
            Intent::Loan { amount } => {
                let active = self.require_session("loan")?;
                let res = self.service.grant_loan(&active, parse_amount(&amount), &mut self.events);
                self.refresh(&active);
                self.restart_countdown();
                res.map(drop).map_err(DashboardError::from)
            }
            Intent::Close { username, pin } => {
                self.service.close_account(
                    &mut self.store,
                    &mut self.session,
                    &Username(username),
                    parse_pin(&pin),
                    &mut self.events,
                )?;
                self.render_logged_out();
                Ok(())
            }
            Intent::ToggleSort => {
                let active = self.require_session("sort")?;
                self.session.toggle_sort();
                let account = active.borrow();
                self.sink.show_movements(
                    &order_for_display(&account, self.session.is_sorted()),
                    account.style(),
                );
                Ok(())
            }
            Intent::Wait { secs } => {
                self.advance(secs);
                Ok(())
            }
        }
    }

    /// Lets `secs` ticks elapse, firing every idle tick and settlement due meanwhile.
    pub fn advance(&mut self, secs: Tick) {
        let until = self.events.now().saturating_add(secs);
        while let Some((timer, task)) = self.events.pop_due(until) {
            match task {
                Task::Idle(_) => match self.session.on_idle_tick(timer, &mut self.events) {
                    IdleTickOutcome::Stale => {}
                    IdleTickOutcome::Counting { remaining_secs } => self.sink.show_countdown(remaining_secs),
                    IdleTickOutcome::Expired => {
                        self.sink.show_countdown(0);
                        self.render_logged_out();
                    }
                },
                Task::Settle(settlement) => {
                    self.service.settle(&settlement, self.clock.now());
                    if let Some(active) = self.session.active().cloned() {
                        self.refresh(&active);
                    }
                }
            }
        }
    }

    fn login(&mut self, username: &Username, pin: &str) -> Result<(), DashboardError> {
        let account = self
            .session
            .login(&self.store, username, parse_pin(pin), &mut self.events)?;

        let account_ref = account.borrow();
        self.sink
            .set_welcome_message(&format!("Welcome back, {}", account_ref.first_name()));
        self.sink.show_date(self.clock.now(), account_ref.style());
        self.sink.set_app_visible(true);
        drop(account_ref);

        self.sink.show_countdown(self.session.remaining_secs());
        self.refresh(&account);
        self.sink.hide_login_form();
        self.sink.show_logout_control();
        Ok(())
    }

    fn require_session(&self, intent: &'static str) -> Result<SharedAccount, DashboardError> {
        self.session
            .active()
            .cloned()
            .ok_or(DashboardError::NoActiveSession { intent })
    }

    fn restart_countdown(&mut self) {
        self.session.reset_idle_timer(&mut self.events);
        self.sink.show_countdown(self.session.remaining_secs());
    }

    fn refresh(&mut self, account: &SharedAccount) {
        let account = account.borrow();
        let style = account.style();
        self.sink
            .show_movements(&order_for_display(&account, self.session.is_sorted()), style);
        self.sink.show_balance(balance_of(&account), style);
        self.sink.show_summary(&summary_of(&account), style);
    }

    fn render_logged_out(&mut self) {
        self.sink.set_app_visible(false);
        self.sink.hide_logout_control();
        self.sink.show_login_form();
        self.sink.set_welcome_message(LOGGED_OUT_WELCOME);
    }
}
