use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::account::AccountStore;
use crate::account::Pin;
use crate::account::SharedAccount;
use crate::account::Username;
use crate::engine::settlement::Settlement;
use crate::ledger::balance_of;
use crate::ledger::fits_movement;
use crate::scheduler::EventLoop;
use crate::scheduler::Tick;
use crate::scheduler::TimerId;
use crate::session::SessionError;
use crate::session::SessionManager;

#[cfg(test)]
#[path = "tests/transaction_service_tests.rs"]
mod transaction_service_tests;

/// Share of a requested loan that at least one past movement must reach.
const LOAN_QUALIFYING_DIVISOR: Decimal = Decimal::TEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, parse_display::Display)]
#[display(style = "lowercase")]
pub enum Operation {
    Transfer,
    Loan,
}

#[derive(Debug, Clone, PartialEq, Eq, parse_display::Display)]
pub enum RejectReason {
    #[display("amount missing or not positive")]
    NonPositiveAmount,
    #[display("unknown recipient {0}")]
    UnknownRecipient(Username),
    #[display("sender and recipient are the same account")]
    SelfTransfer,
    #[display("insufficient funds, balance={balance} amount={amount}")]
    InsufficientFunds { balance: Decimal, amount: Decimal },
    #[display("no movement reaches {threshold}")]
    NoQualifyingMovement { threshold: Decimal },
    #[display("amount={amount} would overflow the ledger of {account}")]
    LedgerOverflow { account: Username, amount: Decimal },
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TransactionError {
    #[error("{operation} rejected: {reason}")]
    Rejected { operation: Operation, reason: RejectReason },
}

/// Validates transfers and loans and queues their settlement on the event loop.
#[derive(Debug, Clone, Copy)]
pub struct TransactionService {
    settlement_delay: Tick,
}

impl TransactionService {
    pub const fn new(settlement_delay: Tick) -> Self {
        Self { settlement_delay }
    }

    /// Queues a transfer of `amount` from `from` to the account named `to`.
    ///
    /// Nothing is recorded until the returned settlement timer fires.
    /// A `None` amount stands for input text that did not convert to a number.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::Rejected`] if:
    /// - `amount` is missing or not positive.
    /// - No account is named `to`, or it is the sender itself.
    /// - The sender's balance is below `amount`.
    /// - Either ledger could no longer be totalled once `amount` is recorded.
    pub fn transfer<T: From<Settlement>>(
        &self,
        store: &AccountStore,
        from: &SharedAccount,
        to: &Username,
        amount: Option<Decimal>,
        events: &mut EventLoop<T>,
    ) -> Result<TimerId, TransactionError> {
        let reject = |reason: RejectReason| {
            tracing::warn!(%reason, "transfer rejected");
            TransactionError::Rejected {
                operation: Operation::Transfer,
                reason,
            }
        };

        let amount = amount
            .filter(|amount| *amount > Decimal::ZERO)
            .ok_or_else(|| reject(RejectReason::NonPositiveAmount))?;
        let recipient = store
            .find_by_username(to)
            .ok_or_else(|| reject(RejectReason::UnknownRecipient(to.clone())))?;
        if recipient.borrow().username() == from.borrow().username() {
            return Err(reject(RejectReason::SelfTransfer));
        }
        let balance = balance_of(&from.borrow());
        if balance < amount {
            return Err(reject(RejectReason::InsufficientFunds { balance, amount }));
        }
        for (account, movement) in [(from, -amount), (&recipient, amount)] {
            let account = account.borrow();
            if !fits_movement(&account, movement) {
                return Err(reject(RejectReason::LedgerOverflow {
                    account: account.username().clone(),
                    amount,
                }));
            }
        }

        let settlement = Settlement::Transfer {
            from: from.clone(),
            to: recipient,
            amount,
        };
        tracing::info!(%settlement, delay = self.settlement_delay, "transfer accepted");
        Ok(events.schedule(self.settlement_delay, T::from(settlement)))
    }

    /// Queues a loan of `amount` rounded down to a whole unit.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::Rejected`] if:
    /// - The rounded amount is missing or not positive.
    /// - No single movement of the account reaches a tenth of the rounded amount.
    /// - The account's ledger could no longer be totalled once the loan is recorded.
    pub fn grant_loan<T: From<Settlement>>(
        &self,
        account: &SharedAccount,
        amount: Option<Decimal>,
        events: &mut EventLoop<T>,
    ) -> Result<TimerId, TransactionError> {
        let reject = |reason: RejectReason| {
            tracing::warn!(%reason, "loan rejected");
            TransactionError::Rejected {
                operation: Operation::Loan,
                reason,
            }
        };

        let amount = amount
            .map(|amount| amount.floor())
            .filter(|amount| *amount > Decimal::ZERO)
            .ok_or_else(|| reject(RejectReason::NonPositiveAmount))?;
        let threshold = amount / LOAN_QUALIFYING_DIVISOR;
        if !account.borrow().movements().iter().any(|mov| *mov >= threshold) {
            return Err(reject(RejectReason::NoQualifyingMovement { threshold }));
        }
        if !fits_movement(&account.borrow(), amount) {
            return Err(reject(RejectReason::LedgerOverflow {
                account: account.borrow().username().clone(),
                amount,
            }));
        }

        let settlement = Settlement::Loan {
            account: account.clone(),
            amount,
        };
        tracing::info!(%settlement, delay = self.settlement_delay, "loan accepted");
        Ok(events.schedule(self.settlement_delay, T::from(settlement)))
    }

    /// Removes the account of the active session and ends the session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidCredentials`] if nobody is logged in or `username` and
    /// `pin` do not match the active account. Nothing is removed in that case.
    pub fn close_account<T>(
        &self,
        store: &mut AccountStore,
        session: &mut SessionManager,
        username: &Username,
        pin: Option<Pin>,
        events: &mut EventLoop<T>,
    ) -> Result<SharedAccount, SessionError> {
        let matches = session.active().is_some_and(|active| {
            let active = active.borrow();
            active.username() == username && Some(active.pin()) == pin
        });
        if !matches {
            tracing::warn!(%username, "close rejected");
            return Err(SessionError::InvalidCredentials {
                username: username.clone(),
            });
        }

        let closed = store.remove(username).ok_or_else(|| SessionError::InvalidCredentials {
            username: username.clone(),
        })?;
        session.logout(events);
        tracing::info!(%username, "account closed");
        Ok(closed)
    }

    /// Records the movements of a settlement whose delay elapsed.
    ///
    /// Settlements apply to the account records they captured, whether or not those are still
    /// in the store or part of a session.
    pub fn settle(&self, settlement: &Settlement, now: DateTime<Utc>) {
        settlement.apply(now);
        tracing::info!(%settlement, "settlement recorded");
    }
}
