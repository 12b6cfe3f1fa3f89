//! Pure derivations over an [`Account`] history.
//!
//! Nothing here mutates the account; callers re-derive on every refresh.

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::account::Account;

#[cfg(test)]
#[path = "ledger/tests/ledger_tests.rs"]
mod ledger_tests;

/// Smallest single interest contribution that counts towards [`Summary::interest`].
pub const MIN_INTEREST_CONTRIBUTION: Decimal = Decimal::ONE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, parse_display::Display)]
#[display("summary=(income={income} expense={expense} interest={interest})")]
pub struct Summary {
    pub income: Decimal,
    pub expense: Decimal,
    pub interest: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, parse_display::Display)]
#[display(style = "lowercase")]
pub enum MovementKind {
    Deposit,
    Withdrawal,
}

/// A movement paired with its own date, as shown in the movements list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementEntry {
    /// Zero-based position in the account's insertion order.
    pub position: usize,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
}

impl MovementEntry {
    pub fn kind(&self) -> MovementKind {
        if self.amount > Decimal::ZERO {
            MovementKind::Deposit
        } else {
            MovementKind::Withdrawal
        }
    }
}

/// Sum of the account's movements.
///
/// Saturates at the `Decimal` bounds. Histories accepted through [`fits_movement`] never reach
/// them.
pub fn balance_of(account: &Account) -> Decimal {
    saturating_total(account.movements().iter().copied())
}

pub fn summary_of(account: &Account) -> Summary {
    let rate = account.interest_rate();
    let deposits = || account.movements().iter().copied().filter(|mov| *mov > Decimal::ZERO);

    let income = saturating_total(deposits());
    let expense = saturating_total(account.movements().iter().copied().filter(|mov| *mov < Decimal::ZERO)).abs();
    let interest = saturating_total(
        deposits()
            .map(|deposit| deposit.saturating_mul(rate) / Decimal::ONE_HUNDRED)
            .filter(|contribution| *contribution >= MIN_INTEREST_CONTRIBUTION),
    );

    Summary {
        income,
        expense,
        interest,
    }
}

/// Whether `amount` can be appended to the account's history with [`balance_of`] and
/// [`summary_of`] still computed without overflow.
pub fn fits_movement(account: &Account, amount: Decimal) -> bool {
    let rate = account.interest_rate();
    let movements = || account.movements().iter().copied().chain(std::iter::once(amount));
    let deposits = || movements().filter(|mov| *mov > Decimal::ZERO);

    checked_total(movements()).is_some()
        && checked_total(deposits()).is_some()
        && checked_total(movements().filter(|mov| *mov < Decimal::ZERO)).is_some()
        && deposits()
            .try_fold(Decimal::ZERO, |interest, deposit| {
                let contribution = deposit.checked_mul(rate)? / Decimal::ONE_HUNDRED;
                if contribution >= MIN_INTEREST_CONTRIBUTION {
                    interest.checked_add(contribution)
                } else {
                    Some(interest)
                }
            })
            .is_some()
}

fn checked_total(mut amounts: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    amounts.try_fold(Decimal::ZERO, Decimal::checked_add)
}

fn saturating_total(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Returns the account's movements paired with their dates.
///
/// With `ascending` the entries are ordered by amount (stable on ties), otherwise they keep
/// insertion order. Each entry carries the date recorded at its original position.
pub fn order_for_display(account: &Account, ascending: bool) -> Vec<MovementEntry> {
    let mut entries: Vec<MovementEntry> = account
        .movements()
        .iter()
        .zip(account.movement_dates())
        .enumerate()
        .map(|(position, (amount, date))| MovementEntry {
            position,
            amount: *amount,
            date: *date,
        })
        .collect();

    if ascending {
        entries.sort_by_key(|entry| entry.amount);
    }
    entries
}
