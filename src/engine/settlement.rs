use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::account::SharedAccount;
use crate::account::record_movement;

/// An accepted operation waiting for its settlement delay to elapse.
#[derive(Debug, Clone)]
pub enum Settlement {
    Transfer {
        from: SharedAccount,
        to: SharedAccount,
        amount: Decimal,
    },
    Loan {
        account: SharedAccount,
        amount: Decimal,
    },
}

impl Settlement {
    pub(in crate::engine) fn apply(&self, now: DateTime<Utc>) {
        match self {
            Self::Transfer { from, to, amount } => {
                record_movement(&mut to.borrow_mut(), *amount, now);
                record_movement(&mut from.borrow_mut(), -*amount, now);
            }
            Self::Loan { account, amount } => record_movement(&mut account.borrow_mut(), *amount, now),
        }
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transfer { from, to, amount } => write!(
                f,
                "settlement=(transfer from={} to={} amount={amount})",
                from.borrow().username(),
                to.borrow().username()
            ),
            Self::Loan { account, amount } => {
                write!(f, "settlement=(loan account={} amount={amount})", account.borrow().username())
            }
        }
    }
}
