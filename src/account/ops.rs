//! Free functions that mutate a supplied [`Account`].
//!
//! Movements and their dates are only ever appended together through [`record_movement`],
//! so the two sequences keep the same length and index correspondence.

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::account::Account;
use crate::account::Username;

/// Derives a [`Username`] from the lowercase first character of every whitespace-separated
/// token of `owner`.
pub fn derive_username(owner: &str) -> Username {
    Username(
        owner
            .split_whitespace()
            .filter_map(|token| token.chars().next())
            .flat_map(char::to_lowercase)
            .collect(),
    )
}

/// Assigns every account its [`Username`] derived from the owner name.
pub fn assign_usernames<'a, I>(accounts: I)
where
    I: IntoIterator<Item = &'a mut Account>,
{
    for account in accounts {
        account.username = derive_username(&account.owner);
    }
}

/// Appends a signed `amount` stamped with `date` to the account history.
pub fn record_movement(account: &mut Account, amount: Decimal, date: DateTime<Utc>) {
    account.movements.push(amount);
    account.movement_dates.push(date);
}
