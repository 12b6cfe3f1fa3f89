//! Demo accounts the dashboard starts with.

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::account::Account;
use crate::account::AccountStyle;
use crate::account::Pin;

#[derive(thiserror::Error, Debug)]
pub enum SeedError {
    #[error("invalid movement date={date:?} for owner={owner}")]
    InvalidDate {
        owner: &'static str,
        date: &'static str,
        #[source]
        source: chrono::ParseError,
    },
}

struct SeedAccount {
    owner: &'static str,
    pin: u32,
    /// Percentage, as `(mantissa, scale)`.
    interest_rate: (i64, u32),
    currency: &'static str,
    locale: &'static str,
    /// `(cents, RFC 3339 date)` pairs.
    history: &'static [(i64, &'static str)],
}

const SEED_ACCOUNTS: &[SeedAccount] = &[
    SeedAccount {
        owner: "Jonas Schmedtmann",
        pin: 1111,
        interest_rate: (12, 1),
        currency: "EUR",
        locale: "pl-PL",
        history: &[
            (20_000, "2019-11-18T21:31:17.178Z"),
            (45_523, "2019-12-23T07:42:02.383Z"),
            (-30_650, "2020-01-28T09:15:04.904Z"),
            (2_500_000, "2020-04-01T10:17:24.185Z"),
            (-64_221, "2023-02-19T14:11:59.604Z"),
            (-13_390, "2023-02-20T17:01:17.194Z"),
            (7_997, "2023-02-22T23:36:17.929Z"),
            (130_000, "2023-02-26T10:51:36.790Z"),
        ],
    },
    SeedAccount {
        owner: "Jessica Davis",
        pin: 2222,
        interest_rate: (15, 1),
        currency: "USD",
        locale: "en-US",
        history: &[
            (500_000, "2019-11-01T13:15:33.035Z"),
            (340_000, "2019-11-30T09:48:16.867Z"),
            (-15_000, "2019-12-25T06:04:23.907Z"),
            (-79_000, "2020-01-25T14:18:46.235Z"),
            (-321_000, "2020-02-05T16:33:06.386Z"),
            (-100_000, "2020-04-10T14:43:26.374Z"),
            (850_000, "2020-06-25T18:49:59.371Z"),
            (-3_000, "2020-07-26T12:01:20.894Z"),
        ],
    },
];

/// Builds the demo accounts. Usernames are assigned by [`crate::account::AccountStore::new`].
///
/// # Errors
///
/// Returns [`SeedError::InvalidDate`] if a seed movement date is not valid RFC 3339.
pub fn seed_accounts() -> Result<Vec<Account>, SeedError> {
    SEED_ACCOUNTS.iter().map(build_account).collect()
}

fn build_account(seed: &SeedAccount) -> Result<Account, SeedError> {
    let history = seed
        .history
        .iter()
        .map(|&(cents, date)| -> Result<_, SeedError> {
            let date = DateTime::parse_from_rfc3339(date)
                .map_err(|source| SeedError::InvalidDate {
                    owner: seed.owner,
                    date,
                    source,
                })?
                .with_timezone(&Utc);
            Ok((Decimal::new(cents, 2), date))
        })
        .collect::<Result<Vec<_>, SeedError>>()?;

    let (mantissa, scale) = seed.interest_rate;
    Ok(Account::new(
        seed.owner,
        Pin(seed.pin),
        Decimal::new(mantissa, scale),
        AccountStyle {
            currency: seed.currency.to_owned(),
            locale: seed.locale.to_owned(),
        },
        history,
    ))
}
