use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;

/// Username derived from the owner's initials, used for lookup and transfer addressing.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, parse_display::Display, parse_display::FromStr)]
#[display("{0}")]
pub struct Username(pub String);

impl From<&str> for Username {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Numeric shared secret checked on login and close.
#[derive(Clone, Copy, PartialEq, Eq, parse_display::FromStr)]
#[display("{0}")]
pub struct Pin(pub u32);

impl std::fmt::Debug for Pin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Pin(****)")
    }
}

/// Formatting hints carried by an account. Opaque to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountStyle {
    pub currency: String,
    pub locale: String,
}

#[derive(Debug, Clone)]
pub struct Account {
    pub(in crate::account) owner: String,
    pub(in crate::account) username: Username,
    pub(in crate::account) pin: Pin,
    pub(in crate::account) movements: Vec<Decimal>,
    pub(in crate::account) movement_dates: Vec<DateTime<Utc>>,
    pub(in crate::account) interest_rate: Decimal,
    pub(in crate::account) style: AccountStyle,
}

impl Account {
    /// Builds an account from `(amount, date)` pairs.
    ///
    /// The username stays empty until [`crate::account::assign_usernames`] runs over the account.
    pub fn new(
        owner: impl Into<String>,
        pin: Pin,
        interest_rate: Decimal,
        style: AccountStyle,
        history: impl IntoIterator<Item = (Decimal, DateTime<Utc>)>,
    ) -> Self {
        let (movements, movement_dates) = history.into_iter().unzip();
        Self {
            owner: owner.into(),
            username: Username(String::new()),
            pin,
            movements,
            movement_dates,
            interest_rate,
            style,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// First whitespace-separated token of the owner name.
    pub fn first_name(&self) -> &str {
        self.owner.split_whitespace().next().unwrap_or_default()
    }

    pub const fn username(&self) -> &Username {
        &self.username
    }

    pub const fn pin(&self) -> Pin {
        self.pin
    }

    pub fn movements(&self) -> &[Decimal] {
        &self.movements
    }

    pub fn movement_dates(&self) -> &[DateTime<Utc>] {
        &self.movement_dates
    }

    pub const fn interest_rate(&self) -> Decimal {
        self.interest_rate
    }

    pub const fn style(&self) -> &AccountStyle {
        &self.style
    }
}
