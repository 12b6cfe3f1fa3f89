//! User intents as read from the input source, and the conversion of their raw text fields.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Deserializer;

use crate::account::Pin;
use crate::scheduler::Tick;

/// One user action, with text fields exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Login { username: String, pin: String },
    Logout,
    Transfer { to: String, amount: String },
    Loan { amount: String },
    Close { username: String, pin: String },
    ToggleSort,
    /// Lets `secs` ticks of dashboard time elapse.
    Wait { secs: Tick },
}

impl Intent {
    /// Name safe to log: it never includes the PIN.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::Transfer { .. } => "transfer",
            Self::Loan { .. } => "loan",
            Self::Close { .. } => "close",
            Self::ToggleSort => "sort",
            Self::Wait { .. } => "wait",
        }
    }
}

/// Converts amount text to a number. Text that does not convert yields `None`.
///
/// Both plain (`12.5`) and scientific (`1e3`) notations are accepted.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Converts PIN text to a [`Pin`]. Text that does not convert yields `None`.
pub fn parse_pin(raw: &str) -> Option<Pin> {
    raw.trim().parse().ok()
}

impl<'de> Deserialize<'de> for Intent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct CsvRow {
            action: String,
            target: Option<String>,
            value: Option<String>,
        }

        let row = CsvRow::deserialize(deserializer)?;
        let target = row.target.unwrap_or_default();
        let value = row.value.unwrap_or_default();

        let intent = match row.action.as_str() {
            "login" => Self::Login {
                username: target,
                pin: value,
            },
            "logout" => Self::Logout,
            "transfer" => Self::Transfer {
                to: target,
                amount: value,
            },
            "loan" => Self::Loan { amount: value },
            "close" => Self::Close {
                username: target,
                pin: value,
            },
            "sort" => Self::ToggleSort,
            "wait" => Self::Wait {
                secs: value
                    .parse::<Tick>()
                    .map_err(|error| serde::de::Error::custom(format!("invalid wait secs={value:?} error={error}")))?,
            },
            other => {
                return Err(serde::de::Error::unknown_variant(
                    other,
                    &["login", "logout", "transfer", "loan", "close", "sort", "wait"],
                ));
            }
        };

        Ok(intent)
    }
}
