use std::cell::RefCell;
use std::rc::Rc;

pub mod model;
pub mod ops;

pub use model::Account;
pub use model::AccountStyle;
pub use model::Pin;
pub use model::Username;
pub use ops::assign_usernames;
pub use ops::derive_username;
pub use ops::record_movement;

/// Account handle shared between the store, the active session and pending settlements.
///
/// A handle outlives the account's removal from the store for as long as someone holds it.
pub type SharedAccount = Rc<RefCell<Account>>;

#[cfg(test)]
#[path = "account/tests/account_store_tests.rs"]
mod account_store_tests;

#[derive(Debug, Default)]
pub struct AccountStore(Vec<SharedAccount>);

impl AccountStore {
    /// Takes ownership of `accounts` and assigns their usernames.
    pub fn new(mut accounts: Vec<Account>) -> Self {
        assign_usernames(accounts.iter_mut());
        Self(accounts.into_iter().map(|account| Rc::new(RefCell::new(account))).collect())
    }

    pub fn find_by_username(&self, username: &Username) -> Option<SharedAccount> {
        self.0
            .iter()
            .find(|account| account.borrow().username() == username)
            .cloned()
    }

    /// Removes the first account matching `username`. Absent usernames are ignored.
    pub fn remove(&mut self, username: &Username) -> Option<SharedAccount> {
        let idx = self
            .0
            .iter()
            .position(|account| account.borrow().username() == username)?;
        Some(self.0.remove(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedAccount> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
