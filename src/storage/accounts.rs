use tracing::debug;

use crate::error::{Error, Result};

use super::types::{Account, ConfigStore};

/// Result of [`ConfigStore::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Added,
    Replaced,
}

impl ConfigStore {
    pub fn find_by_name(&self, name: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.name == name)
    }

    pub fn list_names(&self) -> Vec<String> {
        self.accounts.iter().map(|a| a.name.clone()).collect()
    }

    /// Account referenced by `current_account`. A dangling reference reads as
    /// no current account.
    pub fn current(&self) -> Option<&Account> {
        if self.current_account.is_empty() {
            return None;
        }
        self.find_by_name(&self.current_account)
    }

    pub fn is_current(&self, name: &str) -> bool {
        self.current().is_some_and(|a| a.name == name)
    }

    /// Insert or overwrite by name. Overwrites keep their position; the first
    /// account added to an empty store becomes current.
    pub fn upsert(&mut self, mut account: Account) -> Upsert {
        if let Some(existing) = self.accounts.iter_mut().find(|a| a.name == account.name) {
            debug!(account = %account.name, "replacing existing account");
            account.is_default = existing.is_default;
            *existing = account;
            return Upsert::Replaced;
        }

        if self.accounts.is_empty() {
            account.is_default = true;
            self.current_account = account.name.clone();
        }
        debug!(account = %account.name, "adding account");
        self.accounts.push(account);
        Upsert::Added
    }

    pub fn set_current(&mut self, name: &str) -> Result<()> {
        if self.find_by_name(name).is_none() {
            return Err(Error::account_not_found(name));
        }
        self.current_account = name.to_string();
        for account in &mut self.accounts {
            account.is_default = account.name == name;
        }
        Ok(())
    }

    /// Remove an account. When it was current, the first remaining account
    /// (if any) takes over.
    pub fn remove(&mut self, name: &str) -> Result<Account> {
        let idx = self
            .accounts
            .iter()
            .position(|a| a.name == name)
            .ok_or_else(|| Error::account_not_found(name))?;
        let removed = self.accounts.remove(idx);

        if self.current_account == name {
            match self.accounts.first().map(|a| a.name.clone()) {
                Some(next) => self.set_current(&next)?,
                None => self.current_account.clear(),
            }
        }
        Ok(removed)
    }

    /// Error message listing the configured accounts, for unknown names.
    pub fn not_found_message(&self, name: &str) -> String {
        if self.accounts.is_empty() {
            "No accounts configured. Use 'krakn add' to add accounts first".to_string()
        } else {
            format!(
                "Account '{}' not found. Available accounts: {}",
                name,
                self.list_names().join(", ")
            )
        }
    }
}
