mod accounts;
mod store;
mod types;

pub use accounts::Upsert;
pub use store::AccountStore;
pub use types::*;
