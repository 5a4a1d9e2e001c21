mod json_file;
mod credential_store;
mod ledger_store;
mod ledger_backend;

pub use credential_store::CredentialStore;
pub use ledger_store::{LedgerStore, JsonFileLedgerStore, InMemoryLedgerStore, LedgerService};
pub use ledger_backend::{LedgerBackend, CookieLedger, USER_SESSION_KEY};
