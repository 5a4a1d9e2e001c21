mod user;
mod forms;
mod ledger;

pub use user::UserRecord;
pub use forms::{LoginForm, RegisterForm, AuthQuery, AddTimeRequest, ActivityNameRequest, ActivityRequest};
pub use ledger::Ledger;
