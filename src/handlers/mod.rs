mod auth;
mod activities;
mod dashboard;
mod templates;

pub use auth::{serve_login_page, serve_register_page, handle_login, handle_register, handle_logout};
pub use activities::{list_activities, add_time, create_activity, remove_activity, zero_all_activities, zero_activity};
pub use dashboard::{serve_index, get_chart};
