// Gateway module - controls public API for handlers
// Modules are private, only exported symbols are public. The resource
// modules are crate-visible so `docs.rs` can reach their OpenAPI path items.

mod auth;
pub(crate) mod habits;
mod health;
mod metrics;
mod root;
pub(crate) mod shared_types;
pub(crate) mod users;

// Core handlers
pub use health::health_check;
pub use metrics::{metrics_handler, track_http_requests};
pub use root::root_handler;

// Habit CRUD handlers
pub use habits::{create_habit, delete_habit, get_habit, list_habits, update_habit};

// User account handlers
pub use users::{login, logout, register};
