mod habit;
mod metrics;
mod repository;
mod user;

// Publicly expose the Metrics abstraction
pub use metrics::{Metrics, MetricsPtr};

// Publicly expose the persistence abstractions
pub use habit::{Habit, HabitFilter, NewHabit};
pub use repository::{Repository, RepositoryPtr};
pub use user::{validate_credentials, validate_username, User, MIN_USERNAME_LEN};
