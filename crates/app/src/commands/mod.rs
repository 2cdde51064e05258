//! Commands - one wrapper per dashboard operation
//!
//! Each command times the underlying call and logs its outcome through
//! [`execute_command`](crate::utils::execute_command).

pub mod auth;
pub mod notifications;
pub mod projects;
pub mod tasks;
