//! BDD step definitions for the homework bot

pub mod lifecycle_steps;
pub mod notification_steps;
