//! Core business logic for the grievance backend.

pub mod services;

pub use services::*;
