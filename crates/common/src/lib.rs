//! Common utilities and shared types for the grievance backend.
//!
//! This crate provides foundational components used across all workspace crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Reference numbers**: Citizen-facing complaint references via [`generate_reference_number`]
//! - **Storage**: Local file storage for attachments and certificates
//!
//! # Example
//!
//! ```no_run
//! use grievance_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod reference;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use reference::generate_reference_number;
pub use storage::{LocalStorage, StorageBackend, StoredFile, sanitize_file_name};
