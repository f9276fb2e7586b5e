//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML), or ClientConfig built in code
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → schema.rs ClientConfig::normalized (zero values → defaults)
//!     → FleetClientBuilder::config
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the client is built
//! - All fields have defaults to allow minimal configs
//! - Transports are not configuration; they are handed to the builder

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::ClientConfig;
