#![forbid(unsafe_code)]
//! referral-core library.
//!
//! Records, the profile lookup seam, the role priority table, configuration
//! and the on-disk record store shared by the ranking engine and the CLI.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums at library seams, `anyhow::Result` for
//!   config loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod lock;
pub mod lookup;
pub mod model;
pub mod role;
pub mod store;

pub use lookup::ProfileLookup;
pub use model::{Connection, Profile, Rating, UserRecord};
pub use role::RolePriority;
pub use store::{NetworkStore, StoreError};
