//! # grove-client
//!
//! HTTP implementation of the grove remote sources against the tree-tracker
//! admin API.
//!
//! ## Configuration
//!
//! See [`config`] for the environment variables. Typical use:
//!
//! ```ignore
//! use std::sync::Arc;
//! use grove_client::TreeTrackerClient;
//! use grove_core::GrowerProfileAggregator;
//!
//! let client = TreeTrackerClient::from_env()?;
//! let profiles = GrowerProfileAggregator::new(Arc::new(client));
//! let outcome = profiles.request("42".parse()?, &[]).await;
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::TreeTrackerClient;
pub use config::{ClientConfig, ConfigError};
pub use error::ApiErrorCode;
