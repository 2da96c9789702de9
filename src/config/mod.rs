// src/config/mod.rs

//! Run configuration.
//!
//! - [`model`] holds the immutable [`Config`], the [`ExecOption`]s used to
//!   build it and the raw TOML file shape.
//! - [`builder`] applies options in order and rejects invalid values.
//! - [`validate`] / [`loader`] turn a TOML run file into a [`Config`].

pub mod builder;
pub mod loader;
pub mod model;
pub mod validate;

pub use builder::ConfigBuilder;
pub use loader::{load_and_validate, load_from_path};
pub use model::{Config, DEFAULT_SHELL, ExecOption, RawConfigFile};
