//! Core types, errors, and utilities for the django2rails converter.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - [`ConfigError`] for configuration failures
//! - [`RunConfig`] describing a single conversion run
//! - Source-side types ([`SourceModel`], [`SourceField`], [`Arguments`])
//! - Target-side types ([`TargetModel`], [`TargetField`], [`Associations`])
//! - [`Advisory`] notes and the [`Translated`] result wrapper
//! - The [`Inflector`] capability and its English implementation

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod inflect;
pub mod types;

pub use config::RunConfig;
pub use error::ConfigError;
pub use inflect::{EnglishInflector, Inflector};
pub use types::{
    Advisory, AdvisoryKind, Arguments, Association, AssociationGroup, AssociationKind,
    Associations, Options, SourceField, SourceModel, TargetField, TargetModel, TargetType,
    Translated, Value,
};
