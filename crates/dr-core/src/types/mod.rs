//! Domain types for the django2rails converter.
//!
//! # Module Organization
//!
//! - [`source`] - Django models and fields as extracted from text
//! - [`value`] - Normalised literal values in the Ruby literal space
//! - [`target`] - Rails columns, associations and models
//! - [`advisory`] - Non-fatal conversion notes
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use dr_core::{SourceModel, TargetModel, Value, Advisory};
//! ```

mod advisory;
mod source;
mod target;
mod value;

pub use advisory::{Advisory, AdvisoryKind, Translated};
pub use source::{Arguments, SourceField, SourceModel};
pub use target::{
    Association, AssociationGroup, AssociationKind, Associations, Options, TargetField,
    TargetModel, TargetType,
};
pub use value::Value;
