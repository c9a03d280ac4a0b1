//! The Django field type table.
//!
//! Every supported Django field type is a [`SourceFieldType`]; its
//! [`TypeMapping`] says which column type it becomes, which column options it
//! starts with, and whether it needs an advisory.

use std::fmt;
use std::str::FromStr;

use dr_core::{Advisory, AdvisoryKind, TargetType, Value};

/// A Django field type the converter knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum SourceFieldType {
    AutoField,
    BigIntegerField,
    BooleanField,
    CharField,
    DateField,
    DateTimeField,
    DecimalField,
    EmailField,
    FileField,
    FilePathField,
    FloatField,
    GenericIPAddressField,
    IntegerField,
    IPAddressField,
    NullBooleanField,
    PositiveIntegerField,
    PositiveSmallIntegerField,
    SlugField,
    SmallIntegerField,
    TextField,
    TimeField,
    URLField,
    ForeignKey,
    OneToOneField,
    ManyToManyField,
}

/// Column defaults of a mapping, in render order.
pub type DefaultOptions = &'static [(&'static str, Value)];

/// What a Django field type turns into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeMapping {
    /// Column type.
    pub target_type: TargetType,

    /// Options every column of this type starts with.
    pub defaults: DefaultOptions,

    /// Whether the column gets an index.
    pub indexed: bool,

    /// Whether the column name is the field name plus `_id`.
    pub id_suffix: bool,

    /// Advisory raised for every field of this type.
    pub advisory: Option<AdvisoryTemplate>,
}

/// An advisory attached to a field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisoryTemplate {
    /// The type is stored as a plain column; validation is left to the model.
    ///
    /// Holds the type name with its indefinite article (`an EmailField`).
    NeedsModelSupport(&'static str),

    /// Rails has no unsigned integer column.
    Unsigned,
}

impl AdvisoryTemplate {
    /// Renders the advisory for `model#field`.
    #[must_use]
    pub fn render(self, model: &str, field: &str) -> Advisory {
        match self {
            Self::NeedsModelSupport(described) => Advisory::new(
                AdvisoryKind::SpecialHandling,
                format!(
                    "`{model}#{field}` is {described}, which may need to be accounted for in the model"
                ),
            ),
            Self::Unsigned => Advisory::new(
                AdvisoryKind::SpecialHandling,
                format!("`{model}#{field}` is unsigned"),
            ),
        }
    }
}

const NO_DEFAULTS: DefaultOptions = &[];
const LIMIT_3: DefaultOptions = &[("limit", Value::Integer(3))];
const LIMIT_8: DefaultOptions = &[("limit", Value::Integer(8))];
const LIMIT_50: DefaultOptions = &[("limit", Value::Integer(50))];
const NOT_NULL: DefaultOptions = &[("null", Value::Bool(false))];
const NULLABLE: DefaultOptions = &[("null", Value::Bool(true))];

impl TypeMapping {
    const fn column(target_type: TargetType) -> Self {
        Self {
            target_type,
            defaults: NO_DEFAULTS,
            indexed: false,
            id_suffix: false,
            advisory: None,
        }
    }

    const fn with_defaults(mut self, defaults: DefaultOptions) -> Self {
        self.defaults = defaults;
        self
    }

    const fn with_advisory(mut self, advisory: AdvisoryTemplate) -> Self {
        self.advisory = Some(advisory);
        self
    }

    const fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    const fn reference() -> Self {
        let mut mapping = Self::column(TargetType::Integer).indexed();
        mapping.id_suffix = true;
        mapping
    }
}

impl SourceFieldType {
    /// Every known type, in table order.
    pub const ALL: [Self; 25] = [
        Self::AutoField,
        Self::BigIntegerField,
        Self::BooleanField,
        Self::CharField,
        Self::DateField,
        Self::DateTimeField,
        Self::DecimalField,
        Self::EmailField,
        Self::FileField,
        Self::FilePathField,
        Self::FloatField,
        Self::GenericIPAddressField,
        Self::IntegerField,
        Self::IPAddressField,
        Self::NullBooleanField,
        Self::PositiveIntegerField,
        Self::PositiveSmallIntegerField,
        Self::SlugField,
        Self::SmallIntegerField,
        Self::TextField,
        Self::TimeField,
        Self::URLField,
        Self::ForeignKey,
        Self::OneToOneField,
        Self::ManyToManyField,
    ];

    /// Returns the Django class name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AutoField => "AutoField",
            Self::BigIntegerField => "BigIntegerField",
            Self::BooleanField => "BooleanField",
            Self::CharField => "CharField",
            Self::DateField => "DateField",
            Self::DateTimeField => "DateTimeField",
            Self::DecimalField => "DecimalField",
            Self::EmailField => "EmailField",
            Self::FileField => "FileField",
            Self::FilePathField => "FilePathField",
            Self::FloatField => "FloatField",
            Self::GenericIPAddressField => "GenericIPAddressField",
            Self::IntegerField => "IntegerField",
            Self::IPAddressField => "IPAddressField",
            Self::NullBooleanField => "NullBooleanField",
            Self::PositiveIntegerField => "PositiveIntegerField",
            Self::PositiveSmallIntegerField => "PositiveSmallIntegerField",
            Self::SlugField => "SlugField",
            Self::SmallIntegerField => "SmallIntegerField",
            Self::TextField => "TextField",
            Self::TimeField => "TimeField",
            Self::URLField => "URLField",
            Self::ForeignKey => "ForeignKey",
            Self::OneToOneField => "OneToOneField",
            Self::ManyToManyField => "ManyToManyField",
        }
    }

    /// Returns the column mapping, or `None` for types that produce no column.
    ///
    /// `ManyToManyField` is the only such type; it becomes an association.
    #[must_use]
    pub const fn mapping(self) -> Option<TypeMapping> {
        use AdvisoryTemplate::{NeedsModelSupport, Unsigned};

        let mapping = match self {
            Self::AutoField => TypeMapping::column(TargetType::Integer)
                .with_advisory(NeedsModelSupport("an AutoField")),
            Self::BigIntegerField => TypeMapping::column(TargetType::Integer).with_defaults(LIMIT_8),
            Self::BooleanField => TypeMapping::column(TargetType::Boolean).with_defaults(NOT_NULL),
            Self::CharField => TypeMapping::column(TargetType::String),
            Self::DateField => TypeMapping::column(TargetType::Date),
            Self::DateTimeField => TypeMapping::column(TargetType::Datetime),
            Self::DecimalField => TypeMapping::column(TargetType::Decimal),
            Self::EmailField => {
                TypeMapping::column(TargetType::String).with_advisory(NeedsModelSupport("an EmailField"))
            }
            Self::FileField => {
                TypeMapping::column(TargetType::String).with_advisory(NeedsModelSupport("a FileField"))
            }
            Self::FilePathField => {
                TypeMapping::column(TargetType::String).with_advisory(NeedsModelSupport("a FilePathField"))
            }
            Self::FloatField => TypeMapping::column(TargetType::Float),
            Self::GenericIPAddressField => TypeMapping::column(TargetType::String)
                .with_advisory(NeedsModelSupport("a GenericIPAddressField")),
            Self::IntegerField => TypeMapping::column(TargetType::Integer),
            Self::IPAddressField => {
                TypeMapping::column(TargetType::String).with_advisory(NeedsModelSupport("an IPAddressField"))
            }
            Self::NullBooleanField => TypeMapping::column(TargetType::Boolean).with_defaults(NULLABLE),
            Self::PositiveIntegerField => TypeMapping::column(TargetType::Integer).with_advisory(Unsigned),
            Self::PositiveSmallIntegerField => TypeMapping::column(TargetType::Integer)
                .with_defaults(LIMIT_3)
                .with_advisory(Unsigned),
            Self::SlugField => TypeMapping::column(TargetType::String)
                .with_defaults(LIMIT_50)
                .indexed(),
            Self::SmallIntegerField => TypeMapping::column(TargetType::Integer).with_defaults(LIMIT_3),
            Self::TextField => TypeMapping::column(TargetType::Text),
            Self::TimeField => TypeMapping::column(TargetType::Time),
            Self::URLField => {
                TypeMapping::column(TargetType::String).with_advisory(NeedsModelSupport("a URLField"))
            }
            Self::ForeignKey | Self::OneToOneField => TypeMapping::reference(),
            Self::ManyToManyField => return None,
        };
        Some(mapping)
    }

    /// Returns `true` for types that become a `belongs_to` association.
    #[must_use]
    pub const fn is_reference(self) -> bool {
        matches!(self, Self::ForeignKey | Self::OneToOneField)
    }
}

impl FromStr for SourceFieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or(UnknownFieldType)
    }
}

impl fmt::Display for SourceFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The name is not in the type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownFieldType;
