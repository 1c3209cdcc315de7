//! Declarative field validation for request types.
//!
//! Every request type implements [`Validate`]. Implementations list their
//! fields on a [`Fields`] collector, one rule chain per field; the collector
//! keeps going after the first failure so a single [`ValidationErrors`]
//! names every invalid field at once.
//!
//! ```
//! use akamai_core::validate::{one_of, required, Fields};
//!
//! let enrollment_id = 0_i64;
//! let interval = 45_u32;
//! let err = Fields::new()
//!     .check("enrollment_id", required(&enrollment_id))
//!     .check("interval", one_of(&interval, &[30, 60]))
//!     .finish()
//!     .unwrap_err();
//! assert_eq!(err.to_string(), "enrollment_id: cannot be blank; interval: must be a valid value");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Implemented by every request type and nested request aggregate.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            Some(inner) => inner.validate(),
            None => Ok(()),
        }
    }
}

/// A single broken constraint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("cannot be blank")]
    Blank,
    #[error("must be a valid value")]
    NotAllowed,
    #[error("must be blank")]
    NotBlank,
    #[error("must be no less than {0}")]
    BelowMinimum(i64),
    #[error("must be in a valid format")]
    Format,
}

/// Every violation found on one request, keyed by field path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Violation>,
}

impl ValidationErrors {
    pub fn get(&self, field: &str) -> Option<&Violation> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Field paths in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, violation)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Collects per-field outcomes into one `ValidationErrors`.
#[derive(Debug, Default)]
#[must_use]
pub struct Fields {
    errors: BTreeMap<String, Violation>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(mut self, field: &str, outcome: Result<(), Violation>) -> Self {
        if let Err(violation) = outcome {
            self.errors.insert(field.to_string(), violation);
        }
        self
    }

    /// Merges a nested aggregate's errors under `field.` prefixed paths.
    pub fn nested(mut self, field: &str, outcome: Result<(), ValidationErrors>) -> Self {
        if let Err(inner) = outcome {
            for (path, violation) in inner.fields {
                self.errors.insert(format!("{field}.{path}"), violation);
            }
        }
        self
    }

    /// Validates each element, addressing them as `field[i]`.
    pub fn each<T: Validate>(mut self, field: &str, items: &[T]) -> Self {
        for (i, item) in items.iter().enumerate() {
            self = self.nested(&format!("{field}[{i}]"), item.validate());
        }
        self
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors {
                fields: self.errors,
            })
        }
    }
}

/// Zero-value test behind the `required` rule.
pub trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for str {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Blank for Option<T> {
    fn is_blank(&self) -> bool {
        self.is_none()
    }
}

impl<T> Blank for Vec<T> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Blank + ?Sized> Blank for &T {
    fn is_blank(&self) -> bool {
        (**self).is_blank()
    }
}

macro_rules! blank_when_zero {
    ($($ty:ty),+) => {
        $(impl Blank for $ty {
            fn is_blank(&self) -> bool {
                *self == 0
            }
        })+
    };
}

blank_when_zero!(i32, i64, u16, u32, u64);

/// Non-zero, non-empty.
pub fn required<T: Blank + ?Sized>(value: &T) -> Result<(), Violation> {
    if value.is_blank() {
        Err(Violation::Blank)
    } else {
        Ok(())
    }
}

/// Membership in `allowed`. Blank values pass; pair with `required` when
/// the field is mandatory.
pub fn one_of<T: Blank + PartialEq>(value: &T, allowed: &[T]) -> Result<(), Violation> {
    if value.is_blank() || allowed.contains(value) {
        Ok(())
    } else {
        Err(Violation::NotAllowed)
    }
}

/// Membership in a wire enum's closed constant set. Blank values pass.
pub fn known<T: WireEnum>(value: &T) -> Result<(), Violation> {
    if value.is_blank() || value.is_known() {
        Ok(())
    } else {
        Err(Violation::NotAllowed)
    }
}

/// `required` when `condition` holds.
pub fn required_when<T: Blank + ?Sized>(condition: bool, value: &T) -> Result<(), Violation> {
    if condition {
        required(value)
    } else {
        Ok(())
    }
}

/// The field is forbidden when `condition` holds.
pub fn blank_when<T: Blank + ?Sized>(condition: bool, value: &T) -> Result<(), Violation> {
    if condition && !value.is_blank() {
        Err(Violation::NotBlank)
    } else {
        Ok(())
    }
}

pub fn at_least(value: i64, min: i64) -> Result<(), Violation> {
    if value < min {
        Err(Violation::BelowMinimum(min))
    } else {
        Ok(())
    }
}

static HEADER_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("header name pattern compiles"));

/// HTTP header token made of ASCII letters, digits, `_` and `-`. Blank
/// values pass.
pub fn header_name(value: &str) -> Result<(), Violation> {
    if value.is_empty() || HEADER_NAME_RE.is_match(value) {
        Ok(())
    } else {
        Err(Violation::Format)
    }
}

/// Closed string enumerations that keep out-of-set values around so that
/// validation can reject them.
pub trait WireEnum: Blank {
    fn as_str(&self) -> &str;
    fn is_known(&self) -> bool;
}

/// Declares a wire enum: one variant per documented constant plus
/// `Other(String)` for anything else. Serializes as the bare wire string.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value outside the documented set. The empty string means unset.
            Other(String),
        }

        impl $name {
            pub const WIRE_VALUES: &'static [&'static str] = &[$($wire),+];

            pub fn as_str(&self) -> &str {
                match self {
                    $( $name::$variant => $wire, )+
                    $name::Other(value) => value,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::Other(String::new())
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                match value {
                    $( $wire => $name::$variant, )+
                    other => $name::Other(other.to_string()),
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                $name::from(value.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $crate::validate::Blank for $name {
            fn is_blank(&self) -> bool {
                self.as_str().is_empty()
            }
        }

        impl $crate::validate::WireEnum for $name {
            fn as_str(&self) -> &str {
                $name::as_str(self)
            }

            fn is_known(&self) -> bool {
                !matches!(self, $name::Other(_))
            }
        }
    };
}

pub(crate) use wire_enum;
