//! The type model shared across Rigel crates.
//!
//! This crate is intentionally small: primitive type tags, opaque class-name
//! descriptors, the `Unknown` sentinel, and the numeric widening lattice that
//! decides whether one numeric primitive may be used where another is
//! expected.

mod literals;

pub use literals::classify_number_literal;

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A primitive type tag.
///
/// `Null` is carried as a primitive here because the analysis treats the
/// `null` literal's type like any other non-numeric tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Short,
    Int,
    Long,
    Float,
    Double,
    Byte,
    Char,
    Boolean,
    Null,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 9] = [
        PrimitiveType::Short,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
        PrimitiveType::Byte,
        PrimitiveType::Char,
        PrimitiveType::Boolean,
        PrimitiveType::Null,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Null => "null",
        }
    }

    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|prim| prim.as_str() == text)
    }

    /// Whether this tag participates in the numeric widening lattice.
    ///
    /// `byte` and `char` are deliberately excluded: the arithmetic subset
    /// this engine checks never produces them, so they are treated like any
    /// other non-numeric tag.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            PrimitiveType::Short
                | PrimitiveType::Int
                | PrimitiveType::Long
                | PrimitiveType::Float
                | PrimitiveType::Double
        )
    }

    /// Compare two tags under the widening lattice.
    ///
    /// `Some(Less)` means `self` is strictly narrower than `other` (widening
    /// from `self` to `other` is legal). The integral chain is
    /// `short < int < long` and the floating chain is `float < double`; the
    /// two chains are mutually incomparable, so `int` vs `float` is `None`
    /// even though the full language would allow that conversion. Any
    /// non-numeric input is `None`.
    #[must_use]
    pub fn widening_cmp(self, other: Self) -> Option<Ordering> {
        let a = self.lattice_position()?;
        let b = other.lattice_position()?;
        if a.0 != b.0 {
            return None;
        }
        Some(a.1.cmp(&b.1))
    }

    /// Whether a value of this type may be used where `target` is expected.
    ///
    /// Reflexive over the numeric tags; false whenever either side is
    /// non-numeric or the tags sit in different families.
    #[must_use]
    pub fn widens_to(self, target: Self) -> bool {
        matches!(
            self.widening_cmp(target),
            Some(Ordering::Less | Ordering::Equal)
        )
    }

    /// (family, rank) within the lattice; `None` for non-numeric tags.
    fn lattice_position(self) -> Option<(u8, u8)> {
        match self {
            PrimitiveType::Short => Some((0, 0)),
            PrimitiveType::Int => Some((0, 1)),
            PrimitiveType::Long => Some((0, 2)),
            PrimitiveType::Float => Some((1, 0)),
            PrimitiveType::Double => Some((1, 1)),
            PrimitiveType::Byte
            | PrimitiveType::Char
            | PrimitiveType::Boolean
            | PrimitiveType::Null => None,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The declared or inferred type of a named entity or expression.
///
/// Class names are opaque strings kept exactly as written in the source;
/// resolution of a simple name to a qualified one is the registry's concern,
/// not this type's. `Unknown` means "could not be resolved or validated" and
/// is never a legitimate program type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeDescriptor {
    Primitive(PrimitiveType),
    Class(String),
    Unknown,
}

impl TypeDescriptor {
    /// Interpret declared-type text from the source: the nine primitive
    /// spellings become tags, anything else an opaque class name.
    #[must_use]
    pub fn from_source_text(text: &str) -> Self {
        match PrimitiveType::parse(text) {
            Some(prim) => TypeDescriptor::Primitive(prim),
            None => TypeDescriptor::Class(text.to_string()),
        }
    }

    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        TypeDescriptor::Class(name.into())
    }

    /// The numeric tag, if this descriptor is a numeric primitive.
    ///
    /// `Unknown` never ranks in the lattice; it falls out here as "not
    /// numeric" along with class types and the non-numeric primitives.
    #[must_use]
    pub fn as_numeric(&self) -> Option<PrimitiveType> {
        match self {
            TypeDescriptor::Primitive(prim) if prim.is_numeric() => Some(*prim),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, TypeDescriptor::Unknown)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(prim) => f.write_str(prim.as_str()),
            TypeDescriptor::Class(name) => f.write_str(name),
            TypeDescriptor::Unknown => f.write_str("$UNKNOWN"),
        }
    }
}

impl From<PrimitiveType> for TypeDescriptor {
    fn from(prim: PrimitiveType) -> Self {
        TypeDescriptor::Primitive(prim)
    }
}
