//! Shared value types: the narrowing-level lattice and the opaque host type handle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A tier in the conversion lattice. Ordering is total; callers only ever compare,
/// never pattern-match on the specific variant, so new tiers can be inserted by an
/// embedder without breaking resolver logic (the resolver itself only produces and
/// consumes `NarrowingLevel::None..=All` below).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NarrowingLevel {
    None = 0,
    One = 1,
    Two = 2,
    Three = 3,
    All = 4,
}

impl NarrowingLevel {
    pub const MIN: NarrowingLevel = NarrowingLevel::None;
    pub const MAX: NarrowingLevel = NarrowingLevel::All;

    /// The next broader level, or `None` if already at `All`.
    pub fn next(self) -> Option<NarrowingLevel> {
        match self {
            NarrowingLevel::None => Some(NarrowingLevel::One),
            NarrowingLevel::One => Some(NarrowingLevel::Two),
            NarrowingLevel::Two => Some(NarrowingLevel::Three),
            NarrowingLevel::Three => Some(NarrowingLevel::All),
            NarrowingLevel::All => None,
        }
    }

    /// Levels from `min` to `max` inclusive, in ascending (strictest-first) order.
    pub fn range_inclusive(min: NarrowingLevel, max: NarrowingLevel) -> Vec<NarrowingLevel> {
        let mut levels = Vec::new();
        let mut cur = Some(min);
        while let Some(l) = cur {
            if l > max {
                break;
            }
            levels.push(l);
            cur = l.next();
        }
        levels
    }
}

impl fmt::Display for NarrowingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NarrowingLevel::None => "None",
            NarrowingLevel::One => "One",
            NarrowingLevel::Two => "Two",
            NarrowingLevel::Three => "Three",
            NarrowingLevel::All => "All",
        };
        f.write_str(s)
    }
}

/// The shape of a `HostType`: enough structure for the bundled reference policy
/// (and for restriction computation in `spec.md` §4.7, which special-cases the
/// universal top type) without encoding any particular host runtime's type system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    /// A primitive value type (`int`, `long`, `bool`, ...).
    Primitive,
    /// A named reference or value type resolved by the embedder's metadata tables.
    Named,
    /// An array type, e.g. the element type of a params-array parameter.
    Array { element: Box<HostType>, rank: usize },
    /// A nullable wrapper over another type.
    Nullable(Box<HostType>),
    /// The dynamic/untyped escape hatch.
    Dynamic,
    /// The universal top type (`object`-equivalent). Restrictions against this type
    /// must not coerce a value, per `spec.md` §4.7.
    Top,
}

/// An opaque handle to a type in the host type system. The resolver core never
/// inspects a `HostType` directly; all type questions are answered by the
/// embedder's [`crate::policy::BindingPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostType {
    pub name: String,
    pub kind: TypeKind,
}

impl HostType {
    pub fn primitive(name: impl Into<String>) -> Self {
        HostType { name: name.into(), kind: TypeKind::Primitive }
    }

    pub fn named(name: impl Into<String>) -> Self {
        HostType { name: name.into(), kind: TypeKind::Named }
    }

    pub fn array(element: HostType, rank: usize) -> Self {
        HostType {
            name: format!("{}[{}]", element.name, ",".repeat(rank.saturating_sub(1))),
            kind: TypeKind::Array { element: Box::new(element), rank },
        }
    }

    pub fn nullable(inner: HostType) -> Self {
        HostType { name: format!("{}?", inner.name), kind: TypeKind::Nullable(Box::new(inner)) }
    }

    pub fn dynamic() -> Self {
        HostType { name: "dynamic".to_string(), kind: TypeKind::Dynamic }
    }

    /// The universal top type (`object`-equivalent in most host type systems).
    pub fn top() -> Self {
        HostType { name: "object".to_string(), kind: TypeKind::Top }
    }

    pub fn is_top(&self) -> bool {
        matches!(self.kind, TypeKind::Top)
    }

    /// The element type of an array/params-array type, if this is one.
    pub fn array_element(&self) -> Option<&HostType> {
        match &self.kind {
            TypeKind::Array { element, .. } => Some(element),
            _ => None,
        }
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A normalized view of one formal parameter. Equality is by `(type, prohibits_null)`
/// only, per `spec.md` §3 — the other flags describe *how* the parameter is consumed,
/// not what makes two parameters the same for structural-tie-break purposes.
#[derive(Debug, Clone)]
pub struct ParameterWrapper {
    pub ty: HostType,
    pub prohibits_null: bool,
    pub is_by_ref: bool,
    pub is_params_array: bool,
    pub is_params_dict: bool,
    /// Index of the corresponding parameter in the originating `RawSignature`,
    /// needed for conversion context (e.g. reading an attribute off the raw
    /// parameter metadata that `HostType` alone can't carry).
    pub raw_index: Option<usize>,
}

impl PartialEq for ParameterWrapper {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && self.prohibits_null == other.prohibits_null
    }
}
impl Eq for ParameterWrapper {}

impl ParameterWrapper {
    pub fn simple(ty: HostType, prohibits_null: bool) -> Self {
        ParameterWrapper {
            ty,
            prohibits_null,
            is_by_ref: false,
            is_params_array: false,
            is_params_dict: false,
            raw_index: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrowing_level_is_totally_ordered() {
        assert!(NarrowingLevel::None < NarrowingLevel::One);
        assert!(NarrowingLevel::One < NarrowingLevel::All);
        assert_eq!(NarrowingLevel::range_inclusive(NarrowingLevel::One, NarrowingLevel::Three).len(), 3);
    }

    #[test]
    fn range_inclusive_is_empty_when_min_exceeds_max() {
        let levels = NarrowingLevel::range_inclusive(NarrowingLevel::Two, NarrowingLevel::One);
        assert!(levels.is_empty());
    }

    #[test]
    fn parameter_wrapper_equality_ignores_consumption_flags() {
        let ty = HostType::primitive("int");
        let a = ParameterWrapper { is_params_array: true, ..ParameterWrapper::simple(ty.clone(), false) };
        let b = ParameterWrapper::simple(ty, false);
        assert_eq!(a, b);
    }

    #[test]
    fn array_element_round_trips() {
        let element = HostType::primitive("int");
        let arr = HostType::array(element.clone(), 1);
        assert_eq!(arr.array_element(), Some(&element));
    }
}
