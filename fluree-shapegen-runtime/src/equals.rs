//! Structural equality with path-annotated inequalities
//!
//! Comparison short-circuits: the first differing property (in declaration
//! order) is reported together with the path that leads to it. Set-valued
//! properties compare as unordered multisets, list-valued properties
//! positionally.

use crate::identifier::Identifier;
use crate::value::{DateTime, Literal};
use chrono::NaiveDate;
use fluree_graph_ir::Term;
use std::fmt;

/// Outcome of a structural comparison
pub type EqualsResult = Result<(), Inequality>;

/// Where and how two values differ
#[derive(Debug, Clone, PartialEq)]
pub enum Inequality {
    /// Leaf values differ
    Values { left: String, right: String },
    /// Collections have different sizes
    Length { left: usize, right: usize },
    /// A left set element has no unconsumed equal element on the right
    UnmatchedElement { index: usize, value: String },
    /// Difference inside a named property
    Property {
        property: String,
        cause: Box<Inequality>,
    },
    /// Difference at a list position
    Index { index: usize, cause: Box<Inequality> },
}

impl Inequality {
    /// Leaf difference, rendering both values with `Debug`
    pub fn values(left: &impl fmt::Debug, right: &impl fmt::Debug) -> Self {
        Inequality::Values {
            left: format!("{:?}", left),
            right: format!("{:?}", right),
        }
    }

    /// Mismatched union or hierarchy variants, reported on the `type` property
    pub fn discriminant(left: &str, right: &str) -> Self {
        Inequality::Values {
            left: left.to_string(),
            right: right.to_string(),
        }
        .at_property("type")
    }

    pub fn at_property(self, property: &str) -> Self {
        Inequality::Property {
            property: property.to_string(),
            cause: Box::new(self),
        }
    }

    pub fn at_index(self, index: usize) -> Self {
        Inequality::Index {
            index,
            cause: Box::new(self),
        }
    }

    /// Path from the compared root to the difference, e.g. `friends[1].name`
    pub fn path(&self) -> String {
        let mut path = String::new();
        let mut current = self;
        loop {
            match current {
                Inequality::Property { property, cause } => {
                    if !path.is_empty() {
                        path.push('.');
                    }
                    path.push_str(property);
                    current = cause;
                }
                Inequality::Index { index, cause } => {
                    path.push_str(&format!("[{}]", index));
                    current = cause;
                }
                _ => return path,
            }
        }
    }

    /// The innermost difference
    pub fn leaf(&self) -> &Inequality {
        match self {
            Inequality::Property { cause, .. } | Inequality::Index { cause, .. } => cause.leaf(),
            leaf => leaf,
        }
    }
}

impl fmt::Display for Inequality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path();
        if !path.is_empty() {
            write!(f, "{}: ", path)?;
        }
        match self.leaf() {
            Inequality::Values { left, right } => write!(f, "{} != {}", left, right),
            Inequality::Length { left, right } => write!(f, "length {} != {}", left, right),
            Inequality::UnmatchedElement { index, value } => {
                write!(f, "element {} ({}) has no match", index, value)
            }
            _ => Ok(()),
        }
    }
}

/// Structural comparison implemented by every generated type
pub trait StructuralEquals: fmt::Debug {
    fn structural_equals(&self, other: &Self) -> EqualsResult;
}

/// Compare one named property
pub fn property<T: StructuralEquals + ?Sized>(name: &str, left: &T, right: &T) -> EqualsResult {
    left.structural_equals(right)
        .map_err(|cause| cause.at_property(name))
}

/// Compare a set-valued property as an unordered multiset
///
/// Every left element must consume a distinct equal right element.
pub fn set<T: StructuralEquals>(name: &str, left: &[T], right: &[T]) -> EqualsResult {
    unordered(left, right).map_err(|cause| cause.at_property(name))
}

/// Compare a list-valued property position by position
pub fn list<T: StructuralEquals>(name: &str, left: &[T], right: &[T]) -> EqualsResult {
    positional(left, right).map_err(|cause| cause.at_property(name))
}

fn unordered<T: StructuralEquals>(left: &[T], right: &[T]) -> EqualsResult {
    if left.len() != right.len() {
        return Err(Inequality::Length {
            left: left.len(),
            right: right.len(),
        });
    }
    let mut consumed = vec![false; right.len()];
    for (index, l) in left.iter().enumerate() {
        let found = right
            .iter()
            .enumerate()
            .find(|(j, r)| !consumed[*j] && l.structural_equals(r).is_ok())
            .map(|(j, _)| j);
        match found {
            Some(j) => consumed[j] = true,
            None => {
                return Err(Inequality::UnmatchedElement {
                    index,
                    value: format!("{:?}", l),
                })
            }
        }
    }
    Ok(())
}

fn positional<T: StructuralEquals>(left: &[T], right: &[T]) -> EqualsResult {
    if left.len() != right.len() {
        return Err(Inequality::Length {
            left: left.len(),
            right: right.len(),
        });
    }
    for (index, (l, r)) in left.iter().zip(right).enumerate() {
        l.structural_equals(r).map_err(|cause| cause.at_index(index))?;
    }
    Ok(())
}

macro_rules! eq_by_value {
    ($($ty:ty),*) => {
        $(
            impl StructuralEquals for $ty {
                fn structural_equals(&self, other: &Self) -> EqualsResult {
                    if self == other {
                        Ok(())
                    } else {
                        Err(Inequality::values(self, other))
                    }
                }
            }
        )*
    };
}

// DateTime equality in chrono compares instants, not offsets.
eq_by_value!(String, bool, i64, NaiveDate, DateTime, Literal, Identifier, Term);

impl StructuralEquals for f64 {
    fn structural_equals(&self, other: &Self) -> EqualsResult {
        if self == other || (self.is_nan() && other.is_nan()) {
            Ok(())
        } else {
            Err(Inequality::values(self, other))
        }
    }
}

impl<T: StructuralEquals + ?Sized> StructuralEquals for Box<T> {
    fn structural_equals(&self, other: &Self) -> EqualsResult {
        (**self).structural_equals(other)
    }
}

impl<T: StructuralEquals> StructuralEquals for Option<T> {
    fn structural_equals(&self, other: &Self) -> EqualsResult {
        match (self, other) {
            (None, None) => Ok(()),
            (Some(l), Some(r)) => l.structural_equals(r),
            _ => Err(Inequality::values(self, other)),
        }
    }
}
