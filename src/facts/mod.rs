//! Output boundary: typed labels, the facts they appear in, and sinks.

pub mod fact;
pub mod sink;

pub use fact::{Fact, WildcardKind};
pub use sink::{FactLog, FactSink};

use std::{fmt, hash, marker::PhantomData};

/// Marker types naming what a [`Label`] denotes.
pub mod kinds {
    pub enum Package {}
    pub enum ClassOrInterface {}
    /// Any reference type: classes, arrays, wildcards, type variables.
    pub enum RefType {}
    /// Any platform type, reference or primitive.
    pub enum Type {}
    pub enum SourceType {}
    pub enum Primitive {}
    pub enum Array {}
    pub enum Wildcard {}
    pub enum TypeVariable {}
    pub enum TypeBound {}
    pub enum Field {}
    pub enum Callable {}
    pub enum Property {}
    pub enum Param {}
    pub enum Modifier {}
    pub enum File {}
    pub enum Location {}
    pub enum TypeAlias {}
    pub enum Element {}
}

/// Untyped label, as stored in facts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnyLabel(u32);

impl AnyLabel {
    pub(crate) fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for AnyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier handed out once per canonical key, typed by entity kind.
pub struct Label<K> {
    raw: u32,
    kind: PhantomData<fn() -> K>,
}

impl<K> Label<K> {
    pub(crate) fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            kind: PhantomData,
        }
    }

    pub fn raw(self) -> u32 {
        self.raw
    }

    pub fn cast<U>(self) -> Label<U> {
        Label::from_raw(self.raw)
    }

    pub fn any(self) -> AnyLabel {
        AnyLabel(self.raw)
    }
}

impl<K> Clone for Label<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Label<K> {}

impl<K> PartialEq for Label<K> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<K> Eq for Label<K> {}

impl<K> hash::Hash for Label<K> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<K> fmt::Debug for Label<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label(#{})", self.raw)
    }
}

impl<K> fmt::Display for Label<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.raw)
    }
}

impl<K> From<Label<K>> for AnyLabel {
    fn from(label: Label<K>) -> Self {
        label.any()
    }
}

/// A type's label, its signature for use in callable signatures, and its
/// short display name.
///
/// The signature is a primitive name (`int`), a qualified class name
/// (`pkg.Outer.Inner`) or an array (`int[]`). Type variables carry the
/// signature of their erasure. Wildcards have none, anonymous types an empty
/// one.
pub struct TypeResult<K> {
    pub id: Label<K>,
    pub signature: Option<String>,
    pub short_name: String,
}

impl<K> Clone for TypeResult<K> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            signature: self.signature.clone(),
            short_name: self.short_name.clone(),
        }
    }
}

impl<K> PartialEq for TypeResult<K> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.signature == other.signature
            && self.short_name == other.short_name
    }
}

impl<K> Eq for TypeResult<K> {}

impl<K> fmt::Debug for TypeResult<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeResult")
            .field("id", &self.id)
            .field("signature", &self.signature)
            .field("short_name", &self.short_name)
            .finish()
    }
}

impl<K> TypeResult<K> {
    pub fn new(id: Label<K>, signature: Option<String>, short_name: impl Into<String>) -> Self {
        Self {
            id,
            signature,
            short_name: short_name.into(),
        }
    }

    pub fn cast<U>(self) -> TypeResult<U> {
        TypeResult {
            id: self.id.cast(),
            signature: self.signature,
            short_name: self.short_name,
        }
    }
}

/// The platform view of a type together with its source-language view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeResults {
    pub platform: TypeResult<kinds::Type>,
    pub source: TypeResult<kinds::SourceType>,
}
