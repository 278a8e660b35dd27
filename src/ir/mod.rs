//! In-memory model of the front-end's typed IR graph.
//!
//! Every declaration lives in an arena inside [`IrGraph`] and is referred to by
//! a `Copy` index newtype. Identity is index equality, which is what the
//! extractor keys its caches on.

pub mod builder;
pub mod notation;
pub mod primitives;
pub mod types;

pub use builder::GraphBuilder;
pub use primitives::{PrimitiveInfo, PrimitiveTypeMapping};
pub use types::{Classifier, IrType, SimpleType, TypeArgument, Variance};

use rustc_hash::FxHashMap;
use std::fmt;

macro_rules! entity_id {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            pub fn new(index: u32) -> Self {
                Self(index)
            }

            pub fn index(self) -> usize {
                self.0 as usize
            }

            fn next(len: usize) -> Self {
                Self(len as u32)
            }
        }
    )*};
}

entity_id!(
    /// A source file (or class file) the declarations came from.
    FileId,
    /// A package fragment of an external dependency.
    FragmentId,
    ClassId,
    FunctionId,
    FieldId,
    PropertyId,
    TypeParamId,
    ValueParamId,
    EnumEntryId,
    TypeAliasId,
);

/// The declaration a declaration is nested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclParent {
    File(FileId),
    Class(ClassId),
    Function(FunctionId),
    ExternalPackage(FragmentId),
}

/// Entities that can be scheduled for out-of-unit extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Class(ClassId),
    Function(FunctionId),
    Field(FieldId),
    Property(PropertyId),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Class(id) => write!(f, "class#{}", id.index()),
            EntityRef::Function(id) => write!(f, "function#{}", id.index()),
            EntityRef::Field(id) => write!(f, "field#{}", id.index()),
            EntityRef::Property(id) => write!(f, "property#{}", id.index()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Source,
    /// Declaration loaded from a compiled dependency.
    ExternalStub,
    /// Declaration loaded from a compiled platform (Java) dependency.
    ExternalJavaStub,
    /// Function synthesized for a lambda body.
    Lambda,
}

impl Origin {
    pub fn is_external(self) -> bool {
        matches!(self, Origin::ExternalStub | Origin::ExternalJavaStub)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Object,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayKind {
    /// The generic `Array<T>`.
    Boxed,
    /// `IntArray` and friends; carries the primitive element class.
    Primitive(ClassId),
}

#[derive(Debug, Clone)]
pub struct FileDecl {
    pub path: String,
    pub package: String,
    pub jvm_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: String,
    pub package: String,
    pub parent: DeclParent,
    pub kind: ClassKind,
    pub origin: Origin,
    pub type_params: Vec<TypeParamId>,
    pub super_types: Vec<IrType>,
    pub is_inner: bool,
    pub is_local: bool,
    pub is_anonymous: bool,
    /// The synthetic class holding a file's top-level members.
    pub is_file_class: bool,
    pub array: Option<ArrayKind>,
    pub functions: Vec<FunctionId>,
    pub fields: Vec<FieldId>,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>, package: impl Into<String>, parent: DeclParent) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            parent,
            kind: ClassKind::Class,
            origin: Origin::Source,
            type_params: Vec::new(),
            super_types: Vec::new(),
            is_inner: false,
            is_local: false,
            is_anonymous: false,
            is_file_class: false,
            array: None,
            functions: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: ClassKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn inner(mut self) -> Self {
        self.is_inner = true;
        self
    }

    pub fn local(mut self) -> Self {
        self.is_local = true;
        self
    }

    pub fn anonymous(mut self) -> Self {
        self.is_anonymous = true;
        self.is_local = true;
        self
    }

    pub fn file_class(mut self) -> Self {
        self.is_file_class = true;
        self
    }

    pub fn with_array(mut self, kind: ArrayKind) -> Self {
        self.array = Some(kind);
        self
    }

    /// Nested classes that are neither local nor inner do not see the type
    /// parameters of their enclosing scopes.
    pub fn is_static(&self) -> bool {
        !self.is_local && !self.is_inner
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, ClassKind::Interface | ClassKind::Annotation)
    }
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub parent: DeclParent,
    pub origin: Origin,
    pub type_params: Vec<TypeParamId>,
    pub value_params: Vec<ValueParamId>,
    pub extension_receiver: Option<ValueParamId>,
    pub return_type: IrType,
    pub is_local: bool,
    pub is_constructor: bool,
    /// Set for property accessors.
    pub property: Option<PropertyId>,
    pub jvm_name: Option<String>,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>, parent: DeclParent, return_type: IrType) -> Self {
        Self {
            name: name.into(),
            parent,
            origin: Origin::Source,
            type_params: Vec::new(),
            value_params: Vec::new(),
            extension_receiver: None,
            return_type,
            is_local: false,
            is_constructor: false,
            property: None,
            jvm_name: None,
        }
    }

    pub fn constructor(parent: ClassId, return_type: IrType) -> Self {
        let mut decl = Self::new("<init>", DeclParent::Class(parent), return_type);
        decl.is_constructor = true;
        decl
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn local(mut self) -> Self {
        self.is_local = true;
        self
    }

    pub fn with_jvm_name(mut self, name: impl Into<String>) -> Self {
        self.jvm_name = Some(name.into());
        self
    }

    pub fn is_anonymous(&self) -> bool {
        self.name == ANONYMOUS_NAME
    }
}

/// Name the front-end gives to anonymous functions and objects.
pub const ANONYMOUS_NAME: &str = "<no name provided>";

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub parent: DeclParent,
    pub ty: IrType,
    pub origin: Origin,
}

#[derive(Debug, Clone)]
pub struct PropertyDecl {
    pub name: String,
    pub parent: DeclParent,
    pub origin: Origin,
    pub getter: Option<FunctionId>,
    pub setter: Option<FunctionId>,
}

#[derive(Debug, Clone)]
pub struct TypeParamDecl {
    pub name: String,
    pub parent: DeclParent,
    pub index: usize,
    /// Upper bounds; the first one determines the erasure.
    pub super_types: Vec<IrType>,
}

#[derive(Debug, Clone)]
pub struct ValueParamDecl {
    pub name: String,
    pub parent: FunctionId,
    pub ty: IrType,
    /// `-1` for extension receivers.
    pub index: i32,
}

#[derive(Debug, Clone)]
pub struct EnumEntryDecl {
    pub name: String,
    pub parent: ClassId,
}

#[derive(Debug, Clone)]
pub struct TypeAliasDecl {
    pub name: String,
    pub parent: DeclParent,
}

/// Well-known classes the resolver refers to directly.
#[derive(Debug, Clone, Copy)]
pub struct Builtins {
    pub any: ClassId,
    pub unit: ClassId,
    pub int: ClassId,
    pub array: ClassId,
}

#[derive(Debug)]
pub struct IrGraph {
    files: Vec<FileDecl>,
    fragments: Vec<String>,
    classes: Vec<ClassDecl>,
    functions: Vec<FunctionDecl>,
    fields: Vec<FieldDecl>,
    properties: Vec<PropertyDecl>,
    type_params: Vec<TypeParamDecl>,
    value_params: Vec<ValueParamDecl>,
    enum_entries: Vec<EnumEntryDecl>,
    type_aliases: Vec<TypeAliasDecl>,
    by_fq_name: FxHashMap<String, Vec<ClassId>>,
    platform_equivalents: FxHashMap<ClassId, ClassId>,
    primitives: PrimitiveTypeMapping,
    builtins: Builtins,
}

impl IrGraph {
    pub fn file(&self, id: FileId) -> &FileDecl {
        &self.files[id.index()]
    }

    pub fn fragment(&self, id: FragmentId) -> &str {
        &self.fragments[id.index()]
    }

    pub fn class(&self, id: ClassId) -> &ClassDecl {
        &self.classes[id.index()]
    }

    pub fn function(&self, id: FunctionId) -> &FunctionDecl {
        &self.functions[id.index()]
    }

    pub fn field(&self, id: FieldId) -> &FieldDecl {
        &self.fields[id.index()]
    }

    pub fn property(&self, id: PropertyId) -> &PropertyDecl {
        &self.properties[id.index()]
    }

    pub fn type_param(&self, id: TypeParamId) -> &TypeParamDecl {
        &self.type_params[id.index()]
    }

    pub fn value_param(&self, id: ValueParamId) -> &ValueParamDecl {
        &self.value_params[id.index()]
    }

    pub fn enum_entry(&self, id: EnumEntryId) -> &EnumEntryDecl {
        &self.enum_entries[id.index()]
    }

    pub fn type_alias(&self, id: TypeAliasId) -> &TypeAliasDecl {
        &self.type_aliases[id.index()]
    }

    pub fn builtins(&self) -> Builtins {
        self.builtins
    }

    pub fn primitives(&self) -> &PrimitiveTypeMapping {
        &self.primitives
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// The platform class that stands for `id` (e.g. `kotlin.Any` →
    /// `java.lang.Object`), if the two type systems name it differently.
    pub fn platform_equivalent(&self, id: ClassId) -> Option<ClassId> {
        self.platform_equivalents.get(&id).copied()
    }

    /// Fully qualified dotted name; `None` for local and anonymous classes.
    pub fn fq_name(&self, id: ClassId) -> Option<String> {
        let class = self.class(id);
        if class.is_local || class.is_anonymous {
            return None;
        }
        match class.parent {
            DeclParent::Class(parent) => self
                .fq_name(parent)
                .map(|outer| format!("{}.{}", outer, class.name)),
            DeclParent::Function(_) => None,
            DeclParent::File(_) | DeclParent::ExternalPackage(_) => {
                if class.package.is_empty() {
                    Some(class.name.clone())
                } else {
                    Some(format!("{}.{}", class.package, class.name))
                }
            }
        }
    }

    /// All classes registered under a fully qualified name, in declaration order.
    pub fn classes_named<'a>(&'a self, fq_name: &str) -> impl Iterator<Item = ClassId> + 'a {
        self.by_fq_name
            .get(fq_name)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    /// Looks a class up by fully qualified name, falling back to a unique
    /// simple name.
    pub fn find_class(&self, name: &str) -> Option<ClassId> {
        if let Some(id) = self.classes_named(name).next() {
            return Some(id);
        }
        let mut matches = self
            .classes
            .iter()
            .enumerate()
            .filter(|(_, class)| class.name == name && !class.is_anonymous)
            .map(|(index, _)| ClassId::next(index));
        let first = matches.next()?;
        if matches.next().is_some() {
            None
        } else {
            Some(first)
        }
    }

    /// Type parameters declared directly on `parent`.
    pub fn type_parameters_of(&self, parent: DeclParent) -> &[TypeParamId] {
        match parent {
            DeclParent::Class(id) => &self.class(id).type_params,
            DeclParent::Function(id) => &self.function(id).type_params,
            DeclParent::File(_) | DeclParent::ExternalPackage(_) => &[],
        }
    }

    pub fn parent_of(&self, parent: DeclParent) -> Option<DeclParent> {
        match parent {
            DeclParent::Class(id) => Some(self.class(id).parent),
            DeclParent::Function(id) => Some(self.function(id).parent),
            DeclParent::File(_) | DeclParent::ExternalPackage(_) => None,
        }
    }

    /// Innermost class enclosing `parent`, looking through functions.
    pub fn enclosing_class(&self, parent: DeclParent) -> Option<ClassId> {
        match parent {
            DeclParent::Class(id) => Some(id),
            DeclParent::Function(id) => self.enclosing_class(self.function(id).parent),
            DeclParent::File(_) | DeclParent::ExternalPackage(_) => None,
        }
    }

    pub fn any_type(&self) -> IrType {
        IrType::class(self.builtins.any, Vec::new())
    }

    pub fn nullable_any_type(&self) -> IrType {
        self.any_type().make_nullable()
    }

    pub fn unit_type(&self) -> IrType {
        IrType::class(self.builtins.unit, Vec::new())
    }

    pub fn int_type(&self) -> IrType {
        IrType::class(self.builtins.int, Vec::new())
    }

    fn array_kind(&self, ty: &IrType) -> Option<ArrayKind> {
        ty.class_id().and_then(|id| self.class(id).array)
    }

    /// `Array<T>`, whatever its arguments.
    pub fn is_boxed_array(&self, ty: &IrType) -> bool {
        matches!(self.array_kind(ty), Some(ArrayKind::Boxed))
    }

    pub fn is_primitive_array(&self, ty: &IrType) -> bool {
        matches!(self.array_kind(ty), Some(ArrayKind::Primitive(_)))
    }

    pub fn is_array(&self, ty: &IrType) -> bool {
        self.array_kind(ty).is_some()
    }

    /// Non-nullable reference to one of the platform's primitive value types.
    pub fn is_primitive_type(&self, ty: &IrType) -> bool {
        !ty.is_nullable()
            && ty
                .class_id()
                .and_then(|id| self.primitives.info(id))
                .map(|info| info.other_is_primitive)
                .unwrap_or(false)
    }

    /// Element type of an array; a star argument reads as `Any?`.
    pub fn array_element_type(&self, ty: &IrType) -> Option<IrType> {
        match self.array_kind(ty)? {
            ArrayKind::Boxed => Some(match ty.arguments().first() {
                Some(TypeArgument::Projection { ty, .. }) => ty.clone(),
                Some(TypeArgument::Star) | None => self.nullable_any_type(),
            }),
            ArrayKind::Primitive(element) => Some(IrType::class(element, Vec::new())),
        }
    }
}
