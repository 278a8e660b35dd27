use super::{kinds::*, AnyLabel, Label};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WildcardKind {
    /// `?` and `? extends T`.
    Extends,
    /// `? super T`.
    Super,
}

impl WildcardKind {
    pub fn code(self) -> u8 {
        match self {
            WildcardKind::Extends => 1,
            WildcardKind::Super => 2,
        }
    }
}

/// One append-only row of the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fact {
    Packages {
        id: Label<Package>,
        name: String,
    },
    Classes {
        id: Label<ClassOrInterface>,
        name: String,
        package: Label<Package>,
        source: Label<ClassOrInterface>,
    },
    Interfaces {
        id: Label<ClassOrInterface>,
        name: String,
        package: Label<Package>,
        source: Label<ClassOrInterface>,
    },
    FileClass {
        id: Label<ClassOrInterface>,
    },
    Primitives {
        id: Label<Primitive>,
        name: String,
    },
    Arrays {
        id: Label<Array>,
        name: String,
        element: Label<Type>,
        dimensions: u32,
        component: Label<Type>,
    },
    Fields {
        id: Label<Field>,
        name: String,
        ty: Label<Type>,
        parent: Label<RefType>,
        source: Label<Field>,
    },
    FieldsSourceType {
        id: Label<Field>,
        ty: Label<SourceType>,
    },
    Methods {
        id: Label<Callable>,
        name: String,
        signature: String,
        return_type: Label<Type>,
        parent: Label<RefType>,
        source: Label<Callable>,
    },
    MethodsSourceType {
        id: Label<Callable>,
        ty: Label<SourceType>,
    },
    Wildcards {
        id: Label<Wildcard>,
        name: String,
        kind: WildcardKind,
    },
    TypeBounds {
        id: Label<TypeBound>,
        bound: Label<RefType>,
        position: u32,
        parent: Label<Wildcard>,
    },
    ExtendsReftype {
        sub: Label<RefType>,
        sup: Label<ClassOrInterface>,
    },
    SourceNullableType {
        id: Label<SourceType>,
        ty: Label<RefType>,
    },
    SourceNotNullType {
        id: Label<SourceType>,
        ty: Label<RefType>,
    },
    TypeArgs {
        arg: Label<RefType>,
        position: u32,
        parent: Label<ClassOrInterface>,
    },
    IsParameterized {
        id: Label<ClassOrInterface>,
    },
    IsRaw {
        id: Label<ClassOrInterface>,
    },
    Erasure {
        id: Label<ClassOrInterface>,
        erasure: Label<ClassOrInterface>,
    },
    Modifiers {
        id: Label<Modifier>,
        name: String,
    },
    HasModifier {
        element: AnyLabel,
        modifier: Label<Modifier>,
    },
    HasLocation {
        element: AnyLabel,
        location: Label<Location>,
    },
    Files {
        id: Label<File>,
        path: String,
    },
    Locations {
        id: Label<Location>,
        file: Label<File>,
        start_line: u32,
        start_column: u32,
        end_line: u32,
        end_column: u32,
    },
}

impl Fact {
    pub fn relation(&self) -> &'static str {
        match self {
            Fact::Packages { .. } => "packages",
            Fact::Classes { .. } => "classes",
            Fact::Interfaces { .. } => "interfaces",
            Fact::FileClass { .. } => "file_class",
            Fact::Primitives { .. } => "primitives",
            Fact::Arrays { .. } => "arrays",
            Fact::Fields { .. } => "fields",
            Fact::FieldsSourceType { .. } => "fieldsKotlinType",
            Fact::Methods { .. } => "methods",
            Fact::MethodsSourceType { .. } => "methodsKotlinType",
            Fact::Wildcards { .. } => "wildcards",
            Fact::TypeBounds { .. } => "typeBounds",
            Fact::ExtendsReftype { .. } => "extendsReftype",
            Fact::SourceNullableType { .. } => "kt_nullable_types",
            Fact::SourceNotNullType { .. } => "kt_notnull_types",
            Fact::TypeArgs { .. } => "typeArgs",
            Fact::IsParameterized { .. } => "isParameterized",
            Fact::IsRaw { .. } => "isRaw",
            Fact::Erasure { .. } => "erasure",
            Fact::Modifiers { .. } => "modifiers",
            Fact::HasModifier { .. } => "hasModifier",
            Fact::HasLocation { .. } => "hasLocation",
            Fact::Files { .. } => "files",
            Fact::Locations { .. } => "locations_default",
        }
    }
}

struct Quoted<'a>(&'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0.replace('"', "\"\""))
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.relation())?;
        match self {
            Fact::Packages { id, name } => write!(f, "{},{}", id, Quoted(name))?,
            Fact::Classes {
                id,
                name,
                package,
                source,
            }
            | Fact::Interfaces {
                id,
                name,
                package,
                source,
            } => write!(f, "{},{},{},{}", id, Quoted(name), package, source)?,
            Fact::FileClass { id }
            | Fact::IsParameterized { id }
            | Fact::IsRaw { id } => write!(f, "{}", id)?,
            Fact::Primitives { id, name } => write!(f, "{},{}", id, Quoted(name))?,
            Fact::Arrays {
                id,
                name,
                element,
                dimensions,
                component,
            } => write!(
                f,
                "{},{},{},{},{}",
                id,
                Quoted(name),
                element,
                dimensions,
                component
            )?,
            Fact::Fields {
                id,
                name,
                ty,
                parent,
                source,
            } => write!(f, "{},{},{},{},{}", id, Quoted(name), ty, parent, source)?,
            Fact::FieldsSourceType { id, ty } => write!(f, "{},{}", id, ty)?,
            Fact::Methods {
                id,
                name,
                signature,
                return_type,
                parent,
                source,
            } => write!(
                f,
                "{},{},{},{},{},{}",
                id,
                Quoted(name),
                Quoted(signature),
                return_type,
                parent,
                source
            )?,
            Fact::MethodsSourceType { id, ty } => write!(f, "{},{}", id, ty)?,
            Fact::Wildcards { id, name, kind } => {
                write!(f, "{},{},{}", id, Quoted(name), kind.code())?
            }
            Fact::TypeBounds {
                id,
                bound,
                position,
                parent,
            } => write!(f, "{},{},{},{}", id, bound, position, parent)?,
            Fact::ExtendsReftype { sub, sup } => write!(f, "{},{}", sub, sup)?,
            Fact::SourceNullableType { id, ty } | Fact::SourceNotNullType { id, ty } => {
                write!(f, "{},{}", id, ty)?
            }
            Fact::TypeArgs {
                arg,
                position,
                parent,
            } => write!(f, "{},{},{}", arg, position, parent)?,
            Fact::Erasure { id, erasure } => write!(f, "{},{}", id, erasure)?,
            Fact::Modifiers { id, name } => write!(f, "{},{}", id, Quoted(name))?,
            Fact::HasModifier { element, modifier } => write!(f, "{},{}", element, modifier)?,
            Fact::HasLocation { element, location } => write!(f, "{},{}", element, location)?,
            Fact::Files { id, path } => write!(f, "{},{}", id, Quoted(path))?,
            Fact::Locations {
                id,
                file,
                start_line,
                start_column,
                end_line,
                end_column,
            } => write!(
                f,
                "{},{},{},{},{},{}",
                id, file, start_line, start_column, end_line, end_column
            )?,
        }
        write!(f, ")")
    }
}
