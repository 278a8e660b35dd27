use crate::ir::{ClassId, TypeParamId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variance {
    Invariant,
    In,
    Out,
}

impl Variance {
    pub fn keyword(self) -> &'static str {
        match self {
            Variance::Invariant => "",
            Variance::In => "in",
            Variance::Out => "out",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classifier {
    Class(ClassId),
    TypeParameter(TypeParamId),
}

/// A type as the front-end hands it over.
///
/// `Dynamic` and `Error` exist so that shapes the resolver has no rule for can
/// still be represented; resolving them yields a placeholder.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IrType {
    Simple(SimpleType),
    Dynamic,
    Error(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SimpleType {
    pub classifier: Classifier,
    pub arguments: Vec<TypeArgument>,
    pub nullable: bool,
    /// Set on generic types referenced without arguments, and by erasure.
    pub raw: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeArgument {
    Star,
    Projection { variance: Variance, ty: IrType },
}

impl TypeArgument {
    pub fn invariant(ty: IrType) -> Self {
        TypeArgument::Projection {
            variance: Variance::Invariant,
            ty,
        }
    }

    pub fn projected(variance: Variance, ty: IrType) -> Self {
        TypeArgument::Projection { variance, ty }
    }

    pub fn ty(&self) -> Option<&IrType> {
        match self {
            TypeArgument::Star => None,
            TypeArgument::Projection { ty, .. } => Some(ty),
        }
    }

    /// Same argument with its projected type forced nullable; stars are kept.
    pub fn with_question_mark(&self) -> Self {
        match self {
            TypeArgument::Star => TypeArgument::Star,
            TypeArgument::Projection { variance, ty } => TypeArgument::Projection {
                variance: *variance,
                ty: ty.make_nullable(),
            },
        }
    }
}

impl IrType {
    pub fn class(class: ClassId, arguments: Vec<TypeArgument>) -> Self {
        IrType::Simple(SimpleType {
            classifier: Classifier::Class(class),
            arguments,
            nullable: false,
            raw: false,
        })
    }

    pub fn param(param: TypeParamId) -> Self {
        IrType::Simple(SimpleType {
            classifier: Classifier::TypeParameter(param),
            arguments: Vec::new(),
            nullable: false,
            raw: false,
        })
    }

    pub fn as_simple(&self) -> Option<&SimpleType> {
        match self {
            IrType::Simple(simple) => Some(simple),
            _ => None,
        }
    }

    pub fn classifier(&self) -> Option<Classifier> {
        self.as_simple().map(|simple| simple.classifier)
    }

    pub fn class_id(&self) -> Option<ClassId> {
        match self.classifier() {
            Some(Classifier::Class(id)) => Some(id),
            _ => None,
        }
    }

    pub fn arguments(&self) -> &[TypeArgument] {
        match self {
            IrType::Simple(simple) => &simple.arguments,
            _ => &[],
        }
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            IrType::Simple(simple) => simple.nullable,
            IrType::Dynamic => true,
            IrType::Error(_) => false,
        }
    }

    pub fn with_nullability(&self, nullable: bool) -> Self {
        match self {
            IrType::Simple(simple) => IrType::Simple(SimpleType {
                nullable,
                ..simple.clone()
            }),
            other => other.clone(),
        }
    }

    pub fn make_nullable(&self) -> Self {
        self.with_nullability(true)
    }

    pub fn make_not_null(&self) -> Self {
        self.with_nullability(false)
    }

    pub fn with_raw(&self) -> Self {
        match self {
            IrType::Simple(simple) => IrType::Simple(SimpleType {
                raw: true,
                ..simple.clone()
            }),
            other => other.clone(),
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, IrType::Simple(simple) if simple.raw)
    }
}
