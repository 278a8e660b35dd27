use super::*;

/// Which view of a class's supertypes to extract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupertypeMode {
    /// As declared, in terms of the class's own type parameters.
    Unbound,
    /// Every generic supertype referenced raw.
    Raw,
    /// The class's own parameters replaced by these arguments.
    Specialized(Vec<TypeArgument>),
}

/// Type parameter to argument mapping for one specialization request.
#[derive(Debug, Default, Clone)]
pub struct SubstitutionMap {
    entries: FxHashMap<TypeParamId, TypeArgument>,
}

impl SubstitutionMap {
    /// Maps every parameter in scope at `class`, innermost scope first, to
    /// `args`. Substituted types are forced nullable so that a substituted
    /// reference is never turned into a primitive.
    pub fn for_class(graph: &IrGraph, class: ClassId, args: &[TypeArgument]) -> Self {
        let entries = type_parameters_in_scope(graph, class)
            .into_iter()
            .zip(args.iter().map(TypeArgument::with_question_mark))
            .collect();
        Self { entries }
    }

    /// Maps the class's own parameters to `args` as given.
    pub fn for_parameters(params: &[TypeParamId], args: &[TypeArgument]) -> Self {
        let entries = params.iter().copied().zip(args.iter().cloned()).collect();
        Self { entries }
    }

    pub fn get(&self, param: TypeParamId) -> Option<&TypeArgument> {
        self.entries.get(&param)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn combine_variance(outer: Variance, inner: Variance) -> Option<Variance> {
    match (outer, inner) {
        (Variance::Invariant, other) | (other, Variance::Invariant) => Some(other),
        (a, b) if a == b => Some(a),
        _ => None,
    }
}

fn substitute_argument(graph: &IrGraph, arg: &TypeArgument, map: &SubstitutionMap) -> TypeArgument {
    let TypeArgument::Projection { variance, ty } = arg else {
        return TypeArgument::Star;
    };
    if let Some(Classifier::TypeParameter(param)) = ty.classifier() {
        if let Some(replacement) = map.get(param) {
            return match replacement {
                TypeArgument::Star => TypeArgument::Star,
                TypeArgument::Projection {
                    variance: inner,
                    ty: replaced,
                } => match combine_variance(*variance, *inner) {
                    Some(variance) => TypeArgument::Projection {
                        variance,
                        ty: replaced.with_nullability(replaced.is_nullable() || ty.is_nullable()),
                    },
                    None => TypeArgument::Star,
                },
            };
        }
    }
    TypeArgument::Projection {
        variance: *variance,
        ty: substitute(graph, ty, map),
    }
}

/// Replaces type parameters bound in `map`, keeping the nullability of
/// either side. A parameter mapped to a star becomes `Any?`.
pub fn substitute(graph: &IrGraph, ty: &IrType, map: &SubstitutionMap) -> IrType {
    let IrType::Simple(simple) = ty else {
        return ty.clone();
    };
    match simple.classifier {
        Classifier::TypeParameter(param) => match map.get(param) {
            Some(TypeArgument::Star) => graph.nullable_any_type(),
            Some(TypeArgument::Projection { ty: replaced, .. }) => {
                replaced.with_nullability(replaced.is_nullable() || simple.nullable)
            }
            None => ty.clone(),
        },
        Classifier::Class(_) => IrType::Simple(crate::ir::SimpleType {
            arguments: simple
                .arguments
                .iter()
                .map(|arg| substitute_argument(graph, arg, map))
                .collect(),
            ..simple.clone()
        }),
    }
}

/// Generic types become raw, type parameters their first bound. `Array<T>`
/// stays an array of the erased element.
pub fn erase(graph: &IrGraph, ty: &IrType) -> IrType {
    let Some(classifier) = ty.classifier() else {
        return ty.clone();
    };
    match classifier {
        Classifier::TypeParameter(param) => erase_type_parameter(graph, param),
        Classifier::Class(class) => {
            if graph.is_boxed_array(ty) {
                let element = graph
                    .array_element_type(ty)
                    .unwrap_or_else(|| graph.nullable_any_type());
                IrType::class(class, vec![TypeArgument::invariant(erase(graph, &element))])
                    .with_nullability(ty.is_nullable())
            } else if !ty.arguments().is_empty() {
                ty.with_raw()
            } else {
                ty.clone()
            }
        }
    }
}

pub fn erase_type_parameter(graph: &IrGraph, param: TypeParamId) -> IrType {
    match graph.type_param(param).super_types.first() {
        Some(bound) => erase(graph, bound),
        None => graph.nullable_any_type(),
    }
}

/// Primitive arrays are returned unchanged; boxed arrays get an invariant,
/// nullable component, recursively through nested arrays.
pub fn normalize_array(graph: &IrGraph, ty: &IrType) -> IrType {
    if graph.is_primitive_array(ty) {
        return ty.clone();
    }
    let Some(component) = graph.array_element_type(ty) else {
        return ty.clone();
    };
    let broadened = if graph.is_array(&component) {
        normalize_array(graph, &component)
    } else {
        component.make_nullable()
    };
    let invariant = matches!(
        ty.arguments().first(),
        Some(TypeArgument::Projection {
            variance: Variance::Invariant,
            ..
        })
    );
    if broadened == component && invariant && component.is_nullable() {
        return ty.clone();
    }
    match ty.class_id() {
        Some(class) => IrType::class(class, vec![TypeArgument::invariant(broadened)]).make_nullable(),
        None => ty.clone(),
    }
}

impl<S: FactSink, Q: ExternalScheduler> Extractor<'_, S, Q> {
    /// Writes an `extends` fact from `id` to each supertype of `class`,
    /// viewed through `mode`.
    pub fn extract_supertypes(&mut self, class: ClassId, id: Label<kinds::RefType>, mode: SupertypeMode) {
        let graph = self.graph;
        let decl = graph.class(class);
        let supertypes: Vec<IrType> = match &mode {
            SupertypeMode::Specialized(args) => {
                let map = SubstitutionMap::for_parameters(&decl.type_params, args);
                decl.super_types
                    .iter()
                    .map(|ty| substitute(graph, ty, &map))
                    .collect()
            }
            SupertypeMode::Unbound | SupertypeMode::Raw => decl.super_types.clone(),
        };
        for ty in &supertypes {
            match ty.classifier() {
                Some(Classifier::Class(sup)) => {
                    let args = if !ty.arguments().is_empty() && mode == SupertypeMode::Raw {
                        None
                    } else {
                        Some(ty.arguments())
                    };
                    let sup = self.use_class_instance(sup, args).id;
                    self.write(Fact::ExtendsReftype { sub: id, sup });
                }
                Some(Classifier::TypeParameter(_)) | None => {
                    self.report(ExtractError::UnexpectedShape {
                        position: "supertype",
                        expected: "class type",
                        found: describe_type(graph, ty),
                    });
                }
            }
        }
    }
}
