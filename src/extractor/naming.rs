use super::*;
use crate::facts::WildcardKind;

/// Enclosing declarations whose type parameters are visible in `class`,
/// from the class itself outwards, ending at the first static class.
///
/// For `class A { static class B { class C { class D } } }` this is
/// `[D, C, B]`.
pub fn parents_with_type_parameters_in_scope(graph: &IrGraph, class: ClassId) -> Vec<DeclParent> {
    let mut parents = Vec::new();
    let mut current = Some(DeclParent::Class(class));
    while let Some(parent) = current {
        parents.push(parent);
        if let DeclParent::Class(id) = parent {
            if graph.class(id).is_static() {
                break;
            }
        }
        current = graph.parent_of(parent);
    }
    parents
}

/// Type parameters in scope at `class`, innermost scope first: for
/// `Outer<A, B>.Inner<C, D>` this is `[C, D, A, B]`.
pub fn type_parameters_in_scope(graph: &IrGraph, class: ClassId) -> Vec<TypeParamId> {
    parents_with_type_parameters_in_scope(graph, class)
        .into_iter()
        .flat_map(|parent| graph.type_parameters_of(parent).iter().copied())
        .collect()
}

/// Reorders innermost-first arguments (`[C, D, A, B]` for
/// `Outer<A, B>.Inner<C, D>`) into source order (`[A, B, C, D]`).
///
/// Returns `None` when `args` is too short for the scopes in play.
pub fn order_type_args_left_to_right(
    graph: &IrGraph,
    class: ClassId,
    args: &[TypeArgument],
) -> Option<Vec<TypeArgument>> {
    if args.is_empty() {
        return Some(Vec::new());
    }
    let mut ordered: Vec<TypeArgument> = Vec::with_capacity(args.len());
    for parent in parents_with_type_parameters_in_scope(graph, class).into_iter().rev() {
        let count = graph.type_parameters_of(parent).len();
        let first = args.len().checked_sub(ordered.len() + count)?;
        ordered.extend_from_slice(&args[first..first + count]);
    }
    Some(ordered)
}

/// Whether `args` just restate the parameters of `class` (and of its
/// enclosing classes, for inner classes), as in `class Box<T>` referenced as
/// `Box<T>` from inside itself.
pub fn is_unspecialized(graph: &IrGraph, class: ClassId, args: &[TypeArgument]) -> bool {
    let decl = graph.class(class);
    if args.len() < decl.type_params.len() {
        return false;
    }
    let (own, rest) = args.split_at(decl.type_params.len());
    let restated = own.iter().zip(&decl.type_params).all(|(arg, param)| {
        matches!(
            arg,
            TypeArgument::Projection { variance: Variance::Invariant, ty }
                if ty.classifier() == Some(Classifier::TypeParameter(*param))
        )
    });
    if !restated {
        return false;
    }
    if rest.is_empty() {
        return true;
    }
    match decl.parent {
        DeclParent::Class(outer) if decl.is_inner => is_unspecialized(graph, outer, rest),
        _ => false,
    }
}

/// `Outer<A,B>.Inner<C,D>` from the left-to-right argument short names.
pub fn display_name(graph: &IrGraph, class: ClassId, ordered: &[String]) -> String {
    let mut parts = Vec::new();
    let mut taken = 0;
    for parent in parents_with_type_parameters_in_scope(graph, class).into_iter().rev() {
        let count = graph.type_parameters_of(parent).len();
        let DeclParent::Class(id) = parent else {
            taken += count;
            continue;
        };
        let name = &graph.class(id).name;
        let args = ordered.get(taken..taken + count).unwrap_or(&[]);
        taken += count;
        if args.is_empty() {
            parts.push(name.clone());
        } else {
            parts.push(format!("{}<{}>", name, args.join(",")));
        }
    }
    parts.join(".")
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn starts_with_is_prefix(name: &str) -> bool {
    name.strip_prefix("is")
        .and_then(|rest| rest.chars().next())
        .map(|c| !c.is_ascii_lowercase())
        .unwrap_or(false)
}

/// Platform getter name for a property: `getName`, or `isOpen` unchanged.
pub fn getter_name(property: &str) -> String {
    if starts_with_is_prefix(property) {
        property.to_string()
    } else {
        format!("get{}", capitalize(property))
    }
}

/// Platform setter name for a property: `setName`, `setOpen` for `isOpen`.
pub fn setter_name(property: &str) -> String {
    if starts_with_is_prefix(property) {
        format!("set{}", &property[2..])
    } else {
        format!("set{}", capitalize(property))
    }
}

/// Key body and short name of a class reference.
pub(crate) struct ClassLabel {
    pub key: String,
    pub short_name: String,
    /// Argument labels in source order; `None` for raw references.
    pub type_args: Option<Vec<TypeResult<kinds::RefType>>>,
}

impl<S: FactSink, Q: ExternalScheduler> Extractor<'_, S, Q> {
    /// `@"class;..."` key and short name for `class` applied to `args`
    /// (innermost scope first; `None` is raw, empty is unspecialized).
    pub(crate) fn class_label(&mut self, class: ClassId, args: Option<&[TypeArgument]>) -> ClassLabel {
        let graph = self.graph;
        if graph.class(class).is_anonymous {
            self.report(ExtractError::invariant(format!(
                "label requested for anonymous class in {}",
                graph.class(class).package
            )));
        }
        let unquoted = self.unquoted_class_label(class, args);
        ClassLabel {
            key: format!("@\"class;{}\"", unquoted.key),
            ..unquoted
        }
    }

    fn unquoted_class_label(&mut self, class: ClassId, args: Option<&[TypeArgument]>) -> ClassLabel {
        let graph = self.graph;
        let decl = graph.class(class);
        let qualified = match decl.parent {
            DeclParent::Class(outer) => {
                format!("{}${}", self.unquoted_class_label(outer, Some(&[])).key, decl.name)
            }
            DeclParent::Function(function) => {
                format!("{{{}}}.{}", self.use_function(function, None), decl.name)
            }
            DeclParent::File(_) | DeclParent::ExternalPackage(_) => {
                if decl.package.is_empty() {
                    decl.name.clone()
                } else {
                    format!("{}.{}", decl.package, decl.name)
                }
            }
        };

        let ordered = match args {
            None => None,
            Some(args) => Some(match order_type_args_left_to_right(graph, class, args) {
                Some(ordered) => ordered,
                None => {
                    self.report(ExtractError::invariant(format!(
                        "{} type arguments do not cover the parameters in scope of {}",
                        args.len(),
                        decl.name
                    )));
                    args.to_vec()
                }
            }),
        };
        let type_args: Option<Vec<TypeResult<kinds::RefType>>> = ordered.map(|ordered| {
            ordered
                .iter()
                .map(|arg| self.type_argument_label(arg))
                .collect()
        });

        let (key_suffix, short_suffix) = match &type_args {
            None => ("<>".to_string(), "<>".to_string()),
            Some(labels) if labels.is_empty() => (String::new(), String::new()),
            Some(labels) => {
                let key: String = labels.iter().map(|arg| format!(";{{{}}}", arg.id)).collect();
                let own = labels.len().saturating_sub(decl.type_params.len());
                let shown: Vec<&str> = labels[own..].iter().map(|arg| arg.short_name.as_str()).collect();
                (key, format!("<{}>", shown.join(",")))
            }
        };
        ClassLabel {
            key: qualified + &key_suffix,
            short_name: format!("{}{}", decl.name, short_suffix),
            type_args,
        }
    }

    /// Label of one type argument: the argument's own type when invariant,
    /// a bounded wildcard otherwise.
    pub fn type_argument_label(&mut self, arg: &TypeArgument) -> TypeResult<kinds::RefType> {
        match arg {
            TypeArgument::Star => {
                let any = self.graph.any_type();
                let bound = self.use_type(&any, TypeContext::Other).platform.id.cast();
                let id = self.bounded_wildcard(WildcardKind::Extends, "@\"wildcard;\"".into(), "?".into(), bound);
                TypeResult::new(id.cast(), None, "?")
            }
            TypeArgument::Projection { variance, ty } => {
                let bound = self.use_type(ty, TypeContext::GenericArgument).platform;
                let (prefix, kind) = match variance {
                    Variance::Invariant => return bound.cast(),
                    Variance::In => ("super", WildcardKind::Super),
                    Variance::Out => ("extends", WildcardKind::Extends),
                };
                let short_name = format!("? {} {}", prefix, bound.short_name);
                let key = format!("@\"wildcard;{}{{{}}}\"", prefix, bound.id);
                let id = self.bounded_wildcard(kind, key, short_name.clone(), bound.id.cast());
                TypeResult::new(id.cast(), None, short_name)
            }
        }
    }

    fn bounded_wildcard(
        &mut self,
        kind: WildcardKind,
        key: String,
        short_name: String,
        bound: Label<kinds::RefType>,
    ) -> Label<kinds::Wildcard> {
        self.label_for(&key, |this, id: Label<kinds::Wildcard>| {
            this.write(Fact::Wildcards {
                id,
                name: short_name,
                kind,
            });
            let location = this.unknown_location();
            this.write(Fact::HasLocation {
                element: id.any(),
                location,
            });
            let bound_key = format!("@\"bound;0;{{{}}}\"", id);
            this.label_for(&bound_key, |this, bound_id| {
                this.write(Fact::TypeBounds {
                    id: bound_id,
                    bound,
                    position: 0,
                    parent: id,
                });
            });
        })
    }
}
