use super::*;
use tracing::info;

/// Three-state lookup memo: a failed lookup is remembered as such.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Memo<T> {
    NotTried,
    Found(T),
    KnownAbsent,
}

fn memo_of<K: std::hash::Hash + Eq, T: Copy>(memos: &FxHashMap<K, Memo<T>>, key: &K) -> Memo<T> {
    memos.get(key).copied().unwrap_or(Memo::NotTried)
}

impl<S: FactSink, Q: ExternalScheduler> Extractor<'_, S, Q> {
    /// Stub classes loaded without any supertype, other than the root class,
    /// are placeholders produced by build tooling.
    pub fn is_synthetic_class(&self, class: ClassId) -> bool {
        let decl = self.graph.class(class);
        decl.super_types.is_empty()
            && decl.origin == Origin::ExternalJavaStub
            && self.graph.fq_name(class).as_deref() != Some(self.config.root_class.as_str())
    }

    /// The real class standing behind a synthetic one, or `class` itself.
    pub fn try_replace_synthetic_class(&mut self, class: ClassId) -> ClassId {
        if !self.config.replace_synthetic || !self.is_synthetic_class(class) {
            return class;
        }
        match memo_of(&self.synthetic_classes, &class) {
            Memo::Found(real) => return real,
            Memo::KnownAbsent => return class,
            Memo::NotTried => {}
        }
        let graph = self.graph;
        let name = graph.class(class).name.clone();
        let real = graph.fq_name(class).and_then(|fq_name| {
            graph
                .classes_named(&fq_name)
                .find(|candidate| *candidate != class && !self.is_synthetic_class(*candidate))
        });
        match real {
            Some(real) => {
                info!(class = %name, "replaced synthetic class with its real equivalent");
                self.synthetic_classes.insert(class, Memo::Found(real));
                real
            }
            None => {
                self.synthetic_classes.insert(class, Memo::KnownAbsent);
                self.report(ExtractError::ResolutionFailure {
                    entity: format!("synthetic class {}", name),
                    reason: "no real class with the same name".into(),
                });
                class
            }
        }
    }

    /// Same-named function of the real class, with matching parameter types.
    pub fn try_replace_synthetic_function(&mut self, function: FunctionId) -> FunctionId {
        let graph = self.graph;
        let decl = graph.function(function);
        let DeclParent::Class(parent) = decl.parent else {
            return function;
        };
        let replacement = self.try_replace_synthetic_class(parent);
        if replacement == parent {
            return function;
        }
        match memo_of(&self.synthetic_functions, &function) {
            Memo::Found(real) => return real,
            Memo::KnownAbsent => return function,
            Memo::NotTried => {}
        }
        let real = graph.class(replacement).functions.iter().copied().find(|candidate| {
            let other = graph.function(*candidate);
            other.name == decl.name
                && other
                    .value_params
                    .iter()
                    .zip(&decl.value_params)
                    .all(|(a, b)| graph.value_param(*a).ty == graph.value_param(*b).ty)
        });
        match real {
            Some(real) => {
                info!(function = %decl.name, "replaced synthetic class function with its real equivalent");
                self.synthetic_functions.insert(function, Memo::Found(real));
                real
            }
            None => {
                self.synthetic_functions.insert(function, Memo::KnownAbsent);
                self.report(ExtractError::ResolutionFailure {
                    entity: format!("synthetic class function {}", decl.name),
                    reason: "no matching function in the real class".into(),
                });
                function
            }
        }
    }

    pub fn try_replace_synthetic_field(&mut self, field: FieldId) -> FieldId {
        let graph = self.graph;
        let decl = graph.field(field);
        let DeclParent::Class(parent) = decl.parent else {
            return field;
        };
        let replacement = self.try_replace_synthetic_class(parent);
        if replacement == parent {
            return field;
        }
        match memo_of(&self.synthetic_fields, &field) {
            Memo::Found(real) => return real,
            Memo::KnownAbsent => return field,
            Memo::NotTried => {}
        }
        let real = graph
            .class(replacement)
            .fields
            .iter()
            .copied()
            .find(|candidate| graph.field(*candidate).name == decl.name);
        match real {
            Some(real) => {
                info!(field = %decl.name, "replaced synthetic class field with its real equivalent");
                self.synthetic_fields.insert(field, Memo::Found(real));
                real
            }
            None => {
                self.synthetic_fields.insert(field, Memo::KnownAbsent);
                self.report(ExtractError::ResolutionFailure {
                    entity: format!("synthetic class field {}", decl.name),
                    reason: "no field of that name in the real class".into(),
                });
                field
            }
        }
    }
}
