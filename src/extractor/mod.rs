//! Canonical labelling of types and declarations.
//!
//! An [`Extractor`] owns every cache of one extraction run: the label table,
//! the set of entities already handed to the scheduler, synthetic
//! replacements and the memoized labels of anonymous and local entities.
//! Work is split over submodules that each add an `impl Extractor` block.

use crate::config::{ExtractorConfig, SourceTypes};
use crate::diagnostics::ExtractError;
use crate::facts::{kinds, AnyLabel, Fact, FactLog, FactSink, Label, TypeResult, TypeResults};
use crate::ir::{
    ClassId, Classifier, DeclParent, EntityRef, FieldId, FunctionId, IrGraph, IrType, Origin,
    PropertyId, TypeArgument, TypeParamId, Variance,
};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, error, trace, warn};

mod declarations;
mod generics;
mod interner;
mod naming;
mod resolve;
mod schedule;
mod synthetic;

pub use declarations::{FunctionNames, LocalFunctionLabels};
pub use generics::{erase, erase_type_parameter, normalize_array, substitute, SubstitutionMap, SupertypeMode};
pub use interner::{Interned, KeyState, LabelTable};
pub use naming::{
    display_name, getter_name, is_unspecialized, order_type_args_left_to_right,
    parents_with_type_parameters_in_scope, setter_name, type_parameters_in_scope,
};
pub use resolve::TypeContext;
pub use schedule::{ExternalScheduler, ExtractionQueue};
pub use synthetic::Memo;

pub struct Extractor<'g, S: FactSink = FactLog, Q: ExternalScheduler = ExtractionQueue> {
    graph: &'g IrGraph,
    config: ExtractorConfig,
    sink: S,
    scheduler: Q,
    labels: LabelTable,
    scheduled: FxHashSet<EntityRef>,
    synthetic_classes: FxHashMap<ClassId, Memo<ClassId>>,
    synthetic_functions: FxHashMap<FunctionId, Memo<FunctionId>>,
    synthetic_fields: FxHashMap<FieldId, Memo<FieldId>>,
    anonymous_classes: FxHashMap<ClassId, TypeResults>,
    local_functions: FxHashMap<FunctionId, LocalFunctionLabels>,
    diagnostics: Vec<ExtractError>,
    depth: usize,
}

impl<'g> Extractor<'g> {
    /// Extractor writing to a [`FactLog`] and scheduling into an [`ExtractionQueue`].
    pub fn in_memory(graph: &'g IrGraph, config: ExtractorConfig) -> Self {
        Self::new(graph, config, FactLog::new(), ExtractionQueue::new())
    }
}

impl<'g, S: FactSink, Q: ExternalScheduler> Extractor<'g, S, Q> {
    pub fn new(graph: &'g IrGraph, config: ExtractorConfig, sink: S, scheduler: Q) -> Self {
        Self {
            graph,
            config,
            sink,
            scheduler,
            labels: LabelTable::new(),
            scheduled: FxHashSet::default(),
            synthetic_classes: FxHashMap::default(),
            synthetic_functions: FxHashMap::default(),
            synthetic_fields: FxHashMap::default(),
            anonymous_classes: FxHashMap::default(),
            local_functions: FxHashMap::default(),
            diagnostics: Vec::new(),
            depth: 0,
        }
    }

    pub fn graph(&self) -> &'g IrGraph {
        self.graph
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn scheduler(&self) -> &Q {
        &self.scheduler
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn diagnostics(&self) -> &[ExtractError] {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (S, Q, Vec<ExtractError>) {
        (self.sink, self.scheduler, self.diagnostics)
    }

    /// Label for `key`, running `init` the first time the key is seen.
    ///
    /// `init` may intern other keys. Asking for a key whose initializer is
    /// still on the stack yields its reserved label without running anything.
    pub fn label_for<K>(&mut self, key: &str, init: impl FnOnce(&mut Self, Label<K>)) -> Label<K> {
        match self.labels.intern(key) {
            Interned::Fresh(raw) => {
                let label = Label::from_raw(raw);
                self.sink.bind_label(label.any(), key);
                debug!(%label, key, "new label");
                init(self, label);
                self.labels.finish(key);
                label
            }
            Interned::Existing(raw) => Label::from_raw(raw),
            Interned::Reentrant(raw) => {
                trace!(key, "key requested while its initializer runs");
                Label::from_raw(raw)
            }
        }
    }

    /// Label for `key` when no facts hang off its creation.
    pub fn label_for_key<K>(&mut self, key: &str) -> Label<K> {
        self.label_for(key, |_, _| {})
    }

    pub fn fresh_label<K>(&mut self) -> Label<K> {
        let label = Label::from_raw(self.labels.fresh());
        self.sink.bind_fresh(label.any());
        label
    }

    pub(crate) fn write(&mut self, fact: Fact) {
        self.sink.write(fact);
    }

    pub(crate) fn report(&mut self, error: ExtractError) {
        if error.is_warning() {
            warn!("{}", error);
        } else {
            error!("{}", error);
        }
        self.diagnostics.push(error);
    }

    /// Placeholder label used wherever resolution failed.
    pub fn unknown_label<K>(&mut self) -> Label<K> {
        self.fresh_label()
    }

    pub fn unknown_results(&mut self) -> TypeResults {
        TypeResults {
            platform: TypeResult::new(self.unknown_label(), Some("unknown".into()), "unknown"),
            source: TypeResult::new(self.unknown_label(), Some("unknown".into()), "unknown"),
        }
    }
}

/// Human-readable rendering of a type for diagnostics.
pub(crate) fn describe_type(graph: &IrGraph, ty: &IrType) -> String {
    match ty {
        IrType::Dynamic => "dynamic".into(),
        IrType::Error(message) => format!("error type ({})", message),
        IrType::Simple(simple) => {
            let mut out = match simple.classifier {
                Classifier::Class(id) => graph
                    .fq_name(id)
                    .unwrap_or_else(|| graph.class(id).name.clone()),
                Classifier::TypeParameter(id) => format!("type parameter {}", graph.type_param(id).name),
            };
            if !simple.arguments.is_empty() {
                let args: Vec<String> = simple
                    .arguments
                    .iter()
                    .map(|arg| match arg {
                        TypeArgument::Star => "*".to_string(),
                        TypeArgument::Projection { variance, ty } => match variance {
                            Variance::Invariant => describe_type(graph, ty),
                            other => format!("{} {}", other.keyword(), describe_type(graph, ty)),
                        },
                    })
                    .collect();
                out.push('<');
                out.push_str(&args.join(", "));
                out.push('>');
            }
            if simple.nullable {
                out.push('?');
            }
            out
        }
    }
}

#[cfg(test)]
mod tests;
