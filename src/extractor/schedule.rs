use super::*;

/// Receives entities defined outside the unit being extracted.
pub trait ExternalScheduler {
    /// Queue `entity` for extraction by a later pass.
    fn extract_later(&mut self, entity: EntityRef, signature: Option<&str>);

    /// Record that the current unit depends on `entity`.
    fn add_dependency(&mut self, entity: EntityRef, signature: Option<&str>);
}

/// In-memory scheduler keeping requests in arrival order.
#[derive(Debug, Default)]
pub struct ExtractionQueue {
    pending: Vec<(EntityRef, Option<String>)>,
    dependencies: Vec<(EntityRef, Option<String>)>,
}

impl ExtractionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[(EntityRef, Option<String>)] {
        &self.pending
    }

    pub fn dependencies(&self) -> &[(EntityRef, Option<String>)] {
        &self.dependencies
    }

    /// Hands the queued entities to the caller, leaving the queue empty.
    pub fn take_pending(&mut self) -> Vec<(EntityRef, Option<String>)> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl ExternalScheduler for ExtractionQueue {
    fn extract_later(&mut self, entity: EntityRef, signature: Option<&str>) {
        self.pending.push((entity, signature.map(str::to_string)));
    }

    fn add_dependency(&mut self, entity: EntityRef, signature: Option<&str>) {
        self.dependencies
            .push((entity, signature.map(str::to_string)));
    }
}

const FIELD_SIGNATURE: &str = ";field";
const PROPERTY_SIGNATURE: &str = ";property";

impl<S: FactSink, Q: ExternalScheduler> Extractor<'_, S, Q> {
    fn is_external(&self, entity: EntityRef) -> bool {
        let graph = self.graph;
        match entity {
            EntityRef::Class(id) => graph.class(id).origin.is_external(),
            EntityRef::Function(id) => graph.function(id).origin.is_external(),
            EntityRef::Field(id) => graph.field(id).origin.is_external(),
            EntityRef::Property(id) => graph.property(id).origin.is_external(),
        }
    }

    /// The file class a member of an external file belongs to.
    fn external_file_class_of(&self, entity: EntityRef, parent: DeclParent) -> Option<ClassId> {
        if !self.is_external(entity) {
            return None;
        }
        match parent {
            DeclParent::Class(class) if self.graph.class(class).is_file_class => Some(class),
            _ => None,
        }
    }

    /// Hands `entity` to the scheduler unless it already was.
    fn schedule(&mut self, entity: EntityRef, signature: Option<&str>) {
        if !self.scheduled.insert(entity) {
            return;
        }
        debug!(%entity, signature, "scheduling external entity");
        self.scheduler.add_dependency(entity, signature);
        self.scheduler.extract_later(entity, signature);
    }

    pub fn schedule_class_if_external(&mut self, class: ClassId) {
        if self.is_external(EntityRef::Class(class)) {
            self.schedule(EntityRef::Class(class), None);
        }
    }

    /// Schedules the class enclosing an external member, looking through
    /// enclosing functions.
    pub fn schedule_enclosing_class(&mut self, parent: DeclParent) {
        let graph = self.graph;
        match parent {
            DeclParent::Class(class) => self.schedule(EntityRef::Class(class), None),
            DeclParent::Function(function) => self.schedule_enclosing_class(graph.function(function).parent),
            DeclParent::File(file) => self.report(ExtractError::invariant(format!(
                "external member of {} has no enclosing class",
                graph.file(file).path
            ))),
            DeclParent::ExternalPackage(fragment) => self.report(ExtractError::UnrecognizedConstruct {
                construct: "enclosing declaration",
                detail: format!("external package fragment {}", graph.fragment(fragment)),
            }),
        }
    }

    pub fn schedule_property_if_external_file_member(&mut self, property: PropertyId) {
        let entity = EntityRef::Property(property);
        if let Some(class) = self.external_file_class_of(entity, self.graph.property(property).parent) {
            self.schedule(EntityRef::Class(class), None);
            self.schedule(entity, Some(PROPERTY_SIGNATURE));
        }
    }

    pub fn schedule_field_if_external_file_member(&mut self, field: FieldId) {
        let entity = EntityRef::Field(field);
        if let Some(class) = self.external_file_class_of(entity, self.graph.field(field).parent) {
            self.schedule(EntityRef::Class(class), None);
            self.schedule(entity, Some(FIELD_SIGNATURE));
        }
    }

    /// Accessors are extracted with their property; other functions are
    /// located later by their erased parameter signature.
    pub fn schedule_function_if_external_file_member(&mut self, function: FunctionId) {
        let graph = self.graph;
        let decl = graph.function(function);
        let entity = EntityRef::Function(function);
        let Some(class) = self.external_file_class_of(entity, decl.parent) else {
            return;
        };
        self.schedule(EntityRef::Class(class), None);
        if let Some(property) = decl.property {
            self.schedule_property_if_external_file_member(property);
            return;
        }
        if self.scheduled.contains(&entity) {
            return;
        }
        // Erased, so a type parameter never resolves back through this function.
        let mut signatures = Vec::new();
        for param in decl.extension_receiver.iter().chain(decl.value_params.iter()) {
            let erased = erase(graph, &graph.value_param(*param).ty);
            let signature = self
                .use_type(&erased, TypeContext::Other)
                .platform
                .signature
                .unwrap_or_else(|| "unknown".into());
            signatures.push(signature);
        }
        let signature = format!("({})", signatures.join(","));
        self.schedule(entity, Some(&signature));
    }
}
