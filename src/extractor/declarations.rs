use super::*;
use crate::ir::{ClassKind, EnumEntryId, FileId, TypeAliasId, ValueParamId};

/// Name of a function in the fact base and in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionNames {
    pub name_in_db: String,
    pub source_name: String,
}

impl FunctionNames {
    fn same(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            name_in_db: name.clone(),
            source_name: name,
        }
    }
}

/// Labels for the class generated around a local function or lambda.
#[derive(Debug, Clone)]
pub struct LocalFunctionLabels {
    pub ty: TypeResults,
    pub constructor: Label<kinds::Callable>,
    pub constructor_block: Label<kinds::Element>,
    pub function: Label<kinds::Callable>,
}

const INVOKE: &str = "invoke";

/// `src/app/main.kt` → `MainKt`.
pub(crate) fn default_file_class_name(path: &str) -> String {
    let file_name = path.rsplit(&['/', '\\'][..]).next().unwrap_or(path);
    let stem = file_name.strip_suffix(".kt").unwrap_or(file_name);
    let mut chars = stem.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    };
    capitalized + "Kt"
}

impl<S: FactSink, Q: ExternalScheduler> Extractor<'_, S, Q> {
    pub fn use_package(&mut self, package: &str) -> Label<kinds::Package> {
        self.label_for(&format!("@\"package;{}\"", package), |this, id| {
            this.write(Fact::Packages {
                id,
                name: package.to_string(),
            });
        })
    }

    pub fn extract_modifier(&mut self, modifier: &str) -> Label<kinds::Modifier> {
        self.label_for(&format!("@\"modifier;{}\"", modifier), |this, id| {
            this.write(Fact::Modifiers {
                id,
                name: modifier.to_string(),
            });
        })
    }

    pub fn add_modifiers(&mut self, element: AnyLabel, modifiers: &[&str]) {
        for modifier in modifiers {
            let modifier = self.extract_modifier(modifier);
            self.write(Fact::HasModifier { element, modifier });
        }
    }

    pub fn use_file(&mut self, path: &str) -> Label<kinds::File> {
        self.label_for(&format!("@\"file;{}\"", path), |this, id| {
            this.write(Fact::Files {
                id,
                path: path.to_string(),
            });
        })
    }

    pub fn whole_file_location(&mut self, file: Label<kinds::File>) -> Label<kinds::Location> {
        self.label_for(&format!("@\"loc;{{{}}};whole\"", file), |this, id| {
            this.write(Fact::Locations {
                id,
                file,
                start_line: 0,
                start_column: 0,
                end_line: 0,
                end_column: 0,
            });
        })
    }

    pub fn unknown_location(&mut self) -> Label<kinds::Location> {
        let file = self.use_file("");
        self.label_for("@\"loc;unknown\"", |this, id| {
            this.write(Fact::Locations {
                id,
                file,
                start_line: 0,
                start_column: 0,
                end_line: 0,
                end_column: 0,
            });
        })
    }

    /// The platform class holding a file's top-level declarations.
    pub fn extract_file_class(&mut self, file: FileId) -> Label<kinds::ClassOrInterface> {
        let graph = self.graph;
        let decl = graph.file(file);
        let name = decl
            .jvm_name
            .clone()
            .unwrap_or_else(|| default_file_class_name(&decl.path));
        let qualified = if decl.package.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", decl.package, name)
        };
        self.label_for(&format!("@\"class;{}\"", qualified), |this, id| {
            let file_id = this.use_file(&decl.path);
            let location = this.whole_file_location(file_id);
            let package = this.use_package(&decl.package);
            this.write(Fact::Classes {
                id,
                name,
                package,
                source: id,
            });
            this.write(Fact::FileClass { id });
            this.write(Fact::HasLocation {
                element: id.any(),
                location,
            });
            this.add_modifiers(id.any(), &["public", "final"]);
        })
    }

    pub fn use_file_class_type(&mut self, file: FileId) -> TypeResults {
        let id = self.extract_file_class(file);
        let source = self.source_type(id.cast(), false, Some(""), "");
        TypeResults {
            platform: TypeResult::new(id.cast(), Some(String::new()), ""),
            source,
        }
    }

    /// Label of the entity a declaration hangs off.
    ///
    /// A file is its package for declarations that can be top-level on the
    /// platform, and its file class otherwise. `class_args` selects a class
    /// instance instead of the class as declared.
    pub fn use_declaration_parent(
        &mut self,
        parent: DeclParent,
        can_be_top_level: bool,
        class_args: Option<&[TypeArgument]>,
    ) -> AnyLabel {
        let graph = self.graph;
        match parent {
            DeclParent::File(file) => {
                if can_be_top_level {
                    self.use_package(&graph.file(file).package).any()
                } else {
                    self.extract_file_class(file).any()
                }
            }
            DeclParent::Class(class) => match class_args {
                Some(args) if !graph.class(class).is_anonymous => {
                    self.use_class_instance(class, Some(args)).id.any()
                }
                _ => self.use_class_source(class).any(),
            },
            DeclParent::Function(function) => self.use_function(function, None).any(),
            DeclParent::ExternalPackage(fragment) => {
                self.report(ExtractError::UnrecognizedConstruct {
                    construct: "declaration parent",
                    detail: format!("external package fragment {}", graph.fragment(fragment)),
                });
                self.unknown_label::<kinds::Element>().any()
            }
        }
    }

    pub fn function_names(&mut self, function: FunctionId) -> FunctionNames {
        let graph = self.graph;
        let decl = graph.function(function);
        if decl.origin == Origin::Lambda || decl.is_anonymous() {
            return FunctionNames::same(INVOKE);
        }
        if let Some(property) = decl.property {
            let prop = graph.property(property);
            let in_annotation = graph
                .enclosing_class(prop.parent)
                .map(|class| graph.class(class).kind == ClassKind::Annotation)
                .unwrap_or(false);
            if in_annotation {
                return match prop.getter {
                    Some(getter) => FunctionNames {
                        name_in_db: graph
                            .function(getter)
                            .jvm_name
                            .clone()
                            .unwrap_or_else(|| prop.name.clone()),
                        source_name: prop.name.clone(),
                    },
                    None => {
                        self.report(ExtractError::invariant(format!(
                            "property {} of an annotation class has no getter",
                            prop.name
                        )));
                        FunctionNames::same(prop.name.clone())
                    }
                };
            }
            if prop.getter == Some(function) {
                let platform = getter_name(&prop.name);
                return FunctionNames {
                    name_in_db: decl.jvm_name.clone().unwrap_or_else(|| platform.clone()),
                    source_name: platform,
                };
            }
            if prop.setter == Some(function) {
                let platform = setter_name(&prop.name);
                return FunctionNames {
                    name_in_db: decl.jvm_name.clone().unwrap_or_else(|| platform.clone()),
                    source_name: platform,
                };
            }
            self.report(ExtractError::invariant(format!(
                "{} belongs to property {} but is neither its getter nor its setter",
                decl.name, prop.name
            )));
        }
        FunctionNames {
            name_in_db: decl.jvm_name.clone().unwrap_or_else(|| decl.name.clone()),
            source_name: decl.name.clone(),
        }
    }

    /// `@"callable;{parent}.name({param},...){return}<n>"`.
    ///
    /// `class_args` are the arguments of the enclosing class instance the
    /// function is referenced through, innermost scope first; `None` refers
    /// to the function in its declaring class.
    pub fn function_label(
        &mut self,
        function: FunctionId,
        parent_id: Option<AnyLabel>,
        class_args: Option<&[TypeArgument]>,
    ) -> String {
        let graph = self.graph;
        let decl = graph.function(function);
        let parent_id = match parent_id {
            Some(id) => id,
            None => self.use_declaration_parent(decl.parent, false, class_args),
        };
        let name = self.function_names(function).name_in_db;

        let substitution = match class_args {
            Some(args) if !args.is_empty() => graph
                .enclosing_class(decl.parent)
                .map(|class| SubstitutionMap::for_class(graph, class, args)),
            _ => None,
        };
        let specialize = |ty: &IrType| match &substitution {
            Some(map) => substitute(graph, ty, map),
            None => ty.clone(),
        };

        let params: Vec<ValueParamId> = decl
            .extension_receiver
            .into_iter()
            .chain(decl.value_params.iter().copied())
            .collect();
        let mut param_ids = Vec::with_capacity(params.len());
        for param in params {
            let ty = specialize(&graph.value_param(param).ty);
            // Generic functions are named for their erased parameter types.
            let ty = if decl.type_params.is_empty() {
                ty
            } else {
                erase(graph, &ty)
            };
            let id = self.use_type(&ty, TypeContext::Other).platform.id;
            param_ids.push(format!("{{{}}}", id));
        }

        let return_type = if decl.is_constructor {
            graph.unit_type()
        } else {
            erase(graph, &specialize(&decl.return_type))
        };
        let return_id = self.use_type(&return_type, TypeContext::Return).platform.id;
        let suffix = if !decl.type_params.is_empty() && class_args.map_or(true, |args| args.is_empty()) {
            format!("<{}>", decl.type_params.len())
        } else {
            String::new()
        };
        format!(
            "@\"callable;{{{}}}.{}({}){{{}}}{}\"",
            parent_id,
            name,
            param_ids.join(","),
            return_id,
            suffix
        )
    }

    pub fn use_function(
        &mut self,
        function: FunctionId,
        class_args: Option<&[TypeArgument]>,
    ) -> Label<kinds::Callable> {
        let graph = self.graph;
        if graph.function(function).is_local {
            return self.local_function_labels(function).function;
        }
        let function = self.try_replace_synthetic_function(function);
        let key = self.function_label(function, None, class_args);
        let id = self.label_for_key(&key);
        if graph.function(function).origin.is_external() {
            self.schedule_function_if_external_file_member(function);
            self.schedule_enclosing_class(graph.function(function).parent);
        }
        id
    }

    /// Fresh labels for the class generated around a local function or
    /// lambda, created once per function.
    pub fn local_function_labels(&mut self, function: FunctionId) -> LocalFunctionLabels {
        let graph = self.graph;
        if !graph.function(function).is_local {
            self.report(ExtractError::invariant(format!(
                "{} is not local but was given local function labels",
                graph.function(function).name
            )));
        }
        if let Some(labels) = self.local_functions.get(&function) {
            return labels.clone();
        }
        let class: Label<kinds::ClassOrInterface> = self.fresh_label();
        let source = match self.config.source_types {
            SourceTypes::Precise => {
                let source: Label<kinds::SourceType> = self.fresh_label();
                self.write(Fact::SourceNotNullType {
                    id: source,
                    ty: class.cast(),
                });
                TypeResult::new(source, Some(String::new()), "")
            }
            SourceTypes::Placeholder => self.fake_source_type(),
        };
        let labels = LocalFunctionLabels {
            ty: TypeResults {
                platform: TypeResult::new(class.cast(), Some(String::new()), ""),
                source,
            },
            constructor: self.fresh_label(),
            constructor_block: self.fresh_label(),
            function: self.fresh_label(),
        };
        self.local_functions.insert(function, labels.clone());
        labels
    }

    pub fn use_field(&mut self, field: FieldId) -> Label<kinds::Field> {
        let field = self.try_replace_synthetic_field(field);
        let graph = self.graph;
        let decl = graph.field(field);
        let parent = self.use_declaration_parent(decl.parent, false, None);
        let id = self.label_for_key(&format!("@\"field;{{{}}};{}\"", parent, decl.name));
        self.schedule_field_if_external_file_member(field);
        id
    }

    pub fn use_property(&mut self, property: PropertyId) -> Label<kinds::Property> {
        let graph = self.graph;
        let decl = graph.property(property);
        let parent = self.use_declaration_parent(decl.parent, false, None);
        let id = self.label_for_key(&format!("@\"property;{{{}}};{}\"", parent, decl.name));
        self.schedule_property_if_external_file_member(property);
        id
    }

    pub fn use_enum_entry(&mut self, entry: EnumEntryId) -> Label<kinds::Field> {
        let graph = self.graph;
        let decl = graph.enum_entry(entry);
        let parent = self.use_declaration_parent(DeclParent::Class(decl.parent), false, None);
        self.label_for_key(&format!("@\"field;{{{}}};{}\"", parent, decl.name))
    }

    /// Label of a value parameter, in the context of callable `parent` or of
    /// its declaring function.
    pub fn use_value_parameter(
        &mut self,
        param: ValueParamId,
        parent: Option<Label<kinds::Callable>>,
    ) -> Label<kinds::Param> {
        let graph = self.graph;
        let decl = graph.value_param(param);
        let parent = match parent {
            Some(parent) => parent.any(),
            None => self.use_declaration_parent(DeclParent::Function(decl.parent), false, None),
        };
        if decl.index < 0 && graph.function(decl.parent).extension_receiver != Some(param) {
            self.report(ExtractError::invariant(format!(
                "unexpected negative index for parameter {}",
                decl.name
            )));
        }
        self.label_for_key(&format!("@\"params;{{{}}};{}\"", parent, decl.index))
    }

    pub fn use_type_alias(&mut self, alias: TypeAliasId) -> Label<kinds::TypeAlias> {
        let graph = self.graph;
        let decl = graph.type_alias(alias);
        let parent = self.use_declaration_parent(decl.parent, true, None);
        self.label_for_key(&format!("@\"type_alias;{{{}}};{}\"", parent, decl.name))
    }
}
