use super::*;
use crate::ir::PrimitiveInfo;

/// Where a type is used; decides between primitive and boxed forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeContext {
    Return,
    GenericArgument,
    Other,
}

/// The cases the resolver knows how to label.
enum TypeShape<'a> {
    Primitive {
        class: ClassId,
        info: &'a PrimitiveInfo,
    },
    Array {
        component: IrType,
        element: IrType,
        dimensions: u32,
        primitive: bool,
    },
    Class {
        class: ClassId,
        args: Option<&'a [TypeArgument]>,
    },
    TypeVariable(TypeParamId),
    Unrecognized(&'static str),
}

fn classify<'a>(graph: &'a IrGraph, ty: &'a IrType) -> TypeShape<'a> {
    let simple = match ty {
        IrType::Simple(simple) => simple,
        IrType::Dynamic => return TypeShape::Unrecognized("dynamic type"),
        IrType::Error(_) => return TypeShape::Unrecognized("error type"),
    };
    let class = match simple.classifier {
        Classifier::TypeParameter(param) => return TypeShape::TypeVariable(param),
        Classifier::Class(class) => class,
    };
    if let Some(info) = graph.primitives().info(class) {
        return TypeShape::Primitive { class, info };
    }
    let boxed_with_args = graph.is_boxed_array(ty) && !simple.arguments.is_empty();
    if boxed_with_args || graph.is_primitive_array(ty) {
        let mut primitive = graph.is_primitive_array(ty);
        let component = graph
            .array_element_type(ty)
            .unwrap_or_else(|| graph.nullable_any_type());
        let mut element = component.clone();
        let mut dimensions = 1;
        while graph.is_array(&element) {
            dimensions += 1;
            primitive |= graph.is_primitive_array(&element);
            element = match graph.array_element_type(&element) {
                Some(inner) => inner,
                None => break,
            };
        }
        return TypeShape::Array {
            component,
            element,
            dimensions,
            primitive,
        };
    }
    let args = if simple.raw {
        None
    } else {
        Some(simple.arguments.as_slice())
    };
    TypeShape::Class { class, args }
}

impl<S: FactSink, Q: ExternalScheduler> Extractor<'_, S, Q> {
    /// Platform and source labels for `ty` used in `context`.
    pub fn use_type(&mut self, ty: &IrType, context: TypeContext) -> TypeResults {
        if self.depth >= self.config.max_depth {
            let graph = self.graph;
            self.report(ExtractError::invariant(format!(
                "type nesting exceeds {} levels at {}",
                self.config.max_depth,
                describe_type(graph, ty)
            )));
            return self.unknown_results();
        }
        self.depth += 1;
        let results = self.use_type_shape(ty, context);
        self.depth -= 1;
        results
    }

    fn use_type_shape(&mut self, ty: &IrType, context: TypeContext) -> TypeResults {
        let graph = self.graph;
        match classify(graph, ty) {
            TypeShape::Primitive { class, info } => self.use_primitive(ty, class, info, context),
            TypeShape::Array {
                component,
                element,
                dimensions,
                primitive,
            } => self.use_array_type(ty, &component, &element, dimensions, primitive),
            TypeShape::Class { class, args } => self.use_simple_type_class(class, args, ty.is_nullable()),
            TypeShape::TypeVariable(param) => {
                let platform = self.use_type_parameter(param);
                let source = self.source_type(
                    platform.id.cast(),
                    ty.is_nullable(),
                    platform.signature.as_deref(),
                    &platform.short_name,
                );
                TypeResults {
                    platform: platform.cast(),
                    source,
                }
            }
            TypeShape::Unrecognized(construct) => {
                self.report(ExtractError::UnrecognizedConstruct {
                    construct,
                    detail: describe_type(graph, ty),
                });
                self.unknown_results()
            }
        }
    }

    fn use_primitive(
        &mut self,
        ty: &IrType,
        class: ClassId,
        info: &PrimitiveInfo,
        context: TypeContext,
    ) -> TypeResults {
        let wants_primitive = match context {
            TypeContext::Return => true,
            TypeContext::Other => info.other_is_primitive,
            TypeContext::GenericArgument => false,
        };
        let primitive_name = info
            .primitive_name
            .as_deref()
            .filter(|_| wants_primitive && !ty.is_nullable());
        let platform = match primitive_name {
            Some(name) => {
                let key = format!("@\"type;{}\"", name);
                let id = self.label_for(&key, |this, id| {
                    this.write(Fact::Primitives {
                        id,
                        name: name.to_string(),
                    })
                });
                TypeResult::new(id, Some(name.to_string()), name).cast()
            }
            None => self.add_class_label(info.boxed_class, Some(&[])).cast(),
        };
        let source_class = self.use_class_instance(class, Some(&[])).id;
        let signature = if info.source_package.is_empty() {
            info.source_name.clone()
        } else {
            format!("{}.{}", info.source_package, info.source_name)
        };
        let source = self.source_type(
            source_class.cast(),
            ty.is_nullable(),
            Some(&signature),
            &info.source_name,
        );
        TypeResults { platform, source }
    }

    fn use_array_type(
        &mut self,
        array: &IrType,
        component: &IrType,
        element: &IrType,
        dimensions: u32,
        primitive: bool,
    ) -> TypeResults {
        let graph = self.graph;
        // Array<Int> is Integer[], IntArray is int[].
        let boxed_unless_primitive = |ty: &IrType| {
            if graph.is_primitive_type(ty) && !primitive {
                ty.make_nullable()
            } else {
                ty.clone()
            }
        };
        let component_results = self.use_type(&boxed_unless_primitive(component), TypeContext::Other);
        let element_label = self
            .use_type(&boxed_unless_primitive(element), TypeContext::Other)
            .platform
            .id;
        let short_name = format!("{}[]", component_results.platform.short_name);
        let key = format!("@\"array;{};{{{}}}\"", dimensions, element_label);
        let component_label = component_results.platform.id;
        let id: Label<kinds::Array> = self.label_for(&key, |this, id| {
            this.init_array(array, id, short_name.clone(), element_label, dimensions, component_label)
        });

        let platform = TypeResult::new(
            id.cast(),
            component_results
                .platform
                .signature
                .as_ref()
                .map(|signature| format!("{}[]", signature)),
            short_name,
        );
        let source = match array.class_id() {
            Some(class) => {
                self.use_simple_type_class(class, Some(array.arguments()), array.is_nullable())
                    .source
            }
            None => self.unknown_results().source,
        };
        TypeResults { platform, source }
    }

    fn init_array(
        &mut self,
        array: &IrType,
        id: Label<kinds::Array>,
        short_name: String,
        element: Label<kinds::Type>,
        dimensions: u32,
        component: Label<kinds::Type>,
    ) {
        let graph = self.graph;
        self.write(Fact::Arrays {
            id,
            name: short_name,
            element,
            dimensions,
            component,
        });
        if let Some(class) = array.class_id() {
            self.extract_supertypes(
                class,
                id.cast(),
                SupertypeMode::Specialized(array.arguments().to_vec()),
            );
        }

        let length: Label<kinds::Field> = self.label_for_key(&format!("@\"field;{{{}}};length\"", id));
        let int = self.use_type(&graph.int_type(), TypeContext::Other);
        self.write(Fact::Fields {
            id: length,
            name: "length".into(),
            ty: int.platform.id,
            parent: id.cast(),
            source: length,
        });
        self.write(Fact::FieldsSourceType {
            id: length,
            ty: int.source.id,
        });
        self.add_modifiers(length.any(), &["public", "final"]);

        // One clone() per platform array type, so its source return type is
        // the invariant, nullable form of the array.
        let clone_return = normalize_array(graph, array).make_nullable();
        let clone_return = self.use_type(&clone_return, TypeContext::Other).source.id;
        let clone: Label<kinds::Callable> =
            self.label_for_key(&format!("@\"callable;{{{id}}}.clone(){{{id}}}\"", id = id));
        self.write(Fact::Methods {
            id: clone,
            name: "clone".into(),
            signature: "clone()".into(),
            return_type: id.cast(),
            parent: id.cast(),
            source: clone,
        });
        self.write(Fact::MethodsSourceType {
            id: clone,
            ty: clone_return,
        });
        self.add_modifiers(clone.any(), &["public"]);
    }

    /// Class reference with `args` innermost scope first; `None` is raw.
    pub fn use_simple_type_class(
        &mut self,
        class: ClassId,
        args: Option<&[TypeArgument]>,
        nullable: bool,
    ) -> TypeResults {
        let graph = self.graph;
        if graph.class(class).is_anonymous {
            if let Some(args) = args {
                if !args.is_empty() && !is_unspecialized(graph, class, args) {
                    self.report(ExtractError::invariant(
                        "specialized instance of a generic anonymous class",
                    ));
                }
            }
            return self.use_anonymous_class(class);
        }
        let instance = self.use_class_instance(class, args);
        let source_name = graph.fq_name(class);
        let source = self.source_type(
            instance.id.cast(),
            nullable,
            source_name.as_deref(),
            &instance.short_name,
        );
        TypeResults {
            platform: instance.cast(),
            source,
        }
    }

    /// Label of `class` applied to `args`, after swapping in the platform
    /// equivalent of the class. Arguments that restate the class's own
    /// parameters are dropped.
    pub fn use_class_instance(
        &mut self,
        class: ClassId,
        args: Option<&[TypeArgument]>,
    ) -> TypeResult<kinds::ClassOrInterface> {
        let graph = self.graph;
        if graph.class(class).is_anonymous {
            self.report(ExtractError::invariant("unexpected use of an anonymous class instance"));
        }
        let extracted = graph.platform_equivalent(class).unwrap_or(class);
        let args = match args {
            Some(args) if !args.is_empty() && is_unspecialized(graph, class, args) => Some(&[][..]),
            other => other,
        };
        let result = self.add_class_label(extracted, args);
        // Both the source class and its platform equivalent end up in the facts.
        if extracted != class {
            self.schedule_class_if_external(class);
        }
        result
    }

    /// Interns the class label; the first time, writes the class facts,
    /// its supertypes and schedules it when external.
    pub fn add_class_label(
        &mut self,
        class: ClassId,
        args: Option<&[TypeArgument]>,
    ) -> TypeResult<kinds::ClassOrInterface> {
        let graph = self.graph;
        let class = self.try_replace_synthetic_class(class);
        let label = self.class_label(class, args);
        let id = self.label_for(&label.key, |this, id| {
            this.init_class(class, args, id, &label);
        });
        TypeResult::new(id, graph.fq_name(class), label.short_name)
    }

    fn init_class(
        &mut self,
        class: ClassId,
        args: Option<&[TypeArgument]>,
        id: Label<kinds::ClassOrInterface>,
        label: &naming::ClassLabel,
    ) {
        let graph = self.graph;
        let decl = graph.class(class);
        self.schedule_class_if_external(class);

        let package = self.use_package(&decl.package);
        let source = match args {
            Some([]) => id,
            _ => self.use_class_source(class),
        };
        let name = label.short_name.clone();
        self.write(if decl.is_interface() {
            Fact::Interfaces {
                id,
                name,
                package,
                source,
            }
        } else {
            Fact::Classes {
                id,
                name,
                package,
                source,
            }
        });

        let mode = match args {
            None => SupertypeMode::Raw,
            Some([]) => SupertypeMode::Unbound,
            Some(args) => SupertypeMode::Specialized(args.to_vec()),
        };
        if mode != SupertypeMode::Unbound {
            for (position, arg) in label.type_args.iter().flatten().enumerate() {
                self.write(Fact::TypeArgs {
                    arg: arg.id,
                    position: position as u32,
                    parent: id,
                });
            }
            self.write(if args.is_none() {
                Fact::IsRaw { id }
            } else {
                Fact::IsParameterized { id }
            });
            self.write(Fact::Erasure { id, erasure: source });
            let ordered: Vec<String> = label
                .type_args
                .iter()
                .flatten()
                .map(|arg| arg.short_name.clone())
                .collect();
            debug!(
                class = %display_name(graph, class, &ordered),
                raw = args.is_none(),
                "new class instance"
            );
        }
        self.extract_supertypes(class, id.cast(), mode);
    }

    /// Label of a class as declared, without type arguments.
    pub fn use_class_source(&mut self, class: ClassId) -> Label<kinds::ClassOrInterface> {
        if self.graph.class(class).is_anonymous {
            return self.use_anonymous_class(class).platform.id.cast();
        }
        self.add_class_label(class, Some(&[])).id
    }

    /// Anonymous classes have no key; each gets one memoized fresh label.
    pub fn use_anonymous_class(&mut self, class: ClassId) -> TypeResults {
        if let Some(results) = self.anonymous_classes.get(&class) {
            return results.clone();
        }
        let platform: Label<kinds::ClassOrInterface> = self.fresh_label();
        let source = match self.config.source_types {
            SourceTypes::Precise => {
                let id: Label<kinds::SourceType> = self.fresh_label();
                self.write(Fact::SourceNotNullType {
                    id,
                    ty: platform.cast(),
                });
                TypeResult::new(id, Some(String::new()), "")
            }
            SourceTypes::Placeholder => self.fake_source_type(),
        };
        let results = TypeResults {
            platform: TypeResult::new(platform.cast(), Some(String::new()), ""),
            source,
        };
        self.anonymous_classes.insert(class, results.clone());
        results
    }

    /// Label for a type variable, qualified by its declaring scope. Its
    /// signature is that of its erasure.
    pub fn use_type_parameter(&mut self, param: TypeParamId) -> TypeResult<kinds::TypeVariable> {
        let graph = self.graph;
        let decl = graph.type_param(param);
        let parent = self.use_declaration_parent(decl.parent, false, None);
        let id = self.label_for_key(&format!("@\"typevar;{{{}}};{}\"", parent, decl.name));
        let erased = erase_type_parameter(graph, param);
        let signature = self.use_type(&erased, TypeContext::Other).platform.signature;
        TypeResult::new(id, signature, decl.name.clone())
    }

    /// Source-language type named `source_name` over the platform type
    /// `target`, per the configured mode.
    ///
    /// The key carries the source name, so source types sharing a platform
    /// type (`kotlin.String`, `java.lang.String`) stay apart and one label
    /// never carries two signatures.
    pub(crate) fn source_type(
        &mut self,
        target: Label<kinds::RefType>,
        nullable: bool,
        source_name: Option<&str>,
        short_name: &str,
    ) -> TypeResult<kinds::SourceType> {
        if self.config.source_types == SourceTypes::Placeholder {
            return self.fake_source_type();
        }
        let (tag, suffix) = if nullable { ("nullable", "?") } else { ("notnull", "") };
        let key = format!(
            "@\"kt_type;{};{};{{{}}}\"",
            tag,
            source_name.unwrap_or_default(),
            target
        );
        let id = self.label_for(&key, |this, id| {
            this.write(if nullable {
                Fact::SourceNullableType { id, ty: target }
            } else {
                Fact::SourceNotNullType { id, ty: target }
            });
        });
        TypeResult::new(
            id,
            source_name.map(|name| format!("{}{}", name, suffix)),
            format!("{}{}", short_name, suffix),
        )
    }

    /// The single nullable source type standing in for every source type.
    pub(crate) fn fake_source_type(&mut self) -> TypeResult<kinds::SourceType> {
        let package = self.label_for("@\"FakeKotlinPackage\"", |this, id| {
            this.write(Fact::Packages {
                id,
                name: "fake.kotlin".into(),
            });
        });
        let class: Label<kinds::ClassOrInterface> = self.label_for("@\"FakeKotlinClass\"", |this, id| {
            this.write(Fact::Classes {
                id,
                name: "FakeKotlinClass".into(),
                package,
                source: id,
            });
        });
        let id = self.label_for("@\"FakeKotlinType\"", |this, id| {
            this.write(Fact::SourceNullableType {
                id,
                ty: class.cast(),
            });
        });
        TypeResult::new(id, None, "")
    }
}
