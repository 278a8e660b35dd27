use crate::ir::notation::{self, NotationError};
use crate::ir::*;

/// Populates an [`IrGraph`], seeding the platform's well-known classes.
///
/// This stands in for the front-end: tests and embedders describe the
/// declarations they care about and reference types with the textual
/// notation understood by [`GraphBuilder::ty`].
pub struct GraphBuilder {
    graph: IrGraph,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        let placeholder = ClassId::new(0);
        let graph = IrGraph {
            files: Vec::new(),
            fragments: Vec::new(),
            classes: Vec::new(),
            functions: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            type_params: Vec::new(),
            value_params: Vec::new(),
            enum_entries: Vec::new(),
            type_aliases: Vec::new(),
            by_fq_name: Default::default(),
            platform_equivalents: Default::default(),
            primitives: PrimitiveTypeMapping::new(),
            builtins: Builtins {
                any: placeholder,
                unit: placeholder,
                int: placeholder,
                array: placeholder,
            },
        };
        let mut builder = Self { graph };
        builder.seed_builtins();
        builder
    }

    pub fn graph(&self) -> &IrGraph {
        &self.graph
    }

    pub fn finish(self) -> IrGraph {
        self.graph
    }

    pub fn file(&mut self, path: impl Into<String>, package: impl Into<String>) -> FileId {
        let id = FileId::next(self.graph.files.len());
        self.graph.files.push(FileDecl {
            path: path.into(),
            package: package.into(),
            jvm_name: None,
        });
        id
    }

    pub fn set_file_jvm_name(&mut self, file: FileId, name: impl Into<String>) {
        self.graph.files[file.index()].jvm_name = Some(name.into());
    }

    pub fn fragment(&mut self, package: impl Into<String>) -> FragmentId {
        let package = package.into();
        if let Some(index) = self.graph.fragments.iter().position(|p| *p == package) {
            return FragmentId::next(index);
        }
        let id = FragmentId::next(self.graph.fragments.len());
        self.graph.fragments.push(package);
        id
    }

    pub fn class(&mut self, decl: ClassDecl) -> ClassId {
        let id = ClassId::next(self.graph.classes.len());
        self.graph.classes.push(decl);
        if let Some(fq_name) = self.graph.fq_name(id) {
            self.graph.by_fq_name.entry(fq_name).or_default().push(id);
        }
        id
    }

    /// Declares a type parameter on `owner` with the default `Any?` bound.
    pub fn type_param(&mut self, owner: DeclParent, name: impl Into<String>) -> TypeParamId {
        let id = TypeParamId::next(self.graph.type_params.len());
        let index = self.graph.type_parameters_of(owner).len();
        let bound = self.graph.nullable_any_type();
        self.graph.type_params.push(TypeParamDecl {
            name: name.into(),
            parent: owner,
            index,
            super_types: vec![bound],
        });
        match owner {
            DeclParent::Class(class) => self.graph.classes[class.index()].type_params.push(id),
            DeclParent::Function(function) => {
                self.graph.functions[function.index()].type_params.push(id)
            }
            DeclParent::File(_) | DeclParent::ExternalPackage(_) => {}
        }
        id
    }

    pub fn set_bounds(&mut self, param: TypeParamId, bounds: Vec<IrType>) {
        self.graph.type_params[param.index()].super_types = bounds;
    }

    pub fn set_supertypes(&mut self, class: ClassId, super_types: Vec<IrType>) {
        self.graph.classes[class.index()].super_types = super_types;
    }

    pub fn platform_equivalent(&mut self, source: ClassId, platform: ClassId) {
        self.graph.platform_equivalents.insert(source, platform);
    }

    pub fn function(&mut self, decl: FunctionDecl) -> FunctionId {
        let id = FunctionId::next(self.graph.functions.len());
        if let DeclParent::Class(class) = decl.parent {
            self.graph.classes[class.index()].functions.push(id);
        }
        self.graph.functions.push(decl);
        id
    }

    pub fn value_param(
        &mut self,
        function: FunctionId,
        name: impl Into<String>,
        ty: IrType,
    ) -> ValueParamId {
        let id = ValueParamId::next(self.graph.value_params.len());
        let index = self.graph.function(function).value_params.len() as i32;
        self.graph.value_params.push(ValueParamDecl {
            name: name.into(),
            parent: function,
            ty,
            index,
        });
        self.graph.functions[function.index()].value_params.push(id);
        id
    }

    pub fn extension_receiver(&mut self, function: FunctionId, ty: IrType) -> ValueParamId {
        let id = ValueParamId::next(self.graph.value_params.len());
        self.graph.value_params.push(ValueParamDecl {
            name: "<this>".into(),
            parent: function,
            ty,
            index: -1,
        });
        self.graph.functions[function.index()].extension_receiver = Some(id);
        id
    }

    pub fn field(&mut self, decl: FieldDecl) -> FieldId {
        let id = FieldId::next(self.graph.fields.len());
        if let DeclParent::Class(class) = decl.parent {
            self.graph.classes[class.index()].fields.push(id);
        }
        self.graph.fields.push(decl);
        id
    }

    pub fn property(&mut self, decl: PropertyDecl) -> PropertyId {
        let id = PropertyId::next(self.graph.properties.len());
        self.graph.properties.push(decl);
        id
    }

    /// Adds `decl` as the getter (or setter) of `property`.
    pub fn accessor(&mut self, property: PropertyId, getter: bool, mut decl: FunctionDecl) -> FunctionId {
        decl.property = Some(property);
        let id = self.function(decl);
        let prop = &mut self.graph.properties[property.index()];
        if getter {
            prop.getter = Some(id);
        } else {
            prop.setter = Some(id);
        }
        id
    }

    pub fn enum_entry(&mut self, parent: ClassId, name: impl Into<String>) -> EnumEntryId {
        let id = EnumEntryId::next(self.graph.enum_entries.len());
        self.graph.enum_entries.push(EnumEntryDecl {
            name: name.into(),
            parent,
        });
        id
    }

    pub fn type_alias(&mut self, parent: DeclParent, name: impl Into<String>) -> TypeAliasId {
        let id = TypeAliasId::next(self.graph.type_aliases.len());
        self.graph.type_aliases.push(TypeAliasDecl {
            name: name.into(),
            parent,
        });
        id
    }

    /// Parses a type written in notation form, resolving bare names against
    /// the type parameters visible from `scope` first.
    pub fn ty(&self, text: &str, scope: Option<DeclParent>) -> Result<IrType, NotationError> {
        let parsed = notation::parse_type(text)?;
        notation::resolve(&self.graph, &parsed, scope)
    }

    fn builtin(&mut self, package: &str, name: &str, origin: Origin, kind: ClassKind) -> ClassId {
        let fragment = self.fragment(package);
        self.class(
            ClassDecl::new(name, package, DeclParent::ExternalPackage(fragment))
                .with_origin(origin)
                .with_kind(kind),
        )
    }

    fn seed_builtins(&mut self) {
        use ClassKind::{Class, Interface, Object};
        use Origin::{ExternalJavaStub, ExternalStub};

        let any = self.builtin("kotlin", "Any", ExternalStub, Class);
        let object = self.builtin("java.lang", "Object", ExternalJavaStub, Class);
        self.graph.builtins.any = any;
        self.platform_equivalent(any, object);
        let any_ty = IrType::class(any, Vec::new());
        let object_ty = IrType::class(object, Vec::new());

        let cloneable = self.builtin("kotlin", "Cloneable", ExternalStub, Interface);
        let java_cloneable = self.builtin("java.lang", "Cloneable", ExternalJavaStub, Interface);
        self.set_supertypes(cloneable, vec![any_ty.clone()]);
        self.set_supertypes(java_cloneable, vec![object_ty.clone()]);
        self.platform_equivalent(cloneable, java_cloneable);

        let serializable = self.builtin("java.io", "Serializable", ExternalJavaStub, Interface);
        self.set_supertypes(serializable, vec![object_ty.clone()]);

        let comparable = self.builtin("kotlin", "Comparable", ExternalStub, Interface);
        self.type_param(DeclParent::Class(comparable), "T");
        self.set_supertypes(comparable, vec![any_ty.clone()]);
        let java_comparable = self.builtin("java.lang", "Comparable", ExternalJavaStub, Interface);
        self.type_param(DeclParent::Class(java_comparable), "T");
        self.set_supertypes(java_comparable, vec![object_ty.clone()]);
        self.platform_equivalent(comparable, java_comparable);

        let char_sequence = self.builtin("kotlin", "CharSequence", ExternalStub, Interface);
        let java_char_sequence =
            self.builtin("java.lang", "CharSequence", ExternalJavaStub, Interface);
        self.set_supertypes(char_sequence, vec![any_ty.clone()]);
        self.set_supertypes(java_char_sequence, vec![object_ty.clone()]);
        self.platform_equivalent(char_sequence, java_char_sequence);

        let string = self.builtin("kotlin", "String", ExternalStub, Class);
        let java_string = self.builtin("java.lang", "String", ExternalJavaStub, Class);
        let comparable_of = |class: ClassId, of: ClassId| {
            IrType::class(
                class,
                vec![TypeArgument::invariant(IrType::class(of, Vec::new()))],
            )
        };
        self.set_supertypes(
            string,
            vec![
                comparable_of(comparable, string),
                IrType::class(char_sequence, Vec::new()),
            ],
        );
        self.set_supertypes(
            java_string,
            vec![
                object_ty.clone(),
                IrType::class(serializable, Vec::new()),
                comparable_of(java_comparable, java_string),
                IrType::class(java_char_sequence, Vec::new()),
            ],
        );
        self.platform_equivalent(string, java_string);

        let number = self.builtin("kotlin", "Number", ExternalStub, Class);
        let java_number = self.builtin("java.lang", "Number", ExternalJavaStub, Class);
        self.set_supertypes(number, vec![any_ty.clone()]);
        self.set_supertypes(
            java_number,
            vec![object_ty.clone(), IrType::class(serializable, Vec::new())],
        );
        self.platform_equivalent(number, java_number);

        let unit = self.builtin("kotlin", "Unit", ExternalStub, Object);
        self.set_supertypes(unit, vec![any_ty.clone()]);
        self.graph.builtins.unit = unit;
        self.graph.primitives.register(
            unit,
            PrimitiveInfo {
                primitive_name: Some("void".into()),
                other_is_primitive: false,
                boxed_class: unit,
                source_package: "kotlin".into(),
                source_name: "Unit".into(),
            },
        );

        let nothing = self.builtin("kotlin", "Nothing", ExternalStub, Class);
        let void = self.builtin("java.lang", "Void", ExternalJavaStub, Class);
        self.set_supertypes(void, vec![object_ty.clone()]);
        self.graph.primitives.register(
            nothing,
            PrimitiveInfo {
                primitive_name: Some("void".into()),
                other_is_primitive: false,
                boxed_class: void,
                source_package: "kotlin".into(),
                source_name: "Nothing".into(),
            },
        );

        let array = self.builtin("kotlin", "Array", ExternalStub, Class);
        self.graph.classes[array.index()].array = Some(ArrayKind::Boxed);
        self.type_param(DeclParent::Class(array), "T");
        let array_supers = vec![
            any_ty.clone(),
            IrType::class(cloneable, Vec::new()),
            IrType::class(serializable, Vec::new()),
        ];
        self.set_supertypes(array, array_supers.clone());
        self.graph.builtins.array = array;

        let primitives = [
            ("Boolean", "boolean", "Boolean", false),
            ("Char", "char", "Character", false),
            ("Byte", "byte", "Byte", true),
            ("Short", "short", "Short", true),
            ("Int", "int", "Integer", true),
            ("Long", "long", "Long", true),
            ("Float", "float", "Float", true),
            ("Double", "double", "Double", true),
        ];
        for (source_name, primitive_name, boxed_name, numeric) in primitives {
            let source = self.builtin("kotlin", source_name, ExternalStub, Class);
            let boxed = self.builtin("java.lang", boxed_name, ExternalJavaStub, Class);
            let source_base = if numeric {
                IrType::class(number, Vec::new())
            } else {
                any_ty.clone()
            };
            let boxed_base = if numeric {
                IrType::class(java_number, Vec::new())
            } else {
                object_ty.clone()
            };
            self.set_supertypes(source, vec![source_base, comparable_of(comparable, source)]);
            self.set_supertypes(boxed, vec![boxed_base, comparable_of(java_comparable, boxed)]);
            self.platform_equivalent(source, boxed);
            self.graph.primitives.register(
                source,
                PrimitiveInfo {
                    primitive_name: Some(primitive_name.into()),
                    other_is_primitive: true,
                    boxed_class: boxed,
                    source_package: "kotlin".into(),
                    source_name: source_name.into(),
                },
            );
            if source_name == "Int" {
                self.graph.builtins.int = source;
            }

            let array_name = format!("{}Array", source_name);
            let primitive_array = self.builtin("kotlin", &array_name, ExternalStub, Class);
            self.graph.classes[primitive_array.index()].array = Some(ArrayKind::Primitive(source));
            self.set_supertypes(primitive_array, array_supers.clone());
        }
    }
}
