use super::*;
use crate::config::{ExtractorConfig, SourceTypes};
use crate::facts::WildcardKind;
use crate::ir::notation;
use crate::ir::{ClassDecl, FieldDecl, FunctionDecl, GraphBuilder, PropertyDecl};

fn ty(graph: &IrGraph, text: &str) -> IrType {
    let parsed = notation::parse_type(text).expect("type notation parses");
    notation::resolve(graph, &parsed, None).expect("type notation resolves")
}

fn key_label(ex: &Extractor<'_>, key: &str) -> AnyLabel {
    ex.sink()
        .label_of(key)
        .unwrap_or_else(|| panic!("no label bound to {}", key))
}

fn box_graph() -> (IrGraph, ClassId) {
    let mut builder = GraphBuilder::new();
    let file = builder.file("src/pkg/Box.kt", "pkg");
    let class = builder.class(ClassDecl::new("Box", "pkg", DeclParent::File(file)));
    builder.type_param(DeclParent::Class(class), "T");
    (builder.finish(), class)
}

#[test]
fn wildcard_keys_follow_projection_kind() {
    let (graph, _) = box_graph();
    let mut ex = Extractor::in_memory(&graph, ExtractorConfig::default());

    let out = ex.use_type(&ty(&graph, "Box<out kotlin.String>"), TypeContext::Other);
    assert_eq!(out.platform.short_name, "Box<? extends String>");
    let star = ex.use_type(&ty(&graph, "Box<*>"), TypeContext::Other);
    assert_eq!(star.platform.short_name, "Box<?>");
    let contra = ex.use_type(&ty(&graph, "Box<in kotlin.Int>"), TypeContext::Other);
    assert_eq!(contra.platform.short_name, "Box<? super Integer>");

    let string = key_label(&ex, "@\"class;java.lang.String\"");
    let integer = key_label(&ex, "@\"class;java.lang.Integer\"");
    let extends = key_label(&ex, &format!("@\"wildcard;extends{{{}}}\"", string));
    key_label(&ex, &format!("@\"wildcard;super{{{}}}\"", integer));
    let unbounded = key_label(&ex, "@\"wildcard;\"");
    key_label(&ex, &format!("@\"bound;0;{{{}}}\"", extends));
    key_label(&ex, &format!("@\"bound;0;{{{}}}\"", unbounded));

    let log = ex.sink();
    assert_eq!(log.count("wildcards"), 3);
    assert_eq!(log.count("typeBounds"), 3);
    assert!(log.facts().iter().any(|fact| matches!(
        fact,
        Fact::Wildcards { kind: WildcardKind::Super, name, .. } if name == "? super Integer"
    )));
}

#[test]
fn missing_real_class_is_reported_once() {
    let mut builder = GraphBuilder::new();
    let fragment = builder.fragment("lib");
    let ghost = builder.class(
        ClassDecl::new("Ghost", "lib", DeclParent::ExternalPackage(fragment))
            .with_origin(Origin::ExternalJavaStub),
    );
    let graph = builder.finish();
    let mut ex = Extractor::in_memory(&graph, ExtractorConfig::default());

    assert!(ex.is_synthetic_class(ghost));
    let first = ex.use_class_source(ghost);
    let second = ex.use_class_source(ghost);
    assert_eq!(first, second);
    let failures = ex
        .diagnostics()
        .iter()
        .filter(|error| matches!(error, ExtractError::ResolutionFailure { .. }))
        .count();
    assert_eq!(failures, 1);
}

#[test]
fn synthetic_members_resolve_through_the_real_class() {
    let mut builder = GraphBuilder::new();
    let fragment = builder.fragment("lib");
    let stub = |builder: &mut GraphBuilder| {
        builder.class(
            ClassDecl::new("Ghost", "lib", DeclParent::ExternalPackage(fragment))
                .with_origin(Origin::ExternalJavaStub),
        )
    };
    let ghost = stub(&mut builder);
    let real = stub(&mut builder);
    let object = builder.ty("java.lang.Object", None).expect("Object");
    builder.set_supertypes(real, vec![object]);
    let int = builder.ty("kotlin.Int", None).expect("Int");
    let unit = builder.graph().unit_type();
    let field = |builder: &mut GraphBuilder, name: &str, parent: ClassId| {
        builder.field(FieldDecl {
            name: name.into(),
            parent: DeclParent::Class(parent),
            ty: int.clone(),
            origin: Origin::ExternalJavaStub,
        })
    };
    let ghost_size = field(&mut builder, "size", ghost);
    let real_size = field(&mut builder, "size", real);
    let ghost_name = field(&mut builder, "name", ghost);
    let ghost_run = builder.function(
        FunctionDecl::new("run", DeclParent::Class(ghost), unit.clone())
            .with_origin(Origin::ExternalJavaStub),
    );
    let real_run = builder.function(
        FunctionDecl::new("run", DeclParent::Class(real), unit).with_origin(Origin::ExternalJavaStub),
    );
    let graph = builder.finish();

    let mut ex = Extractor::in_memory(&graph, ExtractorConfig::default());
    assert!(ex.is_synthetic_class(ghost));
    assert!(!ex.is_synthetic_class(real));
    assert_eq!(ex.try_replace_synthetic_class(ghost), real);
    assert_eq!(ex.try_replace_synthetic_field(ghost_size), real_size);
    assert_eq!(ex.try_replace_synthetic_function(ghost_run), real_run);
    assert_eq!(ex.try_replace_synthetic_field(ghost_name), ghost_name);
    assert_eq!(ex.try_replace_synthetic_field(ghost_name), ghost_name);
    assert_eq!(ex.diagnostics().len(), 1);

    // The real class carries the supertypes.
    let class = ex.use_class_source(ghost);
    assert_eq!(ex.sink().extends_of(class.any()).len(), 1);

    let config = ExtractorConfig {
        replace_synthetic: false,
        ..ExtractorConfig::default()
    };
    let mut untouched = Extractor::in_memory(&graph, config);
    assert_eq!(untouched.try_replace_synthetic_class(ghost), ghost);
}

#[test]
fn platform_equivalents_schedule_both_classes_once() {
    let graph = GraphBuilder::new().finish();
    let string = graph
        .classes_named("kotlin.String")
        .next()
        .expect("kotlin.String is seeded");
    let java_string = graph.platform_equivalent(string).expect("String has a platform class");
    let mut ex = Extractor::in_memory(&graph, ExtractorConfig::default());

    let ty = IrType::class(string, Vec::new());
    let first = ex.use_type(&ty, TypeContext::Other);
    let second = ex.use_type(&ty, TypeContext::Other);
    assert_eq!(first.platform.id, second.platform.id);
    assert_eq!(first.platform.signature.as_deref(), Some("java.lang.String"));
    assert_eq!(first.source.short_name, "String");

    let pending = ex.scheduler().pending();
    for class in [string, java_string] {
        let count = pending
            .iter()
            .filter(|(entity, _)| *entity == EntityRef::Class(class))
            .count();
        assert_eq!(count, 1, "{:?} scheduled once", class);
    }
}

#[test]
fn callable_labels_substitute_and_erase_parameters() {
    let mut builder = GraphBuilder::new();
    let file = builder.file("src/pkg/Box.kt", "pkg");
    let class = builder.class(ClassDecl::new("Box", "pkg", DeclParent::File(file)));
    let scope = Some(DeclParent::Class(class));
    builder.type_param(DeclParent::Class(class), "T");
    let t = builder.ty("T", scope).expect("T");
    let put = builder.function(FunctionDecl::new("put", DeclParent::Class(class), t.clone()));
    builder.value_param(put, "value", t);

    let any = builder.ty("kotlin.Any", None).expect("Any");
    let wrap = builder.function(FunctionDecl::new("wrap", DeclParent::Class(class), any));
    let r = builder.type_param(DeclParent::Function(wrap), "R");
    let bound = builder.ty("kotlin.CharSequence", None).expect("CharSequence");
    builder.set_bounds(r, vec![bound]);
    let wrap_scope = Some(DeclParent::Function(wrap));
    let r_ty = builder.ty("R", wrap_scope).expect("R");
    builder.value_param(wrap, "value", r_ty);
    let boxed_r = builder.ty("Box<R>", wrap_scope).expect("Box<R>");
    builder.value_param(wrap, "items", boxed_r);

    let box_t = builder.ty("Box<T>", scope).expect("Box<T>");
    let init = builder.function(FunctionDecl::constructor(class, box_t));
    let string = builder.ty("kotlin.String", None).expect("String");
    let graph = builder.finish();
    let mut ex = Extractor::in_memory(&graph, ExtractorConfig::default());

    let declared = ex.use_function(put, None);
    let box_label = key_label(&ex, "@\"class;pkg.Box\"");
    let t_label = key_label(&ex, &format!("@\"typevar;{{{}}};T\"", box_label));
    let object = key_label(&ex, "@\"class;java.lang.Object\"");
    let expected = format!("@\"callable;{{{}}}.put({{{}}}){{{}}}\"", box_label, t_label, object);
    assert_eq!(ex.sink().key_of(declared.any()), Some(expected.as_str()));

    let args = [TypeArgument::invariant(string)];
    let specialized = ex.use_function(put, Some(&args));
    let java_string = key_label(&ex, "@\"class;java.lang.String\"");
    let box_of_string = key_label(&ex, &format!("@\"class;pkg.Box;{{{}}}\"", java_string));
    let expected = format!(
        "@\"callable;{{{}}}.put({{{}}}){{{}}}\"",
        box_of_string, java_string, java_string
    );
    assert_eq!(ex.sink().key_of(specialized.any()), Some(expected.as_str()));

    let generic = ex.use_function(wrap, None);
    let char_sequence = key_label(&ex, "@\"class;java.lang.CharSequence\"");
    let raw_box = key_label(&ex, "@\"class;pkg.Box<>\"");
    let expected = format!(
        "@\"callable;{{{}}}.wrap({{{}}},{{{}}}){{{}}}<1>\"",
        box_label, char_sequence, raw_box, object
    );
    assert_eq!(ex.sink().key_of(generic.any()), Some(expected.as_str()));

    let through_instance = ex.use_function(wrap, Some(&args));
    let key = ex.sink().key_of(through_instance.any()).expect("keyed callable");
    assert!(!key.ends_with("<1>\""), "{}", key);

    let constructor = ex.use_function(init, None);
    let void = key_label(&ex, "@\"type;void\"");
    let expected = format!("@\"callable;{{{}}}.<init>(){{{}}}\"", box_label, void);
    assert_eq!(ex.sink().key_of(constructor.any()), Some(expected.as_str()));
}

#[test]
fn file_classes_are_named_after_their_file() {
    let mut builder = GraphBuilder::new();
    let main = builder.file("src/app/main.kt", "app");
    let utils = builder.file("src/app/utils.kt", "app");
    builder.set_file_jvm_name(utils, "Helpers");
    let top = builder.file("Top.kt", "");
    let graph = builder.finish();
    let mut ex = Extractor::in_memory(&graph, ExtractorConfig::default());

    let main_class = ex.extract_file_class(main);
    assert_eq!(ex.extract_file_class(main), main_class);
    assert_eq!(ex.sink().key_of(main_class.any()), Some("@\"class;app.MainKt\""));
    let helpers = ex.extract_file_class(utils);
    assert_eq!(ex.sink().key_of(helpers.any()), Some("@\"class;app.Helpers\""));
    let top_class = ex.extract_file_class(top);
    assert_eq!(ex.sink().key_of(top_class.any()), Some("@\"class;TopKt\""));

    let log = ex.sink();
    assert_eq!(log.count("file_class"), 3);
    assert_eq!(log.count("classes"), 3);
    assert_eq!(log.count("hasModifier"), 6);
    let file = log.label_of("@\"file;src/app/main.kt\"").expect("file label");
    assert!(log.label_of(&format!("@\"loc;{{{}}};whole\"", file)).is_some());
}

#[test]
fn precise_mode_distinguishes_nullability() {
    let graph = GraphBuilder::new().finish();
    let mut ex = Extractor::in_memory(&graph, ExtractorConfig::default());
    let nullable = ex.use_type(&ty(&graph, "kotlin.String?"), TypeContext::Other);
    let not_null = ex.use_type(&ty(&graph, "kotlin.String"), TypeContext::Other);
    assert_eq!(nullable.platform.id, not_null.platform.id);
    assert_ne!(nullable.source.id, not_null.source.id);
    assert_eq!(nullable.source.short_name, "String?");
    assert_eq!(nullable.source.signature.as_deref(), Some("kotlin.String?"));
}

#[test]
fn source_types_keep_their_source_names() {
    let graph = GraphBuilder::new().finish();
    let mut ex = Extractor::in_memory(&graph, ExtractorConfig::default());

    let kotlin_string = ex.use_type(&ty(&graph, "kotlin.String"), TypeContext::Other);
    let java_string = ex.use_type(&ty(&graph, "java.lang.String"), TypeContext::Other);
    assert_eq!(kotlin_string.platform.id, java_string.platform.id);
    assert_ne!(kotlin_string.source.id, java_string.source.id);
    assert_eq!(kotlin_string.source.signature.as_deref(), Some("kotlin.String"));
    assert_eq!(java_string.source.signature.as_deref(), Some("java.lang.String"));

    let int = ex.use_type(&ty(&graph, "kotlin.Int?"), TypeContext::Other);
    let integer = ex.use_type(&ty(&graph, "java.lang.Integer?"), TypeContext::Other);
    assert_eq!(int.platform.id, integer.platform.id);
    assert_ne!(int.source.id, integer.source.id);
    assert_eq!(int.source.signature.as_deref(), Some("kotlin.Int?"));
    assert_eq!(integer.source.signature.as_deref(), Some("java.lang.Integer?"));

    let mut signatures: FxHashMap<AnyLabel, Option<String>> = FxHashMap::default();
    for text in [
        "kotlin.String",
        "kotlin.String?",
        "java.lang.String?",
        "kotlin.Int",
        "kotlin.Int?",
        "java.lang.Integer",
        "IntArray",
        "Array<kotlin.String>",
        "kotlin.Comparable<kotlin.String>",
        "java.lang.Comparable<java.lang.String>",
    ] {
        for context in [TypeContext::Other, TypeContext::Return, TypeContext::GenericArgument] {
            let source = ex.use_type(&ty(&graph, text), context).source;
            let seen = signatures
                .entry(source.id.any())
                .or_insert_with(|| source.signature.clone());
            assert_eq!(*seen, source.signature, "{} in {:?}", text, context);
        }
    }
}

#[test]
fn primitive_forms_depend_on_the_use_site() {
    let graph = GraphBuilder::new().finish();
    let mut ex = Extractor::in_memory(&graph, ExtractorConfig::default());
    let int = graph.int_type();

    let other = ex.use_type(&int, TypeContext::Other);
    assert_eq!(other.platform.signature.as_deref(), Some("int"));
    assert_eq!(Some(other.platform.id.any()), ex.sink().label_of("@\"type;int\""));
    let returned = ex.use_type(&int, TypeContext::Return);
    assert_eq!(returned.platform.id, other.platform.id);

    let argument = ex.use_type(&int, TypeContext::GenericArgument);
    assert_eq!(argument.platform.signature.as_deref(), Some("java.lang.Integer"));
    assert_eq!(
        Some(argument.platform.id.any()),
        ex.sink().label_of("@\"class;java.lang.Integer\"")
    );
    let nullable_return = ex.use_type(&int.make_nullable(), TypeContext::Return);
    assert_eq!(nullable_return.platform.id, argument.platform.id);
    assert_eq!(other.source.id, argument.source.id);
    assert_ne!(nullable_return.source.id, other.source.id);

    let unit = graph.unit_type();
    let unit_return = ex.use_type(&unit, TypeContext::Return);
    assert_eq!(unit_return.platform.signature.as_deref(), Some("void"));
    assert_eq!(Some(unit_return.platform.id.any()), ex.sink().label_of("@\"type;void\""));
    let unit_other = ex.use_type(&unit, TypeContext::Other);
    assert_eq!(unit_other.platform.signature.as_deref(), Some("kotlin.Unit"));
    assert_eq!(
        Some(unit_other.platform.id.any()),
        ex.sink().label_of("@\"class;kotlin.Unit\"")
    );
    assert!(ex.diagnostics().is_empty());
}

#[test]
fn unrecognized_types_fall_back_to_unknown() {
    let graph = GraphBuilder::new().finish();
    let mut ex = Extractor::in_memory(&graph, ExtractorConfig::default());

    let dynamic = ex.use_type(&IrType::Dynamic, TypeContext::Other);
    let error = ex.use_type(&IrType::Error("unresolved reference".into()), TypeContext::Return);
    for results in [&dynamic, &error] {
        assert_eq!(results.platform.signature.as_deref(), Some("unknown"));
        assert_eq!(results.platform.short_name, "unknown");
        assert_eq!(results.source.signature.as_deref(), Some("unknown"));
    }
    assert_ne!(dynamic.platform.id, error.platform.id);

    let constructs: Vec<&str> = ex
        .diagnostics()
        .iter()
        .filter_map(|error| match error {
            ExtractError::UnrecognizedConstruct { construct, .. } => Some(*construct),
            _ => None,
        })
        .collect();
    assert_eq!(constructs, ["dynamic type", "error type"]);
}

#[test]
fn type_parameter_supertypes_are_reported_and_skipped() {
    let mut builder = GraphBuilder::new();
    let file = builder.file("src/pkg/Odd.kt", "pkg");
    let class = builder.class(ClassDecl::new("Odd", "pkg", DeclParent::File(file)));
    let t = builder.type_param(DeclParent::Class(class), "T");
    let any = builder.ty("kotlin.Any", None).expect("Any resolves");
    builder.set_supertypes(class, vec![IrType::param(t), any]);
    let graph = builder.finish();
    let mut ex = Extractor::in_memory(&graph, ExtractorConfig::default());

    let odd = ex.use_class_source(class);
    let supers = ex.sink().extends_of(odd.any());
    assert_eq!(supers.len(), 1);
    assert_eq!(
        ex.sink().key_of(supers[0].any()),
        Some("@\"class;java.lang.Object\"")
    );
    assert!(ex.diagnostics().iter().any(|error| matches!(
        error,
        ExtractError::UnexpectedShape { position: "supertype", found, .. }
            if found == "type parameter T"
    )));
}

#[test]
fn placeholder_mode_shares_one_source_type() {
    let (graph, _) = box_graph();
    let config = ExtractorConfig {
        source_types: SourceTypes::Placeholder,
        ..ExtractorConfig::default()
    };
    let mut ex = Extractor::in_memory(&graph, config);
    let nullable = ex.use_type(&ty(&graph, "kotlin.String?"), TypeContext::Other);
    let boxed = ex.use_type(&ty(&graph, "Box<kotlin.Int>"), TypeContext::Other);
    assert_eq!(nullable.source.id, boxed.source.id);
    assert_eq!(
        Some(nullable.source.id.any()),
        ex.sink().label_of("@\"FakeKotlinType\"")
    );
    assert_eq!(ex.sink().count("kt_notnull_types"), 0);
    assert_eq!(ex.sink().count("kt_nullable_types"), 1);
}

#[test]
fn runaway_specialization_hits_the_depth_guard() {
    let mut builder = GraphBuilder::new();
    let file = builder.file("src/pkg/Grow.kt", "pkg");
    let base = builder.class(ClassDecl::new("Base", "pkg", DeclParent::File(file)));
    builder.type_param(DeclParent::Class(base), "T");
    let grow = builder.class(ClassDecl::new("Grow", "pkg", DeclParent::File(file)));
    builder.type_param(DeclParent::Class(grow), "T");
    let super_type = builder
        .ty("Base<Grow<Grow<T>>>", Some(DeclParent::Class(grow)))
        .expect("supertype");
    builder.set_supertypes(grow, vec![super_type]);
    let graph = builder.finish();

    let config = ExtractorConfig {
        max_depth: 12,
        ..ExtractorConfig::default()
    };
    let mut ex = Extractor::in_memory(&graph, config);
    let results = ex.use_type(&ty(&graph, "Grow<kotlin.Int>"), TypeContext::Other);
    assert_eq!(results.platform.signature.as_deref(), Some("pkg.Grow"));
    assert!(ex.diagnostics().iter().any(|error| matches!(
        error,
        ExtractError::InvariantViolation { message } if message.contains("exceeds 12")
    )));
}

#[test]
fn array_clone_reenters_its_own_array_key() {
    let graph = GraphBuilder::new().finish();
    let mut ex = Extractor::in_memory(&graph, ExtractorConfig::default());
    let array = ty(&graph, "Array<kotlin.Int>");

    let first = ex.use_type(&array, TypeContext::Other);
    assert!(ex.labels().reentrant_hits() >= 1);
    let second = ex.use_type(&array, TypeContext::Other);
    assert_eq!(first.platform.id, second.platform.id);
    assert_eq!(first.platform.short_name, "Integer[]");
    assert_eq!(first.platform.signature.as_deref(), Some("java.lang.Integer[]"));

    let integer = key_label(&ex, "@\"class;java.lang.Integer\"");
    assert_eq!(
        Some(first.platform.id.any()),
        ex.sink().label_of(&format!("@\"array;1;{{{}}}\"", integer))
    );
    let log = ex.sink();
    assert_eq!(log.count("arrays"), 1);
    assert!(log
        .facts()
        .iter()
        .any(|fact| matches!(fact, Fact::Fields { name, .. } if name == "length")));
    assert!(log
        .facts()
        .iter()
        .any(|fact| matches!(fact, Fact::Methods { name, .. } if name == "clone")));
}

#[test]
fn external_file_members_are_scheduled_with_signatures() {
    let mut builder = GraphBuilder::new();
    let fragment = builder.fragment("lib");
    let any = builder.ty("kotlin.Any", None).expect("Any");
    let int = builder.ty("kotlin.Int", None).expect("Int");
    let facade = builder.class(
        ClassDecl::new("UtilsKt", "lib", DeclParent::ExternalPackage(fragment))
            .file_class()
            .with_origin(Origin::ExternalStub),
    );
    builder.set_supertypes(facade, vec![any]);
    let helper = builder.function(
        FunctionDecl::new("helper", DeclParent::Class(facade), int.clone())
            .with_origin(Origin::ExternalStub),
    );
    builder.value_param(helper, "x", int.clone());
    let answer = builder.property(PropertyDecl {
        name: "answer".into(),
        parent: DeclParent::Class(facade),
        origin: Origin::ExternalStub,
        getter: None,
        setter: None,
    });
    let getter = builder.accessor(
        answer,
        true,
        FunctionDecl::new("<get-answer>", DeclParent::Class(facade), int.clone())
            .with_origin(Origin::ExternalStub),
    );
    let cache = builder.field(FieldDecl {
        name: "cache".into(),
        parent: DeclParent::Class(facade),
        ty: int,
        origin: Origin::ExternalStub,
    });
    let graph = builder.finish();
    let mut ex = Extractor::in_memory(&graph, ExtractorConfig::default());

    ex.use_function(helper, None);
    ex.use_function(helper, None);
    ex.use_function(getter, None);
    ex.use_field(cache);

    let pending = ex.scheduler().pending();
    let signature_of = |entity: EntityRef| {
        let matching: Vec<_> = pending.iter().filter(|(e, _)| *e == entity).collect();
        assert_eq!(matching.len(), 1, "{} scheduled once", entity);
        matching[0].1.clone()
    };
    assert_eq!(signature_of(EntityRef::Class(facade)), None);
    assert_eq!(signature_of(EntityRef::Function(helper)).as_deref(), Some("(int)"));
    assert_eq!(signature_of(EntityRef::Property(answer)).as_deref(), Some(";property"));
    assert_eq!(signature_of(EntityRef::Field(cache)).as_deref(), Some(";field"));
    assert!(!pending
        .iter()
        .any(|(entity, _)| *entity == EntityRef::Function(getter)));
    assert_eq!(ex.scheduler().dependencies().len(), pending.len());
}

#[test]
fn external_member_of_a_file_is_an_invariant_violation() {
    let mut builder = GraphBuilder::new();
    let file = builder.file("src/lib/loose.kt", "lib");
    let unit = builder.graph().unit_type();
    let loose = builder.function(
        FunctionDecl::new("loose", DeclParent::File(file), unit).with_origin(Origin::ExternalStub),
    );
    let graph = builder.finish();
    let mut ex = Extractor::in_memory(&graph, ExtractorConfig::default());
    ex.use_function(loose, None);
    assert!(ex.diagnostics().iter().any(|error| matches!(
        error,
        ExtractError::InvariantViolation { message } if message.contains("no enclosing class")
    )));
}

#[test]
fn local_declarations_use_memoized_fresh_labels() {
    let mut builder = GraphBuilder::new();
    let file = builder.file("src/pkg/Box.kt", "pkg");
    let class = builder.class(ClassDecl::new("Box", "pkg", DeclParent::File(file)));
    let unit = builder.graph().unit_type();
    let run = builder.function(FunctionDecl::new("run", DeclParent::Class(class), unit.clone()));
    let helper = builder.function(FunctionDecl::new("helper", DeclParent::Function(run), unit).local());
    let local = builder.class(ClassDecl::new("Local", "pkg", DeclParent::Function(run)).local());
    let anonymous = builder.class(ClassDecl::new("<no name provided>", "pkg", DeclParent::Function(run)).anonymous());
    let graph = builder.finish();
    let mut ex = Extractor::in_memory(&graph, ExtractorConfig::default());

    let first = ex.use_function(helper, None);
    let second = ex.use_function(helper, None);
    assert_eq!(first, second);
    assert_eq!(ex.sink().key_of(first.any()), None);

    let local_id = ex.use_class_source(local);
    let run_label = ex.use_function(run, None);
    let expected = format!("@\"class;{{{}}}.Local\"", run_label);
    assert_eq!(ex.sink().key_of(local_id.any()), Some(expected.as_str()));

    let anonymous_type = ex.use_type(&IrType::class(anonymous, Vec::new()), TypeContext::Other);
    assert_eq!(ex.use_class_source(anonymous), anonymous_type.platform.id.cast());
    assert_eq!(ex.sink().key_of(anonymous_type.platform.id.any()), None);
    assert!(ex.diagnostics().is_empty(), "{:?}", ex.diagnostics());
}

#[test]
fn member_labels_hang_off_their_parent() {
    let mut builder = GraphBuilder::new();
    let file = builder.file("src/pkg/Box.kt", "pkg");
    let class = builder.class(ClassDecl::new("Box", "pkg", DeclParent::File(file)));
    let int = builder.ty("kotlin.Int", None).expect("Int");
    let size = builder.property(PropertyDecl {
        name: "size".into(),
        parent: DeclParent::Class(class),
        origin: Origin::Source,
        getter: None,
        setter: None,
    });
    let getter = builder.accessor(
        size,
        true,
        FunctionDecl::new("<get-size>", DeclParent::Class(class), int.clone()),
    );
    let field = builder.field(FieldDecl {
        name: "size".into(),
        parent: DeclParent::Class(class),
        ty: int.clone(),
        origin: Origin::Source,
    });
    let entry = builder.enum_entry(class, "FIRST");
    let alias = builder.type_alias(DeclParent::File(file), "Boxes");
    let unit = builder.graph().unit_type();
    let resize = builder.function(FunctionDecl::new("resize", DeclParent::Class(class), unit));
    let amount = builder.value_param(resize, "amount", int);
    let graph = builder.finish();
    let mut ex = Extractor::in_memory(&graph, ExtractorConfig::default());

    let property = ex.use_property(size);
    let box_label = key_label(&ex, "@\"class;pkg.Box\"");
    let expected = format!("@\"property;{{{}}};size\"", box_label);
    assert_eq!(ex.sink().key_of(property.any()), Some(expected.as_str()));

    let field = ex.use_field(field);
    let entry = ex.use_enum_entry(entry);
    assert_eq!(
        ex.sink().key_of(field.any()),
        Some(format!("@\"field;{{{}}};size\"", box_label).as_str())
    );
    assert_eq!(
        ex.sink().key_of(entry.any()),
        Some(format!("@\"field;{{{}}};FIRST\"", box_label).as_str())
    );

    let names = ex.function_names(getter);
    assert_eq!(names.name_in_db, "getSize");

    let alias = ex.use_type_alias(alias);
    let package = key_label(&ex, "@\"package;pkg\"");
    assert_eq!(
        ex.sink().key_of(alias.any()),
        Some(format!("@\"type_alias;{{{}}};Boxes\"", package).as_str())
    );

    let callable = ex.use_function(resize, None);
    let param = ex.use_value_parameter(amount, None);
    assert_eq!(
        ex.sink().key_of(param.any()),
        Some(format!("@\"params;{{{}}};0\"", callable).as_str())
    );
}
