
use crate::config::ExtractorConfig;
use crate::extractor::Extractor;
use crate::facts::AnyLabel;
use crate::ir::{notation, ClassDecl, ClassId, ClassKind, DeclParent, GraphBuilder, IrGraph, IrType, Origin};

/// Declarations shared by the scenario tests.
///
/// ```text
/// package pkg
/// class Foo
/// interface Collection<E>
/// class List<E> : Collection<E>
/// class Outer<A, B> { inner class Inner<C, D> }
/// package lib (external)
/// class Remote
/// ```
pub(crate) struct Fixture {
    pub graph: IrGraph,
    pub foo: ClassId,
    pub list: ClassId,
    pub outer: ClassId,
    pub inner: ClassId,
    pub remote: ClassId,
}

pub(crate) fn fixture() -> Fixture {
    let mut builder = GraphBuilder::new();
    let file = builder.file("src/pkg/Types.kt", "pkg");
    let any = builder.ty("kotlin.Any", None).expect("Any");

    let foo = builder.class(ClassDecl::new("Foo", "pkg", DeclParent::File(file)));
    builder.set_supertypes(foo, vec![any.clone()]);

    let collection = builder.class(
        ClassDecl::new("Collection", "pkg", DeclParent::File(file))
            .with_kind(ClassKind::Interface),
    );
    builder.type_param(DeclParent::Class(collection), "E");
    builder.set_supertypes(collection, vec![any.clone()]);
    let list = builder.class(ClassDecl::new("List", "pkg", DeclParent::File(file)));
    builder.type_param(DeclParent::Class(list), "E");
    let list_super = builder
        .ty("Collection<E>", Some(DeclParent::Class(list)))
        .expect("Collection<E>");
    builder.set_supertypes(list, vec![any.clone(), list_super]);

    let outer = builder.class(ClassDecl::new("Outer", "pkg", DeclParent::File(file)));
    builder.type_param(DeclParent::Class(outer), "A");
    builder.type_param(DeclParent::Class(outer), "B");
    let inner = builder.class(ClassDecl::new("Inner", "pkg", DeclParent::Class(outer)).inner());
    builder.type_param(DeclParent::Class(inner), "C");
    builder.type_param(DeclParent::Class(inner), "D");

    let fragment = builder.fragment("lib");
    let remote = builder.class(
        ClassDecl::new("Remote", "lib", DeclParent::ExternalPackage(fragment))
            .with_origin(Origin::ExternalStub),
    );
    builder.set_supertypes(remote, vec![any]);

    Fixture {
        graph: builder.finish(),
        foo,
        list,
        outer,
        inner,
        remote,
    }
}

pub(crate) fn ty(graph: &IrGraph, text: &str) -> IrType {
    let parsed = notation::parse_type(text).expect("type notation parses");
    notation::resolve(graph, &parsed, None).expect("type notation resolves")
}

pub(crate) fn extractor(graph: &IrGraph) -> Extractor<'_> {
    Extractor::in_memory(graph, ExtractorConfig::default())
}

pub(crate) fn key_label(ex: &Extractor<'_>, key: &str) -> AnyLabel {
    ex.sink()
        .label_of(key)
        .unwrap_or_else(|| panic!("no label bound to {}", key))
}
