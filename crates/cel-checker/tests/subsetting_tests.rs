//! §8 "subsetting purity": the set of expressions accepted by a library
//! filtered with a subset predicate equals the set accepted by a library
//! containing only the overloads the predicate keeps.

mod common;

use cel_checker::{Builder, CheckOutcome, FunctionDecl, OverloadDecl, Primitive, Type};

use common::AstBuilder;

fn size_of_bytes_ast() -> cel_checker::ParsedAst {
    let mut b = AstBuilder::new();
    let bytes = b.insert_bytes(vec![1, 2, 3]);
    let root = b.call("size", vec![bytes]);
    b.finish(root)
}

#[test]
fn subset_predicate_drops_the_overload_it_excludes() {
    let full = Builder::new()
        .add_library("stdlib", cel_checker::stdlib::install)
        .unwrap()
        .build()
        .unwrap();
    let subset = Builder::new()
        .add_library("stdlib", cel_checker::stdlib::install)
        .unwrap()
        .add_library_subset("stdlib", |_name, overload_id| overload_id != "size_bytes_global")
        .build()
        .unwrap();

    let full_ast = size_of_bytes_ast();
    let subset_ast = size_of_bytes_ast();

    match full.check(&full_ast) {
        CheckOutcome::Completed(result) => assert!(result.is_valid(), "{:?}", result.issues()),
        CheckOutcome::Aborted(reason) => panic!("unexpected abort: {reason:?}"),
    }
    match subset.check(&subset_ast) {
        CheckOutcome::Completed(result) => assert!(!result.is_valid()),
        CheckOutcome::Aborted(reason) => panic!("unexpected abort: {reason:?}"),
    }
}

#[test]
fn subsetting_matches_a_hand_built_environment_with_only_the_kept_overloads() {
    let predicate = |_name: &str, overload_id: &str| overload_id == "size_string_global";

    let subset_via_library = Builder::new()
        .add_library("stdlib", cel_checker::stdlib::install)
        .unwrap()
        .add_library_subset("stdlib", predicate)
        .build()
        .unwrap();

    let hand_built = {
        let mut overloads = cel_checker::stdlib::standard_overloads();
        overloads.retain(|(name, o)| predicate(name, &o.overload_id));
        let mut grouped: rustc_hash::FxHashMap<&str, cel_checker::FunctionDecl> = rustc_hash::FxHashMap::default();
        for (name, overload) in overloads {
            grouped
                .entry(name)
                .or_insert_with(|| cel_checker::FunctionDecl::new(name))
                .overloads
                .push(overload);
        }
        let mut builder = Builder::new();
        for (_, decl) in grouped {
            builder = builder.add_function(decl).unwrap();
        }
        builder.build().unwrap()
    };

    let mut b = AstBuilder::new();
    let s = b.string("hello");
    let root = b.call("size", vec![s]);
    let ast = b.finish(root);
    let mut b2 = AstBuilder::new();
    let s2 = b2.string("hello");
    let root2 = b2.call("size", vec![s2]);
    let ast2 = b2.finish(root2);

    let via_library_valid = matches!(subset_via_library.check(&ast), CheckOutcome::Completed(r) if r.is_valid());
    let hand_built_valid = matches!(hand_built.check(&ast2), CheckOutcome::Completed(r) if r.is_valid());
    assert_eq!(via_library_valid, hand_built_valid);
    assert!(via_library_valid);

    // The receiver-style overload was filtered out by the predicate.
    let mut b3 = AstBuilder::new();
    let s3 = b3.string("hello");
    let root3 = b3.method_call(s3, "size", vec![]);
    let ast3 = b3.finish(root3);
    match subset_via_library.check(&ast3) {
        CheckOutcome::Completed(result) => assert!(!result.is_valid()),
        CheckOutcome::Aborted(reason) => panic!("unexpected abort: {reason:?}"),
    }
}

/// A subset predicate registered against one library must never remove an
/// overload a *different* library contributed, even when the predicate
/// would reject it by name (§4.9 "subsetting purity").
#[test]
fn subset_on_one_library_never_touches_another_librarys_overloads() {
    let extra = FunctionDecl::new("greet").with_overload(OverloadDecl::new(
        "greet_string",
        false,
        vec![Type::Primitive(Primitive::String)],
        Type::Primitive(Primitive::String),
    ));

    let checker = Builder::new()
        .add_library("stdlib", cel_checker::stdlib::install)
        .unwrap()
        .add_library("extras", |b| b.add_function(extra))
        .unwrap()
        // Rejects everything; scoped to "stdlib" it must not affect "extras".
        .add_library_subset("stdlib", |_name, _overload_id| false)
        .build()
        .unwrap();

    let mut b = AstBuilder::new();
    let s = b.string("hi");
    let root = b.call("greet", vec![s]);
    let ast = b.finish(root);
    match checker.check(&ast) {
        CheckOutcome::Completed(result) => assert!(result.is_valid(), "{:?}", result.issues()),
        CheckOutcome::Aborted(reason) => panic!("unexpected abort: {reason:?}"),
    }

    // Meanwhile every stdlib overload really was dropped.
    let mut b2 = AstBuilder::new();
    let bytes = b2.insert_bytes(vec![1, 2, 3]);
    let root2 = b2.call("size", vec![bytes]);
    let ast2 = b2.finish(root2);
    match checker.check(&ast2) {
        CheckOutcome::Completed(result) => assert!(!result.is_valid()),
        CheckOutcome::Aborted(reason) => panic!("unexpected abort: {reason:?}"),
    }
}

/// A function/overload added directly (outside any `add_library` call) is
/// never touched by a library's subset predicate either.
#[test]
fn subset_never_touches_directly_added_functions() {
    let direct = FunctionDecl::new("greet").with_overload(OverloadDecl::new(
        "greet_string",
        false,
        vec![Type::Primitive(Primitive::String)],
        Type::Primitive(Primitive::String),
    ));

    let checker = Builder::new()
        .add_library("stdlib", cel_checker::stdlib::install)
        .unwrap()
        .add_function(direct)
        .unwrap()
        .add_library_subset("stdlib", |_name, _overload_id| false)
        .build()
        .unwrap();

    let mut b = AstBuilder::new();
    let s = b.string("hi");
    let root = b.call("greet", vec![s]);
    let ast = b.finish(root);
    match checker.check(&ast) {
        CheckOutcome::Completed(result) => assert!(result.is_valid(), "{:?}", result.issues()),
        CheckOutcome::Aborted(reason) => panic!("unexpected abort: {reason:?}"),
    }
}
