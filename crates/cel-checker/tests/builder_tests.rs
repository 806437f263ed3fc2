//! Integration-level `Builder`/`Checker` assembly tests complementing
//! `builder.rs`'s own unit tests, which only probe the declaration tables
//! directly rather than an end-to-end `check()` call.

mod common;

use cel_checker::schema::{MapSchema, MessageDescriptor};
use cel_checker::{BuildError, Builder, CheckOutcome, Primitive, Type};

use common::AstBuilder;

#[test]
fn registering_the_same_library_id_twice_is_a_build_error() {
    let result = Builder::new()
        .add_library("stdlib", cel_checker::stdlib::install)
        .unwrap()
        .add_library("stdlib", cel_checker::stdlib::install);
    assert!(matches!(result, Err(BuildError::DuplicateLibraryId(id)) if id == "stdlib"));
}

#[test]
fn stdlib_and_optional_compose_via_add_library() {
    let checker = Builder::new()
        .add_library("stdlib", cel_checker::stdlib::install)
        .unwrap()
        .add_library("optional", cel_checker::optional::install)
        .unwrap()
        .build()
        .unwrap();

    assert!(checker.environment().lookup_function("_+_").is_some());
    assert!(checker.environment().lookup_function("optional.of").is_some());
}

#[test]
fn context_declaration_variable_is_usable_in_a_checked_expression() {
    let schema = MapSchema::new().with_message(
        MessageDescriptor::new("pkg.Ctx").with_field("a", Type::Primitive(Primitive::Int)),
    );
    let checker = Builder::new()
        .with_schema(schema)
        .add_context_declaration("pkg.Ctx")
        .build()
        .unwrap();

    let mut b = AstBuilder::new();
    let a = b.ident("a");
    let ast = b.finish(a);

    match checker.check(&ast) {
        CheckOutcome::Completed(result) => {
            assert!(result.is_valid(), "{:?}", result.issues());
            let checked = result.ast().unwrap();
            assert_eq!(checked.result_type(), Some(&Type::Primitive(Primitive::Int)));
        }
        CheckOutcome::Aborted(reason) => panic!("unexpected abort: {reason:?}"),
    }
}

#[test]
fn check_to_result_collapses_a_node_budget_abort_into_an_error_issue() {
    let checker = Builder::new().max_expression_node_count(Some(0)).build().unwrap();
    let mut b = AstBuilder::new();
    let one = b.int(1);
    let ast = b.finish(one);

    let result = checker.check_to_result(&ast);
    assert!(!result.is_valid());
    assert_eq!(result.issues().len(), 1);
}
