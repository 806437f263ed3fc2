//! Integration coverage for the optional-type plug-in (§4.11) wired through
//! a full `Builder`/`Checker`, as opposed to `optional.rs`'s unit tests
//! which only inspect the declaration table directly.

mod common;

use cel_checker::{Builder, CheckOutcome, Primitive, Type, VariableDecl};

use common::AstBuilder;

fn checker_with_optional_and(var: &str, ty: Type) -> cel_checker::Checker {
    cel_checker::optional::install(Builder::new())
        .unwrap()
        .add_variable(VariableDecl::new(var, ty))
        .unwrap()
        .build()
        .unwrap()
}

#[test]
fn optional_of_wraps_int_into_optional_int() {
    let checker = checker_with_optional_and("x", Type::Primitive(Primitive::Int));

    let mut b = AstBuilder::new();
    let x = b.ident("x");
    let root = b.call("optional.of", vec![x]);
    let ast = b.finish(root);

    match checker.check(&ast) {
        CheckOutcome::Completed(result) => {
            assert!(result.is_valid(), "{:?}", result.issues());
            let checked = result.ast().unwrap();
            let ty = checked.result_type().unwrap();
            assert!(ty.is_optional());
            assert_eq!(ty.as_optional_param(), Some(&Type::Primitive(Primitive::Int)));
        }
        CheckOutcome::Aborted(reason) => panic!("unexpected abort: {reason:?}"),
    }
}

#[test]
fn value_unwraps_optional_back_to_its_inner_type() {
    let checker = checker_with_optional_and("x", Type::Primitive(Primitive::Int));

    let mut b = AstBuilder::new();
    let x = b.ident("x");
    let opt = b.call("optional.of", vec![x]);
    let root = b.method_call(opt, "value", vec![]);
    let ast = b.finish(root);

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
fn has_value_always_yields_bool() {
    let checker = checker_with_optional_and("x", Type::Primitive(Primitive::Int));

    let mut b = AstBuilder::new();
    let x = b.ident("x");
    let opt = b.call("optional.of", vec![x]);
    let root = b.method_call(opt, "hasValue", vec![]);
    let ast = b.finish(root);

    match checker.check(&ast) {
        CheckOutcome::Completed(result) => {
            assert!(result.is_valid(), "{:?}", result.issues());
            let checked = result.ast().unwrap();
            assert_eq!(checked.result_type(), Some(&Type::Primitive(Primitive::Bool)));
        }
        CheckOutcome::Aborted(reason) => panic!("unexpected abort: {reason:?}"),
    }
}

#[test]
fn optional_index_on_list_yields_optional_element() {
    let checker = cel_checker::optional::install(Builder::new()).unwrap().build().unwrap();

    let mut b = AstBuilder::new();
    let one = b.int(1);
    let list = b.list(vec![one]);
    let zero = b.int(0);
    let root = b.call("_[?_]", vec![list, zero]);
    let ast = b.finish(root);

    match checker.check(&ast) {
        CheckOutcome::Completed(result) => {
            assert!(result.is_valid(), "{:?}", result.issues());
            let checked = result.ast().unwrap();
            let ty = checked.result_type().unwrap();
            assert!(ty.is_optional());
            assert_eq!(ty.as_optional_param(), Some(&Type::Primitive(Primitive::Int)));
        }
        CheckOutcome::Aborted(reason) => panic!("unexpected abort: {reason:?}"),
    }
}
