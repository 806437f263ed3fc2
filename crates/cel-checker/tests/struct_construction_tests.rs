//! §8 scenario 5: message-construction round-trip.

mod common;

use cel_checker::{Builder, CheckOutcome, MapSchema, MessageDescriptor, Primitive, Type};

use common::AstBuilder;

fn test_all_types_schema() -> MapSchema {
    MapSchema::new().with_message(
        MessageDescriptor::new("cel.expr.conformance.proto3.TestAllTypes")
            .with_field("single_int64", Type::Primitive(Primitive::Int))
            .with_field("single_duration", Type::Duration),
    )
}

#[test]
fn test_all_types_int64_field_round_trips() {
    let checker = Builder::new()
        .with_schema(test_all_types_schema())
        .set_container("cel.expr.conformance.proto3")
        .build()
        .unwrap();

    let mut b = AstBuilder::new();
    let ten = b.int(10);
    let root = b.strct("TestAllTypes", vec![("single_int64", ten)]);
    let ast = b.finish(root);

    match checker.check(&ast) {
        CheckOutcome::Completed(result) => {
            assert!(result.is_valid(), "{:?}", result.issues());
            let checked = result.ast().unwrap();
            assert_eq!(
                checked.result_type(),
                Some(&Type::Message("cel.expr.conformance.proto3.TestAllTypes".to_string()))
            );
            let reference = checked.reference_of(root).unwrap();
            assert_eq!(
                reference.fully_qualified_name,
                "cel.expr.conformance.proto3.TestAllTypes"
            );
        }
        CheckOutcome::Aborted(reason) => panic!("unexpected abort: {reason:?}"),
    }
}

#[test]
fn unknown_field_is_rejected() {
    let checker = Builder::new()
        .with_schema(test_all_types_schema())
        .set_container("cel.expr.conformance.proto3")
        .build()
        .unwrap();

    let mut b = AstBuilder::new();
    let ten = b.int(10);
    let root = b.strct("TestAllTypes", vec![("not_a_field", ten)]);
    let ast = b.finish(root);

    match checker.check(&ast) {
        CheckOutcome::Completed(result) => {
            assert!(!result.is_valid());
            assert!(result.issues().iter().any(|i| i.message.contains("not_a_field")));
        }
        CheckOutcome::Aborted(reason) => panic!("unexpected abort: {reason:?}"),
    }
}

#[test]
fn wrong_field_type_is_rejected() {
    let checker = Builder::new()
        .with_schema(test_all_types_schema())
        .set_container("cel.expr.conformance.proto3")
        .build()
        .unwrap();

    let mut b = AstBuilder::new();
    let hello = b.string("hello");
    let root = b.strct("TestAllTypes", vec![("single_int64", hello)]);
    let ast = b.finish(root);

    match checker.check(&ast) {
        CheckOutcome::Completed(result) => {
            assert!(!result.is_valid());
        }
        CheckOutcome::Aborted(reason) => panic!("unexpected abort: {reason:?}"),
    }
}

#[test]
fn unresolvable_message_name_is_an_undeclared_reference() {
    let checker = Builder::new().with_schema(test_all_types_schema()).build().unwrap();

    let mut b = AstBuilder::new();
    let root = b.strct("NoSuchMessage", vec![]);
    let ast = b.finish(root);

    match checker.check(&ast) {
        CheckOutcome::Completed(result) => {
            assert!(!result.is_valid());
        }
        CheckOutcome::Aborted(reason) => panic!("unexpected abort: {reason:?}"),
    }
}
