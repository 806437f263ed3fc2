//! Schema oracle adapter (C3): the sole bridge to the proto ecosystem.
//!
//! The checker never depends on a concrete descriptor-pool library; it only
//! consumes [`SchemaOracle`]. [`MapSchema`] is an in-memory implementation
//! suitable for tests and for embedders who build their descriptor table by
//! hand rather than from a `FileDescriptorSet`.

use rustc_hash::FxHashMap;

use crate::types::Type;

/// How many values of a field a message may carry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cardinality {
    Optional,
    Repeated,
    /// A oneof member; at most one sibling oneof field may be set.
    Oneof,
}

/// One field of a message descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: Type,
    pub cardinality: Cardinality,
}

/// A structural view of a protobuf message: field name → type/cardinality.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageDescriptor {
    pub full_name: String,
    pub fields: Vec<FieldDescriptor>,
}

impl MessageDescriptor {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            ty,
            cardinality: Cardinality::Optional,
        });
        self
    }

    pub fn with_repeated_field(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            ty,
            cardinality: Cardinality::Repeated,
        });
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields eligible as context-declaration top-level variables: every
    /// non-oneof field (§4.2).
    pub fn non_oneof_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields
            .iter()
            .filter(|f| f.cardinality != Cardinality::Oneof)
    }
}

/// An enum descriptor: value name → integer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnumDescriptor {
    pub full_name: String,
    pub values: FxHashMap<String, i64>,
}

/// Required operations of the schema oracle (§4.3). The checker never
/// depends on a concrete descriptor library beyond this interface.
pub trait SchemaOracle {
    fn find_message(&self, name: &str) -> Option<&MessageDescriptor>;
    fn find_enum(&self, name: &str) -> Option<&EnumDescriptor>;

    /// A message type, but not a well-known one, is eligible for
    /// `add_context_declaration` (§4.2). Well-known wrapper/Any/Duration/
    /// Timestamp types are message-shaped in the descriptor pool but are
    /// rejected as context declarations unless
    /// `allow_well_known_type_context_declarations` is set — that flag
    /// check happens in the builder, not here.
    fn is_context_eligible(&self, name: &str) -> bool {
        self.find_message(name).is_some()
    }

    fn field_type(&self, descriptor: &MessageDescriptor, field_name: &str) -> Option<(Type, Cardinality)> {
        descriptor
            .field(field_name)
            .map(|f| (f.ty.clone(), f.cardinality))
    }
}

/// An in-memory [`SchemaOracle`] backed by plain maps — the adapter an
/// embedder reaches for when it already has its message/enum tables as data
/// rather than wanting to stand up a full descriptor pool.
#[derive(Clone, Debug, Default)]
pub struct MapSchema {
    messages: FxHashMap<String, MessageDescriptor>,
    enums: FxHashMap<String, EnumDescriptor>,
}

impl MapSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(mut self, descriptor: MessageDescriptor) -> Self {
        self.messages.insert(descriptor.full_name.clone(), descriptor);
        self
    }

    pub fn with_enum(mut self, descriptor: EnumDescriptor) -> Self {
        self.enums.insert(descriptor.full_name.clone(), descriptor);
        self
    }
}

impl SchemaOracle for MapSchema {
    fn find_message(&self, name: &str) -> Option<&MessageDescriptor> {
        self.messages.get(name)
    }

    fn find_enum(&self, name: &str) -> Option<&EnumDescriptor> {
        self.enums.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Primitive;

    fn test_all_types() -> MessageDescriptor {
        MessageDescriptor::new("cel.expr.conformance.proto3.TestAllTypes")
            .with_field("single_int64", Type::Primitive(Primitive::Int))
            .with_field("single_duration", Type::Duration)
    }

    #[test]
    fn map_schema_resolves_fields() {
        let schema = MapSchema::new().with_message(test_all_types());
        let desc = schema
            .find_message("cel.expr.conformance.proto3.TestAllTypes")
            .unwrap();
        assert_eq!(
            desc.field("single_int64").unwrap().ty,
            Type::Primitive(Primitive::Int)
        );
        assert!(desc.field("missing").is_none());
    }

    #[test]
    fn is_context_eligible_true_for_known_message() {
        let schema = MapSchema::new().with_message(test_all_types());
        assert!(schema.is_context_eligible("cel.expr.conformance.proto3.TestAllTypes"));
        assert!(!schema.is_context_eligible("not.a.real.Message"));
    }

    #[test]
    fn non_oneof_fields_excludes_oneof_members() {
        let mut desc = test_all_types();
        desc.fields.push(FieldDescriptor {
            name: "oneof_field".to_string(),
            ty: Type::Primitive(Primitive::String),
            cardinality: Cardinality::Oneof,
        });
        let names: Vec<&str> = desc.non_oneof_fields().map(|f| f.name.as_str()).collect();
        assert!(!names.contains(&"oneof_field"));
        assert!(names.contains(&"single_int64"));
    }
}
