//! CEL type model (C1): the tagged union of all CEL types and the
//! structural operations (`equals`, `assignable`, `most_specific`,
//! `substitute`) the rest of the checker builds on.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::limits::MAX_TYPE_RECURSION_DEPTH;
use crate::subst::Substitution;

/// Inline storage for `Abstract` type parameters; most abstract types (e.g.
/// `optional_type`) take exactly one.
pub type TypeParamList = SmallVec<[Type; 2]>;

/// A free type-parameter identity, unique within one `Check()` call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeParamId(pub u32);

static NEXT_TYPE_PARAM_ID: AtomicU32 = AtomicU32::new(0);

impl TypeParamId {
    /// Allocates a fresh id. Ids are only unique within a process; callers
    /// reset the generator per `Check()` call via [`reset_type_param_ids`]
    /// so overflow across a long-running process never matters in practice.
    pub fn fresh() -> Self {
        Self(NEXT_TYPE_PARAM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Resets the global type-parameter id generator. Called once at the start
/// of every `Check()` so ids stay small and deterministic per call; safe to
/// call concurrently since each `Check()` owns its own substitution and
/// never compares ids across calls.
pub fn reset_type_param_ids() {
    NEXT_TYPE_PARAM_ID.store(0, Ordering::Relaxed);
}

/// Primitive scalar types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    Int,
    Uint,
    Double,
    String,
    Bytes,
}

impl Primitive {
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Int => "int",
            Primitive::Uint => "uint",
            Primitive::Double => "double",
            Primitive::String => "string",
            Primitive::Bytes => "bytes",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The CEL type model (§3, C1).
///
/// `Error` is internal: the walker uses it to suppress cascading diagnostics
/// after a sub-expression already failed to type; it is never written into a
/// checked AST's `type_map`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Dyn,
    Null,
    Error,
    Primitive(Primitive),
    /// Wrapper-of-primitive, e.g. `google.protobuf.Int64Value`. Semantically
    /// `P | Null`.
    Wrapper(Primitive),
    Any,
    Duration,
    Timestamp,
    List(Box<Type>),
    Map(Box<Type>, Box<Type>),
    /// A protobuf message, keyed by fully-qualified name.
    Message(String),
    /// Materially equivalent to `Int` for assignability; the name is kept
    /// only so references can report which enum was used.
    Enum(String),
    /// An opaque type constructor, e.g. `optional_type`.
    Abstract(String, TypeParamList),
    /// `type(x)` where `x: T`.
    TypeOf(Box<Type>),
    TypeParam(TypeParamId),
}

impl Type {
    pub fn list_of(elem: Type) -> Type {
        Type::List(Box::new(elem))
    }

    pub fn map_of(key: Type, value: Type) -> Type {
        Type::Map(Box::new(key), Box::new(value))
    }

    pub fn optional_of(inner: Type) -> Type {
        let mut params = TypeParamList::new();
        params.push(inner);
        Type::Abstract("optional_type".to_string(), params)
    }

    pub fn as_optional_param(&self) -> Option<&Type> {
        match self {
            Type::Abstract(name, params) if name == "optional_type" => params.first(),
            _ => None,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Type::Abstract(name, _) if name == "optional_type")
    }

    /// Map key types CEL literal syntax is allowed to produce directly;
    /// `Dyn`/`TypeParam` are permitted everywhere else but a literal site
    /// that resolves to anything outside this set is only a warning (§4.7).
    pub fn is_permitted_literal_map_key(&self) -> bool {
        matches!(
            self,
            Type::Primitive(Primitive::Bool)
                | Type::Primitive(Primitive::Int)
                | Type::Primitive(Primitive::Uint)
                | Type::Primitive(Primitive::String)
                | Type::Dyn
                | Type::TypeParam(_)
        )
    }

    /// Renders a type the way diagnostics quote it, e.g. `"int"`,
    /// `"list(string)"`, `"map(string, int)"`, matching the lower_snake
    /// vocabulary CEL's own error strings use.
    pub fn render(&self) -> String {
        match self {
            Type::Dyn => "dyn".to_string(),
            Type::Null => "null_type".to_string(),
            Type::Error => "<error>".to_string(),
            Type::Primitive(p) => p.name().to_string(),
            Type::Wrapper(p) => format!("wrapper({})", p.name()),
            Type::Any => "google.protobuf.Any".to_string(),
            Type::Duration => "google.protobuf.Duration".to_string(),
            Type::Timestamp => "google.protobuf.Timestamp".to_string(),
            Type::List(elem) => format!("list({})", elem.render()),
            Type::Map(k, v) => format!("map({}, {})", k.render(), v.render()),
            Type::Message(name) => name.clone(),
            Type::Enum(name) => name.clone(),
            Type::Abstract(name, params) => {
                if params.is_empty() {
                    name.clone()
                } else {
                    let rendered: Vec<String> = params.iter().map(Type::render).collect();
                    format!("{}({})", name, rendered.join(", "))
                }
            }
            Type::TypeOf(inner) => format!("type({})", inner.render()),
            Type::TypeParam(id) => format!("'{}'", id.0),
        }
    }

    /// Structural equality modulo substitution: both sides are resolved
    /// through `subst` before comparing shape.
    pub fn equals(&self, other: &Type, subst: &Substitution) -> bool {
        equals_impl(self, other, subst, 0)
    }

    /// Attempts to unify `source` against `target`, returning a substitution
    /// extended with any new bindings on success. Mirrors §4.1's rules.
    pub fn assignable(
        target: &Type,
        source: &Type,
        subst: &Substitution,
        options: &AssignabilityOptions,
    ) -> Option<Substitution> {
        assignable_impl(target, source, subst, options, 0)
    }

    /// Least-upper-bound used to homogenize list/map literal element types;
    /// falls back to `Dyn` whenever no common shape is found (§4.7).
    pub fn most_specific(a: &Type, b: &Type, subst: &Substitution) -> Type {
        if a.equals(b, subst) {
            return a.clone();
        }
        match (a, b) {
            (Type::Dyn, _) | (_, Type::Dyn) => Type::Dyn,
            (Type::List(ea), Type::List(eb)) => {
                Type::list_of(Type::most_specific(ea, eb, subst))
            }
            (Type::Map(ka, va), Type::Map(kb, vb)) => Type::map_of(
                Type::most_specific(ka, kb, subst),
                Type::most_specific(va, vb, subst),
            ),
            (Type::Primitive(Primitive::Int), Type::Primitive(Primitive::Uint))
            | (Type::Primitive(Primitive::Uint), Type::Primitive(Primitive::Int)) => Type::Dyn,
            _ => Type::Dyn,
        }
    }

    /// Recursively replaces bound parameters; any parameter still free after
    /// walking `subst` becomes `Dyn`, per §4.1/§3's closure invariant.
    pub fn substitute(&self, subst: &Substitution) -> Type {
        substitute_impl(self, subst, 0)
    }

    /// True if `self` (after substitution) contains no `TypeParam` at all —
    /// the invariant `type_map` must satisfy once annotated.
    pub fn is_closed(&self) -> bool {
        match self {
            Type::TypeParam(_) => false,
            Type::List(e) => e.is_closed(),
            Type::Map(k, v) => k.is_closed() && v.is_closed(),
            Type::Abstract(_, params) => params.iter().all(Type::is_closed),
            Type::TypeOf(inner) => inner.is_closed(),
            _ => true,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Flags that perturb assignability, threaded from [`crate::env::Environment`]
/// rather than read globally — keeps `Type::assignable` a pure function of
/// its arguments, matching §8's determinism property.
#[derive(Copy, Clone, Debug, Default)]
pub struct AssignabilityOptions {
    pub enable_cross_numeric_comparisons: bool,
    pub enable_legacy_null_assignment: bool,
}

fn equals_impl(a: &Type, b: &Type, subst: &Substitution, depth: u32) -> bool {
    if depth > MAX_TYPE_RECURSION_DEPTH {
        return false;
    }
    let a = resolve_one(a, subst);
    let b = resolve_one(b, subst);
    match (&a, &b) {
        (Type::List(ea), Type::List(eb)) => equals_impl(ea, eb, subst, depth + 1),
        (Type::Map(ka, va), Type::Map(kb, vb)) => {
            equals_impl(ka, kb, subst, depth + 1) && equals_impl(va, vb, subst, depth + 1)
        }
        (Type::Abstract(na, pa), Type::Abstract(nb, pb)) => {
            na == nb
                && pa.len() == pb.len()
                && pa
                    .iter()
                    .zip(pb.iter())
                    .all(|(x, y)| equals_impl(x, y, subst, depth + 1))
        }
        (Type::TypeOf(ta), Type::TypeOf(tb)) => equals_impl(ta, tb, subst, depth + 1),
        (Type::TypeParam(ia), Type::TypeParam(ib)) => ia == ib,
        _ => a == b,
    }
}

/// Resolves one level of substitution for a top-level `TypeParam`, walking
/// the chain without recursing into child types (those are resolved lazily
/// by the caller as needed).
fn resolve_one(t: &Type, subst: &Substitution) -> Type {
    let mut current = t.clone();
    let mut steps = 0;
    while let Type::TypeParam(id) = current {
        match subst.get(id) {
            Some(next) => {
                current = next.clone();
                steps += 1;
                if steps > MAX_TYPE_RECURSION_DEPTH {
                    return Type::Dyn;
                }
            }
            None => return Type::TypeParam(id),
        }
    }
    current
}

fn assignable_impl(
    target: &Type,
    source: &Type,
    subst: &Substitution,
    options: &AssignabilityOptions,
    depth: u32,
) -> Option<Substitution> {
    if depth > MAX_TYPE_RECURSION_DEPTH {
        return Some(subst.clone());
    }
    let target = resolve_one(target, subst);
    let source = resolve_one(source, subst);

    if let Type::TypeParam(id) = source {
        return Some(subst.bind(id, target));
    }
    if let Type::TypeParam(id) = target {
        return Some(subst.bind(id, source));
    }
    if matches!(target, Type::Dyn) || matches!(source, Type::Dyn) {
        return Some(subst.clone());
    }
    if matches!(source, Type::Error) || matches!(target, Type::Error) {
        return Some(subst.clone());
    }

    match (&target, &source) {
        (Type::Wrapper(p), Type::Primitive(q)) | (Type::Primitive(q), Type::Wrapper(p))
            if p == q =>
        {
            Some(subst.clone())
        }
        (Type::Wrapper(_), Type::Null) => Some(subst.clone()),
        (Type::Wrapper(a), Type::Wrapper(b)) if a == b => Some(subst.clone()),
        (Type::Message(_), Type::Null)
        | (Type::Duration, Type::Null)
        | (Type::Timestamp, Type::Null)
        | (Type::Abstract(_, _), Type::Null)
            if options.enable_legacy_null_assignment =>
        {
            Some(subst.clone())
        }
        (Type::Any, _) => Some(subst.clone()),
        (_, Type::Any) => Some(subst.clone()),
        (Type::List(ta), Type::List(sa)) => {
            assignable_impl(ta, sa, subst, options, depth + 1)
        }
        (Type::Map(tk, tv), Type::Map(sk, sv)) => {
            let subst = assignable_impl(tk, sk, subst, options, depth + 1)?;
            assignable_impl(tv, sv, &subst, options, depth + 1)
        }
        (Type::Message(tn), Type::Message(sn)) => (tn == sn).then(|| subst.clone()),
        (Type::Enum(_), Type::Primitive(Primitive::Int))
        | (Type::Primitive(Primitive::Int), Type::Enum(_))
        | (Type::Enum(_), Type::Enum(_)) => Some(subst.clone()),
        (Type::Abstract(tn, tp), Type::Abstract(sn, sp)) if tn == sn && tp.len() == sp.len() => {
            let mut subst = subst.clone();
            for (t, s) in tp.iter().zip(sp.iter()) {
                subst = assignable_impl(t, s, &subst, options, depth + 1)?;
            }
            Some(subst)
        }
        (Type::TypeOf(ta), Type::TypeOf(sa)) => assignable_impl(ta, sa, subst, options, depth + 1),
        (Type::Primitive(Primitive::Int), Type::Primitive(Primitive::Uint))
        | (Type::Primitive(Primitive::Int), Type::Primitive(Primitive::Double))
        | (Type::Primitive(Primitive::Uint), Type::Primitive(Primitive::Int))
        | (Type::Primitive(Primitive::Uint), Type::Primitive(Primitive::Double))
        | (Type::Primitive(Primitive::Double), Type::Primitive(Primitive::Int))
        | (Type::Primitive(Primitive::Double), Type::Primitive(Primitive::Uint))
            if options.enable_cross_numeric_comparisons =>
        {
            Some(subst.clone())
        }
        _ => (target == source).then(|| subst.clone()),
    }
}

fn substitute_impl(t: &Type, subst: &Substitution, depth: u32) -> Type {
    if depth > MAX_TYPE_RECURSION_DEPTH {
        return Type::Dyn;
    }
    match t {
        Type::TypeParam(id) => match subst.get(*id) {
            Some(bound) => substitute_impl(&bound, subst, depth + 1),
            None => Type::Dyn,
        },
        Type::List(elem) => Type::list_of(substitute_impl(elem, subst, depth + 1)),
        Type::Map(k, v) => Type::map_of(
            substitute_impl(k, subst, depth + 1),
            substitute_impl(v, subst, depth + 1),
        ),
        Type::Abstract(name, params) => Type::Abstract(
            name.clone(),
            params
                .iter()
                .map(|p| substitute_impl(p, subst, depth + 1))
                .collect(),
        ),
        Type::TypeOf(inner) => Type::TypeOf(Box::new(substitute_impl(inner, subst, depth + 1))),
        other => other.clone(),
    }
}

/// Well-known wrapper-message names recognized at struct-construction and
/// field-resolution sites (§3's `W(P)` variant).
pub fn wrapper_for_message_name(name: &str) -> Option<Primitive> {
    let map: FxHashMap<&str, Primitive> = [
        ("google.protobuf.BoolValue", Primitive::Bool),
        ("google.protobuf.Int32Value", Primitive::Int),
        ("google.protobuf.Int64Value", Primitive::Int),
        ("google.protobuf.UInt32Value", Primitive::Uint),
        ("google.protobuf.UInt64Value", Primitive::Uint),
        ("google.protobuf.FloatValue", Primitive::Double),
        ("google.protobuf.DoubleValue", Primitive::Double),
        ("google.protobuf.StringValue", Primitive::String),
        ("google.protobuf.BytesValue", Primitive::Bytes),
    ]
    .into_iter()
    .collect();
    map.get(name).copied()
}

/// True for well-known type names that are never ordinary structs
/// (governs `allow_well_known_type_context_declarations`, §4.2).
pub fn is_well_known_type_name(name: &str) -> bool {
    wrapper_for_message_name(name).is_some()
        || matches!(
            name,
            "google.protobuf.Any" | "google.protobuf.Duration" | "google.protobuf.Timestamp"
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> AssignabilityOptions {
        AssignabilityOptions {
            enable_cross_numeric_comparisons: false,
            enable_legacy_null_assignment: true,
        }
    }

    #[test]
    fn dyn_is_assignable_both_ways() {
        let subst = Substitution::new();
        assert!(Type::assignable(&Type::Dyn, &Type::Primitive(Primitive::Int), &subst, &opts())
            .is_some());
        assert!(Type::assignable(&Type::Primitive(Primitive::Int), &Type::Dyn, &subst, &opts())
            .is_some());
    }

    #[test]
    fn int_and_uint_are_not_implicitly_assignable() {
        let subst = Substitution::new();
        assert!(Type::assignable(
            &Type::Primitive(Primitive::Int),
            &Type::Primitive(Primitive::Uint),
            &subst,
            &opts()
        )
        .is_none());
    }

    #[test]
    fn cross_numeric_flag_permits_int_uint() {
        let subst = Substitution::new();
        let mut o = opts();
        o.enable_cross_numeric_comparisons = true;
        assert!(Type::assignable(
            &Type::Primitive(Primitive::Int),
            &Type::Primitive(Primitive::Uint),
            &subst,
            &o
        )
        .is_some());
    }

    #[test]
    fn legacy_null_assignment_toggle() {
        let subst = Substitution::new();
        let mut on = opts();
        on.enable_legacy_null_assignment = true;
        assert!(Type::assignable(&Type::Duration, &Type::Null, &subst, &on).is_some());

        let mut off = opts();
        off.enable_legacy_null_assignment = false;
        assert!(Type::assignable(&Type::Duration, &Type::Null, &subst, &off).is_none());
    }

    #[test]
    fn type_param_binds_on_assignment() {
        let subst = Substitution::new();
        let id = TypeParamId::fresh();
        let result = Type::assignable(
            &Type::TypeParam(id),
            &Type::Primitive(Primitive::String),
            &subst,
            &opts(),
        )
        .unwrap();
        assert_eq!(result.get(id), Some(Type::Primitive(Primitive::String)));
    }

    #[test]
    fn cyclic_substitution_demotes_to_dyn() {
        let id = TypeParamId::fresh();
        let subst = Substitution::new().bind(id, Type::list_of(Type::TypeParam(id)));
        let resolved = Type::TypeParam(id).substitute(&subst);
        // List(TypeParam(id)) substitutes its inner occurrence to Dyn once
        // the recursion depth check trips, matching the demotion policy.
        assert!(matches!(resolved, Type::List(_)));
    }

    #[test]
    fn most_specific_falls_back_to_dyn() {
        let subst = Substitution::new();
        let lub = Type::most_specific(
            &Type::Primitive(Primitive::String),
            &Type::Primitive(Primitive::Int),
            &subst,
        );
        assert_eq!(lub, Type::Dyn);
    }

    #[test]
    fn render_matches_scenario_vocabulary() {
        assert_eq!(Type::Primitive(Primitive::Int).render(), "int");
        assert_eq!(Type::Primitive(Primitive::String).render(), "string");
        assert_eq!(Type::Duration.render(), "google.protobuf.Duration");
        assert_eq!(Type::Null.render(), "null_type");
    }

    #[test]
    fn enum_assignable_to_int() {
        let subst = Substitution::new();
        assert!(Type::assignable(
            &Type::Primitive(Primitive::Int),
            &Type::Enum("com.example.Color".to_string()),
            &subst,
            &opts()
        )
        .is_some());
    }
}
