//! Standard function/overload table, grounded in `common/standard_definitions.h`
//! (§10.6): equality, logical operators, arithmetic, the relational family,
//! container operators, string functions, timestamp/duration accessors, and
//! the `bool`/`bytes`/`double`/`dyn`/`int`/`string`/`type`/`uint` type
//! conversions.
//!
//! Overload ids follow a single uniform `<op>_<paramType1>[_<paramType2>]`
//! convention throughout (e.g. `add_double_double`), a deliberate departure
//! from upstream's irregular abbreviations (`add_double`) — §8 scenario 1
//! names `add_double_double` literally as a testable property.
//!
//! Cross-numeric relational/arithmetic pairs (`1 < 2.0`) are **not**
//! separately declared here: only declaring the homogeneous overload and
//! relying on [`crate::types::Type::assignable`]'s
//! `enable_cross_numeric_comparisons` gate (already threaded through
//! [`crate::overload::resolve`]) is sufficient, and keeps this table from
//! doubling in size.

use rustc_hash::FxHashMap;

use crate::builder::{BuildError, Builder};
use crate::decls::{FunctionDecl, OverloadDecl};
use crate::types::{Primitive, Type, TypeParamId};

fn overload(
    id: &str,
    receiver: bool,
    params: Vec<Type>,
    result: Type,
) -> OverloadDecl {
    OverloadDecl::new(id, receiver, params, result)
}

fn p(prim: Primitive) -> Type {
    Type::Primitive(prim)
}

/// Builds every standard overload, grouped by function name in declaration
/// order (§10.6). Exposed separately from [`install`] so callers can
/// inspect or further filter the table (e.g. via
/// [`Builder::add_library_subset`]) without re-deriving it.
pub fn standard_overloads() -> Vec<(&'static str, OverloadDecl)> {
    use Primitive::*;

    let mut out = Vec::new();

    // Equality: shared type parameter across both positions forces operand
    // agreement through ordinary unification, no special-casing (§4.6).
    {
        let t = Type::TypeParam(TypeParamId::fresh());
        out.push(("_==_", overload("equals", false, vec![t.clone(), t.clone()], p(Bool))));
    }
    {
        let t = Type::TypeParam(TypeParamId::fresh());
        out.push(("_!=_", overload("not_equals", false, vec![t.clone(), t], p(Bool))));
    }

    // Logical operators.
    out.push(("_&&_", overload("logical_and", false, vec![p(Bool), p(Bool)], p(Bool))));
    out.push(("_||_", overload("logical_or", false, vec![p(Bool), p(Bool)], p(Bool))));
    out.push(("!_", overload("logical_not", false, vec![p(Bool)], p(Bool))));
    {
        let t = Type::TypeParam(TypeParamId::fresh());
        out.push((
            "_?_:_",
            overload("conditional", false, vec![p(Bool), t.clone(), t.clone()], t),
        ));
    }

    // Arithmetic over the three numeric primitives.
    for (op, name) in [("_+_", "add"), ("_-_", "subtract"), ("_*_", "multiply"), ("_/_", "divide")] {
        for prim in [Int, Uint, Double] {
            let id = format!("{name}_{p}_{p}", p = prim.name());
            out.push((op, overload(&id, false, vec![p(prim), p(prim)], p(prim))));
        }
    }
    for prim in [Int, Uint] {
        let id = format!("modulo_{p}_{p}", p = prim.name());
        out.push(("_%_", overload(&id, false, vec![p(prim), p(prim)], p(prim))));
    }
    for prim in [Int, Double] {
        let id = format!("negate_{}", prim.name());
        out.push(("-_", overload(&id, false, vec![p(prim)], p(prim))));
    }

    // Duration/timestamp arithmetic.
    out.push(("_+_", overload("add_duration_duration", false, vec![Type::Duration, Type::Duration], Type::Duration)));
    out.push(("_+_", overload("add_timestamp_duration", false, vec![Type::Timestamp, Type::Duration], Type::Timestamp)));
    out.push(("_+_", overload("add_duration_timestamp", false, vec![Type::Duration, Type::Timestamp], Type::Timestamp)));
    out.push(("_-_", overload("subtract_duration_duration", false, vec![Type::Duration, Type::Duration], Type::Duration)));
    out.push(("_-_", overload("subtract_timestamp_duration", false, vec![Type::Timestamp, Type::Duration], Type::Timestamp)));
    out.push(("_-_", overload("subtract_timestamp_timestamp", false, vec![Type::Timestamp, Type::Timestamp], Type::Duration)));

    // Relational family: homogeneous pairs only (see module doc).
    for (op, name) in [
        ("_<_", "less"),
        ("_>_", "greater"),
        ("_<=_", "less_equals"),
        ("_>=_", "greater_equals"),
    ] {
        for prim in [Bool, Int, Uint, Double, String, Bytes] {
            let id = format!("{name}_{p}_{p}", p = prim.name());
            out.push((op, overload(&id, false, vec![p(prim), p(prim)], p(Bool))));
        }
        out.push((op, overload(&format!("{name}_duration_duration"), false, vec![Type::Duration, Type::Duration], p(Bool))));
        out.push((op, overload(&format!("{name}_timestamp_timestamp"), false, vec![Type::Timestamp, Type::Timestamp], p(Bool))));
    }

    // Container operators.
    {
        let elem = Type::TypeParam(TypeParamId::fresh());
        out.push(("_[_]", overload("index_list", false, vec![Type::list_of(elem.clone()), p(Int)], elem)));
    }
    {
        let key = Type::TypeParam(TypeParamId::fresh());
        let value = Type::TypeParam(TypeParamId::fresh());
        out.push((
            "_[_]",
            overload("index_map", false, vec![Type::map_of(key.clone(), value.clone()), key], value),
        ));
    }
    {
        let elem = Type::TypeParam(TypeParamId::fresh());
        out.push(("@in", overload("in_list", false, vec![elem.clone(), Type::list_of(elem)], p(Bool))));
    }
    {
        let key = Type::TypeParam(TypeParamId::fresh());
        let value = Type::TypeParam(TypeParamId::fresh());
        out.push(("@in", overload("in_map", false, vec![key.clone(), Type::map_of(key, value)], p(Bool))));
    }
    out.push(("size", overload("size_bytes", true, vec![p(Bytes)], p(Int))));
    out.push(("size", overload("size_string", true, vec![p(String)], p(Int))));
    {
        let elem = Type::TypeParam(TypeParamId::fresh());
        out.push(("size", overload("size_list", true, vec![Type::list_of(elem)], p(Int))));
    }
    {
        let key = Type::TypeParam(TypeParamId::fresh());
        let value = Type::TypeParam(TypeParamId::fresh());
        out.push(("size", overload("size_map", true, vec![Type::map_of(key, value)], p(Int))));
    }
    out.push(("size", overload("size_bytes_global", false, vec![p(Bytes)], p(Int))));
    out.push(("size", overload("size_string_global", false, vec![p(String)], p(Int))));
    {
        let elem = Type::TypeParam(TypeParamId::fresh());
        out.push(("size", overload("size_list_global", false, vec![Type::list_of(elem)], p(Int))));
    }
    {
        let key = Type::TypeParam(TypeParamId::fresh());
        let value = Type::TypeParam(TypeParamId::fresh());
        out.push(("size", overload("size_map_global", false, vec![Type::map_of(key, value)], p(Int))));
    }

    // String functions, receiver-style.
    for name in ["contains", "endsWith", "startsWith"] {
        let id = format!("{}_string", name.to_ascii_lowercase());
        out.push((name, overload(&id, true, vec![p(String), p(String)], p(Bool))));
    }
    out.push(("matches", overload("matches_string", true, vec![p(String), p(String)], p(Bool))));

    // Timestamp accessors, each with a bare and a timezone-string overload.
    let timestamp_accessors = [
        "getFullYear",
        "getMonth",
        "getDayOfYear",
        "getDayOfMonth",
        "getDate",
        "getDayOfWeek",
        "getHours",
        "getMinutes",
        "getSeconds",
        "getMilliseconds",
    ];
    for name in timestamp_accessors {
        let id = format!("timestamp_{}", to_snake(name));
        out.push((name, overload(&id, true, vec![Type::Timestamp], p(Int))));
        let tz_id = format!("timestamp_{}_with_tz", to_snake(name));
        out.push((name, overload(&tz_id, true, vec![Type::Timestamp, p(String)], p(Int))));
    }

    // Duration accessors: no calendar fields, so no timezone overload.
    for name in ["getHours", "getMinutes", "getSeconds", "getMilliseconds"] {
        let id = format!("duration_{}", to_snake(name));
        out.push((name, overload(&id, true, vec![Type::Duration], p(Int))));
    }

    // Type conversions (global, non-receiver-style functions named after
    // their target type).
    out.push(("bool", overload("to_bool_bool", false, vec![p(Bool)], p(Bool))));
    out.push(("bool", overload("to_bool_string", false, vec![p(String)], p(Bool))));

    out.push(("bytes", overload("to_bytes_bytes", false, vec![p(Bytes)], p(Bytes))));
    out.push(("bytes", overload("to_bytes_string", false, vec![p(String)], p(Bytes))));

    out.push(("double", overload("to_double_double", false, vec![p(Double)], p(Double))));
    out.push(("double", overload("to_double_int", false, vec![p(Int)], p(Double))));
    out.push(("double", overload("to_double_uint", false, vec![p(Uint)], p(Double))));
    out.push(("double", overload("to_double_string", false, vec![p(String)], p(Double))));

    {
        let t = Type::TypeParam(TypeParamId::fresh());
        out.push(("dyn", overload("to_dyn", false, vec![t], Type::Dyn)));
    }

    out.push(("int", overload("to_int_int", false, vec![p(Int)], p(Int))));
    out.push(("int", overload("to_int_uint", false, vec![p(Uint)], p(Int))));
    out.push(("int", overload("to_int_double", false, vec![p(Double)], p(Int))));
    out.push(("int", overload("to_int_string", false, vec![p(String)], p(Int))));
    out.push(("int", overload("to_int_timestamp", false, vec![Type::Timestamp], p(Int))));

    out.push(("string", overload("to_string_string", false, vec![p(String)], p(String))));
    out.push(("string", overload("to_string_int", false, vec![p(Int)], p(String))));
    out.push(("string", overload("to_string_uint", false, vec![p(Uint)], p(String))));
    out.push(("string", overload("to_string_double", false, vec![p(Double)], p(String))));
    out.push(("string", overload("to_string_bytes", false, vec![p(Bytes)], p(String))));
    out.push(("string", overload("to_string_timestamp", false, vec![Type::Timestamp], p(String))));
    out.push(("string", overload("to_string_duration", false, vec![Type::Duration], p(String))));

    out.push(("uint", overload("to_uint_uint", false, vec![p(Uint)], p(Uint))));
    out.push(("uint", overload("to_uint_int", false, vec![p(Int)], p(Uint))));
    out.push(("uint", overload("to_uint_double", false, vec![p(Double)], p(Uint))));
    out.push(("uint", overload("to_uint_string", false, vec![p(String)], p(Uint))));

    // `type(x)` names the dynamic type of `x` and is typed as `type(T)`, the
    // same `Type::TypeOf` a bare type-naming identifier resolves to (§4.7,
    // §9's "type equal to value" duality).
    {
        let t = Type::TypeParam(TypeParamId::fresh());
        out.push(("type", overload("to_type", false, vec![t.clone()], Type::TypeOf(Box::new(t)))));
    }

    out
}

fn to_snake(camel: &str) -> String {
    let mut snake = String::new();
    for (i, ch) in camel.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                snake.push('_');
            }
            snake.push(ch.to_ascii_lowercase());
        } else {
            snake.push(ch);
        }
    }
    snake
}

/// Registers the standard library's overloads onto `builder` (§10.6). Meant
/// to be passed to [`Builder::add_library`]:
/// `Builder::new().add_library("stdlib", stdlib::install)`.
pub fn install(mut builder: Builder) -> Result<Builder, BuildError> {
    let mut grouped: FxHashMap<&str, FunctionDecl> = FxHashMap::default();
    for (name, overload) in standard_overloads() {
        grouped
            .entry(name)
            .or_insert_with(|| FunctionDecl::new(name))
            .overloads
            .push(overload);
    }
    for (_, decl) in grouped {
        builder = builder.add_function(decl)?;
    }
    Ok(builder)
}
