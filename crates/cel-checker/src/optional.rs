//! Optional-type plug-in (C11, §4.11): purely declarative — adds the
//! `optional_type` abstract constructor's constructors, accessors, and the
//! `_?._` / `_[?_]` indexing overloads. No new walker code paths are needed
//! beyond treating `Optional(T)` as an ordinary `Abstract` type, which the
//! core type model (§3) already does.

use crate::builder::{BuildError, Builder};
use crate::decls::{FunctionDecl, OverloadDecl};
use crate::types::{Primitive, Type, TypeParamId};

fn fresh_param() -> Type {
    Type::TypeParam(TypeParamId::fresh())
}

/// Builds every optional-plug-in overload, grouped by function name
/// (§4.11).
pub fn optional_overloads() -> Vec<(&'static str, OverloadDecl)> {
    let mut out = Vec::new();

    {
        let t = fresh_param();
        out.push((
            "optional.of",
            OverloadDecl::new("optional_of", false, vec![t.clone()], Type::optional_of(t)),
        ));
    }
    {
        let t = fresh_param();
        out.push((
            "optional.ofNonZeroValue",
            OverloadDecl::new("optional_of_non_zero_value", false, vec![t.clone()], Type::optional_of(t)),
        ));
    }
    {
        let t = fresh_param();
        out.push((
            "optional.none",
            OverloadDecl::new("optional_none", false, vec![], Type::optional_of(t)),
        ));
    }

    {
        let t = fresh_param();
        out.push((
            "hasValue",
            OverloadDecl::new(
                "optional_has_value",
                true,
                vec![Type::optional_of(t)],
                Type::Primitive(Primitive::Bool),
            ),
        ));
    }
    {
        let t = fresh_param();
        out.push((
            "value",
            OverloadDecl::new("optional_value", true, vec![Type::optional_of(t.clone())], t),
        ));
    }
    {
        let t = fresh_param();
        out.push((
            "or",
            OverloadDecl::new(
                "optional_or_optional",
                true,
                vec![Type::optional_of(t.clone()), Type::optional_of(t.clone())],
                Type::optional_of(t),
            ),
        ));
    }
    {
        let t = fresh_param();
        out.push((
            "orValue",
            OverloadDecl::new(
                "optional_or_value",
                true,
                vec![Type::optional_of(t.clone()), t.clone()],
                t,
            ),
        ));
    }

    // `_?._`: optional field select on a message or map, yielding
    // `Optional(V)` regardless of whether the field was actually set.
    {
        let v = fresh_param();
        out.push((
            "_?._",
            OverloadDecl::new(
                "optional_select_field",
                false,
                vec![Type::Dyn, Type::Primitive(Primitive::String)],
                Type::optional_of(v),
            ),
        ));
    }
    // `_[?_]`: optional index on list/map.
    {
        let t = fresh_param();
        out.push((
            "_[?_]",
            OverloadDecl::new(
                "optional_index_list",
                false,
                vec![Type::list_of(t.clone()), Type::Primitive(Primitive::Int)],
                Type::optional_of(t),
            ),
        ));
    }
    {
        let k = fresh_param();
        let v = fresh_param();
        out.push((
            "_[?_]",
            OverloadDecl::new(
                "optional_index_map",
                false,
                vec![Type::map_of(k.clone(), v.clone()), k],
                Type::optional_of(v),
            ),
        ));
    }

    out
}

/// Registers the optional-type plug-in's overloads (§4.11). Meant to be
/// passed to `Builder::add_library("optional", optional::install)`; the
/// `optMap`/`optFlatMap` rewrites are a parser-level macro concern (§4.9's
/// "macros are external to the checker") and are not declared here.
pub fn install(mut builder: Builder) -> Result<Builder, BuildError> {
    let mut grouped: rustc_hash::FxHashMap<&str, FunctionDecl> = rustc_hash::FxHashMap::default();
    for (name, overload) in optional_overloads() {
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
