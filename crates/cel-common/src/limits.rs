//! Centralized limits and thresholds for the CEL type checker.
//!
//! Centralizing these values documents the rationale for each limit and
//! keeps tuning in one place rather than scattered `const` literals.

/// Default recommended node budget, used when a caller wants
/// `max_expression_node_count` bounded but has not measured one for their
/// own workload. Mirrors the documented recommended default in the external
/// interfaces contract (`CheckerOptions::max_expression_node_count`).
pub const RECOMMENDED_MAX_EXPRESSION_NODE_COUNT: u32 = 64 * 1024;

/// Default cap on error-severity issues collected by a single `Check()`
/// call before the collector degrades remaining errors to one summary
/// issue. Mirrors `CheckerOptions::max_error_issues`'s default.
pub const DEFAULT_MAX_ERROR_ISSUES: u32 = 20;

/// Inline capacity for argument/parameter lists on a call node.
///
/// Call sites backed by `SmallVec<[Type; 4]>` avoid heap allocation for the
/// overwhelming majority of CEL function calls and operators, which take at
/// most a handful of arguments.
pub const CALL_ARGS_INLINE: usize = 4;

/// Inline capacity for an overload's free type-parameter set.
///
/// Most overloads introduce zero or one free type parameter (e.g. `T` in
/// `list(T).size()`); a small handful cover generics like `map(K, V)`.
pub const TYPE_PARAMS_INLINE: usize = 2;

/// Maximum recursion depth for type-model operations (`equals`,
/// `assignable`, `substitute`, `most_specific`).
///
/// CEL types can nest through `List`/`Map`/`Abstract` constructors; this
/// bounds the recursion so a pathologically deep declared type (not
/// reachable through the parser, but possible via a hand-built schema or
/// environment) cannot blow the stack. Exceeding this depth demotes the
/// type under consideration to `Dyn`, mirroring the cycle-demotion policy
/// used by the substitution map.
pub const MAX_TYPE_RECURSION_DEPTH: u32 = 64;
