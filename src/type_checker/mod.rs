//! Type inference module.
//!
//! This module annotates the parsed tree with types in a single bottom-up
//! pass over the module body:
//!
//! - Variables take the type of their first assignment
//! - Operators check their operands and record a result type
//! - Calls check arity and argument types against the callee's signature
//! - Function bodies must be non-empty and match a declared return type
//!
//! A function literal may call the name it is being assigned to before that
//! name has a type; the callee is given the function's own type.

pub mod type_checker;

#[cfg(test)]
mod tests;
