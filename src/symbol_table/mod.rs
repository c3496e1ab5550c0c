//! Per-function symbol tables.
//!
//! A fixed number of buckets with separate chaining. Entries remember the
//! order they were inserted in and carry a type slot the type checker fills.

pub mod symbol_table;
