//! Named schema aliases
//!
//! An alias lets one schema definition be reused across several trees,
//! including by reference from inside itself (`schema::reference`).
//! Templates are never mutated after registration.

mod registry;

pub use registry::AliasRegistry;
