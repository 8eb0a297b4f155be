//! EIP-712 typed structured data hashing.
//!
//! Only flat structures are supported: every member is an atomic type or a dynamic
//! `bytes`/`string`/`bytes32[]` value, which covers the domain and the transaction structure.

pub mod member_types;
pub mod struct_builder;
pub mod typed_structure;
