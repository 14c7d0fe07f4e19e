//! Wire types for the dialog service.
//!
//! `pb` holds the protobuf messages and the generated gRPC client. `models`
//! holds the typed domain values the SDK works with.

pub mod models;
pub mod pb;
