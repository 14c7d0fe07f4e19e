//! Concrete channels for `sdk::Transport`.

pub mod grpc;

pub use grpc::{ConnectOptions, GrpcTransport, connect, normalize_address};
