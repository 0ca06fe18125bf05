//! Generated protobuf types.

#![allow(clippy::all, clippy::pedantic)]

/// User directory messages and service stubs.
pub mod user {
    tonic::include_proto!("userdir.user.v1");
}

/// Standard gRPC health checking protocol.
pub mod health {
    tonic::include_proto!("grpc.health.v1");
}
