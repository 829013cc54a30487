//! # Avatica RPC Transport
//!
//! This module contains the low-level building blocks for talking to an Avatica query
//! server: the HTTP seam, the `WireMessage` envelope codec, the decoding of server errors
//! and the identified client that ties them together.
pub mod client;
pub mod codec;
pub mod error_body;
pub mod service;
