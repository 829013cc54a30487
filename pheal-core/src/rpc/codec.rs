//! # WireMessage Codec
//!
//! Every Avatica message crosses the wire wrapped in a `WireMessage`:
//!
//! ```text
//! WireMessage {
//!     name: "org.apache.calcite.avatica.proto.Requests$PrepareAndExecuteRequest",
//!     wrapped_message: <PrepareAndExecuteRequest bytes>,
//! }
//! ```
//!
//! The server answers with the same envelope. The name of the response is derived from
//! the request name by replacing `Request` with `Response`, except for the few requests
//! that are answered by a differently named message (`PrepareAndExecuteRequest` is
//! answered by an `ExecuteResponse`), where callers pass the expected name explicitly.
use avatica_proto::{AvaticaMessage, RESPONSES_PREFIX, WireMessage};
use bytes::Bytes;
use prost::Message;

/// Wraps `request` into an encoded `WireMessage`.
pub fn encode_request<M: AvaticaMessage>(request: &M) -> Bytes {
    WireMessage {
        name: M::wire_name(),
        wrapped_message: request.encode_to_vec(),
    }
    .encode_to_vec()
    .into()
}

/// Decodes a response body into its envelope.
pub fn decode_envelope(body: &[u8]) -> Result<WireMessage, prost::DecodeError> {
    WireMessage::decode(body)
}

/// Fully-qualified name of the response expected for a request named `request_name`.
///
/// `expected` bypasses the `Request` -> `Response` derivation entirely.
pub fn expected_response_name(request_name: &str, expected: Option<&str>) -> String {
    let short_name = match expected {
        Some(name) => name.to_string(),
        None => request_name.replace("Request", "Response"),
    };

    format!("{RESPONSES_PREFIX}{short_name}")
}

#[cfg(test)]
mod test {
    use super::*;
    use avatica_proto::{CreateStatementRequest, PrepareAndExecuteRequest};

    #[test]
    fn response_name_is_derived_from_request_name() {
        assert_eq!(
            expected_response_name(CreateStatementRequest::NAME, None),
            "org.apache.calcite.avatica.proto.Responses$CreateStatementResponse"
        );
    }

    #[test]
    fn explicit_response_name_bypasses_derivation() {
        assert_eq!(
            expected_response_name(PrepareAndExecuteRequest::NAME, Some("ExecuteResponse")),
            "org.apache.calcite.avatica.proto.Responses$ExecuteResponse"
        );
        // The override is taken verbatim, even when it contains "Request".
        assert_eq!(
            expected_response_name("FooRequest", Some("BarRequest")),
            "org.apache.calcite.avatica.proto.Responses$BarRequest"
        );
    }

    #[test]
    fn request_envelope_carries_wire_name() {
        let request = CreateStatementRequest {
            connection_id: "conn".to_string(),
        };

        let envelope = decode_envelope(&encode_request(&request)).unwrap();

        assert_eq!(
            envelope.name,
            "org.apache.calcite.avatica.proto.Requests$CreateStatementRequest"
        );
        assert_eq!(
            CreateStatementRequest::decode(envelope.wrapped_message.as_slice()).unwrap(),
            request
        );
    }
}
