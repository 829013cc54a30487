//! # Error Bodies
//!
//! When a query server answers with a non-success status the body is either:
//!
//! 1. A Jetty HTML error page (the server blew up before reaching Avatica's handler), or
//! 2. A `WireMessage` wrapping an Avatica `ErrorResponse`.
//!
//! Both decoders return `None` when the body does not look like what they expect; the
//! caller then reports the bare HTTP status.
//!
//! Server messages usually embed the vendor error, e.g.
//! `ERROR 504 (42703): Undefined column. columnName=FOO -> ...`. When that pattern is found
//! its code, SQL state and text replace the ones from the envelope.
use crate::error::{DatabaseError, Error, InterfaceError};
use avatica_proto::{AvaticaMessage, ErrorResponse, WireMessage};
use http::StatusCode;
use prost::Message;
use regex::Regex;
use std::sync::LazyLock;

const HTML_MARKER: &[u8] = b"<html>";
const JETTY_500_TITLE: &str = "HTTP ERROR: 500";
const JETTY_SQL_STATE: &str = "XX000";

static EMBEDDED_SQL_ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:([^ ]+): )?ERROR (\d+) \(([0-9A-Z]{5})\): (.*?) ->")
        .expect("valid embedded sql error regex")
});

static PAGE_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<body>.*?<h2>(.*?)</h2>").expect("valid page title regex")
});

static PAGE_MESSAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<pre>(.*?)</pre>").expect("valid page message regex"));

/// Turns the body of a non-success response into the error reported to the caller.
pub fn decode_error_body(status: StatusCode, body: &[u8]) -> Error {
    let decoded = if contains(body, HTML_MARKER) {
        parse_error_page(&String::from_utf8_lossy(body))
    } else {
        parse_error_protobuf(body)
    };

    match decoded {
        Some(err) => Error::Database(err.with_http_status(status)),
        None => Error::Interface(InterfaceError::InvalidStatus(status)),
    }
}

/// Decodes a Jetty `HTTP ERROR: 500` page.
pub fn parse_error_page(html: &str) -> Option<DatabaseError> {
    let title = PAGE_TITLE.captures(html)?.get(1)?.as_str().trim();
    if title != JETTY_500_TITLE {
        return None;
    }

    let message = PAGE_MESSAGE
        .captures_iter(html)
        .filter_map(|captures| captures.get(1))
        .map(|m| m.as_str().trim())
        .collect::<Vec<_>>()
        .join(" ");
    let message = message.trim();

    Some(parse_embedded_sql_error(message).unwrap_or_else(|| {
        DatabaseError::new(message, Some(500), Some(JETTY_SQL_STATE.to_string()))
    }))
}

/// Decodes a `WireMessage` wrapping an `ErrorResponse`.
pub fn parse_error_protobuf(body: &[u8]) -> Option<DatabaseError> {
    let envelope = WireMessage::decode(body).ok()?;
    if envelope.name != ErrorResponse::wire_name() {
        return None;
    }
    let err = ErrorResponse::decode(envelope.wrapped_message.as_slice()).ok()?;

    if let Some(embedded) = parse_embedded_sql_error(&err.error_message) {
        return Some(embedded);
    }

    let sql_state = (!err.sql_state.is_empty()).then_some(err.sql_state);
    Some(DatabaseError::new(
        err.error_message,
        Some(err.error_code),
        sql_state,
    ))
}

fn parse_embedded_sql_error(message: &str) -> Option<DatabaseError> {
    let captures = EMBEDDED_SQL_ERROR.captures(message)?;
    let code = captures[2].parse().ok();
    let sql_state = captures[3].to_string();

    Some(DatabaseError::new(&captures[4], code, Some(sql_state)))
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::DatabaseErrorKind;

    fn error_envelope(err: ErrorResponse) -> Vec<u8> {
        WireMessage {
            name: ErrorResponse::wire_name(),
            wrapped_message: err.encode_to_vec(),
        }
        .encode_to_vec()
    }

    #[test]
    fn protobuf_error_keeps_code_and_state() {
        let body = error_envelope(ErrorResponse {
            error_message: "Table undefined. tableName=T".to_string(),
            error_code: 1012,
            sql_state: "42M03".to_string(),
            ..Default::default()
        });

        let err = parse_error_protobuf(&body).unwrap();

        assert_eq!(err.kind, DatabaseErrorKind::Programming);
        assert_eq!(err.code, Some(1012));
        assert_eq!(err.sql_state.as_deref(), Some("42M03"));
        assert_eq!(err.message, "Table undefined. tableName=T");
    }

    #[test]
    fn embedded_error_refines_protobuf_error() {
        let body = error_envelope(ErrorResponse {
            error_message: "org.apache.phoenix.schema.ColumnNotFoundException: ERROR 504 (42703): Undefined column. columnName=FOO -> ColumnNotFoundException".to_string(),
            error_code: 0,
            sql_state: "00000".to_string(),
            ..Default::default()
        });

        let err = parse_error_protobuf(&body).unwrap();

        assert_eq!(err.kind, DatabaseErrorKind::Programming);
        assert_eq!(err.code, Some(504));
        assert_eq!(err.sql_state.as_deref(), Some("42703"));
        assert_eq!(err.message, "Undefined column. columnName=FOO");
    }

    #[test]
    fn garbage_is_not_a_protobuf_error() {
        assert!(parse_error_protobuf(&[0xff, 0xff, 0xff]).is_none());
        // An empty body decodes to an empty envelope, which is not an ErrorResponse.
        assert!(parse_error_protobuf(&[]).is_none());
    }

    #[test]
    fn jetty_page_is_decoded() {
        let html = "<html><head><title>Error 500</title></head><body><h2>HTTP ERROR: 500</h2>\
                    <p>Problem accessing /. Reason:\n<pre>    java.lang.RuntimeException: boom</pre></p></body></html>";

        let err = parse_error_page(html).unwrap();

        assert_eq!(err.kind, DatabaseErrorKind::Internal);
        assert_eq!(err.code, Some(500));
        assert_eq!(err.sql_state.as_deref(), Some("XX000"));
        assert_eq!(err.message, "java.lang.RuntimeException: boom");
    }

    #[test]
    fn other_pages_are_not_decoded() {
        let html = "<html><body><h2>HTTP ERROR: 404</h2><p><pre>Not Found</pre></p></body></html>";

        assert!(parse_error_page(html).is_none());
        assert!(matches!(
            decode_error_body(StatusCode::NOT_FOUND, html.as_bytes()),
            Error::Interface(InterfaceError::InvalidStatus(status)) if status == StatusCode::NOT_FOUND
        ));
    }
}
