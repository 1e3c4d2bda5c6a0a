// File: response_tests.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - ssrforge contributors

#[cfg(test)]
mod tests {
    use crate::response::{guess_status, reconstruct, sniff_mime};
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[test]
    fn test_embedded_response_parsed_directly() {
        let raw = b"HTTP/1.1 301 Moved Permanently\r\nLocation: http://10.0.0.1/\r\nContent-Type: text/html; charset=utf-8\r\n\r\n<html>moved</html>";
        let resp = reconstruct(raw);
        assert_eq!(resp.status, 301);
        assert_eq!(resp.status_line, "HTTP/1.1 301 Moved Permanently");
        assert_eq!(resp.mime, "text/html");
        assert_eq!(resp.body, b"<html>moved</html>");
        assert_eq!(
            resp.headers[0],
            ("Location".to_string(), "http://10.0.0.1/".to_string())
        );
    }

    #[test]
    fn test_embedded_response_without_content_type_is_sniffed() {
        let raw = b"HTTP/1.0 200 OK\r\nServer: internal\r\n\r\n{\"user\":\"root\"}";
        let resp = reconstruct(raw);
        assert_eq!(resp.status, 200);
        assert_eq!(resp.mime, "application/json");
    }

    #[test]
    fn test_opaque_payload_defaults_to_200() {
        let resp = reconstruct(b"just some leaked text");
        assert_eq!(resp.status, 200);
        assert_eq!(resp.status_line, "HTTP/1.1 200 OK");
        assert!(resp.headers.is_empty());
        assert_eq!(resp.body, b"just some leaked text");
    }

    #[rstest]
    #[case("Location: http://internal/admin\nsome trailing text", 302)]
    #[case("<html><title>401 Unauthorized</title></html>", 401)]
    #[case("<h1>403 Forbidden</h1>", 403)]
    #[case("Error: 404 Not Found", 404)]
    #[case("oops: 500 internal server error", 500)]
    #[case("upstream sent 502 Bad Gateway", 502)]
    #[case("nothing to see here", 200)]
    fn test_status_fingerprints(#[case] body: &str, #[case] expected: u16) {
        assert_eq!(guess_status(body), expected);
    }

    #[test]
    fn test_fingerprint_order_redirect_wins() {
        // A redirect page that also mentions 404 in its body.
        let body = "Location: /login\n<html>404 Not Found</html>";
        assert_eq!(guess_status(body), 302);
    }

    #[test]
    fn test_truncated_status_line_falls_back_to_guessing() {
        // Looks like a status line but carries no three-digit code.
        let resp = reconstruct(b"HTTP/1.1 OK\r\n\r\nhello");
        assert_eq!(resp.status, 200);
        assert!(resp.headers.is_empty());
    }

    #[rstest]
    #[case(b"%PDF-1.7 ...".as_slice(), "application/pdf")]
    #[case(b"\x89PNG\r\n\x1a\n....".as_slice(), "image/png")]
    #[case(b"GIF89a....".as_slice(), "image/gif")]
    #[case(b"\xff\xd8\xff\xe0JFIF".as_slice(), "image/jpeg")]
    #[case(b"PK\x03\x04archive".as_slice(), "application/zip")]
    #[case(b"\x1f\x8bgz".as_slice(), "application/gzip")]
    #[case(b"<?xml version=\"1.0\"?><a/>".as_slice(), "application/xml")]
    #[case(b"<!DOCTYPE html><html></html>".as_slice(), "text/html")]
    #[case(b"  <html lang=\"en\"><body/></html>".as_slice(), "text/html")]
    #[case(b"{\"key\": [1, 2]}".as_slice(), "application/json")]
    #[case(b"[1, 2, 3]".as_slice(), "application/json")]
    #[case(b"plain words\n".as_slice(), "text/plain")]
    #[case(b"\x00\x01\x02\x03".as_slice(), "application/octet-stream")]
    #[case(b"".as_slice(), "application/octet-stream")]
    fn test_sniff_mime_priority(#[case] raw: &[u8], #[case] expected: &str) {
        assert_eq!(sniff_mime(raw), expected);
    }

    #[test]
    fn test_json_shape_requires_valid_json() {
        // Brace-opening but unparseable payloads are not JSON.
        assert_eq!(sniff_mime(b"{not json at all"), "text/plain");
    }

    #[test]
    fn test_magic_bytes_beat_structure() {
        // A PDF whose body happens to contain markup.
        assert_eq!(sniff_mime(b"%PDF-1.4 <html>"), "application/pdf");
    }

    #[test]
    fn test_declared_content_type_beats_sniffing() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Type: application/pdf\r\n\r\n<html></html>";
        assert_eq!(reconstruct(raw).mime, "application/pdf");
    }

    #[test]
    fn test_reconstruct_never_fails_on_garbage() {
        let garbage: Vec<u8> = (0u8..=255).cycle().take(1024).collect();
        let resp = reconstruct(&garbage);
        assert_eq!(resp.status, 200);
        assert_eq!(resp.mime, "application/octet-stream");
        assert_eq!(resp.body, garbage);
    }

    #[test]
    fn test_binary_body_preserved_byte_for_byte() {
        // PNG magic followed by bytes that are not valid UTF-8.
        let raw = [
            0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0xff, 0xfe, 0x00, 0x01,
        ];
        let resp = reconstruct(&raw);
        assert_eq!(resp.mime, "image/png");
        assert_eq!(resp.body, raw.to_vec());
    }

    #[test]
    fn test_embedded_binary_body_preserved() {
        let mut raw = b"HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\n\r\n".to_vec();
        let payload = [0xde, 0xad, 0xbe, 0xef, 0x00, 0xff];
        raw.extend_from_slice(&payload);
        let resp = reconstruct(&raw);
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, payload.to_vec());
    }
}
