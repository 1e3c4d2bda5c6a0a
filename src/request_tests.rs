// File: request_tests.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - ssrforge contributors

#[cfg(test)]
mod tests {
    use crate::error::SsrfError;
    use crate::request::{ClientRequest, RequestOverrides};
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[test]
    fn test_parse_origin_form_request() {
        let raw = "GET /admin?debug=1 HTTP/1.1\r\nHost: 10.0.0.5:8080\r\nAccept: */*\r\n\r\n";
        let req = ClientRequest::parse(raw).unwrap();
        assert_eq!(req.method, "GET");
        assert_eq!(req.url, "http://10.0.0.5:8080/admin?debug=1");
        assert_eq!(req.headers, vec![("Accept".to_string(), "*/*".to_string())]);
        assert_eq!(req.body, None);
    }

    #[test]
    fn test_parse_absolute_form_request() {
        let raw = "GET http://169.254.169.254/latest/meta-data/ HTTP/1.1\r\nHost: proxy\r\n\r\n";
        let req = ClientRequest::parse(raw).unwrap();
        assert_eq!(req.url, "http://169.254.169.254/latest/meta-data/");
    }

    #[test]
    fn test_parse_body_and_duplicate_headers() {
        let raw = "POST / HTTP/1.1\r\nHost: h\r\nX-Tag: one\r\nX-Tag: two\r\n\r\na=1&b=2";
        let req = ClientRequest::parse(raw).unwrap();
        assert_eq!(req.body.as_deref(), Some(b"a=1&b=2".as_slice()));
        // Order and duplicates survive.
        assert_eq!(
            req.headers,
            vec![
                ("X-Tag".to_string(), "one".to_string()),
                ("X-Tag".to_string(), "two".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_cookies_split_out() {
        let raw = "GET / HTTP/1.1\r\nHost: h\r\nCookie: a=1; b=2\r\nCookie: c=3\r\n\r\n";
        let req = ClientRequest::parse(raw).unwrap();
        assert_eq!(req.cookies, vec!["a=1", "b=2", "c=3"]);
        assert!(req.headers.is_empty());
    }

    #[test]
    fn test_lf_only_framing_accepted() {
        let req = ClientRequest::parse("GET / HTTP/1.1\nHost: h\n\n").unwrap();
        assert_eq!(req.url, "http://h/");
    }

    #[rstest]
    #[case("")]
    #[case("GET / HTTP/1.1\r\nHost: h")] // no blank line
    #[case("GET / HTTP/1.1\n\n")] // origin-form without Host
    #[case("GET /\n\n")] // no version
    #[case("GET  HTTP/1.1\n\n")] // no target
    #[case("GET / NOTHTTP\nHost: h\n\n")]
    #[case("qwertzui / HTTP/1.1\nHost: h\n\n")] // illegal method token
    #[case("GET / HTTP/1.1\nno-colon-header\n\n")]
    fn test_malformed_raw_request_rejected(#[case] raw: &str) {
        let err = ClientRequest::parse(raw).unwrap_err();
        assert!(
            matches!(err, SsrfError::InvalidClientRequest(_)),
            "{:?} for {:?}",
            err,
            raw
        );
    }

    #[test]
    fn test_from_uri() {
        let req = ClientRequest::from_uri(
            "http://192.168.0.1/",
            RequestOverrides {
                method: Some("post".to_string()),
                headers: vec![("X-One".to_string(), "1".to_string())],
                cookies: Some("s=abc; t=def".to_string()),
                body: Some(b"payload".to_vec()),
            },
        )
        .unwrap();
        assert_eq!(req.method, "POST");
        assert_eq!(req.url, "http://192.168.0.1/");
        assert_eq!(req.cookies, vec!["s=abc", "t=def"]);
        assert_eq!(req.body.as_deref(), Some(b"payload".as_slice()));
    }

    #[rstest]
    #[case("")]
    #[case("not a url")]
    #[case("ftp://127.0.0.1/")]
    #[case("http://")]
    fn test_from_uri_bad_target_rejected(#[case] target: &str) {
        let err = ClientRequest::from_uri(target, RequestOverrides::default()).unwrap_err();
        assert!(matches!(err, SsrfError::InvalidClientRequest(_)));
    }
}
