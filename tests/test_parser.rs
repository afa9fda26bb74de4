use folio::http::parser::{
    MAX_BODY_BYTES, MAX_HEAD_BYTES, ParseError, body_length, parse_headers, parse_http_request,
    parse_request_line,
};
use folio::http::request::Method;

#[test]
fn test_parse_simple_get_request() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.uri, "/");
    assert_eq!(parsed.version, "HTTP/1.1");
    assert_eq!(parsed.headers.get("host").unwrap(), "example.com");
    assert!(parsed.body.is_none());
    assert!(parsed.json.is_none());
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_post_request_with_json_body() {
    let req = b"POST /records HTTP/1.1\r\nHost: localhost\r\nContent-Length: 32\r\n\r\n{\"first\":\"Mick\",\"last\":\"Jagger\"}";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.method, Method::POST);
    assert_eq!(parsed.uri, "/records");
    assert_eq!(parsed.body.as_deref(), Some(&b"{\"first\":\"Mick\",\"last\":\"Jagger\"}"[..]));
    let json = parsed.json.unwrap();
    assert_eq!(json["first"], "Mick");
    assert_eq!(json["last"], "Jagger");
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_header_names_are_lowercased_and_trimmed() {
    let req = b"GET /path HTTP/1.1\r\n  User-Agent :  test-client  \r\nACCEPT: */*\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.headers.get("user-agent").unwrap(), "test-client");
    assert_eq!(parsed.headers.get("accept").unwrap(), "*/*");
    assert!(!parsed.headers.contains_key("ACCEPT"));
}

#[test]
fn test_parse_header_value_keeps_later_colons() {
    let req = b"GET / HTTP/1.1\r\nHost: localhost:8080\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.header("Host"), Some("localhost:8080"));
}

#[test]
fn test_parse_duplicate_header_last_wins() {
    let req = b"GET / HTTP/1.1\r\nX-Tag: one\r\nx-tag: two\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.headers.get("x-tag").unwrap(), "two");
    assert_eq!(parsed.headers.len(), 1);
}

#[test]
fn test_parse_keeps_query_string_in_uri() {
    let req = b"GET /search?q=rust HTTP/1.1\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.uri, "/search?q=rust");
}

#[test]
fn test_parse_two_token_request_line() {
    let result = parse_http_request(b"GET /\r\n\r\n");

    assert!(matches!(result, Err(ParseError::MalformedRequestLine)));
}

#[test]
fn test_parse_request_line_with_double_space() {
    let result = parse_http_request(b"GET  / HTTP/1.1\r\n\r\n");

    assert!(matches!(result, Err(ParseError::MalformedRequestLine)));
}

#[test]
fn test_parse_unsupported_method() {
    for method in ["PUT", "DELETE", "HEAD", "get"] {
        let req = format!("{} / HTTP/1.1\r\n\r\n", method);
        let result = parse_http_request(req.as_bytes());
        assert_eq!(result.err(), Some(ParseError::UnsupportedMethod(method.to_string())));
    }
}

#[test]
fn test_parse_unsupported_uri() {
    let result = parse_http_request(b"GET index.html HTTP/1.1\r\n\r\n");

    assert_eq!(result.err(), Some(ParseError::UnsupportedUri("index.html".to_string())));
}

#[test]
fn test_parse_unsupported_version() {
    for version in ["HTTP/1.0", "HTTP/2", "http/1.1"] {
        let req = format!("GET / {}\r\n\r\n", version);
        let result = parse_http_request(req.as_bytes());
        assert_eq!(result.err(), Some(ParseError::UnsupportedVersion(version.to_string())));
    }
}

#[test]
fn test_parse_malformed_header() {
    let req = b"GET / HTTP/1.1\r\nBrokenHeader\r\n\r\n";
    let result = parse_http_request(req);

    assert!(matches!(result, Err(ParseError::MalformedHeader)));
}

#[test]
fn test_parse_malformed_body() {
    let req = b"POST /records HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
    let result = parse_http_request(req);

    assert!(matches!(result, Err(ParseError::MalformedBody)));
}

#[test]
fn test_parse_empty_body_is_not_json() {
    let req = b"POST /records HTTP/1.1\r\nContent-Length: 0\r\n\r\n";
    let result = parse_http_request(req);

    assert!(matches!(result, Err(ParseError::MalformedBody)));
}

#[test]
fn test_parse_invalid_content_length() {
    let req = b"POST / HTTP/1.1\r\nContent-Length: ten\r\n\r\n{}";
    let result = parse_http_request(req);

    assert!(matches!(result, Err(ParseError::InvalidContentLength)));
}

#[test]
fn test_parse_body_reads_exactly_content_length() {
    let req = b"POST / HTTP/1.1\r\nContent-Length: 2\r\n\r\n{}trailing";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.body.unwrap(), b"{}".to_vec());
    assert_eq!(consumed, req.len() - "trailing".len());
}

#[test]
fn test_parse_incomplete_request_missing_blank_line() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n";
    let result = parse_http_request(req);

    assert!(matches!(result, Err(ParseError::Incomplete)));
}

#[test]
fn test_parse_incomplete_request_partial_body() {
    let req = b"POST /api HTTP/1.1\r\nContent-Length: 10\r\n\r\n{\"a\"";
    let result = parse_http_request(req);

    assert!(matches!(result, Err(ParseError::Incomplete)));
}

#[test]
fn test_request_line_is_validated_before_headers_arrive() {
    assert_eq!(
        parse_request_line(b"BREW / HTTP/1.1\r\n", false).err(),
        Some(ParseError::UnsupportedMethod("BREW".to_string()))
    );
    assert_eq!(parse_request_line(b"GET / HT", false).err(), Some(ParseError::Incomplete));
}

#[test]
fn test_headers_stop_at_blank_line() {
    let (headers, consumed) = parse_headers(b"A: 1\r\n\r\nB: 2\r\n\r\n", false).unwrap();

    assert_eq!(headers.len(), 1);
    assert_eq!(consumed, 8);
    assert_eq!(body_length(&headers), Ok(None));
}

#[test]
fn test_oversized_request_line_is_rejected_before_it_ends() {
    let line = format!("GET /{}", "a".repeat(MAX_HEAD_BYTES));

    assert_eq!(parse_request_line(line.as_bytes(), false).err(), Some(ParseError::HeadTooLarge));
}

#[test]
fn test_oversized_header_block_is_rejected() {
    let mut block = String::new();
    while block.len() <= MAX_HEAD_BYTES {
        block.push_str("X-Filler: 0123456789012345678901234567890123456789\r\n");
    }

    assert_eq!(parse_headers(block.as_bytes(), false).err(), Some(ParseError::HeadTooLarge));

    block.push_str("\r\n");
    assert_eq!(parse_headers(block.as_bytes(), false).err(), Some(ParseError::HeadTooLarge));
}

#[test]
fn test_header_block_under_limit_is_still_incomplete() {
    let block = "X-Filler: abc\r\n".repeat(10);

    assert_eq!(parse_headers(block.as_bytes(), false).err(), Some(ParseError::Incomplete));
}

#[test]
fn test_oversized_content_length_is_rejected() {
    let req = format!(
        "POST /records HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
        MAX_BODY_BYTES + 1
    );

    assert_eq!(
        parse_http_request(req.as_bytes()).err(),
        Some(ParseError::BodyTooLarge(MAX_BODY_BYTES + 1))
    );
}

#[test]
fn test_content_length_at_limit_is_accepted() {
    let mut headers = std::collections::HashMap::new();
    headers.insert("content-length".to_string(), MAX_BODY_BYTES.to_string());

    assert_eq!(body_length(&headers), Ok(Some(MAX_BODY_BYTES)));
}
