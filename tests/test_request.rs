use folio::http::request::{Method, Request, RequestBuilder};
use std::collections::HashMap;

#[test]
fn test_request_header_retrieval() {
    let mut headers = HashMap::new();
    headers.insert("host".to_string(), "example.com".to_string());
    headers.insert("content-type".to_string(), "application/json".to_string());

    let req = Request {
        method: Method::GET,
        uri: "/".to_string(),
        version: "HTTP/1.1".to_string(),
        headers,
        body: None,
        json: None,
    };

    assert_eq!(req.header("Host"), Some("example.com"));
    assert_eq!(req.header("content-type"), Some("application/json"));
    assert_eq!(req.header("Missing"), None);
}

#[test]
fn test_request_path_and_query() {
    let req = RequestBuilder::new()
        .method(Method::GET)
        .uri("/records?first=Mick&last=")
        .build()
        .unwrap();

    assert_eq!(req.path(), "/records");
    assert_eq!(req.query(), Some("first=Mick&last="));
}

#[test]
fn test_request_without_query() {
    let req = RequestBuilder::new()
        .method(Method::GET)
        .uri("/index.html")
        .build()
        .unwrap();

    assert_eq!(req.path(), "/index.html");
    assert_eq!(req.query(), None);
    assert!(req.query_params().is_empty());
}

#[test]
fn test_request_query_params_are_decoded() {
    let req = RequestBuilder::new()
        .method(Method::GET)
        .uri("/records?first=Mary+Ann&last=O%27Neil&number=")
        .build()
        .unwrap();

    let params = req.query_params();
    assert_eq!(params.get("first").unwrap(), "Mary Ann");
    assert_eq!(params.get("last").unwrap(), "O'Neil");
    assert_eq!(params.get("number").unwrap(), "");
}

#[test]
fn test_builder_defaults_version() {
    let req = RequestBuilder::new()
        .method(Method::POST)
        .uri("/")
        .header("Content-Length", "2")
        .build()
        .unwrap();

    assert_eq!(req.version, "HTTP/1.1");
    assert_eq!(req.headers.get("content-length").unwrap(), "2");
}

#[test]
fn test_builder_requires_method_and_uri() {
    assert!(RequestBuilder::new().uri("/").build().is_err());
    assert!(RequestBuilder::new().method(Method::GET).build().is_err());
}

#[test]
fn test_builder_json_sets_body() {
    let req = RequestBuilder::new()
        .method(Method::POST)
        .uri("/records")
        .json(serde_json::json!({"first": "Keith"}))
        .build()
        .unwrap();

    assert_eq!(req.body.unwrap(), br#"{"first":"Keith"}"#.to_vec());
    assert_eq!(req.json.unwrap()["first"], "Keith");
}

#[test]
fn test_method_round_trip() {
    assert_eq!(Method::from_str(Method::GET.as_str()), Some(Method::GET));
    assert_eq!(Method::from_str(Method::POST.as_str()), Some(Method::POST));
}
