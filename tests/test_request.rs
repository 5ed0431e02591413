use staticd::http::request::{Method, Request};

fn request(method: Method, path: &str) -> Request {
    Request {
        method,
        path: path.to_string(),
        version: "HTTP/1.1".to_string(),
    }
}

#[test]
fn test_normalized_path_keeps_leading_slash() {
    let req = request(Method::GET, "/docs/index.html");
    assert_eq!(req.normalized_path(), "/docs/index.html");
}

#[test]
fn test_normalized_path_adds_leading_slash() {
    let req = request(Method::GET, "docs/index.html");
    assert_eq!(req.normalized_path(), "/docs/index.html");
}

#[test]
fn test_only_get_is_supported() {
    assert!(Method::GET.is_supported());
    assert!(!Method::POST.is_supported());
    assert!(!Method::HEAD.is_supported());
    assert!(!Method::from("get").is_supported());
}

#[test]
fn test_method_display_round_trips_token() {
    assert_eq!(Method::DELETE.to_string(), "DELETE");
    assert_eq!(Method::from("PROPFIND").to_string(), "PROPFIND");
}

#[test]
fn test_method_is_case_sensitive() {
    assert_eq!(Method::from("Post"), Method::Other("Post".to_string()));
}
