use super::*;

fn connection(base_url: &str) -> UpstreamConnection {
    UpstreamConnection {
        base_url: base_url.to_owned(),
        token: "secret-token".to_owned(),
    }
}

fn client(base_url: &str) -> InventoryClient {
    InventoryClient::new(&connection(base_url), 30, "invdash-test/0.1").unwrap()
}

#[test]
fn base_url_gets_single_trailing_slash() {
    assert_eq!(
        client("https://api.example.com/v2").base_url().as_str(),
        "https://api.example.com/v2/"
    );
    assert_eq!(
        client("https://api.example.com/v2///").base_url().as_str(),
        "https://api.example.com/v2/"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = InventoryClient::new(&connection("not a url"), 30, "ua").unwrap_err();
    assert!(matches!(err, UpstreamError::InvalidBaseUrl { .. }), "got {err:?}");
    assert!(!err.is_transport());
}

#[test]
fn cannot_be_a_base_url_is_rejected() {
    let err = InventoryClient::new(&connection("mailto:ops@example.com"), 30, "ua").unwrap_err();
    assert!(matches!(err, UpstreamError::InvalidBaseUrl { .. }));
}

#[test]
fn products_url_keeps_base_path_and_query() {
    let url = client("https://api.example.com/v2").products_url(&ListQuery::page(2, 50).with_search("copo"));
    assert_eq!(
        url.as_str(),
        "https://api.example.com/v2/products?limit=50&offset=50&page=2&search=copo"
    );
}

#[test]
fn product_url_encodes_id() {
    let url = client("https://api.example.com").product_url("SKU 1");
    assert_eq!(url.as_str(), "https://api.example.com/products/SKU%201");
}

#[test]
fn debug_output_omits_token() {
    let rendered = format!("{:?}", client("https://api.example.com"));
    assert!(!rendered.contains("secret-token"));
    assert!(rendered.contains("api.example.com"));
}
