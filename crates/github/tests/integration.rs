//! Integration tests for the release resolver

use gh2npm_errors::{ApiError, Error};
use gh2npm_github::GithubClient;
use gh2npm_net::NetClient;
use httpmock::prelude::*;
use serde_json::json;

fn client_for(server: &MockServer) -> GithubClient {
    let net = NetClient::with_defaults().unwrap();
    GithubClient::with_base_url(net, None, server.base_url())
}

fn release(tag: &str) -> serde_json::Value {
    json!({
        "tag_name": tag,
        "assets": [
            {
                "name": format!("tool-{tag}-linux-amd64.tar.gz"),
                "browser_download_url": format!("https://example.com/{tag}/tool.tar.gz"),
                "size": 1024
            }
        ]
    })
}

#[tokio::test]
async fn test_list_single_page() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/tool/releases")
            .query_param("per_page", "100")
            .query_param("page", "1");
        then.status(200)
            .json_body(json!([release("v1.1.0"), release("v1.0.0")]));
    });

    let releases = client_for(&server)
        .list_all_releases("acme", "tool")
        .await
        .unwrap();

    mock.assert();
    assert_eq!(releases.len(), 2);
    assert_eq!(releases[0].tag_name, "v1.1.0");
    assert_eq!(releases[0].assets.len(), 1);
    assert_eq!(releases[0].assets[0].size, 1024);
}

#[tokio::test]
async fn test_list_follows_link_header() {
    let server = MockServer::start();
    let next = format!(
        "<{}/repos/acme/tool/releases?per_page=100&page=2>; rel=\"next\"",
        server.base_url()
    );

    let first = server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/tool/releases")
            .query_param("page", "1");
        then.status(200)
            .header("link", next)
            .json_body(json!([release("v2.0.0")]));
    });
    let second = server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/tool/releases")
            .query_param("page", "2");
        then.status(200).json_body(json!([release("v1.0.0")]));
    });

    let releases = client_for(&server)
        .list_all_releases("acme", "tool")
        .await
        .unwrap();

    first.assert();
    second.assert();
    assert_eq!(releases.len(), 2);
    assert_eq!(releases[1].tag_name, "v1.0.0");
}

#[tokio::test]
async fn test_list_page_failure_discards_partial() {
    let server = MockServer::start();
    let next = format!(
        "<{}/repos/acme/tool/releases?per_page=100&page=2>; rel=\"next\"",
        server.base_url()
    );

    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/tool/releases")
            .query_param("page", "1");
        then.status(200)
            .header("link", next)
            .json_body(json!([release("v2.0.0")]));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/tool/releases")
            .query_param("page", "2");
        then.status(500);
    });

    let err = client_for(&server)
        .list_all_releases("acme", "tool")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Api(ApiError::HttpStatus { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_get_release_by_tag() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/repos/acme/tool/releases/tags/v1.2.3");
        then.status(200).json_body(release("v1.2.3"));
    });

    let release = client_for(&server)
        .get_release_by_tag("acme", "tool", "v1.2.3")
        .await
        .unwrap();

    mock.assert();
    assert_eq!(release.tag_name, "v1.2.3");
}

#[tokio::test]
async fn test_get_release_by_tag_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/repos/acme/tool/releases/tags/v9.9.9");
        then.status(404).json_body(json!({"message": "Not Found"}));
    });

    let err = client_for(&server)
        .get_release_by_tag("acme", "tool", "v9.9.9")
        .await
        .unwrap_err();

    match err {
        Error::Api(ApiError::ReleaseNotFound { owner, repo, tag }) => {
            assert_eq!(owner, "acme");
            assert_eq!(repo, "tool");
            assert_eq!(tag, "v9.9.9");
        }
        other => panic!("expected ReleaseNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_mapped() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/repos/acme/tool/releases");
        then.status(403)
            .header("x-ratelimit-remaining", "0")
            .header("retry-after", "30");
    });

    let err = client_for(&server)
        .list_all_releases("acme", "tool")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Api(ApiError::RateLimited { seconds: 30 })
    ));
}

#[tokio::test]
async fn test_token_sent_as_bearer() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/tool/releases")
            .header("authorization", "Bearer sekrit");
        then.status(200).json_body(json!([]));
    });

    let net = NetClient::with_defaults().unwrap();
    let client = GithubClient::with_base_url(net, Some("sekrit".to_string()), server.base_url());
    let releases = client.list_all_releases("acme", "tool").await.unwrap();

    mock.assert();
    assert!(releases.is_empty());
}
