// The cover-lookup fallback ladder against a mock volume API:
// large -> medium -> first candidate's thumbnail -> none.
use marginalia::client::CoverClient;
use mockito::{Matcher, Server};
use std::time::Duration;

fn client(server: &Server) -> CoverClient {
    // Two candidates, pacing zeroed for tests.
    CoverClient::with_base_url(server.url(), 2, Duration::ZERO)
}

async fn search_mock(server: &mut Server, body: &str) -> mockito::Mock {
    server
        .mock("GET", "/books/v1/volumes")
        .match_query(Matcher::Regex("q=".to_string()))
        .with_body(body)
        .create_async()
        .await
}

async fn volume_mock(server: &mut Server, id: &str, body: &str) -> mockito::Mock {
    server
        .mock("GET", format!("/books/v1/volumes/{}", id).as_str())
        .match_query(Matcher::Regex("fields=".to_string()))
        .with_body(body)
        .create_async()
        .await
}

#[tokio::test]
async fn test_large_image_of_first_candidate_wins() {
    let mut server = Server::new_async().await;
    let _search = search_mock(&mut server, r#"{"items":[{"id":"v1"},{"id":"v2"}]}"#).await;
    let _v1 = volume_mock(
        &mut server,
        "v1",
        r#"{"id":"v1","volumeInfo":{"imageLinks":{"large":"https://img/large.jpg"}}}"#,
    )
    .await;
    let v2 = server
        .mock("GET", "/books/v1/volumes/v2")
        .match_query(Matcher::Regex("fields=".to_string()))
        .with_body("{}")
        .expect(0)
        .create_async()
        .await;

    let cover = client(&server).find_cover("Book A", Some("Jane Doe")).await;
    assert_eq!(cover.as_deref(), Some("https://img/large.jpg"));
    // The second candidate was never consulted.
    v2.assert_async().await;
}

#[tokio::test]
async fn test_medium_image_of_second_candidate_is_next() {
    let mut server = Server::new_async().await;
    let _search = search_mock(&mut server, r#"{"items":[{"id":"v1"},{"id":"v2"}]}"#).await;
    let _v1 = volume_mock(&mut server, "v1", r#"{"id":"v1","volumeInfo":{}}"#).await;
    let _v2 = volume_mock(
        &mut server,
        "v2",
        r#"{"id":"v2","volumeInfo":{"imageLinks":{"medium":"https://img/medium.jpg"}}}"#,
    )
    .await;

    let cover = client(&server).find_cover("Book A", None).await;
    assert_eq!(cover.as_deref(), Some("https://img/medium.jpg"));
}

#[tokio::test]
async fn test_thumbnail_of_first_candidate_is_the_fallback() {
    let mut server = Server::new_async().await;
    let _search = search_mock(
        &mut server,
        r#"{"items":[
            {"id":"v1","volumeInfo":{"imageLinks":{"thumbnail":"https://img/thumb.jpg"}}},
            {"id":"v2"}
        ]}"#,
    )
    .await;
    let _v1 = volume_mock(&mut server, "v1", "{}").await;
    let _v2 = volume_mock(&mut server, "v2", "{}").await;

    let cover = client(&server).find_cover("Book A", None).await;
    assert_eq!(cover.as_deref(), Some("https://img/thumb.jpg"));
}

#[tokio::test]
async fn test_no_candidates_means_no_cover() {
    let mut server = Server::new_async().await;
    let _search = search_mock(&mut server, r#"{"items":[]}"#).await;

    assert_eq!(client(&server).find_cover("Book A", None).await, None);
}

#[tokio::test]
async fn test_search_failure_degrades_to_none() {
    let mut server = Server::new_async().await;
    let _search = server
        .mock("GET", "/books/v1/volumes")
        .match_query(Matcher::Regex("q=".to_string()))
        .with_status(500)
        .create_async()
        .await;

    assert_eq!(client(&server).find_cover("Book A", None).await, None);
}

#[tokio::test]
async fn test_candidate_detail_failure_falls_through_to_thumbnail() {
    let mut server = Server::new_async().await;
    let _search = search_mock(
        &mut server,
        r#"{"items":[{"id":"v1","volumeInfo":{"imageLinks":{"thumbnail":"https://img/t.jpg"}}}]}"#,
    )
    .await;
    let _v1 = server
        .mock("GET", "/books/v1/volumes/v1")
        .match_query(Matcher::Regex("fields=".to_string()))
        .with_status(429)
        .create_async()
        .await;

    let cover = client(&server).find_cover("Book A", None).await;
    assert_eq!(cover.as_deref(), Some("https://img/t.jpg"));
}
