mod common;

use common::client;
use http_types::Method;
use lastfm_api::{
    AsyncPaginatedIterator, LastFmError, PagedQuery, PaginationStyle, Params,
};
use serde_json::{json, Value};

fn tracks_page(page: u32, total_pages: u32, total: u32, names: &[&str]) -> Value {
    json!({
        "toptracks": {
            "track": names.iter().map(|n| json!({"name": n})).collect::<Vec<_>>(),
            "@attr": {
                "page": page.to_string(),
                "totalPages": total_pages.to_string(),
                "total": total.to_string(),
            }
        }
    })
}

#[tokio::test]
async fn test_pagination_completeness() {
    let (client, log) = client(vec![
        tracks_page(1, 3, 6, &["t1", "t2"]),
        tracks_page(2, 3, 6, &["t3", "t4"]),
        tracks_page(3, 3, 6, &["t5", "t6"]),
    ]);

    let resp = client
        .paginate_request(
            Method::Get,
            PagedQuery::new("user.getTopTracks", "track").unwrap_key("toptracks"),
            Params::new().put("user", "rj"),
        )
        .await
        .unwrap();

    // Totals are known after the first request, before any further fetch
    assert_eq!(resp.items.len(), 6);
    assert_eq!(resp.items.pages(), 3);
    assert_eq!(log.lock().unwrap().len(), 1);

    let mut items = resp.items;
    let names: Vec<String> = items
        .collect_all()
        .await
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect();

    assert_eq!(names, vec!["t1", "t2", "t3", "t4", "t5", "t6"]);

    // Exactly two follow-up calls, for pages 2 and 3 in order
    let requests = log.lock().unwrap();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].param("page"), None);
    assert_eq!(requests[0].param("limit"), Some("200".to_string()));
    assert_eq!(requests[1].param("page"), Some("2".to_string()));
    assert_eq!(requests[2].param("page"), Some("3".to_string()));
}

#[tokio::test]
async fn test_envelope_keys_always_present() {
    let (client, log) = client(vec![tracks_page(1, 1, 1, &["only"])]);

    client
        .paginate_request(
            Method::Get,
            PagedQuery::new("user.getTopTracks", "track").unwrap_key("toptracks"),
            Params::new().put("user", "rj"),
        )
        .await
        .unwrap();

    let requests = log.lock().unwrap();
    assert_eq!(requests[0].param("api_key"), Some("key".to_string()));
    assert_eq!(
        requests[0].param("method"),
        Some("user.getTopTracks".to_string())
    );
    assert_eq!(requests[0].param("format"), Some("json".to_string()));
}

#[tokio::test]
async fn test_truncation_never_requests_past_limit_bound() {
    // 10 pages on the server, but limit 50 at page size 200 needs only one
    let (client, log) = client(vec![tracks_page(1, 10, 2000, &["t1", "t2"])]);

    let resp = client
        .paginate_request(
            Method::Get,
            PagedQuery::new("user.getTopTracks", "track")
                .unwrap_key("toptracks")
                .limit(Some(50)),
            Params::new().put("user", "rj"),
        )
        .await
        .unwrap();

    let mut items = resp.items;
    let collected = items.collect_all().await.unwrap();
    assert_eq!(collected.len(), 2);
    assert_eq!(log.lock().unwrap().len(), 1);

    // Reported totals reflect the server, not the truncated view
    assert_eq!(items.total_items(), Some(2000));
    assert_eq!(items.total_pages(), Some(10));
}

#[tokio::test]
async fn test_truncation_page_bound_rounds_up() {
    // limit 250 at page size 200 rounds up to 2 pages
    let (client, log) = client(vec![
        tracks_page(1, 10, 2000, &["t1", "t2"]),
        tracks_page(2, 10, 2000, &["t3", "t4"]),
    ]);

    let resp = client
        .paginate_request(
            Method::Get,
            PagedQuery::new("user.getTopTracks", "track")
                .unwrap_key("toptracks")
                .limit(Some(250)),
            Params::new().put("user", "rj"),
        )
        .await
        .unwrap();

    let mut items = resp.items;
    items.collect_all().await.unwrap();

    let requests = log.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].param("page"), Some("2".to_string()));
}

#[tokio::test]
async fn test_limit_of_at_least_total_fetches_everything() {
    let (client, log) = client(vec![
        tracks_page(1, 2, 4, &["t1", "t2"]),
        tracks_page(2, 2, 4, &["t3", "t4"]),
    ]);

    let resp = client
        .paginate_request(
            Method::Get,
            PagedQuery::new("user.getTopTracks", "track")
                .unwrap_key("toptracks")
                .limit(Some(4)),
            Params::new().put("user", "rj"),
        )
        .await
        .unwrap();

    let mut items = resp.items;
    assert_eq!(items.collect_all().await.unwrap().len(), 4);
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_missing_collection_with_zero_total() {
    // The service omits the collection key entirely for an empty result
    let (client, log) = client(vec![json!({
        "artisttracks": {"total": "0", "user": "rj"}
    })]);

    let resp = client
        .paginate_request(
            Method::Get,
            PagedQuery::new("user.getArtistTracks", "track").unwrap_key("artisttracks"),
            Params::new().put("user", "rj").put("artist", "Low"),
        )
        .await
        .unwrap();

    let mut items = resp.items;
    assert_eq!(items.len(), 0);
    assert_eq!(items.pages(), 0);
    assert_eq!(items.next().await.unwrap(), None);
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_collection_with_nonzero_total_fails_loudly() {
    let (client, _log) = client(vec![json!({
        "artisttracks": {"total": "3"}
    })]);

    let err = client
        .paginate_request(
            Method::Get,
            PagedQuery::new("user.getArtistTracks", "track").unwrap_key("artisttracks"),
            Params::new().put("user", "rj"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, LastFmError::MissingKey { .. }));
}

#[tokio::test]
async fn test_single_item_page_is_normalized() {
    // A one-result page comes back as a bare object, not a one-element list
    let (client, _log) = client(vec![
        json!({
            "toptracks": {
                "track": {"name": "lonely"},
                "@attr": {"page": "1", "totalPages": "2", "total": "2"}
            }
        }),
        json!({
            "toptracks": {
                "track": {"name": "also lonely"},
                "@attr": {"page": "2", "totalPages": "2", "total": "2"}
            }
        }),
    ]);

    let resp = client
        .paginate_request(
            Method::Get,
            PagedQuery::new("user.getTopTracks", "track").unwrap_key("toptracks"),
            Params::new().put("user", "rj"),
        )
        .await
        .unwrap();

    let mut items = resp.items;
    let collected = items.collect_all().await.unwrap();
    assert_eq!(collected.len(), 2);
    assert_eq!(collected[0]["name"], "lonely");
    assert_eq!(collected[1]["name"], "also lonely");
}

#[tokio::test]
async fn test_search_style_pagination() {
    let (client, log) = client(vec![
        json!({
            "results": {
                "opensearch:itemsPerPage": "2",
                "opensearch:startIndex": "0",
                "opensearch:totalResults": "3",
                "albummatches": {"album": [{"name": "a1"}, {"name": "a2"}]}
            }
        }),
        json!({
            "results": {
                "opensearch:itemsPerPage": "2",
                "opensearch:startIndex": "2",
                "opensearch:totalResults": "3",
                "albummatches": {"album": [{"name": "a3"}]}
            }
        }),
    ]);

    let resp = client
        .paginate_request(
            Method::Get,
            PagedQuery::new("album.search", "albummatches.album")
                .unwrap_key("results")
                .style(PaginationStyle::Search)
                .perpage(Some(2)),
            Params::new().put("album", "seamonsters"),
        )
        .await
        .unwrap();

    assert_eq!(resp.items.len(), 3);
    assert_eq!(resp.items.pages(), 2);

    let mut items = resp.items;
    let collected = items.collect_all().await.unwrap();
    assert_eq!(collected.len(), 3);
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_envelope_keeps_metadata_with_collection_nulled() {
    let (client, _log) = client(vec![tracks_page(1, 1, 2, &["t1", "t2"])]);

    let resp = client
        .paginate_request(
            Method::Get,
            PagedQuery::new("user.getTopTracks", "track").unwrap_key("toptracks"),
            Params::new().put("user", "rj"),
        )
        .await
        .unwrap();

    // Pagination attributes survive in the envelope; the collection slot
    // was moved out into the iterator.
    assert_eq!(resp.envelope["@attr"]["total"], "2");
    assert_eq!(resp.envelope["track"], Value::Null);
}

#[tokio::test]
async fn test_abandoned_iteration_requests_nothing_further() {
    let (client, log) = client(vec![tracks_page(1, 5, 10, &["t1", "t2"])]);

    let resp = client
        .paginate_request(
            Method::Get,
            PagedQuery::new("user.getTopTracks", "track").unwrap_key("toptracks"),
            Params::new().put("user", "rj"),
        )
        .await
        .unwrap();

    let mut items = resp.items;
    // Consume only the buffered first page items, then drop the iterator
    assert!(items.next().await.unwrap().is_some());
    assert!(items.next().await.unwrap().is_some());
    drop(items);

    assert_eq!(log.lock().unwrap().len(), 1);
}
