//! Gallery extension scenarios, self-heal fixture included.

use std::time::Duration;

use forgemock::store::{SELF_HEAL_EXTENSION_ID, SELF_HEAL_PUBLISHER};
use forgemock::testing::{TestRequest, TestServer};
use serde_json::json;

fn fixture_path() -> String {
    format!("/_apis/gallery/publishers/{SELF_HEAL_PUBLISHER}/extensions/{SELF_HEAL_EXTENSION_ID}")
}

fn listed_ids(server: &TestServer) -> Vec<String> {
    let body = server
        .handle(&TestRequest::get("/_apis/gallery/extensions").build())
        .body
        .expect("body");
    body["results"][0]["extensions"]
        .as_array()
        .expect("extensions")
        .iter()
        .map(|e| {
            format!(
                "{}/{}",
                e["publisher"]["publisherName"].as_str().expect("publisher"),
                e["extensionId"].as_str().expect("id")
            )
        })
        .collect()
}

#[tokio::test]
async fn test_self_heal_fixture_reappears_after_delay() {
    let server = TestServer::with_self_heal_delay(Duration::from_millis(20));

    let response = server.handle(&TestRequest::delete(&fixture_path()).build());
    assert_eq!(response.status.code(), 204);
    assert!(!listed_ids(&server)
        .contains(&format!("{SELF_HEAL_PUBLISHER}/{SELF_HEAL_EXTENSION_ID}")));

    tokio::time::sleep(Duration::from_millis(120)).await;

    assert!(
        listed_ids(&server).contains(&format!("{SELF_HEAL_PUBLISHER}/{SELF_HEAL_EXTENSION_ID}")),
        "fixture should be re-provisioned with identical publisher/id"
    );
}

#[tokio::test]
async fn test_only_the_fixture_identity_self_heals() {
    let server = TestServer::with_self_heal_delay(Duration::from_millis(20));

    server.handle(&TestRequest::delete("/_apis/gallery/publishers/acme/extensions/build-timer").build());
    tokio::time::sleep(Duration::from_millis(120)).await;

    assert!(!listed_ids(&server).contains(&"acme/build-timer".to_string()));
}

#[test]
fn test_install_is_idempotent_against_seeded_extension() {
    let server = TestServer::new();
    let path = "/_apis/extensionmanagement/installedextensionsbyname/acme/build-timer";

    let first = server.handle(&TestRequest::post(path).build());
    assert_eq!(first.status.code(), 200);
    assert_eq!(server.store().extensions().len(), 3);
}

#[test]
fn test_search_and_pagination() {
    let server = TestServer::new();
    let body = server
        .handle(
            &TestRequest::get("/_apis/gallery/extensions")
                .query("searchText", "release")
                .build(),
        )
        .body
        .expect("body");
    let extensions = body["results"][0]["extensions"].as_array().expect("array");
    assert_eq!(extensions.len(), 1);
    assert_eq!(extensions[0]["extensionId"], "release-notes");

    let paged = server
        .handle(
            &TestRequest::get("/_apis/gallery/extensions")
                .query("skip", "2")
                .query("take", "5")
                .build(),
        )
        .body
        .expect("body");
    assert_eq!(
        paged["results"][0]["extensions"]
            .as_array()
            .expect("array")
            .len(),
        1
    );
}

#[test]
fn test_update_merges_versions_newest_first() {
    let server = TestServer::new();
    server.handle(
        &TestRequest::put("/_apis/gallery/publishers/acme/extensions/build-timer")
            .body(json!({ "version": "2.1.0" }))
            .build(),
    );

    let ext = server
        .store()
        .find_extension("acme", "build-timer")
        .expect("present");
    assert_eq!(ext.versions[0].version, "2.1.0");
    assert_eq!(ext.versions[1].version, "2.0.1");
}

#[test]
fn test_share_unshare_validate_do_not_mutate() {
    let server = TestServer::new();
    let census = server.store().extensions().len();
    for op in ["share", "unshare", "validate"] {
        let response = server.handle(
            &TestRequest::post(&format!(
                "/_apis/gallery/publishers/contoso/extensions/release-notes/{op}"
            ))
            .build(),
        );
        assert_eq!(response.status.code(), 200);
    }
    assert_eq!(server.store().extensions().len(), census);
}
