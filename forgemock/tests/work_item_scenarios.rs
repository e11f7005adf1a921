//! Work-item field-merge scenarios.

use forgemock::testing::{fixtures, TestRequest, TestServer};
use serde_json::json;

#[test]
fn test_two_disjoint_updates_union_without_field_loss() {
    let server = TestServer::new();

    server.handle(
        &TestRequest::patch("/_apis/wit/workitems/1")
            .body(json!([fixtures::add_field_op("Custom.Alpha", "a")]))
            .build(),
    );
    let body = server
        .handle(
            &TestRequest::patch("/_apis/wit/workitems/1")
                .body(json!([fixtures::add_field_op("Custom.Beta", "b")]))
                .build(),
        )
        .body
        .expect("body");

    let fields = &body["fields"];
    assert_eq!(fields["Custom.Alpha"], "a");
    assert_eq!(fields["Custom.Beta"], "b");
    // Seeded fields survive both updates.
    assert_eq!(fields["System.WorkItemType"], "Bug");
    assert_eq!(fields["System.Title"], "Sample bug");
}

#[test]
fn test_create_assigns_sequential_ids() {
    let server = TestServer::new();
    let first = server
        .handle(
            &TestRequest::post("/_apis/wit/workitems/$Task")
                .body(json!([fixtures::add_field_op("System.Title", "one")]))
                .build(),
        )
        .body
        .expect("body");
    let second = server
        .handle(
            &TestRequest::post("/_apis/wit/workitems/$Task")
                .body(json!([fixtures::add_field_op("System.Title", "two")]))
                .build(),
        )
        .body
        .expect("body");

    assert_eq!(first["id"], 3);
    assert_eq!(second["id"], 4);
    assert_eq!(first["fields"]["System.State"], "New");
}

#[test]
fn test_update_of_missing_item_is_not_found() {
    let server = TestServer::new();
    let response = server.handle(
        &TestRequest::patch("/_apis/wit/workitems/500")
            .body(json!([fixtures::add_field_op("System.Title", "x")]))
            .build(),
    );
    assert_eq!(response.status.code(), 404);
}

#[test]
fn test_query_envelope_is_bounded_and_fixed_shape() {
    let server = TestServer::new();
    for i in 0..7 {
        server.handle(
            &TestRequest::post("/_apis/wit/workitems/$Task")
                .body(json!([fixtures::add_field_op(
                    "System.Title",
                    &format!("item {i}")
                )]))
                .build(),
        );
    }

    let body = server
        .handle(
            &TestRequest::post("/_apis/wit/wiql")
                .body(json!({ "query": "Select [System.Id] From WorkItems" }))
                .build(),
        )
        .body
        .expect("body");

    assert_eq!(body["queryType"], "flat");
    assert_eq!(body["queryResultType"], "workItem");
    assert_eq!(body["workItems"].as_array().expect("items").len(), 5);
}
