//! Distributed-task definition scenarios.

use forgemock::testing::{fixtures, TestRequest, TestServer};

const SEEDED_ID: &str = "d9bafed4-0b18-4f58-968d-86655b4d2ce9";

#[test]
fn test_upload_collision_without_overwrite_leaves_definition_untouched() {
    let server = TestServer::new();
    let original = server.store().find_task(SEEDED_ID).expect("seeded");

    let response = server.handle(
        &TestRequest::put(&format!("/_apis/distributedtask/tasks/{SEEDED_ID}"))
            .body(fixtures::sample_task_body(SEEDED_ID, "Clobbered"))
            .build(),
    );
    assert_eq!(response.status.code(), 400);

    let after = server.store().find_task(SEEDED_ID).expect("still present");
    assert_eq!(after.name, original.name);
    assert_eq!(after.friendly_name, original.friendly_name);
    assert_eq!(after.version, original.version);
}

#[test]
fn test_upload_success_is_no_content_without_body() {
    let server = TestServer::new();
    let response = server.handle(
        &TestRequest::put("/_apis/distributedtask/tasks/fresh-task")
            .query("overwrite", "true")
            .body(fixtures::sample_task_body("fresh-task", "Fresh"))
            .build(),
    );
    assert_eq!(response.status.code(), 204);
    assert!(response.body.is_none());
    assert!(server.store().task_exists("fresh-task"));
}

#[test]
fn test_point_lookup_always_answers_an_array() {
    let server = TestServer::new();

    let hit = server
        .handle(&TestRequest::get(&format!("/_apis/distributedtask/tasks/{SEEDED_ID}")).build())
        .body
        .expect("body");
    assert_eq!(hit["count"], 1);
    assert!(hit["value"].is_array());

    let miss = server
        .handle(&TestRequest::get("/_apis/distributedtask/tasks/absent").build())
        .body
        .expect("body");
    assert_eq!(miss["count"], 0);
    assert_eq!(miss["value"], serde_json::json!([]));
}

#[test]
fn test_delete_then_list_shrinks_by_one() {
    let server = TestServer::new();
    let response = server
        .handle(&TestRequest::delete(&format!("/_apis/distributedtask/tasks/{SEEDED_ID}")).build());
    assert_eq!(response.status.code(), 204);

    let body = server
        .handle(&TestRequest::get("/_apis/distributedtask/tasks").build())
        .body
        .expect("body");
    assert_eq!(body["count"], 1);
}
