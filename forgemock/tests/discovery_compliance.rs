//! Discovery-protocol compliance tests.
//!
//! These pin the wire contract clients hard-code against: area
//! enumeration order, per-area resource tables, per-GUID projections,
//! and the legacy probe paths.

use forgemock::discovery::{area_ids, resource_ids};
use forgemock::testing::{fixtures, TestRequest, TestServer};

fn body_of(server: &TestServer, request: TestRequest) -> serde_json::Value {
    let response = server.handle(&request.build());
    assert_eq!(response.status.code(), 200, "expected 200");
    response.body.expect("body")
}

#[test]
fn test_resource_areas_count_and_names_are_fixed() {
    let server = TestServer::new();
    let body = body_of(&server, TestRequest::get("/_apis/resourceareas"));

    assert_eq!(body["count"], 7);
    let names: Vec<&str> = body["value"]
        .as_array()
        .expect("value")
        .iter()
        .map(|a| a["name"].as_str().expect("name"))
        .collect();
    assert_eq!(
        names,
        vec![
            "Location",
            "build",
            "build",
            "DistributedTask",
            "Gallery",
            "ExtensionManagement",
            "wit"
        ]
    );
}

#[test]
fn test_resource_areas_are_immune_to_store_mutations() {
    let server = TestServer::new();
    let before = body_of(&server, TestRequest::get("/_apis/resourceareas"));

    // Mutate every collection, then enumerate again.
    server.handle(
        &TestRequest::post("/_apis/build/builds")
            .body(fixtures::queue_build_body(1))
            .build(),
    );
    server.handle(
        &TestRequest::post("/_apis/wit/workitems/$Bug")
            .body(serde_json::json!([fixtures::add_field_op("System.Title", "x")]))
            .build(),
    );
    server.handle(&TestRequest::delete("/_apis/gallery/publishers/acme/extensions/build-timer").build());

    let after = body_of(&server, TestRequest::get("/_apis/resourceareas"));
    assert_eq!(before, after);
}

#[test]
fn test_every_supported_area_has_a_stable_nonempty_table() {
    let server = TestServer::new();
    for area in [
        "Location",
        "build",
        "distributedtask",
        "gallery",
        "ExtensionManagement",
        "extensionmanagement",
        "wit",
    ] {
        let path = format!("/_apis/{area}");
        let first = body_of(&server, TestRequest::options(&path));
        let second = body_of(&server, TestRequest::options(&path));

        let table = first["value"].as_array().expect("table");
        assert!(!table.is_empty(), "area {area} has an empty table");
        assert_eq!(first, second, "area {area} table is not order-stable");
    }
}

#[test]
fn test_distributed_task_first_resource_id_is_documented_uuid() {
    let server = TestServer::new();
    let body = body_of(&server, TestRequest::options("/_apis/distributedtask"));
    assert_eq!(
        body["value"][0]["id"],
        "60aac929-f0cd-4bc8-9ce4-6b30e8f1b1bd"
    );
    assert_eq!(body["value"][0]["id"], resource_ids::TASKS.to_string());
}

#[test]
fn test_area_token_is_extracted_after_marker_segment() {
    let server = TestServer::new();
    // Project-scoped OPTIONS resolves the same build table.
    let body = body_of(&server, TestRequest::options("/SampleProject/_apis/build"));
    assert_eq!(body["value"][0]["resourceName"], "Builds");
}

#[test]
fn test_unknown_area_options_is_plain_cors_ok() {
    let server = TestServer::new();
    let response = server.handle(&TestRequest::options("/_apis/unknownarea").build());
    assert_eq!(response.status.code(), 200);
    assert!(response.body.is_none());
}

#[test]
fn test_by_uuid_projection_policy() {
    let server = TestServer::new();

    // build ids resolve to the full descriptor.
    for id in [area_ids::BUILD, area_ids::BUILD_LEGACY] {
        let body = body_of(
            &server,
            TestRequest::get(&format!("/_apis/resourceareas/{id}")),
        );
        assert!(body["routeTemplate"].is_string(), "{id} should be full");
    }

    // Gallery and wit resolve to the minimal projection.
    for id in [area_ids::GALLERY, area_ids::WIT] {
        let body = body_of(
            &server,
            TestRequest::get(&format!("/_apis/resourceareas/{id}")),
        );
        assert!(body["locationUrl"].is_string());
        assert!(
            body.get("routeTemplate").is_none(),
            "{id} should be minimal"
        );
    }
}

#[test]
fn test_unknown_uuid_is_not_found() {
    let server = TestServer::new();
    let response = server.handle(
        &TestRequest::get("/_apis/resourceareas/99999999-9999-9999-9999-999999999999").build(),
    );
    assert_eq!(response.status.code(), 404);
}

#[test]
fn test_legacy_enumeration_agrees_with_resourceareas() {
    let server = TestServer::new();
    let canonical = body_of(&server, TestRequest::get("/_apis/resourceareas"));
    let legacy = body_of(&server, TestRequest::get("/_apis"));
    assert_eq!(canonical["count"], legacy["count"]);
    assert_eq!(canonical["value"], legacy["value"]);
}

#[test]
fn test_connection_data_envelope() {
    let server = TestServer::new();
    let body = body_of(&server, TestRequest::get("/_apis/connectiondata"));
    assert!(body["authenticatedUser"].is_object());
    assert!(body["authorizedUser"].is_object());
    assert!(body["instanceId"].is_string());
    assert!(body["deploymentId"].is_string());
}

#[test]
fn test_health_probe() {
    let server = TestServer::new();
    let body = body_of(&server, TestRequest::get("/health").anonymous());
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}
