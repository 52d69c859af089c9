//! Router tests driven through `tower::ServiceExt::oneshot`

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for oneshot
use wayfind_graph::{Graph, MapDocument};
use wayfind_serve::{build_router, AppState};

const CAMPUS: &str = r#"{
    "nodes": [
        {"id": "R-1-101", "name": "Room 101", "type": "room", "floor": 1, "x": 100, "y": 100},
        {"id": "H-1-1", "name": "Hallway", "type": "hallway", "floor": 1, "x": 200, "y": 100},
        {"id": "S-1-W", "name": "Stairs", "type": "stairs", "floor": 1, "x": 300, "y": 100},
        {"id": "S-2-W", "name": "Stairs", "type": "stairs", "floor": 2, "x": 300, "y": 100},
        {"id": "H-2-1", "name": "Hallway", "type": "hallway", "floor": 2, "x": 200, "y": 100},
        {"id": "R-2-201", "name": "Room 201", "type": "room", "floor": 2, "x": 100, "y": 100}
    ],
    "edges": [
        {"source": "R-1-101", "target": "H-1-1"},
        {"source": "H-1-1", "target": "S-1-W"},
        {"source": "S-1-W", "target": "S-2-W"},
        {"source": "S-2-W", "target": "H-2-1"},
        {"source": "H-2-1", "target": "R-2-201"}
    ],
    "floorLabels": {"1": "Ground"}
}"#;

fn campus_state() -> Arc<AppState> {
    let graph = Graph::from_document(MapDocument::from_json_str(CAMPUS).unwrap()).unwrap();
    Arc::new(AppState::new(graph, None))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 20).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_path_wire_contract() {
    let app = build_router(campus_state());

    let (status, body) = send(
        &app,
        "POST",
        "/path",
        Some(json!({"start": "R-1-101", "end": "R-2-201", "role": "student"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"path": ["R-1-101", "H-1-1", "S-1-W", "S-2-W", "H-2-1", "R-2-201"]})
    );

    for role in ["pwd-student", "visitor"] {
        let (status, body) = send(
            &app,
            "POST",
            "/path",
            Some(json!({"start": "R-1-101", "end": "R-2-201", "role": role})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"path": null}), "{role}");
    }

    let (status, body) = send(
        &app,
        "POST",
        "/path",
        Some(json!({"start": "R-1-101", "end": "nowhere", "role": "admin"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"path": null}));

    let (status, body) = send(
        &app,
        "POST",
        "/path",
        Some(json!({"start": "R-1-101", "end": "R-1-101", "role": "admin"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Start and end cannot be the same");
}

#[tokio::test]
async fn test_route_plan() {
    let app = build_router(campus_state());

    let (status, body) = send(
        &app,
        "POST",
        "/route",
        Some(json!({"start": "R-1-101", "end": "R-2-201", "role": "student"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cost"], 10 + 15 + 15 + 15 + 10);
    assert_eq!(body["segments"].as_array().unwrap().len(), 2);
    assert_eq!(body["segments"][1]["floor"], 2);
    assert_eq!(body["instructions"][0]["fromName"], "Room 101");

    let (status, body) = send(
        &app,
        "POST",
        "/route",
        Some(json!({"start": "R-1-101", "end": "R-2-201", "role": "pwd-student"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No path found. The route may be restricted.");

    let (status, _) = send(
        &app,
        "POST",
        "/route",
        Some(json!({"start": "R-1-101", "end": "H-2-1", "role": "student"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_editing_bumps_version_and_changes_routes() {
    let app = build_router(campus_state());

    let (_, before) = send(&app, "GET", "/version", None).await;

    // Wheelchair-friendly elevator pair next to the stairs
    for (id, floor) in [("E-1-Pub", 1), ("E-2-Pub", 2)] {
        let (status, node) = send(
            &app,
            "POST",
            "/nodes",
            Some(json!({"id": id, "type": "elevator", "floor": floor, "x": 300, "y": 200})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(node["name"], "Elevator");
    }
    let (status, _) = send(
        &app,
        "POST",
        "/edges",
        Some(json!({"source": "E-1-Pub", "target": "E-2-Pub"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, after) = send(&app, "GET", "/version", None).await;
    assert!(after["lastUpdated"].as_u64() > before["lastUpdated"].as_u64());

    // E-2-Pub auto-linked to S-2-W, its nearest neighbor; link it to the hallway too
    let (status, _) = send(
        &app,
        "POST",
        "/edges",
        Some(json!({"source": "E-2-Pub", "target": "H-2-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(
        &app,
        "POST",
        "/edges",
        Some(json!({"source": "E-1-Pub", "target": "H-1-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(
        &app,
        "POST",
        "/path",
        Some(json!({"start": "R-1-101", "end": "R-2-201", "role": "pwd-student"})),
    )
    .await;
    assert_eq!(
        body["path"],
        json!(["R-1-101", "H-1-1", "E-1-Pub", "E-2-Pub", "H-2-1", "R-2-201"])
    );

    // Cross-floor link between non-matching connectors is refused
    let (status, _) = send(
        &app,
        "POST",
        "/edges",
        Some(json!({"source": "S-1-W", "target": "E-2-Pub"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_node_update_and_delete() {
    let app = build_router(campus_state());

    let (status, node) = send(
        &app,
        "PATCH",
        "/nodes/R-1-101",
        Some(json!({"name": "Library", "x": 120})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!((node["name"].as_str(), node["x"].as_i64()), (Some("Library"), Some(120)));

    let (status, _) = send(&app, "PATCH", "/nodes/H-1-1", Some(json!({"name": "Corridor"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", "/nodes/H-1-1", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", "/nodes/H-1-1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(
        &app,
        "POST",
        "/path",
        Some(json!({"start": "R-1-101", "end": "R-2-201", "role": "admin"})),
    )
    .await;
    assert_eq!(body, json!({"path": null}));
}

#[tokio::test]
async fn test_floors_and_labels() {
    let app = build_router(campus_state());

    let (status, body) = send(&app, "POST", "/floors", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["floor"], 3);

    let (status, body) = send(&app, "PUT", "/floors/3/label", Some(json!({"label": "Roof"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"floor": 3, "label": "Roof"}));

    let (_, floors) = send(&app, "GET", "/floors", None).await;
    assert_eq!(
        floors,
        json!([
            {"floor": 1, "label": "Ground"},
            {"floor": 2, "label": "Floor 2"},
            {"floor": 3, "label": "Roof"}
        ])
    );

    let (_, rooms) = send(&app, "GET", "/rooms", None).await;
    assert_eq!(rooms[0]["floorLabel"], "Ground");
    assert_eq!(rooms[1]["id"], "R-2-201");

    let (status, body) = send(&app, "DELETE", "/floors/3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], 1);

    let (status, _) = send(&app, "DELETE", "/floors/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_map_replace_is_all_or_nothing() {
    let app = build_router(campus_state());

    let bad = json!({
        "nodes": [{"id": "X-1", "type": "room", "floor": 1, "x": 0}],
        "edges": []
    });
    let (status, body) = send(&app, "PUT", "/map", Some(bad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("'y'"));

    let (_, map) = send(&app, "GET", "/map", None).await;
    assert_eq!(map["nodes"].as_array().unwrap().len(), 6);
    assert_eq!(map["floorLabels"]["1"], "Ground");

    let good = json!({
        "nodes": [
            {"id": "A", "type": "room", "floor": 1, "x": 0, "y": 0},
            {"id": "B", "type": "room", "floor": 1, "x": "30", "y": 40.2}
        ],
        "edges": [{"source": "A", "target": "B"}, {"source": "B", "target": "gone"}]
    });
    let (status, body) = send(&app, "PUT", "/map", Some(good)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["report"]["nodeCount"], 2);
    assert_eq!(body["report"]["danglingEdges"].as_array().unwrap().len(), 1);

    let (_, body) = send(
        &app,
        "POST",
        "/route",
        Some(json!({"start": "A", "end": "B", "role": "student"})),
    )
    .await;
    assert_eq!(body["cost"], 5);
}

#[tokio::test]
async fn test_refresh_reads_the_map_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("campus.json");
    std::fs::write(&path, CAMPUS).unwrap();
    let app = build_router(Arc::new(AppState::load(&path).unwrap()));

    std::fs::write(&path, r#"{"nodes": [], "edges": []}"#).unwrap();
    let (status, body) = send(&app, "POST", "/refresh", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["report"]["nodeCount"], 0);

    let no_file = build_router(campus_state());
    let (status, _) = send(&no_file, "POST", "/refresh", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_health_and_docs() {
    let app = build_router(campus_state());

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["nodes"], 6);

    let (status, spec) = send(&app, "GET", "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(spec["paths"]["/path"].is_object());
    assert!(spec["paths"]["/nodes/{id}"].is_object());
}
