//! Router-level tests driving the full HTTP surface over the in-memory store.

#![allow(clippy::panic, clippy::indexing_slicing, missing_docs)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use roll_call::api::build_app;
use roll_call::app_state::AppState;
use roll_call::domain::InMemoryStore;
use roll_call::service::RosterService;

fn app() -> Router {
    let service = RosterService::new(Arc::new(InMemoryStore::new()), 100);
    build_app(AppState::new(service))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    };
    let Ok(request) = request else {
        panic!("invalid request for {uri}");
    };
    let Ok(response) = app.clone().oneshot(request).await;
    let status = response.status();
    let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("unreadable body for {uri}");
    };
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn list_students(app: &Router) -> Vec<Value> {
    let (status, body) = send(app, Method::GET, "/api/students", None).await;
    assert_eq!(status, StatusCode::OK);
    let Value::Array(students) = body else {
        panic!("expected array, got {body}");
    };
    students
}

fn student_by_id(students: &[Value], id: i64) -> Value {
    let Some(student) = students.iter().find(|s| s["id"] == json!(id)) else {
        panic!("student {id} missing");
    };
    student.clone()
}

#[tokio::test]
async fn health_is_reachable() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn added_student_has_defaults() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/students",
        Some(json!({"name": "Ada", "student_id": "S-001"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Student added");

    let students = list_students(&app).await;
    assert_eq!(students.len(), 1);
    let ada = student_by_id(&students, 1);
    assert_eq!(ada["name"], "Ada");
    assert_eq!(ada["student_id"], "S-001");
    assert_eq!(ada["score"], 0);
    assert_eq!(ada["selection_count"], 0);
    assert_eq!(ada["status"], "present");
}

#[tokio::test]
async fn batch_names_drop_blank_entries() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/students/batch",
        Some(json!({"names": ["A", "", "  ", "B"]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["added"], 2);

    let names: Vec<Value> = list_students(&app)
        .await
        .into_iter()
        .map(|s| s["name"].clone())
        .collect();
    assert_eq!(names, vec![json!("A"), json!("B")]);
}

#[tokio::test]
async fn batch_students_shape_is_accepted() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/students/batch",
        Some(json!({"students": [{"name": "Ada", "student_id": "1"}, {"name": " "}]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["added"], 1);
    assert_eq!(student_by_id(&list_students(&app).await, 1)["student_id"], "1");
}

#[tokio::test]
async fn null_students_key_is_not_replaced_by_names() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/students/batch",
        Some(json!({"students": null, "names": ["A"]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1002);
    assert!(list_students(&app).await.is_empty());
}

#[tokio::test]
async fn csv_import_adds_trimmed_rows_and_skips_blank_names() {
    let app = app();
    let csv = "name,student_id\n Ada , S-1\n   ,S-2\n\nGrace,\n";
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/students/import",
        Some(json!({"format": "csv", "data": csv})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["added"], 2);

    let students = list_students(&app).await;
    assert_eq!(students.len(), 2);
    let ada = student_by_id(&students, 1);
    assert_eq!(ada["name"], "Ada");
    assert_eq!(ada["student_id"], "S-1");
    assert_eq!(ada["status"], "present");
    let grace = student_by_id(&students, 2);
    assert_eq!(grace["name"], "Grace");
    assert_eq!(grace["student_id"], Value::Null);
}

#[tokio::test]
async fn import_without_valid_rows_is_rejected() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/students/import",
        Some(json!({"format": "csv", "data": "name,student_id\n  ,S-1\n"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1002);

    for payload in [
        json!({"format": "xml", "data": "name\nA"}),
        json!({"format": "json"}),
        json!({"format": "json", "data": {"name": "A"}}),
    ] {
        let (status, body) = send(&app, Method::POST, "/api/students/import", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], 1001);
    }
    assert!(list_students(&app).await.is_empty());
}

#[tokio::test]
async fn json_import_uses_student_objects() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/students/import",
        Some(json!({"data": [{"name": "Ada", "student_id": "7"}, {"name": " "}]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["added"], 1);
    assert_eq!(student_by_id(&list_students(&app).await, 1)["student_id"], "7");
}

#[tokio::test]
async fn empty_batch_is_a_client_error() {
    let app = app();
    for payload in [json!({}), json!({"names": []}), json!({"students": []})] {
        let (status, body) = send(&app, Method::POST, "/api/students/batch", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], 1002);
    }
    assert!(list_students(&app).await.is_empty());
}

#[tokio::test]
async fn score_updates_are_relative() {
    let app = app();
    send(&app, Method::POST, "/api/students", Some(json!({"name": "A"}))).await;

    for delta in [json!({"delta": 5}), json!({"delta": -2}), json!({})] {
        let (status, _) = send(&app, Method::PUT, "/api/students/1/score", Some(delta)).await;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(student_by_id(&list_students(&app).await, 1)["score"], 3);
}

#[tokio::test]
async fn delete_all_restarts_numbering() {
    let app = app();
    send(&app, Method::POST, "/api/students/batch", Some(json!({"names": ["A", "B", "C"]}))).await;

    let (status, _) = send(&app, Method::DELETE, "/api/students/all", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(list_students(&app).await.is_empty());

    send(&app, Method::POST, "/api/students", Some(json!({"name": "D"}))).await;
    let students = list_students(&app).await;
    assert_eq!(students.len(), 1);
    assert_eq!(student_by_id(&students, 1)["name"], "D");
}

#[tokio::test]
async fn missing_ids_are_silent_successes() {
    let app = app();
    let (status, _) = send(&app, Method::DELETE, "/api/students/42", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/students/42/status",
        Some(json!({"status": "absent"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) =
        send(&app, Method::PUT, "/api/students/42/score", Some(json!({"delta": 1}))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn spin_with_nobody_present_is_rejected() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/api/spin", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1003);
    assert!(body.get("id").is_none());

    send(&app, Method::POST, "/api/students", Some(json!({"name": "A"}))).await;
    send(
        &app,
        Method::PUT,
        "/api/students/1/status",
        Some(json!({"status": "absent"})),
    )
    .await;
    let (status, _) = send(&app, Method::POST, "/api/spin", Some(json!({"mode": "fair"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn spin_rejects_unknown_mode() {
    let app = app();
    send(&app, Method::POST, "/api/students", Some(json!({"name": "A"}))).await;
    let (status, body) =
        send(&app, Method::POST, "/api/spin", Some(json!({"mode": "lottery"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1004);
    assert_eq!(student_by_id(&list_students(&app).await, 1)["selection_count"], 0);
}

#[tokio::test]
async fn spin_bumps_count_and_returns_prior_snapshot() {
    let app = app();
    send(&app, Method::POST, "/api/students/batch", Some(json!({"names": ["A", "B"]}))).await;

    let (status, selected) = send(&app, Method::POST, "/api/spin", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    // The response is read before the increment is written.
    assert_eq!(selected["selection_count"], 0);

    let Some(id) = selected["id"].as_i64() else {
        panic!("spin response without id: {selected}");
    };
    assert_eq!(student_by_id(&list_students(&app).await, id)["selection_count"], 1);
}

#[tokio::test]
async fn fair_spin_skips_students_above_minimum() {
    let app = app();
    send(&app, Method::POST, "/api/students/batch", Some(json!({"names": ["A", "B", "C"]}))).await;
    // Raise C to 3 selections while A and B are absent.
    for id in [1, 2] {
        send(
            &app,
            Method::PUT,
            &format!("/api/students/{id}/status"),
            Some(json!({"status": "absent"})),
        )
        .await;
    }
    for _ in 0..3 {
        send(&app, Method::POST, "/api/spin", Some(json!({"mode": "fair"}))).await;
    }
    for id in [1, 2] {
        send(
            &app,
            Method::PUT,
            &format!("/api/students/{id}/status"),
            Some(json!({"status": "present"})),
        )
        .await;
    }

    // Counts are now [0, 0, 3]; two fair spins must hit A and B.
    let mut picked = Vec::new();
    for _ in 0..2 {
        let (status, selected) =
            send(&app, Method::POST, "/api/spin", Some(json!({"mode": "fair"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_ne!(selected["id"], 3);
        picked.push(selected["id"].clone());
    }
    picked.sort_by_key(|v| v.as_i64());
    assert_eq!(picked, vec![json!(1), json!(2)]);
}

#[tokio::test]
async fn history_round_trip() {
    let app = app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/history",
        Some(json!({"student_id": 1, "student_name": "A"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    send(
        &app,
        Method::POST,
        "/api/history",
        Some(json!({"student_id": 2, "student_name": "B", "mode": "fair", "score_delta": null})),
    )
    .await;

    let (status, history) = send(&app, Method::GET, "/api/history", None).await;
    assert_eq!(status, StatusCode::OK);
    let Value::Array(entries) = history else {
        panic!("expected array");
    };
    assert_eq!(entries.len(), 2);
    let (Some(newest), Some(oldest)) = (entries.first(), entries.get(1)) else {
        panic!("expected two entries");
    };
    assert_eq!(newest["student_name"], "B");
    assert_eq!(newest["mode"], "fair");
    assert_eq!(newest["score_delta"], Value::Null);
    assert_eq!(oldest["mode"], "random");
    assert_eq!(oldest["score_delta"], 0);

    let (status, _) = send(&app, Method::DELETE, "/api/history", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, history) = send(&app, Method::GET, "/api/history", None).await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn history_is_capped_and_newest_first() {
    let app = app();
    for i in 0..105 {
        send(
            &app,
            Method::POST,
            "/api/history",
            Some(json!({"student_id": i, "student_name": format!("S{i}")})),
        )
        .await;
    }
    for uri in ["/api/history", "/api/history?limit=1000"] {
        let (_, history) = send(&app, Method::GET, uri, None).await;
        let Value::Array(entries) = history else {
            panic!("expected array");
        };
        assert_eq!(entries.len(), 100);
        assert_eq!(entries.first().map(|e| e["student_id"].clone()), Some(json!(104)));
        let ids: Vec<i64> = entries.iter().filter_map(|e| e["id"].as_i64()).collect();
        assert!(ids.windows(2).all(|w| matches!(w, [a, b] if a > b)));
    }
    let (_, history) = send(&app, Method::GET, "/api/history?limit=3", None).await;
    assert_eq!(history.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn history_score_targets_latest_pending_entry() {
    let app = app();
    for _ in 0..2 {
        send(
            &app,
            Method::POST,
            "/api/history",
            Some(json!({"student_id": 7, "student_name": "G", "score_delta": null})),
        )
        .await;
    }
    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/history/7",
        Some(json!({"score_delta": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, history) = send(&app, Method::GET, "/api/history", None).await;
    let Value::Array(entries) = history else {
        panic!("expected array");
    };
    let deltas: Vec<Value> = entries.iter().map(|e| e["score_delta"].clone()).collect();
    assert_eq!(deltas, vec![json!(10), Value::Null]);

    // No pending entry for this student: still 200, nothing changes.
    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/history/99",
        Some(json!({"score_delta": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn edit_student_reports_missing_id() {
    let app = app();
    send(&app, Method::POST, "/api/students", Some(json!({"name": "A"}))).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/students/1",
        Some(json!({"name": "Alice", "student_id": "S-9"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["student_id"], "S-9");
    assert_eq!(body["score"], 0);

    let (status, body) =
        send(&app, Method::PUT, "/api/students/5", Some(json!({"name": "X"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 2001);
}

#[tokio::test]
async fn statistics_summarise_roster_and_history() {
    let app = app();
    send(&app, Method::POST, "/api/students/batch", Some(json!({"names": ["A", "B"]}))).await;
    send(
        &app,
        Method::PUT,
        "/api/students/2/status",
        Some(json!({"status": "absent"})),
    )
    .await;
    send(
        &app,
        Method::POST,
        "/api/history",
        Some(json!({"student_id": 1, "student_name": "A", "score_delta": null})),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/api/statistics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["students"], 2);
    assert_eq!(body["present"], 1);
    assert_eq!(body["attendance_rate"], 0.5);
    assert_eq!(body["history"]["total"], 1);
    assert_eq!(body["history"]["pending"], 1);
}

#[tokio::test]
async fn cross_origin_requests_are_allowed() {
    let app = app();
    let Ok(request) = Request::builder()
        .uri("/api/students")
        .header("origin", "http://example.com")
        .body(Body::empty())
    else {
        panic!("invalid request");
    };
    let Ok(response) = app.oneshot(request).await;
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
