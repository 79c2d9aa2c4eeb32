use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use std::process::Command;
use std::sync::{Arc, Mutex};

fn spawn_server(app: Router) -> (String, tokio::runtime::Runtime) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let url = runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}")
    });
    (url, runtime)
}

fn seeded_store() -> Arc<Mutex<Vec<serde_json::Value>>> {
    Arc::new(Mutex::new(vec![serde_json::json!({
        "id": "1",
        "title": "Buy milk",
        "description": "2%",
        "status": "pending",
        "dueTime": "2025-01-01T10:00:00Z"
    })]))
}

fn store_router(store: Arc<Mutex<Vec<serde_json::Value>>>) -> Router {
    let list_store = store.clone();
    let put_store = store.clone();
    let delete_store = store;

    Router::new()
        .route(
            "/api/todos",
            get(move || {
                let store = list_store.clone();
                async move { Json(store.lock().unwrap().clone()) }
            }),
        )
        .route(
            "/api/todos/:id",
            axum::routing::put(
                move |Path(id): Path<String>, Json(body): Json<serde_json::Value>| {
                    let store = put_store.clone();
                    async move {
                        let mut records = store.lock().unwrap();
                        match records.iter_mut().find(|record| record["id"] == id.as_str()) {
                            Some(record) => {
                                *record = body;
                                StatusCode::OK
                            }
                            None => StatusCode::NOT_FOUND,
                        }
                    }
                },
            )
            .delete(move |Path(id): Path<String>| {
                let store = delete_store.clone();
                async move {
                    let mut records = store.lock().unwrap();
                    let before = records.len();
                    records.retain(|record| record["id"] != id.as_str());
                    if records.len() < before {
                        StatusCode::NO_CONTENT
                    } else {
                        StatusCode::NOT_FOUND
                    }
                }
            }),
        )
}

#[test]
fn edit_command_updates_the_changed_fields() {
    let exe = env!("CARGO_BIN_EXE_taskboard");
    let store = seeded_store();
    let (url, _guard) = spawn_server(store_router(store.clone()));

    let output = Command::new(exe)
        .args(["edit", "1", "--title", "Buy organic milk"])
        .env("TASKBOARD_HOST", &url)
        .output()
        .expect("failed to run edit command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Updated task: Buy organic milk (1)"));

    let records = store.lock().unwrap();
    assert_eq!(records[0]["title"], "Buy organic milk");
    assert_eq!(records[0]["description"], "2%");
    assert_eq!(records[0]["status"], "pending");
    assert_eq!(records[0]["dueTime"], "2025-01-01T10:00:00Z");
}

#[test]
fn edit_command_without_flags_cancels_the_session() {
    let exe = env!("CARGO_BIN_EXE_taskboard");
    let store = seeded_store();
    let (url, _guard) = spawn_server(store_router(store.clone()));

    let output = Command::new(exe)
        .args(["edit", "1"])
        .env("TASKBOARD_HOST", &url)
        .output()
        .expect("failed to run edit command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No changes; edit cancelled"));
    assert_eq!(store.lock().unwrap()[0]["title"], "Buy milk");
}

#[test]
fn edit_command_reports_an_unknown_id() {
    let exe = env!("CARGO_BIN_EXE_taskboard");
    let store = seeded_store();
    let (url, _guard) = spawn_server(store_router(store));

    let output = Command::new(exe)
        .args(["edit", "99", "--title", "Nope"])
        .env("TASKBOARD_HOST", &url)
        .output()
        .expect("failed to run edit command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: not_found"));
}

#[test]
fn delete_command_removes_the_record() {
    let exe = env!("CARGO_BIN_EXE_taskboard");
    let store = seeded_store();
    let (url, _guard) = spawn_server(store_router(store.clone()));

    let output = Command::new(exe)
        .args(["delete", "1"])
        .env("TASKBOARD_HOST", &url)
        .output()
        .expect("failed to run delete command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Deleted task: Buy milk (1)"));
    assert!(store.lock().unwrap().is_empty());
}

#[test]
fn delete_command_reports_a_rejected_delete() {
    let exe = env!("CARGO_BIN_EXE_taskboard");
    let store = seeded_store();
    let list_store = store.clone();
    let app = Router::new()
        .route(
            "/api/todos",
            get(move || {
                let store = list_store.clone();
                async move { Json(store.lock().unwrap().clone()) }
            }),
        )
        .route(
            "/api/todos/:id",
            axum::routing::delete(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
    let (url, _guard) = spawn_server(app);

    let output = Command::new(exe)
        .args(["delete", "1"])
        .env("TASKBOARD_HOST", &url)
        .output()
        .expect("failed to run delete command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: server_rejected"));
    assert_eq!(store.lock().unwrap().len(), 1);
}
