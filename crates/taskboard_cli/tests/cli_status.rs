use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, put};
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
    let put_store = store;

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
            put(
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
            ),
        )
}

#[test]
fn status_command_updates_the_remote_record() {
    let exe = env!("CARGO_BIN_EXE_taskboard");
    let store = seeded_store();
    let (url, _guard) = spawn_server(store_router(store.clone()));

    let output = Command::new(exe)
        .args(["status", "1", "completed"])
        .env("TASKBOARD_HOST", &url)
        .output()
        .expect("failed to run status command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Updated status: Buy milk (1)"));

    let records = store.lock().unwrap();
    assert_eq!(records[0]["status"], "completed");
    assert_eq!(records[0]["title"], "Buy milk");
}

#[test]
fn status_command_reports_an_unknown_id() {
    let exe = env!("CARGO_BIN_EXE_taskboard");
    let store = seeded_store();
    let (url, _guard) = spawn_server(store_router(store.clone()));

    let output = Command::new(exe)
        .args(["status", "99", "completed"])
        .env("TASKBOARD_HOST", &url)
        .output()
        .expect("failed to run status command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: not_found"));
    assert_eq!(store.lock().unwrap()[0]["status"], "pending");
}

#[test]
fn status_command_reports_a_rejected_update() {
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
            put(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
    let (url, _guard) = spawn_server(app);

    let output = Command::new(exe)
        .args(["status", "1", "completed"])
        .env("TASKBOARD_HOST", &url)
        .output()
        .expect("failed to run status command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: server_rejected"));
    assert_eq!(store.lock().unwrap()[0]["status"], "pending");
}
