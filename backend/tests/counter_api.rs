use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, ResponseError, test, web};
use serde_json::{Value, json};
use tempfile::{TempDir, tempdir};

use backend::error::ApiError;
use backend::routes::{self, CountResponse};
use backend::store::{CounterStore, FileStorage, IncrementMode, Storage};

/// File storage whose writes can be switched off.
struct FlakyStorage {
    inner: FileStorage,
    fail_writes: Arc<AtomicBool>,
}

impl Storage for FlakyStorage {
    async fn load(&self) -> io::Result<Option<String>> {
        self.inner.load().await
    }

    async fn persist(&self, contents: &str) -> io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "disk is read-only"));
        }
        self.inner.persist(contents).await
    }
}

fn app<S: Storage>(
    store: CounterStore<S>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(store))
        .configure(routes::configure::<S>)
}

fn file_store(mode: IncrementMode) -> (TempDir, CounterStore) {
    let dir = tempdir().unwrap();
    let store = CounterStore::open(dir.path().join("counter.json"), mode);
    (dir, store)
}

#[actix_web::test]
async fn fresh_store_reports_zero() {
    let (dir, store) = file_store(IncrementMode::Serialized);
    let app = test::init_service(app(store)).await;

    let req = test::TestRequest::get().uri("/api/counter").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!({ "count": 0 }));
    assert!(!dir.path().join("counter.json").exists());
}

#[actix_web::test]
async fn post_increments_and_get_reflects_it() {
    let (_dir, store) = file_store(IncrementMode::Serialized);
    let app = test::init_service(app(store)).await;

    let req = test::TestRequest::get().uri("/api/counter").to_request();
    let body: CountResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.count, 0);

    let req = test::TestRequest::post().uri("/api/counter").to_request();
    let body: CountResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.count, 1);

    let req = test::TestRequest::get().uri("/api/counter").to_request();
    let body: CountResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.count, 1);
}

#[actix_web::test]
async fn sequential_posts_count_up() {
    let (_dir, store) = file_store(IncrementMode::Unguarded);
    let app = test::init_service(app(store)).await;

    for expected in 1..=3 {
        let req = test::TestRequest::post().uri("/api/counter").to_request();
        let body: CountResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.count, expected);
    }
}

#[actix_web::test]
async fn post_body_is_ignored() {
    let (_dir, store) = file_store(IncrementMode::Serialized);
    let app = test::init_service(app(store)).await;

    let req = test::TestRequest::post()
        .uri("/api/counter")
        .set_json(json!({ "count": 1000 }))
        .to_request();
    let body: CountResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.count, 1);
}

#[actix_web::test]
async fn count_survives_a_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("counter.json");

    {
        let app = test::init_service(app(CounterStore::open(&path, IncrementMode::Serialized))).await;
        for _ in 0..2 {
            let req = test::TestRequest::post().uri("/api/counter").to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }
    }

    let app = test::init_service(app(CounterStore::open(&path, IncrementMode::Serialized))).await;
    let req = test::TestRequest::get().uri("/api/counter").to_request();
    let body: CountResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.count, 2);
}

#[actix_web::test]
async fn failed_write_is_a_500_and_leaves_the_count() {
    let dir = tempdir().unwrap();
    let fail_writes = Arc::new(AtomicBool::new(false));
    let storage = FlakyStorage {
        inner: FileStorage::new(dir.path().join("counter.json")),
        fail_writes: fail_writes.clone(),
    };
    let app = test::init_service(app(CounterStore::new(storage, IncrementMode::Serialized))).await;

    let req = test::TestRequest::post().uri("/api/counter").to_request();
    let body: CountResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.count, 1);

    fail_writes.store(true, Ordering::SeqCst);
    let req = test::TestRequest::post().uri("/api/counter").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Failed to increment count" }));

    let req = test::TestRequest::get().uri("/api/counter").to_request();
    let body: CountResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.count, 1);

    fail_writes.store(false, Ordering::SeqCst);
    let req = test::TestRequest::post().uri("/api/counter").to_request();
    let body: CountResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.count, 2);
}

#[actix_web::test]
async fn get_failure_has_the_fixed_shape() {
    let resp = ApiError::GetCount.error_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "error": "Failed to get count" }));
}

#[actix_web::test]
async fn unknown_api_paths_are_not_found() {
    let (_dir, store) = file_store(IncrementMode::Serialized);
    let app = test::init_service(app(store)).await;

    let req = test::TestRequest::get().uri("/api/votes").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete().uri("/api/counter").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[actix_web::test]
async fn other_paths_get_the_landing_page() {
    let (_dir, store) = file_store(IncrementMode::Serialized);
    let app = test::init_service(app(store)).await;

    let req = test::TestRequest::get().uri("/about").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = test::read_body(resp).await;
    assert!(std::str::from_utf8(&html).unwrap().contains("CollegeConnect"));
}
