use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, ValidationResult, Widget};
use tower::ServiceExt;
use uuid::Uuid;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- get all ---

#[tokio::test]
async fn get_all_empty() {
    let resp = app().oneshot(empty_request("GET", "/api/widgets")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let widgets: Vec<Widget> = body_json(resp).await;
    assert!(widgets.is_empty());
}

// --- create ---

#[tokio::test]
async fn create_returns_201_with_location_and_no_body() {
    let resp = app()
        .oneshot(json_request("POST", "/api/widgets", r#"{"name":"gear"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp.headers()[http::header::LOCATION].to_str().unwrap().to_string();
    assert!(location.starts_with("/api/widgets/"));
    assert!(location["/api/widgets/".len()..].parse::<Uuid>().is_ok());
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn create_blank_name_returns_validation_result() {
    let resp = app()
        .oneshot(json_request("POST", "/api/widgets", r#"{"name":""}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let result: ValidationResult = body_json(resp).await;
    assert_eq!(result.field_errors.len(), 1);
    assert_eq!(result.field_errors[0].field_name, "name");
    assert_eq!(result.field_errors[0].message, "required");
    assert!(result.global_errors.is_empty());
}

#[tokio::test]
async fn create_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/api/widgets", r#"{"not_name":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get by id ---

#[tokio::test]
async fn get_by_id_not_found_has_text_body() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/widgets/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_bytes(resp).await;
    assert_eq!(&body[..], b"widget 00000000-0000-0000-0000-000000000000 not found");
}

#[tokio::test]
async fn get_by_id_bad_uuid_returns_400() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/widgets/not-a-uuid"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- update ---

#[tokio::test]
async fn update_without_id_returns_global_error() {
    let resp = app()
        .oneshot(json_request("PUT", "/api/widgets", r#"{"name":"gear"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let result: ValidationResult = body_json(resp).await;
    assert!(result.field_errors.is_empty());
    assert_eq!(result.global_errors[0].message, "id is required for update");
}

#[tokio::test]
async fn update_unknown_id_returns_404() {
    let resp = app()
        .oneshot(json_request(
            "PUT",
            "/api/widgets",
            r#"{"id":"00000000-0000-0000-0000-000000000000","name":"gear"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- patch ---

#[tokio::test]
async fn patch_unknown_id_returns_404() {
    let resp = app()
        .oneshot(json_request(
            "PATCH",
            "/api/widgets/00000000-0000-0000-0000-000000000000",
            r#"{"quantity":2}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- delete ---

#[tokio::test]
async fn delete_unknown_returns_400() {
    let resp = app()
        .oneshot(empty_request("DELETE", "/api/widgets/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_bytes(resp).await.is_empty());
}

// --- faults ---

#[tokio::test]
async fn internal_fault_is_plain_text() {
    let resp = app().oneshot(empty_request("GET", "/api/faults/internal")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(&body_bytes(resp).await[..], b"internal error");
}

#[tokio::test]
async fn problem_fault_is_foreign_json() {
    let resp = app().oneshot(empty_request("GET", "/api/faults/problem")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"], "maintenance");
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/widgets", r#"{"name":"gear","quantity":3}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp.headers()[http::header::LOCATION].to_str().unwrap().to_string();
    let id: Uuid = location.rsplit('/').next().unwrap().parse().unwrap();

    // get by id via the location
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &location))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Widget = body_json(resp).await;
    assert_eq!(fetched.id, Some(id));
    assert_eq!(fetched.quantity, 3);

    // update returns the id
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            "/api/widgets",
            &format!(r#"{{"id":"{id}","name":"big gear","quantity":5}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated_id: Uuid = body_json(resp).await;
    assert_eq!(updated_id, id);

    // patch changes only the given fields
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PATCH", &location, r#"{"quantity":9}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let patched: Widget = body_json(resp).await;
    assert_eq!(patched.name, "big gear");
    assert_eq!(patched.quantity, 9);

    // blank name in a patch is rejected
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PATCH", &location, r#"{"name":" "}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // search by name
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/api/widgets/search?name=big"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let found: Vec<Widget> = body_json(resp).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "big gear");

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &location))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get all after delete is empty
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/api/widgets"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let widgets: Vec<Widget> = body_json(resp).await;
    assert!(widgets.is_empty());
}
