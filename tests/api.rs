use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use folio_app::{
    modules::{
        books::{
            catalog::Catalog,
            models::{Book, BookType},
        },
        clients::models::ApiClient,
        orders::models::Order,
    },
    Services,
};
use folio_db::{MemoryStore, SnapshotStore};
use folio_kernel::settings::Settings;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    orders: Arc<MemoryStore<Order>>,
    clients: Arc<MemoryStore<ApiClient>>,
}

fn book(id: i64, name: &str, book_type: BookType, available: bool) -> Book {
    Book {
        id,
        name: name.to_string(),
        book_type,
        available,
        author: Some("Someone".to_string()),
        isbn: Some(format!("978-{id}")),
        price: Some(12.5),
        current_stock: Some(if available { 4 } else { 0 }),
    }
}

fn test_app() -> TestApp {
    let catalog = Catalog::new(vec![
        book(1, "The Russian", BookType::Fiction, true),
        book(2, "Just as I Am", BookType::NonFiction, false),
        book(3, "The Vanishing Half", BookType::Fiction, true),
        book(4, "The Midnight Library", BookType::Fiction, true),
        book(5, "Untamed", BookType::NonFiction, true),
    ])
    .unwrap();
    let orders: Arc<MemoryStore<Order>> = Arc::new(MemoryStore::new(Vec::new()));
    let clients: Arc<MemoryStore<ApiClient>> = Arc::new(MemoryStore::new(Vec::new()));
    let services = Services::new(catalog, clients.clone(), orders.clone());

    TestApp {
        router: folio_app::router(&services, &Settings::default()),
        orders,
        clients,
    }
}

impl TestApp {
    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(body) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Send `body` verbatim with no `Content-Type` header.
    async fn send_raw(&self, uri: &str, token: Option<&str>, body: &str) -> (StatusCode, Value) {
        let mut request = Request::builder().method(Method::POST).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = self
            .router
            .clone()
            .oneshot(request.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    async fn register(&self, email: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api-clients/",
                None,
                Some(json!({"clientEmail": email, "clientName": "Tester"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["accessToken"].as_str().unwrap().to_string()
    }

    async fn submit(&self, token: &str, book_id: i64, name: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/orders",
            Some(token),
            Some(json!({"bookId": book_id, "customerName": name})),
        )
        .await
    }
}

#[tokio::test]
async fn status_is_ok() {
    let app = test_app();

    let (status, body) = app.get("/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "OK"}));
}

#[tokio::test]
async fn list_books_filters_by_type_and_projects_summary_fields() {
    let app = test_app();

    for book_type in ["fiction", "non-fiction"] {
        let (status, body) = app.get(&format!("/books?type={book_type}")).await;
        assert_eq!(status, StatusCode::OK);

        let books = body.as_array().unwrap();
        assert!(!books.is_empty());
        for book in books {
            assert_eq!(book["type"], book_type);
            let mut keys: Vec<_> = book.as_object().unwrap().keys().cloned().collect();
            keys.sort();
            assert_eq!(keys, vec!["available", "id", "name", "type"]);
        }
    }
}

#[tokio::test]
async fn list_books_honours_limit_bounds() {
    let app = test_app();

    let (status, body) = app.get("/books?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = app.get("/books?limit=20").await;
    assert_eq!(body.as_array().unwrap().len(), 5);

    for bad in ["0", "21", "abc"] {
        let (status, body) = app.get(&format!("/books?limit={bad}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "limit={bad}");
        assert_eq!(
            body["error"],
            "Invalid value for query parameter 'limit'. Must be between 1 and 20."
        );
    }
}

#[tokio::test]
async fn list_books_rejects_unknown_type() {
    let app = test_app();

    let (status, body) = app.get("/books?type=sciencefiction").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "Invalid value for query parameter 'type'. Must be one of: fiction, non-fiction."})
    );
}

#[tokio::test]
async fn get_book_returns_extended_fields() {
    let app = test_app();

    let (status, body) = app.get("/books/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Just as I Am");
    assert_eq!(body["isbn"], "978-2");
    assert_eq!(body["current-stock"], 0);

    let (status, body) = app.get("/books/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Book not found.");

    let (status, _) = app.get("/books/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn registration_rejects_duplicate_email() {
    let app = test_app();

    let token = app.register("reader@example.com").await;
    assert_eq!(token.len(), 36);

    let (status, body) = app
        .send(
            Method::POST,
            "/api-clients/",
            None,
            Some(json!({"clientEmail": "reader@example.com", "clientName": "Again"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "API client already registered.");
    assert_eq!(app.clients.snapshot().len(), 1);
}

#[tokio::test]
async fn registration_requires_both_fields() {
    let app = test_app();

    for body in [
        json!({"clientEmail": "a@example.com"}),
        json!({"clientName": "A"}),
        json!({"clientEmail": "", "clientName": "A"}),
    ] {
        let (status, body) = app
            .send(Method::POST, "/api-clients/", None, Some(body))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "clientEmail and clientName required.");
    }

    let (status, _) = app
        .send(
            Method::POST,
            "/api-clients",
            None,
            Some(json!({"clientEmail": "b@example.com", "clientName": "B"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn orders_require_a_registered_bearer_token() {
    let app = test_app();

    let (status, body) = app
        .send(
            Method::POST,
            "/orders",
            None,
            Some(json!({"bookId": 1, "customerName": "Ann"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authorization header required.");

    let (status, body) = app.submit("not-a-token", 1, "Ann").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or missing token.");

    let request = Request::builder()
        .uri("/orders")
        .header(header::AUTHORIZATION, "Basic abc")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn tokens_written_by_another_process_are_accepted() {
    let app = test_app();
    app.clients
        .save(&[ApiClient {
            token: "external-token".to_string(),
            client_email: "ext@example.com".to_string(),
            client_name: "External".to_string(),
        }])
        .await
        .unwrap();

    let (status, _) = app
        .send(Method::GET, "/orders", Some("external-token"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn submit_order_validates_body_and_book() {
    let app = test_app();
    let token = app.register("buyer@example.com").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/orders",
            Some(&token),
            Some(json!({"customerName": "Ann"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid or missing bookId.");

    let (status, body) = app
        .send(Method::POST, "/orders", Some(&token), Some(json!({"bookId": 1})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid or missing customerName.");

    let (status, body) = app.send(Method::POST, "/orders", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid or missing bookId.");

    let (status, body) = app.submit(&token, 99, "Ann").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Book not found.");

    let (status, body) = app.submit(&token, 2, "Ann").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "This Book is not in stock. Try ordering later.");

    assert!(app.orders.snapshot().is_empty());
}

#[tokio::test]
async fn created_order_round_trips() {
    let app = test_app();
    let token = app.register("buyer@example.com").await;

    let (status, body) = app.submit(&token, 1, "Ann").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["created"], true);
    let order_id = body["orderId"].as_str().unwrap().to_string();
    assert_eq!(order_id.len(), 20);

    let (status, order) = app
        .send(Method::GET, &format!("/orders/{order_id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        order,
        json!({"id": order_id, "bookId": 1, "customerName": "Ann"})
    );

    let (status, orders) = app.send(Method::GET, "/orders", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders, json!([order]));
    assert_eq!(app.orders.snapshot().len(), 1);
}

#[tokio::test]
async fn any_client_may_manage_any_order() {
    let app = test_app();
    let owner = app.register("owner@example.com").await;
    let other = app.register("other@example.com").await;

    let (_, body) = app.submit(&owner, 3, "Ann").await;
    let uri = format!("/orders/{}", body["orderId"].as_str().unwrap());

    let (status, _) = app.send(Method::GET, &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn patch_updates_customer_name_only_when_present() {
    let app = test_app();
    let token = app.register("buyer@example.com").await;
    let (_, body) = app.submit(&token, 1, "Ann").await;
    let uri = format!("/orders/{}", body["orderId"].as_str().unwrap());

    let (status, unchanged) = app
        .send(Method::PATCH, &uri, Some(&token), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged["customerName"], "Ann");

    let (status, unchanged) = app.send(Method::PATCH, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged["customerName"], "Ann");

    let (status, updated) = app
        .send(
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({"customerName": "Anna", "bookId": 5})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["customerName"], "Anna");
    assert_eq!(updated["bookId"], 1);
    assert_eq!(app.orders.snapshot()[0].customer_name, "Anna");

    let (status, _) = app
        .send(
            Method::PATCH,
            "/orders/missing",
            Some(&token),
            Some(json!({"customerName": "X"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_twice_returns_no_content_then_not_found() {
    let app = test_app();
    let token = app.register("buyer@example.com").await;
    let (_, body) = app.submit(&token, 4, "Ann").await;
    let uri = format!("/orders/{}", body["orderId"].as_str().unwrap());

    let (status, body) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Order not found.");

    let (status, _) = app.send(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.orders.snapshot().is_empty());
}

#[tokio::test]
async fn unauthenticated_requests_are_rejected_before_lookup() {
    let app = test_app();

    let (status, _) = app.send(Method::GET, "/orders/missing", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(Method::DELETE, "/orders/missing", Some("bogus"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_books_rejects_repeated_parameters() {
    let app = test_app();

    let (status, body) = app.get("/books?limit=5&limit=6").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Invalid value for query parameter 'limit'. Must be between 1 and 20."
    );

    let (status, body) = app.get("/books?type=fiction&type=non-fiction").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Invalid value for query parameter 'type'. Must be one of: fiction, non-fiction."
    );
}

#[tokio::test]
async fn submit_order_reports_a_mistyped_customer_name() {
    let app = test_app();
    let token = app.register("typed@example.com").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/orders",
            Some(&token),
            Some(json!({"bookId": 1, "customerName": 42})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid or missing customerName."}));

    let (status, body) = app
        .send(
            Method::POST,
            "/orders",
            Some(&token),
            Some(json!({"bookId": "1", "customerName": "Ann"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid or missing bookId."}));
}

#[tokio::test]
async fn write_endpoints_accept_json_without_content_type() {
    let app = test_app();

    let (status, body) = app
        .send_raw(
            "/api-clients/",
            None,
            r#"{"clientEmail": "bare@example.com", "clientName": "Bare"}"#,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let token = body["accessToken"].as_str().unwrap().to_string();

    let (status, body) = app
        .send_raw("/orders", Some(&token), r#"{"bookId": 1, "customerName": "Ann"}"#)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["created"], true);
    assert_eq!(app.orders.snapshot().len(), 1);

    let (status, body) = app.send_raw("/orders", Some(&token), "not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid or missing bookId."}));
}
