mod common;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{http::StatusCode, test, App, HttpServer};
use bson::oid::ObjectId;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::net::TcpListener;

use common::{bearer, init_app, signup, test_state};
use todoforge::routes;

#[test_log::test(actix_rt::test)]
async fn test_todo_lifecycle() {
    let (state, _) = test_state();
    let app = init_app(state).await;
    let token = signup(&app, "alice", "a@x.com", "secret1").await;

    // Create
    let req = test::TestRequest::post()
        .uri("/api/todos")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Buy milk" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["title"], "Buy milk");
    assert_eq!(created["isCompleted"], false);
    let todo_id = created["id"].as_str().expect("id should be a string").to_string();

    // Complete
    let req = test::TestRequest::patch()
        .uri(&format!("/api/todos/{}", todo_id))
        .insert_header(bearer(&token))
        .set_json(json!({ "isCompleted": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["id"], todo_id.as_str());
    assert_eq!(updated["isCompleted"], true);
    assert_eq!(updated["createdAt"], created["createdAt"]);

    // Delete
    let req = test::TestRequest::delete()
        .uri(&format!("/api/todos/{}", todo_id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Todo deleted successfully" }));

    // List is empty again
    let req = test::TestRequest::get()
        .uri("/api/todos")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let list: Value = test::read_body_json(resp).await;
    assert_eq!(list, json!([]));
}

#[actix_rt::test]
async fn test_created_todo_appears_in_list() {
    let (state, _) = test_state();
    let app = init_app(state).await;
    let token = signup(&app, "alice", "a@x.com", "secret1").await;

    let req = test::TestRequest::post()
        .uri("/api/todos")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Water plants" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/todos")
        .insert_header(bearer(&token))
        .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(list, json!([created.clone()]));
    assert_eq!(list[0]["isCompleted"], false);

    // The same item through the single-item route.
    let req = test::TestRequest::get()
        .uri(&format!("/api/todos/{}", created["id"].as_str().unwrap()))
        .insert_header(bearer(&token))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, created);

    let keys: Vec<&str> = {
        let mut keys: Vec<&str> = created.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    };
    assert_eq!(
        keys,
        vec!["createdAt", "id", "isCompleted", "title", "updatedAt", "userId"]
    );
}

#[actix_rt::test]
async fn test_toggle_is_idempotent() {
    let (state, _) = test_state();
    let app = init_app(state).await;
    let token = signup(&app, "alice", "a@x.com", "secret1").await;

    let req = test::TestRequest::post()
        .uri("/api/todos")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Stretch" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/todos/{}", created["id"].as_str().unwrap());

    for value in [true, true, false, false] {
        let req = test::TestRequest::patch()
            .uri(&uri)
            .insert_header(bearer(&token))
            .set_json(json!({ "isCompleted": value }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let todo: Value = test::read_body_json(resp).await;
        assert_eq!(todo["isCompleted"], value);
    }
}

#[actix_rt::test]
async fn test_todos_are_invisible_to_other_users() {
    let (state, _) = test_state();
    let app = init_app(state).await;
    let alice = signup(&app, "alice", "a@x.com", "secret1").await;
    let bob = signup(&app, "bobby", "b@x.com", "secret2").await;

    let req = test::TestRequest::post()
        .uri("/api/todos")
        .insert_header(bearer(&alice))
        .set_json(json!({ "title": "Alice's secret plan" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let alice_uri = format!("/api/todos/{}", created["id"].as_str().unwrap());
    let missing_uri = format!("/api/todos/{}", ObjectId::new().to_hex());

    // Bob's list does not contain it.
    let req = test::TestRequest::get()
        .uri("/api/todos")
        .insert_header(bearer(&bob))
        .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list, json!([]));

    // Each of Bob's attempts on Alice's to-do answers exactly like a missing one.
    for uri in [&alice_uri, &missing_uri] {
        let requests = vec![
            test::TestRequest::get().uri(uri),
            test::TestRequest::patch()
                .uri(uri)
                .set_json(json!({ "isCompleted": true })),
            test::TestRequest::delete().uri(uri),
        ];
        for req in requests {
            let resp = test::call_service(&app, req.insert_header(bearer(&bob)).to_request()).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "uri {}", uri);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body, json!({ "error": "Todo not found" }));
        }
    }

    // Alice's to-do survived untouched.
    let req = test::TestRequest::get()
        .uri(&alice_uri)
        .insert_header(bearer(&alice))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, created);
}

#[actix_rt::test]
async fn test_protected_routes_require_token() {
    let (state, _) = test_state();
    let app = init_app(state).await;
    let token = signup(&app, "alice", "a@x.com", "secret1").await;
    let uri = format!("/api/todos/{}", ObjectId::new().to_hex());

    let bad_headers = [
        None,
        Some("Bearer invalid.token.here".to_string()),
        Some(format!("Token {}", token)),
    ];
    for auth in bad_headers {
        let requests = vec![
            test::TestRequest::get().uri("/api/todos"),
            test::TestRequest::post()
                .uri("/api/todos")
                .set_json(json!({ "title": "Sneaky" })),
            test::TestRequest::get().uri(&uri),
            test::TestRequest::patch()
                .uri(&uri)
                .set_json(json!({ "isCompleted": true })),
            test::TestRequest::delete().uri(&uri),
        ];
        for mut req in requests {
            if let Some(value) = &auth {
                req = req.insert_header(("Authorization", value.clone()));
            }
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body, json!({ "error": "Unauthorized" }));
        }
    }

    // The rejected POSTs created nothing.
    let req = test::TestRequest::get()
        .uri("/api/todos")
        .insert_header(bearer(&token))
        .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list, json!([]));
}

#[actix_rt::test]
async fn test_invalid_todo_inputs() {
    let (state, _) = test_state();
    let app = init_app(state).await;
    let token = signup(&app, "alice", "a@x.com", "secret1").await;

    let req = test::TestRequest::post()
        .uri("/api/todos")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Real one" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/todos/{}", created["id"].as_str().unwrap());

    let test_cases = vec![
        (
            test::TestRequest::post()
                .uri("/api/todos")
                .set_json(json!({ "title": "" })),
            "empty title",
        ),
        (
            test::TestRequest::post()
                .uri("/api/todos")
                .set_json(json!({ "title": "   " })),
            "blank title",
        ),
        (
            test::TestRequest::post().uri("/api/todos").set_json(json!({})),
            "missing title",
        ),
        (
            test::TestRequest::post()
                .uri("/api/todos")
                .set_json(json!(["Sneaky"])),
            "title as array",
        ),
        (
            test::TestRequest::patch().uri(&uri).set_json(json!({})),
            "missing isCompleted",
        ),
        (
            test::TestRequest::patch().uri(&uri).set_json(json!([true])),
            "isCompleted as array",
        ),
        (
            test::TestRequest::patch()
                .uri(&uri)
                .set_json(json!({ "isCompleted": "yes" })),
            "non-boolean isCompleted",
        ),
        (
            test::TestRequest::patch()
                .uri("/api/todos/not-an-id")
                .set_json(json!({ "isCompleted": true })),
            "malformed id on patch",
        ),
        (
            test::TestRequest::delete().uri("/api/todos/not-an-id"),
            "malformed id on delete",
        ),
        (
            test::TestRequest::get().uri("/api/todos/12345"),
            "malformed id on get",
        ),
    ];

    for (req, description) in test_cases {
        let resp = test::call_service(&app, req.insert_header(bearer(&token)).to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "case: {}", description);
        assert!(body["error"].is_string(), "case: {}", description);
    }

    // The valid to-do is unchanged after the rejected updates.
    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&token))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, created);
}

#[actix_rt::test]
async fn test_each_user_lists_only_their_own() {
    let (state, _) = test_state();
    let app = init_app(state).await;
    let alice = signup(&app, "alice", "a@x.com", "secret1").await;
    let bob = signup(&app, "bobby", "b@x.com", "secret2").await;

    for (token, title) in [(&alice, "a1"), (&bob, "b1"), (&alice, "a2")] {
        let req = test::TestRequest::post()
            .uri("/api/todos")
            .insert_header(bearer(token))
            .set_json(json!({ "title": title }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let titles = |list: Value| -> Vec<String> {
        list.as_array()
            .unwrap()
            .iter()
            .map(|t| t["title"].as_str().unwrap().to_string())
            .collect()
    };

    let req = test::TestRequest::get()
        .uri("/api/todos")
        .insert_header(bearer(&alice))
        .to_request();
    assert_eq!(titles(test::call_and_read_body_json(&app, req).await), vec!["a1", "a2"]);

    let req = test::TestRequest::get()
        .uri("/api/todos")
        .insert_header(bearer(&bob))
        .to_request();
    assert_eq!(titles(test::call_and_read_body_json(&app, req).await), vec!["b1"]);
}

#[actix_rt::test]
async fn test_create_todo_unauthorized_over_http() {
    let (state, _) = test_state();

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Cors::default().allow_any_origin().allow_any_method().allow_any_header())
            .wrap(Logger::default())
            .configure(routes::configure(state.clone()))
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen")
    .run();
    let handle = server.handle();
    actix_rt::spawn(server);

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://127.0.0.1:{}/api/todos", port))
        .json(&json!({ "title": "Unauthorized Todo" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("body should be JSON");
    assert_eq!(body, json!({ "error": "Unauthorized" }));

    handle.stop(true).await;
}
