use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::{
    app_state::AppState,
    config::Settings,
    domain::{
        models::{Agreement, ClientCommunication, Deliverable, Milestone, Payment, SupportTicket},
        repositories::Repositories,
    },
    routes::{self, records},
};

/// All routes, without the HTTP middleware.
pub fn app(app_state: AppState) -> Router<()> {
    Router::new()
        .route("/", get(|| async { "CRM API" }))
        .nest("/clients", routes::clients::router())
        .nest("/leads", routes::leads::router())
        .nest("/projects", routes::projects::router())
        .nest("/tasks", routes::tasks::router())
        .nest("/milestones", records::crud_router::<Milestone>())
        .nest("/goals", routes::goals::router())
        .nest("/deliverables", records::crud_router::<Deliverable>())
        .nest("/communications", records::append_only_router::<ClientCommunication>())
        .nest("/tickets", records::crud_router::<SupportTicket>())
        .nest("/subscriptions", routes::billing::subscriptions())
        .nest("/payments", records::crud_router::<Payment>())
        .nest("/agreements", records::crud_router::<Agreement>())
        .nest("/signups", routes::billing::signups())
        .nest("/dashboard", routes::dashboard::router())
        .with_state(app_state)
}

pub fn create(repositories: Repositories, config: &Settings) -> Router<()> {
    let app_state = AppState::new(repositories);

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(allowed_origin(&config.application.app_url));

    app(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}

fn allowed_origin(app_url: &str) -> AllowOrigin {
    match HeaderValue::from_str(app_url) {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(_) => {
            tracing::warn!(app_url, "app_url is not a valid origin, CORS disabled");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::adapters::outbound::local::LocalStore;

    fn test_app() -> Router {
        let repositories = Repositories::new(Arc::new(LocalStore::in_memory("test")));
        app(AppState::new(repositories))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn seed_project(app: &Router) -> (String, String) {
        let (status, client) = send(app, Method::POST, "/clients", Some(json!({"name": "Acme"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        let client_id = client["id"].as_str().unwrap().to_string();

        let (status, project) = send(
            app,
            Method::POST,
            "/projects",
            Some(json!({"clientId": client_id, "name": "Portal"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        (client_id, project["id"].as_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn client_crud_round_trip() {
        let app = test_app();
        let (status, created) = send(
            &app,
            Method::POST,
            "/clients",
            Some(json!({"name": "Acme", "email": "ops@acme.test"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let uri = format!("/clients/{}", created["id"].as_str().unwrap());

        let (status, fetched) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, patched) = send(&app, Method::PATCH, &uri, Some(json!({"email": null}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(patched["email"], Value::Null);
        assert_eq!(patched["name"], "Acme");

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("clients"));
    }

    #[tokio::test]
    async fn validation_errors_are_bad_requests() {
        let app = test_app();
        let (status, body) = send(&app, Method::POST, "/clients", Some(json!({"name": "  "}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn list_filters_come_from_the_query_string() {
        let app = test_app();
        send(&app, Method::POST, "/clients", Some(json!({"name": "Acme"}))).await;
        send(&app, Method::POST, "/clients", Some(json!({"name": "Globex"}))).await;

        let (status, body) = send(&app, Method::GET, "/clients?search=acm", None).await;

        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = body.as_array().unwrap().iter().map(|c| c["name"].clone()).collect();
        assert_eq!(names, vec![json!("Acme")]);
    }

    #[tokio::test]
    async fn kanban_flow_over_http() {
        let app = test_app();
        let (_, project_id) = seed_project(&app).await;

        let (status, task) = send(
            &app,
            Method::POST,
            "/tasks",
            Some(json!({"projectId": project_id, "title": "Write copy", "status": "todo"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(task["position"], 0);
        let task_id = task["id"].as_str().unwrap().to_string();

        let (status, moved) = send(
            &app,
            Method::PUT,
            &format!("/tasks/{task_id}/position"),
            Some(json!({"status": "done", "position": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(moved["status"], "done");
        assert_eq!(moved["position"], 2);

        let (status, board) = send(&app, Method::GET, &format!("/projects/{project_id}/board"), None).await;
        assert_eq!(status, StatusCode::OK);
        let columns = board["columns"].as_array().unwrap();
        let todo = columns.iter().find(|c| c["status"] == "todo").unwrap();
        let done = columns.iter().find(|c| c["status"] == "done").unwrap();
        assert!(todo["tasks"].as_array().unwrap().is_empty());
        assert_eq!(done["tasks"][0]["id"], task_id.as_str());

        let (status, dropped) = send(
            &app,
            Method::POST,
            &format!("/tasks/{task_id}/move"),
            Some(json!({"column": "review"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(dropped["status"], "review");
        assert_eq!(dropped["position"], 0);

        let (status, tasks) = send(&app, Method::GET, &format!("/projects/{project_id}/tasks"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(tasks.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn negative_position_is_rejected() {
        let app = test_app();
        let (_, project_id) = seed_project(&app).await;
        let (_, task) = send(
            &app,
            Method::POST,
            "/tasks",
            Some(json!({"projectId": project_id, "title": "t"})),
        )
        .await;

        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/tasks/{}/position", task["id"].as_str().unwrap()),
            Some(json!({"status": "todo", "position": -1})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn dashboard_uses_the_given_day() {
        let app = test_app();
        let (_, project_id) = seed_project(&app).await;
        send(
            &app,
            Method::POST,
            "/tasks",
            Some(json!({"projectId": project_id, "title": "late", "dueDate": "2026-03-01"})),
        )
        .await;
        send(
            &app,
            Method::POST,
            "/tasks",
            Some(json!({"projectId": project_id, "title": "far", "dueDate": "2026-04-30"})),
        )
        .await;

        let (status, items) = send(&app, Method::GET, "/dashboard/upcoming?today=2026-03-10", None).await;

        assert_eq!(status, StatusCode::OK);
        let items = items.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["title"], "late");
        assert_eq!(items[0]["overdue"], true);
        assert_eq!(items[0]["daysUntil"], -9);
        assert_eq!(items[0]["projectName"], "Portal");
    }

    #[tokio::test]
    async fn goal_progress_endpoint() {
        let app = test_app();
        let (_, project_id) = seed_project(&app).await;
        let (_, goal) = send(
            &app,
            Method::POST,
            "/goals",
            Some(json!({
                "projectId": project_id,
                "title": "Automations shipped",
                "currentValue": 3,
                "targetValue": 10
            })),
        )
        .await;

        let (status, progress) = send(
            &app,
            Method::GET,
            &format!("/goals/{}/progress", goal["id"].as_str().unwrap()),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(progress["percentage"], 30);
    }

    #[tokio::test]
    async fn lead_conversion_twice_conflicts() {
        let app = test_app();
        let (_, lead) = send(
            &app,
            Method::POST,
            "/leads",
            Some(json!({"name": "Ada", "email": "ada@example.com", "source": "contact"})),
        )
        .await;
        let uri = format!("/leads/{}/convert", lead["id"].as_str().unwrap());

        let (status, converted) = send(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(converted["lead"]["status"], "won");
        assert_eq!(converted["lead"]["convertedClientId"], converted["client"]["id"]);

        let (status, _) = send(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn communications_are_append_only() {
        let app = test_app();
        let (client_id, _) = seed_project(&app).await;
        let (status, message) = send(
            &app,
            Method::POST,
            "/communications",
            Some(json!({
                "clientId": client_id,
                "type": "call",
                "direction": "outbound",
                "body": "Discussed renewal"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let uri = format!("/communications/{}", message["id"].as_str().unwrap());
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        let (status, listed) = send(&app, Method::GET, &format!("/clients/{client_id}/communications"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed[0]["type"], "call");
    }

    #[tokio::test]
    async fn deleting_a_client_removes_its_projects() {
        let app = test_app();
        let (client_id, project_id) = seed_project(&app).await;

        let (status, _) = send(&app, Method::DELETE, &format!("/clients/{client_id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::GET, &format!("/projects/{project_id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
    #[tokio::test]
    async fn records_pointing_at_missing_owners_are_rejected() {
        let app = test_app();
        let cases = [
            ("/projects", json!({"clientId": "ghost", "name": "Portal"})),
            ("/milestones", json!({"projectId": "ghost", "title": "Launch"})),
            ("/tickets", json!({"clientId": "ghost", "subject": "Broken form", "description": "500 on submit"})),
        ];

        for (uri, body) in cases {
            let (status, _) = send(&app, Method::POST, uri, Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[tokio::test]
    async fn moving_an_unknown_task_is_not_found() {
        let app = test_app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/tasks/ghost/move",
            Some(json!({"column": "review"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("tasks"));
    }

    #[tokio::test]
    async fn signup_records_billing_under_the_client() {
        let app = test_app();
        let (client_id, _) = seed_project(&app).await;

        let (status, signup) = send(
            &app,
            Method::POST,
            "/signups",
            Some(json!({
                "subscription": {
                    "clientId": client_id,
                    "plan": "Automation care",
                    "amount": 490,
                    "currency": "EUR",
                    "startDate": "2026-03-01"
                },
                "payment": {"status": "succeeded", "method": "card"},
                "agreements": [{"document": "terms_of_service", "version": "2026-01"}]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(signup["subscription"]["interval"], "monthly");
        assert_eq!(signup["payment"]["currency"], "EUR");
        assert_eq!(signup["agreements"][0]["status"], "accepted");
        let subscription_id = signup["subscription"]["id"].as_str().unwrap().to_string();
        let payment_id = signup["payment"]["id"].as_str().unwrap().to_string();

        let (_, payments) = send(
            &app,
            Method::GET,
            &format!("/subscriptions/{subscription_id}/payments"),
            None,
        )
        .await;
        assert_eq!(payments.as_array().unwrap().len(), 1);
        let (_, agreements) = send(&app, Method::GET, &format!("/clients/{client_id}/agreements"), None).await;
        assert_eq!(agreements.as_array().unwrap().len(), 1);

        send(&app, Method::DELETE, &format!("/clients/{client_id}"), None).await;

        let (status, _) = send(&app, Method::GET, &format!("/subscriptions/{subscription_id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, Method::GET, &format!("/payments/{payment_id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (_, agreements) = send(&app, Method::GET, "/agreements", None).await;
        assert!(agreements.as_array().unwrap().is_empty());
    }
}
