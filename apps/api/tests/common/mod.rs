#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use staffdesk_api::api_client::{ApiError, Transport, Verb};
use staffdesk_api::config::Config;
use staffdesk_api::routes::build_router;
use staffdesk_api::state::AppState;

/// Scripted upstream answer.
#[derive(Debug, Clone)]
pub enum Reply {
    Data(Value),
    Unauthorized,
    Status(u16, &'static str),
}

#[derive(Debug, Clone)]
pub struct Call {
    pub verb: Verb,
    pub path: String,
    pub body: Option<Value>,
}

struct Script {
    verb: Verb,
    path: String,
    replies: Vec<Reply>,
}

/// Upstream double: records every call and answers from a script. Replies
/// for one route are used in order and the last one repeats. Unscripted
/// reads answer an empty list.
#[derive(Default)]
pub struct MockUpstream {
    scripts: Mutex<Vec<Script>>,
    calls: Mutex<Vec<Call>>,
}

impl MockUpstream {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, verb: Verb, path: &str, reply: Reply) -> &Self {
        let mut scripts = self.scripts.lock().unwrap();
        match scripts.iter_mut().find(|s| s.verb == verb && s.path == path) {
            Some(script) => script.replies.push(reply),
            None => scripts.push(Script {
                verb,
                path: path.to_string(),
                replies: vec![reply],
            }),
        }
        self
    }

    pub fn data(&self, verb: Verb, path: &str, data: Value) -> &Self {
        self.on(verb, path, Reply::Data(data))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, verb: Verb, path: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.verb == verb && c.path == path)
            .collect()
    }

    /// Every call that was not a read.
    pub fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.verb != Verb::Get)
            .collect()
    }
}

#[async_trait]
impl Transport for MockUpstream {
    async fn send(&self, verb: Verb, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push(Call {
            verb,
            path: path.to_string(),
            body,
        });
        let reply = {
            let mut scripts = self.scripts.lock().unwrap();
            match scripts.iter_mut().find(|s| s.verb == verb && s.path == path) {
                Some(script) if script.replies.len() > 1 => Some(script.replies.remove(0)),
                Some(script) => script.replies.first().cloned(),
                None => None,
            }
        };
        match reply {
            Some(Reply::Data(data)) => Ok(data),
            Some(Reply::Unauthorized) => Err(ApiError::Unauthorized),
            Some(Reply::Status(status, message)) => Err(ApiError::Status {
                status,
                message: message.to_string(),
            }),
            None if verb == Verb::Get => Ok(json!([])),
            None => Ok(Value::Null),
        }
    }
}

pub fn test_config() -> Config {
    Config {
        upstream_api_url: "http://upstream.test".to_string(),
        upstream_api_token: None,
        upstream_timeout: Duration::from_secs(5),
        session_idle_timeout: Duration::from_secs(3600),
        max_sessions: 64,
        port: 0,
        rust_log: "debug".to_string(),
    }
}

pub fn test_app(upstream: Arc<MockUpstream>) -> (Router, AppState) {
    let state = AppState::new(test_config(), upstream);
    (build_router(state.clone()), state)
}

pub async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    call_as(app, None, method, uri, body).await
}

/// Like [`call`], under the dashboard session named by `session`.
pub async fn call_as(
    app: &Router,
    session: Option<&str>,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(session) = session {
        builder = builder.header("x-desk-session", session);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send(app, request).await
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Multipart upload request with a `file` part and an optional `field` part.
pub fn multipart_upload(
    uri: &str,
    field: Option<&str>,
    filename: &str,
    content_type: &str,
    bytes: &[u8],
) -> Request<Body> {
    const BOUNDARY: &str = "desk-test-boundary";
    let mut body = Vec::new();
    if let Some(field) = field {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"field\"\r\n\r\n{field}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    call(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    call(app, Method::POST, uri, Some(body)).await
}

pub fn client_json(id: &str, company: &str, jobs: u32) -> Value {
    json!({
        "id": id,
        "name": format!("{company} Contact"),
        "email": format!("ops@{id}.example.com"),
        "company": company,
        "industry": "Technology",
        "jobsCount": jobs,
        "resourcesCount": 0
    })
}

pub fn role_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "department": "Engineering",
        "level": "Senior",
        "skillsRequired": ["React"],
        "experienceMin": 3,
        "experienceMax": 8
    })
}

pub fn job_json(id: &str, title: &str, client_id: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "clientId": client_id,
        "roleId": "1",
        "description": "Build things",
        "status": "Open"
    })
}

pub fn resource_json(id: &str, name: &str, job_id: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "phone": "555-0100",
        "jobId": job_id,
        "clientId": "1",
        "resourceType": "Direct",
        "interviewStatus": "Not Started",
        "experience": 4,
        "skills": ["React"]
    })
}

/// Scripts the reads behind the clients, jobs and resources levels.
pub fn seed_upstream(upstream: &MockUpstream) {
    upstream
        .data(
            Verb::Get,
            "/api/clients",
            json!([client_json("1", "TechCorp Inc", 5), client_json("2", "Innovate Solutions", 1)]),
        )
        .data(Verb::Get, "/api/roles", json!([role_json("1", "Senior Developer")]))
        .data(
            Verb::Get,
            "/api/jobs",
            json!([
                job_json("10", "Senior React Developer", "1"),
                job_json("20", "Project Manager", "2")
            ]),
        )
        .data(
            Verb::Get,
            "/api/vendors",
            json!([{ "id": "v1", "name": "ABC Staffing", "email": "hr@abc.example.com" }]),
        )
        .data(Verb::Get, "/api/resources", json!([resource_json("100", "Alice", "10")]));
}

/// Finds a row by id in a table page view.
pub fn row<'a>(view: &'a Value, id: &str) -> &'a Value {
    view["body"]["rows"]
        .as_array()
        .and_then(|rows| rows.iter().find(|r| r["id"] == id))
        .unwrap_or_else(|| panic!("no row {id} in {view}"))
}

pub fn cell<'a>(row: &'a Value, key: &str) -> &'a Value {
    row["cells"]
        .as_array()
        .and_then(|cells| cells.iter().find(|c| c["key"] == key))
        .unwrap_or_else(|| panic!("no cell {key} in {row}"))
}

pub fn breadcrumb_labels(view: &Value) -> Vec<String> {
    view["breadcrumbs"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i["label"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
