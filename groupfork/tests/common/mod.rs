//! Mock GitLab API helpers.
//!
//! Each helper mounts one endpoint on a wiremock server with a response
//! shaped like the GitLab REST v4 API.

#![allow(dead_code)]

use groupfork::gitlab::{GitLabClient, DEFAULT_TIMEOUT};
use reqwest::Url;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const TOKEN: &str = "test-token";

/// Client pointed at the mock server.
pub fn client(server: &MockServer) -> GitLabClient {
    let base = Url::parse(&server.uri()).unwrap();
    GitLabClient::new(&base, TOKEN, DEFAULT_TIMEOUT).unwrap()
}

/// Group JSON with name = uppercased path.
pub fn group(id: u64, full_path: &str) -> Value {
    let path = full_path.rsplit('/').next().unwrap_or(full_path);
    json!({
        "id": id,
        "name": path.to_uppercase(),
        "path": path,
        "description": null,
        "full_path": full_path,
    })
}

/// Project JSON with name = path.
pub fn project(id: u64, path_with_namespace: &str) -> Value {
    let path = path_with_namespace
        .rsplit('/')
        .next()
        .unwrap_or(path_with_namespace);
    json!({
        "id": id,
        "name": path,
        "path": path,
        "description": "",
        "path_with_namespace": path_with_namespace,
    })
}

/// `GET /groups/:id` answering with `body`.
pub async fn mock_group(server: &MockServer, id_or_encoded_path: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v4/groups/{id_or_encoded_path}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// `GET /groups/:id/subgroups` answering with a single page.
pub async fn mock_subgroups(server: &MockServer, id: u64, groups: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v4/groups/{id}/subgroups")))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(groups)))
        .mount(server)
        .await;
}

/// `GET /groups/:id/projects` answering with a single page.
pub async fn mock_projects(server: &MockServer, id: u64, projects: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v4/groups/{id}/projects")))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(projects)))
        .mount(server)
        .await;
}

/// `POST /groups` for the group with the given path, answering with `body`.
pub async fn mock_create_group(server: &MockServer, group_path: &str, body: Value) {
    Mock::given(method("POST"))
        .and(path("/api/v4/groups"))
        .and(body_partial_json(json!({ "path": group_path })))
        .respond_with(ResponseTemplate::new(201).set_body_json(body))
        .mount(server)
        .await;
}

/// `POST /projects/:id/fork` answering with `body`.
pub async fn mock_fork(server: &MockServer, project_id: u64, body: Value) {
    Mock::given(method("POST"))
        .and(path(format!("/api/v4/projects/{project_id}/fork")))
        .respond_with(ResponseTemplate::new(201).set_body_json(body))
        .mount(server)
        .await;
}

/// Requests received so far with the given method, in arrival order.
pub async fn requests_with_method(server: &MockServer, verb: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.method.to_string() == verb)
        .collect()
}

/// JSON body of a request.
pub fn body(request: &Request) -> Value {
    serde_json::from_slice(&request.body).unwrap()
}
