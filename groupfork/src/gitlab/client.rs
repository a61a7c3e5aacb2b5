//! GitLab REST v4 implementation of [`RemoteDirectory`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, trace};

use super::RemoteDirectory;
use crate::error::ClientError;
use crate::models::{EntityDescriptor, EntityId, EntityKind, NewGroup};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const TOKEN_HEADER: &str = "PRIVATE-TOKEN";
const NEXT_PAGE_HEADER: &str = "x-next-page";
const PER_PAGE: &str = "100";

/// Group as returned by the groups API.
#[derive(Debug, Deserialize)]
struct GroupPayload {
    id: u64,
    name: String,
    path: String,
    #[serde(default)]
    description: Option<String>,
    full_path: String,
}

impl From<GroupPayload> for EntityDescriptor {
    fn from(group: GroupPayload) -> Self {
        Self {
            id: EntityId(group.id),
            kind: EntityKind::Group,
            name: group.name,
            path: group.path,
            description: group.description.unwrap_or_default(),
            full_path: group.full_path,
        }
    }
}

/// Project as returned by the projects API.
#[derive(Debug, Deserialize)]
struct ProjectPayload {
    id: u64,
    name: String,
    path: String,
    #[serde(default)]
    description: Option<String>,
    path_with_namespace: String,
}

impl From<ProjectPayload> for EntityDescriptor {
    fn from(project: ProjectPayload) -> Self {
        Self {
            id: EntityId(project.id),
            kind: EntityKind::Project,
            name: project.name,
            path: project.path,
            description: project.description.unwrap_or_default(),
            full_path: project.path_with_namespace,
        }
    }
}

/// HTTP client for a GitLab instance.
#[derive(Debug, Clone)]
pub struct GitLabClient {
    http: reqwest::Client,
    api_root: String,
    token: String,
}

impl GitLabClient {
    /// Create a client for the instance at `base_url` (e.g. `https://gitlab.com`).
    ///
    /// # Errors
    ///
    /// Fails if the URL is not http(s) or the HTTP client cannot be built.
    pub fn new(base_url: &Url, token: &str, timeout: Duration) -> Result<Self, ClientError> {
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl {
                url: base_url.to_string(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("groupfork/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_root: format!("{}/api/v4", base_url.as_str().trim_end_matches('/')),
            token: token.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.api_root)
    }

    /// Pass through success responses, map everything else to a [`ClientError`].
    async fn check(
        response: Response,
        method: &str,
        url: &str,
        resource: impl FnOnce() -> String,
    ) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                resource: resource(),
            });
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Status {
            method: method.to_string(),
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    async fn get_one<T: DeserializeOwned>(
        &self,
        path: &str,
        resource: impl FnOnce() -> String,
    ) -> Result<T, ClientError> {
        let url = self.endpoint(path);
        debug!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await?;
        let response = Self::check(response, "GET", &url, resource).await?;
        Ok(response.json().await?)
    }

    /// Fetch every page of a listing endpoint.
    async fn get_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        resource: impl Fn() -> String,
    ) -> Result<Vec<T>, ClientError> {
        let url = self.endpoint(path);
        let mut items = Vec::new();
        let mut page = "1".to_string();

        loop {
            debug!(%url, page = %page, "GET");
            let response = self
                .http
                .get(&url)
                .header(TOKEN_HEADER, &self.token)
                .query(query)
                .query(&[("per_page", PER_PAGE), ("page", page.as_str())])
                .send()
                .await?;
            let response = Self::check(response, "GET", &url, &resource).await?;

            let next_page = response
                .headers()
                .get(NEXT_PAGE_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string);

            let batch: Vec<T> = response.json().await?;
            trace!(%url, count = batch.len(), "page received");
            items.extend(batch);

            match next_page {
                Some(next) => page = next,
                None => break,
            }
        }

        Ok(items)
    }

    async fn post<B: serde::Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        resource: impl FnOnce() -> String,
    ) -> Result<T, ClientError> {
        let url = self.endpoint(path);
        debug!(%url, "POST");

        let response = self
            .http
            .post(&url)
            .header(TOKEN_HEADER, &self.token)
            .json(body)
            .send()
            .await?;
        let response = Self::check(response, "POST", &url, resource).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl RemoteDirectory for GitLabClient {
    async fn lookup_group(&self, path_or_id: &str) -> Result<EntityDescriptor, ClientError> {
        let path = format!("groups/{}", urlencoding::encode(path_or_id));
        let group: GroupPayload = self
            .get_one(&path, || format!("group '{path_or_id}'"))
            .await?;
        Ok(group.into())
    }

    async fn list_subgroups(&self, group: EntityId) -> Result<Vec<EntityDescriptor>, ClientError> {
        let path = format!("groups/{group}/subgroups");
        let groups: Vec<GroupPayload> = self
            .get_all(&path, &[("all_available", "true")], || format!("group {group}"))
            .await?;
        Ok(groups.into_iter().map(Into::into).collect())
    }

    async fn create_group(&self, request: &NewGroup) -> Result<EntityDescriptor, ClientError> {
        let group: GroupPayload = self
            .post("groups", request, || {
                request.parent_id.map_or_else(
                    || "groups endpoint".to_string(),
                    |parent| format!("parent group {parent}"),
                )
            })
            .await?;
        Ok(group.into())
    }

    async fn list_projects(&self, group: EntityId) -> Result<Vec<EntityDescriptor>, ClientError> {
        let path = format!("groups/{group}/projects");
        let projects: Vec<ProjectPayload> = self
            .get_all(&path, &[("with_shared", "false")], || format!("group {group}"))
            .await?;
        Ok(projects.into_iter().map(Into::into).collect())
    }

    async fn fork_project(
        &self,
        project: EntityId,
        namespace: EntityId,
    ) -> Result<EntityDescriptor, ClientError> {
        let path = format!("projects/{project}/fork");
        let body = serde_json::json!({ "namespace_id": namespace });
        let fork: ProjectPayload = self
            .post(&path, &body, || format!("project {project}"))
            .await?;
        Ok(fork.into())
    }
}
