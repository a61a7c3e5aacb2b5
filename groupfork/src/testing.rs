//! In-memory [`RemoteDirectory`] for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ClientError;
use crate::gitlab::RemoteDirectory;
use crate::mirror::{MirrorEvent, MirrorObserver};
use crate::models::{EntityDescriptor, EntityId, NewGroup};

/// A recorded call against the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    LookupGroup(String),
    ListSubgroups(EntityId),
    CreateGroup(NewGroup),
    ListProjects(EntityId),
    ForkProject { project: EntityId, namespace: EntityId },
}

#[derive(Default)]
struct State {
    groups: HashMap<EntityId, EntityDescriptor>,
    parents: HashMap<EntityId, EntityId>,
    subgroups: HashMap<EntityId, Vec<EntityId>>,
    projects: HashMap<EntityId, Vec<EntityDescriptor>>,
    next_id: u64,
    calls: Vec<Call>,
    failing_listings: HashSet<EntityId>,
    failing_creates: HashSet<String>,
    failing_forks: HashSet<EntityId>,
}

/// Fake group/project directory that records every call.
pub struct FakeDirectory {
    state: Mutex<State>,
}

fn rejected(message: &str) -> ClientError {
    ClientError::Status {
        method: "POST".to_string(),
        url: "fake".to_string(),
        status: 400,
        body: message.to_string(),
    }
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 1000,
                ..State::default()
            }),
        }
    }

    /// Register a top-level group.
    pub fn add_root(&self, id: u64, path: &str) -> EntityId {
        let mut state = self.state.lock().unwrap();
        let descriptor = EntityDescriptor::group(id, &path.to_uppercase(), path)
            .with_description(format!("{path} group"));
        state.groups.insert(EntityId(id), descriptor);
        EntityId(id)
    }

    /// Register a subgroup under `parent`.
    pub fn add_group(&self, parent: EntityId, id: u64, path: &str) -> EntityId {
        let mut state = self.state.lock().unwrap();
        let parent_path = state.groups[&parent].full_path.clone();
        let descriptor = EntityDescriptor::group(id, &path.to_uppercase(), path)
            .with_full_path(format!("{parent_path}/{path}"));
        state.groups.insert(EntityId(id), descriptor);
        state.parents.insert(EntityId(id), parent);
        state.subgroups.entry(parent).or_default().push(EntityId(id));
        EntityId(id)
    }

    /// Register a project inside `group`.
    pub fn add_project(&self, group: EntityId, id: u64, path: &str) -> EntityId {
        let mut state = self.state.lock().unwrap();
        let group_path = state.groups[&group].full_path.clone();
        let project = EntityDescriptor::project(id, path, path)
            .with_full_path(format!("{group_path}/{path}"));
        state.projects.entry(group).or_default().push(project);
        EntityId(id)
    }

    pub fn fail_subgroup_listing(&self, group: EntityId) {
        self.state.lock().unwrap().failing_listings.insert(group);
    }

    pub fn fail_create(&self, path: &str) {
        self.state.lock().unwrap().failing_creates.insert(path.to_string());
    }

    pub fn fail_fork(&self, project: EntityId) {
        self.state.lock().unwrap().failing_forks.insert(project);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn created_groups(&self) -> Vec<NewGroup> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::CreateGroup(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn forks(&self) -> Vec<(EntityId, EntityId)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::ForkProject { project, namespace } => Some((project, namespace)),
                _ => None,
            })
            .collect()
    }

    /// Whether any call other than a lookup or listing was made.
    pub fn has_writes(&self) -> bool {
        self.calls()
            .iter()
            .any(|call| matches!(call, Call::CreateGroup(_) | Call::ForkProject { .. }))
    }
}

#[async_trait]
impl RemoteDirectory for FakeDirectory {
    async fn lookup_group(&self, path_or_id: &str) -> Result<EntityDescriptor, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::LookupGroup(path_or_id.to_string()));
        state
            .groups
            .values()
            .find(|group| group.full_path == path_or_id || group.id.to_string() == path_or_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound {
                resource: format!("group '{path_or_id}'"),
            })
    }

    async fn list_subgroups(&self, group: EntityId) -> Result<Vec<EntityDescriptor>, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListSubgroups(group));
        if state.failing_listings.contains(&group) {
            return Err(rejected("listing failed"));
        }
        let children = state.subgroups.get(&group).cloned().unwrap_or_default();
        Ok(children.iter().map(|id| state.groups[id].clone()).collect())
    }

    async fn create_group(&self, request: &NewGroup) -> Result<EntityDescriptor, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateGroup(request.clone()));

        if state.failing_creates.contains(&request.path) {
            return Err(rejected("create failed"));
        }

        let full_path = match request.parent_id {
            Some(parent) => {
                let parent_group = state.groups.get(&parent).ok_or_else(|| ClientError::NotFound {
                    resource: format!("parent group {parent}"),
                })?;
                format!("{}/{}", parent_group.full_path, request.path)
            }
            None => request.path.clone(),
        };
        if state.groups.values().any(|group| group.full_path == full_path) {
            return Err(rejected("Path has already been taken"));
        }

        state.next_id += 1;
        let id = EntityId(state.next_id);
        let descriptor = EntityDescriptor::group(id, &request.name, &request.path)
            .with_full_path(full_path)
            .with_description(request.description.clone().unwrap_or_default());
        state.groups.insert(id, descriptor.clone());
        if let Some(parent) = request.parent_id {
            state.parents.insert(id, parent);
            state.subgroups.entry(parent).or_default().push(id);
        }
        Ok(descriptor)
    }

    async fn list_projects(&self, group: EntityId) -> Result<Vec<EntityDescriptor>, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListProjects(group));
        Ok(state.projects.get(&group).cloned().unwrap_or_default())
    }

    async fn fork_project(
        &self,
        project: EntityId,
        namespace: EntityId,
    ) -> Result<EntityDescriptor, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ForkProject { project, namespace });
        if state.failing_forks.contains(&project) {
            return Err(rejected("fork failed"));
        }

        let source = state
            .projects
            .values()
            .flatten()
            .find(|candidate| candidate.id == project)
            .cloned()
            .ok_or_else(|| ClientError::NotFound {
                resource: format!("project {project}"),
            })?;
        let namespace_path = state.groups[&namespace].full_path.clone();

        state.next_id += 1;
        let fork = EntityDescriptor::project(state.next_id, &source.name, &source.path)
            .with_full_path(format!("{namespace_path}/{}", source.path));
        state.projects.entry(namespace).or_default().push(fork.clone());
        Ok(fork)
    }
}

/// Observer that keeps every event.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<MirrorEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<MirrorEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl MirrorObserver for RecordingObserver {
    fn notify(&self, event: &MirrorEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
