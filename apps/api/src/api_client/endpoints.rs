use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::{ApiError, Transport, Verb};
use crate::forms::Draft;
use crate::models::{AccessRole, Client, InterviewRound, Job, Resource, Role, User, Vendor};

fn decode_list<T: DeserializeOwned>(data: Value) -> Result<Vec<T>, ApiError> {
    if data.is_null() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_value(data)?)
}

/// Entry point to the upstream API: one typed client per collection.
#[derive(Clone)]
pub struct StaffingApi {
    transport: Arc<dyn Transport>,
}

impl StaffingApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    fn entity<T>(&self, base: &'static str) -> EntityApi<T> {
        EntityApi {
            transport: self.transport.clone(),
            base,
            _entity: PhantomData,
        }
    }

    pub fn clients(&self) -> EntityApi<Client> {
        self.entity("/api/clients")
    }

    pub fn jobs(&self) -> EntityApi<Job> {
        self.entity("/api/jobs")
    }

    pub fn resources(&self) -> EntityApi<Resource> {
        self.entity("/api/resources")
    }

    pub fn vendors(&self) -> EntityApi<Vendor> {
        self.entity("/api/vendors")
    }

    pub fn roles(&self) -> EntityApi<Role> {
        self.entity("/api/roles")
    }

    pub fn rounds(&self) -> RoundsApi {
        RoundsApi {
            transport: self.transport.clone(),
        }
    }

    pub fn users(&self) -> UsersApi {
        UsersApi {
            transport: self.transport.clone(),
        }
    }
}

/// CRUD client for one collection. Create and update return the raw
/// response data because the upstream often answers with only part of the
/// entity; callers merge it with what they sent.
pub struct EntityApi<T> {
    transport: Arc<dyn Transport>,
    base: &'static str,
    _entity: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> EntityApi<T> {
    pub async fn list(&self) -> Result<Vec<T>, ApiError> {
        let data = self.transport.send(Verb::Get, self.base, None).await?;
        decode_list(data)
    }

    pub async fn get(&self, id: &str) -> Result<T, ApiError> {
        let path = format!("{}/{id}", self.base);
        let data = self.transport.send(Verb::Get, &path, None).await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn create(&self, body: &Draft) -> Result<Value, ApiError> {
        self.transport
            .send(Verb::Post, self.base, Some(Value::Object(body.clone())))
            .await
    }

    pub async fn update(&self, id: &str, body: &Draft) -> Result<Value, ApiError> {
        let path = format!("{}/{id}", self.base);
        self.transport
            .send(Verb::Patch, &path, Some(Value::Object(body.clone())))
            .await
    }

    pub async fn remove(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("{}/{id}", self.base);
        self.transport.send(Verb::Delete, &path, None).await?;
        Ok(())
    }
}

pub struct RoundsApi {
    transport: Arc<dyn Transport>,
}

impl RoundsApi {
    pub async fn list_for(&self, resource_id: &str) -> Result<Vec<InterviewRound>, ApiError> {
        let path = format!("/api/resources/{resource_id}/rounds");
        let data = self.transport.send(Verb::Get, &path, None).await?;
        decode_list(data)
    }

    pub async fn create(&self, body: &Draft) -> Result<Value, ApiError> {
        self.transport
            .send(Verb::Post, "/api/rounds", Some(Value::Object(body.clone())))
            .await
    }

    pub async fn update(&self, id: &str, body: &Draft) -> Result<Value, ApiError> {
        let path = format!("/api/rounds/{id}");
        self.transport
            .send(Verb::Patch, &path, Some(Value::Object(body.clone())))
            .await
    }

    pub async fn remove(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("/api/rounds/{id}");
        self.transport.send(Verb::Delete, &path, None).await?;
        Ok(())
    }
}

pub struct UsersApi {
    transport: Arc<dyn Transport>,
}

impl UsersApi {
    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        let data = self.transport.send(Verb::Get, "/api/users", None).await?;
        decode_list(data)
    }

    /// Grants one role. The upstream takes the role code under `roleId`.
    pub async fn assign_role(&self, user_id: &str, role: AccessRole) -> Result<Value, ApiError> {
        let path = format!("/api/users/{user_id}/assign-role");
        self.transport
            .send(Verb::Post, &path, Some(json!({ "roleId": role.code() })))
            .await
    }
}
