//! Recording [`HttpClient`] for unit tests

use crate::http::{HttpClient, MultipartBody};
use crate::session::{MemorySessionStore, SessionStore};
use crate::{ClientError, ClientResult};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Value,
}

/// Answers calls from a queue and records what was sent
#[derive(Default)]
pub struct MockHttp {
    pub calls: Mutex<Vec<Call>>,
    replies: Mutex<VecDeque<ClientResult<Value>>>,
    pub session: MemorySessionStore,
}

impl MockHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, value: Value) -> Self {
        self.replies.lock().unwrap().push_back(Ok(value));
        self
    }

    pub fn fail(self, status: u16, message: Option<&str>) -> Self {
        self.replies.lock().unwrap().push_back(Err(ClientError::Api {
            status,
            message: message.map(str::to_string),
        }));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn answer<T: DeserializeOwned>(&self, method: &'static str, path: &str, body: Value) -> ClientResult<T> {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            body,
        });
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Value::Null))?;
        Ok(serde_json::from_value(reply)?)
    }
}

#[async_trait]
impl HttpClient for MockHttp {
    async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T> {
        self.answer("GET", path, Value::Null)
    }

    async fn get_query<T: DeserializeOwned + Send, Q: Serialize + Sync>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        self.answer("GET", path, serde_json::to_value(query)?)
    }

    async fn post<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.answer("POST", path, serde_json::to_value(body)?)
    }

    async fn patch<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.answer("PATCH", path, serde_json::to_value(body)?)
    }

    async fn delete<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T> {
        self.answer("DELETE", path, Value::Null)
    }

    async fn post_multipart<T: DeserializeOwned + Send>(
        &self,
        path: &str,
        body: &MultipartBody,
    ) -> ClientResult<T> {
        let fields: serde_json::Map<String, Value> = body
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        self.answer("POST", path, Value::Object(fields))
    }

    fn session(&self) -> &dyn SessionStore {
        &self.session
    }
}
