//! Recording fake connector shared by the integration tests.
//!
//! Seeded objects are returned by filtered lookups; created and updated
//! payloads are stored under their reference so by-reference reads see them.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dtc_object_manager::connector::Result;
use dtc_object_manager::{Connector, ConnectorError, ObjectManager, QueryParams};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get {
        object_type: String,
        reference: Option<String>,
        query: QueryParams,
    },
    Create {
        object_type: String,
        payload: Value,
    },
    Update {
        reference: String,
        payload: Value,
    },
    Delete {
        reference: String,
    },
}

impl Call {
    pub fn is_write(&self) -> bool {
        !matches!(self, Call::Get { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Get,
    Create,
    Update,
    Delete,
}

#[derive(Default)]
pub struct FakeConnector {
    calls: Mutex<Vec<Call>>,
    listings: Mutex<HashMap<String, Vec<Value>>>,
    stored: Mutex<HashMap<String, Value>>,
    renamed: Mutex<HashMap<String, String>>,
    fail_on: Mutex<Option<FailOn>>,
}

impl FakeConnector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make `name` resolvable under `object_type`; returns its reference.
    pub fn seed(&self, object_type: &str, name: &str) -> String {
        let reference = format!("{object_type}/ZG5z:{name}");
        self.seed_object(object_type, json!({ "_ref": reference, "name": name }));
        reference
    }

    pub fn seed_object(&self, object_type: &str, object: Value) {
        if let Some(reference) = object.get("_ref").and_then(Value::as_str) {
            self.stored
                .lock()
                .unwrap()
                .insert(reference.to_string(), object.clone());
        }
        self.listings
            .lock()
            .unwrap()
            .entry(object_type.to_string())
            .or_default()
            .push(object);
    }

    /// Updates against `old` answer with `new`, as the store does after a rename.
    pub fn rename_on_update(&self, old: &str, new: &str) {
        self.renamed
            .lock()
            .unwrap()
            .insert(old.to_string(), new.to_string());
    }

    pub fn fail_on(&self, operation: FailOn) {
        *self.fail_on.lock().unwrap() = Some(operation);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    /// Object types looked up without a reference, in call order.
    pub fn lookups(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Get {
                    object_type,
                    reference: None,
                    ..
                } => Some(object_type),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, operation: FailOn) -> Result<()> {
        if *self.fail_on.lock().unwrap() == Some(operation) {
            return Err(ConnectorError::Status {
                status: 503,
                body: "service unavailable".into(),
            });
        }
        Ok(())
    }
}

fn matches_query(object: &Value, query: &QueryParams) -> bool {
    query.search_fields.iter().all(|(field, expected)| {
        object.get(field).and_then(Value::as_str) == Some(expected.as_str())
    })
}

fn with_reference(mut payload: Value, reference: &str) -> Value {
    if let Value::Object(map) = &mut payload {
        map.insert("_ref".into(), json!(reference));
    }
    payload
}

#[async_trait]
impl Connector for FakeConnector {
    async fn get_object(
        &self,
        object_type: &str,
        reference: Option<&str>,
        _return_fields: &[&str],
        query: &QueryParams,
    ) -> Result<Vec<Value>> {
        self.record(Call::Get {
            object_type: object_type.to_string(),
            reference: reference.map(str::to_string),
            query: query.clone(),
        });
        self.check(FailOn::Get)?;

        if let Some(reference) = reference {
            return Ok(self
                .stored
                .lock()
                .unwrap()
                .get(reference)
                .cloned()
                .into_iter()
                .collect());
        }
        Ok(self
            .listings
            .lock()
            .unwrap()
            .get(object_type)
            .map(|objects| {
                objects
                    .iter()
                    .filter(|object| matches_query(object, query))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create_object(&self, object_type: &str, payload: Value) -> Result<String> {
        self.record(Call::Create {
            object_type: object_type.to_string(),
            payload: payload.clone(),
        });
        self.check(FailOn::Create)?;

        let name = payload
            .get("name")
            .or_else(|| payload.get("fqdn"))
            .and_then(Value::as_str)
            .unwrap_or("unnamed");
        let reference = format!("{object_type}/ZG5z:{name}");
        self.stored
            .lock()
            .unwrap()
            .insert(reference.clone(), with_reference(payload, &reference));
        Ok(reference)
    }

    async fn update_object(&self, reference: &str, payload: Value) -> Result<String> {
        self.record(Call::Update {
            reference: reference.to_string(),
            payload: payload.clone(),
        });
        self.check(FailOn::Update)?;

        let new_reference = self
            .renamed
            .lock()
            .unwrap()
            .get(reference)
            .cloned()
            .unwrap_or_else(|| reference.to_string());
        let mut stored = self.stored.lock().unwrap();
        let mut merged = stored.remove(reference).unwrap_or_else(|| json!({}));
        if let (Value::Object(target), Value::Object(fields)) = (&mut merged, payload) {
            target.extend(fields);
        }
        stored.insert(new_reference.clone(), with_reference(merged, &new_reference));
        Ok(new_reference)
    }

    async fn delete_object(&self, reference: &str) -> Result<String> {
        self.record(Call::Delete {
            reference: reference.to_string(),
        });
        self.check(FailOn::Delete)?;

        self.stored.lock().unwrap().remove(reference);
        Ok(reference.to_string())
    }
}

pub fn manager(connector: &Arc<FakeConnector>) -> ObjectManager {
    ObjectManager::new(connector.clone())
}
