//! Where state updates go.
//!
//! The session layer pushes named values at a [`StateSink`]; the
//! concrete sink decides what happens to them (websocket, test
//! collector, nothing). Pushes are one-way and infallible from the
//! producer's point of view.

use cm_model::SubsurfaceModel;
use serde_json::Value;
use tracing::error;

use crate::client_state::ClientState;
use crate::keys::StateKey;

/// Receiver of client state updates.
pub trait StateSink {
    /// Publish one slot.
    fn push(&mut self, key: StateKey, value: Value);
}

/// Push the selected keys, capturing one projection for all of them.
pub fn push_keys<S: StateSink + ?Sized>(
    sink: &mut S,
    model: &SubsurfaceModel,
    keys: &[StateKey],
) {
    let state = ClientState::capture(model);
    let Ok(Value::Object(map)) = serde_json::to_value(&state) else {
        error!("client state projection did not serialize to an object");
        return;
    };
    for key in keys {
        match map.get(key.as_str()) {
            Some(value) => sink.push(*key, value.clone()),
            None => error!(key = %key, "client state has no such slot"),
        }
    }
}

/// Push keys given by wire name, logging the ones that do not exist.
pub fn push_named_keys<S: StateSink + ?Sized>(
    sink: &mut S,
    model: &SubsurfaceModel,
    names: &[&str],
) {
    let mut keys = Vec::with_capacity(names.len());
    for name in names {
        match StateKey::parse(name) {
            Some(key) => keys.push(key),
            None => error!(key = name, "cannot publish unknown state key"),
        }
    }
    push_keys(sink, model, &keys);
}

/// Push every slot.
pub fn push_all<S: StateSink + ?Sized>(sink: &mut S, model: &SubsurfaceModel) {
    push_keys(sink, model, &StateKey::ALL);
}

/// Sink that remembers every push, for tests and the CLI.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub pushes: Vec<(StateKey, Value)>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys pushed so far, in order.
    pub fn keys(&self) -> Vec<StateKey> {
        self.pushes.iter().map(|(key, _)| *key).collect()
    }

    /// Most recent value pushed for a key.
    pub fn last(&self, key: StateKey) -> Option<&Value> {
        self.pushes
            .iter()
            .rev()
            .find(|(pushed, _)| *pushed == key)
            .map(|(_, value)| value)
    }

    pub fn clear(&mut self) {
        self.pushes.clear();
    }
}

impl StateSink for CollectingSink {
    fn push(&mut self, key: StateKey, value: Value) {
        self.pushes.push((key, value));
    }
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl StateSink for NullSink {
    fn push(&mut self, _key: StateKey, _value: Value) {}
}
