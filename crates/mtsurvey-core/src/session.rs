// crates/mtsurvey-core/src/session.rs

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use uuid::Uuid;

/// All instrument state hangs below this namespace inside a session,
/// mirroring the `session -> "adu" -> channel -> kind -> field` layout the
/// configuration wizard reads.
pub const ADU_NAMESPACE: &str = "adu";

/// One field map per (channel, entity kind) slot.
pub type FieldMap = HashMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    FileTags,
    Header,
    SensorCalibration,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::FileTags => "file_tags",
            EntityKind::Header => "header",
            EntityKind::SensorCalibration => "sensor_calibration",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque per-user session identity. Hosts that already have a session id
/// wrap it with `new`; everyone else mints one with `random`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        SessionId(id.into())
    }

    pub fn random() -> Self {
        SessionId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One user's in-progress configuration: channel number -> entity kind ->
/// field -> value. The store owns the durable values; entity records are
/// disposable projections of these maps.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    channels: HashMap<i64, HashMap<EntityKind, FieldMap>>,
}

impl SessionState {
    pub fn get(&self, channel_no: i64, kind: EntityKind, field: &str) -> Option<&Value> {
        self.channels
            .get(&channel_no)
            .and_then(|slots| slots.get(&kind))
            .and_then(|fields| fields.get(field))
    }

    pub fn set(&mut self, channel_no: i64, kind: EntityKind, field: &str, value: Value) {
        self.channels
            .entry(channel_no)
            .or_default()
            .entry(kind)
            .or_default()
            .insert(field.to_string(), value);
    }

    /// The no-clobber primitive: writes only when the field is absent.
    /// Returns true when the value was actually stored.
    pub fn set_if_absent(
        &mut self,
        channel_no: i64,
        kind: EntityKind,
        field: &str,
        value: Value,
    ) -> bool {
        let fields = self
            .channels
            .entry(channel_no)
            .or_default()
            .entry(kind)
            .or_default();
        if fields.contains_key(field) {
            return false;
        }
        fields.insert(field.to_string(), value);
        true
    }

    pub fn exists(&self, channel_no: i64, kind: EntityKind, field: &str) -> bool {
        self.get(channel_no, kind, field).is_some()
    }

    /// Channels with any state at all, sorted for stable wizard iteration.
    pub fn channel_numbers(&self) -> Vec<i64> {
        let mut numbers: Vec<i64> = self.channels.keys().copied().collect();
        numbers.sort_unstable();
        numbers
    }

    pub fn clear_channel(&mut self, channel_no: i64) {
        self.channels.remove(&channel_no);
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Diagnostic path of a field, e.g. `adu/2/header/angle`.
    pub fn key_path(channel_no: i64, kind: EntityKind, field: &str) -> String {
        format!("{ADU_NAMESPACE}/{channel_no}/{kind}/{field}")
    }
}

/// Process-scoped map of all live sessions. Handed around by `&mut`, so a
/// single-threaded host gets the original request-at-a-time semantics for
/// free; a concurrent host must put its own lock around each session.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<SessionId, SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_mut(&mut self, id: &SessionId) -> &mut SessionState {
        self.sessions.entry(id.clone()).or_default()
    }

    pub fn session(&self, id: &SessionId) -> Option<&SessionState> {
        self.sessions.get(id)
    }

    /// Session teardown drops every per-channel slot at once.
    pub fn end_session(&mut self, id: &SessionId) -> Option<SessionState> {
        tracing::debug!(session = %id, "ending session");
        self.sessions.remove(id)
    }

    pub fn get(
        &self,
        id: &SessionId,
        channel_no: i64,
        kind: EntityKind,
        field: &str,
    ) -> Option<&Value> {
        self.sessions
            .get(id)
            .and_then(|state| state.get(channel_no, kind, field))
    }

    pub fn set(
        &mut self,
        id: &SessionId,
        channel_no: i64,
        kind: EntityKind,
        field: &str,
        value: Value,
    ) {
        self.session_mut(id).set(channel_no, kind, field, value);
    }

    pub fn exists(&self, id: &SessionId, channel_no: i64, kind: EntityKind, field: &str) -> bool {
        self.get(id, channel_no, kind, field).is_some()
    }
}
