// crates/mtsurvey-core/src/mirror.rs
//
// The one field-mirroring mechanism shared by all entity kinds: probe the
// session slot for a presence field, seed defaults + explicit overrides with
// a no-clobber merge when the slot is empty, rehydrate stored fields over
// the defaults when it is not.

use serde_json::Value;
use tracing::{debug, warn};

use crate::coerce;
use crate::error::{Result, SurveyError};
use crate::session::{EntityKind, FieldMap, SessionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Float,
    Text,
    FloatList,
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub default_value: Value,
}

/// Which path `load_or_init` took, so callers and tests can tell a fresh
/// seed from a rehydration deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Initialized,
    Loaded,
}

/// Legacy wizard input is never rejected: junk sent to a numeric field
/// degrades to its zero-equivalent and bad setter input is a silent no-op.
/// `Strict` turns both into `SurveyError::Coercion` for new integrations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CoercionMode {
    #[default]
    Permissive,
    Strict,
}

/// Binds a record type to its session slot: entity-kind tag, presence
/// field, field definition table and the map -> struct projection.
pub trait SessionRecord: Sized {
    const KIND: EntityKind;
    /// Field whose presence marks this channel's slot as already seeded.
    const PRESENCE_FIELD: &'static str;

    fn definitions() -> Vec<FieldDef>;
    fn from_fields(channel_no: i64, fields: &FieldMap, mode: CoercionMode) -> Self;
}

/// Built-in defaults of a record kind as a field map.
pub fn default_fields<R: SessionRecord>() -> FieldMap {
    R::definitions()
        .into_iter()
        .map(|def| (def.name.to_string(), def.default_value))
        .collect()
}

pub fn load_or_init<R: SessionRecord>(
    session: &mut SessionState,
    channel_no: i64,
    overrides: &FieldMap,
    mode: CoercionMode,
) -> Result<(R, Provenance)> {
    let defs = R::definitions();
    let mut fields = default_fields::<R>();

    if session.exists(channel_no, R::KIND, R::PRESENCE_FIELD) {
        // Rehydrate: every stored field wins over its default; fields the
        // store never saw stay at the default just initialized.
        for def in &defs {
            if let Some(stored) = session.get(channel_no, R::KIND, def.name) {
                let value = coerce_field(def, stored, CoercionMode::Permissive)?;
                fields.insert(def.name.to_string(), value);
            }
        }
        debug!(channel = channel_no, kind = %R::KIND, "rehydrated from session");
        Ok((R::from_fields(channel_no, &fields, mode), Provenance::Loaded))
    } else {
        for (name, raw) in overrides {
            match defs.iter().find(|def| def.name == name.as_str()) {
                Some(def) => {
                    let value = coerce_field(def, raw, mode)?;
                    fields.insert(def.name.to_string(), value);
                }
                None => {
                    warn!(channel = channel_no, kind = %R::KIND, field = %name,
                        "ignoring unknown field override");
                }
            }
        }
        for def in &defs {
            if let Some(value) = fields.get(def.name) {
                session.set_if_absent(channel_no, R::KIND, def.name, value.clone());
            }
        }
        debug!(channel = channel_no, kind = %R::KIND, "seeded session slot");
        Ok((R::from_fields(channel_no, &fields, mode), Provenance::Initialized))
    }
}

fn coerce_field(def: &FieldDef, raw: &Value, mode: CoercionMode) -> Result<Value> {
    match coerce::convert(def.kind, raw) {
        Some(value) => Ok(value),
        None => match mode {
            CoercionMode::Permissive => {
                warn!(field = def.name, raw = %raw, "unusable value degraded to zero-equivalent");
                Ok(coerce::zero_equivalent(def.kind))
            }
            CoercionMode::Strict => Err(SurveyError::Coercion {
                field: def.name.to_string(),
                kind: def.kind,
                value: raw.to_string(),
            }),
        },
    }
}

// Permissive projections used by the record types when reading their field
// maps back into typed struct fields.

pub fn int_field(fields: &FieldMap, name: &str) -> i64 {
    fields.get(name).and_then(coerce::value_to_i64).unwrap_or(0)
}

pub fn float_field(fields: &FieldMap, name: &str) -> f64 {
    fields
        .get(name)
        .and_then(coerce::value_to_f64)
        .unwrap_or(0.0)
}

pub fn text_field(fields: &FieldMap, name: &str) -> String {
    fields.get(name).map(coerce::value_to_string).unwrap_or_default()
}

pub fn float_list_field(fields: &FieldMap, name: &str) -> Vec<f64> {
    fields
        .get(name)
        .and_then(coerce::value_to_f64_list)
        .unwrap_or_default()
}
