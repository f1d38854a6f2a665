// crates/mtsurvey-core/src/metadata/file_tags.rs

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;
use crate::mirror::{self, CoercionMode, FieldDef, FieldKind, Provenance, SessionRecord};
use crate::session::{EntityKind, FieldMap, SessionState};

/// The per-channel recording tags that end up in a time-series file name:
/// recorder serial and system, channel number, run counter, channel type
/// (Ex, Ey, Hx, ...) and sample rate in Hz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelFileTags {
    pub channel_no: i64,
    pub serial: i64,
    pub system: String,
    pub run: i64,
    pub channel_type: String,
    pub sample_rate: f64,
    #[serde(skip)]
    mode: CoercionMode,
}

impl SessionRecord for ChannelFileTags {
    const KIND: EntityKind = EntityKind::FileTags;
    const PRESENCE_FIELD: &'static str = "channel_type";

    fn definitions() -> Vec<FieldDef> {
        use FieldKind::{Float, Integer, Text};

        vec![
            FieldDef {
                name: "serial",
                kind: Integer,
                default_value: json!(0),
            },
            FieldDef {
                name: "system",
                kind: Text,
                default_value: json!(""),
            },
            FieldDef {
                name: "channel_no",
                kind: Integer,
                default_value: json!(-1),
            },
            FieldDef {
                name: "run",
                kind: Integer,
                default_value: json!(0),
            },
            FieldDef {
                name: "channel_type",
                kind: Text,
                default_value: json!(""),
            },
            FieldDef {
                name: "sample_rate",
                kind: Float,
                default_value: json!(0.0),
            },
        ]
    }

    fn from_fields(channel_no: i64, fields: &FieldMap, mode: CoercionMode) -> Self {
        Self {
            channel_no,
            serial: mirror::int_field(fields, "serial"),
            system: mirror::text_field(fields, "system"),
            run: mirror::int_field(fields, "run"),
            channel_type: mirror::text_field(fields, "channel_type"),
            sample_rate: mirror::float_field(fields, "sample_rate"),
            mode,
        }
    }
}

impl ChannelFileTags {
    pub fn load_or_init(
        session: &mut SessionState,
        channel_no: i64,
    ) -> Result<(Self, Provenance)> {
        Self::load_or_init_with(session, channel_no, &FieldMap::new(), CoercionMode::default())
    }

    pub fn load_or_init_with(
        session: &mut SessionState,
        channel_no: i64,
        overrides: &FieldMap,
        mode: CoercionMode,
    ) -> Result<(Self, Provenance)> {
        // The channel number doubles as a mirrored field of this kind; the
        // identity argument wins unless the caller overrode it explicitly.
        let mut overrides = overrides.clone();
        overrides
            .entry("channel_no".to_string())
            .or_insert_with(|| json!(channel_no));
        mirror::load_or_init(session, channel_no, &overrides, mode)
    }

    pub fn defaults(channel_no: i64) -> Self {
        Self::from_fields(
            channel_no,
            &mirror::default_fields::<Self>(),
            CoercionMode::default(),
        )
    }

    /// Restores built-in defaults without touching the session.
    pub fn reset(&mut self) {
        let mode = self.mode;
        *self = Self::from_fields(self.channel_no, &mirror::default_fields::<Self>(), mode);
    }

    /// "256Hz" above 1 Hz, "4s" as a rounded period below, "failed" for a
    /// rate that never got configured.
    pub fn sample_rate_label(&self) -> String {
        if self.sample_rate > 0.99 {
            format!("{}Hz", self.sample_rate.round() as i64)
        } else if self.sample_rate > 0.0 {
            format!("{}s", (1.0 / self.sample_rate).round() as i64)
        } else {
            "failed".to_string()
        }
    }

    /// Canonical file stem, e.g. `084_ADU-08e_C002_R000_THx_256Hz`.
    /// String derivation only; nothing is written to disk here.
    pub fn file_stem(&self) -> String {
        format!(
            "{:03}_{}_C{:03}_R{:03}_T{}_{}",
            self.serial,
            self.system,
            self.channel_no,
            self.run,
            self.channel_type,
            self.sample_rate_label()
        )
    }
}
