// crates/mtsurvey-core/src/metadata/calibration.rs

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{Result, SurveyError};
use crate::mirror::{self, CoercionMode, FieldDef, FieldKind, Provenance, SessionRecord};
use crate::session::{EntityKind, FieldMap, SessionState};

/// Frequency response of the sensor attached to one channel: identity
/// (sensor name, serial, chopper flag), unit tags and the piecewise
/// calibration curve as three parallel sequences. The curve is
/// frequency-sorted by convention, not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorCalibration {
    pub channel_no: i64,
    pub sensor: String,
    pub serial: String,
    pub chopper: i64,
    pub units_amplitude: String,
    pub units_frequency: String,
    pub units_phase: String,
    pub date: String,
    pub time: String,
    pub operator: String,
    pub f: Vec<f64>,
    pub a: Vec<f64>,
    pub p: Vec<f64>,
    #[serde(skip)]
    mode: CoercionMode,
}

impl SessionRecord for SensorCalibration {
    const KIND: EntityKind = EntityKind::SensorCalibration;
    const PRESENCE_FIELD: &'static str = "sensor";

    fn definitions() -> Vec<FieldDef> {
        use FieldKind::{FloatList, Integer, Text};

        vec![
            FieldDef {
                name: "sensor",
                kind: Text,
                default_value: json!(""),
            },
            FieldDef {
                name: "serial",
                kind: Text,
                default_value: json!(""),
            },
            FieldDef {
                name: "chopper",
                kind: Integer,
                default_value: json!(0),
            },
            FieldDef {
                name: "units_amplitude",
                kind: Text,
                default_value: json!("mV/nT"),
            },
            FieldDef {
                name: "units_frequency",
                kind: Text,
                default_value: json!("Hz"),
            },
            FieldDef {
                name: "units_phase",
                kind: Text,
                default_value: json!("degrees"),
            },
            FieldDef {
                name: "date",
                kind: Text,
                default_value: json!("1970-01-01"),
            },
            FieldDef {
                name: "time",
                kind: Text,
                default_value: json!("00:00:00"),
            },
            FieldDef {
                name: "operator",
                kind: Text,
                default_value: json!("mtx"),
            },
            FieldDef {
                name: "f",
                kind: FloatList,
                default_value: json!([]),
            },
            FieldDef {
                name: "a",
                kind: FloatList,
                default_value: json!([]),
            },
            FieldDef {
                name: "p",
                kind: FloatList,
                default_value: json!([]),
            },
        ]
    }

    fn from_fields(channel_no: i64, fields: &FieldMap, mode: CoercionMode) -> Self {
        Self {
            channel_no,
            sensor: mirror::text_field(fields, "sensor"),
            serial: mirror::text_field(fields, "serial"),
            chopper: mirror::int_field(fields, "chopper"),
            units_amplitude: mirror::text_field(fields, "units_amplitude"),
            units_frequency: mirror::text_field(fields, "units_frequency"),
            units_phase: mirror::text_field(fields, "units_phase"),
            date: mirror::text_field(fields, "date"),
            time: mirror::text_field(fields, "time"),
            operator: mirror::text_field(fields, "operator"),
            f: mirror::float_list_field(fields, "f"),
            a: mirror::float_list_field(fields, "a"),
            p: mirror::float_list_field(fields, "p"),
            mode,
        }
    }
}

impl SensorCalibration {
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
        mirror::load_or_init(session, channel_no, overrides, mode)
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

    /// Replaces the whole curve and writes all three sequences through.
    /// The sequences must line up; there is no sensible reading of a curve
    /// with more frequencies than amplitudes.
    pub fn set_curve(
        &mut self,
        session: &mut SessionState,
        f: Vec<f64>,
        a: Vec<f64>,
        p: Vec<f64>,
    ) -> Result<()> {
        if f.len() != a.len() || f.len() != p.len() {
            return Err(SurveyError::CurveLength {
                f_len: f.len(),
                a_len: a.len(),
                p_len: p.len(),
            });
        }
        session.set(self.channel_no, Self::KIND, "f", json!(f));
        session.set(self.channel_no, Self::KIND, "a", json!(a));
        session.set(self.channel_no, Self::KIND, "p", json!(p));
        self.f = f;
        self.a = a;
        self.p = p;
        Ok(())
    }

    /// The curve as (frequency, amplitude, phase) triples.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.f
            .iter()
            .zip(&self.a)
            .zip(&self.p)
            .map(|((f, a), p)| (*f, *a, *p))
    }

    pub fn chopper_is_on(&self) -> bool {
        self.chopper == 1
    }
}
