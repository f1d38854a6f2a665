// crates/mtsurvey-core/src/metadata/header.rs

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::coerce;
use crate::error::{Result, SurveyError};
use crate::mirror::{self, CoercionMode, FieldDef, FieldKind, Provenance, SessionRecord};
use crate::session::{EntityKind, FieldMap, SessionState};

/// Positional and timing description of one channel: start date/time,
/// coordinates, dipole geometry and unit tags. The channel number is carried
/// for identity but is not itself a mirrored field of this kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelHeader {
    pub channel_no: i64,
    pub date: String,
    pub time: String,
    pub fracs: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    pub dipole_length: f64,
    pub angle: f64,
    pub dip: f64,
    pub units: String,
    pub source: String,
    pub site: String,
    #[serde(skip)]
    mode: CoercionMode,
}

impl SessionRecord for ChannelHeader {
    const KIND: EntityKind = EntityKind::Header;
    const PRESENCE_FIELD: &'static str = "latitude";

    fn definitions() -> Vec<FieldDef> {
        use FieldKind::{Float, Text};

        vec![
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
                name: "fracs",
                kind: Float,
                default_value: json!(0.0),
            },
            FieldDef {
                name: "latitude",
                kind: Float,
                default_value: json!(0.0),
            },
            FieldDef {
                name: "longitude",
                kind: Float,
                default_value: json!(0.0),
            },
            FieldDef {
                name: "elevation",
                kind: Float,
                default_value: json!(0.0),
            },
            FieldDef {
                name: "dipole_length",
                kind: Float,
                default_value: json!(0.0),
            },
            FieldDef {
                name: "angle",
                kind: Float,
                default_value: json!(0.0),
            },
            FieldDef {
                name: "dip",
                kind: Float,
                default_value: json!(0.0),
            },
            FieldDef {
                name: "units",
                kind: Text,
                default_value: json!("mV"),
            },
            FieldDef {
                name: "source",
                kind: Text,
                default_value: json!("ns"),
            },
            FieldDef {
                name: "site",
                kind: Text,
                default_value: json!("site"),
            },
        ]
    }

    fn from_fields(channel_no: i64, fields: &FieldMap, mode: CoercionMode) -> Self {
        Self {
            channel_no,
            date: mirror::text_field(fields, "date"),
            time: mirror::text_field(fields, "time"),
            fracs: mirror::float_field(fields, "fracs"),
            latitude: mirror::float_field(fields, "latitude"),
            longitude: mirror::float_field(fields, "longitude"),
            elevation: mirror::float_field(fields, "elevation"),
            dipole_length: mirror::float_field(fields, "dipole_length"),
            angle: mirror::float_field(fields, "angle"),
            dip: mirror::float_field(fields, "dip"),
            units: mirror::text_field(fields, "units"),
            source: mirror::text_field(fields, "source"),
            site: mirror::text_field(fields, "site"),
            mode,
        }
    }
}

impl ChannelHeader {
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

    /// Write-through setter. Numeric input updates the record and the single
    /// session field; anything else is a no-op in permissive mode.
    pub fn set_angle(&mut self, session: &mut SessionState, raw: &Value) -> Result<()> {
        match coerce::value_to_f64(raw) {
            Some(angle) => {
                self.angle = angle;
                session.set(self.channel_no, Self::KIND, "angle", json!(angle));
                Ok(())
            }
            None => self.reject_non_numeric("angle", raw),
        }
    }

    /// Write-through setter, same input policy as `set_angle`.
    pub fn set_dip(&mut self, session: &mut SessionState, raw: &Value) -> Result<()> {
        match coerce::value_to_f64(raw) {
            Some(dip) => {
                self.dip = dip;
                session.set(self.channel_no, Self::KIND, "dip", json!(dip));
                Ok(())
            }
            None => self.reject_non_numeric("dip", raw),
        }
    }

    fn reject_non_numeric(&self, field: &str, raw: &Value) -> Result<()> {
        match self.mode {
            CoercionMode::Permissive => {
                debug!(channel = self.channel_no, field, raw = %raw,
                    "non-numeric setter input ignored");
                Ok(())
            }
            CoercionMode::Strict => Err(SurveyError::Coercion {
                field: field.to_string(),
                kind: FieldKind::Float,
                value: raw.to_string(),
            }),
        }
    }

    /// Combined ISO 8601 start instant, e.g. `1970-01-01T00:00:00`.
    pub fn datetime(&self) -> String {
        format!("{}T{}", self.date, self.time)
    }

    /// `None` when date/time never made it past their defaults into
    /// something parsable. Fractional seconds are deliberately excluded.
    pub fn start_utc(&self) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(&self.datetime(), "%Y-%m-%dT%H:%M:%S")
            .ok()
            .map(|dt| dt.and_utc())
    }

    pub fn unix_timestamp(&self) -> Option<i64> {
        self.start_utc().map(|dt| dt.timestamp())
    }

    /// The six E-field electrode coordinates (x1, x2, y1, y2, z1, z2)
    /// implied by the current dipole length, angle and dip, centered on the
    /// site.
    pub fn electrode_positions(&self) -> [f64; 6] {
        dip_to_positions(self.dipole_length, self.angle, self.dip)
    }

    /// Derives dipole length, angle and dip from measured electrode
    /// coordinates and writes all three through to the session.
    pub fn set_electrode_positions(&mut self, session: &mut SessionState, positions: [f64; 6]) {
        let (length, angle, dip) = positions_to_dip(positions);
        self.dipole_length = length;
        self.angle = angle;
        self.dip = dip;
        session.set(self.channel_no, Self::KIND, "dipole_length", json!(length));
        session.set(self.channel_no, Self::KIND, "angle", json!(angle));
        session.set(self.channel_no, Self::KIND, "dip", json!(dip));
    }
}

/// (length, angle, dip) of the dipole spanned by (x1, x2, y1, y2, z1, z2).
/// Dipoles shorter than a millimeter collapse to zeros.
pub fn positions_to_dip(positions: [f64; 6]) -> (f64, f64, f64) {
    let [x1, x2, y1, y2, z1, z2] = positions;
    let tx = x2 - x1;
    let ty = y2 - y1;
    let tz = z2 - z1;
    let length = (tx * tx + ty * ty + tz * tz).sqrt();
    if length < 0.001 {
        return (0.0, 0.0, 0.0);
    }
    let angle = ty.atan2(tx).to_degrees();
    let dip = (tz / length).asin().to_degrees();
    (length, angle, dip)
}

/// Inverse of `positions_to_dip`: electrode coordinates centered on the
/// site. Dips below 0.1 degree are treated as level.
pub fn dip_to_positions(length: f64, angle: f64, dip: f64) -> [f64; 6] {
    if length.abs() < 0.0001 {
        return [0.0; 6];
    }
    let dp = if dip.abs() < 0.1 { 0.0 } else { dip };
    let x = length * angle.to_radians().cos() * dp.to_radians().cos();
    let y = length * angle.to_radians().sin() * dp.to_radians().cos();
    let z = length * dp.to_radians().sin();
    [-0.5 * x, 0.5 * x, -0.5 * y, 0.5 * y, 0.0, z]
}
