use chrono::{TimeZone, Utc};
use mtsurvey_core::metadata::{ChannelFileTags, ChannelHeader, SensorCalibration};
use mtsurvey_core::mirror::CoercionMode;
use mtsurvey_core::session::{EntityKind, FieldMap, SessionState};
use serde_json::{json, Value};

fn overrides(pairs: &[(&str, Value)]) -> FieldMap {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

#[test]
fn header_datetime_combines_date_and_time() {
    let header = ChannelHeader::defaults(0);
    assert_eq!(header.datetime(), "1970-01-01T00:00:00");
    assert_eq!(header.unix_timestamp(), Some(0));
}

#[test]
fn header_timestamp_matches_chrono() {
    let mut session = SessionState::default();
    let (header, _) = ChannelHeader::load_or_init_with(
        &mut session,
        0,
        &overrides(&[("date", json!("2021-05-19")), ("time", json!("12:30:00"))]),
        CoercionMode::Permissive,
    )
    .expect("load");

    let expected = Utc
        .with_ymd_and_hms(2021, 5, 19, 12, 30, 0)
        .single()
        .expect("valid instant");
    assert_eq!(header.start_utc(), Some(expected));
    assert_eq!(header.unix_timestamp(), Some(expected.timestamp()));
}

#[test]
fn header_timestamp_degrades_to_none_on_junk_date() {
    let mut session = SessionState::default();
    let (header, _) = ChannelHeader::load_or_init_with(
        &mut session,
        0,
        &overrides(&[("date", json!("someday"))]),
        CoercionMode::Permissive,
    )
    .expect("load");

    assert_eq!(header.start_utc(), None);
    assert_eq!(header.unix_timestamp(), None);
}

#[test]
fn dipole_geometry_round_trips() {
    let mut session = SessionState::default();
    let (mut header, _) = ChannelHeader::load_or_init(&mut session, 0).expect("load");

    // 100 m east-west dipole, level.
    header.set_electrode_positions(&mut session, [-50.0, 50.0, 0.0, 0.0, 0.0, 0.0]);
    assert!((header.dipole_length - 100.0).abs() < 1e-9);
    assert!(header.angle.abs() < 1e-9);
    assert!(header.dip.abs() < 1e-9);
    assert_eq!(
        session.get(0, EntityKind::Header, "dipole_length"),
        Some(&json!(100.0))
    );

    let positions = header.electrode_positions();
    assert!((positions[0] + 50.0).abs() < 1e-9);
    assert!((positions[1] - 50.0).abs() < 1e-9);

    // North-south dipole points 90 degrees from North toward East.
    header.set_electrode_positions(&mut session, [0.0, 0.0, -50.0, 50.0, 0.0, 0.0]);
    assert!((header.angle - 90.0).abs() < 1e-9);
}

#[test]
fn degenerate_dipole_collapses_to_zeros() {
    let mut session = SessionState::default();
    let (mut header, _) = ChannelHeader::load_or_init(&mut session, 0).expect("load");

    header.set_electrode_positions(&mut session, [0.0, 0.0004, 0.0, 0.0, 0.0, 0.0]);
    assert_eq!(header.dipole_length, 0.0);
    assert_eq!(header.angle, 0.0);
    assert_eq!(header.dip, 0.0);
}

#[test]
fn sample_rate_labels() {
    let mut tags = ChannelFileTags::defaults(0);

    tags.sample_rate = 256.0;
    assert_eq!(tags.sample_rate_label(), "256Hz");

    tags.sample_rate = 16.666;
    assert_eq!(tags.sample_rate_label(), "17Hz");

    tags.sample_rate = 0.25;
    assert_eq!(tags.sample_rate_label(), "4s");

    tags.sample_rate = 0.0;
    assert_eq!(tags.sample_rate_label(), "failed");
}

#[test]
fn file_stem_follows_the_tag_order() {
    let mut session = SessionState::default();
    let (tags, _) = ChannelFileTags::load_or_init_with(
        &mut session,
        2,
        &overrides(&[
            ("serial", json!(84)),
            ("system", json!("ADU-08e")),
            ("channel_type", json!("Hx")),
            ("sample_rate", json!(256.0)),
        ]),
        CoercionMode::Permissive,
    )
    .expect("load");

    assert_eq!(tags.file_stem(), "084_ADU-08e_C002_R000_THx_256Hz");
}

#[test]
fn calibration_curve_round_trips_through_the_session() {
    let mut session = SessionState::default();
    let (mut cal, _) = SensorCalibration::load_or_init_with(
        &mut session,
        3,
        &overrides(&[("sensor", json!("MFS-06e")), ("serial", json!("123"))]),
        CoercionMode::Permissive,
    )
    .expect("load");

    cal.set_curve(
        &mut session,
        vec![0.1, 1.0, 10.0],
        vec![0.02, 0.2, 2.0],
        vec![89.0, 85.0, 45.0],
    )
    .expect("equal-length curve");

    let points: Vec<(f64, f64, f64)> = cal.points().collect();
    assert_eq!(points.len(), 3);
    assert_eq!(points[1], (1.0, 0.2, 85.0));

    let (reloaded, _) = SensorCalibration::load_or_init(&mut session, 3).expect("reload");
    assert_eq!(reloaded.f, vec![0.1, 1.0, 10.0]);
    assert_eq!(reloaded.a, vec![0.02, 0.2, 2.0]);
    assert_eq!(reloaded.p, vec![89.0, 85.0, 45.0]);
    assert_eq!(reloaded.sensor, "MFS-06e");
}

#[test]
fn calibration_curve_rejects_unequal_lengths() {
    let mut session = SessionState::default();
    let (mut cal, _) = SensorCalibration::load_or_init(&mut session, 3).expect("load");

    let err = cal
        .set_curve(&mut session, vec![0.1, 1.0], vec![0.02], vec![89.0, 85.0])
        .expect_err("unequal lengths are rejected");
    assert!(err.to_string().contains("differ in length"));

    // Nothing was written.
    assert!(cal.f.is_empty());
    assert_eq!(
        session.get(3, EntityKind::SensorCalibration, "f"),
        Some(&json!([]))
    );
}

#[test]
fn calibration_defaults_match_the_legacy_tables() {
    let cal = SensorCalibration::defaults(6);
    assert_eq!(cal.units_amplitude, "mV/nT");
    assert_eq!(cal.units_frequency, "Hz");
    assert_eq!(cal.units_phase, "degrees");
    assert_eq!(cal.operator, "mtx");
    assert_eq!(cal.chopper, 0);
    assert!(!cal.chopper_is_on());
    assert!(cal.f.is_empty());
}

#[test]
fn chopper_flag_reads_as_boolean() {
    let mut session = SessionState::default();
    let (cal, _) = SensorCalibration::load_or_init_with(
        &mut session,
        1,
        &overrides(&[("sensor", json!("MFS-07e")), ("chopper", json!("1"))]),
        CoercionMode::Permissive,
    )
    .expect("load");

    assert_eq!(cal.chopper, 1);
    assert!(cal.chopper_is_on());
}
