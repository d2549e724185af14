//! Line protocol encoding tests.
//!
//! Run with: `cargo test --test line_protocol`

use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
use influxdb_point::line_protocol::encode_batch;
use influxdb_point::{FieldValue, Point, PointBuilder, Timestamp, WriteOptions, WritePrecision};

fn h2o() -> Point {
    Point::new("h2o").unwrap()
}

// ============================================================================
// Escaping
// ============================================================================

#[test]
fn test_measurement_escaping() {
    let line = |m: &str| {
        Point::new(m)
            .unwrap()
            .with_field("level", 2i64)
            .unwrap()
            .to_line_protocol(WritePrecision::Ns)
    };

    assert_eq!(line("h2 o"), r"h2\ o level=2i");
    assert_eq!(line("h2=o"), "h2=o level=2i");
    assert_eq!(line("h2,o"), r"h2\,o level=2i");
    assert_eq!(line("h2\no"), r"h2\no level=2i");
}

#[test]
fn test_tag_escaping() {
    let point = h2o()
        .with_tag("tag key", "tag value")
        .with_tag("a=b", "c,d")
        .with_tag("tab", "x\ty\r\nz")
        .with_field("level", 2i64)
        .unwrap();

    assert_eq!(
        point.to_line_protocol(WritePrecision::Ns),
        r"h2o,a\=b=c\,d,tab=x\ty\r\nz,tag\ key=tag\ value level=2i"
    );
}

#[test]
fn test_field_key_escaping() {
    let point = h2o().with_field("water level=high, ok", 1i64).unwrap();
    assert_eq!(
        point.to_line_protocol(WritePrecision::Ns),
        r"h2o water\ level\=high\,\ ok=1i"
    );
}

#[test]
fn test_string_field_escaping() {
    let point = h2o()
        .with_field("msg", r#"say "hi" to C:\temp"#)
        .unwrap();
    assert_eq!(
        point.to_line_protocol(WritePrecision::Ns),
        r#"h2o msg="say \"hi\" to C:\\temp""#
    );
}

// ============================================================================
// Tags and fields
// ============================================================================

#[test]
fn test_empty_tag_value_deletes_tag() {
    let point = h2o()
        .with_tag("location", "europe")
        .with_tag("log", "to_delete")
        .with_tag("log", "")
        .with_field("level", 2i64)
        .unwrap();

    assert_eq!(
        point.to_line_protocol(WritePrecision::Ns),
        "h2o,location=europe level=2i"
    );
}

#[test]
fn test_tags_and_fields_are_sorted() {
    let point = h2o()
        .with_tag("zone", "z")
        .with_tag("area", "a")
        .with_field("z_field", 1i64)
        .unwrap()
        .with_field("a_field", 2i64)
        .unwrap();

    assert_eq!(
        point.to_line_protocol(WritePrecision::Ns),
        "h2o,area=a,zone=z a_field=2i,z_field=1i"
    );
}

#[test]
fn test_last_field_write_wins() {
    let point = h2o()
        .with_field("level", 2i64)
        .unwrap()
        .with_field("level", 3i64)
        .unwrap();
    assert_eq!(point.to_line_protocol(WritePrecision::Ns), "h2o level=3i");
}

#[test]
fn test_field_replacement_changes_kind() {
    let point = h2o()
        .with_field("level", 2i64)
        .unwrap()
        .with_field("level", "high")
        .unwrap();
    assert_eq!(point.to_line_protocol(WritePrecision::Ns), r#"h2o level="high""#);
}

#[test]
fn test_field_suffixes() {
    let point = h2o()
        .with_field("i8", -8i8)
        .unwrap()
        .with_field("i64", i64::MIN)
        .unwrap()
        .with_field("u16", 16u16)
        .unwrap()
        .with_field("u64", u64::MAX)
        .unwrap()
        .with_field("yes", true)
        .unwrap()
        .with_field("no", false)
        .unwrap();

    assert_eq!(
        point.to_line_protocol(WritePrecision::Ns),
        "h2o i64=-9223372036854775808i,i8=-8i,no=false,u16=16u,u64=18446744073709551615u,yes=true"
    );
}

#[test]
fn test_float_formatting_asymmetry() {
    let point = h2o()
        .with_field("double", 0.1f64)
        .unwrap()
        .with_field("float", 0.1f32)
        .unwrap();

    assert_eq!(
        point.to_line_protocol(WritePrecision::Ns),
        "h2o double=0.10000000000000001,float=0.1"
    );
}

#[test]
fn test_float_scientific_notation() {
    let line = |point: Point| point.to_line_protocol(WritePrecision::Ns);

    assert_eq!(line(h2o().with_field("f", 1e-5f32).unwrap()), "h2o f=1E-05");
    assert_eq!(
        line(h2o().with_field("f", f32::MAX).unwrap()),
        "h2o f=3.4028235E+38"
    );
    assert_eq!(line(h2o().with_field("f", 1e20f32).unwrap()), "h2o f=1E+20");
    assert_eq!(
        line(h2o().with_field("d", 1e-5f64).unwrap()),
        "h2o d=1.0000000000000001E-05"
    );
    assert_eq!(line(h2o().with_field("d", 1e20f64).unwrap()), "h2o d=1E+20");
}

#[test]
fn test_other_values_render_as_strings() {
    let point = h2o().with_field("ch", FieldValue::display('x')).unwrap();
    assert_eq!(point.to_line_protocol(WritePrecision::Ns), r#"h2o ch="x""#);
}

// ============================================================================
// Non-finite fields
// ============================================================================

#[test]
fn test_only_non_finite_fields_encode_empty() {
    let point = h2o()
        .with_tag("location", "europe")
        .with_field("nan", f64::NAN)
        .unwrap()
        .with_field("inf", f64::INFINITY)
        .unwrap()
        .with_field("ninf", f32::NEG_INFINITY)
        .unwrap()
        .with_timestamp(123i64);

    assert!(point.has_fields());
    assert_eq!(point.to_line_protocol(WritePrecision::Ns), "");
}

#[test]
fn test_non_finite_fields_are_dropped() {
    let point = h2o()
        .with_field("nan", f64::NAN)
        .unwrap()
        .with_field("level", 1.5f64)
        .unwrap();
    assert_eq!(point.to_line_protocol(WritePrecision::Ns), "h2o level=1.5");
}

#[test]
fn test_point_without_fields_encodes_empty() {
    let point = h2o().with_tag("location", "europe");
    assert!(!point.has_fields());
    assert_eq!(point.to_line_protocol(WritePrecision::Ns), "");
}

// ============================================================================
// Timestamps
// ============================================================================

#[test]
fn test_timestamp_precisions_truncate() {
    let point = h2o()
        .with_field("level", 2i64)
        .unwrap()
        .with_timestamp(123_000_000_000i64);

    assert_eq!(point.to_line_protocol(WritePrecision::S), "h2o level=2i 123");
    assert_eq!(point.to_line_protocol(WritePrecision::Ms), "h2o level=2i 123000");
    assert_eq!(point.to_line_protocol(WritePrecision::Us), "h2o level=2i 123000000");
    assert_eq!(
        point.to_line_protocol(WritePrecision::Ns),
        "h2o level=2i 123000000000"
    );

    let fractional = point.with_timestamp(1_999_999_999i64);
    assert_eq!(fractional.to_line_protocol(WritePrecision::S), "h2o level=2i 1");
}

#[test]
fn test_timestamp_from_wall_clocks() {
    let base = h2o().with_field("level", 2i64).unwrap();
    let expected = "h2o level=2i 1700000000";

    let utc = Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap();
    assert_eq!(base.with_timestamp(utc).to_line_protocol(WritePrecision::S), expected);

    let offset = FixedOffset::east_opt(3600).unwrap();
    let local = offset.with_ymd_and_hms(2023, 11, 14, 23, 13, 20).unwrap();
    assert_eq!(base.with_timestamp(local).to_line_protocol(WritePrecision::S), expected);

    let naive = NaiveDate::from_ymd_opt(2023, 11, 14)
        .unwrap()
        .and_hms_opt(22, 13, 20)
        .unwrap();
    assert_eq!(base.with_timestamp(naive).to_line_protocol(WritePrecision::S), expected);

    let parsed = Timestamp::parse_utc("2023-11-14T22:13:20Z").unwrap();
    assert_eq!(base.with_timestamp(parsed).to_line_protocol(WritePrecision::S), expected);
}

#[test]
fn test_timestamp_from_duration() {
    let point = h2o()
        .with_field("level", 2i64)
        .unwrap()
        .with_timestamp(std::time::Duration::from_millis(1_500));
    assert_eq!(point.to_line_protocol(WritePrecision::Ms), "h2o level=2i 1500");
}

#[test]
fn test_timestamp_precision_round_trip() {
    let point = h2o()
        .with_field("level", 2i64)
        .unwrap()
        .with_timestamp_precision(i64::MAX, WritePrecision::S);
    assert_eq!(
        point.to_line_protocol(WritePrecision::S),
        format!("h2o level=2i {}", i64::MAX)
    );
}

// ============================================================================
// Immutability and builder
// ============================================================================

#[test]
fn test_point_is_immutable() {
    let base = h2o().with_field("level", 1i64).unwrap();
    let one = base.with_tag("x", "1");
    let two = base.with_tag("x", "2");

    assert_eq!(one.to_line_protocol(WritePrecision::Ns), "h2o,x=1 level=1i");
    assert_eq!(two.to_line_protocol(WritePrecision::Ns), "h2o,x=2 level=1i");
    assert_eq!(base.to_line_protocol(WritePrecision::Ns), "h2o level=1i");
}

#[test]
fn test_builder_snapshots() {
    let mut builder = PointBuilder::new("h2o").unwrap();
    builder.tag("location", "europe").timestamp(5i64);
    builder.field("level", 1i64).unwrap();
    let first = builder.build();

    builder.field("level", 2i64).unwrap();
    let second = builder.build();

    assert_eq!(
        first.to_line_protocol(WritePrecision::Ns),
        "h2o,location=europe level=1i 5"
    );
    assert_eq!(
        second.to_line_protocol(WritePrecision::Ns),
        "h2o,location=europe level=2i 5"
    );
}

#[test]
fn test_display_uses_nanoseconds() {
    let point = h2o().with_field("level", 1i64).unwrap().with_timestamp(7i64);
    assert_eq!(point.to_string(), "h2o level=1i 7");
}

// ============================================================================
// Options and batches
// ============================================================================

#[test]
fn test_default_tags() {
    let options = WriteOptions::new(WritePrecision::S)
        .default_tag("dc", "eu")
        .default_tag("location", "default");
    let point = h2o()
        .with_tag("location", "europe")
        .with_field("level", 1i64)
        .unwrap()
        .with_timestamp(2_000_000_000i64);

    assert_eq!(
        point.to_line_protocol_with(&options),
        "h2o,dc=eu,location=europe level=1i 2"
    );
}

#[test]
fn test_empty_default_tag_is_skipped() {
    let options = WriteOptions::default().default_tag("empty", "");
    let point = h2o().with_field("level", 1i64).unwrap();
    assert_eq!(point.to_line_protocol_with(&options), "h2o level=1i");
}

#[test]
fn test_encode_batch_skips_empty_lines() {
    let points = vec![
        h2o().with_field("level", 1i64).unwrap(),
        h2o().with_field("level", f64::NAN).unwrap(),
        h2o().with_field("level", 3i64).unwrap(),
    ];

    let body = encode_batch(&points, &WriteOptions::default());
    assert_eq!(body, "h2o level=1i\nh2o level=3i");
}

#[test]
fn test_encode_batch_all_empty() {
    let points = vec![h2o().with_field("level", f64::NAN).unwrap()];
    assert_eq!(encode_batch(&points, &WriteOptions::default()), "");
}
