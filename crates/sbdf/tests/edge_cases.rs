//! Boundary behaviors and API misuse.

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use proptest::prelude::*;
use sbdf::{
    ColumnMetadata, Decimal128, Error, FormatError, TableMetadataBuilder, TableWriter, UsageError,
    Value, ValueKind,
};

fn datetime_writer() -> TableWriter<Vec<u8>> {
    let mut builder = TableMetadataBuilder::new();
    builder.add_column(ColumnMetadata::new("n", ValueKind::DateTime).unwrap());
    TableWriter::new(Vec::new(), builder.build().unwrap()).unwrap()
}

#[test]
fn datetime_before_1583_fails_with_format_error() {
    let mut writer = datetime_writer();
    let early = NaiveDate::from_ymd_opt(1582, 10, 4)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    writer.add_value(Value::DateTime(early)).unwrap();
    assert!(matches!(
        writer.flush(),
        Err(Error::Format(FormatError::DateOutOfRange { .. }))
    ));
}

#[test]
fn datetime_at_1583_succeeds() {
    let mut writer = datetime_writer();
    let floor = NaiveDate::from_ymd_opt(1583, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    writer.add_value(Value::DateTime(floor)).unwrap();
    writer.write_end_of_table().unwrap();
}

#[test]
fn decimal_boundaries() {
    // 34 nines is the ceiling.
    let max = Decimal128::new(sbdf_format::MAX_COEFFICIENT as i128, 0).unwrap();
    let bytes = max.to_le_bytes();
    let back = Decimal128::from_le_bytes(bytes).unwrap();
    assert_eq!(back.cmp(&max), std::cmp::Ordering::Equal);

    assert!(matches!(
        Decimal128::new(sbdf_format::MAX_COEFFICIENT as i128 + 1, 0),
        Err(UsageError::DecimalCoefficientOutOfRange)
    ));
}

#[test]
fn shared_property_conflict_fails_before_output() {
    let mut builder = TableMetadataBuilder::new();
    let mut a = ColumnMetadata::new("a", ValueKind::Int).unwrap();
    a.add_property("unit", Value::from("V")).unwrap();
    let mut b = ColumnMetadata::new("b", ValueKind::Int).unwrap();
    b.add_property("unit", Value::Int(1)).unwrap();
    builder.add_column(a).add_column(b);
    assert!(matches!(
        builder.build(),
        Err(UsageError::PropertyConflict { name }) if name == "unit"
    ));
}

#[test]
fn sealed_metadata_cannot_change() {
    let mut builder = TableMetadataBuilder::new();
    builder.add_column(ColumnMetadata::new("a", ValueKind::Int).unwrap());
    let metadata = builder.build().unwrap();
    let mut properties = metadata.properties().clone();
    assert!(matches!(
        properties.add_property("late", Value::Int(1)),
        Err(UsageError::Sealed)
    ));
}

#[test]
fn kind_mismatch_on_add_value() {
    let mut builder = TableMetadataBuilder::new();
    builder.add_column(ColumnMetadata::new("n", ValueKind::Int).unwrap());
    let mut writer = TableWriter::new(Vec::new(), builder.build().unwrap()).unwrap();
    assert!(matches!(
        writer.add_value(Value::Double(1.0)),
        Err(Error::Usage(UsageError::KindMismatch { .. }))
    ));
}

#[test]
fn rle_run_of_257_encodes_as_two_runs() {
    use sbdf::{EncodedArray, ValueArray};

    let values = vec![42i64; 257];
    let encoded = EncodedArray::run_length(ValueArray::Long(values.clone())).unwrap();
    let bytes = encoded.to_bytes().unwrap();
    // encoding, kind, total 257, two runs, occurrences 255 and 0.
    assert_eq!(&bytes[..2], &[0x02, 0x03]);
    assert_eq!(&bytes[2..6], &257i32.to_le_bytes());
    assert_eq!(&bytes[6..10], &2i32.to_le_bytes());
    assert_eq!(&bytes[10..12], &[255, 0]);

    let back = EncodedArray::read(&mut bytes.as_ref()).unwrap();
    assert_eq!(back.to_array(), &ValueArray::Long(values));
}

proptest! {
    #[test]
    fn prop_decimal_wire_comparison_law(
        significand in -(sbdf_format::MAX_COEFFICIENT as i128)..=(sbdf_format::MAX_COEFFICIENT as i128),
        scale in 0u32..=34,
    ) {
        let decimal = Decimal128::new(significand, scale).unwrap();
        let back = Decimal128::from_le_bytes(decimal.to_le_bytes()).unwrap();
        prop_assert_eq!(back.cmp(&decimal), std::cmp::Ordering::Equal);
        prop_assert_eq!(back.significand(), significand);
        prop_assert_eq!(back.scale(), scale);
    }

    #[test]
    fn prop_value_type_binary_roundtrip(index in 0usize..12) {
        let kind = ValueKind::STANDARD[index];
        prop_assert_eq!(ValueKind::from_binary(&kind.to_binary()).unwrap(), kind);
    }
}
