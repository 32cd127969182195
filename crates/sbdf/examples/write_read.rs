//! Write a small table to a file and read it back.
//!
//! Run with:
//! ```bash
//! cargo run -p sbdf --example write_read -- /tmp/demo.sbdf
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs::File;
use std::io::BufWriter;

use sbdf::{
    ColumnMetadata, Decimal128, Error, FileHeader, TableMetadata, TableMetadataBuilder,
    TableReader, TableWriter, Value, ValueKind,
};

fn main() -> Result<(), Error> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/tmp/demo.sbdf".to_string());

    let metadata = {
        let mut builder = TableMetadataBuilder::new();
        builder.add_property("generator", Value::from("sbdf example"))?;
        builder.add_column(ColumnMetadata::new("id", ValueKind::Int)?);
        builder.add_column(ColumnMetadata::new("name", ValueKind::String)?);
        builder.add_column(ColumnMetadata::new("price", ValueKind::Decimal)?);
        builder.build()?
    };

    let mut sink = BufWriter::new(File::create(&path)?);
    FileHeader::write_current(&mut sink)?;
    metadata.write(&mut sink)?;

    let mut writer = TableWriter::new(&mut sink, metadata)?;
    writer.add_row([
        Value::Int(1),
        Value::from("apple"),
        Value::Decimal(Decimal128::new(199, 2).expect("in range")),
    ])?;
    writer.add_row([Value::Int(2), Value::Invalid, Value::error("lookup failed")])?;
    writer.write_end_of_table()?;
    drop(writer);
    drop(sink);

    let mut source = File::open(&path)?;
    let version = FileHeader::read(&mut source)?;
    println!("format version {version}");

    let metadata = TableMetadata::read(&mut source)?;
    for column in metadata.columns() {
        println!("column {} : {}", column.name(), column.value_kind());
    }

    let mut reader = TableReader::new(source, metadata);
    for value in reader.values() {
        println!("{:?}", value?);
    }
    Ok(())
}
