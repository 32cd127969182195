//! Dump the metadata and rows of an SBDF file.
//!
//! Run with:
//! ```bash
//! cargo run -p sbdf --example dump -- path/to/file.sbdf
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs::File;
use std::io::BufReader;
use std::process::ExitCode;

use sbdf::{FileHeader, TableMetadata, TableReader, Value};

fn main() -> ExitCode {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: dump <file.sbdf>");
        return ExitCode::FAILURE;
    };
    match dump(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{path}: {err}");
            ExitCode::FAILURE
        }
    }
}

fn dump(path: &str) -> Result<(), sbdf::Error> {
    let mut source = BufReader::new(File::open(path)?);
    let version = FileHeader::read(&mut source)?;
    println!("sbdf {version}");

    let metadata = TableMetadata::read(&mut source)?;
    for property in metadata.properties() {
        println!("table property {} = {:?}", property.name(), property.value());
    }
    for column in metadata.columns() {
        println!("column {} : {}", column.name(), column.value_kind());
    }

    let columns = metadata.column_count();
    let mut reader = TableReader::new(source, metadata);
    let mut row = Vec::with_capacity(columns);
    let mut rows = 0usize;
    while let Some(value) = reader.read_value()? {
        row.push(render(&value));
        if row.len() == columns {
            println!("{}", row.join("\t"));
            row.clear();
            rows += 1;
        }
    }
    println!("{rows} rows");
    Ok(())
}

fn render(value: &Value) -> String {
    match value {
        Value::Invalid => "<null>".to_string(),
        Value::Error(message) => format!("<error: {message}>"),
        Value::Replaced(inner) => format!("{}*", render(inner)),
        Value::String(s) => s.clone(),
        other => format!("{other:?}"),
    }
}
