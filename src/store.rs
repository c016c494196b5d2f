//! CSV persistence with a fixed column schema.
//!
//! Record keys outside [`SCHEMA`] are dropped at write time; schema columns
//! absent from a record are written as empty string. Column order is stable
//! across appends to the same file.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;

use crate::record::Record;

/// Spreadsheet column order.
pub const SCHEMA: &[&str] = &[
    "Dealer Name",
    "Dealership Location",
    "Sales Hours",
    "Seller Email",
    "Dealer Contact Number",
    "Vehicle Name",
    "Vehicle Price",
    "Status",
    "Contact Number",
    "Registration Number",
    "Body",
    "Mileage",
    "Fuel Type",
    "Engine CC / kw",
    "Year of Manufacture",
    "Transmission",
    "Grade",
    "Exterior Color",
    "Interior Color",
    "No. of Owners",
    "Blue-T Grade",
    "District",
    "City",
    "Year of Reg.",
    "Convenience",
    "Infotainment",
    "Safety & Security",
    "Interior & Seats",
    "Windows & Lighting",
    "Other Features",
    "Seller Notes",
    "Ad URL",
];

/// Project a record onto the schema columns.
fn row_for(record: &Record) -> Vec<&str> {
    SCHEMA
        .iter()
        .map(|col| record.get(col).unwrap_or(""))
        .collect()
}

/// Append one row per record, creating the file with a header row if it
/// does not exist. An existing file with a drifted header row gets the
/// header rewritten in place first; that is a repair, not a failure.
pub fn append_records(path: &Path, records: &[Record]) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }

    if path.exists() {
        repair_header_if_drifted(path)?;
        let file = OpenOptions::new()
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open store: {}", path.display()))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        for record in records {
            writer.write_record(row_for(record))?;
        }
        writer.flush()?;
    } else {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create store: {}", path.display()))?;
        writer.write_record(SCHEMA)?;
        for record in records {
            writer.write_record(row_for(record))?;
        }
        writer.flush()?;
    }

    Ok(())
}

/// Rewrite the file with the expected header if the existing header row no
/// longer matches the schema, preserving all data rows as-is.
fn repair_header_if_drifted(path: &Path) -> Result<()> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to read store: {}", path.display()))?;

    let rows: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .with_context(|| format!("Failed to read store rows: {}", path.display()))?;

    let header_ok = rows
        .first()
        .map(|row| row.iter().eq(SCHEMA.iter().copied()))
        .unwrap_or(false);
    if header_ok {
        return Ok(());
    }

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to rewrite store: {}", path.display()))?;
    writer.write_record(SCHEMA)?;
    let data_rows = if rows.is_empty() { &rows[..] } else { &rows[1..] };
    for row in data_rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_store(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "autostream-store-{}-{}.csv",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .unwrap();
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn creates_file_with_header_then_appends() {
        let path = temp_store("create");
        let mut rec = Record::new();
        rec.set("Dealer Name", "ABC Motors");
        rec.set("Vehicle Name", "Honda Vezel 2024");

        append_records(&path, &[rec.clone()]).unwrap();
        append_records(&path, &[rec]).unwrap();

        let rows = read_rows(&path);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], SCHEMA);
        assert_eq!(rows[1][0], "ABC Motors");
        assert_eq!(rows[2][5], "Honda Vezel 2024");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_columns_are_empty_and_extra_keys_dropped() {
        let path = temp_store("project");
        let mut rec = Record::new();
        rec.set("Dealer Name", "ABC Motors");
        rec.set("Vehicle Name", "Honda Vezel 2024");
        // Normalized at extraction time; an unrecognized leftover is dropped.
        rec.set("Engine CC / kw", "1500");
        rec.set("Some Unknown Label", "value");

        append_records(&path, &[rec]).unwrap();

        let rows = read_rows(&path);
        let row = &rows[1];
        assert_eq!(row.len(), SCHEMA.len());
        let col = |name: &str| SCHEMA.iter().position(|c| *c == name).unwrap();
        assert_eq!(row[col("Engine CC / kw")], "1500");
        assert_eq!(row[col("Mileage")], "");
        assert!(!row.contains(&"value".to_string()));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn drifted_header_is_repaired_keeping_data_rows() {
        let path = temp_store("repair");
        fs::write(&path, "Old Header,Another\nval1,val2\n").unwrap();

        let mut rec = Record::new();
        rec.set("Dealer Name", "ABC Motors");
        append_records(&path, &[rec]).unwrap();

        let rows = read_rows(&path);
        assert_eq!(rows[0], SCHEMA);
        assert_eq!(rows[1], ["val1", "val2"]);
        assert_eq!(rows[2][0], "ABC Motors");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn matching_header_is_left_untouched() {
        let path = temp_store("match");
        let mut rec = Record::new();
        rec.set("Dealer Name", "First");
        append_records(&path, &[rec]).unwrap();

        let mut rec2 = Record::new();
        rec2.set("Dealer Name", "Second");
        append_records(&path, &[rec2]).unwrap();

        let rows = read_rows(&path);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][0], "First");
        assert_eq!(rows[2][0], "Second");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn normalized_engine_label_lands_in_canonical_column() {
        let path = temp_store("engine");
        let mut rec = Record::new();
        rec.set("Dealer Name", "ABC Motors");
        rec.set("Vehicle Name", "Honda Vezel 2024");
        rec.set(crate::normalize::normalize_label("Engine"), "1500");

        append_records(&path, &[rec]).unwrap();

        let rows = read_rows(&path);
        let col = |name: &str| SCHEMA.iter().position(|c| *c == name).unwrap();
        assert_eq!(rows[1][col("Engine CC / kw")], "1500");
        assert!(!SCHEMA.contains(&"Engine"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn empty_record_list_is_a_no_op() {
        let path = temp_store("noop");
        append_records(&path, &[]).unwrap();
        assert!(!path.exists());
    }
}
