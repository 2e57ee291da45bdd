//! Flat CSV export of opportunity records.
//!
//! # CSV Output Schema
//!
//! One header row followed by one row per record, columns in [`COLUMNS`]
//! order. Dates are `YYYY-MM-DD`, monetary columns carry two decimals and
//! lines end in `\n`. No field contains a comma, so nothing is quoted.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use chrono::NaiveDate;

use crate::error::DatasetError;
use crate::opportunity::{Opportunity, ParseLabelError};

/// Column names in export order.
pub const COLUMNS: [&str; 14] = [
    "Opportunity_ID",
    "Created_Date",
    "Close_Date",
    "Region",
    "Product",
    "Channel",
    "Sales_Stage",
    "Deal_Size",
    "Probability",
    "Expected_Revenue",
    "Actual_Revenue",
    "Marketing_Program",
    "Quarter",
    "Month",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Header row without the trailing newline.
pub fn header_line() -> String {
    COLUMNS.join(",")
}

/// Write the header and every record.
pub fn write_csv<W: Write>(writer: &mut W, records: &[Opportunity]) -> std::io::Result<()> {
    writeln!(writer, "{}", header_line())?;

    for r in records {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{:.2},{},{:.2},{:.2},{},{},{}",
            r.id,
            r.created_date.format(DATE_FORMAT),
            r.close_date.format(DATE_FORMAT),
            r.region,
            r.product,
            r.channel,
            r.sales_stage,
            r.deal_size,
            r.probability,
            r.expected_revenue,
            r.actual_revenue,
            r.marketing_program,
            r.quarter,
            r.month,
        )?;
    }

    Ok(())
}

/// Write records to `path`, creating the parent directory if needed.
pub fn write_csv_file(path: impl AsRef<Path>, records: &[Opportunity]) -> std::io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = BufWriter::new(File::create(path)?);
    write_csv(&mut writer, records)?;
    writer.flush()
}

/// Read records back from an export.
pub fn read_csv<R: BufRead>(reader: R) -> Result<Vec<Opportunity>, DatasetError> {
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => return Err(DatasetError::MissingHeader),
    };
    let header = header.trim_start_matches('\u{feff}').trim_end();
    if header != header_line() {
        return Err(DatasetError::SchemaMismatch {
            found: header.to_string(),
        });
    }

    let mut records = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        // Header is line 1.
        let line_no = idx + 2;
        let record = parse_row(line).map_err(|reason| DatasetError::Row {
            line: line_no,
            reason,
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Read records from the file at `path`.
pub fn read_csv_file(path: impl AsRef<Path>) -> Result<Vec<Opportunity>, DatasetError> {
    let file = File::open(path)?;
    read_csv(BufReader::new(file))
}

fn parse_row(line: &str) -> Result<Opportunity, String> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != COLUMNS.len() {
        return Err(format!(
            "expected {} columns, found {}",
            COLUMNS.len(),
            fields.len()
        ));
    }

    Ok(Opportunity {
        id: fields[0].to_string(),
        created_date: parse_date(fields[1], COLUMNS[1])?,
        close_date: parse_date(fields[2], COLUMNS[2])?,
        region: parse_label(fields[3])?,
        product: parse_label(fields[4])?,
        channel: parse_label(fields[5])?,
        sales_stage: parse_label(fields[6])?,
        deal_size: parse_num(fields[7], COLUMNS[7])?,
        probability: parse_num(fields[8], COLUMNS[8])?,
        expected_revenue: parse_num(fields[9], COLUMNS[9])?,
        actual_revenue: parse_num(fields[10], COLUMNS[10])?,
        marketing_program: parse_label(fields[11])?,
        quarter: parse_num(fields[12], COLUMNS[12])?,
        month: parse_num(fields[13], COLUMNS[13])?,
    })
}

fn parse_date(value: &str, column: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| format!("invalid {} {:?}: {}", column, value, e))
}

fn parse_label<T>(value: &str) -> Result<T, String>
where
    T: std::str::FromStr<Err = ParseLabelError>,
{
    value.parse().map_err(|e: ParseLabelError| e.to_string())
}

fn parse_num<T>(value: &str, column: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| format!("invalid {} {:?}: {}", column, value, e))
}
