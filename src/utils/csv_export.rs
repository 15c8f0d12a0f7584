use chrono::NaiveDateTime;

use crate::{error::AttendanceError, model::attendance::RecordWithOwner};

pub const CSV_HEADER: [&str; 8] = [
    "EmployeeID",
    "Name",
    "Department",
    "Date",
    "CheckIn",
    "CheckOut",
    "TotalHours",
    "Status",
];

/// Spreadsheet apps treat these leading characters as formulas.
fn neutralize(value: &str) -> String {
    match value.trim_start().chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{value}"),
        _ => value.to_string(),
    }
}

fn clock_time(at: Option<NaiveDateTime>) -> String {
    at.map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Renders records (already filtered and ordered) as CSV.
pub fn records_to_csv(records: &[RecordWithOwner]) -> Result<String, AttendanceError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let to_internal = |e: csv::Error| AttendanceError::Internal(e.to_string());

    writer.write_record(CSV_HEADER).map_err(to_internal)?;
    for row in records {
        writer
            .write_record([
                neutralize(&row.owner.employee_id),
                neutralize(&row.owner.name),
                neutralize(&row.owner.department),
                row.record.date.to_string(),
                clock_time(row.record.check_in_time),
                clock_time(row.record.check_out_time),
                row.record.total_hours.to_string(),
                row.record.status.to_string(),
            ])
            .map_err(to_internal)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AttendanceError::Internal(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| AttendanceError::Internal(e.to_string()))
}
