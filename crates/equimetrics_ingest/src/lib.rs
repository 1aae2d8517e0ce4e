//! Ingestion validator: turns an uploaded CSV payload into equipment records.
//!
//! Validation is all-or-nothing. The header must carry every required column
//! (exact, case-sensitive names) and every row must coerce to the record
//! field types; the first violation rejects the whole batch. Callers only
//! touch the store after this module has returned `Ok`, so a rejection never
//! mutates anything.

mod error;

pub use error::IngestError;

use equimetrics_protocol::{EquipmentRecord, REQUIRED_COLUMNS};
use tracing::debug;

/// Result type for ingestion validation.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Positions of the required columns within one specific header row.
///
/// Resolved once per payload; row coercion never searches headers again.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    equipment_id: usize,
    equipment_name: usize,
    equipment_type: usize,
    status: usize,
    location: usize,
    purchase_year: usize,
    condition: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| !headers.iter().any(|h| h == **name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(IngestError::MissingColumns { missing });
        }

        // All positions exist past this point
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .unwrap_or_default()
        };

        Ok(Self {
            equipment_id: position("equipment_id"),
            equipment_name: position("equipment_name"),
            equipment_type: position("equipment_type"),
            status: position("status"),
            location: position("location"),
            purchase_year: position("purchase_year"),
            condition: position("condition"),
        })
    }
}

/// Parse and validate an uploaded CSV payload.
///
/// Returns the coerced records in file order, or the first constraint
/// violation. Columns beyond the required seven are ignored; empty cells
/// take the record defaults.
pub fn parse_equipment_csv(payload: &[u8]) -> Result<Vec<EquipmentRecord>> {
    let mut reader = csv::Reader::from_reader(payload);

    let headers = reader.headers()?.clone();
    let index = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row?;
        // 1-based data row number, header excluded
        records.push(coerce_row(&row, index, i + 1)?);
    }

    debug!(rows = records.len(), "CSV payload validated");

    Ok(records)
}

fn coerce_row(row: &csv::StringRecord, index: ColumnIndex, row_number: usize) -> Result<EquipmentRecord> {
    let cell = |pos: usize| row.get(pos).unwrap_or("").trim();

    let text_or = |pos: usize, default: &str| {
        let value = cell(pos);
        if value.is_empty() {
            default.to_string()
        } else {
            value.to_string()
        }
    };

    Ok(EquipmentRecord {
        equipment_id: coerce_int(cell(index.equipment_id), "equipment_id", row_number)?,
        equipment_name: text_or(index.equipment_name, ""),
        equipment_type: text_or(index.equipment_type, ""),
        status: text_or(index.status, "Unknown"),
        location: text_or(index.location, "Unknown"),
        purchase_year: coerce_int(cell(index.purchase_year), "purchase_year", row_number)?,
        condition: text_or(index.condition, "Unknown"),
    })
}

fn coerce_int(value: &str, column: &'static str, row_number: usize) -> Result<i64> {
    if value.is_empty() {
        return Ok(0);
    }
    value.parse().map_err(|_| IngestError::TypeCoercion {
        row: row_number,
        column,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "equipment_id,equipment_name,equipment_type,status,location,purchase_year,condition";

    #[test]
    fn parses_valid_payload_in_order() {
        let payload = format!(
            "{HEADER}\n\
             1,Pump-A-101,Pump,Active,Unit A,2019,Good\n\
             2,Valve-G-104,Valve,Idle,Unit B,2021,Excellent\n"
        );

        let records = parse_equipment_csv(payload.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].equipment_name, "Pump-A-101");
        assert_eq!(records[0].purchase_year, 2019);
        assert_eq!(records[1].equipment_type, "Valve");
        assert_eq!(records[1].condition, "Excellent");
    }

    #[test]
    fn header_order_does_not_matter() {
        let payload = "condition,purchase_year,location,status,equipment_type,equipment_name,equipment_id\n\
                       Good,2019,Unit A,Active,Pump,Pump-A-101,7\n";

        let records = parse_equipment_csv(payload.as_bytes()).unwrap();
        assert_eq!(records[0].equipment_id, 7);
        assert_eq!(records[0].equipment_type, "Pump");
        assert_eq!(records[0].condition, "Good");
    }

    #[test]
    fn missing_columns_are_listed_in_contract_order() {
        let payload = "equipment_id,equipment_name,status,location,purchase_year\n1,Pump,Active,Unit A,2019\n";

        let err = parse_equipment_csv(payload.as_bytes()).unwrap_err();
        match err {
            IngestError::MissingColumns { missing } => {
                assert_eq!(missing, vec!["equipment_type", "condition"]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn missing_condition_column_rejects_batch() {
        let payload = "equipment_id,equipment_name,equipment_type,status,location,purchase_year\n\
                       1,Pump-A-101,Pump,Active,Unit A,2019\n";

        assert!(matches!(
            parse_equipment_csv(payload.as_bytes()),
            Err(IngestError::MissingColumns { .. })
        ));
    }

    #[test]
    fn column_names_are_case_sensitive() {
        let payload = "Equipment_Id,equipment_name,equipment_type,status,location,purchase_year,condition\n";

        let err = parse_equipment_csv(payload.as_bytes()).unwrap_err();
        match err {
            IngestError::MissingColumns { missing } => {
                assert_eq!(missing, vec!["equipment_id"]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn bad_integer_rejects_whole_batch() {
        let payload = format!(
            "{HEADER}\n\
             1,Pump,Pump,Active,Unit A,2019,Good\n\
             2,Valve,Valve,Active,Unit B,twenty-twenty,Good\n"
        );

        let err = parse_equipment_csv(payload.as_bytes()).unwrap_err();
        match err {
            IngestError::TypeCoercion { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "purchase_year");
                assert_eq!(value, "twenty-twenty");
            }
            other => panic!("expected TypeCoercion, got {other:?}"),
        }
    }

    #[test]
    fn ragged_row_is_a_parse_error() {
        // 3 cells under a 7-column header
        let payload = format!("{HEADER}\n1,Pump-A-101,Pump\n");

        let err = parse_equipment_csv(payload.as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::Parse(_)));
    }

    #[test]
    fn empty_cells_take_defaults() {
        let payload = format!("{HEADER}\n,,Pump,,,,\n");

        let records = parse_equipment_csv(payload.as_bytes()).unwrap();
        let record = &records[0];
        assert_eq!(record.equipment_id, 0);
        assert_eq!(record.equipment_name, "");
        assert_eq!(record.status, "Unknown");
        assert_eq!(record.location, "Unknown");
        assert_eq!(record.purchase_year, 0);
        assert_eq!(record.condition, "Unknown");
    }

    #[test]
    fn extra_columns_are_ignored() {
        let payload = "equipment_id,equipment_name,equipment_type,status,location,purchase_year,condition,flowrate\n\
                       1,Pump-A-101,Pump,Active,Unit A,2019,Good,81.1\n";

        let records = parse_equipment_csv(payload.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].equipment_name, "Pump-A-101");
    }

    #[test]
    fn header_only_payload_yields_no_records() {
        let records = parse_equipment_csv(format!("{HEADER}\n").as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn negative_and_whitespace_integers_coerce() {
        let payload = format!("{HEADER}\n -3 ,Pump,Pump,Active,Unit A, 2019 ,Good\n");

        let records = parse_equipment_csv(payload.as_bytes()).unwrap();
        assert_eq!(records[0].equipment_id, -3);
        assert_eq!(records[0].purchase_year, 2019);
    }
}
