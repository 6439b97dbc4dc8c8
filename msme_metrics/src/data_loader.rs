use crate::error::{PipelineError, Result};
use crate::models::FirmRecord;
use log::{debug, info};
use std::io::Read;
use std::path::Path;

/// Column headers the raw survey table must carry
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "ID",
    "County",
    "Size",
    "Gender of owner",
    "Type of major production: industrial classification (ISIC)",
    "Training",
    "Revenue",
    "Employees",
];

pub struct SurveyLoader {
    delimiter: u8,
}

impl Default for SurveyLoader {
    fn default() -> Self {
        Self::new(b',')
    }
}

impl SurveyLoader {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Load the raw survey table from a CSV file
    pub fn load_csv<P: AsRef<Path>>(&self, path: P) -> Result<Vec<FirmRecord>> {
        let path = path.as_ref();
        info!("Loading survey data from {}", path.display());
        let file = std::fs::File::open(path)?;
        self.load_from_reader(file)
    }

    /// Load the raw survey table from any reader producing CSV text
    pub fn load_from_reader<R: Read>(&self, reader: R) -> Result<Vec<FirmRecord>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        check_schema(&headers)?;

        let mut records = Vec::new();
        for (row, result) in csv_reader.deserialize::<FirmRecord>().enumerate() {
            let mut record = result.map_err(|e| PipelineError::InvalidRecord {
                row,
                message: e.to_string(),
            })?;

            // "nan" parses as a float; it is a missing marker like any other
            record.revenue = record.revenue.filter(|v| !v.is_nan());
            record.employee_count = record.employee_count.filter(|v| !v.is_nan());
            records.push(record);
        }

        info!("Loaded {} survey records", records.len());
        debug!("Header: {:?}", headers);
        Ok(records)
    }
}

/// Fail with the full list of absent columns, before any row is read
fn check_schema(headers: &csv::StringRecord) -> Result<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == **required))
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::Schema { missing })
    }
}
