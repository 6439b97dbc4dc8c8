use crate::error::Result;
use crate::models::CleanedRecord;
use log::info;
use polars::prelude::*;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Parquet,
}

impl TableFormat {
    /// Parquet for a `.parquet` extension, CSV for anything else
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("parquet") => TableFormat::Parquet,
            _ => TableFormat::Csv,
        }
    }
}

/// Cleaned table as a DataFrame: the 8 source columns plus the 5 derived ones
pub fn to_dataframe(records: &[CleanedRecord]) -> Result<DataFrame> {
    let df = polars::df!(
        "ID" => records.iter().map(|r| r.id).collect::<Vec<i64>>(),
        "County" => records.iter().map(|r| r.county.clone()).collect::<Vec<String>>(),
        "Size" => records.iter().map(|r| r.size_class.label()).collect::<Vec<&str>>(),
        "Gender of owner" => records.iter().map(|r| r.owner_gender.label()).collect::<Vec<&str>>(),
        "Type of major production: industrial classification (ISIC)" =>
            records.iter().map(|r| r.production_text.clone()).collect::<Vec<String>>(),
        "Training" => records.iter().map(|r| r.training_status.label()).collect::<Vec<&str>>(),
        "Revenue" => records.iter().map(|r| r.revenue).collect::<Vec<f64>>(),
        "Employees" => records.iter().map(|r| r.employee_count).collect::<Vec<f64>>(),
        "Employees_Capped" => records.iter().map(|r| r.employee_count_capped).collect::<Vec<f64>>(),
        "ISIC_Code" => records.iter().map(|r| r.classification_code).collect::<Vec<u32>>(),
        "ISIC_2_Digit" => records.iter().map(|r| r.classification_prefix.clone()).collect::<Vec<String>>(),
        "Sector" => records.iter().map(|r| r.sector.clone()).collect::<Vec<String>>(),
        "Revenue_per_Employee" => records.iter().map(|r| r.revenue_per_employee).collect::<Vec<f64>>()
    )?;
    Ok(df)
}

/// Write the cleaned table, choosing CSV or Parquet from the file extension
pub fn write_table<P: AsRef<Path>>(records: &[CleanedRecord], path: P) -> Result<()> {
    let path = path.as_ref();
    match TableFormat::from_path(path) {
        TableFormat::Csv => write_csv(records, path)?,
        TableFormat::Parquet => {
            let mut df = to_dataframe(records)?;
            let file = std::fs::File::create(path)?;
            ParquetWriter::new(file).finish(&mut df)?;
        }
    }
    info!("Wrote {} cleaned records to {}", records.len(), path.display());
    Ok(())
}

fn write_csv(records: &[CleanedRecord], path: &Path) -> Result<()> {
    let mut writer = ::csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let file = std::fs::File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}
