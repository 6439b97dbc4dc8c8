use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

pub const UNCLASSIFIED_SECTOR: &str = "Unclassified";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SizeClass {
    Micro,
    Small,
    Medium,
}

impl SizeClass {
    pub const ALL: [SizeClass; 3] = [SizeClass::Micro, SizeClass::Small, SizeClass::Medium];

    pub fn label(&self) -> &'static str {
        match self {
            SizeClass::Micro => "Micro",
            SizeClass::Small => "Small",
            SizeClass::Medium => "Medium",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OwnerGender {
    Male,
    Female,
}

impl OwnerGender {
    pub fn label(&self) -> &'static str {
        match self {
            OwnerGender::Male => "Male",
            OwnerGender::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TrainingStatus {
    #[serde(rename = "Received training")]
    ReceivedTraining,
    #[serde(rename = "No training")]
    NoTraining,
}

impl TrainingStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TrainingStatus::ReceivedTraining => "Received training",
            TrainingStatus::NoTraining => "No training",
        }
    }
}

macro_rules! impl_display_via_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

impl_display_via_label!(SizeClass, OwnerGender, TrainingStatus);

/// One survey response as it appears in the raw table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FirmRecord {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "County")]
    pub county: String,
    #[serde(rename = "Size")]
    pub size_class: SizeClass,
    #[serde(rename = "Gender of owner")]
    pub owner_gender: OwnerGender,
    #[serde(rename = "Type of major production: industrial classification (ISIC)")]
    pub production_text: String,
    #[serde(rename = "Training")]
    pub training_status: TrainingStatus,
    #[serde(rename = "Revenue", deserialize_with = "csv::invalid_option")]
    pub revenue: Option<f64>,
    #[serde(rename = "Employees", deserialize_with = "csv::invalid_option")]
    pub employee_count: Option<f64>,
}

/// A survey response after cleaning, carrying the five derived columns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CleanedRecord {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "County")]
    pub county: String,
    #[serde(rename = "Size")]
    pub size_class: SizeClass,
    #[serde(rename = "Gender of owner")]
    pub owner_gender: OwnerGender,
    #[serde(rename = "Type of major production: industrial classification (ISIC)")]
    pub production_text: String,
    #[serde(rename = "Training")]
    pub training_status: TrainingStatus,
    #[serde(rename = "Revenue")]
    pub revenue: f64,
    #[serde(rename = "Employees")]
    pub employee_count: f64,

    // Derived
    #[serde(rename = "Employees_Capped")]
    pub employee_count_capped: f64,
    #[serde(rename = "ISIC_Code")]
    pub classification_code: u32,
    #[serde(rename = "ISIC_2_Digit")]
    pub classification_prefix: String,
    #[serde(rename = "Sector")]
    pub sector: String,
    #[serde(rename = "Revenue_per_Employee")]
    pub revenue_per_employee: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectorRange {
    pub sector: String,
    pub prefixes: Vec<String>,
}

impl SectorRange {
    fn new(sector: &str, prefixes: &[&str]) -> Self {
        Self {
            sector: sector.to_string(),
            prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub cap_threshold: u32,
    pub sentinel_code: u32,
    /// Misspelled county -> canonical county, both case-insensitive
    pub county_mapping: BTreeMap<String, String>,
    pub sector_ranges: Vec<SectorRange>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let county_mapping = [
            ("nairobii", "nairobi"),
            ("naiirobi", "nairobi"),
            ("narobi", "nairobi"),
            ("kisu mu", "kisumu"),
            ("kiaambu", "kiambu"),
            ("nakuru.", "nakuru"),
            ("mombas a", "mombasa"),
            ("merru", "meru"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let sector_ranges = vec![
            SectorRange::new("Food, Beverages & Tobacco", &["10", "11", "12"]),
            SectorRange::new("Textiles, Apparel & Leather", &["13", "14", "15"]),
            SectorRange::new("Wood, Paper & Printing", &["16", "17", "18"]),
            SectorRange::new(
                "Chemicals, Plastics & Non-Metallic Minerals",
                &["19", "20", "21", "22", "23"],
            ),
            SectorRange::new("Basic & Fabricated Metals", &["24", "25"]),
            SectorRange::new("Electronic & Electrical Equipment", &["26", "27"]),
            SectorRange::new("Machinery & Transport Equipment", &["28", "29", "30"]),
            SectorRange::new("Other Manufacturing & Repair", &["31", "32", "33"]),
        ];

        Self {
            cap_threshold: 50,
            sentinel_code: 9999,
            county_mapping,
            sector_ranges,
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file; absent fields keep their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let config: PipelineConfig = serde_json::from_reader(file)?;
        if config.sector_ranges.is_empty() {
            return Err(PipelineError::Config(
                "sector_ranges must define at least one sector".to_string(),
            ));
        }
        Ok(config)
    }

    /// Labels of every sector a record can be assigned, "Unclassified" last
    pub fn sector_labels(&self) -> Vec<&str> {
        self.sector_ranges
            .iter()
            .map(|r| r.sector.as_str())
            .chain(std::iter::once(UNCLASSIFIED_SECTOR))
            .collect()
    }
}
