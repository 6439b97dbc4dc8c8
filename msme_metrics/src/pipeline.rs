use crate::county_normalizer::CountyNormalizer;
use crate::error::Result;
use crate::imputation::MedianImputer;
use crate::isic::{code_prefix, CodeExtractor, SectorClassifier};
use crate::models::{CleanedRecord, FirmRecord, PipelineConfig, UNCLASSIFIED_SECTOR};
use crate::outliers::OutlierCapper;
use log::{info, warn};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Issues found in the raw table before any repair is applied
#[derive(Debug, Clone, Serialize)]
pub struct DataQualityReport {
    pub row_count: usize,
    pub distinct_county_spellings: usize,
    pub county_sample: Vec<String>,
    pub rows_with_duplicate_id: usize,
    pub missing_revenue: usize,
    pub missing_employees: usize,
    pub min_employees: Option<f64>,
    pub max_employees: Option<f64>,
    pub rows_above_cap: usize,
    pub rows_without_isic_code: usize,
}

/// Revenue per capped employee. Zero when the headcount is not positive or
/// the ratio is not a finite non-negative number.
pub fn revenue_per_employee(revenue: f64, employees_capped: f64) -> f64 {
    if employees_capped <= 0.0 {
        return 0.0;
    }
    let ratio = revenue / employees_capped;
    if ratio.is_finite() && ratio >= 0.0 {
        ratio
    } else {
        0.0
    }
}

pub struct CleaningPipeline {
    normalizer: CountyNormalizer,
    capper: OutlierCapper,
    extractor: CodeExtractor,
    classifier: SectorClassifier,
}

impl CleaningPipeline {
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        Ok(Self {
            normalizer: CountyNormalizer::new(&config.county_mapping)?,
            capper: OutlierCapper::new(config.cap_threshold),
            extractor: CodeExtractor::new(config.sentinel_code)?,
            classifier: SectorClassifier::new(&config.sector_ranges)?,
        })
    }

    /// Survey the raw table for the defects the cleaning steps repair
    pub fn assess(&self, records: &[FirmRecord]) -> DataQualityReport {
        let mut county_sample = Vec::new();
        let mut seen_counties = HashSet::new();
        for record in records {
            if seen_counties.insert(record.county.as_str()) && county_sample.len() < 10 {
                county_sample.push(record.county.clone());
            }
        }

        let mut id_counts: HashMap<i64, usize> = HashMap::new();
        for record in records {
            *id_counts.entry(record.id).or_insert(0) += 1;
        }
        let rows_with_duplicate_id = id_counts.values().filter(|&&n| n > 1).sum();

        let employees: Vec<f64> = records.iter().filter_map(|r| r.employee_count).collect();

        DataQualityReport {
            row_count: records.len(),
            distinct_county_spellings: seen_counties.len(),
            county_sample,
            rows_with_duplicate_id,
            missing_revenue: records.iter().filter(|r| r.revenue.is_none()).count(),
            missing_employees: records.len() - employees.len(),
            min_employees: employees.iter().copied().reduce(f64::min),
            max_employees: employees.iter().copied().reduce(f64::max),
            rows_above_cap: employees.iter().filter(|&&e| self.capper.is_outlier(e)).count(),
            rows_without_isic_code: records
                .iter()
                .filter(|r| self.extractor.find_code(&r.production_text).is_none())
                .count(),
        }
    }

    /// Run every cleaning and derivation step. Produces exactly one cleaned
    /// record per input record, in input order.
    pub fn run(&self, records: &[FirmRecord]) -> Result<Vec<CleanedRecord>> {
        info!("Cleaning {} survey records", records.len());
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let revenues: Vec<Option<f64>> = records.iter().map(|r| r.revenue).collect();
        let employees: Vec<Option<f64>> = records.iter().map(|r| r.employee_count).collect();
        let revenue_imputer = MedianImputer::fit("Revenue", &revenues)?;
        let employee_imputer = MedianImputer::fit("Employees", &employees)?;

        let mut capped_rows = 0;
        let mut unclassified_rows = 0;

        let cleaned: Vec<CleanedRecord> = records
            .iter()
            .map(|record| {
                let revenue = revenue_imputer.impute(record.revenue);
                let employee_count = employee_imputer.impute(record.employee_count);

                let employee_count_capped = self.capper.cap(employee_count);
                if employee_count_capped < employee_count {
                    capped_rows += 1;
                }

                let classification_code = self.extractor.extract(&record.production_text);
                let classification_prefix = code_prefix(classification_code);
                let sector = self.classifier.classify(&classification_prefix).to_string();
                if sector == UNCLASSIFIED_SECTOR {
                    unclassified_rows += 1;
                }

                CleanedRecord {
                    id: record.id,
                    county: self.normalizer.normalize(&record.county),
                    size_class: record.size_class,
                    owner_gender: record.owner_gender,
                    production_text: record.production_text.clone(),
                    training_status: record.training_status,
                    revenue,
                    employee_count,
                    employee_count_capped,
                    classification_code,
                    classification_prefix,
                    sector,
                    revenue_per_employee: revenue_per_employee(revenue, employee_count_capped),
                }
            })
            .collect();

        if capped_rows > 0 {
            warn!(
                "Capped {} headcounts above {}",
                capped_rows,
                self.capper.upper_bound()
            );
        }
        if unclassified_rows > 0 {
            warn!("{} records have no recognised ISIC sector", unclassified_rows);
        }
        info!("Cleaning complete: {} records", cleaned.len());

        Ok(cleaned)
    }
}
