pub mod calculator;
pub mod county_normalizer;
pub mod data_loader;
pub mod error;
pub mod export;
pub mod imputation;
pub mod isic;
pub mod models;
pub mod outliers;
pub mod pipeline;

pub use calculator::{MetricsCalculator, SurveyMetrics};
pub use county_normalizer::CountyNormalizer;
pub use data_loader::SurveyLoader;
pub use error::{PipelineError, Result};
pub use models::{CleanedRecord, FirmRecord, PipelineConfig};
pub use pipeline::{CleaningPipeline, DataQualityReport};
