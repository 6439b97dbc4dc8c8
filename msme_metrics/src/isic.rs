use crate::error::{PipelineError, Result};
use crate::models::{SectorRange, UNCLASSIFIED_SECTOR};
use regex::Regex;
use std::collections::HashMap;

/// Pulls the 4-digit ISIC code out of a free-text production description
pub struct CodeExtractor {
    pattern: Regex,
    sentinel_code: u32,
}

impl CodeExtractor {
    pub fn new(sentinel_code: u32) -> Result<Self> {
        // ASCII digits only; `\d` would also accept other Unicode digits
        let pattern = Regex::new(r"[0-9]{4}")
            .map_err(|e| PipelineError::Config(format!("invalid ISIC pattern: {e}")))?;
        Ok(Self {
            pattern,
            sentinel_code,
        })
    }

    /// First four consecutive digits in the text, or the sentinel code
    pub fn extract(&self, text: &str) -> u32 {
        self.find_code(text).unwrap_or(self.sentinel_code)
    }

    pub fn find_code(&self, text: &str) -> Option<u32> {
        self.pattern
            .find(text)
            .and_then(|m| m.as_str().parse().ok())
    }
}

/// First two characters of the code's decimal form
pub fn code_prefix(code: u32) -> String {
    code.to_string().chars().take(2).collect()
}

/// Range lookup from a 2-digit ISIC prefix to a policy sector
pub struct SectorClassifier {
    by_prefix: HashMap<String, String>,
}

impl SectorClassifier {
    pub fn new(ranges: &[SectorRange]) -> Result<Self> {
        let mut by_prefix = HashMap::new();

        for range in ranges {
            for prefix in &range.prefixes {
                if let Some(existing) = by_prefix.insert(prefix.clone(), range.sector.clone()) {
                    return Err(PipelineError::Config(format!(
                        "ISIC prefix '{prefix}' is assigned to both '{existing}' and '{}'",
                        range.sector
                    )));
                }
            }
        }

        Ok(Self { by_prefix })
    }

    pub fn classify(&self, prefix: &str) -> &str {
        self.by_prefix
            .get(prefix)
            .map(String::as_str)
            .unwrap_or(UNCLASSIFIED_SECTOR)
    }
}
