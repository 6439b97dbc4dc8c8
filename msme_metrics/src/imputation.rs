use crate::error::{PipelineError, Result};
use log::debug;

/// Median of the present values. `None` when nothing is present.
pub fn median(values: &[Option<f64>]) -> Option<f64> {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }

    present.sort_by(|a, b| a.total_cmp(b));
    let n = present.len();
    if n % 2 == 1 {
        Some(present[n / 2])
    } else {
        Some((present[n / 2 - 1] + present[n / 2]) / 2.0)
    }
}

/// Fills the gaps of one numeric column with the median of its raw values
#[derive(Debug, Clone, Copy)]
pub struct MedianImputer {
    fill_value: f64,
}

impl MedianImputer {
    /// Fit on the raw column. A column with no values at all cannot be imputed.
    pub fn fit(column_name: &str, values: &[Option<f64>]) -> Result<Self> {
        let fill_value = median(values).ok_or_else(|| {
            PipelineError::Computation(format!(
                "median of '{column_name}' is undefined: all {} values are missing",
                values.len()
            ))
        })?;

        let missing = values.iter().filter(|v| v.is_none()).count();
        debug!("{column_name}: median {fill_value}, imputing {missing} missing values");
        Ok(Self { fill_value })
    }

    pub fn fill_value(&self) -> f64 {
        self.fill_value
    }

    pub fn impute(&self, value: Option<f64>) -> f64 {
        value.unwrap_or(self.fill_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[Some(3.0), None, Some(1.0), Some(2.0)]), Some(2.0));
        assert_eq!(median(&[Some(4.0), Some(1.0), Some(3.0), Some(2.0)]), Some(2.5));
        assert_eq!(median(&[None, None]), None);
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_median_is_robust_to_outliers() {
        let values = [Some(2.0), Some(3.0), Some(4.0), Some(1000.0), Some(2.0)];
        assert_eq!(median(&values), Some(3.0));
    }

    #[test]
    fn test_impute_fills_only_missing() {
        let values = [Some(10.0), None, Some(30.0)];
        let imputer = MedianImputer::fit("Revenue", &values).unwrap();
        assert_eq!(imputer.fill_value(), 20.0);

        let filled: Vec<f64> = values.iter().map(|v| imputer.impute(*v)).collect();
        assert_eq!(filled, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_all_missing_is_computation_error() {
        let err = MedianImputer::fit("Employees", &[None, None, None]).unwrap_err();
        assert!(matches!(err, PipelineError::Computation(_)));
        assert!(err.to_string().contains("Employees"));
    }
}
