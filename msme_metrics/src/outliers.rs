/// Clips headcounts to an upper bound. Values above the bound are treated as
/// data-entry defects and truncated; nothing is clamped from below.
#[derive(Debug, Clone, Copy)]
pub struct OutlierCapper {
    upper_bound: f64,
}

impl OutlierCapper {
    pub fn new(upper_bound: u32) -> Self {
        Self {
            upper_bound: f64::from(upper_bound),
        }
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    pub fn cap(&self, value: f64) -> f64 {
        value.min(self.upper_bound)
    }

    pub fn is_outlier(&self, value: f64) -> bool {
        value > self.upper_bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_upper_bound_only() {
        let capper = OutlierCapper::new(50);
        assert_eq!(capper.cap(1000.0), 50.0);
        assert_eq!(capper.cap(50.0), 50.0);
        assert_eq!(capper.cap(3.0), 3.0);
        // No lower clamp
        assert_eq!(capper.cap(0.0), 0.0);
        assert_eq!(capper.cap(-4.0), -4.0);
    }

    #[test]
    fn test_is_outlier() {
        let capper = OutlierCapper::new(50);
        assert!(capper.is_outlier(50.5));
        assert!(!capper.is_outlier(50.0));
    }
}
