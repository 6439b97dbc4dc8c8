use crate::models::{CleanedRecord, OwnerGender, SizeClass, TrainingStatus};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SizeClassSummary {
    pub size_class: SizeClass,
    pub firm_count: usize,
    pub employment: f64,
    pub mean_employment: f64,
    pub firm_share_pct: f64,
    pub employment_share_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingGenderSummary {
    pub training_status: TrainingStatus,
    pub owner_gender: OwnerGender,
    pub firm_count: usize,
    pub mean_employment: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingEfficiency {
    pub training_status: TrainingStatus,
    pub firm_count: usize,
    pub mean_revenue_per_employee: f64,
}

/// Revenue-per-employee comparison between trained and untrained firms
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EfficiencyMetric {
    pub by_training: Vec<TrainingEfficiency>,
    pub trained_mean: f64,
    pub untrained_mean: f64,
    /// (trained - untrained) / untrained, in percent
    pub efficiency_gain_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenderEquityMetric {
    pub female_employment: f64,
    pub female_firm_count: usize,
    pub female_employment_share_pct: f64,
    pub female_firm_share_pct: f64,
    /// Firm share minus employment share, in percentage points
    pub employment_gap_pp: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectorSummary {
    pub sector: String,
    pub firm_count: usize,
    pub employment: f64,
    pub firm_share_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurveyMetrics {
    pub firm_count: usize,
    pub total_employment: f64,
    pub average_firm_size: f64,
    pub employment_by_size: Vec<SizeClassSummary>,
    pub employment_by_training_gender: Vec<TrainingGenderSummary>,
    pub efficiency: EfficiencyMetric,
    pub gender_equity: GenderEquityMetric,
    pub sector_distribution: Vec<SectorSummary>,
}

/// Ratio that is 0 instead of a fault when the denominator is 0
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}

fn percent(part: f64, whole: f64) -> f64 {
    safe_ratio(part, whole) * 100.0
}

#[derive(Default, Clone, Copy)]
struct Accumulator {
    count: usize,
    sum: f64,
}

impl Accumulator {
    fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
    }

    fn mean(&self) -> f64 {
        safe_ratio(self.sum, self.count as f64)
    }
}

pub struct MetricsCalculator;

impl MetricsCalculator {
    pub fn calculate(records: &[CleanedRecord]) -> SurveyMetrics {
        let firm_count = records.len();
        let total_employment: f64 = records.iter().map(|r| r.employee_count_capped).sum();

        let metrics = SurveyMetrics {
            firm_count,
            total_employment,
            average_firm_size: safe_ratio(total_employment, firm_count as f64),
            employment_by_size: Self::employment_by_size(records, total_employment),
            employment_by_training_gender: Self::employment_by_training_gender(records),
            efficiency: Self::efficiency(records),
            gender_equity: Self::gender_equity(records, total_employment),
            sector_distribution: Self::sector_distribution(records),
        };

        info!(
            "Computed metrics for {} firms: total employment {:.0}, average size {:.2}",
            metrics.firm_count, metrics.total_employment, metrics.average_firm_size
        );
        metrics
    }

    fn employment_by_size(records: &[CleanedRecord], total_employment: f64) -> Vec<SizeClassSummary> {
        let mut groups: BTreeMap<SizeClass, Accumulator> = BTreeMap::new();
        for record in records {
            groups
                .entry(record.size_class)
                .or_default()
                .add(record.employee_count_capped);
        }

        let firm_count = records.len() as f64;
        groups
            .into_iter()
            .map(|(size_class, acc)| SizeClassSummary {
                size_class,
                firm_count: acc.count,
                employment: acc.sum,
                mean_employment: acc.mean(),
                firm_share_pct: percent(acc.count as f64, firm_count),
                employment_share_pct: percent(acc.sum, total_employment),
            })
            .collect()
    }

    fn employment_by_training_gender(records: &[CleanedRecord]) -> Vec<TrainingGenderSummary> {
        let mut groups: BTreeMap<(TrainingStatus, OwnerGender), Accumulator> = BTreeMap::new();
        for record in records {
            groups
                .entry((record.training_status, record.owner_gender))
                .or_default()
                .add(record.employee_count_capped);
        }

        groups
            .into_iter()
            .map(|((training_status, owner_gender), acc)| TrainingGenderSummary {
                training_status,
                owner_gender,
                firm_count: acc.count,
                mean_employment: acc.mean(),
            })
            .collect()
    }

    fn efficiency(records: &[CleanedRecord]) -> EfficiencyMetric {
        let mut groups: BTreeMap<TrainingStatus, Accumulator> = BTreeMap::new();
        for record in records {
            groups
                .entry(record.training_status)
                .or_default()
                .add(record.revenue_per_employee);
        }

        let mean_of = |status| groups.get(&status).map(Accumulator::mean).unwrap_or(0.0);
        let trained_mean = mean_of(TrainingStatus::ReceivedTraining);
        let untrained_mean = mean_of(TrainingStatus::NoTraining);

        EfficiencyMetric {
            by_training: groups
                .iter()
                .map(|(status, acc)| TrainingEfficiency {
                    training_status: *status,
                    firm_count: acc.count,
                    mean_revenue_per_employee: acc.mean(),
                })
                .collect(),
            trained_mean,
            untrained_mean,
            efficiency_gain_pct: percent(trained_mean - untrained_mean, untrained_mean),
        }
    }

    fn gender_equity(records: &[CleanedRecord], total_employment: f64) -> GenderEquityMetric {
        let mut female = Accumulator::default();
        for record in records.iter().filter(|r| r.owner_gender == OwnerGender::Female) {
            female.add(record.employee_count_capped);
        }

        let female_employment_share_pct = percent(female.sum, total_employment);
        let female_firm_share_pct = percent(female.count as f64, records.len() as f64);

        GenderEquityMetric {
            female_employment: female.sum,
            female_firm_count: female.count,
            female_employment_share_pct,
            female_firm_share_pct,
            employment_gap_pp: female_firm_share_pct - female_employment_share_pct,
        }
    }

    fn sector_distribution(records: &[CleanedRecord]) -> Vec<SectorSummary> {
        let mut groups: HashMap<&str, Accumulator> = HashMap::new();
        for record in records {
            groups
                .entry(record.sector.as_str())
                .or_default()
                .add(record.employee_count_capped);
        }

        let firm_count = records.len() as f64;
        let mut sectors: Vec<SectorSummary> = groups
            .into_iter()
            .map(|(sector, acc)| SectorSummary {
                sector: sector.to_string(),
                firm_count: acc.count,
                employment: acc.sum,
                firm_share_pct: percent(acc.count as f64, firm_count),
            })
            .collect();

        sectors.sort_by(|a, b| {
            b.firm_count
                .cmp(&a.firm_count)
                .then_with(|| a.sector.cmp(&b.sector))
        });
        sectors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        size_class: SizeClass,
        owner_gender: OwnerGender,
        training_status: TrainingStatus,
        employees: f64,
        revenue_per_employee: f64,
        sector: &str,
    ) -> CleanedRecord {
        CleanedRecord {
            id: 1,
            county: "Nairobi".to_string(),
            size_class,
            owner_gender,
            production_text: String::new(),
            training_status,
            revenue: revenue_per_employee * employees,
            employee_count: employees,
            employee_count_capped: employees,
            classification_code: 1061,
            classification_prefix: "10".to_string(),
            sector: sector.to_string(),
            revenue_per_employee,
        }
    }

    fn sample() -> Vec<CleanedRecord> {
        use OwnerGender::*;
        use SizeClass::*;
        use TrainingStatus::*;
        vec![
            record(Micro, Female, NoTraining, 2.0, 100.0, "Food, Beverages & Tobacco"),
            record(Micro, Male, ReceivedTraining, 4.0, 150.0, "Food, Beverages & Tobacco"),
            record(Small, Female, ReceivedTraining, 20.0, 150.0, "Basic & Fabricated Metals"),
            record(Medium, Male, NoTraining, 50.0, 100.0, "Unclassified"),
            record(Micro, Male, NoTraining, 4.0, 100.0, "Basic & Fabricated Metals"),
        ]
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_totals_and_average() {
        let metrics = MetricsCalculator::calculate(&sample());
        assert_eq!(metrics.firm_count, 5);
        assert_eq!(metrics.total_employment, 80.0);
        assert_eq!(metrics.average_firm_size, 16.0);
    }

    #[test]
    fn test_size_class_table_is_consistent() {
        let metrics = MetricsCalculator::calculate(&sample());
        let by_size = &metrics.employment_by_size;

        assert_eq!(
            by_size.iter().map(|s| s.size_class).collect::<Vec<_>>(),
            vec![SizeClass::Micro, SizeClass::Small, SizeClass::Medium]
        );
        let employment: f64 = by_size.iter().map(|s| s.employment).sum();
        let firms: usize = by_size.iter().map(|s| s.firm_count).sum();
        assert_eq!(employment, metrics.total_employment);
        assert_eq!(firms, metrics.firm_count);

        assert_eq!(by_size[0].firm_count, 3);
        assert_eq!(by_size[0].employment, 10.0);
        assert!(approx(by_size[0].firm_share_pct, 60.0));
        assert!(approx(by_size[0].employment_share_pct, 12.5));
        assert!(approx(by_size[0].mean_employment, 10.0 / 3.0));
    }

    #[test]
    fn test_training_gender_means() {
        let metrics = MetricsCalculator::calculate(&sample());
        let cell = metrics
            .employment_by_training_gender
            .iter()
            .find(|c| c.training_status == TrainingStatus::NoTraining && c.owner_gender == OwnerGender::Male)
            .unwrap();
        assert_eq!(cell.firm_count, 2);
        assert_eq!(cell.mean_employment, 27.0);
        assert_eq!(metrics.employment_by_training_gender.len(), 4);
    }

    #[test]
    fn test_efficiency_gain() {
        let metrics = MetricsCalculator::calculate(&sample());
        assert_eq!(metrics.efficiency.trained_mean, 150.0);
        assert_eq!(metrics.efficiency.untrained_mean, 100.0);
        assert!(approx(metrics.efficiency.efficiency_gain_pct, 50.0));
        assert_eq!(metrics.efficiency.by_training.len(), 2);
    }

    #[test]
    fn test_efficiency_without_untrained_firms_is_zero() {
        let records = vec![record(
            SizeClass::Micro,
            OwnerGender::Male,
            TrainingStatus::ReceivedTraining,
            3.0,
            200.0,
            "Unclassified",
        )];
        let metrics = MetricsCalculator::calculate(&records);
        assert_eq!(metrics.efficiency.untrained_mean, 0.0);
        assert_eq!(metrics.efficiency.efficiency_gain_pct, 0.0);
    }

    #[test]
    fn test_gender_equity() {
        let metrics = MetricsCalculator::calculate(&sample());
        let equity = &metrics.gender_equity;
        assert_eq!(equity.female_firm_count, 2);
        assert_eq!(equity.female_employment, 22.0);
        assert!(approx(equity.female_employment_share_pct, 27.5));
        assert!(approx(equity.female_firm_share_pct, 40.0));
        assert!(approx(equity.employment_gap_pp, 12.5));
    }

    #[test]
    fn test_sector_distribution_order() {
        let metrics = MetricsCalculator::calculate(&sample());
        let sectors: Vec<&str> = metrics
            .sector_distribution
            .iter()
            .map(|s| s.sector.as_str())
            .collect();
        assert_eq!(
            sectors,
            vec!["Basic & Fabricated Metals", "Food, Beverages & Tobacco", "Unclassified"]
        );
    }

    #[test]
    fn test_empty_table_yields_zeros() {
        let metrics = MetricsCalculator::calculate(&[]);
        assert_eq!(metrics.firm_count, 0);
        assert_eq!(metrics.average_firm_size, 0.0);
        assert!(metrics.employment_by_size.is_empty());
        assert_eq!(metrics.gender_equity.female_employment_share_pct, 0.0);
        assert_eq!(metrics.gender_equity.employment_gap_pp, 0.0);
    }

    #[test]
    fn test_documented_sample_average() {
        // 5,016 firms holding 11,277 capped jobs
        let mut records = Vec::with_capacity(5016);
        for i in 0..5016 {
            let employees = if i < 1245 { 3.0 } else { 2.0 };
            records.push(record(
                SizeClass::Micro,
                OwnerGender::Male,
                TrainingStatus::NoTraining,
                employees,
                0.0,
                "Unclassified",
            ));
        }
        // 1245 * 3 + 3771 * 2 = 11277

        let metrics = MetricsCalculator::calculate(&records);
        assert_eq!(metrics.total_employment, 11277.0);
        assert!(approx(metrics.average_firm_size, 11277.0 / 5016.0));
        assert!((metrics.average_firm_size - 2.25).abs() < 0.01);
    }
}
