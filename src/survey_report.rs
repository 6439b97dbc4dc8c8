use anyhow::Result;
use chrono::Local;
use msme_metrics::{DataQualityReport, SurveyMetrics};
use std::io::Write;

/// Console report for the data-quality assessment and the survey metrics
pub struct SurveyReport<W: Write> {
    out: W,
}

impl<W: Write> SurveyReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_quality_assessment(&mut self, quality: &DataQualityReport) -> Result<()> {
        let out = &mut self.out;
        writeln!(out, "\n🔍 Data Quality Assessment")?;
        writeln!(out, "{}", "=".repeat(60))?;
        writeln!(out, "Rows: {}", quality.row_count)?;

        writeln!(out, "\nIssue 1: Inconsistent county names")?;
        writeln!(
            out,
            "  {} distinct spellings, sample: {}",
            quality.distinct_county_spellings,
            quality.county_sample.join(", ")
        )?;

        writeln!(out, "\nIssue 2: Duplicate IDs")?;
        writeln!(out, "  {} rows share an ID with another row (all retained)", quality.rows_with_duplicate_id)?;

        writeln!(out, "\nIssue 3: Missing values")?;
        writeln!(out, "  Revenue:   {}", quality.missing_revenue)?;
        writeln!(out, "  Employees: {}", quality.missing_employees)?;

        writeln!(out, "\nIssue 4: Outliers in employees")?;
        match (quality.min_employees, quality.max_employees) {
            (Some(min), Some(max)) => writeln!(out, "  Min {:.0}, max {:.0}", min, max)?,
            _ => writeln!(out, "  No employee counts present")?,
        }
        writeln!(out, "  {} rows above the cap", quality.rows_above_cap)?;

        writeln!(out, "\nIssue 5: Unstructured production text")?;
        writeln!(out, "  {} rows without a 4-digit ISIC code", quality.rows_without_isic_code)?;
        Ok(())
    }

    pub fn write_metrics(&mut self, metrics: &SurveyMetrics) -> Result<()> {
        let out = &mut self.out;
        writeln!(out, "\n📊 MSME Employment & Policy Metrics")?;
        writeln!(out, "{}", "=".repeat(60))?;
        writeln!(out, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M"))?;

        writeln!(out, "\nTotal Employment (Capped): {:.0}", metrics.total_employment)?;
        writeln!(out, "Average Employment per Firm: {:.2}", metrics.average_firm_size)?;

        writeln!(out, "\nEmployment by Firm Size:")?;
        writeln!(
            out,
            "  {:<8} {:>7} {:>9} {:>7} {:>8} {:>8}",
            "Size", "Firms", "Employed", "Mean", "Firms %", "Empl %"
        )?;
        for size in &metrics.employment_by_size {
            writeln!(
                out,
                "  {:<8} {:>7} {:>9.0} {:>7.2} {:>8.2} {:>8.2}",
                size.size_class.label(),
                size.firm_count,
                size.employment,
                size.mean_employment,
                size.firm_share_pct,
                size.employment_share_pct
            )?;
        }

        writeln!(out, "\nMean Employment by Training and Owner Gender:")?;
        for cell in &metrics.employment_by_training_gender {
            writeln!(
                out,
                "  {:<18} {:<7} {:>6} firms {:>7.2}",
                cell.training_status.label(),
                cell.owner_gender.label(),
                cell.firm_count,
                cell.mean_employment
            )?;
        }

        writeln!(out, "\nSector Distribution:")?;
        for sector in &metrics.sector_distribution {
            writeln!(
                out,
                "  {:<45} {:>6} firms {:>6.2}%",
                sector.sector, sector.firm_count, sector.firm_share_pct
            )?;
        }

        let efficiency = &metrics.efficiency;
        writeln!(out, "\nMetric 1: Revenue per Employee by Training Status")?;
        for group in &efficiency.by_training {
            writeln!(
                out,
                "  {:<18} {:>12.2}",
                group.training_status.label(),
                group.mean_revenue_per_employee
            )?;
        }
        writeln!(out, "  Efficiency gain from training: {:+.2}%", efficiency.efficiency_gain_pct)?;

        let equity = &metrics.gender_equity;
        writeln!(out, "\nMetric 2: Female-Owned Firms' Share of Total Employment")?;
        writeln!(out, "  Share of employment: {:.2}%", equity.female_employment_share_pct)?;
        writeln!(out, "  Share of firms:      {:.2}%", equity.female_firm_share_pct)?;
        writeln!(out, "  Employment gap:      {:+.2} pp", equity.employment_gap_pp)?;
        Ok(())
    }
}
