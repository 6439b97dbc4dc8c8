use anyhow::Result;
use msme_metrics::SurveyMetrics;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

pub struct SurveyVisualizer {
    output_dir: PathBuf,
}

impl SurveyVisualizer {
    pub fn new(output_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(output_dir)?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    pub fn generate_all_visualizations(&self, metrics: &SurveyMetrics) -> Result<Vec<PathBuf>> {
        println!("\n📈 Generating Survey Charts");
        println!("{}", "=".repeat(60));

        let charts = vec![
            self.generate_employment_by_size_chart(metrics)?,
            self.generate_sector_distribution_chart(metrics)?,
        ];
        Ok(charts)
    }

    fn generate_employment_by_size_chart(&self, metrics: &SurveyMetrics) -> Result<PathBuf> {
        let data: Vec<(&str, f64)> = metrics
            .employment_by_size
            .iter()
            .map(|s| (s.size_class.label(), s.employment))
            .collect();

        let output_path = self.output_dir.join("employment_by_size.png");
        let root = BitMapBackend::new(&output_path, (800, 600)).into_drawing_area();
        root.fill(&WHITE)?;

        let max_val = data.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        if max_val > 0.0 {
            let mut chart = ChartBuilder::on(&root)
                .caption("Total Employment by Firm Size (Capped)", ("sans-serif", 30).into_font())
                .margin(15)
                .x_label_area_size(50)
                .y_label_area_size(80)
                .build_cartesian_2d(-0.5..(data.len() as f64 - 0.5), 0.0..max_val * 1.1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_desc("Firm Size")
                .y_desc("Employees")
                .x_labels(data.len())
                .x_label_formatter(&|x| category_label(&data, *x))
                .draw()?;

            chart.draw_series(data.iter().enumerate().map(|(i, (_, value))| {
                let x = i as f64;
                Rectangle::new([(x - 0.35, 0.0), (x + 0.35, *value)], BLUE.filled())
            }))?;
        }

        root.present()?;
        drop(root);
        println!("  ✅ Saved {}", output_path.display());
        Ok(output_path)
    }

    fn generate_sector_distribution_chart(&self, metrics: &SurveyMetrics) -> Result<PathBuf> {
        // Largest sector at the top
        let data: Vec<(&str, f64)> = metrics
            .sector_distribution
            .iter()
            .rev()
            .map(|s| (s.sector.as_str(), s.firm_count as f64))
            .collect();

        let output_path = self.output_dir.join("sector_distribution.png");
        let root = BitMapBackend::new(&output_path, (1200, 700)).into_drawing_area();
        root.fill(&WHITE)?;

        let max_val = data.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        if max_val > 0.0 {
            let mut chart = ChartBuilder::on(&root)
                .caption("Firm Count by Manufacturing Sector", ("sans-serif", 30).into_font())
                .margin(15)
                .x_label_area_size(50)
                .y_label_area_size(360)
                .build_cartesian_2d(0.0..max_val * 1.1, -0.5..(data.len() as f64 - 0.5))?;

            chart
                .configure_mesh()
                .disable_y_mesh()
                .x_desc("Number of Firms")
                .y_labels(data.len())
                .y_label_formatter(&|y| category_label(&data, *y))
                .draw()?;

            chart.draw_series(data.iter().enumerate().map(|(i, (_, value))| {
                let y = i as f64;
                Rectangle::new([(0.0, y - 0.35), (*value, y + 0.35)], GREEN.filled())
            }))?;
        }

        root.present()?;
        drop(root);
        println!("  ✅ Saved {}", output_path.display());
        Ok(output_path)
    }
}

/// Label for a tick that sits on a category index, empty elsewhere
fn category_label(data: &[(&str, f64)], position: f64) -> String {
    let index = position.round();
    if (position - index).abs() > 0.05 || index < 0.0 {
        return String::new();
    }
    data.get(index as usize)
        .map(|(name, _)| name.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_label_only_on_integer_ticks() {
        let data = vec![("Micro", 10.0), ("Small", 5.0)];
        assert_eq!(category_label(&data, 0.0), "Micro");
        assert_eq!(category_label(&data, 1.02), "Small");
        assert_eq!(category_label(&data, 0.5), "");
        assert_eq!(category_label(&data, -1.0), "");
        assert_eq!(category_label(&data, 2.0), "");
    }
}
