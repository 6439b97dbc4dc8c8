use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use msme_metrics::{
    export, CleanedRecord, CleaningPipeline, FirmRecord, MetricsCalculator, PipelineConfig,
    SurveyLoader,
};
use std::io;
use std::path::{Path, PathBuf};

mod survey_report;
mod survey_visualization;

use survey_report::SurveyReport;
use survey_visualization::SurveyVisualizer;

struct CleanedSurvey {
    raw: Vec<FirmRecord>,
    pipeline: CleaningPipeline,
    cleaned: Vec<CleanedRecord>,
}

fn load_and_clean(input: &Path) -> Result<CleanedSurvey> {
    let raw = SurveyLoader::default()
        .load_csv(input)
        .with_context(|| format!("Failed to load survey {}", input.display()))?;
    let pipeline = CleaningPipeline::new(&PipelineConfig::default())?;
    let cleaned = pipeline.run(&raw)?;
    Ok(CleanedSurvey {
        raw,
        pipeline,
        cleaned,
    })
}

fn clean_survey(input: &Path, output: &Path) -> Result<()> {
    let survey = load_and_clean(input)?;
    export::write_table(&survey.cleaned, output)?;
    println!("✅ Cleaned dataset saved to: {}", output.display());
    Ok(())
}

fn assess_survey(input: &Path) -> Result<()> {
    let raw = SurveyLoader::default().load_csv(input)?;
    let pipeline = CleaningPipeline::new(&PipelineConfig::default())?;
    let mut report = SurveyReport::new(io::stdout().lock());
    report.write_quality_assessment(&pipeline.assess(&raw))
}

fn report_survey(input: &Path) -> Result<()> {
    let survey = load_and_clean(input)?;
    let metrics = MetricsCalculator::calculate(&survey.cleaned);
    let mut report = SurveyReport::new(io::stdout().lock());
    report.write_metrics(&metrics)
}

fn chart_survey(input: &Path, output_dir: &Path) -> Result<()> {
    let survey = load_and_clean(input)?;
    let metrics = MetricsCalculator::calculate(&survey.cleaned);
    SurveyVisualizer::new(output_dir)?.generate_all_visualizations(&metrics)?;
    Ok(())
}

fn run_all(input: &Path, output_dir: &Path) -> Result<()> {
    println!("🚀 MSME Survey Pipeline: {}", input.display());
    std::fs::create_dir_all(output_dir)?;

    let pb = ProgressBar::new(4);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?,
    );

    pb.set_message("cleaning");
    let survey = load_and_clean(input)?;
    pb.inc(1);

    pb.set_message("computing metrics");
    let quality = survey.pipeline.assess(&survey.raw);
    let metrics = MetricsCalculator::calculate(&survey.cleaned);
    pb.inc(1);

    pb.set_message("exporting");
    export::write_table(&survey.cleaned, output_dir.join("cleaned_survey.csv"))?;
    export::write_json(&metrics, output_dir.join("metrics.json"))?;
    export::write_json(&quality, output_dir.join("data_quality.json"))?;
    pb.inc(1);

    pb.set_message("charting");
    let visualizer = SurveyVisualizer::new(&output_dir.join("charts"))?;
    pb.suspend(|| visualizer.generate_all_visualizations(&metrics))?;
    pb.inc(1);
    pb.finish_with_message("done");

    let mut report = SurveyReport::new(io::stdout().lock());
    report.write_quality_assessment(&quality)?;
    report.write_metrics(&metrics)?;

    println!("\n✅ All outputs written to {}", output_dir.display());
    Ok(())
}

fn print_usage() {
    println!("MSME Survey Pipeline");
    println!("Usage:");
    println!("  --clean <input.csv> <output.csv|.parquet>  Clean the survey and save the table");
    println!("  --assess <input.csv>                       Print the raw data-quality assessment");
    println!("  --report <input.csv>                       Print employment and policy metrics");
    println!("  --charts <input.csv> [dir]                 Render charts (default dir: charts)");
    println!("  --all <input.csv> [dir]                    Everything (default dir: survey_output)");
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let input = args.get(2).map(PathBuf::from);

    match (args.get(1).map(String::as_str), input) {
        (Some("--clean"), Some(input)) => {
            let output = args
                .get(3)
                .map(PathBuf::from)
                .context("--clean needs an output path")?;
            clean_survey(&input, &output)
        }
        (Some("--assess"), Some(input)) => assess_survey(&input),
        (Some("--report"), Some(input)) => report_survey(&input),
        (Some("--charts"), Some(input)) => {
            let dir = args.get(3).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("charts"));
            chart_survey(&input, &dir)
        }
        (Some("--all"), Some(input)) => {
            let dir = args
                .get(3)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("survey_output"));
            run_all(&input, &dir)
        }
        _ => {
            print_usage();
            Ok(())
        }
    }
}
