use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use msme_metrics::{export, CleaningPipeline, MetricsCalculator, PipelineConfig, SurveyLoader};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "msme_metrics")]
#[command(about = "Clean an MSME survey table and compute employment and policy metrics")]
struct Args {
    /// Raw survey CSV
    #[arg(short, long)]
    input: PathBuf,

    /// JSON pipeline configuration (cap threshold, sentinel code, mapping tables)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the cleaned table here (.parquet for Parquet, CSV otherwise)
    #[arg(long)]
    output_table: Option<PathBuf>,

    /// Metric report format
    #[arg(short, long, value_enum, default_value = "json")]
    output: OutputFormat,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Summary,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    let records = SurveyLoader::default()
        .load_csv(&args.input)
        .with_context(|| format!("Failed to load survey {}", args.input.display()))?;

    let pipeline = CleaningPipeline::new(&config)?;
    let cleaned = pipeline.run(&records)?;

    if let Some(path) = &args.output_table {
        export::write_table(&cleaned, path)
            .with_context(|| format!("Failed to write cleaned table {}", path.display()))?;
    }

    info!("Calculating survey metrics");
    let metrics = MetricsCalculator::calculate(&cleaned);

    match args.output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&metrics)?;
            println!("{}", json);
        }
        OutputFormat::Csv => {
            println!("Metric,Group,Value");
            println!("total_employment,all,{:.2}", metrics.total_employment);
            println!("average_firm_size,all,{:.2}", metrics.average_firm_size);
            for size in &metrics.employment_by_size {
                println!("firm_count,{},{}", size.size_class, size.firm_count);
                println!("employment,{},{:.2}", size.size_class, size.employment);
                println!("employment_share_pct,{},{:.2}", size.size_class, size.employment_share_pct);
            }
            for group in &metrics.efficiency.by_training {
                println!(
                    "mean_revenue_per_employee,{},{:.2}",
                    group.training_status, group.mean_revenue_per_employee
                );
            }
            println!("efficiency_gain_pct,all,{:.2}", metrics.efficiency.efficiency_gain_pct);
            println!(
                "female_employment_share_pct,all,{:.2}",
                metrics.gender_equity.female_employment_share_pct
            );
            println!("female_firm_share_pct,all,{:.2}", metrics.gender_equity.female_firm_share_pct);
            println!("employment_gap_pp,all,{:.2}", metrics.gender_equity.employment_gap_pp);
            for sector in &metrics.sector_distribution {
                println!("sector_firm_count,\"{}\",{}", sector.sector, sector.firm_count);
            }
        }
        OutputFormat::Summary => {
            println!("MSME Survey Summary");
            println!("===================");
            println!("Firms: {}", metrics.firm_count);
            println!("Total Employment (capped): {:.0}", metrics.total_employment);
            println!("Average Firm Size: {:.2}", metrics.average_firm_size);
            println!();
            println!(
                "Revenue per Employee: trained {:.2} vs untrained {:.2} ({:+.1}%)",
                metrics.efficiency.trained_mean,
                metrics.efficiency.untrained_mean,
                metrics.efficiency.efficiency_gain_pct
            );
            println!(
                "Female-owned firms: {:.2}% of firms, {:.2}% of employment (gap {:+.2} pp)",
                metrics.gender_equity.female_firm_share_pct,
                metrics.gender_equity.female_employment_share_pct,
                metrics.gender_equity.employment_gap_pp
            );
        }
    }

    Ok(())
}
