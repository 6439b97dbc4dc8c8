use msme_metrics::{CleaningPipeline, MetricsCalculator, PipelineConfig, SurveyLoader};

const SURVEY: &str = "\
ID,County,Size,Gender of owner,Type of major production: industrial classification (ISIC),Training,Revenue,Employees
1,Nairobii,Micro,Female,1061 Manufacture of grain mill products,No training,50000,3
2,kisu mu,Small,Male,1410 Manufacture of wearing apparel,Received training,240000,12
3,Nakuru.,Micro,Female,No code present,Received training,,2
4,Mombas a,Medium,Male,2511 Manufacture of structural metal products,No training,900000,1000
7,merru,Micro,Male,3100 Manufacture of furniture,Received training,60000,
7,Kiaambu,Small,Female,2220 Manufacture of plastics products,No training,150000,8
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let records = SurveyLoader::default().load_from_reader(SURVEY.as_bytes())?;
    let pipeline = CleaningPipeline::new(&PipelineConfig::default())?;

    let quality = pipeline.assess(&records);
    println!("Raw rows: {}", quality.row_count);
    println!("Rows sharing an ID: {}", quality.rows_with_duplicate_id);
    println!("Missing revenue/employees: {}/{}", quality.missing_revenue, quality.missing_employees);
    println!();

    let cleaned = pipeline.run(&records)?;
    println!("{:<4} {:<10} {:>8} {:>6}  {}", "ID", "County", "Capped", "ISIC", "Sector");
    for row in &cleaned {
        println!(
            "{:<4} {:<10} {:>8.1} {:>6}  {}",
            row.id, row.county, row.employee_count_capped, row.classification_code, row.sector
        );
    }
    println!();

    let metrics = MetricsCalculator::calculate(&cleaned);
    println!("Total employment: {:.0}", metrics.total_employment);
    println!("Average firm size: {:.2}", metrics.average_firm_size);
    println!("Training efficiency gain: {:.1}%", metrics.efficiency.efficiency_gain_pct);
    println!(
        "Female share of employment: {:.2}%",
        metrics.gender_equity.female_employment_share_pct
    );

    Ok(())
}
