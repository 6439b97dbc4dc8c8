use criterion::{black_box, criterion_group, criterion_main, Criterion};
use msme_metrics::models::{FirmRecord, OwnerGender, SizeClass, TrainingStatus};
use msme_metrics::{CleaningPipeline, MetricsCalculator, PipelineConfig};

fn sample_survey(rows: usize) -> Vec<FirmRecord> {
    let counties = ["Nairobii", "kisu mu", "Nakuru.", "Mombasa", "merru", "Kiambu"];
    (0..rows)
        .map(|i| FirmRecord {
            id: (i % 4000) as i64,
            county: counties[i % counties.len()].to_string(),
            size_class: match i % 10 {
                0..=6 => SizeClass::Micro,
                7 | 8 => SizeClass::Small,
                _ => SizeClass::Medium,
            },
            owner_gender: if i % 3 == 0 { OwnerGender::Female } else { OwnerGender::Male },
            production_text: if i % 25 == 0 {
                "Unspecified production".to_string()
            } else {
                format!("{} Manufacture of goods", 1010 + (i * 37) % 2300)
            },
            training_status: if i % 2 == 0 {
                TrainingStatus::ReceivedTraining
            } else {
                TrainingStatus::NoTraining
            },
            revenue: if i % 40 == 0 { None } else { Some(10_000.0 + (i % 500) as f64 * 250.0) },
            employee_count: if i % 55 == 0 { None } else { Some(1.0 + (i % 80) as f64) },
        })
        .collect()
}

fn benchmark_cleaning(c: &mut Criterion) {
    let records = sample_survey(5016);
    let pipeline = CleaningPipeline::new(&PipelineConfig::default()).unwrap();

    c.bench_function("clean_5016_records", |b| {
        b.iter(|| {
            let _cleaned = black_box(pipeline.run(&records).unwrap());
        });
    });
}

fn benchmark_metrics(c: &mut Criterion) {
    let records = sample_survey(5016);
    let pipeline = CleaningPipeline::new(&PipelineConfig::default()).unwrap();
    let cleaned = pipeline.run(&records).unwrap();

    c.bench_function("metrics_5016_records", |b| {
        b.iter(|| {
            let _metrics = black_box(MetricsCalculator::calculate(&cleaned));
        });
    });
}

criterion_group!(benches, benchmark_cleaning, benchmark_metrics);
criterion_main!(benches);
