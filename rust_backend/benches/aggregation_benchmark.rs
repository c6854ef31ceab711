use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use roster_rust::models::{ColumnKey, EmployeeRecord, NormalizedRow, RecordId, MANAGER_COLUMNS};
use roster_rust::services::analytics::{
    aggregate, prepare_analytics_rows, AggregationRequest, AnalyticsRow, AnalyticsSettings, Axis,
    ImputationPolicy, SeriesMode,
};
use roster_rust::services::nice_axis::{nice_axis, NiceAxisRequest};
use roster_rust::services::CategoryCandidates;
use roster_rust::transformations::{normalize, sort_rows, ActivePolicy, SortDirection, SortState};

const REASONS: [&str; 5] = ["家庭問題", "給与不満", "キャリアアップ", "その他", "N/A"];
const DEPARTMENTS: [&str; 4] = ["人事", "営業", "開発", "派遣"];

fn reference() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn synthetic_records(count: usize) -> Vec<EmployeeRecord> {
    (0..count)
        .map(|i| {
            let record = EmployeeRecord::new(RecordId::from(i as i64 + 1))
                .with(ColumnKey::Name, format!("社員{}", i).as_str())
                .with(ColumnKey::Department, DEPARTMENTS[i % DEPARTMENTS.len()])
                .with(ColumnKey::Reason, REASONS[i % REASONS.len()])
                .with(ColumnKey::JoinDate, "2015/4/1")
                .with(ColumnKey::BirthDate, "1990/5/1");
            // Every seventh record is undated.
            if i % 7 == 0 {
                record
            } else {
                let date = reference() - Duration::days((i * 13 % 1500) as i64);
                record.with(ColumnKey::RetireDate, date.format("%Y/%m/%d").to_string().as_str())
            }
        })
        .collect()
}

fn bench_prepare(c: &mut Criterion) {
    let mut group = c.benchmark_group("analytics_prepare");
    let candidates = CategoryCandidates::default();

    for size in [100usize, 1_000, 10_000] {
        let records = synthetic_records(size);
        group.bench_with_input(BenchmarkId::new("prepare_rows", size), &records, |b, records| {
            b.iter(|| prepare_analytics_rows(black_box(records), &candidates, reference()));
        });
    }

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("analytics_aggregate");
    let everything = |_: &AnalyticsRow| true;

    for size in [100usize, 1_000, 10_000] {
        let data = prepare_analytics_rows(&synthetic_records(size), &CategoryCandidates::default(), reference());

        let month = AggregationRequest {
            axis: Axis::Month,
            series_mode: SeriesMode::Reason,
        };
        group.bench_with_input(BenchmarkId::new("month_by_reason", size), &data, |b, data| {
            b.iter(|| aggregate(black_box(data), &month, &everything, &AnalyticsSettings::default(), reference()));
        });

        let year = AggregationRequest {
            axis: Axis::Year,
            series_mode: SeriesMode::AgeBand,
        };
        let distribute = AnalyticsSettings {
            imputation: ImputationPolicy::Distribute,
            ..AnalyticsSettings::default()
        };
        group.bench_with_input(BenchmarkId::new("year_by_age_distributed", size), &data, |b, data| {
            b.iter(|| aggregate(black_box(data), &year, &everything, &distribute, reference()));
        });
    }

    group.finish();
}

fn bench_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("table");
    let records = synthetic_records(5_000);

    group.bench_function("normalize_5000", |b| {
        b.iter(|| normalize(black_box(&records), MANAGER_COLUMNS, ActivePolicy::RetireDateBlank));
    });

    let rows: Vec<NormalizedRow> = normalize(&records, MANAGER_COLUMNS, ActivePolicy::RetireDateBlank);
    let state = SortState {
        column: Some(ColumnKey::RetireDate),
        direction: Some(SortDirection::Desc),
    };
    group.bench_function("sort_by_retire_date_5000", |b| {
        b.iter(|| {
            let mut sorted = rows.clone();
            sort_rows(black_box(&mut sorted), &state, MANAGER_COLUMNS);
            sorted
        });
    });

    group.finish();
}

fn bench_nice_axis(c: &mut Criterion) {
    let mut group = c.benchmark_group("nice_axis");

    group.bench_function("sweep_1000", |b| {
        b.iter(|| {
            for i in 1..=1000 {
                black_box(nice_axis(&NiceAxisRequest::new(black_box(i as f64 * 3.7), 1.1)));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_prepare, bench_aggregate, bench_table, bench_nice_axis);
criterion_main!(benches);
