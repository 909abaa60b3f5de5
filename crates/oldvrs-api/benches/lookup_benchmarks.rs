//! Benchmarks for lookup rendering
//!
//! Run with: cargo bench --package oldvrs-api
//!
//! These benchmarks measure query building and page rendering (not database
//! queries).

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use oldvrs_api::render::{escape_html, LookupPage};
use oldvrs_core::{
    config::CdrColumns,
    filter::{CdrFilter, RawLookupParams},
    format::{format_datetime, format_duration, format_thousands},
    models::{Cdr, RecordingPaths},
    CdrQueryBuilder,
};

fn create_mock_cdr(i: usize) -> Cdr {
    Cdr {
        id: format!("7F0E-{:06}", i),
        direction: if i % 2 == 0 { "I" } else { "O" }.to_string(),
        duration: format!("0:{}:{}", i % 60, i % 59),
        connected: "2021-03-05T14:22:10Z".to_string(),
        caller_number: "01614960000".to_string(),
        callee_number: format!("2{:03}", i % 1000),
        folder_id: (i % 4) as i64 + 1,
    }
}

fn ranged_filter(offset: i64) -> CdrFilter {
    CdrFilter::from_params(
        RawLookupParams {
            tel: Some("0161".to_string()),
            dates: Some("range".to_string()),
            fromdate: Some("2021-03-01".to_string()),
            todate: Some("2021-03-31".to_string()),
            offset: Some(offset.to_string()),
        },
        15,
    )
}

fn bench_query_build(c: &mut Criterion) {
    let builder = CdrQueryBuilder::new("cdrs", CdrColumns::default());
    let filter = ranged_filter(30);

    c.bench_function("query_build_ranged", |b| {
        b.iter(|| builder.build(black_box(&filter)));
    });
}

fn bench_formatters(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatters");

    group.bench_function("duration", |b| {
        b.iter(|| format_duration(black_box("1:22:07")));
    });
    group.bench_function("datetime", |b| {
        b.iter(|| format_datetime(black_box("2021-03-05T14:22:10Z")));
    });
    group.bench_function("thousands", |b| {
        b.iter(|| format_thousands(black_box(1_234_567_890)));
    });
    group.bench_function("escape_html", |b| {
        b.iter(|| escape_html(black_box("C:\\VR \"two\" <archive> & more")));
    });

    group.finish();
}

fn bench_page_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_render");
    let paths = RecordingPaths::default();
    let filter = ranged_filter(15);

    for size in [15, 100, 1000].iter() {
        let cdrs: Vec<Cdr> = (0..*size).map(create_mock_cdr).collect();

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &cdrs, |b, cdrs| {
            b.iter(|| {
                let page = LookupPage::new(&filter, 5000, black_box(cdrs), &paths);
                page.to_html(None)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_query_build, bench_formatters, bench_page_render);
criterion_main!(benches);
