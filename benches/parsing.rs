//! Benchmarks for workbook parsing and export.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::cast_possible_truncation
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::fmt::Write;
use twbdoc::export::{export_docx, export_xlsx, ExportOptions};
use twbdoc::parse_twb;

/// A synthetic workbook: one datasource with `fields` columns, `sheets`
/// worksheets each placing every field, and one dashboard per ten worksheets.
fn synthetic_workbook(fields: usize, sheets: usize) -> String {
    let mut columns = String::new();
    for f in 0..fields {
        let (role, datatype) = if f % 2 == 0 {
            ("dimension", "string")
        } else {
            ("measure", "real")
        };
        if f % 5 == 4 {
            let _ = write!(
                columns,
                r#"<column name="[Field {f}]" role="{role}" datatype="{datatype}"><calculation class="tableau" formula="SUM([Field 1]) / {f}"/></column>"#
            );
        } else {
            let _ = write!(
                columns,
                r#"<column name="[Field {f}]" role="{role}" datatype="{datatype}" type="nominal"/>"#
            );
        }
    }

    let mut worksheets = String::new();
    for s in 0..sheets {
        let _ = write!(
            worksheets,
            r#"<worksheet name="Sheet {s}"><table><view><datasource-dependencies datasource="Bench"/>"#
        );
        for f in 0..fields {
            let shelf = ["rows", "cols"][f % 2];
            let _ = write!(
                worksheets,
                r#"<{shelf}><column-instance column="[Bench].[Field {f}]" type="nominal"/></{shelf}>"#
            );
        }
        let _ = write!(
            worksheets,
            r#"<filter class="categorical" column="[Bench].[Field 0]"><member value="A"/><member value="B"/></filter></view></table></worksheet>"#
        );
    }

    let mut dashboards = String::new();
    for d in 0..sheets.div_ceil(10) {
        let _ = write!(dashboards, r#"<dashboard name="Dashboard {d}"><zones>"#);
        for s in (d * 10)..((d + 1) * 10).min(sheets) {
            let _ = write!(dashboards, r#"<zone type="worksheet" name="Sheet {s}"/>"#);
        }
        let _ = write!(
            dashboards,
            r#"<zone type="text" name="Title {d}"/></zones></dashboard>"#
        );
    }

    format!(
        r#"<?xml version='1.0' encoding='utf-8' ?><workbook><datasources><datasource name="Bench">{columns}</datasource></datasources><worksheets>{worksheets}</worksheets><dashboards>{dashboards}</dashboards></workbook>"#
    )
}

/// Compare parsing performance across workbook sizes
fn bench_parse_sizes(c: &mut Criterion) {
    let sizes = [("small", 10, 5), ("medium", 50, 40), ("large", 200, 150)];

    let mut group = c.benchmark_group("parse");

    for (name, fields, sheets) in sizes {
        let data = synthetic_workbook(fields, sheets).into_bytes();
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse_twb", name), &data, |b, data| {
            b.iter(|| parse_twb(black_box(data)).expect("Failed to parse"))
        });
    }

    group.finish();
}

/// Benchmark both exporters on a medium workbook
fn bench_export(c: &mut Criterion) {
    let data = synthetic_workbook(50, 40);
    let parsed = parse_twb(data.as_bytes()).expect("Failed to parse");
    let options = ExportOptions::default();

    let mut group = c.benchmark_group("export");
    group.bench_function("xlsx", |b| {
        b.iter(|| export_xlsx(black_box(&parsed.dashboards)).expect("Failed to export"))
    });
    group.bench_function("docx", |b| {
        b.iter(|| export_docx(black_box(&parsed.dashboards), &options).expect("Failed to export"))
    });
    group.finish();
}

criterion_group!(benches, bench_parse_sizes, bench_export);

criterion_main!(benches);
