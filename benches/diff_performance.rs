//! Diff and Render Benchmarks
//!
//! Line and word diffs over contract-sized documents, plus layout and PDF
//! serialization of the resulting segments.
//!
//! Run with: `cargo bench --bench diff_performance`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

use docdiff_server::diff::{line_diff, word_diff};
use docdiff_server::render::{PageRenderer, PdfWriter, RenderConfig};

/// Build an original and a revision with every tenth line edited
fn create_document_pair(lines: usize) -> (String, String) {
    let mut original = String::new();
    let mut revised = String::new();

    for i in 0..lines {
        let line = format!(
            "{}. The party of the first part shall deliver item {} by day {}.\n",
            i + 1,
            i,
            i % 30 + 1
        );
        original.push_str(&line);
        if i % 10 == 3 {
            revised.push_str(&line.replace("shall deliver", "may deliver"));
        } else if i % 10 != 7 {
            revised.push_str(&line);
        }
    }

    (original, revised)
}

fn bench_line_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_diff");
    group.measurement_time(Duration::from_secs(10));

    for lines in [100, 1_000, 5_000] {
        let (original, revised) = create_document_pair(lines);
        group.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, _| {
            b.iter(|| black_box(line_diff(black_box(&original), black_box(&revised))))
        });
    }

    group.finish();
}

fn bench_word_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("word_diff");
    group.measurement_time(Duration::from_secs(10));

    for lines in [100, 1_000] {
        let (original, revised) = create_document_pair(lines);
        group.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, _| {
            b.iter(|| black_box(word_diff(black_box(&original), black_box(&revised))))
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let (original, revised) = create_document_pair(1_000);
    let segments = line_diff(&original, &revised);
    let renderer = PageRenderer::new(RenderConfig::default());
    let writer = PdfWriter::new();

    let mut group = c.benchmark_group("render");
    group.sample_size(20);

    group.bench_function("layout_1000_lines", |b| {
        b.iter(|| black_box(renderer.render(black_box(&segments)).unwrap()))
    });

    let document = renderer.render(&segments).unwrap();
    group.bench_function("pdf_1000_lines", |b| {
        b.iter(|| black_box(writer.to_bytes(black_box(&document)).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_line_diff, bench_word_diff, bench_render);
criterion_main!(benches);
