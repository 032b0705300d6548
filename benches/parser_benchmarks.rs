use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use snap_analog::parser::LineParser;

fn benchmark_line_parsing(c: &mut Criterion) {
    let access_log =
        r#"192.168.1.1 - - [25/Dec/2023:10:00:00 +0000] "GET /api/health HTTP/1.1" 200 612"#;
    let bad_status =
        r#"192.168.1.1 - - [25/Dec/2023:10:00:00 +0000] "GET /api/health HTTP/1.1" 999 612"#;
    let garbage = "2023/12/25 10:00:00 [error] 29#29: *1 connect() failed";

    let mut group = c.benchmark_group("access_log_parsing");
    group.throughput(Throughput::Bytes(access_log.len() as u64));

    group.bench_function("valid_line", |b| {
        let parser = LineParser::new().unwrap();
        b.iter(|| parser.parse(std::hint::black_box(access_log)));
    });

    group.bench_function("invalid_status", |b| {
        let parser = LineParser::new().unwrap();
        b.iter(|| parser.parse(std::hint::black_box(bad_status)));
    });

    group.bench_function("no_match", |b| {
        let parser = LineParser::new().unwrap();
        b.iter(|| parser.parse(std::hint::black_box(garbage)));
    });

    group.finish();
}

fn benchmark_mixed_batch(c: &mut Criterion) {
    let parser = LineParser::new().unwrap();
    let sample_logs = [
        r#"192.168.1.1 - - [25/Dec/2023:10:00:00 +0000] "GET /api/users HTTP/1.1" 200 1024"#,
        r#"10.0.0.1 - - [25/Dec/2023:10:01:00 +0000] "POST /api/data HTTP/1.1" 201 -"#,
        r#"::1 - - [25/Dec/2023:10:02:00 +0000] "FETCH / HTTP/1.1" 200 0"#,
    ];

    c.bench_function("mixed_batch", |b| {
        b.iter(|| {
            for log in &sample_logs {
                std::hint::black_box(parser.parse(log).ok());
            }
        });
    });
}

criterion_group!(benches, benchmark_line_parsing, benchmark_mixed_batch);
criterion_main!(benches);
