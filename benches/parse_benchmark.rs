use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use twin_parser::{check, hover, parse, spread, suggest, CheckArgs, ParserArgs};

/// Build an expression with roughly `count` items
fn create_expression(count: usize, size: &str) -> String {
    let items = match size {
        "flat" => vec!["flex", "p-4", "bg-blue-500", "text-white", "rounded-lg"],
        "variants" => vec!["hover:bg-blue-600", "md:dark:text-gray-500", "focus:outline-none", "lg:p-2", "sm:m-1"],
        "grouped" => vec![
            "md:(p-2 m-1)",
            "dark:hover:(bg-[#111]/50 text-white!)",
            "[&>*]:(underline maxWidth[100%])",
            "lg:!(grid grid-cols-3)",
            "content-['a_b']",
        ],
        _ => panic!("Unknown size: {}", size),
    };

    items.iter().cycle().take(count).cloned().collect::<Vec<_>>().join(" ")
}

fn create_test_files(dir: &Path, count: usize) {
    let content = create_expression(200, "grouped");
    for i in 0..count {
        fs::write(dir.join(format!("test_file_{}.tw", i)), &content).unwrap();
    }
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for size in ["flat", "variants", "grouped"].iter() {
        for count in [10, 100, 1000].iter() {
            let text = create_expression(*count, size);
            group.bench_with_input(BenchmarkId::new(*size, count), &text, |b, text| {
                b.iter(|| black_box(parse(black_box(text))));
            });
        }
    }

    group.finish();
}

fn benchmark_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    let text = create_expression(500, "grouped");
    let middle = text.len() / 2;

    group.bench_function("spread", |b| b.iter(|| black_box(spread(black_box(&text)))));
    group.bench_function("hover_middle", |b| b.iter(|| black_box(hover(&text, black_box(middle)))));
    group.bench_function("suggest_middle", |b| b.iter(|| black_box(suggest(&text, black_box(middle)))));
    group.bench_function("suggest_end", |b| b.iter(|| black_box(suggest(&text, black_box(text.len())))));

    group.finish();
}

fn benchmark_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("check");
    group.sample_size(10);

    for threads in [1, 4].iter() {
        group.bench_with_input(BenchmarkId::new("threads", threads), threads, |b, &threads| {
            b.iter_with_setup(
                || {
                    let temp_dir = TempDir::new().unwrap();
                    create_test_files(temp_dir.path(), 100);
                    let args = CheckArgs {
                        input: vec![format!("{}/*.tw", temp_dir.path().display())],
                        exclude: vec![],
                        output: None,
                        jobs: Some(threads),
                        parser: ParserArgs::default(),
                        verbose: true,
                    };
                    (temp_dir, args)
                },
                |(temp_dir, args)| {
                    black_box(check(&args).unwrap());
                    black_box(temp_dir);
                },
            );
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_parse, benchmark_queries, benchmark_check);
criterion_main!(benches);
