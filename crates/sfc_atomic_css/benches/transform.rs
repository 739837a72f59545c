use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;
use sfc_atomic_css::{AtomicSheet, TransformOptions, transform};

/// Parse once upfront, then benchmark extraction, synthesis and rewriting.
fn bench_transform(bencher: divan::Bencher<'_, '_>, source: &str) {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
    let options = TransformOptions::default().with_filename("Component.ce.vue");
    let mut engine = AtomicSheet::default();

    bencher.bench_local(|| transform(source, &ret.program, &mut engine, &options));
}

#[divan::bench]
fn counter(bencher: divan::Bencher<'_, '_>) {
    bench_transform(bencher, include_str!("fixtures/Counter.ce.js"));
}

#[divan::bench]
fn card(bencher: divan::Bencher<'_, '_>) {
    bench_transform(bencher, include_str!("fixtures/Card.ce.js"));
}

fn main() {
    divan::main();
}
