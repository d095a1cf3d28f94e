use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use host_literal::{
    is_valid_canonical, is_valid_host, parse_legacy, to_canonical_text, ParseContext,
};
use rand::Rng;
use std::hint::black_box;
use std::net::Ipv4Addr;

// Dotted-decimal literal, as most hosts in the wild are written
fn random_dotted() -> String {
    let mut rng = rand::thread_rng();
    Ipv4Addr::new(rng.gen(), rng.gen(), rng.gen(), rng.gen()).to_string()
}

// Legacy literal mixing octal, hex and shorthand forms
fn random_legacy() -> String {
    let mut rng = rand::thread_rng();
    let a: u8 = rng.gen();
    match rng.gen_range(0..4) {
        0 => format!("0{:o}.{}.{}.{}", a, rng.gen::<u8>(), rng.gen::<u8>(), rng.gen::<u8>()),
        1 => format!("0x{:x}.0x{:x}.{}", a, rng.gen::<u8>(), rng.gen::<u16>()),
        2 => format!("{}.{}", a, rng.gen_range(0..0x0100_0000u32)),
        _ => format!("{}", rng.gen::<u32>()),
    }
}

// Authority-like spans: literal followed by a port or path
fn generate_hosts(n: usize, legacy: bool) -> Vec<Vec<u8>> {
    (0..n)
        .map(|i| {
            let host = if legacy { random_legacy() } else { random_dotted() };
            let suffix = if i % 2 == 0 { ":8080" } else { "/index.html" };
            format!("{}{}", host, suffix).into_bytes()
        })
        .collect()
}

fn bench_parsers(c: &mut Criterion) {
    let mut group = c.benchmark_group("host_literal");

    let dotted = generate_hosts(1000, false);
    let legacy = generate_hosts(1000, true);
    let bytes: usize = dotted.iter().map(Vec::len).sum();
    group.throughput(Throughput::Bytes(bytes as u64));

    group.bench_with_input(BenchmarkId::new("canonical", dotted.len()), &dotted, |b, hosts| {
        b.iter(|| {
            hosts
                .iter()
                .filter(|h| {
                    let mut end = h.len();
                    is_valid_canonical(h, 0, &mut end, false, true)
                })
                .count()
        });
    });

    group.bench_with_input(BenchmarkId::new("legacy_dotted", dotted.len()), &dotted, |b, hosts| {
        b.iter(|| {
            hosts
                .iter()
                .filter_map(|h| {
                    let mut end = h.len();
                    parse_legacy(h, 0, &mut end, true)
                })
                .count()
        });
    });

    group.bench_with_input(BenchmarkId::new("legacy_mixed", legacy.len()), &legacy, |b, hosts| {
        b.iter(|| {
            hosts
                .iter()
                .filter_map(|h| {
                    let mut end = h.len();
                    parse_legacy(h, 0, &mut end, true)
                })
                .count()
        });
    });

    // Baseline: stdlib only knows the strict form and needs the exact span
    group.bench_function("stdlib_ipv4addr_parse", |b| {
        b.iter(|| {
            for h in &dotted {
                let s = std::str::from_utf8(h).unwrap();
                let host = s.split([':', '/']).next().unwrap_or(s);
                let _ = black_box(host.parse::<Ipv4Addr>());
            }
        });
    });

    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let hosts = generate_hosts(1000, true);
    let contexts = [
        ("authority", ParseContext::authority()),
        ("unknown_scheme", ParseContext::authority().with_unknown_scheme(true)),
    ];

    let mut group = c.benchmark_group("dispatch");
    for (name, ctx) in contexts {
        group.bench_function(name, |b| {
            b.iter(|| {
                hosts
                    .iter()
                    .filter(|h| {
                        let mut end = h.len();
                        is_valid_host(h, 0, &mut end, ctx)
                    })
                    .count()
            });
        });
    }
    group.finish();
}

fn bench_canonical_text(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let addrs: Vec<u32> = (0..1000).map(|_| rng.gen()).collect();

    c.bench_function("to_canonical_text", |b| {
        b.iter(|| {
            for &addr in &addrs {
                black_box(to_canonical_text(addr));
            }
        });
    });
}

criterion_group!(benches, bench_parsers, bench_dispatch, bench_canonical_text);
criterion_main!(benches);
