use criterion::{black_box, criterion_group, criterion_main, Criterion};
use igate_telem::{
    metrics::{collector::parse_load_average, meminfo::parse_meminfo, network},
    Coefficients, Stanza,
};

const MEMINFO: &str = "MemTotal:        3884924 kB
MemFree:          204800 kB
MemAvailable:    2801232 kB
Buffers:          112344 kB
Cached:          2307740 kB
SwapCached:            0 kB
Active(anon):      12345 kB
HugePages_Total:       0
";

const NETDEV: &str = "Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo:  123456     789    0    0    0     0          0         0   123456     789    0    0    0     0       0          0
 wlan0: 1234567    4321    0    0    0     0          0         0   765432    1234    0    0    0     0       0          0
  eth0: 9876543   15000    0    0    0     0          0        12  5432100    8000    0    0    0     0       0          0
";

/// Benchmark rendering of each stanza kind
fn bench_stanza_rendering(c: &mut Criterion) {
    c.bench_function("data_stanza", |b| {
        let values: [i64; 5] = [250, 45000, 200, 3, 1];
        b.iter(|| Stanza::data(black_box(42), black_box(&values[..])).to_string())
    });

    c.bench_function("eqns_stanza", |b| {
        let coefficients = [Coefficients::scale(0.001), Coefficients::scale(0.001)];
        b.iter(|| Stanza::eqns(black_box("W6BSD-5"), black_box(&coefficients[..])).to_string())
    });

    c.bench_function("parm_stanza", |b| {
        let names = ["Cpu", "Temp", "FreeM"];
        b.iter(|| Stanza::parm(black_box("W6BSD-5"), black_box(&names[..])).to_string())
    });
}

/// Benchmark parsing of proc file contents
fn bench_proc_parsing(c: &mut Criterion) {
    c.bench_function("parse_loadavg", |b| {
        b.iter(|| parse_load_average(black_box("0.10 0.25 0.30 1/234 5678\n")))
    });

    c.bench_function("parse_meminfo", |b| b.iter(|| parse_meminfo(black_box(MEMINFO))));

    c.bench_function("parse_netdev", |b| {
        b.iter(|| network::parse_packet_counters(black_box(NETDEV), black_box("eth0")))
    });
}

criterion_group!(benches, bench_stanza_rendering, bench_proc_parsing);
criterion_main!(benches);
