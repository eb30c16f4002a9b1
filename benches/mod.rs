use std::collections::VecDeque;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use libgsm::modem::{Sim800l, scan};
use libgsm::transport::{Clock, SerialPort};
use rand::{Rng, SeedableRng, rngs::StdRng};

struct LoadedSerial {
    rx: VecDeque<u8>,
}

impl SerialPort for LoadedSerial {
    type Error = ();

    fn available(&mut self) -> usize {
        self.rx.len()
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        self.rx.pop_front().ok_or(())
    }

    fn write(&mut self, _buf: &[u8]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

struct TickClock {
    now: u64,
}

impl Clock for TickClock {
    fn now_ms(&mut self) -> u64 {
        self.now += 1;
        self.now
    }
}

fn bench_scan(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let mut haystack: Vec<u8> = (0..4096).map(|_| rng.gen_range(b'a'..=b'z')).collect();
    haystack.extend_from_slice(b"+HTTPACTION: 0,200,5");

    let mut group = c.benchmark_group("scan");
    group.throughput(Throughput::Bytes(haystack.len() as u64));
    group.bench_function("find_marker", |b| {
        b.iter(|| scan::find(&haystack, b"+HTTPACTION: 0,").unwrap())
    });
    group.finish();
}

fn bench_read_frame(c: &mut Criterion) {
    let mut frame = Vec::new();
    for _ in 0..16 {
        frame.extend_from_slice(b"+CSQ: 23,0\r\n");
    }

    let mut group = c.benchmark_group("read_frame");
    group.throughput(Throughput::Bytes(frame.len() as u64));
    group.bench_function("sixteen_lines", |b| {
        b.iter_batched(
            || {
                Sim800l::<_, _, 256, 16>::new(
                    LoadedSerial {
                        rx: frame.iter().copied().collect(),
                    },
                    TickClock { now: 0 },
                )
            },
            |mut modem| modem.read_frame(1_000, 16).unwrap(),
            criterion::BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_scan, bench_read_frame);
criterion_main!(benches);
