use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;
use spendly::{
    core::{aggregate_by_kind, current_balance, filter_by_window},
    ledger::{Category, LedgerSnapshot, Transaction, TransactionKind, ViewWindow},
    storage::codec::{decode_transactions, encode_transactions},
};

fn build_sample_snapshot(txn_count: usize) -> LedgerSnapshot {
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
    let transactions = (0..txn_count)
        .map(|idx| {
            let kind = if idx % 5 == 0 {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            };
            Transaction::new(
                idx as i64,
                kind,
                format!("txn {idx}"),
                Decimal::new(500 + (idx % 1000) as i64, 2),
                Category::ALL[idx % Category::ALL.len()],
                start + Duration::hours((idx % 2000) as i64),
            )
        })
        .collect();
    LedgerSnapshot::new(Decimal::new(100_000, 2), transactions)
}

fn bench_engine(c: &mut Criterion) {
    let snapshot = build_sample_snapshot(black_box(10_000));
    let now = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();

    c.bench_function("current_balance_10k", |b| {
        b.iter(|| black_box(current_balance(&snapshot)))
    });

    c.bench_function("month_view_10k", |b| {
        b.iter(|| {
            let month = filter_by_window(&snapshot.transactions, ViewWindow::Month, &now);
            black_box(aggregate_by_kind(&month))
        })
    });
}

fn bench_codec(c: &mut Criterion) {
    let snapshot = build_sample_snapshot(black_box(10_000));
    let encoded = encode_transactions(&snapshot.transactions).expect("encode");

    c.bench_function("transactions_encode_10k", |b| {
        b.iter(|| black_box(encode_transactions(&snapshot.transactions).expect("encode")))
    });

    c.bench_function("transactions_decode_10k", |b| {
        b.iter(|| black_box(decode_transactions(&encoded).expect("decode")))
    });
}

criterion_group!(benches, bench_engine, bench_codec);
criterion_main!(benches);
