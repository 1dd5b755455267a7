use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use partida_accounting::{
    EntryInput, EntryKind, InMemoryLedgerStore, JournalLine, JournalService,
};
use partida_core::{AccountId, TenantId, UserId};

fn entry_input(debit_account: AccountId, credit_account: AccountId) -> EntryInput {
    EntryInput {
        date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        kind: EntryKind::Journal,
        description: "bench entry".to_string(),
        reference: None,
        source: None,
        lines: vec![
            JournalLine::debit(debit_account, Decimal::new(10_000, 2)),
            JournalLine::credit(credit_account, Decimal::new(10_000, 2)),
        ],
    }
}

fn bench_create_entry(c: &mut Criterion) {
    let mut group = c.benchmark_group("journal");
    group.throughput(Throughput::Elements(1));

    group.bench_function("create_entry", |b| {
        let service = JournalService::new(InMemoryLedgerStore::new());
        let tenant = TenantId::new();
        let user = UserId::new();
        let debit = AccountId::new();
        let credit = AccountId::new();
        b.iter(|| {
            let entry = service
                .create_entry(tenant, user, entry_input(debit, credit))
                .unwrap();
            black_box(entry.number)
        });
    });

    group.bench_function("create_and_approve", |b| {
        let service = JournalService::new(InMemoryLedgerStore::new());
        let tenant = TenantId::new();
        let user = UserId::new();
        let debit = AccountId::new();
        let credit = AccountId::new();
        b.iter(|| {
            let entry = service
                .create_entry(tenant, user, entry_input(debit, credit))
                .unwrap();
            black_box(service.approve_entry(tenant, entry.id, user).unwrap())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_create_entry);
criterion_main!(benches);
