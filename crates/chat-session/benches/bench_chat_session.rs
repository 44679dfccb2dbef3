use chat_core::{ChatConfig, ChatModel};
use chat_session::export;
use chat_session::session::Message;
use chat_session::store::SessionStore;
use chat_session::ExportFormat;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_store_create_clear(c: &mut Criterion) {
    c.bench_function("session_create_1000", |b| {
        b.iter(|| {
            let store = SessionStore::new();
            for i in 0..1000 {
                black_box(store.create(format!("user_{i}"), ChatConfig::new(ChatModel::Gpt4)));
            }
        })
    });

    c.bench_function("session_create_clear_1000", |b| {
        b.iter(|| {
            let store = SessionStore::new();
            for i in 0..1000 {
                let s = store.create(format!("user_{i}"), ChatConfig::default());
                store.clear(&s.id);
            }
        })
    });
}

fn bench_append(c: &mut Criterion) {
    c.bench_function("session_append_100_turns", |b| {
        b.iter(|| {
            let store = SessionStore::new();
            let s = store.create("bench_user", ChatConfig::default());
            for i in 0..100 {
                store.append(&s.id, Message::user(format!("m{i}"), format!("Message {i}: prior auth status for claim {i}?"))).unwrap();
                store.append(&s.id, Message::assistant(format!("m{i}-a"), format!("Echo: Message {i}"))).unwrap();
            }
            black_box(store.len());
        })
    });
}

fn bench_export(c: &mut Criterion) {
    let store = SessionStore::new();
    let s = store.create("bench_user", ChatConfig::default());
    for i in 0..50 {
        store.append(&s.id, Message::user(format!("m{i}"), format!("User message {i}"))).unwrap();
        store.append(&s.id, Message::assistant(format!("m{i}-a"), format!("Echo: User message {i}"))).unwrap();
    }

    c.bench_function("export_json_100msg", |b| {
        b.iter(|| black_box(store.export(&s.id, ExportFormat::Json).unwrap()))
    });
    c.bench_function("export_markdown_100msg", |b| {
        b.iter(|| black_box(store.export(&s.id, ExportFormat::Markdown).unwrap()))
    });

    let json = store.export(&s.id, ExportFormat::Json).unwrap();
    c.bench_function("import_json_100msg", |b| {
        b.iter(|| black_box(export::from_json(&json).unwrap()))
    });
}

criterion_group!(benches, bench_store_create_clear, bench_append, bench_export);
criterion_main!(benches);
