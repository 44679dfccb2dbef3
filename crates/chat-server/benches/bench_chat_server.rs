use axum::body::Body;
use axum::http::Request;
use chat_core::AppConfig;
use chat_server::{app_with_state, state::AppState};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tokio::runtime::Runtime;
use tower::ServiceExt;

fn bench_http_health(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    c.bench_function("http_health_1000", |b| {
        b.iter(|| {
            rt.block_on(async {
                let state = AppState::default();
                for _ in 0..1000 {
                    let app = app_with_state(state.clone());
                    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
                    let resp = app.oneshot(req).await.unwrap();
                    black_box(resp.status());
                }
            })
        })
    });
}

fn bench_http_create_sessions(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    c.bench_function("http_create_sessions_100", |b| {
        b.iter(|| {
            rt.block_on(async {
                let state = AppState::new(AppConfig::default());
                for i in 0..100 {
                    let app = app_with_state(state.clone());
                    let body = serde_json::json!({ "user_id": format!("user_{i}"), "config": { "model": "gpt-4" } });
                    let req = Request::builder()
                        .method("POST")
                        .uri("/api/v1/sessions")
                        .header("content-type", "application/json")
                        .body(Body::from(serde_json::to_vec(&body).unwrap()))
                        .unwrap();
                    let resp = app.oneshot(req).await.unwrap();
                    black_box(resp.status());
                }
            })
        })
    });
}

criterion_group!(benches, bench_http_health, bench_http_create_sessions);
criterion_main!(benches);
