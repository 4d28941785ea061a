#![allow(dead_code)]

use axum_test::TestServer;
use shorturl::infrastructure::persistence::MemoryUrlRepository;
use shorturl::routes::routes;
use shorturl::state::AppState;
use std::sync::Arc;

pub const BASE_URL: &str = "http://short.test";

pub fn create_test_state() -> (AppState, Arc<MemoryUrlRepository>) {
    let repo = Arc::new(MemoryUrlRepository::new());
    let state = AppState::new(repo.clone(), BASE_URL);

    (state, repo)
}

pub fn create_test_server() -> (TestServer, Arc<MemoryUrlRepository>) {
    let (state, repo) = create_test_state();
    let server = TestServer::new(routes().with_state(state)).unwrap();

    (server, repo)
}

/// Extracts the code from a `short_url` returned by `POST /shorten`.
pub fn code_of(short_url: &str) -> &str {
    short_url
        .strip_prefix(BASE_URL)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap()
}
