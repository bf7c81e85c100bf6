use agenda_search::config::{AppConfig, Profile};
use agenda_search::search::client::SearchClient;
use agenda_search::search::query::{Field, SearchCriteria};

fn client_for(server: &StubServer) -> SearchClient {
    SearchClient::new(&AppConfig {
        base_url: server.base_url.clone(),
        profile: Profile::Development,
        timeout_secs: Some(5),
    })
    .unwrap()
}

#[tokio::test]
async fn search_logs_endpoint_selection() {
    let trace = TestTracing::new();
    let _guard = trace.install();

    let server = StubServer::start();
    let criteria = SearchCriteria::default().with(Field::Name, "Smith");
    client_for(&server).dispatch(&criteria).await.unwrap();

    let out = trace.output();
    assert!(out.contains("search_start"));
    assert!(out.contains("endpoint=name"));
    assert!(out.contains("/name/Smith"));
    assert!(out.contains("search_done"));
    assert!(out.contains("status=200"));
    assert!(out.contains("count=1"));
}

#[tokio::test]
async fn failed_search_logs_cause() {
    let trace = TestTracing::new();
    let _guard = trace.install();

    let server = StubServer::start();
    let criteria = SearchCriteria::default().with(Field::Filter, "boom");
    assert!(client_for(&server).dispatch(&criteria).await.is_err());

    let out = trace.output();
    assert!(out.contains("WARN"));
    assert!(out.contains("search_failed"));
    assert!(out.contains("endpoint=filter"));
    assert!(out.contains("status=500"));
}

// Re-export util module so tests can find helpers without extra path noise.
mod util;
use util::{StubServer, TestTracing};
