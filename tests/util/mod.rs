use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header::CONTENT_TYPE};
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use std::sync::{Arc, Mutex};

/// Captures tracing output for tests.
#[allow(dead_code)]
pub struct TestTracing {
    buffer: Arc<Mutex<Vec<u8>>>,
}

#[allow(dead_code)]
impl TestTracing {
    pub fn new() -> Self {
        Self {
            buffer: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.buffer.clone();
        let make_writer = move || TestWriter(writer.clone());
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .without_time()
            .with_writer(make_writer)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn output(&self) -> String {
        let buf = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buf).to_string()
    }
}

struct TestWriter(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for TestWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut guard = self.0.lock().unwrap();
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// One request seen by [`StubServer`].
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Recorded {
    /// Raw (still percent-encoded) request path.
    pub path: String,
    pub content_type: Option<String>,
}

type RequestLog = Arc<Mutex<Vec<Recorded>>>;

/// Local stand-in for the agenda service.
///
/// Routes:
/// - `/name` all entries
/// - `/name/Smith` one matching entry
/// - `/organization/*` a single object (not an array)
/// - `/position/*` an empty array
/// - `/filter/boom` HTTP 500
/// - `/filter/garbage` a body that is not JSON
/// - `/filter/*` the filter value echoed back
#[allow(dead_code)]
pub struct StubServer {
    pub base_url: String,
    requests: RequestLog,
}

#[allow(dead_code)]
impl StubServer {
    /// Serve on an ephemeral loopback port from a background thread.
    pub fn start() -> Self {
        let requests: RequestLog = Arc::new(Mutex::new(Vec::new()));
        let log = requests.clone();
        let (tx, rx) = std::sync::mpsc::channel();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .expect("stub runtime");
            rt.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind stub");
                tx.send(listener.local_addr().expect("local addr"))
                    .expect("report addr");
                let app = Router::new().fallback(respond).with_state(log);
                axum::serve(listener, app).await.expect("serve stub");
            });
        });

        let addr = rx.recv().expect("stub server started");
        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("at least one request")
    }
}

async fn respond(State(log): State<RequestLog>, uri: Uri, headers: HeaderMap) -> Response {
    let path = uri.path().to_string();
    log.lock().unwrap().push(Recorded {
        path: path.clone(),
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    match path.as_str() {
        "/name" => Json(json!([
            {"name": "Smith", "rank": "Col", "organization": "SOCOM"},
            {"name": "Jones", "position": "Panelist", "sessions": [1, 2]}
        ]))
        .into_response(),
        "/name/Smith" => Json(json!([{"name": "Smith", "rank": "Col"}])).into_response(),
        "/filter/boom" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "/filter/garbage" => (StatusCode::OK, "<html>not json</html>").into_response(),
        p if p.starts_with("/organization/") => Json(json!({
            "zeta": "first",
            "alpha": "second",
            "nested": {"k": true}
        }))
        .into_response(),
        p if p.starts_with("/position/") => Json(json!([])).into_response(),
        p if p.starts_with("/filter/") => {
            Json(json!([{"filter": p.trim_start_matches("/filter/")}])).into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
