// Stand-in order service for session tests: an axum app on a loopback port
// that answers every request with one canned reply and records what it got.

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use futures::{stream, StreamExt};
use order_cli::api::ApiClient;
use reqwest::blocking::Client;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Runtime;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Clone)]
enum Reply {
    Json { status: StatusCode, body: &'static str },
    // 200 whose body stream fails after the first chunk.
    Truncated,
}

#[derive(Clone)]
struct ServiceState {
    reply: Reply,
    log: Arc<Mutex<Vec<Recorded>>>,
}

pub struct FakeService {
    base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
    // Worker threads serve the app while the test thread blocks on reqwest.
    _runtime: Runtime,
}

impl FakeService {
    pub fn start(status: u16, body: &'static str) -> Self {
        let status = StatusCode::from_u16(status).expect("status code");
        Self::serve(Reply::Json { status, body })
    }

    pub fn truncated() -> Self {
        Self::serve(Reply::Truncated)
    }

    fn serve(reply: Reply) -> Self {
        let runtime = Runtime::new().expect("tokio runtime");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = ServiceState {
            reply,
            log: Arc::clone(&requests),
        };
        let app = Router::new().fallback(record).with_state(state);

        // Bind to random port.
        let listener = runtime
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .expect("bind loopback");
        let addr = listener.local_addr().expect("local addr");
        runtime.spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        FakeService {
            base_url: format!("http://{}", addr),
            requests,
            _runtime: runtime,
        }
    }

    pub fn api(&self) -> ApiClient {
        let client = Client::builder().no_proxy().build().expect("client");
        ApiClient::with_client(client, &self.base_url)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

async fn record(
    State(state): State<ServiceState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            (name.as_str().to_string(), value)
        })
        .collect();
    state.log.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers,
        body: body.to_vec(),
    });

    match state.reply {
        Reply::Json { status, body } => {
            (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
        Reply::Truncated => {
            // The pause lets hyper flush the head and first chunk before the error.
            let head = stream::iter([Ok(Bytes::from_static(b"{\"id\":"))]);
            let cut = stream::once(async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection dropped"))
            });
            let chunks = head.chain(cut);
            Response::new(Body::from_stream(chunks))
        }
    }
}
