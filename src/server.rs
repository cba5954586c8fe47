use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::convert::Infallible;
use std::net::SocketAddr;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{body::Bytes, Request, Response, StatusCode, Method};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use http_body_util::{Full, BodyExt};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::called::ToggleReport;
use crate::config::ServerConfig;
use crate::game::Session;
use crate::logging::{log_info, log_error, log_error_stderr};
use crate::store::CardStore;

// Response structures for JSON serialization
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleRequest {
    pub input: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleResponse {
    #[serde(flatten)]
    pub report: ToggleReport,
    pub warning: Option<String>,
}

#[derive(Clone)]
struct ServerState {
    session: Session,
    store: CardStore,
}

/// Start the HTTP server on a background task. Setting the returned flag
/// stops the accept loop.
pub fn start_server(config: ServerConfig, session: Session, store: CardStore) -> (tokio::task::JoinHandle<()>, Arc<AtomicBool>) {
    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let shutdown_clone = Arc::clone(&shutdown_signal);
    let state = ServerState { session, store };

    let handle = tokio::spawn(async move {
        let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>().unwrap_or([127, 0, 0, 1].into()), config.port));
        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => listener,
            Err(e) => {
                log_error_stderr(&format!("Failed to start API server: {e}"));
                return;
            }
        };
        log_info(&format!("Server listening on http://{addr}"));

        loop {
            if shutdown_clone.load(Ordering::Relaxed) {
                break;
            }

            // Accept with a timeout so the shutdown flag is polled
            let accept_result = tokio::time::timeout(
                std::time::Duration::from_millis(100),
                listener.accept()
            ).await;

            match accept_result {
                Ok(Ok((stream, _))) => {
                    let state = state.clone();
                    let io = TokioIo::new(stream);

                    tokio::spawn(async move {
                        let service = service_fn(move |req| {
                            handle_request(req, state.clone())
                        });

                        if let Err(err) = http1::Builder::new()
                            .serve_connection(io, service)
                            .await
                        {
                            log_error_stderr(&format!("Error serving connection: {err:?}"));
                        }
                    });
                }
                Ok(Err(e)) => {
                    log_error_stderr(&format!("Error accepting connection: {e}"));
                    break;
                }
                Err(_) => {
                    // Timeout, go round and check the shutdown flag
                }
            }
        }
        log_info("API Server shutting down...");
    });

    (handle, shutdown_signal)
}

async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: ServerState,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let body = if parts.method == Method::POST {
        match body.collect().await {
            Ok(body) => body.to_bytes(),
            Err(_) => return Ok(error_response(StatusCode::BAD_REQUEST, "Failed to read request body")),
        }
    } else {
        Bytes::new()
    };

    Ok(route(&parts.method, parts.uri.path(), &body, &state))
}

fn route(method: &Method, path: &str, body: &[u8], state: &ServerState) -> Response<Full<Bytes>> {
    match (method, path) {
        (&Method::GET, "/status") => handle_status(&state.session),
        (&Method::GET, "/called") => handle_called(&state.session),
        (&Method::GET, "/scoreboard") => handle_scoreboard(&state.session),
        (&Method::POST, "/toggle") => handle_toggle(body, &state.session),
        (&Method::POST, "/reset") => handle_reset(&state.session),
        (&Method::POST, "/reload") => handle_reload(state),
        _ => error_response(StatusCode::NOT_FOUND, "Endpoint not found"),
    }
}

fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response<Full<Bytes>> {
    let body = serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string());
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(hyper::header::CONTENT_TYPE, hyper::header::HeaderValue::from_static("application/json"));
    headers.insert(hyper::header::ACCESS_CONTROL_ALLOW_ORIGIN, hyper::header::HeaderValue::from_static("*"));
    response
}

fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    json_response(status, &ErrorResponse { error: message.to_string() })
}

fn internal_error(message: String) -> Response<Full<Bytes>> {
    log_error(&message);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, &message)
}

fn handle_status(session: &Session) -> Response<Full<Bytes>> {
    let (collection, cards, called) = match (session.collection_id(), session.card_count(), session.called_sorted()) {
        (Ok(collection), Ok(cards), Ok(called)) => (collection, cards, called.len()),
        (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => return internal_error(e),
    };

    json_response(StatusCode::OK, &json!({
        "status": "running",
        "server": "bingo",
        "version": env!("CARGO_PKG_VERSION"),
        "started_at": session.created_at_string(),
        "collection": collection,
        "cards": cards,
        "called": called,
    }))
}

fn handle_called(session: &Session) -> Response<Full<Bytes>> {
    match session.called_sorted() {
        Ok(called) => json_response(StatusCode::OK, &json!({ "called": called })),
        Err(e) => internal_error(e),
    }
}

fn handle_scoreboard(session: &Session) -> Response<Full<Bytes>> {
    match session.scoreboard() {
        Ok(board) => json_response(StatusCode::OK, &board),
        Err(e) => internal_error(e),
    }
}

fn handle_toggle(body: &[u8], session: &Session) -> Response<Full<Bytes>> {
    let request: ToggleRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid JSON in request body"),
    };

    match session.toggle(&request.input) {
        Ok(report) => {
            let warning = report.warning();
            json_response(StatusCode::OK, &ToggleResponse { report, warning })
        }
        Err(e) => internal_error(e),
    }
}

fn handle_reset(session: &Session) -> Response<Full<Bytes>> {
    match session.reset() {
        Ok(()) => json_response(StatusCode::OK, &json!({ "message": "Called numbers cleared" })),
        Err(e) => internal_error(e),
    }
}

fn handle_reload(state: &ServerState) -> Response<Full<Bytes>> {
    match state.session.reload(&state.store) {
        Ok(count) => json_response(StatusCode::OK, &json!({ "message": format!("Reloaded {count} cards") })),
        Err(e) => internal_error(e),
    }
}
