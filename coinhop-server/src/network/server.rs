//! Leaderboard HTTP Server
//!
//! Accepts TCP connections, reads one HTTP request per connection and
//! routes it to the [`ScoreService`].

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument, warn};

use crate::config::ServerConfig;
use crate::network::http::{read_request, HttpError, Request, Response};
use crate::network::protocol::{
    ErrorResponse, LeaderboardResponse, SubmitScoreRequest, SubmitScoreResponse,
};
use crate::network::service::{ScoreError, ScoreService};
use crate::network::store::{JsonLinesScoreStore, MemoryScoreStore, ScoreStore, StoreError};

/// Server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind or accept.
    #[error("Failed to bind: {0}")]
    BindFailed(#[from] std::io::Error),

    /// Score store could not be opened.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// The leaderboard server.
pub struct ScoreServer {
    /// Server configuration.
    config: ServerConfig,
    /// Shared score service.
    service: Arc<ScoreService>,
    /// Shutdown signal.
    shutdown_tx: broadcast::Sender<()>,
}

impl ScoreServer {
    /// Create a server around an existing service.
    pub fn new(config: ServerConfig, service: Arc<ScoreService>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            service,
            shutdown_tx,
        }
    }

    /// Create a server and the store its config asks for.
    pub fn from_config(config: ServerConfig) -> Result<Self, ServerError> {
        let store: Box<dyn ScoreStore> = match &config.score_store_path {
            Some(path) => {
                let store = JsonLinesScoreStore::open(path)?;
                info!("Persisting scores to {}", store.path().display());
                Box::new(store)
            }
            None => {
                info!("No SCORE_STORE_PATH set, scores are kept in memory");
                Box::new(MemoryScoreStore::new())
            }
        };
        let service = Arc::new(ScoreService::with_leaderboard_size(
            store,
            config.leaderboard_size,
        ));

        Ok(Self::new(config, service))
    }

    /// The shared score service.
    pub fn service(&self) -> &Arc<ScoreService> {
        &self.service
    }

    /// Ask the accept loop to stop.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn run(&self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until shutdown.
    #[instrument(skip(self, listener))]
    pub async fn serve(&self, listener: TcpListener) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        info!("Leaderboard server v{} listening on http://{}", self.config.version, local_addr);

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            debug!("New connection from {}", addr);
                            self.handle_connection(stream, addr);
                        }
                        Err(e) => {
                            error!("Accept error: {}", e);
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Serve one request on its own task.
    fn handle_connection(&self, stream: TcpStream, addr: SocketAddr) {
        let service = self.service.clone();
        let max_body = self.config.max_body_bytes;

        tokio::spawn(async move {
            let (read_half, mut write_half) = stream.into_split();
            let mut reader = BufReader::new(read_half);

            let response = match read_request(&mut reader, max_body).await {
                Ok(request) => {
                    debug!("{} {} from {}", request.method, request.path, addr);
                    Self::handle_request(&service, &request).await
                }
                Err(HttpError::BodyTooLarge { length, limit }) => {
                    warn!("Rejecting {} byte body from {} (limit {})", length, addr, limit);
                    Response::json(413, &ErrorResponse::new("payload too large"))
                }
                Err(HttpError::Malformed(reason)) => {
                    debug!("Malformed request from {}: {}", addr, reason);
                    Response::json(400, &ErrorResponse::new("bad request"))
                }
                Err(HttpError::ConnectionClosed) => {
                    debug!("Client {} disconnected before sending a request", addr);
                    return;
                }
                Err(HttpError::Io(e)) => {
                    debug!("Read error from {}: {}", addr, e);
                    return;
                }
            };

            if let Err(e) = response.write_to(&mut write_half).await {
                debug!("Failed to write response to {}: {}", addr, e);
                return;
            }
            let _ = write_half.shutdown().await;
        });
    }

    /// Route a request to its handler.
    pub async fn handle_request(service: &ScoreService, request: &Request) -> Response {
        let path = match request.path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        match (request.method.as_str(), path) {
            ("POST", "/api/score") => Self::submit_score(service, request).await,
            ("GET", "/api/leaderboard") => {
                let board = service.leaderboard().await;
                Response::json(200, &LeaderboardResponse::new(board.top, board.total))
            }
            ("GET", "/health") => Response::text(200, "ok"),
            _ => Response::json(404, &ErrorResponse::new("not found")),
        }
    }

    /// `POST /api/score`
    ///
    /// Only `application/json` bodies are parsed; anything else counts as
    /// an empty submission.
    async fn submit_score(service: &ScoreService, request: &Request) -> Response {
        let submission = if request.is_json() {
            match SubmitScoreRequest::from_json(&request.body) {
                Ok(r) => r,
                Err(e) => {
                    debug!("Invalid JSON body: {}", e);
                    return Response::json(400, &ErrorResponse::new("invalid json"));
                }
            }
        } else {
            SubmitScoreRequest::default()
        };

        match service.submit(submission).await {
            Ok(saved) => Response::json(200, &SubmitScoreResponse::new(saved)),
            Err(ScoreError::InvalidScore) => {
                Response::json(400, &ErrorResponse::new("invalid score"))
            }
            Err(e @ (ScoreError::Store(_) | ScoreError::Task(_))) => {
                error!("Failed to store score: {}", e);
                Response::json(500, &ErrorResponse::new("storage error"))
            }
        }
    }
}
