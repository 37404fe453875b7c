//! Servidor web Axum com WebSocket para visualização da detecção de
//! empréstimos em tempo real

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Router,
};
use lazaro_core::{corpus::demo_texts, Lazaro, LazaroOutput, PipelineEvent};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Estado compartilhado da aplicação.
///
/// O pipeline só usa `&self` e seus recursos são imutáveis após a
/// construção, então o compartilhamento entre handlers é direto.
struct AppState {
    pipeline: Lazaro,
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    text: String,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    output: LazaroOutput,
    total_tokens: usize,
    total_borrowings: usize,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let pipeline = Lazaro::new();
    let state = Arc::new(AppState { pipeline });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/analyze", post(analyze_handler))
        .route("/ws", get(ws_handler))
        .route("/demo-texts", get(demo_texts_handler))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
        .await
        .expect("falha ao abrir a porta 3000");
    info!("servidor iniciado em http://localhost:3000");
    if let Err(err) = axum::serve(listener, app).await {
        error!(%err, "servidor encerrado com erro");
    }
}

/// Retorna a página principal.
async fn index_handler() -> impl IntoResponse {
    Html(include_str!("templates/index.html"))
}

/// Análise via HTTP POST (sem streaming).
async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    if req.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "texto vacío"})),
        )
            .into_response();
    }

    match state.pipeline.analyze(&req.text) {
        Ok(output) => {
            let total_tokens = output.tokens.len();
            let total_borrowings = output.borrowings().len();
            Json(AnalyzeResponse {
                output,
                total_tokens,
                total_borrowings,
            })
            .into_response()
        }
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": err.to_string()})),
        )
            .into_response(),
    }
}

/// Retorna textos de demonstração por domínio.
async fn demo_texts_handler() -> impl IntoResponse {
    let texts: Vec<serde_json::Value> = demo_texts()
        .iter()
        .map(|(domain, text)| serde_json::json!({"domain": domain, "text": text}))
        .collect();
    Json(texts)
}

/// Upgrade HTTP → WebSocket.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Recebe texto, executa o pipeline e envia os eventos em tempo real.
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                let text_str = text.trim().to_string();
                if text_str.is_empty() {
                    continue;
                }
                info!(chars = text_str.len(), "analisando via WebSocket");

                // O pipeline é síncrono: roda em spawn_blocking para não
                // travar o runtime, coletando os eventos ao final.
                let (tx_std, rx_std) = std::sync::mpsc::channel::<PipelineEvent>();
                let state_for_thread = Arc::clone(&state);
                let text_for_thread = text_str.clone();
                let handle = tokio::task::spawn_blocking(move || {
                    state_for_thread
                        .pipeline
                        .analyze_streaming(&text_for_thread, tx_std);
                });
                handle.await.ok();

                let events: Vec<PipelineEvent> = rx_std.try_iter().collect();
                for event in &events {
                    if let Ok(json) = serde_json::to_string(event) {
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            return; // cliente desconectou
                        }
                        // pausa curta para a animação passo a passo
                        tokio::time::sleep(tokio::time::Duration::from_millis(35)).await;
                    }
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}
