//! Servidor web Axum que expõe o reconhecimento e a marcação de entidades nomeadas
//!
//! Rotas:
//! - `POST /recognize`: `{ data, input?, output? }` → `{ model, result, stats, processing_ms }`
//! - `GET /entity-types`: tipos de entidade que o reconhecedor pode emitir
//! - `GET /health`
//!
//! Variáveis de ambiente:
//! - `NER_MARKUP_ADDR`: endereço de escuta (padrão `0.0.0.0:3000`)
//! - `NER_MARKUP_CONFIG`: arquivo JSON com a [`MarkupConfig`] padrão
//! - `RUST_LOG`: filtro de logs (padrão `info`)

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use ner_markup::{
    InputFormat, MarkupConfig, MarkupError, MarkupPipeline, OutputFormat, PipelineStats,
    Recognizer, RuleRecognizer,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const MODEL_NAME: &str = "rule-based";
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Estado compartilhado da aplicação
struct AppState {
    pipeline: MarkupPipeline<RuleRecognizer>,
}

#[derive(Deserialize)]
struct RecognizeRequest {
    data: String,
    #[serde(default)]
    input: Option<InputFormat>,
    #[serde(default)]
    output: Option<OutputFormat>,
}

#[derive(Serialize)]
struct RecognizeResponse {
    model: &'static str,
    result: String,
    stats: PipelineStats,
    processing_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config()?;
    info!("configuração padrão: {:?}", config);

    let recognizer = RuleRecognizer::with_default_gazetteers()?;
    let state = Arc::new(AppState {
        pipeline: MarkupPipeline::new(recognizer, config),
    });

    let addr = std::env::var("NER_MARKUP_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Servidor de marcação NER iniciado em http://{}", addr);
    axum::serve(listener, app(state)).await?;
    Ok(())
}

/// Lê a configuração padrão do arquivo em `NER_MARKUP_CONFIG`, se houver.
fn load_config() -> Result<MarkupConfig, MarkupError> {
    match std::env::var("NER_MARKUP_CONFIG") {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)?;
            MarkupConfig::from_json(&json)
        }
        Err(_) => Ok(MarkupConfig::default()),
    }
}

fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/recognize", post(recognize_handler))
        .route("/entity-types", get(entity_types_handler))
        .route("/health", get(health_handler))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state)
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Reconhece e marca o texto enviado
async fn recognize_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecognizeRequest>,
) -> Response {
    if req.data.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Texto vazio".to_string());
    }

    let base = state.pipeline.config();
    let config = MarkupConfig {
        input: req.input.unwrap_or(base.input),
        output: req.output.unwrap_or(base.output),
        crossing: base.crossing,
    };
    info!("marcando {} bytes [{:?} → {:?}]", req.data.len(), config.input, config.output);

    // O pipeline é síncrono: roda fora das threads do runtime
    let started = Instant::now();
    let worker = Arc::clone(&state);
    let rendered = tokio::task::spawn_blocking(move || worker.pipeline.render_str_with(&config, &req.data)).await;

    match rendered {
        Ok(Ok((result, stats))) => Json(RecognizeResponse {
            model: MODEL_NAME,
            result,
            stats,
            processing_ms: elapsed_ms(started.elapsed()),
        })
        .into_response(),
        Ok(Err(e)) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e) => {
            error!("falha na tarefa de marcação: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Falha interna".to_string())
        }
    }
}

/// Milissegundos decorridos, saturando em `u64::MAX`.
fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Tipos de entidade que o reconhecedor pode emitir
async fn entity_types_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "model": MODEL_NAME,
        "entity_types": state.pipeline.recognizer().entity_types(),
    }))
}

async fn health_handler() -> &'static str {
    "ok"
}
