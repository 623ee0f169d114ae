//! Quizmill HTTP server entrypoint.

use std::net::SocketAddr;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use quizmill::config::Config;
use quizmill::evaluation::AnswerEvaluator;
use quizmill::gateway::{HandlerState, router};
use quizmill::inference::embedder::{EmbedderConfig, SentenceEmbedder};
use quizmill::inference::extractor::{ExtractorConfig, SpanExtractor};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(
        r#"
 ██████╗ ██╗   ██╗██╗███████╗███╗   ███╗██╗██╗     ██╗
██╔═══██╗██║   ██║██║╚══███╔╝████╗ ████║██║██║     ██║
██║   ██║██║   ██║██║  ███╔╝ ██╔████╔██║██║██║     ██║
██║▄▄ ██║██║   ██║██║ ███╔╝  ██║╚██╔╝██║██║██║     ██║
╚██████╔╝╚██████╔╝██║███████╗██║ ╚═╝ ██║██║███████╗███████╗
 ╚══▀▀═╝  ╚═════╝ ╚═╝╚══════╝╚═╝     ╚═╝╚═╝╚══════╝╚══════╝

        ASK. ANSWER. GRADE.
                                        MIT
"#
    );

    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        "Quizmill starting"
    );

    let extractor_config = if let Some(path) = &config.qa_model_path {
        ExtractorConfig::new(path.clone())
    } else {
        tracing::warn!("No QUIZMILL_QA_MODEL_PATH configured, running extractor in stub mode");
        ExtractorConfig::stub()
    };
    let extractor = SpanExtractor::load(extractor_config)?;

    let embedder_config = if let Some(path) = &config.embedder_path {
        EmbedderConfig::new(path.clone())
    } else {
        tracing::warn!("No QUIZMILL_EMBEDDER_PATH configured, running embedder in stub mode");
        EmbedderConfig::stub()
    };
    let embedder = SentenceEmbedder::load(embedder_config)?;

    let evaluator = AnswerEvaluator::new(extractor, embedder);
    let app = router(HandlerState::new(evaluator));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Quizmill shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("QUIZMILL_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(5001);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("failed to build client");

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
