use anyhow::{Context, Result};
use pdf_spam_detector::{
    api, config, logging,
    processing::{DictionaryLemmatizer, PredictionService, SpamPipeline},
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_tracing();
    let config = config::init_config().context("failed to load configuration")?;

    let lemmatizer = match &config.lexicon_path {
        Some(path) => DictionaryLemmatizer::english_with_file(path)
            .with_context(|| format!("failed to read lexicon {}", path.display()))?,
        None => DictionaryLemmatizer::english(),
    };
    let pipeline = SpamPipeline::load(&config.model_path)
        .context("failed to load spam model; refusing to start")?
        .with_lemmatizer(lemmatizer)
        .with_reduce_mode(config.reduce_mode);
    let service = Arc::new(PredictionService::new(Arc::new(pipeline)));
    let app = api::create_router(service, config.max_upload_bytes);

    let listener = TcpListener::bind((config.server_host, config.server_port))
        .await
        .with_context(|| {
            format!(
                "failed to bind {}:{}",
                config.server_host, config.server_port
            )
        })?;
    tracing::info!(
        "Listening on http://{}:{}",
        config.server_host,
        config.server_port
    );
    axum::serve(listener, app)
        .await
        .context("HTTP server terminated unexpectedly")?;
    Ok(())
}
