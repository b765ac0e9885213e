//! Command-line front end for the spam detector.
//!
//! `upload` sends a PDF to a running server, the same way a browser upload form would, and
//! renders the verdict. `local` runs the identical pipeline in-process against a model file.
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pdf_spam_detector::{
    client::{ClientError, DEFAULT_SERVER_URL, PredictionClient},
    config::DEFAULT_MODEL_PATH,
    extraction::{LopdfExtractor, PdfTextExtractor},
    logging,
    processing::{PredictionResult, PredictionService, ReduceMode, SpamPipeline},
};
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "spam-check",
    about = "Classify a PDF as SPAM or HAM from the text of its first page"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a PDF to a running prediction server.
    Upload {
        file: PathBuf,
        #[arg(long, default_value = DEFAULT_SERVER_URL)]
        server: String,
    },
    /// Classify a PDF in-process and print the JSON result.
    Local {
        file: PathBuf,
        #[arg(long, default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,
        #[arg(long, default_value = "stem", value_parser = parse_reduce_mode)]
        reduce: ReduceMode,
    },
}

fn parse_reduce_mode(raw: &str) -> Result<ReduceMode, String> {
    raw.parse()
        .map_err(|()| format!("unknown reduce mode '{raw}' (expected stem or lemmatize)"))
}

#[tokio::main]
async fn main() {
    logging::init_cli_tracing();
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Upload { file, server } => upload(file, &server).await,
        Command::Local {
            file,
            model,
            reduce,
        } => classify_locally(file, model, reduce),
    }
}

async fn upload(file: PathBuf, server: &str) -> Result<()> {
    println!("Uploading PDF to server...");
    let client = PredictionClient::new(server)?;
    match client.predict_file(&file).await {
        Ok(prediction) => {
            println!("Prediction: {}", prediction.label);
            println!("Text length: {}", prediction.text_length);
            println!("Preview of extracted text: {}", prediction.preview);
            Ok(())
        }
        Err(err @ (ClientError::Rejected(_) | ClientError::Server { .. })) => bail!(err),
        Err(err) => Err(err).context("upload failed"),
    }
}

fn classify_locally(file: PathBuf, model: PathBuf, reduce: ReduceMode) -> Result<()> {
    let pipeline = SpamPipeline::load(&model)
        .with_context(|| format!("failed to load model {}", model.display()))?
        .with_reduce_mode(reduce);
    let service = PredictionService::new(Arc::new(pipeline));

    let result: PredictionResult = match LopdfExtractor::new().first_page_text_from_path(&file) {
        Ok(text) => service.classify_text(&text).into(),
        Err(err) => PredictionResult::failure(err),
    };
    println!("{}", serde_json::to_string_pretty(&result)?);
    if let PredictionResult::Failure { .. } = result {
        std::process::exit(1);
    }
    Ok(())
}
