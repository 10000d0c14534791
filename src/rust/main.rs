use amygdala::{BuiltinModel, LabelSet, ModelManager, RuntimeConfig, SentimentClassifier};
use log::info;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Text to classify
    #[arg(short, long, default_value = "I don't like this.")]
    text: String,

    /// Directory holding model.onnx, tokenizer.json and optionally config.json.
    /// When omitted, the built-in DistilBERT SST-2 model is downloaded and used.
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Comma-separated class labels in logit order (overrides config.json)
    #[arg(short, long, value_delimiter = ',')]
    labels: Option<Vec<String>>,

    /// Force a fresh download of the built-in model files
    #[arg(short, long)]
    fresh: bool,

    /// Intra-op threads for ONNX Runtime (0 lets the runtime decide)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Print the model's inputs and outputs before classifying
    #[arg(long)]
    show_metadata: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

async fn ensure_model_downloaded(fresh: bool) -> Result<(), Box<dyn std::error::Error>> {
    let manager = ModelManager::new_default()?;
    let info = BuiltinModel::DistilBertSst2.get_model_info();

    if fresh {
        info!("Fresh download requested - removing any existing model files...");
        manager.remove_download(&info)?;
    }

    manager.ensure_model_downloaded(&info).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let start_time = Instant::now();
    let runtime_config = RuntimeConfig::default().with_intra_threads(args.threads);

    let mut builder = SentimentClassifier::builder().with_runtime_config(runtime_config);
    builder = match &args.model_dir {
        Some(dir) => {
            info!("Loading model from {}", dir.display());
            builder.with_model_dir(dir)?
        }
        None => {
            ensure_model_downloaded(args.fresh).await?;
            builder.with_model(BuiltinModel::DistilBertSst2)?
        }
    };
    if let Some(labels) = args.labels {
        builder = builder.with_labels(LabelSet::new(labels)?);
    }
    let classifier = builder.build()?;
    info!("Classifier built in {:.2?}", start_time.elapsed());

    if args.show_metadata {
        println!("{}", classifier.metadata());
    }

    let classify_start = Instant::now();
    let result = match classifier.predict(&args.text) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("\nError processing text: {}", e);
            eprintln!("Consider:");
            eprintln!("  - Checking if the text is empty");
            eprintln!("  - Splitting long text into smaller chunks");
            eprintln!("  - Passing --labels matching the model's output size");
            return Err(e.into());
        }
    };
    info!("Classification took {:.2?}", classify_start.elapsed());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Input: {}", args.text);
    let scores: Vec<String> = result
        .scores(classifier.labels())
        .map(|(label, p)| format!("{}: {:.2}%", label, p * 100.0))
        .collect();
    println!("{}", scores.join(", "));
    println!("Predicted sentiment: {}", result.label);

    Ok(())
}
