use snack_classifier::{
    AppError, Configuration, CoordinatorBuilder,
    intake::{FileImageSource, ImageSource},
    pipeline::RecordedClassifier,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str =
    "usage: snack-classifier [--config FILE] --snacks RECORDING --health RECORDING IMAGE...";

struct Arguments {
    config: Option<PathBuf>,
    snacks: PathBuf,
    health: PathBuf,
    images: Vec<PathBuf>,
}

fn parse_arguments(mut args: impl Iterator<Item = String>) -> Result<Arguments, AppError> {
    let mut config = None;
    let mut snacks = None;
    let mut health = None;
    let mut images = Vec::new();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .map(PathBuf::from)
                .ok_or_else(|| AppError::Config(format!("{flag} expects a path\n{USAGE}")))
        };
        match arg.as_str() {
            "--config" => config = Some(value("--config")?),
            "--snacks" => snacks = Some(value("--snacks")?),
            "--health" => health = Some(value("--health")?),
            _ => images.push(PathBuf::from(&arg)),
        }
    }
    let missing = |flag: &str| AppError::Config(format!("missing {flag}\n{USAGE}"));
    Ok(Arguments {
        config,
        snacks: snacks.ok_or_else(|| missing("--snacks"))?,
        health: health.ok_or_else(|| missing("--health"))?,
        images,
    })
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    init_logging();
    let arguments = parse_arguments(std::env::args().skip(1))?;
    let configuration = Configuration::load(arguments.config.as_deref())?;

    let snacks = RecordedClassifier::load(&arguments.snacks).await?;
    let health = RecordedClassifier::load(&arguments.health).await?;
    info!(
        "Loaded recordings with {} and {} images",
        snacks.len(),
        health.len()
    );

    let mut coordinator = CoordinatorBuilder::new(configuration)
        .classifier(Arc::new(snacks))
        .classifier(Arc::new(health))
        .build()?;
    let mut source = FileImageSource::new(arguments.images);

    while source.remaining() > 0 {
        let image = match source.next_image().await {
            Ok(Some(image)) => image,
            Ok(None) => break,
            Err(e) => {
                error!("Skipping image: {}", e);
                continue;
            }
        };
        let name = image.name.clone();
        match coordinator.classify(image).await {
            Ok(snapshot) => println!("{name}\n{}\n", snapshot.text),
            Err(e) => error!("Could not classify {}: {}", name, e),
        }
    }

    coordinator.stop();
    Ok(())
}
