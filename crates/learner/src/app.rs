//! Bot startup and shutdown.

use crate::cli::{Args, DEFAULT_CONFIG_PATH};
use crate::observability::{init_observability, shutdown_observability};
use learner_core::LearnerConfig;
use learner_error::{ConfigError, LearnerResult};
use learner_models::{CompletionGenerator, EmbeddingRetriever, KnowledgeBase, OpenAICompatClient};
use learner_pipeline::{AnswerPipeline, GenerationScheduler, SchedulerOptions};
use learner_social::{DiscordError, LearnerHandler, build_client};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Load configuration from `path`.
///
/// Without a path, `learner.toml` in the working directory is read if it
/// exists and defaults are used otherwise.
///
/// # Errors
///
/// Returns a configuration error if the file cannot be read or is invalid.
#[instrument]
pub fn load_config(path: Option<&Path>) -> LearnerResult<LearnerConfig> {
    match path {
        Some(path) => LearnerConfig::from_file(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            LearnerConfig::from_file(DEFAULT_CONFIG_PATH)
        }
        None => {
            warn!(
                path = DEFAULT_CONFIG_PATH,
                "No configuration file found, using defaults"
            );
            Ok(LearnerConfig::default())
        }
    }
}

/// Validate `config` and load its knowledge base without contacting any
/// service.
///
/// # Errors
///
/// Returns a configuration error if validation fails or the knowledge
/// directory holds no documents.
#[instrument(skip(config))]
pub fn check(config: &LearnerConfig) -> LearnerResult<KnowledgeBase> {
    config.validate()?;
    KnowledgeBase::load_dir(config.models().knowledge_dir())
}

/// Run the bot until Ctrl-C, or only validate with `--check`.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the token is missing, the
/// knowledge base cannot be embedded, or the Discord client fails.
pub async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let knowledge = check(&config)?;

    if args.check {
        info!(
            documents = knowledge.len(),
            direct_below = config.router().direct_below(),
            clarify_at_or_above = config.router().clarify_at_or_above(),
            "Configuration OK"
        );
        return Ok(());
    }

    let token = args
        .token
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| ConfigError::new("LEARNER_BOT_TOKEN is not set"))?;

    if let Err(e) = init_observability("learner", args.metrics_interval) {
        warn!(error = %e, "Metrics disabled");
    }

    let models = config.models();
    let client = OpenAICompatClient::from_config(models)?;
    info!(
        base_url = client.base_url(),
        completion_model = %models.completion_model(),
        embedding_model = %models.embedding_model(),
        "Embedding knowledge base"
    );
    let retriever =
        EmbeddingRetriever::build(client.clone(), models.embedding_model().clone(), knowledge)
            .await?;
    let generator = CompletionGenerator::new(client, models.completion_model().clone());

    let scheduler = Arc::new(GenerationScheduler::spawn(
        Arc::new(generator),
        config.generation().params(),
        SchedulerOptions::from(config.generation()),
    ));
    let pipeline = Arc::new(AnswerPipeline::new(
        Arc::new(retriever),
        scheduler.clone(),
        &config,
    ));

    let mut client = build_client(&token, LearnerHandler::new(pipeline)).await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            return;
        }
        info!("Shutdown signal received");
        shard_manager.shutdown_all().await;
    });

    info!("Connecting to Discord");
    let served = client.start().await.map_err(DiscordError::from);

    info!("Draining generation worker");
    scheduler.shutdown().await;
    shutdown_observability();

    served?;
    info!("Learner bot stopped");
    Ok(())
}
