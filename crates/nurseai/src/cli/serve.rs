//! `nurseai serve`: wire the gateway and run the backend API.

use nurseai::{
    ApiState, FileSystemMediaStore, GatewayService, GeminiRestClient, GenerativeService,
    MemoryCaptureRepository, MemorySuggestionRepository, ModelResolver, NurseAiConfig,
    NurseAiResult, PromptTemplate, RateGate, ResilientCaller, SuggestionExtractor, serve,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Handle the `serve` command
pub async fn run_server(
    config: &NurseAiConfig,
    bind: Option<String>,
    prompt: Option<PathBuf>,
) -> NurseAiResult<()> {
    let service: Arc<dyn GenerativeService> =
        Arc::new(GeminiRestClient::from_env(config.models())?);

    // One gate paces both generation and model listing
    let gate = RateGate::from_config(config.gateway());
    let resolver = Arc::new(
        ModelResolver::from_config(Arc::clone(&service), config.models()).with_gate(gate.clone()),
    );
    let caller = Arc::new(ResilientCaller::new(
        service,
        resolver,
        gate,
        config.gateway().retry().clone(),
    ));

    let gateway = match prompt {
        Some(path) => GatewayService::new(caller).with_prompt(PromptTemplate::from_file(path)?),
        None => GatewayService::new(caller),
    };

    let state = ApiState::new(
        gateway,
        Arc::new(SuggestionExtractor::bundled()?),
        Arc::new(FileSystemMediaStore::new(config.server().media_dir())?),
        Arc::new(MemoryCaptureRepository::new()),
        Arc::new(MemorySuggestionRepository::new()),
    );

    let addr = bind.unwrap_or_else(|| config.server().bind().clone());
    tracing::info!(
        addr = %addr,
        media_dir = %config.server().media_dir().display(),
        min_interval_ms = *config.gateway().min_interval_ms(),
        "Starting gateway"
    );

    serve(state, &addr).await
}
