//! `nurseai models`: show the listing and the model discovery would pick.

use nurseai::{
    GeminiRestClient, GenerativeService, ModelInfo, NurseAiConfig, NurseAiResult,
    normalize_model_name, select_model,
};

/// Handle the `models` command
pub async fn list_models(config: &NurseAiConfig) -> NurseAiResult<()> {
    let client = GeminiRestClient::from_env(config.models())?;
    let models = client.list_models().await?;

    let selected = match config.models().model() {
        Some(pinned) => Some(normalize_model_name(pinned)),
        None => select_model(
            &models,
            config.models().preferences(),
            config.models().required_method(),
        )
        .ok(),
    };

    println!(
        "{}",
        render_listing(&models, selected.as_deref(), config.models().required_method())
    );
    match selected {
        Some(model) => println!("\nSelected: {}", model),
        None => println!(
            "\nNo listed model supports {}",
            config.models().required_method()
        ),
    }
    Ok(())
}

/// `*` marks the selection, `-` models that cannot generate.
fn render_listing(models: &[ModelInfo], selected: Option<&str>, required_method: &str) -> String {
    models
        .iter()
        .map(|model| {
            let name = normalize_model_name(&model.name);
            let marker = if Some(name.as_str()) == selected {
                '*'
            } else if model.supports(required_method) {
                ' '
            } else {
                '-'
            };
            format!(
                "{} {} [{}]",
                marker,
                name,
                model.supported_generation_methods.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
