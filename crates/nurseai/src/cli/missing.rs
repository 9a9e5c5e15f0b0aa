//! `nurseai missing`: run the extractor over a saved suggestion.

use nurseai::{
    JsonError, KeywordTable, MissingFieldSet, NurseAiResult, StorageError, StorageErrorKind,
    SuggestionExtractor,
};
use std::path::Path;

/// Handle the `missing` command
pub async fn report_missing(file: &Path, keywords: Option<&Path>, json: bool) -> NurseAiResult<()> {
    let extractor = match keywords {
        Some(path) => SuggestionExtractor::new(KeywordTable::from_file(path)?)?,
        None => SuggestionExtractor::bundled()?,
    };

    let content = tokio::fs::read_to_string(file).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileRead(format!(
            "{}: {}",
            file.display(),
            e
        )))
    })?;

    let missing = extractor.extract_missing(&content);
    tracing::debug!(file = %file.display(), count = missing.len(), "Extracted missing fields");

    if json {
        println!("{}", render_json(&missing)?);
    } else {
        println!("{}", render_text(&missing));
    }
    Ok(())
}

fn render_json(missing: &MissingFieldSet) -> NurseAiResult<String> {
    Ok(serde_json::to_string(missing).map_err(|e| JsonError::new(e.to_string()))?)
}

fn render_text(missing: &MissingFieldSet) -> String {
    if missing.is_empty() {
        return "Nothing missing.".to_string();
    }
    missing
        .iter()
        .map(|field| format!("{}\t{}", field.key(), field.label()))
        .collect::<Vec<_>>()
        .join("\n")
}
