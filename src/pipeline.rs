//! Core prompt-to-result pipeline.
//!
//! - run_text_task: coordinator prompts → model call → typed output
//! - run_image_task: image prompt + PNG → model call → typed output
//!
//! After a translation that injected learned rules succeeds, those
//! rules' usage counters are bumped. That bookkeeping never fails the
//! task; a store error there is only logged.

use std::sync::Arc;

use crate::error::Result;
use crate::llm::client::{CompletionRequest, ModelClient};
use crate::llm::types::{parse_output, ModelOutput, OutputFormat};
use crate::prompts::PromptMode;
use crate::Services;

pub const IMAGE_USER_MESSAGE: &str = "The image to process is attached.";

/// Run one text task (translation, preset or custom) end to end.
pub async fn run_text_task<C: ModelClient>(
    services: &Services<C>,
    mode: &PromptMode,
    text: &str,
    source_language: Option<&str>,
    target_language: &str,
    with_learned_rules: bool,
) -> Result<ModelOutput> {
    let start = std::time::Instant::now();
    let settings = services.settings();
    let (provider, api_key) = settings.cloud_credentials()?;

    let system = services
        .coordinator
        .build_system_prompt(mode, with_learned_rules);
    let user = services
        .coordinator
        .user_prompt(text, source_language, target_language, mode);
    log::info!(
        "[PIPELINE] Text task: {} chars input, {} learned rules injected",
        text.len(),
        system.applied_rule_ids.len()
    );

    let request = CompletionRequest::text(system.text, user);
    let response = services.client.complete(provider, api_key, &request).await?;
    let output = parse_output(system.format, &response)?;

    if !system.applied_rule_ids.is_empty() {
        let ids = system.applied_rule_ids;
        let recorded = Arc::clone(&services.store)
            .run_blocking(move |store| store.record_usage(&ids))
            .await;
        if let Err(e) = recorded {
            log::warn!("[PIPELINE] Failed to record rule usage: {}", e);
        }
    }

    log::info!(
        "[PIPELINE] Text task complete in {}ms",
        start.elapsed().as_millis()
    );
    Ok(output)
}

/// Run one image task: the model reads the PNG directly.
pub async fn run_image_task<C: ModelClient>(
    services: &Services<C>,
    mode: &PromptMode,
    png: Vec<u8>,
    source_language: Option<&str>,
    target_language: &str,
    custom_perception: Option<&str>,
    custom_instruction: Option<&str>,
) -> Result<ModelOutput> {
    let start = std::time::Instant::now();
    let settings = services.settings();
    let (provider, api_key) = settings.cloud_credentials()?;

    let system = services.coordinator.image_prompt(
        mode,
        source_language,
        target_language,
        custom_perception,
        custom_instruction,
    );
    let format = services.coordinator.image_output_format(mode);
    log::info!("[PIPELINE] Image task: {} bytes PNG, format {:?}", png.len(), format);

    let mut request = CompletionRequest::text(system, IMAGE_USER_MESSAGE).with_image(png);
    if format == OutputFormat::PlainText {
        request = request.plain_text_output();
    }
    let response = services.client.complete(provider, api_key, &request).await?;
    let output = parse_output(format, &response)?;

    log::info!(
        "[PIPELINE] Image task complete in {}ms",
        start.elapsed().as_millis()
    );
    Ok(output)
}
