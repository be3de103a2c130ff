//! Title card preview rendering
//!
//! A preview merges the entry's config with the library and named font
//! templates from tv.yml, hands the merged YAML to the configured
//! external renderer command, and returns the produced image as base64.

use crate::error::{ServiceError, ServiceResult};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use cardweb_config::PreviewConfig;
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;

/// A rendered preview image
#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    pub mime: String,
    pub data: String,
}

/// Prepare a series configuration for the renderer: resolve the library
/// name into the library settings and expand a string-valued `font`
/// referencing a named font template.
pub fn merge_series_config(
    config: &Map<String, Value>,
    libraries: &Map<String, Value>,
    fonts: &Map<String, Value>,
) -> ServiceResult<Map<String, Value>> {
    let mut merged = config.clone();

    if let Some(Value::String(library_name)) = config.get("library") {
        let settings = libraries
            .get(library_name)
            .ok_or_else(|| ServiceError::MergeError {
                message: format!("unknown library '{library_name}'"),
            })?;

        let mut resolved = Map::new();
        resolved.insert("name".to_string(), Value::String(library_name.clone()));
        if let Value::Object(settings) = settings {
            for (key, value) in settings {
                resolved.insert(key.clone(), value.clone());
            }
        }
        merged.insert("library".to_string(), Value::Object(resolved));
    }

    if let Some(Value::String(font_name)) = config.get("font") {
        let template = fonts.get(font_name).ok_or_else(|| ServiceError::MergeError {
            message: format!("unknown font template '{font_name}'"),
        })?;
        merged.insert("font".to_string(), template.clone());
    }

    Ok(merged)
}

/// Substitute `{yaml}` and `{output}` into the command template and split
/// it into program + arguments.
fn build_command(template: &str, yaml_path: &str, output_path: &str) -> Vec<String> {
    template
        .split_whitespace()
        .map(|token| {
            token
                .replace("{yaml}", yaml_path)
                .replace("{output}", output_path)
        })
        .collect()
}

fn mime_for(extension: &str) -> &'static str {
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Runner for the external preview renderer command
pub struct PreviewRenderer {
    config: PreviewConfig,
}

impl PreviewRenderer {
    pub fn new(config: PreviewConfig) -> Self {
        Self { config }
    }

    /// Render one card for the named series from its merged config
    pub async fn render(&self, name: &str, merged: &Map<String, Value>) -> ServiceResult<Preview> {
        let parts = build_command(&self.config.command, "", "");
        if parts.is_empty() {
            return Err(ServiceError::RendererNotConfigured);
        }

        let scratch = tempfile::Builder::new().prefix("cardweb-preview-").tempdir()?;
        let yaml_path = scratch.path().join("series.yml");
        let output_path = scratch
            .path()
            .join(format!("preview.{}", self.config.output_format));

        let mut document = Map::new();
        document.insert(name.to_string(), Value::Object(merged.clone()));
        let yaml = serde_yaml::to_string(&Value::Object(document)).map_err(|e| {
            ServiceError::RendererFailed {
                message: format!("unable to serialise series config: {e}"),
            }
        })?;
        tokio::fs::write(&yaml_path, yaml).await?;

        let parts = build_command(
            &self.config.command,
            &yaml_path.to_string_lossy(),
            &output_path.to_string_lossy(),
        );
        log::info!("Rendering preview for '{name}'");

        let mut command = tokio::process::Command::new(&parts[0]);
        command.args(&parts[1..]);

        let output = tokio::time::timeout(
            Duration::from_secs(self.config.timeout_secs),
            command.output(),
        )
        .await
        .map_err(|_| ServiceError::Timeout {
            seconds: self.config.timeout_secs,
        })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => format!("renderer exited with {}", output.status),
                detail => detail.to_string(),
            };
            return Err(ServiceError::RendererFailed { message });
        }

        let image = tokio::fs::read(&output_path)
            .await
            .map_err(|_| ServiceError::MissingOutput {
                path: output_path.display().to_string(),
            })?;

        Ok(Preview {
            mime: mime_for(&self.config.output_format).to_string(),
            data: BASE64_STANDARD.encode(image),
        })
    }
}

// ==================== Tests ====================
