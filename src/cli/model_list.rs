//! Model listing functionality
//!
//! This module handles listing the models offered by the configured endpoint.

use chrono::{DateTime, Utc};
use std::error::Error;

use crate::api::ModelInfo;
use crate::core::config::Config;
use crate::core::error::ChatError;
use crate::core::session::Session;

/// Creation time as a UTC date. Some servers report milliseconds instead of
/// seconds; those are detected by magnitude.
pub fn format_created(created: u64) -> Option<String> {
    if created == 0 {
        return None;
    }
    let timestamp_secs = if created > 10_000_000_000 {
        created / 1000
    } else {
        created
    };
    DateTime::<Utc>::from_timestamp(i64::try_from(timestamp_secs).ok()?, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

pub fn model_entry_lines(model: &ModelInfo, selected: Option<&str>) -> Vec<String> {
    let marker = if selected == Some(model.id.as_str()) {
        "  (selected)"
    } else {
        ""
    };
    let mut lines = vec![format!("  • {}{marker}", model.id)];
    if let Some(owned_by) = &model.owned_by {
        if !owned_by.is_empty() && owned_by != "system" {
            lines.push(format!("    Owner: {owned_by}"));
        }
    }
    if let Some(created) = model.created.and_then(format_created) {
        lines.push(format!("    Created: {created}"));
    }
    lines
}

pub async fn list_models(config: Config) -> Result<(), Box<dyn Error>> {
    let base_url = config.api_endpoint();
    let mut session = Session::new(config);

    println!("🤖 Available Models at {base_url}");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    let refresh = match session.refresh_models().await {
        Ok(refresh) => refresh,
        Err(ChatError::Configuration(missing)) => {
            return Err(format!("❌ {}\n\n{}", missing, missing.hint()).into());
        }
        Err(err) => return Err(err.into()),
    };

    if refresh.models.is_empty() {
        println!("No models found at this endpoint.");
        return Ok(());
    }

    println!("Found {} models (sorted by id):", refresh.models.len());
    println!();
    for model in &refresh.models {
        for line in model_entry_lines(model, refresh.selected.as_deref()) {
            println!("{line}");
        }
        println!();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_accepts_seconds_and_milliseconds() {
        assert_eq!(
            format_created(1_700_000_000).as_deref(),
            Some("2023-11-14 22:13:20 UTC")
        );
        assert_eq!(
            format_created(1_700_000_000_000).as_deref(),
            Some("2023-11-14 22:13:20 UTC")
        );
        assert_eq!(format_created(0), None);
    }

    #[test]
    fn entry_marks_selection_and_hides_system_owner() {
        let model = ModelInfo {
            id: "gpt-4o".to_string(),
            created: None,
            owned_by: Some("system".to_string()),
        };
        assert_eq!(
            model_entry_lines(&model, Some("gpt-4o")),
            vec!["  • gpt-4o  (selected)"]
        );

        let owned = ModelInfo {
            owned_by: Some("acme".to_string()),
            ..model
        };
        assert_eq!(
            model_entry_lines(&owned, None),
            vec!["  • gpt-4o", "    Owner: acme"]
        );
    }
}
