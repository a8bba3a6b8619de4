//! 적용 설정 진단(inspection) 뷰 모델.

use serde::Serialize;
use serde_json::Value;

use super::loader::LoadedConfig;
use crate::application::config::{ActionSpec, template_keys};

#[derive(Debug, Clone, Serialize)]
pub struct ConfigInspection {
    pub searched_paths: Vec<String>,
    pub loaded_paths: Vec<String>,
    pub effective: EffectiveSettings,
    pub actions: Vec<ActionInspection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveSettings {
    pub prompt: String,
    pub recursion_on_invalid: bool,
    pub single_action: bool,
    pub squelch: bool,
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionInspection {
    pub identifiers: Value,
    pub valid: bool,
    pub error: Option<String>,
    pub recursive: bool,
    /// `reply` 템플릿이 요구하는 추가 키워드(`value`/`text`/`flag` 제외)
    pub required_kwargs: Vec<String>,
    pub literal: Option<Value>,
}

impl ConfigInspection {
    pub(crate) fn from_loaded(loaded: LoadedConfig) -> Self {
        let config = &loaded.config;
        let options = config.dispatch_options();

        Self {
            searched_paths: loaded
                .searched_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            loaded_paths: loaded
                .loaded_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            effective: EffectiveSettings {
                prompt: config.effective_prompt().to_string(),
                recursion_on_invalid: options.recursion_on_invalid,
                single_action: options.single_action,
                squelch: options.squelch,
                max_attempts: options.max_attempts,
            },
            actions: config.actions.iter().map(inspect_action).collect(),
        }
    }
}

fn inspect_action(spec: &ActionSpec) -> ActionInspection {
    let error = spec.to_entry().err().map(|e| e.to_string());
    let required_kwargs = spec
        .reply
        .as_deref()
        .map(template_keys)
        .unwrap_or_default()
        .into_iter()
        .filter(|k| !matches!(k.as_str(), "value" | "text" | "flag"))
        .collect();

    ActionInspection {
        identifiers: spec.identifiers.clone(),
        valid: error.is_none(),
        error,
        recursive: spec.recursive,
        required_kwargs,
        literal: spec.literal.clone(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::json;

    use super::*;
    use crate::application::config::Config;

    #[test]
    fn test_inspection_flags_invalid_actions() {
        let config: Config = serde_json::from_value(json!({
            "dispatch": { "max_attempts": 4 },
            "actions": [
                { "identifiers": ["who"], "reply": "{value} by {user}" },
                { "identifiers": "bad", "literal": 1 }
            ]
        }))
        .unwrap();
        let inspection = ConfigInspection::from_loaded(LoadedConfig {
            config,
            searched_paths: vec![PathBuf::from("a.json")],
            loaded_paths: vec![],
        });

        assert_eq!(inspection.effective.max_attempts, Some(4));
        assert!(inspection.effective.recursion_on_invalid);
        assert!(inspection.actions[0].valid);
        assert_eq!(inspection.actions[0].required_kwargs, vec!["user".to_string()]);
        assert!(!inspection.actions[1].valid);
        assert!(inspection.actions[1].error.as_deref().unwrap().contains("string found"));
    }
}
