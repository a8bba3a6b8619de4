//! 애플리케이션이 사용하는 설정 스키마(순수 데이터).
//!
//! 주의: 파일/환경변수 접근은 `infrastructure`에서만 수행한다.

mod template;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::usecases::dispatch::DispatchOptions;
use crate::domain::{Action, ArgsInError, Identifiers, action::validate_identifiers};

pub use template::{render_template, template_keys};

pub const DEFAULT_PROMPT: &str = "argsin> ";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// 입력 프롬프트 문자열
    pub prompt: Option<String>,
    /// dispatch 기본 옵션
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// 선언형 액션 목록
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DispatchConfig {
    /// 알 수 없는 플래그에서 재입력할지 여부(기본 true)
    pub recursion_on_invalid: Option<bool>,
    /// 첫 번째 유효 플래그만 처리할지 여부(기본 false)
    pub single_action: Option<bool>,
    /// 진단 메시지를 끌지 여부(기본 false)
    pub squelch: Option<bool>,
    /// 재입력 포함 최대 프롬프트 횟수(없으면 무제한)
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ActionSpec {
    /// 플래그 이름 목록. 문자열 하나는 거부된다.
    pub identifiers: Value,
    /// `{value}`, `{text}`, `{flag}` 및 추가 키워드를 치환해 반환할 문자열
    pub reply: Option<String>,
    /// 그대로 반환할 값
    pub literal: Option<Value>,
    #[serde(default)]
    pub recursive: bool,
}

impl Config {
    /// 우선순위가 높은 설정으로 덮어쓴다. 액션 목록은 뒤에 이어 붙인다.
    pub fn merge_from(&mut self, other: Config) {
        if other.prompt.is_some() {
            self.prompt = other.prompt;
        }
        self.dispatch.merge_from(other.dispatch);
        self.actions.extend(other.actions);
    }

    pub fn effective_prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or(DEFAULT_PROMPT)
    }

    pub fn dispatch_options(&self) -> DispatchOptions {
        let defaults = DispatchOptions::default();
        DispatchOptions {
            recursion_on_invalid: self
                .dispatch
                .recursion_on_invalid
                .unwrap_or(defaults.recursion_on_invalid),
            single_action: self.dispatch.single_action.unwrap_or(defaults.single_action),
            squelch: self.dispatch.squelch.unwrap_or(defaults.squelch),
            max_attempts: self.dispatch.max_attempts.or(defaults.max_attempts),
            ..defaults
        }
    }
}

impl DispatchConfig {
    fn merge_from(&mut self, other: DispatchConfig) {
        if other.recursion_on_invalid.is_some() {
            self.recursion_on_invalid = other.recursion_on_invalid;
        }
        if other.single_action.is_some() {
            self.single_action = other.single_action;
        }
        if other.squelch.is_some() {
            self.squelch = other.squelch;
        }
        if other.max_attempts.is_some() {
            self.max_attempts = other.max_attempts;
        }
    }
}

impl ActionSpec {
    /// 등록 가능한 (식별자, 액션 목록, recursive) 항목으로 변환한다.
    pub fn to_entry(&self) -> Result<(Identifiers, Vec<Action>, bool), ArgsInError> {
        let identifiers = Identifiers::from(self.identifiers.clone());
        // 액션 생성 전에 식별자부터 검사해 오류 메시지를 일찍 낸다.
        validate_identifiers(identifiers.clone())?;

        let mut actions = Vec::new();
        if let Some(reply) = &self.reply {
            let template = reply.clone();
            let keys = template_keys(&template);
            actions.push(
                Action::with_context(move |ctx| Ok(Value::from(render_template(&template, ctx))))
                    .requires(keys),
            );
        }
        if let Some(literal) = &self.literal {
            actions.push(Action::literal(literal.clone()));
        }
        Ok((identifiers, actions, self.recursive))
    }
}
