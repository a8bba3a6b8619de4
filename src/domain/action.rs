//! 플래그 식별자와 실행 액션의 등록 모델.

use std::fmt;

use anyhow::Result;
use serde_json::{Map, Value};

use super::error::ArgsInError;

/// 액션 호출 시 항상 채워지는 키워드. 필수 키워드 검사에서 제외한다.
const BUILTIN_KWARGS: [&str; 3] = ["value", "text", "flag"];

type ValueFn = Box<dyn Fn(&str) -> Result<Value>>;
type NoArgFn = Box<dyn Fn() -> Result<Value>>;
type ContextFn = Box<dyn Fn(&ActionContext<'_>) -> Result<Value>>;

/// 등록 시점에 호출 형태가 확정되는 액션.
pub enum Action {
    /// 플래그 값을 인자로 받는 콜백
    Value(ValueFn),
    /// 인자 없는 콜백
    NoArg(NoArgFn),
    /// 전체 호출 문맥을 받는 콜백. `required`의 키워드가 모두 있어야 호출된다.
    Context { required: Vec<String>, call: ContextFn },
    /// 호출하지 않고 그대로 반환 목록에 추가되는 값
    Literal(Value),
}

impl Action {
    pub fn with_value<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<Value> + 'static,
    {
        Self::Value(Box::new(f))
    }

    pub fn no_arg<F>(f: F) -> Self
    where
        F: Fn() -> Result<Value> + 'static,
    {
        Self::NoArg(Box::new(f))
    }

    pub fn with_context<F>(f: F) -> Self
    where
        F: Fn(&ActionContext<'_>) -> Result<Value> + 'static,
    {
        Self::Context {
            required: Vec::new(),
            call: Box::new(f),
        }
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// 문맥 콜백이 요구하는 추가 키워드를 선언한다. 다른 변형에는 영향이 없다.
    pub fn requires<I, S>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self {
            Self::Context { mut required, call } => {
                required.extend(keys.into_iter().map(Into::into));
                Self::Context { required, call }
            }
            other => other,
        }
    }

    /// 액션을 실행한다. 콜백이 반환한 오류는 그대로 전파한다.
    pub(crate) fn invoke(&self, ctx: &ActionContext<'_>) -> Result<Invocation> {
        let returned = match self {
            Self::Value(f) => f(ctx.value)?,
            Self::NoArg(f) => f()?,
            Self::Context { required, call } => {
                let missing: Vec<String> = required
                    .iter()
                    .filter(|key| {
                        !BUILTIN_KWARGS.contains(&key.as_str()) && !ctx.kwargs.contains_key(*key)
                    })
                    .cloned()
                    .collect();
                if !missing.is_empty() {
                    return Ok(Invocation::Mismatch(missing));
                }
                call(ctx)?
            }
            Self::Literal(value) => value.clone(),
        };
        Ok(Invocation::Returned(returned))
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(_) => f.write_str("Value(<fn>)"),
            Self::NoArg(_) => f.write_str("NoArg(<fn>)"),
            Self::Context { required, .. } => f
                .debug_struct("Context")
                .field("required", required)
                .finish_non_exhaustive(),
            Self::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
        }
    }
}

#[derive(Debug)]
pub(crate) enum Invocation {
    Returned(Value),
    /// 호출 형태가 맞지 않아 건너뛴 경우. 누락된 키워드 목록.
    Mismatch(Vec<String>),
}

/// dispatch 호출자가 액션에 넘기는 추가 인자.
#[derive(Debug, Clone, Default)]
pub struct ActionArgs {
    pub positional: Vec<Value>,
    pub kwargs: Map<String, Value>,
}

impl ActionArgs {
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(key.into(), value.into());
        self
    }
}

/// 문맥 콜백이 보는 호출 정보.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    pub flag: &'a str,
    pub value: &'a str,
    pub text: &'a str,
    pub positional: &'a [Value],
    pub kwargs: &'a Map<String, Value>,
}

impl ActionContext<'_> {
    /// 내장 키워드(`value`/`text`/`flag`)와 추가 키워드를 같은 방식으로 조회한다.
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            "value" => Some(Value::from(self.value)),
            "text" => Some(Value::from(self.text)),
            "flag" => Some(Value::from(self.flag)),
            _ => self.kwargs.get(key).cloned(),
        }
    }
}

/// 검증 전 식별자 입력.
#[derive(Debug, Clone, PartialEq)]
pub enum Identifiers {
    List(Vec<String>),
    /// 문자열 하나. 글자 단위 등록을 막기 위해 거부된다.
    Bare(String),
    /// 설정 파일 등에서 들어온 그 밖의 값
    Other(Value),
}

impl From<&str> for Identifiers {
    fn from(value: &str) -> Self {
        Self::Bare(value.to_string())
    }
}

impl From<String> for Identifiers {
    fn from(value: String) -> Self {
        Self::Bare(value)
    }
}

impl From<Vec<String>> for Identifiers {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for Identifiers {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(ToString::to_string).collect())
    }
}

impl From<&[&str]> for Identifiers {
    fn from(value: &[&str]) -> Self {
        Self::List(value.iter().map(ToString::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Identifiers {
    fn from(value: [&str; N]) -> Self {
        Self::List(value.iter().map(ToString::to_string).collect())
    }
}

impl From<Value> for Identifiers {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Bare(s),
            Value::Array(items) if items.iter().all(Value::is_string) => Self::List(
                items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            other => Self::Other(other),
        }
    }
}

/// 식별자 계약을 검사하고 플래그 이름 목록을 돌려준다.
pub fn validate_identifiers(identifiers: Identifiers) -> Result<Vec<String>, ArgsInError> {
    match identifiers {
        Identifiers::List(names) => Ok(names),
        Identifiers::Bare(s) => Err(ArgsInError::InvalidConfiguration(format!(
            "identifiers {s:?}: string found, expected a list of flag names"
        ))),
        Identifiers::Other(Value::Array(items)) => Err(ArgsInError::InvalidConfiguration(format!(
            "identifiers {}: every item must be a string",
            Value::Array(items)
        ))),
        Identifiers::Other(v) => Err(ArgsInError::InvalidConfiguration(format!(
            "identifiers {v} is not a list, expected a list of flag names"
        ))),
    }
}

#[derive(Debug)]
pub struct ActionEntry {
    pub identifiers: Vec<String>,
    pub actions: Vec<Action>,
    pub recursive: bool,
}

impl ActionEntry {
    pub fn matches(&self, flag: &str) -> bool {
        self.identifiers.iter().any(|id| id == flag)
    }
}

/// 등록 순서를 유지하는 액션 목록. 등록만 가능하고 삭제는 없다.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    entries: Vec<ActionEntry>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 외부에서 구성한 초기 액션 목록을 항목마다 검증해 받아들인다.
    pub fn from_action_map<I>(map: I) -> Result<Self, ArgsInError>
    where
        I: IntoIterator<Item = (Identifiers, Vec<Action>, bool)>,
    {
        let mut registry = Self::new();
        for (identifiers, actions, recursive) in map {
            registry.register(identifiers, actions, recursive)?;
        }
        Ok(registry)
    }

    pub fn register(
        &mut self,
        identifiers: impl Into<Identifiers>,
        actions: Vec<Action>,
        recursive: bool,
    ) -> Result<(), ArgsInError> {
        let identifiers = validate_identifiers(identifiers.into())?;
        self.entries.push(ActionEntry {
            identifiers,
            actions,
            recursive,
        });
        Ok(())
    }

    /// 등록 순서상 첫 번째로 일치하는 항목.
    pub fn find(&self, flag: &str) -> Option<&ActionEntry> {
        self.entries.iter().find(|entry| entry.matches(flag))
    }

    pub fn is_known(&self, flag: &str) -> bool {
        self.find(flag).is_some()
    }

    pub fn entries(&self) -> &[ActionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
