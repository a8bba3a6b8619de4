//! dispatch 한 번의 결과 레코드.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::error::ArgsInError;
use super::extract::ArgMap;

/// (clean text, 액션 반환값, 인자 맵). 이름 또는 위치(0/1/2)로 접근한다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Input {
    pub text: String,
    pub action_returns: Vec<Value>,
    pub args: ArgMap,
}

/// 위치 접근 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputField<'a> {
    Text(&'a str),
    ActionReturns(&'a [Value]),
    Args(&'a ArgMap),
}

impl Input {
    pub fn new(text: String, action_returns: Vec<Value>, args: ArgMap) -> Self {
        Self {
            text,
            action_returns,
            args,
        }
    }

    pub fn get(&self, index: usize) -> Result<InputField<'_>, ArgsInError> {
        match index {
            0 => Ok(InputField::Text(&self.text)),
            1 => Ok(InputField::ActionReturns(&self.action_returns)),
            2 => Ok(InputField::Args(&self.args)),
            other => Err(ArgsInError::IndexOutOfRange(other)),
        }
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let returns: Vec<String> = self.action_returns.iter().map(Value::to_string).collect();
        let args: Vec<String> = self
            .args
            .iter()
            .map(|(k, v)| format!("{k:?}: {v:?}"))
            .collect();
        write!(
            f,
            "({},[{}],{{{}}})",
            self.text,
            returns.join(", "),
            args.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Input {
        let mut args = ArgMap::new();
        args.insert("name".into(), "Guido".into());
        Input::new("bdfl".into(), vec![json!(2)], args)
    }

    #[test]
    fn test_positional_access() {
        let input = sample();
        assert_eq!(input.get(0).unwrap(), InputField::Text("bdfl"));
        assert_eq!(input.get(1).unwrap(), InputField::ActionReturns(&[json!(2)]));
        assert!(matches!(input.get(2).unwrap(), InputField::Args(a) if a["name"] == "Guido"));
        assert_eq!(input.get(3).unwrap_err(), ArgsInError::IndexOutOfRange(3));
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), r#"(bdfl,[2],{"name": "Guido"})"#);
    }

    #[test]
    fn test_serialize_keeps_arg_order() {
        let mut input = sample();
        input.args.insert("after".into(), "x".into());
        let json = serde_json::to_string(&input).unwrap();
        assert_eq!(
            json,
            r#"{"text":"bdfl","action_returns":[2],"args":{"name":"Guido","after":"x"}}"#
        );
    }
}
