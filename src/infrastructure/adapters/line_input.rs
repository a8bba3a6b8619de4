//! 입력 소스 포트의 기본 구현들.

use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::application::ports::InputSource;

/// 프롬프트를 stdout에 쓰고 stdin에서 한 줄을 읽는다.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinInput;

impl InputSource for StdinInput {
    fn read_line(&self, prompt: &str) -> Result<Option<String>> {
        print!("{prompt}");
        io::stdout().flush()?;
        read_line_from(&mut io::stdin().lock())
    }
}

/// 항상 같은 문자열을 돌려주는 고정 입력.
/// 새 입력을 받을 수 없으므로 재입력 루프와 함께 쓸 수 없다.
#[derive(Debug, Clone)]
pub struct StaticInput(pub String);

impl InputSource for StaticInput {
    fn read_line(&self, _prompt: &str) -> Result<Option<String>> {
        Ok(Some(self.0.clone()))
    }

    fn is_repeatable(&self) -> bool {
        false
    }
}

/// 클로저를 입력 소스로 감싼다.
pub struct FnInput<F>(F);

/// `FnInput` 생성 헬퍼.
pub fn input_fn<F>(f: F) -> FnInput<F>
where
    F: Fn(&str) -> Result<Option<String>>,
{
    FnInput(f)
}

impl<F> InputSource for FnInput<F>
where
    F: Fn(&str) -> Result<Option<String>>,
{
    fn read_line(&self, prompt: &str) -> Result<Option<String>> {
        (self.0)(prompt)
    }
}

/// 한 줄을 읽어 줄바꿈을 제거한다. EOF면 `None`.
pub(crate) fn read_line_from<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = reader.read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(trim_newline(line)))
}

pub(crate) fn trim_newline(mut s: String) -> String {
    while matches!(s.chars().last(), Some('\n' | '\r')) {
        s.pop();
    }
    s
}
