//! 입력 문자열에서 `-flag value` / `--flag value` 인자를 분리하는 추출기.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

/// 플래그 이름 + 값 패턴.
/// 값은 `-`가 없는 연속 문자열, 음수(`-100`), 또는 빈 문자열 중 하나다.
static ARG_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\B-{1,2}([^\x08|\^\s]+)\s?"?([^-]+|-\d+|)"#).expect("valid arg/value regex")
});

/// 플래그 토큰 시작 패턴. 첫 매치 이전이 clean text가 된다.
static ARG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\B-{1,2}[^\x08|\^\s]+\s?"?"#).expect("valid arg regex"));

/// 플래그 이름 → 값. 최초 등장 순서를 유지하고 같은 이름은 마지막 값으로 덮어쓴다.
pub type ArgMap = IndexMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub text: String,
    pub args: ArgMap,
}

/// 원문을 (clean text, 인자 맵)으로 분리한다.
pub fn extract(raw: &str) -> Extracted {
    let mut args = ArgMap::new();
    for caps in ARG_VALUE_RE.captures_iter(raw) {
        let name = caps.get(1).map_or("", |m| m.as_str());
        let value = caps.get(2).map_or("", |m| m.as_str());
        args.insert(strip_quoted(name).to_string(), strip_quoted(value).to_string());
    }

    let text = match ARG_RE.find(raw) {
        Some(m) => raw[..m.start()].trim(),
        None => raw.trim(),
    };

    Extracted {
        text: text.to_string(),
        args,
    }
}

// 공백/따옴표만 제거한다. 탭 등 다른 공백 문자는 보존한다.
fn strip_quoted(s: &str) -> &str {
    s.trim_matches(|c| matches!(c, ' ' | '\'' | '"'))
}
