//! `reply` 문자열의 `{key}` 치환 규칙.

use serde_json::Value;

use crate::domain::ActionContext;

/// 템플릿에 등장하는 키를 등장 순서대로(중복 제거) 반환한다.
pub fn template_keys(template: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for (_, key) in placeholders(template) {
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }
    keys
}

/// 문맥 값으로 `{key}`를 치환한다. 값이 없는 키는 원문 그대로 둔다.
pub fn render_template(template: &str, ctx: &ActionContext<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for (start, key) in placeholders(template) {
        out.push_str(&template[last..start]);
        match ctx.get(key) {
            Some(Value::String(s)) => out.push_str(&s),
            Some(other) => out.push_str(&other.to_string()),
            None => {
                out.push('{');
                out.push_str(key);
                out.push('}');
            }
        }
        last = start + key.len() + 2;
    }
    out.push_str(&template[last..]);
    out
}

// (`{`의 바이트 위치, 키) 목록. 키는 영숫자와 `_`만 허용한다.
fn placeholders(template: &str) -> Vec<(usize, &str)> {
    let mut found = Vec::new();
    let mut rest = 0;
    while let Some(open) = template[rest..].find('{') {
        let start = rest + open;
        let body = &template[start + 1..];
        let Some(close) = body.find('}') else {
            break;
        };
        let key = &body[..close];
        if !key.is_empty() && key.chars().all(|c| c.is_alphanumeric() || c == '_') {
            found.push((start, key));
            rest = start + close + 2;
        } else {
            rest = start + 1;
        }
    }
    found
}
