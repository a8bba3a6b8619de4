//! 대화형 터미널 입력 처리기.
//! 입력 중 추출된 플래그를 실시간으로 표시하고, `-`로 시작하는 단어에는 등록된 플래그를 추천한다.

use std::env;
use std::io::{self, IsTerminal, Write};

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::style::{Color, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, ClearType};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::line_input::read_line_from;
use crate::application::ports::InputSource;
use crate::domain::extract;

// 입력 영역 기본 높이: 상단 구분선 + 입력줄 + 하단 구분선
const PANEL_BASE_HEIGHT: usize = 3;
const MAX_SUGGESTIONS: usize = 5;

/// 등록된 플래그 목록을 알고 있는 터미널 입력 소스.
/// - TTY + 지원 터미널: 실시간 플래그 힌트 + 방향키 추천 선택
/// - non-TTY/미지원 터미널: 일반 라인 입력
#[derive(Debug, Clone, Default)]
pub struct TerminalInput {
    flags: Vec<String>,
}

impl TerminalInput {
    pub fn new(flags: Vec<String>) -> Self {
        Self { flags }
    }
}

impl InputSource for TerminalInput {
    fn read_line(&self, prompt: &str) -> Result<Option<String>> {
        if !supports_interactive_input() {
            return read_line_fallback(prompt);
        }

        match read_line_interactive(prompt, &self.flags) {
            Ok(v) => Ok(v),
            Err(err) => {
                tracing::debug!(error = %err, "interactive input failed, falling back to stdin");
                read_line_fallback(prompt)
            }
        }
    }
}

/// 대화형 편집기를 쓸 수 있는 터미널인지 검사한다.
pub fn supports_interactive_input() -> bool {
    if !io::stdout().is_terminal() || !io::stdin().is_terminal() {
        return false;
    }

    // dumb 터미널에서는 제어 시퀀스 기반 UI를 비활성화한다.
    if let Ok(term) = env::var("TERM")
        && term.eq_ignore_ascii_case("dumb")
    {
        return false;
    }

    true
}

fn read_line_fallback(prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    read_line_from(&mut io::stdin().lock())
}

fn read_line_interactive(prompt: &str, flags: &[String]) -> Result<Option<String>> {
    let mut stdout = io::stdout();
    let _guard = InputGuard::enter(&mut stdout)?;

    let mut input = String::new();
    let mut cursor_chars = 0usize;
    let mut selected_idx = 0usize;

    loop {
        let suggestions = match_suggestions(&input, flags);
        if suggestions.is_empty() {
            selected_idx = 0;
        } else if selected_idx >= suggestions.len() {
            selected_idx = suggestions.len() - 1;
        }

        render_frame(
            &mut stdout,
            prompt,
            &input,
            cursor_chars,
            flags,
            &suggestions,
            selected_idx,
        )?;

        match event::read()? {
            Event::Paste(text) => {
                for ch in text.chars().filter(|c| !matches!(c, '\n' | '\r')) {
                    insert_char_at(&mut input, cursor_chars, ch);
                    cursor_chars += 1;
                }
            }
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match key.code {
                    KeyCode::Enter => {
                        clear_panel_for_output(&mut stdout)?;
                        echo_line(&mut stdout, prompt, &input)?;
                        return Ok(Some(input));
                    }
                    KeyCode::Backspace => {
                        if cursor_chars > 0 {
                            remove_char_at(&mut input, cursor_chars - 1);
                            cursor_chars -= 1;
                        }
                    }
                    KeyCode::Delete => {
                        if cursor_chars < input.chars().count() {
                            remove_char_at(&mut input, cursor_chars);
                        }
                    }
                    KeyCode::Left => cursor_chars = cursor_chars.saturating_sub(1),
                    KeyCode::Right => {
                        cursor_chars = (cursor_chars + 1).min(input.chars().count());
                    }
                    KeyCode::Home => cursor_chars = 0,
                    KeyCode::End => cursor_chars = input.chars().count(),
                    KeyCode::Up => selected_idx = selected_idx.saturating_sub(1),
                    KeyCode::Down => {
                        if !suggestions.is_empty() {
                            selected_idx = (selected_idx + 1).min(suggestions.len() - 1);
                        }
                    }
                    KeyCode::Tab => {
                        if let Some(name) = suggestions.get(selected_idx)
                            && let Some(completed) = complete_flag(&input, name)
                        {
                            input = completed;
                            cursor_chars = input.chars().count();
                        }
                    }
                    KeyCode::Char('c' | 'd') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        clear_panel_for_output(&mut stdout)?;
                        return Ok(None);
                    }
                    KeyCode::Char(ch) => {
                        if !key.modifiers.contains(KeyModifiers::CONTROL)
                            && !key.modifiers.contains(KeyModifiers::ALT)
                        {
                            insert_char_at(&mut input, cursor_chars, ch);
                            cursor_chars += 1;
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }
}

/// 입력 끝에서 작성 중인 플래그 단어를 (대시 접두사, 이름 접두사)로 반환한다.
fn trailing_flag_word(input: &str) -> Option<(&str, &str)> {
    if input.ends_with(char::is_whitespace) {
        return None;
    }
    let word = input.rsplit(char::is_whitespace).next()?;
    let name = word.strip_prefix("--").or_else(|| word.strip_prefix('-'))?;
    let dashes = &word[..word.len() - name.len()];
    Some((dashes, name))
}

fn match_suggestions<'a>(input: &str, flags: &'a [String]) -> Vec<&'a str> {
    let Some((_, prefix)) = trailing_flag_word(input) else {
        return Vec::new();
    };

    flags
        .iter()
        .map(String::as_str)
        .filter(|name| name.starts_with(prefix) && *name != prefix)
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// 작성 중인 플래그 단어를 추천 이름으로 바꾸고 값 입력을 위해 공백을 붙인다.
fn complete_flag(input: &str, name: &str) -> Option<String> {
    let (dashes, prefix) = trailing_flag_word(input)?;
    let keep = input.len() - prefix.len() - dashes.len();
    Some(format!("{}{dashes}{name} ", &input[..keep]))
}

/// 현재 입력에서 추출된 플래그 요약. 미등록 플래그가 있으면 빨간색.
fn flag_hint(input: &str, flags: &[String]) -> Option<(Color, String)> {
    let extracted = extract(input);
    if extracted.args.is_empty() {
        return None;
    }

    let mut unknown = false;
    let parts: Vec<String> = extracted
        .args
        .iter()
        .map(|(name, value)| {
            let known = flags.iter().any(|f| f == name);
            unknown |= !known;
            let mark = if known { "" } else { " (unknown)" };
            if value.is_empty() {
                format!("{name}{mark}")
            } else {
                format!("{name}={value}{mark}")
            }
        })
        .collect();

    let color = if unknown { Color::Red } else { Color::Green };
    Some((color, format!("flags: {}", parts.join(", "))))
}

fn render_frame(
    stdout: &mut io::Stdout,
    prompt: &str,
    input: &str,
    cursor_chars: usize,
    flags: &[String],
    suggestions: &[&str],
    selected_idx: usize,
) -> Result<()> {
    let (w, h) = terminal::size().unwrap_or((120, 40));
    let width = (w as usize).max(20);
    let total_rows = h as usize;

    let hint = flag_hint(input, flags);
    let panel_height = PANEL_BASE_HEIGHT + usize::from(hint.is_some()) + suggestions.len();
    let panel_top = total_rows.saturating_sub(panel_height);
    let input_row = panel_top + 1;

    // 이전 프레임 잔상을 지우기 위해 가능한 최대 영역을 클리어한다.
    let max_panel_height = PANEL_BASE_HEIGHT + 1 + MAX_SUGGESTIONS;
    for row in total_rows.saturating_sub(max_panel_height)..total_rows {
        execute!(
            stdout,
            cursor::MoveTo(0, row as u16),
            terminal::Clear(ClearType::CurrentLine)
        )?;
    }

    let divider = "─".repeat(width);
    draw_line(stdout, panel_top as u16, &divider, width, Color::White, true)?;
    draw_line(
        stdout,
        input_row as u16,
        &render_prompt_line(prompt, input, width),
        width,
        Color::White,
        true,
    )?;
    draw_line(stdout, (panel_top + 2) as u16, &divider, width, Color::White, true)?;

    let mut next_row = panel_top + PANEL_BASE_HEIGHT;
    if let Some((color, line)) = hint {
        draw_line(stdout, next_row as u16, &line, width, color, false)?;
        next_row += 1;
    }
    for (idx, name) in suggestions.iter().enumerate() {
        let marker = if idx == selected_idx { ">" } else { " " };
        let line = format!("{marker} --{name}  (Tab to complete)");
        draw_line(stdout, next_row as u16, &line, width, Color::Grey, false)?;
        next_row += 1;
    }

    let col = prompt_cursor_col(prompt, input, cursor_chars, width) as u16;
    execute!(stdout, cursor::MoveTo(col, input_row as u16), cursor::Show)?;
    stdout.flush()?;
    Ok(())
}

fn render_prompt_line(prompt: &str, input: &str, width: usize) -> String {
    let available = width.saturating_sub(display_width(prompt));
    let shown = tail_with_ellipsis_display(input, available);
    clip_line_display(&format!("{prompt}{shown}"), width)
}

fn prompt_cursor_col(prompt: &str, input: &str, cursor_chars: usize, width: usize) -> usize {
    let prompt_width = display_width(prompt);
    let available = width.saturating_sub(prompt_width);
    let before_cursor: String = input.chars().take(cursor_chars).collect();

    if display_width(input) <= available {
        return (prompt_width + display_width(&before_cursor)).min(width.saturating_sub(1));
    }

    // 입력이 넘치면 끝부분만 보이므로 커서를 입력 끝에 맞춘다.
    (prompt_width + display_width(&tail_with_ellipsis_display(input, available)))
        .min(width.saturating_sub(1))
}

fn tail_with_ellipsis_display(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }

    let target = max_width - 3;
    let mut tail: Vec<char> = Vec::new();
    let mut used = 0usize;
    for ch in text.chars().rev() {
        let cw = char_display_width(ch);
        if used + cw > target {
            break;
        }
        tail.push(ch);
        used += cw;
    }

    let tail: String = tail.into_iter().rev().collect();
    format!("...{tail}")
}

fn clip_line_display(line: &str, max_width: usize) -> String {
    if display_width(line) <= max_width {
        return line.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }

    let cap = max_width - 3;
    let mut out = String::new();
    let mut used = 0usize;
    for ch in line.chars() {
        let cw = char_display_width(ch);
        if used + cw > cap {
            break;
        }
        out.push(ch);
        used += cw;
    }
    out.push_str("...");
    out
}

// panel=true면 입력 영역용 배경색을 칠한다.
fn draw_line(
    stdout: &mut io::Stdout,
    row: u16,
    text: &str,
    width: usize,
    fg: Color,
    panel: bool,
) -> Result<()> {
    execute!(stdout, cursor::MoveTo(0, row))?;
    if panel {
        execute!(stdout, SetBackgroundColor(Color::DarkGrey))?;
    }
    execute!(
        stdout,
        SetForegroundColor(fg),
        terminal::Clear(ClearType::CurrentLine)
    )?;

    let clipped = clip_line_display(text, width);
    let pad = width.saturating_sub(display_width(&clipped));
    write!(stdout, "{clipped}{}", " ".repeat(pad))?;
    execute!(stdout, ResetColor)?;
    Ok(())
}

/// raw 모드에서는 `\n`만으로 줄 머리로 돌아가지 않으므로 `\r\n`으로 끝낸다.
fn echo_line<W: Write>(out: &mut W, prompt: &str, input: &str) -> io::Result<()> {
    write!(out, "{prompt}{input}\r\n")?;
    out.flush()
}

fn clear_panel_for_output(stdout: &mut io::Stdout) -> Result<()> {
    let (_, h) = terminal::size().unwrap_or((120, 40));
    let top = (h as usize).saturating_sub(PANEL_BASE_HEIGHT + 1 + MAX_SUGGESTIONS);
    execute!(
        stdout,
        cursor::MoveTo(0, top as u16),
        terminal::Clear(ClearType::FromCursorDown),
        ResetColor,
        cursor::Show
    )?;
    stdout.flush()?;
    Ok(())
}

fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

fn char_display_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

struct InputGuard;

impl InputGuard {
    fn enter(stdout: &mut io::Stdout) -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(stdout, cursor::Show)?;
        Ok(Self)
    }
}

impl Drop for InputGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show, ResetColor);
        let _ = terminal::disable_raw_mode();
        let _ = stdout.flush();
    }
}

fn insert_char_at(input: &mut String, char_idx: usize, ch: char) {
    let byte_idx = byte_index_at_char(input, char_idx);
    input.insert(byte_idx, ch);
}

fn remove_char_at(input: &mut String, char_idx: usize) {
    let start = byte_index_at_char(input, char_idx);
    let end = byte_index_at_char(input, char_idx + 1);
    if start < end {
        input.replace_range(start..end, "");
    }
}

fn byte_index_at_char(input: &str, char_idx: usize) -> usize {
    input
        .char_indices()
        .nth(char_idx)
        .map_or(input.len(), |(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags() -> Vec<String> {
        ["name", "nickname", "negative", "quit"]
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_echo_line_returns_carriage() {
        let mut out: Vec<u8> = Vec::new();
        echo_line(&mut out, "argsin> ", "find --name x").unwrap();
        assert_eq!(out, b"argsin> find --name x\r\n");
    }

    #[test]
    fn test_trailing_flag_word() {
        assert_eq!(trailing_flag_word("find --ni"), Some(("--", "ni")));
        assert_eq!(trailing_flag_word("find -n"), Some(("-", "n")));
        assert_eq!(trailing_flag_word("find --"), Some(("--", "")));
        assert_eq!(trailing_flag_word("find --name "), None);
        assert_eq!(trailing_flag_word("find name"), None);
    }

    #[test]
    fn test_suggestions_match_prefix() {
        let flags = flags();
        assert_eq!(match_suggestions("bdfl --n", &flags), vec!["name", "nickname", "negative"]);
        assert_eq!(match_suggestions("bdfl --ni", &flags), vec!["nickname"]);
        assert!(match_suggestions("bdfl --name", &flags).is_empty());
        assert!(match_suggestions("bdfl", &flags).is_empty());
    }

    #[test]
    fn test_complete_flag_keeps_dashes() {
        assert_eq!(
            complete_flag("bdfl --ni", "nickname").as_deref(),
            Some("bdfl --nickname ")
        );
        assert_eq!(complete_flag("-q", "quit").as_deref(), Some("-quit "));
        assert_eq!(complete_flag("bdfl ", "quit"), None);
    }

    #[test]
    fn test_flag_hint_colors_unknown() {
        let flags = flags();
        assert_eq!(flag_hint("just text", &flags), None);
        assert_eq!(
            flag_hint("bdfl --name Guido --quit", &flags),
            Some((Color::Green, "flags: name=Guido, quit".to_string()))
        );
        assert_eq!(
            flag_hint("bdfl --bogus 1", &flags),
            Some((Color::Red, "flags: bogus=1 (unknown)".to_string()))
        );
    }

    #[test]
    fn test_char_editing_is_utf8_safe() {
        let mut s = "가나".to_string();
        insert_char_at(&mut s, 1, 'x');
        assert_eq!(s, "가x나");
        remove_char_at(&mut s, 2);
        assert_eq!(s, "가x");
        remove_char_at(&mut s, 5);
        assert_eq!(s, "가x");
    }

    #[test]
    fn test_clip_and_tail() {
        assert_eq!(clip_line_display("abcdef", 5), "ab...");
        assert_eq!(tail_with_ellipsis_display("abcdef", 5), "...ef");
        assert_eq!(tail_with_ellipsis_display("abc", 5), "abc");
    }
}
