//! 대화형 입력 루프.

use std::io::{self, IsTerminal, Write};

use anyhow::Result;
use serde_json::Value;

use crate::application::ports::InputSource;
use crate::application::usecases::dispatch::{ArgsIn, DispatchOptions};
use crate::application::usecases::load_session::EXIT_SENTINEL;
use crate::domain::{ArgsInError, Input};
use crate::infrastructure::adapters::{
    StaticInput, StdinInput, TerminalInput, TracingSink, supports_interactive_input,
};
use crate::interface::cli::command::RunOptions;
use crate::interface::cli::composition::AppComposition;

/// 설정을 읽어 세션을 만들고 입력을 반복 dispatch한다.
/// 결과는 한 줄씩 JSON으로 stdout에 출력한다.
pub fn run_repl(composition: &AppComposition, run: RunOptions) -> Result<()> {
    let session = composition
        .load_session_usecase()
        .execute(Box::new(StdinInput), Box::new(TracingSink))?;

    let mut options = session.options.clone();
    run.apply_to(&mut options);
    let prompt = run.prompt.clone().unwrap_or(session.prompt);
    let argsin = session.argsin;
    let mut out = io::stdout().lock();

    if let Some(text) = run.text {
        return dispatch_text(&argsin, text, &prompt, &options, &mut out);
    }

    let interactive = !run.plain && supports_interactive_input();
    let input: Box<dyn InputSource> = if interactive {
        Box::new(TerminalInput::new(known_flags(&argsin)))
    } else {
        Box::new(StdinInput)
    };

    if io::stdout().is_terminal() {
        print_welcome(&mut out, &argsin)?;
    }

    run_loop(&argsin, input.as_ref(), &prompt, &options, run.once, &mut out)
}

/// 고정 텍스트 한 줄을 dispatch한다. 다시 입력받을 수 없으므로 재입력을 끈다.
fn dispatch_text<W: Write>(
    argsin: &ArgsIn,
    text: String,
    prompt: &str,
    options: &DispatchOptions,
    out: &mut W,
) -> Result<()> {
    let options = DispatchOptions {
        recursion_on_invalid: false,
        ..options.clone()
    };
    let result = argsin.argsin_from(&StaticInput(text), prompt, &options)?;
    print_result(out, &result)
}

/// 입력이 닫히거나, 종료 액션이 실행되거나, `once`일 때까지 반복한다.
/// 설정 오류는 다음 입력으로 넘기지 않고 바로 반환한다.
fn run_loop<W: Write>(
    argsin: &ArgsIn,
    input: &dyn InputSource,
    prompt: &str,
    options: &DispatchOptions,
    once: bool,
    out: &mut W,
) -> Result<()> {
    loop {
        match dispatch_once(argsin, input, prompt, options)? {
            Step::Done(result) => {
                print_result(out, &result)?;
                if once || wants_exit(&result) {
                    break;
                }
            }
            Step::Failed => {
                if once {
                    break;
                }
            }
            Step::Closed => {
                writeln!(out)?;
                break;
            }
        }
    }
    Ok(())
}

enum Step {
    Done(Input),
    /// 재시도 소진이나 콜백 오류. 메시지를 출력하고 다음 입력으로 넘어간다.
    Failed,
    Closed,
}

fn dispatch_once(
    argsin: &ArgsIn,
    input: &dyn InputSource,
    prompt: &str,
    options: &DispatchOptions,
) -> Result<Step> {
    match argsin.argsin_from(input, prompt, options) {
        Ok(result) => Ok(Step::Done(result)),
        Err(err) => match err.downcast_ref::<ArgsInError>() {
            Some(ArgsInError::InputClosed) => Ok(Step::Closed),
            Some(ArgsInError::InvalidConfiguration(_)) => Err(err),
            _ => {
                eprintln!("error: {err:#}");
                Ok(Step::Failed)
            }
        },
    }
}

/// 내장 종료 액션이 실제로 실행됐는지 본다.
fn wants_exit(result: &Input) -> bool {
    let sentinel = Value::from(EXIT_SENTINEL);
    result.action_returns.contains(&sentinel)
}

fn known_flags(argsin: &ArgsIn) -> Vec<String> {
    let mut flags: Vec<String> = Vec::new();
    for entry in argsin.registry().entries() {
        for id in &entry.identifiers {
            if !flags.contains(id) {
                flags.push(id.clone());
            }
        }
    }
    flags
}

fn print_result<W: Write>(out: &mut W, result: &Input) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string(result)?)?;
    out.flush()?;
    Ok(())
}

fn print_welcome<W: Write>(out: &mut W, argsin: &ArgsIn) -> Result<()> {
    writeln!(out, "argsin: type text followed by -flag/--flag values")?;
    for entry in argsin.registry().entries() {
        let names: Vec<String> = entry.identifiers.iter().map(|id| format!("--{id}")).collect();
        let suffix = if entry.recursive { " (prompts again)" } else { "" };
        writeln!(out, "  {}{suffix}", names.join(", "))?;
    }
    writeln!(out)?;
    Ok(())
}
