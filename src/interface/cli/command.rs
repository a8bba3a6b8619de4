//! CLI 명령 파싱 모듈.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::usecases::dispatch::DispatchOptions;

#[derive(Debug, Parser)]
#[command(name = "argsin")]
#[command(about = "Read a line, split trailing -flag/--flag values and run configured actions")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Text to dispatch once without prompting (use `--` before text starting with a dash)
    text: Option<String>,

    /// Extra JSON config file, merged with the highest priority
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Prompt shown before each line (overrides config)
    #[arg(long)]
    prompt: Option<String>,

    /// Dispatch a single line and exit
    #[arg(long)]
    once: bool,

    /// Run only the first matching flag's actions
    #[arg(long)]
    single_action: bool,

    /// Silence unknown-flag and action diagnostics
    #[arg(long)]
    squelch: bool,

    /// Ignore unknown flags instead of prompting again
    #[arg(long)]
    no_recursion: bool,

    /// Give up after this many prompts in one dispatch
    #[arg(long, value_name = "N")]
    max_attempts: Option<u32>,

    /// Extra keyword for reply templates
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    set: Vec<(String, String)>,

    /// Read plain lines from stdin even on a terminal
    #[arg(long)]
    plain: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show merged config, effective dispatch settings and action validation
    Config,
}

pub enum CliAction {
    InspectConfig { config: Option<PathBuf> },
    Run(RunOptions),
}

/// 실행 모드 옵션. 설정 파일 값 위에 CLI 플래그를 덮어쓴다.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config: Option<PathBuf>,
    pub prompt: Option<String>,
    pub text: Option<String>,
    pub once: bool,
    pub plain: bool,
    pub single_action: bool,
    pub squelch: bool,
    pub no_recursion: bool,
    pub max_attempts: Option<u32>,
    pub kwargs: Vec<(String, String)>,
}

impl RunOptions {
    /// 설정에서 온 옵션에 CLI 플래그를 반영한다. 플래그는 켜는 방향으로만 작동한다.
    pub fn apply_to(&self, options: &mut DispatchOptions) {
        options.single_action |= self.single_action;
        options.squelch |= self.squelch;
        if self.no_recursion {
            options.recursion_on_invalid = false;
        }
        if self.max_attempts.is_some() {
            options.max_attempts = self.max_attempts;
        }
        for (key, value) in &self.kwargs {
            options
                .extra
                .kwargs
                .insert(key.clone(), serde_json::Value::from(value.as_str()));
        }
    }
}

impl Cli {
    pub fn parse_action() -> Result<CliAction, String> {
        let cli = Cli::parse();
        cli.into_action()
    }

    fn into_action(self) -> Result<CliAction, String> {
        match self.command {
            Some(Commands::Config) => Ok(CliAction::InspectConfig {
                config: self.config,
            }),
            None => {
                if self.max_attempts == Some(0) {
                    return Err("--max-attempts must be at least 1".to_string());
                }

                Ok(CliAction::Run(RunOptions {
                    config: self.config,
                    prompt: self.prompt,
                    text: self.text,
                    once: self.once,
                    plain: self.plain,
                    single_action: self.single_action,
                    squelch: self.squelch,
                    no_recursion: self.no_recursion,
                    max_attempts: self.max_attempts,
                    kwargs: self.set,
                }))
            }
        }
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}
