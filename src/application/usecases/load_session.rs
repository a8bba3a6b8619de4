//! 설정을 읽어 액션이 등록된 실행기를 구성하는 유스케이스.

use anyhow::{Context, Result};

use crate::application::config::Config;
use crate::application::ports::{ConfigRepository, DiagnosticSink, InputSource};
use crate::application::usecases::dispatch::{ArgsIn, DispatchOptions};
use crate::domain::Action;

/// 대화형 실행 한 세션에 필요한 값 묶음.
pub struct Session {
    pub argsin: ArgsIn,
    pub prompt: String,
    pub options: DispatchOptions,
}

/// 설정 파일의 액션 목록과 내장 종료 플래그를 등록한다.
pub struct LoadSessionUseCase<'a> {
    pub config_repo: &'a dyn ConfigRepository,
}

/// REPL 종료용 내장 식별자.
pub const EXIT_FLAGS: [&str; 2] = ["exit", "quit"];

/// 내장 종료 액션이 반환하는 값. 설정이 같은 이름을 덮어쓰면 반환되지 않는다.
pub const EXIT_SENTINEL: &str = "argsin:exit";

impl<'a> LoadSessionUseCase<'a> {
    pub fn execute(
        &self,
        input: Box<dyn InputSource>,
        sink: Box<dyn DiagnosticSink>,
    ) -> Result<Session> {
        let config = self.config_repo.load()?;
        build_session(&config, input, sink)
    }

    /// 병합된 설정을 사람이 읽기 쉬운 JSON으로 반환한다.
    pub fn inspect(&self) -> Result<String> {
        self.config_repo.inspect_pretty_json()
    }
}

fn build_session(
    config: &Config,
    input: Box<dyn InputSource>,
    sink: Box<dyn DiagnosticSink>,
) -> Result<Session> {
    let options = config.dispatch_options();
    options.validate().context("invalid dispatch settings in config")?;

    let mut entries = Vec::with_capacity(config.actions.len());
    for (idx, spec) in config.actions.iter().enumerate() {
        let entry = spec
            .to_entry()
            .with_context(|| format!("invalid action #{idx} in config"))?;
        entries.push(entry);
    }

    let mut argsin = ArgsIn::new(input, sink).with_action_map(entries)?;
    // 설정의 액션이 같은 이름을 쓰면 먼저 등록된 설정 쪽이 우선한다.
    argsin.register(EXIT_FLAGS, vec![Action::literal(EXIT_SENTINEL)], false)?;

    Ok(Session {
        argsin,
        prompt: config.effective_prompt().to_string(),
        options,
    })
}
