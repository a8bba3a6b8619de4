//! 애플리케이션 계층이 의존하는 포트(추상 인터페이스) 모음.

use anyhow::Result;

use crate::application::config::Config;

/// 프롬프트를 받아 한 줄을 돌려주는 입력 소스 포트.
pub trait InputSource {
    /// `Ok(None)`은 입력 종료(EOF)를 뜻한다.
    fn read_line(&self, prompt: &str) -> Result<Option<String>>;

    /// 같은 프롬프트로 다시 호출해 새 입력을 얻을 수 있는지 여부.
    /// 재입력 루프는 반복 가능한 소스에서만 허용된다.
    fn is_repeatable(&self) -> bool {
        true
    }
}

/// 레벨이 있는 진단 메시지 출력 포트.
pub trait DiagnosticSink {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// 설정 로딩/점검을 담당하는 저장소 포트.
pub trait ConfigRepository: Send + Sync {
    fn load(&self) -> Result<Config>;
    fn inspect_pretty_json(&self) -> Result<String>;
}
