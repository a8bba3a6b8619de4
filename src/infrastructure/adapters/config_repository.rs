//! 설정 저장소 포트 구현 어댑터.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::config::Config;
use crate::application::ports::ConfigRepository;
use crate::infrastructure::config;

/// JSON 기반 설정 저장소 어댑터.
#[derive(Debug, Clone, Default)]
pub struct JsonConfigRepository {
    /// 기본 탐색 경로 뒤에 병합할 명시 경로(`--config`)
    pub extra_path: Option<PathBuf>,
}

impl JsonConfigRepository {
    pub fn with_extra_path(path: Option<PathBuf>) -> Self {
        Self { extra_path: path }
    }
}

impl ConfigRepository for JsonConfigRepository {
    fn load(&self) -> Result<Config> {
        config::load(self.extra_path.as_deref())
    }

    fn inspect_pretty_json(&self) -> Result<String> {
        config::inspect_pretty_json(self.extra_path.as_deref())
    }
}
