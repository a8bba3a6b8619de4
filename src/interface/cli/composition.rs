//! 애플리케이션 조립(composition root) 모듈.

use std::path::PathBuf;

use crate::application::usecases::load_session::LoadSessionUseCase;
use crate::infrastructure::adapters::JsonConfigRepository;

/// 실행 시점 의존성을 한 곳에서 조립하는 컨테이너.
#[derive(Default)]
pub struct AppComposition {
    config_repo: JsonConfigRepository,
}

impl AppComposition {
    /// `--config`로 받은 추가 설정 경로를 반영해 생성한다.
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self {
            config_repo: JsonConfigRepository::with_extra_path(config_path),
        }
    }

    /// 설정 기반 세션 구성 유스케이스를 생성한다.
    pub fn load_session_usecase(&self) -> LoadSessionUseCase<'_> {
        LoadSessionUseCase {
            config_repo: &self.config_repo,
        }
    }
}
