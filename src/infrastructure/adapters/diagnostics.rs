//! 진단 출력 포트 구현 어댑터.

use crate::application::ports::DiagnosticSink;

/// `tracing` 이벤트로 진단 메시지를 내보내는 기본 어댑터.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn info(&self, message: &str) {
        tracing::info!(target: "argsin", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "argsin", "{message}");
    }
}
