//! 라이브러리 호출자가 구분해서 처리할 수 있는 오류 타입.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsInError {
    /// 등록 시점 식별자 검증 실패 또는 dispatch 진입 조건 위반.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// 입력 소스가 EOF에 도달했다.
    #[error("input closed before a line was read")]
    InputClosed,

    /// 재입력 상한에 도달했다.
    #[error("gave up after {attempts} prompt attempt(s)")]
    AttemptsExhausted { attempts: u32 },

    #[error("input only has 3 values (text, action_returns, args), got index {0}")]
    IndexOutOfRange(usize),
}
