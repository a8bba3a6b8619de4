//! Interface layer
//! CLI 인자 파싱, 의존성 조립, 대화형 루프를 담당한다.

pub mod cli;
