//! 애플리케이션 포트를 실제 인프라 구현체로 연결하는 어댑터 계층.

mod config_repository;
mod diagnostics;
mod line_input;
mod terminal_input;

pub use config_repository::JsonConfigRepository;
pub use diagnostics::TracingSink;
pub use line_input::{FnInput, StaticInput, StdinInput, input_fn};
pub use terminal_input::{TerminalInput, supports_interactive_input};
