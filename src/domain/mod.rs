//! Domain layer
//! 인자 추출 문법과 액션 등록 규칙을 외부 의존성 없이 표현한다.

pub mod action;
pub mod error;
pub mod extract;
pub mod input;

pub use action::{Action, ActionArgs, ActionContext, ActionEntry, ActionRegistry, Identifiers};
pub use error::ArgsInError;
pub use extract::{ArgMap, Extracted, extract};
pub use input::{Input, InputField};
