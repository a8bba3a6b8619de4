//! argsin library root.
//! 사용자 입력 한 줄에서 `-flag value` 인자를 분리하고 등록된 액션을 실행한다.
//!
//! ```no_run
//! use argsin::{Action, DispatchOptions};
//!
//! let mut argsin = argsin::default_argsin();
//! argsin
//!     .register(
//!         ["name", "nickname"],
//!         vec![Action::with_value(|v| {
//!             println!("Looking for: {v}...");
//!             Ok(serde_json::Value::Null)
//!         })],
//!         false,
//!     )
//!     .unwrap();
//! let input = argsin.argsin("Find user: ", &DispatchOptions::default()).unwrap();
//! println!("{}", input.text);
//! ```

use anyhow::Result;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interface;

pub use application::ports::{DiagnosticSink, InputSource};
pub use application::usecases::dispatch::{ArgsIn, DispatchOptions};
pub use domain::{
    Action, ActionArgs, ActionContext, ArgMap, ArgsInError, Extracted, Identifiers, Input,
    InputField, extract,
};

use infrastructure::adapters::{StdinInput, TracingSink};

/// stdin 입력 + tracing 진단을 쓰는 기본 실행기.
pub fn default_argsin() -> ArgsIn {
    ArgsIn::new(Box::new(StdinInput), Box::new(TracingSink))
}

/// 등록된 액션 없이 한 줄을 읽어 인자만 분리한다.
/// 빈 레지스트리에서는 모든 플래그가 미등록이므로 재입력을 끈 상태로 실행한다.
pub fn argsin(prompt: &str) -> Result<Input> {
    let options = DispatchOptions {
        recursion_on_invalid: false,
        squelch: true,
        ..DispatchOptions::default()
    };
    default_argsin().argsin(prompt, &options)
}
