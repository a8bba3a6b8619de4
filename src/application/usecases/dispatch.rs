//! 입력 한 줄을 읽어 인자를 추출하고 등록된 액션을 실행하는 유스케이스.

use anyhow::Result;
use serde_json::Value;
use tracing::debug;

use crate::application::ports::{DiagnosticSink, InputSource};
use crate::domain::action::Invocation;
use crate::domain::{
    Action, ActionArgs, ActionContext, ActionRegistry, ArgsInError, Extracted, Identifiers, Input,
    extract,
};

/// dispatch 호출 단위 옵션.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// 알 수 없는 플래그가 있으면 처음부터 다시 입력받는다.
    pub recursion_on_invalid: bool,
    /// 첫 번째 유효 플래그의 액션만 실행하고 반환한다.
    pub single_action: bool,
    /// 진단 메시지를 출력하지 않는다.
    pub squelch: bool,
    /// 재입력 포함 최대 프롬프트 횟수. `None`이면 제한 없음.
    pub max_attempts: Option<u32>,
    /// 문맥 콜백에 전달할 추가 인자
    pub extra: ActionArgs,
}

impl DispatchOptions {
    /// 입력을 읽기 전에 옵션 조합을 검사한다.
    pub fn validate(&self) -> Result<(), ArgsInError> {
        if self.max_attempts == Some(0) {
            return Err(ArgsInError::InvalidConfiguration(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            recursion_on_invalid: true,
            single_action: false,
            squelch: false,
            max_attempts: None,
            extra: ActionArgs::default(),
        }
    }
}

/// 액션 레지스트리와 기본 입력 소스, 진단 출력을 묶은 실행기.
pub struct ArgsIn {
    registry: ActionRegistry,
    input: Box<dyn InputSource>,
    sink: Box<dyn DiagnosticSink>,
}

impl ArgsIn {
    pub fn new(input: Box<dyn InputSource>, sink: Box<dyn DiagnosticSink>) -> Self {
        Self {
            registry: ActionRegistry::new(),
            input,
            sink,
        }
    }

    /// 외부에서 구성한 초기 액션 목록으로 레지스트리를 교체한다.
    pub fn with_action_map<I>(mut self, map: I) -> Result<Self, ArgsInError>
    where
        I: IntoIterator<Item = (Identifiers, Vec<Action>, bool)>,
    {
        self.registry = ActionRegistry::from_action_map(map)?;
        Ok(self)
    }

    pub fn register(
        &mut self,
        identifiers: impl Into<Identifiers>,
        actions: Vec<Action>,
        recursive: bool,
    ) -> Result<(), ArgsInError> {
        self.registry.register(identifiers, actions, recursive)
    }

    /// recursive가 아닌 항목을 등록한다.
    pub fn add_action(
        &mut self,
        identifiers: impl Into<Identifiers>,
        actions: Vec<Action>,
    ) -> Result<(), ArgsInError> {
        self.register(identifiers, actions, false)
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn find_arguments(&self, text: &str) -> Extracted {
        extract(text)
    }

    /// 기본 입력 소스로 dispatch한다.
    pub fn argsin(&self, prompt: &str, options: &DispatchOptions) -> Result<Input> {
        self.argsin_from(self.input.as_ref(), prompt, options)
    }

    /// 주어진 입력 소스로 dispatch한다.
    /// 재입력(알 수 없는 플래그, recursive 액션)은 같은 프롬프트와 옵션으로 처음부터 다시 시작한다.
    pub fn argsin_from(
        &self,
        input: &dyn InputSource,
        prompt: &str,
        options: &DispatchOptions,
    ) -> Result<Input> {
        options.validate()?;
        if options.recursion_on_invalid && !input.is_repeatable() {
            return Err(ArgsInError::InvalidConfiguration(
                "recursion_on_invalid requires a repeatable input source (infinite recursion)"
                    .to_string(),
            )
            .into());
        }

        let mut attempts: u32 = 0;
        'prompt: loop {
            if let Some(max) = options.max_attempts
                && attempts >= max
            {
                return Err(ArgsInError::AttemptsExhausted { attempts }.into());
            }
            attempts += 1;

            let raw = input
                .read_line(prompt)?
                .ok_or(ArgsInError::InputClosed)?;
            let Extracted { text, args } = extract(&raw);
            debug!(attempt = attempts, text = %text, args = ?args, "parsed input");

            let mut returns: Vec<Value> = Vec::new();
            for (flag, value) in &args {
                let Some(entry) = self.registry.find(flag) else {
                    if !options.squelch {
                        self.sink.info(&format!("Unknown arg: \"{flag}\""));
                    }
                    if options.recursion_on_invalid {
                        debug!(flag = %flag, "re-prompting on unknown arg");
                        continue 'prompt;
                    }
                    continue;
                };

                let ctx = ActionContext {
                    flag,
                    value,
                    text: &text,
                    positional: &options.extra.positional,
                    kwargs: &options.extra.kwargs,
                };
                for action in &entry.actions {
                    match action.invoke(&ctx)? {
                        Invocation::Returned(v) => returns.push(v),
                        Invocation::Mismatch(missing) => {
                            if !options.squelch {
                                self.sink.error(&format!(
                                    "Action {:?} for {:?} is callable but intakes unexpected arguments (missing: {})",
                                    action,
                                    entry.identifiers,
                                    missing.join(", ")
                                ));
                            }
                        }
                    }
                }

                if entry.recursive {
                    debug!(flag = %flag, "recursive action, re-prompting");
                    continue 'prompt;
                }
                if options.single_action {
                    break;
                }
            }

            return Ok(Input::new(text, returns, args));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::rc::Rc;

    use serde_json::json;

    use super::*;

    /// 미리 정한 줄을 차례로 돌려주고 호출 횟수를 센다.
    struct ScriptedInput {
        lines: RefCell<VecDeque<String>>,
        calls: Cell<usize>,
        repeatable: bool,
    }

    impl ScriptedInput {
        fn new(lines: &[&str]) -> Self {
            Self {
                lines: RefCell::new(lines.iter().map(ToString::to_string).collect()),
                calls: Cell::new(0),
                repeatable: true,
            }
        }
    }

    impl InputSource for ScriptedInput {
        fn read_line(&self, _prompt: &str) -> Result<Option<String>> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.lines.borrow_mut().pop_front())
        }

        fn is_repeatable(&self) -> bool {
            self.repeatable
        }
    }

    #[derive(Default, Clone)]
    struct RecordingSink {
        infos: Rc<RefCell<Vec<String>>>,
        errors: Rc<RefCell<Vec<String>>>,
    }

    impl DiagnosticSink for RecordingSink {
        fn info(&self, message: &str) {
            self.infos.borrow_mut().push(message.to_string());
        }

        fn error(&self, message: &str) {
            self.errors.borrow_mut().push(message.to_string());
        }
    }

    fn argsin_with_sink() -> (ArgsIn, RecordingSink) {
        let sink = RecordingSink::default();
        let argsin = ArgsIn::new(Box::new(ScriptedInput::new(&[])), Box::new(sink.clone()));
        (argsin, sink)
    }

    fn no_retry() -> DispatchOptions {
        DispatchOptions {
            recursion_on_invalid: false,
            ..DispatchOptions::default()
        }
    }

    #[test]
    fn test_value_noarg_and_literal_actions() {
        let (mut argsin, _) = argsin_with_sink();
        argsin
            .register(
                ["name", "nickname"],
                vec![
                    Action::with_value(|v| Ok(json!(format!("Looking for: {v}...")))),
                    Action::literal(2),
                ],
                false,
            )
            .unwrap();
        argsin
            .register(["cool"], vec![Action::no_arg(|| Ok(json!("I'm cool!")))], false)
            .unwrap();

        let input = ScriptedInput::new(&["bdfl --nickname Guido --cool"]);
        let result = argsin
            .argsin_from(&input, "Find user: ", &DispatchOptions::default())
            .unwrap();

        assert_eq!(result.text, "bdfl");
        assert_eq!(
            result.action_returns,
            vec![json!("Looking for: Guido..."), json!(2), json!("I'm cool!")]
        );
        assert_eq!(result.args["nickname"], "Guido");
        assert_eq!(result.args["cool"], "");
        assert_eq!(input.calls.get(), 1);
    }

    #[test]
    fn test_unknown_flag_reprompts() {
        let (mut argsin, sink) = argsin_with_sink();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        argsin
            .register(
                ["name"],
                vec![Action::no_arg(move || {
                    counter.set(counter.get() + 1);
                    Ok(Value::Null)
                })],
                false,
            )
            .unwrap();

        let input = ScriptedInput::new(&["a --name x --bogus 1", "b --name y"]);
        let result = argsin
            .argsin_from(&input, "> ", &DispatchOptions::default())
            .unwrap();

        assert_eq!(input.calls.get(), 2);
        assert_eq!(result.text, "b");
        assert!(!result.args.contains_key("bogus"));
        // 첫 입력의 `--name` 액션은 이미 실행된 뒤 재입력된다.
        assert_eq!(hits.get(), 2);
        assert_eq!(*sink.infos.borrow(), vec!["Unknown arg: \"bogus\"".to_string()]);
    }

    #[test]
    fn test_unknown_flag_ignored_without_recursion() {
        let (mut argsin, sink) = argsin_with_sink();
        argsin.register(["name"], vec![Action::literal("n")], false).unwrap();

        let input = ScriptedInput::new(&["a --bogus 1 --name x"]);
        let result = argsin.argsin_from(&input, "> ", &no_retry()).unwrap();

        assert_eq!(input.calls.get(), 1);
        assert_eq!(result.action_returns, vec![json!("n")]);
        assert_eq!(result.args["bogus"], "1");
        assert_eq!(sink.infos.borrow().len(), 1);
    }

    #[test]
    fn test_squelch_silences_diagnostics() {
        let (mut argsin, sink) = argsin_with_sink();
        argsin
            .register(
                ["who"],
                vec![Action::with_context(|_| Ok(Value::Null)).requires(["user"])],
                false,
            )
            .unwrap();

        let input = ScriptedInput::new(&["--bogus --who me"]);
        let options = DispatchOptions {
            squelch: true,
            ..no_retry()
        };
        let result = argsin.argsin_from(&input, "> ", &options).unwrap();

        assert!(result.action_returns.is_empty());
        assert!(sink.infos.borrow().is_empty());
        assert!(sink.errors.borrow().is_empty());
    }

    #[test]
    fn test_single_action_stops_after_first_entry() {
        let (mut argsin, _) = argsin_with_sink();
        argsin.register(["a"], vec![Action::literal("a")], false).unwrap();
        argsin.register(["b"], vec![Action::literal("b")], false).unwrap();

        let input = ScriptedInput::new(&["x --b 1 --a 2"]);
        let options = DispatchOptions {
            single_action: true,
            ..DispatchOptions::default()
        };
        let result = argsin.argsin_from(&input, "> ", &options).unwrap();

        assert_eq!(result.action_returns, vec![json!("b")]);
        assert_eq!(result.args.len(), 2);
    }

    #[test]
    fn test_recursive_entry_reprompts() {
        let (mut argsin, _) = argsin_with_sink();
        argsin.register(["again"], vec![Action::literal("again")], true).unwrap();
        argsin.register(["done"], vec![Action::literal("done")], false).unwrap();

        let input = ScriptedInput::new(&["--again", "--again --done", "fin --done"]);
        let result = argsin
            .argsin_from(&input, "> ", &DispatchOptions::default())
            .unwrap();

        assert_eq!(input.calls.get(), 3);
        assert_eq!(result.text, "fin");
        assert_eq!(result.action_returns, vec![json!("done")]);
    }

    #[test]
    fn test_max_attempts_bounds_reprompting() {
        let (argsin, _) = argsin_with_sink();
        let input = ScriptedInput::new(&["--x", "--y", "--z", "ok"]);
        let options = DispatchOptions {
            max_attempts: Some(2),
            squelch: true,
            ..DispatchOptions::default()
        };

        let err = argsin.argsin_from(&input, "> ", &options).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ArgsInError>(),
            Some(&ArgsInError::AttemptsExhausted { attempts: 2 })
        );
        assert_eq!(input.calls.get(), 2);
    }

    #[test]
    fn test_zero_max_attempts_rejected_before_reading() {
        let (argsin, _) = argsin_with_sink();
        let input = ScriptedInput::new(&["never read"]);
        let options = DispatchOptions {
            max_attempts: Some(0),
            ..DispatchOptions::default()
        };

        let err = argsin.argsin_from(&input, "> ", &options).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ArgsInError>(),
            Some(ArgsInError::InvalidConfiguration(_))
        ));
        assert_eq!(input.calls.get(), 0);
    }

    #[test]
    fn test_add_action_is_not_recursive() {
        let (mut argsin, _) = argsin_with_sink();
        argsin.add_action(["name"], vec![Action::literal("n")]).unwrap();
        assert!(!argsin.registry().find("name").unwrap().recursive);
        assert!(matches!(
            argsin.add_action("name", vec![]),
            Err(ArgsInError::InvalidConfiguration(_))
        ));

        let input = ScriptedInput::new(&["x --name a", "unused"]);
        let result = argsin
            .argsin_from(&input, "> ", &DispatchOptions::default())
            .unwrap();
        assert_eq!(result.action_returns, vec![json!("n")]);
        assert_eq!(input.calls.get(), 1);
    }

    #[test]
    fn test_non_repeatable_source_with_recursion_rejected() {
        let (argsin, _) = argsin_with_sink();
        let mut input = ScriptedInput::new(&["hello"]);
        input.repeatable = false;

        let err = argsin
            .argsin_from(&input, "> ", &DispatchOptions::default())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ArgsInError>(),
            Some(ArgsInError::InvalidConfiguration(_))
        ));
        assert_eq!(input.calls.get(), 0);

        let result = argsin.argsin_from(&input, "> ", &no_retry()).unwrap();
        assert_eq!(result.text, "hello");
    }

    #[test]
    fn test_input_closed() {
        let (argsin, _) = argsin_with_sink();
        let err = argsin
            .argsin(">", &DispatchOptions::default())
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ArgsInError>(),
            Some(&ArgsInError::InputClosed)
        );
    }

    #[test]
    fn test_context_action_receives_extra_args() {
        let (mut argsin, sink) = argsin_with_sink();
        argsin
            .register(
                ["name"],
                vec![
                    Action::with_context(|ctx| {
                        Ok(json!({
                            "value": ctx.value,
                            "text": ctx.text,
                            "user": ctx.get("user"),
                            "first": ctx.positional.first().cloned(),
                        }))
                    })
                    .requires(["user"]),
                    Action::with_context(|_| Ok(json!("unreachable"))).requires(["missing"]),
                    Action::literal("after"),
                ],
                false,
            )
            .unwrap();

        let input = ScriptedInput::new(&["bdfl --name Guido"]);
        let options = DispatchOptions {
            extra: ActionArgs::default().arg(7).kwarg("user", "root"),
            ..DispatchOptions::default()
        };
        let result = argsin.argsin_from(&input, "> ", &options).unwrap();

        assert_eq!(
            result.action_returns,
            vec![
                json!({"value": "Guido", "text": "bdfl", "user": "root", "first": 7}),
                json!("after"),
            ]
        );
        let errors = sink.errors.borrow();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("missing: missing"), "{}", errors[0]);
    }

    #[test]
    fn test_callback_error_propagates() {
        let (mut argsin, _) = argsin_with_sink();
        argsin
            .register(
                ["fail"],
                vec![Action::with_value(|v| Err(anyhow::anyhow!("bad value {v}")))],
                false,
            )
            .unwrap();

        let input = ScriptedInput::new(&["--fail 3"]);
        let err = argsin
            .argsin_from(&input, "> ", &DispatchOptions::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "bad value 3");
    }

    #[test]
    fn test_with_action_map_validates() {
        let (argsin, _) = argsin_with_sink();
        let err = argsin
            .with_action_map(vec![(Identifiers::from("name"), Vec::new(), false)])
            .err()
            .unwrap();
        assert!(matches!(err, ArgsInError::InvalidConfiguration(_)));
    }
}
