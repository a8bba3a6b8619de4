//! `argsin` 바이너리 진입점.

use argsin::interface::cli::{AppComposition, Cli, CliAction, run_repl};

fn main() {
    // 진단 로그는 stderr로 보내 stdout의 JSON 결과와 섞이지 않게 한다.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let action = match Cli::parse_action() {
        Ok(action) => action,
        Err(msg) => {
            eprintln!("error: {msg}");
            std::process::exit(2);
        }
    };

    match action {
        CliAction::InspectConfig { config } => {
            let composition = AppComposition::new(config);
            match composition.load_session_usecase().inspect() {
                Ok(json) => println!("{json}"),
                Err(err) => {
                    eprintln!("error: {err:#}");
                    std::process::exit(1);
                }
            }
        }
        CliAction::Run(options) => {
            let composition = AppComposition::new(options.config.clone());
            if let Err(err) = run_repl(&composition, options) {
                eprintln!("error: {err:#}");
                std::process::exit(1);
            }
        }
    }
}
