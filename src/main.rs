//! # Santify — 命令行入口
//!
//! 本文件仅负责参数解析、日志初始化与单次会话的驱动。
//! 业务逻辑分布在 `face_swap` 子模块中，详见 `lib.rs` 架构文档。

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use santify::error::AppError;
use santify::face_swap::classify::classify;
use santify::face_swap::{
    HostedFaceSwap, ImageCatalog, SessionStatus, SwapSession, TransformResult,
};
use santify::settings;

const LOADING_EMOJIS: [&str; 5] = ["🎄", "🎅", "❄️", "⛄", "🎁"];

#[derive(Parser)]
#[command(
    name = "santify",
    about = "Santify — transform yourself into a festive character!"
)]
struct Cli {
    /// JSON settings file (endpoints, restore model, target list)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available target characters
    Targets,
    /// Swap your face onto a target character
    Swap {
        /// Photo of you (PNG, JPG)
        #[arg(short, long)]
        photo: PathBuf,
        /// Target character number, as shown by `santify targets`
        #[arg(short, long)]
        target: usize,
        /// Where to write the result (default: santify-<timestamp>.<ext>)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Print the final session state as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("❌ {}", failure_message(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let (config, catalog) = settings::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Targets => {
            for target in catalog.candidates() {
                println!("{:>2}. {}  {}", target.index + 1, target.label, target.url);
            }
            Ok(())
        }
        Commands::Swap {
            photo,
            target,
            out,
            json,
        } => {
            let provider = HostedFaceSwap::from_config(&config)?;
            let mut session = SwapSession::new(provider, catalog, &config);

            session.select_image(&photo).await;
            if let Some(message) = session.error() {
                return Err(AppError::Flow(message.to_string()));
            }

            let index = target.checked_sub(1).ok_or_else(|| {
                AppError::Flow("Target numbers start at 1".to_string())
            })?;
            let chosen = session.select_target(index)?;
            println!("Swapping onto {} ...", chosen.label);

            if session.can_submit() {
                println!("{}", LOADING_EMOJIS.join(" "));
            }
            session.submit().await?;

            if json {
                let snapshot = serde_json::to_string_pretty(&session.snapshot())
                    .map_err(|e| AppError::Flow(e.to_string()))?;
                println!("{}", snapshot);
            }

            match (session.status(), session.result()) {
                (SessionStatus::ResultReady, Some(result)) => {
                    let path = out.unwrap_or_else(|| default_output_path(result));
                    write_result(&path, result).await?;
                    Ok(())
                }
                _ => Err(AppError::Flow(
                    session.error().unwrap_or_default().to_string(),
                )),
            }
        }
    }
}

/// 所有失败统一经错误归类后再展示，空文案回退到通用提示。
fn failure_message(err: &AppError) -> String {
    classify(err)
}

async fn write_result(path: &Path, result: &TransformResult) -> Result<(), AppError> {
    tokio::fs::write(path, result.bytes()).await?;

    match result.dimensions() {
        Some((width, height)) => println!(
            "🎁 Your festive transformation ({}x{}) is ready: {}",
            width,
            height,
            path.display()
        ),
        None => println!("🎁 Your festive transformation is ready: {}", path.display()),
    }
    Ok(())
}

fn default_output_path(result: &TransformResult) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    PathBuf::from(format!("santify-{}.{}", stamp, result.extension()))
}
