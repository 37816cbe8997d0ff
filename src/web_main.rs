//! Web 服务器主程序入口

use std::sync::Arc;

use oversea::core::RunOptions;
use oversea::env::{core as core_env, EnvVar};
use oversea::extraction::HttpExtractor;
use oversea::translation::{LlmTranslator, TranslationConfig};
use oversea::web::{AppState, JobStore, WebConfig, WebServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let level = core_env::LogLevel::get_or("info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(level))
        .init();

    // 解析命令行参数
    let args: Vec<String> = std::env::args().collect();

    let mut web_config = WebConfig::from_env();

    // 简单的命令行参数解析
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" | "-b" => {
                if i + 1 < args.len() {
                    web_config.bind_addr = args[i + 1].clone();
                    i += 2;
                } else {
                    eprintln!("Error: --bind requires an address");
                    std::process::exit(1);
                }
            }
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    web_config.port = args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("Error: Invalid port number");
                        std::process::exit(1);
                    });
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a port number");
                    std::process::exit(1);
                }
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Error: Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    let translation_config = TranslationConfig::load()?;
    let translator = LlmTranslator::new(translation_config.clone())?;

    let state = AppState {
        extractor: Arc::new(HttpExtractor::from_env()),
        translator: Arc::new(translator),
        translation_config,
        run_options: RunOptions {
            silent: true, // Web 模式下协调器不往日志打进度
            ..Default::default()
        },
        jobs: JobStore::new(),
    };

    let server = WebServer::new(web_config, state);
    server.start().await?;

    Ok(())
}

fn print_help() {
    println!("Oversea Web Server");
    println!();
    println!("USAGE:");
    println!("    oversea-web [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -b, --bind <ADDRESS>     Bind address [default: 127.0.0.1]");
    println!("    -p, --port <PORT>        Port number [default: 8000]");
    println!("    -h, --help               Print help information");
    println!();
    println!("EXAMPLES:");
    println!("    oversea-web");
    println!("    oversea-web --bind 0.0.0.0 --port 8000");
}
