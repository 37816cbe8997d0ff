//! CLI 主程序入口
//!
//! 对单个商品 URL 执行抽取管道，结果以 JSON 输出到 stdout，
//! 可选翻译和文件落盘。

use std::path::PathBuf;
use std::process;

use clap::Parser;

use oversea::core::{run_product_pipeline, RunOptions};
use oversea::env::{core as core_env, EnvVar};
use oversea::extraction::HttpExtractor;
use oversea::translation::{LlmTranslator, TranslationConfig};

#[derive(Parser)]
#[command(
    name = "oversea",
    version,
    about = "Extract (and optionally translate) product data from Chinese e-commerce sites"
)]
struct Cli {
    /// 商品页 URL
    #[arg(long)]
    url: String,

    /// 管道名称
    #[arg(long, default_value = "alibaba_1688")]
    pipeline: String,

    /// 把中文字段翻译为英文
    #[arg(long)]
    translate: bool,

    /// 返回 HTML 前的等待秒数，越小越快但越不稳定
    #[arg(long, default_value_t = 2)]
    wait_for: u64,

    /// 结果另存到文件（仍会打印到 stdout）
    #[arg(long)]
    dump_to: Option<PathBuf>,

    /// 每批最多提交的叶子数量（覆盖配置）
    #[arg(long)]
    batch_size: Option<usize>,

    /// 重试轮次上限（覆盖配置）
    #[arg(long)]
    max_passes: Option<usize>,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let mut config = match TranslationConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: 配置加载失败: {e}");
            process::exit(1);
        }
    };
    if let Some(batch_size) = cli.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(max_passes) = cli.max_passes {
        config.max_passes = max_passes;
    }

    let translator = match LlmTranslator::new(config.clone()) {
        Ok(translator) => translator,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    let extractor = HttpExtractor::from_env();

    let options = RunOptions {
        pipeline: cli.pipeline,
        translate: cli.translate,
        wait_for: cli.wait_for,
        silent: false,
    };

    let document =
        match run_product_pipeline(&extractor, &translator, &config, &options, &cli.url).await {
            Ok(document) => document,
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        };

    let formatted = match serde_json::to_string_pretty(&document) {
        Ok(formatted) => formatted,
        Err(e) => {
            eprintln!("Error: 序列化结果失败: {e}");
            process::exit(1);
        }
    };

    println!("{formatted}");

    if let Some(path) = &cli.dump_to {
        if let Err(e) = std::fs::write(path, &formatted) {
            eprintln!("Error: 写入 {} 失败: {e}", path.display());
            process::exit(1);
        }
        tracing::info!("结果已保存到 {}", path.display());
    }
}

fn init_tracing() {
    let level = core_env::LogLevel::get_or("info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(level))
        .init();
}
