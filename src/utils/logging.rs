//! 日志工具模块
//!
//! 日志同时输出到终端和日志文件（追加写入）

use crate::config::Config;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// 一次运行的日志上下文
///
/// 持有期间日志写入文件，drop 时关闭日志文件。
pub struct LogSession {
    path: PathBuf,
    _guard: DefaultGuard,
}

impl LogSession {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// 初始化日志
///
/// # 参数
/// - `config`: 读取 `log_file` 和 `verbose_logging`
pub fn init(config: &Config) -> Result<LogSession> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("无法打开日志文件: {}", config.log_file.display()))?;

    write_run_header(&mut file)?;

    let default_level = if config.verbose_logging { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        );

    let guard = tracing::subscriber::set_default(subscriber);

    Ok(LogSession {
        path: config.log_file.clone(),
        _guard: guard,
    })
}

/// 配置加载失败时记录错误
///
/// 此时还没有完整配置，日志写入 `fallback` 指定的日志文件，返回该文件路径。
pub fn log_config_error(fallback: &Config, error: &dyn std::fmt::Display) -> Result<PathBuf> {
    let session = init(fallback)?;
    tracing::error!("❌ 配置加载失败: {}", error);
    Ok(session.path().to_path_buf())
}

fn write_run_header(file: &mut impl Write) -> Result<()> {
    let header = format!(
        "\n{}\n标签图片拉取日志 - {}\n{}\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    file.write_all(header.as_bytes())?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 订单标签图片拉取");
    info!("📁 输出目录: {}", config.output_dir.display());
    info!("📊 最大并发请求数: {}", config.max_concurrent_requests);
    info!("{}", "=".repeat(60));
}

/// 记录检索键生成结果
///
/// # 参数
/// - `orders`: 拉取到的订单数
/// - `keys`: 生成的检索键数量
pub fn log_keys_derived(orders: usize, keys: usize) {
    info!("✓ {} 个订单生成了 {} 个检索键", orders, keys);
}

/// 打印最终统计信息
///
/// # 参数
/// - `keys`: 检索键总数
/// - `written`: 成功写入的文件数
/// - `missing`: 未找到图片的键数
/// - `failed`: 下载失败数
pub fn print_final_stats(keys: usize, written: usize, missing: usize, failed: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 已保存: {}/{}", written, keys);
    info!("🔍 未找到: {}", missing);
    info!("❌ 下载失败: {}", failed);
    info!("{}", "=".repeat(60));
}
