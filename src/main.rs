use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{parser::ValueSource, Arg, Command};
use jenxt::{Application, ShutdownManager};
use jenxt_config::AppConfig;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("jenxt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("脚本目录驱动的Jenkins多服务器执行网关")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("配置文件路径")
                .default_value("jenxt.json"),
        )
        .arg(
            Arg::new("scripts")
                .short('s')
                .long("scripts")
                .value_name("DIR")
                .help("脚本目录，覆盖配置文件中的 scripts.directory"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("日志级别")
                .value_parser(["trace", "debug", "info", "warn", "error"])
                .default_value("info"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_name("FORMAT")
                .help("日志格式")
                .value_parser(["json", "pretty"])
                .default_value("pretty"),
        )
        .get_matches();

    let config_path = matches
        .get_one::<String>("config")
        .context("缺少配置文件参数")?;
    let log_level = matches
        .get_one::<String>("log-level")
        .context("缺少日志级别参数")?;
    let log_format = matches
        .get_one::<String>("log-format")
        .context("缺少日志格式参数")?;

    init_logging(log_level, log_format)?;

    info!("启动Jenxt网关");
    info!("配置文件: {config_path}");

    // 未显式指定时按默认路径查找，找不到则使用默认配置
    let explicit_config = matches.value_source("config") == Some(ValueSource::CommandLine);
    let mut config = AppConfig::load(explicit_config.then_some(config_path.as_str()))
        .with_context(|| format!("加载配置文件失败: {config_path}"))?;

    if let Some(scripts) = matches.get_one::<String>("scripts") {
        config.scripts.directory = scripts.clone();
    }
    info!("脚本目录: {}", config.scripts.directory);

    let app = Arc::new(Application::new(config)?);

    let shutdown_manager = ShutdownManager::new();

    let mut app_handle = {
        let shutdown_rx = shutdown_manager.subscribe();
        let app = Arc::clone(&app);
        tokio::spawn(async move { app.run(shutdown_rx).await })
    };

    tokio::select! {
        _ = wait_for_shutdown_signal() => {
            info!("收到关闭信号，开始优雅关闭...");
        }
        result = &mut app_handle => {
            // 收到信号之前退出，通常是地址绑定失败
            return match result {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(e.context("网关运行失败")),
                Err(e) => Err(anyhow::anyhow!("网关任务异常退出: {e}")),
            };
        }
    }

    shutdown_manager.shutdown();

    match tokio::time::timeout(Duration::from_secs(30), app_handle).await {
        Ok(Ok(Ok(()))) => info!("网关已优雅关闭"),
        Ok(Ok(Err(e))) => error!("网关关闭时发生错误: {e:#}"),
        Ok(Err(e)) => error!("网关任务异常退出: {e}"),
        Err(_) => warn!("网关关闭超时，强制退出"),
    }

    info!("Jenxt网关已退出");
    Ok(())
}

fn init_logging(log_level: &str, log_format: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()
                .context("初始化JSON日志格式失败")?;
        }
        "pretty" => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()
                .context("初始化Pretty日志格式失败")?;
        }
        _ => {
            return Err(anyhow::anyhow!("不支持的日志格式: {log_format}"));
        }
    }

    Ok(())
}

async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("安装Ctrl+C信号处理器失败");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("安装SIGTERM信号处理器失败")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("收到Ctrl+C信号");
        },
        _ = terminate => {
            info!("收到SIGTERM信号");
        },
    }
}
