//! strand_model - 模型加载命令行工具
//!
//! 加载场景配置或命令行中列出的 OBJ / IND_HAIR 文件，
//! 应用局部变换后输出每个模型的摘要。
//!
//! # 使用方法
//!
//! ```bash
//! # 使用 scene.toml 中的模型列表
//! cargo run
//!
//! # 直接加载文件（忽略 scene.toml）
//! cargo run -- assets/head.obj assets/hair.ind --strict
//!
//! # 指定配置文件和日志级别
//! cargo run -- --config tools.toml --scene demo.toml --log-level debug
//! ```
//!
//! # 命令行参数
//!
//! - `--config <path>`: 工具配置文件（默认 config.toml）
//! - `--scene <path>`: 场景配置文件（默认 scene.toml）
//! - `--strict`: 二进制文件末尾有多余字节时报错
//! - `--log-level <level>`: 日志级别
//! - `--log-file <path>`: 同时输出到日志文件

use anyhow::{bail, Context, Result};
use tracing::{error, info, warn};

use strand_model::core::{log, Config, SceneConfig};
use strand_model::geometry::Model;

const DEFAULT_CONFIG: &str = "config.toml";
const DEFAULT_SCENE: &str = "scene.toml";

/// 需要跟一个值的参数
const VALUE_FLAGS: &[&str] = &["--config", "--scene", "--log-level", "--log-file"];

/// 命令行参数
#[derive(Debug, Default)]
struct CliArgs {
    config: Option<String>,
    scene: Option<String>,
    paths: Vec<String>,
}

impl CliArgs {
    fn parse(args: &[String]) -> Result<Self> {
        let mut cli = CliArgs::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            if VALUE_FLAGS.contains(&arg.as_str()) {
                let value = iter
                    .next()
                    .with_context(|| format!("missing value for {}", arg))?;
                match arg.as_str() {
                    "--config" => cli.config = Some(value.clone()),
                    "--scene" => cli.scene = Some(value.clone()),
                    // 日志参数由 Config::apply_args 处理
                    _ => {}
                }
            } else if arg.starts_with("--") {
                if arg != "--strict" {
                    bail!("unknown argument: {}", arg);
                }
            } else {
                cli.paths.push(arg.clone());
            }
        }

        Ok(cli)
    }
}

fn log_summary(model: &Model) {
    let bounds = model.bounds();
    info!(
        name = model.name().unwrap_or("unnamed"),
        model_type = ?model.model_type(),
        attributes = ?model.attrib_code(),
        verts = model.num_verts(),
        indices = model.indices().len(),
        parts = model.num_parts(),
        "Model loaded"
    );
    info!(min = ?bounds.min.as_slice(), max = ?bounds.max.as_slice(), "Model bounds");

    for (i, part) in model.parts().iter().enumerate() {
        tracing::debug!(
            part = i,
            vstart = part.vstart,
            vcount = part.vcount,
            istart = part.istart,
            icount = part.icount,
            material = %part.material.name,
            "Part"
        );
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = CliArgs::parse(&args)?;

    // 1. 加载配置（在初始化日志之前）
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path).with_context(|| format!("failed to load config '{}'", path))?,
        None => Config::from_file_or_default(DEFAULT_CONFIG),
    };

    // 2. 应用命令行参数并验证
    config.apply_args(&args);
    config.validate().context("invalid configuration")?;

    // 3. 初始化日志系统
    let log_file = config
        .logging
        .file_output
        .then_some(config.logging.log_file.as_str());
    log::init_logger(config.logging.level, config.logging.file_output, log_file)
        .context("failed to initialize logging")?;
    info!(version = env!("CARGO_PKG_VERSION"), strict = config.loader.strict, "strand_model starting");

    // 4. 命令行给出文件时直接加载，否则读取场景配置
    let scene = if cli.paths.is_empty() {
        let path = cli.scene.as_deref().unwrap_or(DEFAULT_SCENE);
        SceneConfig::from_file_or_default(path)
    } else {
        SceneConfig::from_paths(cli.paths)
    };

    if scene.models.is_empty() {
        warn!("No models to load");
        return Ok(());
    }

    // 5. 逐个加载
    let mut failures = 0usize;
    for entry in &scene.models {
        match entry.load(config.loader.strict) {
            Ok(model) => log_summary(&model),
            Err(e) => {
                error!(path = %entry.path, "Failed to load model: {}", e);
                failures += 1;
            }
        }
    }

    info!(loaded = scene.models.len() - failures, failed = failures, "Done");

    if failures > 0 {
        bail!("{} of {} models failed to load", failures, scene.models.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_paths_and_flags() {
        let cli = CliArgs::parse(&args(&[
            "--scene", "demo.toml", "head.obj", "--strict", "--log-level", "debug", "hair.ind",
        ]))
        .unwrap();

        assert_eq!(cli.scene.as_deref(), Some("demo.toml"));
        assert!(cli.config.is_none());
        assert_eq!(cli.paths, vec!["head.obj", "hair.ind"]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(CliArgs::parse(&args(&["--config"])).is_err());
        assert!(CliArgs::parse(&args(&["--fast"])).is_err());
    }
}
