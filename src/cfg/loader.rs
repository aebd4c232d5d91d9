//! 配置文件加载
//!
//! 根据扩展名选择解析器，支持 JSON/JSON5/YAML/TOML

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// 展开路径开头的 `~`
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// 从文件加载配置
///
/// # 示例
/// ```no_run
/// use emolog::cfg::load_config;
/// use emolog::log::LoggerConfig;
///
/// let config: LoggerConfig = load_config("~/.config/emolog/config.yaml").unwrap();
/// ```
pub fn load_config<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = expand_path(&path.as_ref().to_string_lossy());
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
    parse_config(&content, &ext).with_context(|| format!("解析配置文件失败: {}", path.display()))
}

/// 根据扩展名解析配置内容
pub fn parse_config<T: DeserializeOwned>(content: &str, ext: &str) -> Result<T> {
    match ext {
        "json" => Ok(serde_json::from_str(content)?),
        "json5" => Ok(json5::from_str(content)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(content)?),
        "toml" => Ok(toml::from_str(content)?),
        _ => Err(anyhow!("不支持的文件格式: {}", ext)),
    }
}
