//! cfg 模块 - 配置加载
//!
//! 从 JSON/JSON5/YAML/TOML 文件加载 `LoggerConfig`、`AopConfig` 等配置结构，
//! 以及组件构造用的 `impl_from!` 宏

pub mod loader;
pub mod macros;

pub use loader::{expand_path, load_config, parse_config};
