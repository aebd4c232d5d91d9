//! emolog - 带表情标记的分级日志库
//!
//! 每条日志同时输出到控制台和按日期、级别拆分的日志文件中，
//! 并提供方法调用生命周期日志（START / END / DONE）以及一个持久化字典。
//!
//! ## 模块
//!
//! - **log**: 日志级别、记录、格式化器、输出器和 `Logger`
//! - **aop**: 方法调用日志织入（`#[instrumented]`、`traced!`、`trace_call`）
//! - **kv**: 带时间戳的持久化字典 `PersistedDict`
//! - **cfg**: 配置文件加载
//!
//! ## 示例
//!
//! ```no_run
//! use emolog::log::{Logger, LoggerConfig};
//!
//! let logger = Logger::new(LoggerConfig {
//!     name: "my_app".to_string(),
//!     ..Default::default()
//! })
//! .unwrap();
//! emolog::info!(logger, "hello {}", "world").unwrap();
//! ```

extern crate self as emolog;

pub mod aop;
pub mod cfg;
pub mod kv;
pub mod log;

pub use aop::{Aop, AopConfig, Instrumented};
pub use kv::{KvError, PersistedDict, PersistedDictConfig};
pub use log::{LogLevel, LogRecord, Logger, LoggerConfig};

pub use emolog_macros::instrumented;
