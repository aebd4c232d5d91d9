//! 日志模块
//!
//! 带表情标记的分级日志，每条日志同时写入按级别分文件的日志目录和终端。
//!
//! # 特性
//!
//! - 十个日志级别：DEBUG, TRACE, INFO, WARNING, START, END, ERROR, CRITICAL, DONE, UNKNOWN
//! - 日志文件按 `<日志目录>/<名称>/<日期>/<级别>.log` 划分，START/END/DONE 共用 PROCESS.log
//! - 终端行带源文件、行号和函数名
//! - 同名 logger 共享终端输出
//! - 可桥接 `log` crate
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use emolog::log::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config: LoggerConfig = json5::from_str(r#"
//!         {
//!             log_folder: "~/.logs",
//!             name: "app",
//!             level: "info",
//!             console: { target: "stdout" },
//!         }
//!     "#)?;
//!
//!     let logger = Logger::new(config)?;
//!
//!     logger.info("Application started")?;
//!     logger.error_with("Connection to {} failed", ["db"])?;
//!
//!     Ok(())
//! }
//! ```

pub mod appender;
pub mod bridge;
pub mod caller;
pub mod formatter;
pub mod level;
pub mod log_record;
pub mod logger;
pub mod macros;
pub mod registry;

// 重新导出核心类型
pub use appender::{ConsoleAppender, ConsoleAppenderConfig, LevelFileAppender, LogAppender, Target};
pub use bridge::LogBridge;
pub use formatter::{ConsoleFormatter, ConsoleFormatterConfig, FileFormatter, FileLine, LogFormatter};
pub use level::LogLevel;
pub use log_record::{LogRecord, MetadataValue};
pub use logger::{Logger, LoggerConfig, MAX_STACK_DISTANCE, NO_APP_NAME};
pub use registry::register_levels;
