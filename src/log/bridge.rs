use crate::log::level::LogLevel;
use crate::log::log_record::LogRecord;
use crate::log::logger::Logger;
use anyhow::Result;
use std::sync::Arc;

/// 将 `log` crate 的日志转发到 Logger
///
/// 依赖库通过 `log::info!` 等宏输出的日志会和本库的日志写入同一组文件
pub struct LogBridge {
    logger: Arc<Logger>,
}

impl LogBridge {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }

    /// 注册为全局 `log` logger，每个进程只能成功一次
    pub fn install(logger: Arc<Logger>) -> Result<()> {
        ::log::set_boxed_logger(Box::new(Self::new(logger)))?;
        ::log::set_max_level(::log::LevelFilter::Trace);
        Ok(())
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }
}

/// `log` 级别到本库级别的映射
pub fn map_level(level: ::log::Level) -> LogLevel {
    match level {
        ::log::Level::Error => LogLevel::Error,
        ::log::Level::Warn => LogLevel::Warning,
        ::log::Level::Info => LogLevel::Info,
        ::log::Level::Debug => LogLevel::Debug,
        ::log::Level::Trace => LogLevel::Trace,
    }
}

impl ::log::Log for LogBridge {
    fn enabled(&self, metadata: &::log::Metadata) -> bool {
        self.logger.is_enabled_for(map_level(metadata.level()))
    }

    fn log(&self, record: &::log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut converted = LogRecord::new(map_level(record.level()), record.args().to_string())
            .with_extra("target", record.target());
        if let (Some(file), Some(line)) = (record.file(), record.line()) {
            converted = converted.with_location(file, line);
        }
        if let Some(module) = record.module_path() {
            converted = converted.with_function(module.rsplit("::").next().unwrap_or(module));
        }

        if let Err(e) = self.logger.log_record(converted) {
            eprintln!("emolog: failed to forward log record: {:#}", e);
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::formatter::FileLine;
    use ::log::Log;

    #[test]
    fn test_map_level() {
        assert_eq!(map_level(::log::Level::Warn), LogLevel::Warning);
        assert_eq!(map_level(::log::Level::Trace), LogLevel::Trace);
        assert_eq!(map_level(::log::Level::Error), LogLevel::Error);
    }

    #[test]
    fn test_log_bridge_forwards_records() -> Result<()> {
        let temp_dir = tempfile::TempDir::new()?;
        let logger = Arc::new(Logger::with_folder(
            temp_dir.path().display().to_string(),
            "bridge",
            LogLevel::Info,
        )?);
        let bridge = LogBridge::new(logger.clone());

        assert!(!bridge.enabled(
            &::log::Metadata::builder()
                .level(::log::Level::Debug)
                .build()
        ));

        bridge.log(
            &::log::Record::builder()
                .args(format_args!("connected to {}", "db"))
                .level(::log::Level::Warn)
                .target("pool")
                .file(Some("src/pool.rs"))
                .line(Some(7))
                .module_path(Some("app::pool"))
                .build(),
        );
        bridge.log(
            &::log::Record::builder()
                .args(format_args!("dropped"))
                .level(::log::Level::Debug)
                .build(),
        );

        assert_eq!(logger.last_message().as_deref(), Some("connected to db"));

        let date = chrono::Local::now().format("%Y-%m-%d").to_string();
        let contents =
            std::fs::read_to_string(logger.log_dir().join(date).join("WARNING.log"))?;
        let line = FileLine::parse(contents.trim_end())?;
        assert_eq!(line.level, LogLevel::Warning);
        assert_eq!(line.extra, "{'target': 'pool'}");

        Ok(())
    }
}
