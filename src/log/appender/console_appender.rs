use crate::log::appender::LogAppender;
use crate::log::log_record::LogRecord;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

/// 输出目标
#[derive(Debug, Clone, Copy, Deserialize, Serialize, SmartDefault, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    Stdout,
    Stderr,
}

/// ConsoleAppender 配置
#[derive(Debug, Clone, Deserialize, Serialize, SmartDefault, PartialEq)]
#[serde(default)]
pub struct ConsoleAppenderConfig {
    /// 输出目标
    pub target: Target,
}

/// 终端输出器
///
/// 同名 logger 共享同一个实例（见 `registry::attach_console`）
pub struct ConsoleAppender {
    config: ConsoleAppenderConfig,
    lines_written: AtomicU64,
}

impl ConsoleAppender {
    pub fn new(config: ConsoleAppenderConfig) -> Self {
        Self {
            config,
            lines_written: AtomicU64::new(0),
        }
    }

    pub fn target(&self) -> Target {
        self.config.target
    }

    /// 已输出的行数
    pub fn lines_written(&self) -> u64 {
        self.lines_written.load(Ordering::Relaxed)
    }
}

impl LogAppender for ConsoleAppender {
    fn append(&self, _record: &LogRecord, formatted: &str) -> Result<()> {
        match self.config.target {
            Target::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{}", formatted)?;
                stdout.flush()?;
            }
            Target::Stderr => {
                let mut stderr = io::stderr().lock();
                writeln!(stderr, "{}", formatted)?;
                stderr.flush()?;
            }
        }
        self.lines_written.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        match self.config.target {
            Target::Stdout => io::stdout().flush()?,
            Target::Stderr => io::stderr().flush()?,
        }
        Ok(())
    }
}

crate::impl_from!(ConsoleAppenderConfig => ConsoleAppender);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::level::LogLevel;

    #[test]
    fn test_console_appender_append() {
        let appender = ConsoleAppender::new(ConsoleAppenderConfig::default());
        let record = LogRecord::new(LogLevel::Info, "Test message");

        appender.append(&record, "Test message").unwrap();
        appender.append(&record, "Another message").unwrap();
        assert_eq!(appender.lines_written(), 2);
    }

    #[test]
    fn test_console_appender_stderr() {
        let appender = ConsoleAppender::new(ConsoleAppenderConfig {
            target: Target::Stderr,
        });
        let record = LogRecord::new(LogLevel::Error, "to stderr");

        assert!(appender.append(&record, "to stderr").is_ok());
        assert!(appender.flush().is_ok());
        assert_eq!(appender.target(), Target::Stderr);
    }

    #[test]
    fn test_console_appender_config_deserialize() {
        let config: ConsoleAppenderConfig = json5::from_str(r#"{ target: "stderr" }"#).unwrap();
        assert_eq!(config.target, Target::Stderr);

        let config: ConsoleAppenderConfig = json5::from_str("{}").unwrap();
        assert_eq!(config.target, Target::Stdout);
    }

    #[test]
    fn test_console_appender_from_config() {
        let appender = ConsoleAppender::from(ConsoleAppenderConfig::default());
        assert_eq!(appender.config.target, Target::Stdout);
    }
}
