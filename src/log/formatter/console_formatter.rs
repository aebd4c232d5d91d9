use crate::log::formatter::LogFormatter;
use crate::log::level::LogLevel;
use crate::log::log_record::LogRecord;
use anyhow::Result;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::fmt::Write;

/// 源文件名列宽
const FILE_COLUMN_WIDTH: usize = 25;

/// ConsoleFormatter 配置
#[derive(Debug, Clone, Deserialize, Serialize, SmartDefault, PartialEq)]
#[serde(default)]
pub struct ConsoleFormatterConfig {
    /// 是否启用颜色输出（仅作用于级别列）
    #[default = false]
    pub colored: bool,
}

/// 终端行格式化器
///
/// 格式：`<标记> <级别:>8> | <日期 时间,毫秒> | <logger> | <文件:>25>:<行:>5> | <函数>() - <消息>`
pub struct ConsoleFormatter {
    config: ConsoleFormatterConfig,
}

impl ConsoleFormatter {
    pub fn new(config: ConsoleFormatterConfig) -> Self {
        Self { config }
    }
}

impl LogFormatter for ConsoleFormatter {
    fn format(&self, record: &LogRecord) -> Result<String> {
        let message = record.rendered_message();
        let mut result = String::with_capacity(96 + record.logger.len() + message.len());

        result.push_str(record.level.marker());
        result.push(' ');
        if self.config.colored {
            write!(result, "{}", colored_level(record.level))?;
        } else {
            write!(result, "{:>8}", record.level)?;
        }
        write!(
            result,
            " | {} | {} | {:>width$}:{:>5} | {}() - {}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S,%3f"),
            record.logger,
            shorten_file_name(record.file_name()),
            record.line.unwrap_or(0),
            record.function.as_deref().unwrap_or("<module>"),
            message,
            width = FILE_COLUMN_WIDTH,
        )?;

        Ok(result)
    }
}

/// 超过列宽的文件名保留末尾 23 个字符并以 `..` 开头
pub fn shorten_file_name(name: &str) -> String {
    let count = name.chars().count();
    if count <= FILE_COLUMN_WIDTH {
        return name.to_string();
    }
    let tail: String = name.chars().skip(count - (FILE_COLUMN_WIDTH - 2)).collect();
    format!("..{}", tail)
}

fn colored_level(level: LogLevel) -> String {
    let padded = format!("{:>8}", level);
    match level {
        LogLevel::Debug => padded.cyan().to_string(),
        LogLevel::Trace => padded.white().dimmed().to_string(),
        LogLevel::Info => padded.green().to_string(),
        LogLevel::Warning => padded.yellow().to_string(),
        LogLevel::Start | LogLevel::End => padded.blue().to_string(),
        LogLevel::Error => padded.red().to_string(),
        LogLevel::Critical => padded.red().bold().to_string(),
        LogLevel::Done => padded.green().bold().to_string(),
        LogLevel::Unknown => padded.magenta().to_string(),
    }
}

crate::impl_from!(ConsoleFormatterConfig => ConsoleFormatter);
