use crate::log::formatter::LogFormatter;
use crate::log::level::LogLevel;
use crate::log::log_record::LogRecord;
use anyhow::{anyhow, Context, Result};
use std::str::FromStr;

/// 字段分隔符
const SEPARATOR: &str = " | ";

/// 日志文件行格式化器
///
/// 格式：`<标记> <时:分:秒> | <级别> | <消息> | <参数元组> | <异常> | <extra> | <调用栈标志> | <调用栈层级>`
///
/// 消息保持未插值的原文，参数单独成列
#[derive(Debug, Default, Clone, Copy)]
pub struct FileFormatter;

impl FileFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl LogFormatter for FileFormatter {
    fn format(&self, record: &LogRecord) -> Result<String> {
        Ok(format!(
            "{} {} | {} | {} | {} | {} | {} | {} | {}",
            record.level.marker(),
            record.timestamp.format("%H:%M:%S"),
            record.level.name(),
            record.message,
            record.args_repr(),
            record.exc_info_repr(),
            record.extra_repr(),
            record.stack_info_repr(),
            record.stack_level,
        ))
    }
}

/// 从日志文件读回的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLine {
    pub marker: String,
    pub time: String,
    pub level: LogLevel,
    pub message: String,
    pub args: String,
    pub exc_info: String,
    pub extra: String,
    pub stack_info: bool,
    pub stack_level: u32,
}

impl FileLine {
    /// 解析一行日志
    ///
    /// 消息中允许出现分隔符：级别之后的尾部字段从右侧切分
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim_end_matches(['\r', '\n']);

        let (marker, rest) = line
            .split_once(' ')
            .ok_or_else(|| anyhow!("missing marker in log line: {}", line))?;
        let (time, rest) = rest
            .split_once(SEPARATOR)
            .ok_or_else(|| anyhow!("missing time in log line: {}", line))?;
        let (level, rest) = rest
            .split_once(SEPARATOR)
            .ok_or_else(|| anyhow!("missing level in log line: {}", line))?;

        let mut tail: Vec<&str> = rest.rsplitn(6, SEPARATOR).collect();
        if tail.len() != 6 {
            return Err(anyhow!(
                "expected 8 fields after the marker, found {}: {}",
                tail.len() + 2,
                line
            ));
        }
        tail.reverse();

        let stack_info = match tail[4] {
            "True" => true,
            "False" => false,
            other => return Err(anyhow!("invalid stack info flag: {}", other)),
        };
        let stack_level = tail[5]
            .trim()
            .parse::<u32>()
            .with_context(|| format!("invalid stack level: {}", tail[5]))?;

        Ok(Self {
            marker: marker.to_string(),
            time: time.to_string(),
            level: LogLevel::from_str(level).map_err(|e| anyhow!(e))?,
            message: tail[0].to_string(),
            args: tail[1].to_string(),
            exc_info: tail[2].to_string(),
            extra: tail[3].to_string(),
            stack_info,
            stack_level,
        })
    }
}

impl FromStr for FileLine {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        FileLine::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn record_at(level: LogLevel, message: &str) -> LogRecord {
        let mut record = LogRecord::new(level, message);
        record.timestamp = Local
            .with_ymd_and_hms(2024, 3, 9, 13, 5, 59)
            .single()
            .unwrap();
        record
    }

    #[test]
    fn test_file_formatter_defaults() {
        let formatted = FileFormatter::new()
            .format(&record_at(LogLevel::Info, "ready"))
            .unwrap();
        assert_eq!(formatted, "💁 13:05:59 | INFO | ready | () | None | None | False | 1");
    }

    #[test]
    fn test_file_formatter_keeps_raw_message_and_args() {
        let record = record_at(LogLevel::Start, "Starting '{}'")
            .with_arg("compute")
            .with_exc_info("ValueError: bad")
            .with_extra("k", "v")
            .with_stack_info(true)
            .with_stack_level(3);

        let formatted = FileFormatter::new().format(&record).unwrap();
        assert_eq!(
            formatted,
            "🚀 13:05:59 | START | Starting '{}' | ('compute',) | ValueError: bad | {'k': 'v'} | True | 3"
        );
    }

    #[test]
    fn test_file_line_parse() {
        let line = FileLine::parse(
            "❌ 10:11:12 | ERROR | disk full | ('/var', 3) | None | {'retry': True} | False | 4\n",
        )
        .unwrap();

        assert_eq!(line.marker, "❌");
        assert_eq!(line.time, "10:11:12");
        assert_eq!(line.level, LogLevel::Error);
        assert_eq!(line.message, "disk full");
        assert_eq!(line.args, "('/var', 3)");
        assert_eq!(line.exc_info, "None");
        assert_eq!(line.extra, "{'retry': True}");
        assert!(!line.stack_info);
        assert_eq!(line.stack_level, 4);
    }

    #[test]
    fn test_file_line_parse_message_with_separator() {
        let line: FileLine = "💁 10:11:12 | INFO | a | b | c | () | None | None | False | 1"
            .parse()
            .unwrap();
        assert_eq!(line.message, "a | b | c");
        assert_eq!(line.args, "()");
    }

    #[test]
    fn test_file_line_parse_invalid() {
        assert!(FileLine::parse("").is_err());
        assert!(FileLine::parse("💁 10:11:12 | INFO | short").is_err());
        assert!(FileLine::parse("💁 10:11:12 | NOPE | m | () | None | None | False | 1").is_err());
        assert!(FileLine::parse("💁 10:11:12 | INFO | m | () | None | None | maybe | 1").is_err());
    }

    #[test]
    fn test_file_formatter_parse_preserves_fields() {
        let record = record_at(LogLevel::Done, "Execution time for '{}': {} seconds")
            .with_arg("run")
            .with_arg(0.25)
            .with_stack_level(5);

        let formatted = FileFormatter::new().format(&record).unwrap();
        let line = FileLine::parse(&formatted).unwrap();

        assert_eq!(line.marker, LogLevel::Done.marker());
        assert_eq!(line.level, LogLevel::Done);
        assert_eq!(line.message, record.message);
        assert_eq!(line.args, "('run', 0.25)");
        assert_eq!(line.stack_level, 5);
    }
}
