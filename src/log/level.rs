use crate::log::registry;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// 日志级别
///
/// 数值越大越严重，Logger 按数值做阈值过滤。
/// START / END / DONE 是方法调用生命周期级别，共用 PROCESS 日志文件。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// 调试信息
    Debug = 10,
    /// 比 DEBUG 稍高的追踪信息
    Trace = 15,
    /// 一般信息
    Info = 20,
    /// 警告信息
    Warning = 30,
    /// 方法开始
    Start = 33,
    /// 方法结束
    End = 36,
    /// 错误信息
    Error = 40,
    /// 严重错误
    Critical = 50,
    /// 方法完成（附带耗时）
    Done = 60,
    /// 未知级别
    Unknown = 70,
}

impl LogLevel {
    /// 所有已注册的级别，按 rank 升序排列
    pub const ALL: [LogLevel; 10] = [
        LogLevel::Debug,
        LogLevel::Trace,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Start,
        LogLevel::End,
        LogLevel::Error,
        LogLevel::Critical,
        LogLevel::Done,
        LogLevel::Unknown,
    ];

    /// 级别的整数值
    pub fn rank(self) -> i32 {
        self as i32
    }

    /// 根据整数值查找级别，未注册的值一律视为 UNKNOWN
    pub fn from_rank(rank: i32) -> LogLevel {
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.rank() == rank)
            .unwrap_or(LogLevel::Unknown)
    }

    /// 级别名称（大写）
    pub fn name(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Start => "START",
            LogLevel::End => "END",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
            LogLevel::Done => "DONE",
            LogLevel::Unknown => "UNKNOWN",
        }
    }

    /// 级别对应的装饰符号
    pub fn marker(self) -> &'static str {
        match self {
            LogLevel::Debug => "🐞",
            LogLevel::Trace => "🔍",
            LogLevel::Info => "💁",
            LogLevel::Warning => "⚠️",
            LogLevel::Start => "🚀",
            LogLevel::End => "🎉",
            LogLevel::Error => "❌",
            LogLevel::Critical => "🚨",
            LogLevel::Done => "✅",
            LogLevel::Unknown => "❓",
        }
    }

    /// 日志文件名（不含扩展名）
    ///
    /// 生命周期级别集中写入 PROCESS，其余级别各自一个文件
    pub fn file_name(self) -> &'static str {
        match self {
            LogLevel::Start | LogLevel::End | LogLevel::Done => "PROCESS",
            other => other.name(),
        }
    }

    /// 是否为方法调用生命周期级别
    pub fn is_lifecycle(self) -> bool {
        matches!(self, LogLevel::Start | LogLevel::End | LogLevel::Done)
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(rank) = trimmed.parse::<i32>() {
            return Ok(LogLevel::from_rank(rank));
        }
        let name = if trimmed.eq_ignore_ascii_case("warn") {
            LogLevel::Warning.name()
        } else {
            trimmed
        };
        registry::rank_of(name)
            .map(LogLevel::from_rank)
            .ok_or_else(|| format!("invalid log level: {}", s))
    }
}

/// 反序列化时接受大小写不敏感的名称或整数 rank
impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Rank(i32),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Rank(rank) => Ok(LogLevel::from_rank(rank)),
            Raw::Name(name) => LogLevel::from_str(&name).map_err(serde::de::Error::custom),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 使用 pad 以支持 {:>8} 等对齐格式
        f.pad(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_str() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("WARN").unwrap(), LogLevel::Warning);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warning);
        assert_eq!(LogLevel::from_str("done").unwrap(), LogLevel::Done);
        assert_eq!(LogLevel::from_str("40").unwrap(), LogLevel::Error);
    }

    #[test]
    fn test_log_level_from_str_matches_registry() {
        for level in LogLevel::ALL {
            let name = registry::level_name(level.rank());
            assert_eq!(LogLevel::from_str(name).unwrap(), level);
            assert_eq!(LogLevel::from_str(&name.to_lowercase()).unwrap(), level);
        }
        assert!(LogLevel::from_str("PROCESS").is_err());
    }

    #[test]
    fn test_log_level_from_str_invalid() {
        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Trace.to_string(), "TRACE");
        assert_eq!(LogLevel::Warning.to_string(), "WARNING");
        assert_eq!(LogLevel::Done.to_string(), "DONE");
        assert_eq!(format!("{:>8}", LogLevel::Info), "    INFO");
    }

    #[test]
    fn test_log_level_ordering() {
        // DEBUG < TRACE < INFO < WARNING < START < END < ERROR < CRITICAL < DONE < UNKNOWN
        for pair in LogLevel::ALL.windows(2) {
            assert!(pair[0] < pair[1], "{} should be below {}", pair[0], pair[1]);
            assert!(pair[0].rank() < pair[1].rank());
        }
    }

    #[test]
    fn test_log_level_from_rank_falls_back_to_unknown() {
        assert_eq!(LogLevel::from_rank(10), LogLevel::Debug);
        assert_eq!(LogLevel::from_rank(60), LogLevel::Done);
        assert_eq!(LogLevel::from_rank(-3), LogLevel::Unknown);
        assert_eq!(LogLevel::from_rank(21), LogLevel::Unknown);
        assert_eq!(LogLevel::from_str("999").unwrap(), LogLevel::Unknown);
    }

    #[test]
    fn test_log_level_file_name() {
        assert_eq!(LogLevel::Start.file_name(), "PROCESS");
        assert_eq!(LogLevel::End.file_name(), "PROCESS");
        assert_eq!(LogLevel::Done.file_name(), "PROCESS");
        assert_eq!(LogLevel::Info.file_name(), "INFO");
        assert_eq!(LogLevel::Unknown.file_name(), "UNKNOWN");
    }

    #[test]
    fn test_log_level_serde() {
        let level: LogLevel = serde_json::from_str(r#""warn""#).unwrap();
        assert_eq!(level, LogLevel::Warning);
        let level: LogLevel = serde_json::from_str("36").unwrap();
        assert_eq!(level, LogLevel::End);
        assert!(serde_json::from_str::<LogLevel>(r#""loud""#).is_err());
        assert_eq!(serde_json::to_string(&LogLevel::Critical).unwrap(), r#""CRITICAL""#);
    }

    #[test]
    fn test_log_level_markers_are_distinct() {
        let mut markers: Vec<_> = LogLevel::ALL.iter().map(|l| l.marker()).collect();
        markers.sort();
        markers.dedup();
        assert_eq!(markers.len(), LogLevel::ALL.len());
    }
}
