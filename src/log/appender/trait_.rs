use crate::log::log_record::LogRecord;
use anyhow::Result;

/// 日志输出器 trait
///
/// 负责将格式化后的日志输出到目标介质。记录本身一并传入，
/// 输出器可据此决定写入位置（如按级别和日期分文件）
pub trait LogAppender: Send + Sync {
    /// 输出一行日志
    fn append(&self, record: &LogRecord, formatted: &str) -> Result<()>;

    /// 刷新缓冲区（默认实现为空操作）
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}
