use crate::log::appender::LogAppender;
use crate::log::log_record::LogRecord;
use crate::log::registry;
use anyhow::{anyhow, Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// 按级别分文件的输出器
///
/// 路径：`<日志目录>/<logger 名称>/<YYYY-MM-DD>/<级别文件>.log`，
/// 每次输出都以追加模式打开文件、写入一行、关闭
#[derive(Debug, Clone)]
pub struct LevelFileAppender {
    base_dir: PathBuf,
}

impl LevelFileAppender {
    pub fn new(log_folder: impl AsRef<Path>, name: &str) -> Self {
        Self {
            base_dir: log_folder.as_ref().join(name),
        }
    }

    /// `<日志目录>/<logger 名称>`
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// 记录对应的日志文件路径，日期取自记录的本地时间戳
    pub fn path_for(&self, record: &LogRecord) -> PathBuf {
        self.base_dir
            .join(record.timestamp.format("%Y-%m-%d").to_string())
            .join(format!("{}.log", record.level.file_name()))
    }
}

impl LogAppender for LevelFileAppender {
    fn append(&self, record: &LogRecord, formatted: &str) -> Result<()> {
        let path = self.path_for(record);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create log directory {}", parent.display()))?;
        }

        let lock = registry::file_lock(&self.base_dir, record.level.file_name());
        let _guard = lock
            .lock()
            .map_err(|_| anyhow!("log file lock poisoned: {}", path.display()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        writeln!(file, "{}", formatted)
            .with_context(|| format!("failed to write log file {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::level::LogLevel;
    use std::sync::Arc;

    #[test]
    fn test_level_file_appender_routes_by_level() -> Result<()> {
        let temp_dir = tempfile::TempDir::new()?;
        let appender = LevelFileAppender::new(temp_dir.path(), "app");

        let start = LogRecord::new(LogLevel::Start, "s");
        let warning = LogRecord::new(LogLevel::Warning, "w");
        let date = start.timestamp.format("%Y-%m-%d").to_string();

        assert_eq!(
            appender.path_for(&start),
            temp_dir.path().join("app").join(&date).join("PROCESS.log")
        );
        assert_eq!(
            appender.path_for(&warning).file_name().unwrap(),
            "WARNING.log"
        );

        appender.append(&start, "first")?;
        appender.append(&start, "second")?;

        let contents = std::fs::read_to_string(appender.path_for(&start))?;
        assert_eq!(contents, "first\nsecond\n");

        Ok(())
    }

    #[test]
    fn test_level_file_appender_creates_directory() -> Result<()> {
        let temp_dir = tempfile::TempDir::new()?;
        let appender = LevelFileAppender::new(temp_dir.path().join("nested").join("logs"), "svc");
        let record = LogRecord::new(LogLevel::Critical, "c");

        appender.append(&record, "line")?;
        assert!(appender.path_for(&record).exists());

        Ok(())
    }

    #[test]
    fn test_level_file_appender_reports_unwritable_path() -> Result<()> {
        let temp_dir = tempfile::TempDir::new()?;
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory")?;

        let appender = LevelFileAppender::new(&blocker, "app");
        let record = LogRecord::new(LogLevel::Info, "m");

        let err = appender.append(&record, "line").unwrap_err();
        assert!(format!("{:#}", err).contains("blocker"));

        Ok(())
    }

    #[test]
    fn test_level_file_appender_lock_not_keyed_by_date() -> Result<()> {
        let temp_dir = tempfile::TempDir::new()?;
        let appender = LevelFileAppender::new(temp_dir.path(), "app");

        let today = LogRecord::new(LogLevel::Info, "today");
        let mut yesterday = LogRecord::new(LogLevel::Info, "yesterday");
        yesterday.timestamp = today.timestamp - chrono::Duration::days(1);

        appender.append(&today, "today")?;
        appender.append(&yesterday, "yesterday")?;

        assert_ne!(appender.path_for(&today), appender.path_for(&yesterday));
        assert!(appender.path_for(&yesterday).exists());
        assert_eq!(registry::file_locks_under(appender.base_dir()), 1);

        Ok(())
    }

    #[test]
    fn test_level_file_appender_concurrent_lines_stay_whole() -> Result<()> {
        let temp_dir = tempfile::TempDir::new()?;
        let appender = Arc::new(LevelFileAppender::new(temp_dir.path(), "app"));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let appender = appender.clone();
                std::thread::spawn(move || {
                    let record = LogRecord::new(LogLevel::Info, "m");
                    for i in 0..50 {
                        let line = format!("thread-{}-line-{}-{}", t, i, "x".repeat(200));
                        appender.append(&record, &line).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let record = LogRecord::new(LogLevel::Info, "m");
        let contents = std::fs::read_to_string(appender.path_for(&record))?;
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 400);
        assert!(lines
            .iter()
            .all(|line| line.starts_with("thread-") && line.ends_with(&"x".repeat(200))));

        Ok(())
    }
}
