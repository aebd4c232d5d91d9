use crate::aop::frame;
use crate::log::caller;
use crate::cfg::expand_path;
use crate::log::appender::{
    ConsoleAppender, ConsoleAppenderConfig, LevelFileAppender, LogAppender,
};
use crate::log::formatter::{ConsoleFormatter, ConsoleFormatterConfig, FileFormatter, LogFormatter};
use crate::log::level::LogLevel;
use crate::log::log_record::{LogRecord, MetadataValue};
use crate::log::registry;
use anyhow::Result;
use chrono::{DateTime, Local};
use garde::Validate;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, RwLock};

/// 名称为空时使用的 logger 名称
pub const NO_APP_NAME: &str = "no_app_name";

/// 未知函数名
const MODULE_FUNCTION: &str = "<module>";

/// 调用栈距离上限
pub const MAX_STACK_DISTANCE: u32 = 64;

/// Logger 配置
#[derive(Debug, Clone, Deserialize, Serialize, SmartDefault, Validate, PartialEq)]
#[serde(default)]
pub struct LoggerConfig {
    /// 日志根目录，支持 `~`
    #[default = ".logs"]
    #[garde(length(min = 1))]
    pub log_folder: String,

    /// logger 名称，同时是日志根目录下的子目录名
    #[default = "no_app_name"]
    #[garde(skip)]
    pub name: String,

    /// 最低输出级别
    #[default(LogLevel::Debug)]
    #[garde(skip)]
    pub level: LogLevel,

    /// 调用栈距离，写入日志文件的调用栈层级列
    #[default = 2]
    #[garde(range(max = MAX_STACK_DISTANCE))]
    pub stack_distance: u32,

    /// 终端输出配置
    #[garde(skip)]
    pub console: ConsoleAppenderConfig,

    /// 终端格式配置
    #[garde(skip)]
    pub formatter: ConsoleFormatterConfig,
}

/// 核心日志器
///
/// 每条日志同时写入按级别划分的日志文件和终端。两个输出共用同一个级别阈值。
/// 调用方位置由 `#[track_caller]` 解析，经过 Logger 方法和织入层后仍指向真实调用处
pub struct Logger {
    name: String,
    log_folder: PathBuf,
    level: RwLock<LogLevel>,
    stack_distance: AtomicU32,
    last_record: RwLock<Option<LogRecord>>,
    closed: AtomicBool,
    console_formatter: ConsoleFormatter,
    file_formatter: FileFormatter,
    console: Arc<ConsoleAppender>,
    file: LevelFileAppender,
}

impl Logger {
    /// 从配置创建 Logger
    pub fn new(config: LoggerConfig) -> Result<Self> {
        config.validate()?;
        registry::register_levels();

        let name = if config.name.trim().is_empty() {
            NO_APP_NAME.to_string()
        } else {
            config.name
        };
        let log_folder = expand_path(&config.log_folder);
        let console = registry::attach_console(&name, &config.console);
        let file = LevelFileAppender::new(&log_folder, &name);

        Ok(Self {
            name,
            log_folder,
            level: RwLock::new(config.level),
            stack_distance: AtomicU32::new(config.stack_distance),
            last_record: RwLock::new(None),
            closed: AtomicBool::new(false),
            console_formatter: config.formatter.into(),
            file_formatter: FileFormatter::new(),
            console,
            file,
        })
    }

    /// 以目录、名称和级别创建 Logger，其余配置取默认值
    pub fn with_folder(
        log_folder: impl Into<String>,
        name: impl Into<String>,
        level: LogLevel,
    ) -> Result<Self> {
        Self::new(LoggerConfig {
            log_folder: log_folder.into(),
            name: name.into(),
            level,
            ..Default::default()
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn log_folder(&self) -> &Path {
        &self.log_folder
    }

    /// 该 logger 的日志目录 `<日志根目录>/<名称>`
    pub fn log_dir(&self) -> &Path {
        self.file.base_dir()
    }

    /// 设置日志级别
    pub fn set_level(&self, level: LogLevel) {
        *self.level.write().unwrap_or_else(|e| e.into_inner()) = level;
    }

    /// 获取当前日志级别
    pub fn level(&self) -> LogLevel {
        *self.level.read().unwrap_or_else(|e| e.into_inner())
    }

    /// 该级别是否会被输出；关闭后始终为 false
    pub fn is_enabled_for(&self, level: LogLevel) -> bool {
        !self.is_closed() && level >= self.level()
    }

    /// 设置调用栈距离，超过上限时取上限
    pub fn set_stack_distance(&self, stack_distance: u32) {
        self.stack_distance
            .store(stack_distance.min(MAX_STACK_DISTANCE), Ordering::Relaxed);
    }

    pub fn stack_distance(&self) -> u32 {
        self.stack_distance.load(Ordering::Relaxed)
    }

    /// 最近一次被输出的消息（原文）
    pub fn last_message(&self) -> Option<String> {
        self.last_record
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|record| record.message.clone())
    }

    /// 最近一次被输出的时间
    pub fn last_message_time(&self) -> Option<DateTime<Local>> {
        self.last_record
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|record| record.timestamp)
    }

    /// 最近一次被输出的完整记录，包含解析出的调用方
    pub fn last_record(&self) -> Option<LogRecord> {
        self.last_record
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// 当前使用的终端输出（同名 logger 共享）
    pub fn console(&self) -> &Arc<ConsoleAppender> {
        &self.console
    }

    /// 关闭 logger，释放终端输出；之后所有输出均为空操作。重复调用无副作用
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            if let Err(e) = self.console.flush() {
                eprintln!("emolog: failed to flush console for '{}': {:#}", self.name, e);
            }
            registry::detach_console(&self.name);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// 记录日志
    ///
    /// 未设置的 logger 名称在这里补齐。未设置函数名时按调用栈距离沿调用栈定位调用方，
    /// 距离超过直接调用方时文件和行号也取该调用方；调用栈层级加上调用栈距离
    pub fn log_record(&self, mut record: LogRecord) -> Result<()> {
        if !self.is_enabled_for(record.level) {
            return Ok(());
        }

        let stack_distance = self.stack_distance();
        if record.logger.is_empty() {
            record.logger = self.name.clone();
        }
        if record.function.is_none() {
            record.function = Some(match caller::resolve(stack_distance) {
                Some(resolved) => {
                    if stack_distance > caller::DIRECT_CALLER_DISTANCE {
                        if let (Some(file), Some(line)) = (resolved.file, resolved.line) {
                            record.file = Some(file);
                            record.line = Some(line);
                        }
                    }
                    resolved.function
                }
                None => frame::current().unwrap_or(MODULE_FUNCTION).to_string(),
            });
        }
        record.stack_level = record.stack_level.saturating_add(stack_distance);

        *self.last_record.write().unwrap_or_else(|e| e.into_inner()) = Some(record.clone());

        let line = self.file_formatter.format(&record)?;
        self.file.append(&record, &line)?;

        let line = self.console_formatter.format(&record)?;
        self.console.append(&record, &line)?;

        Ok(())
    }

    /// 以指定级别记录日志，位置取调用处
    #[track_caller]
    pub fn log<I, V>(&self, level: LogLevel, message: impl Into<String>, args: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<MetadataValue>,
    {
        self.log_from(level, None, message, args)
    }

    /// 以指定级别和函数名记录日志
    ///
    /// 函数名为空时取当前线程最内层的被织入方法，日志宏通过这里传入调用处的函数名
    #[track_caller]
    pub fn log_from<I, V>(
        &self,
        level: LogLevel,
        function: Option<&str>,
        message: impl Into<String>,
        args: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<MetadataValue>,
    {
        if !self.is_enabled_for(level) {
            return Ok(());
        }
        self.log_record(Self::caller_record(level, function, message, args))
    }

    /// 以调用处位置构造记录
    #[track_caller]
    fn caller_record<I, V>(
        level: LogLevel,
        function: Option<&str>,
        message: impl Into<String>,
        args: I,
    ) -> LogRecord
    where
        I: IntoIterator<Item = V>,
        V: Into<MetadataValue>,
    {
        let location = Location::caller();
        let record = LogRecord::new(level, message)
            .with_location(location.file(), location.line())
            .with_args(args);
        match function {
            Some(function) => record.with_function(function),
            None => record,
        }
    }

    #[track_caller]
    fn emit(&self, level: LogLevel, message: String) -> Result<()> {
        self.log_from(level, None, message, Vec::<MetadataValue>::new())
    }

    /// 记录 DEBUG 级别日志
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) -> Result<()> {
        self.emit(LogLevel::Debug, message.into())
    }

    /// 记录 TRACE 级别日志
    #[track_caller]
    pub fn trace(&self, message: impl Into<String>) -> Result<()> {
        self.emit(LogLevel::Trace, message.into())
    }

    /// 记录 INFO 级别日志
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) -> Result<()> {
        self.emit(LogLevel::Info, message.into())
    }

    /// 记录 WARNING 级别日志
    #[track_caller]
    pub fn warning(&self, message: impl Into<String>) -> Result<()> {
        self.emit(LogLevel::Warning, message.into())
    }

    /// 记录 START 级别日志
    #[track_caller]
    pub fn start(&self, message: impl Into<String>) -> Result<()> {
        self.emit(LogLevel::Start, message.into())
    }

    /// 记录 END 级别日志
    #[track_caller]
    pub fn end(&self, message: impl Into<String>) -> Result<()> {
        self.emit(LogLevel::End, message.into())
    }

    /// 记录 ERROR 级别日志
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) -> Result<()> {
        self.emit(LogLevel::Error, message.into())
    }

    /// 记录 CRITICAL 级别日志
    #[track_caller]
    pub fn critical(&self, message: impl Into<String>) -> Result<()> {
        self.emit(LogLevel::Critical, message.into())
    }

    /// 记录 DONE 级别日志
    #[track_caller]
    pub fn done(&self, message: impl Into<String>) -> Result<()> {
        self.emit(LogLevel::Done, message.into())
    }

    /// 记录 UNKNOWN 级别日志
    #[track_caller]
    pub fn unknown(&self, message: impl Into<String>) -> Result<()> {
        self.emit(LogLevel::Unknown, message.into())
    }

    /// 记录 DEBUG 级别日志（带位置参数）
    ///
    /// # 示例
    ///
    /// ```ignore
    /// logger.debug_with("cache size {} of {}", [12, 64])?;
    /// ```
    #[track_caller]
    pub fn debug_with<I, V>(&self, message: impl Into<String>, args: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<MetadataValue>,
    {
        self.log(LogLevel::Debug, message, args)
    }

    #[track_caller]
    pub fn trace_with<I, V>(&self, message: impl Into<String>, args: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<MetadataValue>,
    {
        self.log(LogLevel::Trace, message, args)
    }

    /// 记录 INFO 级别日志（带位置参数）
    ///
    /// # 示例
    ///
    /// ```ignore
    /// logger.info_with("user {} logged in", ["alice"])?;
    /// ```
    #[track_caller]
    pub fn info_with<I, V>(&self, message: impl Into<String>, args: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<MetadataValue>,
    {
        self.log(LogLevel::Info, message, args)
    }

    #[track_caller]
    pub fn warning_with<I, V>(&self, message: impl Into<String>, args: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<MetadataValue>,
    {
        self.log(LogLevel::Warning, message, args)
    }

    #[track_caller]
    pub fn start_with<I, V>(&self, message: impl Into<String>, args: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<MetadataValue>,
    {
        self.log(LogLevel::Start, message, args)
    }

    #[track_caller]
    pub fn end_with<I, V>(&self, message: impl Into<String>, args: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<MetadataValue>,
    {
        self.log(LogLevel::End, message, args)
    }

    /// 记录 ERROR 级别日志（带位置参数）
    ///
    /// # 示例
    ///
    /// ```ignore
    /// logger.error_with("query {} failed after {} retries", ["users", "3"])?;
    /// ```
    #[track_caller]
    pub fn error_with<I, V>(&self, message: impl Into<String>, args: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<MetadataValue>,
    {
        self.log(LogLevel::Error, message, args)
    }

    #[track_caller]
    pub fn critical_with<I, V>(&self, message: impl Into<String>, args: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<MetadataValue>,
    {
        self.log(LogLevel::Critical, message, args)
    }

    #[track_caller]
    pub fn done_with<I, V>(&self, message: impl Into<String>, args: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<MetadataValue>,
    {
        self.log(LogLevel::Done, message, args)
    }

    #[track_caller]
    pub fn unknown_with<I, V>(&self, message: impl Into<String>, args: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<MetadataValue>,
    {
        self.log(LogLevel::Unknown, message, args)
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("log_folder", &self.log_folder)
            .field("level", &self.level())
            .field("closed", &self.is_closed())
            .finish()
    }
}
