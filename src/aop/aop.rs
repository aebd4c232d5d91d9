use crate::aop::frame::FrameGuard;
use crate::log::{ConsoleAppenderConfig, LogLevel, LogRecord, Logger, LoggerConfig};
use anyhow::{anyhow, Result};
use garde::Validate;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::future::Future;
use std::panic::Location;
use std::sync::Arc;
use std::time::Instant;

/// 默认日志目录
pub const DEFAULT_LOG_FOLDER: &str = ".logs";

/// 默认应用名
pub const DEFAULT_APP_NAME: &str = "undefined";

/// 织入 logger 的默认调用栈距离
pub const AOP_STACK_DISTANCE: u32 = 3;

/// 进程级默认值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AopDefaults {
    pub log_folder: String,
    pub app_name: String,
}

static DEFAULTS: OnceCell<AopDefaults> = OnceCell::new();

/// 在启动时设置进程级默认日志目录和应用名
///
/// 只能设置一次；默认值已被设置或读取过之后再调用会返回错误
pub fn init_defaults(log_folder: impl Into<String>, app_name: impl Into<String>) -> Result<()> {
    DEFAULTS
        .set(AopDefaults {
            log_folder: log_folder.into(),
            app_name: app_name.into(),
        })
        .map_err(|existing| {
            anyhow!(
                "aop defaults already initialized (log_folder: {}, app_name: {})",
                existing.log_folder,
                existing.app_name
            )
        })
}

/// 进程级默认值，未设置时为 `.logs` / `undefined`
pub fn defaults() -> &'static AopDefaults {
    DEFAULTS.get_or_init(|| AopDefaults {
        log_folder: DEFAULT_LOG_FOLDER.to_string(),
        app_name: DEFAULT_APP_NAME.to_string(),
    })
}

/// AOP 配置
///
/// `log_folder` / `app_name` 为空时在创建 Aop 时取进程级默认值
#[derive(Debug, Clone, Deserialize, Serialize, SmartDefault, Validate, PartialEq)]
#[serde(default)]
pub struct AopConfig {
    /// 是否启用方法调用日志
    #[default = true]
    #[garde(skip)]
    pub enabled: bool,

    /// 日志目录
    #[garde(skip)]
    pub log_folder: Option<String>,

    /// 应用名（logger 名称）
    #[garde(skip)]
    pub app_name: Option<String>,

    /// 最低输出级别
    #[default(LogLevel::Info)]
    #[garde(skip)]
    pub level: LogLevel,

    /// 调用栈距离
    #[default = 3]
    #[garde(range(max = 64))]
    pub stack_distance: u32,

    /// 终端输出配置
    #[garde(skip)]
    pub console: ConsoleAppenderConfig,
}

impl AopConfig {
    /// 对应的 Logger 配置，空字段以进程级默认值补齐
    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            log_folder: self
                .log_folder
                .clone()
                .filter(|folder| !folder.is_empty())
                .unwrap_or_else(|| defaults().log_folder.clone()),
            name: self
                .app_name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| defaults().app_name.clone()),
            level: self.level,
            stack_distance: self.stack_distance,
            console: self.console.clone(),
            ..Default::default()
        }
    }
}

/// AOP 切面
///
/// 持有被织入类型的 logger（可以没有）
#[derive(Debug, Default)]
pub struct Aop {
    /// Logger（如果启用 logging）
    pub logger: Option<Arc<Logger>>,
}

impl Aop {
    /// 从配置创建 Aop
    pub fn new(config: AopConfig) -> Result<Self> {
        config.validate()?;
        if !config.enabled {
            return Ok(Self::disabled());
        }
        let logger = Logger::new(config.logger_config())?;
        Ok(Self {
            logger: Some(Arc::new(logger)),
        })
    }

    /// 使用已有的 logger
    pub fn from_logger(logger: Arc<Logger>) -> Self {
        Self {
            logger: Some(logger),
        }
    }

    /// 不输出任何日志
    pub fn disabled() -> Self {
        Self { logger: None }
    }

    pub fn logger(&self) -> Option<&Arc<Logger>> {
        self.logger.as_ref()
    }
}

/// 可被织入的类型
///
/// 返回 `None` 时被织入的方法照常执行，不输出任何日志
pub trait Instrumented {
    fn logger(&self) -> Option<Arc<Logger>> {
        None
    }
}

impl Instrumented for Aop {
    fn logger(&self) -> Option<Arc<Logger>> {
        self.logger.clone()
    }
}

impl Instrumented for Option<Aop> {
    fn logger(&self) -> Option<Arc<Logger>> {
        self.as_ref().and_then(|aop| aop.logger.clone())
    }
}

impl Instrumented for Arc<Logger> {
    fn logger(&self) -> Option<Arc<Logger>> {
        Some(self.clone())
    }
}

impl Instrumented for Option<Arc<Logger>> {
    fn logger(&self) -> Option<Arc<Logger>> {
        self.clone()
    }
}

/// 输出一条生命周期日志，失败只打印到 stderr，不影响方法结果
fn lifecycle(
    logger: &Logger,
    level: LogLevel,
    method: &str,
    message: String,
    location: &'static Location<'static>,
) {
    let record = LogRecord::new(level, message).with_location(location.file(), location.line());
    if let Err(e) = logger.log_record(record) {
        eprintln!("emolog: failed to record {} for '{}': {:#}", level, method, e);
    }
}

fn starting(logger: &Logger, method: &str, location: &'static Location<'static>) {
    lifecycle(
        logger,
        LogLevel::Start,
        method,
        format!("Starting '{}'", method),
        location,
    );
}

fn finished(logger: &Logger, method: &str, start: Instant, location: &'static Location<'static>) {
    lifecycle(
        logger,
        LogLevel::End,
        method,
        format!("Ending '{}'", method),
        location,
    );
    lifecycle(
        logger,
        LogLevel::Done,
        method,
        format!(
            "Execution time for '{}': {:.4} seconds",
            method,
            start.elapsed().as_secs_f64()
        ),
        location,
    );
}

/// 织入一次同步调用
///
/// 调用前输出 START，正常返回后输出 END 和 DONE（附耗时）。panic 不会被捕获，此时只有 START
#[track_caller]
pub fn trace_call<T>(logger: Option<Arc<Logger>>, method: &'static str, body: impl FnOnce() -> T) -> T {
    let location = Location::caller();
    let start = Instant::now();
    if let Some(ref logger) = logger {
        starting(logger, method, location);
    }

    let value = {
        let _frame = FrameGuard::enter(method);
        body()
    };

    if let Some(ref logger) = logger {
        finished(logger, method, start, location);
    }
    value
}

/// 织入一次返回 Result 的同步调用
///
/// 只有 `Ok` 时输出 END 和 DONE，`Err` 原样返回
#[track_caller]
pub fn try_trace_call<T, E>(
    logger: Option<Arc<Logger>>,
    method: &'static str,
    body: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    let location = Location::caller();
    let start = Instant::now();
    if let Some(ref logger) = logger {
        starting(logger, method, location);
    }

    let result = {
        let _frame = FrameGuard::enter(method);
        body()
    };

    if let (Some(logger), Ok(_)) = (&logger, &result) {
        finished(logger, method, start, location);
    }
    result
}

/// 织入一次异步调用
///
/// 位置在调用时捕获；异步体跨越 await 可能换线程，不压入方法帧
#[track_caller]
pub fn trace_call_async<F>(
    logger: Option<Arc<Logger>>,
    method: &'static str,
    future: F,
) -> impl Future<Output = F::Output>
where
    F: Future,
{
    let location = Location::caller();
    async move {
        let start = Instant::now();
        if let Some(ref logger) = logger {
            starting(logger, method, location);
        }

        let value = future.await;

        if let Some(ref logger) = logger {
            finished(logger, method, start, location);
        }
        value
    }
}

/// 织入一次返回 Result 的异步调用
#[track_caller]
pub fn try_trace_call_async<F, T, E>(
    logger: Option<Arc<Logger>>,
    method: &'static str,
    future: F,
) -> impl Future<Output = Result<T, E>>
where
    F: Future<Output = Result<T, E>>,
{
    let location = Location::caller();
    async move {
        let start = Instant::now();
        if let Some(ref logger) = logger {
            starting(logger, method, location);
        }

        let result = future.await;

        if let (Some(logger), Ok(_)) = (&logger, &result) {
            finished(logger, method, start, location);
        }
        result
    }
}
