use crate::log::appender::{ConsoleAppender, ConsoleAppenderConfig};
use crate::log::level::LogLevel;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};

/// 级别表（rank -> 名称）
static LEVEL_NAMES: Lazy<DashMap<i32, &'static str>> = Lazy::new(DashMap::new);

/// 级别表只填充一次
static REGISTER_ONCE: Once = Once::new();

/// 按 logger 名称共享的终端输出
static CONSOLE_SINKS: Lazy<DashMap<String, ConsoleSink>> = Lazy::new(DashMap::new);

/// 每个 logger 目录下每个级别文件一把锁，保证同一文件的追加按行串行。
/// 键不含日期，按天切换目录不会新增锁
static FILE_LOCKS: Lazy<DashMap<(PathBuf, &'static str), Arc<Mutex<()>>>> =
    Lazy::new(DashMap::new);

struct ConsoleSink {
    appender: Arc<ConsoleAppender>,
    holders: usize,
}

/// 注册所有日志级别（只执行一次）
pub fn register_levels() {
    REGISTER_ONCE.call_once(|| {
        for level in LogLevel::ALL {
            LEVEL_NAMES.insert(level.rank(), level.name());
        }
    });
}

/// 根据 rank 查询级别名称，未注册的 rank 返回 UNKNOWN
pub fn level_name(rank: i32) -> &'static str {
    register_levels();
    LEVEL_NAMES
        .get(&rank)
        .map(|entry| *entry.value())
        .unwrap_or_else(|| LogLevel::Unknown.name())
}

/// 根据名称查询 rank（大小写不敏感）
pub fn rank_of(name: &str) -> Option<i32> {
    register_levels();
    LEVEL_NAMES
        .iter()
        .find(|entry| entry.value().eq_ignore_ascii_case(name))
        .map(|entry| *entry.key())
}

/// 为指定名称挂载终端输出
///
/// 同名 logger 共用同一个输出，重复挂载只增加持有计数
pub fn attach_console(name: &str, config: &ConsoleAppenderConfig) -> Arc<ConsoleAppender> {
    let mut sink = CONSOLE_SINKS
        .entry(name.to_string())
        .or_insert_with(|| ConsoleSink {
            appender: Arc::new(config.clone().into()),
            holders: 0,
        });
    sink.holders += 1;
    sink.appender.clone()
}

/// 释放一次持有，没有持有者时卸载输出
pub fn detach_console(name: &str) {
    CONSOLE_SINKS.remove_if_mut(name, |_, sink| {
        sink.holders = sink.holders.saturating_sub(1);
        sink.holders == 0
    });
}

/// 当前挂载在该名称上的终端输出
pub fn attached_console(name: &str) -> Option<Arc<ConsoleAppender>> {
    CONSOLE_SINKS.get(name).map(|sink| sink.appender.clone())
}

/// 当前持有该终端输出的 logger 数量
pub fn console_holders(name: &str) -> usize {
    CONSOLE_SINKS.get(name).map(|sink| sink.holders).unwrap_or(0)
}

/// 获取 `<logger 目录>` 下某个级别文件的锁
pub fn file_lock(base_dir: &Path, file_name: &'static str) -> Arc<Mutex<()>> {
    FILE_LOCKS
        .entry((base_dir.to_path_buf(), file_name))
        .or_insert_with(|| Arc::new(Mutex::new(())))
        .clone()
}

/// 某个 logger 目录下已创建的文件锁数量
pub fn file_locks_under(base_dir: &Path) -> usize {
    FILE_LOCKS
        .iter()
        .filter(|entry| entry.key().0 == base_dir)
        .count()
}
