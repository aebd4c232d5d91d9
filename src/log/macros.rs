/// 日志宏模块
///
/// 提供自动捕获文件、行号和所在函数名的日志宏
///
/// # 示例
///
/// ```ignore
/// use emolog::log::*;
///
/// fn main() -> Result<()> {
///     let logger = Logger::with_folder(".logs", "app", LogLevel::Info)?;
///
///     // 简单日志
///     emolog::info!(logger, "application started")?;
///
///     // 带位置参数的日志，`{}` 依次替换为参数
///     emolog::info!(logger, "user {} logged in from {}", "alice", "10.0.0.1")?;
///
///     Ok(())
/// }
/// ```

/// 获取所在函数的名称
///
/// 闭包内调用时返回外层函数名
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __emolog_here() {}
        fn __emolog_type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = __emolog_type_name_of(__emolog_here);
        let name = name.strip_suffix("::__emolog_here").unwrap_or(name);
        let name = name.trim_end_matches("::{{closure}}");
        match name.rfind("::") {
            Some(pos) => &name[pos + 2..],
            None => name,
        }
    }};
}

/// 内部宏 - 以指定级别记录日志
#[doc(hidden)]
#[macro_export]
macro_rules! __emolog_log {
    ($logger:expr, $level:expr, $msg:expr $(, $arg:expr)* $(,)?) => {{
        let args: ::std::vec::Vec<$crate::log::MetadataValue> =
            ::std::vec![$($crate::log::MetadataValue::from($arg)),*];
        $logger.log_from($level, Some($crate::function_name!()), $msg, args)
    }};
}

/// 记录 DEBUG 级别日志
///
/// # 示例
///
/// ```ignore
/// debug!(logger, "processing request")?;
/// debug!(logger, "processing {} {}", "GET", "/api/users")?;
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($tokens:tt)+) => {
        $crate::__emolog_log!($logger, $crate::log::LogLevel::Debug, $($tokens)+)
    };
}

/// 记录 TRACE 级别日志
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($tokens:tt)+) => {
        $crate::__emolog_log!($logger, $crate::log::LogLevel::Trace, $($tokens)+)
    };
}

/// 记录 INFO 级别日志
///
/// # 示例
///
/// ```ignore
/// info!(logger, "user logged in")?;
/// info!(logger, "user {} logged in", 12345)?;
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($tokens:tt)+) => {
        $crate::__emolog_log!($logger, $crate::log::LogLevel::Info, $($tokens)+)
    };
}

/// 记录 WARNING 级别日志
///
/// # 示例
///
/// ```ignore
/// warning!(logger, "slow query took {} ms", 1500)?;
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($tokens:tt)+) => {
        $crate::__emolog_log!($logger, $crate::log::LogLevel::Warning, $($tokens)+)
    };
}

/// 记录 START 级别日志
#[macro_export]
macro_rules! start {
    ($logger:expr, $($tokens:tt)+) => {
        $crate::__emolog_log!($logger, $crate::log::LogLevel::Start, $($tokens)+)
    };
}

/// 记录 END 级别日志
#[macro_export]
macro_rules! end {
    ($logger:expr, $($tokens:tt)+) => {
        $crate::__emolog_log!($logger, $crate::log::LogLevel::End, $($tokens)+)
    };
}

/// 记录 ERROR 级别日志
///
/// # 示例
///
/// ```ignore
/// error!(logger, "database connection failed")?;
/// error!(logger, "query failed with {} after {} retries", "CONN001", 3)?;
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($tokens:tt)+) => {
        $crate::__emolog_log!($logger, $crate::log::LogLevel::Error, $($tokens)+)
    };
}

/// 记录 CRITICAL 级别日志
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($tokens:tt)+) => {
        $crate::__emolog_log!($logger, $crate::log::LogLevel::Critical, $($tokens)+)
    };
}

/// 记录 DONE 级别日志
#[macro_export]
macro_rules! done {
    ($logger:expr, $($tokens:tt)+) => {
        $crate::__emolog_log!($logger, $crate::log::LogLevel::Done, $($tokens)+)
    };
}

/// 记录 UNKNOWN 级别日志
#[macro_export]
macro_rules! unknown {
    ($logger:expr, $($tokens:tt)+) => {
        $crate::__emolog_log!($logger, $crate::log::LogLevel::Unknown, $($tokens)+)
    };
}
