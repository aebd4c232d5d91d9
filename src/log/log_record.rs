use crate::log::level::LogLevel;
use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// 元数据值，支持多种类型
///
/// 既用作位置参数，也用作 extra 映射中的值
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    String(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    Null,
    /// 任意 JSON 兼容的数据
    Json(Value),
    /// 自定义结构体（内部序列化为 JSON）
    Struct(Value),
}

impl Serialize for MetadataValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            MetadataValue::String(s) => serializer.serialize_str(s),
            MetadataValue::I64(n) => serializer.serialize_i64(*n),
            MetadataValue::U64(n) => serializer.serialize_u64(*n),
            MetadataValue::F64(n) => serializer.serialize_f64(*n),
            MetadataValue::Bool(b) => serializer.serialize_bool(*b),
            MetadataValue::Null => serializer.serialize_none(),
            MetadataValue::Json(v) => v.serialize(serializer),
            MetadataValue::Struct(v) => v.serialize(serializer),
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::String(s) => write!(f, "{}", s),
            MetadataValue::I64(n) => write!(f, "{}", n),
            MetadataValue::U64(n) => write!(f, "{}", n),
            MetadataValue::F64(n) => write!(f, "{}", n),
            MetadataValue::Bool(b) => write!(f, "{}", b),
            MetadataValue::Null => write!(f, "null"),
            MetadataValue::Json(v) => write!(f, "{}", v),
            MetadataValue::Struct(v) => write!(f, "{}", v),
        }
    }
}

impl MetadataValue {
    /// 从任意实现了 Serialize 的自定义结构体创建 MetadataValue
    pub fn from_struct<T: serde::Serialize>(value: T) -> Self {
        match serde_json::to_value(value) {
            Ok(json_value) => MetadataValue::Struct(json_value),
            Err(_) => MetadataValue::Null,
        }
    }

    /// 日志文件中使用的字面表示
    ///
    /// 字符串加单引号，布尔值为 True/False，空值为 None
    pub fn repr(&self) -> String {
        match self {
            MetadataValue::String(s) => format!("'{}'", s.replace('\'', "\\'")),
            MetadataValue::Bool(true) => "True".to_string(),
            MetadataValue::Bool(false) => "False".to_string(),
            MetadataValue::Null => "None".to_string(),
            other => other.to_string(),
        }
    }
}

// 为各种类型实现 From<MetadataValue> 以方便使用
impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::String(s)
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::String(s.to_string())
    }
}

impl From<&String> for MetadataValue {
    fn from(s: &String) -> Self {
        MetadataValue::String(s.clone())
    }
}

impl From<i64> for MetadataValue {
    fn from(n: i64) -> Self {
        MetadataValue::I64(n)
    }
}

impl From<i32> for MetadataValue {
    fn from(n: i32) -> Self {
        MetadataValue::I64(n as i64)
    }
}

impl From<u64> for MetadataValue {
    fn from(n: u64) -> Self {
        MetadataValue::U64(n)
    }
}

impl From<u32> for MetadataValue {
    fn from(n: u32) -> Self {
        MetadataValue::U64(n as u64)
    }
}

impl From<usize> for MetadataValue {
    fn from(n: usize) -> Self {
        MetadataValue::U64(n as u64)
    }
}

impl From<f64> for MetadataValue {
    fn from(n: f64) -> Self {
        MetadataValue::F64(n)
    }
}

impl From<f32> for MetadataValue {
    fn from(n: f32) -> Self {
        MetadataValue::F64(n as f64)
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        MetadataValue::Bool(b)
    }
}

impl From<Value> for MetadataValue {
    fn from(v: Value) -> Self {
        MetadataValue::Json(v)
    }
}

impl<T: Into<MetadataValue>> From<Option<T>> for MetadataValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(MetadataValue::Null)
    }
}

/// 日志记录
///
/// 每次输出时构造，两个输出端消费完即丢弃
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// 日志级别
    pub level: LogLevel,
    /// 日志消息（未插值）
    pub message: String,
    /// 所属 logger 名称
    pub logger: String,
    /// 源文件路径
    pub file: Option<String>,
    /// 行号
    pub line: Option<u32>,
    /// 函数名
    pub function: Option<String>,
    /// 时间戳（本地时区）
    pub timestamp: DateTime<Local>,
    /// 位置参数
    pub args: Vec<MetadataValue>,
    /// 异常信息
    pub exc_info: Option<String>,
    /// 附加映射
    pub extra: Vec<(String, MetadataValue)>,
    /// 是否附带调用栈
    pub stack_info: bool,
    /// 调用栈层级
    pub stack_level: u32,
}

impl LogRecord {
    /// 创建新的日志记录
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            logger: String::new(),
            file: None,
            line: None,
            function: None,
            timestamp: Local::now(),
            args: Vec::new(),
            exc_info: None,
            extra: Vec::new(),
            stack_info: false,
            stack_level: 1,
        }
    }

    /// 追加一个位置参数
    pub fn with_arg(mut self, value: impl Into<MetadataValue>) -> Self {
        self.args.push(value.into());
        self
    }

    /// 追加多个位置参数
    pub fn with_args<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<MetadataValue>,
    {
        self.args.extend(values.into_iter().map(Into::into));
        self
    }

    /// 设置位置信息（文件和行号）
    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    /// 设置函数名
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// 设置 logger 名称
    pub fn with_logger(mut self, logger: impl Into<String>) -> Self {
        self.logger = logger.into();
        self
    }

    /// 设置异常信息
    pub fn with_exc_info(mut self, exc_info: impl Into<String>) -> Self {
        self.exc_info = Some(exc_info.into());
        self
    }

    /// 添加 extra 键值
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    pub fn with_stack_info(mut self, stack_info: bool) -> Self {
        self.stack_info = stack_info;
        self
    }

    pub fn with_stack_level(mut self, stack_level: u32) -> Self {
        self.stack_level = stack_level;
        self
    }

    /// 源文件的文件名部分
    pub fn file_name(&self) -> &str {
        match &self.file {
            Some(file) => Path::new(file)
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or(file),
            None => "<unknown>",
        }
    }

    /// 插值后的消息
    ///
    /// 每个 `{}` 依次替换为一个位置参数，多余的参数以 ` [a, b]` 形式追加
    pub fn rendered_message(&self) -> String {
        if self.args.is_empty() {
            return self.message.clone();
        }

        let mut result = String::with_capacity(self.message.len() + 16 * self.args.len());
        let mut args = self.args.iter();
        let mut rest = self.message.as_str();
        while let Some(pos) = rest.find("{}") {
            match args.next() {
                Some(arg) => {
                    result.push_str(&rest[..pos]);
                    result.push_str(&arg.to_string());
                    rest = &rest[pos + 2..];
                }
                None => break,
            }
        }
        result.push_str(rest);

        let leftover: Vec<String> = args.map(|arg| arg.to_string()).collect();
        if !leftover.is_empty() {
            result.push_str(" [");
            result.push_str(&leftover.join(", "));
            result.push(']');
        }
        result
    }

    /// 位置参数的元组表示：`()`、`('a',)`、`('a', 1)`
    pub fn args_repr(&self) -> String {
        match self.args.as_slice() {
            [] => "()".to_string(),
            [single] => format!("({},)", single.repr()),
            many => {
                let parts: Vec<String> = many.iter().map(MetadataValue::repr).collect();
                format!("({})", parts.join(", "))
            }
        }
    }

    /// 异常信息表示，缺省为 None
    pub fn exc_info_repr(&self) -> String {
        match &self.exc_info {
            Some(info) => info.clone(),
            None => "None".to_string(),
        }
    }

    /// extra 映射表示，缺省为 None
    pub fn extra_repr(&self) -> String {
        if self.extra.is_empty() {
            return "None".to_string();
        }
        let parts: Vec<String> = self
            .extra
            .iter()
            .map(|(k, v)| format!("'{}': {}", k, v.repr()))
            .collect();
        format!("{{{}}}", parts.join(", "))
    }

    /// 调用栈标志表示
    pub fn stack_info_repr(&self) -> &'static str {
        if self.stack_info {
            "True"
        } else {
            "False"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_record_new() {
        let record = LogRecord::new(LogLevel::Info, "test message");

        assert_eq!(record.level, LogLevel::Info);
        assert_eq!(record.message, "test message");
        assert!(record.file.is_none());
        assert!(record.line.is_none());
        assert!(record.function.is_none());
        assert!(record.args.is_empty());
        assert!(record.extra.is_empty());
        assert_eq!(record.stack_level, 1);
        assert!(!record.stack_info);
    }

    #[test]
    fn test_log_record_builder_pattern() {
        let record = LogRecord::new(LogLevel::Warning, "warning")
            .with_logger("app")
            .with_location("src/main.rs", 10)
            .with_function("main")
            .with_arg(1)
            .with_extra("user", "alice");

        assert_eq!(record.logger, "app");
        assert_eq!(record.file.as_deref(), Some("src/main.rs"));
        assert_eq!(record.line, Some(10));
        assert_eq!(record.function.as_deref(), Some("main"));
        assert_eq!(record.args, vec![MetadataValue::I64(1)]);
        assert_eq!(record.extra.len(), 1);
    }

    #[test]
    fn test_file_name_strips_directories() {
        let record = LogRecord::new(LogLevel::Info, "m").with_location("src/log/logger.rs", 1);
        assert_eq!(record.file_name(), "logger.rs");

        let record = LogRecord::new(LogLevel::Info, "m");
        assert_eq!(record.file_name(), "<unknown>");
    }

    #[test]
    fn test_rendered_message_interpolates_args() {
        let record = LogRecord::new(LogLevel::Info, "user {} logged in from {}")
            .with_args(["alice", "10.0.0.1"]);
        assert_eq!(record.rendered_message(), "user alice logged in from 10.0.0.1");
    }

    #[test]
    fn test_rendered_message_appends_leftover_args() {
        let record = LogRecord::new(LogLevel::Info, "loaded {} rows")
            .with_arg(42)
            .with_arg("cache")
            .with_arg(true);
        assert_eq!(record.rendered_message(), "loaded 42 rows [cache, true]");

        let record = LogRecord::new(LogLevel::Info, "no placeholder {} {}").with_arg(1);
        assert_eq!(record.rendered_message(), "no placeholder 1 {}");
    }

    #[test]
    fn test_args_repr_uses_tuple_notation() {
        let record = LogRecord::new(LogLevel::Info, "m");
        assert_eq!(record.args_repr(), "()");

        let record = LogRecord::new(LogLevel::Info, "m").with_arg("a");
        assert_eq!(record.args_repr(), "('a',)");

        let record = LogRecord::new(LogLevel::Info, "m")
            .with_arg("a")
            .with_arg(1)
            .with_arg(false);
        assert_eq!(record.args_repr(), "('a', 1, False)");
    }

    #[test]
    fn test_optional_fields_repr() {
        let record = LogRecord::new(LogLevel::Error, "m");
        assert_eq!(record.exc_info_repr(), "None");
        assert_eq!(record.extra_repr(), "None");
        assert_eq!(record.stack_info_repr(), "False");

        let record = record
            .with_exc_info("IoError: denied")
            .with_extra("path", "/tmp/x")
            .with_extra("retries", 3)
            .with_stack_info(true);
        assert_eq!(record.exc_info_repr(), "IoError: denied");
        assert_eq!(record.extra_repr(), "{'path': '/tmp/x', 'retries': 3}");
        assert_eq!(record.stack_info_repr(), "True");
    }

    #[test]
    fn test_metadata_value_display() {
        assert_eq!(format!("{}", MetadataValue::String("hello".to_string())), "hello");
        assert_eq!(format!("{}", MetadataValue::I64(42)), "42");
        assert_eq!(format!("{}", MetadataValue::U64(100)), "100");
        assert_eq!(format!("{}", MetadataValue::F64(3.5)), "3.5");
        assert_eq!(format!("{}", MetadataValue::Bool(true)), "true");
        assert_eq!(format!("{}", MetadataValue::Null), "null");
    }

    #[test]
    fn test_metadata_value_repr() {
        assert_eq!(MetadataValue::from("it's").repr(), "'it\\'s'");
        assert_eq!(MetadataValue::from(None::<i64>).repr(), "None");
        assert_eq!(MetadataValue::from(Some(7)).repr(), "7");
    }

    #[test]
    fn test_metadata_value_from_struct() {
        #[derive(Serialize)]
        struct User {
            id: i64,
            name: String,
        }

        let value = MetadataValue::from_struct(User {
            id: 12345,
            name: "alice".to_string(),
        });

        let json = serde_json::to_string(&value).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["id"], 12345);
        assert_eq!(parsed["name"], "alice");
    }
}
