//! 调用方定位
//!
//! 沿调用栈跳过日志和织入层自身的帧，按调用栈距离找到产生日志的函数。
//! 调用栈距离为 2 时指向直接调用 Logger 方法的函数，每加 1 向外多走一层

use std::path::Path;

/// 指向直接调用方的调用栈距离
pub const DIRECT_CALLER_DISTANCE: u32 = 2;

/// 日志和织入层内部的符号前缀，遍历调用栈时跳过
const INTERNAL_PREFIXES: [&str; 6] = [
    "emolog::log::",
    "emolog::aop::",
    "backtrace::",
    "std::",
    "core::",
    "alloc::",
];

/// 解析出的调用方
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub function: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

/// 按调用栈距离定位调用方，符号不可用时返回 None
pub fn resolve(stack_distance: u32) -> Option<Caller> {
    let target = stack_distance.saturating_sub(DIRECT_CALLER_DISTANCE);
    let mut depth = 0u32;
    let mut previous: Option<String> = None;
    let mut found: Option<Caller> = None;

    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if found.is_some() {
                return;
            }
            let name = match symbol.name() {
                Some(name) => format!("{:#}", name),
                None => return,
            };
            if is_internal(&name) {
                return;
            }

            // 闭包帧与所在函数算作同一层
            let function = short_name(&name);
            if previous.as_deref() == Some(function.as_str()) {
                return;
            }
            if previous.is_some() {
                depth += 1;
            }
            previous = Some(function.clone());

            if depth == target {
                found = Some(Caller {
                    function,
                    file: symbol.filename().map(|path: &Path| path.display().to_string()),
                    line: symbol.lineno(),
                });
            }
        });
        found.is_none()
    });

    found
}

fn is_internal(name: &str) -> bool {
    if name.contains("::tests::") {
        return false;
    }
    let name = name.trim_start_matches('<');
    INTERNAL_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

/// 去掉路径、闭包后缀和泛型参数，只保留函数名
fn short_name(name: &str) -> String {
    let mut name = name;
    while let Some(stripped) = name.strip_suffix("::{{closure}}") {
        name = stripped;
    }
    let name = match name.rfind("::") {
        Some(pos) => &name[pos + 2..],
        None => name,
    };
    match name.find('<') {
        Some(pos) if pos > 0 => name[..pos].to_string(),
        _ => name.to_string(),
    }
}
