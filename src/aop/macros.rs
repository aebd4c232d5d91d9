/// 织入宏 - 为一次方法调用输出 START / END / DONE
///
/// # 使用方式
///
/// ```ignore
/// traced!(&self.aop, self.client.get(key))
/// ```
///
/// # 参数
///
/// - `$source`: 实现了 `Instrumented` 的值的引用（`&Aop`、`&Option<Aop>`、`&Arc<Logger>` 等）
/// - `expression`: 要执行的调用表达式
///   操作名称会自动从表达式中提取（如 `self.client.get(key)` -> "self.client.get"）
///
/// 返回值原样透传。需要 `Err` 时不输出 END / DONE 的场景请直接使用 `try_trace_call`
#[macro_export]
macro_rules! traced {
    ($source:expr, $($tokens:tt)+) => {{
        $crate::__traced_extract_path!($source, [], $($tokens)+)
    }};
}

/// 异步织入宏
///
/// ```ignore
/// traced_async!(&self.aop, self.client.get(key).await)
/// ```
#[macro_export]
macro_rules! traced_async {
    ($source:expr, $($tokens:tt)+) => {{
        $crate::__traced_async_extract_path!($source, [], $($tokens)+)
    }};
}

/// 内部宏 - 提取同步调用表达式路径
#[doc(hidden)]
#[macro_export]
macro_rules! __traced_extract_path {
    // 匹配到最后一次函数调用
    ($source:expr, [$($path:tt)+], ( $($args:tt)* )) => {
        $crate::aop::trace_call(
            $crate::aop::Instrumented::logger($source),
            stringify!($($path)+),
            || $($path)+($($args)*),
        )
    };

    // 匹配到函数调用，后面还有其他链式调用
    ($source:expr, [$($path:tt)+], ( $($args:tt)* ) . $($rest:tt)+) => {
        $crate::__traced_extract_path!($source, [$($path)+ ( $($args)* ) .], $($rest)+)
    };

    // 继续累积路径
    ($source:expr, [$($path:tt)*], $tt:tt $($rest:tt)*) => {
        $crate::__traced_extract_path!($source, [$($path)* $tt], $($rest)*)
    };
}

/// 内部宏 - 提取异步调用表达式路径
#[doc(hidden)]
#[macro_export]
macro_rules! __traced_async_extract_path {
    // 匹配到函数调用 + await
    ($source:expr, [$($path:tt)+], ( $($args:tt)* ) .await) => {
        $crate::aop::trace_call_async(
            $crate::aop::Instrumented::logger($source),
            stringify!($($path)+),
            $($path)+($($args)*),
        )
        .await
    };

    // 匹配到函数调用，后面还有其他链式调用
    ($source:expr, [$($path:tt)+], ( $($args:tt)* ) . $($rest:tt)+) => {
        $crate::__traced_async_extract_path!($source, [$($path)+ ( $($args)* ) .], $($rest)+)
    };

    // 继续累积路径
    ($source:expr, [$($path:tt)*], $tt:tt $($rest:tt)*) => {
        $crate::__traced_async_extract_path!($source, [$($path)* $tt], $($rest)*)
    };
}
