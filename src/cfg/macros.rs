//! 组件构造相关的宏
//!
//! 配置类型到组件的转换

/// 为配置类型实现到组件的 `From`，内部调用 `Type::new(config)`
///
/// 用法：`impl_from!(ConsoleFormatterConfig => ConsoleFormatter)`
#[macro_export]
macro_rules! impl_from {
    ($config_type:ty => $target_type:ty) => {
        impl From<$config_type> for $target_type {
            fn from(config: $config_type) -> Self {
                <$target_type>::new(config)
            }
        }
    };
}
