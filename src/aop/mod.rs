//! AOP (Aspect-Oriented Programming) 模块
//!
//! 为方法调用自动输出生命周期日志：
//! - START: `Starting '<方法名>'`
//! - END: `Ending '<方法名>'`
//! - DONE: `Execution time for '<方法名>': <秒数> seconds`
//!
//! # 使用示例
//!
//! ```ignore
//! use emolog::aop::{Aop, AopConfig, Instrumented};
//! use emolog::instrumented;
//!
//! pub struct MyService {
//!     aop: Aop,
//! }
//!
//! impl Instrumented for MyService {
//!     fn logger(&self) -> Option<Arc<Logger>> {
//!         self.aop.logger().cloned()
//!     }
//! }
//!
//! #[instrumented]
//! impl MyService {
//!     pub fn get_value(&self, key: &str) -> Result<String> {
//!         self.client.get(key)
//!     }
//! }
//! ```
//!
//! 不使用属性宏时，可以用 `traced!` / `traced_async!` 或 `trace_call` 系列函数织入单次调用。

pub mod aop;
pub mod frame;
pub mod macros;

pub use aop::{
    defaults, init_defaults, trace_call, trace_call_async, try_trace_call, try_trace_call_async,
    Aop, AopConfig, AopDefaults, Instrumented, AOP_STACK_DISTANCE, DEFAULT_APP_NAME,
    DEFAULT_LOG_FOLDER,
};
pub use frame::FrameGuard;
