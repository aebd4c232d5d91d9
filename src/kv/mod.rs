//! 持久化字典
//!
//! `PersistedDict` 把键值对以 MessagePack 格式保存在单个文件中，
//! 公开方法通过 `#[instrumented]` 自动输出 START / END / DONE 调用日志。
//!
//! ```ignore
//! use emolog::kv::{PersistedDict, PersistedDictConfig};
//!
//! let mut dict: PersistedDict<i64> = PersistedDict::open("data.bin", PersistedDictConfig::default())?;
//! dict.set("answer", 42);
//! dict.save()?;
//! ```

mod error;
mod persisted_dict;

pub use error::KvError;
pub use persisted_dict::{PersistedDict, PersistedDictConfig, Timestamps};
