use crate::aop::{Aop, AopConfig, Instrumented};
use crate::instrumented;
use crate::kv::error::KvError;
use crate::log::Logger;
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// PersistedDict 配置
#[derive(Debug, Clone, Deserialize, Serialize, SmartDefault, PartialEq)]
#[serde(default)]
pub struct PersistedDictConfig {
    /// 打开时文件存在则读入
    #[default = true]
    pub load: bool,

    /// 方法调用日志配置
    pub aop: AopConfig,
}

/// 读写时间戳
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    pub first: Option<DateTime<Utc>>,
    pub last_read: Option<DateTime<Utc>>,
    pub last_memory_update: Option<DateTime<Utc>>,
    pub last_write: Option<DateTime<Utc>>,
}

/// 落盘格式
#[derive(Serialize, Deserialize)]
struct Snapshot<V> {
    data: BTreeMap<String, V>,
    stamps: Timestamps,
}

/// 持久化到单个文件的字典
///
/// 以 MessagePack 落盘，记录首次创建、最近读取、最近内存更新和最近写盘时间，
/// 内容未变化时 `save` 不重复写文件
pub struct PersistedDict<V> {
    path: PathBuf,
    data: BTreeMap<String, V>,
    stamps: Timestamps,
    aop: Aop,
}

impl<V> Instrumented for PersistedDict<V> {
    fn logger(&self) -> Option<Arc<Logger>> {
        self.aop.logger().cloned()
    }
}

impl<V> PersistedDict<V>
where
    V: Serialize + DeserializeOwned + Clone,
{
    /// 打开字典
    ///
    /// `load` 为 true 且文件存在时读入文件内容，否则以空字典开始并记录首次时间
    pub fn open(path: impl AsRef<Path>, config: PersistedDictConfig) -> Result<Self, KvError> {
        let aop = Aop::new(config.aop).map_err(|e| KvError::Logger(format!("{:#}", e)))?;
        let mut dict = Self {
            path: path.as_ref().to_path_buf(),
            data: BTreeMap::new(),
            stamps: Timestamps::default(),
            aop,
        };

        if config.load && dict.path.exists() {
            dict.read_file()?;
        } else {
            dict.stamps.first = Some(Utc::now());
        }
        Ok(dict)
    }

    fn read_file(&mut self) -> Result<(), KvError> {
        let bytes = std::fs::read(&self.path).map_err(|e| KvError::io(&self.path, e))?;
        let snapshot: Snapshot<V> = rmp_serde::from_slice(&bytes)?;
        self.data = snapshot.data;
        self.stamps = snapshot.stamps;
        self.stamps.last_read = Some(Utc::now());
        Ok(())
    }

    fn write_file(&self) -> Result<(), KvError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| KvError::io(parent, e))?;
            }
        }
        let snapshot = Snapshot {
            data: self.data.clone(),
            stamps: self.stamps.clone(),
        };
        let bytes = rmp_serde::to_vec_named(&snapshot)?;
        std::fs::write(&self.path, bytes).map_err(|e| KvError::io(&self.path, e))
    }

    fn report_error(&self, message: &str) {
        if let Some(logger) = self.aop.logger() {
            if let Err(e) = logger.error(message) {
                eprintln!("emolog: failed to log error '{}': {:#}", message, e);
            }
        }
    }

    /// 内存更新时间，保证晚于最近写盘时间
    fn touch_memory(&mut self) {
        let mut now = Utc::now();
        if let Some(last_write) = self.stamps.last_write {
            if now <= last_write {
                now = last_write + Duration::microseconds(1);
            }
        }
        self.stamps.last_memory_update = Some(now);
    }
}

#[instrumented]
impl<V> PersistedDict<V>
where
    V: Serialize + DeserializeOwned + Clone,
{
    /// 读取键对应的值
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.stamps.last_read = Some(Utc::now());
        self.data.get(key).cloned()
    }

    /// 写入键值（仅内存）
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        self.touch_memory();
        self.data.insert(key.into(), value);
    }

    /// 删除键（仅内存）
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let removed = self.data.remove(key);
        if removed.is_some() {
            self.touch_memory();
        }
        removed
    }

    /// 写盘；已保存时不做任何事
    pub fn save(&mut self) -> Result<(), KvError> {
        if self.is_saved() {
            return Ok(());
        }

        let previous = self.stamps.last_write;
        self.stamps.last_write = Some(Utc::now());
        if let Err(e) = self.write_file() {
            self.stamps.last_write = previous;
            self.report_error(&format!(
                "Error saving data to {}: {}",
                self.path.display(),
                e
            ));
            return Err(e);
        }
        Ok(())
    }

    /// 从文件读入，替换内存中的内容
    ///
    /// 内存中有未保存的内容且 `overwrite` 为 false 时记录 ERROR 并返回 `UnsavedChanges`
    pub fn load(&mut self, overwrite: bool) -> Result<(), KvError> {
        if !self.is_saved() && !overwrite {
            self.report_error("Loading will overwrite the in-memory updates.");
            return Err(KvError::UnsavedChanges(self.path.clone()));
        }
        self.read_file()
    }
}

impl<V> PersistedDict<V> {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 文件存在、有写盘记录且之后没有内存更新
    pub fn is_saved(&self) -> bool {
        if !self.path.exists() {
            return false;
        }
        match (self.stamps.last_write, self.stamps.last_memory_update) {
            (None, _) => false,
            (Some(write), Some(update)) => update <= write,
            (Some(_), None) => true,
        }
    }

    /// 按键排序的所有键
    pub fn keys(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn timestamps(&self) -> &Timestamps {
        &self.stamps
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.stamps.first
    }

    pub fn last_read_timestamp(&self) -> Option<DateTime<Utc>> {
        self.stamps.last_read
    }

    pub fn last_memory_update_timestamp(&self) -> Option<DateTime<Utc>> {
        self.stamps.last_memory_update
    }

    pub fn last_write_timestamp(&self) -> Option<DateTime<Utc>> {
        self.stamps.last_write
    }
}

impl<V: fmt::Debug> fmt::Display for PersistedDict<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PersistedDict: File:{}", self.path.display())?;
        let saved = if self.is_saved() { "Yes ✅" } else { "No ❌" };
        writeln!(f, "Is the file saved: {}", saved)?;
        for (key, value) in &self.data {
            writeln!(f, "{}: {:?}", key, value)?;
        }
        Ok(())
    }
}
