//! 为服务方法织入调用日志
//!
//! 运行：`cargo run --example instrumented_service`
//! 日志写入 `.logs/instrumented_service/<日期>/` 下的 PROCESS.log / INFO.log 等文件

use anyhow::Result;
use emolog::aop::{init_defaults, Aop, AopConfig, Instrumented};
use emolog::instrumented;
use emolog::log::Logger;
use std::collections::HashMap;
use std::sync::Arc;

struct InventoryService {
    aop: Aop,
    stock: HashMap<String, u32>,
}

impl Instrumented for InventoryService {
    fn logger(&self) -> Option<Arc<Logger>> {
        self.aop.logger().cloned()
    }
}

impl InventoryService {
    fn new(config: AopConfig) -> Result<Self> {
        Ok(Self {
            aop: Aop::new(config)?,
            stock: HashMap::new(),
        })
    }
}

#[instrumented]
impl InventoryService {
    pub fn restock(&mut self, item: &str, count: u32) -> u32 {
        let entry = self.stock.entry(item.to_string()).or_insert(0);
        *entry += count;
        *entry
    }

    pub fn take(&mut self, item: &str, count: u32) -> Result<u32> {
        let available = self.stock.get(item).copied().unwrap_or(0);
        if available < count {
            anyhow::bail!("only {} {} left", available, item);
        }
        self.stock.insert(item.to_string(), available - count);
        Ok(available - count)
    }
}

fn main() -> Result<()> {
    init_defaults(".logs", "instrumented_service")?;

    let mut service = InventoryService::new(AopConfig::default())?;
    service.restock("apple", 10);
    service.take("apple", 4)?;

    if let Err(e) = service.take("apple", 100) {
        if let Some(logger) = service.logger() {
            emolog::error!(logger, "take failed: {}", e.to_string())?;
        }
    }

    Ok(())
}
