//! PersistedDict 的保存与重新加载
//!
//! 运行：`cargo run --example persisted_dict`

use anyhow::Result;
use emolog::aop::AopConfig;
use emolog::kv::{PersistedDict, PersistedDictConfig};

fn main() -> Result<()> {
    let config = PersistedDictConfig {
        aop: AopConfig {
            app_name: Some("persisted_dict_demo".to_string()),
            ..Default::default()
        },
        ..Default::default()
    };

    let path = std::env::temp_dir().join("emolog-demo").join("scores.bin");

    let mut scores: PersistedDict<u32> = PersistedDict::open(&path, config.clone())?;
    scores.set("alice", 42);
    scores.set("bob", 17);
    scores.save()?;
    println!("{}", scores);

    let mut reopened: PersistedDict<u32> = PersistedDict::open(&path, config)?;
    println!("alice = {:?}", reopened.get("alice"));
    println!("first created at {:?}", reopened.first_timestamp());

    Ok(())
}
