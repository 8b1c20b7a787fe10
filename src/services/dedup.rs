//! UP 主去重
//!
//! 两个集合分开维护：
//! - processed：评估过的 UP 主（无论结果），不再打开第二次
//! - accepted：已收录的 UP 主，不会重复追加
//!
//! 去重单位是显示名，同名的不同账号会被合并。

use std::collections::HashSet;

#[derive(Debug, Default, Clone)]
pub struct Deduplicator {
    processed: HashSet<String>,
    accepted: HashSet<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 检查并标记：首次出现返回 true，同时记为已处理
    pub fn should_process(&mut self, identity: &str) -> bool {
        self.processed.insert(identity.to_string())
    }

    /// 记为已收录：首次收录返回 true
    pub fn accept(&mut self, identity: &str) -> bool {
        self.processed.insert(identity.to_string());
        self.accepted.insert(identity.to_string())
    }

    pub fn is_processed(&self, identity: &str) -> bool {
        self.processed.contains(identity)
    }

    pub fn is_accepted(&self, identity: &str) -> bool {
        self.accepted.contains(identity)
    }

    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }
}
