//! 抓取会话状态
//!
//! 一次抓取内共享的可变状态：结果集合 + 去重集合。
//! 单线程顺序处理，检查与追加之间没有并发修改，不需要加锁。

use crate::models::{AppendOutcome, ResultCollection, UploaderRecord};
use crate::services::Deduplicator;

#[derive(Debug)]
pub struct CrawlSession {
    results: ResultCollection,
    pub dedup: Deduplicator,
}

impl CrawlSession {
    pub fn new(quota: usize) -> Self {
        Self {
            results: ResultCollection::new(quota),
            dedup: Deduplicator::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.results.is_full()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn quota(&self) -> usize {
        self.results.quota()
    }

    pub fn records(&self) -> &[UploaderRecord] {
        self.results.records()
    }

    /// 收录一个 UP 主：已收录过或配额已满时不追加
    pub fn try_append(&mut self, record: UploaderRecord) -> AppendOutcome {
        if self.dedup.is_accepted(&record.uploader) {
            return AppendOutcome::Duplicate;
        }
        if self.results.is_full() {
            return AppendOutcome::QuotaFull;
        }

        self.dedup.accept(&record.uploader);
        self.results.push(record)
    }

    pub fn into_records(self) -> Vec<UploaderRecord> {
        self.results.into_records()
    }
}
