use super::uploader::UploaderRecord;

/// 追加结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended,
    /// 该 UP 主已收录过，未追加
    Duplicate,
    /// 已达配额，未追加
    QuotaFull,
}

/// 有上限的结果集合，只能追加
///
/// 不变式：`len() <= quota()`。
#[derive(Debug, Clone)]
pub struct ResultCollection {
    records: Vec<UploaderRecord>,
    quota: usize,
}

impl ResultCollection {
    pub fn new(quota: usize) -> Self {
        Self {
            records: Vec::with_capacity(quota),
            quota,
        }
    }

    pub fn push(&mut self, record: UploaderRecord) -> AppendOutcome {
        if self.is_full() {
            return AppendOutcome::QuotaFull;
        }
        self.records.push(record);
        AppendOutcome::Appended
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.quota
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn quota(&self) -> usize {
        self.quota
    }

    pub fn records(&self) -> &[UploaderRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<UploaderRecord> {
        self.records
    }
}
