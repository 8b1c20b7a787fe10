//! 条目处理上下文
//!
//! 封装"我正在处理第几页的第几个视频"这一信息，只用于日志前缀

use std::fmt::Display;

#[derive(Debug, Clone)]
pub struct ItemCtx {
    /// 页码（从 1 开始）
    pub page_index: usize,
    /// 条目在本页中的序号（从 1 开始）
    pub item_index: usize,
    /// 本页要处理的条目数
    pub total: usize,
    /// 卡片上的 UP 主名，读到之前为空
    pub uploader: Option<String>,
}

impl ItemCtx {
    pub fn new(page_index: usize, item_index: usize, total: usize) -> Self {
        Self {
            page_index,
            item_index,
            total,
            uploader: None,
        }
    }

    pub fn with_uploader(mut self, name: impl Into<String>) -> Self {
        self.uploader = Some(name.into());
        self
    }
}

impl Display for ItemCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[第 {} 页 #{}/{}",
            self.page_index, self.item_index, self.total
        )?;
        if let Some(name) = &self.uploader {
            write!(f, " {}", name)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let ctx = ItemCtx::new(2, 3, 30);
        assert_eq!(ctx.to_string(), "[第 2 页 #3/30]");
        assert_eq!(ctx.with_uploader("老番茄").to_string(), "[第 2 页 #3/30 老番茄]");
    }
}
