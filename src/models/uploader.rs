use serde::{Deserialize, Serialize};

use crate::infrastructure::selectors::TITLE_SUFFIX;
use crate::infrastructure::Locator;

/// 搜索结果中的候选视频（只在单条处理期间存在）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateVideo {
    pub title: String,
    pub tags: Vec<String>,
}

impl CandidateVideo {
    /// 由详情页标题构建，去掉站点后缀
    pub fn from_page_title(page_title: &str, tags: Vec<String>) -> Self {
        Self {
            title: clean_title(page_title),
            tags,
        }
    }
}

/// 去掉 "_哔哩哔哩_bilibili" 之类的站点后缀
pub fn clean_title(page_title: &str) -> String {
    page_title
        .split(TITLE_SUFFIX)
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// 详情页中定位到的 UP 主
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploaderRef {
    /// 显示名（去重单位）
    pub name: String,
    /// 个人空间绝对地址
    pub profile_url: String,
    /// 用于打开个人空间的链接
    pub link: Locator,
}

/// UP 主的代表视频
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopVideo {
    pub title: String,
    pub href: String,
    pub thumb: String,
}

/// 通过筛选的 UP 主
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploaderRecord {
    /// UP 主显示名
    pub uploader: String,
    /// 个人空间链接
    pub profile: String,
    /// 最多播放的若干视频
    pub videos: Vec<TopVideo>,
}
