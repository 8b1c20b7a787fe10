//! 站点相关的选择器与文案

// --- 搜索结果页 ---

/// 结果卡片中直接位于信息区的视频链接（每张卡片有两个指向同一视频的 <a>）
pub const RESULT_VIDEO_LINK: &str =
    "div.bili-video-card__wrap .bili-video-card__info--right > a[href*='/video/']";
pub const RESULT_AUTHOR: &str = "span.bili-video-card__info--author";
pub const RESULT_TAB: &str = "span.vui_tabs--nav-text";
pub const RESULT_TAB_VIDEO_TEXT: &str = "视频";
pub const NEXT_PAGE_BUTTON: &str = "button.vui_pagenation--btn-side";
pub const NEXT_PAGE_TEXT: &str = "下一页";

// --- 视频详情页 ---

pub const VIDEO_TAG: &str = "div.ordinary-tag a.tag-link";
pub const UP_PANEL: &str = ".up-panel-container";
/// 单人投稿为 up-name，合作投稿为 staff-name
pub const UP_NAME_LINK: &str = ".up-panel-container a.staff-name, .up-panel-container a.up-name";
pub const UP_AVATAR_LINK: &str = ".up-panel-container a[href*='space.bilibili.com']";
pub const UP_AVATAR_IMG: &str = ".up-panel-container a[href*='space.bilibili.com'] img";
/// 标题后缀，如 "xxx_哔哩哔哩_bilibili"
pub const TITLE_SUFFIX: &str = "_哔哩哔哩";

// --- UP 主空间 ---

pub const ERROR_CODE_MARKER: &str = "[class*=\"code\"]";
pub const ERROR_CODE_NOT_FOUND: &str = "404";
pub const NAV_TAB: &str = "a.nav-tab__item";
pub const NAV_TAB_UPLOADS_TEXT: &str = "投稿";
pub const UPLOAD_CAPTION: &str = "div.bili-video-card__title a";
pub const SORT_FILTER: &str = "div.radio-filter__item";
pub const SORT_MOST_VIEWED_TEXT: &str = "最多播放";

/// 切换到"最多播放"后依次尝试的视频卡片选择器，先命中者为准
pub const MOST_VIEWED_CARD_PROBES: [&str; 3] = [
    "div.upload-video-card_main a[href*='/video/']",
    "div.upload-video-card__main a[href*='/video/']",
    "a[href*='/video/'][target='_blank']",
];
