//! 基础设施层
//!
//! 持有浏览器页面，只暴露页面能力，不认识 UP 主或搜索流程。

pub mod chrome_view;
pub mod probes;
pub mod scripts;
pub mod selectors;
pub mod view;

pub use chrome_view::ChromeView;
pub use probes::{first_matching, scroll_until_stable, ScrollReport};
pub use view::{eval_as, normalize_href, Locator, NavigableView};
