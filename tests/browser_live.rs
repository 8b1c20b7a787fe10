//! 需要本机浏览器的测试，默认忽略：cargo test -- --ignored

use std::sync::Arc;

use up_finder::browser::connect_to_browser_and_page;
use up_finder::config::Config;
use up_finder::infrastructure::selectors::RESULT_VIDEO_LINK;
use up_finder::{ChromeView, Locator, NavigableView};

#[tokio::test]
#[ignore] // 需要先以 --remote-debugging-port=9222 启动 Chrome
async fn test_browser_connection() {
    let config = Config::default();

    let result = connect_to_browser_and_page(config.browser_debug_port, "about:blank").await;

    assert!(result.is_ok(), "应该能够成功连接浏览器");
}

#[tokio::test]
#[ignore]
async fn test_search_page_lists_videos() {
    let config = Config::default();
    let (browser, page) = connect_to_browser_and_page(config.browser_debug_port, "about:blank")
        .await
        .expect("连接浏览器失败");
    let view = ChromeView::new(Arc::new(browser), page);

    view.navigate("https://search.bilibili.com/all?keyword=%E6%9C%BA%E6%A2%B0%E9%94%AE%E7%9B%98")
        .await
        .expect("打开搜索页失败");

    let links = Locator::new(RESULT_VIDEO_LINK);
    view.wait_for(&links, config.element_timeout())
        .await
        .expect("搜索结果未加载");
    let count = view.count(&links).await.unwrap();
    println!("找到 {} 个视频", count);
    assert!(count > 0);

    view.close().await.unwrap();
}
