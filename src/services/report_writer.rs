//! 报告写入服务 - 业务能力层
//!
//! 只负责"把收录结果写成文件"，不关心抓取流程。
//! 每次运行生成一对文件：`<关键词>_<时间>.html` 与同名 `.json`。

use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::CrawlResult;
use crate::models::UploaderRecord;

/// 写出的报告文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub html: PathBuf,
    pub json: PathBuf,
}

/// 报告写入服务
pub struct ReportWriter {
    reports_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
        }
    }

    /// 写出报告；调用方保证 `records` 非空
    pub fn write(&self, records: &[UploaderRecord], query: &str) -> CrawlResult<ReportPaths> {
        let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        self.write_with_stamp(records, query, &timestamp)
    }

    fn write_with_stamp(
        &self,
        records: &[UploaderRecord],
        query: &str,
        timestamp: &str,
    ) -> CrawlResult<ReportPaths> {
        fs::create_dir_all(&self.reports_dir)?;

        let stem = format!("{}_{}", sanitize_file_stem(query), timestamp);
        let html = self.reports_dir.join(format!("{}.html", stem));
        let json = self.reports_dir.join(format!("{}.json", stem));

        debug!("写入报告: {} 个 UP 主 -> {}", records.len(), html.display());
        fs::write(&html, render_report(records, query))?;
        fs::write(&json, serde_json::to_string_pretty(records)?)?;

        info!("📄 报告已保存至: {}", html.display());
        Ok(ReportPaths { html, json })
    }
}

/// 文件名中不能出现的字符替换为下划线
fn sanitize_file_stem(query: &str) -> String {
    let stem: String = query
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() || c.is_control() => '_',
            c => c,
        })
        .collect();

    if stem.is_empty() {
        "report".to_string()
    } else {
        stem
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// 渲染 HTML 报告：每个 UP 主一张卡片
pub fn render_report(records: &[UploaderRecord], query: &str) -> String {
    let query = html_escape(query);

    let mut cards = String::new();
    for record in records {
        let mut videos = String::new();
        for video in &record.videos {
            let href = html_escape(&video.href);
            let title = html_escape(&video.title);
            videos.push_str(&format!(
                r#"        <li><a href="{href}" target="_blank"><img src="{thumb}" alt="{title}" loading="lazy"><span>{title}</span></a></li>
"#,
                href = href,
                thumb = html_escape(&video.thumb),
                title = title,
            ));
        }

        cards.push_str(&format!(
            r#"  <section class="uploader">
    <h2><a href="{profile}" target="_blank">{name}</a></h2>
    <ul class="videos">
{videos}    </ul>
  </section>
"#,
            profile = html_escape(&record.profile),
            name = html_escape(&record.uploader),
            videos = videos,
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
  <meta charset="utf-8">
  <title>{query} - UP 主推荐</title>
  <style>
    body {{ font-family: sans-serif; margin: 2rem; background: #f6f7f8; }}
    .uploader {{ background: #fff; border-radius: 8px; padding: 1rem; margin-bottom: 1.5rem; }}
    .videos {{ display: flex; flex-wrap: wrap; gap: 1rem; list-style: none; padding: 0; }}
    .videos li {{ width: 200px; }}
    .videos img {{ width: 200px; border-radius: 4px; display: block; }}
  </style>
</head>
<body>
  <h1>搜索: {query}</h1>
  <p>共 {count} 个 UP 主</p>
{cards}</body>
</html>
"#,
        query = query,
        count = records.len(),
        cards = cards,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TopVideo;

    fn record() -> UploaderRecord {
        UploaderRecord {
            uploader: "<键盘&侠>".into(),
            profile: "https://space.bilibili.com/1".into(),
            videos: vec![TopVideo {
                title: "\"轴体\" 横评".into(),
                href: "https://www.bilibili.com/video/BV1".into(),
                thumb: "https://i0.hdslb.com/1.jpg".into(),
            }],
        }
    }

    #[test]
    fn test_render_escapes_text() {
        let html = render_report(&[record()], "键盘 <script>");
        assert!(html.contains("&lt;键盘&amp;侠&gt;"));
        assert!(html.contains("&quot;轴体&quot; 横评"));
        assert!(html.contains("搜索: 键盘 &lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("共 1 个 UP 主"));
    }

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize_file_stem("机械 键盘/评测"), "机械_键盘_评测");
        assert_eq!(sanitize_file_stem("   "), "report");
    }

    #[test]
    fn test_write_creates_html_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path().join("reports"));

        let paths = writer
            .write_with_stamp(&[record()], "键盘", "2026-01-01_00-00-00")
            .unwrap();

        assert_eq!(
            paths.html.file_name().unwrap().to_str().unwrap(),
            "键盘_2026-01-01_00-00-00.html"
        );
        let json = fs::read_to_string(&paths.json).unwrap();
        let parsed: Vec<UploaderRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec![record()]);
        assert!(fs::read_to_string(&paths.html).unwrap().contains("BV1"));
    }
}
