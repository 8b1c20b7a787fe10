//! 提示词模板
//!
//! 配置了目录且目录中存在 `<name>.txt` 时读取文件，否则使用编译进程序的内置模板。

use std::fmt::Display;
use std::path::PathBuf;

use tracing::debug;

use crate::error::CrawlResult;

/// 提示词种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    ExpandSearchQuery,
    DecideTargetVideoRelevant,
    DecideUserSpaceVideoRelevant,
}

impl PromptKind {
    /// 模板名（也是文件名，不含扩展名）
    pub fn name(self) -> &'static str {
        match self {
            PromptKind::ExpandSearchQuery => "expand_search_query",
            PromptKind::DecideTargetVideoRelevant => "decide_target_video_relevant",
            PromptKind::DecideUserSpaceVideoRelevant => "decide_user_space_video_relevant",
        }
    }

    fn builtin(self) -> &'static str {
        match self {
            PromptKind::ExpandSearchQuery => include_str!("../../prompts/expand_search_query.txt"),
            PromptKind::DecideTargetVideoRelevant => {
                include_str!("../../prompts/decide_target_video_relevant.txt")
            }
            PromptKind::DecideUserSpaceVideoRelevant => {
                include_str!("../../prompts/decide_user_space_video_relevant.txt")
            }
        }
    }
}

impl Display for PromptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 提示词仓库
#[derive(Debug, Clone, Default)]
pub struct PromptStore {
    dir: Option<PathBuf>,
}

impl PromptStore {
    /// 只使用内置模板
    pub fn builtin() -> Self {
        Self { dir: None }
    }

    /// 优先从目录读取
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// 读取模板
    pub fn load(&self, kind: PromptKind) -> CrawlResult<String> {
        if let Some(dir) = &self.dir {
            let path = dir.join(format!("{}.txt", kind.name()));
            if path.exists() {
                debug!("读取提示词文件: {}", path.display());
                let content = std::fs::read_to_string(&path)?;
                return Ok(content.trim().to_string());
            }
        }
        Ok(kind.builtin().trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_templates_are_not_empty() {
        let store = PromptStore::builtin();
        for kind in [
            PromptKind::ExpandSearchQuery,
            PromptKind::DecideTargetVideoRelevant,
            PromptKind::DecideUserSpaceVideoRelevant,
        ] {
            assert!(!store.load(kind).unwrap().is_empty(), "{} 为空", kind);
        }
    }

    #[test]
    fn test_directory_overrides_builtin_when_file_exists() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("decide_target_video_relevant.txt"),
            "  自定义视频判断  \n",
        )
        .unwrap();

        let store = PromptStore::from_dir(dir.path());
        assert_eq!(
            store.load(PromptKind::DecideTargetVideoRelevant).unwrap(),
            "自定义视频判断"
        );
        // 目录中没有的模板回退到内置
        assert_eq!(
            store.load(PromptKind::ExpandSearchQuery).unwrap(),
            PromptStore::builtin()
                .load(PromptKind::ExpandSearchQuery)
                .unwrap()
        );
    }
}
