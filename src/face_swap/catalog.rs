//! # 目标图候选集
//!
//! 候选集在启动时固定，会话只持有其中一项的引用。
//! 通过 `ImageCatalog` trait 抽象，可替换为其它主题的图片集合。

use super::source::TargetReference;

/// 默认的节日主题目标图。
pub const FESTIVE_TARGETS: [&str; 4] = [
    "https://1250948203.rsc.cdn77.org/images/fff0778c-d7b8-4eee-b466-f956734aef66.jpg",
    "https://1250948203.rsc.cdn77.org/images/3211686b-e333-4e04-93f4-80a42d7a4e73.jpg",
    "https://1250948203.rsc.cdn77.org/images/3ddc42af-94e8-437b-967c-fe254ee070dc.jpg",
    "https://1250948203.rsc.cdn77.org/images/daa08e22-80a4-4f8e-81c2-a46758da00dd.jpg",
];

/// 目标图候选集抽象。
pub trait ImageCatalog {
    fn candidates(&self) -> &[TargetReference];

    fn get(&self, index: usize) -> Option<&TargetReference> {
        self.candidates().get(index)
    }

    fn len(&self) -> usize {
        self.candidates().len()
    }

    fn is_empty(&self) -> bool {
        self.candidates().is_empty()
    }
}

/// 静态候选集。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticCatalog {
    targets: Vec<TargetReference>,
}

impl StaticCatalog {
    /// 由地址列表构造，标签为 `<label_prefix> <序号>`（从 1 开始）。
    pub fn from_urls<I, S>(label_prefix: &str, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let targets = urls
            .into_iter()
            .enumerate()
            .map(|(index, url)| TargetReference {
                index,
                label: format!("{} {}", label_prefix, index + 1),
                url: url.into(),
            })
            .collect();
        Self { targets }
    }

    pub fn festive() -> Self {
        Self::from_urls("Christmas character", FESTIVE_TARGETS)
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::festive()
    }
}

impl ImageCatalog for StaticCatalog {
    fn candidates(&self) -> &[TargetReference] {
        &self.targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn festive_catalog_has_four_labelled_candidates() {
        let catalog = StaticCatalog::festive();

        assert_eq!(catalog.len(), 4);
        let second = catalog.get(1).expect("second candidate missing");
        assert_eq!(second.index, 1);
        assert_eq!(second.label, "Christmas character 2");
        assert_eq!(second.url, FESTIVE_TARGETS[1]);
        assert!(catalog.get(4).is_none());
    }

    #[test]
    fn empty_catalog_is_allowed() {
        let catalog = StaticCatalog::from_urls("x", Vec::<String>::new());
        assert!(catalog.is_empty());
    }
}
