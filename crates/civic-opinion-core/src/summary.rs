//! Summary Generator
//!
//! 分類済みの意見をカテゴリ別にまとめ、件数順のテキストレポートを作る。

use std::collections::HashMap;

use crate::category::{CategoryRegistry, CATCH_ALL_CATEGORY};
use crate::opinion::Opinion;

/// レポート見出し
pub const SUMMARY_HEADER: &str = "【最新意見の論点要約】";

/// 分析結果の見出し
pub const ANALYSIS_HEADER: &str = "【分析結果】";

/// カテゴリごとに表示するタイトル数
pub const TITLES_PER_GROUP: usize = 3;

/// カテゴリ別のグループ
#[derive(Debug, Clone)]
pub struct CategoryGroup<'a> {
    /// カテゴリ名
    pub name: String,
    /// 所属する意見（入力順）
    pub opinions: Vec<&'a Opinion>,
}

impl CategoryGroup<'_> {
    pub fn len(&self) -> usize {
        self.opinions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opinions.is_empty()
    }
}

/// レポート生成器
#[derive(Debug, Clone)]
pub struct SummaryGenerator {
    fallback_category: String,
}

impl SummaryGenerator {
    /// `ai_category` 未設定の意見を `fallback_category` に集計する生成器
    pub fn new(fallback_category: impl Into<String>) -> Self {
        Self {
            fallback_category: fallback_category.into(),
        }
    }

    /// レジストリの catch-all をフォールバックに使う
    pub fn from_registry(registry: &CategoryRegistry) -> Self {
        Self::new(registry.catch_all_name())
    }

    /// カテゴリ別にグループ化し、件数の多い順に並べる
    ///
    /// 同数のグループは最初に出現した順を保つ（安定ソート）。
    pub fn group<'a, I>(&self, opinions: I) -> Vec<CategoryGroup<'a>>
    where
        I: IntoIterator<Item = &'a Opinion>,
    {
        let mut groups: Vec<CategoryGroup<'a>> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for opinion in opinions {
            let name = opinion.category_or(&self.fallback_category);
            match index.get(name) {
                Some(&i) => groups[i].opinions.push(opinion),
                None => {
                    index.insert(name.to_string(), groups.len());
                    groups.push(CategoryGroup {
                        name: name.to_string(),
                        opinions: vec![opinion],
                    });
                }
            }
        }

        groups.sort_by(|a, b| b.len().cmp(&a.len()));
        groups
    }

    /// レポート文字列を生成
    pub fn generate<'a, I>(&self, opinions: I) -> String
    where
        I: IntoIterator<Item = &'a Opinion>,
    {
        let groups = self.group(opinions);
        let total: usize = groups.iter().map(CategoryGroup::len).sum();

        let mut summary = format!("{}\n\n", SUMMARY_HEADER);

        for group in groups.iter().filter(|g| !g.is_empty()) {
            summary.push_str(&format!("■ {}（{}件）\n", group.name, group.len()));
            for (i, opinion) in group.opinions.iter().take(TITLES_PER_GROUP).enumerate() {
                summary.push_str(&format!("  {}. {}\n", i + 1, opinion.title));
            }
            summary.push('\n');
        }

        summary.push_str(&format!("{}\n", ANALYSIS_HEADER));
        summary.push_str(&format!("合計{}件の市民意見が寄せられています。\n", total));
        if let Some(top) = groups.first() {
            summary.push_str(&format!(
                "最も多いカテゴリは「{}」({}件)で、",
                top.name,
                top.len()
            ));
            summary.push_str("地域の関心が高いテーマであることがわかります。");
        }

        tracing::debug!(total, groups = groups.len(), "generated summary");
        summary
    }
}

impl Default for SummaryGenerator {
    fn default() -> Self {
        Self::new(CATCH_ALL_CATEGORY)
    }
}

/// ビルトインカテゴリ前提でレポートを生成
pub fn generate_summary<'a, I>(opinions: I) -> String
where
    I: IntoIterator<Item = &'a Opinion>,
{
    SummaryGenerator::default().generate(opinions)
}
