//! Category Classifier
//!
//! 意見のタイトルと本文を CategoryRegistry のキーワードで採点し、
//! カテゴリ1件とタグ（最大3件）を決定する。

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::builtin::PLACEHOLDER_TAG;
use super::registry::CategoryRegistry;

/// タグの最大件数
pub const MAX_TAGS: usize = 3;

static BUILTIN_CLASSIFIER: Lazy<CategoryClassifier> =
    Lazy::new(|| CategoryClassifier::new(CategoryRegistry::builtin()));

/// 分類結果
///
/// `tags` は常に1〜3件で重複なし。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// 選ばれたカテゴリ名
    pub category: String,
    /// マッチしたキーワード（なければプレースホルダ）
    pub tags: Vec<String>,
}

/// カテゴリごとの採点結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryScore {
    /// カテゴリ名
    pub name: String,
    /// マッチしたキーワード数
    pub score: usize,
    /// マッチしたキーワード（定義順、元の表記）
    pub matched: Vec<String>,
}

/// キーワード分類器
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    registry: CategoryRegistry,
    folded_keywords: Vec<Vec<String>>,
}

impl CategoryClassifier {
    /// 新規分類器を作成
    pub fn new(registry: CategoryRegistry) -> Self {
        let folded_keywords = registry
            .all()
            .iter()
            .map(|cat| cat.keywords.iter().map(|k| k.to_lowercase()).collect())
            .collect();

        Self {
            registry,
            folded_keywords,
        }
    }

    /// ビルトインカテゴリのみで分類器を構築
    pub fn builtin() -> Self {
        BUILTIN_CLASSIFIER.clone()
    }

    /// 使用中のカテゴリ一覧
    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// 全カテゴリを登録順に採点
    pub fn score(&self, title: &str, content: &str) -> Vec<CategoryScore> {
        let text = search_text(title, content);

        self.registry
            .all()
            .iter()
            .zip(&self.folded_keywords)
            .map(|(cat, folded)| {
                let matched: Vec<String> = cat
                    .keywords
                    .iter()
                    .zip(folded)
                    .filter(|(_, needle)| text.contains(needle.as_str()))
                    .map(|(keyword, _)| keyword.clone())
                    .collect();
                CategoryScore {
                    name: cat.name.clone(),
                    score: matched.len(),
                    matched,
                }
            })
            .collect()
    }

    /// 意見を分類
    ///
    /// 最高得点のカテゴリを選ぶ。得点は「より大きい」場合のみ更新するので、
    /// 同点なら登録順で先のカテゴリが残り、全カテゴリ0点なら catch-all になる。
    pub fn classify(&self, title: &str, content: &str) -> ClassificationResult {
        let scores = self.score(title, content);

        let mut max_score = 0;
        let mut selected = self.registry.catch_all_name();
        for s in &scores {
            if s.score > max_score {
                max_score = s.score;
                selected = s.name.as_str();
            }
        }

        let tags = extract_tags(scores.iter().flat_map(|s| s.matched.iter()));

        tracing::debug!(
            category = selected,
            score = max_score,
            tags = ?tags,
            "classified opinion"
        );

        ClassificationResult {
            category: selected.to_string(),
            tags,
        }
    }
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::builtin()
    }
}

/// ビルトインカテゴリで分類
pub fn classify(title: &str, content: &str) -> ClassificationResult {
    BUILTIN_CLASSIFIER.classify(title, content)
}

/// 照合用テキスト（タイトル + 空白 + 本文、小文字化）
fn search_text(title: &str, content: &str) -> String {
    format!("{} {}", title, content).to_lowercase()
}

/// 出現順を保って重複を除き、先頭 MAX_TAGS 件を取る
fn extract_tags<'a>(candidates: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let tags: Vec<String> = candidates
        .filter(|tag| seen.insert(*tag))
        .take(MAX_TAGS)
        .cloned()
        .collect();

    if tags.is_empty() {
        vec![PLACEHOLDER_TAG.to_string()]
    } else {
        tags
    }
}
