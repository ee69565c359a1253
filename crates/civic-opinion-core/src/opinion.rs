//! Opinion records
//!
//! 市民意見・コメント・リアクションのデータ型。
//! JSON 上のフィールド名は元のレコード形式（snake_case）に合わせる。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::ClassificationResult;

/// 市民意見
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opinion {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    /// 投稿者が付けたタグ（分類器のタグとは別）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

impl Opinion {
    /// 未分類の意見を作成
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            author_name: None,
            tags: None,
            ai_category: None,
            ai_tags: None,
            created_at,
        }
    }

    /// 分類結果を反映（既存の結果は上書き）
    pub fn apply_classification(&mut self, result: &ClassificationResult) {
        self.ai_category = Some(result.category.clone());
        self.ai_tags = Some(result.tags.clone());
    }

    pub fn is_classified(&self) -> bool {
        self.ai_category.is_some()
    }

    /// 集計に使うカテゴリ名（未設定・空文字は `fallback`）
    pub fn category_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.ai_category.as_deref() {
            Some(cat) if !cat.is_empty() => cat,
            _ => fallback,
        }
    }
}

/// 新規投稿の入力
#[derive(Debug, Clone, Default)]
pub struct NewOpinion {
    pub title: String,
    pub content: String,
    pub author_name: Option<String>,
    pub tags: Vec<String>,
}

/// 意見へのコメント
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub opinion_id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    pub user_identifier: String,
    pub created_at: DateTime<Utc>,
}

/// コメント投稿の入力
#[derive(Debug, Clone, Default)]
pub struct NewComment {
    pub content: String,
    pub author_name: Option<String>,
    pub user_identifier: String,
}

/// 意見へのリアクション（同一ユーザー・同一種別は1件まで）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub id: String,
    pub opinion_id: String,
    pub reaction_type: String,
    pub user_identifier: String,
    pub created_at: DateTime<Utc>,
}

/// リアクションのトグル結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionAction {
    Added,
    Removed,
}

impl std::fmt::Display for ReactionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Removed => write!(f, "removed"),
        }
    }
}
