//! Category Registry
//!
//! 順序付き・不変のカテゴリ一覧。
//! プロセス起動時に一度だけ構築し、以後は読み取り専用で共有する。

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{OpinionError, Result};

use super::builtin::{CategoryDef, BUILTIN_CATEGORIES};

static BUILTIN_REGISTRY: Lazy<CategoryRegistry> = Lazy::new(|| {
    let categories: Vec<CategoryDef> = BUILTIN_CATEGORIES.iter().map(CategoryDef::from).collect();
    CategoryRegistry {
        categories: categories.into(),
    }
});

/// 順序付きカテゴリ一覧
///
/// 不変条件:
/// - 1件以上
/// - 名前は一意
/// - キーワードが空のカテゴリ（catch-all）はちょうど1件で、末尾にある
/// - catch-all 以外のキーワードは空文字を含まない
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Arc<[CategoryDef]>,
}

impl CategoryRegistry {
    /// ビルトインカテゴリ（初回呼び出し時に一度だけ構築）
    pub fn builtin() -> Self {
        BUILTIN_REGISTRY.clone()
    }

    /// 任意のカテゴリ一覧から構築（検証付き）
    pub fn from_categories(categories: Vec<CategoryDef>) -> Result<Self> {
        validate(&categories)?;
        Ok(Self {
            categories: categories.into(),
        })
    }

    /// カテゴリ定義ファイル（TOML）から構築
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let file: CategoriesFile =
            toml::from_str(&content).map_err(|e| OpinionError::ConfigParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        tracing::debug!(
            path = %path.display(),
            count = file.categories.len(),
            "loaded category file"
        );
        Self::from_categories(file.categories)
    }

    /// 全カテゴリ（登録順）
    pub fn all(&self) -> &[CategoryDef] {
        &self.categories
    }

    /// カテゴリ定義を取得
    pub fn get(&self, name: &str) -> Option<&CategoryDef> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// カテゴリ名一覧（登録順）
    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    /// フォールバック先カテゴリ
    pub fn catch_all(&self) -> &CategoryDef {
        // validate() guarantees the last entry is the catch-all
        &self.categories[self.categories.len() - 1]
    }

    /// フォールバック先カテゴリ名
    pub fn catch_all_name(&self) -> &str {
        &self.catch_all().name
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// カテゴリ定義ファイルの形式
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoriesFile {
    #[serde(default)]
    pub categories: Vec<CategoryDef>,
}

fn validate(categories: &[CategoryDef]) -> Result<()> {
    if categories.is_empty() {
        return Err(OpinionError::EmptyRegistry);
    }

    let mut seen = HashSet::new();
    for cat in categories {
        if !seen.insert(cat.name.as_str()) {
            return Err(OpinionError::DuplicateCategory {
                name: cat.name.clone(),
            });
        }
    }

    let catch_alls: Vec<&CategoryDef> = categories.iter().filter(|c| c.is_catch_all()).collect();
    match catch_alls.as_slice() {
        [] => return Err(OpinionError::MissingCatchAll),
        [only] => {
            if !categories.last().is_some_and(|last| last.name == only.name) {
                return Err(OpinionError::CatchAllNotLast {
                    name: only.name.clone(),
                });
            }
        }
        many => {
            return Err(OpinionError::MultipleCatchAll {
                names: many.iter().map(|c| c.name.clone()).collect(),
            })
        }
    }

    if let Some(cat) = categories
        .iter()
        .find(|c| c.keywords.iter().any(|k| k.trim().is_empty()))
    {
        return Err(OpinionError::EmptyKeyword {
            category: cat.name.clone(),
        });
    }

    Ok(())
}
