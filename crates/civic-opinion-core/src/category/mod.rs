//! # Category Module
//!
//! 市民意見をキーワードマッチングで固定カテゴリに分類する機能を提供する。
//!
//! ## 設計目的
//!
//! カテゴリ表と照合アルゴリズムはこのモジュールにだけ定義し、
//! CLI・サーバなどすべての呼び出し元から共有する。
//!
//! - **Registry**: 順序付き・不変のカテゴリ一覧（末尾は catch-all）
//! - **Classifier**: タイトル + 本文からカテゴリ1件とタグ最大3件を決定
//!
//! ## モジュール構成
//!
//! - `builtin`: ビルトインカテゴリ定義
//! - `registry`: 検証済みカテゴリ一覧
//! - `classifier`: 分類器
//!
//! ## 使用例
//!
//! ```rust
//! use civic_opinion_core::category::{CategoryClassifier, CategoryRegistry, CATCH_ALL_CATEGORY};
//!
//! let registry = CategoryRegistry::builtin();
//! assert_eq!(registry.catch_all_name(), CATCH_ALL_CATEGORY);
//!
//! let classifier = CategoryClassifier::new(registry);
//! let result = classifier.classify("駐輪場の改善", "駅前の駐輪スペースが足りません");
//! assert_eq!(result.category, "交通・インフラ");
//! assert_eq!(result.tags, vec!["駐輪", "駅"]);
//! ```

mod builtin;
mod classifier;
mod registry;

// Re-exports
pub use builtin::{
    BuiltinCategory, CategoryDef, BUILTIN_CATEGORIES, CATCH_ALL_CATEGORY, PLACEHOLDER_TAG,
};
pub use classifier::{classify, CategoryClassifier, CategoryScore, ClassificationResult, MAX_TAGS};
pub use registry::{CategoriesFile, CategoryRegistry};
