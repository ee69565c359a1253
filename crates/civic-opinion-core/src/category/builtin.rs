//! Builtin Category Definitions
//!
//! コード内で定義されるビルトインカテゴリ。
//! 配列の順序が同点時の優先順位になる（先勝ち）。
//! 末尾はキーワードを持たない「その他」カテゴリ。

use serde::{Deserialize, Serialize};

/// フォールバック先となるカテゴリ名
pub const CATCH_ALL_CATEGORY: &str = "その他";

/// キーワードが一つもマッチしなかった場合のタグ（「一般提案」）
pub const PLACEHOLDER_TAG: &str = "一般提案";

/// ビルトインカテゴリ定義
pub const BUILTIN_CATEGORIES: &[BuiltinCategory] = &[
    BuiltinCategory {
        name: "交通・インフラ",
        color: "#3B82F6",
        keywords: &[
            "駐輪", "道路", "電車", "バス", "駅", "渋滞", "信号", "交通",
        ],
    },
    BuiltinCategory {
        name: "教育・子育て",
        color: "#10B981",
        keywords: &[
            "保育園",
            "学校",
            "子ども",
            "子供",
            "教育",
            "待機児童",
            "給食",
            "育児",
        ],
    },
    BuiltinCategory {
        name: "医療・福祉",
        color: "#EF4444",
        keywords: &[
            "病院",
            "医療",
            "高齢者",
            "介護",
            "福祉",
            "健康",
            "クリニック",
        ],
    },
    BuiltinCategory {
        name: "経済・雇用",
        color: "#F59E0B",
        keywords: &["仕事", "雇用", "企業", "商店街", "産業", "就職", "経済"],
    },
    BuiltinCategory {
        name: "環境・エネルギー",
        color: "#22C55E",
        keywords: &[
            "ごみ",
            "環境",
            "自然",
            "公園",
            "リサイクル",
            "再エネ",
            "ゴミ",
        ],
    },
    BuiltinCategory {
        name: "文化・観光",
        color: "#8B5CF6",
        keywords: &["観光", "後楽園", "文化", "イベント", "祭り", "歴史", "まつり"],
    },
    BuiltinCategory {
        name: "防災・安全",
        color: "#DC2626",
        keywords: &["防災", "災害", "地震", "避難", "消防", "治安", "安全"],
    },
    BuiltinCategory {
        name: CATCH_ALL_CATEGORY,
        color: "#6B7280",
        keywords: &[],
    },
];

/// ビルトインカテゴリの静的定義
#[derive(Debug, Clone)]
pub struct BuiltinCategory {
    /// カテゴリ名（一意識別子、分類ラベルを兼ねる）
    pub name: &'static str,
    /// 表示色（マッチングには使わない）
    pub color: &'static str,
    /// キーワード（空なら catch-all）
    pub keywords: &'static [&'static str],
}

/// ランタイムカテゴリ定義
///
/// ビルトインまたはカテゴリ定義ファイルから構築される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDef {
    /// カテゴリ名
    pub name: String,
    /// 表示色（`#RRGGBB`）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// キーワード（定義順に照合される）
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CategoryDef {
    /// キーワードを持たないカテゴリか
    pub fn is_catch_all(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl From<&BuiltinCategory> for CategoryDef {
    fn from(builtin: &BuiltinCategory) -> Self {
        Self {
            name: builtin.name.to_string(),
            color: Some(builtin.color.to_string()),
            keywords: builtin.keywords.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_categories_end_with_catch_all() {
        let last = BUILTIN_CATEGORIES.last().unwrap();
        assert_eq!(last.name, CATCH_ALL_CATEGORY);
        assert!(last.keywords.is_empty());
        assert_eq!(
            BUILTIN_CATEGORIES
                .iter()
                .filter(|c| c.keywords.is_empty())
                .count(),
            1
        );
    }

    #[test]
    fn test_builtin_table_contents() {
        let expected: Vec<(&str, &str, Vec<&str>)> = vec![
            (
                "交通・インフラ",
                "#3B82F6",
                vec!["駐輪", "道路", "電車", "バス", "駅", "渋滞", "信号", "交通"],
            ),
            (
                "教育・子育て",
                "#10B981",
                vec!["保育園", "学校", "子ども", "子供", "教育", "待機児童", "給食", "育児"],
            ),
            (
                "医療・福祉",
                "#EF4444",
                vec!["病院", "医療", "高齢者", "介護", "福祉", "健康", "クリニック"],
            ),
            (
                "経済・雇用",
                "#F59E0B",
                vec!["仕事", "雇用", "企業", "商店街", "産業", "就職", "経済"],
            ),
            (
                "環境・エネルギー",
                "#22C55E",
                vec!["ごみ", "環境", "自然", "公園", "リサイクル", "再エネ", "ゴミ"],
            ),
            (
                "文化・観光",
                "#8B5CF6",
                vec!["観光", "後楽園", "文化", "イベント", "祭り", "歴史", "まつり"],
            ),
            (
                "防災・安全",
                "#DC2626",
                vec!["防災", "災害", "地震", "避難", "消防", "治安", "安全"],
            ),
            (CATCH_ALL_CATEGORY, "#6B7280", vec![]),
        ];

        assert_eq!(BUILTIN_CATEGORIES.len(), expected.len());
        for (builtin, (name, color, keywords)) in BUILTIN_CATEGORIES.iter().zip(&expected) {
            assert_eq!(builtin.name, *name);
            assert_eq!(builtin.color, *color, "color of {}", name);
            assert_eq!(builtin.keywords, keywords.as_slice(), "keywords of {}", name);
        }
    }

    #[test]
    fn test_category_def_from_builtin() {
        let builtin = &BUILTIN_CATEGORIES[0];
        let def = CategoryDef::from(builtin);
        assert_eq!(def.name, "交通・インフラ");
        assert_eq!(def.color.as_deref(), Some("#3B82F6"));
        assert_eq!(def.keywords.first().map(String::as_str), Some("駐輪"));
        assert!(!def.is_catch_all());
    }
}
