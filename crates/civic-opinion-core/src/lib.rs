pub mod category;
pub mod config;
pub mod error;
pub mod opinion;
pub mod store;
pub mod summary;

pub use config::{Config, DEFAULT_SUMMARY_LIMIT};
pub use error::{OpinionError, Result};
pub use opinion::{Comment, NewComment, NewOpinion, Opinion, Reaction, ReactionAction};
pub use store::OpinionStore;
pub use summary::{generate_summary, CategoryGroup, SummaryGenerator};

// Category system
pub use category::{
    classify, CategoryClassifier, CategoryDef, CategoryRegistry, CategoryScore,
    ClassificationResult, BUILTIN_CATEGORIES, CATCH_ALL_CATEGORY, PLACEHOLDER_TAG,
};
