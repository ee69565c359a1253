//! Opinion store
//!
//! Manages opinions, comments and reactions in ~/.civic-opinion/opinions.json

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::ClassificationResult;
use crate::error::{OpinionError, Result};
use crate::opinion::{Comment, NewComment, NewOpinion, Opinion, Reaction, ReactionAction};

/// File-backed opinion store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpinionStore {
    #[serde(default)]
    pub opinions: Vec<Opinion>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

impl OpinionStore {
    const FILENAME: &'static str = "opinions.json";

    /// Store file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(Self::FILENAME)
    }

    /// Load store from base directory (empty if missing)
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = Self::path(base_dir);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let store: Self = serde_json::from_str(&content).map_err(|e| OpinionError::StoreParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        tracing::debug!(
            path = %path.display(),
            opinions = store.opinions.len(),
            "loaded opinion store"
        );
        Ok(store)
    }

    /// Save store to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        fs::create_dir_all(base_dir)?;
        let content = serde_json::to_string_pretty(self)?;
        fs::write(Self::path(base_dir), content)?;
        Ok(())
    }

    /// Add a new opinion (unclassified)
    pub fn insert(&mut self, new: NewOpinion) -> &Opinion {
        let mut opinion = Opinion::new(Uuid::new_v4().to_string(), new.title, new.content, Utc::now());
        opinion.author_name = new.author_name.filter(|a| !a.trim().is_empty());
        if !new.tags.is_empty() {
            opinion.tags = Some(new.tags);
        }

        tracing::info!(id = %opinion.id, "opinion submitted");
        self.opinions.push(opinion);
        &self.opinions[self.opinions.len() - 1]
    }

    /// Get an opinion by id
    pub fn get(&self, id: &str) -> Option<&Opinion> {
        self.opinions.iter().find(|o| o.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Opinion> {
        self.opinions
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| OpinionError::OpinionNotFound { id: id.to_string() })
    }

    fn require(&self, id: &str) -> Result<&Opinion> {
        self.get(id)
            .ok_or_else(|| OpinionError::OpinionNotFound { id: id.to_string() })
    }

    /// Store a classification result against an opinion
    pub fn set_classification(&mut self, id: &str, result: &ClassificationResult) -> Result<()> {
        let opinion = self.get_mut(id)?;
        if let Some(previous) = opinion.ai_category.as_deref() {
            if previous != result.category {
                tracing::warn!(
                    id,
                    from = previous,
                    to = %result.category,
                    "overwriting classification"
                );
            }
        }
        opinion.apply_classification(result);
        tracing::info!(id, category = %result.category, "opinion classified");
        Ok(())
    }

    /// Most recent opinions, newest first
    pub fn recent(&self, limit: usize) -> Vec<&Opinion> {
        let mut opinions: Vec<&Opinion> = self.opinions.iter().collect();
        opinions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        opinions.truncate(limit);
        opinions
    }

    /// Add a comment to an existing opinion
    pub fn add_comment(&mut self, opinion_id: &str, new: NewComment) -> Result<&Comment> {
        self.require(opinion_id)?;

        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            opinion_id: opinion_id.to_string(),
            content: new.content,
            author_name: new.author_name.filter(|a| !a.trim().is_empty()),
            user_identifier: new.user_identifier,
            created_at: Utc::now(),
        };

        tracing::info!(opinion_id, comment_id = %comment.id, "comment added");
        self.comments.push(comment);
        Ok(&self.comments[self.comments.len() - 1])
    }

    /// Comments on an opinion, oldest first
    pub fn comments_for(&self, opinion_id: &str) -> Vec<&Comment> {
        let mut comments: Vec<&Comment> = self
            .comments
            .iter()
            .filter(|c| c.opinion_id == opinion_id)
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        comments
    }

    /// Toggle a reaction: remove it if the user already reacted with this type, add it otherwise
    pub fn toggle_reaction(
        &mut self,
        opinion_id: &str,
        reaction_type: &str,
        user_identifier: &str,
    ) -> Result<ReactionAction> {
        self.require(opinion_id)?;

        let existing = self.reactions.iter().position(|r| {
            r.opinion_id == opinion_id
                && r.user_identifier == user_identifier
                && r.reaction_type == reaction_type
        });

        let action = match existing {
            Some(i) => {
                self.reactions.remove(i);
                ReactionAction::Removed
            }
            None => {
                self.reactions.push(Reaction {
                    id: Uuid::new_v4().to_string(),
                    opinion_id: opinion_id.to_string(),
                    reaction_type: reaction_type.to_string(),
                    user_identifier: user_identifier.to_string(),
                    created_at: Utc::now(),
                });
                ReactionAction::Added
            }
        };

        tracing::info!(opinion_id, reaction_type, %action, "reaction toggled");
        Ok(action)
    }

    /// Reaction counts per type
    pub fn reaction_counts(&self, opinion_id: &str) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for reaction in self.reactions.iter().filter(|r| r.opinion_id == opinion_id) {
            *counts.entry(reaction.reaction_type.clone()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn new_opinion(title: &str, content: &str) -> NewOpinion {
        NewOpinion {
            title: title.to_string(),
            content: content.to_string(),
            ..Default::default()
        }
    }

    fn comment(content: &str, user: &str) -> NewComment {
        NewComment {
            content: content.to_string(),
            author_name: None,
            user_identifier: user.to_string(),
        }
    }

    #[test]
    fn test_load_missing_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = OpinionStore::load(temp.path()).unwrap();
        assert!(store.opinions.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let mut store = OpinionStore::default();
        let id = store.insert(new_opinion("駐輪場", "駅前")).id.clone();
        store
            .set_classification(
                &id,
                &ClassificationResult {
                    category: "交通・インフラ".to_string(),
                    tags: vec!["駐輪".to_string(), "駅".to_string()],
                },
            )
            .unwrap();
        store.save(temp.path()).unwrap();

        let loaded = OpinionStore::load(temp.path()).unwrap();
        let opinion = loaded.get(&id).unwrap();
        assert_eq!(opinion.title, "駐輪場");
        assert_eq!(opinion.ai_category.as_deref(), Some("交通・インフラ"));
        assert_eq!(
            opinion.ai_tags,
            Some(vec!["駐輪".to_string(), "駅".to_string()])
        );
    }

    #[test]
    fn test_load_corrupt_file() {
        let temp = TempDir::new().unwrap();
        fs::write(OpinionStore::path(temp.path()), "{ not json").unwrap();
        let err = OpinionStore::load(temp.path()).unwrap_err();
        assert!(matches!(err, OpinionError::StoreParse { .. }));
    }

    #[test]
    fn test_insert_drops_blank_author_and_empty_tags() {
        let mut store = OpinionStore::default();
        let mut new = new_opinion("t", "c");
        new.author_name = Some("  ".to_string());
        let opinion = store.insert(new);
        assert!(opinion.author_name.is_none());
        assert!(opinion.tags.is_none());
        assert!(!opinion.is_classified());
    }

    #[test]
    fn test_set_classification_unknown_id() {
        let mut store = OpinionStore::default();
        let err = store
            .set_classification(
                "missing",
                &ClassificationResult {
                    category: "その他".to_string(),
                    tags: vec!["一般提案".to_string()],
                },
            )
            .unwrap_err();
        assert!(matches!(err, OpinionError::OpinionNotFound { id } if id == "missing"));
    }

    #[test]
    fn test_recent_newest_first_and_limited() {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let mut store = OpinionStore::default();
        for (i, offset) in [2, 0, 3, 1].into_iter().enumerate() {
            store.opinions.push(Opinion::new(
                i.to_string(),
                format!("t{offset}"),
                "",
                base + Duration::minutes(offset),
            ));
        }

        let titles: Vec<&str> = store.recent(3).iter().map(|o| o.title.as_str()).collect();
        assert_eq!(titles, vec!["t3", "t2", "t1"]);
        assert_eq!(store.recent(100).len(), 4);
        assert!(store.recent(0).is_empty());
    }

    #[test]
    fn test_comments_require_opinion_and_are_ordered() {
        let mut store = OpinionStore::default();
        let id = store.insert(new_opinion("t", "c")).id.clone();

        let err = store.add_comment("missing", comment("x", "u")).unwrap_err();
        assert!(matches!(err, OpinionError::OpinionNotFound { .. }));

        store.add_comment(&id, comment("first", "u1")).unwrap();
        store.add_comment(&id, comment("second", "u2")).unwrap();
        store.comments[0].created_at = store.comments[1].created_at + Duration::seconds(1);

        let contents: Vec<&str> = store
            .comments_for(&id)
            .iter()
            .map(|c| c.content.as_str())
            .collect();
        assert_eq!(contents, vec!["second", "first"]);
    }

    #[test]
    fn test_toggle_reaction() {
        let mut store = OpinionStore::default();
        let id = store.insert(new_opinion("t", "c")).id.clone();

        assert_eq!(
            store.toggle_reaction(&id, "like", "alice").unwrap(),
            ReactionAction::Added
        );
        assert_eq!(
            store.toggle_reaction(&id, "like", "bob").unwrap(),
            ReactionAction::Added
        );
        assert_eq!(
            store.toggle_reaction(&id, "agree", "alice").unwrap(),
            ReactionAction::Added
        );

        let counts = store.reaction_counts(&id);
        assert_eq!(counts.get("like"), Some(&2));
        assert_eq!(counts.get("agree"), Some(&1));

        assert_eq!(
            store.toggle_reaction(&id, "like", "alice").unwrap(),
            ReactionAction::Removed
        );
        assert_eq!(store.reaction_counts(&id).get("like"), Some(&1));
    }

    #[test]
    fn test_toggle_reaction_unknown_opinion() {
        let mut store = OpinionStore::default();
        let err = store.toggle_reaction("missing", "like", "alice").unwrap_err();
        assert!(matches!(err, OpinionError::OpinionNotFound { .. }));
    }
}
