use std::collections::HashMap;

use rand::{distributions::Alphanumeric, Rng};

use crate::reaction::Reaction;

/// Comment text is truncated, not rejected, past this many characters.
pub const MAX_COMMENT_LEN: usize = 500;
/// Replies may only target comments shallower than this depth; anything
/// deeper is ignored, matching the display nesting cap.
pub const REPLY_DEPTH_CAP: usize = 2;
/// Visual indentation stops growing at this depth; deeper replies flatten
/// on screen but stay structurally nested.
pub const DISPLAY_INDENT_CAP: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommentId(String);

impl CommentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone)]
pub struct Comment {
    id: CommentId,
    author: String,
    text: String,
    created_at: String,
    reaction: Reaction,
    parent: Option<CommentId>,
    depth: usize,
    children: Vec<CommentId>,
}

impl Comment {
    pub fn id(&self) -> &CommentId {
        &self.id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Display label only; not a sortable instant.
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    pub fn liked(&self) -> bool {
        self.reaction.liked()
    }

    pub fn like_count(&self) -> u64 {
        self.reaction.display_count()
    }

    pub fn parent(&self) -> Option<&CommentId> {
        self.parent.as_ref()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Indent level used when rendering, capped at two levels.
    pub fn display_indent(&self) -> usize {
        self.depth.min(DISPLAY_INDENT_CAP)
    }

    /// Direct replies, chronological (append order).
    pub fn replies(&self) -> &[CommentId] {
        &self.children
    }
}

/// Seed shape for pre-populated threads, nested the way the static data is.
#[derive(Debug, Clone)]
pub struct SeedComment {
    pub author: String,
    pub text: String,
    pub created_at: String,
    pub likes: u64,
    pub replies: Vec<SeedComment>,
}

/// In-memory arena of comment nodes, addressed by id, with per-reel lists
/// of top-level comment ids (newest first).
pub struct CommentStore {
    nodes: HashMap<CommentId, Comment>,
    threads: HashMap<String, Vec<CommentId>>,
    viewer: String,
}

impl CommentStore {
    pub fn new(viewer: impl Into<String>) -> Self {
        Self {
            nodes: HashMap::new(),
            threads: HashMap::new(),
            viewer: viewer.into(),
        }
    }

    pub fn seed_thread(&mut self, reel_id: &str, comments: Vec<SeedComment>) {
        let mut roots = Vec::with_capacity(comments.len());
        for seed in comments {
            let id = self.insert_seed(seed, None, 0);
            roots.push(id);
        }
        self.threads.insert(reel_id.to_string(), roots);
    }

    fn insert_seed(&mut self, seed: SeedComment, parent: Option<CommentId>, depth: usize) -> CommentId {
        let id = self.fresh_id();
        let children: Vec<CommentId> = seed
            .replies
            .into_iter()
            .map(|reply| self.insert_seed(reply, Some(id.clone()), depth + 1))
            .collect();
        self.nodes.insert(
            id.clone(),
            Comment {
                id: id.clone(),
                author: seed.author,
                text: seed.text,
                created_at: seed.created_at,
                reaction: Reaction::new(seed.likes),
                parent,
                depth,
                children,
            },
        );
        id
    }

    /// Top-level comment ids for a reel, newest first. Empty when unseeded.
    pub fn thread(&self, reel_id: &str) -> &[CommentId] {
        self.threads.get(reel_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn thread_len(&self, reel_id: &str) -> usize {
        self.thread(reel_id).len()
    }

    /// Total comments in a reel's thread, replies included.
    pub fn thread_total(&self, reel_id: &str) -> usize {
        fn count(store: &CommentStore, id: &CommentId) -> usize {
            let children = store
                .get(id)
                .map(|node| {
                    node.replies()
                        .iter()
                        .map(|child| count(store, child))
                        .sum::<usize>()
                })
                .unwrap_or(0);
            1 + children
        }
        self.thread(reel_id).iter().map(|id| count(self, id)).sum()
    }

    pub fn get(&self, id: &CommentId) -> Option<&Comment> {
        self.nodes.get(id)
    }

    /// Preorder flattening of a reel's thread for rendering.
    pub fn flatten(&self, reel_id: &str) -> Vec<CommentId> {
        let mut out = Vec::new();
        for root in self.thread(reel_id) {
            self.flatten_into(root, &mut out);
        }
        out
    }

    fn flatten_into(&self, id: &CommentId, out: &mut Vec<CommentId>) {
        out.push(id.clone());
        if let Some(node) = self.nodes.get(id) {
            let children = node.children.clone();
            for child in &children {
                self.flatten_into(child, out);
            }
        }
    }

    /// Prepends a fresh comment authored by the viewer. Whitespace-only text
    /// is a silent no-op; over-length text is truncated, not rejected.
    pub fn add_top_level(&mut self, reel_id: &str, text: &str) -> Option<CommentId> {
        let text = sanitize(text)?;
        let id = self.fresh_id();
        self.nodes.insert(
            id.clone(),
            Comment {
                id: id.clone(),
                author: self.viewer.clone(),
                text,
                created_at: "just now".to_string(),
                reaction: Reaction::new(0),
                parent: None,
                depth: 0,
                children: Vec::new(),
            },
        );
        self.threads
            .entry(reel_id.to_string())
            .or_default()
            .insert(0, id.clone());
        Some(id)
    }

    /// Appends a reply under `parent`. Silent no-op when the parent is
    /// unknown, sits at or past the reply depth cap, or the text is blank.
    pub fn add_reply(&mut self, parent: &CommentId, text: &str) -> Option<CommentId> {
        let text = sanitize(text)?;
        let depth = match self.nodes.get(parent) {
            Some(node) if node.depth < REPLY_DEPTH_CAP => node.depth + 1,
            _ => return None,
        };
        let id = self.fresh_id();
        self.nodes.insert(
            id.clone(),
            Comment {
                id: id.clone(),
                author: self.viewer.clone(),
                text,
                created_at: "just now".to_string(),
                reaction: Reaction::new(0),
                parent: Some(parent.clone()),
                depth,
                children: Vec::new(),
            },
        );
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(id.clone());
        }
        Some(id)
    }

    /// Flips the viewer's like on a comment. Returns the new liked state, or
    /// `None` for an unknown id.
    pub fn toggle_like(&mut self, id: &CommentId) -> Option<bool> {
        self.nodes.get_mut(id).map(|node| node.reaction.toggle())
    }

    fn fresh_id(&self) -> CommentId {
        loop {
            let suffix: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(10)
                .map(char::from)
                .collect();
            let id = CommentId(format!("c-{suffix}"));
            if !self.nodes.contains_key(&id) {
                return id;
            }
        }
    }
}

fn sanitize(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.chars().count() > MAX_COMMENT_LEN {
        Some(trimmed.chars().take(MAX_COMMENT_LEN).collect())
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_store() -> CommentStore {
        let mut store = CommentStore::new("you");
        store.seed_thread(
            "reel-1",
            vec![
                SeedComment {
                    author: "ana".into(),
                    text: "So sweet!".into(),
                    created_at: "2h".into(),
                    likes: 12,
                    replies: vec![SeedComment {
                        author: "bruno".into(),
                        text: "Agreed".into(),
                        created_at: "1h".into(),
                        likes: 2,
                        replies: vec![SeedComment {
                            author: "carla".into(),
                            text: "Same here".into(),
                            created_at: "30m".into(),
                            likes: 0,
                            replies: Vec::new(),
                        }],
                    }],
                },
                SeedComment {
                    author: "diego".into(),
                    text: "Where is this shelter?".into(),
                    created_at: "3h".into(),
                    likes: 4,
                    replies: Vec::new(),
                },
            ],
        );
        store
    }

    #[test]
    fn add_top_level_prepends_trimmed_text() {
        let mut store = seeded_store();
        let before = store.thread_len("reel-1");
        let id = store.add_top_level("reel-1", "  hello there  ").unwrap();
        assert_eq!(store.thread_len("reel-1"), before + 1);
        assert_eq!(store.thread("reel-1")[0], id);
        let comment = store.get(&id).unwrap();
        assert_eq!(comment.text(), "hello there");
        assert_eq!(comment.author(), "you");
        assert_eq!(comment.like_count(), 0);
    }

    #[test]
    fn blank_text_is_a_no_op() {
        let mut store = seeded_store();
        let before = store.thread_len("reel-1");
        assert!(store.add_top_level("reel-1", "").is_none());
        assert!(store.add_top_level("reel-1", "   ").is_none());
        assert_eq!(store.thread_len("reel-1"), before);
    }

    #[test]
    fn over_length_text_is_truncated() {
        let mut store = seeded_store();
        let long = "x".repeat(MAX_COMMENT_LEN + 50);
        let id = store.add_top_level("reel-1", &long).unwrap();
        assert_eq!(store.get(&id).unwrap().text().chars().count(), MAX_COMMENT_LEN);
    }

    #[test]
    fn unseeded_reel_starts_empty() {
        let store = seeded_store();
        assert!(store.thread("reel-404").is_empty());
    }

    #[test]
    fn reply_appends_chronologically() {
        let mut store = seeded_store();
        let parent = store.thread("reel-1")[0].clone();
        let original_text = store.get(&parent).unwrap().text().to_string();
        let first = store.add_reply(&parent, "first reply").unwrap();
        let second = store.add_reply(&parent, "second reply").unwrap();
        let node = store.get(&parent).unwrap();
        let replies = node.replies();
        assert_eq!(replies[replies.len() - 2], first);
        assert_eq!(replies[replies.len() - 1], second);
        assert_eq!(node.text(), original_text);
    }

    #[test]
    fn reply_to_depth_one_comment_lands_at_depth_two() {
        let mut store = seeded_store();
        let root = store.thread("reel-1")[0].clone();
        let child = store.get(&root).unwrap().replies()[0].clone();
        let id = store.add_reply(&child, "deep enough").unwrap();
        let node = store.get(&id).unwrap();
        assert_eq!(node.depth(), 2);
        assert_eq!(node.display_indent(), 2);
    }

    #[test]
    fn reply_past_depth_cap_is_a_no_op() {
        let mut store = seeded_store();
        let root = store.thread("reel-1")[0].clone();
        let child = store.get(&root).unwrap().replies()[0].clone();
        let grandchild = store.get(&child).unwrap().replies()[0].clone();
        let total_before = store.thread_total("reel-1");
        assert!(store.add_reply(&grandchild, "too deep").is_none());
        assert_eq!(store.thread_total("reel-1"), total_before);
        assert!(store.get(&grandchild).unwrap().replies().is_empty());
    }

    #[test]
    fn comment_like_round_trips_to_seed() {
        let mut store = seeded_store();
        let id = store.thread("reel-1")[0].clone();
        let seed = store.get(&id).unwrap().like_count();
        assert_eq!(store.toggle_like(&id), Some(true));
        assert_eq!(store.get(&id).unwrap().like_count(), seed + 1);
        assert_eq!(store.toggle_like(&id), Some(false));
        assert_eq!(store.get(&id).unwrap().like_count(), seed);
    }

    #[test]
    fn flatten_orders_preorder() {
        let store = seeded_store();
        let flat = store.flatten("reel-1");
        assert_eq!(flat.len(), 4);
        let depths: Vec<usize> = flat
            .iter()
            .map(|id| store.get(id).unwrap().depth())
            .collect();
        assert_eq!(depths, vec![0, 1, 2, 0]);
    }
}
