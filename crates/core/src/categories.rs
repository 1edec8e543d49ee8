//! Category Tree
//!
//! An explicit nested-set (MPTT) index over the category hierarchy. Every node carries
//! `tree_id`, `lft`, `rgt` and `level`, so ancestor and descendant checks are interval
//! comparisons.
//!
//! Siblings are ordered by title, and equal titles keep their insertion order. Roots follow
//! the same rule and a root's `tree_id` is its 1-based position among the roots.
//!
//! Re-indexing cost: a structural change re-numbers only the trees it touches. Changes to the
//! root list also re-number every root after the first changed position, because their
//! `tree_id` shifts. Each re-index is linear in the size of the re-numbered trees.

use std::{cmp::Ordering, hash::Hash};

use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use thiserror::Error;

/// Separator used by [`CategoryTree::full_path`] in the storefront.
pub const DEFAULT_PATH_SEPARATOR: &str = ">";

new_key_type! {
    /// Category Key
    pub struct CategoryKey;
}

/// Errors raised by tree mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// A category with the same id is already in the tree.
    #[error("category already exists in the tree")]
    DuplicateCategory,

    /// The category is not in the tree.
    #[error("category not found in the tree")]
    UnknownCategory,

    /// The requested parent is not in the tree.
    #[error("parent category not found in the tree")]
    UnknownParent,

    /// A category cannot become its own descendant.
    #[error("a category cannot be moved under itself or one of its descendants")]
    InvalidMove,

    /// The adjacency rows contain a parent cycle.
    #[error("category parents form a cycle")]
    Cycle,
}

/// Nested-set indices of one node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NestedSetBounds {
    /// 1-based position of the node's root among all roots.
    pub tree_id: u32,

    /// Left traversal index.
    pub lft: u32,

    /// Right traversal index.
    pub rgt: u32,

    /// Depth below the root (roots are level 0).
    pub level: u32,
}

impl NestedSetBounds {
    /// Whether `other` lies strictly inside this node's interval.
    pub fn contains(&self, other: &NestedSetBounds) -> bool {
        self.tree_id == other.tree_id && self.lft < other.lft && other.rgt < self.rgt
    }

    /// Number of descendants below this node.
    pub fn descendant_count(&self) -> u32 {
        self.rgt.saturating_sub(self.lft).saturating_sub(1) / 2
    }

    /// Whether the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.rgt == self.lft + 1
    }
}

/// Adjacency data used to rebuild a tree from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySeed<I> {
    /// Category id.
    pub id: I,

    /// Category title, used for sibling ordering and full paths.
    pub title: String,

    /// Parent id, `None` for roots.
    pub parent: Option<I>,

    /// Stored indices, if any. Stale values are reported by [`CategoryTree::drain_changes`].
    pub bounds: Option<NestedSetBounds>,
}

/// One node visited by [`CategoryTree::walk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeEntry<'a, I> {
    /// Category id.
    pub id: I,

    /// Category title.
    pub title: &'a str,

    /// Parent id.
    pub parent: Option<I>,

    /// Nested-set indices.
    pub bounds: NestedSetBounds,
}

#[derive(Debug, Clone)]
struct CategoryNode<I> {
    id: I,
    title: String,
    sequence: u64,
    parent: Option<CategoryKey>,
    children: SmallVec<[CategoryKey; 4]>,
    bounds: NestedSetBounds,
}

/// Category forest with nested-set indexing.
#[derive(Debug, Clone)]
pub struct CategoryTree<I> {
    nodes: SlotMap<CategoryKey, CategoryNode<I>>,
    index: FxHashMap<I, CategoryKey>,
    roots: SmallVec<[CategoryKey; 8]>,
    next_sequence: u64,
    changed: FxHashSet<CategoryKey>,
}

impl<I> Default for CategoryTree<I>
where
    I: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

enum Visit {
    Enter(CategoryKey, u32),
    Exit(CategoryKey),
}

impl<I> CategoryTree<I>
where
    I: Copy + Eq + Hash,
{
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            index: FxHashMap::default(),
            roots: SmallVec::new(),
            next_sequence: 0,
            changed: FxHashSet::default(),
        }
    }

    /// Rebuild a tree from adjacency rows.
    ///
    /// Seeds may arrive in any order; passing them in stored `(tree_id, lft)` order keeps
    /// the stored order of equally titled siblings. Every node whose stored bounds differ
    /// from the recomputed ones is reported by [`Self::drain_changes`].
    ///
    /// # Errors
    ///
    /// Returns an error for duplicate ids, parents missing from the seeds, or parent cycles.
    pub fn from_nodes(seeds: impl IntoIterator<Item = CategorySeed<I>>) -> Result<Self, TreeError> {
        let mut tree = Self::new();
        let mut links: Vec<(CategoryKey, I)> = Vec::new();

        for seed in seeds {
            if tree.index.contains_key(&seed.id) {
                return Err(TreeError::DuplicateCategory);
            }

            let key = tree.create_node(seed.id, seed.title);

            if let Some(bounds) = seed.bounds
                && let Some(node) = tree.nodes.get_mut(key)
            {
                node.bounds = bounds;
                tree.changed.remove(&key);
            }

            match seed.parent {
                Some(parent) => links.push((key, parent)),
                None => tree.attach(key, None),
            }
        }

        for (key, parent) in links {
            let parent = tree.key(parent).ok_or(TreeError::UnknownParent)?;

            tree.attach(key, Some(parent));
        }

        tree.reindex_roots_from(0);

        let reachable = tree
            .roots
            .iter()
            .map(|root| tree.subtree_keys(*root).len())
            .sum::<usize>();

        if reachable != tree.nodes.len() {
            return Err(TreeError::Cycle);
        }

        Ok(tree)
    }

    /// Number of categories in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no categories.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the category is in the tree.
    pub fn contains(&self, id: I) -> bool {
        self.index.contains_key(&id)
    }

    /// Insert a category under `parent`, or as a root when `parent` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error when `id` is already present or `parent` is unknown.
    pub fn insert(
        &mut self,
        id: I,
        title: impl Into<String>,
        parent: Option<I>,
    ) -> Result<NestedSetBounds, TreeError> {
        if self.index.contains_key(&id) {
            return Err(TreeError::DuplicateCategory);
        }

        let parent = parent
            .map(|parent| self.key(parent).ok_or(TreeError::UnknownParent))
            .transpose()?;

        let key = self.create_node(id, title.into());

        self.attach(key, parent);

        match parent {
            None => self.reindex_roots_from(self.root_position(key).unwrap_or(0)),
            Some(_) => self.reindex_tree_of(key),
        }

        self.bounds_of(key).ok_or(TreeError::UnknownCategory)
    }

    /// Move a category (with its subtree) under `new_parent`, or to the root list.
    ///
    /// # Errors
    ///
    /// Returns an error when either category is unknown, or when `new_parent` is the category
    /// itself or one of its descendants.
    pub fn move_to(&mut self, id: I, new_parent: Option<I>) -> Result<(), TreeError> {
        let key = self.key(id).ok_or(TreeError::UnknownCategory)?;

        let new_parent = new_parent
            .map(|parent| self.key(parent).ok_or(TreeError::UnknownParent))
            .transpose()?;

        if let Some(parent) = new_parent
            && (parent == key || self.is_key_descendant_of(parent, key))
        {
            return Err(TreeError::InvalidMove);
        }

        let old_parent = self.nodes.get(key).and_then(|node| node.parent);

        if old_parent == new_parent {
            return Ok(());
        }

        let old_root = self.root_of(key);
        let old_position = self.root_position(key);

        self.detach(key);
        self.attach(key, new_parent);

        let mut from = old_parent.is_none().then_some(old_position).flatten();

        if new_parent.is_none()
            && let Some(position) = self.root_position(key)
        {
            from = Some(from.map_or(position, |from| from.min(position)));
        }

        self.reindex_after(from, [old_root, self.root_of(key)]);

        Ok(())
    }

    /// Change a category title and re-sort it among its siblings.
    ///
    /// # Errors
    ///
    /// Returns an error when the category is unknown.
    pub fn rename(&mut self, id: I, title: impl Into<String>) -> Result<(), TreeError> {
        let key = self.key(id).ok_or(TreeError::UnknownCategory)?;
        let parent = self.nodes.get(key).and_then(|node| node.parent);
        let old_position = self.root_position(key);

        self.detach(key);

        if let Some(node) = self.nodes.get_mut(key) {
            node.title = title.into();
        }

        self.attach(key, parent);

        let from = match (old_position, self.root_position(key)) {
            (Some(old), Some(new)) => Some(old.min(new)),
            _ => None,
        };

        self.reindex_after(from, [self.root_of(key)]);

        Ok(())
    }

    /// Remove a category and its whole subtree. Returns the removed ids in pre-order.
    ///
    /// # Errors
    ///
    /// Returns an error when the category is unknown.
    pub fn remove(&mut self, id: I) -> Result<Vec<I>, TreeError> {
        let key = self.key(id).ok_or(TreeError::UnknownCategory)?;
        let parent = self.nodes.get(key).and_then(|node| node.parent);
        let old_position = self.root_position(key);
        let root = self.root_of(key);

        self.detach(key);

        let removed: Vec<I> = self
            .subtree_keys(key)
            .into_iter()
            .filter_map(|removed| {
                self.changed.remove(&removed);

                self.nodes.remove(removed).map(|node| {
                    self.index.remove(&node.id);

                    node.id
                })
            })
            .collect();

        match parent {
            None => self.reindex_roots_from(old_position.unwrap_or(0)),
            Some(_) => self.reindex_after(None, [root]),
        }

        Ok(removed)
    }

    /// Root categories in order.
    pub fn roots(&self) -> Vec<I> {
        self.ids(&self.roots)
    }

    /// Direct children of a category in order.
    pub fn children(&self, id: I) -> Vec<I> {
        self.node(id)
            .map(|node| self.ids(&node.children))
            .unwrap_or_default()
    }

    /// Parent of a category.
    pub fn parent(&self, id: I) -> Option<I> {
        self.node(id)
            .and_then(|node| node.parent)
            .and_then(|parent| self.nodes.get(parent))
            .map(|parent| parent.id)
    }

    /// Title of a category.
    pub fn title(&self, id: I) -> Option<&str> {
        self.node(id).map(|node| node.title.as_str())
    }

    /// Nested-set indices of a category.
    pub fn bounds(&self, id: I) -> Option<NestedSetBounds> {
        self.node(id).map(|node| node.bounds)
    }

    /// Ancestors from the root down to the category's parent, optionally followed by the
    /// category itself.
    pub fn ancestors(&self, id: I, include_self: bool) -> Vec<I> {
        let Some(key) = self.key(id) else {
            return Vec::new();
        };

        let mut chain: Vec<I> = Vec::new();
        let mut current = if include_self {
            Some(key)
        } else {
            self.nodes.get(key).and_then(|node| node.parent)
        };

        while let Some(node) = current.and_then(|key| self.nodes.get(key)) {
            chain.push(node.id);
            current = node.parent;
        }

        chain.reverse();

        chain
    }

    /// Descendants in pre-order, optionally preceded by the category itself.
    pub fn descendants(&self, id: I, include_self: bool) -> Vec<I> {
        let Some(key) = self.key(id) else {
            return Vec::new();
        };

        self.subtree_keys(key)
            .into_iter()
            .filter(|descendant| include_self || *descendant != key)
            .filter_map(|descendant| self.nodes.get(descendant).map(|node| node.id))
            .collect()
    }

    /// Whether `id` lies strictly below `ancestor`.
    pub fn is_descendant_of(&self, id: I, ancestor: I) -> bool {
        match (self.bounds(id), self.bounds(ancestor)) {
            (Some(bounds), Some(ancestor)) => ancestor.contains(&bounds),
            _ => false,
        }
    }

    /// Titles from the root down to the category, joined by `separator`.
    pub fn full_path(&self, id: I, separator: &str) -> Option<String> {
        if !self.contains(id) {
            return None;
        }

        let titles: Vec<&str> = self
            .ancestors(id, true)
            .into_iter()
            .filter_map(|ancestor| self.title(ancestor))
            .collect();

        Some(titles.join(separator))
    }

    /// Visit every category depth-first in tree order.
    pub fn walk(&self) -> impl Iterator<Item = TreeEntry<'_, I>> + '_ {
        self.roots
            .iter()
            .flat_map(|root| self.subtree_keys(*root))
            .filter_map(|key| {
                self.nodes.get(key).map(|node| TreeEntry {
                    id: node.id,
                    title: node.title.as_str(),
                    parent: node
                        .parent
                        .and_then(|parent| self.nodes.get(parent))
                        .map(|parent| parent.id),
                    bounds: node.bounds,
                })
            })
    }

    /// Take the categories whose indices changed since the last call.
    pub fn drain_changes(&mut self) -> Vec<(I, NestedSetBounds)> {
        let mut changes: Vec<(I, NestedSetBounds)> = self
            .changed
            .drain()
            .filter_map(|key| self.nodes.get(key).map(|node| (node.id, node.bounds)))
            .collect();

        changes.sort_by_key(|(_, bounds)| (bounds.tree_id, bounds.lft));

        changes
    }

    fn key(&self, id: I) -> Option<CategoryKey> {
        self.index.get(&id).copied()
    }

    fn node(&self, id: I) -> Option<&CategoryNode<I>> {
        self.key(id).and_then(|key| self.nodes.get(key))
    }

    fn ids(&self, keys: &[CategoryKey]) -> Vec<I> {
        keys.iter()
            .filter_map(|key| self.nodes.get(*key).map(|node| node.id))
            .collect()
    }

    fn bounds_of(&self, key: CategoryKey) -> Option<NestedSetBounds> {
        self.nodes.get(key).map(|node| node.bounds)
    }

    fn is_key_descendant_of(&self, key: CategoryKey, ancestor: CategoryKey) -> bool {
        match (self.bounds_of(key), self.bounds_of(ancestor)) {
            (Some(bounds), Some(ancestor)) => ancestor.contains(&bounds),
            _ => false,
        }
    }

    fn create_node(&mut self, id: I, title: String) -> CategoryKey {
        let sequence = self.next_sequence;

        self.next_sequence += 1;

        let key = self.nodes.insert(CategoryNode {
            id,
            title,
            sequence,
            parent: None,
            children: SmallVec::new(),
            bounds: NestedSetBounds::default(),
        });

        self.index.insert(id, key);
        self.changed.insert(key);

        key
    }

    fn order(&self, left: CategoryKey, right: CategoryKey) -> Ordering {
        let left = self
            .nodes
            .get(left)
            .map(|node| (node.title.as_str(), node.sequence));
        let right = self
            .nodes
            .get(right)
            .map(|node| (node.title.as_str(), node.sequence));

        left.cmp(&right)
    }

    fn siblings(&self, parent: Option<CategoryKey>) -> &[CategoryKey] {
        match parent {
            None => &self.roots,
            Some(parent) => self
                .nodes
                .get(parent)
                .map_or(&[], |node| node.children.as_slice()),
        }
    }

    fn attach(&mut self, key: CategoryKey, parent: Option<CategoryKey>) {
        let position = self
            .siblings(parent)
            .partition_point(|sibling| self.order(*sibling, key) == Ordering::Less);

        match parent {
            None => self.roots.insert(position, key),
            Some(parent) => {
                if let Some(node) = self.nodes.get_mut(parent) {
                    node.children.insert(position, key);
                }
            }
        }

        if let Some(node) = self.nodes.get_mut(key) {
            node.parent = parent;
        }
    }

    fn detach(&mut self, key: CategoryKey) {
        let parent = self.nodes.get(key).and_then(|node| node.parent);

        match parent {
            None => self.roots.retain(|root| *root != key),
            Some(parent) => {
                if let Some(node) = self.nodes.get_mut(parent) {
                    node.children.retain(|child| *child != key);
                }
            }
        }

        if let Some(node) = self.nodes.get_mut(key) {
            node.parent = None;
        }
    }

    fn root_of(&self, key: CategoryKey) -> CategoryKey {
        let mut current = key;

        while let Some(parent) = self.nodes.get(current).and_then(|node| node.parent) {
            current = parent;
        }

        current
    }

    fn root_position(&self, key: CategoryKey) -> Option<usize> {
        self.roots.iter().position(|root| *root == key)
    }

    fn subtree_keys(&self, key: CategoryKey) -> Vec<CategoryKey> {
        let mut keys = Vec::new();
        let mut stack = vec![key];

        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };

            keys.push(current);
            stack.extend(node.children.iter().rev().copied());
        }

        keys
    }

    fn reindex_after<const N: usize>(&mut self, from: Option<usize>, roots: [CategoryKey; N]) {
        if let Some(from) = from {
            self.reindex_roots_from(from);
        }

        let mut positions: SmallVec<[usize; 2]> = roots
            .iter()
            .filter_map(|root| self.root_position(*root))
            .filter(|position| from.is_none_or(|from| *position < from))
            .collect();

        positions.sort_unstable();
        positions.dedup();

        for position in positions {
            self.reindex_tree(position);
        }
    }

    fn reindex_tree_of(&mut self, key: CategoryKey) {
        let root = self.root_of(key);

        if let Some(position) = self.root_position(root) {
            self.reindex_tree(position);
        }
    }

    fn reindex_roots_from(&mut self, from: usize) {
        for position in from..self.roots.len() {
            self.reindex_tree(position);
        }
    }

    fn reindex_tree(&mut self, position: usize) {
        let Some(root) = self.roots.get(position).copied() else {
            return;
        };

        let tree_id = u32::try_from(position + 1).unwrap_or(u32::MAX);
        let mut counter = 1_u32;
        let mut fresh: FxHashMap<CategoryKey, NestedSetBounds> = FxHashMap::default();
        let mut stack = vec![Visit::Enter(root, 0)];

        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(key, level) => {
                    let Some(node) = self.nodes.get(key) else {
                        continue;
                    };

                    fresh.insert(
                        key,
                        NestedSetBounds {
                            tree_id,
                            lft: counter,
                            rgt: 0,
                            level,
                        },
                    );

                    counter += 1;

                    stack.push(Visit::Exit(key));
                    stack.extend(
                        node.children
                            .iter()
                            .rev()
                            .map(|child| Visit::Enter(*child, level + 1)),
                    );
                }
                Visit::Exit(key) => {
                    if let Some(bounds) = fresh.get_mut(&key) {
                        bounds.rgt = counter;
                    }

                    counter += 1;
                }
            }
        }

        for (key, bounds) in fresh {
            if let Some(node) = self.nodes.get_mut(key)
                && node.bounds != bounds
            {
                node.bounds = bounds;
                self.changed.insert(key);
            }
        }
    }
}
