//! Red-black tree with positional insertion
//!
//! [`OrderedTree`] keeps its elements in an explicit in-order sequence rather than
//! sorting them by a key. Elements can be placed directly after an existing node
//! ([`OrderedTree::insert_after`]), which is what the beach line needs when an arc is
//! split, or sorted into place with [`OrderedTree::insort`] when the element type is
//! ordered, which is what the event queue needs.
//!
//! Nodes live in a [`SlotMap`] arena and refer to each other by key. Keys are
//! generation-checked: a key to a removed node never aliases a newer node, so stale
//! handles held by other structures resolve to `None` instead of the wrong element.
//! Removing a node never moves another node's element to a different key.

use slotmap::{new_key_type, Key, SlotMap};

new_key_type! {
    /// Default handle type for nodes of an [`OrderedTree`]
    pub struct NodeKey;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

#[derive(Debug, Clone)]
struct Node<K, T> {
    parent: Option<K>,
    left: Option<K>,
    right: Option<K>,
    color: Color,
    element: T,
}

impl<K, T> Node<K, T> {
    fn new(element: T, color: Color) -> Self {
        Self {
            parent: None,
            left: None,
            right: None,
            color,
            element,
        }
    }
}

/// A balanced binary tree over an explicitly ordered sequence of elements
///
/// Insertion, removal and the first/last lookups are O(log n). Walking to a node's
/// [`successor`](OrderedTree::successor) or [`predecessor`](OrderedTree::predecessor)
/// is O(log n) worst case but amortized O(1) over a full traversal.
#[derive(Debug, Clone)]
pub struct OrderedTree<T, K: Key = NodeKey> {
    nodes: SlotMap<K, Node<K, T>>,
    root: Option<K>,
}

impl<T, K: Key> Default for OrderedTree<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K: Key> OrderedTree<T, K> {
    /// Create an empty tree
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
        }
    }

    /// Create an empty tree with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(capacity),
            root: None,
        }
    }

    /// Number of elements in the tree
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Remove every element, invalidating all keys
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    #[inline]
    pub fn root(&self) -> Option<K> {
        self.root
    }

    /// Check if `key` still refers to a node of this tree
    #[inline]
    pub fn contains(&self, key: K) -> bool {
        self.nodes.contains_key(key)
    }

    #[inline]
    pub fn get(&self, key: K) -> Option<&T> {
        self.nodes.get(key).map(|node| &node.element)
    }

    #[inline]
    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.nodes.get_mut(key).map(|node| &mut node.element)
    }

    #[inline]
    pub fn left(&self, key: K) -> Option<K> {
        self.nodes.get(key).and_then(|node| node.left)
    }

    #[inline]
    pub fn right(&self, key: K) -> Option<K> {
        self.nodes.get(key).and_then(|node| node.right)
    }

    #[inline]
    pub fn parent(&self, key: K) -> Option<K> {
        self.nodes.get(key).and_then(|node| node.parent)
    }

    /// Leftmost node, or `None` if the tree is empty
    pub fn first(&self) -> Option<K> {
        self.root.map(|root| self.leftmost(root))
    }

    /// Rightmost node, or `None` if the tree is empty
    pub fn last(&self) -> Option<K> {
        self.root.map(|root| self.rightmost(root))
    }

    /// In-order successor of `key`, or `None` if `key` is the last node
    pub fn successor(&self, key: K) -> Option<K> {
        if let Some(right) = self.right(key) {
            return Some(self.leftmost(right));
        }

        let mut current = key;
        while let Some(parent) = self.parent(current) {
            if self.nodes[parent].right != Some(current) {
                return Some(parent);
            }
            current = parent;
        }
        None
    }

    /// In-order predecessor of `key`, or `None` if `key` is the first node
    pub fn predecessor(&self, key: K) -> Option<K> {
        if let Some(left) = self.left(key) {
            return Some(self.rightmost(left));
        }

        let mut current = key;
        while let Some(parent) = self.parent(current) {
            if self.nodes[parent].left != Some(current) {
                return Some(parent);
            }
            current = parent;
        }
        None
    }

    /// Iterate over `(key, element)` pairs in order
    pub fn iter(&self) -> Iter<'_, T, K> {
        Iter {
            tree: self,
            next: self.first(),
        }
    }

    /// Insert `element` as the new last element and return its key
    pub fn append(&mut self, element: T) -> K {
        match self.last() {
            Some(last) => self.insert_after(element, last),
            None => {
                let root = self.nodes.insert(Node::new(element, Color::Black));
                self.root = Some(root);
                root
            }
        }
    }

    /// Insert `element` immediately after `predecessor` in order and return its key
    ///
    /// # Panics
    ///
    /// Panics if `predecessor` is not a node of this tree.
    pub fn insert_after(&mut self, element: T, predecessor: K) -> K {
        let node = self.nodes.insert(Node::new(element, Color::Red));
        let parent = match self.nodes[predecessor].right {
            None => {
                self.nodes[predecessor].right = Some(node);
                predecessor
            }
            Some(right) => {
                let parent = self.leftmost(right);
                self.nodes[parent].left = Some(node);
                parent
            }
        };
        self.nodes[node].parent = Some(parent);
        self.balance_insertion(node);
        node
    }

    /// Remove the node at `key` and return its element
    ///
    /// Returns `None` if `key` no longer refers to a node of this tree. Keys of all
    /// other nodes remain valid.
    pub fn remove(&mut self, key: K) -> Option<T> {
        if !self.nodes.contains_key(key) {
            return None;
        }

        let (left, right) = (self.nodes[key].left, self.nodes[key].right);
        // `child` takes the place of the node that is physically unlinked, and may
        // be absent, so its parent is tracked separately
        let (child, child_parent, removed_color) = match (left, right) {
            (None, _) => {
                let parent = self.nodes[key].parent;
                self.transplant(key, right);
                (right, parent, self.nodes[key].color)
            }
            (Some(_), None) => {
                let parent = self.nodes[key].parent;
                self.transplant(key, left);
                (left, parent, self.nodes[key].color)
            }
            (Some(left), Some(right)) => {
                let successor = self.leftmost(right);
                let removed_color = self.nodes[successor].color;
                let child = self.nodes[successor].right;
                let child_parent = if self.nodes[successor].parent == Some(key) {
                    Some(successor)
                } else {
                    let parent = self.nodes[successor].parent;
                    self.transplant(successor, child);
                    self.nodes[successor].right = Some(right);
                    self.nodes[right].parent = Some(successor);
                    parent
                };
                self.transplant(key, Some(successor));
                self.nodes[successor].left = Some(left);
                self.nodes[left].parent = Some(successor);
                self.nodes[successor].color = self.nodes[key].color;
                (child, child_parent, removed_color)
            }
        };

        if removed_color == Color::Black {
            self.balance_deletion(child, child_parent);
        }

        self.nodes.remove(key).map(|node| node.element)
    }

    /// Check the red-black invariants and parent-link consistency
    ///
    /// The root is black, no red node has a red child, every root-to-leaf path
    /// crosses the same number of black nodes, and every child points back at its
    /// parent.
    pub fn verify(&self) -> bool {
        match self.root {
            None => self.nodes.is_empty(),
            Some(root) => {
                self.nodes[root].color == Color::Black
                    && self.nodes[root].parent.is_none()
                    && self.black_height(Some(root)).is_some()
            }
        }
    }

    fn black_height(&self, key: Option<K>) -> Option<usize> {
        let Some(key) = key else {
            return Some(1);
        };
        let node = &self.nodes[key];

        for child in [node.left, node.right].into_iter().flatten() {
            if self.nodes.get(child)?.parent != Some(key) {
                return None;
            }
        }
        if node.color == Color::Red && (self.is_red(node.left) || self.is_red(node.right)) {
            return None;
        }

        let left = self.black_height(node.left)?;
        let right = self.black_height(node.right)?;
        if left != right {
            return None;
        }
        Some(left + usize::from(node.color == Color::Black))
    }

    fn leftmost(&self, mut key: K) -> K {
        while let Some(left) = self.nodes[key].left {
            key = left;
        }
        key
    }

    fn rightmost(&self, mut key: K) -> K {
        while let Some(right) = self.nodes[key].right {
            key = right;
        }
        key
    }

    #[inline]
    fn is_red(&self, key: Option<K>) -> bool {
        key.is_some_and(|key| self.nodes[key].color == Color::Red)
    }

    #[inline]
    fn set_color(&mut self, key: Option<K>, color: Color) {
        if let Some(key) = key {
            self.nodes[key].color = color;
        }
    }

    /// Point `parent`'s link to `old` (or the root, if there is no parent) at `new`
    fn replace_child(&mut self, parent: Option<K>, old: K, new: Option<K>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let node = &mut self.nodes[parent];
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    node.right = new;
                }
            }
        }
    }

    /// Put the subtree rooted at `new` where `old` hangs
    fn transplant(&mut self, old: K, new: Option<K>) {
        let parent = self.nodes[old].parent;
        self.replace_child(parent, old, new);
        if let Some(new) = new {
            self.nodes[new].parent = parent;
        }
    }

    fn rotate_left(&mut self, pivot: K) {
        let Some(top) = self.nodes[pivot].right else {
            unreachable!("left rotation without a right child");
        };
        let inner = self.nodes[top].left;
        let parent = self.nodes[pivot].parent;

        self.nodes[pivot].right = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(pivot);
        }
        self.nodes[top].left = Some(pivot);
        self.nodes[pivot].parent = Some(top);
        self.nodes[top].parent = parent;
        self.replace_child(parent, pivot, Some(top));
    }

    fn rotate_right(&mut self, pivot: K) {
        let Some(top) = self.nodes[pivot].left else {
            unreachable!("right rotation without a left child");
        };
        let inner = self.nodes[top].right;
        let parent = self.nodes[pivot].parent;

        self.nodes[pivot].left = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(pivot);
        }
        self.nodes[top].right = Some(pivot);
        self.nodes[pivot].parent = Some(top);
        self.nodes[top].parent = parent;
        self.replace_child(parent, pivot, Some(top));
    }

    fn balance_insertion(&mut self, mut node: K) {
        loop {
            // the node is the root: paint it black
            let Some(mut parent) = self.nodes[node].parent else {
                self.nodes[node].color = Color::Black;
                return;
            };
            if self.nodes[parent].color == Color::Black {
                return;
            }
            // a red parent is never the root
            let Some(grandparent) = self.nodes[parent].parent else {
                unreachable!("red node at the root");
            };
            let parent_is_left = self.nodes[grandparent].left == Some(parent);
            let uncle = if parent_is_left {
                self.nodes[grandparent].right
            } else {
                self.nodes[grandparent].left
            };

            // red uncle: push the blackness down from the grandparent and continue there
            if self.is_red(uncle) {
                self.nodes[parent].color = Color::Black;
                self.set_color(uncle, Color::Black);
                self.nodes[grandparent].color = Color::Red;
                node = grandparent;
                continue;
            }

            // inner child: rotate it to the outside first
            if parent_is_left && self.nodes[parent].right == Some(node) {
                self.rotate_left(parent);
                std::mem::swap(&mut node, &mut parent);
            } else if !parent_is_left && self.nodes[parent].left == Some(node) {
                self.rotate_right(parent);
                std::mem::swap(&mut node, &mut parent);
            }

            // outer child: rotate on the grandparent
            self.nodes[parent].color = Color::Black;
            self.nodes[grandparent].color = Color::Red;
            if parent_is_left {
                self.rotate_right(grandparent);
            } else {
                self.rotate_left(grandparent);
            }
            return;
        }
    }

    /// Restore the black height after a black node was unlinked above `node`
    ///
    /// `node` carries an extra black and may be absent, in which case `parent` says
    /// where it would hang.
    fn balance_deletion(&mut self, mut node: Option<K>, mut parent: Option<K>) {
        while node != self.root && !self.is_red(node) {
            let Some(p) = parent else {
                break;
            };

            if self.nodes[p].left == node {
                let Some(mut sibling) = self.nodes[p].right else {
                    unreachable!("double-black node without a sibling");
                };
                if self.nodes[sibling].color == Color::Red {
                    self.nodes[sibling].color = Color::Black;
                    self.nodes[p].color = Color::Red;
                    self.rotate_left(p);
                    let Some(next) = self.nodes[p].right else {
                        unreachable!("red sibling without children");
                    };
                    sibling = next;
                }

                let (near, far) = (self.nodes[sibling].left, self.nodes[sibling].right);
                if !self.is_red(near) && !self.is_red(far) {
                    self.nodes[sibling].color = Color::Red;
                    node = Some(p);
                    parent = self.nodes[p].parent;
                    continue;
                }

                if !self.is_red(far) {
                    self.set_color(near, Color::Black);
                    self.nodes[sibling].color = Color::Red;
                    self.rotate_right(sibling);
                    let Some(next) = self.nodes[p].right else {
                        unreachable!("rotation lost the sibling");
                    };
                    sibling = next;
                }

                self.nodes[sibling].color = self.nodes[p].color;
                self.nodes[p].color = Color::Black;
                let far = self.nodes[sibling].right;
                self.set_color(far, Color::Black);
                self.rotate_left(p);
            } else {
                let Some(mut sibling) = self.nodes[p].left else {
                    unreachable!("double-black node without a sibling");
                };
                if self.nodes[sibling].color == Color::Red {
                    self.nodes[sibling].color = Color::Black;
                    self.nodes[p].color = Color::Red;
                    self.rotate_right(p);
                    let Some(next) = self.nodes[p].left else {
                        unreachable!("red sibling without children");
                    };
                    sibling = next;
                }

                let (near, far) = (self.nodes[sibling].right, self.nodes[sibling].left);
                if !self.is_red(near) && !self.is_red(far) {
                    self.nodes[sibling].color = Color::Red;
                    node = Some(p);
                    parent = self.nodes[p].parent;
                    continue;
                }

                if !self.is_red(far) {
                    self.set_color(near, Color::Black);
                    self.nodes[sibling].color = Color::Red;
                    self.rotate_left(sibling);
                    let Some(next) = self.nodes[p].left else {
                        unreachable!("rotation lost the sibling");
                    };
                    sibling = next;
                }

                self.nodes[sibling].color = self.nodes[p].color;
                self.nodes[p].color = Color::Black;
                let far = self.nodes[sibling].left;
                self.set_color(far, Color::Black);
                self.rotate_right(p);
            }

            node = self.root;
            parent = None;
        }

        self.set_color(node, Color::Black);
    }
}

impl<T: PartialOrd, K: Key> OrderedTree<T, K> {
    /// Insert `element` at its sorted position and return its key
    ///
    /// Elements that compare equal to existing ones are placed after them, so equal
    /// elements come out in insertion order.
    pub fn insort(&mut self, element: T) -> K {
        let Some(mut current) = self.root else {
            let root = self.nodes.insert(Node::new(element, Color::Black));
            self.root = Some(root);
            return root;
        };

        let node = self.nodes.insert(Node::new(element, Color::Red));
        loop {
            let goes_left = self.nodes[node].element < self.nodes[current].element;
            let next = if goes_left {
                self.nodes[current].left
            } else {
                self.nodes[current].right
            };
            match next {
                Some(next) => current = next,
                None => {
                    if goes_left {
                        self.nodes[current].left = Some(node);
                    } else {
                        self.nodes[current].right = Some(node);
                    }
                    break;
                }
            }
        }

        self.nodes[node].parent = Some(current);
        self.balance_insertion(node);
        node
    }

    /// Find a node whose element compares equal to `element`
    pub fn binary_search(&self, element: &T) -> Option<K> {
        let mut next = self.root;
        while let Some(current) = next {
            let candidate = &self.nodes[current].element;
            next = if element < candidate {
                self.nodes[current].left
            } else if element > candidate {
                self.nodes[current].right
            } else {
                return Some(current);
            };
        }
        None
    }
}

impl<T, K: Key> std::ops::Index<K> for OrderedTree<T, K> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `key` is not a node of this tree.
    fn index(&self, key: K) -> &T {
        &self.nodes[key].element
    }
}

/// In-order iterator over an [`OrderedTree`]
pub struct Iter<'a, T, K: Key> {
    tree: &'a OrderedTree<T, K>,
    next: Option<K>,
}

impl<'a, T, K: Key> Iterator for Iter<'a, T, K> {
    type Item = (K, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.next?;
        self.next = self.tree.successor(key);
        Some((key, &self.tree.nodes[key].element))
    }
}
