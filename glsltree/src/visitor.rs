//! Generic tree traversal and rewriting
//!
//! [visit] walks a tree depth-first, calling [Visitor::enter] before a node's children and
//! [Visitor::exit] after them. Hooks receive a [Path] through which they can skip the children of
//! the node, remove it or replace it.
//!
//! Traversal always sees the tree as it was before the visit: removals and replacements are
//! recorded against the original positions of the nodes and applied once the traversal is done.
//! Removing items from a list therefore never skips or revisits their siblings.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::{Error, Result};
use crate::syntax::{Node, NodeTag, Slot, SlotMut};

/// Kind of the slot a node occupies in its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Required,
    Optional,
    List,
}

/// Position of a node in its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub kind: SlotKind,
    /// Index of the slot among the parent's slots, see [NodeKind::slots](crate::NodeKind::slots)
    pub slot: usize,
    /// Index in the list, for [SlotKind::List] slots
    pub index: Option<usize>,
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "#{}[{}]", self.slot, index),
            None => write!(f, "#{}", self.slot),
        }
    }
}

/// Pending modification of a node
#[derive(Debug, Clone)]
enum Edit {
    Remove,
    Replace(Node),
}

/// Original coordinates of a node: (slot, list index) pairs from the root
type Address = Vec<(usize, usize)>;

/// Visited node and its context
#[derive(Debug)]
pub struct Path<'a> {
    node: &'a Node,
    ancestors: &'a [&'a Node],
    key: Option<SlotKey>,
    skip: bool,
    edit: Option<Edit>,
}

impl<'a> Path<'a> {
    /// The visited node
    pub fn node(&self) -> &'a Node {
        self.node
    }

    /// Parent of the visited node, `None` for the root
    pub fn parent(&self) -> Option<&'a Node> {
        self.ancestors.last().copied()
    }

    /// Ancestors of the visited node, nearest first
    pub fn ancestors(&self) -> impl Iterator<Item = &'a Node> + 'a {
        self.ancestors.iter().rev().copied()
    }

    /// Position of the visited node in its parent, `None` for the root
    pub fn key(&self) -> Option<SlotKey> {
        self.key
    }

    /// Do not visit the children of this node
    pub fn skip(&mut self) {
        self.skip = true;
    }

    /// Remove this node from its parent.
    ///
    /// List items are taken out of the list and optional children are cleared. Fails for the
    /// root node and for required children.
    pub fn remove(&mut self) -> Result<()> {
        let key = self.key.ok_or(Error::DetachedNode {
            operation: "remove",
        })?;

        if key.kind == SlotKind::Required {
            return Err(Error::RequiredSlot {
                parent: self.parent().map(Node::tag).unwrap_or(NodeTag::Program),
                slot: key.to_string(),
            });
        }

        self.edit = Some(Edit::Remove);
        Ok(())
    }

    /// Substitute `node` for this node in its parent. Fails for the root node.
    pub fn replace_with(&mut self, node: Node) -> Result<()> {
        if self.key.is_none() {
            return Err(Error::DetachedNode {
                operation: "replace",
            });
        }

        self.edit = Some(Edit::Replace(node));
        Ok(())
    }

    /// Nearest ancestor matching `predicate`
    pub fn find_parent(&self, mut predicate: impl FnMut(&Node) -> bool) -> Option<&'a Node> {
        self.ancestors().find(|node| predicate(*node))
    }
}

/// Hooks called while visiting a tree
pub trait Visitor {
    /// Called before visiting the children of a node
    fn enter(&mut self, _path: &mut Path<'_>) -> Result<()> {
        Ok(())
    }

    /// Called after visiting the children of a node. Not called for nodes removed or replaced
    /// by [Visitor::enter].
    fn exit(&mut self, _path: &mut Path<'_>) -> Result<()> {
        Ok(())
    }
}

type Hook<'h> = Box<dyn FnMut(&mut Path<'_>) -> Result<()> + 'h>;

/// [Visitor] dispatching to closures by node kind
#[derive(Default)]
pub struct Visitors<'h> {
    enter: HashMap<NodeTag, Hook<'h>>,
    exit: HashMap<NodeTag, Hook<'h>>,
}

impl<'h> Visitors<'h> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `hook` when entering nodes of kind `tag`
    pub fn on_enter(
        mut self,
        tag: NodeTag,
        hook: impl FnMut(&mut Path<'_>) -> Result<()> + 'h,
    ) -> Self {
        self.enter.insert(tag, Box::new(hook));
        self
    }

    /// Call `hook` when leaving nodes of kind `tag`
    pub fn on_exit(
        mut self,
        tag: NodeTag,
        hook: impl FnMut(&mut Path<'_>) -> Result<()> + 'h,
    ) -> Self {
        self.exit.insert(tag, Box::new(hook));
        self
    }
}

impl Visitor for Visitors<'_> {
    fn enter(&mut self, path: &mut Path<'_>) -> Result<()> {
        match self.enter.get_mut(&path.node().tag()) {
            Some(hook) => hook(path),
            None => Ok(()),
        }
    }

    fn exit(&mut self, path: &mut Path<'_>) -> Result<()> {
        match self.exit.get_mut(&path.node().tag()) {
            Some(hook) => hook(path),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Visitors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Visitors")
            .field("enter", &self.enter.keys().collect::<Vec<_>>())
            .field("exit", &self.exit.keys().collect::<Vec<_>>())
            .finish()
    }
}

struct Walker<'v> {
    visitor: &'v mut dyn Visitor,
    edits: BTreeMap<Address, Edit>,
}

impl Walker<'_> {
    fn walk<'t>(
        &mut self,
        node: &'t Node,
        key: Option<SlotKey>,
        ancestors: &mut Vec<&'t Node>,
        address: &mut Address,
    ) -> Result<()> {
        let mut path = Path {
            node,
            ancestors: ancestors.as_slice(),
            key,
            skip: false,
            edit: None,
        };

        self.visitor.enter(&mut path)?;

        if let Some(edit) = path.edit.take() {
            self.edits.insert(address.clone(), edit);
            return Ok(());
        }

        if !path.skip {
            ancestors.push(node);

            for (slot, children) in node.kind.slots().into_iter().enumerate() {
                match children {
                    Slot::Required(child) => {
                        let key = SlotKey {
                            kind: SlotKind::Required,
                            slot,
                            index: None,
                        };
                        self.walk_child(child, key, (slot, 0), ancestors, address)?;
                    }
                    Slot::Optional(Some(child)) => {
                        let key = SlotKey {
                            kind: SlotKind::Optional,
                            slot,
                            index: None,
                        };
                        self.walk_child(child, key, (slot, 0), ancestors, address)?;
                    }
                    Slot::Optional(None) => {}
                    Slot::List(children) => {
                        for (index, child) in children.iter().enumerate() {
                            let key = SlotKey {
                                kind: SlotKind::List,
                                slot,
                                index: Some(index),
                            };
                            self.walk_child(child, key, (slot, index), ancestors, address)?;
                        }
                    }
                }
            }

            ancestors.pop();
        }

        let mut path = Path {
            node,
            ancestors: ancestors.as_slice(),
            key,
            skip: false,
            edit: None,
        };

        self.visitor.exit(&mut path)?;

        if let Some(edit) = path.edit.take() {
            self.edits.insert(address.clone(), edit);
        }

        Ok(())
    }

    fn walk_child<'t>(
        &mut self,
        child: &'t Node,
        key: SlotKey,
        step: (usize, usize),
        ancestors: &mut Vec<&'t Node>,
        address: &mut Address,
    ) -> Result<()> {
        address.push(step);
        let result = self.walk(child, Some(key), ancestors, address);
        address.pop();
        result
    }
}

/// `true` if some edit targets `address` or one of its descendants
fn has_edits_under(edits: &BTreeMap<Address, Edit>, address: &Address) -> bool {
    edits
        .range(address.clone()..)
        .next()
        .map(|(key, _)| key.starts_with(address))
        .unwrap_or(false)
}

fn apply_edits(node: &mut Node, address: &mut Address, edits: &mut BTreeMap<Address, Edit>) {
    for (slot, children) in node.kind.slots_mut().into_iter().enumerate() {
        match children {
            SlotMut::Required(child) => {
                address.push((slot, 0));
                match edits.remove(address) {
                    Some(Edit::Replace(replacement)) => *child = replacement,
                    // Rejected by Path::remove
                    Some(Edit::Remove) => {}
                    None if has_edits_under(edits, address) => apply_edits(child, address, edits),
                    None => {}
                }
                address.pop();
            }
            SlotMut::Optional(child) => {
                address.push((slot, 0));
                match edits.remove(address) {
                    Some(Edit::Replace(replacement)) => *child = Some(Box::new(replacement)),
                    Some(Edit::Remove) => *child = None,
                    None if has_edits_under(edits, address) => {
                        if let Some(child) = child {
                            apply_edits(child, address, edits);
                        }
                    }
                    None => {}
                }
                address.pop();
            }
            SlotMut::List(children) => {
                let kept = apply_list_edits(std::mem::take(children), slot, address, edits);
                children.extend(kept.into_iter().map(|(_, child)| child));
            }
            SlotMut::Separated(children, separators) => {
                let trailing = !children.is_empty() && separators.len() >= children.len();
                let mut pending: Vec<_> =
                    std::mem::take(separators).into_iter().map(Some).collect();

                let kept = apply_list_edits(std::mem::take(children), slot, address, edits);
                let last = kept.len().saturating_sub(1);

                for (position, (index, child)) in kept.into_iter().enumerate() {
                    // A removed item takes its following separator with it, and the new last item
                    // only keeps its separator if the list had a trailing one
                    if let Some(separator) = pending.get_mut(index).and_then(Option::take) {
                        if position < last || trailing {
                            separators.push(separator);
                        }
                    }

                    children.push(child);
                }
            }
        }
    }
}

/// Apply the edits of the list at `slot`, returning the surviving children with their original
/// indices
fn apply_list_edits(
    original: Vec<Node>,
    slot: usize,
    address: &mut Address,
    edits: &mut BTreeMap<Address, Edit>,
) -> Vec<(usize, Node)> {
    let mut kept = Vec::with_capacity(original.len());

    for (index, mut child) in original.into_iter().enumerate() {
        address.push((slot, index));
        match edits.remove(address) {
            Some(Edit::Replace(replacement)) => kept.push((index, replacement)),
            Some(Edit::Remove) => {}
            None => {
                if has_edits_under(edits, address) {
                    apply_edits(&mut child, address, edits);
                }
                kept.push((index, child));
            }
        }
        address.pop();
    }

    kept
}

/// Visit `tree` with `visitor`, then apply the removals and replacements it requested
///
/// # Parameters
///
/// * `tree`: root of the tree to visit
/// * `visitor`: hooks to call on each node
pub fn visit(tree: &mut Node, visitor: &mut dyn Visitor) -> Result<()> {
    let mut walker = Walker {
        visitor,
        edits: BTreeMap::new(),
    };

    walker.walk(tree, None, &mut Vec::new(), &mut Vec::new())?;

    let mut edits = walker.edits;
    if !edits.is_empty() {
        trace!("applying {} tree edits", edits.len());
        apply_edits(tree, &mut Vec::new(), &mut edits);
    }

    Ok(())
}
