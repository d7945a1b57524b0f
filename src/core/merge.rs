//! Filepath: src/core/merge.rs
//! Multi-root merge for split smali output (`smali`, `smali_classes2`, ...).
//!
//! Every root is built on its own, the surviving roots are flattened under a
//! single `smali` directory, and directories sharing a name are merged level
//! by level. Leaves are never merged.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::{debug, instrument};

use crate::core::tree::{DirectoryNode, FileTreeNode, MetadataTreeBuilder, SMALI_EXTENSION};
use crate::metadata::MetadataDecoder;

/// Name of the synthetic directory the roots are flattened into
pub const CANONICAL_ROOT_NAME: &str = SMALI_EXTENSION;

/// True when `source` holds a `smali` entry, i.e. it looks like decoder output.
pub fn has_smali_roots(source: &Path) -> bool
{
    source
        .join(CANONICAL_ROOT_NAME)
        .exists()
}

/// Entries of `source` whose name starts with `smali`, in listing order.
pub fn smali_roots(source: &Path) -> Result<Vec<PathBuf>>
{
    let entries =
        fs::read_dir(source).with_context(|| format!("Failed to list {}", source.display()))?;

    let mut roots = Vec::new();
    for entry in entries
    {
        let entry = entry.with_context(|| format!("Failed to list {}", source.display()))?;
        if entry
            .file_name()
            .to_string_lossy()
            .starts_with(CANONICAL_ROOT_NAME)
        {
            roots.push(entry.path());
        }
    }
    Ok(roots)
}

/// Build every root, keep directory results and merge them into one tree.
#[instrument(level = "debug", skip_all, fields(roots = roots.len()))]
pub fn build_merged<D: MetadataDecoder>(
    builder: &MetadataTreeBuilder<D>,
    roots: &[PathBuf],
) -> Option<DirectoryNode>
{
    let built = roots
        .iter()
        .filter_map(|root| {
            let node = builder.build(root);
            if node.is_none()
            {
                debug!(root = %root.display(), "root contributes nothing");
            }
            node
        })
        .collect();

    merge_roots(built)
}

/// Drop leaf roots, flatten the rest and merge identically named directories.
pub fn merge_roots(roots: Vec<FileTreeNode>) -> Option<DirectoryNode>
{
    let directories = roots
        .into_iter()
        .filter_map(|node| match node
        {
            FileTreeNode::Directory(dir) => Some(dir),
            FileTreeNode::Leaf(leaf) =>
            {
                debug!(name = leaf.name(), "discarding file root");
                None
            }
        })
        .collect();

    collapse(directories, CANONICAL_ROOT_NAME).map(merge_identically_named)
}

/// One directory called `name` holding the children of `directories` in order.
pub fn collapse(
    directories: Vec<DirectoryNode>,
    name: &str,
) -> Option<DirectoryNode>
{
    let children = directories
        .into_iter()
        .flat_map(DirectoryNode::into_children)
        .collect();

    DirectoryNode::new(name, children)
}

enum Slot
{
    Leaf(FileTreeNode),
    Group(usize),
}

/// Merge same-named subdirectories at every depth.
///
/// A group takes the position of its first member; its children are the
/// members' children in group order.
pub fn merge_identically_named(directory: DirectoryNode) -> DirectoryNode
{
    let DirectoryNode { name, children } = directory;

    let mut slots = Vec::with_capacity(children.len());
    let mut groups: IndexMap<String, Vec<DirectoryNode>> = IndexMap::new();

    for child in children
    {
        match child
        {
            FileTreeNode::Directory(dir) =>
            {
                let entry = groups.entry(dir.name.clone());
                let index = entry.index();
                match entry
                {
                    Entry::Occupied(mut group) => group
                        .get_mut()
                        .push(dir),
                    Entry::Vacant(group) =>
                    {
                        group.insert(vec![dir]);
                        slots.push(Slot::Group(index));
                    }
                }
            }
            leaf => slots.push(Slot::Leaf(leaf)),
        }
    }

    let mut groups: Vec<Option<(String, Vec<DirectoryNode>)>> = groups
        .into_iter()
        .map(Some)
        .collect();

    let children = slots
        .into_iter()
        .filter_map(|slot| match slot
        {
            Slot::Leaf(leaf) => Some(leaf),
            Slot::Group(index) => groups
                .get_mut(index)
                .and_then(Option::take)
                .and_then(|(name, members)| collapse(members, &name))
                .map(|merged| FileTreeNode::Directory(merge_identically_named(merged))),
        })
        .collect();

    DirectoryNode { name, children }
}
