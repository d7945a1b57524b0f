//! Filepath: src/core/tree.rs
//! Metadata tree mirroring the source layout.
//!
//! Leaves are annotated smali files with their decoded report; directories
//! hold at least one descendant leaf. Children keep the order the filesystem
//! listed them in.

use std::fs;
use std::io;
use std::path::Path;

use owo_colors::OwoColorize;
use ptree::TreeBuilder;
use tracing::{debug, instrument, trace};

use crate::core::header::HeaderRecord;
use crate::infra::io::read_file_smart;
use crate::metadata::model::ClassDescription;
use crate::metadata::{KotlinMetadataDecoder, MetadataDecoder};

/// Extension of the files a directory walk picks up
pub const SMALI_EXTENSION: &str = "smali";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileTreeNode
{
    Directory(DirectoryNode),
    Leaf(LeafNode),
}

/// A named directory with at least one child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode
{
    pub(crate) name: String,
    pub(crate) children: Vec<FileTreeNode>,
}

/// One annotated class: header plus the report it decodes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNode
{
    name: String,
    header: HeaderRecord,
    description: ClassDescription,
}

impl DirectoryNode
{
    /// `None` for an empty child list; empty directories are never built.
    pub fn new(
        name: impl Into<String>,
        children: Vec<FileTreeNode>,
    ) -> Option<Self>
    {
        if children.is_empty()
        {
            return None;
        }
        Some(Self { name: name.into(), children })
    }

    pub fn name(&self) -> &str
    {
        &self.name
    }

    pub fn children(&self) -> &[FileTreeNode]
    {
        &self.children
    }

    pub fn into_children(self) -> Vec<FileTreeNode>
    {
        self.children
    }
}

impl LeafNode
{
    pub fn new(
        name: impl Into<String>,
        header: HeaderRecord,
        description: ClassDescription,
    ) -> Self
    {
        Self { name: name.into(), header, description }
    }

    pub fn name(&self) -> &str
    {
        &self.name
    }

    pub fn header(&self) -> &HeaderRecord
    {
        &self.header
    }

    pub fn description(&self) -> &ClassDescription
    {
        &self.description
    }

    /// Text written to the leaf's output file.
    pub fn report(&self) -> String
    {
        self.description
            .render()
    }
}

impl FileTreeNode
{
    pub fn name(&self) -> &str
    {
        match self
        {
            FileTreeNode::Directory(dir) => dir.name(),
            FileTreeNode::Leaf(leaf) => leaf.name(),
        }
    }

    pub fn is_directory(&self) -> bool
    {
        matches!(self, FileTreeNode::Directory(_))
    }

    /// Number of leaves at any depth.
    pub fn leaf_count(&self) -> usize
    {
        match self
        {
            FileTreeNode::Directory(dir) => dir
                .children
                .iter()
                .map(FileTreeNode::leaf_count)
                .sum(),
            FileTreeNode::Leaf(_) => 1,
        }
    }
}

/// Builds metadata trees from files and directories.
#[derive(Debug, Default, Clone)]
pub struct MetadataTreeBuilder<D = KotlinMetadataDecoder>
{
    decoder: D,
}

impl MetadataTreeBuilder
{
    pub fn new() -> Self
    {
        Self::default()
    }
}

impl<D: MetadataDecoder> MetadataTreeBuilder<D>
{
    pub fn with_decoder(decoder: D) -> Self
    {
        Self { decoder }
    }

    /// Directory paths are walked; anything else is parsed as one smali file
    /// whatever its extension.
    #[instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub fn build(
        &self,
        path: &Path,
    ) -> Option<FileTreeNode>
    {
        if path.is_dir()
        {
            self.build_directory(path)
                .map(FileTreeNode::Directory)
        }
        else
        {
            self.build_leaf(path)
                .map(FileTreeNode::Leaf)
        }
    }

    fn build_directory(
        &self,
        path: &Path,
    ) -> Option<DirectoryNode>
    {
        let entries = match fs::read_dir(path)
        {
            Ok(entries) => entries,
            Err(err) =>
            {
                debug!(path = %path.display(), %err, "skipping unreadable directory");
                return None;
            }
        };

        let children: Vec<FileTreeNode> = entries
            .filter_map(|entry| match entry
            {
                Ok(entry) => Some(entry.path()),
                Err(err) =>
                {
                    debug!(path = %path.display(), %err, "skipping unreadable entry");
                    None
                }
            })
            .filter_map(|child| {
                if has_smali_extension(&child)
                {
                    self.build_leaf(&child)
                        .map(FileTreeNode::Leaf)
                }
                else if child.is_dir()
                {
                    self.build_directory(&child)
                        .map(FileTreeNode::Directory)
                }
                else
                {
                    trace!(path = %child.display(), "ignoring non-smali file");
                    None
                }
            })
            .collect();

        if children.is_empty()
        {
            trace!(path = %path.display(), "pruning empty directory");
        }
        DirectoryNode::new(directory_name(path), children)
    }

    fn build_leaf(
        &self,
        path: &Path,
    ) -> Option<LeafNode>
    {
        let content = match read_file_smart(path)
        {
            Ok(content) => content,
            Err(err) =>
            {
                debug!(path = %path.display(), err = %format!("{err:#}"), "skipping unreadable file");
                return None;
            }
        };

        let leaf = self.parse_leaf(leaf_name(path), &content.text());
        if leaf.is_none()
        {
            trace!(path = %path.display(), "no usable metadata annotation");
        }
        leaf
    }

    /// Scan, assemble and decode one file's text.
    pub fn parse_leaf(
        &self,
        name: impl Into<String>,
        text: &str,
    ) -> Option<LeafNode>
    {
        let header = HeaderRecord::from_smali(text)?;
        match self
            .decoder
            .decode(&header)
        {
            Ok(description) => Some(LeafNode::new(name, header, description)),
            Err(err) =>
            {
                debug!(%err, "metadata could not be decoded");
                None
            }
        }
    }
}

fn has_smali_extension(path: &Path) -> bool
{
    path.extension()
        .is_some_and(|ext| ext == SMALI_EXTENSION)
}

/// File name with a trailing `.smali` removed.
fn leaf_name(path: &Path) -> String
{
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    name.strip_suffix(".smali")
        .unwrap_or(&name)
        .to_string()
}

/// Last path component; `.` and `..` resolve to the real directory name.
fn directory_name(path: &Path) -> String
{
    if let Some(name) = path.file_name()
    {
        return name
            .to_string_lossy()
            .into_owned();
    }

    dunce::canonicalize(path)
        .ok()
        .and_then(|p| {
            p.file_name()
                .map(|n| {
                    n.to_string_lossy()
                        .into_owned()
                })
        })
        .unwrap_or_else(|| {
            path.to_string_lossy()
                .into_owned()
        })
}

/// Render the tree with `ptree`; directories end in `/`, leaves in `.txt`.
pub fn write_preview<W: io::Write>(
    node: &FileTreeNode,
    color: bool,
    out: W,
) -> io::Result<()>
{
    let mut builder = TreeBuilder::new(node_label(node, color));
    if let FileTreeNode::Directory(dir) = node
    {
        add_children_to_builder(&mut builder, &dir.children, color);
    }

    ptree::write_tree(&builder.build(), out)
}

fn add_children_to_builder(
    builder: &mut TreeBuilder,
    children: &[FileTreeNode],
    color: bool,
)
{
    for child in children
    {
        match child
        {
            FileTreeNode::Directory(dir) =>
            {
                builder.begin_child(node_label(child, color));
                add_children_to_builder(builder, &dir.children, color);
                builder.end_child();
            }
            FileTreeNode::Leaf(_) =>
            {
                builder.add_empty_child(node_label(child, color));
            }
        }
    }
}

fn node_label(
    node: &FileTreeNode,
    color: bool,
) -> String
{
    match (node, color)
    {
        (FileTreeNode::Directory(dir), true) => format!("{}/", dir.name().blue()),
        (FileTreeNode::Directory(dir), false) => format!("{}/", dir.name()),
        (FileTreeNode::Leaf(leaf), true) => format!("{}.txt", leaf.name().green()),
        (FileTreeNode::Leaf(leaf), false) => format!("{}.txt", leaf.name()),
    }
}
