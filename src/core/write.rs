//! Filepath: src/core/write.rs
//! Serialize a metadata tree to disk.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::trace;

use crate::core::tree::FileTreeNode;

/// Extension of every per-class report file
pub const OUTPUT_EXTENSION: &str = "txt";

/// Write `node` under `parent`.
///
/// Directories are created with `create_dir` and fail if they already
/// exist. Leaves become `<name>.txt`; a later leaf with the same name
/// overwrites an earlier one.
pub fn write_tree(
    node: &FileTreeNode,
    parent: &Path,
) -> Result<()>
{
    match node
    {
        FileTreeNode::Directory(dir) =>
        {
            let path = parent.join(dir.name());
            fs::create_dir(&path)
                .with_context(|| format!("Failed to create directory {}", path.display()))?;

            for child in dir.children()
            {
                write_tree(child, &path)?;
            }
        }
        FileTreeNode::Leaf(leaf) =>
        {
            let path = parent.join(format!("{}.{OUTPUT_EXTENSION}", leaf.name()));
            trace!(path = %path.display(), "writing report");
            fs::write(&path, leaf.report())
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
    }
    Ok(())
}
