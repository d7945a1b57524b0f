//! Filepath: src/core/convert.rs
//! Default command: smali source in, `KotlinClassMetadata` report tree out.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::cli::{AppContext, ParseArgs};
use crate::core::merge::{build_merged, has_smali_roots, smali_roots};
use crate::core::tree::{FileTreeNode, MetadataTreeBuilder, write_preview};
use crate::core::write::write_tree;
use crate::infra::config::load_config;
use crate::metadata::MetadataDecoder;

/// Directory created under DEST to hold the reports
pub const OUTPUT_DIRECTORY_NAME: &str = "KotlinClassMetadata";

/// Checks done before any file is read.
#[derive(Debug, Error)]
pub enum PreflightError
{
    #[error("Source file or directory does not exist: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error(
        "Destination directory already exists: {}. Use --force (or -f) to force overwrite",
        .0.display()
    )]
    DestinationExists(PathBuf),

    #[error("Destination is not a directory: {}", .0.display())]
    DestinationNotDirectory(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ConvertRequest
{
    pub source: PathBuf,
    pub destination: PathBuf,
    pub all_files: bool,
    pub force: bool,
}

impl ConvertRequest
{
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
    ) -> Self
    {
        Self { source: source.into(), destination: destination.into(), all_files: false, force: false }
    }

    pub fn with_all_files(
        mut self,
        all_files: bool,
    ) -> Self
    {
        self.all_files = all_files;
        self
    }

    pub fn with_force(
        mut self,
        force: bool,
    ) -> Self
    {
        self.force = force;
        self
    }

    /// `<DEST>/KotlinClassMetadata`
    pub fn output_dir(&self) -> PathBuf
    {
        self.destination
            .join(OUTPUT_DIRECTORY_NAME)
    }

    pub fn preflight(&self) -> Result<(), PreflightError>
    {
        if !self
            .source
            .exists()
        {
            return Err(PreflightError::SourceMissing(self.source.clone()));
        }

        let destination = &self.destination;
        if destination.exists()
        {
            if !destination.is_dir()
            {
                return Err(PreflightError::DestinationNotDirectory(destination.clone()));
            }
            if !self.force
            {
                return Err(PreflightError::DestinationExists(destination.clone()));
            }
        }
        Ok(())
    }

    /// Split decoder output (`smali`, `smali_classes2`, ...) unless --all.
    pub fn is_multi_root(&self) -> bool
    {
        !self.all_files && has_smali_roots(&self.source)
    }
}

#[derive(Debug)]
pub enum Outcome
{
    Written
    {
        output: PathBuf,
        leaves: usize,
    },
    /// Dry run: the tree that would have been written
    Preview(FileTreeNode),
    NothingFound,
}

/// Build the tree for `request` in single- or multi-root mode.
#[instrument(level = "debug", skip_all, fields(source = %request.source.display()))]
pub fn build_metadata_tree<D: MetadataDecoder>(
    builder: &MetadataTreeBuilder<D>,
    request: &ConvertRequest,
) -> Result<Option<FileTreeNode>>
{
    if request.is_multi_root()
    {
        let roots = smali_roots(&request.source)?;
        debug!(count = roots.len(), "multi-root mode");
        Ok(build_merged(builder, &roots).map(FileTreeNode::Directory))
    }
    else
    {
        Ok(builder.build(&request.source))
    }
}

/// Validate, build and (unless `dry_run`) write.
pub fn convert<D: MetadataDecoder>(
    builder: &MetadataTreeBuilder<D>,
    request: &ConvertRequest,
    dry_run: bool,
) -> Result<Outcome>
{
    request.preflight()?;

    let Some(tree) = build_metadata_tree(builder, request)?
    else
    {
        return Ok(Outcome::NothingFound);
    };

    if dry_run
    {
        return Ok(Outcome::Preview(tree));
    }

    let output = request.output_dir();
    if request.force && output.exists()
    {
        fs::remove_dir_all(&output)
            .with_context(|| format!("Failed to remove {}", output.display()))?;
    }
    fs::create_dir_all(&output).with_context(|| format!("Failed to create {}", output.display()))?;

    write_tree(&tree, &output)?;

    Ok(Outcome::Written { output, leaves: tree.leaf_count() })
}

pub fn run(
    args: ParseArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config = load_config().unwrap_or_default();

    let source = args
        .source
        .context("SOURCE is required")?;
    let destination = match args
        .destination
        .or(config.default_destination)
    {
        Some(destination) => destination,
        None => std::env::current_dir().context("Failed to resolve the working directory")?,
    };

    let request = ConvertRequest::new(source, destination)
        .with_all_files(args.all || config.all_files)
        .with_force(args.force || config.force);

    match convert(&MetadataTreeBuilder::new(), &request, ctx.dry_run)?
    {
        Outcome::Written { output, leaves } =>
        {
            info!(output = %display_path(&output), leaves, "reports written");
            if !ctx.quiet
            {
                println!("{}", paint(ctx, "Finished", |s| s.green().to_string()));
            }
        }
        Outcome::Preview(tree) =>
        {
            if !ctx.quiet
            {
                println!(
                    "{} {}",
                    paint(ctx, "DRY RUN: Would write to", |s| s.yellow().to_string()),
                    display_path(&request.output_dir())
                );
                write_preview(&tree, !ctx.no_color, io::stdout().lock())?;
            }
        }
        Outcome::NothingFound =>
        {
            if !ctx.quiet
            {
                println!("{}", paint(ctx, "No Kotlin annotated smali files found", |s| s.yellow().to_string()));
            }
        }
    }

    Ok(())
}

fn paint(
    ctx: &AppContext,
    text: &str,
    style: impl Fn(&str) -> String,
) -> String
{
    if ctx.no_color { text.to_string() } else { style(text) }
}

/// Canonical path for messages, falling back to the path as given.
fn display_path(path: &Path) -> String
{
    dunce::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
