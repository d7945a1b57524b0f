//! **kmparse** - Kotlin metadata from smali files as readable class reports
//!
//! Scans `kotlin.Metadata` annotations out of disassembled classes, decodes
//! them, and writes one report per class into a tree that mirrors the input.
//! Split `smali_classesN` roots are merged into a single `smali` tree.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Annotation scanning, tree building, merging and writing
pub mod core {
    /// Marker-delimited region scan and field extraction
    pub mod annotation;

    /// Header record assembly with defaults
    pub mod header;
    pub use header::HeaderRecord;

    /// Metadata tree built from a file or directory
    pub mod tree;
    pub use tree::{DirectoryNode, FileTreeNode, LeafNode, MetadataTreeBuilder};

    /// Multi-root flatten and identical-name merge
    pub mod merge;

    /// Tree serialization to `<name>.txt` reports
    pub mod write;
    pub use write::write_tree;

    /// Default command: preflight, build, write
    pub mod convert;
    pub use convert::{ConvertRequest, Outcome, PreflightError, run as convert_run};
}

/// Binary metadata decoding and report rendering
pub mod metadata;

/// Infrastructure - Configuration, I/O, and logging
pub mod infra {
    /// Layered configuration (file + `KMPARSE_` environment)
    pub mod config;
    pub use config::{Config, init as config_init, load_config};

    /// Memory-mapped file I/O for large files (>1MB threshold)
    pub mod io;
    pub use io::{FileContent, read_file_smart};

    /// tracing-subscriber setup
    pub mod logging;
}

// Re-exports for the binary and library consumers
pub use cli::{AppContext, Cli, Commands};
pub use self::core::{ConvertRequest, FileTreeNode, HeaderRecord, MetadataTreeBuilder, Outcome, convert_run};
pub use infra::{Config, load_config};
pub use metadata::{DecodeError, KotlinMetadataDecoder, MetadataDecoder};
