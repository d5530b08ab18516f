use std::path::PathBuf;
use thiserror::Error;
use treescribe_syntax::{NodeKind, ParseError};

/// Which plugin capability was executing when a failure surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginPhase {
    Visit,
    Resolve,
}

impl std::fmt::Display for PluginPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginPhase::Visit => write!(f, "visit"),
            PluginPhase::Resolve => write!(f, "resolve"),
        }
    }
}

/// Everything that can go wrong while rewriting one document.
///
/// Nothing here is retried; a document's processing is all-or-nothing,
/// and isolating failures across documents is the caller's business.
#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("No syntax root in document {path}: {source}")]
    MissingSyntaxRoot {
        path: String,
        #[source]
        source: ParseError,
    },

    #[error("No semantic model in document {path}")]
    MissingSemanticModel { path: String },

    #[error("Rewritten root is not a source unit (got {kind:?})")]
    InvalidRewriteResult { kind: NodeKind },

    #[error("Plugin \"{plugin}\" failed during {phase}: {source}")]
    Plugin {
        plugin: String,
        phase: PluginPhase,
        #[source]
        source: anyhow::Error,
    },

    #[error("Cannot render {path} in its detected encoding ({encoding})")]
    EncodingDetection { path: PathBuf, encoding: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
