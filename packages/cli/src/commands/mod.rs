mod rewrite;

pub use rewrite::{rewrite, RewriteArgs};
