//! Substitution module

pub mod command;
pub mod context;
pub mod lookup;
pub mod types;

pub use command::shell_join;
pub use context::{ArgumentMetadata, LaunchContext};
pub use types::{resolve_argv, resolve_substitutions, CommandErrorMode, Substitution};
