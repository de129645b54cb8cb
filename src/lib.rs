//! Binds command line arguments onto a tree of annotated fields.
//!
//! A command tree is any type implementing [`Tree`]. Value fields carry a
//! compact annotation such as `"path,p,default=."`, nested trees stand for
//! subcommands, and a node may register named actions for [`dispatch`].
//!
//! ```ignore
//! #[derive(Debug, Default, treeflags::Tree)]
//! #[tree(actions(exec))]
//! struct Hello {
//!     #[flag("name,n,required=true")]
//!     name: String,
//!     #[flag("loud,l")]
//!     loud: bool,
//! }
//!
//! let mut hello = Hello::default();
//! treeflags::run_env(&mut hello)?;
//! ```
extern crate self as treeflags;

pub use treeflags_macros::Tree;

pub mod argv;
pub mod bind;
pub mod dispatch;
pub mod tag;
pub mod usage;

mod error;
mod tree;

/// Private impl details for macros.
#[doc(hidden)]
pub mod rt;

pub use crate::{
    argv::{tokenize, Flags, Tokens},
    bind::{Binder, Repeated},
    dispatch::dispatch,
    error::Error,
    tag::{Tag, TagError},
    tree::{describe, Descriptor, Field, Kind, Slot, Tree, Value},
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Populates `tree` from the process arguments.
pub fn bind_env<T: Tree>(tree: &mut T) -> Result<()> {
    let tokens = tokenize(args_from_env()?);
    Binder::new().bind(tree, &tokens)
}

/// Populates `tree` from `args`, which must not include the program name.
pub fn bind_vec<T: Tree>(tree: &mut T, args: Vec<String>) -> Result<()> {
    Binder::new().bind(tree, &tokenize(args))
}

/// Invokes the action selected by the positional process arguments.
pub fn dispatch_env<T: Tree>(tree: &mut T) -> Result<()> {
    let tokens = tokenize(args_from_env()?);
    dispatch(tree, &tokens.positionals)
}

pub fn dispatch_vec<T: Tree>(tree: &mut T, args: Vec<String>) -> Result<()> {
    dispatch(tree, &tokenize(args).positionals)
}

/// Binds the process arguments and then dispatches to the selected action.
pub fn run_env<T: Tree>(tree: &mut T) -> Result<()> {
    run_tokens(tree, &tokenize(args_from_env()?))
}

pub fn run_vec<T: Tree>(tree: &mut T, args: Vec<String>) -> Result<()> {
    run_tokens(tree, &tokenize(args))
}

fn run_tokens<T: Tree>(tree: &mut T, tokens: &Tokens) -> Result<()> {
    let mut path = tokens.positionals.as_slice();
    if dispatch::selects_action(tree, path)? {
        path = &path[..path.len() - 1];
    }
    Binder::new().bind_parts(tree, path, &tokens.flags)?;
    dispatch(tree, &tokens.positionals)
}

fn args_from_env() -> Result<Vec<String>> {
    std::env::args_os().skip(1).map(|arg| arg.into_string().map_err(Error::InvalidUtf8)).collect()
}
