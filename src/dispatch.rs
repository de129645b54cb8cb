//! Routes positional arguments to a registered action.

use tracing::debug;

use crate::{
    tree::{subcommand, Tree},
    Error, Result,
};

/// Name of the action run when the positionals run out at a node.
pub const EXEC: &str = "exec";

/// Descends along `positionals` and invokes the action they select.
///
/// * no positionals: the node's `exec` action;
/// * one: an action of the node with that name, or else the `exec` action
///   of the subcommand with that name;
/// * more: the first one must name a subcommand.
///
/// Names are compared ignoring ASCII case.
pub fn dispatch(tree: &mut dyn Tree, positionals: &[String]) -> Result<()> {
    let node = tree.name();

    match positionals {
        [] => {
            let action = find_action(tree, EXEC)
                .ok_or_else(|| Error::MissingExec { node: node.to_string() })?;
            invoke(tree, action)
        }
        [token] => {
            if let Some(action) = find_action(tree, token) {
                return invoke(tree, action);
            }
            match subcommand(tree, token)? {
                Some(sub) => dispatch(sub, &[]),
                None => Err(Error::NoMatchingAction {
                    token: token.to_string(),
                    node: node.to_string(),
                }),
            }
        }
        [token, rest @ ..] => match subcommand(tree, token)? {
            Some(sub) => dispatch(sub, rest),
            None => {
                Err(Error::NoNestedCommand { token: token.to_string(), node: node.to_string() })
            }
        },
    }
}

/// Whether the last of `positionals` names an action of the node the
/// others lead to, rather than a subcommand.
pub(crate) fn selects_action(tree: &mut dyn Tree, positionals: &[String]) -> Result<bool> {
    match positionals {
        [] => Ok(false),
        [token] => Ok(find_action(tree, token).is_some()),
        [token, rest @ ..] => match subcommand(tree, token)? {
            Some(sub) => selects_action(sub, rest),
            None => Ok(false),
        },
    }
}

fn find_action(tree: &dyn Tree, name: &str) -> Option<&'static str> {
    tree.actions().iter().copied().find(|it| it.eq_ignore_ascii_case(name))
}

fn invoke(tree: &mut dyn Tree, action: &str) -> Result<()> {
    debug!(node = tree.name(), action, "invoking");
    tree.invoke(action)
}
