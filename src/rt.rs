use std::error::Error as StdError;

use crate::{Error, Result};

/// Wraps the result of a registered action.
pub fn action<E>(res: Result<(), E>) -> Result<()>
where
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    res.map_err(|err| Error::Action(err.into()))
}

pub fn unknown_action(node: &str, action: &str) -> Error {
    Error::Contract {
        node: node.to_string(),
        field: action.to_string(),
        reason: "action is listed but can't be invoked".to_string(),
    }
}
