//! Populates a command tree from tokenized arguments.

use std::{collections::HashSet, iter};

use tracing::{debug, trace};

use crate::{
    argv::{Flags, Tokens},
    tree::{subcommand, Slot, Tree},
    Error, Result,
};

/// Which value a flag given several times binds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Repeated {
    #[default]
    First,
    Last,
    /// Fail with [`Error::RepeatedFlag`].
    Reject,
}

#[derive(Debug, Default, Clone)]
pub struct Binder {
    repeated: Repeated,
}

impl Binder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repeated(mut self, repeated: Repeated) -> Self {
        self.repeated = repeated;
        self
    }

    pub fn bind(&self, tree: &mut dyn Tree, tokens: &Tokens) -> Result<()> {
        self.bind_parts(tree, &tokens.positionals, &tokens.flags)
    }

    /// Descends into the subcommand named by `positionals` and assigns
    /// `flags` to the fields of the node it ends up at. Every flag must be
    /// consumed by some field there.
    pub fn bind_parts(&self, tree: &mut dyn Tree, positionals: &[String], flags: &Flags) -> Result<()> {
        let mut seen = HashSet::new();
        self.descend(tree, positionals, flags, &mut seen)?;

        match flags.keys().find(|key| !seen.contains(key)) {
            Some("") => Err(Error::EmptyFlag),
            Some(key) => Err(Error::UnexpectedFlag { key: key.to_string() }),
            None => Ok(()),
        }
    }

    fn descend<'f>(
        &self,
        tree: &mut dyn Tree,
        positionals: &[String],
        flags: &'f Flags,
        seen: &mut HashSet<&'f str>,
    ) -> Result<()> {
        let node = tree.name();

        if let Some((selector, rest)) = positionals.split_first() {
            return match subcommand(tree, selector)? {
                Some(sub) => self.descend(sub, rest, flags, seen),
                None => Err(Error::UnknownSubcommand {
                    token: selector.to_string(),
                    node: node.to_string(),
                }),
            };
        }

        for field in tree.fields() {
            let tag = field.parse_tag()?;
            let Slot::Value(value) = field.slot else { continue };

            let primary = match &tag {
                Some(tag) if !tag.name.is_empty() => tag.name.as_str(),
                _ => field.ident,
            };
            let aliases = tag.iter().flat_map(|tag| tag.aliases.iter().map(String::as_str));

            // Values grouped by flag key, the primary name's keys first.
            let mut matched: Vec<&'f str> = Vec::new();
            let mut groups: Vec<&'f [String]> = Vec::new();
            for name in iter::once(primary).chain(aliases) {
                for (key, values) in flags.iter() {
                    if key.eq_ignore_ascii_case(name) && !matched.contains(&key) {
                        matched.push(key);
                        groups.push(values);
                    }
                }
            }
            seen.extend(matched);

            let text = match self.pick(primary, &groups)? {
                Some(text) => {
                    trace!(field = field.ident, value = text, "assigning flag");
                    text
                }
                None => match &tag {
                    Some(tag) if tag.required => {
                        return Err(Error::RequiredMissing { name: primary.to_string() })
                    }
                    Some(tag) => match tag.default.as_deref() {
                        Some(default) => {
                            debug!(field = field.ident, default, "assigning default");
                            default
                        }
                        None => continue,
                    },
                    None => continue,
                },
            };

            value.assign(text).map_err(|reason| Error::Conversion {
                field: primary.to_string(),
                value: text.to_string(),
                reason,
            })?;
        }

        Ok(())
    }

    /// Picks from the first group, which belongs to the highest-precedence
    /// name that was given.
    fn pick<'v>(&self, name: &str, groups: &[&'v [String]]) -> Result<Option<&'v str>> {
        let total: usize = groups.iter().map(|it| it.len()).sum();
        if self.repeated == Repeated::Reject && total > 1 {
            return Err(Error::RepeatedFlag { name: name.to_string() });
        }
        let res = groups.first().and_then(|values| match self.repeated {
            Repeated::Last => values.last(),
            Repeated::First | Repeated::Reject => values.first(),
        });
        Ok(res.map(String::as_str))
    }
}
