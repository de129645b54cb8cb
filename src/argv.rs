//! Splits raw arguments into positionals and flags.

use tracing::trace;

/// The result of [`tokenize`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tokens {
    pub positionals: Vec<String>,
    pub flags: Flags,
}

/// Flag keys, without their leading dashes, mapped to the values they were
/// given. Keys are kept in the order they were first seen.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Flags {
    entries: Vec<(String, Vec<String>)>,
}

impl Flags {
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.iter().find(|(it, _)| it == key).map(|(_, values)| values.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, key: String, value: String) {
        match self.entries.iter_mut().find(|(it, _)| *it == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Flags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut res = Flags::default();
        for (key, value) in iter {
            res.push(key.into(), value.into());
        }
        res
    }
}

/// Splits `args` (without the program name) in a single pass.
///
/// A token starting with `-` is a flag; all leading dashes are stripped to
/// get its key. The flag takes the next token as its value unless that
/// token is itself a flag or missing, in which case the value is `"true"`.
/// Every other token is positional.
pub fn tokenize<I, S>(args: I) -> Tokens
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut res = Tokens::default();
    let mut args = args.into_iter().map(Into::into).peekable();

    while let Some(arg) = args.next() {
        let key = match arg.strip_prefix('-') {
            Some(rest) => rest.trim_start_matches('-').to_string(),
            None => {
                trace!(arg = %arg, "positional");
                res.positionals.push(arg);
                continue;
            }
        };

        let value = match args.next_if(|next| !next.starts_with('-')) {
            Some(value) => value,
            None => "true".to_string(),
        };
        trace!(key = %key, value = %value, "flag");
        res.flags.push(key, value);
    }

    res
}
