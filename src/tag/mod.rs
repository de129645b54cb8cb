//! Field annotations: `name[,alias]*[,required=true][,default=<value>]`.

mod scanner;

use thiserror::Error;

use self::scanner::Scanner;

/// A parsed field annotation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub aliases: Vec<String>,
    pub required: bool,
    pub default: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("unknown key `{key}` in annotation `{tag}`")]
    UnknownKey { tag: String, key: String },

    #[error("annotation `{tag}` is both required and has a default")]
    RequiredWithDefault { tag: String },
}

impl Tag {
    /// Parses an annotation.
    ///
    /// `default=` must be the last segment: everything after it, commas
    /// included, is the default value. `required=` is only truthy for the
    /// exact value `true`.
    pub fn parse(text: &str) -> Result<Tag, TagError> {
        let mut res = Tag::default();
        if text.is_empty() {
            return Ok(res);
        }

        Scanner::new(text).scan()?.imprint(&mut res);

        if res.required && res.has_default() {
            return Err(TagError::RequiredWithDefault { tag: text.to_string() });
        }
        Ok(res)
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// The primary name followed by the aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}
