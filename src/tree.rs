use std::path::PathBuf;

use tracing::debug;

use crate::{rt, tag::Tag, Error, Result};

/// A node of a command tree.
///
/// [`Tree::fields`] is the registry the binder walks: every field is handed
/// out as a mutable slot together with its identifier and annotation.
/// Usually implemented with `#[derive(Tree)]`, but a hand-written impl is
/// just as good:
///
/// ```
/// use treeflags::{Field, Tree};
///
/// #[derive(Default)]
/// struct Fetch {
///     depth: u32,
///     branch: String,
/// }
///
/// impl Tree for Fetch {
///     fn name(&self) -> &'static str {
///         "Fetch"
///     }
///     fn fields(&mut self) -> Vec<Field<'_>> {
///         vec![
///             Field::value("depth", &mut self.depth).with_tag("depth,d,default=1"),
///             Field::value("branch", &mut self.branch).with_tag("branch,b"),
///         ]
///     }
/// }
///
/// let mut fetch = Fetch::default();
/// treeflags::bind_vec(&mut fetch, vec!["-b".into(), "main".into()]).unwrap();
/// assert_eq!((fetch.depth, fetch.branch.as_str()), (1, "main"));
/// ```
pub trait Tree {
    /// Type name, used in error messages.
    fn name(&self) -> &'static str;

    fn about(&self) -> Option<&'static str> {
        None
    }

    /// Fields in declaration order.
    fn fields(&mut self) -> Vec<Field<'_>>;

    /// Names of the actions [`Tree::invoke`] accepts.
    fn actions(&self) -> &'static [&'static str] {
        &[]
    }

    /// Runs the action registered under exactly `action`.
    fn invoke(&mut self, action: &str) -> Result<()> {
        Err(rt::unknown_action(self.name(), action))
    }
}

pub struct Field<'a> {
    /// Field identifier in kebab case; doubles as the flag or subcommand
    /// name when there is no annotation.
    pub ident: &'static str,
    pub tag: Option<&'static str>,
    pub doc: Option<&'static str>,
    pub slot: Slot<'a>,
}

pub enum Slot<'a> {
    Value(&'a mut dyn Value),
    Tree(&'a mut dyn Tree),
}

impl<'a> Field<'a> {
    pub fn value(ident: &'static str, value: &'a mut dyn Value) -> Self {
        Field { ident, tag: None, doc: None, slot: Slot::Value(value) }
    }

    pub fn tree(ident: &'static str, tree: &'a mut dyn Tree) -> Self {
        Field { ident, tag: None, doc: None, slot: Slot::Tree(tree) }
    }

    pub fn with_tag(mut self, tag: &'static str) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn with_doc(mut self, doc: &'static str) -> Self {
        self.doc = Some(doc);
        self
    }

    pub(crate) fn parse_tag(&self) -> Result<Option<Tag>> {
        match self.tag {
            None => Ok(None),
            Some(text) => Tag::parse(text)
                .map(Some)
                .map_err(|source| Error::Annotation { field: self.ident.to_string(), source }),
        }
    }

    /// Like [`Field::parse_tag`], for subcommand fields, which can be neither
    /// required nor defaulted.
    pub(crate) fn parse_subcommand_tag(&self, node: &str) -> Result<Option<Tag>> {
        let tag = self.parse_tag()?;
        match &tag {
            Some(tag) if tag.required || tag.has_default() => Err(Error::Contract {
                node: node.to_string(),
                field: self.ident.to_string(),
                reason: "a subcommand can't be required or have a default".to_string(),
            }),
            _ => Ok(tag),
        }
    }

    /// Whether `token` selects this field, by identifier, name or alias.
    pub(crate) fn answers_to(&self, token: &str, tag: Option<&Tag>) -> bool {
        self.ident.eq_ignore_ascii_case(token)
            || tag.map_or(false, |tag| {
                tag.names().any(|name| !name.is_empty() && name.eq_ignore_ascii_case(token))
            })
    }
}

/// A leaf field which can be assigned from text.
pub trait Value {
    fn assign(&mut self, text: &str) -> Result<(), String>;

    /// Short type description for usage output.
    fn kind(&self) -> &'static str;
}

impl Value for String {
    fn assign(&mut self, text: &str) -> Result<(), String> {
        *self = text.to_string();
        Ok(())
    }
    fn kind(&self) -> &'static str {
        "string"
    }
}

impl Value for PathBuf {
    fn assign(&mut self, text: &str) -> Result<(), String> {
        *self = PathBuf::from(text);
        Ok(())
    }
    fn kind(&self) -> &'static str {
        "path"
    }
}

impl Value for bool {
    fn assign(&mut self, text: &str) -> Result<(), String> {
        *self = if text.eq_ignore_ascii_case("true") {
            true
        } else if text.eq_ignore_ascii_case("false") {
            false
        } else {
            return Err("expected `true` or `false`".to_string());
        };
        Ok(())
    }
    fn kind(&self) -> &'static str {
        "bool"
    }
}

impl<T: Value + Default> Value for Option<T> {
    fn assign(&mut self, text: &str) -> Result<(), String> {
        let mut value = T::default();
        value.assign(text)?;
        *self = Some(value);
        Ok(())
    }
    fn kind(&self) -> &'static str {
        T::default().kind()
    }
}

// Integers parse at 64 bits and are then narrowed; narrowing never wraps.
macro_rules! int_value {
    ($wide:ty => $($ty:ty),*) => {$(
        impl Value for $ty {
            fn assign(&mut self, text: &str) -> Result<(), String> {
                let wide = text.parse::<$wide>().map_err(|err| err.to_string())?;
                *self = <$ty>::try_from(wide)
                    .map_err(|_| format!("{} is out of range for {}", wide, stringify!($ty)))?;
                Ok(())
            }
            fn kind(&self) -> &'static str {
                stringify!($ty)
            }
        }
    )*};
}

int_value!(i64 => i8, i16, i32, i64, isize);
int_value!(u64 => u8, u16, u32, u64, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Value(&'static str),
    Tree,
}

/// What usage output needs to know about a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub ident: &'static str,
    pub tag: Tag,
    pub doc: Option<&'static str>,
    pub kind: Kind,
}

impl Descriptor {
    /// The annotation name, falling back to the identifier.
    pub fn name(&self) -> &str {
        if self.tag.name.is_empty() {
            self.ident
        } else {
            &self.tag.name
        }
    }
}

/// Parses the annotations of the fields of `tree`, in declaration order.
pub fn describe(tree: &mut dyn Tree) -> Result<Vec<Descriptor>> {
    tree.fields()
        .into_iter()
        .map(|field| -> Result<Descriptor> {
            let tag = field.parse_tag()?.unwrap_or_default();
            let kind = match &field.slot {
                Slot::Value(value) => Kind::Value(value.kind()),
                Slot::Tree(_) => Kind::Tree,
            };
            Ok(Descriptor { ident: field.ident, tag, doc: field.doc, kind })
        })
        .collect()
}

/// Finds the subcommand field of `tree` that answers to `token`.
pub(crate) fn subcommand<'a>(tree: &'a mut dyn Tree, token: &str) -> Result<Option<&'a mut dyn Tree>> {
    let node = tree.name();
    for field in tree.fields() {
        if !matches!(field.slot, Slot::Tree(_)) {
            continue;
        }
        let tag = field.parse_subcommand_tag(node)?;
        if !field.answers_to(token, tag.as_ref()) {
            continue;
        }
        if let Slot::Tree(sub) = field.slot {
            debug!(node, subcommand = field.ident, "descending");
            return Ok(Some(sub));
        }
    }
    Ok(None)
}
