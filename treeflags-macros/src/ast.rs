#[derive(Debug)]
pub(crate) struct Tree {
    pub(crate) name: String,
    pub(crate) doc: Option<String>,
    pub(crate) actions: Vec<String>,
    pub(crate) fields: Vec<Field>,
}

#[derive(Debug)]
pub(crate) struct Field {
    /// As written, including a possible `r#`.
    pub(crate) ident: String,
    pub(crate) doc: Option<String>,
    pub(crate) kind: Kind,
    pub(crate) tag: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    Value,
    Tree,
}
