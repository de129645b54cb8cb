use std::{fmt, mem};

#[cfg(not(test))]
use proc_macro::{Delimiter, TokenStream, TokenTree};
#[cfg(test)]
use proc_macro2::{Delimiter, TokenStream, TokenTree};

use crate::ast;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub(crate) struct Error {
    msg: String,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.msg, f)
    }
}

pub(crate) fn parse(ts: TokenStream) -> Result<ast::Tree> {
    let mut p = Parser::new(ts);
    tree(&mut p)
}

macro_rules! format_err {
    ($($tt:tt)*) => {
        Error { msg: format!($($tt)*) }
    };
}

macro_rules! bail {
    ($($tt:tt)*) => {
        return Err(format_err!($($tt)*))
    };
}

enum Attr {
    Doc(String),
    Flag(String),
    Command(Option<String>),
    Actions(Vec<String>),
    Skip,
    Other,
}

fn tree(p: &mut Parser) -> Result<ast::Tree> {
    let attrs = attrs(p)?;
    visibility(p);
    if !p.eat_keyword("struct") {
        bail!("only structs can be trees")
    }
    let name = p.expect_ident()?;
    if p.eat_punct('<') {
        bail!("generic trees are not supported: `{}`", name)
    }

    let mut docs = Vec::new();
    let mut actions = Vec::new();
    for attr in attrs {
        match attr {
            Attr::Doc(line) => docs.push(line),
            Attr::Actions(names) => actions.extend(names),
            Attr::Flag(_) | Attr::Command(_) | Attr::Skip => {
                bail!("`#[flag]`, `#[command]` and `#[tree(skip)]` belong on fields of `{}`", name)
            }
            Attr::Other => (),
        }
    }

    let mut res = ast::Tree { name, doc: paragraph(&docs), actions, fields: Vec::new() };

    if p.eat_punct(';') {
        return Ok(res);
    }
    if p.at_keyword("where") {
        bail!("generic trees are not supported: `{}`", res.name)
    }
    if !p.at_delim(Delimiter::Brace) {
        bail!("tuple structs can't be trees: `{}`", res.name)
    }

    p.enter_delim(Delimiter::Brace)?;
    while !p.end() {
        if let Some(field) = field(p)? {
            res.fields.push(field);
        }
    }
    p.exit_delim()?;
    Ok(res)
}

fn field(p: &mut Parser) -> Result<Option<ast::Field>> {
    let attrs = attrs(p)?;
    visibility(p);
    let ident = p.expect_ident()?;
    p.expect_punct(':')?;
    skip_ty(p);
    p.eat_punct(',');

    let mut docs = Vec::new();
    let mut kind = ast::Kind::Value;
    let mut tag = None;
    let mut skip = false;
    for attr in attrs {
        match attr {
            Attr::Doc(line) => docs.push(line),
            Attr::Flag(it) => {
                if kind == ast::Kind::Tree || tag.is_some() {
                    bail!("`{}` has more than one annotation", ident)
                }
                tag = Some(it);
            }
            Attr::Command(it) => {
                if kind == ast::Kind::Tree || tag.is_some() {
                    bail!("`{}` has more than one annotation", ident)
                }
                kind = ast::Kind::Tree;
                tag = it;
            }
            Attr::Actions(_) => bail!("`#[tree(actions(...))]` belongs on the struct"),
            Attr::Skip => skip = true,
            Attr::Other => (),
        }
    }
    if skip {
        if kind == ast::Kind::Tree || tag.is_some() {
            bail!("`{}` is skipped but annotated", ident)
        }
        return Ok(None);
    }

    Ok(Some(ast::Field { ident, doc: paragraph(&docs), kind, tag }))
}

fn attrs(p: &mut Parser) -> Result<Vec<Attr>> {
    let mut res = Vec::new();
    while p.eat_punct('#') {
        p.enter_delim(Delimiter::Bracket)?;
        let name = p.expect_ident()?;
        let attr = match name.as_str() {
            "doc" => {
                p.expect_punct('=')?;
                let text = p.expect_string()?;
                Attr::Doc(text.strip_prefix(' ').map(str::to_string).unwrap_or(text))
            }
            "flag" => {
                p.enter_delim(Delimiter::Parenthesis)?;
                let tag = p.expect_string()?;
                p.exit_delim()?;
                Attr::Flag(tag)
            }
            "command" => {
                if p.at_delim(Delimiter::Parenthesis) {
                    p.enter_delim(Delimiter::Parenthesis)?;
                    let tag = p.expect_string()?;
                    p.exit_delim()?;
                    Attr::Command(Some(tag))
                } else {
                    Attr::Command(None)
                }
            }
            "tree" => {
                p.enter_delim(Delimiter::Parenthesis)?;
                if p.eat_keyword("skip") {
                    p.exit_delim()?;
                    p.exit_delim()?;
                    res.push(Attr::Skip);
                    continue;
                }
                p.expect_keyword("actions")?;
                p.enter_delim(Delimiter::Parenthesis)?;
                let mut names = Vec::new();
                while !p.end() {
                    names.push(p.expect_ident()?);
                    if !p.end() {
                        p.expect_punct(',')?;
                    }
                }
                p.exit_delim()?;
                p.exit_delim()?;
                Attr::Actions(names)
            }
            _ => {
                p.skip_rest();
                Attr::Other
            }
        };
        p.exit_delim()?;
        res.push(attr);
    }
    Ok(res)
}

fn visibility(p: &mut Parser) {
    if p.eat_keyword("pub") && p.at_delim(Delimiter::Parenthesis) {
        p.ts.pop();
    }
}

/// Skips a field type, up to the `,` that ends the field.
fn skip_ty(p: &mut Parser) {
    let mut depth = 0usize;
    let mut prev = None;
    while let Some(tt) = p.ts.last() {
        if let TokenTree::Punct(punct) = tt {
            match punct.as_char() {
                ',' if depth == 0 => break,
                '<' => depth += 1,
                // `->` in fn pointer types
                '>' if prev != Some('-') => depth = depth.saturating_sub(1),
                _ => (),
            }
            prev = Some(punct.as_char());
        } else {
            prev = None;
        }
        p.ts.pop();
    }
}

/// Joins the first paragraph of a doc comment into a single line.
fn paragraph(lines: &[String]) -> Option<String> {
    let res = lines
        .iter()
        .map(|it| it.trim())
        .skip_while(|it| it.is_empty())
        .take_while(|it| !it.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if res.is_empty() {
        None
    } else {
        Some(res)
    }
}

struct Parser {
    stack: Vec<Vec<TokenTree>>,
    ts: Vec<TokenTree>,
}

impl Parser {
    fn new(ts: TokenStream) -> Self {
        let mut ts = ts.into_iter().collect::<Vec<_>>();
        ts.reverse();
        Self { stack: Vec::new(), ts }
    }

    fn at_delim(&mut self, delimiter: Delimiter) -> bool {
        match self.ts.last() {
            Some(TokenTree::Group(g)) => g.delimiter() == delimiter,
            _ => false,
        }
    }
    fn enter_delim(&mut self, delimiter: Delimiter) -> Result<()> {
        match self.ts.pop() {
            Some(TokenTree::Group(g)) if g.delimiter() == delimiter => {
                let mut ts = g.stream().into_iter().collect::<Vec<_>>();
                ts.reverse();
                let ts = mem::replace(&mut self.ts, ts);
                self.stack.push(ts);
            }
            _ => bail!("expected {}", open_delim(delimiter)),
        }
        Ok(())
    }
    fn exit_delim(&mut self) -> Result<()> {
        if !self.end() {
            bail!("unexpected `{}`", self.ts.last().map(|it| it.to_string()).unwrap_or_default())
        }
        self.ts = self.stack.pop().unwrap_or_default();
        Ok(())
    }
    fn skip_rest(&mut self) {
        self.ts.clear();
    }
    fn end(&mut self) -> bool {
        self.ts.last().is_none()
    }

    fn expect_keyword(&mut self, kw: &str) -> Result<()> {
        if !self.eat_keyword(kw) {
            bail!("expected `{}`", kw)
        }
        Ok(())
    }
    fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.at_keyword(kw) {
            self.ts.pop();
            true
        } else {
            false
        }
    }
    fn at_keyword(&mut self, kw: &str) -> bool {
        match self.ts.last() {
            Some(TokenTree::Ident(ident)) => ident.to_string() == kw,
            _ => false,
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match self.ts.pop() {
            Some(TokenTree::Ident(ident)) => Ok(ident.to_string()),
            Some(tt) => bail!("expected a name, got: `{}`", tt),
            None => bail!("expected a name"),
        }
    }

    fn expect_punct(&mut self, punct: char) -> Result<()> {
        if !self.eat_punct(punct) {
            bail!("expected `{}`", punct)
        }
        Ok(())
    }
    fn eat_punct(&mut self, punct: char) -> bool {
        match self.ts.last() {
            Some(TokenTree::Punct(p)) if p.as_char() == punct => {
                self.ts.pop();
                true
            }
            _ => false,
        }
    }

    fn expect_string(&mut self) -> Result<String> {
        match self.ts.pop() {
            Some(TokenTree::Literal(lit)) => match str_lit_value(&lit.to_string()) {
                Some(it) => Ok(it),
                None => bail!("expected a string, got: `{}`", lit),
            },
            Some(tt) => bail!("expected a string, got: `{}`", tt),
            None => bail!("expected a string"),
        }
    }
}

fn open_delim(delimiter: Delimiter) -> &'static str {
    match delimiter {
        Delimiter::Parenthesis => "`(`",
        Delimiter::Brace => "`{`",
        Delimiter::Bracket => "`[`",
        Delimiter::None => "a group",
    }
}

/// The value of a (possibly raw) string literal.
///
/// Really needs support in the proc_macro library:
/// <https://internals.rust-lang.org/t/getting-value-out-of-proc-macro-literal/14140>
fn str_lit_value(lit: &str) -> Option<String> {
    if let Some(raw) = lit.strip_prefix('r') {
        let hashes = raw.len() - raw.trim_start_matches('#').len();
        let body = raw.get(hashes..raw.len().checked_sub(hashes)?)?;
        return body.strip_prefix('"')?.strip_suffix('"').map(str::to_string);
    }

    let body = lit.strip_prefix('"')?.strip_suffix('"')?;
    let mut res = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            res.push(c);
            continue;
        }
        match chars.next()? {
            'n' => res.push('\n'),
            't' => res.push('\t'),
            'r' => res.push('\r'),
            '0' => res.push('\0'),
            // Line continuation: skip the newline and the indentation after it.
            '\n' => {
                let rest = chars.as_str().trim_start();
                chars = rest.chars();
            }
            other => res.push(other),
        }
    }
    Some(res)
}
