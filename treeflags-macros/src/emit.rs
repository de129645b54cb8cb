use std::fmt::Write;

use crate::ast;

macro_rules! w {
    ($($tt:tt)*) => {
        drop(write!($($tt)*))
    };
}

pub(crate) fn emit(tree: &ast::Tree) -> String {
    let mut buf = String::new();

    w!(buf, "impl treeflags::Tree for {} {{\n", tree.name);
    w!(buf, "    fn name(&self) -> &'static str {{\n");
    w!(buf, "        {:?}\n", tree.name);
    w!(buf, "    }}\n");

    if let Some(doc) = &tree.doc {
        w!(buf, "    fn about(&self) -> Option<&'static str> {{\n");
        w!(buf, "        Some({:?})\n", doc);
        w!(buf, "    }}\n");
    }

    emit_fields(&mut buf, &tree.fields);

    if !tree.actions.is_empty() {
        emit_actions(&mut buf, &tree.actions);
    }

    w!(buf, "}}\n");
    buf
}

fn emit_fields(buf: &mut String, fields: &[ast::Field]) {
    w!(buf, "    fn fields(&mut self) -> Vec<treeflags::Field<'_>> {{\n");
    if fields.is_empty() {
        w!(buf, "        Vec::new()\n");
        w!(buf, "    }}\n");
        return;
    }

    w!(buf, "        vec![\n");
    for field in fields {
        let ctor = match field.kind {
            ast::Kind::Value => "value",
            ast::Kind::Tree => "tree",
        };
        w!(buf, "            treeflags::Field::{}({:?}, &mut self.{})", ctor, field.name(), field.ident);
        if let Some(tag) = &field.tag {
            w!(buf, ".with_tag({:?})", tag);
        }
        if let Some(doc) = &field.doc {
            w!(buf, ".with_doc({:?})", doc);
        }
        w!(buf, ",\n");
    }
    w!(buf, "        ]\n");
    w!(buf, "    }}\n");
}

fn emit_actions(buf: &mut String, actions: &[String]) {
    w!(buf, "    fn actions(&self) -> &'static [&'static str] {{\n");
    w!(buf, "        &[");
    for (i, action) in actions.iter().enumerate() {
        if i > 0 {
            w!(buf, ", ");
        }
        w!(buf, "{:?}", unraw(action));
    }
    w!(buf, "]\n");
    w!(buf, "    }}\n");

    w!(buf, "    fn invoke(&mut self, action_: &str) -> treeflags::Result<()> {{\n");
    w!(buf, "        match action_ {{\n");
    for action in actions {
        w!(buf, "            {:?} => treeflags::rt::action(self.{}()),\n", unraw(action), action);
    }
    w!(buf, "            _ => Err(treeflags::rt::unknown_action(treeflags::Tree::name(self), action_)),\n");
    w!(buf, "        }}\n");
    w!(buf, "    }}\n");
}

fn unraw(ident: &str) -> &str {
    ident.strip_prefix("r#").unwrap_or(ident)
}

impl ast::Field {
    /// Identifier as matched on the command line: `dry_run` answers to `dry-run`.
    fn name(&self) -> String {
        unraw(&self.ident).replace('_', "-")
    }
}
