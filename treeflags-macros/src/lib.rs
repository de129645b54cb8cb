mod ast;
mod emit;
mod parse;

/// Implements `treeflags::Tree` for a struct.
///
/// * `#[flag("name,alias,default=...")]` annotates a value field;
/// * `#[command]` or `#[command("name,alias")]` marks a nested tree;
/// * `#[tree(actions(exec, ...))]` on the struct registers methods
///   returning `Result<(), E>` as actions;
/// * `#[tree(skip)]` keeps a field out of the registry;
/// * doc comments become usage descriptions.
#[cfg(not(test))]
#[proc_macro_derive(Tree, attributes(flag, command, tree))]
pub fn derive_tree(ts: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let text = match parse::parse(ts) {
        Ok(tree) => emit::emit(&tree),
        Err(err) => {
            format!("compile_error!({:?});", format!("invalid `#[derive(Tree)]` input, {}", err))
        }
    };
    text.parse().unwrap()
}

#[cfg(test)]
pub fn compile(src: &str) -> String {
    use proc_macro2::TokenStream;

    let ts = src.parse::<TokenStream>().unwrap();
    match parse::parse(ts) {
        Ok(tree) => emit::emit(&tree),
        Err(err) => err.to_string(),
    }
}
