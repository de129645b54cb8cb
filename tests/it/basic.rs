use treeflags::Tree;

#[derive(Debug, Default, Tree)]
pub struct Options {
    #[flag("silent,s,required=true")]
    pub silent: bool,
    #[flag("path,p")]
    pub path: String,
}

#[derive(Debug, Default, Tree)]
pub struct Outer {
    #[command]
    pub sub: Sub,
}

#[derive(Debug, Default, Tree)]
pub struct Sub {
    #[flag("name,n")]
    pub name: String,
}

#[derive(Debug, Default, Tree)]
pub struct Numbers {
    #[flag("small,default=7")]
    pub small: u8,
    pub offset: i32,
    pub limit: Option<u64>,
}

#[derive(Debug, Default, Tree)]
pub struct Broken {
    #[flag("level,required=true,default=1")]
    pub level: u8,
}

#[derive(Debug, Default, Tree)]
pub struct Misspelled {
    #[flag("x,alias=y")]
    pub x: String,
}
