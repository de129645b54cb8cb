use std::{io, path::PathBuf};

use anyhow::bail;
use treeflags::Tree;

/// A tiny version control system.
///
/// Only knows how to talk about remotes.
#[derive(Debug, Default, Tree)]
#[tree(actions(exec, status))]
pub struct Git {
    /// Suppress output.
    #[flag("silent,s,required=true")]
    pub silent: bool,
    /// Repository path.
    #[flag("path,p")]
    pub path: String,
    pub work_tree: Option<PathBuf>,
    /// Manage remotes.
    #[command("remote,r")]
    pub remote: Remote,
    #[tree(skip)]
    pub log: Vec<String>,
}

impl Git {
    fn exec(&mut self) -> anyhow::Result<()> {
        self.log.push("git".to_string());
        Ok(())
    }

    fn status(&mut self) -> io::Result<()> {
        self.log.push(format!("status silent={}", self.silent));
        Ok(())
    }
}

#[derive(Debug, Default, Tree)]
#[tree(actions(exec, prune))]
pub struct Remote {
    #[flag("name,n")]
    pub name: String,
    #[flag("timeout,t,default=30")]
    pub timeout: u32,
    #[command]
    pub add: Add,
    #[tree(skip)]
    pub log: Vec<String>,
}

impl Remote {
    fn exec(&mut self) -> anyhow::Result<()> {
        self.log.push(format!("remote timeout={}", self.timeout));
        Ok(())
    }

    fn prune(&mut self) -> anyhow::Result<()> {
        bail!("nothing to prune")
    }
}

#[derive(Debug, Default, Tree)]
#[tree(actions(exec))]
pub struct Add {
    #[flag("url,u,required=true")]
    pub url: String,
    pub dry_run: bool,
    #[tree(skip)]
    pub ran: bool,
}

impl Add {
    fn exec(&mut self) -> Result<(), String> {
        if self.url.is_empty() {
            return Err("empty url".to_string());
        }
        self.ran = true;
        Ok(())
    }
}
