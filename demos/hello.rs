use treeflags::Tree;

/// Greets someone.
#[derive(Debug, Default, Tree)]
#[tree(actions(exec))]
struct Hello {
    /// Who to greet.
    #[flag("name,n,required=true")]
    name: String,
    /// Add an exclamation mark.
    #[flag("emoji,e")]
    emoji: bool,
    /// Greet with a wave instead.
    #[command]
    wave: Wave,
}

impl Hello {
    fn exec(&mut self) -> anyhow::Result<()> {
        let bang = if self.emoji { "❣️" } else { "!" };
        println!("Hello {}{}", self.name, bang);
        Ok(())
    }
}

#[derive(Debug, Default, Tree)]
#[tree(actions(exec))]
struct Wave {
    #[flag("times,t,default=1")]
    times: u8,
}

impl Wave {
    fn exec(&mut self) -> anyhow::Result<()> {
        if self.times == 0 {
            anyhow::bail!("can't wave zero times");
        }
        println!("{}", "o/ ".repeat(self.times.into()).trim_end());
        Ok(())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut hello = Hello::default();
    if let Err(err) = treeflags::run_env(&mut hello) {
        eprintln!("error: {}", err);
        if err.is_usage() {
            let path = std::env::args_os()
                .skip(1)
                .filter_map(|it| it.into_string().ok())
                .filter(|it| !it.starts_with('-'))
                .collect::<Vec<_>>();
            if let Ok(usage) = treeflags::usage::render_at(&mut Hello::default(), &path) {
                eprintln!("\n{}", usage);
            }
        }
        std::process::exit(1)
    }
}
