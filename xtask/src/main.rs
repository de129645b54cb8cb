//! CI driver: `cargo run -p xtask`.

use std::{
    thread,
    time::{Duration, Instant},
};

use xshell::{cmd, Shell};

fn main() -> xshell::Result<()> {
    let sh = Shell::new()?;

    cmd!(sh, "rustup toolchain install stable --no-self-update --component rustfmt").run()?;
    let _e = sh.push_env("RUSTUP_TOOLCHAIN", "stable");
    cmd!(sh, "rustc --version").run()?;

    {
        let _s = section("FMT");
        cmd!(sh, "cargo fmt --all -- --check").run()?;
    }

    {
        let _s = section("BUILD");
        cmd!(sh, "cargo test --workspace --no-run").run()?;
        cmd!(sh, "cargo build --example hello").run()?;
    }

    {
        let _s = section("TEST");
        cmd!(sh, "cargo test --workspace -- --nocapture").run()?;
    }

    {
        let _s = section("PUBLISH");
        publish(&sh)?;
    }

    Ok(())
}

/// Publishes both crates from `master` once per version, macros first.
fn publish(sh: &Shell) -> xshell::Result<()> {
    let pkgid = cmd!(sh, "cargo pkgid -p treeflags").read()?;
    let Some((_, version)) = pkgid.rsplit_once(['#', '@']) else {
        eprintln!("can't find a version in `{pkgid}`, not publishing");
        return Ok(());
    };
    let tag = format!("v{version}");

    let current_branch = cmd!(sh, "git branch --show-current").read()?;
    let tag_exists = cmd!(sh, "git tag --list").read()?.split_ascii_whitespace().any(|it| it == tag);
    if current_branch != "master" || tag_exists {
        return Ok(());
    }

    cmd!(sh, "git tag {tag}").run()?;
    cmd!(sh, "cargo publish -p treeflags-macros").run()?;
    wait_for_index(sh, "treeflags-macros", version)?;
    cmd!(sh, "cargo publish -p treeflags").run()?;
    cmd!(sh, "git push --tags").run()?;
    Ok(())
}

/// Polls the registry until `krate` at `version` can be resolved.
fn wait_for_index(sh: &Shell, krate: &str, version: &str) -> xshell::Result<()> {
    for _ in 0..100 {
        thread::sleep(Duration::from_secs(3));
        let stderr = cmd!(sh, "cargo install {krate} --version {version} --bin non-existing")
            .ignore_status()
            .read_stderr()?;
        if stderr.contains("Installing") {
            return Ok(());
        }
    }
    eprintln!("{krate} {version} didn't show up in the index, publishing anyway");
    Ok(())
}

fn section(name: &'static str) -> impl Drop {
    println!("::group::{name}");
    let start = Instant::now();
    defer(move || {
        let elapsed = start.elapsed();
        eprintln!("{name}: {elapsed:.2?}");
        println!("::endgroup::");
    })
}

fn defer<F: FnOnce()>(f: F) -> impl Drop {
    struct D<F: FnOnce()>(Option<F>);
    impl<F: FnOnce()> Drop for D<F> {
        fn drop(&mut self) {
            if let Some(f) = self.0.take() {
                f()
            }
        }
    }
    D(Some(f))
}
