mod basic;
mod git;

use std::fmt;

use expect_test::{expect, Expect};
use treeflags::{usage, Binder, Repeated, Tree};

fn args(text: &str) -> Vec<String> {
    text.split_ascii_whitespace().map(String::from).collect()
}

fn check<T>(text: &str, expect: Expect)
where
    T: Tree + Default + fmt::Debug,
{
    let mut tree = T::default();
    match treeflags::bind_vec(&mut tree, args(text)) {
        Ok(()) => expect.assert_debug_eq(&tree),
        Err(err) => expect.assert_eq(&err.to_string()),
    }
}

#[test]
fn flags() {
    check::<basic::Options>(
        "--silent --path a/b",
        expect![[r#"
            Options {
                silent: true,
                path: "a/b",
            }
        "#]],
    );
    check::<basic::Options>(
        "-S -p x",
        expect![[r#"
            Options {
                silent: true,
                path: "x",
            }
        "#]],
    );
    check::<basic::Options>("--path a/b", expect!["required flag `silent` was not provided"]);
    check::<basic::Options>("--silent --verbose", expect!["unexpected flag `verbose`"]);
    check::<basic::Options>(
        "--silent maybe",
        expect!["can't parse `silent` from `maybe`, expected `true` or `false`"],
    );
    check::<basic::Options>("--silent --", expect!["flag without a name (a bare `-` or `--`)"]);
}

#[test]
fn subcommands() {
    check::<basic::Outer>(
        "sub --name x",
        expect![[r#"
            Outer {
                sub: Sub {
                    name: "x",
                },
            }
        "#]],
    );
    check::<basic::Outer>(
        "SUB -n y",
        expect![[r#"
            Outer {
                sub: Sub {
                    name: "y",
                },
            }
        "#]],
    );
    check::<basic::Outer>("other", expect!["unknown subcommand `other` for `Outer`"]);
    check::<basic::Outer>("--name x", expect!["unexpected flag `name`"]);
}

#[test]
fn numbers() {
    check::<basic::Numbers>(
        "",
        expect![[r#"
            Numbers {
                small: 7,
                offset: 0,
                limit: None,
            }
        "#]],
    );
    check::<basic::Numbers>(
        "--limit 10 --OFFSET 3",
        expect![[r#"
            Numbers {
                small: 7,
                offset: 3,
                limit: Some(
                    10,
                ),
            }
        "#]],
    );
    check::<basic::Numbers>(
        "--small 300",
        expect!["can't parse `small` from `300`, 300 is out of range for u8"],
    );
    // A leading dash always starts a flag, so negative numbers can't be values.
    check::<basic::Numbers>(
        "--offset -5",
        expect!["can't parse `offset` from `true`, invalid digit found in string"],
    );
}

#[test]
fn broken_annotation() {
    check::<basic::Broken>(
        "",
        expect![
            "invalid annotation on `level`: annotation `level,required=true,default=1` is both required and has a default"
        ],
    );
}

#[test]
fn unknown_annotation_key() {
    let mut tree = basic::Misspelled::default();
    let err = treeflags::bind_vec(&mut tree, args("-x 1")).unwrap_err();
    assert!(matches!(
        &err,
        treeflags::Error::Annotation { source: treeflags::TagError::UnknownKey { key, .. }, .. }
            if key == "alias"
    ));
    expect!["invalid annotation on `x`: unknown key `alias` in annotation `x,alias=y`"]
        .assert_eq(&err.to_string());
    assert!(!err.is_usage());
}

#[test]
fn repeated_flags() {
    let tokens = treeflags::tokenize(args("-s -p a --path b -p c"));

    let mut options = basic::Options::default();
    let err = Binder::new().repeated(Repeated::Reject).bind(&mut options, &tokens).unwrap_err();
    assert_eq!(err.to_string(), "flag specified more than once: `path`");
    assert!(err.is_usage());
}

#[test]
fn run_selects_actions() {
    let mut git = git::Git::default();
    treeflags::run_vec(&mut git, args("--silent")).unwrap();
    assert_eq!(git.log, ["git"]);

    let mut git = git::Git::default();
    treeflags::run_vec(&mut git, args("status -s")).unwrap();
    assert_eq!(git.log, ["status silent=true"]);

    let mut git = git::Git::default();
    treeflags::run_vec(&mut git, args("remote --timeout 5")).unwrap();
    assert_eq!(git.remote.log, ["remote timeout=5"]);
    assert!(git.log.is_empty());

    let mut git = git::Git::default();
    treeflags::run_vec(&mut git, args("r add --url https://example.com --dry-run")).unwrap();
    assert!(git.remote.add.ran);
    assert!(git.remote.add.dry_run);
    assert_eq!(git.remote.add.url, "https://example.com");
}

#[test]
fn run_errors() {
    let mut git = git::Git::default();
    let err = treeflags::run_vec(&mut git, args("remote prune")).unwrap_err();
    assert_eq!(err.to_string(), "nothing to prune");
    assert!(!err.is_usage());

    let mut git = git::Git::default();
    let err = treeflags::run_vec(&mut git, args("remote add")).unwrap_err();
    assert_eq!(err.to_string(), "required flag `url` was not provided");

    let mut git = git::Git::default();
    let err = treeflags::run_vec(&mut git, args("push")).unwrap_err();
    assert_eq!(err.to_string(), "unknown subcommand `push` for `Git`");

    // Flags only bind at the selected node.
    let mut git = git::Git::default();
    let err = treeflags::run_vec(&mut git, args("remote -s")).unwrap_err();
    assert_eq!(err.to_string(), "unexpected flag `s`");
}

#[test]
fn dispatch_without_binding() {
    let mut git = git::Git::default();
    let err = treeflags::dispatch_vec(&mut git, args("remote add")).unwrap_err();
    assert_eq!(err.to_string(), "empty url");

    treeflags::dispatch_vec(&mut git, args("status")).unwrap();
    assert_eq!(git.log, ["status silent=false"]);
}

#[test]
fn usage_tables() {
    let mut git = git::Git::default();
    expect![[r#"
        A tiny version control system.

        FLAGS
          --silent, -s            [required]  Suppress output.
          --path, -p    <string>              Repository path.
          --work-tree   <path>

        COMMANDS
          remote, r  Manage remotes.
          status
    "#]]
    .assert_eq(&usage::render(&mut git).unwrap());

    expect![[r#"
        FLAGS
          --name, -n     <string>
          --timeout, -t  <u32>     [default: 30]

        COMMANDS
          add
          prune
    "#]]
    .assert_eq(&usage::render_at(&mut git, &args("remote")).unwrap());
}

#[test]
fn descriptors() {
    let mut git = git::Git::default();
    let names = treeflags::describe(&mut git)
        .unwrap()
        .iter()
        .map(|it| format!("{} {:?}", it.name(), it.kind))
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        [r#"silent Value("bool")"#, r#"path Value("string")"#, r#"work-tree Value("path")"#, "remote Tree"]
    );
}
