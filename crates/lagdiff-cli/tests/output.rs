//! Tests for output targets and atomic writes.

use std::io::Write;
use std::path::Path;

use anyhow::anyhow;
use lagdiff_cli::output::{OutputTarget, write_atomically};

#[test]
fn dash_selects_stdout() {
    assert_eq!(OutputTarget::from_arg(Path::new("-")), OutputTarget::Stdout);
    assert_eq!(OutputTarget::Stdout.to_string(), "stdout");
    let file = OutputTarget::from_arg(Path::new("out.csv"));
    assert_eq!(file, OutputTarget::File("out.csv".into()));
}

#[test]
fn atomic_write_creates_parent_and_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("transformed.csv");
    let written = write_atomically(&path, |writer| {
        writer.write_all(b",id\n0,1\n")?;
        Ok(7)
    })
    .expect("write");
    assert_eq!(written, 7);
    assert_eq!(std::fs::read_to_string(&path).expect("read"), ",id\n0,1\n");
}

#[test]
fn failed_write_leaves_nothing_behind() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("transformed.csv");
    let result: anyhow::Result<()> = write_atomically(&path, |writer| {
        writer.write_all(b"partial")?;
        Err(anyhow!("pipeline failed"))
    });
    assert!(result.is_err());
    assert!(!path.exists());
    let leftovers = std::fs::read_dir(dir.path()).expect("read dir").count();
    assert_eq!(leftovers, 0);
}

#[test]
fn failed_write_keeps_existing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("transformed.csv");
    std::fs::write(&path, "old").expect("seed");
    let result: anyhow::Result<()> =
        write_atomically(&path, |_| Err(anyhow!("pipeline failed")));
    assert!(result.is_err());
    assert_eq!(std::fs::read_to_string(&path).expect("read"), "old");
}
