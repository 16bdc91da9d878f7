use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::time::{Duration, UNIX_EPOCH};

fn lizar() -> Command {
    Command::cargo_bin("lizar").unwrap()
}

#[test]
fn no_subcommand_prints_usage() {
    lizar()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn unknown_subcommand_fails() {
    lizar()
        .arg("frobnicate")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn extra_argument_fails() {
    lizar().args(["pack", "extra"]).assert().code(1);
}

#[test]
fn pack_empty_list() {
    lizar()
        .arg("pack")
        .write_stdin("")
        .assert()
        .success()
        .stdout("");
}

#[test]
fn unpack_empty_archive() {
    let dir = tempfile::tempdir().unwrap();
    lizar()
        .arg("unpack")
        .current_dir(dir.path())
        .write_stdin("")
        .assert()
        .success();
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn pack_then_unpack() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    fs::write(src.path().join("a.txt"), b"alpha").unwrap();
    fs::write(src.path().join("b.bin"), vec![0u8; 10_000]).unwrap();
    let mtime = UNIX_EPOCH + Duration::from_secs(1_500_000_000);
    fs::File::options()
        .write(true)
        .open(src.path().join("a.txt"))
        .unwrap()
        .set_modified(mtime)
        .unwrap();

    let out = lizar()
        .arg("pack")
        .current_dir(src.path())
        .write_stdin("a.txt\nmissing.txt\n\nb.bin\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("missing.txt"))
        .get_output()
        .stdout
        .clone();
    assert_eq!(&out[..4], b"Liz1");

    lizar()
        .arg("unpack")
        .current_dir(dst.path())
        .write_stdin(out)
        .assert()
        .success();
    assert_eq!(fs::read(dst.path().join("a.txt")).unwrap(), b"alpha");
    assert_eq!(
        fs::metadata(dst.path().join("a.txt")).unwrap().modified().unwrap(),
        mtime
    );
    assert_eq!(fs::read(dst.path().join("b.bin")).unwrap(), vec![0u8; 10_000]);
    assert!(!dst.path().join("missing.txt").exists());
}

#[test]
fn unpack_into_directory_flag() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    fs::write(src.path().join("c.txt"), b"gamma").unwrap();
    let out = lizar()
        .arg("pack")
        .current_dir(src.path())
        .write_stdin("c.txt\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    lizar()
        .arg("unpack")
        .arg("-C")
        .arg(dst.path())
        .write_stdin(out)
        .assert()
        .success();
    assert_eq!(fs::read(dst.path().join("c.txt")).unwrap(), b"gamma");
}

#[test]
fn corrupted_crc_still_succeeds() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    fs::write(src.path().join("a.txt"), b"alpha").unwrap();
    let mut out = lizar()
        .arg("pack")
        .current_dir(src.path())
        .write_stdin("a.txt\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let last = out.len() - 1;
    out[last] ^= 0x55;

    lizar()
        .arg("unpack")
        .current_dir(dst.path())
        .write_stdin(out)
        .assert()
        .success()
        .stderr(predicate::str::contains("CRC mismatch"));
    assert_eq!(fs::read(dst.path().join("a.txt")).unwrap(), b"alpha");
}

#[test]
fn bad_magic_exits_one() {
    let dst = tempfile::tempdir().unwrap();
    lizar()
        .arg("unpack")
        .current_dir(dst.path())
        .write_stdin(&b"Zip1\x00\x00\x00a\x00\x00\x00\x00\x00"[..])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("expected magic signature"));
    assert_eq!(fs::read_dir(dst.path()).unwrap().count(), 0);
}

#[test]
fn trailing_garbage_exits_zero() {
    let dst = tempfile::tempdir().unwrap();
    lizar()
        .arg("unpack")
        .current_dir(dst.path())
        .write_stdin("Li")
        .assert()
        .success()
        .stderr(predicate::str::contains("trailing garbage"));
}
