use std::path::Path;
use std::process::{Command, Output};

fn ldpfs(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ldpfs"))
        .arg("--root")
        .arg(root)
        .args(args)
        .output()
        .expect("failed to run ldpfs binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_put_get_exists_delete_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source.txt");
    std::fs::write(&source, b"hello from the cli").unwrap();
    let root = dir.path().join("tree");
    std::fs::create_dir(&root).unwrap();

    let out = ldpfs(&root, &["put", "/notes/hello.txt", source.to_str().unwrap()]);
    assert!(out.status.success(), "{:?}", out);

    let out = ldpfs(&root, &["exists", "/notes/hello.txt"]);
    assert_eq!(stdout(&out).trim(), "true");

    let out = ldpfs(&root, &["get", "/notes/hello.txt"]);
    assert!(out.status.success());
    assert_eq!(out.stdout, b"hello from the cli");

    let out = ldpfs(&root, &["get", "--head", "/notes/hello.txt"]);
    assert!(stdout(&out).contains("content-type: text/plain"));

    let out = ldpfs(&root, &["delete", "/notes/hello.txt"]);
    assert!(out.status.success());
    let out = ldpfs(&root, &["exists", "/notes/hello.txt"]);
    assert_eq!(stdout(&out).trim(), "false");
}

#[test]
fn test_container_get_is_turtle() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("pics")).unwrap();
    std::fs::write(dir.path().join("pics/a.ttl"), b"").unwrap();

    let out = ldpfs(dir.path(), &["get", "/pics"]);
    assert!(out.status.success(), "{:?}", out);
    let body = stdout(&out);
    assert!(body.contains("ldp#contains"), "{}", body);
    assert!(body.contains("a.ttl"), "{}", body);
}

#[test]
fn test_post_container_and_ranged_get() {
    let dir = tempfile::tempdir().unwrap();

    let out = ldpfs(dir.path(), &["post", "--container", "--slug", "albums", "/"]);
    assert!(out.status.success(), "{:?}", out);
    assert!(dir.path().join("albums/.meta").is_file());

    let source = dir.path().join("hundred.bin");
    std::fs::write(&source, (0u8..100).collect::<Vec<u8>>()).unwrap();
    let out = ldpfs(
        dir.path(),
        &["put", "/albums/hundred.bin", source.to_str().unwrap()],
    );
    assert!(out.status.success());

    let out = ldpfs(
        dir.path(),
        &["get", "--range", "10-19", "/albums/hundred.bin"],
    );
    assert!(out.status.success());
    assert_eq!(out.stdout, (10u8..20).collect::<Vec<u8>>());
}
