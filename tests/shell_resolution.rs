#![cfg(unix)]

use std::ffi::OsString;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use concrun::errors::ConcrunError;
use concrun::exec::{ShellBackend, resolve_shell, resolve_shell_in};

fn write_script(path: &Path, mode: u32) {
    fs::write(path, "#!/bin/sh\nexit 0\n").unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
}

#[test]
fn bare_name_is_found_on_search_path() {
    let dir = tempfile::tempdir().unwrap();
    write_script(&dir.path().join("myshell"), 0o755);

    let search = std::env::join_paths([dir.path()]).unwrap();
    let resolved = resolve_shell_in("myshell", &search).unwrap();

    assert_eq!(resolved, dir.path().join("myshell"));
}

#[test]
fn first_match_on_search_path_wins() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    write_script(&first.path().join("myshell"), 0o755);
    write_script(&second.path().join("myshell"), 0o755);

    let search = std::env::join_paths([second.path(), first.path()]).unwrap();
    let resolved = resolve_shell_in("myshell", &search).unwrap();

    assert_eq!(resolved, second.path().join("myshell"));
}

#[test]
fn non_executable_file_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write_script(&dir.path().join("myshell"), 0o644);

    let search = std::env::join_paths([dir.path()]).unwrap();

    assert!(matches!(
        resolve_shell_in("myshell", &search),
        Err(ConcrunError::ShellResolution { .. })
    ));
}

#[test]
fn absolute_path_is_used_as_is() {
    let dir = tempfile::tempdir().unwrap();
    let shell = dir.path().join("myshell");
    write_script(&shell, 0o755);

    let resolved = resolve_shell_in(shell.to_str().unwrap(), &OsString::new()).unwrap();

    assert_eq!(resolved, shell);
}

#[test]
fn missing_absolute_path_fails() {
    let dir = tempfile::tempdir().unwrap();
    let shell = dir.path().join("missing");

    let err = resolve_shell_in(shell.to_str().unwrap(), &OsString::new()).unwrap_err();

    assert!(err.to_string().contains("cannot resolve shell"));
}

#[test]
fn empty_name_fails() {
    assert!(matches!(
        resolve_shell_in("", &OsString::from("/bin")),
        Err(ConcrunError::ShellResolution { .. })
    ));
}

#[test]
fn unknown_shell_reports_its_name() {
    match resolve_shell("definitely-not-a-shell-xyz") {
        Err(ConcrunError::ShellResolution { shell, reason }) => {
            assert_eq!(shell, "definitely-not-a-shell-xyz");
            assert!(reason.contains("PATH"));
        }
        other => panic!("expected ShellResolution error, got {other:?}"),
    }
}

#[test]
fn system_sh_resolves_through_backend() {
    let backend = ShellBackend::resolve("sh").unwrap();

    assert!(backend.shell().is_absolute());
    assert!(backend.shell().ends_with("sh"));
}
