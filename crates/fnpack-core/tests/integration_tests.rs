//! Integration tests for fnpack-core.
//!
//! These tests package real directory trees and read the resulting archives
//! back with the `zip` crate.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use fnpack_core::ArchiveEntry;
use fnpack_core::DirectoryPackager;
use fnpack_core::EntryKind;
use fnpack_core::PackConfig;
use fnpack_core::PackError;
use fnpack_core::PackOptions;
use fnpack_core::format_entry;
use fnpack_core::load_ignore_rules;
use fnpack_core::pack;
use fnpack_core::pack_blocking;
use fnpack_core::plan;
use std::collections::BTreeSet;
use std::fs;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use tempfile::TempDir;
use zip::ZipArchive;

/// Builds a source tree from `(relative path, contents)` pairs.
///
/// A path ending in `/` creates an empty directory.
fn create_tree(root: &Path, files: &[(&str, &str)]) {
    for (path, contents) in files {
        let full = root.join(path);
        if path.ends_with('/') {
            fs::create_dir_all(&full).unwrap();
            continue;
        }
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full, contents).unwrap();
    }
}

fn entry_names(archive: &Path) -> BTreeSet<String> {
    let archive = ZipArchive::new(File::open(archive).unwrap()).unwrap();
    archive.file_names().map(str::to_string).collect()
}

fn read_entry(archive: &Path, name: &str) -> String {
    let mut archive = ZipArchive::new(File::open(archive).unwrap()).unwrap();
    let mut contents = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    contents
}

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

fn source_and_output() -> (TempDir, PathBuf, PathBuf) {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("function");
    fs::create_dir(&source).unwrap();
    let output = temp.path().join("function.zip");
    (temp, source, output)
}

#[test]
fn test_no_ignore_file_packs_everything() {
    let (_temp, source, output) = source_and_output();
    create_tree(
        &source,
        &[
            ("index.js", "exports.handler = () => {};"),
            ("lib/util.js", "module.exports = {};"),
            ("lib/nested/deep.json", "{}"),
            ("static/", ""),
        ],
    );

    pack_blocking(&source, &output, PackOptions::default()).unwrap();

    assert_eq!(
        entry_names(&output),
        set(&[
            "index.js",
            "lib/",
            "lib/util.js",
            "lib/nested/",
            "lib/nested/deep.json",
            "static/",
        ])
    );
    assert_eq!(read_entry(&output, "lib/util.js"), "module.exports = {};");
}

#[test]
fn test_entry_names_are_relative() {
    let (_temp, source, output) = source_and_output();
    create_tree(&source, &[("a/b/c.txt", "c")]);

    pack_blocking(&source, &output, PackOptions::default()).unwrap();

    for name in entry_names(&output) {
        assert!(!name.starts_with('/'), "absolute entry name: {name}");
        assert!(!name.contains('\\'), "non-POSIX entry name: {name}");
        assert!(!name.contains("function"), "root leaked into name: {name}");
    }
}

#[test]
fn test_node_modules_excluded() {
    let (_temp, source, output) = source_and_output();
    create_tree(
        &source,
        &[
            ("index.js", "main"),
            ("node_modules/dep/a.js", "dep"),
            ("node_modules/dep/package.json", "{}"),
            (".gcloudignore", "node_modules/\n"),
        ],
    );

    pack_blocking(&source, &output, PackOptions::default()).unwrap();

    assert_eq!(entry_names(&output), set(&[".gcloudignore", "index.js"]));
}

#[test]
fn test_glob_excludes_at_any_depth() {
    let (_temp, source, output) = source_and_output();
    create_tree(
        &source,
        &[
            ("app.py", "app"),
            ("debug.log", "log"),
            ("logs/today.log", "log"),
            ("a/b/c/trace.log", "log"),
            (".gcloudignore", "*.log\n"),
        ],
    );

    pack_blocking(&source, &output, PackOptions::default()).unwrap();

    let names = entry_names(&output);
    assert!(names.iter().all(|n| !n.ends_with(".log")));
    assert!(names.contains("app.py"));
    assert!(names.contains("logs/"));
    assert!(names.contains("a/b/c/"));
}

#[test]
fn test_negation_reincludes() {
    let (_temp, source, output) = source_and_output();
    create_tree(
        &source,
        &[
            ("keep.log", "keep"),
            ("other.log", "other"),
            (".gcloudignore", "*.log\n!keep.log\n"),
        ],
    );

    pack_blocking(&source, &output, PackOptions::default()).unwrap();

    let names = entry_names(&output);
    assert!(names.contains("keep.log"));
    assert!(!names.contains("other.log"));
}

#[test]
fn test_cannot_reinclude_below_ignored_directory() {
    let (_temp, source, output) = source_and_output();
    create_tree(
        &source,
        &[
            ("build/keep.txt", "keep"),
            ("build/drop.txt", "drop"),
            (".gcloudignore", "build/\n!build/keep.txt\n"),
        ],
    );

    pack_blocking(&source, &output, PackOptions::default()).unwrap();

    assert_eq!(entry_names(&output), set(&[".gcloudignore"]));
}

// trailing spaces in file names are unix-only
#[cfg(unix)]
#[test]
fn test_git_pattern_syntax_in_ignore_file() {
    let (_temp, source, output) = source_and_output();
    create_tree(
        &source,
        &[
            ("1.txt", "digit"),
            ("a.txt", "letter"),
            ("name ", "trailing space"),
            ("name", "plain"),
            ("{a,b}.js", "braces"),
            ("a.js", "alternation"),
            (".gcloudignore", "[[:digit:]].txt\nname\\ \n{a,b}.js\n"),
        ],
    );

    pack_blocking(&source, &output, PackOptions::default()).unwrap();

    assert_eq!(
        entry_names(&output),
        set(&[".gcloudignore", "a.js", "a.txt", "name"])
    );
}

#[test]
fn test_invalid_rule_does_not_stop_packaging() {
    let (_temp, source, output) = source_and_output();
    create_tree(
        &source,
        &[
            ("main.py", "print()"),
            ("debug.log", "log"),
            (".gcloudignore", "broken\\\n*.log\n"),
        ],
    );

    pack_blocking(&source, &output, PackOptions::default()).unwrap();

    assert_eq!(entry_names(&output), set(&[".gcloudignore", "main.py"]));
}

#[test]
fn test_ignore_file_can_exclude_itself() {
    let (_temp, source, output) = source_and_output();
    create_tree(
        &source,
        &[("main.go", "package main"), (".gcloudignore", ".gcloudignore\n")],
    );

    pack_blocking(&source, &output, PackOptions::default()).unwrap();

    assert_eq!(entry_names(&output), set(&["main.go"]));
}

#[test]
fn test_packing_twice_is_idempotent() {
    let (temp, source, output) = source_and_output();
    create_tree(
        &source,
        &[
            ("index.js", "main"),
            ("lib/a.js", "a"),
            ("tmp/cache.bin", "cache"),
            (".gcloudignore", "tmp/\n"),
        ],
    );
    let second = temp.path().join("second.zip");

    pack_blocking(&source, &output, PackOptions::default()).unwrap();
    pack_blocking(&source, &second, PackOptions::default()).unwrap();

    assert_eq!(entry_names(&output), entry_names(&second));
}

#[test]
fn test_sorted_packing_is_reproducible() {
    let (temp, source, output) = source_and_output();
    create_tree(&source, &[("b.txt", "b"), ("a.txt", "a"), ("c/d.txt", "d")]);
    let second = temp.path().join("second.zip");
    let config = PackConfig::default().with_sort_entries(true);

    pack_blocking(&source, &output, PackOptions::new().with_config(config.clone())).unwrap();
    pack_blocking(&source, &second, PackOptions::new().with_config(config)).unwrap();

    assert_eq!(fs::read(&output).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn test_overwrites_existing_destination() {
    let (_temp, source, output) = source_and_output();
    create_tree(&source, &[("main.py", "print()")]);
    fs::write(&output, "not a zip").unwrap();

    pack_blocking(&source, &output, PackOptions::default()).unwrap();

    assert_eq!(entry_names(&output), set(&["main.py"]));
}

#[test]
fn test_missing_source_creates_nothing() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("out.zip");

    let err = pack_blocking(temp.path().join("nope"), &output, PackOptions::default())
        .unwrap_err();

    assert!(matches!(err, PackError::DirectoryNotFound { .. }));
    assert!(err.is_precondition());
    assert!(!output.exists());
}

#[tokio::test]
async fn test_async_missing_source_creates_nothing() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("out.zip");

    let err = pack(temp.path().join("nope"), &output, PackOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, PackError::DirectoryNotFound { .. }));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_async_pack_resolves_with_destination() {
    let (_temp, source, output) = source_and_output();
    create_tree(&source, &[("main.py", "print()"), ("venv/lib/x.py", "x"), (".gcloudignore", "venv/")]);

    let path = pack(&source, &output, PackOptions::default()).await.unwrap();

    assert_eq!(path, output);
    assert_eq!(entry_names(&path), set(&[".gcloudignore", "main.py"]));
}

#[tokio::test]
async fn test_concurrent_packs_do_not_interfere() {
    let (temp, source, _output) = source_and_output();
    create_tree(&source, &[("a.txt", "a"), ("b/c.txt", "c")]);

    let outputs: Vec<PathBuf> = (0..4)
        .map(|i| temp.path().join(format!("out_{i}.zip")))
        .collect();
    let tasks = outputs
        .iter()
        .map(|out| pack(source.clone(), out.clone(), PackOptions::default()));

    for result in spawn_all(tasks).await {
        result.unwrap();
    }
    for out in &outputs {
        assert_eq!(entry_names(out), set(&["a.txt", "b/", "b/c.txt"]));
    }
}

async fn spawn_all<F, T>(futures: impl Iterator<Item = F>) -> Vec<T>
where
    F: std::future::Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handles: Vec<_> = futures.map(tokio::spawn).collect();
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    results
}

#[test]
fn test_observer_receives_formatted_entries() {
    let (_temp, source, output) = source_and_output();
    create_tree(&source, &[("lib/a.js", "a"), ("skip.tmp", "t"), (".gcloudignore", "*.tmp")]);

    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&lines);
    let options = PackOptions::new()
        .with_config(PackConfig::default().with_sort_entries(true))
        .with_on_entry(move |entry: &ArchiveEntry| {
            sink.lock().unwrap().push(format_entry(entry));
        });

    pack_blocking(&source, &output, options).unwrap();

    let lines = lines.lock().unwrap();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("[F] ("));
    assert!(lines[0].contains(" .gcloudignore => "));
    assert!(lines[1].starts_with("[D] ("));
    assert!(lines[1].contains(" lib/ => "));
    assert!(lines[2].ends_with(&format!("lib/a.js => {}", source.join("lib/a.js").display())));
    assert!(lines.iter().all(|l| !l.contains("skip.tmp")));
}

#[test]
fn test_format_entry_name_only() {
    assert_eq!(
        format_entry(&ArchiveEntry::named("handler.py")),
        "[U] (000) handler.py => unknown"
    );
    assert_eq!(
        format_entry(&ArchiveEntry::named("x").with_kind(EntryKind::File).with_mode(0o644)),
        "[F] (644) x => unknown"
    );
}

#[test]
fn test_include_directive_splices_gitignore() {
    let (_temp, source, output) = source_and_output();
    create_tree(
        &source,
        &[
            ("main.py", "m"),
            ("__pycache__/main.cpython-312.pyc", "bytecode"),
            (".env", "SECRET=1"),
            (".gitignore", "__pycache__/\n.env\n"),
            (".gcloudignore", ".gcloudignore\n.gitignore\n#!include:.gitignore\n"),
        ],
    );

    pack_blocking(&source, &output, PackOptions::default()).unwrap();

    assert_eq!(entry_names(&output), set(&["main.py"]));
}

#[test]
fn test_include_directive_disabled() {
    let (_temp, source, output) = source_and_output();
    create_tree(
        &source,
        &[
            ("main.py", "m"),
            (".env", "SECRET=1"),
            (".gitignore", ".env\n"),
            (".gcloudignore", "#!include:.gitignore\n.gitignore\n"),
        ],
    );

    let config = PackConfig::default().with_expand_includes(false);
    pack_blocking(&source, &output, PackOptions::new().with_config(config)).unwrap();

    assert_eq!(
        entry_names(&output),
        set(&[".env", ".gcloudignore", "main.py"])
    );
}

#[test]
fn test_nested_include_rejected() {
    let (_temp, source, output) = source_and_output();
    create_tree(
        &source,
        &[
            (".gitignore", "#!include:.other\n"),
            (".gcloudignore", "#!include:.gitignore\n"),
        ],
    );

    let err = pack_blocking(&source, &output, PackOptions::default()).unwrap_err();

    assert!(matches!(err, PackError::InvalidIgnoreFile { .. }));
    assert!(!output.exists());
}

#[test]
fn test_custom_ignore_file_name() {
    let (_temp, source, output) = source_and_output();
    create_tree(
        &source,
        &[
            ("main.rb", "puts"),
            ("vendor/gem.rb", "gem"),
            (".gcloudignore", "main.rb\n"),
            (".deployignore", "vendor/\n"),
        ],
    );

    let report = DirectoryPackager::new(&source, &output)
        .ignore_file_name(".deployignore")
        .pack_blocking()
        .unwrap();

    assert_eq!(
        entry_names(&output),
        set(&[".deployignore", ".gcloudignore", "main.rb"])
    );
    assert_eq!(report.ignore_rules, 1);
}

#[test]
fn test_plan_agrees_with_archive() {
    let (_temp, source, output) = source_and_output();
    create_tree(
        &source,
        &[
            ("index.js", "main"),
            ("lib/a.js", "a"),
            ("coverage/lcov.info", "cov"),
            ("docs/", ""),
            (".gcloudignore", "coverage/\n"),
        ],
    );

    let plan = plan(&source, &PackConfig::default()).unwrap();
    pack_blocking(&source, &output, PackOptions::default()).unwrap();

    let planned: BTreeSet<String> = plan
        .entries
        .iter()
        .map(|e| e.to_archive_entry().name)
        .collect();
    assert_eq!(planned, entry_names(&output));
    assert_eq!(plan.entries_ignored, 1);
}

#[test]
fn test_report_statistics() {
    let (_temp, source, output) = source_and_output();
    create_tree(
        &source,
        &[
            ("a.txt", &"a".repeat(4096)),
            ("dir/b.txt", "b"),
            ("dir/skip.log", "log"),
            (".gcloudignore", "*.log\n"),
        ],
    );

    let report = DirectoryPackager::new(&source, &output)
        .pack_blocking()
        .unwrap();

    assert_eq!(report.files_added, 3);
    assert_eq!(report.directories_added, 1);
    assert_eq!(report.symlinks_added, 0);
    assert_eq!(report.total_entries(), 4);
    assert_eq!(report.entries_ignored, 1);
    assert_eq!(report.bytes_read, 4096 + 1 + 6);
    assert!(report.compression_ratio() > 1.0);
}

#[test]
fn test_load_ignore_rules_public_api() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(".gcloudignore"), "a\n  b  \n").unwrap();

    let rules = load_ignore_rules(temp.path()).unwrap();
    assert_eq!(rules.as_slice(), &["a", "b"]);
}

#[cfg(unix)]
#[test]
fn test_symlinks_stored_as_links() {
    let (_temp, source, output) = source_and_output();
    create_tree(&source, &[("real.txt", "real")]);
    std::os::unix::fs::symlink("real.txt", source.join("alias.txt")).unwrap();

    let report = DirectoryPackager::new(&source, &output)
        .pack_blocking()
        .unwrap();

    assert_eq!(report.symlinks_added, 1);
    let mut archive = ZipArchive::new(File::open(&output).unwrap()).unwrap();
    let link = archive.by_name("alias.txt").unwrap();
    assert!(link.is_symlink());
}

#[cfg(unix)]
#[test]
fn test_follow_symlinks_stores_target_contents() {
    let (_temp, source, output) = source_and_output();
    create_tree(&source, &[("real.txt", "real")]);
    std::os::unix::fs::symlink("real.txt", source.join("alias.txt")).unwrap();

    let report = DirectoryPackager::new(&source, &output)
        .follow_symlinks(true)
        .pack_blocking()
        .unwrap();

    assert_eq!(report.symlinks_added, 0);
    assert_eq!(read_entry(&output, "alias.txt"), "real");
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_fails() {
    use std::os::unix::fs::PermissionsExt;

    let (_temp, source, output) = source_and_output();
    create_tree(&source, &[("locked/secret.txt", "s")]);
    let locked = source.join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // root can read anything; nothing to assert in that case
    let readable = fs::read_dir(&locked).is_ok();
    let result = pack_blocking(&source, &output, PackOptions::default());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    if !readable {
        assert!(matches!(
            result.unwrap_err(),
            PackError::ArchiveWarning { .. }
        ));
    }
}
