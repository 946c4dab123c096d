use std::fs::File;
use std::io::Write;

use dlpatch_archive::{ArchivePak, Workspace, ZipArchivePak};
use zip::write::FileOptions;
use zip::ZipWriter;

fn write_fixture_pak(path: &std::path::Path) {
    let file = File::create(path).unwrap();
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    writer.start_file("Scripts/Foo.scr", options).unwrap();
    writer.write_all(b"sub Main() { f(1); }").unwrap();
    writer.start_file("data/other.bin", options).unwrap();
    writer.write_all(&[1, 2, 3, 4]).unwrap();
    writer.finish().unwrap();
}

#[test]
fn resolve_is_case_insensitive_and_commit_replaces_text_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let pak_path = dir.path().join("data0.pak");
    write_fixture_pak(&pak_path);

    let mut ws = Workspace::new();
    ws.push(ZipArchivePak::open(&pak_path).unwrap());

    let idx = ws.resolve("scripts/foo.scr").expect("case-insensitive resolve");
    assert_eq!(ws.read(idx, "scripts/foo.scr").unwrap(), "sub Main() { f(1); }");

    ws.commit("scripts/foo.scr", "sub Main() {\n\tg(2);\n\tf(1);\n}").unwrap();
    ws.close().unwrap();

    let mut reopened = ZipArchivePak::open(&pak_path).unwrap();
    assert_eq!(
        reopened.read_entry_text("Scripts/Foo.scr").unwrap(),
        "sub Main() {\n\tg(2);\n\tf(1);\n}"
    );
    // the unrelated binary entry survives the rewrite untouched.
    assert!(reopened.has_entry_ci("data/other.bin"));
}

#[test]
fn commit_on_missing_entry_does_not_create_one() {
    let dir = tempfile::tempdir().unwrap();
    let pak_path = dir.path().join("data0.pak");
    write_fixture_pak(&pak_path);

    let mut ws = Workspace::new();
    ws.push(ZipArchivePak::open(&pak_path).unwrap());

    assert!(ws.commit("scripts/does_not_exist.scr", "x").is_err());
    assert!(ws.resolve("scripts/does_not_exist.scr").is_none());
}

#[test]
fn open_dir_rejects_missing_directory() {
    let missing = std::path::Path::new("/nonexistent/dlpatch-archive-test-dir");
    assert!(Workspace::open_dir(missing).is_err());
}
