//! Converting and reverting a vault that lives on disk.

use std::fs;

use l5r_config::Settings;
use l5r_storage::FsStorage;
use l5r_symbols::{Converter, DocumentRewriter, Reverter, copy_bundled_assets};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn vault() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("Clans")).unwrap();
    fs::create_dir_all(dir.path().join(".obsidian/plugins/l5r-symbols-replacer/assets")).unwrap();
    fs::write(
        dir.path().join("Rules.md"),
        "# Rules\n\nSpend 2 (op) to activate.\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("Clans/Crab.md"),
        "| Clan | Mon |\n| --- | --- |\n| Crab | (crab) |\n",
    )
    .unwrap();
    fs::write(dir.path().join("Plain.md"), "No symbols here.\n").unwrap();
    fs::write(
        dir.path().join(".obsidian/plugins/l5r-symbols-replacer/assets/crab.svg"),
        "<svg/>",
    )
    .unwrap();
    dir
}

#[test]
fn test_convert_then_revert_restores_vault() {
    let dir = vault();
    let storage = FsStorage::new(dir.path().to_path_buf());
    let rewriter = DocumentRewriter::new(&storage);
    let settings = Settings::default();

    let converted = rewriter
        .convert_collection(&Converter::from_settings(&settings).unwrap())
        .unwrap();
    assert_eq!(converted.changed, vec!["Clans/Crab.md", "Rules.md"]);
    assert_eq!(converted.unchanged, 1);
    assert_eq!(
        fs::read_to_string(dir.path().join("Rules.md")).unwrap(),
        "# Rules\n\nSpend 2 ![[L5R_Icons/op.svg\\|18]] to activate.\n"
    );

    let reverted = rewriter
        .revert_collection(&Reverter::from_settings(&settings).unwrap())
        .unwrap();
    assert_eq!(reverted.changed_count(), 2);
    assert_eq!(
        fs::read_to_string(dir.path().join("Clans/Crab.md")).unwrap(),
        "| Clan | Mon |\n| --- | --- |\n| Crab | (crab) |\n"
    );
}

#[test]
fn test_plugin_folder_is_not_scanned() {
    let dir = vault();
    fs::write(
        dir.path().join(".obsidian/plugins/l5r-symbols-replacer/notes.md"),
        "(op)",
    )
    .unwrap();
    let storage = FsStorage::new(dir.path().to_path_buf());

    DocumentRewriter::new(&storage)
        .convert_collection(&Converter::new("L5R_Icons", 18).unwrap())
        .unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join(".obsidian/plugins/l5r-symbols-replacer/notes.md"))
            .unwrap(),
        "(op)"
    );
}

#[test]
fn test_convert_reaches_notes_in_build_named_folders() {
    let dir = vault();
    fs::create_dir_all(dir.path().join("target")).unwrap();
    fs::create_dir_all(dir.path().join("node_modules")).unwrap();
    fs::write(dir.path().join("target/Quest.md"), "(op)").unwrap();
    fs::write(dir.path().join("node_modules/Npc.md"), "(fire)").unwrap();
    let storage = FsStorage::new(dir.path().to_path_buf());

    let report = DocumentRewriter::new(&storage)
        .convert_collection(&Converter::new("L5R_Icons", 18).unwrap())
        .unwrap();

    assert_eq!(report.changed_count(), 4);
    assert_eq!(
        fs::read_to_string(dir.path().join("target/Quest.md")).unwrap(),
        "![[L5R_Icons/op.svg\\|18]]"
    );
}

#[test]
fn test_copy_icons_into_vault() {
    let dir = vault();
    let storage = FsStorage::new(dir.path().to_path_buf());

    let report = copy_bundled_assets(
        &storage,
        ".obsidian/plugins/l5r-symbols-replacer/assets",
        "L5R_Icons",
    )
    .unwrap();

    assert_eq!(report.copied, vec!["L5R_Icons/crab.svg"]);
    assert_eq!(
        fs::read_to_string(dir.path().join("L5R_Icons/crab.svg")).unwrap(),
        "<svg/>"
    );
}
