use std::fs;

use extractor_engine::{
    chapter_filename, ensure_output_dir, find_missing, ChapterText, InventoryWriter, Strategy,
};
use tempfile::TempDir;

fn sample_text(title: &str) -> ChapterText {
    let body = "First paragraph of the chapter body.\n\nSecond paragraph closing it out.".to_string();
    ChapterText {
        title: title.to_string(),
        char_count: body.chars().count(),
        body,
        strategy: Strategy::ShowReading,
    }
}

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn missing_ids_are_those_without_files() {
    let temp = TempDir::new().unwrap();
    for id in [1u32, 2, 3, 5, 8] {
        fs::write(temp.path().join(chapter_filename(id)), "present").unwrap();
    }

    let missing = find_missing(temp.path(), 1, 10);
    assert_eq!(missing, vec![4, 6, 7, 9, 10]);
}

#[test]
fn full_inventory_reports_no_gaps() {
    let temp = TempDir::new().unwrap();
    let writer = InventoryWriter::new(temp.path().to_path_buf());
    for id in 1..=5u32 {
        writer.write_chapter(id, &sample_text("Some Title")).unwrap();
    }
    assert!(find_missing(temp.path(), 1, 5).is_empty());
}

#[test]
fn written_entry_has_expected_layout() {
    let temp = TempDir::new().unwrap();
    let writer = InventoryWriter::new(temp.path().to_path_buf());
    let path = writer.write_chapter(3, &sample_text("Chapter 3: Embers")).unwrap();

    assert_eq!(path.file_name().unwrap(), "Chapter_003.txt");
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "Chapter 3: Embers\n=================\n\nFirst paragraph of the chapter body.\n\n\
         Second paragraph closing it out."
    );
}

#[test]
fn rewriting_the_same_chapter_is_byte_identical() {
    let temp = TempDir::new().unwrap();
    let writer = InventoryWriter::new(temp.path().to_path_buf());
    let text = sample_text("Chapter 4: Ash");

    let first_path = writer.write_chapter(4, &text).unwrap();
    let first = fs::read(&first_path).unwrap();
    let second_path = writer.write_chapter(4, &text).unwrap();
    let second = fs::read(&second_path).unwrap();

    assert_eq!(first_path, second_path);
    assert_eq!(first, second);
}

#[test]
fn write_fails_when_target_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let writer = InventoryWriter::new(blocker.clone());
    assert!(writer.write_chapter(1, &sample_text("T")).is_err());
    assert!(!blocker.with_file_name(chapter_filename(1)).exists());
}
