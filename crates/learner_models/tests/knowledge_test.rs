//! Knowledge base loading tests.

use learner_models::KnowledgeBase;
use std::fs;

#[test]
fn test_load_dir_reads_supported_files_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b_traits.md"), "Traits define shared behaviour.").unwrap();
    fs::write(dir.path().join("a_intro.txt"), "Rust is a systems language.").unwrap();
    fs::write(dir.path().join("image.png"), [0u8, 1, 2]).unwrap();
    fs::write(dir.path().join("empty.md"), "   \n").unwrap();
    fs::create_dir(dir.path().join("nested.md")).unwrap();

    let knowledge = KnowledgeBase::load_dir(dir.path()).unwrap();
    let sources: Vec<_> = knowledge
        .documents()
        .iter()
        .map(|d| d.source().as_str())
        .collect();
    assert_eq!(sources, vec!["a_intro.txt", "b_traits.md"]);
    assert_eq!(
        knowledge.documents()[1].text(),
        "Traits define shared behaviour."
    );
}

#[test]
fn test_load_dir_without_documents_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("notes.csv"), "a,b").unwrap();

    let err = KnowledgeBase::load_dir(dir.path()).unwrap_err();
    assert!(err.to_string().contains("No documents found"));
}

#[test]
fn test_load_missing_dir_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = KnowledgeBase::load_dir(dir.path().join("absent")).unwrap_err();
    assert!(err.to_string().contains("Failed to read knowledge directory"));
}
