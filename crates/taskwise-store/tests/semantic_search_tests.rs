//! Integration tests for semantic search over stored tasks

use taskwise_domain::{NewTask, ParsedTask, TaskId, TaskIndex, TaskStore};
use taskwise_store::{MemoryTaskStore, SemanticIndex};

fn add(
    store: &mut MemoryTaskStore,
    index: &mut SemanticIndex,
    title: &str,
    description: Option<&str>,
) -> TaskId {
    let mut parsed = ParsedTask::titled(title);
    parsed.description = description.map(str::to_string);
    let task = store.create_task(NewTask::from(parsed)).unwrap();
    index.index_task(task.id, &task.index_text()).unwrap();
    task.id
}

#[test]
fn test_semantic_search_basic() {
    let mut store = MemoryTaskStore::new();
    let mut index = SemanticIndex::with_hash_embedder();

    let dentist = add(&mut store, &mut index, "Book dentist appointment", None);
    let report = add(&mut store, &mut index, "Quarterly report", Some("draft the sales numbers"));
    add(&mut store, &mut index, "Buy groceries", Some("milk eggs bread"));

    let hits = index.query_nearest("sales report draft", 3).unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].0, report);
    assert!(hits.windows(2).all(|w| w[0].1 <= w[1].1));

    let hits = index.query_nearest("dentist", 1).unwrap();
    assert_eq!(hits, vec![(dentist, hits[0].1)]);
}

#[test]
fn test_semantic_search_chinese() {
    let mut store = MemoryTaskStore::new();
    let mut index = SemanticIndex::with_hash_embedder();

    let meeting = add(&mut store, &mut index, "开会", Some("讨论项目进度"));
    add(&mut store, &mut index, "买菜", None);

    let hits = index.query_nearest("项目会议", 2).unwrap();
    assert_eq!(hits[0].0, meeting);
}

#[test]
fn test_reindex_moves_task() {
    let mut store = MemoryTaskStore::new();
    let mut index = SemanticIndex::with_hash_embedder();

    let id = add(&mut store, &mut index, "Walk the dog", None);
    let other = add(&mut store, &mut index, "Pay electricity bill", None);

    index.reindex_task(id, "Pay water bill").unwrap();
    let hits = index.query_nearest("water bill", 2).unwrap();
    assert_eq!(hits[0].0, id);
    assert_eq!(hits[1].0, other);
    assert_eq!(index.vectors().len(), 2);
}

#[test]
fn test_k_larger_than_index() {
    let mut store = MemoryTaskStore::new();
    let mut index = SemanticIndex::with_hash_embedder();
    add(&mut store, &mut index, "Only task", None);

    assert_eq!(index.query_nearest("task", 20).unwrap().len(), 1);
}
