use notedesk_core::{Category, Note, NoteStore, SearchError, SearchQuery};

fn store_with(notes: &[(&str, &str, Category)]) -> NoteStore {
    let mut store = NoteStore::new();
    for (title, content, category) in notes {
        store
            .add(Note::create(*title, *content, *category).unwrap())
            .unwrap();
    }
    store
}

#[test]
fn search_matches_title_substring() {
    let store = store_with(&[
        ("Team Meeting", "agenda\n", Category::Work),
        ("Lunch", "sandwich\n", Category::Personal),
    ]);

    let hits = store.search(&SearchQuery::new("Meet")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].index, 1);
    assert_eq!(hits[0].note.title(), "Team Meeting");
}

#[test]
fn search_is_case_insensitive_and_covers_content() {
    let store = store_with(&[
        ("Groceries", "buy MILK\n", Category::Personal),
        ("Ideas", "nothing here\n", Category::Ideas),
        ("Reminder", "milk the budget\n", Category::Reminders),
    ]);

    let hits = store.search(&SearchQuery::new("milk")).unwrap();
    let indices = hits.iter().map(|hit| hit.index).collect::<Vec<_>>();
    assert_eq!(indices, vec![1, 3]);
}

#[test]
fn search_supports_regular_expressions() {
    let store = store_with(&[
        ("Call 555-1234", "phone\n", Category::Reminders),
        ("Call mom", "phone\n", Category::Personal),
    ]);

    let hits = store.search(&SearchQuery::new(r"\d{3}-\d{4}")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].index, 1);
}

#[test]
fn malformed_pattern_is_an_error_in_strict_mode() {
    let store = store_with(&[("[draft] essay", "text\n", Category::School)]);

    let err = store.search(&SearchQuery::new("[draft")).unwrap_err();
    assert!(matches!(err, SearchError::InvalidPattern { ref pattern, .. } if pattern == "[draft"));
}

#[test]
fn malformed_pattern_falls_back_to_literal_when_requested() {
    let store = store_with(&[
        ("[draft] essay", "text\n", Category::School),
        ("draft two", "text\n", Category::School),
    ]);

    let hits = store.search(&SearchQuery::lenient("[DRAFT")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].note.title(), "[draft] essay");
}

#[test]
fn search_without_matches_is_empty_not_error() {
    let store = store_with(&[("Lunch", "soup\n", Category::Personal)]);
    assert!(store.search(&SearchQuery::new("dinner")).unwrap().is_empty());
    assert!(NoteStore::new()
        .search(&SearchQuery::new("anything"))
        .unwrap()
        .is_empty());
}

#[test]
fn blank_keyword_returns_empty_results() {
    let store = store_with(&[("Lunch", "soup\n", Category::Personal)]);
    assert!(store.search(&SearchQuery::new("  ")).unwrap().is_empty());
}

#[test]
fn filter_on_empty_store_is_empty() {
    let store = NoteStore::new();
    assert!(store.filter_by_category(Category::Work).is_empty());
}

#[test]
fn filter_keeps_insertion_order_and_display_indices() {
    let store = store_with(&[
        ("a", "x\n", Category::Work),
        ("b", "x\n", Category::Personal),
        ("c", "x\n", Category::Work),
        ("d", "x\n", Category::School),
    ]);

    let hits = store.filter_by_category(Category::Work);
    let found = hits
        .iter()
        .map(|hit| (hit.index, hit.note.title()))
        .collect::<Vec<_>>();
    assert_eq!(found, vec![(1, "a"), (3, "c")]);
    assert!(store.filter_by_category(Category::Reminders).is_empty());
}
