use super::*;

#[test]
fn test_case_insensitive_spans() {
    let text = "ERROR one\nerror two\nno problem";
    let index = MatchIndex::build(text, "Error");

    assert_eq!(
        index.entries(),
        &[
            MatchSpan { start: 0, end: 5 },
            MatchSpan { start: 10, end: 15 },
        ]
    );
    assert_eq!(index.current_index(), Some(0));
}

#[test]
fn test_non_overlapping() {
    let index = MatchIndex::build("aaaa", "aa");
    assert_eq!(
        index.entries(),
        &[MatchSpan { start: 0, end: 2 }, MatchSpan { start: 2, end: 4 }]
    );

    let index = MatchIndex::build("abababa", "aba");
    assert_eq!(
        index.entries(),
        &[MatchSpan { start: 0, end: 3 }, MatchSpan { start: 4, end: 7 }]
    );
}

#[test]
fn test_navigation_wraps() {
    let mut index = MatchIndex::build("x x x", "x");
    assert_eq!(index.len(), 3);
    assert_eq!(index.current_index(), Some(0));

    index.find_previous();
    assert_eq!(index.current_index(), Some(2));
    index.find_next();
    assert_eq!(index.current_index(), Some(0));
    index.find_next();
    index.find_next();
    assert_eq!(index.current_index(), Some(2));
    assert_eq!(index.find_next(), Some(MatchSpan { start: 0, end: 1 }));
}

#[test]
fn test_empty_index_is_inert() {
    let mut index = MatchIndex::build("nothing here", "absent");
    assert!(index.is_empty());
    assert_eq!(index.current_index(), None);
    assert_eq!(index.find_next(), None);
    assert_eq!(index.find_previous(), None);
    assert_eq!(index.current_index(), None);
    assert_eq!(index.position_label(), "No matches");
    assert!(!index.can_step());
}

#[test]
fn test_empty_query_has_no_entries() {
    let index = MatchIndex::build("abc", "");
    assert!(index.is_empty());
    assert_eq!(index.current_index(), None);
}

#[test]
fn test_rebuild_resets_cursor() {
    let mut index = MatchIndex::build("a a", "a");
    index.find_next();
    assert_eq!(index.current_index(), Some(1));

    index.rebuild("a a a a");
    assert_eq!(index.len(), 4);
    assert_eq!(index.current_index(), Some(0));

    index.set_query("a a a a", "zzz");
    assert_eq!(index.current_index(), None);
}

#[test]
fn test_position_label() {
    let mut index = MatchIndex::build("hit hit", "HIT");
    assert_eq!(index.position_label(), "1 of 2");
    index.find_next();
    assert_eq!(index.position_label(), "2 of 2");
    assert!(index.can_step());

    let single = MatchIndex::build("hit", "hit");
    assert!(!single.can_step());
}

#[test]
fn test_offsets_stay_on_char_boundaries() {
    // 'İ' lowercases to two chars and a different byte length.
    let text = "İx Ünïcode ünïCODE";
    let index = MatchIndex::build(text, "ÜNÏCODE");

    assert_eq!(index.len(), 2);
    for span in index.entries() {
        assert!(text.is_char_boundary(span.start));
        assert!(text.is_char_boundary(span.end));
        assert_eq!(text[span.start..span.end].to_lowercase(), "ünïcode");
    }
}
