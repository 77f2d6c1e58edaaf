use super::*;
use std::fs;
use tempfile::tempdir;

fn lines_with_hits(total: usize, hits: &[usize]) -> Vec<String> {
    (1..=total)
        .map(|n| {
            if hits.contains(&n) {
                format!("line {n} ERROR boom")
            } else {
                format!("line {n} ok")
            }
        })
        .collect()
}

fn block(start_line: usize, end_line: usize) -> MergedBlock {
    MergedBlock {
        start_line,
        end_line,
    }
}

fn window(start_line: usize, end_line: usize) -> MatchWindow {
    MatchWindow {
        start_line,
        end_line,
    }
}

#[test]
fn test_overlapping_windows_merge() {
    let matcher = ContextMatcher::new("error", 5, 5);
    let result = matcher.match_lines(Path::new("a.log"), lines_with_hits(30, &[3, 12]));

    assert!(result.matched);
    assert_eq!(result.blocks, vec![block(1, 17)]);
}

#[test]
fn test_far_match_starts_new_block() {
    let matcher = ContextMatcher::new("error", 5, 5);
    let result = matcher.match_lines(Path::new("a.log"), lines_with_hits(30, &[3, 12, 30]));

    assert_eq!(result.blocks, vec![block(1, 17), block(25, 30)]);
}

#[test]
fn test_gap_boundary_is_inclusive() {
    // [5,15] then [20,30]: 20 <= 15 + 5 merges
    assert_eq!(
        merge_windows(vec![window(5, 15), window(20, 30)], 5),
        vec![block(5, 30)]
    );
    // [5,15] then [21,31]: 21 > 20 splits
    assert_eq!(
        merge_windows(vec![window(5, 15), window(21, 31)], 5),
        vec![block(5, 15), block(21, 31)]
    );
}

#[test]
fn test_strict_adjacency_gap() {
    assert_eq!(
        merge_windows(vec![window(1, 4), window(5, 8), window(10, 12)], 1),
        vec![block(1, 8), block(10, 12)]
    );
}

#[test]
fn test_merge_sorts_and_absorbs_contained_windows() {
    let merged = merge_windows(vec![window(40, 50), window(1, 30), window(10, 12)], 5);
    assert_eq!(merged, vec![block(1, 30), block(40, 50)]);
}

#[test]
fn test_merge_empty() {
    assert!(merge_windows(Vec::new(), 5).is_empty());
}

#[test]
fn test_blocks_are_sorted_and_disjoint() {
    let hits = [2, 9, 23, 24, 40, 58, 71, 99];
    let matcher = ContextMatcher::new("error", 5, 5);
    let result = matcher.match_lines(Path::new("a.log"), lines_with_hits(100, &hits));

    for pair in result.blocks.windows(2) {
        assert!(pair[0].end_line + 5 < pair[1].start_line);
    }
    for hit in hits {
        assert!(result
            .blocks
            .iter()
            .any(|b| b.start_line <= hit && hit <= b.end_line));
    }
    assert_eq!(result.blocks.first().unwrap().start_line, 1);
    assert_eq!(result.blocks.last().unwrap().end_line, 100);
}

#[test]
fn test_windows_clamp_to_file() {
    let matcher = ContextMatcher::new("error", 5, 5);
    let result = matcher.match_lines(Path::new("a.log"), lines_with_hits(3, &[2]));
    assert_eq!(result.blocks, vec![block(1, 3)]);
}

#[test]
fn test_case_insensitive_match() {
    let matcher = ContextMatcher::new("ERROR", 5, 5);
    let lines = vec!["all good".to_string(), "an error happened".to_string()];
    let result = matcher.match_lines(Path::new("a.log"), lines);

    assert!(result.matched);
    assert_eq!(result.blocks, vec![block(1, 2)]);
}

#[test]
fn test_no_match() {
    let matcher = ContextMatcher::new("panic", 5, 5);
    let result = matcher.match_lines(Path::new("a.log"), lines_with_hits(10, &[4]));

    assert!(!result.matched);
    assert!(result.blocks.is_empty());
}

#[test]
fn test_match_file_is_idempotent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    fs::write(&path, lines_with_hits(40, &[5, 33]).join("\n")).unwrap();

    let matcher = ContextMatcher::new("error", 5, 5);
    let first = matcher.match_file(&path).unwrap();
    let second = matcher.match_file(&path).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.blocks, vec![block(1, 10), block(28, 38)]);
}

#[test]
fn test_block_lines_pairs_numbers_with_content() {
    let matcher = ContextMatcher::new("error", 1, 0);
    let result = matcher.match_lines(Path::new("a.log"), lines_with_hits(6, &[4]));
    let lines: Vec<(usize, &str)> = result.block_lines(result.blocks[0]).collect();

    assert_eq!(
        lines,
        vec![(3, "line 3 ok"), (4, "line 4 ERROR boom"), (5, "line 5 ok")]
    );
}

#[test]
fn test_undecodable_bytes_are_substituted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mixed.log");
    fs::write(&path, b"ok\n\xff\xfe error here\r\nok\n").unwrap();

    let result = ContextMatcher::new("error", 5, 5).match_file(&path).unwrap();

    assert!(result.matched);
    assert_eq!(result.lines.len(), 3);
    assert!(result.lines[1].contains('\u{FFFD}'));
    assert!(result.lines[1].ends_with("error here"));
}

#[test]
fn test_missing_file_is_error() {
    let dir = tempdir().unwrap();
    let result = ContextMatcher::new("error", 5, 5).match_file(&dir.path().join("gone.log"));
    assert!(result.is_err());
}

#[test]
fn test_empty_keyword_matches_nothing() {
    let matcher = ContextMatcher::new("", 5, 5);
    let result = matcher.match_lines(Path::new("a.log"), lines_with_hits(5, &[1]));
    assert!(!result.matched);
    assert_eq!(result.lines.len(), 5);
}
