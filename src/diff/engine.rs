//! Diff engine
//!
//! Minimal edit scripts over line or word tokens using Myers' linear-space
//! divide-and-conquer search. The common prefix and suffix of every
//! subproblem are matched before searching, so the first matching run is
//! always as long as possible. Within a change hunk all removals are
//! emitted before all additions, and adjacent segments of the same kind are
//! merged.

use std::ops::{Index, IndexMut};

use thiserror::Error;

use super::tokenize::{split_lines, split_words};
use super::types::{DiffSegment, Granularity, SegmentKind};
use crate::cancel::CancellationFlag;

/// Diff computation error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiffError {
    #[error("Diff computation cancelled")]
    Cancelled,
}

/// Diff the two texts line by line
pub fn line_diff(a: &str, b: &str) -> Vec<DiffSegment> {
    let (old, new) = (split_lines(a), split_lines(b));
    let edits = Myers::new(None).run(&old, &new);
    build_segments(&old, &new, &edits)
}

/// Diff the two texts word by word
pub fn word_diff(a: &str, b: &str) -> Vec<DiffSegment> {
    let (old, new) = (split_words(a), split_words(b));
    let edits = Myers::new(None).run(&old, &new);
    build_segments(&old, &new, &edits)
}

/// Diff engine bound to one request's cancellation flag
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    cancel: CancellationFlag,
}

impl DiffEngine {
    pub fn new(cancel: CancellationFlag) -> Self {
        Self { cancel }
    }

    /// Diff at the requested granularity, stopping early if cancelled
    pub fn diff(&self, granularity: Granularity, a: &str, b: &str) -> Result<Vec<DiffSegment>, DiffError> {
        let (old, new) = match granularity {
            Granularity::Line => (split_lines(a), split_lines(b)),
            Granularity::Word => (split_words(a), split_words(b)),
        };

        let mut myers = Myers::new(Some(&self.cancel));
        let edits = myers.run(&old, &new);
        if myers.aborted {
            return Err(DiffError::Cancelled);
        }

        Ok(build_segments(&old, &new, &edits))
    }
}

/// One step of an edit script, as token ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    /// `len` tokens equal at `old`/`new`
    Equal { old: usize, new: usize, len: usize },
    /// Tokens `old..old + len` removed
    Delete { old: usize, len: usize },
    /// Tokens `new..new + len` inserted
    Insert { new: usize, len: usize },
}

/// Furthest-reaching x per diagonal, indexed by a signed diagonal
struct V {
    offset: isize,
    v: Vec<usize>,
}

impl V {
    fn new(max_d: usize) -> Self {
        let offset = max_d as isize + 1;
        Self {
            offset,
            v: vec![0; 2 * (max_d + 1) + 1],
        }
    }
}

impl Index<isize> for V {
    type Output = usize;

    fn index(&self, k: isize) -> &usize {
        &self.v[(k + self.offset) as usize]
    }
}

impl IndexMut<isize> for V {
    fn index_mut(&mut self, k: isize) -> &mut usize {
        &mut self.v[(k + self.offset) as usize]
    }
}

struct Myers<'c> {
    cancel: Option<&'c CancellationFlag>,
    aborted: bool,
    edits: Vec<Edit>,
}

impl<'c> Myers<'c> {
    fn new(cancel: Option<&'c CancellationFlag>) -> Self {
        Self {
            cancel,
            aborted: false,
            edits: Vec::new(),
        }
    }

    fn run(&mut self, old: &[&str], new: &[&str]) -> Vec<Edit> {
        let max_d = (old.len() + new.len() + 1) / 2 + 1;
        let mut vf = V::new(max_d);
        let mut vb = V::new(max_d);
        self.conquer(old, 0, new, 0, &mut vf, &mut vb);
        std::mem::take(&mut self.edits)
    }

    fn conquer(
        &mut self,
        mut old: &[&str],
        mut old_at: usize,
        mut new: &[&str],
        mut new_at: usize,
        vf: &mut V,
        vb: &mut V,
    ) {
        if self.aborted || self.cancel.is_some_and(CancellationFlag::is_cancelled) {
            self.aborted = true;
            return;
        }

        let prefix = common_prefix(old, new);
        if prefix > 0 {
            self.push(Edit::Equal {
                old: old_at,
                new: new_at,
                len: prefix,
            });
            old = &old[prefix..];
            new = &new[prefix..];
            old_at += prefix;
            new_at += prefix;
        }

        let suffix = common_suffix(old, new);
        let suffix_edit = Edit::Equal {
            old: old_at + old.len() - suffix,
            new: new_at + new.len() - suffix,
            len: suffix,
        };
        old = &old[..old.len() - suffix];
        new = &new[..new.len() - suffix];

        if old.is_empty() && new.is_empty() {
            // nothing between prefix and suffix
        } else if old.is_empty() {
            self.push(Edit::Insert {
                new: new_at,
                len: new.len(),
            });
        } else if new.is_empty() {
            self.push(Edit::Delete {
                old: old_at,
                len: old.len(),
            });
        } else {
            let (x, y) = middle_snake(old, new, vf, vb);
            let (old_a, old_b) = old.split_at(x);
            let (new_a, new_b) = new.split_at(y);
            self.conquer(old_a, old_at, new_a, new_at, vf, vb);
            self.conquer(old_b, old_at + x, new_b, new_at + y, vf, vb);
        }

        if suffix > 0 {
            self.push(suffix_edit);
        }
    }

    fn push(&mut self, edit: Edit) {
        if !self.aborted {
            self.edits.push(edit);
        }
    }
}

fn common_prefix(a: &[&str], b: &[&str]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn common_suffix(a: &[&str], b: &[&str]) -> usize {
    a.iter().rev().zip(b.iter().rev()).take_while(|(x, y)| x == y).count()
}

/// Find a split point on an optimal path
///
/// Both inputs are non-empty and share no common prefix or suffix, so the
/// returned point is strictly between `(0, 0)` and `(n, m)`.
fn middle_snake(old: &[&str], new: &[&str], vf: &mut V, vb: &mut V) -> (usize, usize) {
    let n = old.len();
    let m = new.len();
    let delta = n as isize - m as isize;
    let odd = delta & 1 == 1;
    let d_max = ((n + m + 1) / 2) as isize;

    vf[1] = 0;
    vb[1] = 0;

    for d in 0..=d_max {
        // Forward search
        let mut k = -d;
        while k <= d {
            let mut x = if k == -d || (k != d && vf[k - 1] < vf[k + 1]) {
                vf[k + 1]
            } else {
                vf[k - 1] + 1
            };
            let mut y = (x as isize - k) as usize;
            let (x0, y0) = (x, y);
            while x < n && y < m && old[x] == new[y] {
                x += 1;
                y += 1;
            }
            vf[k] = x;

            if odd && (k - delta).abs() < d && vf[k] + vb[delta - k] >= n {
                return (x0, y0);
            }
            k += 2;
        }

        // Backward search, in coordinates measured from the end
        let mut k = -d;
        while k <= d {
            let mut x = if k == -d || (k != d && vb[k - 1] < vb[k + 1]) {
                vb[k + 1]
            } else {
                vb[k - 1] + 1
            };
            let mut y = (x as isize - k) as usize;
            let (x0, y0) = (x, y);
            while x < n && y < m && old[n - x - 1] == new[m - y - 1] {
                x += 1;
                y += 1;
            }
            vb[k] = x;

            if !odd && (k - delta).abs() <= d && vb[k] + vf[delta - k] >= n {
                return (n - x0, m - y0);
            }
            k += 2;
        }
    }

    // Unreachable for non-empty inputs; splitting after the first deletion is
    // still a valid (if not minimal) script.
    (1, 0)
}

/// Turn an edit script into coalesced segments
fn build_segments(old: &[&str], new: &[&str], edits: &[Edit]) -> Vec<DiffSegment> {
    let mut segments: Vec<DiffSegment> = Vec::new();
    let mut removed = String::new();
    let mut added = String::new();

    for edit in edits {
        match *edit {
            Edit::Equal { old: at, new: new_at, len } => {
                debug_assert_eq!(old[at..at + len], new[new_at..new_at + len]);
                flush_hunk(&mut segments, &mut removed, &mut added);
                push_segment(&mut segments, SegmentKind::Unchanged, &old[at..at + len].concat());
            }
            Edit::Delete { old: at, len } => removed.push_str(&old[at..at + len].concat()),
            Edit::Insert { new: at, len } => added.push_str(&new[at..at + len].concat()),
        }
    }
    flush_hunk(&mut segments, &mut removed, &mut added);

    segments
}

fn flush_hunk(segments: &mut Vec<DiffSegment>, removed: &mut String, added: &mut String) {
    if !removed.is_empty() {
        push_segment(segments, SegmentKind::Removed, removed);
        removed.clear();
    }
    if !added.is_empty() {
        push_segment(segments, SegmentKind::Added, added);
        added.clear();
    }
}

fn push_segment(segments: &mut Vec<DiffSegment>, kind: SegmentKind, text: &str) {
    if text.is_empty() {
        return;
    }
    match segments.last_mut() {
        Some(last) if last.kind == kind => last.text.push_str(text),
        _ => segments.push(DiffSegment::new(kind, text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::types::{reconstruct_original, reconstruct_revised};

    fn assert_round_trip(a: &str, b: &str, segments: &[DiffSegment]) {
        assert_eq!(reconstruct_original(segments), a, "original for {:?} -> {:?}", a, b);
        assert_eq!(reconstruct_revised(segments), b, "revised for {:?} -> {:?}", a, b);
    }

    fn assert_coalesced(segments: &[DiffSegment]) {
        for pair in segments.windows(2) {
            assert_ne!(pair[0].kind, pair[1].kind, "adjacent segments share a kind: {:?}", pair);
        }
        assert!(segments.iter().all(|s| !s.text.is_empty()));
    }

    /// Number of inserted plus deleted tokens
    fn edit_cost(segments: &[DiffSegment], split: fn(&str) -> Vec<&str>) -> usize {
        segments
            .iter()
            .filter(|s| s.kind != SegmentKind::Unchanged)
            .map(|s| split(&s.text).len())
            .sum()
    }

    /// Reference LCS length for checking minimality on small inputs
    fn lcs_len(a: &[&str], b: &[&str]) -> usize {
        let mut dp = vec![vec![0usize; b.len() + 1]; a.len() + 1];
        for i in 1..=a.len() {
            for j in 1..=b.len() {
                dp[i][j] = if a[i - 1] == b[j - 1] {
                    dp[i - 1][j - 1] + 1
                } else {
                    dp[i - 1][j].max(dp[i][j - 1])
                };
            }
        }
        dp[a.len()][b.len()]
    }

    const PAIRS: &[(&str, &str)] = &[
        ("", ""),
        ("", "added\nonly"),
        ("removed\nonly\n", ""),
        ("same\n", "same\n"),
        ("a\nb\nc\nd\n", "a\nc\nd\ne\n"),
        ("x\ny\nx\ny\n", "y\nx\ny\nx\n"),
        ("a\nb\na\nb\na\n", "b\na\nb\n"),
        ("one\ntwo\nthree", "one\ntwo\nthree\n"),
        ("1\n2\n3\n4\n5\n6\n7\n", "0\n2\n3\n9\n5\n7\n8\n"),
        ("\n\n\n", "\n"),
        ("alpha\nbeta\ngamma\ndelta\n", "delta\ngamma\nbeta\nalpha\n"),
    ];

    #[test]
    fn test_concrete_line_example() {
        let segments = line_diff("line1\nline2\nline3", "line1\nlineX\nline3");
        assert_eq!(
            segments,
            vec![
                DiffSegment::unchanged("line1\n"),
                DiffSegment::removed("line2\n"),
                DiffSegment::added("lineX\n"),
                DiffSegment::unchanged("line3"),
            ]
        );
    }

    #[test]
    fn test_identical_inputs_yield_single_unchanged() {
        let text = "first\nsecond\nthird\n";
        assert_eq!(line_diff(text, text), vec![DiffSegment::unchanged(text)]);
        assert_eq!(word_diff(text, text), vec![DiffSegment::unchanged(text)]);
    }

    #[test]
    fn test_empty_sides() {
        assert_eq!(line_diff("", "new\ntext"), vec![DiffSegment::added("new\ntext")]);
        assert_eq!(line_diff("old\ntext", ""), vec![DiffSegment::removed("old\ntext")]);
        assert!(line_diff("", "").is_empty());
        assert_eq!(word_diff("", "a b"), vec![DiffSegment::added("a b")]);
    }

    #[test]
    fn test_line_round_trip_and_coalescing() {
        for (a, b) in PAIRS {
            let segments = line_diff(a, b);
            assert_round_trip(a, b, &segments);
            assert_coalesced(&segments);
        }
    }

    #[test]
    fn test_word_round_trip_and_coalescing() {
        let pairs = [
            ("the quick brown fox", "the slow brown fox"),
            ("Hello, world!", "Hello there, world."),
            ("  leading space", "leading space  "),
            ("a a a a", "a b a"),
            ("tabs\tand\nnewlines", "tabs and\n\nnewlines"),
        ];
        for (a, b) in pairs {
            let segments = word_diff(a, b);
            assert_round_trip(a, b, &segments);
            assert_coalesced(&segments);
        }
    }

    #[test]
    fn test_line_diff_is_minimal() {
        for (a, b) in PAIRS {
            let old = split_lines(a);
            let new = split_lines(b);
            let expected = old.len() + new.len() - 2 * lcs_len(&old, &new);
            assert_eq!(edit_cost(&line_diff(a, b), split_lines), expected, "{:?} -> {:?}", a, b);
        }
    }

    #[test]
    fn test_word_diff_example() {
        assert_eq!(
            word_diff("the quick brown fox", "the slow brown fox"),
            vec![
                DiffSegment::unchanged("the "),
                DiffSegment::removed("quick "),
                DiffSegment::added("slow "),
                DiffSegment::unchanged("brown fox"),
            ]
        );
    }

    #[test]
    fn test_removals_precede_additions_in_hunk() {
        let segments = line_diff("keep\nold1\nold2\nkeep2\n", "keep\nnew1\nnew2\nnew3\nkeep2\n");
        let kinds: Vec<SegmentKind> = segments.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SegmentKind::Unchanged,
                SegmentKind::Removed,
                SegmentKind::Added,
                SegmentKind::Unchanged
            ]
        );
    }

    #[test]
    fn test_repeated_lines_anchor_left() {
        // The longest possible leading run is matched first
        let segments = line_diff("a\na\nb\n", "a\na\na\nb\n");
        assert_eq!(segments[0], DiffSegment::unchanged("a\na\n"));
        assert_round_trip("a\na\nb\n", "a\na\na\nb\n", &segments);
    }

    #[test]
    fn test_determinism() {
        for (a, b) in PAIRS {
            let first = line_diff(a, b);
            for _ in 0..3 {
                assert_eq!(line_diff(a, b), first);
            }
        }
    }

    #[test]
    fn test_engine_matches_free_functions() {
        let engine = DiffEngine::default();
        let (a, b) = ("one two\nthree", "one 2\nthree four");
        assert_eq!(engine.diff(Granularity::Line, a, b).unwrap(), line_diff(a, b));
        assert_eq!(engine.diff(Granularity::Word, a, b).unwrap(), word_diff(a, b));
    }

    #[test]
    fn test_engine_cancelled() {
        let cancel = CancellationFlag::new();
        cancel.cancel();
        let engine = DiffEngine::new(cancel);
        assert_eq!(engine.diff(Granularity::Line, "a\n", "b\n"), Err(DiffError::Cancelled));
    }

    #[test]
    fn test_larger_documents_round_trip() {
        let a: String = (0..400).map(|i| format!("line {}\n", i)).collect();
        let b: String = (0..400)
            .filter(|i| i % 7 != 0)
            .map(|i| if i % 11 == 0 { format!("changed {}\n", i) } else { format!("line {}\n", i) })
            .collect();
        let segments = line_diff(&a, &b);
        assert_round_trip(&a, &b, &segments);
        assert_coalesced(&segments);
    }
}
