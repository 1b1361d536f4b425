//! Common-span highlighting between two texts
//!
//! Both texts are split on whitespace and aligned with a longest-matching-block
//! sequence matcher. Runs the alignment reports as equal are wrapped in a
//! highlight marker on both sides; everything else passes through untouched.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Sequences at least this long get popular elements junked
const AUTOJUNK_MIN_LEN: usize = 200;

/// Opening and closing strings wrapped around a common run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HighlightMarker {
    pub open: String,
    pub close: String,
}

impl Default for HighlightMarker {
    fn default() -> Self {
        Self {
            open: "<span class='highlight'>".to_string(),
            close: "</span>".to_string(),
        }
    }
}

impl HighlightMarker {
    pub fn wrap(&self, run: &str) -> String {
        format!("{}{}{}", self.open, run, self.close)
    }
}

/// Both sides of a comparison with common runs marked
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct HighlightedPair {
    pub left: String,
    pub right: String,
}

/// Alignment block tag
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OpTag {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// One alignment block: `a[i1..i2]` relates to `b[j1..j2]` as `tag`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub i1: usize,
    pub i2: usize,
    pub j1: usize,
    pub j2: usize,
}

/// A maximal run where `a[a_start..a_start + size] == b[b_start..b_start + size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Match {
    pub a_start: usize,
    pub b_start: usize,
    pub size: usize,
}

/// Longest-matching-block sequence matcher over token slices
pub struct SequenceMatcher<'a, T: Eq + std::hash::Hash> {
    a: &'a [T],
    b: &'a [T],
    b2j: HashMap<&'a T, Vec<usize>>,
}

impl<'a, T: Eq + std::hash::Hash> SequenceMatcher<'a, T> {
    /// Index `b`; when `autojunk` is set and `b` is long, elements making up
    /// more than 1% of it are left out of match seeding
    pub fn new(a: &'a [T], b: &'a [T], autojunk: bool) -> Self {
        let mut b2j: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, elt) in b.iter().enumerate() {
            b2j.entry(elt).or_default().push(j);
        }

        let n = b.len();
        if autojunk && n >= AUTOJUNK_MIN_LEN {
            let ntest = n / 100 + 1;
            let popular: HashSet<&'a T> = b2j
                .iter()
                .filter(|(_, idxs)| idxs.len() > ntest)
                .map(|(elt, _)| *elt)
                .collect();
            for elt in popular {
                b2j.remove(elt);
            }
        }

        Self { a, b, b2j }
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]`
    ///
    /// Ties go to the block starting earliest in `a`, then earliest in `b`.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Match {
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0usize);
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut newj2len: HashMap<usize, usize> = HashMap::new();
            if let Some(indices) = self.b2j.get(&self.a[i]) {
                for &j in indices {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = if j == 0 {
                        0
                    } else {
                        j2len.get(&(j - 1)).copied().unwrap_or(0)
                    };
                    let k = prev + 1;
                    newj2len.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = newj2len;
        }

        // Popular elements never seed a match but may extend one
        while besti > alo && bestj > blo && self.a[besti - 1] == self.b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && self.a[besti + bestsize] == self.b[bestj + bestsize]
        {
            bestsize += 1;
        }

        Match {
            a_start: besti,
            b_start: bestj,
            size: bestsize,
        }
    }

    /// Non-overlapping matching blocks in increasing order, adjacent blocks
    /// merged, terminated by a zero-size sentinel at `(len(a), len(b))`
    pub fn matching_blocks(&self) -> Vec<Match> {
        let (la, lb) = (self.a.len(), self.b.len());
        let mut queue = vec![(0, la, 0, lb)];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            if alo < m.a_start && blo < m.b_start {
                queue.push((alo, m.a_start, blo, m.b_start));
            }
            if m.a_start + m.size < ahi && m.b_start + m.size < bhi {
                queue.push((m.a_start + m.size, ahi, m.b_start + m.size, bhi));
            }
            blocks.push(m);
        }
        blocks.sort();

        let mut merged: Vec<Match> = Vec::with_capacity(blocks.len() + 1);
        for block in blocks {
            match merged.last_mut() {
                Some(last)
                    if last.a_start + last.size == block.a_start
                        && last.b_start + last.size == block.b_start =>
                {
                    last.size += block.size;
                }
                _ => merged.push(block),
            }
        }
        merged.push(Match {
            a_start: la,
            b_start: lb,
            size: 0,
        });
        merged
    }

    /// Edit script turning `a` into `b`
    pub fn opcodes(&self) -> Vec<Opcode> {
        let (mut i, mut j) = (0, 0);
        let mut codes = Vec::new();

        for m in self.matching_blocks() {
            let tag = match (i < m.a_start, j < m.b_start) {
                (true, true) => Some(OpTag::Replace),
                (true, false) => Some(OpTag::Delete),
                (false, true) => Some(OpTag::Insert),
                (false, false) => None,
            };
            if let Some(tag) = tag {
                codes.push(Opcode {
                    tag,
                    i1: i,
                    i2: m.a_start,
                    j1: j,
                    j2: m.b_start,
                });
            }
            i = m.a_start + m.size;
            j = m.b_start + m.size;
            if m.size > 0 {
                codes.push(Opcode {
                    tag: OpTag::Equal,
                    i1: m.a_start,
                    i2: i,
                    j1: m.b_start,
                    j2: j,
                });
            }
        }

        codes
    }
}

/// Highlight common runs between two token lists
pub fn highlight_tokens(
    left: &[&str],
    right: &[&str],
    marker: &HighlightMarker,
) -> HighlightedPair {
    let matcher = SequenceMatcher::new(left, right, true);
    let mut left_parts: Vec<String> = Vec::new();
    let mut right_parts: Vec<String> = Vec::new();

    for op in matcher.opcodes() {
        let left_run = left[op.i1..op.i2].join(" ");
        let right_run = right[op.j1..op.j2].join(" ");

        if op.tag == OpTag::Equal {
            left_parts.push(marker.wrap(&left_run));
            right_parts.push(marker.wrap(&right_run));
        } else {
            if !left_run.is_empty() {
                left_parts.push(left_run);
            }
            if !right_run.is_empty() {
                right_parts.push(right_run);
            }
        }
    }

    HighlightedPair {
        left: left_parts.join(" "),
        right: right_parts.join(" "),
    }
}

/// Split both texts on whitespace and highlight their common runs
pub fn highlight(text1: &str, text2: &str, marker: &HighlightMarker) -> HighlightedPair {
    let left: Vec<&str> = text1.split_whitespace().collect();
    let right: Vec<&str> = text2.split_whitespace().collect();
    highlight_tokens(&left, &right, marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker() -> HighlightMarker {
        HighlightMarker {
            open: "[".to_string(),
            close: "]".to_string(),
        }
    }

    #[test]
    fn test_marks_common_tokens() {
        let pair = highlight_tokens(&["a", "b", "c"], &["a", "x", "c"], &marker());
        assert_eq!(pair.left, "[a] b [c]");
        assert_eq!(pair.right, "[a] x [c]");
    }

    #[test]
    fn test_default_marker() {
        let pair = highlight("same words", "same words", &HighlightMarker::default());
        assert_eq!(pair.left, "<span class='highlight'>same words</span>");
        assert_eq!(pair.left, pair.right);
    }

    #[test]
    fn test_empty_side() {
        let pair = highlight("", "some text", &marker());
        assert_eq!(pair.left, "");
        assert_eq!(pair.right, "some text");

        let pair = highlight("   ", "", &marker());
        assert_eq!(pair, HighlightedPair::default());
    }

    #[test]
    fn test_insert_and_delete() {
        let pair = highlight("one two three", "one three four", &marker());
        assert_eq!(pair.left, "[one] two [three]");
        assert_eq!(pair.right, "[one] [three] four");
    }

    #[test]
    fn test_opcodes_match_difflib() {
        let a = ["q", "a", "b", "x", "c", "d"];
        let b = ["a", "b", "y", "c", "d", "f"];
        let matcher = SequenceMatcher::new(&a, &b, true);
        let tags: Vec<(OpTag, usize, usize, usize, usize)> = matcher
            .opcodes()
            .iter()
            .map(|o| (o.tag, o.i1, o.i2, o.j1, o.j2))
            .collect();
        assert_eq!(
            tags,
            vec![
                (OpTag::Delete, 0, 1, 0, 0),
                (OpTag::Equal, 1, 3, 0, 2),
                (OpTag::Replace, 3, 4, 2, 3),
                (OpTag::Equal, 4, 6, 3, 5),
                (OpTag::Insert, 6, 6, 5, 6),
            ]
        );
    }

    #[test]
    fn test_longest_match_prefers_earliest() {
        let a = [" ", "a", "b", "c", "d"];
        let b = ["a", "b", "c", "d", " ", "a", "b", "c", "d"];
        let matcher = SequenceMatcher::new(&a, &b, false);
        let m = matcher.find_longest_match(0, 5, 0, 9);
        assert_eq!(m, Match { a_start: 0, b_start: 4, size: 5 });
    }

    #[test]
    fn test_autojunk_still_aligns_long_equal_texts() {
        let text = "the ".repeat(300);
        let pair = highlight(&text, &text, &marker());
        assert!(pair.left.starts_with('['));
        assert!(pair.left.ends_with(']'));
    }
}
