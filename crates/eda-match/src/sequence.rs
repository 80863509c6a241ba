//! Ratcliff/Obershelp sequence similarity
//!
//! The similarity of two strings is `2·M / T`, where `T` is the total
//! number of characters and `M` the number of characters in the matching
//! blocks. Blocks are found by taking the longest common substring, then
//! recursing on the pieces to its left and right. When several longest
//! substrings exist the one starting earliest in `a` wins, then the one
//! starting earliest in `b`.
//!
//! Strings are compared character by character (Unicode scalar values).

use std::collections::HashMap;

/// A run of `size` equal characters at `a[a..a+size]` and `b[b..b+size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// Compares a changing first sequence against a fixed second one
///
/// The index of the second sequence is built once, so matching many
/// candidates against one word should keep the word as `b`.
#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    a: Vec<char>,
    b: Vec<char>,
    b2j: HashMap<char, Vec<usize>>,
    bcount: HashMap<char, usize>,
}

impl SequenceMatcher {
    pub fn new(a: &str, b: &str) -> Self {
        let mut matcher = Self {
            a: Vec::new(),
            b: Vec::new(),
            b2j: HashMap::new(),
            bcount: HashMap::new(),
        };
        matcher.set_seq2(b);
        matcher.set_seq1(a);
        matcher
    }

    pub fn set_seq1(&mut self, a: &str) {
        self.a = a.chars().collect();
    }

    pub fn set_seq2(&mut self, b: &str) {
        self.b = b.chars().collect();
        self.b2j.clear();
        self.bcount.clear();
        for (j, c) in self.b.iter().enumerate() {
            self.b2j.entry(*c).or_default().push(j);
            *self.bcount.entry(*c).or_insert(0) += 1;
        }
    }

    /// Longest common block within `a[alo..ahi]` and `b[blo..bhi]`
    ///
    /// Returns a block of size 0 when the ranges share no character.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let mut best = Block {
            a: alo,
            b: blo,
            size: 0,
        };
        // j2len[j] = length of the longest block ending at a[i-1] and b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > best.size {
                        best = Block {
                            a: i + 1 - k,
                            b: j + 1 - k,
                            size: k,
                        };
                    }
                }
            }
            j2len = next;
        }
        best
    }

    /// Matching blocks in increasing order of position, without the
    /// zero-size sentinel
    pub fn matching_blocks(&self) -> Vec<Block> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            blocks.push(m);
            if alo < m.a && blo < m.b {
                queue.push((alo, m.a, blo, m.b));
            }
            if m.a + m.size < ahi && m.b + m.size < bhi {
                queue.push((m.a + m.size, ahi, m.b + m.size, bhi));
            }
        }
        blocks.sort_by_key(|m| (m.a, m.b));
        blocks
    }

    fn score(&self, matches: usize) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            1.0
        } else {
            2.0 * matches as f64 / total as f64
        }
    }

    /// Similarity in `[0, 1]`
    pub fn ratio(&self) -> f64 {
        let matches = self.matching_blocks().iter().map(|m| m.size).sum();
        self.score(matches)
    }

    /// Upper bound on [`ratio`](Self::ratio) from character multisets
    pub fn quick_ratio(&self) -> f64 {
        let mut avail: HashMap<char, isize> = HashMap::new();
        let mut matches = 0;
        for c in &self.a {
            let left = avail
                .entry(*c)
                .or_insert_with(|| self.bcount.get(c).copied().unwrap_or(0) as isize);
            *left -= 1;
            if *left >= 0 {
                matches += 1;
            }
        }
        self.score(matches)
    }

    /// Upper bound on [`ratio`](Self::ratio) from lengths alone
    pub fn real_quick_ratio(&self) -> f64 {
        self.score(self.a.len().min(self.b.len()))
    }
}

/// Similarity of two strings, see [`SequenceMatcher::ratio`]
pub fn ratio(a: &str, b: &str) -> f64 {
    SequenceMatcher::new(a, b).ratio()
}

/// Up to `n` candidates scoring at least `cutoff` against `word`, best first
///
/// Equal scores are ordered by candidate, greatest first.
pub fn get_close_matches<'a, S: AsRef<str>>(
    word: &str,
    possibilities: &'a [S],
    n: usize,
    cutoff: f64,
) -> Vec<(&'a str, f64)> {
    if n == 0 {
        return Vec::new();
    }
    let mut matcher = SequenceMatcher::new("", word);
    let mut scored: Vec<(&'a str, f64)> = Vec::new();
    for candidate in possibilities {
        let candidate = candidate.as_ref();
        matcher.set_seq1(candidate);
        if matcher.real_quick_ratio() >= cutoff && matcher.quick_ratio() >= cutoff {
            let r = matcher.ratio();
            if r >= cutoff {
                scored.push((candidate, r));
            }
        }
    }
    scored.sort_by(|x, y| {
        y.1.partial_cmp(&x.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| y.0.cmp(x.0))
    });
    scored.truncate(n);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_ratio_known_values() {
        assert_abs_diff_eq!(ratio("abcd", "bcde"), 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(ratio("apple", "appel"), 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(ratio("ape", "appel"), 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(ratio("peach", "appel"), 0.4, epsilon = 1e-12);
        assert_eq!(ratio("", ""), 1.0);
        assert_eq!(ratio("abc", ""), 0.0);
    }

    #[test]
    fn test_longest_match_prefers_earliest() {
        let m = SequenceMatcher::new(" abcd", "abcd abcd");
        assert_eq!(m.find_longest_match(0, 5, 0, 9), Block { a: 0, b: 4, size: 5 });
        let m = SequenceMatcher::new("ab", "abab");
        assert_eq!(m.find_longest_match(0, 2, 0, 4), Block { a: 0, b: 0, size: 2 });
    }

    #[test]
    fn test_matching_blocks() {
        let m = SequenceMatcher::new("abxcd", "abcd");
        assert_eq!(
            m.matching_blocks(),
            vec![Block { a: 0, b: 0, size: 2 }, Block { a: 3, b: 2, size: 2 }]
        );
    }

    #[test]
    fn test_quick_ratios_bound_ratio() {
        let m = SequenceMatcher::new("Czech Republic", "Czechia");
        assert!(m.real_quick_ratio() >= m.quick_ratio());
        assert!(m.quick_ratio() >= m.ratio());
    }

    #[test]
    fn test_get_close_matches() {
        let words = ["ape", "apple", "peach", "puppy"];
        let found = get_close_matches("appel", &words, 3, 0.6);
        let names: Vec<&str> = found.iter().map(|(w, _)| *w).collect();
        assert_eq!(names, vec!["apple", "ape"]);
        assert!(get_close_matches("appel", &words, 0, 0.6).is_empty());
    }

    #[test]
    fn test_ties_prefer_greater_candidate() {
        let found = get_close_matches("ab", &["ac", "ad"], 1, 0.5);
        assert_eq!(found, vec![("ad", 0.5)]);
    }
}
