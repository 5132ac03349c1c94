//! Longest-matching-block similarity (Ratcliff/Obershelp) over chars.

use std::collections::{HashMap, HashSet};

/// Length from which frequent characters stop seeding matches.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Similarity ratio `2 * M / T` where `M` is the number of chars in matching
/// blocks and `T` the total number of chars in both strings.
///
/// `b` is the indexed side. Two empty strings are identical (1.0).
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matcher = Matcher::new(&a, &b);
    2.0 * matcher.matched_len() as f64 / total as f64
}

struct Matcher<'a> {
    a: &'a [char],
    b: &'a [char],
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> Matcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &ch) in b.iter().enumerate() {
            b2j.entry(ch).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            let popular: HashSet<char> = b2j
                .iter()
                .filter(|(_, positions)| positions.len() > limit)
                .map(|(&ch, _)| ch)
                .collect();
            for ch in popular {
                b2j.remove(&ch);
            }
        }

        Self { a, b, b2j }
    }

    /// Longest block `a[i..i+k] == b[j..j+k]` within the given bounds,
    /// earliest in `a` then earliest in `b` on ties.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);
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
                    if k > best_len {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_len = k;
                    }
                }
            }
            j2len = next;
        }

        // Popular chars never seed a block but may still extend one.
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_len += 1;
        }
        while best_i + best_len < ahi
            && best_j + best_len < bhi
            && self.a[best_i + best_len] == self.b[best_j + best_len]
        {
            best_len += 1;
        }

        (best_i, best_j, best_len)
    }

    fn matched_len(&self) -> usize {
        let mut matched = 0;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        matched
    }
}

#[cfg(test)]
mod tests {
    use super::ratio;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn identical_strings_score_one() {
        assert_close(ratio("cute cat", "cute cat"), 1.0);
        assert_close(ratio("", ""), 1.0);
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert_close(ratio("abc", "xyz"), 0.0);
        assert_close(ratio("", "abc"), 0.0);
    }

    #[test]
    fn counts_all_matching_blocks() {
        // "ab" and "d" match: 2 * 3 / 8
        assert_close(ratio("abxd", "abcd"), 0.75);
        assert_close(ratio("abcd", "bcde"), 0.75);
    }

    #[test]
    fn handles_non_latin_scripts_per_char() {
        // "可爱的" shared, "猫" vs "狗" differs: 2 * 3 / 8
        assert_close(ratio("可爱的猫", "可爱的狗"), 0.75);
    }

    #[test]
    fn is_case_sensitive() {
        assert!(ratio("Cute Cat", "cute cat") < 1.0);
    }

    #[test]
    fn long_reference_still_matches_exactly() {
        let long = "猫".repeat(150) + &"a".repeat(150);
        assert_close(ratio(&long, &long), 1.0);
    }
}
