//! String matching and prefix trees, on fixed demonstration inputs.

use std::collections::BTreeMap;

use crate::catalog::Category;
use crate::error::Result;
use crate::registry::{Entry, Registry};
use crate::seed::Seed;
use crate::snapshot::{join, Cell, Highlight, Snapshot, View};
use crate::trace::{Recorder, Trace};

pub(super) fn register(registry: &mut Registry) {
    let c = Category::Strings;
    registry.insert(Entry::new("kmp", "KMP Pattern Matching", c, ("O(n + m)", "O(m)"), kmp));
    registry.insert(Entry::new("rabin-karp", "Rabin-Karp", c, ("O(n + m)", "O(1)"), rabin_karp));
    registry.insert(Entry::new("trie-impl", "Trie", c, ("O(L)", "O(N·L)"), trie));
}

const KMP_TEXT: &str = "ABABDABACDABABCABAB";
const KMP_PATTERN: &str = "ABABC";
const RK_TEXT: &str = "AABAACAADAABAABA";
const RK_PATTERN: &str = "AABA";
const RK_BASE: u64 = 256;
const RK_MODULUS: u64 = 101;
const TRIE_WORDS: [&str; 4] = ["cat", "car", "card", "care"];
const TRIE_QUERY: &str = "car";

fn chars_view(chars: &[char]) -> View {
    View::cells(chars.iter().copied().map(Cell::Char).collect())
}

fn as_ints(values: &[usize]) -> Vec<i64> {
    values.iter().map(|&v| super::as_value(v)).collect()
}

fn kmp(_seed: &Seed) -> Result<Trace> {
    let text: Vec<char> = KMP_TEXT.chars().collect();
    let pattern: Vec<char> = KMP_PATTERN.chars().collect();
    let m = pattern.len();
    let mut rec = Recorder::new("kmp");

    rec.emit(
        Snapshot::new(chars_view(&pattern), format!("KMP: find \"{KMP_PATTERN}\" in \"{KMP_TEXT}\""))
            .at_line(1),
    );

    // Longest proper prefix that is also a suffix, per pattern position.
    let mut lps = vec![0usize; m];
    let mut len = 0;
    let mut i = 1;
    while i < m {
        if pattern[i] == pattern[len] {
            len += 1;
            lps[i] = len;
            rec.emit(
                Snapshot::new(
                    chars_view(&pattern),
                    format!("pattern[{i}] = pattern[{}] = '{}', lps[{i}] = {len}", len - 1, pattern[i]),
                )
                .mark(Highlight::Comparing, [len - 1, i])
                .annotate("lps", as_ints(&lps))
                .at_line(2),
            );
            i += 1;
        } else if len > 0 {
            len = lps[len - 1];
            rec.emit(
                Snapshot::new(
                    chars_view(&pattern),
                    format!("Mismatch at pattern[{i}], fall back to length {len}"),
                )
                .mark(Highlight::Comparing, [len, i])
                .annotate("lps", as_ints(&lps))
                .at_line(2),
            );
        } else {
            rec.emit(
                Snapshot::new(
                    chars_view(&pattern),
                    format!("pattern[{i}] = '{}' has no border, lps[{i}] = 0", pattern[i]),
                )
                .mark(Highlight::Current, [i])
                .annotate("lps", as_ints(&lps))
                .at_line(2),
            );
            i += 1;
        }
    }

    rec.emit(
        Snapshot::new(
            chars_view(&pattern),
            format!("LPS array: [{}]", join(&lps, ", ")),
        )
        .mark(Highlight::Found, 0..m)
        .annotate("lps", as_ints(&lps))
        .at_line(3),
    );

    let mut matches = Vec::new();
    let mut j = 0;
    for (i, &c) in text.iter().enumerate() {
        while j > 0 && c != pattern[j] {
            j = lps[j - 1];
            rec.emit(
                Snapshot::new(
                    chars_view(&text),
                    format!("Mismatch at text[{i}], shift pattern using lps: j = {j}"),
                )
                .mark(Highlight::Comparing, [i])
                .mark(Highlight::Window, i - j..i)
                .at_line(4),
            );
        }
        if c == pattern[j] {
            j += 1;
            rec.emit(
                Snapshot::new(
                    chars_view(&text),
                    format!("text[{i}] = pattern[{}] = '{c}'", j - 1),
                )
                .mark(Highlight::Comparing, [i])
                .mark(Highlight::Window, i + 1 - j..=i)
                .at_line(4),
            );
        }
        if j == m {
            let start = i + 1 - m;
            matches.push(start);
            rec.emit(
                Snapshot::new(chars_view(&text), format!("Pattern found at index {start}!"))
                    .mark(Highlight::Found, start..=i)
                    .at_line(5),
            );
            j = lps[j - 1];
        }
    }

    let covered: Vec<usize> = matches.iter().flat_map(|&s| s..s + m).collect();
    rec.emit(
        Snapshot::new(
            chars_view(&text),
            format!(
                "KMP complete! Found {} match(es) at [{}]",
                matches.len(),
                join(&matches, ", ")
            ),
        )
        .mark(Highlight::Found, covered)
        .annotate("matches", as_ints(&matches))
        .at_line(7),
    );
    rec.finish()
}

fn rabin_karp(_seed: &Seed) -> Result<Trace> {
    let text: Vec<char> = RK_TEXT.chars().collect();
    let pattern: Vec<char> = RK_PATTERN.chars().collect();
    let (n, m) = (text.len(), pattern.len());
    let code = |c: char| u64::from(c);
    let mut rec = Recorder::new("rabin-karp");

    rec.emit(
        Snapshot::new(
            chars_view(&text),
            format!("Rabin-Karp: rolling hash to find \"{RK_PATTERN}\" (d = {RK_BASE}, q = {RK_MODULUS})"),
        )
        .at_line(1),
    );

    // d^(m-1) mod q, the weight of the leading character.
    let lead = (1..m).fold(1, |h, _| h * RK_BASE % RK_MODULUS);
    let pattern_hash = pattern.iter().fold(0, |h, &c| (h * RK_BASE + code(c)) % RK_MODULUS);
    let mut window_hash = text[..m].iter().fold(0, |h, &c| (h * RK_BASE + code(c)) % RK_MODULUS);

    rec.emit(
        Snapshot::new(chars_view(&text), format!("Pattern hash = {pattern_hash}"))
            .annotate("pattern_hash", pattern_hash as i64)
            .at_line(3),
    );

    let mut matches = Vec::new();
    for s in 0..=n - m {
        let hit = window_hash == pattern_hash;
        let verified = hit && text[s..s + m] == pattern[..];
        let (message, line) = match (hit, verified) {
            (true, true) => (format!("Hash match at index {s}! Verified: \"{RK_PATTERN}\""), 5),
            (true, false) => (format!("Spurious hit at index {s}: hash {window_hash} matches but text differs"), 5),
            _ => (format!("Window {s}: hash {window_hash} ≠ {pattern_hash}"), 4),
        };
        let mut snap = Snapshot::new(chars_view(&text), message)
            .mark(Highlight::Window, s..s + m)
            .annotate("window_hash", window_hash as i64)
            .annotate("pattern_hash", pattern_hash as i64)
            .at_line(line);
        if verified {
            matches.push(s);
            snap = snap.mark(Highlight::Found, s..s + m);
        }
        rec.emit(snap);

        if s + m < n {
            let dropped = code(text[s]) * lead % RK_MODULUS;
            window_hash = ((window_hash + RK_MODULUS - dropped) * RK_BASE + code(text[s + m])) % RK_MODULUS;
        }
    }

    let covered: Vec<usize> = matches.iter().flat_map(|&s| s..s + m).collect();
    rec.emit(
        Snapshot::new(
            chars_view(&text),
            format!("Rabin-Karp complete! Found at indices: [{}]", join(&matches, ", ")),
        )
        .mark(Highlight::Found, covered)
        .annotate("matches", as_ints(&matches))
        .at_line(7),
    );
    rec.finish()
}

#[derive(Default)]
struct TrieNode {
    label: char,
    children: BTreeMap<char, usize>,
    terminal: bool,
}

/// Arena trie; node 0 is the root.
struct Trie {
    nodes: Vec<TrieNode>,
}

impl Trie {
    fn new() -> Self {
        Self {
            nodes: vec![TrieNode {
                label: '*',
                ..TrieNode::default()
            }],
        }
    }

    /// Node labels in creation order.
    fn view(&self) -> View {
        View::cells(self.nodes.iter().map(|n| Cell::Char(n.label)).collect())
    }

    /// Walk `prefix` from the root, returning the visited path if it exists.
    fn path(&self, prefix: &str) -> Option<Vec<usize>> {
        let mut at = 0;
        let mut path = vec![0];
        for c in prefix.chars() {
            at = *self.nodes[at].children.get(&c)?;
            path.push(at);
        }
        Some(path)
    }

    /// Words stored under `node`, in lexicographic order.
    fn words_under(&self, node: usize, prefix: &mut String, out: &mut Vec<String>) {
        if self.nodes[node].terminal {
            out.push(prefix.clone());
        }
        for (&c, &child) in &self.nodes[node].children {
            prefix.push(c);
            self.words_under(child, prefix, out);
            prefix.pop();
        }
    }
}

fn trie(_seed: &Seed) -> Result<Trace> {
    let mut trie = Trie::new();
    let mut rec = Recorder::new("trie-impl");

    rec.emit(
        Snapshot::new(
            trie.view(),
            format!("Trie: insert words [{}]", TRIE_WORDS.join(", ")),
        )
        .at_line(1),
    );

    for word in TRIE_WORDS {
        let mut at = 0;
        let mut reused = vec![0];
        let mut created = Vec::new();
        for c in word.chars() {
            at = match trie.nodes[at].children.get(&c) {
                Some(&child) => {
                    reused.push(child);
                    child
                }
                None => {
                    let id = trie.nodes.len();
                    trie.nodes.push(TrieNode {
                        label: c,
                        ..TrieNode::default()
                    });
                    trie.nodes[at].children.insert(c, id);
                    created.push(id);
                    id
                }
            };
        }
        trie.nodes[at].terminal = true;

        let spelled: Vec<String> = word.chars().map(String::from).collect();
        rec.emit(
            Snapshot::new(
                trie.view(),
                format!(
                    "Insert \"{word}\": {} [end], {} new node(s)",
                    spelled.join(" → "),
                    created.len()
                ),
            )
            .mark(Highlight::Visited, reused)
            .mark(Highlight::Swapping, created)
            .mark(Highlight::Current, [at])
            .annotate("word", word)
            .at_line(3),
        );
    }

    let (path, matches) = match trie.path(TRIE_QUERY) {
        Some(path) => {
            let mut words = Vec::new();
            let mut prefix = TRIE_QUERY.to_string();
            if let Some(&end) = path.last() {
                trie.words_under(end, &mut prefix, &mut words);
            }
            (path, words)
        }
        None => (Vec::new(), Vec::new()),
    };
    rec.emit(
        Snapshot::new(
            trie.view(),
            format!(
                "Trie built! Prefix \"{TRIE_QUERY}\" matches: {}",
                matches.join(", ")
            ),
        )
        .mark(Highlight::Found, path)
        .annotate("matches", matches.join(","))
        .at_line(6),
    );
    rec.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Scalar;

    #[test]
    fn kmp_finds_single_match() {
        let trace = kmp(&Seed::from(vec![])).unwrap();
        assert_eq!(trace.last().message, "KMP complete! Found 1 match(es) at [10]");
        assert_eq!(trace.last().highlighted(Highlight::Found), &[10, 11, 12, 13, 14]);
        assert!(trace.iter().any(|s| s.message == "LPS array: [0, 0, 1, 2, 0]"));
    }

    #[test]
    fn rabin_karp_finds_all_matches() {
        let trace = rabin_karp(&Seed::from(vec![])).unwrap();
        assert_eq!(
            trace.last().annotation("matches"),
            Some(&Scalar::List(vec![0, 9, 12]))
        );
    }

    #[test]
    fn rabin_karp_rolling_hash_matches_direct_hash() {
        let trace = rabin_karp(&Seed::from(vec![])).unwrap();
        let text: Vec<char> = RK_TEXT.chars().collect();
        let m = RK_PATTERN.len();
        let windows: Vec<_> = trace
            .iter()
            .filter_map(|s| s.annotation("window_hash").cloned())
            .collect();
        assert_eq!(windows.len(), text.len() - m + 1);
        for (s, hash) in windows.iter().enumerate() {
            let direct = text[s..s + m]
                .iter()
                .fold(0u64, |h, &c| (h * RK_BASE + u64::from(c)) % RK_MODULUS);
            assert_eq!(hash, &Scalar::Int(direct as i64));
        }
    }

    #[test]
    fn trie_shares_prefixes() {
        let trace = trie(&Seed::from(vec![])).unwrap();
        // root + c a t r d e
        assert_eq!(trace.last().view.len(), 7);
        assert_eq!(
            trace.last().message,
            "Trie built! Prefix \"car\" matches: car, card, care"
        );
        assert_eq!(trace.last().highlighted(Highlight::Found).len(), 4);
    }
}
