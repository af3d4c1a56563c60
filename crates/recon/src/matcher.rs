/// Similarity between two names on a 0..=100 scale (100 = identical).
pub trait Scorer {
    fn score(&self, a: &str, b: &str) -> f64;
}

/// Case-insensitive similarity that ignores word order: tokens are lowercased,
/// sorted, and rejoined with single spaces before `ratio` is taken.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSortRatio;

impl Scorer for TokenSortRatio {
    fn score(&self, a: &str, b: &str) -> f64 {
        ratio(&token_sort_key(a), &token_sort_key(b))
    }
}

/// Case-insensitive `ratio` on the whole string, word order significant.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ratio;

impl Scorer for Ratio {
    fn score(&self, a: &str, b: &str) -> f64 {
        ratio(&a.to_lowercase(), &b.to_lowercase())
    }
}

pub fn token_sort_key(s: &str) -> String {
    let mut tokens: Vec<String> = s.split_whitespace().map(str::to_lowercase).collect();
    tokens.sort();
    tokens.join(" ")
}

/// Normalized indel similarity: `100 * 2 * lcs / (len_a + len_b)`, in chars.
/// An empty side scores 0, so a blank name never matches anything.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    100.0 * (2 * lcs_len(&a, &b)) as f64 / (a.len() + b.len()) as f64
}

/// Longest common subsequence length, O(len_a * len_b) time, O(len_b) space.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Best-scoring candidate for a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a> {
    pub index: usize,
    pub name: &'a str,
    pub score: f64,
}

/// Highest-scoring candidate regardless of threshold. Ties keep the earliest
/// candidate. `None` only for an empty candidate list.
pub fn best_match<'a, S, C>(query: &str, candidates: &'a [C], scorer: &S) -> Option<Match<'a>>
where
    S: Scorer + ?Sized,
    C: AsRef<str>,
{
    let mut best: Option<Match<'a>> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let name = candidate.as_ref();
        let score = scorer.score(query, name);
        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(Match { index, name, score });
        }
    }
    best
}

/// Best candidate if its score meets `threshold` (inclusive).
pub fn match_one<'a, S, C>(
    query: &str,
    candidates: &'a [C],
    threshold: u8,
    scorer: &S,
) -> Option<Match<'a>>
where
    S: Scorer + ?Sized,
    C: AsRef<str>,
{
    best_match(query, candidates, scorer).filter(|m| accepts(m.score, threshold))
}

pub fn accepts(score: f64, threshold: u8) -> bool {
    score >= f64::from(threshold)
}
