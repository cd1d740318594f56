use std::collections::HashMap;
use std::hash::Hash;

/// A window of `n` consecutive tokens, borrowed from the token sequence.
pub type NGram<'a> = &'a [String];

/// Occurrence counts keyed by n-gram (or by item on the set path).
pub type CountMap<K> = HashMap<K, usize>;

/// Counts every contiguous window of `n` tokens. Sequences shorter than `n`
/// yield an empty map; `n == 0` is rejected by config validation upstream.
pub fn get_ngram_counts(word_vec: &[String], ngrams: usize) -> CountMap<NGram<'_>> {
    let mut hashmap: CountMap<NGram<'_>> = HashMap::new();
    if ngrams == 0 {
        return hashmap;
    }
    for window in word_vec.windows(ngrams) {
        *hashmap.entry(window).or_insert(0) += 1;
    }
    hashmap
}

/// Sum over keys of `a` of `min(a[k], b[k])`, treating missing keys as 0.
pub fn get_matches_clipped<K: Hash + Eq>(a: &CountMap<K>, b: &CountMap<K>) -> usize {
    let mut matches: usize = 0;
    for (ng, a_count) in a {
        if let Some(b_count) = b.get(ng) {
            matches += a_count.min(b_count);
        }
    }
    matches
}

pub fn total_count<K>(counts: &CountMap<K>) -> usize {
    counts.values().sum()
}
