// ============================================================
// Layer 5 - chrF / chrF++ Similarity
// ============================================================
// Character n-gram F-score (Popović 2015), with word n-grams
// added for chrF++ (Popović 2017). Matches sacrebleu's
// `sentence_chrf(hyp, [ref], word_order=2)` with its defaults:
//
//   char orders 1..=6, whitespace removed first
//   word orders 1..=2, a single leading/trailing punctuation
//                      char is split off each word
//   beta = 2           recall weighted over precision
//   no lowercasing, no epsilon smoothing
//
// For every order the statistics are (hyp n-grams, ref n-grams,
// clipped matches). Precision and recall are averaged over the
// orders where both sides have n-grams, then combined:
//
//   F_beta = (1 + beta²) · P · R / (beta² · P + R)   × 100
//
// beta ≠ 1 makes the score directional: swapping hypothesis and
// reference swaps P and R and changes the result.

use std::collections::HashMap;

use crate::domain::traits::SimilarityMetric;

pub const CHAR_ORDER: usize = 6;
pub const WORD_ORDER: usize = 2;
pub const BETA: f64 = 2.0;

const EPS: f64 = 1e-16;
const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

type NgramCounts = HashMap<String, usize>;

#[derive(Debug, Clone, PartialEq)]
pub struct ChrF {
    char_order: usize,
    word_order: usize,
    beta:       f64,
}

/// N-gram tables of one string: char orders first, then word orders
#[derive(Debug, Clone, Default)]
pub struct NgramProfile {
    orders: Vec<NgramCounts>,
}

impl Default for ChrF {
    /// chrF++
    fn default() -> Self {
        Self { char_order: CHAR_ORDER, word_order: WORD_ORDER, beta: BETA }
    }
}

impl ChrF {
    fn total_order(&self) -> usize {
        self.char_order + self.word_order
    }

    fn f_score(&self, stats: &[(usize, usize, usize)]) -> f64 {
        let factor = self.beta * self.beta;
        let mut avg_prec        = 0.0;
        let mut avg_rec         = 0.0;
        let mut effective_order = 0usize;

        for &(n_hyp, n_ref, n_match) in stats {
            if n_hyp > 0 && n_ref > 0 {
                avg_prec += n_match as f64 / n_hyp as f64;
                avg_rec  += n_match as f64 / n_ref as f64;
                effective_order += 1;
            }
        }

        if effective_order == 0 {
            return 0.0;
        }
        avg_prec /= effective_order as f64;
        avg_rec  /= effective_order as f64;

        if avg_prec + avg_rec <= 0.0 {
            return 0.0;
        }
        let score = (1.0 + factor) * avg_prec * avg_rec / (factor * avg_prec + avg_rec).max(EPS);
        100.0 * score
    }
}

impl SimilarityMetric for ChrF {
    type Features = NgramProfile;

    fn extract(&self, text: &str) -> NgramProfile {
        let chars: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
        let words = split_punctuation(text);

        let mut orders = Vec::with_capacity(self.total_order());
        for n in 1..=self.char_order {
            orders.push(char_ngrams(&chars, n));
        }
        for n in 1..=self.word_order {
            orders.push(word_ngrams(&words, n));
        }
        NgramProfile { orders }
    }

    fn compare(&self, hypothesis: &NgramProfile, reference: &NgramProfile) -> f64 {
        let stats: Vec<(usize, usize, usize)> = hypothesis.orders
            .iter()
            .zip(&reference.orders)
            .map(|(hyp, r)| match_statistics(hyp, r))
            .collect();
        self.f_score(&stats)
    }
}

fn char_ngrams(chars: &[char], n: usize) -> NgramCounts {
    let mut counts = NgramCounts::new();
    for window in chars.windows(n) {
        *counts.entry(window.iter().collect()).or_insert(0) += 1;
    }
    counts
}

fn word_ngrams(words: &[String], n: usize) -> NgramCounts {
    let mut counts = NgramCounts::new();
    for window in words.windows(n) {
        *counts.entry(window.join(" ")).or_insert(0) += 1;
    }
    counts
}

/// Whitespace tokens with one trailing (else leading) punctuation
/// char split off. `(hi)` becomes `(hi` and `)`.
fn split_punctuation(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for word in text.split_whitespace() {
        let first = word.chars().next();
        let last  = word.chars().next_back();

        match (first, last) {
            (Some(_), _) if word.chars().count() == 1 => tokens.push(word.to_string()),
            (_, Some(l)) if PUNCTUATION.contains(l) => {
                tokens.push(word[..word.len() - l.len_utf8()].to_string());
                tokens.push(l.to_string());
            }
            (Some(f), _) if PUNCTUATION.contains(f) => {
                tokens.push(f.to_string());
                tokens.push(word[f.len_utf8()..].to_string());
            }
            _ => tokens.push(word.to_string()),
        }
    }
    tokens
}

/// (hyp count, ref count, clipped match count) for one order
fn match_statistics(hyp: &NgramCounts, reference: &NgramCounts) -> (usize, usize, usize) {
    let n_hyp: usize = hyp.values().sum();
    let n_ref: usize = reference.values().sum();
    let n_match: usize = hyp
        .iter()
        .filter_map(|(ngram, &count)| reference.get(ngram).map(|&r| count.min(r)))
        .sum();
    (n_hyp, n_ref, n_match)
}
