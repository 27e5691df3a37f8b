// Copyright 2026 Muvon Un Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Longest common prefix rewarded by the Winkler adjustment
const WINKLER_PREFIX_LIMIT: usize = 4;
const WINKLER_SCALING: f64 = 0.1;

/// Jaro-Winkler similarity in `[0.0, 1.0]`.
///
/// Equal strings score 1.0, an empty side scores 0.0. Symmetric under
/// argument swap. Operates on Unicode scalar values, not bytes.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let jaro = jaro(&a, &b);
    if jaro == 0.0 {
        return 0.0;
    }

    let prefix = a
        .iter()
        .zip(b.iter())
        .take(WINKLER_PREFIX_LIMIT)
        .take_while(|(x, y)| x == y)
        .count();

    (jaro + WINKLER_SCALING * prefix as f64 * (1.0 - jaro)).clamp(0.0, 1.0)
}

/// Plain Jaro similarity over non-empty char slices
fn jaro(a: &[char], b: &[char]) -> f64 {
    let window = (a.len().max(b.len()) / 2).saturating_sub(1);

    let mut a_matched = vec![false; a.len()];
    let mut b_matched = vec![false; b.len()];
    let mut matches = 0usize;

    for (i, ca) in a.iter().enumerate() {
        let start = i.saturating_sub(window);
        let end = (i + window + 1).min(b.len());

        for j in start..end {
            if b_matched[j] || b[j] != *ca {
                continue;
            }
            a_matched[i] = true;
            b_matched[j] = true;
            matches += 1;
            break;
        }
    }

    if matches == 0 {
        return 0.0;
    }

    // Matched characters of both strings, in order, compared pairwise
    let a_seq = a.iter().zip(&a_matched).filter(|(_, m)| **m).map(|(c, _)| c);
    let b_seq = b.iter().zip(&b_matched).filter(|(_, m)| **m).map(|(c, _)| c);
    let transpositions = a_seq.zip(b_seq).filter(|(x, y)| x != y).count();

    let m = matches as f64;
    let t = transpositions as f64 / 2.0;

    (m / a.len() as f64 + m / b.len() as f64 + (m - t) / m) / 3.0
}

/// Whether two strings are at least `threshold` similar
pub fn fuzzy_match(a: &str, b: &str, threshold: f64) -> bool {
    similarity(a, b) >= threshold
}
