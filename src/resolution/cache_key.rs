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

//! Deterministic cache addressing for queries.
//!
//! Keys are `ai_query_<type>_<hash>` where `hash` is a 32-bit signed rolling
//! hash (`h = h * 31 + unit`) over the UTF-16 units of the normalized text,
//! rendered in base 36. Distinct texts can collide; with 2^32 buckets this is
//! rare for clinical corpora and a collision only serves a cached answer for a
//! different query of the same type.

use super::types::QueryType;
use crate::constants::CACHE_KEY_PREFIX;
use crate::search::normalize;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Cache key for a query text and type
pub fn cache_key(query_text: &str, query_type: QueryType) -> String {
    let hash = rolling_hash(&normalize(query_text));
    format!("{}_{}_{}", CACHE_KEY_PREFIX, query_type, to_base36(hash))
}

/// 32-bit rolling hash with signed wraparound
pub(crate) fn rolling_hash(text: &str) -> i32 {
    text.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_mul(31).wrapping_add(i32::from(unit))
    })
}

/// Base-36 rendering with a leading `-` for negative values
pub(crate) fn to_base36(value: i32) -> String {
    let mut magnitude = i64::from(value).unsigned_abs();
    if magnitude == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while magnitude > 0 {
        digits.push(BASE36_DIGITS[(magnitude % 36) as usize]);
        magnitude /= 36;
    }
    if value < 0 {
        digits.push(b'-');
    }
    digits.reverse();

    String::from_utf8(digits).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_invariant_to_case_and_whitespace() {
        let t = QueryType::Protocol;
        assert_eq!(cache_key("  Dor Lombar  ", t), cache_key("dor lombar", t));
        assert_eq!(cache_key("DOR   lombar", t), cache_key("dor lombar", t));
        assert_eq!(cache_key("Dor lombar?", t), cache_key("dor lombar", t));
    }

    #[test]
    fn test_key_format() {
        assert_eq!(
            cache_key("Dor Lombar", QueryType::Protocol),
            "ai_query_protocol_nb7yiq"
        );
    }

    #[test]
    fn test_key_namespaced_by_type() {
        let protocol = cache_key("dor lombar", QueryType::Protocol);
        let exercise = cache_key("dor lombar", QueryType::Exercise);

        assert!(protocol.starts_with("ai_query_protocol_"));
        assert!(exercise.starts_with("ai_query_exercise_"));
        assert_ne!(protocol, exercise);
    }

    #[test]
    fn test_rolling_hash_known_values() {
        assert_eq!(rolling_hash(""), 0);
        assert_eq!(rolling_hash("a"), 97);
        assert_eq!(rolling_hash("ab"), 97 * 31 + 98);
        assert_eq!(rolling_hash("dor lombar"), 1_409_569_154);
        // Overflows i32 and wraps negative
        assert_eq!(rolling_hash("dor cervical"), -1_242_391_388);
        assert_eq!(rolling_hash("hernia de disco"), -73_836_150);
    }

    #[test]
    fn test_base36_rendering() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(-36), "-10");
        assert_eq!(to_base36(i32::MIN), "-zik0zk");
        assert_eq!(to_base36(i32::MAX), "zik0zj");
    }

    #[test]
    fn test_distinct_texts_get_distinct_keys() {
        let t = QueryType::General;
        assert_ne!(cache_key("dor lombar", t), cache_key("dor cervical", t));
    }
}
