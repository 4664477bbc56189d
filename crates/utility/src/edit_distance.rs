use std::cmp::min;

/// Levenshtein distance over unicode scalar values.
///
/// Keeps only two rows of the dynamic programming table.
pub fn edit_distance(word1: &str, word2: &str) -> usize {
    let a = word1.chars().collect::<Vec<_>>();
    let b = word2.chars().collect::<Vec<_>>();

    let mut previous = (0..=b.len()).collect::<Vec<_>>();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = min(substitution, min(previous[j + 1], current[j]) + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Edit distance scaled by the longer word, `0.0` for equal words and `1.0`
/// for words sharing nothing.
pub fn normalized_edit_distance(word1: &str, word2: &str) -> f64 {
    let longest = word1.chars().count().max(word2.chars().count());
    if longest == 0 {
        return 0.0;
    }
    edit_distance(word1, word2) as f64 / longest as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_examples() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("library", "library"), 0);
        assert_eq!(edit_distance("libary", "library"), 1);
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(edit_distance("plön", "plon"), 1);
    }

    #[test]
    fn normalized_bounds() {
        assert_eq!(normalized_edit_distance("", ""), 0.0);
        assert_eq!(normalized_edit_distance("pond", "pond"), 0.0);
        assert_eq!(normalized_edit_distance("abc", "xyz"), 1.0);
    }
}
