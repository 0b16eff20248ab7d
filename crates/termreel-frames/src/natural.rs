//! Natural ordering of names.
//!
//! Frame files are named by whatever the conversion tool emitted
//! (`frame1.txt`, `frame2.txt`, ..., `frame10.txt`), so plain
//! lexicographic order would play frame 10 before frame 2. A
//! [`NaturalKey`] splits a name into alternating text and digit runs:
//! digit runs compare as integers of any size, text runs compare
//! case-insensitively.

use std::cmp::Ordering;

/// One run of a name: either text (stored lowercased) or an ASCII digit
/// run (stored without leading zeros).
#[derive(Debug, Clone, PartialEq, Eq)]
enum Chunk {
    Text(String),
    Number(String),
}

impl Ord for Chunk {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            // Digit strings have no leading zeros, so a longer one is larger.
            (Self::Number(a), Self::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Chunk {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort key implementing natural order.
///
/// Every key starts with a (possibly empty) text chunk and then
/// alternates, so chunks at the same position are always of the same
/// kind when two keys are compared.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<Chunk>);

impl NaturalKey {
    /// Build the key for `name`.
    pub fn new(name: &str) -> Self {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut in_digits = false;

        for c in name.chars() {
            let is_digit = c.is_ascii_digit();
            if is_digit != in_digits {
                chunks.push(finish_chunk(std::mem::take(&mut current), in_digits));
                in_digits = is_digit;
            }
            if is_digit {
                current.push(c);
            } else {
                current.extend(c.to_lowercase());
            }
        }
        chunks.push(finish_chunk(current, in_digits));

        Self(chunks)
    }
}

fn finish_chunk(run: String, digits: bool) -> Chunk {
    if digits {
        let trimmed = run.trim_start_matches('0');
        Chunk::Number(trimmed.to_owned())
    } else {
        Chunk::Text(run)
    }
}

/// Sort `items` in natural order of the string returned by `key`.
///
/// Names whose keys are equal (`a07` and `a7`, `Frame` and `frame`) fall
/// back to plain byte order so the result is total and deterministic.
pub fn sort_natural<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by_cached_key(|item| {
        let name = key(item);
        (NaturalKey::new(name), name.to_owned())
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The ordering `sort_natural` applies to a pair of names.
    fn natural_cmp(a: &str, b: &str) -> Ordering {
        NaturalKey::new(a)
            .cmp(&NaturalKey::new(b))
            .then_with(|| a.cmp(b))
    }

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = names.iter().map(|s| (*s).to_owned()).collect();
        sort_natural(&mut v, String::as_str);
        v
    }

    #[test]
    fn numbers_compare_numerically() {
        assert_eq!(
            sorted(&["frame10.txt", "frame2.txt", "frame1.txt"]),
            vec!["frame1.txt", "frame2.txt", "frame10.txt"]
        );
    }

    #[test]
    fn bare_numbers() {
        assert_eq!(sorted(&["10", "2", "1", "100", "20"]), vec!["1", "2", "10", "20", "100"]);
    }

    #[test]
    fn text_is_case_insensitive() {
        assert_eq!(sorted(&["Banana", "apple", "Cherry"]), vec!["apple", "Banana", "Cherry"]);
    }

    #[test]
    fn leading_digits_sort_before_text() {
        assert_eq!(sorted(&["b", "1a", "a"]), vec!["1a", "a", "b"]);
    }

    #[test]
    fn huge_digit_runs_do_not_overflow() {
        let big = "frame99999999999999999999999999.txt";
        let bigger = "frame100000000000000000000000000.txt";
        assert_eq!(natural_cmp(big, bigger), Ordering::Less);
        assert_eq!(natural_cmp("frame9.txt", big), Ordering::Less);
    }

    #[test]
    fn leading_zeros_are_numeric_then_tie_broken() {
        assert_eq!(natural_cmp("f007", "f8"), Ordering::Less);
        assert_eq!(natural_cmp("f007", "f7"), Ordering::Less);
        assert_eq!(natural_cmp("f7", "f7"), Ordering::Equal);
    }

    #[test]
    fn equal_keys_sort_by_raw_name() {
        assert_eq!(sorted(&["f7", "f007", "F7"]), vec!["F7", "f007", "f7"]);
    }

    #[test]
    fn multiple_runs() {
        assert_eq!(
            sorted(&["s2_f10", "s10_f1", "s2_f9", "s1_f100"]),
            vec!["s1_f100", "s2_f9", "s2_f10", "s10_f1"]
        );
    }
}
