use std::cmp::Ordering;
use std::str::FromStr;

/// Comparison key derived from a line: the key text and, when numeric
/// comparison is requested, the value it parses to as a base 10 floating
/// point number.
#[derive(Debug)]
pub(crate) struct Key {
    text: String,
    number: Option<f64>,
}

impl Key {
    /// Derive the key for `line`. A `key_field` of 0 selects the whole line,
    /// any other value the 1-based whitespace-delimited field of that index,
    /// falling back to an empty key when the line has fewer fields.
    pub(crate) fn extract(line: &str, key_field: usize, numeric: bool) -> Key {
        let text = if key_field == 0 {
            line.to_string()
        } else {
            line.split_whitespace()
                .nth(key_field - 1)
                .unwrap_or("")
                .to_string()
        };

        let number = if numeric {
            f64::from_str(&text).ok()
        } else {
            None
        };

        Key { text, number }
    }

    /// Ascending key order. Keys holding a parsed number sort before keys
    /// without one; two numbers compare by value; everything else compares
    /// by raw bytes of the key text. A NaN pair is treated as equal and left
    /// to the caller's tie break.
    pub(crate) fn cmp_keys(&self, other: &Key) -> Ordering {
        match (self.number, other.number) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.text.cmp(&other.text),
        }
    }

    /// Key equality used for deduplication. Numeric keys are equal by value,
    /// non-numeric keys by text, a numeric and a non-numeric key never.
    pub(crate) fn equal(&self, other: &Key) -> bool {
        match (self.number, other.number) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.text == other.text,
            _ => false,
        }
    }
}
