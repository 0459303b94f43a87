//! Free-text item input parsing.
//!
//! Users type requests like `Iron Ore: 50, Copper Ore: 100`, `Iron Ore x50`,
//! or `Iron Ore 50`. Entries are comma-separated; each entry is tried against
//! three syntaxes in order. Entries that fail to yield a positive integer
//! quantity are dropped silently rather than failing the whole input.

use std::collections::BTreeMap;

/// Parses user item input into a name-to-quantity map.
///
/// Supported entry formats, tried in order:
/// 1. `Name: N`
/// 2. `Name xN` (the ` x` separator is matched case-insensitively; the name
///    keeps its original casing)
/// 3. `Name N` (last whitespace-delimited token is the quantity)
///
/// Tokens with a non-numeric or non-positive quantity, and single-word
/// entries, are skipped.
#[must_use]
pub fn parse_item_input(input: &str) -> BTreeMap<String, i64> {
    let mut items = BTreeMap::new();

    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((name, quantity)) = split_entry(part) else {
            continue;
        };
        let Ok(quantity) = quantity.parse::<i64>() else {
            continue;
        };
        if quantity > 0 && !name.is_empty() {
            items.insert(name.to_string(), quantity);
        }
    }

    items
}

/// Splits one entry into `(name, quantity_text)` using the three syntaxes.
fn split_entry(part: &str) -> Option<(&str, &str)> {
    if let Some((name, quantity)) = part.split_once(':') {
        return Some((name.trim(), quantity.trim()));
    }

    // " x" / " X" separator; last occurrence wins so names containing the
    // pattern still parse ("Elixir of Xp x5").
    let bytes = part.as_bytes();
    if let Some(idx) = bytes
        .windows(2)
        .rposition(|w| w[0] == b' ' && w[1].eq_ignore_ascii_case(&b'x'))
    {
        let name = part[..idx].trim();
        let quantity = part[idx + 2..].trim();
        if !name.is_empty() {
            return Some((name, quantity));
        }
    }

    // Fallback: last whitespace-delimited token is the quantity.
    let (name, quantity) = part.rsplit_once(char::is_whitespace)?;
    Some((name.trim(), quantity.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, quantity: i64) -> (String, i64) {
        (name.to_string(), quantity)
    }

    #[test]
    fn test_colon_format() {
        let items = parse_item_input("Iron Ore: 50, Copper Ore: 100");
        assert_eq!(
            items.into_iter().collect::<Vec<_>>(),
            vec![entry("Copper Ore", 100), entry("Iron Ore", 50)]
        );
    }

    #[test]
    fn test_space_format() {
        let items = parse_item_input("Iron Ore 50, Copper Ore 100");
        assert_eq!(
            items.into_iter().collect::<Vec<_>>(),
            vec![entry("Copper Ore", 100), entry("Iron Ore", 50)]
        );
    }

    #[test]
    fn test_x_format() {
        let items = parse_item_input("Iron Ore x50");
        assert_eq!(
            items.into_iter().collect::<Vec<_>>(),
            vec![entry("Iron Ore", 50)]
        );
    }

    #[test]
    fn test_x_separator_case_insensitive_name_casing_preserved() {
        let items = parse_item_input("Iron Ore X50");
        assert_eq!(
            items.into_iter().collect::<Vec<_>>(),
            vec![entry("Iron Ore", 50)]
        );
    }

    #[test]
    fn test_x_separator_last_occurrence_wins() {
        let items = parse_item_input("Elixir of Xp x5");
        assert_eq!(
            items.into_iter().collect::<Vec<_>>(),
            vec![entry("Elixir of Xp", 5)]
        );
    }

    #[test]
    fn test_invalid_quantity_dropped_silently() {
        // A bad token never errors the whole input
        let items = parse_item_input("Iron Ore: fifty, Copper Ore: 100");
        assert_eq!(
            items.into_iter().collect::<Vec<_>>(),
            vec![entry("Copper Ore", 100)]
        );
    }

    #[test]
    fn test_non_positive_quantity_dropped() {
        let items = parse_item_input("Iron Ore: 0, Copper Ore: -3, Gold Bar: 2");
        assert_eq!(
            items.into_iter().collect::<Vec<_>>(),
            vec![entry("Gold Bar", 2)]
        );
    }

    #[test]
    fn test_single_word_entry_dropped() {
        let items = parse_item_input("Iron, Copper Ore 5");
        assert_eq!(
            items.into_iter().collect::<Vec<_>>(),
            vec![entry("Copper Ore", 5)]
        );
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert!(parse_item_input("").is_empty());
        assert!(parse_item_input("  ,  ,  ").is_empty());
    }

    #[test]
    fn test_mixed_formats_in_one_input() {
        let items = parse_item_input("Iron Ore: 50, Copper Ore x10, Thorium Bar 3");
        assert_eq!(
            items.into_iter().collect::<Vec<_>>(),
            vec![
                entry("Copper Ore", 10),
                entry("Iron Ore", 50),
                entry("Thorium Bar", 3),
            ]
        );
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let items = parse_item_input("Iron Ore: 10, Iron Ore: 25");
        assert_eq!(
            items.into_iter().collect::<Vec<_>>(),
            vec![entry("Iron Ore", 25)]
        );
    }
}
