//! Number formatting for the mango counter and shop prices.

/// Suffix for each power of 1000. Index 0 is the unscaled value.
const SUFFIXES: &[&str] = &["", "K", "M", "B", "T", "Qa", "Qi"];

/// Abbreviate a mango count: `999 → "999"`, `1000 → "1K"`, `1500 → "1.5K"`.
///
/// Whole scaled values print bare. Anything else is rounded half-up to one
/// decimal, so `1999` shows as `"2.0K"` and `999_999` as `"1000.0K"`.
pub fn format_number(count: u64) -> String {
    if count < 1000 {
        return count.to_string();
    }

    let mut index = 0;
    let mut divisor: u64 = 1;
    while index < SUFFIXES.len() - 1 && count / divisor >= 1000 {
        divisor *= 1000;
        index += 1;
    }

    if count % divisor == 0 {
        return format!("{}{}", count / divisor, SUFFIXES[index]);
    }

    // u128: count * 10 overflows u64 near the top of the range.
    let divisor = divisor as u128;
    let tenths = (count as u128 * 10 + divisor / 2) / divisor;
    format!("{}.{}{}", tenths / 10, tenths % 10, SUFFIXES[index])
}

/// Cooldown seconds with two decimals (e.g. `0.47`).
pub fn format_seconds(seconds: f64) -> String {
    format!("{:.2}", seconds)
}

/// Byte count as megabytes with up to two decimals, used by the update dialog.
pub fn format_megabytes(bytes: u64) -> String {
    let mb = bytes as f64 / (1024.0 * 1024.0);
    let s = format!("{:.2}", mb);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Split "12.3K" into (12.3 as tenths, "K").
    fn parse_formatted(s: &str) -> (u64, String) {
        let digits: String = s.chars().take_while(|c| c.is_ascii_digit() || *c == '.').collect();
        let suffix = s[digits.len()..].to_string();
        let tenths = match digits.split_once('.') {
            Some((w, f)) => w.parse::<u64>().unwrap() * 10 + f.parse::<u64>().unwrap(),
            None => digits.parse::<u64>().unwrap() * 10,
        };
        (tenths, suffix)
    }

    proptest! {
        #[test]
        fn prop_never_panics(n in any::<u64>()) {
            let _ = format_number(n);
        }

        #[test]
        fn prop_below_thousand_is_plain(n in 0u64..1000) {
            prop_assert_eq!(format_number(n), n.to_string());
        }

        #[test]
        fn prop_at_most_one_decimal(n in any::<u64>()) {
            let s = format_number(n);
            if let Some((_, rest)) = s.split_once('.') {
                let decimals = rest.chars().take_while(|c| c.is_ascii_digit()).count();
                prop_assert_eq!(decimals, 1, "got {}", s);
            }
        }

        #[test]
        fn prop_within_half_a_tenth(n in 1000u64..1_000_000_000_000_000) {
            let s = format_number(n);
            let (tenths, suffix) = parse_formatted(&s);
            let idx = SUFFIXES.iter().position(|x| *x == suffix).unwrap();
            let divisor = 1000u128.pow(idx as u32);
            let shown_x10 = tenths as u128 * divisor;
            let diff = shown_x10.abs_diff(n as u128 * 10);
            prop_assert!(diff * 2 <= divisor, "{} shown as {}", n, s);
        }

        #[test]
        fn prop_bare_only_when_whole(n in 1000u64..1_000_000_000_000_000) {
            let s = format_number(n);
            let (_, suffix) = parse_formatted(&s);
            let idx = SUFFIXES.iter().position(|x| *x == suffix).unwrap();
            let whole = n % 1000u64.pow(idx as u32) == 0;
            prop_assert_eq!(!s.contains('.'), whole, "{} shown as {}", n, s);
        }

        #[test]
        fn prop_scaled_part_in_range(n in 1000u64..1_000_000_000_000_000) {
            let s = format_number(n);
            let (tenths, _) = parse_formatted(&s);
            prop_assert!(tenths <= 10_000, "got {}", s);
            prop_assert!(tenths >= 10, "got {}", s);
        }
    }
}
