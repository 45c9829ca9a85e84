/// Suffix every normalized route name carries.
pub const ROUTE_SUFFIX: char = 'P';

/// Canonical route identifier: the route number without leading zeros,
/// followed by [`ROUTE_SUFFIX`].
///
/// Everything that is not a digit is dropped, which covers prefixes
/// (`"SR-"`, `"I "`) and the positive/negative direction suffix (`P`/`N`)
/// alike, so `"84"`, `"084"`, `"0084N"` and `"I-84"` all become `"84P"`.
/// Input without any digit normalizes to the empty string.
pub fn normalize_route(input: &str) -> String {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return String::new();
    }
    let number = match digits.trim_start_matches('0') {
        "" => "0",
        n => n,
    };
    format!("{number}{ROUTE_SUFFIX}")
}

/// Normalizes an optional roadway field; absent input yields `""`.
pub fn normalize_route_opt(input: Option<&str>) -> String {
    input.map(normalize_route).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{normalize_route, normalize_route_opt};

    #[test]
    fn equivalent_spellings_compare_equal() {
        let expected = "84P";
        for raw in ["084", "84P", "84", "0084P", "0084N", "I-84", " i 84 n "] {
            assert_eq!(normalize_route(raw), expected, "input {raw:?}");
        }
    }

    #[test]
    fn empty_and_digitless_inputs() {
        assert_eq!(normalize_route(""), "");
        assert_eq!(normalize_route("SR-"), "");
        assert_eq!(normalize_route_opt(None), "");
    }

    #[test]
    fn all_zero_route_keeps_a_digit() {
        assert_eq!(normalize_route("000"), "0P");
    }

    #[test]
    fn distinct_routes_stay_distinct() {
        assert_ne!(normalize_route("15"), normalize_route("150"));
        assert_ne!(normalize_route("0015P"), normalize_route("0089P"));
    }
}
