/// Canonical form of an image URL for identity comparisons.
///
/// Neighbor metadata is authored separately from the camera list, so the same
/// image may be spelled with a different scheme, letter case or a trailing
/// slash. All of those compare equal after normalization.
pub fn normalize_url(raw: &str) -> String {
    let lowered = raw.trim().to_ascii_lowercase();
    let without_scheme = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .or_else(|| lowered.strip_prefix("//"))
        .unwrap_or(&lowered);
    without_scheme.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::normalize_url;

    #[test]
    fn scheme_case_and_trailing_slash_are_ignored() {
        let a = normalize_url("https://udottraffic.utah.gov/map/Cctv/1234/");
        let b = normalize_url("HTTP://UDOTTRAFFIC.UTAH.GOV/map/cctv/1234");
        let c = normalize_url("  //udottraffic.utah.gov/map/cctv/1234//");
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a, "udottraffic.utah.gov/map/cctv/1234");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(normalize_url(""), "");
        assert_eq!(normalize_url("https://"), "");
    }
}
