use chrono::{Datelike, Utc};
use rand::Rng;

/// Mints a tracking code of the form `PREFIX-REGION-YEAR-RANDOM`, e.g.
/// `TT-IND-2025-48291`. Uniqueness is not guaranteed here; the store checks
/// the candidate against existing tokens and regenerates on collision.
pub fn generate_token(prefix: &str, region: &str) -> String {
    let year = Utc::now().year();
    let suffix: u32 = rand::thread_rng().gen_range(0..100_000);
    format!("{}-{}-{}-{:05}", prefix, region, year, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = generate_token("TT", "IND");
        let parts: Vec<&str> = token.split('-').collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "TT");
        assert_eq!(parts[1], "IND");
        assert_eq!(parts[2], Utc::now().year().to_string());
        assert_eq!(parts[3].len(), 5);
        assert!(parts[3].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_token_suffix_varies() {
        let tokens: std::collections::HashSet<String> =
            (0..50).map(|_| generate_token("TT", "IND")).collect();
        // 50 draws from a 100k space colliding down to one value would mean
        // the suffix is not random at all.
        assert!(tokens.len() > 1);
    }

    #[test]
    fn test_token_carries_configured_prefix_and_region() {
        let token = generate_token("CW", "BLR");
        assert!(token.starts_with("CW-BLR-"));
    }
}
