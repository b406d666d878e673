//! Citizen-facing complaint reference numbers.

use chrono::Utc;
use rand::Rng;

/// Generate a complaint reference number.
///
/// Format: `GRV-YYYYMMDD-NNNNN` where the date is the current UTC date
/// and the suffix is a zero-padded random number below 100000.
///
/// The suffix is random rather than sequential, so two complaints
/// submitted on the same day can collide. Callers that need hard
/// uniqueness must check the database and retry.
#[must_use]
pub fn generate_reference_number() -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix: u32 = rand::thread_rng().gen_range(0..100_000);
    format!("GRV-{date}-{suffix:05}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_format() {
        let reference = generate_reference_number();

        assert_eq!(reference.len(), 18);
        assert!(reference.starts_with("GRV-"));

        let parts: Vec<&str> = reference.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].len(), 8);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 5);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_reference_date_is_today() {
        let reference = generate_reference_number();
        let today = Utc::now().format("%Y%m%d").to_string();
        assert_eq!(&reference[4..12], today);
    }

    #[test]
    fn test_reference_suffix_in_range() {
        for _ in 0..100 {
            let reference = generate_reference_number();
            let suffix: u32 = reference[13..].parse().unwrap();
            assert!(suffix < 100_000);
        }
    }
}
