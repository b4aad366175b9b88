//! `SKIP_TEST_CLUSTER` policy for suites that need embedded PostgreSQL.
//!
//! The cluster downloads PostgreSQL binaries on first use, which fails on
//! offline hosts. Setup failures are therefore reported as skips unless the
//! variable is explicitly falsy, which is how CI makes them fatal.

/// Whether a cluster setup failure should skip rather than fail.
///
/// Only "0", "false" and "no" (case-insensitive) make failures fatal.
pub fn should_skip_test_cluster() -> bool {
    skips_on(std::env::var("SKIP_TEST_CLUSTER").ok().as_deref())
}

fn skips_on(value: Option<&str>) -> bool {
    value.is_none_or(|raw| !matches!(raw.trim().to_lowercase().as_str(), "0" | "false" | "no"))
}

/// Report a cluster setup failure as a skip marker, or panic when skipping
/// is disabled.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Unset SKIP_TEST_CLUSTER to skip.");
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(None, true)]
    #[case(Some("1"), true)]
    #[case(Some("yes"), true)]
    #[case(Some("0"), false)]
    #[case(Some("False"), false)]
    #[case(Some(" no "), false)]
    fn only_falsy_values_make_failures_fatal(#[case] raw: Option<&str>, #[case] skip: bool) {
        assert_eq!(skips_on(raw), skip);
    }
}
