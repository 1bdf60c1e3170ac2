//! # Retention policy for captured artifacts.
//!
//! [`RetentionPolicy`] determines how many artifacts survive a pruning pass.
//!
//! - [`RetentionPolicy::Unlimited`] — every artifact is kept; pruning is a no-op.
//! - [`RetentionPolicy::Keep`] — only the newest `n` artifacts survive.
//!
//! The raw `keep` setting is signed so operators can disable pruning with
//! zero or any negative value:
//!
//! ```text
//! keep <= 0   → RetentionPolicy::Unlimited   (never delete)
//! keep >  0   → RetentionPolicy::Keep(keep)  (delete all but the newest keep)
//! ```

/// Policy controlling how many artifacts survive a pruning pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Keep every artifact; pruning removes nothing.
    Unlimited,
    /// Keep only the newest `n` artifacts; pruning removes the older surplus.
    Keep(usize),
}

impl RetentionPolicy {
    /// Maps the raw signed `keep` setting to a policy.
    ///
    /// Zero and negative values disable pruning entirely.
    pub fn from_keep(keep: i64) -> Self {
        if keep <= 0 {
            RetentionPolicy::Unlimited
        } else {
            RetentionPolicy::Keep(keep as usize)
        }
    }

    /// Number of entries to delete from a listing of `total` artifacts.
    ///
    /// The surplus is always taken from the oldest end of a
    /// name-ordered listing.
    pub fn excess(&self, total: usize) -> usize {
        match self {
            RetentionPolicy::Unlimited => 0,
            RetentionPolicy::Keep(n) => total.saturating_sub(*n),
        }
    }
}

impl Default for RetentionPolicy {
    /// Returns [`RetentionPolicy::Keep`] with the stock limit of 10.
    fn default() -> Self {
        RetentionPolicy::Keep(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_keep_maps_zero_and_negative_to_unlimited() {
        assert_eq!(RetentionPolicy::from_keep(0), RetentionPolicy::Unlimited);
        assert_eq!(RetentionPolicy::from_keep(-3), RetentionPolicy::Unlimited);
        assert_eq!(
            RetentionPolicy::from_keep(i64::MIN),
            RetentionPolicy::Unlimited
        );
    }

    #[test]
    fn test_from_keep_maps_positive_to_keep() {
        assert_eq!(RetentionPolicy::from_keep(1), RetentionPolicy::Keep(1));
        assert_eq!(RetentionPolicy::from_keep(7), RetentionPolicy::Keep(7));
    }

    #[test]
    fn test_excess_is_zero_at_or_under_the_limit() {
        let policy = RetentionPolicy::Keep(10);
        assert_eq!(policy.excess(10), 0, "at the limit nothing is pruned");
        assert_eq!(policy.excess(3), 0, "under the limit nothing is pruned");
        assert_eq!(policy.excess(0), 0, "empty listing prunes nothing");
    }

    #[test]
    fn test_excess_counts_only_the_surplus() {
        assert_eq!(RetentionPolicy::Keep(10).excess(14), 4);
        assert_eq!(RetentionPolicy::Keep(1).excess(2), 1);
    }

    #[test]
    fn test_unlimited_never_prunes() {
        assert_eq!(RetentionPolicy::Unlimited.excess(usize::MAX), 0);
    }
}
