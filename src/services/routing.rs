use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::payment::{GatewayKind, Tier};

/// Highest amount still handled by the low tier (inclusive).
pub const LOW_TIER_CEILING: Decimal = dec!(20);

/// Lowest amount handled by the high tier (inclusive).
pub const HIGH_TIER_FLOOR: Decimal = dec!(501);

/// Gateway and attempt budget bound to a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPolicy {
    pub tier: Tier,
    pub gateway: GatewayKind,
    pub max_attempts: u32,
}

pub const TIER_POLICIES: [TierPolicy; 3] = [
    TierPolicy {
        tier: Tier::Low,
        gateway: GatewayKind::Cheap,
        max_attempts: 1,
    },
    TierPolicy {
        tier: Tier::Mid,
        gateway: GatewayKind::Expensive,
        max_attempts: 2,
    },
    TierPolicy {
        tier: Tier::High,
        gateway: GatewayKind::Premium,
        max_attempts: 3,
    },
];

impl Tier {
    /// `amount <= 20` is low, `20 < amount < 501` is mid, `amount >= 501` is high.
    pub fn for_amount(amount: Decimal) -> Self {
        if amount <= LOW_TIER_CEILING {
            Tier::Low
        } else if amount < HIGH_TIER_FLOOR {
            Tier::Mid
        } else {
            Tier::High
        }
    }

    pub fn policy(self) -> TierPolicy {
        match self {
            Tier::Low => TIER_POLICIES[0],
            Tier::Mid => TIER_POLICIES[1],
            Tier::High => TIER_POLICIES[2],
        }
    }
}

/// Picks the tier policy for an already validated amount.
pub fn route(amount: Decimal) -> TierPolicy {
    Tier::for_amount(amount).policy()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    #[rstest]
    #[case(dec!(0.01), Tier::Low)]
    #[case(dec!(20.00), Tier::Low)]
    #[case(dec!(20.01), Tier::Mid)]
    #[case(dec!(50.50), Tier::Mid)]
    #[case(dec!(500.99), Tier::Mid)]
    #[case(dec!(501.00), Tier::High)]
    #[case(dec!(501.01), Tier::High)]
    #[case(dec!(999999.99), Tier::High)]
    fn boundaries_are_exact(#[case] amount: Decimal, #[case] tier: Tier) {
        assert_eq!(Tier::for_amount(amount), tier);
    }

    #[test]
    fn policy_table_matches_tiers() {
        for tier in Tier::iter() {
            assert_eq!(tier.policy().tier, tier);
        }
        assert_eq!(route(dec!(20.00)).gateway, GatewayKind::Cheap);
        assert_eq!(route(dec!(20.00)).max_attempts, 1);
        assert_eq!(route(dec!(100.00)).gateway, GatewayKind::Expensive);
        assert_eq!(route(dec!(100.00)).max_attempts, 2);
        assert_eq!(route(dec!(501.00)).gateway, GatewayKind::Premium);
        assert_eq!(route(dec!(501.00)).max_attempts, 3);
    }
}
