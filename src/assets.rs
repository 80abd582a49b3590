/// A token the panel can trade. The list is fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Asset {
    pub symbol: &'static str,
    pub mint: &'static str,
    pub decimals: u8,
}

pub const ASSETS: [Asset; 4] = [
    Asset {
        symbol: "SOL",
        mint: "So11111111111111111111111111111111111111112",
        decimals: 9,
    },
    Asset {
        symbol: "USDC",
        mint: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
        decimals: 6,
    },
    Asset {
        symbol: "BONK",
        mint: "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263",
        decimals: 5,
    },
    Asset {
        symbol: "WIF",
        mint: "EKpQGSJtjMFqKZ9KQanSqYXRcF8fBopzLHYxdM65zcjm",
        decimals: 6,
    },
];

pub fn find(symbol: &str) -> Option<&'static Asset> {
    ASSETS
        .iter()
        .find(|asset| asset.symbol.eq_ignore_ascii_case(symbol.trim()))
}

impl Asset {
    fn scale(&self) -> f64 {
        10f64.powi(self.decimals as i32)
    }

    /// Human units to base units. `None` for non-positive, non-finite or
    /// out-of-range amounts, and for amounts that round down to zero.
    pub fn to_base_units(&self, amount: f64) -> Option<u64> {
        if !amount.is_finite() || amount <= 0.0 {
            return None;
        }
        let base = (amount * self.scale()).round();
        if base < 1.0 || base >= u64::MAX as f64 {
            return None;
        }
        Some(base as u64)
    }

    pub fn from_base_units(&self, base: u64) -> f64 {
        base as f64 / self.scale()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(find("usdc").map(|a| a.decimals), Some(6));
        assert_eq!(find(" Bonk ").map(|a| a.symbol), Some("BONK"));
        assert!(find("ETH").is_none());
    }

    #[test]
    fn mints_are_unique() {
        for (i, a) in ASSETS.iter().enumerate() {
            for b in &ASSETS[i + 1..] {
                assert_ne!(a.mint, b.mint);
            }
        }
    }

    #[test]
    fn converts_between_human_and_base_units() {
        let sol = find("SOL").unwrap();
        let usdc = find("USDC").unwrap();
        assert_eq!(sol.to_base_units(1.0), Some(1_000_000_000));
        assert_eq!(sol.to_base_units(0.1), Some(100_000_000));
        assert_eq!(usdc.to_base_units(2.5), Some(2_500_000));
        assert_eq!(usdc.from_base_units(150_000_000), 150.0);
    }

    #[test]
    fn rejects_amounts_without_a_base_unit_value() {
        let usdc = find("USDC").unwrap();
        assert_eq!(usdc.to_base_units(0.0), None);
        assert_eq!(usdc.to_base_units(-3.0), None);
        assert_eq!(usdc.to_base_units(f64::NAN), None);
        assert_eq!(usdc.to_base_units(f64::INFINITY), None);
        assert_eq!(usdc.to_base_units(0.0000001), None);
        assert_eq!(usdc.to_base_units(1e30), None);
    }

    #[test]
    fn amount_that_rounds_to_two_pow_64_is_out_of_range() {
        let sol = find("SOL").unwrap();
        // 2^64 is exactly representable and one past u64::MAX.
        let amount = 2f64.powi(64) / 1e9;
        assert!((amount * 1e9).round() >= u64::MAX as f64);
        assert_eq!(sol.to_base_units(amount), None);
        assert_eq!(sol.to_base_units(1e9), Some(1_000_000_000_000_000_000));
    }
}
