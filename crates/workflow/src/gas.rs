// Copyright 2021 Gnosis Ltd.
// SPDX-License-Identifier: Apache-2.0

use deployer_core::U256;

/// `ceil(price * percent / 100)`, `None` on overflow.
pub fn bump_gas_price(price: U256, percent: u64) -> Option<U256> {
    let scaled = price.checked_mul(U256::from(percent))?;
    let (quotient, remainder) = scaled.div_mod(U256::from(100));
    if remainder.is_zero() {
        Some(quotient)
    } else {
        quotient.checked_add(U256::one())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GAS_PRICE_BUMP_PERCENT;

    fn bump(price: u64) -> U256 {
        bump_gas_price(price.into(), GAS_PRICE_BUMP_PERCENT).unwrap()
    }

    #[test]
    fn exact_multiples() {
        assert_eq!(bump(0), 0.into());
        assert_eq!(bump(10), 12.into());
        assert_eq!(bump(1_000_000_000), 1_200_000_000u64.into());
        assert_eq!(bump(20_000_000_000), 24_000_000_000u64.into());
    }

    #[test]
    fn rounds_up() {
        // 1.2, 8.4 and 13.2
        assert_eq!(bump(1), 2.into());
        assert_eq!(bump(7), 9.into());
        assert_eq!(bump(11), 14.into());
        assert_eq!(bump(1_000_000_001), 1_200_000_002u64.into());
    }

    #[test]
    fn overflow() {
        assert_eq!(
            bump_gas_price(U256::max_value(), GAS_PRICE_BUMP_PERCENT),
            None
        );
        assert_eq!(
            bump_gas_price(U256::max_value() / 100, 100),
            Some(U256::max_value() / 100)
        );
    }
}
