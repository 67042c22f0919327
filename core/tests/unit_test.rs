//! Unit tests for signaldesk-core modules

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};
    use rust_decimal::Decimal;
    use signaldesk_core::entitlement::{
        credit_bonus, resolve_entitlement, Limit, PlanTier, QuotaSet, UserRecord,
    };
    use signaldesk_core::pnl::{aggregate_pnl, Direction, Position, PositionStatus};
    use signaldesk_core::usage::{classify, ExpiryCountdown, QuotaStatus, UsageLevel};
    use std::collections::HashMap;

    fn user(
        is_admin: bool,
        active: bool,
        tier: PlanTier,
        expires_at: Option<DateTime<Utc>>,
        credit: &str,
    ) -> UserRecord {
        UserRecord {
            is_admin,
            is_pro_subscription_active: active,
            pro_plan_tier: tier,
            pro_expires_at: expires_at,
            credit_balance: credit.parse::<Decimal>().unwrap(),
            ai_uses_count: 0,
        }
    }

    fn position(
        id: &str,
        direction: Direction,
        entry_price: &str,
        entry_amount: &str,
        leverage: &str,
        current_price: Option<&str>,
        status: PositionStatus,
    ) -> Position {
        Position {
            id: id.to_string(),
            pair: "BTC/USDT".to_string(),
            direction,
            leverage: leverage.parse().unwrap(),
            entry_amount: entry_amount.parse().unwrap(),
            entry_price: entry_price.parse().unwrap(),
            current_price: current_price.map(|p| p.parse().unwrap()),
            status,
        }
    }

    #[test]
    fn test_admin_is_always_unlimited() {
        let now = Utc::now();
        // Everything else on the record argues against entitlement.
        let u = user(
            true,
            false,
            PlanTier::Free,
            Some(now - Duration::days(100)),
            "0",
        );
        let e = resolve_entitlement(&u, now);
        assert_eq!(e.effective_tier, PlanTier::InfinityPro);
        assert_eq!(e.limits, QuotaSet::unlimited());
        assert!(!e.has_temporary_credit_access);
    }

    #[test]
    fn test_expired_subscription_without_credit_is_free() {
        let now = Utc::now();
        let u = user(
            false,
            true,
            PlanTier::Pro,
            Some(now - Duration::days(1)),
            "9",
        );
        let e = resolve_entitlement(&u, now);
        assert_eq!(e.effective_tier, PlanTier::Free);
        assert_eq!(e.limits, QuotaSet::nominal(PlanTier::Free));
        assert!(!e.has_temporary_credit_access);
    }

    #[test]
    fn test_credit_threshold_at_ten() {
        let now = Utc::now();
        let below = resolve_entitlement(&user(false, false, PlanTier::Free, None, "9.99"), now);
        assert!(!below.has_temporary_credit_access);
        assert_eq!(below.effective_tier, PlanTier::Free);

        let at = resolve_entitlement(&user(false, false, PlanTier::Free, None, "10"), now);
        assert!(at.has_temporary_credit_access);
        assert_eq!(at.limits, QuotaSet::capped(1));
    }

    #[test]
    fn test_additive_bonus_on_finite_plan() {
        let now = Utc::now();
        let u = user(false, true, PlanTier::Pro, Some(now + Duration::days(10)), "25");
        let e = resolve_entitlement(&u, now);
        assert_eq!(e.effective_tier, PlanTier::Pro);
        assert_eq!(e.limits.total_positions, Limit::Finite(102));
        assert_eq!(e.limits.concurrent_positions, Limit::Finite(22));
        assert_eq!(e.limits.ai_generations, Limit::Finite(32));
        assert!(e.has_temporary_credit_access);
    }

    #[test]
    fn test_floor_applied_before_addition() {
        let now = Utc::now();
        let u = user(false, true, PlanTier::Pro, None, "19.99");
        let e = resolve_entitlement(&u, now);
        // floor(19.99 / 10) = 1, never 2
        assert_eq!(e.limits.total_positions, Limit::Finite(101));
        assert_eq!(e.limits.concurrent_positions, Limit::Finite(21));
        assert_eq!(e.limits.ai_generations, Limit::Finite(31));
    }

    #[test]
    fn test_unlimited_plan_unaffected_by_credit() {
        let now = Utc::now();
        let u = user(false, true, PlanTier::InfinityPro, None, "1000");
        let e = resolve_entitlement(&u, now);
        assert_eq!(e.effective_tier, PlanTier::InfinityPro);
        assert_eq!(e.limits, QuotaSet::unlimited());
        assert!(!e.has_temporary_credit_access);
    }

    #[test]
    fn test_dynamic_cap_for_credit_only_user() {
        let now = Utc::now();
        let u = user(false, false, PlanTier::Free, None, "47");
        let e = resolve_entitlement(&u, now);
        // Display tier only; every limit is floor(47 / 10) = 4.
        assert_eq!(e.effective_tier, PlanTier::InfinityPro);
        assert_eq!(e.limits.total_positions, Limit::Finite(4));
        assert_eq!(e.limits.concurrent_positions, Limit::Finite(4));
        assert_eq!(e.limits.ai_generations, Limit::Finite(4));
        assert!(e.has_temporary_credit_access);
    }

    #[test]
    fn test_plain_pro_gets_nominal_table() {
        let now = Utc::now();
        let u = user(false, true, PlanTier::ProPlus, Some(now + Duration::days(30)), "5");
        let e = resolve_entitlement(&u, now);
        assert_eq!(e.effective_tier, PlanTier::ProPlus);
        assert_eq!(e.limits.total_positions, Limit::Finite(300));
        assert_eq!(e.limits.concurrent_positions, Limit::Finite(50));
        assert_eq!(e.limits.ai_generations, Limit::Finite(100));
        assert!(!e.has_temporary_credit_access);
    }

    #[test]
    fn test_negative_credit_treated_as_zero() {
        let now = Utc::now();
        assert_eq!(credit_bonus("-50".parse().unwrap()), 0);
        let e = resolve_entitlement(&user(false, false, PlanTier::Free, None, "-50"), now);
        assert_eq!(e.effective_tier, PlanTier::Free);
        assert!(!e.has_temporary_credit_access);
    }

    #[test]
    fn test_credit_bonus_floor() {
        assert_eq!(credit_bonus("0".parse().unwrap()), 0);
        assert_eq!(credit_bonus("9.99".parse().unwrap()), 0);
        assert_eq!(credit_bonus("10".parse().unwrap()), 1);
        assert_eq!(credit_bonus("47".parse().unwrap()), 4);
        assert_eq!(credit_bonus("100.5".parse().unwrap()), 10);
    }

    #[test]
    fn test_unknown_tier_string_falls_back_to_free() {
        let raw = r#"{"isProSubscriptionActive": true, "proPlanTier": "mega_ultra"}"#;
        let u: UserRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(u.pro_plan_tier, PlanTier::Free);
        let e = resolve_entitlement(&u, Utc::now());
        assert_eq!(e.limits, QuotaSet::nominal(PlanTier::Free));
    }

    #[test]
    fn test_sparse_user_json_resolves_conservatively() {
        let u: UserRecord = serde_json::from_str("{}").unwrap();
        let e = resolve_entitlement(&u, Utc::now());
        assert_eq!(e.effective_tier, PlanTier::Free);
        assert_eq!(e.limits, QuotaSet::nominal(PlanTier::Free));
        assert!(!e.has_temporary_credit_access);
    }

    #[test]
    fn test_limit_sentinel_serde() {
        assert_eq!(serde_json::to_value(Limit::Unlimited).unwrap(), serde_json::json!(-1));
        assert_eq!(serde_json::to_value(Limit::Finite(7)).unwrap(), serde_json::json!(7));
        assert_eq!(serde_json::from_value::<Limit>(serde_json::json!(-1)).unwrap(), Limit::Unlimited);
        assert_eq!(serde_json::from_value::<Limit>(serde_json::json!(-5)).unwrap(), Limit::Unlimited);
        assert_eq!(serde_json::from_value::<Limit>(serde_json::json!(7)).unwrap(), Limit::Finite(7));
    }

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(classify(7, Limit::Finite(10)), UsageLevel::Ok);
        // exactly 0.8 * limit is already a warning
        assert_eq!(classify(8, Limit::Finite(10)), UsageLevel::Warning);
        assert_eq!(classify(4, Limit::Finite(5)), UsageLevel::Warning);
        assert_eq!(classify(9, Limit::Finite(10)), UsageLevel::Warning);
        assert_eq!(classify(10, Limit::Finite(10)), UsageLevel::Exceeded);
        assert_eq!(classify(11, Limit::Finite(10)), UsageLevel::Exceeded);
        assert_eq!(classify(1_000_000, Limit::Unlimited), UsageLevel::Ok);
    }

    #[test]
    fn test_ratio_undefined_for_unlimited() {
        assert_eq!(QuotaStatus::new(5, Limit::Unlimited).ratio(), None);
        assert_eq!(QuotaStatus::new(5, Limit::Finite(10)).ratio(), Some(0.5));
    }

    #[test]
    fn test_expiry_countdown_buckets() {
        let now = Utc::now();
        assert_eq!(ExpiryCountdown::from_expiry(None, now), ExpiryCountdown::NoExpiry);
        assert_eq!(
            ExpiryCountdown::from_expiry(Some(now - Duration::hours(1)), now),
            ExpiryCountdown::Expired
        );
        assert_eq!(
            ExpiryCountdown::from_expiry(Some(now + Duration::hours(5)), now),
            ExpiryCountdown::Today
        );
        assert_eq!(
            ExpiryCountdown::from_expiry(Some(now + Duration::hours(36)), now),
            ExpiryCountdown::Days(1)
        );
        assert_eq!(
            ExpiryCountdown::from_expiry(Some(now + Duration::days(29) + Duration::hours(1)), now),
            ExpiryCountdown::Days(29)
        );
        assert_eq!(
            ExpiryCountdown::from_expiry(Some(now + Duration::days(30) + Duration::hours(1)), now),
            ExpiryCountdown::Months(1)
        );
        assert_eq!(
            ExpiryCountdown::from_expiry(Some(now + Duration::days(65)), now),
            ExpiryCountdown::Months(2)
        );
        assert_eq!(ExpiryCountdown::Days(1).label(), "1 day");
        assert_eq!(ExpiryCountdown::Months(2).label(), "2 months");
    }

    #[test]
    fn test_pnl_buy_round_trip() {
        let positions = vec![position(
            "p1",
            Direction::Buy,
            "100",
            "50",
            "2",
            None,
            PositionStatus::Active,
        )];
        let mut prices = HashMap::new();
        prices.insert("BTC/USDT".to_string(), "110".parse::<Decimal>().unwrap());

        let result = aggregate_pnl(&positions, &prices);
        let p1 = &result.per_position["p1"];
        assert!((p1.percent - 10.0).abs() < 1e-9);
        assert!((p1.usd - 10.0).abs() < 1e-9);
        assert!((result.total_unrealized_usd - 10.0).abs() < 1e-9);
        assert_eq!(result.position_count, 1);
    }

    #[test]
    fn test_pnl_sell_direction_inverts_spread() {
        let positions = vec![position(
            "s1",
            Direction::Sell,
            "100",
            "100",
            "1",
            Some("90"),
            PositionStatus::Active,
        )];
        let prices: HashMap<String, Decimal> = HashMap::new();

        let result = aggregate_pnl(&positions, &prices);
        let s1 = &result.per_position["s1"];
        assert!((s1.percent - 10.0).abs() < 1e-9);
        assert!((s1.usd - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_entry_price_excluded_from_sum_and_count() {
        let positions = vec![
            position("ok", Direction::Buy, "100", "50", "2", Some("110"), PositionStatus::Active),
            position("broken", Direction::Buy, "0", "50", "2", Some("110"), PositionStatus::Active),
        ];
        let prices: HashMap<String, Decimal> = HashMap::new();

        let result = aggregate_pnl(&positions, &prices);
        assert_eq!(result.position_count, 1);
        assert!(!result.per_position.contains_key("broken"));
        assert!((result.total_unrealized_usd - 10.0).abs() < 1e-9);
        assert!((result.average_percent - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_price_fallback_chain_never_nan() {
        // No feed coverage: last-known price is used.
        let with_last_known = vec![position(
            "p1",
            Direction::Buy,
            "100",
            "50",
            "1",
            Some("105"),
            PositionStatus::Active,
        )];
        let prices: HashMap<String, Decimal> = HashMap::new();
        let result = aggregate_pnl(&with_last_known, &prices);
        assert!((result.per_position["p1"].percent - 5.0).abs() < 1e-9);

        // No feed and no last-known price: flat, not an error.
        let bare = vec![position(
            "p2",
            Direction::Buy,
            "100",
            "50",
            "1",
            None,
            PositionStatus::Active,
        )];
        let result = aggregate_pnl(&bare, &prices);
        assert_eq!(result.per_position["p2"].percent, 0.0);
        assert_eq!(result.per_position["p2"].usd, 0.0);
        assert!(!result.average_percent.is_nan());
    }

    #[test]
    fn test_average_is_unweighted() {
        let positions = vec![
            // +10% on a large position
            position("big", Direction::Buy, "100", "1000", "1", Some("110"), PositionStatus::Active),
            // -10% on a small one
            position("small", Direction::Buy, "100", "10", "1", Some("90"), PositionStatus::Active),
        ];
        let prices: HashMap<String, Decimal> = HashMap::new();

        let result = aggregate_pnl(&positions, &prices);
        assert!((result.average_percent - 0.0).abs() < 1e-9);
        assert!((result.total_unrealized_usd - 99.0).abs() < 1e-9);
    }

    #[test]
    fn test_closed_positions_skipped() {
        let positions = vec![
            position("open", Direction::Buy, "100", "50", "1", Some("110"), PositionStatus::Active),
            position("tp", Direction::Buy, "100", "50", "1", Some("110"), PositionStatus::TakeProfitHit),
            position("sl", Direction::Buy, "100", "50", "1", Some("110"), PositionStatus::StopLossHit),
            position("closed", Direction::Buy, "100", "50", "1", Some("110"), PositionStatus::Closed),
        ];
        let prices: HashMap<String, Decimal> = HashMap::new();

        let result = aggregate_pnl(&positions, &prices);
        assert_eq!(result.position_count, 1);
        assert!(result.per_position.contains_key("open"));
    }

    #[test]
    fn test_admin_with_empty_portfolio() {
        let now = Utc::now();
        let e = resolve_entitlement(&user(true, false, PlanTier::Free, None, "0"), now);
        assert_eq!(e.limits, QuotaSet::unlimited());

        let prices: HashMap<String, Decimal> = HashMap::new();
        let result = aggregate_pnl(&[], &prices);
        assert_eq!(result.total_unrealized_usd, 0.0);
        assert_eq!(result.average_percent, 0.0);
        assert!(result.per_position.is_empty());
    }
}
