//! Throttle crate tests

use crate::application::config::{RateDecision, RatePolicy};
use crate::domain::entities::WindowCounter;
use crate::domain::repository::RateLimitStore;
use crate::domain::value_objects::RateKey;
use crate::infra::memory::MemoryRateLimitStore;
use std::sync::Arc;
use std::time::Duration;

fn tiny_policy(max_requests: u32) -> RatePolicy {
    RatePolicy {
        name: "test",
        max_requests,
        window: Duration::from_secs(60),
        per_user: false,
    }
}

mod policies {
    use super::*;

    #[test]
    fn test_named_policy_values() {
        let api = RatePolicy::api();
        assert_eq!(api.max_requests, 100);
        assert_eq!(api.window, Duration::from_secs(900));
        assert!(!api.per_user);

        let auth = RatePolicy::auth();
        assert_eq!(auth.max_requests, 5);
        assert_eq!(auth.window, Duration::from_secs(900));

        let upload = RatePolicy::upload();
        assert_eq!(upload.max_requests, 10);
        assert_eq!(upload.window, Duration::from_secs(3600));

        let nft_create = RatePolicy::nft_create();
        assert_eq!(nft_create.max_requests, 20);
        assert!(nft_create.per_user);

        let payment = RatePolicy::payment();
        assert_eq!(payment.max_requests, 5);
        assert!(payment.per_user);
    }

    #[test]
    fn test_decision_time_math_rounds_up() {
        let decision = RateDecision {
            allowed: false,
            limit: 5,
            remaining: 0,
            reset_at_ms: 10_500,
        };
        assert_eq!(decision.reset_at_secs(), 11);
        assert_eq!(decision.retry_after_secs(10_000), 1);
        assert_eq!(decision.retry_after_secs(8_200), 3);
        // Deadline already passed
        assert_eq!(decision.retry_after_secs(11_000), 0);
    }
}

mod rate_key {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, header};
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn test_ip_key_is_policy_namespaced() {
        let ip = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 9));
        assert_eq!(RateKey::from_ip("api", Some(ip)).as_str(), "api:203.0.113.9");
        assert_eq!(RateKey::from_ip("api", None).as_str(), "api:127.0.0.1");
    }

    #[test]
    fn test_user_policy_prefers_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer user-42"),
        );

        let key = RateKey::for_user_policy("payment", &headers, None);
        assert_eq!(key.as_str(), "payment:user:user-42");
    }

    #[test]
    fn test_user_policy_falls_back_to_ip() {
        let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let key = RateKey::for_user_policy("payment", &HeaderMap::new(), Some(ip));
        assert_eq!(key.as_str(), "payment:10.0.0.1");
    }
}

mod window_counter {
    use super::*;

    #[test]
    fn test_open_counts_the_first_request() {
        let counter = WindowCounter::open(1_000, 60_000);
        assert_eq!(counter.count, 1);
        assert_eq!(counter.reset_at_ms, 61_000);
    }

    #[test]
    fn test_staleness_at_the_deadline() {
        let counter = WindowCounter::open(1_000, 60_000);
        assert!(!counter.is_stale(60_999));
        assert!(counter.is_stale(61_000));
    }
}

mod memory_store {
    use super::*;

    #[tokio::test]
    async fn test_allows_up_to_the_limit_then_rejects() {
        let store = MemoryRateLimitStore::new();
        let policy = tiny_policy(3);
        let key = RateKey::from_ip("test", None);

        for expected_remaining in [2u32, 1, 0] {
            let decision = store.check_and_consume(&key, &policy, 1_000).await.unwrap();
            assert!(decision.allowed);
            assert_eq!(decision.remaining, expected_remaining);
        }

        let decision = store.check_and_consume(&key, &policy, 1_000).await.unwrap();
        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
        assert_eq!(decision.reset_at_ms, 61_000);
    }

    #[tokio::test]
    async fn test_window_resets_after_the_deadline() {
        let store = MemoryRateLimitStore::new();
        let policy = tiny_policy(1);
        let key = RateKey::from_ip("test", None);

        assert!(store.check_and_consume(&key, &policy, 1_000).await.unwrap().allowed);
        assert!(!store.check_and_consume(&key, &policy, 2_000).await.unwrap().allowed);

        // Past the deadline a fresh window opens at count 1
        let decision = store.check_and_consume(&key, &policy, 61_000).await.unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.reset_at_ms, 121_000);
    }

    #[tokio::test]
    async fn test_keys_consume_independent_budgets() {
        let store = MemoryRateLimitStore::new();
        let policy = tiny_policy(1);
        let key_a = RateKey::from_user("test", "alice");
        let key_b = RateKey::from_user("test", "bob");

        assert!(store.check_and_consume(&key_a, &policy, 1_000).await.unwrap().allowed);
        assert!(!store.check_and_consume(&key_a, &policy, 1_000).await.unwrap().allowed);
        assert!(store.check_and_consume(&key_b, &policy, 1_000).await.unwrap().allowed);
    }

    #[tokio::test]
    async fn test_purge_removes_only_stale_windows() {
        let store = MemoryRateLimitStore::new();
        let policy = tiny_policy(5);

        store
            .check_and_consume(&RateKey::from_ip("test", None), &policy, 1_000)
            .await
            .unwrap();
        store
            .check_and_consume(&RateKey::from_user("test", "alice"), &policy, 50_000)
            .await
            .unwrap();

        // First window (deadline 61s) is stale at 70s, second (110s) is not
        let purged = store.purge_expired(70_000).await.unwrap();
        assert_eq!(purged, 1);
        assert_eq!(store.len(), 1);
    }
}

mod guard {
    use super::*;
    use crate::presentation::guard::{
        LIMIT_HEADER, REMAINING_HEADER, RESET_HEADER, rate_limit_guard,
    };
    use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
    use platform::guard::{GuardContext, GuardDecision};
    use std::net::{IpAddr, Ipv4Addr};

    fn ctx(headers: HeaderMap, ip: Option<IpAddr>) -> GuardContext {
        GuardContext {
            method: Method::POST,
            path: "/api/test".to_string(),
            headers,
            client_ip: ip,
        }
    }

    #[tokio::test]
    async fn test_allowed_requests_carry_rate_headers() {
        let guard = rate_limit_guard(Arc::new(MemoryRateLimitStore::new()), tiny_policy(3));

        let decision = guard.check(ctx(HeaderMap::new(), None)).await;
        let GuardDecision::Continue(headers) = decision else {
            panic!("expected continue");
        };
        assert_eq!(headers.get(LIMIT_HEADER).unwrap(), "3");
        assert_eq!(headers.get(REMAINING_HEADER).unwrap(), "2");
        assert!(headers.contains_key(RESET_HEADER));
    }

    #[tokio::test]
    async fn test_exhausted_window_halts_with_429() {
        let guard = rate_limit_guard(Arc::new(MemoryRateLimitStore::new()), tiny_policy(1));

        assert!(matches!(
            guard.check(ctx(HeaderMap::new(), None)).await,
            GuardDecision::Continue(_)
        ));

        let GuardDecision::Halt(response) = guard.check(ctx(HeaderMap::new(), None)).await else {
            panic!("expected halt");
        };
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key(header::RETRY_AFTER));
        assert_eq!(response.headers().get(REMAINING_HEADER).unwrap(), "0");
    }

    #[tokio::test]
    async fn test_429_body_reports_the_wait() {
        let guard = rate_limit_guard(Arc::new(MemoryRateLimitStore::new()), tiny_policy(1));

        assert!(matches!(
            guard.check(ctx(HeaderMap::new(), None)).await,
            GuardDecision::Continue(_)
        ));
        let GuardDecision::Halt(response) = guard.check(ctx(HeaderMap::new(), None)).await else {
            panic!("expected halt");
        };

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Too many requests");
        assert!(body["retryAfter"].as_i64().unwrap() > 0);
        assert!(body["message"].as_str().unwrap().contains("seconds"));
    }

    #[tokio::test]
    async fn test_clients_are_limited_separately_by_ip() {
        let guard = rate_limit_guard(Arc::new(MemoryRateLimitStore::new()), tiny_policy(1));
        let ip_a = Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));
        let ip_b = Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)));

        assert!(matches!(
            guard.check(ctx(HeaderMap::new(), ip_a)).await,
            GuardDecision::Continue(_)
        ));
        assert!(matches!(
            guard.check(ctx(HeaderMap::new(), ip_a)).await,
            GuardDecision::Halt(_)
        ));
        assert!(matches!(
            guard.check(ctx(HeaderMap::new(), ip_b)).await,
            GuardDecision::Continue(_)
        ));
    }

    #[tokio::test]
    async fn test_per_user_policy_keys_on_bearer() {
        let policy = RatePolicy {
            per_user: true,
            ..tiny_policy(1)
        };
        let guard = rate_limit_guard(Arc::new(MemoryRateLimitStore::new()), policy);

        let mut alice = HeaderMap::new();
        alice.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer alice"));
        let mut bob = HeaderMap::new();
        bob.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer bob"));

        // Same IP, different users
        let ip = Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));
        assert!(matches!(
            guard.check(ctx(alice.clone(), ip)).await,
            GuardDecision::Continue(_)
        ));
        assert!(matches!(
            guard.check(ctx(alice, ip)).await,
            GuardDecision::Halt(_)
        ));
        assert!(matches!(
            guard.check(ctx(bob, ip)).await,
            GuardDecision::Continue(_)
        ));
    }
}
