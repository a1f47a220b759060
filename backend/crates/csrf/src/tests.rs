//! CSRF crate tests

use crate::application::config::CsrfConfig;
use crate::application::{IssueTokenUseCase, VerifyTokenUseCase};
use crate::domain::entities::CsrfToken;
use crate::domain::repository::CsrfTokenRepository;
use crate::domain::value_objects::SessionKey;
use crate::infra::kv::KvTokenRepository;
use platform::store::MemoryKvStore;
use std::sync::Arc;

fn test_repo() -> Arc<KvTokenRepository<MemoryKvStore>> {
    Arc::new(KvTokenRepository::new(MemoryKvStore::new()))
}

fn test_config() -> Arc<CsrfConfig> {
    Arc::new(CsrfConfig::development())
}

mod token_entity {
    use super::*;

    #[test]
    fn test_not_expired_before_deadline() {
        let token = CsrfToken::with_expiry("abc".to_string(), 1_000);
        assert!(!token.is_expired(999));
        assert!(!token.is_expired(1_000));
    }

    #[test]
    fn test_expired_after_deadline() {
        let token = CsrfToken::with_expiry("abc".to_string(), 1_000);
        assert!(token.is_expired(1_001));
    }

    #[test]
    fn test_new_expires_in_the_future() {
        let token = CsrfToken::new("abc".to_string(), 60_000);
        let now_ms = chrono::Utc::now().timestamp_millis();
        assert!(token.expires_at_ms > now_ms);
        assert!(token.expires_at_ms <= now_ms + 60_000);
    }

    #[test]
    fn test_matches() {
        let token = CsrfToken::with_expiry("secret-token".to_string(), 1_000);
        assert!(token.matches("secret-token"));
        assert!(!token.matches("secret-tokeN"));
        assert!(!token.matches("secret"));
        assert!(!token.matches(""));
    }
}

mod session_key {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, header};
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn test_cookie_takes_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("session-id=sess123; other=x"),
        );
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer tok456"),
        );

        let key = SessionKey::derive(&headers, None, "session-id");
        assert_eq!(key.as_str(), "sess123");
    }

    #[test]
    fn test_bearer_when_no_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer tok456"),
        );

        let key = SessionKey::derive(&headers, None, "session-id");
        assert_eq!(key.as_str(), "auth:tok456");
    }

    #[test]
    fn test_anonymous_fallback_uses_ip_and_user_agent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static("TestAgent/1.0"));

        let ip = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 9));
        let key = SessionKey::derive(&headers, Some(ip), "session-id");
        assert_eq!(key.as_str(), "anon:203.0.113.9:TestAgent/1.0");
    }

    #[test]
    fn test_anonymous_fallback_with_nothing_at_all() {
        let key = SessionKey::derive(&HeaderMap::new(), None, "session-id");
        assert_eq!(key.as_str(), "anon:127.0.0.1:");
    }

    #[test]
    fn test_same_credentials_derive_same_key() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("session-id=stable"),
        );

        let a = SessionKey::derive(&headers, None, "session-id");
        let b = SessionKey::derive(&headers, None, "session-id");
        assert_eq!(a, b);
    }
}

mod config {
    use super::*;
    use axum::http::Method;

    #[test]
    fn test_safe_methods_never_require_token() {
        let config = CsrfConfig::default();
        assert!(!config.requires_token(&Method::GET, "/api/profile"));
        assert!(!config.requires_token(&Method::HEAD, "/api/profile"));
        assert!(!config.requires_token(&Method::OPTIONS, "/api/profile"));
    }

    #[test]
    fn test_unsafe_methods_require_token() {
        let config = CsrfConfig::default();
        assert!(config.requires_token(&Method::POST, "/api/profile"));
        assert!(config.requires_token(&Method::PUT, "/api/profile"));
        assert!(config.requires_token(&Method::PATCH, "/api/profile"));
        assert!(config.requires_token(&Method::DELETE, "/api/profile"));
    }

    #[test]
    fn test_exempt_paths_are_prefix_matched() {
        let config = CsrfConfig::default();
        assert!(!config.requires_token(&Method::POST, "/api/upload"));
        assert!(!config.requires_token(&Method::POST, "/api/upload/avatar"));
        assert!(!config.requires_token(&Method::POST, "/api/nfts/123/transfer"));
        assert!(config.requires_token(&Method::POST, "/api/nft"));
    }

    #[test]
    fn test_strict_config_gates_bearer_endpoints() {
        let config = CsrfConfig::strict();
        assert!(config.requires_token(&Method::POST, "/api/upload"));
        assert!(config.requires_token(&Method::POST, "/api/nfts"));
        assert!(!config.requires_token(&Method::POST, "/api/health"));
        assert!(!config.requires_token(&Method::POST, "/api/webhooks/stripe"));
    }

    #[test]
    fn test_defaults() {
        let config = CsrfConfig::default();
        assert_eq!(config.token_length, 32);
        assert_eq!(config.ttl_ms(), 24 * 60 * 60 * 1000);
        assert_eq!(config.session_cookie_name, "session-id");
        assert_eq!(config.token_cookie_name, "csrf-token");
        assert_eq!(config.header_name, "x-csrf-token");
    }
}

mod use_cases {
    use super::*;

    #[tokio::test]
    async fn test_issue_then_verify() {
        let repo = test_repo();
        let config = test_config();
        let key = SessionKey::from_session_id("sess1");

        let issued = IssueTokenUseCase::new(repo.clone(), config)
            .execute(&key)
            .await
            .unwrap();
        assert_eq!(issued.token.len(), 32);

        let verified = VerifyTokenUseCase::new(repo)
            .execute(&key, &issued.token)
            .await
            .unwrap();
        assert!(verified);
    }

    #[tokio::test]
    async fn test_wrong_token_fails_verification() {
        let repo = test_repo();
        let config = test_config();
        let key = SessionKey::from_session_id("sess1");

        IssueTokenUseCase::new(repo.clone(), config)
            .execute(&key)
            .await
            .unwrap();

        let verified = VerifyTokenUseCase::new(repo)
            .execute(&key, "completely-wrong-token")
            .await
            .unwrap();
        assert!(!verified);
    }

    #[tokio::test]
    async fn test_unknown_session_key_fails_verification() {
        let repo = test_repo();

        let verified = VerifyTokenUseCase::new(repo)
            .execute(&SessionKey::from_session_id("never-issued"), "anything")
            .await
            .unwrap();
        assert!(!verified);
    }

    #[tokio::test]
    async fn test_reissue_rotates_the_token() {
        let repo = test_repo();
        let config = test_config();
        let key = SessionKey::from_session_id("sess1");
        let issue = IssueTokenUseCase::new(repo.clone(), config);

        let first = issue.execute(&key).await.unwrap();
        let second = issue.execute(&key).await.unwrap();
        assert_ne!(first.token, second.token);

        let verify = VerifyTokenUseCase::new(repo);
        assert!(!verify.execute(&key, &first.token).await.unwrap());
        assert!(verify.execute(&key, &second.token).await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_token_fails_verification() {
        let repo = test_repo();
        let key = SessionKey::from_session_id("sess1");

        let past = chrono::Utc::now().timestamp_millis() - 1_000;
        repo.save(&key, &CsrfToken::with_expiry("stale".to_string(), past))
            .await
            .unwrap();

        let verified = VerifyTokenUseCase::new(repo.clone())
            .execute(&key, "stale")
            .await
            .unwrap();
        assert!(!verified);

        // Expired entry was removed on lookup
        assert!(!repo.delete(&key).await.unwrap());
    }

    #[tokio::test]
    async fn test_session_keys_are_isolated() {
        let repo = test_repo();
        let config = test_config();
        let issue = IssueTokenUseCase::new(repo.clone(), config);

        let key_a = SessionKey::from_session_id("sess-a");
        let key_b = SessionKey::from_session_id("sess-b");
        let token_a = issue.execute(&key_a).await.unwrap();
        let token_b = issue.execute(&key_b).await.unwrap();

        let verify = VerifyTokenUseCase::new(repo);
        assert!(!verify.execute(&key_a, &token_b.token).await.unwrap());
        assert!(!verify.execute(&key_b, &token_a.token).await.unwrap());
    }
}

mod guard {
    use super::*;
    use crate::presentation::guard::csrf_guard;
    use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
    use platform::guard::{GuardContext, GuardDecision};

    fn ctx(method: Method, path: &str, headers: HeaderMap) -> GuardContext {
        GuardContext {
            method,
            path: path.to_string(),
            headers,
            client_ip: None,
        }
    }

    #[tokio::test]
    async fn test_get_requests_pass_without_token() {
        let guard = csrf_guard(test_repo(), test_config());

        let decision = guard
            .check(ctx(Method::GET, "/api/profile", HeaderMap::new()))
            .await;
        assert!(matches!(decision, GuardDecision::Continue(_)));
    }

    #[tokio::test]
    async fn test_exempt_path_passes_without_token() {
        let guard = csrf_guard(test_repo(), test_config());

        let decision = guard
            .check(ctx(Method::POST, "/api/upload", HeaderMap::new()))
            .await;
        assert!(matches!(decision, GuardDecision::Continue(_)));
    }

    #[tokio::test]
    async fn test_missing_token_halts_with_403() {
        let guard = csrf_guard(test_repo(), test_config());

        let decision = guard
            .check(ctx(Method::POST, "/api/profile", HeaderMap::new()))
            .await;
        let GuardDecision::Halt(response) = decision else {
            panic!("expected halt");
        };
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_invalid_token_halts_with_403() {
        let guard = csrf_guard(test_repo(), test_config());

        let mut headers = HeaderMap::new();
        headers.insert("x-csrf-token", HeaderValue::from_static("bogus"));

        let decision = guard.check(ctx(Method::POST, "/api/profile", headers)).await;
        let GuardDecision::Halt(response) = decision else {
            panic!("expected halt");
        };
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_valid_token_passes() {
        let repo = test_repo();
        let config = test_config();
        let guard = csrf_guard(repo.clone(), config.clone());

        let key = SessionKey::from_session_id("sess1");
        let issued = IssueTokenUseCase::new(repo, config)
            .execute(&key)
            .await
            .unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session-id=sess1"));
        headers.insert(
            "x-csrf-token",
            HeaderValue::from_str(&issued.token).unwrap(),
        );

        let decision = guard.check(ctx(Method::POST, "/api/profile", headers)).await;
        assert!(matches!(decision, GuardDecision::Continue(_)));
    }

    #[tokio::test]
    async fn test_token_from_other_session_halts() {
        let repo = test_repo();
        let config = test_config();
        let guard = csrf_guard(repo.clone(), config.clone());

        let issued = IssueTokenUseCase::new(repo, config)
            .execute(&SessionKey::from_session_id("victim"))
            .await
            .unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("session-id=attacker"),
        );
        headers.insert(
            "x-csrf-token",
            HeaderValue::from_str(&issued.token).unwrap(),
        );

        let decision = guard.check(ctx(Method::POST, "/api/profile", headers)).await;
        assert!(matches!(decision, GuardDecision::Halt(_)));
    }
}

mod router {
    use super::*;
    use crate::presentation::dto::CsrfTokenResponse;
    use crate::presentation::router::csrf_router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    async fn issue(
        app: axum::Router,
        cookie: Option<&str>,
    ) -> (axum::http::response::Parts, CsrfTokenResponse) {
        let mut builder = Request::builder().method("GET").uri("/");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let (parts, body) = response.into_parts();
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let parsed = serde_json::from_slice(&bytes).unwrap();
        (parts, parsed)
    }

    #[tokio::test]
    async fn test_issue_endpoint_returns_token_three_ways() {
        let app = csrf_router(test_repo(), test_config());
        let (parts, body) = issue(app, None).await;

        assert_eq!(parts.status, StatusCode::OK);
        assert_eq!(body.csrf_token.len(), 32);

        let set_cookies: Vec<&str> = parts
            .headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(set_cookies.len(), 2);
        assert!(set_cookies.iter().any(|c| c.starts_with("session-id=")
            && c.contains("HttpOnly")));
        assert!(set_cookies
            .iter()
            .any(|c| c.starts_with(&format!("csrf-token={}", body.csrf_token))
                && !c.contains("HttpOnly")));

        let header_token = parts.headers.get("x-csrf-token").unwrap();
        assert_eq!(header_token.to_str().unwrap(), body.csrf_token);
    }

    #[tokio::test]
    async fn test_issue_reuses_existing_session_cookie() {
        let app = csrf_router(test_repo(), test_config());
        let (parts, _) = issue(app, Some("session-id=existing-session")).await;

        let session_cookie = parts
            .headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap())
            .find(|c| c.starts_with("session-id="))
            .unwrap();
        assert!(session_cookie.starts_with("session-id=existing-session;"));
    }

    #[tokio::test]
    async fn test_issued_token_verifies_for_the_session() {
        let repo = test_repo();
        let app = csrf_router(repo.clone(), test_config());
        let (_, body) = issue(app, Some("session-id=sess1")).await;

        let verified = VerifyTokenUseCase::new(repo)
            .execute(&SessionKey::from_session_id("sess1"), &body.csrf_token)
            .await
            .unwrap();
        assert!(verified);
    }

    #[tokio::test]
    async fn test_secure_flag_follows_config() {
        let app = csrf_router(test_repo(), Arc::new(CsrfConfig::default()));
        let (parts, _) = issue(app, None).await;

        for cookie in parts.headers.get_all(header::SET_COOKIE) {
            assert!(cookie.to_str().unwrap().contains("Secure"));
        }
    }
}
