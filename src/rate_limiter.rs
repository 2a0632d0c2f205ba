/*!
 * # Rate Limiting Module
 *
 * Fixed-window request counting applied as middleware:
 *
 * - Global per-client limits
 * - Path-prefix overrides configured as `prefix:limit:window_secs` entries
 * - Standard `X-RateLimit-*` headers and `Retry-After` on rejection
 *
 * The counters live in process memory; the guard protects against noisy
 * clients, not against correctness problems.
 */

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use metrics::counter;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::auth::AuthUser;

/// Numeric strings are always valid header values
fn num_to_header_value<T: ToString>(n: T) -> HeaderValue {
    HeaderValue::from_str(&n.to_string()).unwrap_or_else(|_| HeaderValue::from_static("0"))
}

#[derive(Debug, Clone)]
struct RateLimitEntry {
    count: u32,
    window_start: Instant,
}

impl RateLimitEntry {
    fn new() -> Self {
        Self {
            count: 1,
            window_start: Instant::now(),
        }
    }

    /// Counts this request against the window, resetting an expired window.
    /// Returns the request count inside the current window.
    fn register(&mut self, window_duration: Duration) -> u32 {
        let now = Instant::now();
        if now.duration_since(self.window_start) >= window_duration {
            self.count = 1;
            self.window_start = now;
        } else {
            self.count += 1;
        }
        self.count
    }

    fn seconds_until_reset(&self, window_duration: Duration) -> u64 {
        window_duration
            .saturating_sub(Instant::now().duration_since(self.window_start))
            .as_secs()
    }
}

/// Per-path-prefix limit override
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPolicy {
    pub prefix: String,
    pub limit: u32,
    pub window: Duration,
}

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_window: u32,
    pub window_duration: Duration,
    pub enable_headers: bool,
    pub path_policies: Vec<PathPolicy>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_window: 100,
            window_duration: Duration::from_secs(60),
            enable_headers: true,
            path_policies: Vec::new(),
        }
    }
}

/// Parses `prefix:limit:window_secs` entries separated by commas.
/// Invalid entries are skipped and reported in the returned warnings.
pub fn parse_path_policies(raw: Option<&str>) -> (Vec<PathPolicy>, Vec<String>) {
    let mut policies = Vec::new();
    let mut warnings = Vec::new();

    let Some(raw) = raw else {
        return (policies, warnings);
    };

    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        // The prefix itself contains ':' only in malformed input; split from the right
        let mut parts = entry.rsplitn(3, ':');
        let window = parts.next().and_then(|v| v.parse::<u64>().ok());
        let limit = parts.next().and_then(|v| v.parse::<u32>().ok());
        let prefix = parts.next();

        match (prefix, limit, window) {
            (Some(prefix), Some(limit), Some(window)) if !prefix.is_empty() && limit > 0 && window > 0 => {
                policies.push(PathPolicy {
                    prefix: prefix.to_string(),
                    limit,
                    window: Duration::from_secs(window),
                });
            }
            _ => warnings.push(format!(
                "ignoring malformed rate limit policy entry '{}', expected prefix:limit:window_secs",
                entry
            )),
        }
    }

    (policies, warnings)
}

/// In-memory fixed-window rate limiter
pub struct RateLimiter {
    config: RateLimitConfig,
    entries: DashMap<String, RateLimitEntry>,
}

/// What the limiter decided for one request
#[derive(Debug, Clone, Copy)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_secs: u64,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            entries: DashMap::new(),
        }
    }

    /// The limit/window pair that applies to a request path
    fn policy_for(&self, path: &str) -> (u32, Duration) {
        // Longest matching prefix wins
        self.config
            .path_policies
            .iter()
            .filter(|p| path.starts_with(&p.prefix))
            .max_by_key(|p| p.prefix.len())
            .map(|p| (p.limit, p.window))
            .unwrap_or((self.config.requests_per_window, self.config.window_duration))
    }

    /// Registers a request and decides whether it may proceed
    pub fn check(&self, key: &str, path: &str) -> RateLimitDecision {
        let (limit, window) = self.policy_for(path);

        let (count, reset_secs) = match self.entries.entry(key.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                let count = entry.register(window);
                (count, entry.seconds_until_reset(window))
            }
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                let entry = vacant.insert(RateLimitEntry::new());
                (1, entry.seconds_until_reset(window))
            }
        };

        RateLimitDecision {
            allowed: count <= limit,
            limit,
            remaining: limit.saturating_sub(count),
            reset_secs,
        }
    }

    /// Drops entries whose window expired long ago
    pub fn cleanup(&self) {
        let horizon = self.config.window_duration * 2;
        self.entries
            .retain(|_, entry| entry.window_start.elapsed() < horizon);
    }
}

/// Background task that periodically trims stale counters
pub async fn cleanup_rate_limits(limiter: Arc<RateLimiter>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        limiter.cleanup();
    }
}

/// Picks the rate-limit key for a request: the authenticated user when
/// present, else the forwarded client address, else a shared bucket.
fn client_key(request: &Request) -> String {
    if let Some(user) = request.extensions().get::<AuthUser>() {
        return format!("user:{}", user.user_id);
    }

    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| format!("ip:{}", ip.trim()))
        .unwrap_or_else(|| "anon".to_string())
}

/// Rate limiting middleware
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let key = client_key(&request);
    let decision = limiter.check(&key, &path);

    if !decision.allowed {
        counter!("comercio_http.rate_limited", 1);
        warn!(%key, %path, "rate limit exceeded");

        let body = Json(crate::errors::ErrorResponse {
            success: false,
            error: "Too Many Requests".to_string(),
            message: "Rate limit exceeded".to_string(),
            request_id: crate::middleware_helpers::request_id::current_request_id()
                .map(|rid| rid.as_str().to_string()),
            timestamp: chrono::Utc::now().to_rfc3339(),
        });

        let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, num_to_header_value(decision.reset_secs));
        attach_rate_limit_headers(&mut response, &decision, limiter.config.enable_headers);
        return response;
    }

    debug!(%key, %path, remaining = decision.remaining, "request allowed");
    let mut response = next.run(request).await;
    attach_rate_limit_headers(&mut response, &decision, limiter.config.enable_headers);
    response
}

fn attach_rate_limit_headers(response: &mut Response, decision: &RateLimitDecision, enabled: bool) {
    if !enabled {
        return;
    }
    let headers = response.headers_mut();
    headers.insert("x-ratelimit-limit", num_to_header_value(decision.limit));
    headers.insert(
        "x-ratelimit-remaining",
        num_to_header_value(decision.remaining),
    );
    headers.insert("x-ratelimit-reset", num_to_header_value(decision.reset_secs));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(limit: u32, window_secs: u64, policies: Vec<PathPolicy>) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            requests_per_window: limit,
            window_duration: Duration::from_secs(window_secs),
            enable_headers: true,
            path_policies: policies,
        })
    }

    #[test]
    fn requests_within_limit_are_allowed() {
        let limiter = limiter(3, 60, vec![]);
        for _ in 0..3 {
            assert!(limiter.check("ip:10.0.0.1", "/api/products").allowed);
        }
        let decision = limiter.check("ip:10.0.0.1", "/api/products");
        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
    }

    #[test]
    fn keys_are_isolated() {
        let limiter = limiter(1, 60, vec![]);
        assert!(limiter.check("ip:10.0.0.1", "/").allowed);
        assert!(limiter.check("ip:10.0.0.2", "/").allowed);
        assert!(!limiter.check("ip:10.0.0.1", "/").allowed);
    }

    #[test]
    fn path_policy_overrides_global_limit() {
        let limiter = limiter(
            100,
            60,
            vec![PathPolicy {
                prefix: "/api/auth".to_string(),
                limit: 1,
                window: Duration::from_secs(60),
            }],
        );
        assert!(limiter.check("ip:1.1.1.1", "/api/auth/login").allowed);
        assert!(!limiter.check("ip:1.1.1.1", "/api/auth/login").allowed);
        // Other paths still use the global limit
        assert!(limiter.check("ip:1.1.1.1", "/api/products").allowed);
    }

    #[test]
    fn longest_prefix_wins() {
        let limiter = limiter(
            100,
            60,
            vec![
                PathPolicy {
                    prefix: "/api".to_string(),
                    limit: 50,
                    window: Duration::from_secs(60),
                },
                PathPolicy {
                    prefix: "/api/inventory".to_string(),
                    limit: 7,
                    window: Duration::from_secs(30),
                },
            ],
        );
        let decision = limiter.check("ip:1.1.1.1", "/api/inventory/stock");
        assert_eq!(decision.limit, 7);
    }

    #[test]
    fn parse_policies_skips_malformed_entries() {
        let (policies, warnings) =
            parse_path_policies(Some("/api/auth:20:60, bogus, /api/inventory:0:60"));
        assert_eq!(
            policies,
            vec![PathPolicy {
                prefix: "/api/auth".to_string(),
                limit: 20,
                window: Duration::from_secs(60),
            }]
        );
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn parse_policies_accepts_none() {
        let (policies, warnings) = parse_path_policies(None);
        assert!(policies.is_empty());
        assert!(warnings.is_empty());
    }
}
