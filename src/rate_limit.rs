/// Per-IP rate limiting for the authentication endpoints.
///
/// Fixed windows per endpoint class: signups are capped per hour, signins per
/// 15 minutes (successful signins are not counted against the window), and
/// sensitive password flows per hour. Single-node only; horizontal scaling of
/// the limiter is out of scope.
use std::{
    collections::HashMap,
    net::IpAddr,
    sync::Mutex,
    time::{Duration, Instant},
};

use crate::config::Config;
use crate::error::AuthError;

struct Window {
    count: u32,
    started: Instant,
}

struct Bucket {
    max: u32,
    window: Duration,
    windows: Mutex<HashMap<IpAddr, Window>>,
}

impl Bucket {
    fn new(max: u32, window: Duration) -> Self {
        Self {
            max,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    fn check(&self, ip: IpAddr) -> Result<(), AuthError> {
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        let entry = windows.entry(ip).or_insert(Window {
            count: 0,
            started: now,
        });

        if now.duration_since(entry.started) >= self.window {
            entry.count = 0;
            entry.started = now;
        }

        if entry.count < self.max {
            entry.count += 1;
            Ok(())
        } else {
            let elapsed = now.duration_since(entry.started);
            let retry_after = self.window.saturating_sub(elapsed).as_secs().max(1);
            Err(AuthError::RateLimited { retry_after })
        }
    }

    fn clear(&self, ip: IpAddr) {
        self.windows
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&ip);
    }

    fn prune(&self) {
        let now = Instant::now();
        let stale = self.window * 2;
        self.windows
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|_, w| now.duration_since(w.started) < stale);
    }
}

pub struct RateLimiter {
    signup: Bucket,
    signin: Bucket,
    sensitive: Bucket,
}

impl RateLimiter {
    pub fn new(config: &Config) -> Self {
        Self {
            signup: Bucket::new(config.signup_limit_per_hour, Duration::from_secs(3600)),
            signin: Bucket::new(
                config.signin_limit_per_window,
                Duration::from_secs(config.signin_window_secs),
            ),
            sensitive: Bucket::new(config.sensitive_limit_per_hour, Duration::from_secs(3600)),
        }
    }

    pub fn check_signup(&self, ip: IpAddr) -> Result<(), AuthError> {
        self.signup.check(ip)
    }

    pub fn check_signin(&self, ip: IpAddr) -> Result<(), AuthError> {
        self.signin.check(ip)
    }

    pub fn check_sensitive(&self, ip: IpAddr) -> Result<(), AuthError> {
        self.sensitive.check(ip)
    }

    /// Successful signins do not count against the window.
    pub fn record_signin_success(&self, ip: IpAddr) {
        self.signin.clear(ip);
    }

    /// Drop windows that have been idle long enough to be meaningless.
    pub fn prune(&self) {
        self.signup.prune();
        self.signin.prune();
        self.sensitive.prune();
    }
}
