//! Per-client fixed-window rate limiter
//!
//! Each client id (normally the client IP) owns one window. The first
//! request opens the window; requests are counted until `max_requests` is
//! reached; the window resets once more than `window_size_seconds` have
//! elapsed since it opened. A burst straddling a window boundary can
//! therefore pass up to `2 × max_requests` requests.
//!
//! `max_tracked_clients` is a sweep trigger, not a hard cap: once the map
//! holds that many windows, a new client triggers a purge of expired
//! windows, at most once per window length. Live windows are never evicted.

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::Mutex;
use tracing::debug;

use crate::config::RateLimitConfig;

/// 单个客户端的计数窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindow {
    pub count: u32,
    pub window_start: DateTime<Utc>,
}

pub struct RateLimiter {
    windows: DashMap<String, RateWindow>,
    max_requests: u32,
    window_size_seconds: u64,
    window: TimeDelta,
    max_tracked_clients: usize,
    /// 上一次清理的时间
    last_sweep: Mutex<Option<DateTime<Utc>>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window_size_seconds: u64, max_tracked_clients: usize) -> Self {
        let window = i64::try_from(window_size_seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);

        Self {
            windows: DashMap::new(),
            max_requests,
            window_size_seconds,
            window,
            max_tracked_clients,
            last_sweep: Mutex::new(None),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            config.max_requests,
            config.window_size_seconds,
            config.max_tracked_clients,
        )
    }

    /// 记录一次请求并返回是否放行；拒绝时不修改计数
    pub fn allow(&self, client_id: &str, now: DateTime<Utc>) -> bool {
        // len() 需要在拿到 entry 锁之前调用
        if self.windows.len() >= self.max_tracked_clients && !self.windows.contains_key(client_id)
        {
            self.maybe_sweep(now);
        }

        match self.windows.entry(client_id.to_string()) {
            Entry::Vacant(vacant) => {
                vacant.insert(RateWindow {
                    count: 1,
                    window_start: now,
                });
                true
            }
            Entry::Occupied(mut occupied) => {
                let window = occupied.get_mut();
                if now - window.window_start > self.window {
                    *window = RateWindow {
                        count: 1,
                        window_start: now,
                    };
                    true
                } else if window.count >= self.max_requests {
                    debug!(
                        "Rate limit exceeded for {}: {} requests since {}",
                        client_id, window.count, window.window_start
                    );
                    false
                } else {
                    window.count += 1;
                    true
                }
            }
        }
    }

    /// 每个窗口长度内最多清理一次；另一个线程正在清理时直接跳过
    fn maybe_sweep(&self, now: DateTime<Utc>) -> bool {
        let Some(mut last_sweep) = self.last_sweep.try_lock() else {
            return false;
        };
        if last_sweep.is_some_and(|last| now - last <= self.window) {
            return false;
        }
        *last_sweep = Some(now);
        drop(last_sweep);

        self.purge_expired(now);
        true
    }

    /// 清理已过期的窗口，返回清理的数量
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.windows.len();
        self.windows
            .retain(|_, window| now - window.window_start <= self.window);
        let purged = before.saturating_sub(self.windows.len());
        if purged > 0 {
            debug!("Purged {} expired rate-limit windows", purged);
        }
        purged
    }

    /// 供 `Retry-After` 使用
    pub fn window_size_seconds(&self) -> u64 {
        self.window_size_seconds
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }

    pub fn window_for(&self, client_id: &str) -> Option<RateWindow> {
        self.windows.get(client_id).map(|w| *w)
    }
}
