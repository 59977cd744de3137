//! 一次性定时器封装
//!
//! 基于 `gloo-timers` 的 `Timeout`。重新调度会取消上一次尚未触发的回调，
//! drop 时同样自动取消。

use std::cell::RefCell;

use gloo_timers::callback::Timeout;

#[derive(Default)]
pub struct Expiry {
    pending: RefCell<Option<Timeout>>,
}

impl Expiry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `millis` 毫秒后执行 `callback`
    pub fn schedule<F>(&self, millis: u32, callback: F)
    where
        F: FnOnce() + 'static,
    {
        let previous = self.pending.replace(Some(Timeout::new(millis, callback)));
        if let Some(timeout) = previous {
            timeout.cancel();
        }
    }
}
