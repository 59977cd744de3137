//! 提示过期
//!
//! 核心状态本身就是信号；这里为各类成功提示挂上过期定时器。
//! 定时器归属当前组件，组件卸载时随 Effect 一起释放。

use std::rc::Rc;

use leptos::prelude::*;

use crate::resource::{Listing, ResourceScreen};
use crate::upload::ImageUploader;
use crate::web::http::HttpClient;
use crate::web::timer::Expiry;

/// 资源页面的提示在 `ttl_ms` 后自动清除
pub fn expire_notices<K, C>(screen: &Rc<ResourceScreen<K, C>>, ttl_ms: u32)
where
    K: Listing + 'static,
    C: HttpClient + 'static,
{
    let weak = Rc::downgrade(screen);
    let state = screen.state().clone();
    let expiry = Expiry::new();
    Effect::new(move |last: Option<u64>| {
        let (shown, seq) = state.with(|s| (s.notice.is_some(), s.notice_seq));
        if shown && last != Some(seq) {
            let weak = weak.clone();
            expiry.schedule(ttl_ms, move || {
                if let Some(screen) = weak.upgrade() {
                    screen.expire_notice(seq);
                }
            });
        }
        seq
    });
}

/// 上传成功提示在策略规定的时长后自动清除
pub fn expire_upload_success<C>(uploader: &Rc<ImageUploader<C>>)
where
    C: HttpClient + 'static,
{
    let weak = Rc::downgrade(uploader);
    let state = uploader.state().clone();
    let ttl_ms = uploader.policy().success_ttl_ms;
    let expiry = Expiry::new();
    Effect::new(move |last: Option<u64>| {
        let (shown, seq) = state.with(|s| (s.last_success.is_some(), s.success_seq));
        if shown && last != Some(seq) {
            let weak = weak.clone();
            expiry.schedule(ttl_ms, move || {
                if let Some(uploader) = weak.upgrade() {
                    uploader.expire_success(seq);
                }
            });
        }
        seq
    });
}

/// 页面级的一次性成功提示（资料页、教会资料页）
///
/// 新提示会取消旧提示尚未触发的清除定时器。
#[derive(Clone, Copy)]
pub struct Flash {
    message: RwSignal<Option<String>>,
    expiry: StoredValue<Expiry, LocalStorage>,
    ttl_ms: u32,
}

impl Flash {
    pub fn new(ttl_ms: u32) -> Self {
        Self {
            message: RwSignal::new(None),
            expiry: StoredValue::new_local(Expiry::new()),
            ttl_ms,
        }
    }

    pub fn message(&self) -> ReadSignal<Option<String>> {
        self.message.read_only()
    }

    pub fn show(&self, text: impl Into<String>) {
        let message = self.message;
        message.set(Some(text.into()));
        self.expiry.with_value(|expiry| {
            expiry.schedule(self.ttl_ms, move || {
                message.try_set(None);
            })
        });
    }
}
