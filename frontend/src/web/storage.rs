//! 令牌持久化
//!
//! 浏览器中写入 LocalStorage（原样字符串，不做 JSON 编码，
//! 与其他读取同一键的页面保持兼容）。

use gloo_storage::Storage;

/// 单个令牌的存取接口
pub trait TokenStore {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

/// 基于 `gloo-storage` 的 LocalStorage 实现
#[derive(Debug, Clone)]
pub struct BrowserTokenStore {
    key: String,
}

impl BrowserTokenStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl TokenStore for BrowserTokenStore {
    fn load(&self) -> Option<String> {
        gloo_storage::LocalStorage::raw()
            .get_item(&self.key)
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())
    }

    fn save(&self, token: &str) {
        if gloo_storage::LocalStorage::raw()
            .set_item(&self.key, token)
            .is_err()
        {
            log_warn!("[Storage] Failed to persist token under {}", self.key);
        }
    }

    fn clear(&self) {
        gloo_storage::LocalStorage::delete(&self.key);
    }
}

// =========================================================
// 测试工具: MemoryTokenStore
// =========================================================

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: std::cell::RefCell<Option<String>>,
}

#[cfg(test)]
impl MemoryTokenStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: std::cell::RefCell::new(Some(token.to_string())),
        }
    }

    pub fn current(&self) -> Option<String> {
        self.token.borrow().clone()
    }
}

#[cfg(test)]
impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.current()
    }

    fn save(&self, token: &str) {
        *self.token.borrow_mut() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.borrow_mut() = None;
    }
}
