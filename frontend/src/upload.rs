//! 图片上传流程
//!
//! 文件 -> 校验 -> multipart 上传 -> 托管 URL。所有带图片字段的表单共用。
//! 每次调用要么返回 URL，要么记录一条错误；`in_flight` 只在网络阶段为真。

use std::rc::Rc;

use leptos::prelude::{ArcRwSignal, Update, WithUntracked};

use crate::api::ChurchHubApi;
use crate::config::AppConfig;
use crate::error::{AdminError, AdminErrorKind, AdminResult, ErrorOrigin};
use crate::web::http::{HttpClient, UploadFile};

// =========================================================
// 常量定义
// =========================================================
const UPLOAD_SUCCESS: &str = "Image uploaded successfully!";
const UPLOAD_FAILED: &str = "Failed to upload image";
const UPLOAD_NETWORK_ERROR: &str = "Network error while uploading image. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    /// MIME 前缀白名单
    pub accepted_prefixes: Vec<String>,
    pub max_bytes: u64,
    /// 成功提示的显示时长
    pub success_ttl_ms: u32,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl UploadPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            accepted_prefixes: vec!["image/".to_string()],
            max_bytes: config.max_upload_bytes,
            success_ttl_ms: config.notice_ttl_ms,
        }
    }

    fn limit_label(&self) -> String {
        let mb = self.max_bytes / (1024 * 1024);
        if mb > 0 && mb * 1024 * 1024 == self.max_bytes {
            format!("{mb}MB")
        } else {
            format!("{} bytes", self.max_bytes)
        }
    }

    /// 同步校验，先查类型再查大小
    pub fn check(&self, file: &UploadFile) -> AdminResult<()> {
        let accepted = self
            .accepted_prefixes
            .iter()
            .any(|prefix| file.media_type.starts_with(prefix.as_str()));
        if !accepted {
            return Err(AdminError::invalid_file_type());
        }
        if file.size > self.max_bytes {
            return Err(AdminError::file_too_large(&self.limit_label()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadState {
    pub in_flight: bool,
    pub last_error: Option<String>,
    pub last_success: Option<String>,
    /// 每次记录成功提示时递增，用于过期判断
    pub success_seq: u64,
}

pub struct ImageUploader<C> {
    api: Rc<ChurchHubApi<C>>,
    policy: UploadPolicy,
    state: ArcRwSignal<UploadState>,
}

impl<C: HttpClient> ImageUploader<C> {
    pub fn new(api: Rc<ChurchHubApi<C>>, policy: UploadPolicy) -> Self {
        Self {
            api,
            policy,
            state: ArcRwSignal::new(UploadState::default()),
        }
    }

    pub fn state(&self) -> &ArcRwSignal<UploadState> {
        &self.state
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// 上传文件并返回托管 URL
    ///
    /// 允许在上一次未完成时再次调用，不排队也不取消。
    pub async fn upload(&self, token: Option<&str>, file: UploadFile) -> AdminResult<String> {
        self.state.update(|s| {
            s.last_error = None;
            s.last_success = None;
        });

        if let Err(e) = self.policy.check(&file) {
            log_warn!("[Upload] Rejected {}: {}", file.name, e);
            self.state.update(|s| s.last_error = Some(e.message.clone()));
            return Err(e.in_op_with("upload.check", file.name));
        }

        let name = file.name.clone();
        self.state.update(|s| s.in_flight = true);
        let result = self.api.upload_image(file, token).await.and_then(|resp| {
            resp.into_url()
                .ok_or_else(|| AdminError::decode("upload response is missing url"))
        });

        match result {
            Ok(url) => {
                log_info!("[Upload] {} -> {}", name, url);
                self.state.update(|s| {
                    s.in_flight = false;
                    s.last_error = None;
                    s.last_success = Some(UPLOAD_SUCCESS.to_string());
                    s.success_seq += 1;
                });
                Ok(url)
            }
            Err(e) => {
                let message = match (e.kind, e.origin) {
                    (AdminErrorKind::Network, _) => UPLOAD_NETWORK_ERROR.to_string(),
                    (_, ErrorOrigin::Server) => e.message.clone(),
                    _ => UPLOAD_FAILED.to_string(),
                };
                log_error!("[Upload] {} failed: {}", name, e);
                self.state.update(|s| {
                    s.in_flight = false;
                    s.last_error = Some(message);
                });
                Err(e.in_op_with("upload.send", name))
            }
        }
    }

    /// 到期清除成功提示；期间又有新的成功提示时保留新的
    pub fn expire_success(&self, seq: u64) {
        let expired = self
            .state
            .with_untracked(|s| s.success_seq == seq && s.last_success.is_some());
        if expired {
            self.state.update(|s| s.last_success = None);
        }
    }

    /// 当前成功提示的序号（调度过期用）
    pub fn success_seq(&self) -> u64 {
        self.state.with_untracked(|s| s.success_seq)
    }
}

// =========================================================
// 测试模块
// =========================================================

#[cfg(test)]
mod tests;
