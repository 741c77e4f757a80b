use crate::utils::error::Result;
use async_trait::async_trait;

/// 外部文字生成能力：給定模型與 prompt，回傳文字（可能為空）。
///
/// 回傳內容沒有任何結構保證，可能被 markdown code fence 包住，也可能不是 JSON。
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, model: &str, prompt: &str) -> Result<Option<String>>;
}
