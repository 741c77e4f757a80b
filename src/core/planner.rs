use crate::config::AppConfig;
use crate::core::prompt::build_plan_prompt;
use crate::core::schema::{validate_plan_request, validate_plan_response};
use crate::domain::model::{PlanRequest, PlanResponse};
use crate::domain::ports::TextGenerator;
use crate::domain::services::{GroupComposition, PlanCostSummary};
use crate::utils::error::{ErrorCategory, PlannerError, Result, MISSING_API_KEY_MESSAGE};
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, LazyLock};

static FENCE_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*```(?:json)?[ \t]*(?:\r?\n)?").expect("fence opener pattern is valid")
});
static FENCE_CLOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\r?\n)?```\s*$").expect("fence closer pattern is valid")
});

/// 移除包住整段回覆的 markdown code fence (```json ... ```) 並去除前後空白。
///
/// 只處理開頭與結尾的 fence，字串內容裡的反引號保持原樣；
/// 對沒有 fence 的輸入只做 trim，因此重複套用結果不變。
pub fn strip_code_fences(text: &str) -> String {
    let opened = FENCE_OPEN.replace(text, "");
    FENCE_CLOSE.replace(&opened, "").trim().to_string()
}

/// 處理一次規劃請求：驗證 → 組 prompt → 呼叫模型 → 清理 → 驗證 → 正規化。
///
/// 沒有共享的可變狀態，可以被多個請求同時使用。
pub struct PlanHandler {
    config: AppConfig,
    generator: Arc<dyn TextGenerator>,
}

impl PlanHandler {
    pub fn new(config: AppConfig, generator: Arc<dyn TextGenerator>) -> Self {
        Self { config, generator }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub async fn generate_plan(&self, payload: &Value) -> Result<PlanResponse> {
        match self.run(payload).await {
            Ok(plan) => Ok(plan),
            Err(e) => {
                match e.category() {
                    ErrorCategory::Client => {
                        tracing::warn!("❌ Rejected plan request: {}", e);
                    }
                    category => {
                        tracing::error!(
                            "❌ Error generating budget plan: {} (Category: {:?})",
                            e,
                            category
                        );
                        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                    }
                }
                Err(e)
            }
        }
    }

    async fn run(&self, payload: &Value) -> Result<PlanResponse> {
        // 憑證缺失屬於部署問題，不論請求是否合法都先回報
        if self.config.gemini_api_key().is_none() {
            return Err(PlannerError::ConfigError {
                message: MISSING_API_KEY_MESSAGE.to_string(),
            });
        }

        let request = validate_plan_request(payload).map_err(PlannerError::InvalidRequest)?;
        self.warn_on_inconsistent_group(&request);

        let prompt = build_plan_prompt(&request);
        tracing::debug!(
            "Requesting plan from model {} (budget: {}, people: {})",
            self.config.model,
            request.budget,
            request.number_of_people
        );

        let text = self
            .generator
            .generate_text(&self.config.model, &prompt)
            .await?
            .filter(|t| !t.trim().is_empty())
            .ok_or(PlannerError::UpstreamEmptyResponse)?;

        let cleaned = strip_code_fences(&text);
        let parsed: Value = serde_json::from_str(&cleaned).map_err(|e| {
            tracing::debug!("Unparseable model output: {}", cleaned);
            PlannerError::UpstreamMalformedJson(e)
        })?;

        let mut plan =
            validate_plan_response(&parsed).map_err(PlannerError::UpstreamSchemaViolation)?;
        plan.normalize_movie_prices();

        tracing::info!(
            "✅ Generated plan: {} movie(s), {} transport option(s), {} food option(s)",
            plan.movies.len(),
            plan.transport.len(),
            plan.food.len()
        );
        self.log_cost_summary(&plan, &request);
        Ok(plan)
    }

    /// 超出預算時只警告，計畫照常回傳
    fn log_cost_summary(&self, plan: &PlanResponse, request: &PlanRequest) -> PlanCostSummary {
        let summary = PlanCostSummary::compute(plan, request.budget, request.number_of_people);
        if summary.is_within_budget() {
            tracing::debug!(
                "Estimated total {} INR, {} INR left",
                summary.total_estimated_cost,
                summary.remaining_budget
            );
        } else {
            tracing::warn!(
                "⚠️ Plan exceeds budget: estimated {} INR for a budget of {} INR",
                summary.total_estimated_cost,
                request.budget
            );
        }
        summary
    }

    /// 男女人數加總超過總人數時只記錄，不拒絕
    fn warn_on_inconsistent_group(&self, request: &PlanRequest) {
        let group = GroupComposition::new(
            request.number_of_people,
            request.number_of_boys,
            request.number_of_girls,
        );
        if !group.is_consistent() {
            tracing::warn!(
                "Group composition exceeds headcount: {} boys + {} girls > {} people",
                group.boys,
                group.girls,
                group.people
            );
        }
    }
}
