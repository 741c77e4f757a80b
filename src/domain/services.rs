use crate::domain::model::PlanResponse;
use serde::Serialize;

/// 由計畫推算出的費用總覽，依人數計算電影票總價
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanCostSummary {
    pub movie_cost: f64,
    pub transport_cost: f64,
    pub food_cost: f64,
    pub total_estimated_cost: f64,
    /// 可能為負數，代表超出預算
    pub remaining_budget: f64,
}

impl PlanCostSummary {
    pub fn compute(plan: &PlanResponse, budget: f64, number_of_people: u32) -> Self {
        let people = f64::from(number_of_people);
        let movie_cost: f64 = plan.movies.iter().map(|m| m.price * people).sum();
        let transport_cost: f64 = plan.transport.iter().map(|t| t.estimated_cost).sum();
        let food_cost: f64 = plan.food.iter().map(|f| f.estimated_food_cost).sum();
        let total_estimated_cost = movie_cost + transport_cost + food_cost;

        Self {
            movie_cost,
            transport_cost,
            food_cost,
            total_estimated_cost,
            remaining_budget: budget - total_estimated_cost,
        }
    }

    pub fn is_within_budget(&self) -> bool {
        self.remaining_budget >= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupComposition {
    pub people: u32,
    pub boys: u32,
    pub girls: u32,
}

impl GroupComposition {
    pub fn new(people: u32, boys: u32, girls: u32) -> Self {
        Self {
            people,
            boys,
            girls,
        }
    }

    /// 男女人數加總不超過總人數
    pub fn is_consistent(&self) -> bool {
        u64::from(self.boys) + u64::from(self.girls) <= u64::from(self.people)
    }
}
