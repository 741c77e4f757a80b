use serde::{Deserialize, Serialize};

/// 每張電影票的固定票價 (INR)，不由模型決定
pub const MOVIE_TICKET_PRICE: f64 = 350.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub budget: f64,
    pub number_of_people: u32,
    #[serde(default)]
    pub number_of_boys: u32,
    #[serde(default)]
    pub number_of_girls: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub price: f64,
    pub showtimes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transport {
    pub method: String,
    pub estimated_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub restaurant_type: String,
    pub estimated_food_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub movies: Vec<Movie>,
    pub transport: Vec<Transport>,
    pub food: Vec<Food>,
}

impl PlanResponse {
    /// 將所有電影票價覆寫為固定票價
    pub fn normalize_movie_prices(&mut self) {
        for movie in &mut self.movies {
            movie.price = MOVIE_TICKET_PRICE;
        }
    }
}
