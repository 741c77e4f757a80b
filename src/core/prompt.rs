use crate::domain::model::PlanRequest;

/// 描述團體人數與組成，例如 `2 people (1 boys and 1 girls)`
pub fn group_descriptor(request: &PlanRequest) -> String {
    let mut description = format!("{} people", request.number_of_people);
    let boys = request.number_of_boys;
    let girls = request.number_of_girls;

    if boys > 0 && girls > 0 {
        description.push_str(&format!(" ({} boys and {} girls)", boys, girls));
    } else if boys > 0 {
        description.push_str(&format!(" ({} boys)", boys));
    } else if girls > 0 {
        description.push_str(&format!(" ({} girls)", girls));
    }

    description
}

/// Builds the planning prompt. Output is a pure function of the request.
pub fn build_plan_prompt(request: &PlanRequest) -> String {
    let group = group_descriptor(request);
    let budget = request.budget;

    format!(
        r#"You are a weekend budget planner. Generate a weekend budget plan for {group} with a total budget of {budget} INR.

Group composition: {group}

Based on the group composition, please provide personalized suggestions for:
- Movies: Exactly 1 movie title suitable for this group, with each ticket costing exactly 350 INR. Include exactly 3 different realistic showtimes.
- Transport: 1-2 transport methods with estimated costs
- Restaurants: 1 restaurant type suitable for this group with estimated food cost

IMPORTANT:
- Consider the group's demographics when suggesting movies and dining options
- For mixed groups, suggest movies and restaurants that appeal to both boys and girls
- For boys-only groups, suggest action/adventure movies and casual dining
- For girls-only groups, suggest romantic/drama movies and nice cafes or restaurants
- Ensure the total estimated cost for movies, transport, and food does NOT exceed {budget} INR

Return ONLY a JSON object in this exact format:
{{
  "movies": [{{"title": "Movie Name", "price": 350, "showtimes": ["2:00 PM", "5:00 PM", "8:00 PM"]}}],
  "transport": [{{"method": "Transport Method", "estimatedCost": 100}}],
  "food": [{{"restaurantType": "Restaurant Type", "estimatedFoodCost": 400}}]
}}"#
    )
}
