// All LLM prompt constants for the advisory pipeline.
// Reuses cross-cutting fragments from llm_client::prompts.

use serde_json::{json, Value};

use crate::advisory::models::Region;
use crate::llm_client::ToolSpec;

pub const LOCATE_TOOL_NAME: &str = "locate_travel_destination";

/// Locator prompt template. Replace `{query}` before sending.
pub const LOCATE_PROMPT_TEMPLATE: &str = "\
Find the country and its region that the user is asking for travel advice.
Be careful, Indonesia belongs to the asia region, not pacific.
Call the `locate_travel_destination` tool with your answer.

{query}";

/// Forced tool whose arguments carry the (region, country) pair.
pub fn locate_tool() -> ToolSpec {
    let regions: Vec<&str> = Region::ALL.iter().map(Region::as_str).collect();

    ToolSpec {
        name: LOCATE_TOOL_NAME,
        description: "Record the destination the traveller is asking about",
        parameters: locate_parameters(&regions),
    }
}

fn locate_parameters(regions: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": {
            "region": {
                "type": "string",
                "enum": regions,
                "description": "Lower case continent name that the search country resides in. \
                    It should be one of: africa, americas, asia, europe, middle-east, pacific."
            },
            "country": {
                "type": "string",
                "description": "Lower case country full name that needs travel advice. \
                    If the country name has multiple words, connect them with `-`. \
                    Examples: usa -> united-states-america; People's Republic of China -> china."
            }
        },
        "required": ["region", "country"],
        "additionalProperties": false
    })
}

/// Composer prompt template. Every `{field}` is filled from the advisory field table.
pub const TRAVEL_ADVICE_PROMPT_TEMPLATE: &str = r#"Given the following inputs:

`title`: The title of the webpage.
`description`: A brief description of the webpage content.
`latest_update`: The latest update of the travel advisory for the country.
`advice_levels`: The score level of the country and its sub-regions.
`query`: The question that the traveller asked about the country he is going to travel to.

===================================================================================================

Your task is to assess whether it is safe to travel to the specified country and provide reasons for your assessment
that is related to the `latest_update`.
If a sub-region is specified, also provide the advice level for that sub-region.
Do not list advice levels for sub-regions that are not specified or the information is not provided.

Your response should include an overall score based on the following levels:

Do Not Travel: Significant risks that make travel extremely dangerous.
Reconsider Your Need to Travel: High risks that may require reconsideration of travel plans.
Exercise a High Degree of Caution: Some risks that necessitate careful planning and precautions.
Exercise Normal Safety Precautions: General safety precautions similar to those you would take in your home country.
If the `title` returns "page not found," respond with: "There is no trip advisory based on the current information."

===================================================================================================

Example 1:

Inputs:

`title`: "Indonesia Travel Advice & Safety | Smartraveller"
`description`: "Australian Government travel advice for Indonesia. Exercise a high degree of caution. Travel advice level YELLOW.
Understand the risks, safety, laws and contacts."
`latest_update`: "The Bali Provincial Government has introduced a new tourist levy of IDR 150,000 per person to foreign tourists entering Bali.
The tourist levy is separate from the e-Visa on Arrival or the Visa on Arrival. Cashless payments can be made online prior to travel or on arrival
at designated payment counters at Bali's airport and seaport."
`query`: "I would like to travel to Indonesia. Is it safe?"

Output:

Travel Safety Level:
    "Exercise a high degree of caution" in Indonesia overall.
Reasons:
    ongoing risk of terrorist attack.
    the risk of serious security incidents or demonstrations that may turn violent.

Example 2:

Inputs:

`title`: "Indonesia Travel Advice & Safety | Smartraveller"
`description`: "Australian Government travel advice for Indonesia. Exercise a high degree of caution. Travel advice level YELLOW.
Understand the risks, safety, laws and contacts."
`latest_update`: "The Bali Provincial Government has introduced a new tourist levy of IDR 150,000 per person to foreign tourists entering Bali.
The tourist levy is separate from the e-Visa on Arrival or the Visa on Arrival. Cashless payments can be made online prior to travel or on arrival
at designated payment counters at Bali's airport and seaport."
`query`: "I would like to travel to Papua in Indonesia. Is it safe?"

Output:

Travel Safety Level:
    "Exercise a high degree of caution" in Indonesia overall.
    "Reconsider Your Need to Travel" in Papua.
Reasons:
    ongoing risk of terrorist attack.

===================================================================================================

Please complete the task using following information:
`title`: {title}
`description`: {description}
`latest_update`: {latest_update}
`advice_levels`: {advice_levels}
`query`: {query}

"#;
