// Shared prompt constants.
// Each stage that needs LLM calls defines its own prompts alongside it.
// This file contains cross-cutting prompt fragments.

/// System persona shared by every stage of the advisory pipeline.
pub const TRIP_ADVISOR_SYSTEM: &str =
    "You are a trip advisor which informs whether it is safe to travel to certain country.";

/// Instruction appended to prompts whose answer must stay within the supplied material.
pub const INSUFFICIENT_INFORMATION_INSTRUCTION: &str = "\
    Please generate the response, if information is not sufficient to complete the task do not make up \
    the answer, and response with \"I do not have sufficient information to provide you with the advice.\"";
