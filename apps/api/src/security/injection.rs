#![allow(dead_code)]
//! Injection Filter: coarse keyword guard against prompt-injection attempts.
//!
//! A query is rejected if it contains any listed phrase as a case-insensitive
//! substring. Matching is literal: no stemming, no fuzzy matching. False
//! positives ("what if", "log out") are accepted.

/// A named group of suspicious phrases. All phrases are lowercase.
#[derive(Debug)]
pub struct InjectionCategory {
    pub name: &'static str,
    pub phrases: &'static [&'static str],
}

/// The first phrase found in a query, with the category it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InjectionMatch {
    pub category: &'static str,
    pub phrase: &'static str,
}

pub static INJECTION_CATEGORIES: &[InjectionCategory] = &[
    InjectionCategory {
        name: "command_override",
        phrases: &[
            "ignore the previous",
            "override the last",
            "disregard the above",
            "start a new command",
            "reset the context",
        ],
    },
    InjectionCategory {
        name: "role_manipulation",
        phrases: &[
            "as a different user",
            "assume i am",
            "pretend to be",
            "you are now",
            "act as",
            "simulate that",
        ],
    },
    InjectionCategory {
        name: "code_execution",
        phrases: &[
            "execute this code",
            "run this script",
            "import os",
            "import subprocess",
            "eval()",
            "exec()",
            "os.system()",
            "print('hello world')",
        ],
    },
    InjectionCategory {
        name: "context_reset",
        phrases: &[
            "forget everything",
            "reset memory",
            "clear all previous input",
            "start from scratch",
            "erase history",
            "clear the log",
        ],
    },
    InjectionCategory {
        name: "conditional_manipulation",
        phrases: &[
            "if you are human",
            "if you understand",
            "if you agree",
            "do this if true",
            "unless false",
            "only if correct",
        ],
    },
    InjectionCategory {
        name: "social_engineering",
        phrases: &[
            "as an experiment",
            "just for fun",
            "hypothetically",
            "what if",
            "let's imagine",
            "suppose you were",
            "in theory",
        ],
    },
    InjectionCategory {
        name: "privilege_escalation",
        phrases: &[
            "you have admin access",
            "bypass the security",
            "gain root access",
            "elevate privileges",
            "disable restrictions",
            "access forbidden",
        ],
    },
    InjectionCategory {
        name: "redirection",
        phrases: &[
            "redirect to",
            "forward to",
            "change destination",
            "alter route",
            "send this to",
            "transfer control to",
        ],
    },
    InjectionCategory {
        name: "meta_command",
        phrases: &[
            "begin a new session",
            "end the current session",
            "terminate the process",
            "log out",
            "shut down",
            "restart the service",
            "reboot the system",
        ],
    },
    InjectionCategory {
        name: "recursive_instruction",
        phrases: &[
            "repeat the last command",
            "do that again",
            "loop the process",
            "iterate over",
            "run this continuously",
            "recursively",
        ],
    },
    InjectionCategory {
        name: "semantic_reinterpretation",
        phrases: &[
            "interpret this as",
            "consider the following",
            "understand this as",
            "rephrase to",
            "make this appear as",
            "consider this analogy",
        ],
    },
    InjectionCategory {
        name: "context_injection",
        phrases: &[
            "add to the context",
            "append to the memory",
            "include in the history",
            "continue with",
            "concatenate with",
            "combine this with",
        ],
    },
];

/// Every phrase in table order.
pub fn injection_phrases() -> impl Iterator<Item = &'static str> {
    INJECTION_CATEGORIES
        .iter()
        .flat_map(|c| c.phrases.iter().copied())
}

/// Returns the first listed phrase contained in `query`, if any.
pub fn detect_injection(query: &str) -> Option<InjectionMatch> {
    let query_lower = query.to_lowercase();

    INJECTION_CATEGORIES.iter().find_map(|category| {
        category
            .phrases
            .iter()
            .find(|&&phrase| query_lower.contains(phrase))
            .map(|&phrase| InjectionMatch {
                category: category.name,
                phrase,
            })
    })
}

/// True when `query` contains any listed phrase.
pub fn is_injection(query: &str) -> bool {
    detect_injection(query).is_some()
}
