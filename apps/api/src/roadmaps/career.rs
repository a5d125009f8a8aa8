//! Career Mapper: free-text career label to canonical job-file key.
//!
//! Pure and deterministic: exact alias table, then keyword rules, then a default.

pub const DEFAULT_JOB_FILE: &str = "full_stack_developer";

const ALIASES: &[(&str, &str)] = &[
    ("information_technology", "full_stack_developer"),
    ("software_engineer", "full_stack_developer"),
    ("software_engineering", "full_stack_developer"),
    ("web_developer", "full_stack_developer"),
    ("frontend_developer", "full_stack_developer"),
    ("backend_developer", "full_stack_developer"),
    ("full_stack_developer", "full_stack_developer"),
    ("data_analyst", "data_analyst"),
    ("data_scientist", "data_scientist"),
    ("data_science", "data_scientist"),
    ("machine_learning_engineer", "machine_learning"),
    ("machine_learning", "machine_learning"),
    ("ml_engineer", "machine_learning"),
    ("ai_engineer", "machine_learning"),
    ("big_data_engineer", "big_data_engineer"),
    ("big_data", "big_data_engineer"),
    ("cloud_architect", "cloud_architect"),
    ("cloud_engineer", "cloud_architect"),
    ("cloud_computing", "cloud_architect"),
    ("devops_engineer", "cloud_architect"),
    ("security_analyst", "information_security_analyst"),
    ("cybersecurity_analyst", "information_security_analyst"),
    ("information_security", "information_security_analyst"),
    ("business_analyst", "business_intelligence_analyst"),
    ("bi_analyst", "business_intelligence_analyst"),
    ("business_intelligence", "business_intelligence_analyst"),
];

/// Keyword rules, checked in order. `all` must all appear; if `any` is non-empty,
/// at least one of it must appear too.
struct KeywordRule {
    all: &'static [&'static str],
    any: &'static [&'static str],
    job_file: &'static str,
}

const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule { all: &["data", "scien"], any: &[], job_file: "data_scientist" },
    KeywordRule { all: &["data", "analy"], any: &[], job_file: "data_analyst" },
    KeywordRule { all: &[], any: &["machine", "learning", "ml"], job_file: "machine_learning" },
    KeywordRule { all: &["cloud"], any: &[], job_file: "cloud_architect" },
    KeywordRule {
        all: &[],
        any: &["security", "cyber"],
        job_file: "information_security_analyst",
    },
    KeywordRule {
        all: &["business", "intel"],
        any: &[],
        job_file: "business_intelligence_analyst",
    },
    KeywordRule { all: &["big", "data"], any: &[], job_file: "big_data_engineer" },
];

impl KeywordRule {
    fn matches(&self, key: &str) -> bool {
        self.all.iter().all(|k| key.contains(k))
            && (self.any.is_empty() || self.any.iter().any(|k| key.contains(k)))
    }
}

/// Lowercases, trims, and joins words with underscores.
pub fn normalize_career_key(label: &str) -> String {
    label.trim().to_lowercase().replace(' ', "_")
}

/// Maps a career label to the stem of its canonical roadmap file.
pub fn map_career_to_job_file(label: &str) -> &'static str {
    let key = normalize_career_key(label);

    if let Some(&(_, job_file)) = ALIASES.iter().find(|(alias, _)| *alias == key) {
        return job_file;
    }

    KEYWORD_RULES
        .iter()
        .find(|rule| rule.matches(&key))
        .map(|rule| rule.job_file)
        .unwrap_or(DEFAULT_JOB_FILE)
}
