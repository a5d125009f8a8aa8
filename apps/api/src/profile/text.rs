//! Profile text builder.
//!
//! Profiles reach us in two naming conventions (nested camelCase documents and
//! flat snake_case ones). Each logical field lists its candidate key paths in
//! precedence order; the first one holding a non-empty value wins.

use serde_json::Value;

/// A logical profile field and where to look for it, most preferred first.
struct FieldAliases {
    paths: &'static [&'static str],
}

const USER_ID: FieldAliases = FieldAliases { paths: &["_id", "user_id"] };
const FULL_NAME: FieldAliases = FieldAliases { paths: &["fullName", "full_name"] };
const IT_SKILLS: FieldAliases = FieldAliases { paths: &["itSkill", "it_skills"] };
const SOFT_SKILLS: FieldAliases = FieldAliases { paths: &["softSkill", "soft_skills"] };
const TECHNICAL_SKILLS: FieldAliases = FieldAliases {
    paths: &["skills.technical", "skills_technical"],
};
const GENERAL_SKILLS: FieldAliases = FieldAliases {
    paths: &["skills.general", "skills_general"],
};
const CURRENT_SEMESTER: FieldAliases = FieldAliases {
    paths: &["academic.currentSemester", "current_semester"],
};
const GPA: FieldAliases = FieldAliases { paths: &["academic.gpa", "gpa"] };
const COURSES: FieldAliases = FieldAliases {
    paths: &["academic.courses", "course_scores"],
};
const TARGET_CAREER: FieldAliases = FieldAliases {
    paths: &["career.targetCareerID", "target_career_id"],
};
const ACTUAL_CAREER: FieldAliases = FieldAliases {
    paths: &["career.actualCareer", "actual_career"],
};
const TIME_PER_WEEK: FieldAliases = FieldAliases {
    paths: &["availability.timePerWeekHours", "time_per_week_hours"],
};
const INTERESTS: FieldAliases = FieldAliases { paths: &["interests"] };
const PROJECTS: FieldAliases = FieldAliases { paths: &["projects"] };

const NOT_AVAILABLE: &str = "N/A";

impl FieldAliases {
    fn resolve<'a>(&self, profile: &'a Value) -> Option<&'a Value> {
        self.paths
            .iter()
            .filter_map(|path| lookup(profile, path))
            .find(|v| is_present(v))
    }

    fn scalar_or(&self, profile: &Value, default: &str) -> String {
        self.resolve(profile)
            .map(scalar_text)
            .unwrap_or_else(|| default.to_string())
    }

    fn list(&self, profile: &Value) -> Vec<String> {
        match self.resolve(profile) {
            Some(Value::Array(values)) => values.iter().map(scalar_text).collect(),
            Some(other) => vec![scalar_text(other)],
            None => Vec::new(),
        }
    }

    /// `{"python": 7}` renders as `python:7`, entries joined with `, `.
    fn skill_levels(&self, profile: &Value) -> String {
        match self.resolve(profile) {
            Some(Value::Object(levels)) => levels
                .iter()
                .map(|(skill, level)| format!("{skill}:{}", scalar_text(level)))
                .collect::<Vec<_>>()
                .join(", "),
            Some(other) => scalar_text(other),
            None => String::new(),
        }
    }
}

/// Dotted-path lookup into nested objects.
fn lookup<'a>(profile: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(profile, |node, key| node.get(key))
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        _ => true,
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(o) => o
            .get("$oid")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}

fn course_lines(profile: &Value) -> Vec<String> {
    let Some(Value::Array(courses)) = COURSES.resolve(profile) else {
        return Vec::new();
    };
    courses
        .iter()
        .filter_map(|course| {
            let code = course.get("code").filter(|v| is_present(v))?;
            let name = course.get("name").filter(|v| is_present(v))?;
            let grade = course.get("grade").filter(|v| !v.is_null())?;
            Some(format!(
                "- {} | {}: {}/10",
                scalar_text(code),
                scalar_text(name),
                scalar_text(grade)
            ))
        })
        .collect()
}

fn joined_or(values: Vec<String>, separator: &str, default: &str) -> String {
    if values.is_empty() {
        default.to_string()
    } else {
        values.join(separator)
    }
}

/// Renders a profile as the `PROFILE:` block of the personalization prompt.
pub fn build_profile_text(profile: &Value) -> String {
    let projects = PROJECTS
        .list(profile)
        .into_iter()
        .map(|p| format!("- {p}"))
        .collect();

    format!(
        "PROFILE:\n\
         - user_id: {user_id}\n\
         - Full name: {full_name}\n\
         - current_semester: {semester}\n\
         - GPA (4-point scale): {gpa}\n\
         - target_career_id: {target}\n\
         - actual_career: {actual}\n\
         - time_per_week_hours: {hours}\n\
         - IT skills (label): {it_skills}\n\
         - Soft skills (label): {soft_skills}\n\
         - Technical skills (1-10): {technical}\n\
         - General skills (1-10): {general}\n\
         - Interests: {interests}\n\
         - Projects:\n{projects}\n\
         - Course grades (10-point scale):\n{courses}\n",
        user_id = USER_ID.scalar_or(profile, NOT_AVAILABLE),
        full_name = FULL_NAME.scalar_or(profile, NOT_AVAILABLE),
        semester = CURRENT_SEMESTER.scalar_or(profile, NOT_AVAILABLE),
        gpa = GPA.scalar_or(profile, NOT_AVAILABLE),
        target = TARGET_CAREER.scalar_or(profile, NOT_AVAILABLE),
        actual = ACTUAL_CAREER.scalar_or(profile, NOT_AVAILABLE),
        hours = TIME_PER_WEEK.scalar_or(profile, NOT_AVAILABLE),
        it_skills = IT_SKILLS.list(profile).join(", "),
        soft_skills = SOFT_SKILLS.list(profile).join(", "),
        technical = TECHNICAL_SKILLS.skill_levels(profile),
        general = GENERAL_SKILLS.skill_levels(profile),
        interests = joined_or(INTERESTS.list(profile), ", ", "None"),
        projects = joined_or(projects, "\n", "No projects"),
        courses = joined_or(course_lines(profile), "\n", "No course data"),
    )
}
