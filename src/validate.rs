//! Form validation and display formatting
//!
//! Pure functions that turn raw form input into request payloads, or into the
//! first rule the input breaks. Nothing here performs I/O.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::model::TaskType;

/// Inclusive bounds for `max_items`
pub const MAX_ITEMS_RANGE: std::ops::RangeInclusive<i64> = 1..=1000;

/// Used when the max-items field does not hold a number
pub const DEFAULT_MAX_ITEMS: u32 = 50;

/// Shown for timestamps the backend never set
pub const NEVER: &str = "Never";

/// Validated body for `POST /api/tasks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub task_type: TaskType,
    pub target: String,
    pub max_items: u32,
}

/// Validated body for `POST /api/accounts`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
}

/// Reasons a submission is rejected before reaching the network
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a target")]
    EmptyTarget,

    #[error("Max items must be between 1 and 1000")]
    MaxItemsOutOfRange(i64),

    #[error("For hashtag scraping, enter hashtag without @ symbol")]
    HashtagWithAt,

    #[error("For profile/posts/followers/following, enter username without # symbol")]
    UsernameWithHash,

    #[error("Please enter username and password")]
    MissingCredentials,
}

/// Validate the task form.
///
/// Rules are checked in order and the first failure is returned.
pub fn validate_task_input(
    task_type: &TaskType,
    raw_target: &str,
    raw_max_items: &str,
) -> Result<NewTask, ValidationError> {
    let target = raw_target.trim();
    if target.is_empty() {
        return Err(ValidationError::EmptyTarget);
    }

    let max_items = parse_leading_int(raw_max_items).unwrap_or(i64::from(DEFAULT_MAX_ITEMS));
    if !MAX_ITEMS_RANGE.contains(&max_items) {
        return Err(ValidationError::MaxItemsOutOfRange(max_items));
    }

    if *task_type == TaskType::Hashtag && target.starts_with('@') {
        return Err(ValidationError::HashtagWithAt);
    }

    if task_type.targets_username() && target.starts_with('#') {
        return Err(ValidationError::UsernameWithHash);
    }

    Ok(NewTask {
        task_type: task_type.clone(),
        target: target.to_string(),
        // range-checked above
        max_items: max_items as u32,
    })
}

/// Validate the account form and normalize the username.
pub fn validate_account_input(
    raw_username: &str,
    raw_password: &str,
) -> Result<NewAccount, ValidationError> {
    let username = raw_username.trim();
    if username.is_empty() || raw_password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }

    Ok(NewAccount {
        username: strip_at(username).to_string(),
        password: raw_password.to_string(),
    })
}

/// Strip one leading `@` from a username
pub fn strip_at(username: &str) -> &str {
    username.strip_prefix('@').unwrap_or(username)
}

/// Parse an optional sign followed by leading digits, ignoring whatever follows.
///
/// Returns `None` when no digit leads the (trimmed) input. Overflow saturates.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(10) else { break };
        seen = true;
        value = value.saturating_mul(10).saturating_add(i64::from(d));
    }

    seen.then_some(if negative { -value } else { value })
}

/// Format a backend timestamp in the local timezone, or "Never" when absent.
pub fn format_timestamp(value: Option<&str>) -> String {
    format_timestamp_in(value, &Local)
}

/// Format a backend timestamp in the given timezone.
///
/// Accepts RFC 3339 and SQLite's `YYYY-MM-DD HH:MM:SS[.f]` (taken as UTC).
/// Unparseable values are returned as-is.
pub fn format_timestamp_in<Tz>(value: Option<&str>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let raw = match value.map(str::trim) {
        None | Some("") => return NEVER.to_string(),
        Some(raw) => raw,
    };

    parse_timestamp(raw)
        .map(|dt| dt.with_timezone(tz).format("%b %-d, %Y %H:%M:%S").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Display glyph for a task type
pub fn task_type_icon(task_type: &TaskType) -> &'static str {
    match task_type {
        TaskType::Profile => "👤",
        TaskType::Posts => "📸",
        TaskType::Hashtag => "#️⃣",
        TaskType::Followers => "👥",
        TaskType::Following => "👤",
        TaskType::Other(_) => "📊",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_hashtag_task() {
        let task = validate_task_input(&TaskType::Hashtag, "  travel ", "100").unwrap();
        assert_eq!(
            task,
            NewTask {
                task_type: TaskType::Hashtag,
                target: "travel".to_string(),
                max_items: 100,
            }
        );
    }

    #[test]
    fn test_empty_target_checked_first() {
        // Out-of-range max items is also wrong, but the target rule comes first
        let err = validate_task_input(&TaskType::Profile, "   ", "5000").unwrap_err();
        assert_eq!(err, ValidationError::EmptyTarget);
    }

    #[test]
    fn test_max_items_defaults_when_unparsable() {
        let task = validate_task_input(&TaskType::Posts, "bob", "lots").unwrap();
        assert_eq!(task.max_items, DEFAULT_MAX_ITEMS);

        let task = validate_task_input(&TaskType::Posts, "bob", "").unwrap();
        assert_eq!(task.max_items, DEFAULT_MAX_ITEMS);
    }

    #[test]
    fn test_max_items_leading_digits() {
        let task = validate_task_input(&TaskType::Posts, "bob", "25 items").unwrap();
        assert_eq!(task.max_items, 25);
    }

    #[test]
    fn test_max_items_out_of_range() {
        for raw in ["0", "-3", "1001", "99999999999999999999999"] {
            let err = validate_task_input(&TaskType::Posts, "bob", raw).unwrap_err();
            assert!(
                matches!(err, ValidationError::MaxItemsOutOfRange(_)),
                "{} should be rejected",
                raw
            );
        }

        assert!(validate_task_input(&TaskType::Posts, "bob", "1").is_ok());
        assert!(validate_task_input(&TaskType::Posts, "bob", "1000").is_ok());
    }

    #[test]
    fn test_range_checked_before_prefix_rules() {
        let err = validate_task_input(&TaskType::Profile, "#bob", "0").unwrap_err();
        assert_eq!(err, ValidationError::MaxItemsOutOfRange(0));
    }

    #[test]
    fn test_hashtag_rejects_at_prefix() {
        let err = validate_task_input(&TaskType::Hashtag, "@travel", "10").unwrap_err();
        assert_eq!(err, ValidationError::HashtagWithAt);

        // A leading # is allowed for hashtags
        assert!(validate_task_input(&TaskType::Hashtag, "#travel", "10").is_ok());
    }

    #[test]
    fn test_username_types_reject_hash_prefix() {
        for task_type in [
            TaskType::Profile,
            TaskType::Posts,
            TaskType::Followers,
            TaskType::Following,
        ] {
            let err = validate_task_input(&task_type, "#bob", "10").unwrap_err();
            assert_eq!(err, ValidationError::UsernameWithHash);
        }
    }

    #[test]
    fn test_account_requires_both_fields() {
        assert_eq!(
            validate_account_input("  ", "secret").unwrap_err(),
            ValidationError::MissingCredentials
        );
        assert_eq!(
            validate_account_input("alice", "").unwrap_err(),
            ValidationError::MissingCredentials
        );
    }

    #[test]
    fn test_account_username_normalized() {
        let account = validate_account_input(" @alice ", "secret").unwrap();
        assert_eq!(account.username, "alice");
        assert_eq!(account.password, "secret");
    }

    #[test]
    fn test_strip_at_removes_one_leading_at() {
        assert_eq!(strip_at("@alice"), "alice");
        assert_eq!(strip_at("@@alice"), "@alice");
        assert_eq!(strip_at("a@b"), "a@b");
        assert_eq!(strip_at("@"), "");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp_in(None, &Utc), "Never");
        assert_eq!(format_timestamp_in(Some(""), &Utc), "Never");
        assert_eq!(
            format_timestamp_in(Some("2024-03-05 14:07:09"), &Utc),
            "Mar 5, 2024 14:07:09"
        );
        assert_eq!(
            format_timestamp_in(Some("2024-03-05T14:07:09+02:00"), &Utc),
            "Mar 5, 2024 12:07:09"
        );
        assert_eq!(format_timestamp_in(Some("yesterday"), &Utc), "yesterday");
    }

    #[test]
    fn test_task_type_icon_fallback() {
        assert_eq!(task_type_icon(&TaskType::Hashtag), "#️⃣");
        assert_eq!(task_type_icon(&TaskType::Other("reels".into())), "📊");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_task_type() -> impl Strategy<Value = TaskType> {
        prop::sample::select(TaskType::known().to_vec())
    }

    /// Targets that pass every prefix rule for any task type
    fn clean_target() -> impl Strategy<Value = String> {
        "[a-z0-9_.]{1,30}"
    }

    proptest! {
        #[test]
        fn strip_at_is_identity_on_clean_usernames(name in "[^@][^\\s]{0,30}") {
            prop_assert_eq!(strip_at(&name), name.as_str());
            prop_assert_eq!(strip_at(strip_at(&name)), strip_at(&name));
        }

        #[test]
        fn normalized_username_strips_exactly_one_at(name in "[a-z0-9_.]{1,30}") {
            let account = validate_account_input(&format!("@{}", name), "pw").unwrap();
            prop_assert_eq!(&account.username, &name);

            let again = validate_account_input(&account.username, "pw").unwrap();
            prop_assert_eq!(again.username, account.username);
        }

        #[test]
        fn max_items_outside_range_rejected(
            task_type in any_task_type(),
            target in clean_target(),
            n in prop_oneof![-1_000_000i64..=0, 1001i64..=1_000_000],
        ) {
            let err = validate_task_input(&task_type, &target, &n.to_string()).unwrap_err();
            prop_assert_eq!(err, ValidationError::MaxItemsOutOfRange(n));
        }

        #[test]
        fn max_items_inside_range_accepted(
            task_type in any_task_type(),
            target in clean_target(),
            n in 1u32..=1000,
        ) {
            let task = validate_task_input(&task_type, &target, &n.to_string()).unwrap();
            prop_assert_eq!(task.max_items, n);
        }

        #[test]
        fn prefix_rules_hold_for_every_type(task_type in any_task_type(), rest in clean_target()) {
            let at = validate_task_input(&task_type, &format!("@{}", rest), "10");
            let hash = validate_task_input(&task_type, &format!("#{}", rest), "10");

            if task_type == TaskType::Hashtag {
                prop_assert_eq!(at.unwrap_err(), ValidationError::HashtagWithAt);
                prop_assert!(hash.is_ok());
            } else {
                prop_assert_eq!(hash.unwrap_err(), ValidationError::UsernameWithHash);
            }
        }
    }
}
