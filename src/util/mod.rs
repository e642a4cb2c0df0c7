//
//  azure-devops-rest
//  util/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Small formatting and parsing helpers shared by the commands.

use anyhow::Result;
use chrono::{DateTime, Local, Utc};

/// Formats a timestamp in local time.
pub fn format_time(time: &DateTime<Utc>) -> String {
    let local: DateTime<Local> = (*time).into();
    local.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Formats an elapsed time as `42s`, `3m 5s`, `2h 10m` or `1d 4h`.
pub fn format_duration(duration: chrono::Duration) -> String {
    let secs = duration.num_seconds().max(0);

    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Duration between two optional timestamps, when both are known.
pub fn elapsed(start: Option<&DateTime<Utc>>, finish: Option<&DateTime<Utc>>) -> Option<String> {
    match (start, finish) {
        (Some(start), Some(finish)) => Some(format_duration(*finish - *start)),
        _ => None,
    }
}

/// Formats how long ago `time` was, relative to `now`.
pub fn format_relative_time(time: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let diff = (*now - *time).num_seconds();

    if diff < 0 {
        return "in the future".to_string();
    }

    let (count, unit) = match diff {
        0..=59 => return "just now".to_string(),
        60..=3599 => (diff / 60, "minute"),
        3600..=86399 => (diff / 3600, "hour"),
        86400..=604_799 => (diff / 86400, "day"),
        604_800..=2_591_999 => (diff / 604_800, "week"),
        2_592_000..=31_535_999 => (diff / 2_592_000, "month"),
        _ => (diff / 31_536_000, "year"),
    };

    format!("{} {}{} ago", count, unit, if count == 1 { "" } else { "s" })
}

/// Splits a `key=value` argument. The value may itself contain `=`.
pub fn parse_key_value(arg: &str) -> Result<(String, String)> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => anyhow::bail!("Expected key=value, got '{}'", arg),
    }
}

/// Turns a branch name into a full ref: `main` becomes `refs/heads/main`.
pub fn branch_ref(branch: &str) -> String {
    if branch.starts_with("refs/") {
        branch.to_string()
    } else {
        format!("refs/heads/{}", branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::seconds(42)), "42s");
        assert_eq!(format_duration(Duration::seconds(185)), "3m 5s");
        assert_eq!(format_duration(Duration::seconds(7800)), "2h 10m");
        assert_eq!(format_duration(Duration::seconds(-5)), "0s");
    }

    #[test]
    fn test_format_relative_time() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(format_relative_time(&now, &now), "just now");
        assert_eq!(
            format_relative_time(&(now - Duration::minutes(1)), &now),
            "1 minute ago"
        );
        assert_eq!(
            format_relative_time(&(now - Duration::days(3)), &now),
            "3 days ago"
        );
        assert_eq!(
            format_relative_time(&(now + Duration::days(1)), &now),
            "in the future"
        );
    }

    #[test]
    fn test_elapsed() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let finish = start + Duration::seconds(90);
        assert_eq!(elapsed(Some(&start), Some(&finish)).as_deref(), Some("1m 30s"));
        assert_eq!(elapsed(Some(&start), None), None);
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("$top=10").unwrap(),
            ("$top".to_string(), "10".to_string())
        );
        assert_eq!(
            parse_key_value("filter=a=b").unwrap(),
            ("filter".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_branch_ref() {
        assert_eq!(branch_ref("main"), "refs/heads/main");
        assert_eq!(branch_ref("refs/pull/1/merge"), "refs/pull/1/merge");
    }
}
