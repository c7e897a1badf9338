//! Helpers shared by the fetch, normalize and render stages

/// URL utilities for feed sources
pub mod url {
    use ::url::Url;

    const FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons";

    /// Canonical form used for dedup and lookup.
    pub fn normalize_feed_url(url_str: &str) -> String {
        url_str.trim().to_string()
    }

    /// Extract the host of a URL
    pub fn extract_domain(url_str: &str) -> Option<String> {
        let url = Url::parse(url_str.trim()).ok()?;
        url.host_str()
            .filter(|host| !host.is_empty())
            .map(|host| host.to_string())
    }

    /// Icon-service URL for a site. Pure formatting, nothing is fetched.
    /// Prefers the site link's domain, then the feed URL's.
    pub fn favicon_url(site_link: Option<&str>, feed_url: &str) -> String {
        site_link
            .and_then(extract_domain)
            .or_else(|| extract_domain(feed_url))
            .map(|domain| format!("{}?domain={}&sz=64", FAVICON_SERVICE, domain))
            .unwrap_or_default()
    }

    /// Validate feed URL format
    pub fn is_valid_feed_url(url_str: &str) -> bool {
        if let Ok(url) = Url::parse(url_str.trim()) {
            url.scheme() == "http" || url.scheme() == "https"
        } else {
            false
        }
    }
}

/// Time utilities for freshness labels
pub mod time {
    use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};

    const MINUTE: i64 = 60;
    const HOUR: i64 = 3_600;
    const DAY: i64 = 86_400;

    /// Articles younger than this many seconds are flagged as new.
    pub const NOVELTY_WINDOW_SECONDS: i64 = DAY;

    /// Human label for the age of an article.
    ///
    /// Four buckets with truncating division: minutes below an hour, hours
    /// below a day, "yesterday" below two days, days after that. Ages in the
    /// future count as zero.
    pub fn relative_label(age: Duration) -> String {
        let seconds = age.num_seconds().max(0);

        if seconds < HOUR {
            format!("{} minutes ago", seconds / MINUTE)
        } else if seconds < DAY {
            format!("{} hours ago", seconds / HOUR)
        } else if seconds < 2 * DAY {
            "yesterday".to_string()
        } else {
            format!("{} days ago", seconds / DAY)
        }
    }

    pub fn is_within_novelty_window(published: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(published) < Duration::seconds(NOVELTY_WINDOW_SECONDS)
    }

    const OFFSET_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S %z",
        "%Y-%m-%d %H:%M:%S%z",
        "%Y-%m-%dT%H:%M:%S%z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%a, %d %b %Y %H:%M %z",
    ];

    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
    ];

    /// Parse a date string as found in feeds. Values without an offset are
    /// taken as UTC.
    pub fn parse_feed_date(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        for format in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(raw, format) {
                return Some(dt.with_timezone(&Utc));
            }
        }
        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(naive.and_utc());
            }
        }
        ["%Y-%m-%d", "%Y/%m/%d"]
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// "Last updated" string shown on every page.
    pub fn format_last_updated(now: DateTime<Utc>, offset_minutes: i32, label: &str) -> String {
        let offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        let local = now.with_timezone(&offset);
        let stamp = local.format("%Y/%m/%d %H:%M:%S").to_string();
        if label.is_empty() {
            stamp
        } else {
            format!("{} {}", stamp, label)
        }
    }
}

/// Text helpers for feed bodies
pub mod feed {
    /// Extract clean text content from HTML
    pub fn extract_text_from_html(html: &str) -> String {
        html.chars()
            .fold((String::new(), false), |(mut text, in_tag), c| match c {
                '<' => (text, true),
                '>' => (text, false),
                _ if !in_tag => {
                    text.push(c);
                    (text, in_tag)
                }
                _ => (text, in_tag),
            })
            .0
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Cut to `max_chars` characters, marking the cut with an ellipsis.
    pub fn truncate_chars(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => format!("{}…", text[..byte_idx].trim_end()),
            None => text.to_string(),
        }
    }
}
