use std::time::{Duration, SystemTime};

use time::{OffsetDateTime, format_description::well_known::Rfc3339};

const UNKNOWN_TIME: &str = "unknown";

pub trait SystemTimeExt {
    /// UTC timestamp in RFC 3339 format, truncated to whole seconds
    fn to_rfc3339(&self) -> String;
}

impl SystemTimeExt for SystemTime {
    fn to_rfc3339(&self) -> String {
        let whole_seconds = self
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| SystemTime::UNIX_EPOCH + Duration::from_secs(d.as_secs()))
            .unwrap_or(*self);

        OffsetDateTime::from(whole_seconds)
            .format(&Rfc3339)
            .unwrap_or_else(|_| UNKNOWN_TIME.to_string())
    }
}
