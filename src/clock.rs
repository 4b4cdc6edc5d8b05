use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Current UTC time as an RFC 3339 string, the format used for `added_at`
/// and meal log timestamps.
pub fn now_rfc3339() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&Rfc3339).unwrap_or_else(|_| now.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_parse_back() {
        let ts = now_rfc3339();
        assert!(OffsetDateTime::parse(&ts, &Rfc3339).is_ok());
    }
}
