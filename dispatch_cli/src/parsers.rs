use jiff::SpanRelativeTo;

pub fn parse_duration(input: &str) -> Result<jiff::SignedDuration, String> {
    if let Ok(duration) = input.parse::<jiff::SignedDuration>() {
        return Ok(duration);
    }

    if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        return Ok(duration);
    }

    if let Ok(seconds) = input.parse::<i64>() {
        return Ok(jiff::SignedDuration::from_secs(seconds.abs()));
    }

    Err(format!("invalid duration {input:?}, expected e.g. \"30s\", \"2m\" or \"PT1M\""))
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;

    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("30s"), Ok(SignedDuration::from_secs(30)));
        assert_eq!(parse_duration("2m"), Ok(SignedDuration::from_secs(120)));
        assert_eq!(parse_duration("PT1M30S"), Ok(SignedDuration::from_secs(90)));
        assert_eq!(parse_duration("45"), Ok(SignedDuration::from_secs(45)));
        assert!(parse_duration("soon").is_err());
    }
}
