/// Human-readable durations for the command line
use crate::error::DurationError;

/// Parse `25m`, `30s`, `1m30s` into seconds. A bare number counts as minutes.
pub fn parse_duration(input: &str) -> Result<u64, DurationError> {
    let input = input.trim().to_lowercase();

    if let Ok(minutes) = input.parse::<u64>() {
        return match minutes.checked_mul(60) {
            Some(0) => Err(DurationError::Zero),
            Some(seconds) => Ok(seconds),
            None => Err(DurationError::InvalidNumber),
        };
    }

    let mut total_seconds = 0u64;
    let mut current_number = String::new();

    for ch in input.chars() {
        if ch.is_ascii_digit() {
            current_number.push(ch);
        } else if ch == 'm' || ch == 's' {
            if current_number.is_empty() {
                return Err(DurationError::MissingNumber);
            }
            let number: u64 = current_number
                .parse()
                .map_err(|_| DurationError::InvalidNumber)?;
            let seconds = if ch == 'm' {
                number.checked_mul(60).ok_or(DurationError::InvalidNumber)?
            } else {
                number
            };
            total_seconds = total_seconds
                .checked_add(seconds)
                .ok_or(DurationError::InvalidNumber)?;
            current_number.clear();
        } else if !ch.is_whitespace() {
            return Err(DurationError::InvalidCharacter(ch));
        }
    }

    if !current_number.is_empty() {
        return Err(DurationError::MissingUnit);
    }
    if total_seconds == 0 {
        return Err(DurationError::Zero);
    }

    Ok(total_seconds)
}

fn plural(n: u64) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// `1 minute 30 seconds`, `8 minutes`, `45 seconds`
pub fn format_duration(seconds: u64) -> String {
    let minutes = seconds / 60;
    let remaining_seconds = seconds % 60;

    if minutes > 0 && remaining_seconds > 0 {
        format!(
            "{} minute{} {} second{}",
            minutes,
            plural(minutes),
            remaining_seconds,
            plural(remaining_seconds)
        )
    } else if minutes > 0 {
        format!("{} minute{}", minutes, plural(minutes))
    } else {
        format!("{} second{}", remaining_seconds, plural(remaining_seconds))
    }
}
