use crate::types::CourseId;

/// Parses a path segment into a course id using integer-prefix rules.
///
/// Leading whitespace is skipped, an optional sign is accepted and the longest
/// run of digits that follows is used, so `"2abc"` yields `2` and `"1.5"`
/// yields `1`. A `0x`/`0X` prefix switches to hexadecimal digits. Returns
/// `None` when no digits are present or the value does not fit in a
/// [`CourseId`]; such ids never match a stored course.
pub fn parse_course_id(raw: &str) -> Option<CourseId> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, rest) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let digits_len = rest.chars().take_while(|c| c.is_digit(radix)).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude = CourseId::from_str_radix(&rest[..digits_len], radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
