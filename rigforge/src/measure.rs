//! Numeric extraction from free-form spec strings such as `"125W"` or `"max 360 mm"`.

/// First run of ASCII digits in `value`, if any. Overlong runs saturate.
pub fn first_number(value: &str) -> Option<u32> {
    let start = value.find(|c: char| c.is_ascii_digit())?;
    let digits: String = value[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    Some(digits.parse::<u32>().unwrap_or(u32::MAX))
}

/// Wattage of a TDP-style spec. Anything without a number draws nothing.
pub fn parse_wattage(value: Option<&str>) -> u32 {
    value.and_then(first_number).unwrap_or(0)
}

/// A physical size in millimetres.
///
/// A spec without a number is `None`, which every dimension rule treats as
/// "unknown": an unknown limit constrains nothing and an unknown measurement
/// never exceeds a limit.
pub fn parse_dimension(value: Option<&str>) -> Option<u32> {
    value.and_then(first_number)
}

/// Whether `measured` is known to exceed `limit`.
pub fn exceeds(measured: Option<u32>, limit: Option<u32>) -> bool {
    matches!((measured, limit), (Some(m), Some(l)) if m > l)
}
