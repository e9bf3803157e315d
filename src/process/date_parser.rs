use std::num::ParseIntError;

/// Full English month names, in calendar order.
static MONTHS: [(&str, u32); 12] = [
    ("January", 1),
    ("February", 2),
    ("March", 3),
    ("April", 4),
    ("May", 5),
    ("June", 6),
    ("July", 7),
    ("August", 8),
    ("September", 9),
    ("October", 10),
    ("November", 11),
    ("December", 12),
];

/// Case-sensitive lookup of a full month name.
pub fn month_number(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .find(|(month, _)| *month == name)
        .map(|(_, number)| *number)
}

/// `("March", "1990")` → `"1990-03"`.
///
/// An unknown month name yields `Ok(None)`; a year that is not an integer is
/// an error so the caller can drop the whole row.
pub fn normalize_month(month_name: &str, year_text: &str) -> Result<Option<String>, ParseIntError> {
    let year: i32 = year_text.trim().parse()?;
    let Some(month) = month_number(month_name.trim()) else {
        return Ok(None);
    };
    Ok(Some(format!("{:04}-{:02}", year, month)))
}

/// Survey year for the cutoff filter. Non-numeric text reads as 0.
pub fn parse_year_lenient(year_text: &str) -> i32 {
    year_text.trim().parse().unwrap_or(0)
}
