//! ISO 6346 container identifiers.

/// Strip separators and upper-case (`MSCU 123456-6` -> `MSCU1234566`).
pub fn normalize_container(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_uppercase()
}

/// Validate owner code, serial and check digit of a container id.
pub fn verify_container(id: &str) -> bool {
    let id = normalize_container(id);
    let chars: Vec<char> = id.chars().collect();
    if chars.len() != 11
        || !chars[..4].iter().all(|c| c.is_ascii_uppercase())
        || !chars[4..].iter().all(|c| c.is_ascii_digit())
    {
        return false;
    }

    let sum: u32 = chars[..10]
        .iter()
        .enumerate()
        .map(|(i, c)| char_value(*c) * (1 << i))
        .sum();

    let check = (sum % 11) % 10;
    chars[10].to_digit(10) == Some(check)
}

/// Letters skip multiples of 11: A=10, B=12, ..., K=21, L=23, ..., V=34.
fn char_value(c: char) -> u32 {
    if let Some(d) = c.to_digit(10) {
        return d;
    }
    let mut value = 10;
    for _ in 'A'..c {
        value += 1;
        if value % 11 == 0 {
            value += 1;
        }
    }
    value
}
