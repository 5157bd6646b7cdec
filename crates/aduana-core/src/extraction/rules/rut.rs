//! RUT (Rol Único Tributario) normalization and check digit validation.

/// Canonical RUT: thousands grouped with dots, upper-case check digit
/// (`15.970.128-K`).
///
/// Spaces, dots and commas in the body are discarded. Input that does not
/// look like a RUT is returned trimmed and upper-cased.
pub fn normalize_rut(raw: &str) -> String {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    let Some((body, dv)) = split_rut(&compact) else {
        return compact;
    };

    format!("{}-{}", group_thousands(&body), dv)
}

/// Validate a RUT with the modulo 11 check digit.
///
/// Extraction never rejects a RUT on its check digit; this is offered to
/// callers that want to flag suspicious values.
pub fn verify_rut(rut: &str) -> bool {
    let compact: String = rut
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    let Some((body, dv)) = split_rut(&compact) else {
        return false;
    };

    expected_check_digit(&body) == Some(dv)
}

/// Check digit for a RUT body (digits only).
pub fn expected_check_digit(body: &str) -> Option<char> {
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let weights = [2, 3, 4, 5, 6, 7];
    let sum: u32 = body
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .zip(weights.iter().cycle())
        .map(|(d, w)| d * w)
        .sum();

    match 11 - (sum % 11) {
        11 => Some('0'),
        10 => Some('K'),
        n => char::from_digit(n, 10),
    }
}

fn split_rut(compact: &str) -> Option<(String, char)> {
    let (body, dv) = match compact.rsplit_once('-') {
        Some((body, dv)) => (body, dv),
        // OCR often drops the dash before a K
        None if compact.ends_with('K') => compact.split_at(compact.len() - 1),
        None => return None,
    };

    let mut dv_chars = dv.chars();
    let dv = dv_chars.next()?;
    if dv_chars.next().is_some() || !(dv.is_ascii_digit() || dv == 'K') {
        return None;
    }

    if !body.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return None;
    }
    let digits: String = body.chars().filter(|c| c.is_ascii_digit()).collect();
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() || digits.len() > 9 {
        return None;
    }

    Some((digits.to_string(), dv))
}

fn group_thousands(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut grouped = String::with_capacity(chars.len() + 3);
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }
    grouped
}
