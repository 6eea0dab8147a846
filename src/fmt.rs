use bigdecimal::BigDecimal;

/// Format a decimal as a won amount with thousands separators: ₩1,234,567
pub fn money(val: &BigDecimal) -> String {
    let text = val.normalized().to_string();
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, dec_part) = match body.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (body, None),
    };

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    match dec_part {
        Some(d) => format!("{sign}₩{with_commas}.{d}"),
        None => format!("{sign}₩{with_commas}"),
    }
}
