//! Formatting helpers shared by the report writers

use eda_core::format_float;

/// `1234567.891` → `1,234,567.89`
pub fn thousands(v: f64) -> String {
    if !v.is_finite() {
        return format_float(v);
    }
    let fixed = format!("{:.2}", v.abs());
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if v < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

/// `[1.0, 2.5]`
pub fn float_list(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format_float(*v)).collect();
    format!("[{}]", parts.join(", "))
}

/// `['a', 'b']`
pub fn name_list<S: AsRef<str>>(names: &[S]) -> String {
    let parts: Vec<String> = names.iter().map(|n| format!("'{}'", n.as_ref())).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(1234567.891), "1,234,567.89");
        assert_eq!(thousands(999.0), "999.00");
        assert_eq!(thousands(1000.0), "1,000.00");
        assert_eq!(thousands(-12345.5), "-12,345.50");
        assert_eq!(thousands(0.0), "0.00");
        assert_eq!(thousands(f64::NAN), "NaN");
    }

    #[test]
    fn test_lists() {
        assert_eq!(float_list(&[1.0, 2.5]), "[1.0, 2.5]");
        assert_eq!(float_list(&[]), "[]");
        assert_eq!(name_list(&["Poland", "Hungary"]), "['Poland', 'Hungary']");
    }
}
