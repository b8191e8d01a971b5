//! Human-readable value formatting.
//!
//! The category of an indicator is inferred from its display label. Rules are
//! checked in order and the first match wins; new categories go at the end of
//! the list so shipped indicators keep their formatting.
//!
//! Percentage indicators are assumed to already be expressed in percent
//! (`5.2` means 5.2%). An indicator reporting fractions would be mis-scaled.

const TRILLION: f64 = 1e12;
const BILLION: f64 = 1e9;

/// Format an optional observation for display under `indicator_label`.
pub fn format_value(value: Option<f64>, indicator_label: &str) -> String {
    let Some(v) = value else {
        return "No data".to_string();
    };

    if indicator_label.contains("GDP") && !indicator_label.contains('%') {
        if v >= TRILLION {
            format!("${:.2} trillion", v / TRILLION)
        } else if v >= BILLION {
            format!("${:.2} billion", v / BILLION)
        } else {
            format!("${}", group_thousands(v, 0))
        }
    } else if indicator_label.contains('%') {
        format!("{v:.2}%")
    } else if indicator_label.contains("Population") {
        group_thousands(v, 0)
    } else {
        group_thousands(v, 2)
    }
}

/// Fixed-point rendering with `,` between each group of three integer digits.
fn group_thousands(v: f64, decimals: usize) -> String {
    let fixed = format!("{v:.decimals$}");
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3);
    out.push_str(sign);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const GDP: &str = "GDP (current US$)";
    const GDP_PC: &str = "GDP per capita (current US$)";
    const GDP_GROWTH: &str = "GDP growth (annual %)";
    const INFLATION: &str = "Inflation, consumer prices (annual %)";
    const POPULATION: &str = "Population, total";

    #[test]
    fn missing_value_is_no_data_for_every_label() {
        for label in [GDP, GDP_PC, GDP_GROWTH, INFLATION, POPULATION, "Anything else", ""] {
            assert_eq!(format_value(None, label), "No data");
        }
    }

    #[test]
    fn gdp_magnitudes() {
        assert_eq!(format_value(Some(2.5e12), GDP), "$2.50 trillion");
        assert_eq!(format_value(Some(1e12), GDP), "$1.00 trillion");
        assert_eq!(format_value(Some(3.4567e9), GDP), "$3.46 billion");
        assert_eq!(format_value(Some(48_912.7), GDP_PC), "$48,913");
        assert_eq!(format_value(Some(999.0), GDP_PC), "$999");
    }

    #[test]
    fn percent_labels_win_over_gdp() {
        assert_eq!(format_value(Some(5.2), INFLATION), "5.20%");
        assert_eq!(format_value(Some(-9.3), GDP_GROWTH), "-9.30%");
        assert_eq!(format_value(Some(4.0), "Unemployment, total (% of labor force)"), "4.00%");
    }

    #[test]
    fn population_is_grouped_without_symbol() {
        let s = format_value(Some(1_234_567.0), POPULATION);
        assert_eq!(s, "1,234,567");
        assert!(!s.contains('$'));
    }

    #[test]
    fn default_rule_keeps_two_decimals() {
        assert_eq!(format_value(Some(1234.5), "Exports of goods"), "1,234.50");
        assert_eq!(format_value(Some(0.0), "Exports of goods"), "0.00");
    }

    #[test]
    fn grouping_edge_cases() {
        assert_eq!(group_thousands(0.0, 0), "0");
        assert_eq!(group_thousands(100.0, 0), "100");
        assert_eq!(group_thousands(1000.0, 0), "1,000");
        assert_eq!(group_thousands(-1_234_567.891, 2), "-1,234,567.89");
        assert_eq!(group_thousands(999_999.999, 2), "1,000,000.00");
    }
}
