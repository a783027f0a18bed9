use std::fmt::Write;

/// Render headers plus rows as CSV text with standard quoting.
pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut csv = String::new();

    let _ = writeln!(
        csv,
        "{}",
        headers
            .iter()
            .map(|h| escape(h))
            .collect::<Vec<_>>()
            .join(",")
    );

    for row in rows {
        let _ = writeln!(
            csv,
            "{}",
            row.iter().map(|v| escape(v)).collect::<Vec<_>>().join(",")
        );
    }

    csv
}

fn escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_values_pass_through() {
        let out = render(&["a", "b"], &[vec!["1".into(), "2".into()]]);
        assert_eq!(out, "a,b\n1,2\n");
    }

    #[test]
    fn quotes_commas_and_doubles_quotes() {
        let out = render(
            &["note"],
            &[vec!["has, comma".into()], vec!["has \"quote\"".into()]],
        );
        assert_eq!(out, "note\n\"has, comma\"\n\"has \"\"quote\"\"\"\n");
    }

    #[test]
    fn quotes_embedded_newlines() {
        let out = render(&["note"], &[vec!["line1\nline2".into()]]);
        assert_eq!(out, "note\n\"line1\nline2\"\n");
    }
}
