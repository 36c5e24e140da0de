//! Single-line CSV field splitting
//!
//! Each line is parsed on its own: quoted fields cannot span lines, which
//! matches the one-record-per-line layout of the source extracts.

/// Split one line into its comma-separated fields
///
/// A double quote toggles quoting, so commas inside quotes are kept and the
/// wrapping quotes are dropped. A doubled quote (`""`) yields one literal
/// quote. An empty line yields no fields at all.
pub fn parse_line(line: &str) -> Vec<String> {
    if line.is_empty() {
        return Vec::new();
    }

    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }

    fields.push(field);
    fields
}
