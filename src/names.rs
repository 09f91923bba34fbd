//! Field-name cleaning.
//!
//! Tableau refers to fields with bracket-qualified identifiers such as
//! `[federated.0x1].[sum:Profit:qk]` or `[Region]`. Display names and
//! cross-datasource comparisons use the cleaned form.

/// Clean a raw field identifier for display and comparison.
///
/// A leading `[A].[B]` pattern yields `B`; anything else has every bracket removed.
/// The result never contains brackets, so cleaning is idempotent.
pub fn clean_field_name(raw: &str) -> String {
    match qualified_field(raw) {
        Some(field) => field.replace('[', ""),
        None => raw.replace(|c: char| c == '[' || c == ']', ""),
    }
}

/// Second component of a leading `[A].[B]` pattern.
///
/// `A` is the shortest run before the first `].[`; `B` runs to the next `]`.
/// Neither component may span a line break.
fn qualified_field(raw: &str) -> Option<&str> {
    let rest = raw.strip_prefix('[')?;
    let sep = rest.find("].[")?;
    let qualifier = rest.get(..sep)?;
    if qualifier.contains('\n') {
        return None;
    }
    let tail = rest.get(sep + 3..)?;
    let end = tail.find(']')?;
    let field = tail.get(..end)?;
    if field.contains('\n') {
        return None;
    }
    Some(field)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("[Datasource].[Field Name]", "Field Name" ; "qualified")]
    #[test_case("[Field Name]", "Field Name" ; "single bracket")]
    #[test_case("Field Name", "Field Name" ; "bare")]
    #[test_case("[Sales].[Profit]", "Profit" ; "sales profit")]
    #[test_case("[federated.0x1].[sum:Profit:qk]", "sum:Profit:qk" ; "federated instance")]
    #[test_case("[A].[B].[C]", "B" ; "three parts keeps second")]
    #[test_case("[A].[B]trailing", "B" ; "trailing text ignored")]
    #[test_case("[Parameters].[Parameter 1]", "Parameter 1" ; "parameter")]
    #[test_case("[x].[y", "x.y" ; "unterminated second part")]
    #[test_case("x.[y]", "x.y" ; "no leading bracket")]
    #[test_case("[a].[[b]", "b" ; "nested opening bracket")]
    #[test_case("[li\nne].[b]", "li\nne.b" ; "qualifier spans line")]
    #[test_case("", "" ; "empty")]
    fn test_clean_field_name(raw: &str, expected: &str) {
        assert_eq!(clean_field_name(raw), expected);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let inputs = [
            "[Datasource].[Field Name]",
            "[Field Name]",
            "[a].[[b]",
            "[[x]].[[y]]",
            "]].[[",
            "[x].[y",
            "plain",
            "[A].[B].[C]",
        ];
        for raw in inputs {
            let once = clean_field_name(raw);
            assert_eq!(clean_field_name(&once), once, "input {raw:?}");
        }
    }
}
