//! Personnel identity matching
//!
//! Source spreadsheets carry employee names as free text with inconsistent
//! casing, spacing, diacritics, and sometimes reversed word order. This
//! module reconciles a raw name string against the canonical roster.

use sevkiyat_types::{normalize_text, PersonnelRecord};

/// Normalize a name for comparison: uppercase, Turkish diacritics folded to
/// ASCII, punctuation stripped, whitespace collapsed.
pub fn normalize_name(raw: &str) -> String {
    normalize_text(raw)
}

/// Resolve a free-text name to a roster entry.
///
/// Rules are tried in order; the first roster hit (in roster iteration
/// order) wins:
/// 1. Exact string equality
/// 2. Normalized equality
/// 3. Normalized equality with all whitespace stripped
/// 4. Token-set equality (same words, any order)
/// 5. Substring containment either direction on normalized strings
pub fn match_personnel<'a>(
    raw: &str,
    roster: &'a [PersonnelRecord],
) -> Option<&'a PersonnelRecord> {
    // Rule 1: exact
    if let Some(p) = roster.iter().find(|p| p.full_name == raw) {
        return Some(p);
    }

    let norm = normalize_name(raw);
    if norm.is_empty() {
        return None;
    }

    // Rule 2: normalized
    if let Some(p) = roster.iter().find(|p| normalize_name(&p.full_name) == norm) {
        return Some(p);
    }

    // Rule 3: whitespace-stripped, for sheets that split or join names
    // arbitrarily ("Ahmet Yıl maz", "ahmetyilmaz")
    let squeezed = norm.replace(' ', "");
    if let Some(p) = roster
        .iter()
        .find(|p| normalize_name(&p.full_name).replace(' ', "") == squeezed)
    {
        return Some(p);
    }

    // Rule 4: same tokens in any order
    let mut tokens: Vec<&str> = norm.split(' ').collect();
    tokens.sort_unstable();
    if let Some(p) = roster.iter().find(|p| {
        let pn = normalize_name(&p.full_name);
        let mut ptokens: Vec<&str> = pn.split(' ').collect();
        ptokens.sort_unstable();
        ptokens == tokens
    }) {
        return Some(p);
    }

    // Rule 5: substring containment either direction
    roster.iter().find(|p| {
        let pn = normalize_name(&p.full_name);
        !pn.is_empty() && (pn.contains(&norm) || norm.contains(&pn))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<PersonnelRecord> {
        vec![
            PersonnelRecord::new("Ahmet Yılmaz").with_employee_code("E1"),
            PersonnelRecord::new("Mehmet Demir").with_employee_code("E2"),
            PersonnelRecord::new("Ayşe Şahin Kaya").with_employee_code("E3"),
        ]
    }

    #[test]
    fn test_exact_match() {
        let roster = roster();
        let p = match_personnel("Ahmet Yılmaz", &roster).unwrap();
        assert_eq!(p.employee_code.as_deref(), Some("E1"));
    }

    #[test]
    fn test_normalization_invariance() {
        let roster = roster();
        // All spellings of the same name resolve to the same roster entry
        for raw in ["Ahmet  Yılmaz", "AHMET YILMAZ", "ahmet yilmaz", "ahmetyilmaz"] {
            let p = match_personnel(raw, &roster)
                .unwrap_or_else(|| panic!("no match for {:?}", raw));
            assert_eq!(p.employee_code.as_deref(), Some("E1"), "raw={:?}", raw);
        }
    }

    #[test]
    fn test_token_order_invariance() {
        let roster = roster();
        let p = match_personnel("Yılmaz Ahmet", &roster).unwrap();
        assert_eq!(p.employee_code.as_deref(), Some("E1"));

        let p = match_personnel("Kaya Ayşe Şahin", &roster).unwrap();
        assert_eq!(p.employee_code.as_deref(), Some("E3"));
    }

    #[test]
    fn test_substring_fallback() {
        let roster = roster();
        // Middle name dropped in the sheet
        let p = match_personnel("Ayşe Şahin", &roster).unwrap();
        assert_eq!(p.employee_code.as_deref(), Some("E3"));
    }

    #[test]
    fn test_no_match_returns_none() {
        let roster = roster();
        assert!(match_personnel("Hasan Çelik", &roster).is_none());
        assert!(match_personnel("", &roster).is_none());
        assert!(match_personnel("   ", &roster).is_none());
    }

    #[test]
    fn test_first_roster_hit_wins() {
        let roster = vec![
            PersonnelRecord::new("Ali Kaya").with_employee_code("A"),
            PersonnelRecord::new("Ali Kaya").with_employee_code("B"),
        ];
        let p = match_personnel("ali kaya", &roster).unwrap();
        assert_eq!(p.employee_code.as_deref(), Some("A"));
    }
}
