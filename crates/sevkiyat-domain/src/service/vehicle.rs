//! Vehicle classification and trip-sequence decoding
//!
//! Plates in the source sheets encode a trip sequence as a numeric suffix:
//! `34ABC123-2` is the second run of that vehicle on the day. The suffix is
//! a deterministic decode, not a heuristic.

use sevkiyat_types::{normalize_text, RegisteredVehicle, VehicleType};

/// Trip number encoded in the plate tail, if any.
///
/// Trip suffixes are short run counters (1-2 digits); a longer digit block
/// after a hyphen is part of the plate itself, as in "34-ABC-123".
fn trip_suffix(plate: &str) -> Option<u32> {
    let (_, tail) = plate.trim().rsplit_once('-')?;
    if tail.is_empty() || tail.len() > 2 || !tail.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    tail.parse().ok()
}

/// Strip the `-N` trip suffix and normalize spacing, giving the plate as it
/// appears in the vehicle registry.
pub fn base_plate(plate: &str) -> String {
    let trimmed = plate.trim();
    let base = match trimmed.rsplit_once('-') {
        Some((head, _)) if trip_suffix(trimmed).is_some() => head,
        _ => trimmed,
    };
    normalize_text(base).replace(' ', "")
}

/// Number of "double trips" encoded in the plate suffix.
///
/// Trip number N implies N-1 double trips; a plate without a trip suffix
/// counts as trip 1.
pub fn double_trip_count(plate: &str) -> u32 {
    match trip_suffix(plate) {
        Some(n) if n >= 1 => n - 1,
        _ => 0,
    }
}

/// Infer the vehicle category for a delivery row.
///
/// Precedence: a recognized explicit type field wins; else the registry is
/// consulted by normalized base plate; else keywords embedded in the plate
/// string; else trucks are assumed.
pub fn classify_vehicle(
    plate: &str,
    explicit_type: Option<&str>,
    registry: &[RegisteredVehicle],
) -> VehicleType {
    if let Some(text) = explicit_type {
        let parsed = VehicleType::from_text(text);
        if parsed != VehicleType::Unknown {
            return parsed;
        }
    }

    let base = base_plate(plate);
    if !base.is_empty() {
        if let Some(v) = registry.iter().find(|v| base_plate(&v.license_plate) == base) {
            return v.vehicle_type;
        }
    }

    let keyword = VehicleType::from_text(plate);
    if keyword != VehicleType::Unknown {
        return keyword;
    }

    VehicleType::Truck
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_trip_decode() {
        assert_eq!(double_trip_count("34ABC123"), 0);
        assert_eq!(double_trip_count("34ABC123-1"), 0);
        assert_eq!(double_trip_count("34ABC123-2"), 1);
        assert_eq!(double_trip_count("34ABC123-3"), 2);
        assert_eq!(double_trip_count(""), 0);
        assert_eq!(double_trip_count("34ABC123-x"), 0);
        // Two-digit run counter still decodes
        assert_eq!(double_trip_count("34ABC123-12"), 11);
        // A long digit block is a plate segment, not a run counter
        assert_eq!(double_trip_count("34-ABC-123"), 0);
    }

    #[test]
    fn test_base_plate_strips_suffix_and_spacing() {
        assert_eq!(base_plate("34 ABC 123-2"), "34ABC123");
        assert_eq!(base_plate("34abc123"), "34ABC123");
        assert_eq!(base_plate("34 ABC 123-12"), "34ABC123");
        // Hyphenated plate segments survive, only short run counters strip
        assert_eq!(base_plate("34-ABC-123"), "34ABC123");
        assert_eq!(base_plate("34-ABC"), "34ABC");
    }

    #[test]
    fn test_explicit_type_wins() {
        let registry = vec![RegisteredVehicle::new("34ABC123", VehicleType::Truck)];
        let vt = classify_vehicle("34ABC123", Some("kamyonet"), &registry);
        assert_eq!(vt, VehicleType::Van);
    }

    #[test]
    fn test_unrecognized_explicit_falls_through() {
        let registry = vec![RegisteredVehicle::new("34ABC123", VehicleType::PanelVan)];
        let vt = classify_vehicle("34 ABC 123-2", Some("bisiklet"), &registry);
        assert_eq!(vt, VehicleType::PanelVan);
    }

    #[test]
    fn test_registry_lookup_ignores_suffix() {
        let registry = vec![RegisteredVehicle::new("34 ABC 123", VehicleType::Van)];
        assert_eq!(classify_vehicle("34ABC123-3", None, &registry), VehicleType::Van);
    }

    #[test]
    fn test_keyword_fallback() {
        assert_eq!(classify_vehicle("PANELVAN 06XY89", None, &[]), VehicleType::PanelVan);
    }

    #[test]
    fn test_default_is_truck() {
        assert_eq!(classify_vehicle("34ZZZ999", None, &[]), VehicleType::Truck);
    }
}
