//! Postal address codec.
//!
//! The backend stores a customer's address as one free-form string, while the
//! storefront edits addresses as structured fields. This type bridges the two:
//! [`Display`](core::fmt::Display) renders the fields into the single stored
//! string, and [`Address::parse`] recovers the fields from it.
//!
//! The string format is a `", "`-joined list of segments. The first segment
//! may be a bare free-text description; every other segment is
//! `"Label: value"`. Example:
//!
//! ```text
//! Flat 2, Neighborhood: Moda, No: 14, District: Kadikoy
//! ```
//!
//! The codec is deliberately lossy, matching what the backend already holds:
//! unrecognized labels are dropped on parse, only the first unlabeled segment
//! is kept as the description, and a value that itself contains `", "` will
//! be mis-split. Do not "fix" these without migrating stored addresses.

use core::fmt;

/// A structured postal address.
///
/// All fields are optional; an empty string means the field is absent.
/// Whitespace-only fields are treated as absent when encoding.
///
/// ## Examples
///
/// ```
/// use bookstore_core::Address;
///
/// let address = Address {
///     description: "Flat 2".to_owned(),
///     district: "Kadikoy".to_owned(),
///     ..Address::default()
/// };
/// assert_eq!(address.to_string(), "Flat 2, District: Kadikoy");
/// assert_eq!(Address::parse(&address.to_string()), address);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    /// Free-text description; the only segment written without a label.
    pub description: String,
    pub neighborhood: String,
    pub building: String,
    pub building_no: String,
    pub floor: String,
    pub apartment_unit: String,
    pub district: String,
    pub province: String,
}

/// Segment separator in the encoded form.
const SEPARATOR: &str = ", ";

impl Address {
    /// Parse an address from its encoded string form.
    ///
    /// Never fails: segments that cannot be understood are dropped rather
    /// than reported. An empty input yields an all-empty address.
    ///
    /// Rules, per segment:
    /// - no `":"` → free-text description; only the first such segment is
    ///   kept, later ones are discarded
    /// - otherwise the text before the first `":"` is the label (trimmed,
    ///   lowercased) and the rest is the value (trimmed, internal colons
    ///   survive)
    /// - a label starting with `neighborhood` assigns the neighborhood;
    ///   `building`, `no`, `floor`, `unit`, `district`, and `province` match
    ///   exactly; anything else is dropped
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut address = Self::default();

        for segment in input.split(SEPARATOR).filter(|s| !s.is_empty()) {
            let Some((label, value)) = segment.split_once(':') else {
                if address.description.is_empty() {
                    address.description = segment.to_owned();
                }
                continue;
            };

            let label = label.trim().to_lowercase();
            let value = value.trim();

            let field = if label.starts_with("neighborhood") {
                &mut address.neighborhood
            } else {
                match label.as_str() {
                    "building" => &mut address.building,
                    "no" => &mut address.building_no,
                    "floor" => &mut address.floor,
                    "unit" => &mut address.apartment_unit,
                    "district" => &mut address.district,
                    "province" => &mut address.province,
                    _ => continue,
                }
            };
            *field = value.to_owned();
        }

        address
    }

    /// Fields in encode order, paired with their wire label. The description
    /// comes first and carries no label.
    fn segments(&self) -> [(Option<&'static str>, &str); 8] {
        [
            (None, &self.description),
            (Some("Neighborhood"), &self.neighborhood),
            (Some("Building"), &self.building),
            (Some("No"), &self.building_no),
            (Some("Floor"), &self.floor),
            (Some("Unit"), &self.apartment_unit),
            (Some("District"), &self.district),
            (Some("Province"), &self.province),
        ]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (label, value) in self.segments() {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            if !first {
                f.write_str(SEPARATOR)?;
            }
            match label {
                Some(label) => write!(f, "{label}: {value}")?,
                None => f.write_str(value)?,
            }
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_address() -> Address {
        Address {
            description: "Blue door around the back".to_owned(),
            neighborhood: "Moda".to_owned(),
            building: "Palmiye Apt".to_owned(),
            building_no: "14".to_owned(),
            floor: "3".to_owned(),
            apartment_unit: "7".to_owned(),
            district: "Kadikoy".to_owned(),
            province: "Istanbul".to_owned(),
        }
    }

    #[test]
    fn encode_empty_address_is_empty_string() {
        assert_eq!(Address::default().to_string(), "");
    }

    #[test]
    fn decode_empty_string_is_all_empty() {
        assert_eq!(Address::parse(""), Address::default());
    }

    #[test]
    fn encode_description_and_district() {
        let address = Address {
            description: "Flat 2".to_owned(),
            district: "Kadikoy".to_owned(),
            ..Address::default()
        };
        assert_eq!(address.to_string(), "Flat 2, District: Kadikoy");
    }

    #[test]
    fn decode_description_and_district() {
        let parsed = Address::parse("Flat 2, District: Kadikoy");
        assert_eq!(
            parsed,
            Address {
                description: "Flat 2".to_owned(),
                district: "Kadikoy".to_owned(),
                ..Address::default()
            }
        );
    }

    #[test]
    fn round_trip_reproduces_all_fields() {
        let address = full_address();
        assert_eq!(Address::parse(&address.to_string()), address);
    }

    #[test]
    fn round_trip_reproduces_partial_fields() {
        let address = Address {
            neighborhood: "Moda".to_owned(),
            building_no: "14".to_owned(),
            province: "Istanbul".to_owned(),
            ..Address::default()
        };
        assert_eq!(Address::parse(&address.to_string()), address);
    }

    #[test]
    fn encode_omits_whitespace_only_fields() {
        let address = Address {
            description: "   ".to_owned(),
            floor: "\t".to_owned(),
            district: "Kadikoy".to_owned(),
            ..Address::default()
        };
        assert_eq!(address.to_string(), "District: Kadikoy");
    }

    #[test]
    fn encode_trims_values() {
        let address = Address {
            district: "  Kadikoy  ".to_owned(),
            ..Address::default()
        };
        assert_eq!(address.to_string(), "District: Kadikoy");
    }

    #[test]
    fn decode_keeps_only_first_unlabeled_segment() {
        let parsed = Address::parse("Flat 2, some stray note, District: Kadikoy");
        assert_eq!(parsed.description, "Flat 2");
        assert_eq!(parsed.district, "Kadikoy");
        assert_eq!(parsed.neighborhood, "");
    }

    #[test]
    fn decode_drops_unrecognized_labels() {
        let parsed = Address::parse("Planet: Mars, District: Kadikoy");
        assert_eq!(parsed.district, "Kadikoy");
        assert_eq!(parsed.description, "");
        assert_eq!(parsed.province, "");
    }

    #[test]
    fn decode_matches_labels_case_insensitively() {
        let parsed = Address::parse("DISTRICT: Kadikoy, province: Istanbul");
        assert_eq!(parsed.district, "Kadikoy");
        assert_eq!(parsed.province, "Istanbul");
    }

    #[test]
    fn decode_matches_neighborhood_by_prefix() {
        let parsed = Address::parse("Neighborhood/Mahalle: Moda");
        assert_eq!(parsed.neighborhood, "Moda");
    }

    #[test]
    fn decode_keeps_internal_colons_in_values() {
        let parsed = Address::parse("No: 12:B");
        assert_eq!(parsed.building_no, "12:B");
    }

    #[test]
    fn decode_skips_empty_segments() {
        let parsed = Address::parse("Flat 2, , District: Kadikoy");
        assert_eq!(parsed.description, "Flat 2");
        assert_eq!(parsed.district, "Kadikoy");
    }

    #[test]
    fn comma_space_inside_a_value_missplits_on_decode() {
        // Known lossy limitation: the separator is not escaped, so a value
        // containing ", " breaks into extra segments and data is lost.
        let address = Address {
            description: "Next to the cafe, across the park".to_owned(),
            ..Address::default()
        };
        let parsed = Address::parse(&address.to_string());
        assert_eq!(parsed.description, "Next to the cafe");
        assert_eq!(parsed, Address {
            description: "Next to the cafe".to_owned(),
            ..Address::default()
        });
    }

    #[test]
    fn decode_overwrites_repeated_labels_with_last_value() {
        let parsed = Address::parse("District: Kadikoy, District: Besiktas");
        assert_eq!(parsed.district, "Besiktas");
    }

    #[test]
    fn labeled_segment_with_empty_value_stays_empty() {
        let parsed = Address::parse("Building: , District: Kadikoy");
        assert_eq!(parsed.building, "");
        assert_eq!(parsed.district, "Kadikoy");
    }
}
