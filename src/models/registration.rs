use serde::{Deserialize, Serialize};

/// Column names of the registration table, in persisted order.
pub const FIELD_NAMES: [&str; 6] = [
    "Owner Name",
    "Contact Number",
    "Vehicle Number",
    "Emergency Contact",
    "Relationship",
    "Blood Group",
];

/// One vehicle owner's record, keyed by `vehicle_number`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub owner_name: String,
    pub contact_number: String,
    pub vehicle_number: String,
    pub emergency_contact: String,
    pub relationship: String,
    pub blood_group: String,
}

impl Registration {
    /// Field values in the same order as [`FIELD_NAMES`].
    pub fn values(&self) -> [&str; 6] {
        [
            &self.owner_name,
            &self.contact_number,
            &self.vehicle_number,
            &self.emergency_contact,
            &self.relationship,
            &self.blood_group,
        ]
    }

    /// Build a registration from a row of cells. Missing trailing cells are empty.
    pub fn from_cells<'a, I>(cells: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut cells = cells.into_iter().map(str::to_string);
        let mut next = || cells.next().unwrap_or_default();
        Self {
            owner_name: next(),
            contact_number: next(),
            vehicle_number: next(),
            emergency_contact: next(),
            relationship: next(),
            blood_group: next(),
        }
    }

    /// `"Key: Value"` pairs joined by `" | "`, the text encoded in the sticker QR code.
    pub fn qr_payload(&self) -> String {
        FIELD_NAMES
            .iter()
            .zip(self.values())
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Registration {
        Registration {
            owner_name: "A Kumar".into(),
            contact_number: "9999999999".into(),
            vehicle_number: "KA01AB1234".into(),
            emergency_contact: "8888888888".into(),
            relationship: "Spouse".into(),
            blood_group: "O+".into(),
        }
    }

    #[test]
    fn payload_joins_fields_in_column_order() {
        assert_eq!(
            sample().qr_payload(),
            "Owner Name: A Kumar | Contact Number: 9999999999 | Vehicle Number: KA01AB1234 | \
             Emergency Contact: 8888888888 | Relationship: Spouse | Blood Group: O+"
        );
    }

    #[test]
    fn payload_keeps_empty_and_unicode_values() {
        let registration = Registration {
            owner_name: "अमित".into(),
            relationship: "Père | fils".into(),
            ..Registration::default()
        };
        assert_eq!(
            registration.qr_payload(),
            "Owner Name: अमित | Contact Number:  | Vehicle Number:  | \
             Emergency Contact:  | Relationship: Père | fils | Blood Group: "
        );
    }

    #[test]
    fn from_cells_pads_short_rows() {
        let registration = Registration::from_cells(["A", "1", "KA01"]);
        assert_eq!(registration.vehicle_number, "KA01");
        assert_eq!(registration.blood_group, "");
    }

    #[test]
    fn values_follow_field_names() {
        let registration = sample();
        let paired: Vec<_> = FIELD_NAMES.iter().zip(registration.values()).collect();
        assert_eq!(paired[2], (&"Vehicle Number", "KA01AB1234"));
        assert_eq!(paired[5], (&"Blood Group", "O+"));
    }
}
