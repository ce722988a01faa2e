//! Checkout form validation.
//!
//! Every field is checked and all failures are reported together, one message
//! per field. Lengths count Unicode scalar values of the trimmed input.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use artesania_core::{Email, EmailError};

/// Raw checkout form as submitted by the browser.
///
/// Missing fields deserialize as empty strings so they fail validation with a
/// field message instead of rejecting the whole request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub notes: Option<String>,
}

/// Form fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutField {
    FirstName,
    LastName,
    Email,
    Phone,
    Address,
    City,
    Province,
    PostalCode,
    Notes,
}

impl CheckoutField {
    pub const ALL: [Self; 9] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Phone,
        Self::Address,
        Self::City,
        Self::Province,
        Self::PostalCode,
        Self::Notes,
    ];

    /// The HTML form field name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::City => "city",
            Self::Province => "province",
            Self::PostalCode => "postal_code",
            Self::Notes => "notes",
        }
    }
}

/// Field-level validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<CheckoutField, &'static str>);

impl FieldErrors {
    /// The message for a field, looked up by its form name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'static str> {
        self.0
            .iter()
            .find(|(field, _)| field.name() == name)
            .map(|(_, message)| *message)
    }

    /// The message for a field.
    #[must_use]
    pub fn message(&self, field: CheckoutField) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    #[must_use]
    pub fn contains(&self, field: CheckoutField) -> bool {
        self.0.contains_key(&field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CheckoutField, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }

    fn insert(&mut self, field: CheckoutField, message: &'static str) {
        self.0.insert(field, message);
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.keys().map(CheckoutField::name).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

/// Validated contact and shipping details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub notes: Option<String>,
}

impl ShippingDetails {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Length bounds of a trimmed text field and the messages for each side.
struct LengthRule {
    min: usize,
    max: usize,
    too_short: &'static str,
    too_long: &'static str,
}

const FIRST_NAME: LengthRule = LengthRule {
    min: 2,
    max: 100,
    too_short: "El nombre debe tener al menos 2 caracteres",
    too_long: "El nombre es demasiado largo",
};

const LAST_NAME: LengthRule = LengthRule {
    min: 2,
    max: 100,
    too_short: "El apellido debe tener al menos 2 caracteres",
    too_long: "El apellido es demasiado largo",
};

const PHONE: LengthRule = LengthRule {
    min: 8,
    max: 20,
    too_short: "Teléfono inválido",
    too_long: "Teléfono demasiado largo",
};

const ADDRESS: LengthRule = LengthRule {
    min: 5,
    max: 200,
    too_short: "La dirección es muy corta",
    too_long: "La dirección es demasiado larga",
};

const CITY: LengthRule = LengthRule {
    min: 2,
    max: 100,
    too_short: "Ciudad requerida",
    too_long: "Ciudad demasiado larga",
};

const PROVINCE: LengthRule = LengthRule {
    min: 2,
    max: 100,
    too_short: "Provincia requerida",
    too_long: "Provincia demasiado larga",
};

const POSTAL_CODE: LengthRule = LengthRule {
    min: 4,
    max: 10,
    too_short: "Código postal inválido",
    too_long: "Código postal inválido",
};

const EMAIL_INVALID: &str = "Email inválido";
const EMAIL_TOO_LONG: &str = "El email es demasiado largo";

const NOTES_MAX: usize = 500;
const NOTES_TOO_LONG: &str = "Las notas son demasiado largas";

impl LengthRule {
    fn check(&self, raw: &str) -> Result<String, &'static str> {
        let value = raw.trim();
        let len = value.chars().count();
        if len < self.min {
            Err(self.too_short)
        } else if len > self.max {
            Err(self.too_long)
        } else {
            Ok(value.to_owned())
        }
    }
}

fn check_email(raw: &str) -> Result<Email, &'static str> {
    match Email::parse(raw.trim()) {
        Ok(email) => Ok(email),
        Err(EmailError::TooLong { .. }) => Err(EMAIL_TOO_LONG),
        Err(_) => Err(EMAIL_INVALID),
    }
}

fn check_notes(raw: Option<&str>) -> Result<Option<String>, &'static str> {
    let Some(notes) = raw else {
        return Ok(None);
    };
    if notes.chars().count() > NOTES_MAX {
        return Err(NOTES_TOO_LONG);
    }
    let trimmed = notes.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_owned()))
}

impl CheckoutForm {
    /// Validate every field.
    ///
    /// # Errors
    ///
    /// Returns the messages of every field that failed.
    pub fn validate(&self) -> Result<ShippingDetails, FieldErrors> {
        let mut errors = FieldErrors::default();
        let mut field = |field: CheckoutField, result: Result<String, &'static str>| {
            result.map_err(|message| errors.insert(field, message)).ok()
        };

        let first_name = field(CheckoutField::FirstName, FIRST_NAME.check(&self.first_name));
        let last_name = field(CheckoutField::LastName, LAST_NAME.check(&self.last_name));
        let phone = field(CheckoutField::Phone, PHONE.check(&self.phone));
        let address = field(CheckoutField::Address, ADDRESS.check(&self.address));
        let city = field(CheckoutField::City, CITY.check(&self.city));
        let province = field(CheckoutField::Province, PROVINCE.check(&self.province));
        let postal_code = field(CheckoutField::PostalCode, POSTAL_CODE.check(&self.postal_code));

        let email = check_email(&self.email)
            .map_err(|message| errors.insert(CheckoutField::Email, message))
            .ok();
        let notes = check_notes(self.notes.as_deref())
            .map_err(|message| errors.insert(CheckoutField::Notes, message))
            .ok();

        match (
            first_name,
            last_name,
            email,
            phone,
            address,
            city,
            province,
            postal_code,
            notes,
        ) {
            (
                Some(first_name),
                Some(last_name),
                Some(email),
                Some(phone),
                Some(address),
                Some(city),
                Some(province),
                Some(postal_code),
                Some(notes),
            ) if errors.is_empty() => Ok(ShippingDetails {
                first_name,
                last_name,
                email,
                phone,
                address,
                city,
                province,
                postal_code,
                notes,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn valid_form() -> CheckoutForm {
        CheckoutForm {
            first_name: "Lucía".to_owned(),
            last_name: "Fernández".to_owned(),
            email: "lucia@example.com.ar".to_owned(),
            phone: "+54 351 456 7890".to_owned(),
            address: "Av. Hipólito Yrigoyen 456".to_owned(),
            city: "Córdoba".to_owned(),
            province: "Córdoba".to_owned(),
            postal_code: "X5000".to_owned(),
            notes: None,
        }
    }

    #[test]
    fn test_valid_form_passes() {
        let details = valid_form().validate().unwrap();
        assert_eq!(details.full_name(), "Lucía Fernández");
        assert_eq!(details.email.as_str(), "lucia@example.com.ar");
        assert_eq!(details.notes, None);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let form = CheckoutForm {
            first_name: "  Ana  ".to_owned(),
            email: "  ana@example.com ".to_owned(),
            ..valid_form()
        };
        let details = form.validate().unwrap();
        assert_eq!(details.first_name, "Ana");
        assert_eq!(details.email.as_str(), "ana@example.com");
    }

    #[test]
    fn test_whitespace_padding_does_not_count_toward_length() {
        let form = CheckoutForm {
            first_name: "   A   ".to_owned(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.message(CheckoutField::FirstName),
            Some("El nombre debe tener al menos 2 caracteres")
        );
    }

    #[test]
    fn test_invalid_email() {
        let form = CheckoutForm {
            email: "not-an-email".to_owned(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some("Email inválido"));
    }

    #[test]
    fn test_email_too_long() {
        let form = CheckoutForm {
            email: format!("{}@example.com", "a".repeat(250)),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("El email es demasiado largo"));
    }

    #[test]
    fn test_long_malformed_email_is_invalid() {
        let form = CheckoutForm {
            email: "x".repeat(300),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Email inválido"));
    }

    #[test]
    fn test_length_boundaries() {
        let cases: [(CheckoutField, usize, usize); 7] = [
            (CheckoutField::FirstName, 2, 100),
            (CheckoutField::LastName, 2, 100),
            (CheckoutField::Phone, 8, 20),
            (CheckoutField::Address, 5, 200),
            (CheckoutField::City, 2, 100),
            (CheckoutField::Province, 2, 100),
            (CheckoutField::PostalCode, 4, 10),
        ];

        for (field, min, max) in cases {
            let with = |len: usize| {
                let value = "ñ".repeat(len);
                let mut form = valid_form();
                match field {
                    CheckoutField::FirstName => form.first_name = value,
                    CheckoutField::LastName => form.last_name = value,
                    CheckoutField::Phone => form.phone = value,
                    CheckoutField::Address => form.address = value,
                    CheckoutField::City => form.city = value,
                    CheckoutField::Province => form.province = value,
                    CheckoutField::PostalCode => form.postal_code = value,
                    CheckoutField::Email | CheckoutField::Notes => unreachable!(),
                }
                form.validate()
            };

            assert!(with(min).is_ok(), "{field:?} at min");
            assert!(with(max).is_ok(), "{field:?} at max");
            assert!(with(min - 1).unwrap_err().contains(field), "{field:?} below min");
            assert!(with(max + 1).unwrap_err().contains(field), "{field:?} above max");
        }
    }

    #[test]
    fn test_messages_match_field_rules() {
        let form = CheckoutForm {
            last_name: "x".repeat(101),
            phone: "123".to_owned(),
            address: "Av".to_owned(),
            city: String::new(),
            province: String::new(),
            postal_code: "12345678901".to_owned(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();

        assert_eq!(errors.get("last_name"), Some("El apellido es demasiado largo"));
        assert_eq!(errors.get("phone"), Some("Teléfono inválido"));
        assert_eq!(errors.get("address"), Some("La dirección es muy corta"));
        assert_eq!(errors.get("city"), Some("Ciudad requerida"));
        assert_eq!(errors.get("province"), Some("Provincia requerida"));
        assert_eq!(errors.get("postal_code"), Some("Código postal inválido"));
        assert_eq!(errors.get("first_name"), None);
    }

    #[test]
    fn test_empty_form_reports_every_required_field() {
        let errors = CheckoutForm::default().validate().unwrap_err();
        let fields: Vec<CheckoutField> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(fields, CheckoutField::ALL[..8].to_vec());
    }

    #[test]
    fn test_notes_optional_and_bounded() {
        let blank = CheckoutForm {
            notes: Some("   ".to_owned()),
            ..valid_form()
        };
        assert_eq!(blank.validate().unwrap().notes, None);

        let at_limit = CheckoutForm {
            notes: Some("n".repeat(500)),
            ..valid_form()
        };
        assert_eq!(at_limit.validate().unwrap().notes.unwrap().len(), 500);

        let too_long = CheckoutForm {
            notes: Some("n".repeat(501)),
            ..valid_form()
        };
        assert_eq!(
            too_long.validate().unwrap_err().get("notes"),
            Some("Las notas son demasiado largas")
        );
    }

    #[test]
    fn test_missing_fields_deserialize_as_empty() {
        let form: CheckoutForm = serde_json::from_str(r#"{"first_name":"Ana"}"#).unwrap();
        assert_eq!(form.first_name, "Ana");
        assert!(form.last_name.is_empty());
        assert!(form.notes.is_none());
    }
}
