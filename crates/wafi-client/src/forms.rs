//! Checkout and registration form validation, run before submitting.

use wafi_domain::validate::{is_email, is_person_name, is_phone_number};

use crate::error::ClientError;
use crate::model::{CustomerContact, FieldMessage};

pub const MIN_PASSWORD_LEN: usize = 8;

fn check(errors: Vec<FieldMessage>) -> Result<(), ClientError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ClientError::Validation(errors))
    }
}

// ── Checkout ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
}

impl CheckoutForm {
    pub fn validate(&self) -> Vec<FieldMessage> {
        let mut errors = Vec::new();
        name_rule(&mut errors, "first_name", &self.first_name, "Le prénom");
        name_rule(&mut errors, "last_name", &self.last_name, "Le nom");
        let phone = self.phone.trim();
        if phone.is_empty() {
            errors.push(FieldMessage::new(
                "phone",
                "Le numéro de téléphone est requis.",
            ));
        } else if !is_phone_number(phone) {
            errors.push(FieldMessage::new(
                "phone",
                "Le numéro de téléphone ne doit contenir que des chiffres.",
            ));
        }
        errors
    }

    /// Trimmed contact, or the per-field errors.
    pub fn into_contact(self) -> Result<CustomerContact, ClientError> {
        check(self.validate())?;
        let address = self.address.trim();
        Ok(CustomerContact {
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            address: (!address.is_empty()).then(|| address.to_owned()),
        })
    }
}

fn name_rule(errors: &mut Vec<FieldMessage>, field: &str, value: &str, label: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.push(FieldMessage::new(field, format!("{label} est requis.")));
    } else if !is_person_name(value) {
        errors.push(FieldMessage::new(
            field,
            format!("{label} ne doit contenir que des lettres."),
        ));
    }
}

// ── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Vec<FieldMessage> {
        let mut errors = Vec::new();
        for (field, value) in [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
        ] {
            if value.trim().is_empty() {
                errors.push(FieldMessage::new(field, "Ce champ est requis."));
            } else if !is_person_name(value.trim()) {
                errors.push(FieldMessage::new(
                    field,
                    "Seules les lettres et les espaces sont autorisés.",
                ));
            }
        }
        let email = self.email.trim();
        if email.is_empty() {
            errors.push(FieldMessage::new("email", "L'email est requis."));
        } else if !is_email(email) {
            errors.push(FieldMessage::new(
                "email",
                "Veuillez saisir une adresse email valide.",
            ));
        }
        if self.password.is_empty() {
            errors.push(FieldMessage::new("password", "Le mot de passe est requis."));
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(FieldMessage::new(
                "password",
                format!("Le mot de passe doit contenir au moins {MIN_PASSWORD_LEN} caractères."),
            ));
        }
        errors
    }

    pub fn check(&self) -> Result<(), ClientError> {
        check(self.validate())
    }
}

/// Indicator shown under the password field while typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    pub fn label(self) -> &'static str {
        match self {
            Self::Weak => "Faible",
            Self::Medium => "Moyen",
            Self::Strong => "Fort",
        }
    }
}

/// One point each for length, mixed case, a digit and a symbol. `None` for
/// an empty password.
pub fn password_strength(password: &str) -> Option<PasswordStrength> {
    if password.is_empty() {
        return None;
    }
    let has = |pred: fn(&char) -> bool| password.chars().any(|c| pred(&c));
    let score = [
        password.chars().count() >= MIN_PASSWORD_LEN,
        has(char::is_ascii_lowercase) && has(char::is_ascii_uppercase),
        has(char::is_ascii_digit),
        has(|c| !c.is_ascii_alphanumeric()),
    ]
    .into_iter()
    .filter(|&hit| hit)
    .count();

    Some(match score {
        0 | 1 => PasswordStrength::Weak,
        2 | 3 => PasswordStrength::Medium,
        _ => PasswordStrength::Strong,
    })
}
