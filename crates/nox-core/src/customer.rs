//! # Customer Info
//!
//! The checkout form record, its reducer, and form-level validation.
//!
//! ## Form Sections
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CustomerInfo                                                           │
//! │                                                                         │
//! │  Personal        firstName, lastName, email, phone          (required)  │
//! │  Delivery        address, city, state, zipCode              (required)  │
//! │                  addressLine2, country                      (optional)  │
//! │  Billing         billingAddressSame = true ──► section skipped          │
//! │                  billingAddressSame = false ──► address/city/state/zip  │
//! │  Account         createAccount = true ──► password + confirmPassword    │
//! │  Preferences     marketingOptIn, specialInstructions        (optional)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Persistence lives in `nox-store`; this module only knows the record.
//! The JSON shape (camelCase keys) is what gets written to local storage.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Country preselected on both address blocks.
pub const DEFAULT_COUNTRY: &str = "United States";

static EMAIL_SHAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"));

static PHONE_SHAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[\s\-()]*([0-9][\s\-()]*){10,}$").expect("Invalid phone regex")
});

static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}(-[0-9]{4})?$").expect("Invalid ZIP regex"));

// =============================================================================
// Record
// =============================================================================

/// Everything the checkout form collects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerInfo {
    // Personal
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,

    // Delivery address
    pub address: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,

    // Billing address (only used when billing_address_same is false)
    pub billing_address_same: bool,
    pub billing_address: String,
    pub billing_address_line2: String,
    pub billing_city: String,
    pub billing_state: String,
    pub billing_zip_code: String,
    pub billing_country: String,

    // Account
    pub create_account: bool,
    pub password: String,
    pub confirm_password: String,

    // Preferences
    pub marketing_opt_in: bool,
    pub special_instructions: String,
}

impl Default for CustomerInfo {
    fn default() -> Self {
        CustomerInfo {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            address_line2: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
            billing_address_same: true,
            billing_address: String::new(),
            billing_address_line2: String::new(),
            billing_city: String::new(),
            billing_state: String::new(),
            billing_zip_code: String::new(),
            billing_country: DEFAULT_COUNTRY.to_string(),
            create_account: false,
            password: String::new(),
            confirm_password: String::new(),
            marketing_opt_in: false,
            special_instructions: String::new(),
        }
    }
}

/// A text field of the form. Declaration order is form order, which is
/// also the order errors are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum CustomerField {
    FirstName,
    LastName,
    Email,
    Phone,
    Address,
    AddressLine2,
    City,
    State,
    ZipCode,
    Country,
    BillingAddress,
    BillingAddressLine2,
    BillingCity,
    BillingState,
    BillingZipCode,
    BillingCountry,
    Password,
    ConfirmPassword,
    SpecialInstructions,
}

impl CustomerField {
    /// The JSON key for this field.
    pub fn key(&self) -> &'static str {
        match self {
            CustomerField::FirstName => "firstName",
            CustomerField::LastName => "lastName",
            CustomerField::Email => "email",
            CustomerField::Phone => "phone",
            CustomerField::Address => "address",
            CustomerField::AddressLine2 => "addressLine2",
            CustomerField::City => "city",
            CustomerField::State => "state",
            CustomerField::ZipCode => "zipCode",
            CustomerField::Country => "country",
            CustomerField::BillingAddress => "billingAddress",
            CustomerField::BillingAddressLine2 => "billingAddressLine2",
            CustomerField::BillingCity => "billingCity",
            CustomerField::BillingState => "billingState",
            CustomerField::BillingZipCode => "billingZipCode",
            CustomerField::BillingCountry => "billingCountry",
            CustomerField::Password => "password",
            CustomerField::ConfirmPassword => "confirmPassword",
            CustomerField::SpecialInstructions => "specialInstructions",
        }
    }
}

impl std::fmt::Display for CustomerField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A checkbox on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum CustomerFlag {
    BillingAddressSame,
    CreateAccount,
    MarketingOptIn,
}

impl CustomerInfo {
    /// Reads a text field.
    pub fn text(&self, field: CustomerField) -> &str {
        match field {
            CustomerField::FirstName => &self.first_name,
            CustomerField::LastName => &self.last_name,
            CustomerField::Email => &self.email,
            CustomerField::Phone => &self.phone,
            CustomerField::Address => &self.address,
            CustomerField::AddressLine2 => &self.address_line2,
            CustomerField::City => &self.city,
            CustomerField::State => &self.state,
            CustomerField::ZipCode => &self.zip_code,
            CustomerField::Country => &self.country,
            CustomerField::BillingAddress => &self.billing_address,
            CustomerField::BillingAddressLine2 => &self.billing_address_line2,
            CustomerField::BillingCity => &self.billing_city,
            CustomerField::BillingState => &self.billing_state,
            CustomerField::BillingZipCode => &self.billing_zip_code,
            CustomerField::BillingCountry => &self.billing_country,
            CustomerField::Password => &self.password,
            CustomerField::ConfirmPassword => &self.confirm_password,
            CustomerField::SpecialInstructions => &self.special_instructions,
        }
    }

    fn text_mut(&mut self, field: CustomerField) -> &mut String {
        match field {
            CustomerField::FirstName => &mut self.first_name,
            CustomerField::LastName => &mut self.last_name,
            CustomerField::Email => &mut self.email,
            CustomerField::Phone => &mut self.phone,
            CustomerField::Address => &mut self.address,
            CustomerField::AddressLine2 => &mut self.address_line2,
            CustomerField::City => &mut self.city,
            CustomerField::State => &mut self.state,
            CustomerField::ZipCode => &mut self.zip_code,
            CustomerField::Country => &mut self.country,
            CustomerField::BillingAddress => &mut self.billing_address,
            CustomerField::BillingAddressLine2 => &mut self.billing_address_line2,
            CustomerField::BillingCity => &mut self.billing_city,
            CustomerField::BillingState => &mut self.billing_state,
            CustomerField::BillingZipCode => &mut self.billing_zip_code,
            CustomerField::BillingCountry => &mut self.billing_country,
            CustomerField::Password => &mut self.password,
            CustomerField::ConfirmPassword => &mut self.confirm_password,
            CustomerField::SpecialInstructions => &mut self.special_instructions,
        }
    }

    /// Reads a checkbox.
    pub fn flag(&self, flag: CustomerFlag) -> bool {
        match flag {
            CustomerFlag::BillingAddressSame => self.billing_address_same,
            CustomerFlag::CreateAccount => self.create_account,
            CustomerFlag::MarketingOptIn => self.marketing_opt_in,
        }
    }

    /// Applies one action to the record.
    pub fn apply(&mut self, action: CustomerAction) {
        match action {
            CustomerAction::Set(info) => *self = info,
            CustomerAction::UpdateText { field, value } => *self.text_mut(field) = value,
            CustomerAction::UpdateFlag { flag, value } => match flag {
                CustomerFlag::BillingAddressSame => self.billing_address_same = value,
                CustomerFlag::CreateAccount => self.create_account = value,
                CustomerFlag::MarketingOptIn => self.marketing_opt_in = value,
            },
            CustomerAction::Clear => *self = CustomerInfo::default(),
        }
    }
}

// =============================================================================
// Actions
// =============================================================================

/// An edit to the checkout form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerAction {
    /// Replace the whole record (e.g. restored from storage).
    Set(CustomerInfo),
    /// One keystroke's worth of change to a text field.
    UpdateText { field: CustomerField, value: String },
    /// A checkbox toggle.
    UpdateFlag { flag: CustomerFlag, value: bool },
    /// Back to defaults.
    Clear,
}

// =============================================================================
// Validation
// =============================================================================

/// Result of [`validate_customer_info`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerValidation {
    pub is_valid: bool,
    /// Field to message, iterated in form order.
    pub errors: BTreeMap<CustomerField, String>,
}

impl CustomerValidation {
    /// The field the form should focus and scroll to.
    pub fn first_invalid(&self) -> Option<CustomerField> {
        self.errors.keys().next().copied()
    }

    /// Message for one field, if it failed.
    pub fn error(&self, field: CustomerField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }
}

/// Validates the checkout form.
///
/// ## Rule Order
/// ```text
/// required fields ──► email shape ──► phone shape ──► ZIP shape
///        │
///        └──► createAccount?  password present, ≥ 8, matches confirmation
///        └──► !billingSame?   billing address/city/state/zip, billing ZIP shape
/// ```
/// A shape check on a whitespace-only value replaces the "required" message.
pub fn validate_customer_info(info: &CustomerInfo) -> CustomerValidation {
    let mut errors = BTreeMap::new();

    let required = [
        (CustomerField::FirstName, "First name is required"),
        (CustomerField::LastName, "Last name is required"),
        (CustomerField::Email, "Email is required"),
        (CustomerField::Phone, "Phone number is required"),
        (CustomerField::Address, "Address is required"),
        (CustomerField::City, "City is required"),
        (CustomerField::State, "State is required"),
        (CustomerField::ZipCode, "ZIP code is required"),
    ];
    check_required(info, &required, &mut errors);

    if !info.email.is_empty() && !EMAIL_SHAPE_RE.is_match(&info.email) {
        errors.insert(
            CustomerField::Email,
            "Please enter a valid email address".to_string(),
        );
    }

    if !info.phone.is_empty() && !PHONE_SHAPE_RE.is_match(&info.phone) {
        errors.insert(
            CustomerField::Phone,
            "Please enter a valid phone number".to_string(),
        );
    }

    if !info.zip_code.is_empty() && !ZIP_RE.is_match(&info.zip_code) {
        errors.insert(
            CustomerField::ZipCode,
            "Please enter a valid ZIP code".to_string(),
        );
    }

    if info.create_account {
        if info.password.trim().is_empty() {
            errors.insert(CustomerField::Password, "Password is required".to_string());
        } else if info.password.chars().count() < 8 {
            errors.insert(
                CustomerField::Password,
                "Password must be at least 8 characters".to_string(),
            );
        }

        if info.password != info.confirm_password {
            errors.insert(
                CustomerField::ConfirmPassword,
                "Passwords do not match".to_string(),
            );
        }
    }

    if !info.billing_address_same {
        let billing = [
            (CustomerField::BillingAddress, "Billing address is required"),
            (CustomerField::BillingCity, "Billing city is required"),
            (CustomerField::BillingState, "Billing state is required"),
            (CustomerField::BillingZipCode, "Billing ZIP code is required"),
        ];
        check_required(info, &billing, &mut errors);

        if !info.billing_zip_code.is_empty() && !ZIP_RE.is_match(&info.billing_zip_code) {
            errors.insert(
                CustomerField::BillingZipCode,
                "Please enter a valid billing ZIP code".to_string(),
            );
        }
    }

    CustomerValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}

fn check_required(
    info: &CustomerInfo,
    fields: &[(CustomerField, &str)],
    errors: &mut BTreeMap<CustomerField, String>,
) {
    for (field, message) in fields {
        if info.text(*field).trim().is_empty() {
            errors.insert(*field, message.to_string());
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> CustomerInfo {
        CustomerInfo {
            first_name: "Hiro".to_string(),
            last_name: "Protagonist".to_string(),
            email: "hiro@metaverse.net".to_string(),
            phone: "(555) 867-5309".to_string(),
            address: "1 Black Sun Blvd".to_string(),
            city: "Los Angeles".to_string(),
            state: "CA".to_string(),
            zip_code: "90012".to_string(),
            ..CustomerInfo::default()
        }
    }

    #[test]
    fn test_defaults() {
        let info = CustomerInfo::default();
        assert_eq!(info.country, "United States");
        assert_eq!(info.billing_country, "United States");
        assert!(info.billing_address_same);
        assert!(!info.create_account);
        assert!(!info.marketing_opt_in);
    }

    #[test]
    fn test_empty_record_reports_required_fields_in_form_order() {
        let result = validate_customer_info(&CustomerInfo::default());

        assert!(!result.is_valid);
        let fields: Vec<_> = result.errors.keys().copied().collect();
        assert_eq!(
            fields,
            vec![
                CustomerField::FirstName,
                CustomerField::LastName,
                CustomerField::Email,
                CustomerField::Phone,
                CustomerField::Address,
                CustomerField::City,
                CustomerField::State,
                CustomerField::ZipCode,
            ]
        );
        assert_eq!(result.first_invalid(), Some(CustomerField::FirstName));
        assert_eq!(result.error(CustomerField::Phone), Some("Phone number is required"));
    }

    #[test]
    fn test_filled_record_is_valid() {
        let result = validate_customer_info(&filled());
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_shape_checks() {
        let mut info = filled();
        info.email = "hiro@metaverse".to_string();
        info.phone = "555-1234".to_string();
        info.zip_code = "9001".to_string();

        let result = validate_customer_info(&info);
        assert_eq!(
            result.error(CustomerField::Email),
            Some("Please enter a valid email address")
        );
        assert_eq!(
            result.error(CustomerField::Phone),
            Some("Please enter a valid phone number")
        );
        assert_eq!(
            result.error(CustomerField::ZipCode),
            Some("Please enter a valid ZIP code")
        );
    }

    #[test]
    fn test_whitespace_email_gets_shape_message() {
        let mut info = filled();
        info.email = "   ".to_string();
        let result = validate_customer_info(&info);
        assert_eq!(
            result.error(CustomerField::Email),
            Some("Please enter a valid email address")
        );
    }

    #[test]
    fn test_zip_plus_four_and_international_phone() {
        let mut info = filled();
        info.zip_code = "90012-1234".to_string();
        info.phone = "+1 (555) 867-5309".to_string();
        assert!(validate_customer_info(&info).is_valid);
    }

    #[test]
    fn test_account_creation_rules() {
        let mut info = filled();
        info.create_account = true;
        let result = validate_customer_info(&info);
        assert_eq!(result.error(CustomerField::Password), Some("Password is required"));
        assert_eq!(result.error(CustomerField::ConfirmPassword), None);

        info.password = "short".to_string();
        info.confirm_password = "short!".to_string();
        let result = validate_customer_info(&info);
        assert_eq!(
            result.error(CustomerField::Password),
            Some("Password must be at least 8 characters")
        );
        assert_eq!(
            result.error(CustomerField::ConfirmPassword),
            Some("Passwords do not match")
        );

        info.password = "longenough".to_string();
        info.confirm_password = "longenough".to_string();
        assert!(validate_customer_info(&info).is_valid);
    }

    #[test]
    fn test_billing_rules_only_when_different() {
        let mut info = filled();
        info.billing_zip_code = "not checked".to_string();
        assert!(validate_customer_info(&info).is_valid);

        info.billing_address_same = false;
        info.billing_zip_code = String::new();
        let result = validate_customer_info(&info);
        assert_eq!(result.errors.len(), 4);
        assert_eq!(result.first_invalid(), Some(CustomerField::BillingAddress));

        info.billing_address = "2 Raft Way".to_string();
        info.billing_city = "Pacific".to_string();
        info.billing_state = "CA".to_string();
        info.billing_zip_code = "ABCDE".to_string();
        let result = validate_customer_info(&info);
        assert_eq!(
            result.error(CustomerField::BillingZipCode),
            Some("Please enter a valid billing ZIP code")
        );
    }

    #[test]
    fn test_reducer() {
        let mut info = CustomerInfo::default();
        info.apply(CustomerAction::UpdateText {
            field: CustomerField::City,
            value: "Night City".to_string(),
        });
        info.apply(CustomerAction::UpdateFlag {
            flag: CustomerFlag::MarketingOptIn,
            value: true,
        });
        assert_eq!(info.text(CustomerField::City), "Night City");
        assert!(info.flag(CustomerFlag::MarketingOptIn));

        info.apply(CustomerAction::Set(filled()));
        assert_eq!(info, filled());

        info.apply(CustomerAction::Clear);
        assert_eq!(info, CustomerInfo::default());
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(filled()).unwrap();
        assert_eq!(json["firstName"], "Hiro");
        assert_eq!(json["zipCode"], "90012");
        assert_eq!(json["billingAddressSame"], true);

        // Partial records from older saves fill in defaults
        let info: CustomerInfo = serde_json::from_str(r#"{"firstName":"Y.T."}"#).unwrap();
        assert_eq!(info.first_name, "Y.T.");
        assert_eq!(info.country, "United States");
    }

    #[test]
    fn test_errors_serialize_with_field_keys() {
        let result = validate_customer_info(&CustomerInfo::default());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["isValid"], false);
        assert_eq!(json["errors"]["zipCode"], "ZIP code is required");
    }
}
