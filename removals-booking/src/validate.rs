//! Field validation rules and input formatters.
//!
//! Validators never fail: they collect one message per invalid field into a
//! [`Validation`] that the presentation layer renders inline. They run only
//! on an explicit continue/submit, and an edited field drops its error via
//! [`FieldErrors::clear`].
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::catalog::Catalog;
use crate::pricing::{MAX_HOURS, MIN_HOURS};

static EMAIL_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());
static PHONE_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[0-9]{10,11}$").ok());
static EXPIRY_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^(0[1-9]|1[0-2])/[0-9]{2}$").ok());
static CVV_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[0-9]{3,4}$").ok());

fn matches(re: &Lazy<Option<Regex>>, value: &str) -> bool {
    Lazy::force(re)
        .as_ref()
        .is_some_and(|re| re.is_match(value))
}

pub const CARD_DIGITS: usize = 16;
/// Sixteen digits in four groups of four.
pub const CARD_INPUT_MAX_LEN: usize = 19;
pub const EXPIRY_INPUT_MAX_LEN: usize = 5;

/// A user-editable input on one of the step forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    ServiceType,
    CollectionAddress,
    CollectionPostcode,
    DeliveryAddress,
    DeliveryPostcode,
    Date,
    Time,
    Vehicle,
    Hours,
    FullName,
    Email,
    Phone,
    CardNumber,
    ExpiryDate,
    Cvv,
    AgreeTerms,
}

impl Field {
    /// Form input name, matching the persisted camelCase keys.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ServiceType => "serviceType",
            Self::CollectionAddress => "collectionAddress",
            Self::CollectionPostcode => "collectionPostcode",
            Self::DeliveryAddress => "deliveryAddress",
            Self::DeliveryPostcode => "deliveryPostcode",
            Self::Date => "date",
            Self::Time => "time",
            Self::Vehicle => "vehicle",
            Self::Hours => "hours",
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::CardNumber => "cardNumber",
            Self::ExpiryDate => "expiryDate",
            Self::Cvv => "cvv",
            Self::AgreeTerms => "agreeTerms",
        }
    }
}

/// One message per invalid field, ordered by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    /// Drop a field's message once the user edits it.
    pub fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

/// Outcome of validating a step form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub field_errors: FieldErrors,
}

impl Validation {
    #[must_use]
    pub fn valid(&self) -> bool {
        self.field_errors.is_empty()
    }

    fn require(&mut self, field: Field, value: &str, message: &str) -> bool {
        if value.trim().is_empty() {
            self.field_errors.insert(field, message);
            false
        } else {
            true
        }
    }

    fn reject(&mut self, field: Field, message: &str) {
        self.field_errors.insert(field, message);
    }
}

/// Inputs validators need beyond the form itself.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    /// The user's current local date.
    pub today: NaiveDate,
    pub catalog: &'a Catalog,
}

impl<'a> ValidationContext<'a> {
    #[must_use]
    pub const fn new(today: NaiveDate, catalog: &'a Catalog) -> Self {
        Self { today, catalog }
    }

    /// Earliest bookable move date.
    #[must_use]
    pub fn earliest_date(&self) -> NaiveDate {
        self.today.succ_opt().unwrap_or(self.today)
    }
}

/// Parse an HTML date input value (`YYYY-MM-DD`).
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    matches(&EMAIL_RE, value)
}

/// 10 or 11 digits once whitespace is removed.
#[must_use]
pub fn is_valid_phone(value: &str) -> bool {
    matches(&PHONE_RE, &strip_whitespace(value))
}

/// Digits and spaces only, exactly sixteen digits.
#[must_use]
pub fn is_valid_card_number(value: &str) -> bool {
    let only_digits_and_spaces = value.chars().all(|c| c.is_ascii_digit() || c.is_whitespace());
    only_digits_and_spaces && digits(value).len() == CARD_DIGITS
}

#[must_use]
pub fn is_valid_expiry_format(value: &str) -> bool {
    matches(&EXPIRY_RE, value)
}

/// Month and full year of an `MM/YY` expiry.
#[must_use]
pub fn parse_expiry(value: &str) -> Option<(u32, i32)> {
    if !is_valid_expiry_format(value) {
        return None;
    }
    let (month, year) = value.split_once('/')?;
    let month: u32 = month.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    Some((month, 2000 + year))
}

/// A card is usable through the end of its expiry month.
#[must_use]
pub fn is_expired(month: u32, year: i32, today: NaiveDate) -> bool {
    (year, month) < (today.year(), today.month())
}

#[must_use]
pub fn is_valid_cvv(value: &str) -> bool {
    matches(&CVV_RE, value)
}

/// Reformat card input as typed: digits only, at most sixteen, in groups of four.
#[must_use]
pub fn format_card_number(raw: &str) -> String {
    let digits: Vec<char> = digits(raw).chars().take(CARD_DIGITS).collect();
    digits
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reformat expiry input as typed: `MMYY` becomes `MM/YY`.
#[must_use]
pub fn format_expiry(raw: &str) -> String {
    let digits: String = digits(raw).chars().take(4).collect();
    if digits.len() > 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

/// Step 2 inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailsInput<'a> {
    pub collection_address: &'a str,
    pub collection_postcode: &'a str,
    pub delivery_address: &'a str,
    pub delivery_postcode: &'a str,
    pub date: &'a str,
    pub time: &'a str,
}

#[must_use]
pub fn validate_details(input: &DetailsInput<'_>, ctx: &ValidationContext<'_>) -> Validation {
    let mut v = Validation::default();
    v.require(
        Field::CollectionAddress,
        input.collection_address,
        "Collection address is required",
    );
    v.require(
        Field::CollectionPostcode,
        input.collection_postcode,
        "Collection postcode is required",
    );
    v.require(
        Field::DeliveryAddress,
        input.delivery_address,
        "Delivery address is required",
    );
    v.require(
        Field::DeliveryPostcode,
        input.delivery_postcode,
        "Delivery postcode is required",
    );
    if v.require(Field::Date, input.date, "Date is required") {
        match parse_date(input.date) {
            Some(date) if date >= ctx.earliest_date() => {}
            _ => v.reject(Field::Date, "Please choose a date from tomorrow onwards"),
        }
    }
    if v.require(Field::Time, input.time, "Time is required")
        && !ctx.catalog.time_slots.is_empty()
        && !ctx.catalog.has_time_slot(input.time.trim())
    {
        v.reject(Field::Time, "Please choose an available time slot");
    }
    v
}

#[must_use]
pub fn validate_vehicle(vehicle: Option<&str>, ctx: &ValidationContext<'_>) -> Validation {
    let mut v = Validation::default();
    if vehicle.and_then(|id| ctx.catalog.vehicle(id)).is_none() {
        v.reject(Field::Vehicle, "Please select a vehicle to continue");
    }
    v
}

/// Step 4: the hire length must stay inside the bookable range.
#[must_use]
pub fn validate_hours(hours: u32) -> Validation {
    let mut v = Validation::default();
    if !(MIN_HOURS..=MAX_HOURS).contains(&hours) {
        v.reject(
            Field::Hours,
            &format!("Please choose between {MIN_HOURS} and {MAX_HOURS} hours"),
        );
    }
    v
}

/// Step 6 inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentInput<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub card_number: &'a str,
    pub expiry_date: &'a str,
    pub cvv: &'a str,
    pub agree_terms: bool,
}

#[must_use]
pub fn validate_payment(input: &PaymentInput<'_>, ctx: &ValidationContext<'_>) -> Validation {
    let mut v = Validation::default();
    v.require(Field::FullName, input.full_name, "Full name is required");

    if v.require(Field::Email, input.email, "Email is required") && !is_valid_email(input.email) {
        v.reject(Field::Email, "Email is invalid");
    }

    if v.require(Field::Phone, input.phone, "Phone number is required")
        && !is_valid_phone(input.phone)
    {
        v.reject(Field::Phone, "Phone number is invalid");
    }

    if v.require(Field::CardNumber, input.card_number, "Card number is required")
        && !is_valid_card_number(input.card_number)
    {
        v.reject(Field::CardNumber, "Card number must be 16 digits");
    }

    if v.require(Field::ExpiryDate, input.expiry_date, "Expiry date is required") {
        match parse_expiry(input.expiry_date) {
            None => v.reject(Field::ExpiryDate, "Expiry date must be in MM/YY format"),
            Some((month, year)) if is_expired(month, year, ctx.today) => {
                v.reject(Field::ExpiryDate, "Card has expired");
            }
            Some(_) => {}
        }
    }

    if v.require(Field::Cvv, input.cvv, "CVV is required") && !is_valid_cvv(input.cvv) {
        v.reject(Field::Cvv, "CVV must be 3 or 4 digits");
    }

    if !input.agree_terms {
        v.reject(
            Field::AgreeTerms,
            "You must agree to the terms and conditions",
        );
    }
    v
}
