//! The transaction model as exchanged with the banking API.

use serde::{Deserialize, Serialize};
use time::{
    Date, Month, OffsetDateTime, format_description::BorrowedFormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};

/// The identifier the banking API assigns to a transaction.
pub type TransactionId = String;

/// The identifier the banking API assigns to an account.
pub type AccountId = String;

const WIRE_DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[day]/[month]/[year]");

/// Whether money left or entered the account.
///
/// Older versions of the API used `deposit`, `transfer` and `expense`. These
/// are still accepted when reading transactions, but only `Debit` and
/// `Credit` are ever written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money leaving the account.
    #[serde(alias = "transfer", alias = "expense")]
    Debit,
    /// Money entering the account.
    #[serde(alias = "deposit")]
    Credit,
}

impl TransactionType {
    /// The label shown in the ledger and the delete confirmation.
    pub fn label(self) -> &'static str {
        match self {
            TransactionType::Debit => "Débito",
            TransactionType::Credit => "Crédito",
        }
    }

    /// The wire value, also used as the `<option>` value in forms.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Debit => "Debit",
            TransactionType::Credit => "Credit",
        }
    }

    /// Parse the value submitted by the transaction form.
    pub fn from_form_value(value: &str) -> Option<Self> {
        match value {
            "Debit" => Some(TransactionType::Debit),
            "Credit" => Some(TransactionType::Credit),
            _ => None,
        }
    }
}

/// A transaction on an account statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID the API uses for this transaction.
    pub id: TransactionId,
    /// Whether this is a debit or a credit.
    #[serde(rename = "type")]
    pub type_: TransactionType,
    /// The signed monetary value. Debits are usually negative.
    pub value: f64,
    /// The day the transaction happened.
    #[serde(with = "wire_date")]
    pub date: Date,
    /// The account the transaction belongs to.
    pub account_id: AccountId,
    /// An optional image attached to the transaction, encoded as base64.
    #[serde(rename = "anexo", default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
}

impl Transaction {
    /// The amount to display in the ledger.
    ///
    /// Debits and negative values are shown as negative amounts, everything
    /// else is shown as a positive amount.
    pub fn display_amount(&self) -> f64 {
        if self.value < 0.0 || self.type_ == TransactionType::Debit {
            -self.value.abs()
        } else {
            self.value.abs()
        }
    }

    /// The date formatted as `dd/mm/yyyy`.
    pub fn display_date(&self) -> String {
        format_display_date(self.date)
    }

    /// The lowercase Brazilian Portuguese name of the transaction's month.
    pub fn month_name(&self) -> &'static str {
        month_name(self.date.month())
    }
}

/// The body sent to the API when updating a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// The account that owns the transaction.
    pub account_id: AccountId,
    /// The new transaction type.
    #[serde(rename = "type")]
    pub type_: TransactionType,
    /// The new signed value.
    pub value: f64,
    /// The new date, if the user set one.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "optional_wire_date"
    )]
    pub date: Option<Date>,
    /// A new attachment, if the user uploaded one.
    #[serde(rename = "anexo", default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
}

/// Format `date` as `dd/mm/yyyy`.
pub fn format_display_date(date: Date) -> String {
    date.format(DISPLAY_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Format `date` the way the API and HTML date inputs expect, `yyyy-mm-dd`.
pub fn format_wire_date(date: Date) -> String {
    date.format(WIRE_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Parse a date sent by the API or a date input.
///
/// Accepts either a full RFC 3339 date-time, in which case the UTC calendar
/// date is used, or a plain `yyyy-mm-dd` date.
pub fn parse_wire_date(text: &str) -> Option<Date> {
    let text = text.trim();

    if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(date_time.to_offset(time::UtcOffset::UTC).date());
    }

    Date::parse(text, WIRE_DATE_FORMAT).ok()
}

fn month_name(month: Month) -> &'static str {
    match month {
        Month::January => "janeiro",
        Month::February => "fevereiro",
        Month::March => "março",
        Month::April => "abril",
        Month::May => "maio",
        Month::June => "junho",
        Month::July => "julho",
        Month::August => "agosto",
        Month::September => "setembro",
        Month::October => "outubro",
        Month::November => "novembro",
        Month::December => "dezembro",
    }
}

mod wire_date {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use time::Date;

    use super::{format_wire_date, parse_wire_date};

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_wire_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let text = String::deserialize(deserializer)?;

        parse_wire_date(&text).ok_or_else(|| D::Error::custom(format!("invalid date {text:?}")))
    }
}

mod optional_wire_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    use super::parse_wire_date;

    pub fn serialize<S: Serializer>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => super::wire_date::serialize(date, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Date>, D::Error> {
        let text = Option::<String>::deserialize(deserializer)?;

        match text {
            Some(text) => parse_wire_date(&text)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date {text:?}"))),
            None => Ok(None),
        }
    }
}
