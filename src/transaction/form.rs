//! The transaction form: its fields, the script that keeps them in sync in
//! the browser, and the server side parsing of what it submits.

use axum::extract::{Multipart, multipart::Field};
use base64::{Engine, engine::general_purpose::STANDARD};
use maud::{Markup, PreEscaped, html};
use time::Date;

use crate::{
    Error,
    html::{ButtonVariant, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, button, format_currency},
    transaction::core::{TransactionType, format_wire_date, parse_wire_date},
};

/// The largest attachment accepted, in bytes of the original file.
pub const MAX_ATTACHMENT_BYTES: usize = 100 * 1024;

/// The values the form fields start with.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFormDefaults<'a> {
    pub transaction_type: Option<TransactionType>,
    /// The text of the amount field, e.g. `R$ 1.234,56`.
    pub amount: &'a str,
    pub date: Date,
    pub submit_label: &'a str,
}

/// What a valid form submission normalizes to.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionSubmission {
    pub type_: TransactionType,
    /// Always greater than zero.
    pub amount: f64,
    /// `None` when the date field was left empty.
    pub date: Option<Date>,
    /// The attachment as a base64 `data:` URL.
    pub attachment: Option<String>,
}

impl TransactionSubmission {
    /// The value to send to the API: negative for debits, positive for credits.
    pub fn signed_value(&self) -> f64 {
        match self.type_ {
            TransactionType::Debit => -self.amount,
            TransactionType::Credit => self.amount,
        }
    }
}

/// The reasons a submission can be rejected. The messages are shown under
/// the form.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("Selecione o tipo de transação.")]
    MissingType,

    #[error("Tipo de transação desconhecido: {0}.")]
    UnknownType(String),

    #[error("Valor inválido: {0}.")]
    InvalidAmount(String),

    #[error("O valor deve ser maior que zero.")]
    NonPositiveAmount,

    #[error("Data inválida: {0}.")]
    InvalidDate(String),

    #[error("O anexo deve ter no máximo 100 KB, o arquivo enviado tem {} KB.", .0.div_ceil(1024))]
    AttachmentTooLarge(usize),

    #[error("O anexo deve ser uma imagem, o arquivo enviado é {0}.")]
    AttachmentNotImage(String),
}

/// A file uploaded through the form.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAttachment {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// The fields of a submitted form, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTransactionForm {
    pub transaction_type: String,
    pub amount: String,
    pub date: String,
    pub attachment: Option<RawAttachment>,
}

impl RawTransactionForm {
    /// Check the fields and normalize them into a [TransactionSubmission].
    ///
    /// # Errors
    /// Returns the first [FormError] found, checking the fields in the order
    /// they appear in the form.
    pub fn validate(&self) -> Result<TransactionSubmission, FormError> {
        let type_ = match self.transaction_type.trim() {
            "" => return Err(FormError::MissingType),
            value => TransactionType::from_form_value(value)
                .ok_or_else(|| FormError::UnknownType(value.to_owned()))?,
        };

        let amount = parse_amount(&self.amount)
            .ok_or_else(|| FormError::InvalidAmount(self.amount.trim().to_owned()))?;

        if amount <= 0.0 {
            return Err(FormError::NonPositiveAmount);
        }

        let date = match self.date.trim() {
            "" => None,
            text => Some(parse_wire_date(text).ok_or_else(|| FormError::InvalidDate(text.to_owned()))?),
        };

        let attachment = match &self.attachment {
            Some(attachment) if attachment.bytes.len() > MAX_ATTACHMENT_BYTES => {
                return Err(FormError::AttachmentTooLarge(attachment.bytes.len()));
            }
            Some(attachment) => {
                let mime_type = image_mime_type(&attachment.content_type).ok_or_else(|| {
                    FormError::AttachmentNotImage(attachment.content_type.trim().to_owned())
                })?;

                Some(format!(
                    "data:{mime_type};base64,{}",
                    STANDARD.encode(&attachment.bytes)
                ))
            }
            None => None,
        };

        Ok(TransactionSubmission {
            type_,
            amount,
            date,
            attachment,
        })
    }
}

/// The MIME type of an upload, without parameters, if it is an image type
/// such as `image/png`.
fn image_mime_type(content_type: &str) -> Option<String> {
    let mime_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    let subtype = mime_type.strip_prefix("image/")?;

    let is_token = !subtype.is_empty()
        && subtype
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    is_token.then_some(mime_type)
}

/// Parse the amount field, which is either masked (`R$ 1.234,56`) or plain
/// (`1234.56`).
pub fn parse_amount(text: &str) -> Option<f64> {
    let text: String = text
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let normalized = if text.contains(',') {
        text.replace('.', "").replace(',', ".")
    } else {
        text
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

/// Read the transaction form from a multipart request body.
///
/// Unknown fields are ignored. An empty file input counts as no attachment.
///
/// # Errors
/// Returns [Error::MultipartError] if the body cannot be read.
pub async fn read_multipart_form(mut multipart: Multipart) -> Result<RawTransactionForm, Error> {
    let mut form = RawTransactionForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|error| {
        tracing::error!("Could not read multipart form field: {error}");
        Error::MultipartError("Não foi possível ler o formulário.".to_owned())
    })? {
        let name = field.name().unwrap_or_default().to_owned();

        match name.as_str() {
            "type" => form.transaction_type = read_text(field).await?,
            "amount" => form.amount = read_text(field).await?,
            "date" => form.date = read_text(field).await?,
            "attachment" => form.attachment = read_attachment(field).await?,
            other => tracing::debug!("Ignoring unexpected form field {other:?}"),
        }
    }

    Ok(form)
}

async fn read_text(field: Field<'_>) -> Result<String, Error> {
    field.text().await.map_err(|error| {
        tracing::error!("Could not read data from multipart form field: {error}");
        Error::MultipartError("Não foi possível ler o formulário.".to_owned())
    })
}

async fn read_attachment(field: Field<'_>) -> Result<Option<RawAttachment>, Error> {
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_owned();

    let bytes = field.bytes().await.map_err(|error| {
        tracing::error!("Could not read attachment from multipart form field: {error}");
        Error::MultipartError("Não foi possível ler o anexo.".to_owned())
    })?;

    if bytes.is_empty() {
        return Ok(None);
    }

    tracing::debug!("Received attachment of {} bytes", bytes.len());

    Ok(Some(RawAttachment {
        content_type,
        bytes: bytes.to_vec(),
    }))
}

/// Whether the submit button starts out disabled.
fn submit_disabled(transaction_type: Option<TransactionType>, amount: &str) -> bool {
    transaction_type.is_none() || parse_amount(amount).is_none_or(|amount| amount <= 0.0)
}

/// Format `amount` for the masked amount field, e.g. `R$ 1.234,56`.
pub fn format_amount_input(amount: f64) -> String {
    format_currency(amount.abs())
}

/// The form fields and submit button, without the enclosing `<form>`.
pub fn transaction_form_fields(
    defaults: &TransactionFormDefaults<'_>,
    error_message: Option<&str>,
) -> Markup {
    let selected = defaults.transaction_type;
    let options = [TransactionType::Debit, TransactionType::Credit];

    html! {
        div
        {
            label for="type" class=(FORM_LABEL_STYLE) { "Tipo" }

            select
                name="type"
                id="type"
                required
                title="Selecione o tipo de transação"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" disabled selected[selected.is_none()]
                {
                    "Selecione o tipo de transação"
                }

                @for option in options
                {
                    option value=(option.as_str()) selected[selected == Some(option)]
                    {
                        (form_option_label(option))
                    }
                }
            }
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Valor" }

            input
                name="amount"
                id="amount"
                type="text"
                inputmode="decimal"
                autocomplete="off"
                placeholder="R$ 0,00"
                required
                value=(defaults.amount)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Data" }

            input
                name="date"
                id="date"
                type="date"
                value=(format_wire_date(defaults.date))
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="attachment" class=(FORM_LABEL_STYLE) { "Anexo" }

            input
                name="attachment"
                id="attachment"
                type="file"
                accept="image/*"
                data-max-bytes=(MAX_ATTACHMENT_BYTES)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        @if let Some(error_message) = error_message
        {
            p class="text-red-500 text-base" { (error_message) }
        }

        (button(
            ButtonVariant::Secondary,
            "submit",
            defaults.submit_label,
            submit_disabled(selected, defaults.amount),
        ))

        script { (PreEscaped(FORM_SCRIPT)) }
    }
}

/// The label of a transaction type in the form's select, which names debits
/// as expenses.
fn form_option_label(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Debit => "Despesa",
        TransactionType::Credit => "Crédito",
    }
}

/// Masks the amount as BRL currency, keeps the submit button disabled while
/// the amount is not positive or no type is selected, and clears attachments
/// over the size limit.
const FORM_SCRIPT: &str = r#"
(function() {
    const form = document.currentScript.closest('form');
    if (!form) return;

    const type = form.querySelector('#type');
    const amount = form.querySelector('#amount');
    const attachment = form.querySelector('#attachment');
    const submit = form.querySelector('button[type=submit]');
    const currency = new Intl.NumberFormat('pt-BR', { style: 'currency', currency: 'BRL' });

    const cents = () => parseInt(amount.value.replace(/\D/g, '') || '0', 10);
    const sync = () => {
        submit.disabled = cents() <= 0 || type.value === '';
    };

    amount.addEventListener('input', () => {
        amount.value = currency.format(cents() / 100).replace(/\u00a0/g, ' ');
        sync();
    });
    type.addEventListener('change', sync);
    attachment.addEventListener('change', () => {
        const file = attachment.files[0];
        if (file && file.size > Number(attachment.dataset.maxBytes)) {
            alert('O anexo deve ter no máximo 100 KB.');
            attachment.value = '';
        }
    });
    sync();
})();
"#;
