#![allow(missing_docs)]

pub(crate) mod fake_api;
pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use fake_api::{FakeApi, UpdateCall, transaction};
pub(crate) use form::{assert_form_error_message, assert_form_input_with_value, must_get_form};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment, response_text};
pub(crate) use http::{assert_content_type, assert_status_ok, get_header};
