//! The URIs of the pages and HTMX endpoints served by the app.
//!
//! For endpoints that take parameters, e.g., '/accounts/{account_id}/statement',
//! use [format_endpoint].

/// The root route which redirects to the statement of the caller's account.
pub const ROOT: &str = "/";
/// The statement page for an account.
pub const STATEMENT_VIEW: &str = "/accounts/{account_id}/statement";
/// The modal for editing a transaction.
pub const EDIT_TRANSACTION_VIEW: &str =
    "/accounts/{account_id}/transactions/{transaction_id}/edit";
/// The modal asking to confirm deleting a transaction.
pub const DELETE_TRANSACTION_VIEW: &str =
    "/accounts/{account_id}/transactions/{transaction_id}/delete";
/// The download of a transaction's attachment.
pub const TRANSACTION_ATTACHMENT: &str =
    "/accounts/{account_id}/transactions/{transaction_id}/attachment";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to update or delete a single transaction.
pub const TRANSACTION_API: &str = "/api/accounts/{account_id}/transactions/{transaction_id}";

/// Replace the parameters in `endpoint_path` with `params`, in order.
///
/// A parameter is a string that starts with a left brace and ends with a
/// right brace. For example, in the endpoint path '/accounts/{account_id}',
/// '{account_id}' is the parameter.
///
/// Values are percent-encoded, so a value containing `/` or `?` stays a single
/// path segment. Parameters without a matching value are left as is, and
/// extra values are ignored.
pub fn format_endpoint(endpoint_path: &str, params: &[&str]) -> String {
    let mut formatted = String::with_capacity(endpoint_path.len());
    let mut rest = endpoint_path;
    let mut params = params.iter();

    while let Some(param_start) = rest.find('{') {
        let Some(param_len) = rest[param_start..].find('}') else {
            break;
        };
        let Some(value) = params.next() else {
            break;
        };

        formatted.push_str(&rest[..param_start]);
        formatted.push_str(&urlencoding::encode(value));
        rest = &rest[param_start + param_len + 1..];
    }

    formatted.push_str(rest);
    formatted
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::STATEMENT_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_TRANSACTION_VIEW);
        assert_endpoint_is_valid_uri(endpoints::DELETE_TRANSACTION_VIEW);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTION_ATTACHMENT);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTION_API);
    }

    #[test]
    fn replaces_parameters_in_order() {
        let path = format_endpoint(endpoints::TRANSACTION_API, &["acc-1", "tx-9"]);

        assert_eq!(path, "/api/accounts/acc-1/transactions/tx-9");
        assert_endpoint_is_valid_uri(&path);
    }

    #[test]
    fn leaves_unmatched_parameters() {
        assert_eq!(
            format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, &["acc-1"]),
            "/accounts/acc-1/transactions/{transaction_id}/edit"
        );
        assert_eq!(format_endpoint(endpoints::ROOT, &["unused"]), "/");
    }

    #[test]
    fn encodes_parameter_values() {
        let path = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, &["../admin", "x?y=1#z"]);

        assert_eq!(path, "/accounts/..%2Fadmin/transactions/x%3Fy%3D1%23z/edit");
        assert_endpoint_is_valid_uri(&path);
    }
}
