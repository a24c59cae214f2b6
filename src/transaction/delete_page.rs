//! The modal asking the user to confirm deleting a transaction.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    auth::BearerToken,
    endpoints::{self, format_endpoint},
    html::{ButtonVariant, format_currency},
    modal::{CLOSE_MODAL, modal},
    transaction::{
        core::{AccountId, Transaction, TransactionId},
        ledger::LedgerKey,
        statement_page::StatementState,
        view::STATEMENT_ID,
    },
};

fn delete_transaction_modal(account_id: &str, transaction: &Transaction) -> Markup {
    let endpoint = format_endpoint(endpoints::TRANSACTION_API, &[account_id, &transaction.id]);

    let content = html! {
        p class="mb-8"
        {
            "Esta ação irá excluir definitivamente a transação de "
            span class="font-semibold" { (transaction.type_.label()) }
            " de "
            span class="font-semibold" { (format_currency(transaction.display_amount())) }
            ". Gostaria de continuar mesmo assim?"
        }

        div class="flex justify-between gap-4"
        {
            button
                type="button"
                class=(ButtonVariant::Tertiary.style())
                onclick=(CLOSE_MODAL)
            {
                "Cancelar"
            }

            button
                type="button"
                hx-delete=(endpoint)
                hx-target={ "#" (STATEMENT_ID) }
                hx-target-error="#alert-container"
                class=(ButtonVariant::Primary.style())
            {
                "Deletar"
            }
        }
    };

    modal("Deletar Transação", &content)
}

/// Render the delete confirmation modal for a transaction in the local ledger.
pub async fn get_delete_transaction_page(
    State(state): State<StatementState>,
    Extension(token): Extension<BearerToken>,
    Path((account_id, transaction_id)): Path<(AccountId, TransactionId)>,
) -> Response {
    let key = LedgerKey::new(&token, &account_id);

    match state.ledgers.get_transaction(&key, &transaction_id) {
        Ok(transaction) => delete_transaction_modal(&account_id, &transaction).into_response(),
        Err(error) => error.into_alert_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use scraper::Selector;

    use crate::{
        auth::BearerToken,
        test_utils::{
            FakeApi, assert_status_ok, assert_valid_html, parse_html_fragment, transaction,
        },
        transaction::{
            TransactionType::Debit,
            ledger::{LedgerKey, LedgerStore},
            statement_page::StatementState,
        },
    };

    use super::get_delete_transaction_page;

    fn owner_key() -> LedgerKey {
        LedgerKey::new(&BearerToken::new("owner"), "acc-1")
    }

    fn state_with_ledger() -> StatementState {
        let ledgers = LedgerStore::new();
        ledgers
            .set(&owner_key(), vec![transaction("t1", Debit, -42.5)])
            .unwrap();

        StatementState {
            api: Arc::new(FakeApi::default()),
            ledgers,
        }
    }

    #[tokio::test]
    async fn confirmation_names_type_and_amount() {
        let response = get_delete_transaction_page(
            State(state_with_ledger()),
            Extension(BearerToken::new("owner")),
            Path(("acc-1".to_owned(), "t1".to_owned())),
        )
        .await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Deletar Transação"), "{text}");
        assert!(text.contains("Débito"), "{text}");
        assert!(text.contains("-R$ 42,50"), "{text}");

        let trigger = html
            .select(&Selector::parse("[hx-delete]").unwrap())
            .next()
            .expect("no delete trigger");
        assert_eq!(
            trigger.value().attr("hx-delete"),
            Some("/api/accounts/acc-1/transactions/t1")
        );
        assert_eq!(trigger.value().attr("hx-target"), Some("#statement"));
    }

    #[tokio::test]
    async fn unknown_transaction_returns_not_found_alert() {
        let response = get_delete_transaction_page(
            State(state_with_ledger()),
            Extension(BearerToken::new("owner")),
            Path(("acc-1".to_owned(), "missing".to_owned())),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
