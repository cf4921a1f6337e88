//! End-to-end service scenarios against a live PostgreSQL database.
//!
//! Run with a migrated database available:
//!
//! ```sh
//! DATABASE_URL=postgres://... cargo test -- --ignored
//! ```

mod common;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use minibank::domain::{AccountId, Currency, DomainError, Money, TransactionType};
use minibank::service::{ExchangeCommand, GetTransactionsCommand, TransferCommand};
use minibank::AppError;

use common::{
    account_balance, assert_ledger_balanced, ledger_record_count, register_test_user,
    setup_test_db, test_service,
};

fn usd(amount: i64) -> Money {
    Money::new(Decimal::new(amount, 0), Currency::USD)
}

fn eur(amount: i64) -> Money {
    Money::new(Decimal::new(amount, 0), Currency::EUR)
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn transfer_happy_path() {
    let pool = setup_test_db().await;
    let service = test_service(&pool);

    let from = register_test_user(&service, &pool).await;
    let to = register_test_user(&service, &pool).await;

    service
        .transfer(&TransferCommand {
            from: from.usd_account,
            to: to.usd_account,
            money: usd(100),
            time: Utc::now(),
        })
        .await
        .unwrap();

    assert_eq!(
        account_balance(&pool, from.usd_account).await,
        Decimal::new(900, 0)
    );
    assert_eq!(
        account_balance(&pool, to.usd_account).await,
        Decimal::new(1100, 0)
    );

    // One funding record from registration plus one from the transfer.
    assert_eq!(ledger_record_count(&pool, from.usd_account).await, 2);
    assert_eq!(ledger_record_count(&pool, to.usd_account).await, 2);

    assert_ledger_balanced(&service).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn transfer_insufficient_funds_changes_nothing() {
    let pool = setup_test_db().await;
    let service = test_service(&pool);

    let from = register_test_user(&service, &pool).await;
    let to = register_test_user(&service, &pool).await;

    let err = service
        .transfer(&TransferCommand {
            from: from.usd_account,
            to: to.usd_account,
            money: usd(2000),
            time: Utc::now(),
        })
        .await
        .unwrap_err();

    match err.as_domain() {
        Some(DomainError::InsufficientFunds {
            account_id,
            requested,
            available,
        }) => {
            assert_eq!(*account_id, from.usd_account);
            assert_eq!(*requested, Decimal::new(2000, 0));
            assert_eq!(*available, Decimal::new(1000, 0));
        }
        other => panic!("expected InsufficientFunds, got {other:?}"),
    }

    assert_eq!(
        account_balance(&pool, from.usd_account).await,
        Decimal::new(1000, 0)
    );
    assert_eq!(
        account_balance(&pool, to.usd_account).await,
        Decimal::new(1000, 0)
    );
    assert_ledger_balanced(&service).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn transfer_cross_currency_rejected() {
    let pool = setup_test_db().await;
    let service = test_service(&pool);

    let user = register_test_user(&service, &pool).await;

    let err = service
        .transfer(&TransferCommand {
            from: user.usd_account,
            to: user.eur_account,
            money: usd(100),
            time: Utc::now(),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_domain(),
        Some(DomainError::CurrencyMismatch { .. })
    ));
    assert_eq!(
        account_balance(&pool, user.usd_account).await,
        Decimal::new(1000, 0)
    );
    assert_eq!(
        account_balance(&pool, user.eur_account).await,
        Decimal::new(500, 0)
    );
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn transfer_negative_amount_rejected() {
    let pool = setup_test_db().await;
    let service = test_service(&pool);

    let from = register_test_user(&service, &pool).await;
    let to = register_test_user(&service, &pool).await;

    let err = service
        .transfer(&TransferCommand {
            from: from.usd_account,
            to: to.usd_account,
            money: usd(-50),
            time: Utc::now(),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_domain(),
        Some(DomainError::NegativeTransfer(_))
    ));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn transfer_zero_amount_rejected_by_storage() {
    let pool = setup_test_db().await;
    let service = test_service(&pool);

    let from = register_test_user(&service, &pool).await;
    let to = register_test_user(&service, &pool).await;

    // The domain service passes zero through; the amount > 0 CHECK on
    // transfer_details rejects it at insert and the unit of work rolls
    // back.
    let err = service
        .transfer(&TransferCommand {
            from: from.usd_account,
            to: to.usd_account,
            money: usd(0),
            time: Utc::now(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Database(_)));
    assert_eq!(
        account_balance(&pool, from.usd_account).await,
        Decimal::new(1000, 0)
    );
    assert_ledger_balanced(&service).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn transfer_to_self_rejected_by_consistency_check() {
    let pool = setup_test_db().await;
    let service = test_service(&pool);

    let user = register_test_user(&service, &pool).await;

    let err = service
        .transfer(&TransferCommand {
            from: user.usd_account,
            to: user.usd_account,
            money: usd(100),
            time: Utc::now(),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_domain(),
        Some(DomainError::AccountBalanceMismatch { .. })
    ));
    assert!(err.is_invariant_violation());

    assert_eq!(
        account_balance(&pool, user.usd_account).await,
        Decimal::new(1000, 0)
    );
    assert_ledger_balanced(&service).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn transfer_unknown_accounts_rejected() {
    let pool = setup_test_db().await;
    let service = test_service(&pool);

    let user = register_test_user(&service, &pool).await;
    let missing = AccountId::from_uuid(Uuid::new_v4());

    let err = service
        .transfer(&TransferCommand {
            from: missing,
            to: user.usd_account,
            money: usd(100),
            time: Utc::now(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_domain(),
        Some(DomainError::AccountNotFound(id)) if *id == missing
    ));

    let err = service
        .transfer(&TransferCommand {
            from: user.usd_account,
            to: missing,
            money: usd(100),
            time: Utc::now(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_domain(),
        Some(DomainError::AccountNotFound(id)) if *id == missing
    ));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn exchange_usd_to_eur() {
    let pool = setup_test_db().await;
    let service = test_service(&pool);

    let user = register_test_user(&service, &pool).await;

    service
        .exchange(&ExchangeCommand {
            source_account: user.usd_account,
            target_account: user.eur_account,
            source_amount: usd(100),
            time: Utc::now(),
        })
        .await
        .unwrap();

    assert_eq!(
        account_balance(&pool, user.usd_account).await,
        Decimal::new(900, 0)
    );
    // 500 + round2(100 * 0.92) = 592
    assert_eq!(
        account_balance(&pool, user.eur_account).await,
        Decimal::new(592, 0)
    );

    // Funding plus one leg each.
    assert_eq!(ledger_record_count(&pool, user.usd_account).await, 2);
    assert_eq!(ledger_record_count(&pool, user.eur_account).await, 2);

    assert_ledger_balanced(&service).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn exchange_eur_to_usd_uses_inverse_rate() {
    let pool = setup_test_db().await;
    let service = test_service(&pool);

    let user = register_test_user(&service, &pool).await;

    service
        .exchange(&ExchangeCommand {
            source_account: user.eur_account,
            target_account: user.usd_account,
            source_amount: eur(92),
            time: Utc::now(),
        })
        .await
        .unwrap();

    assert_eq!(
        account_balance(&pool, user.eur_account).await,
        Decimal::new(408, 0)
    );
    // round2(92 * round6(1 / 0.92)) = round2(92 * 1.086957) = 100.00
    assert_eq!(
        account_balance(&pool, user.usd_account).await,
        Decimal::new(1100, 0)
    );

    assert_ledger_balanced(&service).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn exchange_same_currency_rejected() {
    let pool = setup_test_db().await;
    let service = test_service(&pool);

    let user1 = register_test_user(&service, &pool).await;
    let user2 = register_test_user(&service, &pool).await;

    let err = service
        .exchange(&ExchangeCommand {
            source_account: user1.usd_account,
            target_account: user2.usd_account,
            source_amount: usd(100),
            time: Utc::now(),
        })
        .await
        .unwrap_err();

    // The rate provider is consulted before the domain service, so the
    // rate-level error surfaces first.
    assert!(matches!(
        err.as_domain(),
        Some(
            DomainError::SameCurrencyExchangeRate(Currency::USD)
                | DomainError::SameCurrencyExchange(Currency::USD)
        )
    ));

    assert_eq!(
        account_balance(&pool, user1.usd_account).await,
        Decimal::new(1000, 0)
    );
    assert_eq!(
        account_balance(&pool, user2.usd_account).await,
        Decimal::new(1000, 0)
    );
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn exchange_zero_and_negative_rejected() {
    let pool = setup_test_db().await;
    let service = test_service(&pool);

    let user = register_test_user(&service, &pool).await;

    let err = service
        .exchange(&ExchangeCommand {
            source_account: user.usd_account,
            target_account: user.eur_account,
            source_amount: usd(0),
            time: Utc::now(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::ZeroExchange)));

    let err = service
        .exchange(&ExchangeCommand {
            source_account: user.usd_account,
            target_account: user.eur_account,
            source_amount: usd(-10),
            time: Utc::now(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_domain(),
        Some(DomainError::NegativeExchange(_))
    ));

    assert_eq!(
        account_balance(&pool, user.usd_account).await,
        Decimal::new(1000, 0)
    );
    assert_eq!(
        account_balance(&pool, user.eur_account).await,
        Decimal::new(500, 0)
    );
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn exchange_insufficient_funds_changes_nothing() {
    let pool = setup_test_db().await;
    let service = test_service(&pool);

    let user = register_test_user(&service, &pool).await;

    let err = service
        .exchange(&ExchangeCommand {
            source_account: user.usd_account,
            target_account: user.eur_account,
            source_amount: usd(5000),
            time: Utc::now(),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_domain(),
        Some(DomainError::InsufficientFunds { .. })
    ));
    assert_eq!(
        account_balance(&pool, user.usd_account).await,
        Decimal::new(1000, 0)
    );
    assert_eq!(
        account_balance(&pool, user.eur_account).await,
        Decimal::new(500, 0)
    );
    assert_ledger_balanced(&service).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn concurrent_transfers_serialise_on_the_sender_row() {
    let pool = setup_test_db().await;
    let service = test_service(&pool);

    let from = register_test_user(&service, &pool).await;
    let to = register_test_user(&service, &pool).await;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let service = service.clone();
        let cmd = TransferCommand {
            from: from.usd_account,
            to: to.usd_account,
            money: usd(100),
            time: Utc::now(),
        };
        handles.push(tokio::spawn(async move { service.transfer(&cmd).await }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(
        account_balance(&pool, from.usd_account).await,
        Decimal::ZERO
    );
    assert_eq!(
        account_balance(&pool, to.usd_account).await,
        Decimal::new(2000, 0)
    );

    // Funding plus ten transfers.
    assert_eq!(ledger_record_count(&pool, from.usd_account).await, 11);
    assert_eq!(ledger_record_count(&pool, to.usd_account).await, 11);

    assert_ledger_balanced(&service).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn reconcile_reports_consistent_system() {
    let pool = setup_test_db().await;
    let service = test_service(&pool);

    let user1 = register_test_user(&service, &pool).await;
    let user2 = register_test_user(&service, &pool).await;

    service
        .transfer(&TransferCommand {
            from: user1.usd_account,
            to: user2.usd_account,
            money: usd(100),
            time: Utc::now(),
        })
        .await
        .unwrap();
    service
        .exchange(&ExchangeCommand {
            source_account: user1.usd_account,
            target_account: user1.eur_account,
            source_amount: usd(50),
            time: Utc::now(),
        })
        .await
        .unwrap();

    let report = service.reconcile().await.unwrap();

    assert!(report.is_consistent);
    assert!(report.account_mismatches.is_empty());
    // At least the two cashbooks and the four user accounts.
    assert!(report.total_accounts_checked >= 6);
    for status in &report.ledger_balances {
        assert!(status.is_balanced, "{} should be balanced", status.currency);
        assert_eq!(status.total_sum, Decimal::ZERO);
    }
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn transaction_history_scoping_and_filters() {
    let pool = setup_test_db().await;
    let service = test_service(&pool);

    let user1 = register_test_user(&service, &pool).await;
    let user2 = register_test_user(&service, &pool).await;

    service
        .transfer(&TransferCommand {
            from: user1.usd_account,
            to: user2.usd_account,
            money: usd(100),
            time: Utc::now(),
        })
        .await
        .unwrap();
    service
        .exchange(&ExchangeCommand {
            source_account: user1.usd_account,
            target_account: user1.eur_account,
            source_amount: usd(50),
            time: Utc::now(),
        })
        .await
        .unwrap();

    // user1 sees: two funding transfers, the outgoing transfer, and the
    // exchange.
    let all = service
        .get_transactions(&GetTransactionsCommand {
            user_id: user1.user_id,
            transaction_type: None,
            limit: 50,
            offset: 0,
        })
        .await
        .unwrap();
    assert_eq!(all.total, 4);
    assert_eq!(all.transactions.len(), 4);

    let exchanges = service
        .get_transactions(&GetTransactionsCommand {
            user_id: user1.user_id,
            transaction_type: Some(TransactionType::Exchange),
            limit: 50,
            offset: 0,
        })
        .await
        .unwrap();
    assert_eq!(exchanges.total, 1);
    let details = exchanges.transactions[0]
        .exchange_details
        .as_ref()
        .expect("exchange row should carry exchange details");
    assert_eq!(details.source_account_id, user1.usd_account);
    assert_eq!(details.target_account_id, user1.eur_account);
    assert_eq!(details.source_amount.amount(), Decimal::new(50, 0));

    // user2 sees its two fundings plus the incoming transfer.
    let incoming = service
        .get_transactions(&GetTransactionsCommand {
            user_id: user2.user_id,
            transaction_type: Some(TransactionType::Transfer),
            limit: 50,
            offset: 0,
        })
        .await
        .unwrap();
    assert_eq!(incoming.total, 3);

    // Pagination caps the page, not the total.
    let page = service
        .get_transactions(&GetTransactionsCommand {
            user_id: user1.user_id,
            transaction_type: None,
            limit: 2,
            offset: 0,
        })
        .await
        .unwrap();
    assert_eq!(page.transactions.len(), 2);
    assert_eq!(page.total, 4);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn calculate_exchange_amount_is_side_effect_free() {
    let pool = setup_test_db().await;
    let service = test_service(&pool);

    let calc = service
        .calculate_exchange_amount(usd(100), Currency::EUR)
        .unwrap();
    assert_eq!(calc.target_amount, Money::new(Decimal::new(9200, 2), Currency::EUR));
    assert_eq!(calc.exchange_rate.rate(), Decimal::new(92, 2));

    let calc = service
        .calculate_exchange_amount(eur(92), Currency::USD)
        .unwrap();
    assert_eq!(calc.target_amount.amount(), Decimal::new(10000, 2));
    assert_eq!(calc.exchange_rate.rate(), Decimal::new(1_086_957, 6));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn account_queries_return_balances() {
    let pool = setup_test_db().await;
    let service = test_service(&pool);

    let user = register_test_user(&service, &pool).await;

    let accounts = service.get_user_accounts(user.user_id).await.unwrap();
    assert_eq!(accounts.len(), 2);

    let balance = service.get_account_balance(user.usd_account).await.unwrap();
    assert_eq!(balance.amount(), Decimal::new(1000, 0));
    assert_eq!(balance.currency(), Currency::USD);

    let missing = AccountId::from_uuid(Uuid::new_v4());
    let err = service.get_account_balance(missing).await.unwrap_err();
    assert!(matches!(
        err.as_domain(),
        Some(DomainError::AccountNotFound(_))
    ));
}
