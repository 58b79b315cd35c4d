//! 需要真实数据库: `DATABASE_URL=postgres://... cargo test -- --ignored`

use client_exposure::models::ClientCode;
use client_exposure::service::normalize_client_code;
use client_exposure::{LedgerSource, PgLedgerSource};
use sqlx::postgres::PgPoolOptions;

/// 单连接池, 临时表只在该连接内可见并遮蔽同名正式表
async fn single_connection_pool() -> sqlx::PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn title_codes_are_matched_after_normalization() {
    let pool = single_connection_pool().await;
    sqlx::query(
        r#"
        CREATE TEMP TABLE bk_titulos (
            "PES_CODIGO" text,
            "VLRTITULO" numeric,
            "VLRSALDO" numeric,
            "DTVENCIMENTO" text
        )
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        r#"
        INSERT INTO bk_titulos VALUES
            ('1001', 10, 10, '2099-01-01'),
            ('01001', 10, 10, '2099-01-01'),
            (' 1001.0 ', 10, 10, '2099-01-01'),
            ('1001.00', 10, 10, '2099-01-01'),
            ('1001.5', 10, 10, '2099-01-01'),
            ('abc', 10, 10, '2099-01-01'),
            ('99999999999999999999', 10, 10, '2099-01-01'),
            ('2002', 10, 10, '2099-01-01')
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    let source = PgLedgerSource::new(pool);
    let titles = source.list_titles(&[ClientCode(1001)]).await.unwrap();

    assert_eq!(titles.len(), 4);
    for title in &titles {
        let code = title.client_code.as_ref().and_then(normalize_client_code);
        assert_eq!(code, Some(ClientCode(1001)));
    }
}
