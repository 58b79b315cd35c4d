use crate::models::{
    ClientRow, ClientSettings, OrderRow, Representative, SeparationItemRow, SeparationRow,
    SeparationStatus, TitleRow,
};
use sqlx::PgPool;

/// 查询全部客户 (按简称排序)
pub async fn list_clients(pool: &PgPool) -> Result<Vec<ClientRow>, sqlx::Error> {
    sqlx::query_as::<_, ClientRow>(
        r#"
        SELECT "PES_CODIGO"::int8 AS "PES_CODIGO",
               "APELIDO",
               volume_saudavel_faturamento::numeric AS volume_saudavel_faturamento,
               fator_correcao::int4 AS fator_correcao
        FROM bk_clientes
        ORDER BY "APELIDO" NULLS LAST, "PES_CODIGO"
        "#,
    )
    .fetch_all(pool)
    .await
}

/// 按客户编码查询单据; 编码和到期日以文本返回
///
/// 过滤前先把 PES_CODIGO 规整为整数 (去空白, 允许前导零与 `.0` 小数),
/// 与领域层的编码规整保持一致; 无法规整的编码不参与匹配。
pub async fn list_titles_for_codes(
    pool: &PgPool,
    codes: &[i64],
) -> Result<Vec<TitleRow>, sqlx::Error> {
    sqlx::query_as::<_, TitleRow>(
        r#"
        SELECT trim("PES_CODIGO"::text) AS "PES_CODIGO",
               "VLRTITULO"::numeric AS "VLRTITULO",
               "VLRSALDO"::numeric AS "VLRSALDO",
               "DTVENCIMENTO"::text AS "DTVENCIMENTO"
        FROM bk_titulos
        WHERE CASE
                  WHEN trim("PES_CODIGO"::text) ~ '^[+-]?[0-9]{1,18}(\.0*)?$'
                  THEN trim("PES_CODIGO"::text)::numeric::int8 = ANY($1)
                  ELSE false
              END
        "#,
    )
    .bind(codes)
    .fetch_all(pool)
    .await
}

/// 查询带代表的订单, 用于客户-代表关联
pub async fn list_representative_orders(pool: &PgPool) -> Result<Vec<OrderRow>, sqlx::Error> {
    sqlx::query_as::<_, OrderRow>(
        r#"
        SELECT "PED_NUMPEDIDO"::text AS "PED_NUMPEDIDO",
               "REPRESENTANTE"::int8 AS "REPRESENTANTE",
               "PES_CODIGO"::int8 AS "PES_CODIGO",
               "DATA_PEDIDO"::timestamp AS "DATA_PEDIDO"
        FROM bk_pedidos
        WHERE "REPRESENTANTE" IS NOT NULL
        "#,
    )
    .fetch_all(pool)
    .await
}

/// 查询代表名录
pub async fn list_representatives(pool: &PgPool) -> Result<Vec<Representative>, sqlx::Error> {
    sqlx::query_as::<_, Representative>(
        r#"
        SELECT codigo_representante::int8 AS codigo_representante, nome_representante
        FROM bk_representantes
        "#,
    )
    .fetch_all(pool)
    .await
}

/// 查询拣货申请主表 (最新在前)
pub async fn list_separations(pool: &PgPool) -> Result<Vec<SeparationRow>, sqlx::Error> {
    sqlx::query_as::<_, SeparationRow>(
        r#"
        SELECT id::int8 AS id,
               "PES_CODIGO"::int8 AS "PES_CODIGO",
               status,
               valor_total::numeric AS valor_total,
               created_at::timestamp AS created_at
        FROM separacoes
        ORDER BY created_at DESC NULLS LAST, id DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// 查询单个申请
pub async fn get_separation(pool: &PgPool, id: i64) -> Result<Option<SeparationRow>, sqlx::Error> {
    sqlx::query_as::<_, SeparationRow>(
        r#"
        SELECT id::int8 AS id,
               "PES_CODIGO"::int8 AS "PES_CODIGO",
               status,
               valor_total::numeric AS valor_total,
               created_at::timestamp AS created_at
        FROM separacoes
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// 批量查询申请明细
pub async fn list_separation_items(
    pool: &PgPool,
    separation_ids: &[i64],
) -> Result<Vec<SeparationItemRow>, sqlx::Error> {
    sqlx::query_as::<_, SeparationItemRow>(
        r#"
        SELECT separacao_id::int8 AS separacao_id,
               codigo_item::text AS codigo_item,
               descricao,
               quantidade::numeric AS quantidade,
               valor_unitario::numeric AS valor_unitario,
               valor_total::numeric AS valor_total
        FROM separacao_itens
        WHERE separacao_id = ANY($1)
        ORDER BY separacao_id, codigo_item
        "#,
    )
    .bind(separation_ids)
    .fetch_all(pool)
    .await
}

/// 条件更新状态: 只有当前状态等于 `from` 时才写入
pub async fn update_separation_status(
    pool: &PgPool,
    id: i64,
    from: SeparationStatus,
    to: SeparationStatus,
) -> Result<Option<SeparationRow>, sqlx::Error> {
    sqlx::query_as::<_, SeparationRow>(
        r#"
        UPDATE separacoes
        SET status = $3
        WHERE id = $1 AND status = $2
        RETURNING id::int8 AS id,
                  "PES_CODIGO"::int8 AS "PES_CODIGO",
                  status,
                  valor_total::numeric AS valor_total,
                  created_at::timestamp AS created_at
        "#,
    )
    .bind(id)
    .bind(from.as_db_str())
    .bind(to.as_db_str())
    .fetch_optional(pool)
    .await
}

/// 更新客户的健康开票量与修正系数
pub async fn update_client_settings(
    pool: &PgPool,
    code: i64,
    settings: &ClientSettings,
) -> Result<Option<ClientRow>, sqlx::Error> {
    sqlx::query_as::<_, ClientRow>(
        r#"
        UPDATE bk_clientes
        SET volume_saudavel_faturamento = $2,
            fator_correcao = $3
        WHERE "PES_CODIGO" = $1
        RETURNING "PES_CODIGO"::int8 AS "PES_CODIGO",
                  "APELIDO",
                  volume_saudavel_faturamento::numeric AS volume_saudavel_faturamento,
                  fator_correcao::int4 AS fator_correcao
        "#,
    )
    .bind(code)
    .bind(settings.healthy_volume.clone())
    .bind(settings.correction_factor)
    .fetch_optional(pool)
    .await
}
