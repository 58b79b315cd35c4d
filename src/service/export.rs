use std::io::Write;

use crate::models::EnrichedClientRecord;

const HEADER: [&str; 10] = [
    "PES_CODIGO",
    "APELIDO",
    "REPRESENTANTE",
    "TOTAL_FATURADO",
    "TOTAL_EM_ABERTO",
    "TOTAL_VENCIDO",
    "RISCO",
    "SEPARACOES",
    "VOLUME_SAUDAVEL",
    "FATOR_CORRECAO",
];

fn option_to_csv<T: ToString>(val: &Option<T>) -> String {
    val.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

/// 导出看板记录为 CSV (含表头)
pub fn write_csv<W: Write>(records: &[EnrichedClientRecord], output: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(HEADER)?;

    for record in records {
        writer.write_record(&[
            option_to_csv(&record.client_code),
            record.client.alias.clone().unwrap_or_default(),
            record.representative_name.clone().unwrap_or_default(),
            record.total_billed.to_string(),
            record.total_open.to_string(),
            record.total_overdue.to_string(),
            record.risk.to_string(),
            record.separations.len().to_string(),
            option_to_csv(&record.client.healthy_volume),
            option_to_csv(&record.client.correction_factor),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn to_csv_string(records: &[EnrichedClientRecord]) -> Result<String, csv::Error> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| csv::Error::from(std::io::Error::other(e)))
}
