// src/services/numbering.rs
//
// Formato do número de orçamento: DEV-YYYYMMDD-NNNN.
// O número aparece nos documentos emitidos, então o formato é um
// contrato externo e não pode mudar. A sequência NNNN reinicia em 0001
// a cada (empresa, dia); a alocação atômica em si vive no QuoteRepository.

use chrono::NaiveDate;

/// Prefixo de um dia: "DEV-20260807-".
pub fn day_prefix(date: NaiveDate) -> String {
    format!("DEV-{}-", date.format("%Y%m%d"))
}

/// Monta o número completo: sequência com 4 dígitos, zero à esquerda.
pub fn format_quote_number(date: NaiveDate, seq: i32) -> String {
    format!("{}{:04}", day_prefix(date), seq)
}

/// Extrai a sequência do sufixo de um número existente.
/// Devolve None para números fora do formato (defensivo contra dados
/// legados; quem chama decide ignorar a linha).
pub fn parse_sequence(quote_number: &str) -> Option<i32> {
    quote_number
        .rsplit('-')
        .next()
        .and_then(|suffix| suffix.parse::<i32>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn formato_do_numero() {
        assert_eq!(format_quote_number(date(2026, 8, 7), 1), "DEV-20260807-0001");
        assert_eq!(format_quote_number(date(2026, 1, 3), 42), "DEV-20260103-0042");
        // Acima de 9999 o campo cresce em vez de truncar
        assert_eq!(
            format_quote_number(date(2026, 8, 7), 10000),
            "DEV-20260807-10000"
        );
    }

    #[test]
    fn prefixo_do_dia() {
        assert_eq!(day_prefix(date(2026, 8, 7)), "DEV-20260807-");
    }

    #[test]
    fn parse_da_sequencia() {
        assert_eq!(parse_sequence("DEV-20260807-0001"), Some(1));
        assert_eq!(parse_sequence("DEV-20260807-0137"), Some(137));
        assert_eq!(parse_sequence("DEV-20260807-10000"), Some(10000));
        assert_eq!(parse_sequence("sem-sequencia-xyz"), None);
        assert_eq!(parse_sequence(""), None);
    }

    #[test]
    fn ida_e_volta() {
        let d = date(2026, 12, 31);
        for seq in [1, 7, 999, 9999] {
            assert_eq!(parse_sequence(&format_quote_number(d, seq)), Some(seq));
        }
    }
}
