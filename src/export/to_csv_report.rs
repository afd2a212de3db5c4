use csv::{Writer, WriterBuilder};

use crate::errors::ImportExportResult;
use crate::services::report_service::Report;

fn writer() -> Writer<Vec<u8>> {
    WriterBuilder::new().flexible(true).from_writer(vec![])
}

fn finish(wtr: Writer<Vec<u8>>, out: &mut Vec<u8>) -> ImportExportResult<()> {
    out.extend(wtr.into_inner().map_err(|e| e.into_error())?);
    Ok(())
}

/// Title row, then each section as title, header and rows, separated by blank lines
pub fn render(report: &Report) -> ImportExportResult<String> {
    let mut out = Vec::new();

    let mut wtr = writer();
    wtr.write_record([report.title.to_uppercase()])?;
    finish(wtr, &mut out)?;

    for section in &report.sections {
        // csv writes an empty record as `""`, so the separator goes in directly
        out.push(b'\n');

        let mut wtr = writer();
        wtr.write_record([section.title.to_uppercase()])?;
        wtr.write_record(&section.columns)?;
        for row in &section.rows {
            wtr.write_record(row.iter().map(|cell| cell.render()))?;
        }
        finish(wtr, &mut out)?;
    }

    let csv_string = String::from_utf8(out)?;

    Ok(csv_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::report_service::{alumni_profile, ReportData};

    #[test]
    fn test_sections_are_separated_by_blank_rows() {
        let report = alumni_profile(&ReportData::default());
        let csv = render(&report).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "RELATÓRIO DE PERFIL DOS EGRESSOS");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "FAIXA ETÁRIA");
        assert_eq!(lines[3], "Faixa,Quantidade");
        assert!(lines.contains(&"SITUAÇÃO NO MERCADO"));
        assert!(!csv.contains("\"\""));
    }
}
