use csv::Writer;

use crate::errors::ImportExportResult;
use crate::services::alumni_service::AlumnusRow;

pub const HEADER: [&str; 8] = [
    "Nome",
    "Email",
    "Curso",
    "Ano Conclusão",
    "Status",
    "Empresa",
    "Cargo",
    "Telefone",
];

pub fn render(rows: &[AlumnusRow]) -> ImportExportResult<String> {
    let mut wtr = Writer::from_writer(vec![]);

    wtr.write_record(HEADER)?;

    for row in rows {
        wtr.write_record([
            row.full_name.clone(),
            row.email.clone(),
            row.course.clone(),
            row.graduation_year.to_string(),
            row.employment_status.clone().unwrap_or_default(),
            row.current_employer.clone().unwrap_or_default(),
            row.current_position.clone().unwrap_or_default(),
            row.phone.clone().unwrap_or_default(),
        ])?;
    }

    let data = wtr.into_inner().map_err(|e| e.into_error())?;
    let csv_string = String::from_utf8(data)?;

    Ok(csv_string)
}
