//! CSV batch intake of alumni

use std::collections::HashSet;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim, Writer};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::{CoreErrorKind, CoreResult, ImportExportError, ImportExportResult};

use super::alumni_service::{
    validate_graduation_year, AlumniService, AlumnusProfileInput, RegisterAlumnusRequest,
};
use super::auth_service::AuthService;

pub const TEMPLATE_HEADER: [&str; 11] = [
    "full_name",
    "email",
    "curso",
    "unidade",
    "ano_conclusao",
    "telefone",
    "cidade",
    "estado",
    "status_profissional",
    "empresa_atual",
    "cargo_atual",
];

pub const REQUIRED_COLUMNS: [&str; 4] = ["full_name", "email", "curso", "ano_conclusao"];

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ImportResult {
    pub success: usize,
    pub errors: Vec<String>,
}

/// One data row with the line it came from
#[derive(Debug, Clone)]
pub struct ParsedRow {
    pub line: u64,
    pub request: RegisterAlumnusRequest,
}

struct Columns {
    indexes: Vec<Option<usize>>,
}

impl Columns {
    fn from_header(header: &StringRecord) -> ImportExportResult<Self> {
        let normalized: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();

        for required in REQUIRED_COLUMNS {
            if !normalized.iter().any(|h| h == required) {
                return Err(ImportExportError::MissingColumn(required.to_string()));
            }
        }

        let indexes = TEMPLATE_HEADER
            .iter()
            .map(|name| normalized.iter().position(|h| h == name))
            .collect();
        Ok(Self { indexes })
    }

    fn get(&self, record: &StringRecord, name: &str) -> Option<String> {
        let slot = TEMPLATE_HEADER.iter().position(|h| *h == name)?;
        self.indexes[slot]
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

fn line_error(line: u64, reason: impl std::fmt::Display) -> String {
    format!("Linha {}: {}", line, reason)
}

/// Parse the file into rows; row-level problems become `Linha N` messages
pub fn parse_csv(content: &str) -> ImportExportResult<(Vec<ParsedRow>, Vec<String>)> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let header = reader.headers()?.clone();
    if header.iter().all(|h| h.is_empty()) {
        return Err(ImportExportError::EmptyFile);
    }
    let columns = Columns::from_header(&header)?;

    let mut rows = Vec::new();
    let mut errors = Vec::new();
    let mut seen_emails = HashSet::new();

    for (index, record) in reader.records().enumerate() {
        let fallback_line = index as u64 + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(fallback_line);
                errors.push(line_error(line, "Formato inválido"));
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(fallback_line);

        if record.iter().all(|v| v.is_empty()) {
            continue;
        }

        let full_name = columns.get(&record, "full_name");
        let email = columns.get(&record, "email").map(|e| e.to_lowercase());
        let course = columns.get(&record, "curso");

        let (full_name, email, course) = match (full_name, email, course) {
            (Some(n), Some(e), Some(c)) => (n, e, c),
            _ => {
                errors.push(line_error(line, "Campos obrigatórios ausentes"));
                continue;
            }
        };

        if AuthService::validate_email(&email).is_err() {
            errors.push(line_error(line, format!("Email inválido - {}", email)));
            continue;
        }

        let year = columns
            .get(&record, "ano_conclusao")
            .and_then(|y| y.parse::<i32>().ok());
        let graduation_year = match year {
            Some(year) if validate_graduation_year(year).is_ok() => year,
            _ => {
                errors.push(line_error(line, "Ano de conclusão inválido"));
                continue;
            }
        };

        if !seen_emails.insert(email.clone()) {
            errors.push(line_error(line, format!("Email duplicado no arquivo - {}", email)));
            continue;
        }

        rows.push(ParsedRow {
            line,
            request: RegisterAlumnusRequest {
                full_name,
                email,
                profile: AlumnusProfileInput {
                    course,
                    unit: columns.get(&record, "unidade"),
                    graduation_year,
                    phone: columns.get(&record, "telefone"),
                    city: columns.get(&record, "cidade"),
                    state: columns.get(&record, "estado"),
                    employment_status: columns.get(&record, "status_profissional"),
                    current_employer: columns.get(&record, "empresa_atual"),
                    current_position: columns.get(&record, "cargo_atual"),
                    ..Default::default()
                },
            },
        });
    }

    debug!("Parsed {} rows with {} errors", rows.len(), errors.len());
    Ok((rows, errors))
}

/// Template CSV offered for download on the intake screen
pub fn csv_template() -> ImportExportResult<String> {
    let mut wtr = Writer::from_writer(vec![]);

    wtr.write_record(TEMPLATE_HEADER)?;
    wtr.write_record([
        "João Silva",
        "joao@email.com",
        "Ciência da Computação",
        "BH",
        "2020",
        "(31) 99999-9999",
        "Belo Horizonte",
        "MG",
        "Empregado",
        "Tech Corp",
        "Desenvolvedor",
    ])?;
    wtr.write_record([
        "Maria Santos",
        "maria@email.com",
        "Administração",
        "BARBACENA",
        "2019",
        "(32) 88888-8888",
        "Barbacena",
        "MG",
        "Empreendedor",
        "Consultoria Própria",
        "Consultora",
    ])?;

    let data = wtr
        .into_inner()
        .map_err(|e| ImportExportError::ExportFailed(e.to_string()))?;
    Ok(String::from_utf8(data)?)
}

#[derive(Clone)]
pub struct ImportService {
    alumni: AlumniService,
}

impl ImportService {
    pub fn new(alumni: AlumniService) -> Self {
        Self { alumni }
    }

    /// Read a CSV file from disk and import it
    pub async fn import_file(&self, path: &Path) -> CoreResult<ImportResult> {
        let content = std::fs::read_to_string(path).map_err(ImportExportError::from)?;
        info!("Importing alumni from {}", path.display());
        self.import_csv(&content).await
    }

    /// Create every valid row; the rest are reported by line
    pub async fn import_csv(&self, content: &str) -> CoreResult<ImportResult> {
        let (rows, mut errors) = parse_csv(content)?;
        let mut success = 0;

        for row in rows {
            if let Some(unit) = row.request.profile.unit.clone() {
                match self
                    .alumni
                    .unit_offers_course(&unit, &row.request.profile.course)
                    .await
                {
                    Ok(true) => {}
                    Ok(false) => {
                        errors.push(line_error(
                            row.line,
                            "Curso inválido para a unidade selecionada",
                        ));
                        continue;
                    }
                    Err(e) if e.kind() == CoreErrorKind::NotFound => {
                        errors.push(line_error(row.line, format!("Unidade desconhecida - {}", unit)));
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            }

            let email = row.request.email.clone();
            match self.alumni.register_alumnus(row.request).await {
                Ok(_) => success += 1,
                Err(e) if e.kind() == CoreErrorKind::Conflict => {
                    errors.push(line_error(row.line, format!("Email já cadastrado - {}", email)));
                }
                Err(e) => {
                    warn!("Row {} rejected: {}", row.line, e);
                    errors.push(line_error(row.line, e.message()));
                }
            }
        }

        errors.sort_by_key(|e| {
            e.trim_start_matches("Linha ")
                .split(':')
                .next()
                .and_then(|n| n.parse::<u64>().ok())
                .unwrap_or(u64::MAX)
        });

        info!("Import finished: {} created, {} errors", success, errors.len());
        Ok(ImportResult { success, errors })
    }
}
