//! Institutional reports computed from stored alumni, survey and event rows.
//!
//! Every report is a titled list of sections. A section is a small table,
//! which keeps JSON and CSV rendering uniform across the five reports.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::database::entities::{
    alumni, event_categories, event_participants, event_ratings, events, pedagogical_feedback,
    questions, responses,
};
use crate::errors::{CoreError, CoreResult};

use super::survey_service::{QuestionKind, YES, NO};

/// Response categories the reports read from survey answers
pub mod categories {
    pub const FIRST_JOB: &str = "tempo_primeiro_emprego";
    pub const BOND_TYPE: &str = "tipo_vinculo";
    pub const WORKS_IN_FIELD: &str = "atuacao_area";
    pub const POSTGRAD_TYPE: &str = "tipo_pos_graduacao";
    pub const RECOMMENDATION: &str = "recomendacao";
}

const NOT_INFORMED: &str = "Não informado";
const LEADERSHIP_TERMS: [&str; 9] = [
    "diretor", "diretora", "gerente", "coordenador", "coordenadora", "supervisor", "presidente",
    "chefe", "ceo",
];
const WORKING_STATUSES: [&str; 3] = ["Empregado", "Empreendedor", "Autônomo"];

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    AlumniProfile,
    JobMarket,
    ContinuingEducation,
    Satisfaction,
    SocialImpact,
}

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        ReportKind::AlumniProfile,
        ReportKind::JobMarket,
        ReportKind::ContinuingEducation,
        ReportKind::Satisfaction,
        ReportKind::SocialImpact,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            ReportKind::AlumniProfile => "alumni-profile",
            ReportKind::JobMarket => "job-market",
            ReportKind::ContinuingEducation => "continuing-education",
            ReportKind::Satisfaction => "satisfaction",
            ReportKind::SocialImpact => "social-impact",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::AlumniProfile => "Relatório de Perfil dos Egressos",
            ReportKind::JobMarket => "Relatório de Inserção Profissional",
            ReportKind::ContinuingEducation => "Relatório de Continuidade Acadêmica",
            ReportKind::Satisfaction => "Relatório de Satisfação e Percepção",
            ReportKind::SocialImpact => "Relatório de Impacto Social",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ReportKind::AlumniProfile => "Faixa etária, gênero, localidade, curso e situação no mercado",
            ReportKind::JobMarket => "Tempo até o primeiro emprego, vínculos e principais empregadores",
            ReportKind::ContinuingEducation => "Pós-graduação e formação continuada dos egressos",
            ReportKind::Satisfaction => "Avaliação do curso, recomendação e indicadores pedagógicos",
            ReportKind::SocialImpact => "Distribuição geográfica, empreendedorismo e liderança",
        }
    }

    pub fn file_name(&self) -> String {
        format!("relatorio_{}.csv", self.slug().replace('-', "_"))
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ReportKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportKind::ALL
            .into_iter()
            .find(|k| k.slug() == s)
            .ok_or_else(|| CoreError::not_found("Report", s))
    }
}

/// A report cell. Percentages render with a `%` suffix in CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Count(usize),
    Number(f64),
    Text(String),
    Percent { percent: f64 },
}

impl Cell {
    pub fn percent(value: f64) -> Self {
        Cell::Percent {
            percent: round1(value),
        }
    }

    pub fn number(value: f64) -> Self {
        Cell::Number(round1(value))
    }

    pub fn render(&self) -> String {
        match self {
            Cell::Count(n) => n.to_string(),
            Cell::Number(n) => format!("{:.1}", n),
            Cell::Text(s) => s.clone(),
            Cell::Percent { percent } => format!("{:.1}%", percent),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<usize> for Cell {
    fn from(n: usize) -> Self {
        Cell::Count(n)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ReportSection {
    fn new(title: &str, columns: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    fn row(mut self, cells: Vec<Cell>) -> Self {
        self.rows.push(cells);
        self
    }

    fn rows(mut self, rows: impl IntoIterator<Item = Vec<Cell>>) -> Self {
        self.rows.extend(rows);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub label: String,
    pub value: Cell,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub kind: ReportKind,
    pub title: String,
    pub headline: Headline,
    pub sections: Vec<ReportSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub kind: ReportKind,
    pub title: String,
    pub description: String,
    pub headline: Headline,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportFilters {
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub course: Option<String>,
    pub unit: Option<String>,
}

impl ReportFilters {
    pub fn matches(&self, alumnus: &alumni::Model) -> bool {
        if self.year_from.map(|y| alumnus.graduation_year < y).unwrap_or(false) {
            return false;
        }
        if self.year_to.map(|y| alumnus.graduation_year > y).unwrap_or(false) {
            return false;
        }
        if let Some(course) = self.course.as_deref().filter(|c| !c.is_empty()) {
            if alumnus.course != course {
                return false;
            }
        }
        if let Some(unit) = self.unit.as_deref().filter(|u| !u.is_empty()) {
            if alumnus.unit.as_deref() != Some(unit) {
                return false;
            }
        }
        true
    }
}

/// Everything a report reads, loaded once
#[derive(Debug, Clone, Default)]
pub struct ReportData {
    pub current_year: i32,
    pub alumni: Vec<alumni::Model>,
    pub responses: Vec<responses::Model>,
    pub likert_questions: HashSet<i32>,
    pub ratings: Vec<event_ratings::Model>,
    /// Participant count per event category name
    pub participation: BTreeMap<String, usize>,
    pub feedback: Vec<pedagogical_feedback::Model>,
}

impl ReportData {
    fn answers(&self, category: &str) -> impl Iterator<Item = &responses::Model> {
        let category = category.to_string();
        self.responses
            .iter()
            .filter(move |r| r.response_category.as_deref() == Some(category.as_str()))
    }

    fn total(&self) -> usize {
        self.alumni.len()
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn share(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round1(part as f64 * 100.0 / total as f64)
    }
}

fn informed(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_INFORMED)
        .to_string()
}

/// Counts sorted by count descending, then label
fn tally<I: IntoIterator<Item = String>>(values: I) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

fn count_rows(counts: Vec<(String, usize)>) -> impl Iterator<Item = Vec<Cell>> {
    counts.into_iter().map(|(label, n)| vec![label.into(), n.into()])
}

fn percent_rows(counts: Vec<(String, usize)>, total: usize) -> impl Iterator<Item = Vec<Cell>> {
    counts
        .into_iter()
        .map(move |(label, n)| vec![label.into(), n.into(), Cell::percent(share(n, total))])
}

pub fn age_band(birth_year: Option<i32>, current_year: i32) -> &'static str {
    match birth_year.map(|y| current_year - y) {
        None => NOT_INFORMED,
        Some(age) if age <= 25 => "Até 25 anos",
        Some(age) if age <= 30 => "26-30 anos",
        Some(age) if age <= 35 => "31-35 anos",
        Some(age) if age <= 40 => "36-40 anos",
        Some(_) => "41+ anos",
    }
}

fn is_working(alumnus: &alumni::Model) -> bool {
    alumnus
        .employment_status
        .as_deref()
        .map(|s| WORKING_STATUSES.contains(&s))
        .unwrap_or(false)
}

pub fn is_leadership(position: &str) -> bool {
    let lower = position.to_lowercase();
    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| LEADERSHIP_TERMS.contains(&word))
}

pub fn alumni_profile(data: &ReportData) -> Report {
    let total = data.total();

    let bands = ["Até 25 anos", "26-30 anos", "31-35 anos", "36-40 anos", "41+ anos", NOT_INFORMED];
    let mut by_band: HashMap<&str, usize> = HashMap::new();
    for alumnus in &data.alumni {
        *by_band
            .entry(age_band(alumnus.birth_year, data.current_year))
            .or_default() += 1;
    }
    let ages = ReportSection::new("Faixa Etária", &["Faixa", "Quantidade"]).rows(
        bands
            .iter()
            .filter_map(|b| by_band.get(b).map(|n| vec![(*b).into(), (*n).into()])),
    );

    let genders = ReportSection::new("Gênero", &["Gênero", "Quantidade"]).rows(count_rows(tally(
        data.alumni.iter().map(|a| informed(a.gender.as_deref())),
    )));

    let location = ReportSection::new("Localidade", &["Estado", "Cidade", "Quantidade"]).rows(
        tally(data.alumni.iter().map(|a| {
            format!("{}\u{1f}{}", informed(a.state.as_deref()), informed(a.city.as_deref()))
        }))
        .into_iter()
        .map(|(key, n)| {
            let (state, city) = key.split_once('\u{1f}').unwrap_or((key.as_str(), ""));
            vec![state.into(), city.into(), n.into()]
        }),
    );

    let mut by_course: BTreeMap<&str, (usize, i64)> = BTreeMap::new();
    for alumnus in &data.alumni {
        let entry = by_course.entry(alumnus.course.as_str()).or_default();
        entry.0 += 1;
        entry.1 += i64::from(data.current_year - alumnus.graduation_year);
    }
    let courses = ReportSection::new(
        "Cursos",
        &["Curso", "Quantidade", "Tempo Médio Desde a Conclusão (anos)"],
    )
    .rows(by_course.into_iter().map(|(course, (n, years))| {
        vec![course.into(), n.into(), Cell::number(years as f64 / n as f64)]
    }));

    let market = ReportSection::new("Situação no Mercado", &["Situação", "Quantidade", "Percentual"])
        .rows(percent_rows(
            tally(data.alumni.iter().map(|a| informed(a.employment_status.as_deref()))),
            total,
        ));

    Report {
        kind: ReportKind::AlumniProfile,
        title: ReportKind::AlumniProfile.title().to_string(),
        headline: Headline {
            label: "Egressos".to_string(),
            value: total.into(),
        },
        sections: vec![ages, genders, location, courses, market],
    }
}

pub fn job_market(data: &ReportData) -> Report {
    let total = data.total();
    let working = data.alumni.iter().filter(|a| is_working(a)).count();

    let first_job = ReportSection::new("Tempo até Primeiro Emprego", &["Tempo", "Quantidade"])
        .rows(count_rows(tally(
            data.answers(categories::FIRST_JOB).map(|r| r.answer.clone()),
        )));

    let bonds: Vec<String> = data
        .answers(categories::BOND_TYPE)
        .map(|r| r.answer.clone())
        .collect();
    let bond_total = bonds.len();
    let bond = ReportSection::new("Tipo de Vínculo", &["Tipo", "Quantidade", "Percentual"])
        .rows(percent_rows(tally(bonds), bond_total));

    let employers = ReportSection::new("Principais Empresas", &["Empresa", "Quantidade"]).rows(
        count_rows(tally(data.alumni.iter().filter_map(|a| {
            a.current_employer
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string)
        })))
        .take(10),
    );

    let status = ReportSection::new("Situação Profissional", &["Situação", "Quantidade", "Percentual"])
        .rows(percent_rows(
            tally(data.alumni.iter().map(|a| informed(a.employment_status.as_deref()))),
            total,
        ));

    let field_answers: Vec<bool> = data
        .answers(categories::WORKS_IN_FIELD)
        .filter_map(|r| r.numeric_value.map(|v| v >= 1.0))
        .collect();
    let in_field = field_answers.iter().filter(|v| **v).count();
    let field = ReportSection::new("Atuação na Área de Formação", &["Categoria", "Quantidade", "Percentual"])
        .row(vec![
            "Na área".into(),
            in_field.into(),
            Cell::percent(share(in_field, field_answers.len())),
        ])
        .row(vec![
            "Fora da área".into(),
            (field_answers.len() - in_field).into(),
            Cell::percent(share(field_answers.len() - in_field, field_answers.len())),
        ]);

    Report {
        kind: ReportKind::JobMarket,
        title: ReportKind::JobMarket.title().to_string(),
        headline: Headline {
            label: "Taxa de empregabilidade".to_string(),
            value: Cell::percent(share(working, total)),
        },
        sections: vec![first_job, bond, employers, status, field],
    }
}

pub fn continuing_education(data: &ReportData) -> Report {
    let total = data.total();
    let entries: Vec<String> = data
        .alumni
        .iter()
        .filter_map(|a| {
            a.continuing_education
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
        })
        .collect();
    let continuing = entries.len();

    let education = ReportSection::new("Formação Continuada", &["Formação", "Quantidade", "Percentual"])
        .rows(percent_rows(tally(entries), total));

    let postgrad: Vec<String> = data
        .answers(categories::POSTGRAD_TYPE)
        .map(|r| r.answer.clone())
        .collect();
    let postgrad_total = postgrad.len();
    let postgrad = ReportSection::new("Tipo de Pós-Graduação", &["Tipo", "Quantidade", "Percentual"])
        .rows(percent_rows(tally(postgrad), postgrad_total));

    let overview = ReportSection::new("Continuidade dos Estudos", &["Categoria", "Quantidade", "Percentual"])
        .row(vec![
            "Continuam estudando".into(),
            continuing.into(),
            Cell::percent(share(continuing, total)),
        ])
        .row(vec![
            "Não informaram formação".into(),
            (total - continuing).into(),
            Cell::percent(share(total - continuing, total)),
        ]);

    Report {
        kind: ReportKind::ContinuingEducation,
        title: ReportKind::ContinuingEducation.title().to_string(),
        headline: Headline {
            label: "Continuam estudando".to_string(),
            value: Cell::percent(share(continuing, total)),
        },
        sections: vec![overview, education, postgrad],
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Recommendation {
    pub yes: usize,
    pub no: usize,
    pub maybe: usize,
}

pub fn recommendation(data: &ReportData) -> Recommendation {
    let mut counts = Recommendation::default();
    for rating in &data.ratings {
        if rating.would_recommend {
            counts.yes += 1;
        } else {
            counts.no += 1;
        }
    }
    for answer in data.answers(categories::RECOMMENDATION) {
        match answer.answer.as_str() {
            YES => counts.yes += 1,
            NO => counts.no += 1,
            _ => counts.maybe += 1,
        }
    }
    counts
}

pub fn satisfaction(data: &ReportData) -> Report {
    let mut by_category: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for response in &data.responses {
        if !data.likert_questions.contains(&response.question_id) {
            continue;
        }
        if let Some(value) = response.numeric_value {
            let category = informed(response.response_category.as_deref());
            by_category.entry(category).or_default().push(value);
        }
    }

    let mut all_values = 0usize;
    let mut all_satisfied = 0usize;
    let evaluation = ReportSection::new(
        "Avaliação Geral",
        &["Aspecto", "Nota Média", "Respostas", "Satisfação"],
    )
    .rows(
        by_category
            .into_iter()
            .map(|(category, values)| {
                let satisfied = values.iter().filter(|v| **v >= 4.0).count();
                all_values += values.len();
                all_satisfied += satisfied;
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                vec![
                    category.into(),
                    Cell::number(mean),
                    values.len().into(),
                    Cell::percent(share(satisfied, values.len())),
                ]
            })
            .collect::<Vec<_>>(),
    );

    let rec = recommendation(data);
    let rec_total = rec.yes + rec.no + rec.maybe;
    let recommend = ReportSection::new("Recomendação", &["Resposta", "Quantidade", "Percentual"])
        .row(vec!["Sim".into(), rec.yes.into(), Cell::percent(share(rec.yes, rec_total))])
        .row(vec!["Não".into(), rec.no.into(), Cell::percent(share(rec.no, rec_total))])
        .row(vec!["Talvez".into(), rec.maybe.into(), Cell::percent(share(rec.maybe, rec_total))]);

    let indicators = ReportSection::new(
        "Indicadores Pedagógicos",
        &["Categoria", "Indicador", "Média", "Respostas", "Período"],
    )
    .rows(data.feedback.iter().map(|f| {
        vec![
            f.category.clone().into(),
            f.indicator.clone().into(),
            Cell::number(f.mean_value),
            (f.total_responses.max(0) as usize).into(),
            f.reference_period.clone().into(),
        ]
    }));

    Report {
        kind: ReportKind::Satisfaction,
        title: ReportKind::Satisfaction.title().to_string(),
        headline: Headline {
            label: "Satisfação geral".to_string(),
            value: Cell::percent(share(all_satisfied, all_values)),
        },
        sections: vec![evaluation, recommend, indicators],
    }
}

pub fn social_impact(data: &ReportData) -> Report {
    let states = ReportSection::new("Egressos por Estado", &["Estado", "Quantidade"]).rows(
        count_rows(tally(data.alumni.iter().map(|a| informed(a.state.as_deref())))),
    );
    let cities = ReportSection::new("Egressos por Cidade", &["Cidade", "Quantidade"]).rows(
        count_rows(tally(data.alumni.iter().map(|a| informed(a.city.as_deref())))),
    );

    let entrepreneurs = data
        .alumni
        .iter()
        .filter(|a| a.employment_status.as_deref() == Some("Empreendedor"))
        .count();
    let entrepreneurship = ReportSection::new("Empreendedorismo", &["Categoria", "Quantidade", "Percentual"])
        .row(vec![
            "Empreendedores".into(),
            entrepreneurs.into(),
            Cell::percent(share(entrepreneurs, data.total())),
        ]);

    let participation = ReportSection::new("Participação em Eventos", &["Categoria", "Participantes"])
        .rows(
            data.participation
                .iter()
                .map(|(category, n)| vec![category.clone().into(), (*n).into()]),
        );

    let leaders = ReportSection::new("Cargos de Liderança", &["Cargo", "Quantidade"]).rows(count_rows(
        tally(data.alumni.iter().filter_map(|a| {
            a.current_position
                .as_deref()
                .map(str::trim)
                .filter(|p| is_leadership(p))
                .map(str::to_string)
        })),
    ));

    let participants: usize = data.participation.values().sum();
    Report {
        kind: ReportKind::SocialImpact,
        title: ReportKind::SocialImpact.title().to_string(),
        headline: Headline {
            label: "Participações em eventos".to_string(),
            value: participants.into(),
        },
        sections: vec![states, cities, entrepreneurship, participation, leaders],
    }
}

pub fn build(kind: ReportKind, data: &ReportData) -> Report {
    match kind {
        ReportKind::AlumniProfile => alumni_profile(data),
        ReportKind::JobMarket => job_market(data),
        ReportKind::ContinuingEducation => continuing_education(data),
        ReportKind::Satisfaction => satisfaction(data),
        ReportKind::SocialImpact => social_impact(data),
    }
}

#[derive(Clone)]
pub struct ReportService {
    db: DatabaseConnection,
}

impl ReportService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Load the rows the reports read, narrowed to the filtered alumni
    pub async fn load(&self, filters: &ReportFilters) -> CoreResult<ReportData> {
        let alumni: Vec<alumni::Model> = alumni::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .filter(|a| filters.matches(a))
            .collect();
        let ids: HashSet<i32> = alumni.iter().map(|a| a.id).collect();

        let responses: Vec<responses::Model> = responses::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .filter(|r| ids.contains(&r.alumnus_id))
            .collect();

        let likert_questions: HashSet<i32> = questions::Entity::find()
            .filter(questions::Column::Kind.eq(QuestionKind::LikertScale.as_str()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|q| q.id)
            .collect();

        let ratings: Vec<event_ratings::Model> = event_ratings::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .filter(|r| ids.contains(&r.alumnus_id))
            .collect();

        let category_names: HashMap<i32, String> = event_categories::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        let event_category: HashMap<i32, String> = events::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|e| {
                let name = e
                    .category_id
                    .and_then(|id| category_names.get(&id).cloned())
                    .unwrap_or_else(|| "Sem categoria".to_string());
                (e.id, name)
            })
            .collect();
        let mut participation: BTreeMap<String, usize> = BTreeMap::new();
        for participant in event_participants::Entity::find().all(&self.db).await? {
            if !ids.contains(&participant.alumnus_id) {
                continue;
            }
            if let Some(name) = event_category.get(&participant.event_id) {
                *participation.entry(name.clone()).or_default() += 1;
            }
        }

        let feedback = pedagogical_feedback::Entity::find().all(&self.db).await?;

        debug!(
            "Loaded report data: {} alumni, {} responses, {} ratings",
            alumni.len(),
            responses.len(),
            ratings.len()
        );

        Ok(ReportData {
            current_year: Utc::now().year(),
            alumni,
            responses,
            likert_questions,
            ratings,
            participation,
            feedback,
        })
    }

    pub async fn report(&self, kind: ReportKind, filters: &ReportFilters) -> CoreResult<Report> {
        let data = self.load(filters).await?;
        Ok(build(kind, &data))
    }

    /// The five reports with their headline statistic
    pub async fn hub(&self) -> CoreResult<Vec<ReportSummary>> {
        let data = self.load(&ReportFilters::default()).await?;
        Ok(ReportKind::ALL
            .into_iter()
            .map(|kind| ReportSummary {
                kind,
                title: kind.title().to_string(),
                description: kind.description().to_string(),
                headline: build(kind, &data).headline,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alumnus(id: i32, course: &str, status: Option<&str>) -> alumni::Model {
        let now = Utc::now();
        alumni::Model {
            id,
            profile_id: id,
            course: course.to_string(),
            unit: Some("BH".to_string()),
            graduation_year: 2020,
            phone: None,
            address: None,
            city: Some("Belo Horizonte".to_string()),
            state: Some("MG".to_string()),
            employment_status: status.map(str::to_string),
            current_employer: None,
            current_position: None,
            continuing_education: None,
            linkedin_url: None,
            facebook_url: None,
            instagram_url: None,
            personal_site: None,
            gender: None,
            birth_year: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn response(alumnus_id: i32, question_id: i32, category: &str, answer: &str, value: Option<f64>) -> responses::Model {
        responses::Model {
            id: alumnus_id * 100 + question_id,
            alumnus_id,
            survey_id: 1,
            question_id,
            answer: answer.to_string(),
            numeric_value: value,
            response_category: Some(category.to_string()),
            created_at: Utc::now(),
        }
    }

    fn data() -> ReportData {
        let mut a = alumnus(1, "Direito", Some("Empregado"));
        a.birth_year = Some(1995);
        a.current_position = Some("Gerente de Projetos".to_string());
        a.continuing_education = Some("Mestrado".to_string());
        let mut b = alumnus(2, "Direito", Some("Empreendedor"));
        b.graduation_year = 2016;
        let c = alumnus(3, "Pedagogia", Some("Desempregado"));

        ReportData {
            current_year: 2024,
            alumni: vec![a, b, c],
            responses: vec![
                response(1, 10, "satisfacao_ensino", "Satisfeito", Some(4.0)),
                response(2, 10, "satisfacao_ensino", "Neutro", Some(3.0)),
                response(1, 11, categories::RECOMMENDATION, YES, Some(1.0)),
                response(2, 11, categories::RECOMMENDATION, NO, Some(0.0)),
                response(1, 12, categories::WORKS_IN_FIELD, YES, Some(1.0)),
            ],
            likert_questions: HashSet::from([10]),
            ..Default::default()
        }
    }

    fn section<'a>(report: &'a Report, title: &str) -> &'a ReportSection {
        report.sections.iter().find(|s| s.title == title).unwrap()
    }

    #[test]
    fn test_age_bands() {
        assert_eq!(age_band(Some(2000), 2024), "Até 25 anos");
        assert_eq!(age_band(Some(1990), 2024), "31-35 anos");
        assert_eq!(age_band(Some(1970), 2024), "41+ anos");
        assert_eq!(age_band(None, 2024), NOT_INFORMED);
    }

    #[test]
    fn test_profile_course_mean_years() {
        let report = alumni_profile(&data());
        let courses = section(&report, "Cursos");
        assert_eq!(
            courses.rows[0],
            vec![Cell::from("Direito"), Cell::Count(2), Cell::Number(6.0)]
        );
        assert_eq!(report.headline.value, Cell::Count(3));
    }

    #[test]
    fn test_job_market_headline_counts_working_statuses() {
        let report = job_market(&data());
        assert_eq!(report.headline.value, Cell::percent(66.7));
        let field = section(&report, "Atuação na Área de Formação");
        assert_eq!(field.rows[0][1], Cell::Count(1));
    }

    #[test]
    fn test_satisfaction_only_reads_likert_answers() {
        let report = satisfaction(&data());
        let evaluation = section(&report, "Avaliação Geral");
        assert_eq!(evaluation.rows.len(), 1);
        assert_eq!(evaluation.rows[0][1], Cell::Number(3.5));
        assert_eq!(evaluation.rows[0][3], Cell::percent(50.0));
    }

    #[test]
    fn test_recommendation_counts() {
        let rec = recommendation(&data());
        assert_eq!(rec, Recommendation { yes: 1, no: 1, maybe: 0 });
    }

    #[test]
    fn test_leadership_detection() {
        assert!(is_leadership("Gerente de Projetos"));
        assert!(is_leadership("CEO"));
        assert!(!is_leadership("Desenvolvedor"));
        let report = social_impact(&data());
        assert_eq!(section(&report, "Cargos de Liderança").rows.len(), 1);
    }

    #[test]
    fn test_filters_narrow_by_year_range() {
        let filters = ReportFilters {
            year_from: Some(2018),
            ..Default::default()
        };
        let d = data();
        let kept: Vec<i32> = d.alumni.iter().filter(|a| filters.matches(a)).map(|a| a.id).collect();
        assert_eq!(kept, vec![1, 3]);
    }

    #[test]
    fn test_report_kind_slugs() {
        assert_eq!("job-market".parse::<ReportKind>().unwrap(), ReportKind::JobMarket);
        assert!("unknown".parse::<ReportKind>().is_err());
        assert_eq!(ReportKind::SocialImpact.file_name(), "relatorio_social_impact.csv");
    }

    #[test]
    fn test_percent_cell_renders_with_suffix() {
        assert_eq!(Cell::percent(47.63).render(), "47.6%");
        assert_eq!(Cell::Count(5).render(), "5");
    }
}
