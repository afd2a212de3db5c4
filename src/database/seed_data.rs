use anyhow::Result;
use chrono::{Duration, Utc};
use sea_orm::*;
use tracing::info;

use crate::auth::Role;
use crate::database::entities::{
    alumni, courses, event_categories, events, profiles, question_templates, survey_templates,
    units,
};
use crate::services::auth_service::AuthService;
use crate::services::survey_service::{QuestionKind, SurveyService};

pub const DEMO_PASSWORD: &str = "demo123";

/// (code, name, courses offered)
const UNITS: &[(&str, &str, &[&str])] = &[
    ("BH", "Belo Horizonte", &["Ciência da Computação", "Engenharia de Software", "Sistemas de Informação", "Design Gráfico"]),
    ("BARBACENA", "Barbacena", &["Administração", "Pedagogia", "Educação Física", "Letras", "História"]),
    ("CARANGOLA", "Carangola", &["Direito", "Ciências Contábeis", "Administração"]),
    ("CLAUDIO", "Cláudio", &["Engenharia Ambiental", "Gestão Ambiental"]),
    ("DIVINOPOLIS", "Divinópolis", &["Engenharia Civil", "Arquitetura e Urbanismo", "Engenharia de Produção"]),
    ("FRUTAL", "Frutal", &["Medicina Veterinária", "Zootecnia", "Agronomia", "Engenharia de Alimentos"]),
    ("IBIRITE", "Ibirité", &["Pedagogia", "Letras", "Matemática"]),
    ("ITUIUTABA", "Ituiutaba", &["Educação Física", "Geografia", "História"]),
    ("JOAO_MONLEVADE", "João Monlevade", &["Engenharia Metalúrgica", "Engenharia de Materiais"]),
    ("LEOPOLDINA", "Leopoldina", &["Direito", "Administração"]),
    ("PASSOS", "Passos", &["Enfermagem", "Fisioterapia", "Farmácia", "Biomedicina"]),
    ("POCOS_CALDAS", "Poços de Caldas", &["Turismo", "Hotelaria", "Gastronomia"]),
    ("UBA", "Ubá", &["Medicina", "Enfermagem", "Fisioterapia"]),
    ("CAMPANHA", "Campanha", &["Filosofia", "Teologia", "História"]),
];

const EVENT_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Acadêmico", "Eventos relacionados à vida acadêmica", "#3b82f6"),
    ("Networking", "Eventos de relacionamento profissional", "#059669"),
    ("Capacitação", "Cursos e workshops de capacitação", "#dc2626"),
    ("Cultural", "Eventos culturais e artísticos", "#7c3aed"),
    ("Científico", "Congressos, seminários e pesquisa", "#0891b2"),
];

/// (email, full name, role)
pub const DEMO_ACCOUNTS: &[(&str, &str, Role)] = &[
    ("egresso@demo.com", "João Silva", Role::Alumnus),
    ("coord@demo.com", "Maria Santos", Role::Coordination),
    ("sec@demo.com", "Ana Costa", Role::Registrar),
];

/// Units, courses and event categories. Safe to run on every start.
pub async fn seed_reference_data(db: &DatabaseConnection) -> Result<()> {
    let existing_units = units::Entity::find().count(db).await?;
    if existing_units > 0 {
        info!("Reference data already present, skipping");
        return Ok(());
    }

    info!("Seeding {} units with their courses", UNITS.len());
    for (code, name, course_names) in UNITS {
        let unit = units::ActiveModel::new(code, name, name).insert(db).await?;

        for (index, course_name) in course_names.iter().enumerate() {
            let course_code = format!("{}-{:02}", code, index + 1);
            courses::ActiveModel::new(unit.id, &course_code, course_name)
                .insert(db)
                .await?;
        }
    }

    for (name, description, color) in EVENT_CATEGORIES {
        let category = event_categories::ActiveModel {
            name: Set(name.to_string()),
            description: Set(Some(description.to_string())),
            color: Set(color.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        category.insert(db).await?;
    }

    info!("Reference data seeded");
    Ok(())
}

/// Demo accounts plus a sample survey and events
pub async fn seed_demo(db: &DatabaseConnection) -> Result<()> {
    seed_reference_data(db).await?;
    seed_demo_accounts(db).await?;
    seed_demo_survey(db).await?;
    seed_demo_events(db).await?;
    Ok(())
}

async fn seed_demo_accounts(db: &DatabaseConnection) -> Result<()> {
    let password_hash = AuthService::hash_password(DEMO_PASSWORD)?;

    for (email, full_name, role) in DEMO_ACCOUNTS {
        let existing = profiles::Entity::find()
            .filter(profiles::Column::Email.eq(*email))
            .one(db)
            .await?;
        if existing.is_some() {
            info!("Demo account {} already exists, skipping", email);
            continue;
        }

        let mut profile = profiles::ActiveModel::new();
        profile.email = Set(email.to_string());
        profile.full_name = Set(full_name.to_string());
        profile.role = Set(role.as_str().to_string());
        profile.password_hash = Set(password_hash.clone());
        let profile = profile.insert(db).await?;

        if *role == Role::Alumnus {
            let now = Utc::now();
            let alumnus = alumni::ActiveModel {
                profile_id: Set(profile.id),
                course: Set("Ciência da Computação".to_string()),
                unit: Set(Some("BH".to_string())),
                graduation_year: Set(2020),
                city: Set(Some("Belo Horizonte".to_string())),
                state: Set(Some("MG".to_string())),
                employment_status: Set(Some("Empregado".to_string())),
                current_employer: Set(Some("Tech Corp".to_string())),
                current_position: Set(Some("Desenvolvedor".to_string())),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            alumnus.insert(db).await?;
        }

        info!("Created demo account {} ({})", email, role);
    }

    Ok(())
}

async fn seed_demo_survey(db: &DatabaseConnection) -> Result<()> {
    let title = "Avaliação da Satisfação Acadêmica";
    let existing = survey_templates::Entity::find()
        .filter(survey_templates::Column::Title.eq(title))
        .one(db)
        .await?;
    if existing.is_some() {
        info!("Demo survey already exists, skipping");
        return Ok(());
    }

    let now = Utc::now();
    let template = survey_templates::ActiveModel {
        title: Set(title.to_string()),
        description: Set(Some(
            "Avalie sua experiência acadêmica e a contribuição do curso para sua carreira"
                .to_string(),
        )),
        objectives: Set(None),
        category: Set("satisfacao_academica".to_string()),
        audience: Set("egressos".to_string()),
        periodicity: Set("anual".to_string()),
        semester: Set(None),
        mandatory: Set(false),
        anonymous: Set(false),
        active: Set(true),
        created_by: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let likert = vec![
        "Muito insatisfeito",
        "Insatisfeito",
        "Neutro",
        "Satisfeito",
        "Muito satisfeito",
    ];
    let questions: Vec<(&str, QuestionKind, Option<Vec<&str>>, bool, &str)> = vec![
        ("Qual seu nível de satisfação com a qualidade do ensino?", QuestionKind::LikertScale, Some(likert.clone()), true, "satisfacao_ensino"),
        ("Como avalia a infraestrutura da unidade?", QuestionKind::LikertScale, Some(likert), true, "infraestrutura"),
        ("Quanto tempo levou para conseguir o primeiro emprego após a formatura?", QuestionKind::MultipleChoice, Some(vec!["Menos de 6 meses", "6 a 12 meses", "1 a 2 anos", "Mais de 2 anos", "Ainda não consegui"]), false, "tempo_primeiro_emprego"),
        ("Atua na área de formação?", QuestionKind::YesNo, None, false, "atuacao_area"),
        ("Recomendaria o curso a um amigo?", QuestionKind::YesNo, None, true, "recomendacao"),
        ("De 1 a 10, qual nota daria ao curso?", QuestionKind::NumericScale, None, false, "nota_curso"),
        ("Comentários adicionais", QuestionKind::Text, None, false, "comentarios"),
    ];

    for (index, (prompt, kind, options, required, category)) in questions.into_iter().enumerate() {
        question_templates::ActiveModel {
            template_id: Set(template.id),
            prompt: Set(prompt.to_string()),
            kind: Set(kind.as_str().to_string()),
            options: Set(options.map(|o| serde_json::json!(o).to_string())),
            required: Set(required),
            position: Set(index as i32 + 1),
            response_category: Set(Some(category.to_string())),
            weight: Set(1.0),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    let survey = SurveyService::new(db.clone())
        .publish(template.id, now - Duration::days(1), Some(now + Duration::days(30)))
        .await?;
    info!("Published demo survey {} ({})", survey.id, title);

    Ok(())
}

async fn seed_demo_events(db: &DatabaseConnection) -> Result<()> {
    let existing = events::Entity::find().count(db).await?;
    if existing > 0 {
        info!("Events already present, skipping demo events");
        return Ok(());
    }

    let category_id = |name: &'static str| async move {
        event_categories::Entity::find()
            .filter(event_categories::Column::Name.eq(name))
            .one(db)
            .await
            .map(|c| c.map(|c| c.id))
    };

    let now = Utc::now();
    let samples = vec![
        ("Encontro de Egressos 2024", "Networking", 30, 8, "presencial", Some("Centro de Convenções BH"), Some(500), 8),
        ("Workshop: Inteligência Artificial na Educação", "Capacitação", 15, 4, "hibrido", Some("Laboratório de Informática - Unidade BH"), Some(50), 4),
        ("Semana de Ciência e Tecnologia", "Científico", 45, 96, "presencial", Some("Campus Divinópolis"), Some(300), 40),
        ("Palestra: Carreira e Mercado de Trabalho", "Acadêmico", 7, 2, "online", None, None, 2),
    ];

    for (title, category, days_ahead, hours, modality, location, capacity, workload) in samples {
        let starts_at = now + Duration::days(days_ahead);
        events::ActiveModel {
            title: Set(title.to_string()),
            description: Set(None),
            category_id: Set(category_id(category).await?),
            starts_at: Set(starts_at),
            ends_at: Set(Some(starts_at + Duration::hours(hours))),
            location: Set(location.map(str::to_string)),
            modality: Set(modality.to_string()),
            online_link: Set(None),
            capacity: Set(capacity),
            free: Set(true),
            price: Set(0.0),
            certificate: Set(true),
            workload_hours: Set(Some(workload)),
            organizer: Set(Some("Pró-reitoria de Extensão".to_string())),
            status: Set("publicado".to_string()),
            created_by: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        info!("Created demo event: {}", title);
    }

    Ok(())
}
