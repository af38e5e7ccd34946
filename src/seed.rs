//! Demo catalog used by the `seed_catalog` binary. Safe to run repeatedly.

use chrono::Utc;
use sea_orm::{ConnectionTrait, DbErr};

use crate::entities::sea_orm_active_enums::VideoSource;
use crate::entities::{department, training};
use crate::repositories::{
    DepartmentRepository, ModuleRepository, NewModule, NewTraining, TrainingRepository,
};

struct SeedModule {
    title: &'static str,
    description: &'static str,
    video_embed: &'static str,
}

struct SeedTraining {
    department: &'static str,
    code: &'static str,
    name: &'static str,
    responsible: &'static str,
    modules: &'static [SeedModule],
}

const DEMO_CATALOG: &[SeedTraining] = &[
    SeedTraining {
        department: "Tax Department",
        code: "FISC-001",
        name: "Tax Assessment Routines",
        responsible: "Carla Andrade",
        modules: &[
            SeedModule {
                title: "Introduction to the tax workflow",
                description: "Overview of the steps, deadlines and critical points of the tax routine.",
                video_embed: "https://www.youtube.com/embed/dQw4w9WgXcQ",
            },
            SeedModule {
                title: "Review checklist",
                description: "Detailed checklist to make sure every review and validation happens.",
                video_embed: "https://www.youtube.com/embed/oHg5SJYRHA0",
            },
        ],
    },
    SeedTraining {
        department: "Accounting Department",
        code: "CONT-014",
        name: "Monthly Close",
        responsible: "Rafael Lopes",
        modules: &[
            SeedModule {
                title: "Planning the close",
                description: "How to organise deadlines, teams and deliverables for the close.",
                video_embed: "https://www.youtube.com/embed/aqz-KE-bpKQ",
            },
            SeedModule {
                title: "Final validations",
                description: "Points of attention and final validations with the client.",
                video_embed: "https://www.youtube.com/embed/ysz5S6PUM-U",
            },
            SeedModule {
                title: "Client communication",
                description: "Communication templates and reply standards for clients.",
                video_embed: "https://www.youtube.com/embed/3JZ_D3ELwOQ",
            },
        ],
    },
];

/// Rows created by one seeding run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub departments: usize,
    pub trainings: usize,
    pub modules: usize,
}

async fn department_named<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    report: &mut SeedReport,
) -> Result<department::Model, DbErr> {
    let departments = DepartmentRepository::new(conn);
    if let Some(existing) = departments.find_by_name(name).await? {
        return Ok(existing);
    }
    report.departments += 1;
    departments.create(name.to_string()).await
}

async fn training_coded<C: ConnectionTrait>(
    conn: &C,
    seed: &SeedTraining,
    department_id: i32,
    report: &mut SeedReport,
) -> Result<training::Model, DbErr> {
    let trainings = TrainingRepository::new(conn);
    if let Some(existing) = trainings.find_by_code(seed.code).await? {
        return Ok(existing);
    }
    report.trainings += 1;
    trainings
        .create(
            NewTraining {
                code: Some(seed.code.to_string()),
                name: seed.name.to_string(),
                responsible: seed.responsible.to_string(),
                department_id,
            },
            Utc::now().date_naive(),
        )
        .await
}

pub async fn seed_demo_catalog<C: ConnectionTrait>(conn: &C) -> Result<SeedReport, DbErr> {
    let mut report = SeedReport::default();
    let modules = ModuleRepository::new(conn);

    for seed in DEMO_CATALOG {
        let department = department_named(conn, seed.department, &mut report).await?;
        let training = training_coded(conn, seed, department.id, &mut report).await?;

        for module in seed.modules {
            if modules
                .find_by_title(training.id, module.title)
                .await?
                .is_some()
            {
                continue;
            }

            modules
                .create(NewModule {
                    training_id: training.id,
                    title: module.title.to_string(),
                    description: module.description.to_string(),
                    video_embed: module.video_embed.to_string(),
                    video_source: VideoSource::Youtube,
                })
                .await?;
            report.modules += 1;
        }
    }

    Ok(report)
}
