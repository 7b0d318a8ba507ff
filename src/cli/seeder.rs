use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;
use uuid::Uuid;

struct FacultySeed {
    name: &'static str,
    code: &'static str,
    departments: &'static [(&'static str, &'static str)],
}

const ACADEMIC_STRUCTURE: &[FacultySeed] = &[
    FacultySeed {
        name: "Faculty of Science",
        code: "SCI",
        departments: &[
            ("Computer Science", "CSC"),
            ("Mathematics", "MTH"),
            ("Physics", "PHY"),
            ("Chemistry", "CHM"),
            ("Biology", "BIO"),
        ],
    },
    FacultySeed {
        name: "Faculty of Engineering",
        code: "ENG",
        departments: &[
            ("Electrical Engineering", "EEE"),
            ("Mechanical Engineering", "MEE"),
            ("Civil Engineering", "CVE"),
        ],
    },
    FacultySeed {
        name: "Faculty of Arts",
        code: "ARTS",
        departments: &[
            ("English", "ENGL"),
            ("History", "HIST"),
            ("Linguistics", "LING"),
        ],
    },
    FacultySeed {
        name: "Faculty of Social Sciences",
        code: "SOC",
        departments: &[
            ("Economics", "ECO"),
            ("Political Science", "POL"),
            ("Sociology", "SOC"),
        ],
    },
    FacultySeed {
        name: "Faculty of Management Sciences",
        code: "MGT",
        departments: &[("Accounting", "ACC"), ("Business Administration", "BUS")],
    },
];

const LEVEL_NUMBERS: &[i32] = &[100, 200, 300, 400, 500];

/// Seeds a standard faculty / department / level hierarchy.
///
/// Idempotent: existing rows are left alone via ON CONFLICT DO NOTHING,
/// so it is safe to re-run against a populated database.
pub async fn seed_academic_structure(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🌱 Seeding academic structure...");

    let mut tx: Transaction<'_, Postgres> = db.begin().await?;
    let mut faculties = 0usize;
    let mut departments = 0usize;
    let mut levels = 0usize;

    for faculty in ACADEMIC_STRUCTURE {
        let faculty_id = upsert_faculty(&mut tx, faculty.name, faculty.code).await?;
        faculties += 1;

        for (dept_name, dept_code) in faculty.departments {
            let department_id =
                upsert_department(&mut tx, faculty_id, dept_name, dept_code).await?;
            departments += 1;

            for &level_number in LEVEL_NUMBERS {
                upsert_level(&mut tx, department_id, level_number).await?;
                levels += 1;
            }
        }
    }

    tx.commit().await?;

    println!(
        "   ✓ {} faculties, {} departments, {} levels in {:?}",
        faculties,
        departments,
        levels,
        start_time.elapsed()
    );
    Ok(())
}

async fn upsert_faculty(
    tx: &mut Transaction<'_, Postgres>,
    name: &str,
    code: &str,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO faculties (name, code)
         VALUES ($1, $2)
         ON CONFLICT (code) DO UPDATE SET name = EXCLUDED.name
         RETURNING id",
    )
    .bind(name)
    .bind(code)
    .fetch_one(&mut **tx)
    .await
}

async fn upsert_department(
    tx: &mut Transaction<'_, Postgres>,
    faculty_id: Uuid,
    name: &str,
    code: &str,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO departments (faculty_id, name, code)
         VALUES ($1, $2, $3)
         ON CONFLICT (code) DO UPDATE SET name = EXCLUDED.name
         RETURNING id",
    )
    .bind(faculty_id)
    .bind(name)
    .bind(code)
    .fetch_one(&mut **tx)
    .await
}

async fn upsert_level(
    tx: &mut Transaction<'_, Postgres>,
    department_id: Uuid,
    level_number: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO levels (department_id, level_number, display_name)
         VALUES ($1, $2, $3)
         ON CONFLICT (department_id, level_number) DO NOTHING",
    )
    .bind(department_id)
    .bind(level_number)
    .bind(format!("{} Level", level_number))
    .execute(&mut **tx)
    .await?;
    Ok(())
}
