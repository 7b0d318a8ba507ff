use campusboard::logging::init_tracing;
use campusboard::router::init_router;
use campusboard::state::init_app_state;
use campusboard::{cli, config};
use dotenvy::dotenv;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    // CLI commands run without the tracing stack
    if args.len() > 1 && args[1] == "create-power-admin" {
        handle_create_power_admin(args).await;
        return;
    }
    if args.len() > 1 && args[1] == "seed-academics" {
        handle_seed_academics().await;
        return;
    }

    init_tracing();

    let state = init_app_state().await;
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
        .await
        .expect("Failed to bind 0.0.0.0:3000");
    println!("🚀 Server running on http://localhost:3000");
    println!("📚 Swagger UI available at http://localhost:3000/swagger-ui");
    println!("📖 Scalar UI available at http://localhost:3000/scalar");
    axum::serve(listener, app)
        .await
        .expect("Server error");
}

async fn handle_create_power_admin(args: Vec<String>) {
    if args.len() != 5 {
        eprintln!("Usage: {} create-power-admin <name> <email> <password>", args[0]);
        std::process::exit(1);
    }

    let name = &args[2];
    let email = &args[3];
    let password = &args[4];

    let pool = config::database::init_db_pool().await;

    match cli::create_power_admin(&pool, name, email, password).await {
        Ok(_) => {
            println!("✅ Power admin created successfully!");
            println!("   Email: {}", email);
            println!("   Name: {}", name);
        }
        Err(e) => {
            eprintln!("❌ Error creating power admin: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed_academics() {
    let pool = config::database::init_db_pool().await;

    if let Err(e) = cli::seeder::seed_academic_structure(&pool).await {
        eprintln!("❌ Error seeding academic structure: {}", e);
        std::process::exit(1);
    }
}
