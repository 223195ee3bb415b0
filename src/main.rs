use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &student_portal::config::CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        listen_addr = %cfg.listen_addr,
        loglevel = %cfg.loglevel,
        seed_path = %cfg.seed_path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "<none>".to_string())
    );

    let storage = student_portal::db::PortalStorage::connect(&cfg.database_url).await?;

    if let (Some(email), Some(password)) = (
        cfg.bootstrap_admin_email.as_ref(),
        cfg.bootstrap_admin_password.as_ref(),
    ) {
        let ops = student_portal::service::auth_ops::AuthOps::new(storage.clone());
        match ops
            .bootstrap_admin(&cfg.bootstrap_admin_name, email, password)
            .await
        {
            Ok(Some(id)) => info!(user_id = id, email = %email, "bootstrap admin account created"),
            Ok(None) => info!("accounts already exist; skipping bootstrap admin"),
            Err(e) => warn!(error = %e, "bootstrap admin creation failed"),
        }
    }

    if let Some(seed_path) = cfg.seed_path.as_ref() {
        match student_portal::service::roster_seed::load_from_dir(seed_path) {
            Ok(seeds) if !seeds.is_empty() => {
                info!(
                    path = %seed_path.display(),
                    count = seeds.len(),
                    "inserting roster records loaded from filesystem"
                );
                for seed in &seeds {
                    match storage.student_email_exists(&seed.email).await {
                        Ok(true) => {}
                        Ok(false) => {
                            if let Err(e) = storage.insert_student(seed).await {
                                warn!(email = %seed.email, error = %e, "seed insert failed");
                            }
                        }
                        Err(e) => {
                            warn!(email = %seed.email, error = %e, "seed duplicate check failed");
                        }
                    }
                }
            }
            Ok(_) => {
                info!(path = %seed_path.display(), "no roster seed files discovered");
            }
            Err(e) => {
                warn!(
                    path = %seed_path.display(),
                    error = %e,
                    "failed to load roster seeds from directory"
                );
            }
        }
    }

    let handle = student_portal::service::sessions_actor::spawn(storage.clone()).await;

    // Build axum router and serve
    let state = student_portal::router::PortalState::new(handle, storage);
    let app = student_portal::router::portal_router(state);

    let listener = TcpListener::bind(cfg.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
