use axum::Router;
use resend_rs::Resend;
use tokio::net::TcpListener;
use tracing::info;

use attendance_sheet::service::{SheetService, SheetServiceConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting attendance sheet service example");

    // ATTENDANCE_COMPANY, ATTENDANCE_SIGNATURE, ATTENDANCE_EMAIL_FROM, ATTENDANCE_EMAIL_TO
    let config = SheetServiceConfig::from_env()?;
    let resend = std::env::var("RESEND_API_KEY")
        .ok()
        .map(|key| Resend::new(&key));

    let sheet_service = SheetService::new(config, resend);

    let app = Router::new()
        .nest("/api", sheet_service.router())
        .route("/health", axum::routing::get(|| async { "OK" }));

    let listener = TcpListener::bind("0.0.0.0:3000").await?;
    info!("Server running on http://0.0.0.0:3000");

    axum::serve(listener, app).await?;

    Ok(())
}

/*
Example usage of the service:

1. POST /api/attendance-sheet
   {"name": "Jane Doe", "month": 10, "year": 2024, "public_holidays": ["2024-10-23"]}
   - Responds with the rendered PDF

2. POST /api/attendance-sheet/email
   - Same body, emails the PDF to ATTENDANCE_EMAIL_TO
   - Requires RESEND_API_KEY and the email settings
*/
