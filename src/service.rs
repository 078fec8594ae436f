use anyhow::{bail, ensure};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use resend_rs::Resend;
use serde_json::json;
use std::{path::PathBuf, sync::Arc};
use tracing::{error, info, warn};

use crate::{
    builder::{AttendanceDocument, AttendanceSheetBuilder, DEFAULT_COMPANY},
    error::{Result, SheetError},
    helpers::{
        email::{self, EmailConfig},
        pdf,
    },
    models::request::SheetRequest,
};

/// Configuration for the attendance sheet service
#[derive(Clone, Debug, PartialEq)]
pub struct SheetServiceConfig {
    pub company: String,
    pub signature: Option<PathBuf>,
    pub email: Option<EmailConfig>,
}

impl Default for SheetServiceConfig {
    fn default() -> Self {
        Self {
            company: DEFAULT_COMPANY.to_string(),
            signature: None,
            email: None,
        }
    }
}

impl SheetServiceConfig {
    /// Reads `ATTENDANCE_COMPANY`, `ATTENDANCE_SIGNATURE`, `ATTENDANCE_EMAIL_FROM`
    /// and `ATTENDANCE_EMAIL_TO` from the environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let company = value("ATTENDANCE_COMPANY").unwrap_or_else(|| DEFAULT_COMPANY.to_string());

        let signature = value("ATTENDANCE_SIGNATURE").map(PathBuf::from);
        if let Some(path) = &signature {
            ensure!(
                path.is_file(),
                "ATTENDANCE_SIGNATURE points to a missing file: {}",
                path.display()
            );
        }

        let email = match (value("ATTENDANCE_EMAIL_FROM"), value("ATTENDANCE_EMAIL_TO")) {
            (Some(from), Some(to)) => {
                let to: Vec<String> = to
                    .split(',')
                    .map(str::trim)
                    .filter(|addr| !addr.is_empty())
                    .map(String::from)
                    .collect();
                ensure!(!to.is_empty(), "ATTENDANCE_EMAIL_TO has no recipients");
                Some(EmailConfig { from, to })
            }
            (None, None) => None,
            _ => bail!("ATTENDANCE_EMAIL_FROM and ATTENDANCE_EMAIL_TO must be set together"),
        };

        info!(
            "Loaded service config: company '{}', signature {}, email {}",
            company,
            if signature.is_some() { "set" } else { "unset" },
            if email.is_some() { "enabled" } else { "disabled" }
        );

        Ok(Self {
            company,
            signature,
            email,
        })
    }
}

/// Serves attendance sheets as PDF downloads or email attachments.
#[derive(Clone)]
pub struct SheetService {
    pub resend: Option<Resend>,
    pub config: SheetServiceConfig,
}

impl SheetService {
    /// Create a new attendance sheet service instance
    pub fn new(config: SheetServiceConfig, resend: Option<Resend>) -> Self {
        info!("Creating new SheetService instance");
        Self { resend, config }
    }

    /// Create an Axum router for the attendance sheet service
    pub fn router(self) -> Router {
        info!("Creating attendance sheet service router");
        let shared_state = Arc::new(self);

        Router::new()
            .route("/attendance-sheet", post(attendance_sheet))
            .route("/attendance-sheet/email", post(attendance_sheet_email))
            .with_state(shared_state)
    }

    pub fn build_sheet(&self, request: SheetRequest) -> Result<AttendanceDocument> {
        let signed = request.signed;
        let builder =
            AttendanceSheetBuilder::try_from(request)?.with_company(self.config.company.as_str());

        let builder = match (signed, &self.config.signature) {
            (Some(false), _) => builder,
            (_, Some(path)) => builder.signature(Some(path.clone())),
            (Some(true), None) => {
                warn!("Signed sheet requested but no signature image is configured");
                return Err(SheetError::InvalidArgument(
                    "signed sheet requested but no signature image is configured".to_string(),
                ));
            }
            (None, None) => {
                info!("No signature image configured, leaving the signature column blank");
                builder
            }
        };

        Ok(builder.generate())
    }

    pub fn render_sheet(&self, request: SheetRequest) -> Result<(AttendanceDocument, Vec<u8>)> {
        let document = self.build_sheet(request)?;
        let bytes = pdf::render(&document)?;
        Ok((document, bytes))
    }

    /// Render the sheet and email it, returning the email id.
    pub async fn email_sheet(&self, request: SheetRequest) -> Result<String> {
        let (Some(resend), Some(email_config)) = (&self.resend, &self.config.email) else {
            return Err(SheetError::EmailNotConfigured);
        };

        let (document, bytes) = self.render_sheet(request)?;
        let response =
            email::send_attendance_email(resend, email_config, &document, bytes).await?;
        Ok(response.id.to_string())
    }
}

impl IntoResponse for SheetError {
    fn into_response(self) -> Response {
        let status = match &self {
            SheetError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            SheetError::InvalidResource { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            SheetError::SerializationFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SheetError::EmailNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            SheetError::Email(_) => StatusCode::BAD_GATEWAY,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// Route handlers
async fn attendance_sheet(
    State(service): State<Arc<SheetService>>,
    Json(request): Json<SheetRequest>,
) -> Result<Response> {
    info!("Received attendance sheet request for {}", request.name);

    match service.render_sheet(request) {
        Ok((document, bytes)) => {
            info!(
                "Attendance sheet rendered for {} ({}), {} bytes",
                document.employee,
                document.period,
                bytes.len()
            );
            let disposition = format!(
                "attachment; filename=\"{}\"",
                email::sheet_filename(&document)
            );
            Ok((
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response())
        }
        Err(e) => {
            error!("Failed to render attendance sheet: {}", e);
            Err(e)
        }
    }
}

async fn attendance_sheet_email(
    State(service): State<Arc<SheetService>>,
    Json(request): Json<SheetRequest>,
) -> Result<String> {
    info!("Received attendance sheet email request for {}", request.name);

    match service.email_sheet(request).await {
        Ok(email_id) => {
            info!("Attendance sheet emailed successfully, email ID: {}", email_id);
            Ok(email_id)
        }
        Err(e) => {
            error!("Failed to email attendance sheet: {}", e);
            Err(e)
        }
    }
}
