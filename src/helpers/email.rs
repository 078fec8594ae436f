use resend_rs::{
    types::{Attachment, CreateEmailBaseOptions, CreateEmailResponse},
    Resend,
};
use tracing::{error, info};

use crate::builder::AttendanceDocument;
use crate::helpers::fonts::unaccented;

/// Sender and recipients for delivered sheets.
#[derive(Clone, Debug, PartialEq)]
pub struct EmailConfig {
    pub from: String,
    pub to: Vec<String>,
}

pub fn sheet_subject(document: &AttendanceDocument) -> String {
    format!(
        "Jelenléti ív {} - {}",
        document.period.title_label(),
        document.employee
    )
}

pub fn sheet_filename(document: &AttendanceDocument) -> String {
    let employee = document
        .employee
        .split_whitespace()
        .map(|word| {
            word.chars()
                .map(unaccented)
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    format!("Jelenleti_iv_{}_{}.pdf", document.period, employee)
}

pub async fn send_attendance_email(
    resend: &Resend,
    config: &EmailConfig,
    document: &AttendanceDocument,
    sheet: Vec<u8>,
) -> Result<CreateEmailResponse, resend_rs::Error> {
    let subject = sheet_subject(document);

    info!("Preparing email with subject: {}", &subject);
    info!(
        "Attendance sheet attachment size: {} bytes, recipients: {:?}",
        sheet.len(),
        config.to
    );

    let email = CreateEmailBaseOptions::new(&config.from, config.to.clone(), &subject)
        .with_text(&subject)
        .with_attachment(
            Attachment::from_content(sheet)
                .with_filename(&sheet_filename(document))
                .with_content_type("application/pdf"),
        );

    let result = resend.emails.send(email).await;
    match &result {
        Ok(response) => info!(
            "Attendance sheet email sent successfully with ID: {}",
            response.id
        ),
        Err(e) => error!("Failed to send attendance sheet email: {}", e),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::AttendanceSheetBuilder;

    #[test]
    fn subject_and_filename_name_the_period() {
        let doc = AttendanceSheetBuilder::new("Jane  Doe")
            .month(2024, 10)
            .unwrap()
            .generate();
        assert_eq!(sheet_subject(&doc), "Jelenléti ív 2024 October - Jane  Doe");
        assert_eq!(sheet_filename(&doc), "Jelenleti_iv_2024-10_Jane_Doe.pdf");
    }

    #[test]
    fn filename_is_ascii() {
        let doc = AttendanceSheetBuilder::new("Vörös Éva-Ő (HR)")
            .month(2024, 1)
            .unwrap()
            .generate();
        assert_eq!(sheet_filename(&doc), "Jelenleti_iv_2024-01_Voros_Eva-O_HR.pdf");
    }
}
