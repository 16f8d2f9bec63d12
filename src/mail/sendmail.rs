use serde_json::json;
use tokio::time::{sleep, Duration};

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_MS: u64 = 1000;

pub type MailError = Box<dyn std::error::Error + Send + Sync>;

/// Substitutes `{{key}}` placeholders.
pub fn render_template(template: &str, placeholders: &[(String, String)]) -> String {
    placeholders
        .iter()
        .fold(template.to_string(), |html, (key, value)| html.replace(key, value))
}

pub async fn send_email(
    to_email: &str,
    subject: &str,
    template: &str,
    placeholders: &[(String, String)],
) -> Result<(), MailError> {
    if to_email.is_empty() {
        return Err("Email recipient cannot be empty".into());
    }
    if !to_email.contains('@') {
        return Err(format!("Invalid email address: {}", to_email).into());
    }

    let html_body = render_template(template, placeholders);
    send_with_retries(to_email, subject, &html_body).await
}

async fn send_with_retries(to_email: &str, subject: &str, html_body: &str) -> Result<(), MailError> {
    let mut last_error = None;

    for attempt in 1..=MAX_RETRIES {
        match send_via_resend(to_email, subject, html_body).await {
            Ok(email_id) => {
                tracing::info!("Email sent to {} (id: {})", to_email, email_id);
                return Ok(());
            }
            Err(e) => {
                last_error = Some(e);
                if attempt < MAX_RETRIES {
                    let delay = RETRY_DELAY_MS * (2_u64.pow(attempt - 1)); // Exponential backoff
                    tracing::warn!(
                        "Email send attempt {} failed for {}. Retrying in {}ms...",
                        attempt,
                        to_email,
                        delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                }
            }
        }
    }

    let error_msg = last_error
        .map(|e| format!("Failed after {} retries: {}", MAX_RETRIES, e))
        .unwrap_or_else(|| "Unknown email sending error".to_string());

    tracing::error!("Email failed for {}: {}", to_email, error_msg);
    Err(error_msg.into())
}

async fn send_via_resend(to_email: &str, subject: &str, html_body: &str) -> Result<String, String> {
    let resend_api_key = std::env::var("RESEND_API_KEY")
        .map_err(|_| "RESEND_API_KEY environment variable not set".to_string())?;

    let from_email = std::env::var("FROM_EMAIL")
        .unwrap_or_else(|_| "BWC Ambassadors <noreply@bwc.example>".to_string());

    if resend_api_key.is_empty() {
        return Err("RESEND_API_KEY is empty".to_string());
    }

    let client = reqwest::Client::new();
    let request_body = json!({
        "from": from_email,
        "to": to_email,
        "subject": subject,
        "html": html_body,
    });

    let response = client
        .post("https://api.resend.com/emails")
        .header("Authorization", format!("Bearer {}", resend_api_key))
        .json(&request_body)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    let status = response.status();
    let response_text = response
        .text()
        .await
        .unwrap_or_else(|_| "No response body".to_string());

    if !status.is_success() {
        return Err(format!("Resend API error ({}): {}", status.as_u16(), response_text));
    }

    let id = serde_json::from_str::<serde_json::Value>(&response_text)
        .ok()
        .and_then(|body| body.get("id").and_then(|v| v.as_str()).map(str::to_string))
        .unwrap_or_else(|| "success".to_string());
    Ok(id)
}
