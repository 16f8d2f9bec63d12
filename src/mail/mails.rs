use super::sendmail::{render_template, send_email, MailError};
use crate::{
    models::influencermodel::Influencer,
    service::{commission::influencer_rates, referral::generate_referral_link},
    utils::currency::format_rate,
};

const WELCOME_TEMPLATE: &str = include_str!("templates/Welcome-email.html");
const WELCOME_SUBJECT: &str = "Welcome to BWC - Your Ambassador Details";

fn welcome_placeholders(influencer: &Influencer, app_url: &str) -> Vec<(String, String)> {
    let rates = influencer_rates(influencer);
    let code = influencer.referral_code.clone().unwrap_or_default();
    let referral_link = if code.is_empty() {
        app_url.to_string()
    } else {
        generate_referral_link(app_url, &code)
    };

    vec![
        ("{{influencer_name}}".to_string(), influencer.name.clone()),
        ("{{email}}".to_string(), influencer.email.clone()),
        ("{{referral_code}}".to_string(), code),
        ("{{referral_link}}".to_string(), referral_link),
        ("{{ambassador_rate}}".to_string(), format_rate(rates.ambassador_rate)),
        ("{{customer_discount}}".to_string(), format_rate(rates.customer_discount)),
        ("{{login_link}}".to_string(), format!("{}/login", app_url.trim_end_matches('/'))),
    ]
}

pub fn render_welcome_email(influencer: &Influencer, app_url: &str) -> String {
    render_template(WELCOME_TEMPLATE, &welcome_placeholders(influencer, app_url))
}

pub async fn send_welcome_email(influencer: &Influencer, app_url: &str) -> Result<(), MailError> {
    let html = render_welcome_email(influencer, app_url);
    send_email(&influencer.email, WELCOME_SUBJECT, &html, &[]).await
}
