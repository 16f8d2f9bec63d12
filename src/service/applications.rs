use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    models::applicationmodel::{AmbassadorApplication, ApplicationStatus, NewApplication},
    service::{
        error::ServiceError,
        listing::{filter_by_query, sort_records, Listable, SortDirection, SortValue},
    },
};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ApplicationSortField {
    SubmittedAt,
    Name,
}

impl Listable for AmbassadorApplication {
    type SortField = ApplicationSortField;

    fn matches_query(&self, needle: &str) -> bool {
        self.full_name().to_lowercase().contains(needle) || self.email.to_lowercase().contains(needle)
    }

    fn sort_value(&self, field: ApplicationSortField) -> SortValue<'_> {
        match field {
            ApplicationSortField::SubmittedAt => SortValue::Number(self.submitted_at.timestamp() as f64),
            ApplicationSortField::Name => SortValue::Text(self.full_name().into()),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationFilter {
    #[serde(default)]
    pub search: String,
    /// Rejected applications are hidden unless asked for.
    #[serde(default)]
    pub show_rejected: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationCounts {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

pub fn count_by_status(applications: &[AmbassadorApplication]) -> ApplicationCounts {
    applications
        .iter()
        .fold(ApplicationCounts::default(), |mut counts, application| {
            match application.status {
                ApplicationStatus::Pending => counts.pending += 1,
                ApplicationStatus::Approved => counts.approved += 1,
                ApplicationStatus::Rejected => counts.rejected += 1,
            }
            counts
        })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationListView {
    pub applications: Vec<AmbassadorApplication>,
    pub counts: ApplicationCounts,
}

/// Newest submission first.
pub fn application_view(applications: Vec<AmbassadorApplication>, filter: &ApplicationFilter) -> ApplicationListView {
    let counts = count_by_status(&applications);
    let mut applications: Vec<AmbassadorApplication> = filter_by_query(applications, &filter.search)
        .into_iter()
        .filter(|a| filter.show_rejected || a.status != ApplicationStatus::Rejected)
        .collect();
    sort_records(&mut applications, ApplicationSortField::SubmittedAt, SortDirection::Desc);

    ApplicationListView { applications, counts }
}

pub fn new_application(input: NewApplication, now: DateTime<Utc>) -> AmbassadorApplication {
    AmbassadorApplication {
        id: Uuid::new_v4().to_string(),
        first_name: input.first_name.trim().to_string(),
        last_name: input.last_name.trim().to_string(),
        email: input.email.trim().to_lowercase(),
        phone: input.phone,
        instagram: input.instagram,
        tiktok: input.tiktok,
        youtube: input.youtube,
        bio: input.bio,
        consent_marketing: input.consent_marketing,
        status: ApplicationStatus::Pending,
        submitted_at: now,
        reviewed_at: None,
        reviewed_by: None,
        notes: None,
    }
}

/// Approve or reject a pending application.
pub fn review(
    application: &mut AmbassadorApplication,
    decision: ApplicationStatus,
    reviewer: &str,
    notes: Option<String>,
    now: DateTime<Utc>,
) -> Result<(), ServiceError> {
    if application.status != ApplicationStatus::Pending {
        return Err(ServiceError::ApplicationAlreadyReviewed(
            application.id.clone(),
            application.status,
        ));
    }
    if decision == ApplicationStatus::Pending {
        return Err(ServiceError::Validation(
            "Review decision must be approved or rejected".to_string(),
        ));
    }

    application.status = decision;
    application.reviewed_at = Some(now);
    application.reviewed_by = Some(reviewer.to_string());
    application.notes = notes.filter(|n| !n.trim().is_empty());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn input(first: &str, last: &str) -> NewApplication {
        NewApplication {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}@example.com", first.to_lowercase()),
            phone: "07123 456789".to_string(),
            instagram: Some("@handle".to_string()),
            tiktok: None,
            youtube: None,
            bio: "Skincare creator based in Leeds".to_string(),
            consent_marketing: true,
        }
    }

    fn sample() -> Vec<AmbassadorApplication> {
        let now = Utc::now();
        let mut a = new_application(input("Amelia", "Hart"), now - Duration::days(3));
        let b = new_application(input("Noah", "Reid"), now - Duration::days(1));
        let mut c = new_application(input("Isla", "Grant"), now - Duration::days(2));
        a.status = ApplicationStatus::Approved;
        c.status = ApplicationStatus::Rejected;
        vec![a, b, c]
    }

    #[test]
    fn rejected_hidden_by_default() {
        let view = application_view(sample(), &ApplicationFilter::default());
        let names: Vec<String> = view.applications.iter().map(|a| a.full_name()).collect();
        assert_eq!(names, vec!["Noah Reid", "Amelia Hart"]);
        assert_eq!(view.counts, ApplicationCounts { pending: 1, approved: 1, rejected: 1 });

        let all = application_view(sample(), &ApplicationFilter { show_rejected: true, ..Default::default() });
        assert_eq!(all.applications.len(), 3);
    }

    #[test]
    fn search_matches_full_name_and_email() {
        let filter = ApplicationFilter { search: "noah r".to_string(), show_rejected: true };
        assert_eq!(application_view(sample(), &filter).applications.len(), 1);

        let filter = ApplicationFilter { search: "isla@".to_string(), show_rejected: true };
        assert_eq!(application_view(sample(), &filter).applications.len(), 1);
    }

    #[test]
    fn review_only_from_pending() {
        let now = Utc::now();
        let mut application = new_application(input("Noah", "Reid"), now);
        review(&mut application, ApplicationStatus::Approved, "admin@example.com", Some("Great fit".to_string()), now)
            .unwrap();
        assert_eq!(application.status, ApplicationStatus::Approved);
        assert_eq!(application.reviewed_by.as_deref(), Some("admin@example.com"));
        assert_eq!(application.notes.as_deref(), Some("Great fit"));

        assert!(matches!(
            review(&mut application, ApplicationStatus::Rejected, "admin@example.com", None, now),
            Err(ServiceError::ApplicationAlreadyReviewed(_, ApplicationStatus::Approved))
        ));
    }

    #[test]
    fn pending_is_not_a_decision() {
        let now = Utc::now();
        let mut application = new_application(input("Noah", "Reid"), now);
        assert!(matches!(
            review(&mut application, ApplicationStatus::Pending, "admin@example.com", None, now),
            Err(ServiceError::Validation(_))
        ));
    }
}
