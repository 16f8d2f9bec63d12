// db/fixtures.rs
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::models::{
    applicationmodel::{AmbassadorApplication, ApplicationStatus},
    commissionmodels::CommissionTier,
    influencermodel::{Influencer, InfluencerStatus},
    invoicemodel::{Invoice, InvoiceStatus},
    referralmodel::{CodeStatus, CodeUsageEvent, ReferralCode, UsageStatus},
    statsmodel::MonthlyMetric,
};

use super::db::Store;

const USAGE_SEED: u64 = 0x00B0_C0DE;

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    at(year, month, day, 0, 0).date_naive()
}

fn handle(value: &str) -> Option<String> {
    Some(value.to_string())
}

struct InfluencerSeed {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    status: InfluencerStatus,
    referrals: u32,
    earnings: i64,
    code_usage: u32,
    completed: u32,
    tier: CommissionTier,
    custom: Option<(f64, f64)>,
    instagram: Option<&'static str>,
    tiktok: Option<&'static str>,
    youtube: Option<&'static str>,
    phone: Option<&'static str>,
    bio: Option<&'static str>,
    days_inactive: i64,
}

fn influencer_seeds() -> Vec<InfluencerSeed> {
    vec![
        InfluencerSeed {
            id: "1",
            name: "Emma Rodriguez",
            email: "emma@example.com",
            status: InfluencerStatus::Active,
            referrals: 32,
            earnings: 96_000,
            code_usage: 36,
            completed: 29,
            tier: CommissionTier::Gold,
            custom: None,
            instagram: Some("@emmarod"),
            tiktok: Some("@emmatiktok"),
            youtube: Some("@emmabeauty"),
            phone: Some("07700 900123"),
            bio: Some("Specializes in bridal makeup content"),
            days_inactive: 0,
        },
        InfluencerSeed {
            id: "2",
            name: "James Wilson",
            email: "james@example.com",
            status: InfluencerStatus::Active,
            referrals: 28,
            earnings: 84_000,
            code_usage: 32,
            completed: 25,
            tier: CommissionTier::Silver,
            custom: None,
            instagram: Some("@jamesw"),
            tiktok: None,
            youtube: Some("@jameswilsonbeauty"),
            phone: Some("07700 900456"),
            bio: None,
            days_inactive: 0,
        },
        InfluencerSeed {
            id: "3",
            name: "Sophie Anderson",
            email: "sophie@example.com",
            status: InfluencerStatus::Active,
            referrals: 24,
            earnings: 72_000,
            code_usage: 28,
            completed: 20,
            tier: CommissionTier::Silver,
            custom: None,
            instagram: Some("@sophiea"),
            tiktok: Some("@sophietok"),
            youtube: Some("@sophieandersonbeauty"),
            phone: Some("07700 900789"),
            bio: None,
            days_inactive: 1,
        },
        InfluencerSeed {
            id: "4",
            name: "Michael Brown",
            email: "michael@example.com",
            status: InfluencerStatus::Inactive,
            referrals: 18,
            earnings: 54_000,
            code_usage: 24,
            completed: 14,
            tier: CommissionTier::Bronze,
            custom: None,
            instagram: Some("@mikeb"),
            tiktok: None,
            youtube: None,
            phone: None,
            bio: None,
            days_inactive: 3,
        },
        InfluencerSeed {
            id: "5",
            name: "Olivia Davis",
            email: "olivia@example.com",
            status: InfluencerStatus::Active,
            referrals: 15,
            earnings: 45_000,
            code_usage: 18,
            completed: 12,
            tier: CommissionTier::Custom,
            custom: Some((9.5, 6.0)),
            instagram: None,
            tiktok: Some("@oliviatik"),
            youtube: None,
            phone: Some("07700 900321"),
            bio: None,
            days_inactive: 0,
        },
        InfluencerSeed {
            id: "6",
            name: "David Johnson",
            email: "david@example.com",
            status: InfluencerStatus::Active,
            referrals: 12,
            earnings: 36_000,
            code_usage: 16,
            completed: 9,
            tier: CommissionTier::Tin,
            custom: None,
            instagram: Some("@davidj"),
            tiktok: Some("@davidtok"),
            youtube: None,
            phone: Some("07700 900654"),
            bio: None,
            days_inactive: 1,
        },
    ]
}

fn influencers(now: DateTime<Utc>) -> Vec<Influencer> {
    let created_at = at(2024, 1, 5, 9, 0);
    influencer_seeds()
        .into_iter()
        .map(|seed| Influencer {
            id: seed.id.to_string(),
            name: seed.name.to_string(),
            email: seed.email.to_string(),
            phone: seed.phone.map(str::to_string),
            bio: seed.bio.map(str::to_string),
            instagram: seed.instagram.map(str::to_string),
            tiktok: seed.tiktok.map(str::to_string),
            youtube: seed.youtube.map(str::to_string),
            status: seed.status,
            referrals: seed.referrals,
            code_usage: seed.code_usage,
            completed_treatments: seed.completed,
            earnings: seed.earnings,
            commission_tier: seed.tier,
            custom_commission_rate: seed.custom.map(|(commission, _)| commission),
            custom_discount_rate: seed.custom.map(|(_, discount)| discount),
            referral_code: None,
            expiry_date: None,
            last_active: now - Duration::days(seed.days_inactive),
            created_at,
            updated_at: created_at,
        })
        .collect()
}

/// (influencer id, code, status, days since start, days until expiry, usage count)
const CODE_SEEDS: [(&str, &str, CodeStatus, i64, i64, u32); 7] = [
    ("1", "EMMA5", CodeStatus::Expired, 300, -120, 18),
    ("1", "EMMA10", CodeStatus::Active, 90, 150, 45),
    ("2", "JAMES15", CodeStatus::Paused, 60, 90, 32),
    ("3", "SOPHIE20", CodeStatus::Active, 75, 120, 28),
    ("4", "MICHAEL5", CodeStatus::Expired, 200, -10, 24),
    ("5", "OLIVIA12", CodeStatus::Active, 40, 180, 18),
    ("6", "DAVID8", CodeStatus::Active, 30, 200, 16),
];

fn codes(now: DateTime<Utc>) -> Vec<ReferralCode> {
    CODE_SEEDS
        .iter()
        .enumerate()
        .map(|(index, (influencer_id, code, status, since, until, usage))| ReferralCode {
            id: format!("code-{}", index + 1),
            influencer_id: influencer_id.to_string(),
            code: code.to_string(),
            status: *status,
            start_date: now - Duration::days(*since),
            expiry_date: now + Duration::days(*until),
            usage_count: *usage,
            completed_bookings: 0,
            total_earnings: 0,
        })
        .collect()
}

/// One event per recorded use. Completed bookings earn £50 to £250,
/// pending and cancelled ones earn nothing.
fn usages_for(code: &ReferralCode, today: NaiveDate, rng: &mut StdRng) -> Vec<CodeUsageEvent> {
    let mut events: Vec<CodeUsageEvent> = (0..code.usage_count)
        .map(|i| {
            let status = match rng.random_range(0..3) {
                0 => UsageStatus::Completed,
                1 => UsageStatus::Pending,
                _ => UsageStatus::Cancelled,
            };
            let amount = match status {
                UsageStatus::Completed => rng.random_range(5_000..=25_000),
                _ => 0,
            };
            CodeUsageEvent {
                id: format!("usage-{}-{}", i, code.code),
                code: code.code.clone(),
                date: today - Duration::days(rng.random_range(0..365)),
                booking_id: rng.random_range(100_000..1_000_000).to_string(),
                status,
                amount,
            }
        })
        .collect();

    events.sort_by(|a, b| b.date.cmp(&a.date));
    events
}

fn applications() -> Vec<AmbassadorApplication> {
    let rows = [
        ("1", "Sarah", "Johnson", "sarah.j@example.com", "07700 900123", Some("@sarahbeauty"), Some("@sarahbeautytips"), Some("@sarahbeautychannel"), ApplicationStatus::Pending, at(2024, 3, 10, 14, 30),
            "I'm passionate about creating high-quality beauty content and would love to partner with BWC. My audience trusts my recommendations and I believe in BWC's products."),
        ("2", "Mike", "Thompson", "mike.t@example.com", "07700 900456", Some("@mikestyle"), None, Some("@mikestylegrooming"), ApplicationStatus::Pending, at(2024, 3, 9, 16, 45),
            "I want to join BWC's ambassador program to help promote quality grooming products to my male audience. I believe in authentic partnerships and creating valuable content."),
        ("3", "Emily", "Chen", "emily.c@example.com", "07700 900789", Some("@emilybeauty"), Some("@emilyskincare"), Some("@emilybeautyeducation"), ApplicationStatus::Approved, at(2024, 3, 8, 9, 15),
            "As a professional makeup artist, I'm excited about the opportunity to partner with BWC. I love educating my audience about quality beauty products and services."),
        ("4", "David", "Wilson", "david.w@example.com", "07700 900321", Some("@davidhealth"), None, None, ApplicationStatus::Rejected, at(2024, 3, 7, 11, 20),
            "I'm interested in partnering with BWC to promote wellness and self-care to my fitness community. I believe in the importance of quality personal care products."),
        ("5", "Lisa", "Anderson", "lisa.a@example.com", "07700 900654", Some("@lisabeauty"), Some("@lisabeautysecrets"), Some("@lisabeautytips"), ApplicationStatus::Pending, at(2024, 3, 10, 10, 0),
            "I'm passionate about natural skincare and would love to partner with BWC. My audience values authentic recommendations and I believe in BWC's approach to beauty."),
    ];

    rows.into_iter()
        .map(|(id, first, last, email, phone, instagram, tiktok, youtube, status, submitted_at, bio)| {
            let reviewed = status != ApplicationStatus::Pending;
            AmbassadorApplication {
                id: id.to_string(),
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: email.to_string(),
                phone: phone.to_string(),
                instagram: instagram.and_then(handle),
                tiktok: tiktok.and_then(handle),
                youtube: youtube.and_then(handle),
                bio: bio.to_string(),
                consent_marketing: true,
                status,
                submitted_at,
                reviewed_at: reviewed.then(|| submitted_at + Duration::days(2)),
                reviewed_by: reviewed.then(|| "admin@example.com".to_string()),
                notes: None,
            }
        })
        .collect()
}

fn invoices() -> Vec<Invoice> {
    let rows = [
        ("INV-2024-001", None, "Sarah Johnson", "sarah.j@example.com", day(2024, 3, 1), 250_000, Some(day(2024, 3, 15))),
        ("INV-2024-002", None, "Mike Chen", "mike.c@example.com", day(2024, 3, 1), 180_050, None),
        ("INV-2024-003", None, "Emma Wilson", "emma.w@example.com", day(2024, 2, 1), 210_075, Some(day(2024, 2, 15))),
        ("INV-2024-004", None, "Alex Thompson", "alex.t@example.com", day(2024, 2, 1), 320_025, None),
        ("INV-2024-005", Some("1"), "Emma Rodriguez", "emma@example.com", day(2024, 3, 1), 250_000, Some(day(2024, 3, 15))),
        ("INV-2024-006", Some("1"), "Emma Rodriguez", "emma@example.com", day(2024, 2, 1), 180_050, None),
        ("INV-2024-007", Some("1"), "Emma Rodriguez", "emma@example.com", day(2024, 1, 1), 210_075, Some(day(2024, 2, 15))),
    ];

    rows.into_iter()
        .map(|(number, influencer_id, name, email, month, total_amount, paid_date)| Invoice {
            id: number.to_string(),
            invoice_number: number.to_string(),
            influencer_id: influencer_id.map(str::to_string),
            influencer_name: name.to_string(),
            email: email.to_string(),
            month,
            total_amount,
            status: if paid_date.is_some() { InvoiceStatus::Paid } else { InvoiceStatus::Pending },
            paid_date,
        })
        .collect()
}

fn monthly() -> Vec<MonthlyMetric> {
    const MONTHS: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];
    const REFERRALS: [u32; 12] = [45, 62, 78, 95, 110, 132, 148, 165, 180, 195, 210, 225];
    const REVENUE_POUNDS: [i64; 12] = [4500, 6200, 7800, 9500, 11000, 13200, 14800, 16500, 18000, 19500, 21000, 22500];

    MONTHS
        .iter()
        .zip(REFERRALS)
        .zip(REVENUE_POUNDS)
        .map(|((name, referrals), pounds)| MonthlyMetric {
            name: name.to_string(),
            referrals,
            revenue: pounds * 100,
        })
        .collect()
}

/// Demo data. Usage events come from a fixed seed so every run sees the same history.
pub fn seed(now: DateTime<Utc>) -> Store {
    let mut rng = StdRng::seed_from_u64(USAGE_SEED);
    let today = now.date_naive();

    let mut influencers = influencers(now);
    let mut codes = codes(now);
    let mut usages = Vec::new();

    for code in codes.iter_mut() {
        let events = usages_for(code, today, &mut rng);
        let completed: Vec<&CodeUsageEvent> = events
            .iter()
            .filter(|e| e.status == UsageStatus::Completed)
            .collect();
        code.completed_bookings = completed.len() as u32;
        code.total_earnings = completed.iter().map(|e| e.amount).sum();
        usages.extend(events);
    }

    for influencer in influencers.iter_mut() {
        let live = codes.iter().find(|c| {
            c.influencer_id == influencer.id && matches!(c.status, CodeStatus::Active | CodeStatus::Paused)
        });
        if let Some(code) = live {
            influencer.referral_code = Some(code.code.clone());
            influencer.expiry_date = Some(code.expiry_date.date_naive());
        }
    }

    Store {
        influencers,
        codes,
        usages,
        applications: applications(),
        invoices: invoices(),
        monthly: monthly(),
    }
}
