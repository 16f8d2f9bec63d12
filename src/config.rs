#[derive(Debug, Clone)]
pub struct DemoAccount {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub app_url: String,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    // Hard-coded demo logins
    pub admin_account: DemoAccount,
    pub ambassador_account: DemoAccount,
    pub ambassador_influencer_id: String,
}

impl Config {
    pub fn init() -> Config {
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");
        let jwt_maxage = std::env::var("JWT_MAXAGE")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(60);
        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8000);
        let app_url = std::env::var("APP_URL")
            .unwrap_or_else(|_| "http://localhost:5173".to_string());

        let admin_account = DemoAccount {
            email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@example.com".to_string()),
            password: std::env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| "admin123".to_string()),
        };
        let ambassador_account = DemoAccount {
            email: std::env::var("AMBASSADOR_EMAIL")
                .unwrap_or_else(|_| "ambassador@example.com".to_string()),
            password: std::env::var("AMBASSADOR_PASSWORD")
                .unwrap_or_else(|_| "ambassador123".to_string()),
        };
        let ambassador_influencer_id = std::env::var("AMBASSADOR_INFLUENCER_ID")
            .unwrap_or_else(|_| "1".to_string());

        Config {
            app_url,
            jwt_secret,
            jwt_maxage,
            port,
            admin_account,
            ambassador_account,
            ambassador_influencer_id,
        }
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Config {
        Config {
            app_url: "http://localhost:5173".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_maxage: 60,
            port: 8000,
            admin_account: DemoAccount {
                email: "admin@example.com".to_string(),
                password: "admin123".to_string(),
            },
            ambassador_account: DemoAccount {
                email: "ambassador@example.com".to_string(),
                password: "ambassador123".to_string(),
            },
            ambassador_influencer_id: "1".to_string(),
        }
    }
}
