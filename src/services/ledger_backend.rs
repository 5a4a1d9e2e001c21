use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tower_sessions::Session;
use crate::config::LedgerConfig;
use crate::errors::{AppResult, LedgerError, LedgerResult};
use crate::models::Ledger;
use crate::AppState;

pub const USER_SESSION_KEY: &str = "user_session";

// Browsers drop cookies larger than this instead of storing them.
pub const MAX_COOKIE_BYTES: usize = 4096;

/// Anonymous ledgers live in a browser cookie instead of on disk.
#[derive(Debug, Clone)]
pub struct CookieLedger {
    name: String,
    max_age_days: i64,
}

impl CookieLedger {
    pub fn new(config: &LedgerConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            max_age_days: config.cookie_max_age_days,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// A missing or unreadable cookie is an empty ledger.
    pub fn load(&self, jar: &CookieJar) -> Ledger {
        let Some(cookie) = jar.get(&self.name) else {
            return Ledger::new();
        };

        // the jar has already percent-decoded the value
        serde_json::from_str(cookie.value()).unwrap_or_else(|e| {
            tracing::warn!("Discarding malformed ledger cookie: {}", e);
            Ledger::new()
        })
    }

    /// Fails with `CookieTooLarge` rather than emit a cookie the browser would drop.
    pub fn store(&self, jar: CookieJar, ledger: &Ledger) -> AppResult<CookieJar> {
        let cookie = Cookie::build((self.name.clone(), serde_json::to_string(ledger)?))
            .path("/")
            .max_age(time::Duration::days(self.max_age_days))
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();

        let size = cookie.encoded().to_string().len();
        if size > MAX_COOKIE_BYTES {
            tracing::warn!("Ledger cookie of {} bytes exceeds {} bytes", size, MAX_COOKIE_BYTES);
            return Err(LedgerError::CookieTooLarge(size).into());
        }
        Ok(jar.add(cookie))
    }
}

/// Where the current request's ledger is read from and written to.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerBackend {
    Stored(String),
    Anonymous,
}

impl LedgerBackend {
    pub async fn from_session(session: &Session) -> AppResult<Self> {
        Ok(match session.get::<String>(USER_SESSION_KEY).await? {
            Some(username) => LedgerBackend::Stored(username),
            None => LedgerBackend::Anonymous,
        })
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            LedgerBackend::Stored(username) => Some(username.as_str()),
            LedgerBackend::Anonymous => None,
        }
    }

    pub fn read(&self, state: &AppState, jar: &CookieJar) -> AppResult<Ledger> {
        match self {
            LedgerBackend::Stored(username) => state.ledgers.read(username),
            LedgerBackend::Anonymous => Ok(state.cookie_ledger.load(jar)),
        }
    }

    /// Loads, mutates and persists the ledger. The returned jar carries the
    /// updated cookie for anonymous visitors and is unchanged otherwise.
    pub async fn apply<T, F>(
        &self,
        state: &AppState,
        jar: CookieJar,
        op: F,
    ) -> AppResult<(CookieJar, Ledger, T)>
    where
        F: FnOnce(&mut Ledger) -> LedgerResult<T>,
    {
        match self {
            LedgerBackend::Stored(username) => {
                let (ledger, value) = state.ledgers.update(username, op).await?;
                Ok((jar, ledger, value))
            }
            LedgerBackend::Anonymous => {
                let mut ledger = state.cookie_ledger.load(&jar);
                let value = op(&mut ledger)?;
                let jar = state.cookie_ledger.store(jar, &ledger)?;
                Ok((jar, ledger, value))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::errors::AppError;

    fn cookie_ledger() -> CookieLedger {
        CookieLedger::new(&Config::with_data_dir("unused").ledger)
    }

    #[test]
    fn test_cookie_roundtrip() {
        let cookies = cookie_ledger();
        let mut ledger = Ledger::new();
        ledger.add_time("Leitura, café", 1.25).unwrap();

        let jar = cookies.store(CookieJar::new(), &ledger).unwrap();
        let cookie = jar.get(cookies.name()).unwrap();
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(30)));
        assert_eq!(cookie.value(), r#"{"Leitura, café":1.25}"#);

        // encoded exactly once on the wire
        let encoded = cookie.encoded().to_string();
        assert!(encoded.starts_with("atividades_data=%7B%22Leitura%2C%20caf%C3%A9%22"));
        assert!(!encoded.contains("%25"));

        assert_eq!(cookies.load(&jar), ledger);
    }

    #[test]
    fn test_oversized_ledger_is_not_stored() {
        let cookies = cookie_ledger();
        let ledger: Ledger = (0..200)
            .map(|i| (format!("Activity number {}", i), 1.5))
            .collect();

        let err = cookies.store(CookieJar::new(), &ledger).unwrap_err();
        assert!(matches!(
            err,
            AppError::Ledger(LedgerError::CookieTooLarge(size)) if size > MAX_COOKIE_BYTES
        ));

        let small: Ledger = (0..10)
            .map(|i| (format!("Activity number {}", i), 1.5))
            .collect();
        assert!(cookies.store(CookieJar::new(), &small).is_ok());
    }

    #[test]
    fn test_missing_or_malformed_cookie_is_empty() {
        let cookies = cookie_ledger();
        assert!(cookies.load(&CookieJar::new()).is_empty());

        let jar = CookieJar::new().add(Cookie::new("atividades_data", "not%20json"));
        assert!(cookies.load(&jar).is_empty());
    }

    #[test]
    fn test_username_only_for_stored_backend() {
        assert_eq!(LedgerBackend::Stored("alice".into()).username(), Some("alice"));
        assert_eq!(LedgerBackend::Anonymous.username(), None);
    }
}
